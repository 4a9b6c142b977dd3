//! Serial-console front end: boots a ROM with the ACIA wired to the host
//! terminal in raw mode.  Ctrl-C (the raw 0x03 byte) stops the run.

use std::process::ExitCode;

use breadbox::config::RunConfig;
use breadbox::machine::system::System;
use breadbox::runner;
use breadbox::runner::console::{ConsoleTransport, TerminalGuard};
use breadbox::Error;

fn main() -> ExitCode {
    let config = match RunConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("[breadbox] {msg}");
            eprintln!("usage: run-console <rom> [clock_hz] [--trace]");
            return ExitCode::FAILURE;
        }
    };
    runner::init_logging(config.trace);

    let rom = match config.load_rom() {
        Ok(rom) => rom,
        Err(e) => {
            eprintln!("[breadbox] {e}");
            return ExitCode::FAILURE;
        }
    };

    let mut system = System::new(rom);
    let transport = match ConsoleTransport::new() {
        Ok(transport) => transport,
        Err(e) => {
            eprintln!("[breadbox] cannot set up terminal: {e}");
            return ExitCode::FAILURE;
        }
    };
    system.attach_acia(Box::new(transport));

    if let Err(e) = system.power_on() {
        eprintln!("[breadbox] {e}");
        return ExitCode::FAILURE;
    }

    runner::install_sigint_hook();
    eprintln!("[breadbox] running {}; Ctrl-C exits", config.rom_path.display());

    // Raw mode lives exactly as long as the run; the guard restores the
    // terminal on every exit path, panics included.
    let guard = match TerminalGuard::new() {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("[breadbox] cannot enter raw mode: {e}");
            return ExitCode::FAILURE;
        }
    };
    let result = runner::run(&mut system, config.clock_hz, |_| Ok(()));
    drop(guard);

    println!();
    match result {
        Ok(()) | Err(Error::Interrupted) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[breadbox] {e}");
            ExitCode::FAILURE
        }
    }
}
