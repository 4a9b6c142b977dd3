//! LED-panel front end: boots a ROM and mirrors the VIA output ports as
//! two rows of LEDs until interrupted.

use std::process::ExitCode;

use breadbox::config::RunConfig;
use breadbox::machine::system::System;
use breadbox::runner::{self, led::LedPanel};
use breadbox::Error;

fn main() -> ExitCode {
    let config = match RunConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(msg) => {
            eprintln!("[breadbox] {msg}");
            eprintln!("usage: run-led <rom> [clock_hz] [--trace]");
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
    if let Err(e) = system.power_on() {
        eprintln!("[breadbox] {e}");
        return ExitCode::FAILURE;
    }

    runner::install_sigint_hook();
    eprintln!(
        "[breadbox] running {} ({})",
        config.rom_path.display(),
        match config.clock_hz {
            0 => "unpaced".to_string(),
            hz => format!("{hz} Hz"),
        },
    );

    let via = system.via();
    let mut panel = LedPanel::new();
    let result = runner::run(&mut system, config.clock_hz, |_| {
        let (port_a, port_b) = {
            let via = via.borrow();
            (via.port_a_output(), via.port_b_output())
        };
        panel.refresh(port_a, port_b).map_err(Error::HostIo)
    });

    println!();
    match result {
        Ok(()) | Err(Error::Interrupted) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("[breadbox] {e}");
            ExitCode::FAILURE
        }
    }
}
