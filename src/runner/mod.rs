//! The interactive run loop: steps the machine cycle by cycle, paces the
//! emulated clock, and stops on host cancellation or a machine fault.

pub mod console;
pub mod led;

use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::{Duration, Instant};

use crate::errors::{Error, Result};
use crate::machine::cpu::disasm;
use crate::machine::system::System;

static INTERRUPTED: AtomicBool = AtomicBool::new(false);

/// Initialize the log facade.  `--trace` turns on per-instruction tracing
/// without making the user spell out `RUST_LOG`.
pub fn init_logging(trace: bool) {
    let mut builder = env_logger::Builder::from_default_env();
    if trace {
        builder.filter(Some("breadbox"), log::LevelFilter::Trace);
    }
    builder.init();
}

// ── Cancellation ──────────────────────────────────────────────

pub fn interrupted() -> bool {
    INTERRUPTED.load(Ordering::Relaxed)
}

/// Request a clean stop from signal context or the input path.
pub fn request_stop() {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

#[cfg(unix)]
extern "C" fn handle_sigint(_: libc::c_int) {
    INTERRUPTED.store(true, Ordering::Relaxed);
}

/// Install the SIGINT hook that requests a clean stop.  In raw terminal
/// mode Ctrl-C never raises a signal; the console transport catches the
/// 0x03 byte instead.
#[cfg(unix)]
pub fn install_sigint_hook() {
    unsafe {
        libc::signal(libc::SIGINT, handle_sigint as usize as libc::sighandler_t);
    }
}

#[cfg(not(unix))]
pub fn install_sigint_hook() {}

// ── Clock pacing ──────────────────────────────────────────────

/// Absolute-timeline pacing: the Nth cycle is due at
/// `start + N * period`.  Running behind schedule just skips the sleep
/// until the timeline is caught up again; the deadline is never snapped
/// forward, so short stalls are amortized instead of stretching the
/// emulated clock.
pub struct Pacer {
    period_nanos: Option<u64>,
    start: Instant,
    executed: u64,
}

impl Pacer {
    /// `clock_hz` of 0 means unpaced: run as fast as the host allows.
    pub fn new(clock_hz: u64) -> Self {
        Self {
            period_nanos: match clock_hz {
                0 => None,
                hz => Some(1_000_000_000 / hz),
            },
            start: Instant::now(),
            executed: 0,
        }
    }

    pub fn pace(&mut self) {
        self.executed += 1;
        let Some(period) = self.period_nanos else {
            return;
        };
        let target = self.start + Duration::from_nanos(period.saturating_mul(self.executed));
        wait_until(target);
    }
}

/// Wait out `deadline` with sleep for bulk and a spin for the last
/// stretch, since sleep granularity is ~1 ms on most hosts.  Returns
/// immediately when already past due.
fn wait_until(deadline: Instant) {
    let now = Instant::now();
    if now >= deadline {
        return;
    }
    let remaining = deadline - now;
    if remaining > Duration::from_micros(1500) {
        thread::sleep(remaining - Duration::from_micros(1000));
    }
    while Instant::now() < deadline {
        std::hint::spin_loop();
    }
}

// ── The loop ──────────────────────────────────────────────────

/// Step the machine until cancelled or a fault bubbles out.  `on_cycle`
/// runs after every cycle; the LED front end refreshes its panel there.
pub fn run<F>(system: &mut System, clock_hz: u64, mut on_cycle: F) -> Result<()>
where
    F: FnMut(&mut System) -> Result<()>,
{
    let tracing = log::log_enabled!(log::Level::Trace);
    let mut pacer = Pacer::new(clock_hz);
    loop {
        if interrupted() {
            return Err(Error::Interrupted);
        }
        if tracing && system.cpu.at_instruction_boundary() {
            let (text, _) = disasm::disassemble(&system.bus, system.cpu.pc);
            log::trace!("{:04X}  {text}", system.cpu.pc);
        }
        system.step()?;
        on_cycle(system)?;
        pacer.pace();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unpaced_pacer_never_sleeps() {
        let mut pacer = Pacer::new(0);
        let start = Instant::now();
        for _ in 0..10_000 {
            pacer.pace();
        }
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn wait_until_in_the_past_returns_immediately() {
        wait_until(Instant::now() - Duration::from_secs(1));
    }

    #[test]
    fn paced_pacer_holds_the_schedule() {
        // 100 kHz for 200 cycles ≈ 2 ms of emulated time.
        let mut pacer = Pacer::new(100_000);
        let start = Instant::now();
        for _ in 0..200 {
            pacer.pace();
        }
        assert!(start.elapsed() >= Duration::from_millis(2));
    }
}
