//! Host-terminal plumbing for the serial front end.
//!
//! Three pieces: a scoped raw-mode guard that restores the terminal on
//! drop, a non-blocking stdin poll, and the transmit policy that renders
//! the machine's serial output onto a modern terminal.

use std::io::{self, Read, Write};

use termion::raw::{IntoRawMode, RawTerminal};

use crate::errors::{Error, Result};
use crate::machine::acia::SerialTransport;

/// Ctrl-C arrives as a plain byte once the terminal is raw.
const ETX: u8 = 0x03;

// ── Raw-mode guard ────────────────────────────────────────────

/// Puts the terminal into non-canonical, no-echo mode for its lifetime.
/// Dropping the guard (on normal exit, on error, or during a panic
/// unwind) restores the saved settings.  When stdout is not a TTY no
/// mode change is attempted.
pub struct TerminalGuard {
    _raw: Option<RawTerminal<io::Stdout>>,
}

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        if !termion::is_tty(&io::stdout()) {
            return Ok(Self { _raw: None });
        }
        Ok(Self {
            _raw: Some(io::stdout().into_raw_mode()?),
        })
    }
}

// ── Transport ─────────────────────────────────────────────────

pub struct ConsoleTransport {
    stdin: io::Stdin,
    stdout: io::Stdout,
}

impl ConsoleTransport {
    pub fn new() -> io::Result<Self> {
        set_stdin_nonblocking()?;
        Ok(Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
        })
    }
}

impl SerialTransport for ConsoleTransport {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        match self.stdin.read(&mut buf) {
            Ok(0) => Err(Error::HostIo(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "stdin closed",
            ))),
            Ok(_) => {
                if buf[0] == ETX {
                    return Err(Error::Interrupted);
                }
                Ok(Some(buf[0]))
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => Err(Error::HostIo(e)),
        }
    }

    fn transmit(&mut self, byte: u8) -> Result<()> {
        if render_byte(&mut self.stdout, byte)? {
            // Flush per character so the user sees live output.
            self.stdout.flush().map_err(Error::HostIo)?;
        }
        Ok(())
    }
}

/// Render one transmitted byte onto the terminal.  Returns whether
/// anything was written: line feeds and carriage returns map to the
/// terminal's conventions, backspace and bell pass through, printable
/// ASCII goes out verbatim, everything else is dropped.
fn render_byte<W: Write>(out: &mut W, byte: u8) -> Result<bool> {
    match byte {
        0x0A => out.write_all(b"\n")?,
        0x0D => out.write_all(b"\r\n")?,
        0x08 => out.write_all(&[0x08])?,
        0x07 => out.write_all(&[0x07])?,
        0x20..=0x7E => out.write_all(&[byte])?,
        _ => return Ok(false),
    }
    Ok(true)
}

#[cfg(unix)]
fn set_stdin_nonblocking() -> io::Result<()> {
    unsafe {
        let flags = libc::fcntl(libc::STDIN_FILENO, libc::F_GETFL);
        if flags < 0 {
            return Err(io::Error::last_os_error());
        }
        if libc::fcntl(libc::STDIN_FILENO, libc::F_SETFL, flags | libc::O_NONBLOCK) < 0 {
            return Err(io::Error::last_os_error());
        }
    }
    Ok(())
}

#[cfg(not(unix))]
fn set_stdin_nonblocking() -> io::Result<()> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(bytes: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        for &b in bytes {
            render_byte(&mut out, b).unwrap();
        }
        out
    }

    #[test]
    fn printable_ascii_passes_through() {
        assert_eq!(rendered(b"Hello, World!"), b"Hello, World!");
    }

    #[test]
    fn carriage_return_expands() {
        assert_eq!(rendered(&[0x0D]), b"\r\n");
        assert_eq!(rendered(&[0x0A]), b"\n");
    }

    #[test]
    fn backspace_and_bell_pass_through() {
        assert_eq!(rendered(&[0x08, 0x07]), &[0x08, 0x07]);
    }

    #[test]
    fn other_control_bytes_are_dropped() {
        assert_eq!(rendered(&[0x00, 0x1B, 0x7F, 0xFF]), b"");
    }
}
