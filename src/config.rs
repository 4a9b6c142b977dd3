//! Command-line handling shared by the runner binaries.
//!
//! `<rom> [clock_hz] [--trace]`, where the ROM argument may be a raw
//! image file or a directory of `*.bin` files.  A clock of 0 (or none at
//! all) runs unpaced.

use std::path::PathBuf;

use crate::errors::Result;
use crate::machine::rom::Rom;

pub struct RunConfig {
    pub rom_path: PathBuf,
    /// Emulated cycles per second; 0 = as fast as the host can go.
    pub clock_hz: u64,
    /// Per-instruction tracing without spelling out RUST_LOG.
    pub trace: bool,
}

impl RunConfig {
    /// Parse the arguments after the program name.  Errors carry a
    /// user-facing message; the binaries print it next to their usage
    /// line.
    pub fn from_args<I>(args: I) -> std::result::Result<Self, String>
    where
        I: IntoIterator<Item = String>,
    {
        let mut rom_path = None;
        let mut clock_hz = 0u64;
        let mut trace = false;
        let mut positional = 0;

        for arg in args {
            if arg == "--trace" {
                trace = true;
                continue;
            }
            if arg.starts_with("--") {
                return Err(format!("unknown flag: {arg}"));
            }
            match positional {
                0 => rom_path = Some(PathBuf::from(&arg)),
                1 => {
                    clock_hz = arg
                        .parse()
                        .map_err(|_| format!("clock rate is not a number: {arg}"))?;
                }
                _ => return Err(format!("unexpected argument: {arg}")),
            }
            positional += 1;
        }

        let rom_path = rom_path.ok_or_else(|| "missing rom path".to_string())?;
        Ok(Self {
            rom_path,
            clock_hz,
            trace,
        })
    }

    pub fn load_rom(&self) -> Result<Rom> {
        if self.rom_path.is_dir() {
            Rom::from_directory(&self.rom_path)
        } else {
            Rom::from_file(&self.rom_path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<RunConfig, String> {
        RunConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn rom_path_alone() {
        let config = parse(&["blink.bin"]).unwrap();
        assert_eq!(config.rom_path, PathBuf::from("blink.bin"));
        assert_eq!(config.clock_hz, 0);
        assert!(!config.trace);
    }

    #[test]
    fn clock_and_trace() {
        let config = parse(&["rom.bin", "1000000", "--trace"]).unwrap();
        assert_eq!(config.clock_hz, 1_000_000);
        assert!(config.trace);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse(&[]).is_err());
        assert!(parse(&["rom.bin", "fast"]).is_err());
        assert!(parse(&["rom.bin", "1", "2"]).is_err());
        assert!(parse(&["--what", "rom.bin"]).is_err());
    }
}
