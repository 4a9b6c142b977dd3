//! 32 KiB of read-only memory at the top of the address space.
//!
//! Images are raw binaries: the first byte of a file lands at the load
//! address (default `0x8000`) and the bytes run upward from there.  A whole
//! directory can be loaded too: files go in ASCII order, and a basename
//! ending in `_HHHH` picks the load address for that file.

use std::fs;
use std::path::Path;

use walkdir::WalkDir;

use super::ROM_START;
use crate::errors::{Error, Result};

pub const ROM_SIZE: usize = 0x8000;

pub struct Rom {
    bytes: [u8; ROM_SIZE],
}

impl Rom {
    pub fn new() -> Self {
        Self {
            bytes: [0; ROM_SIZE],
        }
    }

    /// Load a whole image file at `ROM_START`.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut rom = Self::new();
        rom.load_file(path, ROM_START)?;
        Ok(rom)
    }

    /// Load every `*.bin` in `dir`, ASCII-sorted.
    pub fn from_directory<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let mut rom = Self::new();
        rom.load_directory(dir)?;
        Ok(rom)
    }

    pub fn read(&self, addr: u16) -> Result<u8> {
        if addr < ROM_START {
            return Err(Error::OutOfRange { addr });
        }
        Ok(self.bytes[(addr - ROM_START) as usize])
    }

    /// Place `bytes` starting at `offset`.  Target addresses wrap modulo
    /// 65536; bytes that land below `ROM_START` after wrapping are dropped.
    pub fn load_bytes(&mut self, bytes: &[u8], offset: u16) {
        for (i, &byte) in bytes.iter().enumerate() {
            let target = offset.wrapping_add(i as u16);
            if target >= ROM_START {
                self.bytes[(target - ROM_START) as usize] = byte;
            }
        }
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P, offset: u16) -> Result<()> {
        let path = path.as_ref();
        let data = fs::read(path).map_err(|source| Error::BadRomFile {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_bytes(&data, offset);
        log::info!(
            "loaded {} ({} bytes) at ${:04X}",
            path.display(),
            data.len(),
            offset,
        );
        Ok(())
    }

    pub fn load_directory<P: AsRef<Path>>(&mut self, dir: P) -> Result<()> {
        let dir = dir.as_ref();
        let mut files = Vec::new();
        for entry in WalkDir::new(dir).min_depth(1).max_depth(1) {
            let entry = entry.map_err(|e| Error::BadRomDirectory {
                path: dir.to_path_buf(),
                source: e.into(),
            })?;
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) == Some("bin") {
                files.push(path.to_path_buf());
            }
        }
        files.sort();
        for path in files {
            let offset = load_address(&path).unwrap_or(ROM_START);
            self.load_file(&path, offset)?;
        }
        Ok(())
    }
}

impl Default for Rom {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse the `_HHHH` load-address suffix out of a file name like
/// `monitor_C000.bin`.
fn load_address(path: &Path) -> Option<u16> {
    let stem = path.file_stem()?.to_str()?;
    let (_, hex) = stem.rsplit_once('_')?;
    if hex.len() != 4 {
        return None;
    }
    u16::from_str_radix(hex, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn reads_zero_where_nothing_was_loaded() {
        let rom = Rom::new();
        assert_eq!(rom.read(0x8000).unwrap(), 0);
        assert_eq!(rom.read(0xFFFF).unwrap(), 0);
    }

    #[test]
    fn rejects_addresses_below_the_chip() {
        let rom = Rom::new();
        assert!(matches!(
            rom.read(0x7FFF),
            Err(crate::Error::OutOfRange { addr: 0x7FFF })
        ));
    }

    #[test]
    fn loads_at_the_requested_offset() {
        let mut rom = Rom::new();
        rom.load_bytes(&[0xDE, 0xAD], 0x9000);
        assert_eq!(rom.read(0x9000).unwrap(), 0xDE);
        assert_eq!(rom.read(0x9001).unwrap(), 0xAD);
    }

    #[test]
    fn drops_bytes_that_wrap_below_rom() {
        let mut rom = Rom::new();
        // Two bytes starting at the last cell: the second wraps to 0x0000
        // and is discarded.
        rom.load_bytes(&[0x11, 0x22], 0xFFFF);
        assert_eq!(rom.read(0xFFFF).unwrap(), 0x11);
        assert_eq!(rom.read(0x8000).unwrap(), 0);
    }

    #[test]
    fn parses_load_address_suffixes() {
        assert_eq!(load_address(&PathBuf::from("monitor_C000.bin")), Some(0xC000));
        assert_eq!(load_address(&PathBuf::from("basic_a000.bin")), Some(0xA000));
        assert_eq!(load_address(&PathBuf::from("plain.bin")), None);
        assert_eq!(load_address(&PathBuf::from("odd_12.bin")), None);
    }
}
