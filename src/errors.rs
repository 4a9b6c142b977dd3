//! Crate-wide error type.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// RAM or ROM was asked for an address outside its mapped range.
    /// The bus only routes holes in the memory map here, so a running
    /// program can trigger this by dereferencing unmapped space.
    #[error("address out of range: ${addr:04X}")]
    OutOfRange { addr: u16 },

    #[error("rom file {}: {source}", .path.display())]
    BadRomFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("rom directory {}: {source}", .path.display())]
    BadRomDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Host stdin/stdout went away mid-run.
    #[error("host i/o: {0}")]
    HostIo(#[from] io::Error),

    /// Clean user-initiated stop (SIGINT, or the Ctrl-C byte in raw mode).
    #[error("interrupted")]
    Interrupted,
}

pub type Result<T> = std::result::Result<T, Error>;
