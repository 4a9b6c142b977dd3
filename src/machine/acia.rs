//! MOS 6551-style ACIA bridging the machine to a host byte stream.
//!
//! Transmission is synchronous and always ready: TDRE stays set and a data
//! write goes straight out through the transport.  Reception is pumped
//! once per bus cycle from the transport into a bounded FIFO; overrunning
//! the FIFO sets OVRN and drops bytes, the way the real part drops a byte
//! it had no room for.

use std::collections::VecDeque;

use super::peripheral::Peripheral;
use crate::errors::Result;

// ── Register offsets ──────────────────────────────────────────

pub const DATA: u16 = 0x0;
/// Status on read; writing any value is a programmed reset.
pub const STATUS: u16 = 0x1;
pub const COMMAND: u16 = 0x2;
pub const CONTROL: u16 = 0x3;

// ── Status bits ───────────────────────────────────────────────

pub const ST_IRQ: u8 = 1 << 7;
pub const ST_TDRE: u8 = 1 << 4;
pub const ST_RDRF: u8 = 1 << 3;
pub const ST_OVRN: u8 = 1 << 2;

/// Command bit 7 high masks the receive interrupt.
const CMD_RX_IRQ_DISABLE: u8 = 1 << 7;

pub const RX_CAPACITY: usize = 256;

/// Host-side byte transport the ACIA talks through.  The console runner
/// implements this over the raw terminal; tests use in-memory loopbacks.
/// Bytes pass through unmodified; any control-character rendering is the
/// transport's business.
pub trait SerialTransport {
    /// Fetch at most one pending input byte without blocking.
    fn poll_byte(&mut self) -> Result<Option<u8>>;

    /// Emit one transmitted byte.
    fn transmit(&mut self, byte: u8) -> Result<()>;
}

pub struct Acia {
    status: u8,
    command: u8,
    control: u8,
    rx: VecDeque<u8>,
    transport: Box<dyn SerialTransport>,
}

impl Acia {
    pub fn new(transport: Box<dyn SerialTransport>) -> Self {
        Self {
            status: ST_TDRE,
            command: 0,
            control: 0,
            rx: VecDeque::new(),
            transport,
        }
    }

    /// Programmed reset: clears the receive path, keeps TDRE.
    fn reset(&mut self) {
        self.status = ST_TDRE;
        self.rx.clear();
        log::debug!("acia: programmed reset");
    }

    /// Drop a byte straight into the receive FIFO, as if it had arrived
    /// on the wire.
    pub fn push_rx(&mut self, byte: u8) {
        if self.rx.len() >= RX_CAPACITY {
            self.status |= ST_OVRN;
            return;
        }
        self.rx.push_back(byte);
        self.status |= ST_RDRF;
    }

    pub fn has_irq(&self) -> bool {
        self.command & CMD_RX_IRQ_DISABLE == 0 && !self.rx.is_empty()
    }

    fn read_register(&mut self, reg: u16) -> u8 {
        match reg {
            DATA => match self.rx.pop_front() {
                Some(byte) => {
                    if self.rx.is_empty() {
                        self.status &= !ST_RDRF;
                    }
                    byte
                }
                None => 0,
            },
            STATUS => {
                let mut status = self.status;
                if self.has_irq() {
                    status |= ST_IRQ;
                }
                status
            }
            COMMAND => self.command,
            CONTROL => self.control,
            _ => unreachable!("register index masked to 2 bits"),
        }
    }

    fn write_register(&mut self, reg: u16, value: u8) -> Result<()> {
        match reg {
            DATA => {
                self.transport.transmit(value)?;
                self.status |= ST_TDRE;
            }
            STATUS => self.reset(),
            COMMAND => self.command = value,
            // Baud / word-length / parity selections are cosmetic here.
            CONTROL => self.control = value,
            _ => unreachable!("register index masked to 2 bits"),
        }
        Ok(())
    }
}

impl Peripheral for Acia {
    fn read(&mut self, offset: u16) -> u8 {
        self.read_register(offset & 0x3)
    }

    fn write(&mut self, offset: u16, value: u8) -> Result<()> {
        self.write_register(offset & 0x3, value)
    }

    fn tick(&mut self) -> Result<()> {
        while let Some(byte) = self.transport.poll_byte()? {
            if self.rx.len() >= RX_CAPACITY {
                self.status |= ST_OVRN;
                continue;
            }
            self.rx.push_back(byte);
        }
        if !self.rx.is_empty() {
            self.status |= ST_RDRF;
        }
        Ok(())
    }

    fn irq_line(&self) -> bool {
        self.has_irq()
    }
}
