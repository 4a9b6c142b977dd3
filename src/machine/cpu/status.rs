//! The processor status register.

use bitflags::bitflags;

bitflags! {
    /// Status flags, `NV1BDIZC` from bit 7 down to bit 0.  Bit 5 (`U`) has
    /// no storage on the real part and reads back as 1 whenever the
    /// register is pushed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Status: u8 {
        const C = 1 << 0;
        const Z = 1 << 1;
        const I = 1 << 2;
        const D = 1 << 3;
        const B = 1 << 4;
        const U = 1 << 5;
        const V = 1 << 6;
        const N = 1 << 7;
    }
}

impl Status {
    /// Register contents right after RESET: interrupts masked, decimal
    /// mode off, U (and B, by convention) reading as set.
    pub fn after_reset() -> Self {
        Status::from_bits_retain(0b0011_0100)
    }

    /// Update Z and N from an 8-bit result.
    pub fn set_zn(&mut self, value: u8) {
        self.set(Status::Z, value == 0);
        self.set(Status::N, value & 0x80 != 0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_state() {
        let s = Status::after_reset();
        assert!(s.contains(Status::I));
        assert!(s.contains(Status::U));
        assert!(s.contains(Status::B));
        assert!(!s.contains(Status::D));
        assert_eq!(s.bits(), 0b0011_0100);
    }

    #[test]
    fn zn_tracking() {
        let mut s = Status::empty();
        s.set_zn(0x00);
        assert!(s.contains(Status::Z) && !s.contains(Status::N));
        s.set_zn(0x80);
        assert!(!s.contains(Status::Z) && s.contains(Status::N));
        s.set_zn(0x01);
        assert!(!s.contains(Status::Z) && !s.contains(Status::N));
    }
}
