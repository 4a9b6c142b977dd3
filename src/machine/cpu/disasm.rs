//! One-line disassembly, used by the trace log.
//!
//! Reads through `Bus::peek` so that tracing never acknowledges an
//! interrupt flag or pops a FIFO by looking at it.

use super::opcodes::{Mnemonic, Mode, OPCODES};
use crate::machine::bus::Bus;

/// Format the instruction at `addr`.  Returns the text and the total
/// instruction length in bytes.
pub fn disassemble(bus: &Bus, addr: u16) -> (String, u16) {
    let opcode = bus.peek(addr);
    let entry = &OPCODES[opcode as usize];
    let b1 = bus.peek(addr.wrapping_add(1));
    let b2 = bus.peek(addr.wrapping_add(2));
    let word = (b2 as u16) << 8 | b1 as u16;
    let len = 1 + entry.mode.operand_len();

    let name = mnemonic_name(entry.mnemonic);
    let text = match entry.mode {
        Mode::Implied => name,
        Mode::Accumulator => format!("{name} A"),
        Mode::Immediate => format!("{name} #${b1:02X}"),
        Mode::ZeroPage => format!("{name} ${b1:02X}"),
        Mode::ZeroPageX => format!("{name} ${b1:02X},X"),
        Mode::ZeroPageY => format!("{name} ${b1:02X},Y"),
        Mode::Absolute => format!("{name} ${word:04X}"),
        Mode::AbsoluteX => format!("{name} ${word:04X},X"),
        Mode::AbsoluteY => format!("{name} ${word:04X},Y"),
        Mode::Indirect => format!("{name} (${word:04X})"),
        Mode::IndexedIndirect => format!("{name} (${b1:02X},X)"),
        Mode::IndirectIndexed => format!("{name} (${b1:02X}),Y"),
        Mode::ZeroPageIndirect => format!("{name} (${b1:02X})"),
        Mode::AbsoluteIndexedIndirect => format!("{name} (${word:04X},X)"),
        Mode::Relative => {
            let target = addr.wrapping_add(2).wrapping_add(b1 as i8 as u16);
            format!("{name} ${target:04X}")
        }
        Mode::ZeroPageRelative => {
            let target = addr.wrapping_add(3).wrapping_add(b2 as i8 as u16);
            format!("{name} ${b1:02X},${target:04X}")
        }
    };
    (text, len)
}

fn mnemonic_name(mnemonic: Mnemonic) -> String {
    use Mnemonic::*;
    match mnemonic {
        Bbr(bit) => return format!("BBR{bit}"),
        Bbs(bit) => return format!("BBS{bit}"),
        Rmb(bit) => return format!("RMB{bit}"),
        Smb(bit) => return format!("SMB{bit}"),
        _ => {}
    }
    format!("{mnemonic:?}").to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::{Ram, Rom};

    fn bus_with(program: &[u8]) -> Bus {
        let mut rom = Rom::new();
        rom.load_bytes(program, 0x8000);
        Bus::new(Ram::new(), rom)
    }

    #[test]
    fn formats_common_shapes() {
        let bus = bus_with(&[0xA9, 0x42]);
        assert_eq!(disassemble(&bus, 0x8000), ("LDA #$42".into(), 2));

        let bus = bus_with(&[0x8D, 0x00, 0x60]);
        assert_eq!(disassemble(&bus, 0x8000), ("STA $6000".into(), 3));

        let bus = bus_with(&[0x6C, 0x34, 0x12]);
        assert_eq!(disassemble(&bus, 0x8000), ("JMP ($1234)".into(), 3));

        let bus = bus_with(&[0xDB]);
        assert_eq!(disassemble(&bus, 0x8000), ("STP".into(), 1));
    }

    #[test]
    fn relative_targets_are_absolute() {
        // BNE -2 from 0x8000 lands back on itself.
        let bus = bus_with(&[0xD0, 0xFE]);
        assert_eq!(disassemble(&bus, 0x8000), ("BNE $8000".into(), 2));
    }

    #[test]
    fn bit_branches_show_bit_and_target() {
        // BBS3 $22, +2 at 0x8000 -> target 0x8005
        let bus = bus_with(&[0xBF, 0x22, 0x02]);
        assert_eq!(disassemble(&bus, 0x8000), ("BBS3 $22,$8005".into(), 3));
    }
}
