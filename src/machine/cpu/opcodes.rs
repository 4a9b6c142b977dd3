//! The 65C02 dispatch table: one entry per opcode byte.
//!
//! Every slot is populated.  Bytes the data sheet leaves unassigned decode
//! as NOPs with the operand width and cycle count the CMOS part actually
//! exhibits, so the program counter always advances correctly.

/// Addressing modes of the W65C02S, including the CMOS additions
/// (`(zp)`, `(abs,x)` and the `zp,rel` pair used by BBR/BBS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// `(abs)` — JMP only.
    Indirect,
    /// `(zp,x)`
    IndexedIndirect,
    /// `(zp),y`
    IndirectIndexed,
    /// `(zp)`
    ZeroPageIndirect,
    /// `(abs,x)` — JMP only.
    AbsoluteIndexedIndirect,
    Relative,
    /// `zp, rel` — BBR/BBS carry both a zero-page address and an offset.
    ZeroPageRelative,
}

impl Mode {
    /// Operand bytes following the opcode.
    pub fn operand_len(self) -> u16 {
        match self {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::IndexedIndirect
            | Mode::IndirectIndexed
            | Mode::ZeroPageIndirect
            | Mode::Relative => 1,
            Mode::Absolute
            | Mode::AbsoluteX
            | Mode::AbsoluteY
            | Mode::Indirect
            | Mode::AbsoluteIndexedIndirect
            | Mode::ZeroPageRelative => 2,
        }
    }
}

/// Instruction mnemonics.  The bit-oriented CMOS instructions carry their
/// bit index so sixteen opcodes collapse into four variants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mnemonic {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Bra, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Phx, Phy, Pla, Plp,
    Plx, Ply, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stp, Stx, Sty,
    Stz, Tax, Tay, Trb, Tsb, Tsx, Txa, Txs, Tya, Wai,
    Bbr(u8), Bbs(u8), Rmb(u8), Smb(u8),
}

#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    pub mnemonic: Mnemonic,
    pub mode: Mode,
    /// Declared base cycle count.  Page-crossing and branch-taken
    /// penalties are not modeled.
    pub cycles: u8,
}

const fn op(mnemonic: Mnemonic, mode: Mode, cycles: u8) -> Opcode {
    Opcode {
        mnemonic,
        mode,
        cycles,
    }
}

use Mnemonic::*;
use Mode::*;

#[rustfmt::skip]
pub static OPCODES: [Opcode; 256] = [
    // 0x00
    op(Brk, Implied, 7),          op(Ora, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Tsb, ZeroPage, 5),         op(Ora, ZeroPage, 3),         op(Asl, ZeroPage, 5),         op(Rmb(0), ZeroPage, 5),
    op(Php, Implied, 3),          op(Ora, Immediate, 2),        op(Asl, Accumulator, 2),      op(Nop, Implied, 1),
    op(Tsb, Absolute, 6),         op(Ora, Absolute, 4),         op(Asl, Absolute, 6),         op(Bbr(0), ZeroPageRelative, 5),
    // 0x10
    op(Bpl, Relative, 2),         op(Ora, IndirectIndexed, 5),  op(Ora, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Trb, ZeroPage, 5),         op(Ora, ZeroPageX, 4),        op(Asl, ZeroPageX, 6),        op(Rmb(1), ZeroPage, 5),
    op(Clc, Implied, 2),          op(Ora, AbsoluteY, 4),        op(Inc, Accumulator, 2),      op(Nop, Implied, 1),
    op(Trb, Absolute, 6),         op(Ora, AbsoluteX, 4),        op(Asl, AbsoluteX, 6),        op(Bbr(1), ZeroPageRelative, 5),
    // 0x20
    op(Jsr, Absolute, 6),         op(And, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Bit, ZeroPage, 3),         op(And, ZeroPage, 3),         op(Rol, ZeroPage, 5),         op(Rmb(2), ZeroPage, 5),
    op(Plp, Implied, 4),          op(And, Immediate, 2),        op(Rol, Accumulator, 2),      op(Nop, Implied, 1),
    op(Bit, Absolute, 4),         op(And, Absolute, 4),         op(Rol, Absolute, 6),         op(Bbr(2), ZeroPageRelative, 5),
    // 0x30
    op(Bmi, Relative, 2),         op(And, IndirectIndexed, 5),  op(And, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Bit, ZeroPageX, 4),        op(And, ZeroPageX, 4),        op(Rol, ZeroPageX, 6),        op(Rmb(3), ZeroPage, 5),
    op(Sec, Implied, 2),          op(And, AbsoluteY, 4),        op(Dec, Accumulator, 2),      op(Nop, Implied, 1),
    op(Bit, AbsoluteX, 4),        op(And, AbsoluteX, 4),        op(Rol, AbsoluteX, 6),        op(Bbr(3), ZeroPageRelative, 5),
    // 0x40
    op(Rti, Implied, 6),          op(Eor, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Nop, ZeroPage, 3),         op(Eor, ZeroPage, 3),         op(Lsr, ZeroPage, 5),         op(Rmb(4), ZeroPage, 5),
    op(Pha, Implied, 3),          op(Eor, Immediate, 2),        op(Lsr, Accumulator, 2),      op(Nop, Implied, 1),
    op(Jmp, Absolute, 3),         op(Eor, Absolute, 4),         op(Lsr, Absolute, 6),         op(Bbr(4), ZeroPageRelative, 5),
    // 0x50
    op(Bvc, Relative, 2),         op(Eor, IndirectIndexed, 5),  op(Eor, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Nop, ZeroPageX, 4),        op(Eor, ZeroPageX, 4),        op(Lsr, ZeroPageX, 6),        op(Rmb(5), ZeroPage, 5),
    op(Cli, Implied, 2),          op(Eor, AbsoluteY, 4),        op(Phy, Implied, 3),          op(Nop, Implied, 1),
    op(Nop, Absolute, 8),         op(Eor, AbsoluteX, 4),        op(Lsr, AbsoluteX, 6),        op(Bbr(5), ZeroPageRelative, 5),
    // 0x60
    op(Rts, Implied, 6),          op(Adc, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Stz, ZeroPage, 3),         op(Adc, ZeroPage, 3),         op(Ror, ZeroPage, 5),         op(Rmb(6), ZeroPage, 5),
    op(Pla, Implied, 4),          op(Adc, Immediate, 2),        op(Ror, Accumulator, 2),      op(Nop, Implied, 1),
    op(Jmp, Indirect, 6),         op(Adc, Absolute, 4),         op(Ror, Absolute, 6),         op(Bbr(6), ZeroPageRelative, 5),
    // 0x70
    op(Bvs, Relative, 2),         op(Adc, IndirectIndexed, 5),  op(Adc, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Stz, ZeroPageX, 4),        op(Adc, ZeroPageX, 4),        op(Ror, ZeroPageX, 6),        op(Rmb(7), ZeroPage, 5),
    op(Sei, Implied, 2),          op(Adc, AbsoluteY, 4),        op(Ply, Implied, 4),          op(Nop, Implied, 1),
    op(Jmp, AbsoluteIndexedIndirect, 6), op(Adc, AbsoluteX, 4), op(Ror, AbsoluteX, 6),        op(Bbr(7), ZeroPageRelative, 5),
    // 0x80
    op(Bra, Relative, 3),         op(Sta, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Sty, ZeroPage, 3),         op(Sta, ZeroPage, 3),         op(Stx, ZeroPage, 3),         op(Smb(0), ZeroPage, 5),
    op(Dey, Implied, 2),          op(Bit, Immediate, 2),        op(Txa, Implied, 2),          op(Nop, Implied, 1),
    op(Sty, Absolute, 4),         op(Sta, Absolute, 4),         op(Stx, Absolute, 4),         op(Bbs(0), ZeroPageRelative, 5),
    // 0x90
    op(Bcc, Relative, 2),         op(Sta, IndirectIndexed, 6),  op(Sta, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Sty, ZeroPageX, 4),        op(Sta, ZeroPageX, 4),        op(Stx, ZeroPageY, 4),        op(Smb(1), ZeroPage, 5),
    op(Tya, Implied, 2),          op(Sta, AbsoluteY, 5),        op(Txs, Implied, 2),          op(Nop, Implied, 1),
    op(Stz, Absolute, 4),         op(Sta, AbsoluteX, 5),        op(Stz, AbsoluteX, 5),        op(Bbs(1), ZeroPageRelative, 5),
    // 0xA0
    op(Ldy, Immediate, 2),        op(Lda, IndexedIndirect, 6),  op(Ldx, Immediate, 2),        op(Nop, Implied, 1),
    op(Ldy, ZeroPage, 3),         op(Lda, ZeroPage, 3),         op(Ldx, ZeroPage, 3),         op(Smb(2), ZeroPage, 5),
    op(Tay, Implied, 2),          op(Lda, Immediate, 2),        op(Tax, Implied, 2),          op(Nop, Implied, 1),
    op(Ldy, Absolute, 4),         op(Lda, Absolute, 4),         op(Ldx, Absolute, 4),         op(Bbs(2), ZeroPageRelative, 5),
    // 0xB0
    op(Bcs, Relative, 2),         op(Lda, IndirectIndexed, 5),  op(Lda, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Ldy, ZeroPageX, 4),        op(Lda, ZeroPageX, 4),        op(Ldx, ZeroPageY, 4),        op(Smb(3), ZeroPage, 5),
    op(Clv, Implied, 2),          op(Lda, AbsoluteY, 4),        op(Tsx, Implied, 2),          op(Nop, Implied, 1),
    op(Ldy, AbsoluteX, 4),        op(Lda, AbsoluteX, 4),        op(Ldx, AbsoluteY, 4),        op(Bbs(3), ZeroPageRelative, 5),
    // 0xC0
    op(Cpy, Immediate, 2),        op(Cmp, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Cpy, ZeroPage, 3),         op(Cmp, ZeroPage, 3),         op(Dec, ZeroPage, 5),         op(Smb(4), ZeroPage, 5),
    op(Iny, Implied, 2),          op(Cmp, Immediate, 2),        op(Dex, Implied, 2),          op(Wai, Implied, 3),
    op(Cpy, Absolute, 4),         op(Cmp, Absolute, 4),         op(Dec, Absolute, 6),         op(Bbs(4), ZeroPageRelative, 5),
    // 0xD0
    op(Bne, Relative, 2),         op(Cmp, IndirectIndexed, 5),  op(Cmp, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Nop, ZeroPageX, 4),        op(Cmp, ZeroPageX, 4),        op(Dec, ZeroPageX, 6),        op(Smb(5), ZeroPage, 5),
    op(Cld, Implied, 2),          op(Cmp, AbsoluteY, 4),        op(Phx, Implied, 3),          op(Stp, Implied, 3),
    op(Nop, Absolute, 4),         op(Cmp, AbsoluteX, 4),        op(Dec, AbsoluteX, 7),        op(Bbs(5), ZeroPageRelative, 5),
    // 0xE0
    op(Cpx, Immediate, 2),        op(Sbc, IndexedIndirect, 6),  op(Nop, Immediate, 2),        op(Nop, Implied, 1),
    op(Cpx, ZeroPage, 3),         op(Sbc, ZeroPage, 3),         op(Inc, ZeroPage, 5),         op(Smb(6), ZeroPage, 5),
    op(Inx, Implied, 2),          op(Sbc, Immediate, 2),        op(Nop, Implied, 2),          op(Nop, Implied, 1),
    op(Cpx, Absolute, 4),         op(Sbc, Absolute, 4),         op(Inc, Absolute, 6),         op(Bbs(6), ZeroPageRelative, 5),
    // 0xF0
    op(Beq, Relative, 2),         op(Sbc, IndirectIndexed, 5),  op(Sbc, ZeroPageIndirect, 5), op(Nop, Implied, 1),
    op(Nop, ZeroPageX, 4),        op(Sbc, ZeroPageX, 4),        op(Inc, ZeroPageX, 6),        op(Smb(7), ZeroPage, 5),
    op(Sed, Implied, 2),          op(Sbc, AbsoluteY, 4),        op(Plx, Implied, 4),          op(Nop, Implied, 1),
    op(Nop, Absolute, 4),         op(Sbc, AbsoluteX, 4),        op(Inc, AbsoluteX, 7),        op(Bbs(7), ZeroPageRelative, 5),
];
