//! Instruction semantics.
//!
//! Handlers receive the resolved operand and leave the register file,
//! memory and flags in their documented post-state.  Cycle accounting
//! lives in the dispatch loop; nothing here touches `pending_cycles`.

use super::addressing::Operand;
use super::opcodes::Mnemonic;
use super::status::Status;
use super::Cpu;
use crate::errors::Result;
use crate::machine::bus::Bus;
use crate::machine::IRQ_VECTOR;

impl Cpu {
    pub(crate) fn execute(
        &mut self,
        bus: &mut Bus,
        mnemonic: Mnemonic,
        operand: Operand,
    ) -> Result<()> {
        use Mnemonic::*;

        match mnemonic {
            // ── Loads and stores ──────────────────────────────
            Lda => {
                self.a = self.load(bus, operand)?;
                self.status.set_zn(self.a);
            }
            Ldx => {
                self.x = self.load(bus, operand)?;
                self.status.set_zn(self.x);
            }
            Ldy => {
                self.y = self.load(bus, operand)?;
                self.status.set_zn(self.y);
            }
            Sta => self.store(bus, operand, self.a)?,
            Stx => self.store(bus, operand, self.x)?,
            Sty => self.store(bus, operand, self.y)?,
            Stz => self.store(bus, operand, 0)?,

            // ── Transfers ─────────────────────────────────────
            Tax => {
                self.x = self.a;
                self.status.set_zn(self.x);
            }
            Tay => {
                self.y = self.a;
                self.status.set_zn(self.y);
            }
            Txa => {
                self.a = self.x;
                self.status.set_zn(self.a);
            }
            Tya => {
                self.a = self.y;
                self.status.set_zn(self.a);
            }
            Tsx => {
                self.x = self.sp;
                self.status.set_zn(self.x);
            }
            // TXS is the one transfer that leaves the flags alone.
            Txs => self.sp = self.x,

            // ── Stack ─────────────────────────────────────────
            Pha => self.push(bus, self.a)?,
            Phx => self.push(bus, self.x)?,
            Phy => self.push(bus, self.y)?,
            Pla => {
                self.a = self.pull(bus)?;
                self.status.set_zn(self.a);
            }
            Plx => {
                self.x = self.pull(bus)?;
                self.status.set_zn(self.x);
            }
            Ply => {
                self.y = self.pull(bus)?;
                self.status.set_zn(self.y);
            }
            Php => {
                let mut pushed = self.status;
                pushed.insert(Status::B);
                pushed.insert(Status::U);
                self.push(bus, pushed.bits())?;
            }
            Plp => {
                let bits = self.pull(bus)?;
                self.status = loaded_status(bits);
            }

            // ── Arithmetic ────────────────────────────────────
            Adc => {
                let value = self.load(bus, operand)?;
                self.adc(value);
            }
            Sbc => {
                let value = self.load(bus, operand)?;
                self.sbc(value);
            }
            Cmp => {
                let value = self.load(bus, operand)?;
                self.compare(self.a, value);
            }
            Cpx => {
                let value = self.load(bus, operand)?;
                self.compare(self.x, value);
            }
            Cpy => {
                let value = self.load(bus, operand)?;
                self.compare(self.y, value);
            }

            // ── Bitwise ───────────────────────────────────────
            And => {
                self.a &= self.load(bus, operand)?;
                self.status.set_zn(self.a);
            }
            Ora => {
                self.a |= self.load(bus, operand)?;
                self.status.set_zn(self.a);
            }
            Eor => {
                self.a ^= self.load(bus, operand)?;
                self.status.set_zn(self.a);
            }
            Bit => {
                let value = self.load(bus, operand)?;
                self.status.set(Status::Z, self.a & value == 0);
                self.status.set(Status::N, value & 0x80 != 0);
                self.status.set(Status::V, value & 0x40 != 0);
            }
            Trb => {
                let addr = self.address(operand);
                let value = bus.read(addr)?;
                self.status.set(Status::Z, self.a & value == 0);
                bus.write(addr, value & !self.a)?;
            }
            Tsb => {
                let addr = self.address(operand);
                let value = bus.read(addr)?;
                self.status.set(Status::Z, self.a & value == 0);
                bus.write(addr, value | self.a)?;
            }

            // ── Shifts and rotates ────────────────────────────
            Asl => {
                let value = self.load(bus, operand)?;
                self.status.set(Status::C, value & 0x80 != 0);
                let result = value << 1;
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }
            Lsr => {
                let value = self.load(bus, operand)?;
                self.status.set(Status::C, value & 0x01 != 0);
                let result = value >> 1;
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }
            Rol => {
                let value = self.load(bus, operand)?;
                let carry_in = self.status.contains(Status::C) as u8;
                self.status.set(Status::C, value & 0x80 != 0);
                let result = value << 1 | carry_in;
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }
            Ror => {
                let value = self.load(bus, operand)?;
                let carry_in = self.status.contains(Status::C) as u8;
                self.status.set(Status::C, value & 0x01 != 0);
                let result = value >> 1 | carry_in << 7;
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }

            // ── Increments and decrements ─────────────────────
            Inc => {
                let result = self.load(bus, operand)?.wrapping_add(1);
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }
            Dec => {
                let result = self.load(bus, operand)?.wrapping_sub(1);
                self.status.set_zn(result);
                self.store(bus, operand, result)?;
            }
            Inx => {
                self.x = self.x.wrapping_add(1);
                self.status.set_zn(self.x);
            }
            Dex => {
                self.x = self.x.wrapping_sub(1);
                self.status.set_zn(self.x);
            }
            Iny => {
                self.y = self.y.wrapping_add(1);
                self.status.set_zn(self.y);
            }
            Dey => {
                self.y = self.y.wrapping_sub(1);
                self.status.set_zn(self.y);
            }

            // ── Flag operations ───────────────────────────────
            Clc => self.status.remove(Status::C),
            Sec => self.status.insert(Status::C),
            Cli => self.status.remove(Status::I),
            Sei => self.status.insert(Status::I),
            Cld => self.status.remove(Status::D),
            Sed => self.status.insert(Status::D),
            Clv => self.status.remove(Status::V),

            // ── Control flow ──────────────────────────────────
            Jmp => self.pc = self.address(operand),
            Jsr => {
                let target = self.address(operand);
                self.push_word(bus, self.pc.wrapping_sub(1))?;
                self.pc = target;
            }
            Rts => {
                self.pc = self.pull_word(bus)?.wrapping_add(1);
            }
            Rti => {
                let bits = self.pull(bus)?;
                self.status = loaded_status(bits);
                self.pc = self.pull_word(bus)?;
            }
            Brk => {
                // Skip the signature byte, then run the IRQ sequence with
                // B set in the pushed copy.
                self.pc = self.pc.wrapping_add(1);
                self.push_word(bus, self.pc)?;
                let mut pushed = self.status;
                pushed.insert(Status::B);
                pushed.insert(Status::U);
                self.push(bus, pushed.bits())?;
                self.status.insert(Status::I);
                self.pc = bus.read_word(IRQ_VECTOR)?;
            }

            // ── Branches ──────────────────────────────────────
            Bcc => self.branch(operand, !self.status.contains(Status::C)),
            Bcs => self.branch(operand, self.status.contains(Status::C)),
            Bne => self.branch(operand, !self.status.contains(Status::Z)),
            Beq => self.branch(operand, self.status.contains(Status::Z)),
            Bpl => self.branch(operand, !self.status.contains(Status::N)),
            Bmi => self.branch(operand, self.status.contains(Status::N)),
            Bvc => self.branch(operand, !self.status.contains(Status::V)),
            Bvs => self.branch(operand, self.status.contains(Status::V)),
            Bra => self.branch(operand, true),

            // ── Zero-page bit instructions ────────────────────
            Rmb(bit) => {
                let addr = self.address(operand);
                let value = bus.read(addr)?;
                bus.write(addr, value & !(1 << bit))?;
            }
            Smb(bit) => {
                let addr = self.address(operand);
                let value = bus.read(addr)?;
                bus.write(addr, value | 1 << bit)?;
            }
            Bbr(bit) => {
                if let Operand::BitBranch { addr, target } = operand {
                    if bus.read(addr)? & (1 << bit) == 0 {
                        self.pc = target;
                    }
                }
            }
            Bbs(bit) => {
                if let Operand::BitBranch { addr, target } = operand {
                    if bus.read(addr)? & (1 << bit) != 0 {
                        self.pc = target;
                    }
                }
            }

            // ── Waiting, stopping, nothing ────────────────────
            Wai => self.waiting = true,
            Stp => self.halted = true,
            Nop => {}
        }
        Ok(())
    }

    // ── Operand plumbing ──────────────────────────────────────

    fn load(&mut self, bus: &mut Bus, operand: Operand) -> Result<u8> {
        match operand {
            Operand::Accumulator => Ok(self.a),
            Operand::Address(addr) => bus.read(addr),
            Operand::None | Operand::BitBranch { .. } => {
                unreachable!("operand-less instruction asked for a load")
            }
        }
    }

    fn store(&mut self, bus: &mut Bus, operand: Operand, value: u8) -> Result<()> {
        match operand {
            Operand::Accumulator => {
                self.a = value;
                Ok(())
            }
            Operand::Address(addr) => bus.write(addr, value),
            Operand::None | Operand::BitBranch { .. } => {
                unreachable!("operand-less instruction asked for a store")
            }
        }
    }

    fn address(&self, operand: Operand) -> u16 {
        match operand {
            Operand::Address(addr) => addr,
            _ => unreachable!("instruction requires a memory operand"),
        }
    }

    fn branch(&mut self, operand: Operand, taken: bool) {
        if taken {
            self.pc = self.address(operand);
        }
    }

    // ── Arithmetic helpers ────────────────────────────────────

    fn adc(&mut self, value: u8) {
        let carry = self.status.contains(Status::C) as u16;
        let sum = self.a as u16 + value as u16 + carry;
        let binary = sum as u8;
        self.status
            .set(Status::V, (self.a ^ binary) & (value ^ binary) & 0x80 != 0);

        let result = if self.status.contains(Status::D) {
            // BCD correction on top of the binary add.
            let mut lo = (self.a & 0x0F) as u16 + (value & 0x0F) as u16 + carry;
            let mut hi = (self.a >> 4) as u16 + (value >> 4) as u16;
            if lo > 9 {
                lo += 6;
                hi += 1;
            }
            if hi > 9 {
                hi += 6;
            }
            self.status.set(Status::C, hi > 0x0F);
            (hi << 4 | lo & 0x0F) as u8
        } else {
            self.status.set(Status::C, sum > 0xFF);
            binary
        };

        self.a = result;
        self.status.set_zn(result);
    }

    fn sbc(&mut self, value: u8) {
        let borrow = !self.status.contains(Status::C) as i16;
        let diff = self.a as i16 - value as i16 - borrow;
        let binary = diff as u8;
        self.status
            .set(Status::V, (self.a ^ value) & (self.a ^ binary) & 0x80 != 0);
        self.status.set(Status::C, diff >= 0);

        let result = if self.status.contains(Status::D) {
            let mut lo = (self.a & 0x0F) as i16 - (value & 0x0F) as i16 - borrow;
            let mut hi = (self.a >> 4) as i16 - (value >> 4) as i16;
            if lo < 0 {
                lo -= 6;
                hi -= 1;
            }
            if hi < 0 {
                hi -= 6;
            }
            ((hi as u16) << 4 | (lo as u16) & 0x0F) as u8
        } else {
            binary
        };

        self.a = result;
        self.status.set_zn(result);
    }

    fn compare(&mut self, register: u8, value: u8) {
        let diff = register as i16 - value as i16;
        self.status.set(Status::C, diff >= 0);
        self.status.set_zn(diff as u8);
    }
}

/// Status value as restored by PLP/RTI: B is storage-less and reads back
/// clear, U always reads back set.
fn loaded_status(bits: u8) -> Status {
    let mut status = Status::from_bits_retain(bits);
    status.remove(Status::B);
    status.insert(Status::U);
    status
}
