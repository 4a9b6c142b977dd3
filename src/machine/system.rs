//! Top-level wiring of the breadboard machine.
//!
//! Owns the CPU and the bus; the VIA (and, for the console build, the
//! ACIA) are shared handles so that front ends can look at the output
//! latches while the devices stay mounted on the bus.

use std::cell::RefCell;
use std::rc::Rc;

use super::acia::{Acia, SerialTransport};
use super::bus::Bus;
use super::cpu::Cpu;
use super::ram::Ram;
use super::rom::Rom;
use super::via::Via;
use super::{ACIA_END, ACIA_START, VIA_END, VIA_START};
use crate::errors::Result;

pub struct System {
    pub cpu: Cpu,
    pub bus: Bus,
    via: Rc<RefCell<Via>>,
    acia: Option<Rc<RefCell<Acia>>>,
}

impl System {
    /// Build the base machine: RAM, the given ROM image, and the VIA.
    pub fn new(rom: Rom) -> Self {
        let mut bus = Bus::new(Ram::new(), rom);
        let via = Rc::new(RefCell::new(Via::new()));
        bus.attach(VIA_START, VIA_END, via.clone());
        Self {
            cpu: Cpu::new(),
            bus,
            via,
            acia: None,
        }
    }

    /// Mount the serial device in front of the given host transport.
    pub fn attach_acia(&mut self, transport: Box<dyn SerialTransport>) -> Rc<RefCell<Acia>> {
        let acia = Rc::new(RefCell::new(Acia::new(transport)));
        self.bus.attach(ACIA_START, ACIA_END, acia.clone());
        self.acia = Some(acia.clone());
        acia
    }

    /// Power-on reset through the vector at 0xFFFC.  Synchronous: the
    /// machine is ready to fetch its first instruction afterwards.
    pub fn power_on(&mut self) -> Result<()> {
        self.cpu.reset(&mut self.bus)
    }

    /// One CPU cycle plus the bus tick that follows it.
    pub fn step(&mut self) -> Result<()> {
        self.cpu.step(&mut self.bus)
    }

    pub fn via(&self) -> Rc<RefCell<Via>> {
        self.via.clone()
    }

    pub fn acia(&self) -> Option<Rc<RefCell<Acia>>> {
        self.acia.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::machine::RESET_VECTOR;

    #[test]
    fn boots_through_the_reset_vector() {
        let mut rom = Rom::new();
        rom.load_bytes(&[0xEA], 0x8000);
        rom.load_bytes(&[0x00, 0x80], RESET_VECTOR);
        let mut system = System::new(rom);
        system.power_on().unwrap();
        assert_eq!(system.cpu.pc, 0x8000);
        system.step().unwrap();
        assert_eq!(system.cpu.pc, 0x8001);
    }

    #[test]
    fn via_is_reachable_through_the_bus_and_the_handle() {
        let mut system = System::new(Rom::new());
        system.bus.write(0x6002, 0xFF).unwrap(); // DDRB
        system.bus.write(0x6000, 0x55).unwrap(); // ORB
        assert_eq!(system.via().borrow().port_b_output(), 0x55);
    }

    #[test]
    fn auto_tick_toggle_freezes_peripherals() {
        let mut rom = Rom::new();
        rom.load_bytes(&[0xEA; 32], 0x8000);
        rom.load_bytes(&[0x00, 0x80], RESET_VECTOR);
        let mut system = System::new(rom);
        system.power_on().unwrap();

        // Timer 2 armed with 10 cycles.
        system.bus.write(0x6008, 10).unwrap();
        system.bus.write(0x6009, 0).unwrap();

        system.cpu.set_auto_tick(false);
        for _ in 0..20 {
            system.step().unwrap();
        }
        assert_eq!(system.bus.read(0x6008).unwrap(), 10);

        system.cpu.set_auto_tick(true);
        for _ in 0..4 {
            system.step().unwrap();
        }
        assert_eq!(system.bus.read(0x6008).unwrap(), 6);
    }
}
