//! End-to-end scenarios: real machine-code programs running on the full
//! machine, observed through the LED ports and the serial transport.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use breadbox::errors::Result;
use breadbox::machine::acia::SerialTransport;
use breadbox::machine::rom::Rom;
use breadbox::machine::system::System;

const RESET_VECTOR: u16 = 0xFFFC;
const IRQ_VECTOR: u16 = 0xFFFE;

/// Build a ROM from (address, bytes) chunks with the reset vector at
/// 0x8000, wire up a machine and run the power-on reset.
fn boot(chunks: &[(u16, &[u8])]) -> System {
    let mut rom = Rom::new();
    rom.load_bytes(&[0x00, 0x80], RESET_VECTOR);
    for &(addr, bytes) in chunks {
        rom.load_bytes(bytes, addr);
    }
    let mut system = System::new(rom);
    system.power_on().unwrap();
    system
}

fn run_steps(system: &mut System, steps: u32) {
    for _ in 0..steps {
        system.step().unwrap();
    }
}

/// In-memory serial transport: scripted input, captured output.
struct Loopback {
    input: Rc<RefCell<VecDeque<u8>>>,
    output: Rc<RefCell<Vec<u8>>>,
}

impl SerialTransport for Loopback {
    fn poll_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.input.borrow_mut().pop_front())
    }
    fn transmit(&mut self, byte: u8) -> Result<()> {
        self.output.borrow_mut().push(byte);
        Ok(())
    }
}

fn attach_loopback(system: &mut System) -> (Rc<RefCell<VecDeque<u8>>>, Rc<RefCell<Vec<u8>>>) {
    let input = Rc::new(RefCell::new(VecDeque::new()));
    let output = Rc::new(RefCell::new(Vec::new()));
    system.attach_acia(Box::new(Loopback {
        input: input.clone(),
        output: output.clone(),
    }));
    (input, output)
}

/// Port B values over time, deduplicated against the previous sample.
fn port_b_trace(system: &mut System, steps: u32) -> Vec<u8> {
    let via = system.via();
    let mut trace = vec![via.borrow().port_b_output()];
    for _ in 0..steps {
        system.step().unwrap();
        let value = via.borrow().port_b_output();
        if *trace.last().unwrap() != value {
            trace.push(value);
        }
    }
    trace
}

// ── Walking LED ───────────────────────────────────────────────

#[test]
fn walking_led_cycles_through_single_bits() {
    // 8000 LDA #$FF        A9 FF
    // 8002 STA $6002       8D 02 60      DDRB = all outputs
    // 8005 LDA #$01        A9 01
    // 8007 STA $6000       8D 00 60      <- loop
    // 800A ASL A           0A
    // 800B BNE $8007       D0 FA
    // 800D LDA #$01        A9 01
    // 800F JMP $8007       4C 07 80
    let mut system = boot(&[(
        0x8000,
        &[
            0xA9, 0xFF, 0x8D, 0x02, 0x60, 0xA9, 0x01, 0x8D, 0x00, 0x60, 0x0A, 0xD0, 0xFA, 0xA9,
            0x01, 0x4C, 0x07, 0x80,
        ],
    )]);

    let trace = port_b_trace(&mut system, 3_000);
    let changes: Vec<u8> = trace.into_iter().filter(|&v| v != 0).collect();

    assert!(changes.len() > 16, "LED never walked: {changes:02X?}");
    for window in changes.windows(2) {
        let (current, next) = (window[0], window[1]);
        assert!(current.is_power_of_two(), "not a single LED: {current:02X}");
        let expected = if current == 0x80 { 0x01 } else { current << 1 };
        assert_eq!(next, expected, "LED walked out of order");
    }
    // All eight positions show up.
    for bit in 0..8 {
        assert!(changes.contains(&(1 << bit)));
    }
}

#[test]
fn blink_rom_shows_a_single_lit_bit_after_64_cycles() {
    // The literal image from the board's demo set.
    let mut system = boot(&[(
        0x8000,
        &[
            0xA9, 0xFF, 0x8D, 0x02, 0x60, 0xA9, 0x01, 0x8D, 0x00, 0x60, 0x0A, 0xD0, 0xFB, 0xA9,
            0x01, 0x4C, 0x09, 0x80,
        ],
    )]);
    run_steps(&mut system, 64);
    let port_b = system.via().borrow().port_b_output();
    assert!(
        port_b.is_power_of_two(),
        "expected one lit LED, got {port_b:02X}"
    );
}

// ── Binary counter ────────────────────────────────────────────

#[test]
fn binary_counter_counts_modulo_256() {
    // 8000 LDA #$FF        A9 FF
    // 8002 STA $6002       8D 02 60
    // 8005 LDA #$00        A9 00
    // 8007 STA $6000       8D 00 60      <- loop
    // 800A CLC             18
    // 800B ADC #$01        69 01
    // 800D JMP $8007       4C 07 80
    let mut system = boot(&[(
        0x8000,
        &[
            0xA9, 0xFF, 0x8D, 0x02, 0x60, 0xA9, 0x00, 0x8D, 0x00, 0x60, 0x18, 0x69, 0x01, 0x4C,
            0x07, 0x80,
        ],
    )]);

    let trace = port_b_trace(&mut system, 8_000);
    // Starting from the initial 0, successive port values count up and
    // wrap at 256.
    assert!(trace.len() > 300, "counter never advanced");
    for (i, window) in trace.windows(2).enumerate() {
        assert_eq!(
            window[1],
            window[0].wrapping_add(1),
            "miscount at change {i}: {:02X?}",
            &window,
        );
    }
}

// ── Serial output ─────────────────────────────────────────────

#[test]
fn hello_world_over_the_acia() {
    // 8000 LDA #$00        A9 00
    // 8002 STA $5001       8D 01 50      programmed reset
    // 8005 LDA #$0B        A9 0B
    // 8007 STA $5002       8D 02 50      command: RX irq off, DTR
    // 800A LDA #$1F        A9 1F
    // 800C STA $5003       8D 03 50      control: 8N1, 19200 baud
    // 800F LDX #$00        A2 00
    // 8011 LDA $8030,X     BD 30 80      <- next char
    // 8014 BEQ $8025       F0 0F
    // 8016 PHA             48
    // 8017 LDA $5001       AD 01 50      <- poll TDRE
    // 801A AND #$10        29 10
    // 801C BEQ $8017       F0 F9
    // 801E PLA             68
    // 801F STA $5000       8D 00 50
    // 8022 INX             E8
    // 8023 BNE $8011       D0 EC
    // 8025 JMP $8025       4C 25 80      done: spin
    let program = [
        0xA9, 0x00, 0x8D, 0x01, 0x50, 0xA9, 0x0B, 0x8D, 0x02, 0x50, 0xA9, 0x1F, 0x8D, 0x03, 0x50,
        0xA2, 0x00, 0xBD, 0x30, 0x80, 0xF0, 0x0F, 0x48, 0xAD, 0x01, 0x50, 0x29, 0x10, 0xF0, 0xF9,
        0x68, 0x8D, 0x00, 0x50, 0xE8, 0xD0, 0xEC, 0x4C, 0x25, 0x80,
    ];
    let mut system = boot(&[(0x8000, &program), (0x8030, b"Hello, World!\r\n\0")]);
    let (_input, output) = attach_loopback(&mut system);

    run_steps(&mut system, 50_000);
    assert_eq!(&*output.borrow(), b"Hello, World!\r\n");
}

#[test]
fn echo_returns_received_bytes_in_order() {
    // 8000 LDA $5001       AD 01 50      <- poll RDRF
    // 8003 AND #$08        29 08
    // 8005 BEQ $8000       F0 F9
    // 8007 LDA $5000       AD 00 50
    // 800A STA $5000       8D 00 50
    // 800D JMP $8000       4C 00 80
    let program = [
        0xAD, 0x01, 0x50, 0x29, 0x08, 0xF0, 0xF9, 0xAD, 0x00, 0x50, 0x8D, 0x00, 0x50, 0x4C, 0x00,
        0x80,
    ];
    let mut system = boot(&[(0x8000, &program)]);
    let (input, output) = attach_loopback(&mut system);
    input.borrow_mut().extend(*b"abc");

    run_steps(&mut system, 10_000);
    assert_eq!(&*output.borrow(), b"abc");
}

// ── Interrupts ────────────────────────────────────────────────

#[test]
fn timer_irq_preserves_the_stack_and_fires_repeatedly() {
    // Main: LDA #$42; CLI; JMP self.
    // Handler: store A, count the entry, ack timer 1, RTI.
    //
    // 9000 STA $0200       8D 00 02
    // 9003 INC $0201       EE 01 02
    // 9006 PHA             48
    // 9007 LDA $6004       AD 04 60      T1C_L read acks IFR.T1
    // 900A PLA             68
    // 900B RTI             40
    let main = [0xA9, 0x42, 0x58, 0x4C, 0x03, 0x80];
    let handler = [
        0x8D, 0x00, 0x02, 0xEE, 0x01, 0x02, 0x48, 0xAD, 0x04, 0x60, 0x68, 0x40,
    ];
    let mut rom = Rom::new();
    rom.load_bytes(&main, 0x8000);
    rom.load_bytes(&handler, 0x9000);
    rom.load_bytes(&[0x00, 0x80], RESET_VECTOR);
    rom.load_bytes(&[0x00, 0x90], IRQ_VECTOR);
    let mut system = System::new(rom);
    system.power_on().unwrap();
    let idle_sp = system.cpu.sp;

    // Timer 1 free-running every 1000 cycles, interrupt enabled.
    system.bus.write(0x600B, 0x40).unwrap(); // ACR: T1 free-run
    system.bus.write(0x600E, 0xC0).unwrap(); // IER: set T1
    system.bus.write(0x6004, 0xE8).unwrap(); // latch = 1000
    system.bus.write(0x6005, 0x03).unwrap(); // start

    run_steps(&mut system, 20_000);

    assert_eq!(system.bus.read(0x0200).unwrap(), 0x42);
    let entries = system.bus.read(0x0201).unwrap();
    assert!(entries >= 2, "timer interrupt fired only {entries} times");

    // Park the CPU back in the main loop and check the stack came back.
    let mut parked = false;
    for _ in 0..2_000 {
        if system.cpu.at_instruction_boundary() && system.cpu.pc < 0x9000 {
            parked = true;
            break;
        }
        system.step().unwrap();
    }
    assert!(parked, "CPU never returned to the main loop");
    assert_eq!(system.cpu.sp, idle_sp);
}

#[test]
fn irq_line_held_high_delivers_exactly_one_interrupt() {
    // Handler counts entries into $0201 but never acks the timer, so the
    // VIA's line stays asserted; the CPU must take the IRQ only once.
    //
    // 9000 EE 01 02        INC $0201
    // 9003 40              RTI
    let main = [0x58, 0x4C, 0x01, 0x80]; // CLI; JMP self
    let handler = [0xEE, 0x01, 0x02, 0x40];
    let mut rom = Rom::new();
    rom.load_bytes(&main, 0x8000);
    rom.load_bytes(&handler, 0x9000);
    rom.load_bytes(&[0x00, 0x80], RESET_VECTOR);
    rom.load_bytes(&[0x00, 0x90], IRQ_VECTOR);
    let mut system = System::new(rom);
    system.power_on().unwrap();

    // One-shot timer this time: the flag stays set forever after expiry.
    system.bus.write(0x600E, 0xC0).unwrap();
    system.bus.write(0x6004, 0x64).unwrap(); // latch = 100
    system.bus.write(0x6005, 0x00).unwrap();

    run_steps(&mut system, 10_000);
    assert_eq!(system.bus.read(0x0201).unwrap(), 1);
}

// ── Decimal mode ──────────────────────────────────────────────

#[test]
fn bcd_increment_carries_between_digits() {
    // SED; LDA #$19; CLC; ADC #$01; STA $0200; STP
    let mut system = boot(&[(
        0x8000,
        &[0xF8, 0xA9, 0x19, 0x18, 0x69, 0x01, 0x8D, 0x00, 0x02, 0xDB],
    )]);
    for _ in 0..200 {
        if system.cpu.is_halted() {
            break;
        }
        system.step().unwrap();
    }
    assert!(system.cpu.is_halted());
    assert_eq!(system.bus.read(0x0200).unwrap(), 0x20);
}
