use mos6502_core::{MOS6502, RamBus16kb, StatusFlag};

/// `BRK` pushes `PC+2`, pushes `P` with `B=1`, sets `I`, and jumps via `$FFFE/F`. `RTI` then
/// pulls `P` (discarding B/unused) and the full return address, without the `RTS` `+1` fixup.
#[test]
fn brk_then_rti_restores_pc_and_flags() {
    let main_program = vec![
        0xA9, 0x11, // 0x1000: LDA #$11
        0x00,       // 0x1002: BRK
        0x00,       // 0x1003: padding byte BRK skips over, never executed
        0xA9, 0x33, // 0x1004: LDA #$33 (RTI should land here)
    ];
    let handler = vec![
        0xA9, 0x99, // 0x2000: LDA #$99 (proves the handler ran)
        0x40,       // 0x2002: RTI
    ];

    let mut bus = RamBus16kb::new()
        .with_memory_at(0x1000, main_program)
        .with_memory_at(0x2000, handler);
    bus.write_u16(0xFFFC, 0x1000).unwrap();
    bus.write_u16(0xFFFE, 0x2000).unwrap();

    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");

    cpu.step(&mut bus).unwrap(); // LDA #$11
    assert_eq!(cpu.a, 0x11);

    cpu.step(&mut bus).unwrap(); // BRK
    assert_eq!(cpu.pc, 0x2000);
    assert!(cpu.p.get(StatusFlag::InterruptDisable));

    cpu.step(&mut bus).unwrap(); // LDA #$99 (inside handler)
    assert_eq!(cpu.a, 0x99);

    cpu.step(&mut bus).unwrap(); // RTI
    assert_eq!(cpu.pc, 0x1004, "RTI restores PC+2 from BRK with no further +1 fixup");

    cpu.step(&mut bus).unwrap(); // LDA #$33
    assert_eq!(cpu.a, 0x33);
}

/// `nmi()`/`irq()` latch requests sampled between instructions. NMI has priority over IRQ when
/// both are pending.
#[test]
fn nmi_takes_priority_over_pending_irq() {
    let main_program = vec![
        0x58,       // 0x1000: CLI (unmask IRQ)
        0xEA,       // 0x1001: NOP
    ];
    let nmi_handler = vec![0xA9, 0x4E]; // 0x3000: LDA #'N'
    let irq_handler = vec![0xA9, 0x49]; // 0x4000: LDA #'I'

    let mut bus = RamBus16kb::new()
        .with_memory_at(0x1000, main_program)
        .with_memory_at(0x3000, nmi_handler)
        .with_memory_at(0x4000, irq_handler);
    bus.write_u16(0xFFFC, 0x1000).unwrap();
    bus.write_u16(0xFFFA, 0x3000).unwrap();
    bus.write_u16(0xFFFE, 0x4000).unwrap();

    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // CLI

    cpu.nmi = true;
    cpu.irq = true;
    // A single `step()` samples the interrupt lines between instructions and then executes the
    // handler's first instruction, so this also runs `LDA #$4E` at the NMI vector.
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0x4E, "NMI should have been serviced ahead of the pending IRQ");
    assert_eq!(cpu.pc, 0x3002);
}
