use mos6502_core::{MOS6502, RamBus16kb, StatusFlag};

/// `CMP`/`CPX`/`CPY` behave like a subtraction that never writes back: `C` is set when the
/// register is `>=` the operand, `Z` when they're equal, `N` from bit 7 of the difference, and
/// the register itself is left untouched.
#[test]
fn cmp_sets_flags_without_touching_the_accumulator() {
    let program = vec![
        0xA9, 0x40, // LDA #$40
        0xC9, 0x40, // CMP #$40  -> equal: C=1, Z=1, N=0
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // LDA #$40
    cpu.step(&mut bus).unwrap(); // CMP #$40

    assert_eq!(cpu.a, 0x40, "CMP must not modify A");
    assert!(cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Zero));
    assert!(!cpu.p.get(StatusFlag::Negative));
}

#[test]
fn cmp_clears_carry_when_the_accumulator_is_smaller() {
    let program = vec![
        0xA9, 0x10, // LDA #$10
        0xC9, 0x20, // CMP #$20  -> A < operand: C=0, result=$F0 so N=1
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0x10);
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(!cpu.p.get(StatusFlag::Zero));
    assert!(cpu.p.get(StatusFlag::Negative));
}

#[test]
fn cpx_and_cpy_compare_their_own_registers() {
    let program = vec![
        0xA2, 0x05, // LDX #$05
        0xA0, 0x05, // LDY #$05
        0xE0, 0x05, // CPX #$05 -> C=1, Z=1
        0xC0, 0x06, // CPY #$06 -> C=0, Z=0, N from $05-$06=$FF
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // LDX
    cpu.step(&mut bus).unwrap(); // LDY
    cpu.step(&mut bus).unwrap(); // CPX #$05
    assert!(cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Zero));

    cpu.step(&mut bus).unwrap(); // CPY #$06
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(!cpu.p.get(StatusFlag::Zero));
    assert!(cpu.p.get(StatusFlag::Negative));
    assert_eq!(cpu.x, 0x05, "CPX must not modify X");
    assert_eq!(cpu.y, 0x05, "CPY must not modify Y");
}

/// `ASL A` shifts the top bit into `Carry` and zero-fills from the bottom.
#[test]
fn asl_accumulator_shifts_top_bit_into_carry() {
    let program = vec![
        0xA9, 0xC1, // LDA #$C1 (0b1100_0001)
        0x0A,       // ASL A -> $82, C=1
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap();
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.a, 0x82);
    assert!(cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Negative));
}

/// `LSR` on a memory operand shifts the bottom bit into `Carry` and clears `N` unconditionally
/// since the result's top bit is always zero-filled.
#[test]
fn lsr_memory_operand_shifts_bottom_bit_into_carry() {
    let program = vec![
        0x46, 0x10, // LSR $10
    ];
    let mut bus = RamBus16kb::new()
        .with_program(program)
        .with_memory_at(0x10, vec![0x03]);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap();

    assert_eq!(bus.memory[0x10], 0x01);
    assert!(cpu.p.get(StatusFlag::Carry));
    assert!(!cpu.p.get(StatusFlag::Negative));
}

/// `ROL A` folds the existing `Carry` into bit 0 and sets `Carry` from the old bit 7.
#[test]
fn rol_accumulator_folds_carry_in_and_out() {
    let program = vec![
        0x38,       // SEC (carry in = 1)
        0xA9, 0x40, // LDA #$40 (0b0100_0000)
        0x2A,       // ROL A -> $81, carry out = 0
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // SEC
    cpu.step(&mut bus).unwrap(); // LDA #$40
    cpu.step(&mut bus).unwrap(); // ROL A

    assert_eq!(cpu.a, 0x81);
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Negative));
}

/// `ROR A` folds `Carry` into bit 7 and sets `Carry` from the old bit 0.
#[test]
fn ror_accumulator_folds_carry_in_and_out() {
    let program = vec![
        0x38,       // SEC (carry in = 1)
        0xA9, 0x02, // LDA #$02
        0x6A,       // ROR A -> $81 (carry folded into bit 7), carry out = 0
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // SEC
    cpu.step(&mut bus).unwrap(); // LDA #$02
    cpu.step(&mut bus).unwrap(); // ROR A

    assert_eq!(cpu.a, 0x81);
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Negative));
}
