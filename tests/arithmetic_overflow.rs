use mos6502_core::{MOS6502, RamBus16kb, StatusFlag};

/// `A=$50, ADC #$50` (binary): two positives summing into a negative-looking byte is a classic
/// signed overflow. `result=$A0, V=1, C=0, N=1`.
#[test]
fn adc_binary_overflow_without_carry() {
    let program = vec![
        0x18,       // CLC
        0xA9, 0x50, // LDA #$50
        0x69, 0x50, // ADC #$50
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // CLC
    cpu.step(&mut bus).unwrap(); // LDA #$50
    cpu.step(&mut bus).unwrap(); // ADC #$50

    assert_eq!(cpu.a, 0xA0);
    assert!(cpu.p.get(StatusFlag::Overflow));
    assert!(!cpu.p.get(StatusFlag::Carry));
    assert!(cpu.p.get(StatusFlag::Negative));
}

/// `A=$90, ADC #$90`: unsigned sum exceeds 255 (sets carry) and the signed sum overflows too.
/// `result=$20, V=1, C=1`.
#[test]
fn adc_binary_overflow_with_carry() {
    let program = vec![
        0x18,       // CLC
        0xA9, 0x90, // LDA #$90
        0x69, 0x90, // ADC #$90
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // CLC
    cpu.step(&mut bus).unwrap(); // LDA #$90
    cpu.step(&mut bus).unwrap(); // ADC #$90

    assert_eq!(cpu.a, 0x20);
    assert!(cpu.p.get(StatusFlag::Overflow));
    assert!(cpu.p.get(StatusFlag::Carry));
}

/// For all `a, b, c in {0,1}`: after setting `C=c`, `LDA #a`, `ADC #b`, the 9-bit result
/// (`A` plus `carry << 8`) equals `a + b + c`.
#[test]
fn adc_binary_carry_identity_holds_for_every_bit_combination() {
    for &a in &[0u8, 1u8] {
        for &b in &[0u8, 1u8] {
            for &c in &[0u8, 1u8] {
                let program = vec![
                    if c == 1 { 0x38 } else { 0x18 }, // SEC or CLC
                    0xA9, a,                          // LDA #a
                    0x69, b,                          // ADC #b
                ];
                let mut bus = RamBus16kb::new().with_program(program);
                let mut cpu = MOS6502::new();
                cpu.reset(&mut bus).expect("reset failed");
                cpu.step(&mut bus).unwrap();
                cpu.step(&mut bus).unwrap();
                cpu.step(&mut bus).unwrap();

                let carry_out = cpu.p.get(StatusFlag::Carry) as u16;
                let result = (cpu.a as u16) + (carry_out << 8);
                assert_eq!(result, a as u16 + b as u16 + c as u16, "a={a} b={b} c={c}");
            }
        }
    }
}
