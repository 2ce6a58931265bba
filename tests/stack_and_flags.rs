use mos6502_core::{MOS6502, RamBus16kb, StatusFlag};

/// `LDA #$CF; PHA; PLP; PHP`: the byte `PHP` pushes equals `$CF | $30` (`B` and the unused bit
/// forced to 1 on push), even though neither bit is ever live in `P`.
#[test]
fn php_forces_break_and_unused_bits_on_push() {
    let program = vec![
        0xA9, 0xCF, // LDA #$CF
        0x48,       // PHA
        0x28,       // PLP
        0x08,       // PHP
    ];
    let mut bus = RamBus16kb::new().with_program(program);
    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");

    cpu.step(&mut bus).unwrap(); // LDA #$CF
    cpu.step(&mut bus).unwrap(); // PHA
    cpu.step(&mut bus).unwrap(); // PLP
    cpu.step(&mut bus).unwrap(); // PHP

    let pushed_address = 0x0100 | (cpu.sp.wrapping_add(1) as u16);
    assert_eq!(bus.memory[pushed_address as usize], 0xFF, "$CF | $30 == $FF");

    // The live flags reflect $CF (N,V,D,I,Z,C all set) with B=0, Unused=1.
    assert!(cpu.p.get(StatusFlag::Negative));
    assert!(cpu.p.get(StatusFlag::Overflow));
    assert!(cpu.p.get(StatusFlag::DecimalMode));
    assert!(cpu.p.get(StatusFlag::InterruptDisable));
    assert!(cpu.p.get(StatusFlag::Zero));
    assert!(cpu.p.get(StatusFlag::Carry));
    assert!(!cpu.p.get(StatusFlag::Break), "B is never live, only present in transit");
    assert!(cpu.p.get(StatusFlag::Unused));
}

/// `PHP` immediately followed by `PLP` must restore the original live flags, for any starting
/// flag byte (modulo the B/unused bits, which don't round-trip since they only exist on push).
#[test]
fn php_plp_round_trips_live_flags() {
    for flags in [0x00u8, 0x01, 0x42, 0x7F, 0xD5, 0xFF] {
        // Seed a known live P by pushing `flags` via A and pulling it into P with PLP, then
        // run PHP;PLP and check P is unchanged.
        let program = vec![
            0xA9, flags, // LDA #flags
            0x48,        // PHA
            0x28,        // PLP   (P now derived from `flags`, with B=0/Unused=1 forced)
            0x08,        // PHP
            0x28,        // PLP
        ];
        let mut bus = RamBus16kb::new().with_program(program);
        let mut cpu = MOS6502::new();
        cpu.reset(&mut bus).expect("reset failed");

        cpu.step(&mut bus).unwrap(); // LDA #flags
        cpu.step(&mut bus).unwrap(); // PHA
        cpu.step(&mut bus).unwrap(); // PLP

        let live_before = cpu.p.0;

        cpu.step(&mut bus).unwrap(); // PHP
        cpu.step(&mut bus).unwrap(); // PLP

        assert_eq!(cpu.p.0, live_before, "flags={flags:#04x}");
    }
}
