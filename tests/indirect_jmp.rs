use mos6502_core::{MOS6502, RamBus16kb};

/// The 6502's infamous indirect-JMP page-wrap bug: `JMP ($30FF)` must read its high byte from
/// `$3000`, not `$3100`, because the pointer fetch never crosses a page boundary.
#[test]
fn jmp_indirect_wraps_within_the_pointer_page() {
    let program = vec![
        0x6C, 0xFF, 0x30, // JMP ($30FF)
    ];
    let mut bus = RamBus16kb::new()
        .with_program(program)
        .with_memory_at(0x30FF, vec![0x34])
        .with_memory_at(0x3000, vec![0x12]);
    // Make sure the "wrong" answer the bug avoids isn't accidentally right.
    bus.write_u8(0x3100, 0xFF).unwrap();

    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap(); // JMP ($30FF)

    assert_eq!(cpu.pc, 0x1234);
}

/// A non-page-crossing indirect pointer behaves exactly like you'd expect: no wrap quirk to
/// trigger.
#[test]
fn jmp_indirect_without_page_boundary_reads_normally() {
    let program = vec![
        0x6C, 0x00, 0x30, // JMP ($3000)
    ];
    let mut bus = RamBus16kb::new()
        .with_program(program)
        .with_memory_at(0x3000, vec![0x34, 0x12]);

    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");
    cpu.step(&mut bus).unwrap();

    assert_eq!(cpu.pc, 0x1234);
}
