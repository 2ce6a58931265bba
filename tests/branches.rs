use mos6502_core::{MOS6502, RamBus16kb};

/// Each conditional branch, checked both when its condition holds (branch taken: `PC` lands at
/// `PC_after_operand + signed_offset`) and when it doesn't (branch falls through, consuming only
/// the operand byte).
fn assert_branch(setup: Vec<u8>, branch_opcode: u8, offset: i8, taken: bool) {
    let mut program = setup;
    let branch_pc_after_operand = 0x1000u16.wrapping_add(program.len() as u16).wrapping_add(2);
    program.push(branch_opcode);
    program.push(offset as u8);
    program.push(0xEA); // NOP (fallthrough landing spot)

    let branch_address = branch_pc_after_operand - 2;

    let mut bus = RamBus16kb::new().with_memory_at(0x1000, program);
    bus.write_u16(0xFFFC, 0x1000).unwrap();

    let mut cpu = MOS6502::new();
    cpu.reset(&mut bus).expect("reset failed");

    // Step the setup instructions, however many bytes each of them is.
    cpu.run_until(&mut bus, |cpu| cpu.pc == branch_address).unwrap();

    cpu.step(&mut bus).unwrap(); // the branch itself

    if taken {
        let expected = branch_pc_after_operand.wrapping_add(offset as i16 as u16);
        assert_eq!(cpu.pc, expected, "branch should have been taken");
    } else {
        assert_eq!(cpu.pc, branch_pc_after_operand, "branch should have fallen through");
    }
}

#[test]
fn bcc_branches_when_carry_clear() {
    assert_branch(vec![0x18], 0x90, 0x05, true); // CLC ; BCC +5
}

#[test]
fn bcc_falls_through_when_carry_set() {
    assert_branch(vec![0x38], 0x90, 0x05, false); // SEC ; BCC +5
}

#[test]
fn bcs_branches_when_carry_set() {
    assert_branch(vec![0x38], 0xB0, 0x05, true); // SEC ; BCS +5
}

#[test]
fn beq_branches_when_zero_set() {
    assert_branch(vec![0xA9, 0x00], 0xF0, 0x05, true); // LDA #$00 ; BEQ +5
}

#[test]
fn bne_branches_when_zero_clear() {
    assert_branch(vec![0xA9, 0x01], 0xD0, 0x05, true); // LDA #$01 ; BNE +5
}

#[test]
fn bmi_branches_when_negative_set() {
    assert_branch(vec![0xA9, 0x80], 0x30, 0x05, true); // LDA #$80 ; BMI +5
}

#[test]
fn bpl_branches_when_negative_clear() {
    assert_branch(vec![0xA9, 0x01], 0x10, 0x05, true); // LDA #$01 ; BPL +5
}

#[test]
fn bvc_branches_when_overflow_clear() {
    assert_branch(vec![0xB8], 0x50, 0x05, true); // CLV ; BVC +5
}

#[test]
fn bvs_branches_when_overflow_set() {
    // ADC with signed overflow (+80 + +80): sets V, then BVS should branch.
    let setup = vec![0x18, 0xA9, 0x50, 0x69, 0x50]; // CLC ; LDA #$50 ; ADC #$50
    assert_branch(setup, 0x70, 0x05, true);
}

/// Backwards branches (negative offsets) must wrap modulo 65536 just like forward ones.
#[test]
fn branch_backwards_offset_lands_at_expected_address() {
    assert_branch(vec![0x38], 0xB0, -3, true); // SEC ; BCS -3 (lands back on the SEC)
}
