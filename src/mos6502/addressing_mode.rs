use std::fmt;

use super::{Address, BytesUsed, CyclesTaken, MOS6502, Result};
use super::addressable::{Addressable, AddressableTarget};
use super::bus::Bus;
use super::error::BusError;

/// `AddressingMode` is combined with `Opcode` to decide _where_ the arguments for an opcode should be sourced from.
///
/// If the `AddressingMode` is `Accumulator`
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AddressingMode {
    /// An `Opcode` has an `Implied` addressing mode if the target address
    /// is implied by the instruction.
    ///
    /// Example: `INX`
    Implied,

    /// The `Opcode` is targeting the accumulator `A`
    ///
    /// Example: `ROL`
    Accumulator,

    /// The `Opcode` is expecting a value defined inline in assembly.
    ///
    /// Example: `LDA #$AA` which loads `0xAA` into `A`
    Immediate,

    /// `ZeroPage` means we want to load a value referenced by an address stored within the
    /// first 256 bytes of memory (page 0).
    ///
    /// For example, consider the following memory layout:
    ///
    /// ```text
    /// 0x0000: 0xEF
    /// 0x0001: 0xBE
    /// ...
    /// 0xBEEF: 0xAA
    /// ```
    ///
    /// If I execute `LDA $00` then `A` will contain `0xAA` since address `0x000` and `0x0001` reference address `0xBEEF`
    ZeroPage,

    /// `ZeroPageX` is the same as `ZeroPage` except `X` is added to the zero page address before resolving the value.
    ///
    /// If `$(arg) + X` exceeds `0xFF` the value will wrap-around.
    ///
    /// Example: `LDA $00,X`
    ZeroPageX,

    /// `ZeroPageY` is the same as `ZeroPage` except `Y` is added to the zero page address before resolving the value.
    ///
    /// If `$(arg) + Y` exceeds `0xFF` the value will wrap-around.
    ///
    /// Example: `LDA $00,Y`
    ZeroPageY,

    // 16-bit memory return value
    Absolute,  // u16 -> u8
    AbsoluteX, // (u16, x) -> u8
    AbsoluteY, // (u16, y) -> u8

    Relative,  // (s8)
    Indirect,  // u16 -> u16
    IndexedIndirect, // (u16, x) -> u16. Should this be IndexedIndirectX?
    IndirectIndexed, // (u16, y) -> u16. Should this be IndirectIndexedY?
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

impl AddressingMode {
    /// Consume the 0-2 operand bytes following the opcode byte at `address`, turning them into
    /// a raw `Addressing`. This runs before we know `X`/`Y`/`PC`, so the result always carries
    /// the *unindexed* operand; `Addressing::read_addressable` folds register state in later.
    ///
    /// Returns the `Addressing`, the number of cycles the fetch took and the number of bytes
    /// of the instruction stream it consumed. For `Implied` and `Accumulator` these two counts
    /// differ: the 6502 always performs a dummy read of the next byte but doesn't advance past
    /// it.
    pub fn read_addressing(
        &self,
        address: Address,
        bus: &impl Bus
    ) -> std::result::Result<(Addressing, CyclesTaken, BytesUsed), BusError> {
        match self {
            AddressingMode::Implied => {
                bus.read_u8(address)?;
                Ok((Addressing::Implied, 1, 0))
            }
            AddressingMode::Accumulator => {
                bus.read_u8(address)?;
                Ok((Addressing::Accumulator, 1, 0))
            }
            AddressingMode::Immediate => {
                let value = bus.read_u8(address)?;
                Ok((Addressing::Immediate(value), 1, 1))
            }
            AddressingMode::ZeroPage => {
                let zero_page_address = bus.read_u8(address)?;
                Ok((Addressing::ZeroPage(zero_page_address), 1, 1))
            }
            AddressingMode::ZeroPageX => {
                let zero_page_address = bus.read_u8(address)?;
                Ok((Addressing::ZeroPageX(zero_page_address), 1, 1))
            }
            AddressingMode::ZeroPageY => {
                let zero_page_address = bus.read_u8(address)?;
                Ok((Addressing::ZeroPageY(zero_page_address), 1, 1))
            }
            AddressingMode::Relative => {
                let offset = bus.read_u8(address)? as i8;
                Ok((Addressing::Relative(offset), 1, 1))
            }
            AddressingMode::Absolute => {
                let target = bus.read_u16(address)?;
                Ok((Addressing::Absolute(target), 2, 2))
            }
            AddressingMode::AbsoluteX => {
                let base = bus.read_u16(address)?;
                Ok((Addressing::AbsoluteX(base), 2, 2))
            }
            AddressingMode::AbsoluteY => {
                let base = bus.read_u16(address)?;
                Ok((Addressing::AbsoluteY(base), 2, 2))
            }
            AddressingMode::Indirect => {
                let pointer = bus.read_u16(address)?;
                Ok((Addressing::Indirect(pointer), 2, 2))
            }
            AddressingMode::IndexedIndirect => {
                let zero_page_address = bus.read_u8(address)?;
                Ok((Addressing::IndexedIndirect(zero_page_address), 1, 1))
            }
            AddressingMode::IndirectIndexed => {
                let zero_page_address = bus.read_u8(address)?;
                Ok((Addressing::IndirectIndexed(zero_page_address), 1, 1))
            }
        }
    }
}

/// `Addressing` is the result of reading an instruction's raw operand bytes off the bus, before
/// `X`/`Y`/`PC` have been folded in. Each variant that carries data holds the value exactly as
/// read, e.g. `AbsoluteX` holds the base address _before_ `X` is added.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum Addressing {
    Implied,
    Accumulator,
    Immediate(u8),
    ZeroPage(u8),
    ZeroPageX(u8),
    ZeroPageY(u8),
    Relative(i8),
    Absolute(u16),
    AbsoluteX(u16),
    AbsoluteY(u16),
    Indirect(u16),
    IndexedIndirect(u8),
    IndirectIndexed(u8),
}

impl Addressing {
    /// Fold `X`/`Y`/`PC` into this `Addressing` to produce a fully realized `Addressable`.
    ///
    /// Returns the `Addressable` plus any extra bus cycles spent resolving a pointer (the
    /// two-byte lookups `Indirect`/`IndexedIndirect`/`IndirectIndexed` perform).
    pub fn read_addressable(&self, cpu: &MOS6502, bus: &impl Bus) -> Result<(Addressable, CyclesTaken)> {
        match *self {
            Addressing::Implied => Ok((
                Addressable { addressing: *self, target: AddressableTarget::Implied, page_boundary_crossed: false },
                0,
            )),

            Addressing::Accumulator => Ok((
                Addressable { addressing: *self, target: AddressableTarget::Accumulator, page_boundary_crossed: false },
                0,
            )),

            Addressing::Immediate(value) => Ok((
                Addressable { addressing: *self, target: AddressableTarget::Immediate(value), page_boundary_crossed: false },
                0,
            )),

            Addressing::ZeroPage(zero_page_address) => Ok((
                Addressable {
                    addressing: *self,
                    target: AddressableTarget::Memory(zero_page_address as u16),
                    page_boundary_crossed: false,
                },
                0,
            )),

            // Zero page indexing wraps within page 0: `$FF,X` with `X = 2` targets `$01`, not `$0101`.
            Addressing::ZeroPageX(zero_page_address) => {
                let address = zero_page_address.wrapping_add(cpu.x) as u16;
                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed: false },
                    0,
                ))
            }

            Addressing::ZeroPageY(zero_page_address) => {
                let address = zero_page_address.wrapping_add(cpu.y) as u16;
                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed: false },
                    0,
                ))
            }

            Addressing::Relative(offset) => {
                let address = cpu.pc.wrapping_add(offset as i16 as u16);
                let page_boundary_crossed = (address & 0xFF00) != (cpu.pc & 0xFF00);
                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed },
                    0,
                ))
            }

            Addressing::Absolute(address) => Ok((
                Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed: false },
                0,
            )),

            Addressing::AbsoluteX(base) => {
                let address = base.wrapping_add(cpu.x as u16);
                let page_boundary_crossed = (address & 0xFF00) != (base & 0xFF00);
                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed },
                    0,
                ))
            }

            Addressing::AbsoluteY(base) => {
                let address = base.wrapping_add(cpu.y as u16);
                let page_boundary_crossed = (address & 0xFF00) != (base & 0xFF00);
                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed },
                    0,
                ))
            }

            // The 6502's infamous indirect jump bug: if the pointer's low byte is `$FF` the high
            // byte is fetched from `pointer & $FF00` rather than `pointer + 1`, so the fetch
            // never crosses a page boundary.
            Addressing::Indirect(pointer) => {
                let lo = bus.read_u8(pointer)?;
                let hi_address = (pointer & 0xFF00) | (pointer.wrapping_add(1) & 0x00FF);
                let hi = bus.read_u8(hi_address)?;
                let address = u16::from_le_bytes([lo, hi]);

                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed: false },
                    2,
                ))
            }

            // `(zp,X)`: add `X` to the zero page address (wrapping within page 0) *before*
            // reading the two-byte pointer it holds.
            Addressing::IndexedIndirect(zero_page_address) => {
                let pointer = zero_page_address.wrapping_add(cpu.x);
                let lo = bus.read_u8(pointer as u16)?;
                let hi = bus.read_u8(pointer.wrapping_add(1) as u16)?;
                let address = u16::from_le_bytes([lo, hi]);

                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed: false },
                    2,
                ))
            }

            // `(zp),Y`: read the two-byte pointer from the (unwrapped, un-indexed) zero page
            // address, *then* add `Y` to the resulting 16-bit address.
            Addressing::IndirectIndexed(zero_page_address) => {
                let lo = bus.read_u8(zero_page_address as u16)?;
                let hi = bus.read_u8(zero_page_address.wrapping_add(1) as u16)?;
                let base = u16::from_le_bytes([lo, hi]);
                let address = base.wrapping_add(cpu.y as u16);
                let page_boundary_crossed = (address & 0xFF00) != (base & 0xFF00);

                Ok((
                    Addressable { addressing: *self, target: AddressableTarget::Memory(address), page_boundary_crossed },
                    2,
                ))
            }
        }
    }
}
