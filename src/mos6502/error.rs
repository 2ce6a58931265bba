use std::fmt;

use thiserror::Error;

use super::addressable::AddressableTarget;
use super::addressing_mode::AddressingMode;
use super::opcode::Opcode;

/// Whether a faulting bus transaction was a read or a write. Carried on
/// [`BusError::UnmappedAccess`] so callers can tell the two apart without
/// re-deriving it from context.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum AccessKind {
    Read,
    Write,
}

impl fmt::Display for AccessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AccessKind::Read => write!(f, "read"),
            AccessKind::Write => write!(f, "write"),
        }
    }
}

/// Errors raised by [`super::bus::Bus`] implementations.
///
/// `MemoryBus` is the only implementor that can actually produce these;
/// `RamBus` (used by tests and simple fixtures) maps the full address space
/// and so never does.
#[derive(Error, PartialEq, Eq, Clone, Copy, Debug)]
pub enum BusError {
    #[error("unmapped bus access ({kind}) at {address:#06x}")]
    UnmappedAccess { address: u16, kind: AccessKind },

    #[error("write of {value:#04x} to read-only device at {address:#06x}")]
    WriteToReadOnly { address: u16, value: u8 },

    #[error("attachment at {0:#06x} overlaps an existing non-mirror attachment")]
    Overlap(u16),
}

/// Errors raised by the CPU itself, either from decoding/executing an
/// instruction or from the bus it was given.
#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid instruction: {0:#04x}")]
    InvalidInstruction(u8),

    #[error("invalid attempt to read a target address in addressing mode {0}")]
    InvalidAddressRead(AddressingMode),

    #[error("invalid attempt to treat {0:?} as an address")]
    InvalidAddressAttempt(AddressableTarget),

    #[error("invalid attempt to write {1:#04x} to {0:?}")]
    InvalidAddressableWrite(AddressableTarget, u8),

    #[error("invalid attempt to modify {0:?}")]
    InvalidAddressableModify(AddressableTarget),

    #[error("unstable (unimplemented) opcode: {0:#04x}")]
    UnstableOpcode(u8),

    #[error("opcode {0:?} rejected by illegal opcode policy")]
    IllegalOpcodeRejected(Opcode),

    #[error("step() called while the CPU is halted")]
    Halted,

    #[error(transparent)]
    Bus(#[from] BusError),
}
