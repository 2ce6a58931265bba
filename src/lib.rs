mod mos6502;

pub use mos6502::{
    MOS6502,
    IllegalOpcodePolicy,
    Bus,
    RamBus16kb,
    MemoryBus,
    ReadOnlyPolicy,
    Device,
    Ram,
    Rom,
    DMA,
    ActiveDMA,
    DMAStatus,
    Status,
    StatusFlag,
    CpuOpcode as Opcode,
    AddressingMode,
    CpuError as Error,
    BusError,
    AccessKind,
    NMI_VECTOR_ADDRESS,
    IRQ_VECTOR_ADDRESS,
    RESET_VECTOR_ADDRESS,
    Address,
    BytesUsed,
    CyclesTaken,
    Result,
};
