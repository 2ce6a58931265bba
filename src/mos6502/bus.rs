use std::cell::RefCell;
use std::rc::Rc;

use log::warn;

use super::device::Device;
use super::error::{AccessKind, BusError};
use super::{NMI_VECTOR_ADDRESS, RESET_VECTOR_ADDRESS};

pub trait Bus {
    fn write_u8(&mut self, address: u16, data: u8) -> Result<(), BusError>;

    fn read_u8(&self, address: u16) -> Result<u8, BusError>;

    /// Read a `u16` from the bus from `address`. Assumes the values are in _little endian_ order.
    fn read_u16(&self, address: u16) -> Result<u16, BusError> {
        let lo = self.read_u8(address)?;
        let hi = self.read_u8(address.wrapping_add(1))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Write a `u16` to the bus starting at `address` in _little endian_ order.
    fn write_u16(&mut self, address: u16, value: u16) -> Result<(), BusError> {
        let [lo, hi] = value.to_le_bytes();
        self.write_u8(address, lo)?;
        self.write_u8(address.wrapping_add(1), hi)?;
        Ok(())
    }

    fn read_range(&self, start: u16, end: u16) -> Result<Vec<u8>, BusError> {
        (start..end)
            .map(|a| self.read_u8(a))
            .collect()
    }
}

/// A Bus used for testing. It stores the program in an expected location and maps the full
/// 64KiB address space, so it never produces a `BusError`.
///
/// We use `RamBus16kb` for testing.
pub struct RamBus16kb {
    pub memory: [u8; RamBus16kb::SIZE],
}

impl RamBus16kb {
    /// If we have a 16-bit addressing scheme then we can address
    /// _65536_ bytes of memory in total.
    pub const SIZE: usize = 65536;

    pub fn new() -> RamBus16kb {
        RamBus16kb {
            memory: [0; RamBus16kb::SIZE]
        }
    }

    pub fn with_nmi_vector_address(mut self, address: u16) -> RamBus16kb {
        self.write_u16(NMI_VECTOR_ADDRESS, address).expect("RamBus16kb maps the full address space");
        self
    }

    pub fn with_program(mut self, bytes: Vec<u8>) -> RamBus16kb {
        let program_end = RESET_VECTOR_ADDRESS as usize;
        let program_start = program_end - bytes.len();
        self.memory[program_start..program_end].copy_from_slice(&bytes[..]);

        // Set the reset vector to point at our program.
        self.write_u16(RESET_VECTOR_ADDRESS, program_start as u16).expect("RamBus16kb maps the full address space");

        self
    }

    /// Writes memory into RAM starting from address `0x0000`
    pub fn with_memory(self, bytes: Vec<u8>) -> RamBus16kb {
        self.with_memory_at(0, bytes)
    }

    pub fn with_memory_at(mut self, start: usize, bytes: Vec<u8>) -> RamBus16kb {
        let program_start = start;
        let program_end = start + bytes.len();
        self.memory[program_start..program_end].copy_from_slice(&bytes[..]);
        self
    }
}

impl Bus for RamBus16kb {
    fn write_u8(&mut self, address: u16, data: u8) -> Result<(), BusError> {
        self.memory[address as usize] = data;
        Ok(())
    }

    fn read_u8(&self, address: u16) -> Result<u8, BusError> {
        Ok(self.memory[address as usize])
    }
}

/// Governs what happens when something writes to a read-only device attached to a `MemoryBus`.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub enum ReadOnlyPolicy {
    /// Silently drop the write. This is what most consoles actually do when software writes to
    /// cartridge ROM.
    Ignore,

    /// Surface the write as `BusError::WriteToReadOnly`.
    Fail,
}

impl Default for ReadOnlyPolicy {
    fn default() -> ReadOnlyPolicy {
        ReadOnlyPolicy::Ignore
    }
}

struct Attachment {
    device: Rc<RefCell<dyn Device>>,
    base: u16,
    length: u16,
    writable: bool,
}

/// A `Bus` backed by a list of devices mapped onto ranges of the 16-bit address space.
///
/// Attachments are searched most-recently-attached-first, which is what makes
/// `attach_mirror` work: a mirror attached after its base attachment shadows nothing, since
/// lookups for its own range never reach the base attachment's range.
pub struct MemoryBus {
    attachments: Vec<Attachment>,
    read_only_policy: ReadOnlyPolicy,
}

impl MemoryBus {
    pub fn new() -> MemoryBus {
        MemoryBus {
            attachments: Vec::new(),
            read_only_policy: ReadOnlyPolicy::default(),
        }
    }

    pub fn with_read_only_policy(mut self, policy: ReadOnlyPolicy) -> MemoryBus {
        self.read_only_policy = policy;
        self
    }

    /// Map `device` onto the address space starting at `base`, spanning `device.size()` bytes.
    ///
    /// Fails if the new range overlaps an attachment that isn't a mirror of the same device.
    pub fn attach(mut self, device: Rc<RefCell<dyn Device>>, base: u16) -> Result<MemoryBus, BusError> {
        let length = device.borrow().size() as u16;
        self.check_overlap(base, length)?;

        let writable = device.borrow().writable();
        self.attachments.push(Attachment { device, base, length, writable });
        Ok(self)
    }

    /// Map `device` again onto `[base, base + length)`, aliasing the same underlying storage.
    ///
    /// Mirrors are allowed to overlap each other and their own base attachment; that's the point.
    pub fn attach_mirror(mut self, device: Rc<RefCell<dyn Device>>, base: u16, length: u16) -> MemoryBus {
        let writable = device.borrow().writable();
        self.attachments.push(Attachment { device, base, length, writable });
        self
    }

    fn check_overlap(&self, base: u16, length: u16) -> Result<(), BusError> {
        let end = base as u32 + length as u32;
        let overlaps = self.attachments.iter().any(|a| {
            let other_end = a.base as u32 + a.length as u32;
            (base as u32) < other_end && (a.base as u32) < end
        });

        if overlaps {
            warn!("bus attachment at {:#06x} overlaps an existing non-mirror attachment", base);
            Err(BusError::Overlap(base))
        } else {
            Ok(())
        }
    }

    fn find(&self, address: u16) -> Option<&Attachment> {
        self.attachments.iter().rev().find(|a| {
            address >= a.base && (address as u32) < (a.base as u32 + a.length as u32)
        })
    }
}

impl Default for MemoryBus {
    fn default() -> MemoryBus {
        MemoryBus::new()
    }
}

impl Bus for MemoryBus {
    fn read_u8(&self, address: u16) -> Result<u8, BusError> {
        match self.find(address) {
            Some(attachment) => {
                let device = attachment.device.borrow();
                let offset = (address - attachment.base) % device.size() as u16;
                Ok(device.read_local(offset))
            }
            None => Err(BusError::UnmappedAccess { address, kind: AccessKind::Read }),
        }
    }

    fn write_u8(&mut self, address: u16, value: u8) -> Result<(), BusError> {
        let (device, base, writable) = match self.find(address) {
            Some(attachment) => (attachment.device.clone(), attachment.base, attachment.writable),
            None => return Err(BusError::UnmappedAccess { address, kind: AccessKind::Write }),
        };

        if !writable {
            return match self.read_only_policy {
                ReadOnlyPolicy::Ignore => Ok(()),
                ReadOnlyPolicy::Fail => {
                    warn!("write of {:#04x} to read-only device at {:#06x} rejected by policy", value, address);
                    Err(BusError::WriteToReadOnly { address, value })
                }
            };
        }

        let offset = (address - base) % device.borrow().size() as u16;
        device.borrow_mut().write_local(offset, value);
        Ok(())
    }
}

/// Tests for `Bus`
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    pub fn read_u16_is_little_endian() {
        let mut bus = RamBus16kb::new();
        bus.memory[0xAAAA] = 0x01;
        bus.memory[0xAAAB] = 0xFF;

        let result = bus.read_u16(0xAAAA).unwrap();
        assert_eq!(result, 0xFF01);
    }

    #[test]
    pub fn write_u16_is_little_endian() {
        let mut bus = RamBus16kb::new();
        bus.write_u16(0xAAAA, 0xFF01).unwrap();

        assert_eq!(bus.memory[0xAAAA], 0x01);
        assert_eq!(bus.memory[0xAAAB], 0xFF);
    }

    /// Assuming we have a read/write device connected to the bus we should
    /// expect that `write_u16(m, a)` followed by `read_u16(m)` should be `a`
    #[test]
    pub fn write_u16_read_u16_roundtrip() {
        let mut bus = RamBus16kb::new();
        bus.write_u16(0xBBAA, 0xBEEF).unwrap();

        let result = bus.read_u16(0xBBAA).unwrap();
        assert_eq!(result, 0xBEEF);
    }
}

/// Tests for `RamBus16kb`
#[cfg(test)]
mod rambus_tests {
    use super::*;

    /// Generally program rom is placed at the end of addressable memory. But we need to leave
    /// some space for the interrupt vectors used by the 6502.
    ///
    /// We want to make sure `with_program` puts the program data as far towards the end as possible
    /// within these constraints.
    #[test]
    pub fn with_program_inserts_at_end() {
        let bus = RamBus16kb::new()
            .with_program(vec![0xAA, 0xBB, 0xCC]);

        assert_eq!(bus.memory[0xFFF9], 0xAA);
        assert_eq!(bus.memory[0xFFFA], 0xBB);
        assert_eq!(bus.memory[0xFFFB], 0xCC);
    }

    /// `with_program` writes as closely as possible to `RESET_VECTOR_ADDRESS`. We want to make sure
    /// it doesn't write _too_ close and clobber the data.
    #[test]
    pub fn with_program_doesnt_override_nmi_vector_address() {
        let bus = RamBus16kb::new()
            .with_nmi_vector_address(0xBEEF)
            .with_program(vec![0x01, 0x02, 0x03]);

        let nmi_address = NMI_VECTOR_ADDRESS as usize;
        assert_eq!(bus.memory[nmi_address    ], 0xEF);
        assert_eq!(bus.memory[nmi_address + 1], 0xBE);
    }

    /// `with_program` should write the first instruction to `RESET_VECTOR_ADDRESS` (0xFFFC) since that's
    /// what the 6502 expects.
    #[test]
    pub fn with_program_writes_instruction_to_reset_vector() {
        let bus = RamBus16kb::new()
            .with_program(vec![0xAA, 0xBB, 0xCC]);

        // Remember: addresses are in little-endian so if we expect the address `0xFFF9` then
        // we check for the byte `0xF9` _followed by_ `0xFF`.
        let reset_vector_address = RESET_VECTOR_ADDRESS as usize;
        assert_eq!(bus.memory[reset_vector_address    ], 0xF9);
        assert_eq!(bus.memory[reset_vector_address + 1], 0xFF);
    }
}
