//! Access to the target's address space.
//!
//! The monitor never dereferences host-supplied addresses itself; it goes
//! through a [`TargetMemory`] it is handed. The on-target implementation,
//! [`PhysicalMemory`], performs unchecked volatile accesses: creating one
//! is the single place where that trust is granted.

use common::arch::arm::cache;

/// Byte- and word-addressed view of memory.
///
/// Word accesses are used for instruction patching and must be 4-byte
/// aligned; byte accesses may hit any address.
pub trait TargetMemory {
    fn read_u8(&self, addr: u32) -> u8;

    fn write_u8(&mut self, addr: u32, value: u8);

    fn read_u32(&self, addr: u32) -> u32;

    fn write_u32(&mut self, addr: u32, value: u32);

    /// Make instruction words written since the last call visible to
    /// instruction fetch.
    fn sync_instructions(&mut self) {}
}

impl<M: TargetMemory + ?Sized> TargetMemory for &mut M {
    fn read_u8(&self, addr: u32) -> u8 {
        (**self).read_u8(addr)
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        (**self).write_u8(addr, value)
    }

    fn read_u32(&self, addr: u32) -> u32 {
        (**self).read_u32(addr)
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        (**self).write_u32(addr, value)
    }

    fn sync_instructions(&mut self) {
        (**self).sync_instructions()
    }
}

/// The physical address space of the processor the monitor runs on.
#[derive(Debug)]
pub struct PhysicalMemory {
    _private: (),
}

impl PhysicalMemory {
    /// Create the memory capability.
    ///
    /// # Safety
    ///
    /// Every address later passed to the accessors is dereferenced as is.
    /// The caller accepts that the host can read or overwrite anything,
    /// the monitor's own code and stack included, and that a bad address
    /// faults inside the monitor.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl TargetMemory for PhysicalMemory {
    fn read_u8(&self, addr: u32) -> u8 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u8) }
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u8, value) }
    }

    fn read_u32(&self, addr: u32) -> u32 {
        unsafe { core::ptr::read_volatile(addr as usize as *const u32) }
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        unsafe { core::ptr::write_volatile(addr as usize as *mut u32, value) }
    }

    fn sync_instructions(&mut self) {
        cache::sync_instruction_cache();
    }
}

/// A byte buffer standing in for the address range starting at `base`.
///
/// Reads outside the window return zero and writes outside it are dropped,
/// mirroring open bus rather than faulting. Words are little-endian.
#[derive(Debug)]
pub struct MemoryWindow<'a> {
    base: u32,
    bytes: &'a mut [u8],
}

impl<'a> MemoryWindow<'a> {
    pub fn new(base: u32, bytes: &'a mut [u8]) -> Self {
        Self { base, bytes }
    }

    fn offset(&self, addr: u32) -> Option<usize> {
        let offset = usize::try_from(addr.checked_sub(self.base)?).ok()?;
        (offset < self.bytes.len()).then_some(offset)
    }

    pub fn bytes(&self) -> &[u8] {
        &*self.bytes
    }
}

impl TargetMemory for MemoryWindow<'_> {
    fn read_u8(&self, addr: u32) -> u8 {
        self.offset(addr).map_or(0, |i| self.bytes[i])
    }

    fn write_u8(&mut self, addr: u32, value: u8) {
        if let Some(i) = self.offset(addr) {
            self.bytes[i] = value;
        }
    }

    fn read_u32(&self, addr: u32) -> u32 {
        let mut word = [0; 4];
        for (i, byte) in word.iter_mut().enumerate() {
            *byte = self.read_u8(addr.wrapping_add(i as u32));
        }
        u32::from_le_bytes(word)
    }

    fn write_u32(&mut self, addr: u32, value: u32) {
        for (i, byte) in value.to_le_bytes().into_iter().enumerate() {
            self.write_u8(addr.wrapping_add(i as u32), byte);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_maps_addresses_from_base() {
        let mut ram = [0u8; 16];
        let mut mem = MemoryWindow::new(0x1000, &mut ram);
        mem.write_u32(0x1004, 0xefaa_aaaa);
        assert_eq!(mem.read_u8(0x1004), 0xaa);
        assert_eq!(mem.read_u8(0x1007), 0xef);
        assert_eq!(mem.read_u32(0x1004), 0xefaa_aaaa);
    }

    #[test]
    fn window_ignores_out_of_range_accesses() {
        let mut ram = [0x55u8; 4];
        let mut mem = MemoryWindow::new(0x1000, &mut ram);
        mem.write_u8(0x0fff, 1);
        mem.write_u8(0x1004, 1);
        assert_eq!(mem.read_u8(0x0fff), 0);
        assert_eq!(mem.read_u32(0x1002), 0x0000_5555);
        assert_eq!(mem.bytes(), &[0x55; 4]);
    }
}
