//! Software breakpoints.
//!
//! A breakpoint is armed by overwriting the instruction at its address with
//! [`TRAP_INSTRUCTION`] and disarmed by writing the saved word back. The
//! table only holds addresses while the program is stopped; patching happens
//! in [`BreakpointTable::activate`] right before resuming and is undone by
//! [`BreakpointTable::deactivate`] as soon as the monitor is re-entered.
//!
//! Slot 0 belongs to single-stepping and is never handed out by
//! [`BreakpointTable::insert`] nor cleared by [`BreakpointTable::remove`].

use crate::memory::TargetMemory;
use common::arch::arm::TRAP_INSTRUCTION;
use core::fmt;

/// Number of slots, including the step slot.
pub const MAX_BREAKPOINTS: usize = 16;

/// Slot reserved for the transient single-step breakpoint.
pub const STEP_SLOT: usize = 0;

/// One table entry. An address of zero marks a free slot, whose saved word
/// means nothing.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub struct Breakpoint {
    pub addr: u32,
    pub saved: u32,
}

impl Breakpoint {
    pub const FREE: Breakpoint = Breakpoint { addr: 0, saved: 0 };

    pub const fn is_free(&self) -> bool {
        self.addr == 0
    }
}

/// Why a breakpoint could not be inserted.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BreakpointError {
    /// Address zero marks free slots and cannot be a breakpoint.
    ZeroAddress,
    /// Every user slot is taken.
    TableFull,
}

impl fmt::Display for BreakpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BreakpointError::ZeroAddress => f.write_str("breakpoint at address zero"),
            BreakpointError::TableFull => f.write_str("no free breakpoint slot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BreakpointTable {
    slots: [Breakpoint; MAX_BREAKPOINTS],
}

impl BreakpointTable {
    pub const fn new() -> Self {
        Self {
            slots: [Breakpoint::FREE; MAX_BREAKPOINTS],
        }
    }

    fn user_slots(&self) -> impl Iterator<Item = (usize, &Breakpoint)> {
        self.slots.iter().enumerate().skip(STEP_SLOT + 1)
    }

    /// Add a user breakpoint. Inserting an address that is already present
    /// succeeds without taking a second slot.
    pub fn insert(&mut self, addr: u32) -> Result<(), BreakpointError> {
        if addr == 0 {
            return Err(BreakpointError::ZeroAddress);
        }
        if self.contains(addr) {
            return Ok(());
        }

        let (slot, _) = self
            .user_slots()
            .find(|(_, bp)| bp.is_free())
            .ok_or(BreakpointError::TableFull)?;
        self.slots[slot] = Breakpoint { addr, saved: 0 };
        log::debug!("breakpoint {addr:#010x} in slot {slot}");
        Ok(())
    }

    /// Drop the user breakpoint at `addr`. Returns whether there was one.
    pub fn remove(&mut self, addr: u32) -> bool {
        if addr == 0 {
            return false;
        }
        let Some((slot, _)) = self.user_slots().find(|(_, bp)| bp.addr == addr) else {
            return false;
        };
        self.slots[slot] = Breakpoint::FREE;
        log::debug!("breakpoint {addr:#010x} removed from slot {slot}");
        true
    }

    /// Whether a user breakpoint exists at `addr`.
    pub fn contains(&self, addr: u32) -> bool {
        addr != 0 && self.user_slots().any(|(_, bp)| bp.addr == addr)
    }

    /// Place the one-shot step breakpoint.
    pub fn set_step(&mut self, addr: u32) {
        self.slots[STEP_SLOT] = Breakpoint { addr, saved: 0 };
    }

    pub fn clear_step(&mut self) {
        self.slots[STEP_SLOT] = Breakpoint::FREE;
    }

    /// Address of the pending step breakpoint, if any.
    pub fn step(&self) -> Option<u32> {
        let step = self.slots[STEP_SLOT];
        (!step.is_free()).then_some(step.addr)
    }

    /// Occupied slots with their index, step slot included.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Breakpoint)> {
        self.slots.iter().enumerate().filter(|(_, bp)| !bp.is_free())
    }

    /// Number of occupied slots, step slot included.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Save the instruction under every breakpoint and replace it with the
    /// trap instruction.
    pub fn activate<M: TargetMemory>(&mut self, memory: &mut M) {
        for (slot, bp) in self.slots.iter_mut().enumerate() {
            if bp.is_free() {
                continue;
            }
            bp.saved = memory.read_u32(bp.addr);
            memory.write_u32(bp.addr, TRAP_INSTRUCTION);
            log::trace!("slot {slot}: {:#010x} saved {:#010x}", bp.addr, bp.saved);
        }
        memory.sync_instructions();
    }

    /// Put back the instructions [`Self::activate`] replaced.
    ///
    /// Slots are restored in reverse order so that when the step slot and a
    /// user slot share an address, the step slot (which saved the real
    /// instruction, not the trap) is written last.
    pub fn deactivate<M: TargetMemory>(&self, memory: &mut M) {
        for (slot, bp) in self.slots.iter().enumerate().rev() {
            if bp.is_free() {
                continue;
            }
            memory.write_u32(bp.addr, bp.saved);
            log::trace!("slot {slot}: {:#010x} restored {:#010x}", bp.addr, bp.saved);
        }
        memory.sync_instructions();
    }
}

impl Default for BreakpointTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryWindow;

    fn image() -> [u8; 64] {
        let mut ram = [0u8; 64];
        for (i, byte) in ram.iter_mut().enumerate() {
            *byte = i as u8;
        }
        ram
    }

    #[test]
    fn insert_then_remove_restores_table() {
        let mut table = BreakpointTable::new();
        table.insert(0x2000).unwrap();
        let before = table.clone();

        table.insert(0x1000).unwrap();
        assert!(table.contains(0x1000));
        assert!(table.remove(0x1000));
        assert_eq!(table, before);
    }

    #[test]
    fn insert_is_idempotent() {
        let mut table = BreakpointTable::new();
        table.insert(0x1000).unwrap();
        table.insert(0x1000).unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn zero_address_is_rejected() {
        let mut table = BreakpointTable::new();
        assert_eq!(table.insert(0), Err(BreakpointError::ZeroAddress));
        assert!(table.is_empty());
        assert!(!table.remove(0));
    }

    #[test]
    fn fifteen_user_slots() {
        let mut table = BreakpointTable::new();
        for i in 1..MAX_BREAKPOINTS as u32 {
            table.insert(i * 4).unwrap();
        }
        assert_eq!(table.insert(0x1000), Err(BreakpointError::TableFull));
        // Re-inserting an existing address still succeeds when full.
        assert_eq!(table.insert(4), Ok(()));
        assert_eq!(table.step(), None);

        assert!(table.remove(8));
        assert_eq!(table.insert(0x1000), Ok(()));
    }

    #[test]
    fn user_commands_never_touch_the_step_slot() {
        let mut table = BreakpointTable::new();
        table.set_step(0x1004);
        assert!(!table.contains(0x1004));
        assert!(!table.remove(0x1004));
        assert_eq!(table.step(), Some(0x1004));

        table.insert(0x1004).unwrap();
        assert_eq!(table.len(), 2);
        table.clear_step();
        assert_eq!(table.step(), None);
        assert!(table.contains(0x1004));
    }

    #[test]
    fn first_free_slot_is_reused() {
        let mut table = BreakpointTable::new();
        table.insert(0x10).unwrap();
        table.insert(0x20).unwrap();
        table.remove(0x10);
        table.insert(0x30).unwrap();
        let slots: Vec<(usize, u32)> = table.iter().map(|(i, bp)| (i, bp.addr)).collect();
        assert_eq!(slots, vec![(1, 0x30), (2, 0x20)]);
    }

    #[test]
    fn activate_writes_traps_and_deactivate_restores() {
        let mut ram = image();
        let original = ram;
        let mut mem = MemoryWindow::new(0, &mut ram);
        let mut table = BreakpointTable::new();
        table.insert(0x08).unwrap();
        table.insert(0x20).unwrap();
        table.set_step(0x0c);

        table.activate(&mut mem);
        assert_eq!(mem.read_u32(0x08), TRAP_INSTRUCTION);
        assert_eq!(mem.read_u32(0x0c), TRAP_INSTRUCTION);
        assert_eq!(mem.read_u32(0x20), TRAP_INSTRUCTION);
        assert_eq!(mem.read_u32(0x10), 0x1312_1110);

        table.deactivate(&mut mem);
        assert_eq!(mem.bytes(), &original[..]);
    }

    #[test]
    fn shared_step_and_user_address_restores_original() {
        let mut ram = image();
        let original = ram;
        let mut mem = MemoryWindow::new(0, &mut ram);
        let mut table = BreakpointTable::new();
        table.insert(0x10).unwrap();
        table.set_step(0x10);

        table.activate(&mut mem);
        assert_eq!(mem.read_u32(0x10), TRAP_INSTRUCTION);
        table.deactivate(&mut mem);
        assert_eq!(mem.bytes(), &original[..]);
    }
}
