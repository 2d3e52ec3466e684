//! The Memory Store (spec §4.3): owns banks, the placement map, and the
//! exit region; implements `MemoryAccess` so the Execution Model can fetch,
//! read, and write through it without knowing about banks or placements.
//!
//! Two distinct notions of "memory contents" are kept apart here, resolving
//! an ambiguity in the placement invariants (spec §3: "bytes are immutable
//! once written" vs. a `Store` sequence's functional write during
//! execution): the **placement map** records what the generator decided to
//! put where — append-only, used for the emitted assembly and for
//! `is_placed`/overlap bookkeeping — while a separate **runtime byte store**
//! holds what the Execution Model actually reads and writes as it steps
//! through placed code. Placing a `DataBlob` seeds the runtime store with
//! its initial bytes; a later functional store to that address only updates
//! the runtime copy, never the placement (there is nothing to re-emit: the
//! assembly text already names that byte range as data).

use std::collections::HashMap;

use crate::common::{Address, GenError, GenResult, MemoryAccess, Trap};
use crate::isa::{Form, Operands};

use super::bank::Bank;
use super::config::MemoryConfig;
use super::placement::{Cell, PlacementMap};

/// Byte length of the end sequence this store must keep the exit region
/// free for (spec §4.3(d)): load-of-exit-address (auipc+addi, 8 bytes) +
/// indirect jump (4 bytes) + self-branch (4 bytes).
const END_SEQUENCE_BYTES: u64 = 16;

pub struct MemoryStore {
    banks: Vec<Bank>,
    code_bank: usize,
    data_bank: usize,
    data_reserve: u64,
    placements: PlacementMap,
    runtime: HashMap<u64, u8>,
    code_cursor: u64,
    data_cursor: u64,
    exit_addr: Address,
    boot_addr: Address,
}

impl MemoryStore {
    /// Builds the store from a validated `MemoryConfig`, splitting a unified
    /// `code+data` bank's upper `data_reserve` bytes into a data region
    /// (spec §3 "If the same bank carries both, a data reserve at its upper
    /// end is split off for data").
    pub fn new(config: &MemoryConfig) -> GenResult<Self> {
        let banks: Vec<Bank> = config
            .banks
            .iter()
            .map(|b| Bank {
                name: b.name.clone(),
                base: Address::new(b.base),
                size: b.size,
                code: b.code,
                data: b.data,
                access: b.access,
            })
            .collect();

        let code_bank = banks
            .iter()
            .position(|b| b.code)
            .ok_or_else(|| GenError::ConfigError("no code bank".into()))?;
        let data_bank = banks.iter().position(|b| b.data).unwrap_or(code_bank);

        let data_reserve = config.memory.data_reserve;
        if code_bank == data_bank && data_reserve >= banks[code_bank].size {
            return Err(GenError::ConfigError("data_reserve exceeds unified bank size".into()));
        }

        Ok(Self {
            banks,
            code_bank,
            data_bank,
            data_reserve,
            placements: PlacementMap::new(),
            runtime: HashMap::new(),
            code_cursor: 0,
            data_cursor: 0,
            exit_addr: Address::new(0),
            boot_addr: Address::new(0),
        })
    }

    /// Records the chosen boot address for the emitter's header (spec §6
    /// "# Boot: 0xBB"). Purely informational: the Execution Model is handed
    /// `boot` directly and does not consult this.
    pub fn set_boot_address(&mut self, addr: Address) {
        self.boot_addr = addr;
    }

    #[must_use]
    pub fn boot_address(&self) -> Address {
        self.boot_addr
    }

    #[must_use]
    pub fn code_bank(&self) -> &Bank {
        &self.banks[self.code_bank]
    }

    #[must_use]
    pub fn data_bank(&self) -> &Bank {
        &self.banks[self.data_bank]
    }

    #[must_use]
    pub fn banks(&self) -> &[Bank] {
        &self.banks
    }

    #[must_use]
    pub fn has_distinct_data_bank(&self) -> bool {
        self.code_bank != self.data_bank
    }

    /// The extent of the code region available to code placement: the
    /// whole code bank if it is distinct from the data bank, else the
    /// portion below the data-reserve tail.
    #[must_use]
    fn code_region(&self) -> (Address, u64) {
        let bank = self.code_bank();
        if self.code_bank == self.data_bank {
            (bank.base, bank.size - self.data_reserve)
        } else {
            (bank.base, bank.size)
        }
    }

    #[must_use]
    fn data_region(&self) -> (Address, u64) {
        let bank = self.data_bank();
        if self.code_bank == self.data_bank {
            (bank.base.wrapping_add(bank.size - self.data_reserve), self.data_reserve)
        } else {
            (bank.base, bank.size)
        }
    }

    #[must_use]
    pub fn data_region_base(&self) -> Address {
        self.data_region().0
    }

    /// Reserves a window for the end sequence and records it as the exit
    /// address (spec §4.3's exit-region ownership). Caller chooses `addr`
    /// honoring (a)-(d) of spec §4.3; this only performs the reservation.
    pub fn reserve_exit_region(&mut self, addr: Address) -> GenResult<()> {
        let (region_base, region_size) = self.code_region();
        if !addr.in_range(region_base.value(), region_size) {
            return Err(GenError::ConfigError("exit address outside code region".into()));
        }
        if self.placements.overlaps(addr, END_SEQUENCE_BYTES) {
            return Err(GenError::PlacementConflict(addr));
        }
        self.exit_addr = addr;
        for i in 0..(END_SEQUENCE_BYTES / 4) {
            self.placements.insert(addr.wrapping_add(i * 4), Cell::Reserved);
        }
        Ok(())
    }

    #[must_use]
    pub fn exit_address(&self) -> Address {
        self.exit_addr
    }

    #[must_use]
    pub fn in_exit_region(&self, addr: Address) -> bool {
        addr.in_range(self.exit_addr.value(), END_SEQUENCE_BYTES)
    }

    /// Returns the next free, aligned address in the code region and marks
    /// it `Reserved`, advancing the allocation cursor past it.
    pub fn allocate_code(&mut self, n_bytes: u64, alignment: u64) -> GenResult<Address> {
        let (region_base, region_size) = self.code_region();
        let mut addr = region_base.wrapping_add(self.code_cursor).align_up(alignment);
        loop {
            if addr.value() + n_bytes > region_base.value() + region_size {
                return Err(GenError::OutOfSpace("code region exhausted".into()));
            }
            if self.placements.is_free(addr) || self.placements.is_reserved(addr) {
                break;
            }
            addr = addr.wrapping_add(alignment.max(4));
        }
        self.code_cursor = addr.value() - region_base.value() + n_bytes;
        self.placements.insert(addr, Cell::Reserved);
        Ok(addr)
    }

    /// Bytes still free between the allocation cursor and the end of the
    /// code region; used by the engine to decide when to splice a relocate
    /// sequence (spec §4.7 body step 3).
    #[must_use]
    pub fn code_remaining(&self) -> u64 {
        let (_, size) = self.code_region();
        size.saturating_sub(self.code_cursor)
    }

    /// True if the code region containing `addr` still extends at least
    /// `len` bytes past it, i.e. placing an instruction of that length at
    /// `addr` would not run off the end of the region (spec §4.7 body step
    /// 3's relocate-splice check). Independent of `code_remaining`'s cursor:
    /// the current PC walks the region on its own, not through
    /// `allocate_code`.
    #[must_use]
    pub fn code_region_has_room(&self, addr: Address, len: u64) -> bool {
        let (region_base, region_size) = self.code_region();
        addr.value() >= region_base.value() && addr.value() + len <= region_base.value() + region_size
    }

    pub fn allocate_data(&mut self, n_bytes: u64, alignment: u64) -> GenResult<Address> {
        let (region_base, region_size) = self.data_region();
        let addr = region_base.wrapping_add(self.data_cursor).align_up(alignment);
        let end = addr.value() + n_bytes;
        if end > region_base.value() + region_size {
            return Err(GenError::OutOfSpace("data region exhausted".into()));
        }
        self.data_cursor = end - region_base.value();
        Ok(addr)
    }

    /// Encodes and places `form`/`operands` at `addr`. `addr` must be free
    /// or `Reserved` (spec §4.3); the enclosing bank must permit execute.
    /// Any statically computable branch/jump target is registered as
    /// `Reserved` so the placement invariant (spec §3, last bullet) holds.
    pub fn place_instruction(&mut self, addr: Address, form: Form, operands: Operands) -> GenResult<()> {
        let bank = self.bank_for(addr).ok_or(GenError::PlacementConflict(addr))?;
        if !bank.access.allows_execute() {
            return Err(GenError::PlacementConflict(addr));
        }
        if !self.placements.is_free(addr) && !self.placements.is_reserved(addr) {
            return Err(GenError::PlacementConflict(addr));
        }
        let encoded = crate::isa::encode::encode(form, &operands);
        if let Some(target) = crate::isa::classify::static_branch_target(form, &operands, addr.value()) {
            self.reserve(Address::new(target))?;
        }
        self.placements.insert(addr, Cell::Instruction { form, operands, encoded });
        Ok(())
    }

    /// Places raw bytes in a data-capable bank (spec §4.3 `place_data`) and
    /// seeds the runtime byte store with them so a later functional load
    /// sees the data immediately, before any functional store to it.
    pub fn place_data(&mut self, addr: Address, bytes: Vec<u8>) -> GenResult<()> {
        let bank = self.bank_for(addr).ok_or(GenError::PlacementConflict(addr))?;
        if !bank.access.allows_write() && !bank.data {
            return Err(GenError::PlacementConflict(addr));
        }
        if self.placements.overlaps(addr, bytes.len() as u64) {
            return Err(GenError::PlacementConflict(addr));
        }
        for (i, byte) in bytes.iter().enumerate() {
            self.runtime.insert(addr.value() + i as u64, *byte);
        }
        self.placements.insert(addr, Cell::Data(bytes));
        Ok(())
    }

    /// Marks `addr` as a future branch/jump target that must be filled
    /// before the engine terminates (spec §4.3 "registers any branch/jump
    /// target...").
    ///
    /// If `addr` already holds an `Instruction` other than the one that will
    /// eventually be placed there, this is a branch landing in the middle of
    /// already-generated code — legal per spec §9's open question, but
    /// surprising enough to warrant a warning rather than silent success.
    pub fn reserve(&mut self, addr: Address) -> GenResult<()> {
        match self.placements.get(addr) {
            Some(Cell::Instruction { .. }) => {
                log::warn!("reserve: {addr} already holds a placed instruction; branch target lands mid-stream");
            }
            _ if self.placements.is_free(addr) => {
                self.placements.insert(addr, Cell::Reserved);
            }
            _ => {}
        }
        Ok(())
    }

    #[must_use]
    pub fn is_placed(&self, addr: Address) -> bool {
        self.placements.is_placed(addr)
    }

    /// The form and operands placed at `addr`, if any (the Execution Model
    /// uses this instead of decoding `fetch`'s raw bytes back — the
    /// generator always knows what it placed, so there is no decoder in
    /// this catalog, only `encode`).
    #[must_use]
    pub fn instruction_at(&self, addr: Address) -> Option<(Form, Operands)> {
        match self.placements.get(addr) {
            Some(Cell::Instruction { form, operands, .. }) => Some((*form, *operands)),
            _ => None,
        }
    }

    #[must_use]
    pub fn free_code_address(&self, addr: Address) -> bool {
        self.placements.is_free(addr)
    }

    #[must_use]
    pub fn placements(&self) -> &PlacementMap {
        &self.placements
    }

    fn bank_for(&self, addr: Address) -> Option<&Bank> {
        self.banks.iter().find(|b| b.contains(addr))
    }
}

impl MemoryAccess for MemoryStore {
    fn fetch(&self, addr: Address) -> Result<u32, Trap> {
        match self.placements.get(addr) {
            Some(Cell::Instruction { encoded, .. }) => Ok(u32::from_le_bytes(*encoded)),
            _ => Err(Trap::FetchMiss(addr)),
        }
    }

    fn read(&self, addr: Address, len: u8) -> Result<u64, Trap> {
        let bank = self.bank_for(addr).ok_or(Trap::LoadAccessFault(addr))?;
        if !bank.access.allows_read() {
            return Err(Trap::LoadAccessFault(addr));
        }
        let mut buf = [0u8; 8];
        for i in 0..u64::from(len) {
            buf[i as usize] = *self.runtime.get(&(addr.value() + i)).unwrap_or(&0);
        }
        Ok(u64::from_le_bytes(buf))
    }

    fn write(&mut self, addr: Address, len: u8, value: u64) -> Result<(), Trap> {
        let bank = self.bank_for(addr).ok_or(Trap::StoreAccessFault(addr))?;
        if !bank.access.allows_write() {
            return Err(Trap::StoreAccessFault(addr));
        }
        let bytes = value.to_le_bytes();
        for i in 0..usize::from(len) {
            self.runtime.insert(addr.value() + i as u64, bytes[i]);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::config::MemoryConfig;

    fn store() -> MemoryStore {
        MemoryStore::new(&MemoryConfig::default_layout()).unwrap()
    }

    #[test]
    fn allocate_code_then_place_round_trips_through_fetch() {
        let mut store = store();
        let addr = store.allocate_code(4, 4).unwrap();
        store.place_instruction(addr, Form::Addi, Operands::i(1, 0, 5)).unwrap();
        assert!(store.is_placed(addr));
        let word = store.fetch(addr).unwrap();
        assert_eq!(word & 0x7F, 0b001_0011);
    }

    #[test]
    fn data_blob_seeds_runtime_store_for_immediate_read() {
        let mut store = store();
        let addr = store.allocate_data(8, 8).unwrap();
        store.place_data(addr, vec![1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let value = MemoryAccess::read(&store, addr, 8).unwrap();
        assert_eq!(value, u64::from_le_bytes([1, 2, 3, 4, 5, 6, 7, 8]));
    }

    #[test]
    fn functional_store_does_not_retroactively_edit_placement() {
        let mut store = store();
        let addr = store.allocate_data(8, 8).unwrap();
        store.place_data(addr, vec![0; 8]).unwrap();
        MemoryAccess::write(&mut store, addr, 4, 0xDEAD_BEEF).unwrap();
        if let Some(Cell::Data(bytes)) = store.placements().get(addr) {
            assert_eq!(bytes, &vec![0u8; 8]);
        } else {
            panic!("expected data cell");
        }
        let value = MemoryAccess::read(&store, addr, 4).unwrap();
        assert_eq!(value, 0xDEAD_BEEF);
    }

    #[test]
    fn fetch_of_unplaced_address_faults() {
        let store = store();
        assert!(matches!(store.fetch(Address::new(0x8000_0000)), Err(Trap::FetchMiss(_))));
    }

    #[test]
    fn exit_region_reservation_rejects_overlap_with_existing_placement() {
        let mut store = store();
        let addr = store.allocate_code(4, 4).unwrap();
        store.place_instruction(addr, Form::Addi, Operands::i(1, 0, 0)).unwrap();
        assert!(store.reserve_exit_region(addr).is_err());
    }

    #[test]
    fn reserving_an_already_placed_instruction_is_legal_and_leaves_it_untouched() {
        let mut store = store();
        let addr = store.allocate_code(4, 4).unwrap();
        store.place_instruction(addr, Form::Addi, Operands::i(1, 0, 9)).unwrap();
        assert!(store.reserve(addr).is_ok());
        assert!(matches!(store.placements().get(addr), Some(Cell::Instruction { .. })));
    }
}
