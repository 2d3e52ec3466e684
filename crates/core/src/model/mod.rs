//! The Execution Model (spec §4.4): a purely functional interpreter over
//! `ExecutionState` and the Memory Store. Owned by the Engine; sequences
//! only ever see it through a read-only reference (spec §9 "Cyclic
//! relationship between engine and model").

use crate::common::Address;
use crate::isa::{Catalog, ExecutionState};
use crate::memory::MemoryStore;

/// Wraps `ExecutionState` with the trap-handler address the Engine
/// configured at setup, and the catalog used to step.
pub struct ExecutionModel<'c> {
    pub state: ExecutionState,
    catalog: &'c dyn Catalog,
    trap_handler: Address,
}

impl<'c> ExecutionModel<'c> {
    #[must_use]
    pub fn new(boot: Address, catalog: &'c dyn Catalog) -> Self {
        Self {
            state: ExecutionState::new(boot),
            catalog,
            trap_handler: boot,
        }
    }

    pub fn set_trap_handler(&mut self, addr: Address) {
        self.trap_handler = addr;
    }

    #[must_use]
    pub fn pc(&self) -> Address {
        self.state.pc
    }

    /// Executes the instruction placed at `pc` against `store` and advances
    /// `pc`. On a trap (including the instruction at `pc` never having been
    /// placed), redirects `pc` to the configured trap handler and records
    /// the trap on `state.trap_pending` rather than propagating it as an
    /// error: a trap is modeled control flow, not an engine failure (spec
    /// §4.4, §7).
    pub fn step(&mut self, store: &mut MemoryStore) {
        let pc = self.state.pc;
        let trap = match store.instruction_at(pc) {
            Some((form, ops)) => self.catalog.step(form, &ops, &mut self.state, store),
            None => Some(crate::common::Trap::FetchMiss(pc)),
        };

        self.state.trap_pending = trap;
        if trap.is_some() {
            self.state.pc = self.trap_handler;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::{Form, Operands, RvCatalog};
    use crate::memory::MemoryConfig;

    #[test]
    fn fetch_miss_redirects_to_trap_handler() {
        let catalog = RvCatalog::new();
        let mut store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
        let handler = Address::new(0x8000_1000);
        let mut model = ExecutionModel::new(Address::new(0x8000_0000), &catalog);
        model.set_trap_handler(handler);
        model.step(&mut store);
        assert_eq!(model.pc(), handler);
        assert!(model.state.trap_pending.is_some());
    }

    #[test]
    fn placed_instruction_steps_and_updates_gpr() {
        let catalog = RvCatalog::new();
        let mut store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
        let addr = store.allocate_code(4, 4).unwrap();
        store.place_instruction(addr, Form::Addi, Operands::i(1, 0, 7)).unwrap();
        let mut model = ExecutionModel::new(addr, &catalog);
        model.step(&mut store);
        assert_eq!(model.state.gpr(1), 7);
        assert!(model.state.trap_pending.is_none());
    }
}
