//! Shared test harness: runs a registered generator end-to-end and replays
//! the result through a fresh `ExecutionModel`, the way a testbench would.

use tibbar_core::gen::engine::RunParams;
use tibbar_core::gen::suite;
use tibbar_core::isa::RvCatalog;
use tibbar_core::memory::MemoryConfig;
use tibbar_core::model::ExecutionModel;
use tibbar_core::{Address, Engine, MemoryStore};

/// Runs `generator` to completion against `config` (or the built-in default
/// layout) and returns the finished store.
pub fn run(generator: &str, seed: u64, config: Option<&MemoryConfig>) -> MemoryStore {
    let owned;
    let config = match config {
        Some(c) => c,
        None => {
            owned = MemoryConfig::default_layout();
            &owned
        }
    };
    let params = RunParams::new(seed);
    let funnel = suite::build(generator, seed).expect("generator name is registered");
    Engine::generate(config, &params, funnel).expect("generation run succeeds")
}

/// Steps a fresh `ExecutionModel` from `store`'s boot address until it
/// reaches `target` or `ceiling` steps elapse, returning whether `target`
/// was reached.
pub fn drive_to(store: &mut MemoryStore, target: Address, ceiling: u64) -> bool {
    let catalog = RvCatalog::new();
    let mut model = ExecutionModel::new(store.boot_address(), &catalog);
    for _ in 0..ceiling {
        if model.pc() == target {
            return true;
        }
        model.step(store);
    }
    model.pc() == target
}
