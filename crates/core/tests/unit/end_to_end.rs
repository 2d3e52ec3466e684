//! End-to-end scenarios, one per registered generator suite.

use tibbar_core::emit::render_assembly;
use tibbar_core::isa::{classify, RvCatalog};
use tibbar_core::memory::Cell;
use tibbar_core::model::ExecutionModel;
use tibbar_core::resource::Namespace;
use tibbar_core::Address;

use crate::common::{drive_to, run};

/// Scenario 1: `simple`, seed 42, default config. Boot and exit both inside
/// `[0x80000000, 0x80040000)`, exit nonzero, a distinct data region at
/// `0x80040000`, and the Execution Model reaches `exit` from `boot` within
/// the instruction ceiling.
#[test]
fn scenario1_simple_default_config_reaches_exit_with_a_distinct_data_region() {
    let mut store = run("simple", 42, None);

    let boot = store.boot_address();
    let exit = store.exit_address();
    assert!(boot.in_range(0x8000_0000, 0x4_0000));
    assert!(exit.in_range(0x8000_0000, 0x4_0000));
    assert_ne!(exit, Address::new(0));

    let text = render_assembly(&store);
    assert!(text.contains("# Data region: 0x0000000080040000"));

    assert!(drive_to(&mut store, exit, 50_000), "model never reached exit from boot");
}

/// Scenario 2: `ldst`, seed 1. Every load/store materializes its base
/// register from a data-blob address via `lui`+`addi` immediately before the
/// memory op, so every effective address the model computes lands in the
/// data bank.
#[test]
fn scenario2_ldst_addresses_all_land_in_the_data_region() {
    let mut store = run("ldst", 1, None);
    let exit = store.exit_address();
    let data_bank = store.data_bank().clone();

    let catalog = RvCatalog::new();
    let mut model = ExecutionModel::new(store.boot_address(), &catalog);

    let mut saw_load_or_store = false;
    for _ in 0..50_000 {
        let pc = model.pc();
        if pc == exit {
            break;
        }
        if let Some((form, ops)) = store.instruction_at(pc) {
            if classify::is_load(form) || classify::is_store(form) {
                let base = model.state.gpr(ops.rs1);
                let effective = base.wrapping_add(ops.imm as u64);
                assert!(
                    Address::new(effective).in_range(data_bank.base.value(), data_bank.size),
                    "ldst address {effective:#x} escaped the data region"
                );
                saw_load_or_store = true;
            }
        }
        model.step(&mut store);
    }
    assert!(saw_load_or_store, "ldst generator placed no load or store");
}

/// Scenario 3: `ldst_exception`, seed 7. At least one placed load uses
/// `GPR 0` as base with a nonzero offset into an address no bank maps, and
/// the trap handler (the boot address, per `DefaultProgramStart`'s `mtvec`
/// wiring) is itself placed code.
#[test]
fn scenario3_ldst_exception_has_a_faulting_load_and_a_placed_handler() {
    let store = run("ldst_exception", 7, None);
    assert!(store.is_placed(store.boot_address()), "trap handler region was never placed");

    let mut saw_faulting_load = false;
    for (_, cell) in store.placements().iter() {
        if let Cell::Instruction { form, operands, .. } = cell {
            if classify::is_load(*form) && operands.rs1 == 0 && operands.imm != 0 {
                saw_faulting_load = true;
            }
        }
    }
    assert!(saw_faulting_load, "no GPR0-based load with a nonzero offset was placed");
}

/// Scenario 4: `hazard`, seed 3. At least one adjacent instruction pair has
/// the second instruction reading the GPR the first just wrote.
#[test]
fn scenario4_hazard_has_an_adjacent_write_then_read_pair() {
    let store = run("hazard", 3, None);

    let instructions: Vec<(Address, tibbar_core::isa::Form, tibbar_core::isa::Operands)> = store
        .placements()
        .iter()
        .filter_map(|(addr, cell)| match cell {
            Cell::Instruction { form, operands, .. } => Some((addr, *form, *operands)),
            _ => None,
        })
        .collect();

    let mut found_hazard = false;
    for window in instructions.windows(2) {
        let (addr_a, form_a, ops_a) = window[0];
        let (addr_b, _, ops_b) = window[1];
        if addr_b.value() != addr_a.value() + 4 {
            continue;
        }
        let writes = classify::writes(form_a, &ops_a);
        if writes.iter().any(|r| r.namespace == Namespace::Gpr && r.id == ops_b.rs1 as u32) {
            found_hazard = true;
            break;
        }
    }
    assert!(found_hazard, "no adjacent write-then-read hazard pair was placed");
}

/// Scenario 5: two sequences contending for a single-GPR universe — only one
/// can hold the resource at a time, so their items never interleave.
#[test]
fn scenario5_round_robin_funnel_serializes_contending_sequences() {
    use tibbar_core::common::rng;
    use tibbar_core::gen::funnel::{Funnel, RoundRobinFunnel};
    use tibbar_core::gen::sequence::Sequence;
    use tibbar_core::gen::sequences::LoadException;
    use tibbar_core::memory::MemoryConfig;
    use tibbar_core::resource::Reserver;
    use tibbar_core::MemoryStore;

    let mut store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
    let mut reserver = Reserver::new(2, 0, &[]);

    let a = Sequence::LoadException(LoadException::new(5));
    let b = Sequence::LoadException(LoadException::new(5));
    let mut funnel = RoundRobinFunnel::new(vec![("a", a, rng::stream(1, 1)), ("b", b, rng::stream(1, 2))]);

    let pc = store.code_bank().base;
    let mut placed: u64 = 0;
    while let Some(item) = funnel.next(&mut reserver, &store, pc) {
        if let tibbar_core::gen::data::GenData::Instr(form, ops) = item {
            store.place_instruction(pc.wrapping_add(placed * 4), form, ops).unwrap();
            placed += 1;
        }
    }
    assert_eq!(placed, 10, "both sequences should eventually drain once the sole GPR is released");
}

/// Scenario 6: a single unified `rwx` bank with `memory.boot: 0` — boot
/// equals the bank's base and no `# Data region:` line appears.
#[test]
fn scenario6_unified_bank_with_explicit_boot_offset() {
    let yaml = "banks:\n  - name: ram\n    base: 0x80000000\n    size: 0x80000\n    code: true\n    data: true\n    access: rwx\nmemory:\n  boot: 0\n";
    let config = tibbar_core::memory::MemoryConfig::from_yaml(yaml).unwrap();
    let store = run("simple", 11, Some(&config));

    assert_eq!(store.boot_address(), Address::new(0x8000_0000));
    let text = render_assembly(&store);
    assert!(!text.contains("# Data region:"));
}
