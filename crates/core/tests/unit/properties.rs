//! Quantified invariants over a finished generation run (spec §8
//! "Testable properties").

use tibbar_core::common::rng;
use tibbar_core::emit::render_assembly;
use tibbar_core::gen::data::GenData;
use tibbar_core::gen::funnel::{Funnel, RoundRobinFunnel};
use tibbar_core::gen::sequence::Sequence;
use tibbar_core::gen::sequences::{LoadException, RandomSafeInstrs};
use tibbar_core::isa::classify;
use tibbar_core::memory::{Cell, MemoryConfig};
use tibbar_core::resource::Reserver;
use tibbar_core::Address;

use crate::common::run;

/// For every pair of distinct placements, their byte ranges are disjoint.
#[test]
fn placement_disjointness_holds_across_a_full_run() {
    for generator in ["simple", "ldst", "hazard", "branch"] {
        let store = run(generator, 5, None);
        let cells: Vec<(u64, u64)> = store
            .placements()
            .iter()
            .filter(|(_, cell)| cell.len() > 0)
            .map(|(addr, cell)| (addr.value(), cell.len()))
            .collect();

        for (i, &(a_start, a_len)) in cells.iter().enumerate() {
            for &(b_start, b_len) in &cells[i + 1..] {
                let disjoint = a_start + a_len <= b_start || b_start + b_len <= a_start;
                assert!(disjoint, "{generator}: placements at {a_start:#x} and {b_start:#x} overlap");
            }
        }
    }
}

/// Every instruction placement sits in an executable bank; every data
/// placement sits in a bank that permits read (and write, since every data
/// blob this generator emits is also later written to by a `Store`
/// sequence's functional writes are runtime-only and never re-placed).
#[test]
fn access_conformance_holds_across_a_full_run() {
    for generator in ["simple", "ldst", "hazard"] {
        let store = run(generator, 9, None);
        for (addr, cell) in store.placements().iter() {
            let bank = store.banks().iter().find(|b| b.contains(addr)).expect("placement inside some bank");
            match cell {
                Cell::Instruction { .. } => {
                    assert!(bank.access.allows_execute(), "{generator}: instruction at {addr} in non-executable bank");
                }
                Cell::Data(_) => {
                    assert!(bank.access.allows_read(), "{generator}: data at {addr} in non-readable bank");
                }
                Cell::Reserved => {}
            }
        }
    }
}

/// Every statically computable branch/jump target in a placed instruction is
/// itself placed with an instruction by the time generation ends.
#[test]
fn target_coverage_holds_across_a_full_run() {
    for generator in ["branch", "simple", "hazard"] {
        let store = run(generator, 3, None);
        for (addr, cell) in store.placements().iter() {
            if let Cell::Instruction { form, operands, .. } = cell {
                if let Some(target) = classify::static_branch_target(*form, operands, addr.value()) {
                    assert!(
                        store.is_placed(Address::new(target)),
                        "{generator}: branch at {addr} targets {target:#x}, which was never placed"
                    );
                }
            }
        }
    }
}

/// Exit is never the zero address, never coincides with boot, and the exit
/// region holds a genuine self-branch (a `Beq` whose static target is its
/// own address).
#[test]
fn exit_uniqueness_and_self_branch_hold_across_a_full_run() {
    for generator in ["simple", "ldst", "branch"] {
        let store = run(generator, 21, None);
        let exit = store.exit_address();
        assert_ne!(exit, Address::new(0));
        assert_ne!(exit, store.boot_address());

        let mut saw_self_branch = false;
        for (addr, cell) in store.placements().iter() {
            if !store.in_exit_region(addr) {
                continue;
            }
            if let Cell::Instruction { form, operands, .. } = cell {
                if let Some(target) = classify::static_branch_target(*form, operands, addr.value()) {
                    if target == addr.value() {
                        saw_self_branch = true;
                    }
                }
            }
        }
        assert!(saw_self_branch, "{generator}: no self-branch found in the exit region");
    }
}

/// Two runs with the same generator, seed, and config produce byte-identical
/// assembly output.
#[test]
fn determinism_same_seed_same_generator_same_config_is_byte_identical() {
    for generator in ["simple", "ldst", "ldst_exception", "hazard", "branch", "float"] {
        let a = render_assembly(&run(generator, 77, None));
        let b = render_assembly(&run(generator, 77, None));
        assert_eq!(a, b, "{generator}: two runs with the same seed diverged");
    }
}

/// A `RoundRobinFunnel` with two non-conflicting sequences, each yielding
/// exactly `K` items, advances both sequences exactly once per round: after
/// `n` rounds both have been advanced exactly `n` times, never `n` and
/// `n + 1`.
#[test]
fn round_robin_fairness_advances_each_child_in_lockstep() {
    let config = MemoryConfig::default_layout();
    let store = tibbar_core::MemoryStore::new(&config).unwrap();
    let mut reserver = Reserver::new(32, 0, &[]);

    let k = 6;
    let a = Sequence::RandomSafeInstrs(RandomSafeInstrs::new(k));
    let b = Sequence::RandomSafeInstrs(RandomSafeInstrs::new(k));
    let mut funnel = RoundRobinFunnel::new(vec![("a", a, rng::stream(1, 1)), ("b", b, rng::stream(1, 2))]);

    let pc = store.code_bank().base;
    let mut a_count = 0;
    let mut b_count = 0;
    let mut round = 0;
    loop {
        let before_a = a_count;
        let before_b = b_count;
        match funnel.next(&mut reserver, &store, pc) {
            Some(GenData::Instr(..)) if round % 2 == 0 => a_count += 1,
            Some(GenData::Instr(..)) => b_count += 1,
            Some(_) => {}
            None => break,
        }
        round += 1;
        assert!(a_count.abs_diff(b_count) <= 1, "children drifted out of lockstep: a={a_count} b={b_count}");
        let _ = (before_a, before_b);
    }
    assert_eq!(a_count, k as u64, "child a did not yield all {k} items");
    assert_eq!(b_count, k as u64, "child b did not yield all {k} items");
}

/// A funnel child that can never obtain its claim (the sole reservable GPR
/// is held exclusively by another live child) contributes nothing to the
/// output and does not perturb the other child's progress.
#[test]
fn reservation_exclusivity_blocks_a_second_claimant_for_the_whole_run() {
    let config = MemoryConfig::default_layout();
    let store = tibbar_core::MemoryStore::new(&config).unwrap();
    let mut reserver = Reserver::new(2, 0, &[]);
    let pre_held = reserver
        .request(&tibbar_core::resource::ClaimSpec::new().with_exclusive(tibbar_core::resource::ClaimItem::Exact(
            tibbar_core::resource::Resource::gpr(1),
        )))
        .unwrap()
        .expect("the only GPR is free at the start");

    let blocked = Sequence::LoadException(LoadException::new(3));
    let mut funnel = RoundRobinFunnel::new(vec![("blocked", blocked, rng::stream(1, 1))]);
    let pc = store.code_bank().base;

    for _ in 0..8 {
        assert!(funnel.next(&mut reserver, &store, pc).is_none(), "child produced an item without its claim");
    }

    reserver.release(&pre_held);
    assert!(funnel.next(&mut reserver, &store, pc).is_some(), "child should proceed once the GPR is released");
}
