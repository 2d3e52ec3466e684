//! The top-level Engine (spec §4.7): setup, prologue, body, epilogue, emit.
//! Owns nothing across calls — `Engine::generate` builds the catalog, the
//! Memory Store, the Reserver, and the Execution Model locally and drives
//! them through one run, returning the finished `MemoryStore` for the
//! emitter. This sidesteps the cyclic ownership the model and the engine
//! would otherwise have (spec §9 "Cyclic relationship between engine and
//! model") by never letting the model outlive the function that built its
//! catalog.

use crate::common::{Address, GenError, GenResult};
use crate::isa::{csr, Catalog, RvCatalog};
use crate::memory::{MemoryConfig, MemoryStore};
use crate::model::ExecutionModel;
use crate::resource::Reserver;

use super::data::GenData;
use super::funnel::{Funnel, SimpleFunnel};
use super::sequences::DefaultRelocate;
use super::sequence::Sequence;

/// Stream tag reserved for the engine's own boot/exit address randomization.
/// Suite-assigned sequence streams (spec §5) start numbering above this
/// reserved block; see `gen::suite`.
const ENGINE_RNG_TAG: u64 = 0;
const PROGRAM_START_TAG: u64 = 1;
const PROGRAM_END_TAG: u64 = 2;
const RELOCATE_TAG_BASE: u64 = 3;

/// Every base-ISA instruction this catalog encodes is 4 bytes; no RVC output
/// (see DESIGN.md).
const INSTR_BYTES: u64 = 4;

fn default_max_instructions() -> u64 {
    50_000
}

fn default_max_code_bytes() -> u64 {
    u64::MAX
}

/// Per-run ceilings and the seed (spec §4.7 "a generator honors two limits").
#[derive(Clone, Debug)]
pub struct RunParams {
    pub seed: u64,
    pub max_instructions: u64,
    pub max_code_bytes: u64,
}

impl RunParams {
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            max_instructions: default_max_instructions(),
            max_code_bytes: default_max_code_bytes(),
        }
    }

    #[must_use]
    pub fn with_max_instructions(mut self, max: u64) -> Self {
        self.max_instructions = max;
        self
    }

    #[must_use]
    pub fn with_max_code_bytes(mut self, max: u64) -> Self {
        self.max_code_bytes = max;
        self
    }
}

/// The Engine itself carries no state between runs; `generate` is the whole
/// interface (spec §4.7).
pub struct Engine;

impl Engine {
    /// Runs one full generation: setup, prologue, body, epilogue, and
    /// returns the populated `MemoryStore` ready for `emit`.
    pub fn generate(config: &MemoryConfig, params: &RunParams, mut main_funnel: Box<dyn Funnel>) -> GenResult<MemoryStore> {
        let mut store = MemoryStore::new(config)?;
        let catalog = RvCatalog::new();
        let mut reserver = Reserver::new(32, 32, csr::WRITABLE);

        let region_base = store.code_bank().base;
        let region_size = store.code_remaining();
        let mut engine_rng = crate::common::rng::stream(params.seed, ENGINE_RNG_TAG);

        let boot = choose_boot(region_base, region_size, config.memory.boot, &mut engine_rng);
        let exit = choose_exit(region_base, region_size, boot, &mut engine_rng);
        store.reserve_exit_region(exit)?;
        store.set_boot_address(boot);

        log::info!("engine: boot={boot} exit={exit}");

        let mut model = ExecutionModel::new(boot, &catalog);

        let mut start_funnel = SimpleFunnel::new(vec![(
            "program-start",
            Sequence::DefaultProgramStart(super::sequences::DefaultProgramStart::new()),
            crate::common::rng::stream(params.seed, PROGRAM_START_TAG),
        )]);
        drain_phase(&mut start_funnel, &mut reserver, &mut store, &mut model)?;

        run_body(main_funnel.as_mut(), &mut reserver, &mut store, &mut model, params)?;

        let mut end_funnel = SimpleFunnel::new(vec![(
            "program-end",
            Sequence::DefaultProgramEnd(super::sequences::DefaultProgramEnd::new()),
            crate::common::rng::stream(params.seed, PROGRAM_END_TAG),
        )]);
        drain_phase(&mut end_funnel, &mut reserver, &mut store, &mut model)?;

        check_no_unplaced_targets(&store)?;

        Ok(store)
    }
}

/// Picks the boot address: the configured offset if given, else a random
/// 4-aligned offset in the lower half of the code region (spec §4.7 setup
/// "respecting any configured offset, else randomize").
fn choose_boot(region_base: Address, region_size: u64, configured_offset: Option<u64>, rng: &mut rand_chacha::ChaCha8Rng) -> Address {
    use rand::Rng;
    let offset = match configured_offset {
        Some(off) => off,
        None => {
            let half = (region_size / 2).max(4);
            rng.gen_range(0..half) & !0x3
        }
    };
    region_base.wrapping_add(offset)
}

/// Picks the exit address roughly half the code region away from `boot`, so
/// the prologue and epilogue never contend for the same bytes, with enough
/// room before the region's end for the end sequence.
fn choose_exit(region_base: Address, region_size: u64, boot: Address, rng: &mut rand_chacha::ChaCha8Rng) -> Address {
    use rand::Rng;
    const END_SEQUENCE_BYTES: u64 = 16;
    let usable = region_size.saturating_sub(END_SEQUENCE_BYTES).max(4);
    let jitter = rng.gen_range(0..usable.min(region_size / 4).max(4)) & !0x3;
    let half = region_size / 2;
    let offset = (boot.value() - region_base.value() + half + jitter) % usable;
    region_base.wrapping_add(offset & !0x3)
}

/// Drains `funnel` to exhaustion starting at the model's current PC,
/// stepping over every instruction it places (used for the prologue and
/// epilogue, spec §4.7 steps 2 and 4).
fn drain_phase(funnel: &mut dyn Funnel, reserver: &mut Reserver, store: &mut MemoryStore, model: &mut ExecutionModel<'_>) -> GenResult<()> {
    loop {
        let pc = model.pc();
        if store.is_placed(pc) {
            model.step(store);
            continue;
        }
        match funnel.next(reserver, store, pc) {
            Some(GenData::Instr(form, ops)) => store.place_instruction(pc, form, ops)?,
            Some(GenData::DataBlob { bytes, alignment, purpose }) => {
                let addr = store.allocate_data(bytes.len() as u64, alignment)?;
                store.place_data(addr, bytes)?;
                log::debug!("engine: placed data blob '{purpose}' at {addr}");
                funnel.notify_placed(addr);
            }
            Some(GenData::Reserve(addr)) => store.reserve(addr)?,
            None => return Ok(()),
        }
    }
}

/// The main generation loop (spec §4.7 step 3): interleaves the main
/// funnel's output with the Execution Model's forward stepping, splicing in
/// a relocate sequence when the code region runs low and driving to the
/// exit address when a ceiling is hit or the funnel runs dry.
fn run_body(
    main_funnel: &mut dyn Funnel,
    reserver: &mut Reserver,
    store: &mut MemoryStore,
    model: &mut ExecutionModel<'_>,
    params: &RunParams,
) -> GenResult<()> {
    let mut instructions = 0u64;
    let mut code_bytes = 0u64;
    let mut relocate_tag = RELOCATE_TAG_BASE;
    let mut relocate: Option<SimpleFunnel> = None;

    loop {
        let pc = model.pc();
        if store.in_exit_region(pc) {
            return Ok(());
        }

        if relocate.is_none() {
            if instructions >= params.max_instructions || code_bytes >= params.max_code_bytes {
                log::info!("engine: ceiling reached ({instructions} instrs, {code_bytes} code bytes), driving to exit");
                relocate = Some(splice_to(store.exit_address(), params.seed, &mut relocate_tag));
            } else if !store.code_region_has_room(pc, INSTR_BYTES) {
                let target = store.allocate_code(INSTR_BYTES, INSTR_BYTES).map_err(|_| {
                    GenError::OutOfSpace("code region exhausted while splicing a relocate sequence".into())
                })?;
                log::debug!("engine: code region boundary at {pc}, relocating to {target}");
                relocate = Some(splice_to(target, params.seed, &mut relocate_tag));
            }
        }

        let outcome = match relocate.as_mut() {
            Some(rf) => rf.next(reserver, store, pc),
            None => main_funnel.next(reserver, store, pc),
        };

        match outcome {
            Some(GenData::Instr(form, ops)) => {
                store.place_instruction(pc, form, ops)?;
                code_bytes += INSTR_BYTES;
            }
            Some(GenData::DataBlob { bytes, alignment, purpose }) => {
                let addr = store.allocate_data(bytes.len() as u64, alignment)?;
                store.place_data(addr, bytes)?;
                log::debug!("engine: placed data blob '{purpose}' at {addr}");
                match relocate.as_mut() {
                    Some(rf) => rf.notify_placed(addr),
                    None => main_funnel.notify_placed(addr),
                }
            }
            Some(GenData::Reserve(addr)) => store.reserve(addr)?,
            None => {
                if relocate.is_some() {
                    relocate = None;
                } else {
                    log::info!("engine: main funnel exhausted, driving to exit");
                    relocate = Some(splice_to(store.exit_address(), params.seed, &mut relocate_tag));
                }
            }
        }

        if store.is_placed(model.pc()) {
            model.step(store);
            instructions += 1;
        }
    }
}

fn splice_to(target: Address, seed: u64, tag: &mut u64) -> SimpleFunnel {
    let rng = crate::common::rng::stream(seed, *tag);
    *tag += 1;
    SimpleFunnel::new(vec![("relocate", Sequence::DefaultRelocate(DefaultRelocate::new(target)), rng)])
}

/// Fatal if any branch/jump target was reserved but never filled in by the
/// time generation ended (spec §7 `UnplacedTarget`).
fn check_no_unplaced_targets(store: &MemoryStore) -> GenResult<()> {
    for (addr, cell) in store.placements().iter() {
        if matches!(cell, crate::memory::Cell::Reserved) {
            return Err(GenError::UnplacedTarget(addr));
        }
    }
    Ok(())
}
