//! The emitter (spec §4 "Emitter (external)", §6 "Outputs"): converts a
//! finished `MemoryStore` into the two external artifacts a run produces —
//! the assembly text file the toolchain assembles, and an optional debug
//! YAML describing the run. Neither the assembly grammar nor the YAML shape
//! is part of the generation engine's own data model; this module is the
//! thin, swappable boundary the spec calls out as an external collaborator,
//! kept in-tree because the engine has nothing else to hand its output to.

pub mod asm;
pub mod debug;

pub use asm::render_assembly;
pub use debug::DebugDump;
