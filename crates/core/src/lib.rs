//! Directed-random RISC-V instruction-stream generation library.
//!
//! This crate implements a generation engine that emits self-contained
//! bare-metal RISC-V test programs, with the following pieces:
//! 1. **Common:** addresses, errors, traps, the splittable PRNG, and the
//!    `MemoryAccess` seam shared by the ISA and Memory layers.
//! 2. **Resource:** the register-like resource namespace and its reserver.
//! 3. **ISA:** instruction forms, encoding, classification, and a minimal
//!    functional execution step (RV64I/M/F/D + Zicsr `Csrrw`).
//! 4. **Memory:** banks, the placement map, and the exit region.
//! 5. **Model:** the Execution Model that steps the placed program forward.
//! 6. **Gen:** sequences, funnels, and the top-level Engine.
//! 7. **Emit:** assembly-text and debug-YAML serialization.

/// Common types and constants (addresses, errors, traps, randomness).
pub mod common;
/// Emitter: assembly-text and debug-YAML output.
pub mod emit;
/// Generation: sequences, funnels, and the Engine.
pub mod gen;
/// Instruction set: forms, encoding, classification, and execution step.
pub mod isa;
/// Memory Store: banks, placements, and the exit region.
pub mod memory;
/// Execution Model.
pub mod model;
/// Resource Space and Reserver.
pub mod resource;

pub use common::{Address, GenError, GenResult, Trap};
pub use gen::engine::Engine;
pub use memory::{MemoryConfig, MemoryStore};
