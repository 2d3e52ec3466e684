//! Common types shared across the generation engine.
//!
//! Mirrors the teacher's `common` module: address types, error/trap
//! definitions, and (new here) the deterministic sub-stream RNG.

/// Address newtype and alignment arithmetic.
pub mod addr;

/// The `MemoryAccess` trait the ISA catalog's `step` needs from memory.
pub mod access;

/// `GenError` and `Trap` definitions.
pub mod error;

/// Deterministic, splittable randomness.
pub mod rng;

pub use access::MemoryAccess;
pub use addr::Address;
pub use error::{GenError, GenResult, Trap};
