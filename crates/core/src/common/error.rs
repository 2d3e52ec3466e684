//! Error and trap definitions (spec §7 "Error Handling Design", §3 "Resource").
//!
//! `GenError` is the fatal/recoverable error surface of the generation engine
//! itself. `Trap` is not an error — it models an architectural fault that the
//! Execution Model routes to a handler — so it stays a separate enum, the way
//! the teacher keeps `Trap` apart from anything implementing `std::error::Error`.

use thiserror::Error;

use super::addr::Address;
use crate::resource::Resource;

/// Fatal or recoverable error kinds raised by the generation engine.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenError {
    /// Requesting an architecturally forbidden resource (e.g. `GPR 0`, a
    /// read-only CSR). Fatal to the sequence that asked for it; the funnel
    /// drops that sequence and continues.
    #[error("invalid resource request: {0:?}")]
    InvalidResource(Resource),

    /// A region cannot fit the next placement. Recoverable on code regions
    /// (the engine splices in a relocate sequence); fatal on data regions.
    #[error("out of space: {0}")]
    OutOfSpace(String),

    /// Attempt to place over already-written bytes. Always an engine bug.
    #[error("placement conflict at {0}")]
    PlacementConflict(Address),

    /// A branch/jump target was reserved but never placed by the time
    /// generation ended.
    #[error("branch target {0} was never placed")]
    UnplacedTarget(Address),

    /// Invalid YAML or schema violation in the memory/run configuration.
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Propagated I/O failure (reading config, writing the output file).
    #[error("I/O error: {0}")]
    Io(String),
}

/// A modeled architectural fault. Diverts `pc` to the configured trap
/// handler; not a `GenError` and never aborts generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trap {
    /// `pc` refers to an address that has not been placed with an instruction.
    FetchMiss(Address),
    /// Instruction address is not aligned to the configured instruction width.
    InstructionAddressMisaligned(Address),
    /// A load accessed an address the owning bank does not permit reading.
    LoadAccessFault(Address),
    /// A store accessed an address the owning bank does not permit writing.
    StoreAccessFault(Address),
    /// A load or store address was not aligned to its access width.
    AddressMisaligned(Address),
    /// The decoded form is not recognized or not implemented by the catalog.
    IllegalInstruction(u32),
}

impl std::fmt::Display for Trap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Trap::FetchMiss(addr) => write!(f, "FetchMiss({addr})"),
            Trap::InstructionAddressMisaligned(addr) => {
                write!(f, "InstructionAddressMisaligned({addr})")
            }
            Trap::LoadAccessFault(addr) => write!(f, "LoadAccessFault({addr})"),
            Trap::StoreAccessFault(addr) => write!(f, "StoreAccessFault({addr})"),
            Trap::AddressMisaligned(addr) => write!(f, "AddressMisaligned({addr})"),
            Trap::IllegalInstruction(raw) => write!(f, "IllegalInstruction({raw:#x})"),
        }
    }
}

impl std::error::Error for Trap {}

/// Convenience alias used throughout the core.
pub type GenResult<T> = Result<T, GenError>;
