//! Generation: sequences, funnels, and the top-level Engine (spec §4.5-§4.7).

/// The read-only window a sequence gets between yields.
pub mod context;
/// `GenData`, the item a sequence yields.
pub mod data;
/// The top-level Engine loop.
pub mod engine;
/// Funnels: combine several sequences into one `GenData` stream.
pub mod funnel;
/// The `Sequence` contract and its closed, tagged-variant dispatch.
pub mod sequence;
/// The closed set of concrete sequence implementations.
pub mod sequences;
/// Named generator registry resolved by the CLI's `--generator` flag.
pub mod suite;

pub use context::SequenceContext;
pub use data::GenData;
pub use engine::{Engine, RunParams};
pub use funnel::{Funnel, RoundRobinFunnel, SimpleFunnel};
pub use sequence::{Sequence, SequenceBehavior};
