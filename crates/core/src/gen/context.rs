//! The read-only window a sequence gets onto the Memory Store and Execution
//! Model between yields, plus its own PRNG stream and claim (spec §5:
//! "between yields a sequence sees a consistent snapshot of its
//! `reservation_claim` and may consult the Memory Store and Execution Model
//! read-only").

use rand_chacha::ChaCha8Rng;

use crate::common::Address;
use crate::memory::MemoryStore;
use crate::resource::Claim;

/// Passed to `Sequence::next` on every call.
pub struct SequenceContext<'a> {
    pub store: &'a MemoryStore,
    pub pc: Address,
    pub rng: &'a mut ChaCha8Rng,
    /// The claim granted to this sequence by the funnel, injected before the
    /// first `next()` call (spec §4.5 "reservation_claim").
    pub claim: &'a Claim,
    /// The address the engine placed this sequence's most recently yielded
    /// `DataBlob` at, if the previous item was one.
    pub last_data_addr: Option<Address>,
}
