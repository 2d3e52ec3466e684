//! Funnels (spec §4.6): combine several live sequences into the single
//! `GenData` stream the Engine consumes. Each child sequence owns its own
//! PRNG sub-stream (spec §5 "Global randomness") and is granted its claim
//! lazily, on its first poll, rather than all children being reserved
//! up front — this is what lets `AnyN` claims across children interleave
//! instead of deadlocking on whichever child happens to run first.

use rand_chacha::ChaCha8Rng;

use crate::common::{Address, GenError};
use crate::memory::MemoryStore;
use crate::resource::{Claim, Reserver};

use super::context::SequenceContext;
use super::data::GenData;
use super::sequence::{Sequence, SequenceBehavior};

/// How many times a child may fail to obtain its claim before the funnel
/// gives up on it permanently (spec §4.6 "drop a child after a
/// configurable number of failed attempts").
const MAX_CLAIM_ATTEMPTS: u32 = 64;

struct FunnelChild {
    name: &'static str,
    sequence: Sequence,
    rng: ChaCha8Rng,
    claim: Option<Claim>,
    last_data_addr: Option<Address>,
    failed_attempts: u32,
    exhausted: bool,
}

impl FunnelChild {
    fn new(name: &'static str, sequence: Sequence, rng: ChaCha8Rng) -> Self {
        Self {
            name,
            sequence,
            rng,
            claim: None,
            last_data_addr: None,
            failed_attempts: 0,
            exhausted: false,
        }
    }
}

enum PollOutcome {
    Item(GenData),
    Exhausted,
    Pending,
}

fn poll_child(child: &mut FunnelChild, reserver: &mut Reserver, store: &MemoryStore, pc: Address) -> PollOutcome {
    if child.exhausted {
        return PollOutcome::Exhausted;
    }

    if child.claim.is_none() {
        match reserver.request(&child.sequence.resource_requests()) {
            Ok(Some(claim)) => {
                child.sequence.claim_sink(claim.clone());
                child.claim = Some(claim);
                child.failed_attempts = 0;
            }
            Ok(None) => {
                child.failed_attempts += 1;
                if child.failed_attempts >= MAX_CLAIM_ATTEMPTS {
                    log::warn!("funnel: dropping '{}' after {} failed claim attempts", child.name, child.failed_attempts);
                    child.exhausted = true;
                    return PollOutcome::Exhausted;
                }
                return PollOutcome::Pending;
            }
            Err(GenError::InvalidResource(resource)) => {
                log::warn!("funnel: dropping '{}', requested invalid resource {resource}", child.name);
                child.exhausted = true;
                return PollOutcome::Exhausted;
            }
            Err(other) => {
                log::warn!("funnel: dropping '{}' after claim error: {other}", child.name);
                child.exhausted = true;
                return PollOutcome::Exhausted;
            }
        }
    }

    let claim = child.claim.as_ref().expect("claim granted above");
    let mut ctx = SequenceContext {
        store,
        pc,
        rng: &mut child.rng,
        claim,
        last_data_addr: child.last_data_addr.take(),
    };

    match child.sequence.next(&mut ctx) {
        Some(item) => PollOutcome::Item(item),
        None => {
            reserver.release(child.claim.as_ref().expect("claim granted above"));
            child.claim = None;
            child.exhausted = true;
            PollOutcome::Exhausted
        }
    }
}

/// Produces the next `GenData` for one or more live sequences, or `None`
/// when all of them are exhausted.
pub trait Funnel {
    fn next(&mut self, reserver: &mut Reserver, store: &MemoryStore, pc: Address) -> Option<GenData>;

    /// Tells the funnel which child last yielded a `DataBlob` and where the
    /// engine placed it, so that child's next poll sees `last_data_addr`.
    fn notify_placed(&mut self, placed_at: Address);

    fn is_exhausted(&self) -> bool;
}

/// Drains each child sequence fully, in registration order, before moving
/// to the next (spec §4.6 "SimpleFunnel").
pub struct SimpleFunnel {
    children: Vec<FunnelChild>,
    current: usize,
    last_yielded_was_blob: bool,
}

impl SimpleFunnel {
    #[must_use]
    pub fn new(children: Vec<(&'static str, Sequence, ChaCha8Rng)>) -> Self {
        Self {
            children: children.into_iter().map(|(name, seq, rng)| FunnelChild::new(name, seq, rng)).collect(),
            current: 0,
            last_yielded_was_blob: false,
        }
    }
}

impl Funnel for SimpleFunnel {
    fn next(&mut self, reserver: &mut Reserver, store: &MemoryStore, pc: Address) -> Option<GenData> {
        while self.current < self.children.len() {
            let child = &mut self.children[self.current];
            match poll_child(child, reserver, store, pc) {
                PollOutcome::Item(item) => {
                    self.last_yielded_was_blob = matches!(item, GenData::DataBlob { .. });
                    return Some(item);
                }
                PollOutcome::Exhausted => {
                    self.current += 1;
                }
                PollOutcome::Pending => return None,
            }
        }
        None
    }

    fn notify_placed(&mut self, placed_at: Address) {
        if self.last_yielded_was_blob {
            if let Some(child) = self.children.get_mut(self.current) {
                child.last_data_addr = Some(placed_at);
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.current >= self.children.len()
    }
}

/// Cycles through children, yielding at most one item per child per round,
/// skipping children that are momentarily pending and dropping ones that
/// become exhausted (spec §4.6 "RoundRobinFunnel").
pub struct RoundRobinFunnel {
    children: Vec<FunnelChild>,
    cursor: usize,
    last_index: Option<usize>,
    last_yielded_was_blob: bool,
}

impl RoundRobinFunnel {
    #[must_use]
    pub fn new(children: Vec<(&'static str, Sequence, ChaCha8Rng)>) -> Self {
        Self {
            children: children.into_iter().map(|(name, seq, rng)| FunnelChild::new(name, seq, rng)).collect(),
            cursor: 0,
            last_index: None,
            last_yielded_was_blob: false,
        }
    }
}

impl Funnel for RoundRobinFunnel {
    fn next(&mut self, reserver: &mut Reserver, store: &MemoryStore, pc: Address) -> Option<GenData> {
        if self.children.is_empty() {
            return None;
        }
        let start = self.cursor;
        loop {
            let idx = self.cursor;
            self.cursor = (self.cursor + 1) % self.children.len();

            match poll_child(&mut self.children[idx], reserver, store, pc) {
                PollOutcome::Item(item) => {
                    self.last_index = Some(idx);
                    self.last_yielded_was_blob = matches!(item, GenData::DataBlob { .. });
                    return Some(item);
                }
                PollOutcome::Exhausted | PollOutcome::Pending => {
                    if self.cursor == start {
                        return None;
                    }
                }
            }
        }
    }

    fn notify_placed(&mut self, placed_at: Address) {
        if self.last_yielded_was_blob {
            if let Some(idx) = self.last_index {
                if let Some(child) = self.children.get_mut(idx) {
                    child.last_data_addr = Some(placed_at);
                }
            }
        }
    }

    fn is_exhausted(&self) -> bool {
        self.children.iter().all(|c| c.exhausted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::rng;
    use crate::gen::sequences::RandomSafeInstrs;
    use crate::memory::MemoryConfig;

    fn store_and_reserver() -> (MemoryStore, Reserver) {
        (MemoryStore::new(&MemoryConfig::default_layout()).unwrap(), Reserver::new(32, 32, crate::isa::csr::WRITABLE))
    }

    #[test]
    fn simple_funnel_drains_one_child_then_exhausts() {
        let (store, mut reserver) = store_and_reserver();
        let seq = Sequence::RandomSafeInstrs(RandomSafeInstrs::new(2));
        let mut funnel = SimpleFunnel::new(vec![("random", seq, rng::stream(1, 1))]);

        let pc = Address::new(0x8000_0000);
        assert!(funnel.next(&mut reserver, &store, pc).is_some());
        assert!(funnel.next(&mut reserver, &store, pc).is_some());
        assert!(funnel.next(&mut reserver, &store, pc).is_none());
        assert!(funnel.is_exhausted());
    }

    #[test]
    fn round_robin_interleaves_two_children() {
        let (store, mut reserver) = store_and_reserver();
        let a = Sequence::RandomSafeInstrs(RandomSafeInstrs::new(1));
        let b = Sequence::RandomSafeInstrs(RandomSafeInstrs::new(1));
        let mut funnel = RoundRobinFunnel::new(vec![("a", a, rng::stream(1, 1)), ("b", b, rng::stream(1, 2))]);

        let pc = Address::new(0x8000_0000);
        assert!(funnel.next(&mut reserver, &store, pc).is_some());
        assert!(funnel.next(&mut reserver, &store, pc).is_some());
        assert!(funnel.next(&mut reserver, &store, pc).is_none());
        assert!(funnel.is_exhausted());
    }
}
