//! The Reserver: grants and releases `Claim`s over the resource space.
//!
//! All-or-nothing semantics (spec §4.2): a `request` either changes no state
//! and returns `Ok(None)`, or grants every item in the spec atomically.
//! Requesting an architecturally forbidden resource is a programmer error
//! and raises `GenError::InvalidResource` rather than silently failing,
//! which is how capacity exhaustion is reported instead.

use std::collections::{HashMap, HashSet};

use super::{Claim, ClaimItem, ClaimSpec, Namespace, Resource};
use crate::common::error::{GenError, GenResult};

/// Identifies a granted `Claim` so `release` can be matched to its `request`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClaimId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PoolState {
    Unassigned,
    Exclusive(ClaimId),
    Shared,
}

/// Arbitrates GPR/FPR/CSR access across concurrently-live sequences.
pub struct Reserver {
    /// The full set of resources that may ever be reserved, per namespace.
    /// Excludes `GPR 0` and read-only CSRs (spec §3): they simply never
    /// appear here, so any attempt to name them directly is rejected as
    /// `InvalidResource` rather than silently dropped.
    universe: HashMap<Namespace, Vec<Resource>>,
    state: HashMap<Resource, PoolState>,
    shared_refcount: HashMap<Resource, u32>,
    next_claim_id: u64,
}

impl Reserver {
    /// Builds a Reserver whose universe is `gpr_count - 1` GPRs (x1..xN,
    /// `GPR 0` is never reservable), `fpr_count` FPRs (f0..fN-1), and the
    /// explicitly writable CSR addresses in `writable_csrs`.
    #[must_use]
    pub fn new(gpr_count: u32, fpr_count: u32, writable_csrs: &[u32]) -> Self {
        let mut universe = HashMap::new();
        let gprs: Vec<Resource> = (1..gpr_count).map(Resource::gpr).collect();
        let fprs: Vec<Resource> = (0..fpr_count).map(Resource::fpr).collect();
        let csrs: Vec<Resource> = writable_csrs.iter().copied().map(Resource::csr).collect();
        universe.insert(Namespace::Gpr, gprs);
        universe.insert(Namespace::Fpr, fprs);
        universe.insert(Namespace::Csr, csrs);

        let mut state = HashMap::new();
        for resources in universe.values() {
            for r in resources {
                state.insert(*r, PoolState::Unassigned);
            }
        }

        Self {
            universe,
            state,
            shared_refcount: HashMap::new(),
            next_claim_id: 0,
        }
    }

    /// All currently reservable resources of `namespace` (the static
    /// universe, not filtered by current pool state).
    #[must_use]
    pub fn reservable(&self, namespace: Namespace) -> &[Resource] {
        self.universe
            .get(&namespace)
            .map_or(&[], Vec::as_slice)
    }

    fn is_in_universe(&self, resource: Resource) -> bool {
        self.universe
            .get(&resource.namespace)
            .is_some_and(|list| list.contains(&resource))
    }

    /// Attempts to grant `spec` atomically.
    ///
    /// Returns `Ok(None)` if the spec cannot currently be satisfied (all
    /// state left unchanged). Returns `Err(InvalidResource)` if any item
    /// names a resource outside the universe (e.g. `GPR 0`, a read-only
    /// CSR) — this never partially applies either.
    pub fn request(&mut self, spec: &ClaimSpec) -> GenResult<Option<Claim>> {
        let mut taken: HashSet<Resource> = HashSet::new();
        let mut exclusive_picks = Vec::new();
        let mut shared_picks = Vec::new();

        for item in &spec.exclusive {
            match self.resolve_exclusive(item, &taken)? {
                Some(picks) => {
                    for r in &picks {
                        taken.insert(*r);
                    }
                    exclusive_picks.extend(picks);
                }
                None => return Ok(None),
            }
        }

        for item in &spec.shared {
            match self.resolve_shared(item, &taken)? {
                Some(picks) => {
                    for r in &picks {
                        taken.insert(*r);
                    }
                    shared_picks.extend(picks);
                }
                None => return Ok(None),
            }
        }

        let id = ClaimId(self.next_claim_id);
        self.next_claim_id += 1;

        for r in &exclusive_picks {
            self.state.insert(*r, PoolState::Exclusive(id));
        }
        for r in &shared_picks {
            self.state.insert(*r, PoolState::Shared);
            *self.shared_refcount.entry(*r).or_insert(0) += 1;
        }

        Ok(Some(Claim {
            id,
            exclusive: exclusive_picks,
            shared: shared_picks,
        }))
    }

    /// Releases a granted claim: exclusive resources return to
    /// `Unassigned`; shared resources decrement a refcount and return to
    /// `Unassigned` only once it reaches zero.
    pub fn release(&mut self, claim: &Claim) {
        for r in &claim.exclusive {
            if matches!(self.state.get(r), Some(PoolState::Exclusive(id)) if *id == claim.id) {
                self.state.insert(*r, PoolState::Unassigned);
            }
        }
        for r in &claim.shared {
            if let Some(count) = self.shared_refcount.get_mut(r) {
                *count = count.saturating_sub(1);
                if *count == 0 {
                    self.shared_refcount.remove(r);
                    self.state.insert(*r, PoolState::Unassigned);
                }
            }
        }
    }

    fn resolve_exclusive(
        &self,
        item: &ClaimItem,
        taken: &HashSet<Resource>,
    ) -> GenResult<Option<Vec<Resource>>> {
        match item {
            ClaimItem::Exact(r) => {
                if !self.is_in_universe(*r) {
                    return Err(GenError::InvalidResource(*r));
                }
                let available = !taken.contains(r)
                    && matches!(self.state.get(r), Some(PoolState::Unassigned));
                Ok(available.then(|| vec![*r]))
            }
            ClaimItem::AnyN(namespace, count) => {
                let candidates: Vec<Resource> = self
                    .reservable(*namespace)
                    .iter()
                    .copied()
                    .filter(|r| {
                        !taken.contains(r) && matches!(self.state.get(r), Some(PoolState::Unassigned))
                    })
                    .take(*count)
                    .collect();
                Ok((candidates.len() == *count).then_some(candidates))
            }
        }
    }

    fn resolve_shared(
        &self,
        item: &ClaimItem,
        taken: &HashSet<Resource>,
    ) -> GenResult<Option<Vec<Resource>>> {
        match item {
            ClaimItem::Exact(r) => {
                if !self.is_in_universe(*r) {
                    return Err(GenError::InvalidResource(*r));
                }
                let available = !taken.contains(r)
                    && !matches!(self.state.get(r), Some(PoolState::Exclusive(_)));
                Ok(available.then(|| vec![*r]))
            }
            ClaimItem::AnyN(namespace, count) => {
                let candidates: Vec<Resource> = self
                    .reservable(*namespace)
                    .iter()
                    .copied()
                    .filter(|r| {
                        !taken.contains(r)
                            && !matches!(self.state.get(r), Some(PoolState::Exclusive(_)))
                    })
                    .take(*count)
                    .collect();
                Ok((candidates.len() == *count).then_some(candidates))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reserver() -> Reserver {
        Reserver::new(32, 32, &[0x305, 0x340])
    }

    #[test]
    fn gpr_zero_is_not_in_universe() {
        let mut r = reserver();
        let spec = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(0)));
        assert!(matches!(r.request(&spec), Err(GenError::InvalidResource(_))));
    }

    #[test]
    fn read_only_csr_is_not_in_universe() {
        let mut r = reserver();
        let spec = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::csr(0xC00)));
        assert!(matches!(r.request(&spec), Err(GenError::InvalidResource(_))));
    }

    #[test]
    fn exclusive_request_is_atomic_and_exclusive() {
        let mut r = reserver();
        let spec = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(5)));
        let claim = r.request(&spec).unwrap().expect("granted");

        let conflicting = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(5)));
        assert!(r.request(&conflicting).unwrap().is_none());

        r.release(&claim);
        assert!(r.request(&conflicting).unwrap().is_some());
    }

    #[test]
    fn failed_request_leaves_pool_unchanged() {
        let mut r = reserver();
        let first = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(5)));
        let claim = r.request(&first).unwrap().expect("granted");

        // This spec asks for gpr5 (taken) and gpr6 (free); must fail wholesale.
        let spec = ClaimSpec::new()
            .with_exclusive(ClaimItem::Exact(Resource::gpr(6)))
            .with_exclusive(ClaimItem::Exact(Resource::gpr(5)));
        assert!(r.request(&spec).unwrap().is_none());

        // gpr6 must still be free since the whole request was rejected.
        let gpr6_only = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(6)));
        assert!(r.request(&gpr6_only).unwrap().is_some());
        r.release(&claim);
    }

    #[test]
    fn shared_resources_stack_and_exclude_exclusive() {
        let mut r = reserver();
        let spec_a = ClaimSpec::new().with_shared(ClaimItem::Exact(Resource::gpr(3)));
        let spec_b = ClaimSpec::new().with_shared(ClaimItem::Exact(Resource::gpr(3)));
        let claim_a = r.request(&spec_a).unwrap().expect("granted a");
        let claim_b = r.request(&spec_b).unwrap().expect("granted b");

        let exclusive = ClaimSpec::new().with_exclusive(ClaimItem::Exact(Resource::gpr(3)));
        assert!(r.request(&exclusive).unwrap().is_none());

        r.release(&claim_a);
        // Still shared-held by claim_b.
        assert!(r.request(&exclusive).unwrap().is_none());
        r.release(&claim_b);
        assert!(r.request(&exclusive).unwrap().is_some());
    }

    #[test]
    fn any_n_resolves_distinct_resources() {
        let mut r = reserver();
        let spec = ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 3));
        let claim = r.request(&spec).unwrap().expect("granted");
        assert_eq!(claim.exclusive.len(), 3);
        let unique: HashSet<_> = claim.exclusive.iter().collect();
        assert_eq!(unique.len(), 3);
    }
}
