//! The `Sequence` contract and its closed, tagged-variant dispatch (spec
//! §4.5, §9 "Dynamic dispatch over sequence types should be modeled as a
//! tagged variant... This makes the set of sequences closed and
//! auditable").

use crate::resource::{Claim, ClaimSpec};

use super::context::SequenceContext;
use super::data::GenData;
use super::sequences::*;

/// A lazy, finite producer of `GenData` items (spec §4.5).
pub trait SequenceBehavior {
    /// The claim this sequence needs before it may run.
    fn resource_requests(&self) -> ClaimSpec;
    /// Injects the claim the funnel obtained on this sequence's behalf,
    /// called once before the first `next()`.
    fn claim_sink(&mut self, claim: Claim);
    /// Produces the next item, or `None` once exhausted.
    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData>;
}

/// The closed set of sequence implementations this generator ships.
pub enum Sequence {
    RandomSafeInstrs(RandomSafeInstrs),
    Load(LoadStore),
    Store(LoadStore),
    LoadException(LoadException),
    Hazards(Hazards),
    SetGprs(SetRegs),
    SetFprs(SetRegs),
    RelativeBranching(RelativeBranching),
    AbsoluteBranching(AbsoluteBranching),
    StressFloat(StressFloat),
    DefaultProgramStart(DefaultProgramStart),
    DefaultProgramEnd(DefaultProgramEnd),
    DefaultRelocate(DefaultRelocate),
}

impl SequenceBehavior for Sequence {
    fn resource_requests(&self) -> ClaimSpec {
        match self {
            Sequence::RandomSafeInstrs(s) => s.resource_requests(),
            Sequence::Load(s) | Sequence::Store(s) => s.resource_requests(),
            Sequence::LoadException(s) => s.resource_requests(),
            Sequence::Hazards(s) => s.resource_requests(),
            Sequence::SetGprs(s) | Sequence::SetFprs(s) => s.resource_requests(),
            Sequence::RelativeBranching(s) => s.resource_requests(),
            Sequence::AbsoluteBranching(s) => s.resource_requests(),
            Sequence::StressFloat(s) => s.resource_requests(),
            Sequence::DefaultProgramStart(s) => s.resource_requests(),
            Sequence::DefaultProgramEnd(s) => s.resource_requests(),
            Sequence::DefaultRelocate(s) => s.resource_requests(),
        }
    }

    fn claim_sink(&mut self, claim: Claim) {
        match self {
            Sequence::RandomSafeInstrs(s) => s.claim_sink(claim),
            Sequence::Load(s) | Sequence::Store(s) => s.claim_sink(claim),
            Sequence::LoadException(s) => s.claim_sink(claim),
            Sequence::Hazards(s) => s.claim_sink(claim),
            Sequence::SetGprs(s) | Sequence::SetFprs(s) => s.claim_sink(claim),
            Sequence::RelativeBranching(s) => s.claim_sink(claim),
            Sequence::AbsoluteBranching(s) => s.claim_sink(claim),
            Sequence::StressFloat(s) => s.claim_sink(claim),
            Sequence::DefaultProgramStart(s) => s.claim_sink(claim),
            Sequence::DefaultProgramEnd(s) => s.claim_sink(claim),
            Sequence::DefaultRelocate(s) => s.claim_sink(claim),
        }
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self {
            Sequence::RandomSafeInstrs(s) => s.next(ctx),
            Sequence::Load(s) | Sequence::Store(s) => s.next(ctx),
            Sequence::LoadException(s) => s.next(ctx),
            Sequence::Hazards(s) => s.next(ctx),
            Sequence::SetGprs(s) | Sequence::SetFprs(s) => s.next(ctx),
            Sequence::RelativeBranching(s) => s.next(ctx),
            Sequence::AbsoluteBranching(s) => s.next(ctx),
            Sequence::StressFloat(s) => s.next(ctx),
            Sequence::DefaultProgramStart(s) => s.next(ctx),
            Sequence::DefaultProgramEnd(s) => s.next(ctx),
            Sequence::DefaultRelocate(s) => s.next(ctx),
        }
    }
}
