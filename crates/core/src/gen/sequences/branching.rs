//! **RelativeBranching** / **AbsoluteBranching** (spec §4.5): branches and
//! jumps whose target the sequence asks the engine to pre-reserve via
//! `GenData::Reserve`, then fills with control flow that always transfers
//! there (an always-taken `beq rs,rs` / an unconditional `jalr`) so the
//! reserved address is visited — and therefore placed — by the ordinary
//! body loop (spec §4.7), without a separate end-of-generation backfill
//! pass for this sequence's own targets.

use crate::common::Address;
use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

use super::load_store::split_hi_lo;

/// Byte distance ahead of the current PC at which a target is reserved.
/// Large enough to clear the branch/jump instruction itself and whatever
/// else is emitted before the engine reaches it.
const TARGET_AHEAD: i64 = 64;

enum RelPhase {
    ReserveTarget,
    Branch,
}

pub struct RelativeBranching {
    remaining: usize,
    claim: Claim,
    phase: RelPhase,
    target: Address,
}

impl RelativeBranching {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            claim: Claim::default(),
            phase: RelPhase::ReserveTarget,
            target: Address::new(0),
        }
    }
}

impl SequenceBehavior for RelativeBranching {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            RelPhase::ReserveTarget => {
                if self.remaining == 0 {
                    return None;
                }
                self.target = ctx.pc.wrapping_add_signed(TARGET_AHEAD);
                self.phase = RelPhase::Branch;
                Some(GenData::Reserve(self.target))
            }
            RelPhase::Branch => {
                self.remaining -= 1;
                self.phase = RelPhase::ReserveTarget;
                let reg = self.claim.exclusive_of(Namespace::Gpr)[0].id as usize;
                Some(GenData::Instr(Form::Beq, Operands::b(reg, reg, TARGET_AHEAD)))
            }
        }
    }
}

enum AbsPhase {
    ReserveTarget,
    MaterializeHi,
    MaterializeLo,
    Jump,
}

pub struct AbsoluteBranching {
    remaining: usize,
    claim: Claim,
    phase: AbsPhase,
    target: Address,
    pending_lo: i64,
}

impl AbsoluteBranching {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            claim: Claim::default(),
            phase: AbsPhase::ReserveTarget,
            target: Address::new(0),
            pending_lo: 0,
        }
    }
}

impl SequenceBehavior for AbsoluteBranching {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        let reg = self.claim.exclusive_of(Namespace::Gpr)[0].id as usize;
        match self.phase {
            AbsPhase::ReserveTarget => {
                if self.remaining == 0 {
                    return None;
                }
                self.target = ctx.pc.wrapping_add_signed(TARGET_AHEAD * 2);
                self.phase = AbsPhase::MaterializeHi;
                Some(GenData::Reserve(self.target))
            }
            AbsPhase::MaterializeHi => {
                let (hi, lo) = split_hi_lo(self.target.value());
                self.pending_lo = lo;
                self.phase = AbsPhase::MaterializeLo;
                Some(GenData::Instr(Form::Lui, Operands::u(reg, hi)))
            }
            AbsPhase::MaterializeLo => {
                self.phase = AbsPhase::Jump;
                Some(GenData::Instr(Form::Addi, Operands::i(reg, reg, self.pending_lo)))
            }
            AbsPhase::Jump => {
                self.remaining -= 1;
                self.phase = AbsPhase::ReserveTarget;
                Some(GenData::Instr(Form::Jalr, Operands::i(0, reg, 0)))
            }
        }
    }
}
