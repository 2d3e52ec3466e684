//! **LoadException** (spec §4.5): a load with base `GPR 0` and a non-zero
//! offset chosen to land outside any configured bank, so the Execution
//! Model raises a trap (spec §8 scenario 3).

use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

/// Offset from address zero. Bank bases in this generator's layouts start
/// at `0x8000_0000`, so any small nonzero offset from `GPR 0` lands well
/// outside every configured bank.
const FAULTING_OFFSET: i64 = 0x100;

pub struct LoadException {
    remaining: usize,
    claim: Claim,
}

impl LoadException {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            claim: Claim::default(),
        }
    }
}

impl SequenceBehavior for LoadException {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, _ctx: &mut SequenceContext) -> Option<GenData> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        let rd = self.claim.exclusive_of(Namespace::Gpr)[0].id as usize;
        Some(GenData::Instr(Form::Lw, Operands::i(rd, 0, FAULTING_OFFSET)))
    }
}
