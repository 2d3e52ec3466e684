//! **Hazards** (spec §4.5): a `(writer, reader)` pair where the reader's
//! source GPR equals the writer's destination GPR.

use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

enum Phase {
    Writer,
    Reader,
}

pub struct Hazards {
    remaining_pairs: usize,
    claim: Claim,
    phase: Phase,
}

impl Hazards {
    #[must_use]
    pub fn new(pairs: usize) -> Self {
        Self {
            remaining_pairs: pairs,
            claim: Claim::default(),
            phase: Phase::Writer,
        }
    }
}

impl SequenceBehavior for Hazards {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 2))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, _ctx: &mut SequenceContext) -> Option<GenData> {
        let gprs = self.claim.exclusive_of(Namespace::Gpr);
        let hazard_reg = gprs[0].id as usize;
        let reader_dst = gprs[1 % gprs.len()].id as usize;

        match self.phase {
            Phase::Writer => {
                if self.remaining_pairs == 0 {
                    return None;
                }
                self.phase = Phase::Reader;
                Some(GenData::Instr(Form::Addi, Operands::i(hazard_reg, hazard_reg, 1)))
            }
            Phase::Reader => {
                self.remaining_pairs -= 1;
                self.phase = Phase::Writer;
                Some(GenData::Instr(Form::Addi, Operands::i(reader_dst, hazard_reg, 0)))
            }
        }
    }
}
