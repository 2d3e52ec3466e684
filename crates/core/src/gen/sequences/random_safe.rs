//! **RandomSafeInstrs** (spec §4.5): base-ISA arithmetic/logic instructions
//! that are neither loads, stores, branches, CSR ops, nor privileged.
//! Operand GPRs are drawn from the claim.

use rand::Rng;

use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

const SAFE_FORMS: &[Form] = &[
    Form::Add,
    Form::Sub,
    Form::Xor,
    Form::Or,
    Form::And,
    Form::Sll,
    Form::Srl,
    Form::Sra,
    Form::Slt,
    Form::Sltu,
    Form::Addw,
    Form::Subw,
    Form::Sllw,
    Form::Srlw,
    Form::Sraw,
    Form::Mul,
    Form::Mulh,
    Form::Mulhsu,
    Form::Mulhu,
    Form::Div,
    Form::Divu,
    Form::Rem,
    Form::Remu,
];

pub struct RandomSafeInstrs {
    remaining: usize,
    claim: Claim,
}

impl RandomSafeInstrs {
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            remaining: count,
            claim: Claim::default(),
        }
    }
}

impl SequenceBehavior for RandomSafeInstrs {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 3))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;

        let gprs = self.claim.exclusive_of(Namespace::Gpr);
        let rd = gprs[0].id as usize;
        let rs1 = gprs[1 % gprs.len()].id as usize;
        let rs2 = gprs[2 % gprs.len()].id as usize;
        let form = SAFE_FORMS[ctx.rng.gen_range(0..SAFE_FORMS.len())];
        Some(GenData::Instr(form, Operands::r(rd, rs1, rs2)))
    }
}
