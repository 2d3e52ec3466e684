//! **SetGPRs** / **SetFPRs** (spec §4.5): issue immediate-loads (GPRs) or
//! float-loads from a small constant pool (FPRs) so a claim-owned set of
//! registers ends up holding chosen values (zero, sentinel, and small
//! varying patterns).

use crate::common::Address;
use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

use super::load_store::split_hi_lo;

/// 12-bit-representable patterns cycled across GPR targets: zero, all-ones,
/// and an ascending sentinel.
const GPR_PATTERNS: &[i64] = &[0, -1, 0x2A, 0x155, 0x7FF];

/// Distinct bit patterns cycled across FPR targets, as `f32` bit patterns:
/// zero, one, a small value, and a negative value.
const FPR_PATTERNS: &[u32] = &[0x0000_0000, 0x3F80_0000, 0x4048_F5C3, 0xBF80_0000];

enum FprPhase {
    NeedBlob,
    MaterializeHi,
    MaterializeLo,
    Load,
}

pub struct SetRegs {
    is_float: bool,
    claim: Claim,
    next_index: usize,
    fpr_phase: FprPhase,
    pending_lo: i64,
}

impl SetRegs {
    #[must_use]
    pub fn gprs() -> Self {
        Self {
            is_float: false,
            claim: Claim::default(),
            next_index: 0,
            fpr_phase: FprPhase::NeedBlob,
            pending_lo: 0,
        }
    }

    #[must_use]
    pub fn fprs() -> Self {
        Self {
            is_float: true,
            claim: Claim::default(),
            next_index: 0,
            fpr_phase: FprPhase::NeedBlob,
            pending_lo: 0,
        }
    }

    fn target_namespace(&self) -> Namespace {
        if self.is_float {
            Namespace::Fpr
        } else {
            Namespace::Gpr
        }
    }

    fn scratch_gpr(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }
}

impl SequenceBehavior for SetRegs {
    fn resource_requests(&self) -> ClaimSpec {
        let spec = ClaimSpec::new().with_exclusive(ClaimItem::AnyN(self.target_namespace(), 4));
        if self.is_float {
            spec.with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
        } else {
            spec
        }
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        let targets = self.claim.exclusive_of(self.target_namespace());

        if !self.is_float {
            if self.next_index >= targets.len() {
                return None;
            }
            let rd = targets[self.next_index].id as usize;
            let value = GPR_PATTERNS[self.next_index % GPR_PATTERNS.len()];
            self.next_index += 1;
            return Some(GenData::Instr(Form::Addi, Operands::i(rd, 0, value)));
        }

        match self.fpr_phase {
            FprPhase::NeedBlob => {
                if self.next_index >= targets.len() {
                    return None;
                }
                self.fpr_phase = FprPhase::MaterializeHi;
                let bits = FPR_PATTERNS[self.next_index % FPR_PATTERNS.len()];
                Some(GenData::DataBlob {
                    bytes: bits.to_le_bytes().to_vec(),
                    alignment: 4,
                    purpose: "fpr-pattern",
                })
            }
            FprPhase::MaterializeHi => {
                let addr: Address = ctx.last_data_addr.expect("engine supplies the placed blob's address");
                let (hi, lo) = split_hi_lo(addr.value());
                self.pending_lo = lo;
                self.fpr_phase = FprPhase::MaterializeLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch_gpr(), hi)))
            }
            FprPhase::MaterializeLo => {
                self.fpr_phase = FprPhase::Load;
                let scratch = self.scratch_gpr();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            FprPhase::Load => {
                let rd = targets[self.next_index].id as usize;
                self.next_index += 1;
                self.fpr_phase = FprPhase::NeedBlob;
                Some(GenData::Instr(Form::Flw, Operands::i(rd, self.scratch_gpr(), 0)))
            }
        }
    }
}
