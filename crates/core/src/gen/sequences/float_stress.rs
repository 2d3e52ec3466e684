//! **StressFloat** (spec §4.5): loads a handful of `f32` bit patterns from a
//! constant pool into claimed FPRs, then runs a sweep of single- and
//! two-source float operations (add/sub/mul/div, plus an `fsqrt` pass) across
//! them — the same constant-pool-plus-`lui`/`addi` materialization idiom as
//! `SetRegs`'s float path, reused here for a fixed pair of operand registers
//! instead of one register per pattern.

use crate::common::Address;
use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

use super::load_store::split_hi_lo;

/// `f32` bit patterns cycled into the two operand FPRs across rounds.
const STRESS_VALUES: &[u32] = &[
    0x3F80_0000, // 1.0
    0x4000_0000, // 2.0
    0xC000_0000, // -2.0
    0x3F00_0000, // 0.5
    0x7F7F_FFFF, // near f32::MAX
];

/// Binary ops run once both operand FPRs hold a value; `FsqrtS` runs on the
/// first operand only.
const BINARY_OPS: &[Form] = &[Form::FaddS, Form::FsubS, Form::FmulS, Form::FdivS];

#[derive(Clone, Copy)]
enum Phase {
    NeedBlobA,
    MaterializeHiA,
    MaterializeLoA,
    LoadA,
    NeedBlobB,
    MaterializeHiB,
    MaterializeLoB,
    LoadB,
    BinaryOp(usize),
    SqrtOp,
}

pub struct StressFloat {
    rounds_remaining: usize,
    round_index: usize,
    claim: Claim,
    phase: Phase,
    pending_lo: i64,
}

impl StressFloat {
    #[must_use]
    pub fn new(rounds: usize) -> Self {
        Self {
            rounds_remaining: rounds,
            round_index: 0,
            claim: Claim::default(),
            phase: Phase::NeedBlobA,
            pending_lo: 0,
        }
    }

    fn scratch_gpr(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }

    fn fpr_a(&self) -> usize {
        self.claim.exclusive_of(Namespace::Fpr)[0].id as usize
    }

    fn fpr_b(&self) -> usize {
        let fprs = self.claim.exclusive_of(Namespace::Fpr);
        fprs[1 % fprs.len()].id as usize
    }

    fn dest(&self) -> usize {
        let fprs = self.claim.exclusive_of(Namespace::Fpr);
        fprs[2 % fprs.len()].id as usize
    }

    fn pattern(&self, offset: usize) -> u32 {
        STRESS_VALUES[(self.round_index + offset) % STRESS_VALUES.len()]
    }
}

impl SequenceBehavior for StressFloat {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new()
            .with_exclusive(ClaimItem::AnyN(Namespace::Fpr, 3))
            .with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            Phase::NeedBlobA => {
                if self.rounds_remaining == 0 {
                    return None;
                }
                self.phase = Phase::MaterializeHiA;
                Some(GenData::DataBlob {
                    bytes: self.pattern(0).to_le_bytes().to_vec(),
                    alignment: 4,
                    purpose: "float-stress-a",
                })
            }
            Phase::MaterializeHiA => {
                let addr: Address = ctx.last_data_addr.expect("engine supplies the placed blob's address");
                let (hi, lo) = split_hi_lo(addr.value());
                self.pending_lo = lo;
                self.phase = Phase::MaterializeLoA;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch_gpr(), hi)))
            }
            Phase::MaterializeLoA => {
                self.phase = Phase::LoadA;
                let scratch = self.scratch_gpr();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            Phase::LoadA => {
                self.phase = Phase::NeedBlobB;
                Some(GenData::Instr(Form::Flw, Operands::i(self.fpr_a(), self.scratch_gpr(), 0)))
            }
            Phase::NeedBlobB => {
                self.phase = Phase::MaterializeHiB;
                Some(GenData::DataBlob {
                    bytes: self.pattern(1).to_le_bytes().to_vec(),
                    alignment: 4,
                    purpose: "float-stress-b",
                })
            }
            Phase::MaterializeHiB => {
                let addr: Address = ctx.last_data_addr.expect("engine supplies the placed blob's address");
                let (hi, lo) = split_hi_lo(addr.value());
                self.pending_lo = lo;
                self.phase = Phase::MaterializeLoB;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch_gpr(), hi)))
            }
            Phase::MaterializeLoB => {
                self.phase = Phase::LoadB;
                let scratch = self.scratch_gpr();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            Phase::LoadB => {
                self.phase = Phase::BinaryOp(0);
                Some(GenData::Instr(Form::Flw, Operands::i(self.fpr_b(), self.scratch_gpr(), 0)))
            }
            Phase::BinaryOp(idx) => {
                let form = BINARY_OPS[idx];
                self.phase = if idx + 1 < BINARY_OPS.len() {
                    Phase::BinaryOp(idx + 1)
                } else {
                    Phase::SqrtOp
                };
                Some(GenData::Instr(form, Operands::r(self.dest(), self.fpr_a(), self.fpr_b())))
            }
            Phase::SqrtOp => {
                self.rounds_remaining -= 1;
                self.round_index += 1;
                self.phase = Phase::NeedBlobA;
                Some(GenData::Instr(Form::FsqrtS, Operands::r(self.dest(), self.fpr_a(), 0)))
            }
        }
    }
}
