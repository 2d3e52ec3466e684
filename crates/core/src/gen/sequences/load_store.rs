//! **Load** / **Store** (spec §4.5): a load or store whose base register is
//! initialized to the address of a previously allocated data blob (a store
//! additionally emits a preceding immediate-load of the value).

use crate::common::Address;
use crate::isa::{Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

/// Splits a 64-bit value into a 20-bit `lui` upper-immediate and a 12-bit
/// sign-extended `addi` low-immediate that reconstruct it (the standard
/// `lui`+`addi` materialization pattern, with the `+0x1000` high-bit
/// correction when the low immediate is negative).
pub(crate) fn split_hi_lo(value: u64) -> (i64, i64) {
    let lo = (value & 0xFFF) as i64;
    let lo_signed = (lo << 52) >> 52;
    let hi = ((value as i64) - lo_signed) >> 12;
    (hi, lo_signed)
}

#[derive(Clone, Copy)]
enum Phase {
    NeedBlob,
    MaterializeHi,
    MaterializeLo,
    StoreValue,
    MemOp,
}

pub struct LoadStore {
    is_store: bool,
    remaining: usize,
    claim: Claim,
    phase: Phase,
    pending_lo: i64,
    sentinel: i64,
}

impl LoadStore {
    #[must_use]
    pub fn load(count: usize) -> Self {
        Self::new(false, count)
    }

    #[must_use]
    pub fn store(count: usize) -> Self {
        Self::new(true, count)
    }

    fn new(is_store: bool, count: usize) -> Self {
        Self {
            is_store,
            remaining: count,
            claim: Claim::default(),
            phase: Phase::NeedBlob,
            pending_lo: 0,
            sentinel: 0x2A,
        }
    }

    fn base_reg(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }

    fn value_reg(&self) -> usize {
        let gprs = self.claim.exclusive_of(Namespace::Gpr);
        gprs[1 % gprs.len()].id as usize
    }
}

impl SequenceBehavior for LoadStore {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 2))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            Phase::NeedBlob => {
                if self.remaining == 0 {
                    return None;
                }
                self.phase = Phase::MaterializeHi;
                Some(GenData::DataBlob {
                    bytes: vec![0xAB; 8],
                    alignment: 8,
                    purpose: "ldst",
                })
            }
            Phase::MaterializeHi => {
                let addr: Address = ctx.last_data_addr.expect("engine supplies the placed blob's address");
                let (hi, lo) = split_hi_lo(addr.value());
                self.pending_lo = lo;
                self.phase = Phase::MaterializeLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.base_reg(), hi)))
            }
            Phase::MaterializeLo => {
                self.phase = if self.is_store { Phase::StoreValue } else { Phase::MemOp };
                let base = self.base_reg();
                Some(GenData::Instr(Form::Addi, Operands::i(base, base, self.pending_lo)))
            }
            Phase::StoreValue => {
                self.phase = Phase::MemOp;
                Some(GenData::Instr(Form::Addi, Operands::i(self.value_reg(), 0, self.sentinel)))
            }
            Phase::MemOp => {
                self.remaining -= 1;
                self.phase = Phase::NeedBlob;
                let base = self.base_reg();
                if self.is_store {
                    Some(GenData::Instr(Form::Sd, Operands::s(base, self.value_reg(), 0)))
                } else {
                    Some(GenData::Instr(Form::Ld, Operands::i(self.value_reg(), base, 0)))
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_hi_lo_reconstructs_the_value() {
        let value = 0x8000_0040u64;
        let (hi, lo) = split_hi_lo(value);
        let reconstructed = ((hi << 12) + lo) as u64;
        assert_eq!(reconstructed, value);
    }

    #[test]
    fn split_hi_lo_handles_negative_low_immediate() {
        let value = 0x8000_0FFFu64;
        let (hi, lo) = split_hi_lo(value);
        assert!(lo < 0);
        let reconstructed = ((hi << 12) + lo) as u64;
        assert_eq!(reconstructed, value);
    }
}
