//! Program-edge sequences (spec §4.5): the prologue that runs once at the
//! boot address, the epilogue that runs once at the exit address, and the
//! one-shot sequence the engine splices in whenever the current code region
//! fills up.

use crate::common::Address;
use crate::isa::{csr, Form, Operands};
use crate::resource::{Claim, ClaimItem, ClaimSpec, Namespace, Resource};

use crate::gen::context::SequenceContext;
use crate::gen::data::GenData;
use crate::gen::sequence::SequenceBehavior;

use super::load_store::split_hi_lo;

/// Conventional RISC-V stack pointer register.
const SP: u32 = 2;

enum StartPhase {
    TrapHi,
    TrapLo,
    SetTrap,
    ExitHi,
    ExitLo,
    StackHi,
    StackLo,
    Done,
}

/// Emitted once at the boot address: points `mtvec` back at the boot
/// address itself (so an unhandled trap restarts the stream rather than
/// faulting into undefined territory), materializes the exit address into a
/// scratch GPR, and initializes `sp` to the top of the code bank.
pub struct DefaultProgramStart {
    claim: Claim,
    phase: StartPhase,
    boot: Address,
    pending_lo: i64,
}

impl DefaultProgramStart {
    #[must_use]
    pub fn new() -> Self {
        Self {
            claim: Claim::default(),
            phase: StartPhase::TrapHi,
            boot: Address::new(0),
            pending_lo: 0,
        }
    }

    fn scratch(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }
}

impl Default for DefaultProgramStart {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceBehavior for DefaultProgramStart {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new()
            .with_exclusive(ClaimItem::Exact(Resource::gpr(SP)))
            .with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            StartPhase::TrapHi => {
                self.boot = ctx.pc;
                let (hi, lo) = split_hi_lo(self.boot.value());
                self.pending_lo = lo;
                self.phase = StartPhase::TrapLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch(), hi)))
            }
            StartPhase::TrapLo => {
                self.phase = StartPhase::SetTrap;
                let scratch = self.scratch();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            StartPhase::SetTrap => {
                self.phase = StartPhase::ExitHi;
                Some(GenData::Instr(Form::Csrrw, Operands::csr(0, self.scratch(), csr::MTVEC)))
            }
            StartPhase::ExitHi => {
                let (hi, lo) = split_hi_lo(ctx.store.exit_address().value());
                self.pending_lo = lo;
                self.phase = StartPhase::ExitLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch(), hi)))
            }
            StartPhase::ExitLo => {
                self.phase = StartPhase::StackHi;
                let scratch = self.scratch();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            StartPhase::StackHi => {
                let top = ctx.store.code_bank().end();
                let (hi, lo) = split_hi_lo(top.value());
                self.pending_lo = lo;
                self.phase = StartPhase::StackLo;
                Some(GenData::Instr(Form::Lui, Operands::u(SP as usize, hi)))
            }
            StartPhase::StackLo => {
                self.phase = StartPhase::Done;
                Some(GenData::Instr(Form::Addi, Operands::i(SP as usize, SP as usize, self.pending_lo)))
            }
            StartPhase::Done => None,
        }
    }
}

enum EndPhase {
    ExitHi,
    ExitLo,
    Jump,
    SelfBranch,
    Done,
}

/// Emitted once at the exit address: reloads the exit address into a
/// scratch GPR, jumps to it indirectly (a no-op, since control is already
/// there), and then a branch-to-self that the Execution Model treats as
/// natural termination (spec §4.7 "effectively treated as a natural
/// termination").
pub struct DefaultProgramEnd {
    claim: Claim,
    phase: EndPhase,
    pending_lo: i64,
}

impl DefaultProgramEnd {
    #[must_use]
    pub fn new() -> Self {
        Self {
            claim: Claim::default(),
            phase: EndPhase::ExitHi,
            pending_lo: 0,
        }
    }

    fn scratch(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }
}

impl Default for DefaultProgramEnd {
    fn default() -> Self {
        Self::new()
    }
}

impl SequenceBehavior for DefaultProgramEnd {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            EndPhase::ExitHi => {
                let (hi, lo) = split_hi_lo(ctx.store.exit_address().value());
                self.pending_lo = lo;
                self.phase = EndPhase::ExitLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch(), hi)))
            }
            EndPhase::ExitLo => {
                self.phase = EndPhase::Jump;
                let scratch = self.scratch();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            EndPhase::Jump => {
                self.phase = EndPhase::SelfBranch;
                Some(GenData::Instr(Form::Jalr, Operands::i(0, self.scratch(), 0)))
            }
            EndPhase::SelfBranch => {
                self.phase = EndPhase::Done;
                Some(GenData::Instr(Form::Beq, Operands::b(0, 0, 0)))
            }
            EndPhase::Done => None,
        }
    }
}

enum RelocatePhase {
    ReserveTarget,
    MaterializeHi,
    MaterializeLo,
    Jump,
    Done,
}

/// One-shot sequence the engine splices in when the current code region
/// cannot fit the next instruction: reserves an address in a fresh region
/// and jumps to it unconditionally, the same `lui`/`addi`/`jalr`
/// materialize-and-jump idiom as `AbsoluteBranching`.
pub struct DefaultRelocate {
    claim: Claim,
    phase: RelocatePhase,
    target: Address,
    pending_lo: i64,
}

impl DefaultRelocate {
    #[must_use]
    pub fn new(target: Address) -> Self {
        Self {
            claim: Claim::default(),
            phase: RelocatePhase::ReserveTarget,
            target,
            pending_lo: 0,
        }
    }

    fn scratch(&self) -> usize {
        self.claim.exclusive_of(Namespace::Gpr)[0].id as usize
    }
}

impl SequenceBehavior for DefaultRelocate {
    fn resource_requests(&self) -> ClaimSpec {
        ClaimSpec::new().with_exclusive(ClaimItem::AnyN(Namespace::Gpr, 1))
    }

    fn claim_sink(&mut self, claim: Claim) {
        self.claim = claim;
    }

    fn next(&mut self, _ctx: &mut SequenceContext) -> Option<GenData> {
        match self.phase {
            RelocatePhase::ReserveTarget => {
                self.phase = RelocatePhase::MaterializeHi;
                Some(GenData::Reserve(self.target))
            }
            RelocatePhase::MaterializeHi => {
                let (hi, lo) = split_hi_lo(self.target.value());
                self.pending_lo = lo;
                self.phase = RelocatePhase::MaterializeLo;
                Some(GenData::Instr(Form::Lui, Operands::u(self.scratch(), hi)))
            }
            RelocatePhase::MaterializeLo => {
                self.phase = RelocatePhase::Jump;
                let scratch = self.scratch();
                Some(GenData::Instr(Form::Addi, Operands::i(scratch, scratch, self.pending_lo)))
            }
            RelocatePhase::Jump => {
                self.phase = RelocatePhase::Done;
                Some(GenData::Instr(Form::Jalr, Operands::i(0, self.scratch(), 0)))
            }
            RelocatePhase::Done => None,
        }
    }
}
