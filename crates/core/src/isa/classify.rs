//! Static classification of `Form`s: what a form touches, before any
//! concrete operands or execution state exist. Sequences use this to decide
//! what resources to reserve (spec §4.2) without duplicating the encode/step
//! match arms.

use crate::resource::Resource;

use super::forms::{Form, Operands};

/// True if `form` reads memory.
#[must_use]
pub fn is_load(form: Form) -> bool {
    matches!(
        form,
        Form::Lb | Form::Lh | Form::Lw | Form::Ld | Form::Lbu | Form::Lhu | Form::Lwu | Form::Flw | Form::Fld
    )
}

/// True if `form` writes memory.
#[must_use]
pub fn is_store(form: Form) -> bool {
    matches!(form, Form::Sb | Form::Sh | Form::Sw | Form::Sd | Form::Fsw | Form::Fsd)
}

/// True if `form` is a conditional branch.
#[must_use]
pub fn is_branch(form: Form) -> bool {
    matches!(form, Form::Beq | Form::Bne | Form::Blt | Form::Bge | Form::Bltu | Form::Bgeu)
}

/// True if `form` is an unconditional jump (direct or indirect).
#[must_use]
pub fn is_jump(form: Form) -> bool {
    matches!(form, Form::Jal | Form::Jalr)
}

/// True if `form` is a branch or jump — i.e. it can redirect control flow.
#[must_use]
pub fn is_control_flow(form: Form) -> bool {
    is_branch(form) || is_jump(form)
}

/// True if `form` touches the CSR space.
#[must_use]
pub fn is_csr(form: Form) -> bool {
    matches!(form, Form::Csrrw)
}

/// True if `form` operates on floating-point registers.
#[must_use]
pub fn is_float(form: Form) -> bool {
    matches!(
        form,
        Form::Flw
            | Form::Fsw
            | Form::FaddS
            | Form::FsubS
            | Form::FmulS
            | Form::FdivS
            | Form::FsqrtS
            | Form::Fld
            | Form::Fsd
            | Form::FaddD
            | Form::FsubD
            | Form::FmulD
            | Form::FdivD
            | Form::FsqrtD
    )
}

/// True if `form` can trap for reasons other than a misdirected memory
/// access (spec §4.4's "has side effect beyond GPR/FPR update" notion) —
/// here, only CSR writes, since this catalog's only privileged
/// instruction is `Csrrw`.
#[must_use]
pub fn is_privileged(form: Form) -> bool {
    is_csr(form)
}

/// The set of resources `form` with `operands` will write if it completes
/// without trapping. Used by sequences to build `ClaimSpec`s that match
/// what they are about to emit (spec §4.2, §4.5).
#[must_use]
pub fn writes(form: Form, ops: &Operands) -> Vec<Resource> {
    let mut out = Vec::new();
    if is_float(form) {
        if !is_store(form) {
            out.push(Resource::fpr(ops.rd as u32));
        }
    } else if is_csr(form) {
        out.push(Resource::csr(ops.csr));
        if ops.rd != 0 {
            out.push(Resource::gpr(ops.rd as u32));
        }
    } else if !is_store(form) && !is_branch(form) && ops.rd != 0 {
        out.push(Resource::gpr(ops.rd as u32));
    }
    out
}

/// Byte displacement a branch or jump-and-link form would add to `pc`,
/// given its encoded immediate. `Jalr` is excluded: its target depends on
/// a runtime register value, not a static displacement.
#[must_use]
pub fn static_branch_target(form: Form, ops: &Operands, pc: u64) -> Option<u64> {
    if is_branch(form) || form == Form::Jal {
        Some(pc.wrapping_add(ops.imm as u64))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn load_store_are_disjoint() {
        assert!(is_load(Form::Lw));
        assert!(!is_store(Form::Lw));
        assert!(is_store(Form::Sw));
        assert!(!is_load(Form::Sw));
    }

    #[test]
    fn store_writes_no_resource() {
        let ops = Operands::s(1, 2, 0);
        assert!(writes(Form::Sw, &ops).is_empty());
    }

    #[test]
    fn add_writing_x0_produces_no_resource() {
        let ops = Operands::r(0, 1, 2);
        assert!(writes(Form::Add, &ops).is_empty());
    }

    #[test]
    fn csrrw_writes_csr_and_optionally_gpr() {
        let ops = Operands::csr(5, 1, 0x340);
        let w = writes(Form::Csrrw, &ops);
        assert_eq!(w.len(), 2);
    }
}
