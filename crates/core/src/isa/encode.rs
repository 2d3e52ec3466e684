//! `encode(form, operands) -> bytes` (spec §4.1).
//!
//! Every form this catalog knows is a 4-byte base-ISA encoding (no RVC
//! output; see DESIGN.md for why compressed forms are out of scope here).

use super::csr;
use super::forms::{Form, Operands};
use super::instruction::{pack_b, pack_i, pack_i_shift, pack_j, pack_r, pack_r4, pack_s, pack_u};
use super::rv64d::funct7 as d_f7;
use super::rv64f::{fmt, funct3 as f_f3, funct7 as f_f7, opcodes as f_op};
use super::rv64i::{funct3 as i_f3, funct7 as i_f7, opcodes as i_op};
use super::rv64m::{self, funct3 as m_f3};

/// Encodes `form` with `operands` as a little-endian 4-byte instruction word.
#[must_use]
pub fn encode(form: Form, ops: &Operands) -> [u8; 4] {
    let word = encode_word(form, ops);
    word.to_le_bytes()
}

#[allow(clippy::too_many_lines)]
fn encode_word(form: Form, ops: &Operands) -> u32 {
    match form {
        Form::Add => pack_r(i_op::OP_REG, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Sub => pack_r(i_op::OP_REG, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.rs2, i_f7::SUB),
        Form::Xor => pack_r(i_op::OP_REG, ops.rd, i_f3::XOR, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Or => pack_r(i_op::OP_REG, ops.rd, i_f3::OR, ops.rs1, ops.rs2, i_f7::ADD),
        Form::And => pack_r(i_op::OP_REG, ops.rd, i_f3::AND, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Sll => pack_r(i_op::OP_REG, ops.rd, i_f3::SLL, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Srl => pack_r(i_op::OP_REG, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.rs2, i_f7::SRL),
        Form::Sra => pack_r(i_op::OP_REG, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.rs2, i_f7::SRA),
        Form::Slt => pack_r(i_op::OP_REG, ops.rd, i_f3::SLT, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Sltu => pack_r(i_op::OP_REG, ops.rd, i_f3::SLTU, ops.rs1, ops.rs2, i_f7::ADD),

        Form::Addi => pack_i(i_op::OP_IMM, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.imm),
        Form::Xori => pack_i(i_op::OP_IMM, ops.rd, i_f3::XOR, ops.rs1, ops.imm),
        Form::Ori => pack_i(i_op::OP_IMM, ops.rd, i_f3::OR, ops.rs1, ops.imm),
        Form::Andi => pack_i(i_op::OP_IMM, ops.rd, i_f3::AND, ops.rs1, ops.imm),
        Form::Slti => pack_i(i_op::OP_IMM, ops.rd, i_f3::SLT, ops.rs1, ops.imm),
        Form::Sltiu => pack_i(i_op::OP_IMM, ops.rd, i_f3::SLTU, ops.rs1, ops.imm),
        Form::Slli => pack_i_shift(i_op::OP_IMM, ops.rd, i_f3::SLL, ops.rs1, ops.imm as u32, 0),
        Form::Srli => pack_i_shift(i_op::OP_IMM, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.imm as u32, 0),
        Form::Srai => pack_i_shift(i_op::OP_IMM, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.imm as u32, 0b01_0000),

        Form::Addw => pack_r(i_op::OP_REG_32, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Subw => pack_r(i_op::OP_REG_32, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.rs2, i_f7::SUB),
        Form::Sllw => pack_r(i_op::OP_REG_32, ops.rd, i_f3::SLL, ops.rs1, ops.rs2, i_f7::ADD),
        Form::Srlw => pack_r(i_op::OP_REG_32, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.rs2, i_f7::SRL),
        Form::Sraw => pack_r(i_op::OP_REG_32, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.rs2, i_f7::SRA),
        Form::Addiw => pack_i(i_op::OP_IMM_32, ops.rd, i_f3::ADD_SUB, ops.rs1, ops.imm),
        Form::Slliw => pack_i_shift(i_op::OP_IMM_32, ops.rd, i_f3::SLL, ops.rs1, ops.imm as u32, 0),
        Form::Srliw => pack_i_shift(i_op::OP_IMM_32, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.imm as u32, 0),
        Form::Sraiw => pack_i_shift(i_op::OP_IMM_32, ops.rd, i_f3::SRL_SRA, ops.rs1, ops.imm as u32, 0b01_0000),

        Form::Lb => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LB, ops.rs1, ops.imm),
        Form::Lh => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LH, ops.rs1, ops.imm),
        Form::Lw => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LW, ops.rs1, ops.imm),
        Form::Ld => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LD, ops.rs1, ops.imm),
        Form::Lbu => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LBU, ops.rs1, ops.imm),
        Form::Lhu => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LHU, ops.rs1, ops.imm),
        Form::Lwu => pack_i(i_op::OP_LOAD, ops.rd, i_f3::LWU, ops.rs1, ops.imm),
        Form::Sb => pack_s(i_op::OP_STORE, i_f3::SB, ops.rs1, ops.rs2, ops.imm),
        Form::Sh => pack_s(i_op::OP_STORE, i_f3::SH, ops.rs1, ops.rs2, ops.imm),
        Form::Sw => pack_s(i_op::OP_STORE, i_f3::SW, ops.rs1, ops.rs2, ops.imm),
        Form::Sd => pack_s(i_op::OP_STORE, i_f3::SD, ops.rs1, ops.rs2, ops.imm),

        Form::Beq => pack_b(i_op::OP_BRANCH, i_f3::BEQ, ops.rs1, ops.rs2, ops.imm),
        Form::Bne => pack_b(i_op::OP_BRANCH, i_f3::BNE, ops.rs1, ops.rs2, ops.imm),
        Form::Blt => pack_b(i_op::OP_BRANCH, i_f3::BLT, ops.rs1, ops.rs2, ops.imm),
        Form::Bge => pack_b(i_op::OP_BRANCH, i_f3::BGE, ops.rs1, ops.rs2, ops.imm),
        Form::Bltu => pack_b(i_op::OP_BRANCH, i_f3::BLTU, ops.rs1, ops.rs2, ops.imm),
        Form::Bgeu => pack_b(i_op::OP_BRANCH, i_f3::BGEU, ops.rs1, ops.rs2, ops.imm),
        Form::Jal => pack_j(i_op::OP_JAL, ops.rd, ops.imm),
        Form::Jalr => pack_i(i_op::OP_JALR, ops.rd, i_f3::JALR, ops.rs1, ops.imm),
        Form::Lui => pack_u(i_op::OP_LUI, ops.rd, ops.imm as u32 & 0xF_FFFF),
        Form::Auipc => pack_u(i_op::OP_AUIPC, ops.rd, ops.imm as u32 & 0xF_FFFF),

        Form::Mul => pack_r(i_op::OP_REG, ops.rd, m_f3::MUL, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Mulh => pack_r(i_op::OP_REG, ops.rd, m_f3::MULH, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Mulhsu => pack_r(i_op::OP_REG, ops.rd, m_f3::MULHSU, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Mulhu => pack_r(i_op::OP_REG, ops.rd, m_f3::MULHU, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Div => pack_r(i_op::OP_REG, ops.rd, m_f3::DIV, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Divu => pack_r(i_op::OP_REG, ops.rd, m_f3::DIVU, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Rem => pack_r(i_op::OP_REG, ops.rd, m_f3::REM, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Remu => pack_r(i_op::OP_REG, ops.rd, m_f3::REMU, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Mulw => pack_r(i_op::OP_REG_32, ops.rd, m_f3::MULW, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Divw => pack_r(i_op::OP_REG_32, ops.rd, m_f3::DIVW, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Divuw => pack_r(i_op::OP_REG_32, ops.rd, m_f3::DIVUW, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Remw => pack_r(i_op::OP_REG_32, ops.rd, m_f3::REMW, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),
        Form::Remuw => pack_r(i_op::OP_REG_32, ops.rd, m_f3::REMUW, ops.rs1, ops.rs2, rv64m::FUNCT7_MULDIV),

        Form::Flw => pack_i(f_op::OP_LOAD_FP, ops.rd, f_f3::FLW, ops.rs1, ops.imm),
        Form::Fsw => pack_s(f_op::OP_STORE_FP, f_f3::FSW, ops.rs1, ops.rs2, ops.imm),
        Form::FaddS => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, f_f7::FADD_S),
        Form::FsubS => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, f_f7::FSUB_S),
        Form::FmulS => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, f_f7::FMUL_S),
        Form::FdivS => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, f_f7::FDIV_S),
        Form::FsqrtS => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, 0, f_f7::FSQRT_S),

        Form::Fld => pack_i(f_op::OP_LOAD_FP, ops.rd, super::rv64d::funct3::FLD, ops.rs1, ops.imm),
        Form::Fsd => pack_s(f_op::OP_STORE_FP, super::rv64d::funct3::FSD, ops.rs1, ops.rs2, ops.imm),
        Form::FaddD => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, d_f7::FADD_D),
        Form::FsubD => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, d_f7::FSUB_D),
        Form::FmulD => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, d_f7::FMUL_D),
        Form::FdivD => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, ops.rs2, d_f7::FDIV_D),
        Form::FsqrtD => pack_r(f_op::OP_FP, ops.rd, f_f3::RM_DYN, ops.rs1, 0, d_f7::FSQRT_D),

        Form::Csrrw => pack_i(csr::OP_SYSTEM, ops.rd, csr::funct3::CSRRW, ops.rs1, i64::from(ops.csr)),
    }
}

// `pack_r4` exists for FMA forms; this catalog does not emit any FMA
// instruction yet (spec §4.5 lists no fused-multiply-add sequence), so it
// is unused today but kept alongside the other packers for symmetry with
// the teacher's decode-side field table. Silence the dead-code lint here
// rather than deleting code that documents a real RISC-V instruction format.
#[allow(dead_code)]
fn _unused_r4_packer_reference() -> u32 {
    pack_r4(0, 0, 0, 0, 0, 0, fmt::SINGLE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::isa::instruction::{pack_i, pack_r};

    #[test]
    fn addi_matches_hand_packed_i_type() {
        let ops = Operands::i(10, 11, -5);
        let encoded = u32::from_le_bytes(encode(Form::Addi, &ops));
        let expected = pack_i(i_op::OP_IMM, 10, i_f3::ADD_SUB, 11, -5);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn add_matches_hand_packed_r_type() {
        let ops = Operands::r(1, 2, 3);
        let encoded = u32::from_le_bytes(encode(Form::Add, &ops));
        let expected = pack_r(i_op::OP_REG, 1, i_f3::ADD_SUB, 2, 3, i_f7::ADD);
        assert_eq!(encoded, expected);
    }

    #[test]
    fn csrrw_encodes_csr_field() {
        let ops = Operands::csr(0, 5, csr::MTVEC);
        let encoded = u32::from_le_bytes(encode(Form::Csrrw, &ops));
        assert_eq!((encoded >> 20) & 0xFFF, csr::MTVEC);
    }
}
