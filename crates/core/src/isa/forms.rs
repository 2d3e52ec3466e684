//! The closed set of instruction forms this catalog knows how to encode,
//! classify, and execute (spec §9 "Dynamic dispatch over sequence types" —
//! the same closed-tagged-variant approach applied to instruction forms).

/// One instruction mnemonic the catalog supports.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Form {
    // RV64I arithmetic/logic, register-register and register-immediate.
    Add,
    Sub,
    Xor,
    Or,
    And,
    Sll,
    Srl,
    Sra,
    Slt,
    Sltu,
    Addi,
    Xori,
    Ori,
    Andi,
    Slli,
    Srli,
    Srai,
    Slti,
    Sltiu,
    Addw,
    Subw,
    Sllw,
    Srlw,
    Sraw,
    Addiw,
    Slliw,
    Srliw,
    Sraiw,

    // RV64I memory.
    Lb,
    Lh,
    Lw,
    Ld,
    Lbu,
    Lhu,
    Lwu,
    Sb,
    Sh,
    Sw,
    Sd,

    // RV64I control flow.
    Beq,
    Bne,
    Blt,
    Bge,
    Bltu,
    Bgeu,
    Jal,
    Jalr,
    Lui,
    Auipc,

    // RV64M.
    Mul,
    Mulh,
    Mulhsu,
    Mulhu,
    Div,
    Divu,
    Rem,
    Remu,
    Mulw,
    Divw,
    Divuw,
    Remw,
    Remuw,

    // RV64F / RV64D.
    Flw,
    Fsw,
    FaddS,
    FsubS,
    FmulS,
    FdivS,
    FsqrtS,
    Fld,
    Fsd,
    FaddD,
    FsubD,
    FmulD,
    FdivD,
    FsqrtD,

    // Zicsr.
    Csrrw,
}

/// A generic operand bag. Not every field is meaningful for every `Form`;
/// `encode`/`step` each read only the fields their form uses, mirroring the
/// teacher's `Decoded` struct (which carries the union of all decodable
/// fields rather than a per-opcode type).
#[derive(Clone, Copy, Debug, Default)]
pub struct Operands {
    pub rd: usize,
    pub rs1: usize,
    pub rs2: usize,
    /// Sign-extended immediate, or branch/jump byte displacement, or (for
    /// `Lui`/`Auipc`) the 20-bit upper-immediate value.
    pub imm: i64,
    /// CSR address, meaningful only for `Csrrw`.
    pub csr: u32,
}

impl Operands {
    #[must_use]
    pub fn r(rd: usize, rs1: usize, rs2: usize) -> Self {
        Self {
            rd,
            rs1,
            rs2,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn i(rd: usize, rs1: usize, imm: i64) -> Self {
        Self {
            rd,
            rs1,
            imm,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn s(rs1: usize, rs2: usize, imm: i64) -> Self {
        Self {
            rs1,
            rs2,
            imm,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn b(rs1: usize, rs2: usize, imm: i64) -> Self {
        Self {
            rs1,
            rs2,
            imm,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn u(rd: usize, imm: i64) -> Self {
        Self {
            rd,
            imm,
            ..Default::default()
        }
    }

    #[must_use]
    pub fn csr(rd: usize, rs1: usize, csr: u32) -> Self {
        Self {
            rd,
            rs1,
            csr,
            ..Default::default()
        }
    }
}
