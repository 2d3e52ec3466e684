//! RISC-V Base Integer Instruction Set (I), RV64 variant.
//!
//! Opcode/funct3/funct7 values match the teacher's `isa::rv64i` constants
//! (same bit patterns, same names), organized the same way: opcodes,
//! funct3, funct7 as nested modules of constants.

/// Major opcodes (bits 6-0).
pub mod opcodes {
    pub const OP_LOAD: u32 = 0b000_0011;
    pub const OP_IMM: u32 = 0b001_0011;
    pub const OP_AUIPC: u32 = 0b001_0111;
    pub const OP_IMM_32: u32 = 0b001_1011;
    pub const OP_STORE: u32 = 0b010_0011;
    pub const OP_REG: u32 = 0b011_0011;
    pub const OP_LUI: u32 = 0b011_0111;
    pub const OP_REG_32: u32 = 0b011_1011;
    pub const OP_BRANCH: u32 = 0b110_0011;
    pub const OP_JALR: u32 = 0b110_0111;
    pub const OP_JAL: u32 = 0b110_1111;
    pub const OP_SYSTEM: u32 = 0b111_0011;
}

/// `funct3` values, scoped per opcode family.
pub mod funct3 {
    // OP_LOAD / OP_STORE
    pub const LB: u32 = 0b000;
    pub const LH: u32 = 0b001;
    pub const LW: u32 = 0b010;
    pub const LD: u32 = 0b011;
    pub const LBU: u32 = 0b100;
    pub const LHU: u32 = 0b101;
    pub const LWU: u32 = 0b110;
    pub const SB: u32 = 0b000;
    pub const SH: u32 = 0b001;
    pub const SW: u32 = 0b010;
    pub const SD: u32 = 0b011;

    // OP_BRANCH
    pub const BEQ: u32 = 0b000;
    pub const BNE: u32 = 0b001;
    pub const BLT: u32 = 0b100;
    pub const BGE: u32 = 0b101;
    pub const BLTU: u32 = 0b110;
    pub const BGEU: u32 = 0b111;

    // OP_IMM / OP_REG (and the _32 W-variants)
    pub const ADD_SUB: u32 = 0b000;
    pub const SLL: u32 = 0b001;
    pub const SLT: u32 = 0b010;
    pub const SLTU: u32 = 0b011;
    pub const XOR: u32 = 0b100;
    pub const SRL_SRA: u32 = 0b101;
    pub const OR: u32 = 0b110;
    pub const AND: u32 = 0b111;

    pub const JALR: u32 = 0b000;
}

/// `funct7` values for R-type (and shift-immediate `funct7`) instructions.
pub mod funct7 {
    pub const ADD: u32 = 0b000_0000;
    pub const SUB: u32 = 0b010_0000;
    pub const SRL: u32 = 0b000_0000;
    pub const SRA: u32 = 0b010_0000;
}
