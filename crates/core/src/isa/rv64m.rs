//! RISC-V Integer Multiply/Divide Extension (M), RV64 variant.

/// `funct7` selector shared by every M-extension instruction (layered over
/// `OP_REG`/`OP_REG_32` from rv64i).
pub const FUNCT7_MULDIV: u32 = 0b000_0001;

pub mod funct3 {
    pub const MUL: u32 = 0b000;
    pub const MULH: u32 = 0b001;
    pub const MULHSU: u32 = 0b010;
    pub const MULHU: u32 = 0b011;
    pub const DIV: u32 = 0b100;
    pub const DIVU: u32 = 0b101;
    pub const REM: u32 = 0b110;
    pub const REMU: u32 = 0b111;

    // RV64-only _W forms use OP_REG_32 with the same funct3 set, excluding
    // MULH/MULHSU/MULHU (not defined for the 32-bit-result W variants).
    pub const MULW: u32 = 0b000;
    pub const DIVW: u32 = 0b100;
    pub const DIVUW: u32 = 0b101;
    pub const REMW: u32 = 0b110;
    pub const REMUW: u32 = 0b111;
}
