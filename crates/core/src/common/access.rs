//! The narrow interface the ISA catalog's execution step needs from memory.
//!
//! Kept in `common` (rather than `memory`, which implements it) so the `isa`
//! module can depend on it without creating a cycle: `isa` only needs to
//! *call* memory, never to allocate or place it.

use super::addr::Address;
use super::error::Trap;

/// Byte-addressable, permission-checked memory as seen by instruction execution.
pub trait MemoryAccess {
    /// Fetches a 4-byte little-endian instruction word at `addr`.
    ///
    /// Fails with `Trap::FetchMiss` if `addr` has no placed instruction, or
    /// `Trap::InstructionAddressMisaligned` if `addr` violates the
    /// configured instruction alignment.
    fn fetch(&self, addr: Address) -> Result<u32, Trap>;

    /// Reads `len` bytes (1, 2, 4, or 8) at `addr` as a little-endian value,
    /// zero-extended to 64 bits. Fails with `Trap::LoadAccessFault` or
    /// `Trap::AddressMisaligned`.
    fn read(&self, addr: Address, len: u8) -> Result<u64, Trap>;

    /// Writes the low `len` bytes of `value`, little-endian, at `addr`.
    /// Fails with `Trap::StoreAccessFault` or `Trap::AddressMisaligned`.
    fn write(&mut self, addr: Address, len: u8, value: u64) -> Result<(), Trap>;
}
