//! `GenData`: the item a sequence yields (spec §4.5).

use crate::isa::{Form, Operands};

/// One item produced by a sequence, consumed by the Engine.
#[derive(Clone, Debug)]
pub enum GenData {
    /// To be placed at the current PC.
    Instr(Form, Operands),
    /// To be placed in a data region; the producing sequence is told the
    /// allocated address on its next `next()` call (spec §4.5, §9
    /// "back-channel from data allocation").
    DataBlob { bytes: Vec<u8>, alignment: u64, purpose: &'static str },
    /// Asks the engine to pre-reserve a code address some later branch will
    /// target.
    Reserve(crate::common::Address),
}
