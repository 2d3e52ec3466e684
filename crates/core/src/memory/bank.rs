//! Named, contiguous memory regions and their access rights (spec §3 "Bank").

use serde::Deserialize;

use crate::common::Address;

/// Access rights a bank grants. `Execute` is implied present in `Rx`/`Rwx`;
/// `Read`/`Write` in `Rw`/`Rwx`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    Rx,
    Rw,
    Rwx,
}

impl Access {
    #[must_use]
    pub fn allows_execute(self) -> bool {
        matches!(self, Access::Rx | Access::Rwx)
    }

    #[must_use]
    pub fn allows_read(self) -> bool {
        matches!(self, Access::Rw | Access::Rwx)
    }

    #[must_use]
    pub fn allows_write(self) -> bool {
        matches!(self, Access::Rw | Access::Rwx)
    }
}

/// A named `[base, base+size)` byte range with a declared access mode
/// (spec §3).
#[derive(Clone, Debug)]
pub struct Bank {
    pub name: String,
    pub base: Address,
    pub size: u64,
    pub code: bool,
    pub data: bool,
    pub access: Access,
}

impl Bank {
    #[must_use]
    pub fn end(&self) -> Address {
        self.base.wrapping_add(self.size)
    }

    #[must_use]
    pub fn contains(&self, addr: Address) -> bool {
        addr.in_range(self.base.value(), self.size)
    }
}
