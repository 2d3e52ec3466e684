//! Assembly-text serialization (spec §6 "Outputs" / "Assembly text file").
//!
//! Walks the finished `MemoryStore`'s placement map in address order and
//! renders the header comment block, a `.section .text` with one
//! address-prefixed instruction per line, and, when the code and data banks
//! are distinct, a `.section .data` with data offsets relative to the data
//! bank's base (left for the linker script to position).

use crate::isa;
use crate::memory::{Cell, MemoryStore};

/// Renders `store` as a complete assembly source file.
#[must_use]
pub fn render_assembly(store: &MemoryStore) -> String {
    let mut out = String::new();
    write_header(&mut out, store);
    out.push_str("\n.section .text\n");
    for (addr, cell) in store.placements().iter() {
        if let Cell::Instruction { form, operands, .. } = cell {
            out.push_str(&format!("{addr}:\t{}\n", isa::render(*form, operands)));
        }
    }

    if store.has_distinct_data_bank() {
        let data_base = store.data_region_base().value();
        let mut any_data = false;
        let mut data_section = String::new();
        for (addr, cell) in store.placements().iter() {
            if let Cell::Data(bytes) = cell {
                any_data = true;
                let offset = addr.value() - data_base;
                data_section.push_str(&format!("\t.org {offset:#x}\n"));
                emit_byte_directives(&mut data_section, bytes);
            }
        }
        if any_data {
            out.push_str("\n.section .data\n");
            out.push_str(&data_section);
        }
    }

    out
}

fn write_header(out: &mut String, store: &MemoryStore) {
    let code = store.code_bank();
    out.push_str(&format!("# Load address: {}\n", code.base));
    out.push_str(&format!("# RAM size: {:#x}\n", code.size));
    out.push_str(&format!("# Boot: {}\n", store.boot_address()));
    out.push_str(&format!("# Exit: {}\n", store.exit_address()));
    if store.has_distinct_data_bank() {
        out.push_str(&format!("# Data region: {}\n", store.data_region_base()));
    }
}

/// Emits `bytes` as `.byte` directives, eight per line, matching the dense
/// layout the teacher's own linker-script fixtures use for inline blobs.
fn emit_byte_directives(out: &mut String, bytes: &[u8]) {
    for chunk in bytes.chunks(8) {
        let rendered: Vec<String> = chunk.iter().map(|b| format!("{b:#04x}")).collect();
        out.push_str(&format!("\t.byte {}\n", rendered.join(", ")));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::Address;
    use crate::isa::{Form, Operands};
    use crate::memory::MemoryConfig;

    #[test]
    fn header_lists_boot_and_exit_and_data_region() {
        let yaml = "banks:\n  - name: rom\n    base: 0x80000000\n    size: 0x10000\n    code: true\n    access: rx\n  - name: ram\n    base: 0x90000000\n    size: 0x10000\n    data: true\n    access: rw\n";
        let config = MemoryConfig::from_yaml(yaml).unwrap();
        let mut store = MemoryStore::new(&config).unwrap();
        store.set_boot_address(Address::new(0x8000_0000));
        store.reserve_exit_region(Address::new(0x8000_0100)).unwrap();
        let text = render_assembly(&store);
        assert!(text.contains("# Boot: 0x0000000080000000"));
        assert!(text.contains("# Exit: 0x0000000080000100"));
        assert!(text.contains("# Data region: 0x0000000090000000"));
    }

    #[test]
    fn places_one_instruction_per_line_prefixed_by_address() {
        let mut store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
        let addr = store.allocate_code(4, 4).unwrap();
        store.place_instruction(addr, Form::Addi, Operands::i(1, 0, 7)).unwrap();
        let text = render_assembly(&store);
        assert!(text.contains(&format!("{addr}:\taddi ra, zero, 7")));
    }

    #[test]
    fn omits_data_section_body_when_no_data_has_been_placed() {
        let store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
        let text = render_assembly(&store);
        assert!(!text.contains(".section .data"));
    }

    #[test]
    fn omits_data_region_header_line_for_a_single_unified_bank() {
        let yaml = "banks:\n  - name: ram\n    base: 0x80000000\n    size: 0x80000\n    code: true\n    data: true\n    access: rwx\n";
        let config = MemoryConfig::from_yaml(yaml).unwrap();
        let store = MemoryStore::new(&config).unwrap();
        let text = render_assembly(&store);
        assert!(!text.contains("# Data region:"));
    }
}
