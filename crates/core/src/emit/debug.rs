//! Debug YAML serialization (spec §6 "Debug YAML (optional): the memory
//! map, chosen boot and exit addresses, and metadata sufficient to
//! reconstruct the run").

use serde::Serialize;

use crate::gen::engine::RunParams;
use crate::memory::MemoryStore;

#[derive(Serialize)]
struct BankInfo {
    name: String,
    base: String,
    size: u64,
    code: bool,
    data: bool,
    access: &'static str,
}

/// Everything needed to reconstruct how a run was configured and where it
/// placed its boot/exit addresses and memory regions.
#[derive(Serialize)]
pub struct DebugDump {
    generator: String,
    seed: u64,
    max_instructions: u64,
    max_code_bytes: u64,
    boot: String,
    exit: String,
    data_region: Option<String>,
    banks: Vec<BankInfo>,
}

impl DebugDump {
    #[must_use]
    pub fn new(generator: &str, params: &RunParams, store: &MemoryStore) -> Self {
        let banks = store
            .banks()
            .iter()
            .map(|b| BankInfo {
                name: b.name.clone(),
                base: b.base.to_string(),
                size: b.size,
                code: b.code,
                data: b.data,
                access: match b.access {
                    crate::memory::Access::Rx => "rx",
                    crate::memory::Access::Rw => "rw",
                    crate::memory::Access::Rwx => "rwx",
                },
            })
            .collect();

        Self {
            generator: generator.to_string(),
            seed: params.seed,
            max_instructions: params.max_instructions,
            max_code_bytes: params.max_code_bytes,
            boot: store.boot_address().to_string(),
            exit: store.exit_address().to_string(),
            data_region: store.has_distinct_data_bank().then(|| store.data_region_base().to_string()),
            banks,
        }
    }

    /// Renders this run's metadata as a YAML document.
    pub fn to_yaml(&self) -> crate::common::GenResult<String> {
        serde_yaml::to_string(self).map_err(|e| crate::common::GenError::Io(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gen::engine::RunParams;
    use crate::memory::MemoryConfig;

    #[test]
    fn serializes_boot_exit_and_banks() {
        let store = MemoryStore::new(&MemoryConfig::default_layout()).unwrap();
        let params = RunParams::new(42);
        let info = DebugDump::new("simple", &params, &store);
        let yaml = info.to_yaml().unwrap();
        assert!(yaml.contains("generator: simple"));
        assert!(yaml.contains("seed: 42"));
        assert!(yaml.contains("banks:"));
    }
}
