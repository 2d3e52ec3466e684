//! Memory config input schema (spec §6 "Memory config").
//!
//! Deserialized with `serde_yaml`; the teacher's own `Config` type
//! (`hardware::config`) is likewise a plain serde struct with `#[serde(default)]`
//! fields and hand-written validation rather than a generated-from-schema type.

use serde::Deserialize;

use crate::common::{GenError, GenResult};

use super::bank::Access;

fn default_data_reserve() -> u64 {
    262_144
}

#[derive(Clone, Debug, Deserialize)]
pub struct BankConfig {
    pub name: String,
    pub base: u64,
    pub size: u64,
    #[serde(default)]
    pub code: bool,
    #[serde(default)]
    pub data: bool,
    pub access: Access,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct MemorySettings {
    #[serde(default = "default_data_reserve")]
    pub data_reserve: u64,
    pub boot: Option<u64>,
}

impl MemorySettings {
    fn with_default_reserve() -> Self {
        Self {
            data_reserve: default_data_reserve(),
            boot: None,
        }
    }
}

/// Top-level memory config document.
#[derive(Clone, Debug, Deserialize)]
pub struct MemoryConfig {
    pub banks: Vec<BankConfig>,
    #[serde(default = "MemorySettings::with_default_reserve")]
    pub memory: MemorySettings,
}

impl MemoryConfig {
    /// Parses a YAML document, then validates the shape the engine relies on:
    /// exactly one `code=true` bank, at most one `data=true` bank, no
    /// duplicate bank names, no zero-size banks.
    pub fn from_yaml(text: &str) -> GenResult<Self> {
        let config: Self = serde_yaml::from_str(text).map_err(|e| GenError::ConfigError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> GenResult<()> {
        if self.banks.is_empty() {
            return Err(GenError::ConfigError("memory config declares no banks".into()));
        }
        let code_banks = self.banks.iter().filter(|b| b.code).count();
        if code_banks != 1 {
            return Err(GenError::ConfigError(format!(
                "memory config must declare exactly one code=true bank, found {code_banks}"
            )));
        }
        let data_banks = self.banks.iter().filter(|b| b.data).count();
        if data_banks > 1 {
            return Err(GenError::ConfigError("memory config declares more than one data=true bank".into()));
        }
        let mut names = std::collections::HashSet::new();
        for bank in &self.banks {
            if bank.size == 0 {
                return Err(GenError::ConfigError(format!("bank {} has zero size", bank.name)));
            }
            if !names.insert(bank.name.as_str()) {
                return Err(GenError::ConfigError(format!("duplicate bank name {}", bank.name)));
            }
        }
        Ok(())
    }

    /// Default two-bank layout used by the `simple`/`ldst`/... suite
    /// generators when no `--memory-config` is given: a 256 KiB `rx` code
    /// bank at `0x8000_0000` (spec §8 scenario 1's `0x80000000..0x80040000`
    /// range) followed immediately by a 256 KiB `rw` data bank at
    /// `0x8004_0000`, so the emitted header carries a `# Data region:` line
    /// (scenario 1 names it explicitly; contrast scenario 6's single
    /// unified bank, which suppresses that line).
    #[must_use]
    pub fn default_layout() -> Self {
        Self {
            banks: vec![
                BankConfig {
                    name: "code".into(),
                    base: 0x8000_0000,
                    size: 0x4_0000,
                    code: true,
                    data: false,
                    access: Access::Rx,
                },
                BankConfig {
                    name: "data".into(),
                    base: 0x8004_0000,
                    size: 0x4_0000,
                    code: false,
                    data: true,
                    access: Access::Rw,
                },
            ],
            memory: MemorySettings::with_default_reserve(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_zero_code_banks() {
        let yaml = "banks:\n  - name: ram\n    base: 0\n    size: 1024\n    data: true\n    access: rw\n";
        assert!(MemoryConfig::from_yaml(yaml).is_err());
    }

    #[test]
    fn parses_minimal_single_bank() {
        let yaml = "banks:\n  - name: ram\n    base: 0x80000000\n    size: 262144\n    code: true\n    data: true\n    access: rwx\n";
        let cfg = MemoryConfig::from_yaml(yaml).unwrap();
        assert_eq!(cfg.banks.len(), 1);
        assert_eq!(cfg.memory.data_reserve, 262_144);
    }

    #[test]
    fn default_layout_validates() {
        assert!(MemoryConfig::default_layout().validate().is_ok());
    }
}
