//! Proc catalog loading

use super::ConfigError;
use crate::procs::ProcDef;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProcsConfig {
    #[serde(default)]
    procs: Vec<ProcDef>,
}

/// Named proc definitions that build files can refer to
#[derive(Debug, Clone, Default)]
pub struct ProcCatalog {
    procs: BTreeMap<String, ProcDef>,
}

impl ProcCatalog {
    fn from_config(config: ProcsConfig) -> Result<Self, ConfigError> {
        let mut procs = BTreeMap::new();
        for def in config.procs {
            if def.duration < 0.0 || def.value.is_nan() {
                return Err(ConfigError::ValidationError(format!(
                    "proc '{}' has an invalid duration or value",
                    def.name
                )));
            }
            if procs.insert(def.name.clone(), def).is_some() {
                return Err(ConfigError::ValidationError(
                    "duplicate proc name in catalog".to_string(),
                ));
            }
        }
        Ok(ProcCatalog { procs })
    }

    pub fn get(&self, name: &str) -> Option<&ProcDef> {
        self.procs.get(name)
    }

    /// Look up a proc, failing on unknown names
    pub fn resolve(&self, name: &str) -> Result<&ProcDef, ConfigError> {
        self.procs.get(name).ok_or_else(|| ConfigError::UnknownEntry {
            kind: "proc",
            name: name.to_string(),
        })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.procs.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

/// Load a proc catalog from a TOML file
pub fn load_proc_catalog(path: &Path) -> Result<ProcCatalog, ConfigError> {
    let config: ProcsConfig = super::load_toml(path)?;
    ProcCatalog::from_config(config)
}

/// Load a proc catalog from a TOML string
pub fn parse_proc_catalog(content: &str) -> Result<ProcCatalog, ConfigError> {
    let config: ProcsConfig = super::parse_toml(content)?;
    ProcCatalog::from_config(config)
}

const EMBEDDED_CATALOG: &str = include_str!("../../config/procs.toml");

/// Catalog shipped with the crate, parsed on first use
pub fn default_catalog() -> Result<&'static ProcCatalog, ConfigError> {
    static CATALOG: OnceLock<Result<ProcCatalog, String>> = OnceLock::new();
    CATALOG
        .get_or_init(|| parse_proc_catalog(EMBEDDED_CATALOG).map_err(|err| err.to_string()))
        .as_ref()
        .map_err(|err| ConfigError::ValidationError(format!("embedded proc catalog: {}", err)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procs::{ProcEffect, ProcRate};

    #[test]
    fn test_embedded_catalog_parses() {
        let parsed = parse_proc_catalog(EMBEDDED_CATALOG).unwrap();
        let catalog = default_catalog().unwrap();
        assert_eq!(parsed.len(), catalog.len());
        assert!(!catalog.is_empty());
        let fluid_death = catalog.get("fluid_death").unwrap();
        assert_eq!(fluid_death.max_stacks, 10);
        assert_eq!(fluid_death.active_icd(), None);

        let t11 = catalog.get("rogue_t11_4pc").unwrap();
        assert_eq!(t11.effect, ProcEffect::FinisherCrit);

        let hurricane = catalog.get("darkmoon_card_hurricane").unwrap();
        assert!(hurricane.rate.is_ppm());
    }

    #[test]
    fn test_crit_only_entries() {
        let eye = default_catalog().unwrap().get("heroic_left_eye_of_rajh").unwrap();
        assert!(eye.triggers.crit_only);
        assert_eq!(eye.rate, ProcRate::Chance(0.3));
    }

    #[test]
    fn test_resolve_unknown() {
        let err = default_catalog().unwrap().resolve("bauble").unwrap_err();
        assert!(err.to_string().contains("bauble"));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let toml = r#"
[[procs]]
name = "twin"
effect = "agi"
value = 1.0
rate = { chance = 0.1 }

[[procs]]
name = "twin"
effect = "ap"
value = 1.0
rate = { chance = 0.1 }
"#;
        assert!(matches!(
            parse_proc_catalog(toml),
            Err(ConfigError::ValidationError(_))
        ));
    }
}
