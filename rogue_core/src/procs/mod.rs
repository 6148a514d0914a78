//! Proc definitions, per-call uptime scratch and trigger counting
//!
//! A [`ProcDef`] is immutable build data. Uptimes computed while converging
//! live in [`ProcState`] records owned by a single calculation.

mod triggers;
mod uptime;

pub use triggers::procs_per_second;
pub use uptime::{icd_limited_rate, uptime};

use crate::config::{default_catalog, ConfigError, ProcCatalog};
use crate::types::{Hand, StatKey};
use serde::{Deserialize, Serialize};

/// What a proc does when it fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcEffect {
    Agi,
    Ap,
    Crit,
    Haste,
    Mastery,
    SpellDamage,
    PhysicalDamage,
    /// Fractional bonus to autoattack damage while up
    AutoattackDamage,
    /// Guaranteed crit on the next direct-damage finisher
    FinisherCrit,
}

impl ProcEffect {
    /// The convergence stat this effect boosts, if any
    pub fn stat(&self) -> Option<StatKey> {
        match self {
            ProcEffect::Agi => Some(StatKey::Agi),
            ProcEffect::Ap => Some(StatKey::Ap),
            ProcEffect::Crit => Some(StatKey::Crit),
            ProcEffect::Haste => Some(StatKey::Haste),
            ProcEffect::Mastery => Some(StatKey::Mastery),
            _ => None,
        }
    }

    pub fn is_damage(&self) -> bool {
        matches!(self, ProcEffect::SpellDamage | ProcEffect::PhysicalDamage)
    }
}

/// Trigger model: flat chance per eligible hit, or procs per minute
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcRate {
    Chance(f64),
    Ppm(f64),
}

impl ProcRate {
    pub fn is_ppm(&self) -> bool {
        matches!(self, ProcRate::Ppm(_))
    }

    /// Chance per eligible hit; PPM converts through the weapon speed
    pub fn per_hit(&self, weapon_speed: f64) -> f64 {
        match self {
            ProcRate::Chance(chance) => *chance,
            ProcRate::Ppm(ppm) => ppm * weapon_speed / 60.0,
        }
    }
}

/// Which events can trigger a proc
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TriggerSources {
    pub auto_attacks: bool,
    pub strikes: bool,
    pub apply_debuff: bool,
    pub harmful_spells: bool,
    pub periodic_spell_damage: bool,
    pub bleeds: bool,
    pub crit_only: bool,
}

impl TriggerSources {
    /// Standard melee trinket triggers
    pub fn melee() -> Self {
        TriggerSources {
            auto_attacks: true,
            strikes: true,
            ..Default::default()
        }
    }

    /// Whether anything other than weapon swings can trigger
    pub fn has_spell_sources(&self) -> bool {
        self.harmful_spells || self.periodic_spell_damage || self.bleeds
    }
}

fn default_max_stacks() -> u32 {
    1
}

/// Immutable description of a proc
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcDef {
    pub name: String,
    pub effect: ProcEffect,
    pub value: f64,
    #[serde(default)]
    pub duration: f64,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Internal cooldown in seconds
    #[serde(default)]
    pub icd: Option<f64>,
    pub rate: ProcRate,
    #[serde(default = "TriggerSources::melee")]
    pub triggers: TriggerSources,
    /// Restricts triggering to one weapon (weapon enchants)
    #[serde(default)]
    pub hand: Option<Hand>,
}

impl ProcDef {
    /// ICD in seconds when one is set and positive
    pub fn active_icd(&self) -> Option<f64> {
        self.icd.filter(|icd| *icd > 0.0)
    }
}

/// Working record for one proc during one calculation
#[derive(Debug, Clone, Copy)]
pub struct ProcState<'a> {
    pub def: &'a ProcDef,
    pub uptime: f64,
}

impl<'a> ProcState<'a> {
    pub fn new(def: &'a ProcDef) -> Self {
        ProcState { def, uptime: 0.0 }
    }

    /// Average contribution to the boosted stat
    pub fn expected_value(&self) -> f64 {
        self.uptime * self.def.value
    }
}

/// A proc as written in a build file: a catalog name or an inline table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProcEntry {
    Named(String),
    Inline(ProcDef),
}

/// The procs active on a build
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<ProcEntry>", into = "Vec<ProcEntry>")]
pub struct ProcsList {
    procs: Vec<ProcDef>,
}

impl ProcsList {
    pub fn new(procs: impl IntoIterator<Item = ProcDef>) -> Self {
        let mut list = ProcsList::default();
        for def in procs {
            list.add(def);
        }
        list
    }

    /// Resolve catalog names
    pub fn from_names<S: AsRef<str>>(names: &[S], catalog: &ProcCatalog) -> Result<Self, ConfigError> {
        let mut list = ProcsList::default();
        for name in names {
            list.add(catalog.resolve(name.as_ref())?.clone());
        }
        Ok(list)
    }

    /// Add a proc, replacing any proc of the same name
    pub fn add(&mut self, def: ProcDef) {
        self.remove(&def.name);
        self.procs.push(def);
    }

    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.procs.len();
        self.procs.retain(|p| p.name != name);
        self.procs.len() != before
    }

    pub fn contains(&self, name: &str) -> bool {
        self.procs.iter().any(|p| p.name == name)
    }

    pub fn get(&self, name: &str) -> Option<&ProcDef> {
        self.procs.iter().find(|p| p.name == name)
    }

    /// First proc with the given effect
    pub fn by_effect(&self, effect: ProcEffect) -> Option<&ProcDef> {
        self.procs.iter().find(|p| p.effect == effect)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ProcDef> {
        self.procs.iter()
    }

    pub fn len(&self) -> usize {
        self.procs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.procs.is_empty()
    }
}

impl TryFrom<Vec<ProcEntry>> for ProcsList {
    type Error = ConfigError;

    fn try_from(entries: Vec<ProcEntry>) -> Result<Self, Self::Error> {
        let catalog = default_catalog()?;
        let mut list = ProcsList::default();
        for entry in entries {
            match entry {
                ProcEntry::Named(name) => list.add(catalog.resolve(&name)?.clone()),
                ProcEntry::Inline(def) => list.add(def),
            }
        }
        Ok(list)
    }
}

impl From<ProcsList> for Vec<ProcEntry> {
    fn from(list: ProcsList) -> Self {
        list.procs.into_iter().map(ProcEntry::Inline).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trinket(name: &str) -> ProcDef {
        ProcDef {
            name: name.to_string(),
            effect: ProcEffect::Haste,
            value: 1000.0,
            duration: 15.0,
            max_stacks: 1,
            icd: Some(75.0),
            rate: ProcRate::Chance(0.1),
            triggers: TriggerSources::melee(),
            hand: None,
        }
    }

    #[test]
    fn test_ppm_conversion() {
        assert!((ProcRate::Ppm(1.0).per_hit(1.8) - 0.03).abs() < 1e-12);
        assert!((ProcRate::Chance(0.15).per_hit(2.6) - 0.15).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_replaces_same_name() {
        let mut list = ProcsList::new([trinket("a"), trinket("b")]);
        let mut replacement = trinket("a");
        replacement.value = 5.0;
        list.add(replacement);
        assert_eq!(list.len(), 2);
        assert_eq!(list.get("a").map(|p| p.value), Some(5.0));
        assert!(list.remove("b"));
        assert!(!list.remove("b"));
    }

    #[test]
    fn test_parse_named_and_inline() {
        #[derive(Deserialize)]
        struct Wrapper {
            procs: ProcsList,
        }
        let parsed: Wrapper = toml::from_str(
            r#"
procs = [
    "fluid_death",
    { name = "homebrew", effect = "agi", value = 500.0, duration = 10.0, icd = 45.0, rate = { chance = 0.2 } },
]
"#,
        )
        .unwrap();
        assert!(parsed.procs.contains("fluid_death"));
        let homebrew = parsed.procs.get("homebrew").unwrap();
        assert_eq!(homebrew.active_icd(), Some(45.0));
        assert!(homebrew.triggers.strikes);
    }

    #[test]
    fn test_unknown_name_is_rejected() {
        let result: Result<ProcsList, _> =
            ProcsList::try_from(vec![ProcEntry::Named("not_a_trinket".to_string())]);
        assert!(result.is_err());
    }

    #[test]
    fn test_effect_stats() {
        assert_eq!(ProcEffect::Mastery.stat(), Some(StatKey::Mastery));
        assert_eq!(ProcEffect::SpellDamage.stat(), None);
        assert!(ProcEffect::PhysicalDamage.is_damage());
        assert!(!ProcEffect::FinisherCrit.is_damage());
    }
}
