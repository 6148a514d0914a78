//! Attack-rate and crit-rate tables produced by cycle models

use crate::types::Ability;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Rate of one ability: attacks per second, or per combo-point size for
/// finishers (index 0 unused)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Rate {
    Scalar(f64),
    PerCp([f64; 6]),
}

impl Rate {
    pub fn total(&self) -> f64 {
        match self {
            Rate::Scalar(v) => *v,
            Rate::PerCp(values) => values.iter().sum(),
        }
    }

    /// Largest element-wise difference; infinite when shapes differ or a
    /// value is not finite
    fn delta(&self, other: &Rate) -> f64 {
        match (self, other) {
            (Rate::Scalar(a), Rate::Scalar(b)) => finite_or_inf((a - b).abs()),
            (Rate::PerCp(a), Rate::PerCp(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| finite_or_inf((x - y).abs()))
                .fold(0.0, f64::max),
            _ => f64::INFINITY,
        }
    }
}

fn finite_or_inf(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        f64::INFINITY
    }
}

/// Attacks per second per ability, plus damage-proc hit rates by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttackRateTable {
    rates: BTreeMap<Ability, Rate>,
    #[serde(default)]
    procs: BTreeMap<String, f64>,
}

impl AttackRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ability: Ability, rate: f64) {
        self.rates.insert(ability, Rate::Scalar(rate));
    }

    pub fn set_per_cp(&mut self, ability: Ability, rates: [f64; 6]) {
        self.rates.insert(ability, Rate::PerCp(rates));
    }

    pub fn get(&self, ability: Ability) -> Option<&Rate> {
        self.rates.get(&ability)
    }

    pub fn contains(&self, ability: Ability) -> bool {
        self.rates.contains_key(&ability)
    }

    /// Total rate of an ability, summed over combo-point sizes; zero when absent
    pub fn total(&self, ability: Ability) -> f64 {
        self.rates.get(&ability).map(Rate::total).unwrap_or(0.0)
    }

    /// Per-size rates of a finisher; scalar entries are not finishers
    pub fn per_cp(&self, ability: Ability) -> Option<&[f64; 6]> {
        match self.rates.get(&ability) {
            Some(Rate::PerCp(values)) => Some(values),
            _ => None,
        }
    }

    /// Scale an ability's rate in place
    pub fn scale(&mut self, ability: Ability, factor: f64) {
        match self.rates.get_mut(&ability) {
            Some(Rate::Scalar(v)) => *v *= factor,
            Some(Rate::PerCp(values)) => values.iter_mut().for_each(|v| *v *= factor),
            None => {}
        }
    }

    /// Add to a scalar rate, inserting it when absent
    pub fn add(&mut self, ability: Ability, rate: f64) {
        let current = self.total(ability);
        self.set(ability, current + rate);
    }

    pub fn set_proc_rate(&mut self, name: &str, rate: f64) {
        self.procs.insert(name.to_string(), rate);
    }

    pub fn proc_rate(&self, name: &str) -> f64 {
        self.procs.get(name).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ability, &Rate)> {
        self.rates.iter()
    }

    /// Largest element-wise change of `self` relative to `previous`, over the
    /// abilities of `self`. An ability missing from `previous` counts as an
    /// infinite change.
    pub fn max_delta(&self, previous: &AttackRateTable) -> f64 {
        self.rates
            .iter()
            .map(|(ability, rate)| match previous.rates.get(ability) {
                Some(old) => rate.delta(old),
                None => f64::INFINITY,
            })
            .fold(0.0, f64::max)
    }

    pub fn is_close_to(&self, previous: &AttackRateTable, tolerance: f64) -> bool {
        self.max_delta(previous) <= tolerance
    }
}

/// Crit chance per ability, co-indexed with [`AttackRateTable`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CritRateTable {
    rates: BTreeMap<Ability, f64>,
}

impl CritRateTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, ability: Ability, rate: f64) {
        self.rates.insert(ability, rate);
    }

    /// Crit chance of an ability, zero when it has no entry
    pub fn get(&self, ability: Ability) -> f64 {
        self.rates.get(&ability).copied().unwrap_or(0.0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Ability, &f64)> {
        self.rates.iter()
    }
}

impl FromIterator<(Ability, f64)> for CritRateTable {
    fn from_iter<I: IntoIterator<Item = (Ability, f64)>>(iter: I) -> Self {
        CritRateTable {
            rates: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_totals_and_scaling() {
        let mut table = AttackRateTable::new();
        table.set(Ability::Mutilate, 0.4);
        table.set_per_cp(Ability::Envenom, [0.0, 0.0, 0.0, 0.1, 0.2, 0.05]);
        assert!((table.total(Ability::Envenom) - 0.35).abs() < 1e-12);
        assert_eq!(table.total(Ability::Backstab), 0.0);

        table.scale(Ability::Envenom, 2.0);
        assert!((table.per_cp(Ability::Envenom).unwrap()[4] - 0.4).abs() < 1e-12);
        assert!(table.per_cp(Ability::Mutilate).is_none());
    }

    #[test]
    fn test_closeness_is_element_wise() {
        let mut old = AttackRateTable::new();
        old.set(Ability::Backstab, 1.0);
        old.set_per_cp(Ability::Eviscerate, [0.0, 0.0, 0.0, 0.0, 0.0, 0.2]);

        let mut new = old.clone();
        new.set_per_cp(Ability::Eviscerate, [0.0, 0.0, 0.0, 0.0, 0.0, 0.2 + 5e-8]);
        assert!(new.is_close_to(&old, 1e-7));

        new.set(Ability::Backstab, 1.0 + 2e-7);
        assert!(!new.is_close_to(&old, 1e-7));
    }

    #[test]
    fn test_new_ability_is_not_close() {
        let old = AttackRateTable::new();
        let mut new = AttackRateTable::new();
        new.set(Ability::Ambush, 0.0);
        assert!(!new.is_close_to(&old, 1e-7));
        // abilities dropped from the new table are ignored
        assert!(old.is_close_to(&new, 1e-7));
    }

    #[test]
    fn test_nan_is_never_close() {
        let mut old = AttackRateTable::new();
        old.set(Ability::Hemorrhage, f64::NAN);
        let new = old.clone();
        assert!(!new.is_close_to(&old, 1e-7));
    }

    #[test]
    fn test_proc_rates_are_separate() {
        let mut table = AttackRateTable::new();
        table.set_proc_rate("darkmoon_card_hurricane", 0.02);
        assert!((table.proc_rate("darkmoon_card_hurricane") - 0.02).abs() < f64::EPSILON);
        assert_eq!(table.iter().count(), 0);
    }

    #[test]
    fn test_crit_table_defaults_to_zero() {
        let crits: CritRateTable = [(Ability::Mutilate, 0.4)].into_iter().collect();
        assert!((crits.get(Ability::Mutilate) - 0.4).abs() < f64::EPSILON);
        assert_eq!(crits.get(Ability::Ambush), 0.0);
    }
}
