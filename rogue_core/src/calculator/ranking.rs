//! Stat weights and rankings by perturbing a copy of the build
//!
//! Each perturbation re-runs the whole model on its own clone, so they are
//! evaluated in parallel.

use super::RogueDamageCalculator;
use crate::build::{Build, GearBuff, Glyph, Stats, Talent, WeaponEnchant};
use crate::config::default_catalog;
use crate::error::{DpsError, Unmodeled};
use crate::types::{Hand, Spec};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use tracing::warn;

/// Rating (or points) added to a stat when measuring its weight
pub const EP_DELTA: f64 = 100.0;

/// Stats with an equivalence-point weight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EpStat {
    Str,
    Agi,
    Ap,
    Crit,
    Hit,
    Exp,
    Haste,
    Mastery,
}

impl EpStat {
    pub fn all() -> &'static [EpStat] {
        &[
            EpStat::Str,
            EpStat::Agi,
            EpStat::Ap,
            EpStat::Crit,
            EpStat::Hit,
            EpStat::Exp,
            EpStat::Haste,
            EpStat::Mastery,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            EpStat::Str => "str",
            EpStat::Agi => "agi",
            EpStat::Ap => "ap",
            EpStat::Crit => "crit",
            EpStat::Hit => "hit",
            EpStat::Exp => "exp",
            EpStat::Haste => "haste",
            EpStat::Mastery => "mastery",
        }
    }

    fn stat_mut<'s>(&self, stats: &'s mut Stats) -> &'s mut f64 {
        match self {
            EpStat::Str => &mut stats.str,
            EpStat::Agi => &mut stats.agi,
            EpStat::Ap => &mut stats.ap,
            EpStat::Crit => &mut stats.crit,
            EpStat::Hit => &mut stats.hit,
            EpStat::Exp => &mut stats.exp,
            EpStat::Haste => &mut stats.haste,
            EpStat::Mastery => &mut stats.mastery,
        }
    }
}

impl fmt::Display for EpStat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rescale weights so that `reference` is worth 1.0. `None` when the
/// reference stat is missing or worth nothing.
pub fn normalize_ep(ep: &BTreeMap<EpStat, f64>, reference: EpStat) -> Option<BTreeMap<EpStat, f64>> {
    let scale = *ep.get(&reference)?;
    if scale == 0.0 {
        return None;
    }
    Some(ep.iter().map(|(stat, value)| (*stat, value / scale)).collect())
}

/// DPS value of talent points
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TalentRanking {
    /// Talents with points in the specialization tree: DPS lost by removing one
    pub main_tree: BTreeMap<Talent, f64>,
    /// Empty talents in the other trees: DPS gained by adding one
    pub off_trees: BTreeMap<Talent, f64>,
}

/// Which weapon comparisons to run
#[derive(Debug, Clone, Default)]
pub struct WeaponEpQuery {
    /// DPS per point of weapon DPS
    pub dps: bool,
    /// Each enchant against an unenchanted weapon
    pub enchants: bool,
    /// Weapon speeds to compare at constant weapon DPS
    pub speeds: Vec<f64>,
}

/// Weapon comparisons for one hand
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct WeaponEp {
    pub dps: Option<f64>,
    pub enchants: BTreeMap<WeaponEnchant, f64>,
    /// Keyed by speed with two decimals
    pub speeds: BTreeMap<String, f64>,
}

/// What `get_other_ep` toggles
#[derive(Debug, Clone, Copy)]
enum OtherEffect {
    GearBuff(GearBuff),
    Proc,
}

impl RogueDamageCalculator<'_> {
    /// DPS per point of each stat
    pub fn get_ep(&self) -> Result<BTreeMap<EpStat, f64>, DpsError> {
        let baseline = self.get_dps()?;
        EpStat::all()
            .par_iter()
            .map(|stat| {
                let dps = self.dps_for(&with_stat_delta(self.build, *stat))?;
                Ok((*stat, (dps - baseline) / EP_DELTA))
            })
            .collect()
    }

    /// DPS change from one point more or less in each talent. Perturbations
    /// that leave the build unmodelled are skipped.
    pub fn get_talents_ranking(&self) -> Result<TalentRanking, DpsError> {
        let baseline = self.get_dps()?;
        let main = self
            .build
            .talents
            .specialization()
            .ok_or_else(|| self.not_modeled(Unmodeled::NoSpecialization))?;
        let talents = &self.build.talents;

        let candidates: Vec<(Talent, bool)> = Spec::all()
            .iter()
            .flat_map(|spec| Talent::tree_talents(*spec).iter().copied())
            .filter_map(|talent| {
                let rank = talents.rank(talent);
                if talent.tree() == main {
                    (rank > 0).then_some((talent, true))
                } else {
                    (rank == 0).then_some((talent, false))
                }
            })
            .collect();

        let results: Vec<(Talent, bool, f64)> = candidates
            .par_iter()
            .filter_map(|&(talent, in_main_tree)| {
                let mut build = self.build.clone();
                let rank = build.talents.rank(talent);
                let perturbed = if in_main_tree { rank - 1 } else { rank + 1 };
                build.talents.set_rank(talent, perturbed);
                match self.dps_for(&build) {
                    Ok(dps) if in_main_tree => Some((talent, true, baseline - dps)),
                    Ok(dps) => Some((talent, false, dps - baseline)),
                    Err(err) => {
                        warn!(%talent, %err, "Skipping talent perturbation");
                        None
                    }
                }
            })
            .collect();

        let mut ranking = TalentRanking::default();
        for (talent, in_main_tree, value) in results {
            if in_main_tree {
                ranking.main_tree.insert(talent, value);
            } else {
                ranking.off_trees.insert(talent, value);
            }
        }
        Ok(ranking)
    }

    /// DPS with each glyph minus DPS without it
    pub fn get_glyphs_ranking(&self, glyphs: &[Glyph]) -> Result<BTreeMap<Glyph, f64>, DpsError> {
        glyphs
            .par_iter()
            .map(|glyph| {
                let mut with = self.build.clone();
                with.glyphs.set(*glyph, true);
                let mut without = self.build.clone();
                without.glyphs.set(*glyph, false);
                Ok((*glyph, self.dps_for(&with)? - self.dps_for(&without)?))
            })
            .collect()
    }

    /// DPS with each named proc or gear buff minus DPS without it
    pub fn get_other_ep<S: AsRef<str>>(
        &self,
        names: &[S],
    ) -> Result<BTreeMap<String, f64>, DpsError> {
        let catalog = default_catalog().ok();
        let lookup = |name: &str| catalog.and_then(|catalog| catalog.get(name));
        let effects = names
            .iter()
            .map(|name| {
                let name = name.as_ref();
                if let Ok(buff) = name.parse::<GearBuff>() {
                    Ok((name, OtherEffect::GearBuff(buff)))
                } else if lookup(name).is_some() {
                    Ok((name, OtherEffect::Proc))
                } else {
                    Err(self.not_modeled(Unmodeled::UnknownEffect(name.to_string())))
                }
            })
            .collect::<Result<Vec<_>, _>>()?;

        effects
            .par_iter()
            .map(|&(name, effect)| {
                let mut with = self.build.clone();
                let mut without = self.build.clone();
                match effect {
                    OtherEffect::GearBuff(buff) => {
                        with.stats.gear_buffs.set(buff, true);
                        without.stats.gear_buffs.set(buff, false);
                    }
                    OtherEffect::Proc => {
                        if let Some(def) = lookup(name) {
                            if !with.stats.procs.contains(name) {
                                with.stats.procs.add(def.clone());
                            }
                        }
                        without.stats.procs.remove(name);
                    }
                }
                Ok((name.to_string(), self.dps_for(&with)? - self.dps_for(&without)?))
            })
            .collect()
    }

    /// Weapon comparisons for the main hand and the off hand
    pub fn get_weapon_ep(&self, query: &WeaponEpQuery) -> Result<(WeaponEp, WeaponEp), DpsError> {
        let baseline = self.get_dps()?;
        let mh = self.weapon_ep(Hand::MainHand, query, baseline)?;
        let oh = self.weapon_ep(Hand::OffHand, query, baseline)?;
        Ok((mh, oh))
    }

    fn weapon_ep(&self, hand: Hand, query: &WeaponEpQuery, baseline: f64) -> Result<WeaponEp, DpsError> {
        let mut ep = WeaponEp::default();

        if query.dps {
            let mut build = self.build.clone();
            let weapon = build.stats.weapon_mut(hand);
            weapon.damage += weapon.speed;
            ep.dps = Some(self.dps_for(&build)? - baseline);
        }

        if query.enchants {
            let mut bare = self.build.clone();
            bare.stats.weapon_mut(hand).enchant = None;
            let without = self.dps_for(&bare)?;
            ep.enchants = WeaponEnchant::all()
                .par_iter()
                .map(|enchant| {
                    let mut build = bare.clone();
                    build.stats.weapon_mut(hand).enchant = Some(*enchant);
                    Ok((*enchant, self.dps_for(&build)? - without))
                })
                .collect::<Result<_, DpsError>>()?;
        }

        ep.speeds = query
            .speeds
            .par_iter()
            .map(|speed| {
                let mut build = self.build.clone();
                let weapon = build.stats.weapon_mut(hand);
                weapon.damage = weapon.dps() * speed;
                weapon.speed = *speed;
                Ok((format!("{:.2}", speed), self.dps_for(&build)? - baseline))
            })
            .collect::<Result<_, DpsError>>()?;

        Ok(ep)
    }
}

/// Copy of `build` with the stat raised by [`EP_DELTA`]
fn with_stat_delta(build: &Build, stat: EpStat) -> Build {
    let mut build = build.clone();
    *stat.stat_mut(&mut build.stats) += EP_DELTA;
    build
}
