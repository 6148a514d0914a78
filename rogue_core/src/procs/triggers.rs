//! Counting proc triggers from an attack-rate table

use super::ProcDef;
use crate::cycle::{AttackRateTable, CritRateTable};
use crate::error::Unmodeled;
use crate::types::{Ability, Hand};

/// Triggers per second of one event kind, weighted by crit chance for
/// crit-only procs
fn weighted(def: &ProcDef, rate: f64, crits: &CritRateTable, crit_key: Ability) -> f64 {
    if def.triggers.crit_only {
        rate * crits.get(crit_key)
    } else {
        rate
    }
}

fn mh_triggers(def: &ProcDef, attacks: &AttackRateTable, crits: &CritRateTable) -> f64 {
    let mut triggers = 0.0;
    if def.triggers.auto_attacks {
        triggers += weighted(
            def,
            attacks.total(Ability::MhAutoattackHits),
            crits,
            Ability::MhAutoattacks,
        );
    }
    if def.triggers.strikes {
        for ability in Ability::mh_strikes().iter().chain(Ability::direct_finishers()) {
            triggers += weighted(def, attacks.total(*ability), crits, *ability);
        }
    }
    if def.triggers.apply_debuff && !def.triggers.crit_only {
        triggers += attacks.total(Ability::Rupture);
    }
    triggers
}

fn oh_triggers(def: &ProcDef, attacks: &AttackRateTable, crits: &CritRateTable) -> f64 {
    let mut triggers = 0.0;
    if def.triggers.auto_attacks {
        triggers += weighted(
            def,
            attacks.total(Ability::OhAutoattackHits),
            crits,
            Ability::OhAutoattacks,
        );
    }
    if def.triggers.strikes {
        for ability in Ability::oh_strikes() {
            triggers += weighted(def, attacks.total(*ability), crits, *ability);
        }
    }
    triggers
}

fn other_triggers(def: &ProcDef, attacks: &AttackRateTable, crits: &CritRateTable) -> f64 {
    let mut triggers = 0.0;
    if def.triggers.harmful_spells {
        for ability in [Ability::InstantPoison, Ability::WoundPoison, Ability::VenomousWounds] {
            triggers += weighted(def, attacks.total(ability), crits, ability);
        }
    }
    if def.triggers.periodic_spell_damage {
        triggers += weighted(
            def,
            attacks.total(Ability::DeadlyPoison),
            crits,
            Ability::DeadlyPoison,
        );
    }
    if def.triggers.bleeds {
        triggers += weighted(
            def,
            attacks.total(Ability::RuptureTicks),
            crits,
            Ability::RuptureTicks,
        );
    }
    triggers
}

/// Expected procs per second given the current attack and crit rates
pub fn procs_per_second(
    def: &ProcDef,
    attacks: &AttackRateTable,
    crits: &CritRateTable,
    mh_speed: f64,
    oh_speed: f64,
) -> Result<f64, Unmodeled> {
    let mh = mh_triggers(def, attacks, crits) * def.rate.per_hit(mh_speed);
    let oh = oh_triggers(def, attacks, crits) * def.rate.per_hit(oh_speed);

    match def.hand {
        Some(Hand::MainHand) => Ok(mh),
        Some(Hand::OffHand) => Ok(oh),
        None if !def.triggers.has_spell_sources() => Ok(mh + oh),
        None => {
            let other = other_triggers(def, attacks, crits);
            if def.rate.is_ppm() {
                if other > 0.0 {
                    return Err(Unmodeled::PpmOffSpells {
                        proc_name: def.name.clone(),
                    });
                }
                return Ok(mh + oh);
            }
            Ok(mh + oh + other * def.rate.per_hit(0.0))
        }
    }
}
