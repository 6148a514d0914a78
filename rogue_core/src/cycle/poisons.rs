//! Poison application rates from weapon hits

use super::AttackRateTable;
use crate::build::Poison;
use crate::model::RogueModel;
use crate::types::{Ability, Hand};

/// Chance for one weapon hit to apply the poison on that weapon
fn proc_chance(poison: Poison, weapon_speed: f64) -> f64 {
    match poison {
        Poison::Instant => weapon_speed / 7.0,
        Poison::Wound => weapon_speed / 2.8,
        Poison::Deadly => 0.3,
    }
}

fn proc_ability(poison: Poison) -> Option<Ability> {
    match poison {
        Poison::Instant => Some(Ability::InstantPoison),
        Poison::Wound => Some(Ability::WoundPoison),
        Poison::Deadly => None,
    }
}

/// Add poison rates for `total_mh_hits`/`total_oh_hits` weapon hits per
/// second. Deadly Poison ticks every 3 s while applied on either weapon.
///
/// Deadly Poison applications on a full stack apply the other weapon's
/// poison instead, so both hands' procs land on it.
pub fn apply_poison_counts(
    model: &RogueModel<'_>,
    total_mh_hits: f64,
    total_oh_hits: f64,
    attacks: &mut AttackRateTable,
) {
    let settings = &model.build.settings;
    if settings.uses_poison(Poison::Deadly) {
        attacks.set(Ability::DeadlyPoison, 1.0 / 3.0);
    }

    let spell_hit = model.spell_hit_chance();
    let mh_procs = total_mh_hits
        * proc_chance(settings.mh_poison, model.weapon_speed(Hand::MainHand))
        * spell_hit;
    let oh_procs = total_oh_hits
        * proc_chance(settings.oh_poison, model.weapon_speed(Hand::OffHand))
        * spell_hit;

    match (proc_ability(settings.mh_poison), proc_ability(settings.oh_poison)) {
        (Some(mh), Some(oh)) => {
            attacks.add(mh, mh_procs);
            attacks.add(oh, oh_procs);
        }
        (Some(ability), None) | (None, Some(ability)) => {
            attacks.add(ability, mh_procs + oh_procs);
        }
        (None, None) => {}
    }
}
