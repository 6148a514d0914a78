//! Sample builds shared by unit tests

use crate::build::{
    Buff, Buffs, Build, Cycle, GearBuff, GearBuffs, Glyph, Race, RogueGlyphs, RogueTalents,
    Settings, Stats, Weapon, WeaponEnchant, WeaponKind,
};
use crate::config::default_catalog;
use crate::procs::ProcsList;

fn raid_buffs() -> Buffs {
    Buffs::new([
        Buff::ShortTermHasteBuff,
        Buff::StatMultiplierBuff,
        Buff::CritChanceBuff,
        Buff::AllDamageBuff,
        Buff::MeleeHasteBuff,
        Buff::AttackPowerBuff,
        Buff::StrAndAgiBuff,
        Buff::ArmorDebuff,
        Buff::PhysicalVulnerabilityDebuff,
        Buff::SpellDamageDebuff,
        Buff::SpellCritDebuff,
        Buff::BleedDamageDebuff,
        Buff::AgiFlask,
        Buff::GuildFeast,
    ])
}

fn stats(mh: Weapon, oh: Weapon, procs: &[&str]) -> Stats {
    Stats {
        str: 20.0,
        agi: 4756.0,
        ap: 190.0,
        crit: 956.0,
        hit: 1330.0,
        exp: 197.0,
        haste: 887.0,
        mastery: 2154.0,
        mh,
        oh,
        ranged: Weapon::new(1371.5, 2.2, WeaponKind::Thrown),
        procs: ProcsList::from_names(procs, default_catalog().unwrap()).unwrap(),
        gear_buffs: GearBuffs::new([
            GearBuff::RogueT11TwoPiece,
            GearBuff::LeatherSpecialization,
            GearBuff::PotionOfTheTolvir,
            GearBuff::ChaoticMetagem,
        ]),
    }
}

pub fn assassination_build() -> Build {
    Build {
        stats: stats(
            Weapon::new(939.5, 1.8, WeaponKind::Dagger).with_enchant(WeaponEnchant::Landslide),
            Weapon::new(730.5, 1.4, WeaponKind::Dagger).with_enchant(WeaponEnchant::Landslide),
            &["heroic_prestors_talisman_of_machination", "fluid_death", "rogue_t11_4pc"],
        ),
        talents: RogueTalents::new("0333230113022110321", "0020000000000000000", "2030030000000000000")
            .unwrap(),
        glyphs: RogueGlyphs::new([
            Glyph::Backstab,
            Glyph::Mutilate,
            Glyph::Rupture,
            Glyph::TricksOfTheTrade,
        ]),
        buffs: raid_buffs(),
        race: Race::NightElf,
        settings: Settings::new(Cycle::assassination()).with_response_time(1.0),
        level: 85,
    }
}

pub fn combat_build() -> Build {
    Build {
        stats: stats(
            Weapon::new(1129.5, 2.6, WeaponKind::Sword).with_enchant(WeaponEnchant::Landslide),
            Weapon::new(939.5, 2.6, WeaponKind::Mace).with_enchant(WeaponEnchant::Landslide),
            &["heroic_prestors_talisman_of_machination", "fluid_death", "rogue_t11_4pc"],
        ),
        talents: RogueTalents::new("0023000000000000000", "2332030312030012321", "0030000000000000000")
            .unwrap(),
        glyphs: RogueGlyphs::new([
            Glyph::SinisterStrike,
            Glyph::RevealingStrike,
            Glyph::AdrenalineRush,
            Glyph::SliceAndDice,
            Glyph::TricksOfTheTrade,
        ]),
        buffs: raid_buffs(),
        race: Race::Human,
        settings: Settings::new(Cycle::combat()),
        level: 85,
    }
}

pub fn subtlety_build() -> Build {
    Build {
        stats: stats(
            Weapon::new(939.5, 1.8, WeaponKind::Dagger).with_enchant(WeaponEnchant::Landslide),
            Weapon::new(730.5, 1.4, WeaponKind::Dagger).with_enchant(WeaponEnchant::Landslide),
            &["heroic_prestors_talisman_of_machination", "fluid_death"],
        ),
        talents: RogueTalents::new("0230000000000000000", "0020000000000000000", "0332032321310012321")
            .unwrap(),
        glyphs: RogueGlyphs::new([Glyph::Backstab, Glyph::SliceAndDice, Glyph::TricksOfTheTrade]),
        buffs: raid_buffs(),
        race: Race::NightElf,
        settings: Settings::new(Cycle::subtlety()),
        level: 85,
    }
}
