//! Classifying a build into the branch that models it

use crate::build::{Build, Cycle, Poison, RogueTalents, Talent};
use crate::cycle::RevealingStrikeUsage;
use crate::error::Unmodeled;

/// A build classified by specialization, carrying only what its branch needs
#[derive(Debug, Clone, PartialEq)]
pub enum SpecBuild {
    Assassination {
        min_envenom_size_mutilate: u8,
        min_envenom_size_backstab: u8,
    },
    Combat {
        revealing_strike: RevealingStrikeUsage,
        ksp_immediately: bool,
        use_rupture: bool,
    },
    Subtlety {
        raid_crits_per_second: f64,
        clip_recuperate: bool,
    },
    /// The build fails a precondition of every branch
    Unmodeled(Unmodeled),
}

impl SpecBuild {
    /// Classify by talents and check the branch's preconditions
    pub fn classify(build: &Build) -> Self {
        match validate(build) {
            Ok(spec_build) => spec_build,
            Err(reason) => SpecBuild::Unmodeled(reason),
        }
    }
}

fn require_rank(talents: &RogueTalents, talent: Talent, points: u8) -> Result<(), Unmodeled> {
    if talents.rank(talent) != points {
        return Err(Unmodeled::TalentRequirement { talent, points });
    }
    Ok(())
}

fn validate(build: &Build) -> Result<SpecBuild, Unmodeled> {
    let spec = build
        .talents
        .specialization()
        .ok_or(Unmodeled::NoSpecialization)?;
    let settings = &build.settings;
    if settings.cycle.spec() != spec {
        return Err(Unmodeled::CycleMismatch { spec });
    }

    let talents = &build.talents;
    let stats = &build.stats;
    match &settings.cycle {
        Cycle::Assassination {
            min_envenom_size_mutilate,
            min_envenom_size_backstab,
        } => {
            if !stats.mh.is_dagger() || !stats.oh.is_dagger() {
                return Err(Unmodeled::AssassinationNeedsDaggers);
            }
            match (settings.mh_poison, settings.oh_poison) {
                (Poison::Instant, Poison::Deadly) | (Poison::Deadly, Poison::Instant) => {}
                _ => return Err(Unmodeled::AssassinationNeedsPoisonPair),
            }
            require_rank(talents, Talent::MasterPoisoner, 1)?;
            require_rank(talents, Talent::CutToTheChase, 3)?;
            for size in [*min_envenom_size_mutilate, *min_envenom_size_backstab] {
                if !(1..=5).contains(&size) {
                    return Err(Unmodeled::MinEnvenomSize(size));
                }
            }
            Ok(SpecBuild::Assassination {
                min_envenom_size_mutilate: *min_envenom_size_mutilate,
                min_envenom_size_backstab: *min_envenom_size_backstab,
            })
        }
        Cycle::Combat {
            use_revealing_strike,
            ksp_immediately,
            use_rupture,
        } => {
            let revealing_strike: RevealingStrikeUsage = use_revealing_strike.parse()?;
            if revealing_strike != RevealingStrikeUsage::Never && !talents.has(Talent::RevealingStrike) {
                return Err(Unmodeled::RevealingStrikeWithoutTalent);
            }
            Ok(SpecBuild::Combat {
                revealing_strike,
                ksp_immediately: *ksp_immediately,
                use_rupture: *use_rupture,
            })
        }
        Cycle::Subtlety {
            raid_crits_per_second,
            clip_recuperate,
        } => {
            if !stats.mh.is_dagger() {
                return Err(Unmodeled::SubtletyNeedsMainHandDagger);
            }
            require_rank(talents, Talent::SerratedBlades, 2)?;
            Ok(SpecBuild::Subtlety {
                raid_crits_per_second: *raid_crits_per_second,
                clip_recuperate: *clip_recuperate,
            })
        }
    }
}
