//! Talent allocations for the three rogue trees

use crate::types::Spec;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Points needed in a tree before the build counts as that specialization
pub const SPEC_THRESHOLD: u32 = 31;

/// Talents per tree
pub const TREE_SIZE: usize = 19;

/// Every rogue talent, in tree order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Talent {
    // Assassination
    DeadlyMomentum,
    CoupDeGrace,
    Lethality,
    Ruthlessness,
    Quickening,
    PuncturingWounds,
    Blackjack,
    DeadlyBrew,
    ColdBlood,
    VilePoisons,
    DeadenedNerves,
    SealFate,
    MurderousIntent,
    Overkill,
    MasterPoisoner,
    ImprovedExposeArmor,
    CutToTheChase,
    VenomousWounds,
    Vendetta,
    // Combat
    ImprovedRecuperate,
    ImprovedSinisterStrike,
    Precision,
    ImprovedSliceAndDice,
    ImprovedSprint,
    Aggression,
    ImprovedKick,
    LightningReflexes,
    RevealingStrike,
    ReinforcedLeather,
    ImprovedGouge,
    CombatPotency,
    BladeTwisting,
    ThrowingSpecialization,
    AdrenalineRush,
    SavageCombat,
    BanditsGuile,
    RestlessBlades,
    KillingSpree,
    // Subtlety
    Nightstalker,
    ImprovedAmbush,
    RelentlessStrikes,
    Elusiveness,
    Waylay,
    Opportunity,
    Initiative,
    EnergeticRecovery,
    FindWeakness,
    Hemorrhage,
    HonorAmongThieves,
    Premeditation,
    EnvelopingShadows,
    CheatDeath,
    Preparation,
    SanguinaryVein,
    SlaughterFromTheShadows,
    SerratedBlades,
    ShadowDance,
}

const ASSASSINATION_TREE: [Talent; TREE_SIZE] = [
    Talent::DeadlyMomentum,
    Talent::CoupDeGrace,
    Talent::Lethality,
    Talent::Ruthlessness,
    Talent::Quickening,
    Talent::PuncturingWounds,
    Talent::Blackjack,
    Talent::DeadlyBrew,
    Talent::ColdBlood,
    Talent::VilePoisons,
    Talent::DeadenedNerves,
    Talent::SealFate,
    Talent::MurderousIntent,
    Talent::Overkill,
    Talent::MasterPoisoner,
    Talent::ImprovedExposeArmor,
    Talent::CutToTheChase,
    Talent::VenomousWounds,
    Talent::Vendetta,
];

const COMBAT_TREE: [Talent; TREE_SIZE] = [
    Talent::ImprovedRecuperate,
    Talent::ImprovedSinisterStrike,
    Talent::Precision,
    Talent::ImprovedSliceAndDice,
    Talent::ImprovedSprint,
    Talent::Aggression,
    Talent::ImprovedKick,
    Talent::LightningReflexes,
    Talent::RevealingStrike,
    Talent::ReinforcedLeather,
    Talent::ImprovedGouge,
    Talent::CombatPotency,
    Talent::BladeTwisting,
    Talent::ThrowingSpecialization,
    Talent::AdrenalineRush,
    Talent::SavageCombat,
    Talent::BanditsGuile,
    Talent::RestlessBlades,
    Talent::KillingSpree,
];

const SUBTLETY_TREE: [Talent; TREE_SIZE] = [
    Talent::Nightstalker,
    Talent::ImprovedAmbush,
    Talent::RelentlessStrikes,
    Talent::Elusiveness,
    Talent::Waylay,
    Talent::Opportunity,
    Talent::Initiative,
    Talent::EnergeticRecovery,
    Talent::FindWeakness,
    Talent::Hemorrhage,
    Talent::HonorAmongThieves,
    Talent::Premeditation,
    Talent::EnvelopingShadows,
    Talent::CheatDeath,
    Talent::Preparation,
    Talent::SanguinaryVein,
    Talent::SlaughterFromTheShadows,
    Talent::SerratedBlades,
    Talent::ShadowDance,
];

// Max ranks, co-indexed with the tree arrays above
const ASSASSINATION_RANKS: [u8; TREE_SIZE] = [2, 3, 3, 3, 2, 3, 2, 2, 1, 3, 3, 2, 2, 1, 1, 2, 3, 2, 1];
const COMBAT_RANKS: [u8; TREE_SIZE] = [2, 3, 3, 2, 2, 3, 2, 3, 1, 2, 2, 3, 2, 2, 1, 2, 3, 2, 1];
const SUBTLETY_RANKS: [u8; TREE_SIZE] = [2, 3, 3, 2, 2, 3, 2, 3, 2, 1, 3, 1, 3, 3, 1, 2, 3, 2, 1];

impl Talent {
    /// Talents of one tree, in allocation-string order
    pub fn tree_talents(spec: Spec) -> &'static [Talent; TREE_SIZE] {
        match spec {
            Spec::Assassination => &ASSASSINATION_TREE,
            Spec::Combat => &COMBAT_TREE,
            Spec::Subtlety => &SUBTLETY_TREE,
        }
    }

    /// Tree and position within the tree
    pub fn position(&self) -> (Spec, usize) {
        for spec in Spec::all() {
            if let Some(index) = Self::tree_talents(*spec).iter().position(|t| t == self) {
                return (*spec, index);
            }
        }
        unreachable!("every talent belongs to a tree")
    }

    pub fn tree(&self) -> Spec {
        self.position().0
    }

    pub fn max_rank(&self) -> u8 {
        let (spec, index) = self.position();
        match spec {
            Spec::Assassination => ASSASSINATION_RANKS[index],
            Spec::Combat => COMBAT_RANKS[index],
            Spec::Subtlety => SUBTLETY_RANKS[index],
        }
    }

    /// snake_case name, matching the serde form
    pub fn name(&self) -> String {
        let mut out = String::new();
        for (i, ch) in format!("{:?}", self).chars().enumerate() {
            if ch.is_ascii_uppercase() {
                if i > 0 {
                    out.push('_');
                }
                out.push(ch.to_ascii_lowercase());
            } else {
                out.push(ch);
            }
        }
        out
    }
}

impl fmt::Display for Talent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name())
    }
}

/// Error raised when an allocation string does not describe a legal tree
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TalentParseError {
    #[error("{spec} tree has {len} entries, at most 19 allowed")]
    TooLong { spec: Spec, len: usize },
    #[error("{spec} tree contains non-digit character '{ch}'")]
    NotADigit { spec: Spec, ch: char },
    #[error("{talent} has {points} points, max rank is {max}")]
    OverMaxRank { talent: Talent, points: u8, max: u8 },
}

/// Raw allocation strings, as written in build files
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TalentStrings {
    #[serde(default)]
    pub assassination: String,
    #[serde(default)]
    pub combat: String,
    #[serde(default)]
    pub subtlety: String,
}

/// Point allocation across the three trees
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "TalentStrings", into = "TalentStrings")]
pub struct RogueTalents {
    assassination: [u8; TREE_SIZE],
    combat: [u8; TREE_SIZE],
    subtlety: [u8; TREE_SIZE],
}

impl Default for RogueTalents {
    fn default() -> Self {
        RogueTalents {
            assassination: [0; TREE_SIZE],
            combat: [0; TREE_SIZE],
            subtlety: [0; TREE_SIZE],
        }
    }
}

fn parse_tree(spec: Spec, digits: &str) -> Result<[u8; TREE_SIZE], TalentParseError> {
    if digits.len() > TREE_SIZE {
        return Err(TalentParseError::TooLong {
            spec,
            len: digits.len(),
        });
    }

    let mut tree = [0u8; TREE_SIZE];
    for (index, ch) in digits.chars().enumerate() {
        let points = ch
            .to_digit(10)
            .ok_or(TalentParseError::NotADigit { spec, ch })? as u8;
        let talent = Talent::tree_talents(spec)[index];
        if points > talent.max_rank() {
            return Err(TalentParseError::OverMaxRank {
                talent,
                points,
                max: talent.max_rank(),
            });
        }
        tree[index] = points;
    }
    Ok(tree)
}

impl RogueTalents {
    /// Parse three allocation strings (one digit per talent, missing trailing
    /// digits count as zero)
    pub fn new(assassination: &str, combat: &str, subtlety: &str) -> Result<Self, TalentParseError> {
        Ok(RogueTalents {
            assassination: parse_tree(Spec::Assassination, assassination)?,
            combat: parse_tree(Spec::Combat, combat)?,
            subtlety: parse_tree(Spec::Subtlety, subtlety)?,
        })
    }

    fn tree(&self, spec: Spec) -> &[u8; TREE_SIZE] {
        match spec {
            Spec::Assassination => &self.assassination,
            Spec::Combat => &self.combat,
            Spec::Subtlety => &self.subtlety,
        }
    }

    fn tree_mut(&mut self, spec: Spec) -> &mut [u8; TREE_SIZE] {
        match spec {
            Spec::Assassination => &mut self.assassination,
            Spec::Combat => &mut self.combat,
            Spec::Subtlety => &mut self.subtlety,
        }
    }

    /// Points in a talent
    pub fn rank(&self, talent: Talent) -> u8 {
        let (spec, index) = talent.position();
        self.tree(spec)[index]
    }

    /// Points in a talent as a float, for formulas
    pub fn points(&self, talent: Talent) -> f64 {
        self.rank(talent) as f64
    }

    pub fn has(&self, talent: Talent) -> bool {
        self.rank(talent) > 0
    }

    /// Set a talent's points, clamped to its max rank
    pub fn set_rank(&mut self, talent: Talent, points: u8) {
        let (spec, index) = talent.position();
        self.tree_mut(spec)[index] = points.min(talent.max_rank());
    }

    pub fn points_in_tree(&self, spec: Spec) -> u32 {
        self.tree(spec).iter().map(|p| *p as u32).sum()
    }

    /// The tree holding at least [`SPEC_THRESHOLD`] points, if any
    pub fn specialization(&self) -> Option<Spec> {
        Spec::all()
            .iter()
            .copied()
            .find(|spec| self.points_in_tree(*spec) >= SPEC_THRESHOLD)
    }

    pub fn is_assassination(&self) -> bool {
        self.specialization() == Some(Spec::Assassination)
    }

    pub fn is_combat(&self) -> bool {
        self.specialization() == Some(Spec::Combat)
    }

    pub fn is_subtlety(&self) -> bool {
        self.specialization() == Some(Spec::Subtlety)
    }

    fn tree_string(&self, spec: Spec) -> String {
        self.tree(spec).iter().map(|p| char::from(b'0' + *p)).collect()
    }
}

impl TryFrom<TalentStrings> for RogueTalents {
    type Error = TalentParseError;

    fn try_from(raw: TalentStrings) -> Result<Self, Self::Error> {
        RogueTalents::new(&raw.assassination, &raw.combat, &raw.subtlety)
    }
}

impl From<RogueTalents> for TalentStrings {
    fn from(talents: RogueTalents) -> Self {
        TalentStrings {
            assassination: talents.tree_string(Spec::Assassination),
            combat: talents.tree_string(Spec::Combat),
            subtlety: talents.tree_string(Spec::Subtlety),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MUTILATE: &str = "0333230113022110321";

    #[test]
    fn test_parse_assassination_build() {
        let talents = RogueTalents::new(MUTILATE, "0020000000000000000", "2030030000000000000").unwrap();
        assert_eq!(talents.points_in_tree(Spec::Assassination), 31);
        assert!(talents.is_assassination());
        assert_eq!(talents.rank(Talent::SealFate), 2);
        assert_eq!(talents.rank(Talent::CutToTheChase), 3);
        assert_eq!(talents.rank(Talent::RelentlessStrikes), 3);
        assert_eq!(talents.rank(Talent::Precision), 2);
    }

    #[test]
    fn test_short_strings_pad_with_zero() {
        let talents = RogueTalents::new("03", "", "").unwrap();
        assert_eq!(talents.rank(Talent::CoupDeGrace), 3);
        assert_eq!(talents.rank(Talent::Vendetta), 0);
        assert_eq!(talents.specialization(), None);
    }

    #[test]
    fn test_rejects_over_max_rank() {
        let err = RogueTalents::new("", "", "0000000003").unwrap_err();
        assert_eq!(
            err,
            TalentParseError::OverMaxRank {
                talent: Talent::Hemorrhage,
                points: 3,
                max: 1
            }
        );
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            RogueTalents::new("03x", "", ""),
            Err(TalentParseError::NotADigit { ch: 'x', .. })
        ));
        assert!(matches!(
            RogueTalents::new("00000000000000000000", "", ""),
            Err(TalentParseError::TooLong { len: 20, .. })
        ));
    }

    #[test]
    fn test_talent_names() {
        assert_eq!(Talent::HonorAmongThieves.name(), "honor_among_thieves");
        assert_eq!(Talent::CutToTheChase.to_string(), "cut_to_the_chase");
        assert_eq!(Talent::Vendetta.tree(), Spec::Assassination);
        assert_eq!(Talent::KillingSpree.max_rank(), 1);
    }

    #[test]
    fn test_serde_round_trip_through_strings() {
        let toml = r#"
assassination = "0333230113022110321"
combat = "002"
"#;
        let talents: RogueTalents = toml::from_str(toml).unwrap();
        assert!(talents.is_assassination());
        let raw = TalentStrings::from(talents);
        assert_eq!(raw.combat, "0020000000000000000");
    }

    #[test]
    fn test_set_rank_clamps() {
        let mut talents = RogueTalents::default();
        talents.set_rank(Talent::SerratedBlades, 9);
        assert_eq!(talents.rank(Talent::SerratedBlades), 2);
    }
}
