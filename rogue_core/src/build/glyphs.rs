//! Prime and major glyphs that change the modelled cycles

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyph {
    AdrenalineRush,
    Backstab,
    Eviscerate,
    KillingSpree,
    Mutilate,
    RevealingStrike,
    Rupture,
    ShadowDance,
    SinisterStrike,
    SliceAndDice,
    TricksOfTheTrade,
    Vendetta,
}

impl Glyph {
    pub fn all() -> &'static [Glyph] {
        &[
            Glyph::AdrenalineRush,
            Glyph::Backstab,
            Glyph::Eviscerate,
            Glyph::KillingSpree,
            Glyph::Mutilate,
            Glyph::RevealingStrike,
            Glyph::Rupture,
            Glyph::ShadowDance,
            Glyph::SinisterStrike,
            Glyph::SliceAndDice,
            Glyph::TricksOfTheTrade,
            Glyph::Vendetta,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Glyph::AdrenalineRush => "adrenaline_rush",
            Glyph::Backstab => "backstab",
            Glyph::Eviscerate => "eviscerate",
            Glyph::KillingSpree => "killing_spree",
            Glyph::Mutilate => "mutilate",
            Glyph::RevealingStrike => "revealing_strike",
            Glyph::Rupture => "rupture",
            Glyph::ShadowDance => "shadow_dance",
            Glyph::SinisterStrike => "sinister_strike",
            Glyph::SliceAndDice => "slice_and_dice",
            Glyph::TricksOfTheTrade => "tricks_of_the_trade",
            Glyph::Vendetta => "vendetta",
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Glyph {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Glyph::all()
            .iter()
            .copied()
            .find(|g| g.as_str() == s)
            .ok_or_else(|| format!("unknown glyph: {}", s))
    }
}

/// Set of active glyphs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RogueGlyphs {
    active: BTreeSet<Glyph>,
}

impl RogueGlyphs {
    pub fn new(glyphs: impl IntoIterator<Item = Glyph>) -> Self {
        RogueGlyphs {
            active: glyphs.into_iter().collect(),
        }
    }

    pub fn has(&self, glyph: Glyph) -> bool {
        self.active.contains(&glyph)
    }

    /// 1.0 when the glyph is active, 0.0 otherwise
    pub fn flag(&self, glyph: Glyph) -> f64 {
        if self.has(glyph) {
            1.0
        } else {
            0.0
        }
    }

    pub fn set(&mut self, glyph: Glyph, active: bool) {
        if active {
            self.active.insert(glyph);
        } else {
            self.active.remove(&glyph);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Glyph> {
        self.active.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_flags() {
        let glyphs = RogueGlyphs::new([Glyph::Backstab, Glyph::Rupture]);
        assert!(glyphs.has(Glyph::Rupture));
        assert_eq!(glyphs.flag(Glyph::Mutilate), 0.0);
        assert_eq!(glyphs.flag(Glyph::Backstab), 1.0);
    }

    #[test]
    fn test_parse_glyph_list() {
        #[derive(Deserialize)]
        struct Wrapper {
            glyphs: RogueGlyphs,
        }
        let parsed: Wrapper =
            toml::from_str(r#"glyphs = ["mutilate", "tricks_of_the_trade"]"#).unwrap();
        assert!(parsed.glyphs.has(Glyph::TricksOfTheTrade));
        assert_eq!("vendetta".parse::<Glyph>().unwrap(), Glyph::Vendetta);
        assert!("sprint".parse::<Glyph>().is_err());
    }
}
