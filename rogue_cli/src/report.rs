//! Report assembly and plain-text rendering

use rogue_core::build::{GearBuff, Glyph};
use rogue_core::calculator::{normalize_ep, EpStat, TalentRanking, WeaponEp, WeaponEpQuery};
use rogue_core::config::ProcCatalog;
use rogue_core::{DamageBreakdown, DpsError, RogueDamageCalculator};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Weapon speeds compared in the rankings section
const WEAPON_SPEEDS: [f64; 4] = [1.4, 1.8, 2.6, 2.7];

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub dps: f64,
    pub breakdown: DamageBreakdown,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ep: Option<BTreeMap<EpStat, f64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rankings: Option<Rankings>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Rankings {
    pub talents: TalentRanking,
    pub glyphs: BTreeMap<Glyph, f64>,
    pub other: BTreeMap<String, f64>,
    pub main_hand: WeaponEp,
    pub off_hand: WeaponEp,
}

impl Report {
    pub fn new(breakdown: DamageBreakdown) -> Self {
        Report {
            dps: breakdown.total(),
            breakdown,
            ep: None,
            rankings: None,
        }
    }

    pub fn with_ep(&mut self, calculator: &RogueDamageCalculator<'_>) -> Result<(), DpsError> {
        self.ep = Some(calculator.get_ep()?);
        Ok(())
    }

    pub fn with_rankings(
        &mut self,
        calculator: &RogueDamageCalculator<'_>,
        catalog: &ProcCatalog,
    ) -> Result<(), DpsError> {
        let mut others: Vec<&str> = GearBuff::all().iter().map(|buff| buff.as_str()).collect();
        others.extend(catalog.names());

        let query = WeaponEpQuery {
            dps: true,
            enchants: true,
            speeds: WEAPON_SPEEDS.to_vec(),
        };
        let (main_hand, off_hand) = calculator.get_weapon_ep(&query)?;
        self.rankings = Some(Rankings {
            talents: calculator.get_talents_ranking()?,
            glyphs: calculator.get_glyphs_ranking(Glyph::all())?,
            other: calculator.get_other_ep(&others)?,
            main_hand,
            off_hand,
        });
        Ok(())
    }
}

fn write_sorted<K: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    title: &str,
    values: impl IntoIterator<Item = (K, f64)>,
) -> fmt::Result {
    let mut rows: Vec<(String, f64)> = values.into_iter().map(|(k, v)| (k.to_string(), v)).collect();
    rows.sort_by(|a, b| b.1.total_cmp(&a.1));
    writeln!(f, "\n{}", title)?;
    for (name, value) in rows {
        writeln!(f, "  {:<40} {:>10.3}", name, value)?;
    }
    Ok(())
}

fn write_weapon(f: &mut fmt::Formatter<'_>, title: &str, ep: &WeaponEp) -> fmt::Result {
    if let Some(dps) = ep.dps {
        writeln!(f, "\n{} per weapon DPS: {:.3}", title, dps)?;
    }
    write_sorted(
        f,
        &format!("{} enchants", title),
        ep.enchants.iter().map(|(enchant, v)| (enchant.as_str(), *v)),
    )?;
    write_sorted(
        f,
        &format!("{} speeds", title),
        ep.speeds.iter().map(|(speed, v)| (speed.as_str(), *v)),
    )
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Damage breakdown")?;
        for (source, dps) in self.breakdown.sorted() {
            let share = if self.dps > 0.0 { 100.0 * dps / self.dps } else { 0.0 };
            writeln!(f, "  {:<24} {:>10.1} {:>6.2}%", source, dps, share)?;
        }
        writeln!(f, "  {:<24} {:>10.1}", "total", self.dps)?;

        if let Some(ep) = &self.ep {
            write_sorted(f, "Stat weights (DPS per point)", ep.iter().map(|(s, v)| (*s, *v)))?;
            if let Some(normalized) = normalize_ep(ep, EpStat::Agi) {
                write_sorted(f, "Normalized to agility", normalized)?;
            }
        }

        if let Some(rankings) = &self.rankings {
            write_sorted(f, "Talents (main tree, per point)", rankings.talents.main_tree.iter().map(|(t, v)| (*t, *v)))?;
            write_sorted(f, "Talents (off trees, per point)", rankings.talents.off_trees.iter().map(|(t, v)| (*t, *v)))?;
            write_sorted(f, "Glyphs", rankings.glyphs.iter().map(|(g, v)| (g.as_str(), *v)))?;
            write_sorted(f, "Procs and gear buffs", rankings.other.iter().map(|(n, v)| (n.as_str(), *v)))?;
            write_weapon(f, "Main hand", &rankings.main_hand)?;
            write_weapon(f, "Off hand", &rankings.off_hand)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Report {
        let mut breakdown = DamageBreakdown::new();
        breakdown.add("autoattack", 6000.0);
        breakdown.add("eviscerate", 2000.0);
        Report::new(breakdown)
    }

    #[test]
    fn test_text_report_sorted() {
        let text = sample().to_string();
        let autoattack = text.find("autoattack").unwrap();
        let eviscerate = text.find("eviscerate").unwrap();
        assert!(autoattack < eviscerate);
        assert!(text.contains("75.00%"));
        assert!(text.contains("8000.0"));
    }

    #[test]
    fn test_json_omits_missing_sections() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["dps"], 8000.0);
        assert_eq!(json["breakdown"]["eviscerate"], 2000.0);
        assert!(json.get("ep").is_none());
        assert!(json.get("rankings").is_none());
    }
}
