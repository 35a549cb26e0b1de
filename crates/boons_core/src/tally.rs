use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::classify::{CHAOS_DEITY, Rarity, Trait};
use crate::run_state::RunState;

static FORCED_BOON: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Force([A-Za-z]+)BoonTrait").expect("valid keepsake pattern")
});

/// Running per-deity counts for one decoded save.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Booncount {
    pub deity: String,
    pub normal_count: u32,
    pub duo_count: u32,
    pub legendary_count: u32,
    pub boon_labels: Vec<String>,
}

impl Booncount {
    pub fn new(deity: impl Into<String>) -> Self {
        Self {
            deity: deity.into(),
            normal_count: 0,
            duo_count: 0,
            legendary_count: 0,
            boon_labels: Vec::new(),
        }
    }

    pub fn add(&mut self, t: &Trait) {
        let tag = match t.rarity {
            Rarity::Legendary => {
                self.legendary_count += 1;
                'L'
            }
            Rarity::Duo => {
                self.duo_count += 1;
                'D'
            }
            _ => {
                self.normal_count += 1;
                'N'
            }
        };
        self.boon_labels.push(format!("{} - {tag}", t.name));
    }

    /// Weighted total; legendaries count double.
    pub fn sum(&self) -> u32 {
        self.normal_count + self.duo_count + 2 * self.legendary_count
    }

    pub fn is_chaos(&self) -> bool {
        self.deity == CHAOS_DEITY
    }
}

/// Deity names of every `Force<Deity>BoonTrait` among the blocked keepsake
/// values and the trait dictionary keys, in that order.
pub fn blocked_keepsake_deities(state: &RunState<'_>) -> Vec<String> {
    let from_blocked = state.blocked_keepsakes.values().filter_map(|v| v.as_str());
    let from_traits = state.trait_dictionary.keys().filter_map(|k| k.as_str());

    from_blocked
        .chain(from_traits)
        .filter_map(forced_boon_deity)
        .map(str::to_string)
        .collect()
}

pub fn forced_boon_deity(key: &str) -> Option<&str> {
    FORCED_BOON
        .captures(key)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Seed a zero count for every keepsake deity, then fold in each trait once
/// per deity it names.
pub fn aggregate<S: AsRef<str>>(
    keepsake_deities: &[S],
    traits: &[Trait],
) -> BTreeMap<String, Booncount> {
    let mut counts = BTreeMap::new();
    for deity in keepsake_deities {
        let deity = deity.as_ref();
        counts
            .entry(deity.to_string())
            .or_insert_with(|| Booncount::new(deity));
    }
    for t in traits {
        for god in &t.gods {
            counts
                .entry(god.clone())
                .or_insert_with(|| Booncount::new(god.as_str()))
                .add(t);
        }
    }
    counts
}

/// Sum of every deity's weighted total except Chaos.
pub fn total_boons<'a>(counts: impl IntoIterator<Item = &'a Booncount>) -> u32 {
    counts
        .into_iter()
        .filter(|c| !c.is_chaos())
        .map(Booncount::sum)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::{Booncount, aggregate, forced_boon_deity, total_boons};
    use crate::classify::{Rarity, Trait};

    fn boon(gods: &[&str], name: &str, rarity: Rarity) -> Trait {
        Trait {
            gods: gods.iter().map(|g| g.to_string()).collect(),
            name: name.to_string(),
            rarity,
        }
    }

    #[test]
    fn sum_weights_legendaries_double() {
        let mut c = Booncount::new("Zeus");
        c.add(&boon(&["Zeus"], "A", Rarity::Common));
        c.add(&boon(&["Zeus"], "B", Rarity::Epic));
        c.add(&boon(&["Zeus", "Ares"], "C", Rarity::Duo));
        c.add(&boon(&["Zeus"], "D", Rarity::Legendary));
        assert_eq!((c.normal_count, c.duo_count, c.legendary_count), (2, 1, 1));
        assert_eq!(c.sum(), 5);
        assert_eq!(c.boon_labels, vec!["A - N", "B - N", "C - D", "D - L"]);
    }

    #[test]
    fn keepsake_deities_are_seeded_with_zero() {
        let counts = aggregate(&["Hermes"], &[]);
        let hermes = counts.get("Hermes").expect("seeded");
        assert_eq!(hermes.sum(), 0);
        assert!(hermes.boon_labels.is_empty());
    }

    #[test]
    fn duo_counts_for_both_deities() {
        let counts = aggregate::<&str>(
            &[],
            &[boon(&["Zeus", "Poseidon"], "Sea Storm", Rarity::Duo)],
        );
        assert_eq!(counts["Zeus"].duo_count, 1);
        assert_eq!(counts["Poseidon"].duo_count, 1);
    }

    #[test]
    fn chaos_is_excluded_from_the_total() {
        let counts = aggregate::<&str>(
            &[],
            &[
                boon(&["Chaos"], "Chaos Blessing", Rarity::Rare),
                boon(&["Athena"], "Divine Strike", Rarity::Common),
            ],
        );
        assert_eq!(total_boons(counts.values()), 1);
    }

    #[test]
    fn forced_boon_pattern_extracts_deity() {
        assert_eq!(forced_boon_deity("ForceZeusBoonTrait"), Some("Zeus"));
        assert_eq!(forced_boon_deity("ForceDionysusBoonTraitExtra"), Some("Dionysus"));
        assert_eq!(forced_boon_deity("ZeusWeaponTrait"), None);
    }
}
