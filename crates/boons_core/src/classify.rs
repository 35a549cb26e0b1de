//! Turns raw trait dictionary entries into [`Trait`]s.
//!
//! Each entry is matched against an ordered list of rules and the first rule
//! that applies decides the result. Icon-derived attribution comes before the
//! plain `God` field, and duo/chaos detection comes before any rarity lookup.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::core_api::{ClassificationFault, CoreError, NameCatalog};
use crate::value::{Table, Value};

pub const HAMMER_DEITY: &str = "Hammer";
pub const CHAOS_DEITY: &str = "Chaos";

const FRAME_HAMMER: &str = "Hammer";
const FRAME_DUO: &str = "Duo";
const CHAOS_ICON_MARKER: &str = "Chaos_Blessing";

static DUO_ICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-Za-z]+)_([A-Za-z]+)_[0-9]+").expect("valid duo pattern"));
static BOON_ICON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^Boon_([A-Za-z]+)_[0-9]+").expect("valid boon pattern"));

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Rare,
    Epic,
    Heroic,
    Legendary,
    Duo,
    Unknown(String),
}

impl Rarity {
    pub fn from_raw(raw: &str) -> Self {
        match raw {
            "Common" => Self::Common,
            "Rare" => Self::Rare,
            "Epic" => Self::Epic,
            "Heroic" => Self::Heroic,
            "Legendary" => Self::Legendary,
            "Duo" => Self::Duo,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Common => "Common",
            Self::Rare => "Rare",
            Self::Epic => "Epic",
            Self::Heroic => "Heroic",
            Self::Legendary => "Legendary",
            Self::Duo => "Duo",
            Self::Unknown(raw) => raw,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A classified boon. `gods` holds one deity, or two for a duo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Trait {
    pub gods: Vec<String>,
    pub name: String,
    pub rarity: Rarity,
}

impl Trait {
    fn single(god: &str, name: &str, rarity: Rarity) -> Self {
        Self {
            gods: vec![god.to_string()],
            name: name.to_string(),
            rarity,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Report Daedalus hammer upgrades under the `Hammer` pseudo-deity.
    pub include_hammer: bool,
}

/// Which rule an entry falls under, decided once per entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule<'a> {
    Hammer,
    Duo { icon: Option<&'a str> },
    Chaos,
    IconRarity { god: &'a str, rarity: &'a str },
    GodField { god: &'a str, rarity: Option<&'a str> },
    Unclassified,
}

impl<'a> Rule<'a> {
    pub fn select(record: &'a Table, options: ClassifyOptions) -> Self {
        let frame = record.str_field("Frame");
        let icon = record.str_field("Icon");
        let rarity = record.str_field("Rarity");

        if options.include_hammer && frame == Some(FRAME_HAMMER) {
            return Self::Hammer;
        }
        if frame == Some(FRAME_DUO) {
            return Self::Duo { icon };
        }
        if icon.is_some_and(|i| i.contains(CHAOS_ICON_MARKER)) {
            return Self::Chaos;
        }
        if let (Some(icon), Some(rarity)) = (icon, rarity)
            && let Some(caps) = BOON_ICON.captures(icon)
            && let Some(god) = caps.get(1)
        {
            return Self::IconRarity {
                god: god.as_str(),
                rarity,
            };
        }
        if let Some(god) = record.str_field("God") {
            return Self::GodField { god, rarity };
        }
        Self::Unclassified
    }
}

pub struct Classifier<'n> {
    names: &'n NameCatalog,
    options: ClassifyOptions,
}

impl<'n> Classifier<'n> {
    pub fn new(names: &'n NameCatalog, options: ClassifyOptions) -> Self {
        Self { names, options }
    }

    /// Classify one trait dictionary entry.
    ///
    /// `key` is the dictionary key, used as the name when the record has no
    /// `Name`. Entries whose index 1 is not a table yield nothing.
    pub fn classify(&self, key: &str, entry: &Value) -> Result<Vec<Trait>, CoreError> {
        let Some(entry) = entry.as_table() else {
            trace!(key, kind = entry.kind(), "trait entry is not a table");
            return Ok(Vec::new());
        };
        let Some(record) = entry.get_index(1).and_then(Value::as_table) else {
            trace!(key, "trait entry has no record at index 1");
            return Ok(Vec::new());
        };

        let name = self.display_name(record, key);
        let rule = Rule::select(record, self.options);
        trace!(key, ?rule, "selected rule");

        let traits = match rule {
            Rule::Hammer => vec![Trait::single(HAMMER_DEITY, name, Rarity::Common)],
            Rule::Duo { icon } => {
                let (first, second) = parse_duo_icon(icon).ok_or_else(|| {
                    CoreError::Classification {
                        reason: ClassificationFault::MalformedDuoIcon,
                        trait_name: name.to_string(),
                        icon: icon.map(str::to_string),
                    }
                })?;
                vec![Trait {
                    gods: vec![first.to_string(), second.to_string()],
                    name: name.to_string(),
                    rarity: Rarity::Duo,
                }]
            }
            Rule::Chaos => entry
                .values()
                .filter_map(Value::as_table)
                .filter_map(|sibling| {
                    let rarity = sibling.str_field("Rarity")?;
                    let sibling_name = sibling
                        .str_field("Name")
                        .map_or(name, |n| self.names.resolve(n));
                    Some(Trait::single(
                        CHAOS_DEITY,
                        sibling_name,
                        Rarity::from_raw(rarity),
                    ))
                })
                .collect(),
            Rule::IconRarity { god, rarity } => {
                vec![Trait::single(god, name, Rarity::from_raw(rarity))]
            }
            Rule::GodField { god, rarity } => vec![Trait::single(
                god,
                name,
                rarity.map_or(Rarity::Common, Rarity::from_raw),
            )],
            Rule::Unclassified => Vec::new(),
        };
        Ok(traits)
    }

    fn display_name<'a>(&'a self, record: &'a Table, key: &'a str) -> &'a str {
        record
            .str_field("Name")
            .map_or(key, |raw| self.names.resolve(raw))
    }
}

fn parse_duo_icon(icon: Option<&str>) -> Option<(&str, &str)> {
    let caps = DUO_ICON.captures(icon?)?;
    Some((caps.get(1)?.as_str(), caps.get(2)?.as_str()))
}
