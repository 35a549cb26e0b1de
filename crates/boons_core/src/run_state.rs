use tracing::warn;

use crate::core_api::CoreError;
use crate::value::{Table, Value};

static EMPTY_TABLE: Table = Table::new();

/// The parts of a decoded save the tally needs, borrowed from the tree.
#[derive(Debug, Clone, Copy)]
pub struct RunState<'a> {
    pub current_run: &'a Table,
    pub trait_dictionary: &'a Table,
    /// Empty when no keepsake has been blocked this run.
    pub blocked_keepsakes: &'a Table,
}

impl<'a> RunState<'a> {
    /// Walk `root[0].CurrentRun` to the trait dictionary and keepsake table.
    pub fn project(root: &'a Value) -> Result<Self, CoreError> {
        let game_state = root
            .as_table()
            .and_then(|t| t.get_index(0))
            .and_then(Value::as_table)
            .ok_or(CoreError::Projection {
                missing: "root state table",
            })?;
        let current_run = game_state
            .table_field("CurrentRun")
            .ok_or(CoreError::Projection {
                missing: "CurrentRun",
            })?;
        let hero = current_run.table_field("Hero").ok_or(CoreError::Projection {
            missing: "Hero",
        })?;
        let trait_dictionary = hero
            .table_field("TraitDictionary")
            .ok_or(CoreError::Projection {
                missing: "TraitDictionary",
            })?;

        let blocked_keepsakes = match current_run.get_str("BlockedKeepsakes") {
            None | Some(Value::Nil) => &EMPTY_TABLE,
            Some(Value::Table(t)) => t,
            Some(other) => {
                warn!(
                    kind = other.kind(),
                    "BlockedKeepsakes is not a table, treating it as empty"
                );
                &EMPTY_TABLE
            }
        };

        Ok(Self {
            current_run,
            trait_dictionary,
            blocked_keepsakes,
        })
    }

    /// Dictionary entries as `(trait key, entry)` pairs in stored order.
    /// Non-string keys are skipped.
    pub fn trait_entries(&self) -> impl Iterator<Item = (&'a str, &'a Value)> {
        self.trait_dictionary
            .iter()
            .filter_map(|(k, v)| Some((k.as_str()?, v)))
    }
}
