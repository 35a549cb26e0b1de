use std::fs;
use std::path::Path;

use tracing::debug;

use crate::classify::{ClassifyOptions, Classifier, Trait};
use crate::envelope::SaveEnvelope;
use crate::luabins;
use crate::run_state::RunState;
use crate::tally::{self, Booncount};

use super::error::CoreError;
use super::name_catalog::NameCatalog;
use super::types::Snapshot;

#[derive(Debug, Default, Clone, Copy)]
pub struct Engine {
    options: ClassifyOptions,
}

/// Result of one decode. Built fresh per save; nothing carries over.
#[derive(Debug)]
pub struct Session {
    snapshot: Snapshot,
    traits: Vec<Trait>,
    keepsakes: Vec<String>,
    booncounts: Vec<Booncount>,
}

impl Engine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_options(options: ClassifyOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> ClassifyOptions {
        self.options
    }

    pub fn open_path(&self, path: &Path, names: &NameCatalog) -> Result<Session, CoreError> {
        let bytes = fs::read(path).map_err(|e| CoreError::io(path, e))?;
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();

        let mut session = self.open_bytes(&bytes, names)?;
        session.snapshot.modified = modified;
        Ok(session)
    }

    /// Envelope, decompress, decode, project, classify, aggregate. Any
    /// failure aborts the whole decode.
    pub fn open_bytes<B: AsRef<[u8]>>(
        &self,
        bytes: B,
        names: &NameCatalog,
    ) -> Result<Session, CoreError> {
        let envelope = SaveEnvelope::parse(bytes.as_ref())?;
        debug!(
            version = envelope.version,
            location = %envelope.location,
            payload = envelope.payload.len(),
            "read save envelope"
        );

        let raw = envelope.decompress_payload()?;
        let tree = luabins::decode(&raw)?;
        let state = RunState::project(&tree)?;
        debug!(
            traits = state.trait_dictionary.len(),
            blocked_keepsakes = state.blocked_keepsakes.len(),
            "projected run state"
        );

        let classifier = Classifier::new(names, self.options);
        let mut traits = Vec::new();
        for (key, entry) in state.trait_entries() {
            traits.extend(classifier.classify(key, entry)?);
        }

        let mut keepsakes = tally::blocked_keepsake_deities(&state);
        let counts = tally::aggregate(&keepsakes, &traits);
        // Counted per deity: one found in both keepsake sources counts once.
        keepsakes.sort();
        keepsakes.dedup();
        debug!(
            traits = traits.len(),
            deities = counts.len(),
            keepsakes = keepsakes.len(),
            "aggregated boons"
        );

        let snapshot = Snapshot {
            signature: envelope.signature_tag().into_owned(),
            version: envelope.version,
            timestamp: envelope.timestamp,
            location: envelope.location.clone(),
            runs: envelope.runs,
            meta_points: envelope.meta_points,
            shrine_points: envelope.shrine_points,
            godmode: envelope.is_godmode(),
            hellmode: envelope.is_hellmode(),
            current_map: envelope.current_map.clone(),
            starting_map: envelope.starting_map.clone(),
            lua_key_count: envelope.lua_keys.len(),
            compressed_len: envelope.payload.len(),
            decompressed_len: raw.len(),
            trait_entry_count: state.trait_dictionary.len(),
            modified: None,
        };

        Ok(Session {
            snapshot,
            traits,
            keepsakes,
            booncounts: counts.into_values().collect(),
        })
    }
}

impl Session {
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Classified traits in trait dictionary order.
    pub fn traits(&self) -> &[Trait] {
        &self.traits
    }

    /// Per-deity counts sorted by deity.
    pub fn booncounts(&self) -> &[Booncount] {
        &self.booncounts
    }

    pub fn booncount(&self, deity: &str) -> Option<&Booncount> {
        self.booncounts
            .binary_search_by(|c| c.deity.as_str().cmp(deity))
            .ok()
            .map(|i| &self.booncounts[i])
    }

    /// Distinct keepsake-blocked deities, sorted.
    pub fn keepsakes(&self) -> &[String] {
        &self.keepsakes
    }

    pub fn has_keepsake(&self, deity: &str) -> bool {
        self.keepsakes.binary_search_by(|k| k.as_str().cmp(deity)).is_ok()
    }

    pub fn keepsake_count(&self) -> usize {
        self.keepsakes.len()
    }

    /// Weighted boon total over every deity except Chaos.
    pub fn total_boons(&self) -> u32 {
        tally::total_boons(&self.booncounts)
    }
}
