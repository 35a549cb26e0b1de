use std::fmt::Write as _;

use boons_core::classify::Trait;
use boons_core::core_api::{Session, Snapshot};
use boons_core::tally::Booncount;
use serde_json::{Map as JsonMap, Value as JsonValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JsonStyle {
    #[default]
    CanonicalV1,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextRenderOptions {
    /// List each boon label under its deity.
    pub labels: bool,
}

pub fn render_text(session: &Session) -> String {
    render_text_with_options(session, TextRenderOptions::default())
}

pub fn render_text_with_options(session: &Session, options: TextRenderOptions) -> String {
    let mut out = String::new();

    for count in session.booncounts() {
        let keepsake = if session.has_keepsake(&count.deity) {
            " + keepsake"
        } else {
            ""
        };
        let sum = count.sum();
        let _ = writeln!(
            out,
            "{}: {} {}{}",
            count.deity,
            sum,
            plural(sum as usize, "boon"),
            keepsake
        );
        if options.labels {
            for label in &count.boon_labels {
                let _ = writeln!(out, "    {label}");
            }
        }
    }

    let total = session.total_boons();
    let keepsakes = session.keepsake_count();
    let _ = writeln!(
        out,
        "Total: {} nonchaos {}, {} {}",
        total,
        plural(total as usize, "boon"),
        keepsakes,
        plural(keepsakes, "keepsake")
    );
    out
}

pub fn render_json(session: &Session, style: JsonStyle) -> JsonValue {
    match style {
        JsonStyle::CanonicalV1 => JsonValue::Object(canonical_json(session)),
    }
}

fn canonical_json(session: &Session) -> JsonMap<String, JsonValue> {
    let mut out = JsonMap::new();
    out.insert("save".to_string(), snapshot_to_json(session.snapshot()));
    out.insert(
        "deities".to_string(),
        JsonValue::Array(
            session
                .booncounts()
                .iter()
                .map(|c| booncount_to_json(c, session.has_keepsake(&c.deity)))
                .collect(),
        ),
    );
    out.insert(
        "traits".to_string(),
        JsonValue::Array(session.traits().iter().map(trait_to_json).collect()),
    );
    out.insert(
        "total_boons".to_string(),
        JsonValue::from(session.total_boons()),
    );
    out.insert(
        "keepsake_count".to_string(),
        JsonValue::from(session.keepsake_count()),
    );
    out
}

fn snapshot_to_json(snapshot: &Snapshot) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "signature".to_string(),
        JsonValue::String(snapshot.signature.clone()),
    );
    out.insert("version".to_string(), JsonValue::from(snapshot.version));
    out.insert("timestamp".to_string(), JsonValue::from(snapshot.timestamp));
    out.insert(
        "location".to_string(),
        JsonValue::String(snapshot.location.clone()),
    );
    out.insert("runs".to_string(), JsonValue::from(snapshot.runs));
    out.insert(
        "meta_points".to_string(),
        JsonValue::from(snapshot.meta_points),
    );
    out.insert(
        "shrine_points".to_string(),
        JsonValue::from(snapshot.shrine_points),
    );
    out.insert("godmode".to_string(), JsonValue::Bool(snapshot.godmode));
    out.insert("hellmode".to_string(), JsonValue::Bool(snapshot.hellmode));
    out.insert(
        "current_map".to_string(),
        JsonValue::String(snapshot.current_map.clone()),
    );
    out.insert(
        "starting_map".to_string(),
        JsonValue::String(snapshot.starting_map.clone()),
    );
    out.insert(
        "lua_key_count".to_string(),
        JsonValue::from(snapshot.lua_key_count),
    );
    out.insert(
        "compressed_len".to_string(),
        JsonValue::from(snapshot.compressed_len),
    );
    out.insert(
        "decompressed_len".to_string(),
        JsonValue::from(snapshot.decompressed_len),
    );
    out.insert(
        "trait_entry_count".to_string(),
        JsonValue::from(snapshot.trait_entry_count),
    );
    JsonValue::Object(out)
}

fn booncount_to_json(count: &Booncount, keepsake: bool) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert("deity".to_string(), JsonValue::String(count.deity.clone()));
    out.insert("normal".to_string(), JsonValue::from(count.normal_count));
    out.insert("duo".to_string(), JsonValue::from(count.duo_count));
    out.insert(
        "legendary".to_string(),
        JsonValue::from(count.legendary_count),
    );
    out.insert("sum".to_string(), JsonValue::from(count.sum()));
    out.insert("keepsake".to_string(), JsonValue::Bool(keepsake));
    out.insert(
        "boons".to_string(),
        JsonValue::Array(
            count
                .boon_labels
                .iter()
                .cloned()
                .map(JsonValue::String)
                .collect(),
        ),
    );
    JsonValue::Object(out)
}

fn trait_to_json(t: &Trait) -> JsonValue {
    let mut out = JsonMap::new();
    out.insert(
        "gods".to_string(),
        JsonValue::Array(t.gods.iter().cloned().map(JsonValue::String).collect()),
    );
    out.insert("name".to_string(), JsonValue::String(t.name.clone()));
    out.insert(
        "rarity".to_string(),
        JsonValue::String(t.rarity.to_string()),
    );
    JsonValue::Object(out)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        word.to_string()
    } else {
        format!("{word}s")
    }
}
