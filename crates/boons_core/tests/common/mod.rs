#![allow(dead_code)]

use boons_core::envelope::{SaveEnvelope, compress_payload};
use boons_core::luabins;
use boons_core::value::{Table, Value};

pub fn record(fields: &[(&str, &str)]) -> Table {
    fields.iter().map(|&(k, v)| (k, v)).collect()
}

/// A trait dictionary entry: records stored under keys 1..n.
pub fn entry(records: Vec<Table>) -> Table {
    let mut t = Table::new();
    for (i, r) in records.into_iter().enumerate() {
        t.insert(i as i64 + 1, r);
    }
    t
}

pub fn game_state(traits: Table, blocked_keepsakes: Option<Table>) -> Value {
    let mut hero = Table::new();
    hero.insert("TraitDictionary", traits);
    hero.insert("Health", 50);

    let mut run = Table::new();
    run.insert("Hero", hero);
    run.insert("RunDepthCache", 7);
    if let Some(blocked) = blocked_keepsakes {
        run.insert("BlockedKeepsakes", blocked);
    }

    let mut state = Table::new();
    state.insert("CurrentRun", run);
    Value::Table(state)
}

pub fn envelope_for(state: &Value) -> SaveEnvelope {
    let raw = luabins::encode(std::slice::from_ref(state)).expect("fixture should encode");
    SaveEnvelope {
        signature: *b"SGB1",
        checksum: [1, 2, 3, 4],
        version: 16,
        timestamp: 133_456_789,
        location: "Asphodel".to_string(),
        runs: 27,
        meta_points: 1200,
        shrine_points: 16,
        godmode: 0,
        hellmode: 1,
        lua_keys: Vec::new(),
        current_map: "B_Combat10".to_string(),
        starting_map: "RoomOpening".to_string(),
        payload: compress_payload(&raw),
    }
}

pub fn save_bytes(state: &Value) -> Vec<u8> {
    envelope_for(state).to_bytes()
}

/// One plain Zeus boon and one Zeus/Poseidon duo, no keepsakes.
pub fn zeus_poseidon_state() -> Value {
    let mut traits = Table::new();
    traits.insert(
        "ZeusWeaponTrait",
        entry(vec![record(&[
            ("God", "Zeus"),
            ("Name", "Static"),
            ("Rarity", "Common"),
        ])]),
    );
    traits.insert(
        "ImpactBoltTrait",
        entry(vec![record(&[
            ("Frame", "Duo"),
            ("Icon", "Zeus_Poseidon_01"),
            ("Name", "Static Discharge"),
        ])]),
    );
    game_state(traits, None)
}
