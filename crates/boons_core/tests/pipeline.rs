mod common;

use boons_core::classify::{ClassifyOptions, Rarity};
use boons_core::core_api::{CoreError, CoreErrorCode, Engine, NameCatalog};
use boons_core::value::Table;

use common::{entry, game_state, record, save_bytes, zeus_poseidon_state};

#[test]
fn plain_and_duo_boons_tally_per_deity() {
    let bytes = save_bytes(&zeus_poseidon_state());
    let session = Engine::new()
        .open_bytes(&bytes, &NameCatalog::empty())
        .expect("save should decode");

    let deities: Vec<&str> = session
        .booncounts()
        .iter()
        .map(|c| c.deity.as_str())
        .collect();
    assert_eq!(deities, vec!["Poseidon", "Zeus"]);

    let zeus = session.booncount("Zeus").expect("zeus");
    assert_eq!((zeus.normal_count, zeus.duo_count, zeus.legendary_count), (1, 1, 0));
    assert_eq!(zeus.sum(), 2);

    let poseidon = session.booncount("Poseidon").expect("poseidon");
    assert_eq!((poseidon.normal_count, poseidon.duo_count, poseidon.legendary_count), (0, 1, 0));
    assert_eq!(poseidon.sum(), 1);

    assert_eq!(session.total_boons(), 3);
    assert_eq!(session.keepsake_count(), 0);
}

#[test]
fn snapshot_reflects_envelope_fields() {
    let bytes = save_bytes(&zeus_poseidon_state());
    let session = Engine::new()
        .open_bytes(&bytes, &NameCatalog::empty())
        .expect("save should decode");

    let snapshot = session.snapshot();
    assert_eq!(snapshot.signature, "SGB1");
    assert_eq!(snapshot.location, "Asphodel");
    assert_eq!(snapshot.runs, 27);
    assert!(snapshot.hellmode);
    assert!(!snapshot.godmode);
    assert_eq!(snapshot.trait_entry_count, 2);
    assert!(snapshot.decompressed_len > 0);
    assert!(snapshot.modified.is_none());
}

#[test]
fn keepsakes_from_both_sources_seed_zero_counts() {
    let mut traits = Table::new();
    traits.insert(
        "ForceAthenaBoonTrait",
        entry(vec![record(&[("Name", "ForceAthenaBoonTrait")])]),
    );
    let mut blocked = Table::new();
    blocked.insert(1, "ForceHermesBoonTrait");
    blocked.insert(2, "ForceAthenaBoonTrait");

    let bytes = save_bytes(&game_state(traits, Some(blocked)));
    let session = Engine::new()
        .open_bytes(&bytes, &NameCatalog::empty())
        .expect("save should decode");

    assert_eq!(session.keepsakes(), ["Athena", "Hermes"]);
    assert_eq!(session.keepsake_count(), 2);
    assert!(session.has_keepsake("Hermes"));
    assert_eq!(session.booncount("Hermes").map(|c| c.sum()), Some(0));
    assert_eq!(session.booncount("Athena").map(|c| c.sum()), Some(0));
    assert_eq!(session.total_boons(), 0);
}

#[test]
fn hammer_traits_need_the_option() {
    let mut traits = Table::new();
    traits.insert(
        "SwordCriticalTrait",
        entry(vec![record(&[("Frame", "Hammer"), ("Name", "Super Nova")])]),
    );
    let bytes = save_bytes(&game_state(traits, None));
    let names = NameCatalog::empty();

    let default = Engine::new().open_bytes(&bytes, &names).expect("decode");
    assert!(default.booncounts().is_empty());

    let with_hammer = Engine::with_options(ClassifyOptions {
        include_hammer: true,
    })
    .open_bytes(&bytes, &names)
    .expect("decode");
    assert_eq!(with_hammer.booncount("Hammer").map(|c| c.normal_count), Some(1));
}

#[test]
fn display_names_come_from_catalog() {
    let bytes = save_bytes(&zeus_poseidon_state());
    let names = NameCatalog::from_pairs([("Static", "Lightning Strike")]);
    let session = Engine::new().open_bytes(&bytes, &names).expect("decode");

    let zeus = session.booncount("Zeus").expect("zeus");
    assert_eq!(zeus.boon_labels, vec!["Lightning Strike - N", "Static Discharge - D"]);
    assert_eq!(session.traits()[0].rarity, Rarity::Common);
}

#[test]
fn malformed_duo_aborts_the_whole_decode() {
    let mut traits = Table::new();
    traits.insert(
        "ZeusWeaponTrait",
        entry(vec![record(&[("God", "Zeus"), ("Name", "Static")])]),
    );
    traits.insert(
        "BrokenDuoTrait",
        entry(vec![record(&[
            ("Frame", "Duo"),
            ("Icon", "ZeusOnly_01"),
            ("Name", "Broken"),
        ])]),
    );
    let bytes = save_bytes(&game_state(traits, None));

    let err = Engine::new()
        .open_bytes(&bytes, &NameCatalog::empty())
        .expect_err("duo icon is malformed");
    assert_eq!(err.code(), CoreErrorCode::Classification);
    assert!(err.to_string().contains("malformed-duo-icon"));
}

#[test]
fn missing_hero_is_a_projection_error() {
    let mut run = Table::new();
    run.insert("RunDepthCache", 3);
    let mut state = Table::new();
    state.insert("CurrentRun", run);
    let bytes = save_bytes(&boons_core::value::Value::Table(state));

    match Engine::new().open_bytes(&bytes, &NameCatalog::empty()) {
        Err(CoreError::Projection { missing }) => assert_eq!(missing, "Hero"),
        other => panic!("unexpected result {other:?}"),
    }
}

#[test]
fn truncated_file_is_an_envelope_error() {
    let bytes = save_bytes(&zeus_poseidon_state());
    let err = Engine::new()
        .open_bytes(&bytes[..bytes.len() / 2], &NameCatalog::empty())
        .expect_err("truncated");
    assert_eq!(err.code(), CoreErrorCode::EnvelopeFormat);
    assert!(err.to_string().contains("truncated"));
}

#[test]
fn open_path_records_modification_time() {
    let path = std::env::temp_dir().join(format!(
        "hades_boons_pipeline_{}_Temp.sav",
        std::process::id()
    ));
    std::fs::write(&path, save_bytes(&zeus_poseidon_state())).expect("write fixture");

    let session = Engine::new()
        .open_path(&path, &NameCatalog::empty())
        .expect("decode from path");
    assert!(session.snapshot().modified.is_some());

    let _ = std::fs::remove_file(&path);
}

#[test]
fn missing_file_is_an_io_error() {
    let err = Engine::new()
        .open_path(
            std::path::Path::new("/nonexistent/hades/Profile1_Temp.sav"),
            &NameCatalog::empty(),
        )
        .expect_err("no such file");
    assert_eq!(err.code(), CoreErrorCode::Io);
}
