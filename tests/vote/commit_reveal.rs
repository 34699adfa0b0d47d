use goo::core::error::GooError;
use goo::vote::{VoteStore, commit, generate_salt, verify};
use proptest::prelude::*;
use std::fs;
use tempfile::tempdir;

#[test]
fn test_commitment_lifecycle() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path().join("votes"));

    let salt = generate_salt(32);
    assert!(salt.strong);
    let hash = commit("1", &salt.value);

    let saved = store.save("0000001", "1", &salt.value, &hash).unwrap();
    assert_eq!(saved.hash, hash);
    assert!(store.path_for("0000001").exists());

    let (value, loaded_salt) = store.load("0000001").unwrap();
    assert_eq!(value, "1");
    assert_eq!(loaded_salt, salt.value);
    assert!(verify(&hash, &value, &loaded_salt));

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].request_id, "0000001");

    store.delete("0000001").unwrap();
    assert!(matches!(store.load("0000001"), Err(GooError::NotFound(_))));
}

#[test]
fn test_resave_replaces_previous_commitment() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path());

    store.save("0000002", "10", "aa", &commit("10", "aa")).unwrap();
    store.save("0000002", "20", "bb", &commit("20", "bb")).unwrap();

    let (value, salt) = store.load("0000002").unwrap();
    assert_eq!((value.as_str(), salt.as_str()), ("20", "bb"));
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_missing_and_incomplete_records() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path());

    assert!(matches!(store.load("0000009"), Err(GooError::NotFound(_))));
    assert!(store.list().unwrap().is_empty());

    fs::write(
        store.path_for("0000004"),
        r#"{"request_id":"0000004","value":"","salt":"ff","hash":"00","timestamp":"2025-10-27T12:00:00Z"}"#,
    )
    .unwrap();
    assert!(matches!(store.load("0000004"), Err(GooError::Incomplete(_))));
}

#[test]
fn test_record_without_hash_or_timestamp_loads() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path());
    fs::write(
        store.path_for("0000006"),
        r#"{"request_id":"0000006","value":"12","salt":"ab"}"#,
    )
    .unwrap();

    assert_eq!(store.load("0000006").unwrap(), ("12".to_string(), "ab".to_string()));
    let record = store.get("0000006").unwrap();
    assert!(record.hash.is_empty());
    assert!(record.timestamp.is_empty());
    assert_eq!(store.list().unwrap().len(), 1);
}

#[test]
fn test_list_skips_garbage_files() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path());
    store.save("0000005", "7", "cc", &commit("7", "cc")).unwrap();
    fs::write(tmp.path().join("notes.txt"), "not a vote").unwrap();
    fs::write(tmp.path().join("broken.json"), "{").unwrap();

    let listed = store.list().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].request_id, "0000005");
}

#[test]
fn test_request_id_cannot_escape_store() {
    let tmp = tempdir().unwrap();
    let store = VoteStore::new(tmp.path().join("votes"));
    for id in ["", "..", "../x", "a/b", "a\\b"] {
        assert!(
            matches!(store.save(id, "1", "s", "h"), Err(GooError::ValidationError(_))),
            "accepted '{}'",
            id
        );
    }
}

#[test]
fn test_salts_differ() {
    let a = generate_salt(32);
    let b = generate_salt(32);
    assert_eq!(a.value.len(), 64);
    assert_ne!(a.value, b.value);
}

proptest! {
    #[test]
    fn prop_commitment_binds_value_and_salt(
        value in "[0-9]{1,12}",
        salt in "[0-9a-f]{1,64}",
        other in "[0-9]{1,12}",
        other_salt in "[0-9a-f]{1,64}",
    ) {
        let hash = commit(&value, &salt);
        prop_assert!(verify(&hash, &value, &salt));
        prop_assert!(verify(&hash.to_uppercase(), &value, &salt));
        if other != value {
            prop_assert!(!verify(&hash, &other, &salt));
        }
        let tweaked = format!("{}0", salt);
        prop_assert!(!verify(&hash, &value, &tweaked));
        if other_salt != salt {
            prop_assert!(!verify(&hash, &value, &other_salt));
        }
    }

    #[test]
    fn prop_store_round_trips_any_value(value in "[^\u{0}]{1,40}", salt in "[0-9a-f]{64}") {
        let tmp = tempdir().unwrap();
        let store = VoteStore::new(tmp.path());
        store.save("0000001", &value, &salt, &commit(&value, &salt)).unwrap();
        let (loaded_value, loaded_salt) = store.load("0000001").unwrap();
        prop_assert_eq!(loaded_value, value);
        prop_assert_eq!(loaded_salt, salt);
    }
}
