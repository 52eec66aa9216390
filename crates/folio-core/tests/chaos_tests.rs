use folio_core::seed::seed_projects;
use folio_core::{Error, ImageSource, KeyValueStore, MemoryKeyValueStore, ProjectStore, Settings};
use std::fs;
use tempfile::tempdir;

mod helpers;
use helpers::{file_store, sample_project, setup_test_env, setup_tracing};

const KEY: &str = "portfolio_projects";

fn store_with_raw(raw: &str) -> ProjectStore<MemoryKeyValueStore> {
    let mut storage = MemoryKeyValueStore::new();
    storage.set(KEY, raw).unwrap();
    ProjectStore::new(storage)
}

fn valid_entry(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "title": format!("Project {id}"),
        "description": "Something",
        "technologies": ["Rust"],
        "githubUrl": "https://github.com/example/p",
        "image": { "kind": "url", "value": "https://images.example.com/p.png" },
        "createdAt": "2024-06-01T12:00:00Z"
    })
}

#[test]
fn core_c_01_it_fails_gracefully_with_corrupt_config() {
    let temp_dir = tempdir().unwrap();
    let config_path = temp_dir.path().join("settings.toml");
    fs::write(&config_path, "storage_quota_bytes = 'not a number'").unwrap();

    let result = Settings::load(&config_path, temp_dir.path());

    assert!(result.is_err(), "Expected deserialization to fail");
    assert!(matches!(result.err().unwrap(), Error::Config(_)), "Expected a config error");
}

#[test]
fn core_l_01_it_reseeds_when_stored_json_is_garbage() {
    setup_tracing();
    let mut store = store_with_raw("{not_valid_json: true");
    assert_eq!(store.list().unwrap(), seed_projects().as_slice());

    let storage = store.into_storage();
    let persisted: serde_json::Value = serde_json::from_str(&storage.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted.as_array().map(Vec::len), Some(4), "Seed should overwrite the garbage");
}

#[test]
fn core_l_02_it_reseeds_when_stored_value_is_not_a_list_or_empty() {
    for raw in [r#"{"projects": []}"#, "[]", "42", "null"] {
        let mut store = store_with_raw(raw);
        assert_eq!(store.list().unwrap(), seed_projects().as_slice(), "input {raw}");
    }
}

#[test]
fn core_l_03_it_quarantines_malformed_records() {
    setup_tracing();
    let raw = serde_json::json!([
        valid_entry("a"),
        { "id": "b", "title": "No fields" },
        { "id": "c", "title": "  ", "description": "x", "technologies": ["Rust"],
          "githubUrl": "https://github.com/x", "image": "https://i", "createdAt": "2024-01-01T00:00:00Z" },
        { "id": "d", "title": "Bad date", "description": "x", "technologies": ["Rust"],
          "githubUrl": "https://github.com/x", "image": "https://i", "createdAt": "yesterday" },
        valid_entry("a"),
    ]);
    let mut store = store_with_raw(&raw.to_string());

    let ids: Vec<_> = store.list().unwrap().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["a"]);

    let quarantined: Vec<_> = store.quarantined().iter().map(|q| q.index).collect();
    assert_eq!(quarantined, vec![1, 2, 3, 4]);
    assert!(store.quarantined()[3].reason.contains("duplicate id"));

    let quarantine_key = store.quarantine_key();
    let storage = store.into_storage();
    let moved: Vec<serde_json::Value> = serde_json::from_str(&storage.get(&quarantine_key).unwrap().unwrap()).unwrap();
    assert_eq!(moved.len(), 4);

    // The main slot no longer carries the bad entries, so reloading is clean.
    let mut reloaded = ProjectStore::new(storage);
    assert_eq!(reloaded.list().unwrap().len(), 1);
    assert!(reloaded.quarantined().is_empty());
}

#[test]
fn core_l_04_it_reseeds_when_no_record_survives() {
    let mut store = store_with_raw(r#"[{"id": "x"}, {"title": "y"}]"#);
    assert_eq!(store.list().unwrap(), seed_projects().as_slice());
    assert_eq!(store.quarantined().len(), 2);
}

#[test]
fn core_l_05_it_migrates_legacy_image_strings() {
    let raw = serde_json::json!([{
        "id": "1700000000000",
        "title": "Legacy",
        "description": "Stored before image kinds existed",
        "technologies": ["React"],
        "githubUrl": "https://github.com/example/legacy",
        "imageUrl": "data:image/png;base64,iVBORw0KGgo=",
        "createdAt": "2024-02-02T10:20:30.000Z"
    }]);
    let mut store = store_with_raw(&raw.to_string());
    let record = store.get("1700000000000").unwrap().unwrap().clone();
    assert_eq!(record.image, ImageSource::Embedded("data:image/png;base64,iVBORw0KGgo=".into()));

    store.update(&record.id, folio_core::ProjectPatch::title("Legacy v2")).unwrap();
    let storage = store.into_storage();
    let persisted: serde_json::Value = serde_json::from_str(&storage.get(KEY).unwrap().unwrap()).unwrap();
    assert_eq!(persisted[0]["image"]["kind"], "embedded");
    assert!(persisted[0].get("imageUrl").is_none());
}

#[test]
fn core_l_06_it_reseeds_when_the_storage_file_is_corrupt() {
    setup_tracing();
    let (_temp_dir, settings) = setup_test_env();
    fs::create_dir_all(&settings.data_dir).unwrap();
    fs::write(settings.storage_path(), "{not json").unwrap();

    let mut store = file_store(&settings);
    assert_eq!(store.list().unwrap(), seed_projects().as_slice());

    let backup = store.storage().corrupt_path();
    assert_eq!(fs::read_to_string(backup).unwrap(), "{not json");

    let mut reopened = file_store(&settings);
    assert_eq!(reopened.list().unwrap().len(), 4);
}

#[test]
fn core_l_07_it_quarantines_records_with_invalid_links_or_images() {
    let mut bad_github = valid_entry("github");
    bad_github["githubUrl"] = "nope".into();
    let mut bad_figma = valid_entry("figma");
    bad_figma["figmaUrl"] = "figma file".into();
    let mut bad_deploy = valid_entry("deploy");
    bad_deploy["deployUrl"] = "localhost demo".into();
    let mut bad_image_url = valid_entry("image-url");
    bad_image_url["image"] = serde_json::json!({ "kind": "url", "value": "not a url" });
    let mut bad_embedded = valid_entry("embedded");
    bad_embedded["image"] = serde_json::json!({ "kind": "embedded", "value": "iVBORw0KGgo=" });

    let raw = serde_json::json!([
        valid_entry("ok"),
        bad_github,
        bad_figma,
        bad_deploy,
        bad_image_url,
        bad_embedded,
    ]);
    let mut store = store_with_raw(&raw.to_string());

    let ids: Vec<_> = store.list().unwrap().iter().map(|p| p.id.clone()).collect();
    assert_eq!(ids, vec!["ok"]);

    let reasons: Vec<_> = store.quarantined().iter().map(|q| q.reason.clone()).collect();
    assert_eq!(reasons.len(), 5);
    assert!(reasons[0].contains("githubUrl"));
    assert!(reasons[1].contains("figmaUrl"));
    assert!(reasons[2].contains("deployUrl"));
    assert!(reasons[3].contains("image URL"));
    assert!(reasons[4].contains("data URL"));
}

#[test]
fn core_q_01_it_propagates_quota_errors_and_keeps_the_cache() {
    setup_tracing();
    let seed_size = serde_json::to_string(&seed_projects()).unwrap().len() + KEY.len();
    let mut store = ProjectStore::new(MemoryKeyValueStore::with_quota(seed_size + 64));
    assert_eq!(store.list().unwrap().len(), 4);

    let mut big = sample_project("Huge");
    big.image = ImageSource::Embedded(format!("data:image/png;base64,{}", "A".repeat(4096)));
    let result = store.create(big);

    assert!(matches!(result, Err(Error::QuotaExceeded { .. })), "Expected a quota error");
    assert_eq!(store.list().unwrap(), seed_projects().as_slice());
}

#[test]
fn core_fs_02_it_fails_gracefully_with_read_only_data_dir() {
    let (_temp_dir, settings) = setup_test_env();
    let mut store = file_store(&settings);
    store.list().unwrap();

    let original_perms = fs::metadata(&settings.data_dir).unwrap().permissions();
    let mut readonly_perms = original_perms.clone();
    readonly_perms.set_readonly(true);
    fs::set_permissions(&settings.data_dir, readonly_perms).unwrap();

    let result = store.create(sample_project("Blocked"));

    fs::set_permissions(&settings.data_dir, original_perms).unwrap();

    // Root ignores directory permissions, so only assert when the write was refused.
    if let Err(error) = result {
        assert!(matches!(error, Error::Io(_)), "Expected an I/O error");
        assert_eq!(store.list().unwrap().len(), 4);
    }
}
