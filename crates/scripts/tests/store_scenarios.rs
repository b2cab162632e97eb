use scripts::*;

fn stores() -> Vec<(&'static str, Box<dyn ScriptStore>)> {
    vec![
        (
            "sqlite",
            Box::new(ScriptDb::open_in_memory().unwrap()) as Box<dyn ScriptStore>,
        ),
        ("memory", Box::new(MemoryStore::new()) as Box<dyn ScriptStore>),
    ]
}

#[test]
fn test_create_applies_defaults() {
    for (name, mut store) in stores() {
        let s = store.create("Hello", "Hello").unwrap();
        assert_eq!(s.font_size, 30.0, "{name}");
        assert_eq!(s.scroll_speed, 10.0, "{name}");
        assert_eq!(s.created_at, s.updated_at, "{name}");
        assert_eq!(store.get(&s.id).unwrap(), s, "{name}");
    }
}

#[test]
fn test_delete_removes_from_list_and_count() {
    for (name, mut store) in stores() {
        let a = store.create("Alpha", "a").unwrap();
        let b = store.create("Beta", "b").unwrap();
        let c = store.create("Gamma", "c").unwrap();
        assert_eq!(store.count().unwrap(), 3, "{name}");

        store.delete(&b.id).unwrap();
        assert_eq!(store.count().unwrap(), 2, "{name}");
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![a.id.clone(), c.id.clone()], "{name}");

        assert!(
            matches!(store.delete(&b.id), Err(StoreError::NotFound(_))),
            "{name}"
        );
        assert!(!store.contains(&b.id).unwrap(), "{name}");
    }
}

#[test]
fn test_edit_then_save_bumps_updated_at_only() {
    for (name, mut store) in stores() {
        let original = store.create("Draft", "first").unwrap();
        let mut s = original.clone();
        s.edit("Final", "second");
        store.update(&s).unwrap();

        let saved = store.get(&s.id).unwrap();
        assert!(saved.updated_at > original.updated_at, "{name}");
        assert_eq!(saved.created_at, original.created_at, "{name}");
        assert_eq!(saved.display_title(), "Final", "{name}");
        assert_eq!(saved.display_content(), "second", "{name}");
    }
}

#[test]
fn test_settings_save_persists_and_validates() {
    for (name, mut store) in stores() {
        let mut s = store.create("T", "c").unwrap();
        s.apply_settings(64.0, 3.0).unwrap();
        store.update(&s).unwrap();
        let saved = store.get(&s.id).unwrap();
        assert_eq!((saved.font_size, saved.scroll_speed), (64.0, 3.0), "{name}");

        let mut bad = saved.clone();
        bad.scroll_speed = 0.5;
        assert!(
            matches!(store.update(&bad), Err(StoreError::Validation { .. })),
            "{name}"
        );
        assert_eq!(store.get(&s.id).unwrap().scroll_speed, 3.0, "{name}");
    }
}

#[test]
fn test_update_unknown_script_is_not_found() {
    for (name, mut store) in stores() {
        let ghost = Script::new("ghost", "boo");
        assert!(
            matches!(store.update(&ghost), Err(StoreError::NotFound(_))),
            "{name}"
        );
        assert!(matches!(store.get(&ghost.id), Err(StoreError::NotFound(_))), "{name}");
    }
}

#[test]
fn test_list_orders() {
    for (name, mut store) in stores() {
        store.create("zebra", "").unwrap();
        store.create("Apple", "").unwrap();
        store.create("mango", "").unwrap();
        let mut untitled = Script::new("", "no title");
        untitled.title = None;
        store.insert(&untitled).unwrap();

        let titles: Vec<String> = store
            .list()
            .unwrap()
            .iter()
            .map(|s| s.display_title().to_string())
            .collect();
        assert_eq!(titles, vec!["", "Apple", "mango", "zebra"], "{name}");

        let recent = store.list_by(ScriptOrder::RecentlyCreated).unwrap();
        assert_eq!(recent.len(), 4, "{name}");
        assert!(
            recent.windows(2).all(|w| w[0].created_at >= w[1].created_at),
            "{name}"
        );
    }
}

#[test]
fn test_store_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("scripts.db");
    let id = {
        let mut db = ScriptDb::open_or_create(&path).unwrap();
        let s = db.create("Keep", "me").unwrap();
        s.id
    };
    let db = ScriptDb::open_or_create(&path).unwrap();
    assert_eq!(db.path(), Some(path.as_path()));
    assert_eq!(db.count().unwrap(), 1);
    assert_eq!(db.get(&id).unwrap().display_content(), "me");
    assert_eq!(db.schema_version().unwrap(), SCHEMA_VERSION);
}

#[test]
fn test_export_from_sqlite_import_into_memory() {
    let mut db = ScriptDb::open_in_memory().unwrap();
    db.insert(&Script::sample()).unwrap();
    db.create("Second", "text").unwrap();

    let json = transfer::export_json(&db).unwrap();
    let mut mem = MemoryStore::new();
    assert_eq!(transfer::import_json(&mut mem, &json).unwrap(), 2);
    assert_eq!(mem.list().unwrap(), db.list().unwrap());
}

#[test]
fn test_preview_store_holds_sample() {
    let store = MemoryStore::preview();
    assert_eq!(store.count().unwrap(), 1);
    assert_eq!(store.list().unwrap()[0].display_title(), "Sample Script");
}

#[test]
fn test_update_before_creation_is_rejected() {
    for (name, mut store) in stores() {
        let mut backdated = Script::new("Backdated", "text");
        backdated.updated_at = backdated.created_at - chrono::Duration::hours(1);
        assert!(
            matches!(store.insert(&backdated), Err(StoreError::Timestamps { .. })),
            "{name}"
        );
        assert_eq!(store.count().unwrap(), 0, "{name}");

        let saved = store.create("Kept", "text").unwrap();
        let mut edited = saved.clone();
        edited.updated_at = saved.created_at - chrono::Duration::seconds(1);
        assert!(
            matches!(store.update(&edited), Err(StoreError::Timestamps { .. })),
            "{name}"
        );
        assert_eq!(store.get(&saved.id).unwrap(), saved, "{name}");

        let json = r#"{"version": 1, "scripts": [{
            "id": "x",
            "title": "Time travel",
            "content": "text",
            "created_at": "2025-01-02T00:00:00Z",
            "updated_at": "2020-01-01T00:00:00Z",
            "font_size": 30.0,
            "scroll_speed": 10.0
        }]}"#;
        assert!(
            matches!(
                transfer::import_json(store.as_mut(), json),
                Err(StoreError::Timestamps { .. })
            ),
            "{name}"
        );
        assert!(!store.contains("x").unwrap(), "{name}");
    }
}

#[test]
fn test_import_with_one_invalid_record_adds_nothing() {
    let mut source = MemoryStore::new();
    source.create("Valid", "a").unwrap();
    let mut invalid = Script::new("Invalid", "b");
    invalid.font_size = 5.0;
    let doc = transfer::ScriptExport {
        version: transfer::EXPORT_VERSION,
        scripts: vec![source.list().unwrap().remove(0), invalid],
    };
    let json = serde_json::to_string(&doc).unwrap();

    for (name, mut store) in stores() {
        store.create("Existing", "c").unwrap();
        let result = transfer::import_json(store.as_mut(), &json);
        assert!(
            matches!(result, Err(StoreError::Validation { .. })),
            "{name}"
        );
        assert_eq!(store.count().unwrap(), 1, "{name}");
    }
}
