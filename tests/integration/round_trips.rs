//! Store, import, verify and delete against one archive.

use crate::common::*;

#[test]
fn frame_survives_store_and_import() {
    let mut f = Fixture::new();
    let stored = f.run("store frame in my_frames").unwrap();
    let imported = f.run("from my_frames import frame as copy").unwrap();

    assert_eq!(f.value("copy"), Some(frame()));
    // checksums of the re-read bytes match what was written
    assert_eq!(imported.result[0].new_file, stored.result[0].new_file);
}

#[test]
fn assert_routes_by_digest_length() {
    let mut f = Fixture::new();
    let stored = f.run("store frame in my_frames").unwrap();
    let sums = stored.result[0].new_file.clone().unwrap();
    let crc = sums.crc32.unwrap();
    let sha = sums.sha256.unwrap();

    assert!(f.run(&format!("assert frame in my_frames is {}", crc)).is_ok());
    assert!(f.run(&format!("assert frame in my_frames is {}", sha)).is_ok());
    assert!(f
        .run(&format!("assert 'my_frames/frame' is {} with CRC32", crc))
        .is_ok());

    let err = f.run("assert frame in my_frames is ABCDEF").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(err.to_string().contains("8 (CRC32) or 64 (SHA256)"));
}

#[test]
fn assert_detects_changed_content() {
    let mut f = Fixture::new();
    let before = f.run("store note in notes").unwrap();
    let crc = before.result[0].new_file.clone().unwrap().crc32.unwrap();

    f.scope.assign("note", Value::from("buy bread instead").into());
    f.run("store note in notes").unwrap();

    let err = f
        .run(&format!("assert note in notes is {}", crc))
        .unwrap_err();
    assert!(matches!(err, Error::ChecksumMismatch { .. }), "{:?}", err);
}

#[test]
fn deleted_objects_are_gone() {
    let mut f = Fixture::new();
    f.run("store note in notes").unwrap();
    f.scope.remove("note");

    let deleted = f.run("del note from notes").unwrap();
    assert_eq!(deleted.result[0].subject, "notes/note");
    let err = f.run("from notes import note").unwrap_err();
    assert!(err.to_string().contains("no item named 'notes/note'"));
}

#[test]
fn custom_functions_round_trip() {
    let mut f = Fixture::new();
    f.scope.assign(
        "settings",
        Value::from(serde_json::json!({"depth": 3, "tags": ["a", "b"]})).into(),
    );
    f.run("store settings in 'config/settings.json' with json.dumps")
        .unwrap();
    f.run("import 'config/settings.json' as restored with json.loads")
        .unwrap();
    assert_eq!(f.value("restored"), f.value("settings"));
}

#[test]
fn folder_view_browses_lazily() {
    let mut f = Fixture::new();
    f.run("store frame, note in shelf").unwrap();
    f.run("store note in 'shelf/inner/deep'").unwrap();
    f.run("import shelf").unwrap();

    let shelf = f.scope.lookup("shelf").unwrap();
    let Binding::Object(view) = &shelf else {
        panic!("expected a folder view, got {:?}", shelf);
    };
    assert_eq!(
        view.attribute_names().unwrap(),
        vec!["frame", "inner", "note"]
    );
    let deep = resolve(&f.scope, "shelf.inner.deep").unwrap();
    assert_eq!(deep.as_value(), Some(&Value::from("remember the milk")));
}

#[test]
fn stamps_follow_each_command() {
    let mut f = Fixture::new();
    f.run("store note in notes").unwrap();
    f.run("store note in notes").unwrap();

    assert_eq!(f.sink.stamps.len(), 2);
    assert!(f.sink.stamps[0].starts_with("Stored `note` ("));
    assert!(f.sink.stamps[1].contains(" → "), "{}", f.sink.stamps[1]);
    assert_eq!(f.sink.records.len(), 2);
}
