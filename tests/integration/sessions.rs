//! Sessions: settings sources, encryption and independent dispatchers.

use crate::common::*;

#[test]
fn command_before_open_vault_is_a_configuration_error() {
    let dispatcher = Dispatcher::new();
    let err = dispatcher
        .vault("store note in notes", &mut scope(), &mut Collector::new())
        .unwrap_err();
    assert!(matches!(err, Error::Configuration { .. }));
}

#[test]
fn encrypted_vault_reopens_with_password() {
    let dir = tempfile::tempdir().unwrap();
    std::env::set_var("DATAVAULT_IT_PASSWORD_5F1E", "correct horse");
    let line = format!(
        "--path '{}' --encryption_variable DATAVAULT_IT_PASSWORD_5F1E",
        vault_path(&dir)
    );

    let mut writer = Dispatcher::new();
    let session = writer.open_vault(&line).unwrap();
    assert!(session.warnings().is_empty());
    writer
        .vault("store note in notes", &mut scope(), &mut Collector::new())
        .unwrap();

    let mut reader = Dispatcher::new();
    reader.open_vault(&line).unwrap();
    let mut fresh = Scope::new();
    reader
        .vault("from notes import note", &mut fresh, &mut Collector::new())
        .unwrap();
    assert_eq!(
        fresh.lookup("note").and_then(|b| b.as_value().cloned()),
        Some(Value::from("remember the milk"))
    );

    let mut locked = Dispatcher::new();
    locked
        .open_vault(&format!("-p '{}' -s False", vault_path(&dir)))
        .unwrap();
    let err = locked
        .vault("from notes import note", &mut Scope::new(), &mut Collector::new())
        .unwrap_err();
    assert!(err.to_string().contains("password required"), "{}", err);
}

#[test]
fn secure_vault_without_key_warns() {
    let dir = tempfile::tempdir().unwrap();
    let mut dispatcher = Dispatcher::new();
    let session = dispatcher
        .open_vault(&format!("-p '{}'", vault_path(&dir)))
        .unwrap();
    assert_eq!(session.warnings(), [NO_ENCRYPTION_WARNING.to_string()]);
}

#[test]
fn settings_file_then_open_vault_line() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join(CONFIG_FILE_NAME);
    std::fs::write(
        &file,
        format!(
            "path = '{}'\nsecure = false\ntimestamp = false\n",
            vault_path(&dir)
        ),
    )
    .unwrap();

    let base = VaultSettings::from_toml_file(&file).unwrap();
    let mut dispatcher = Dispatcher::with_settings(base);
    dispatcher.open_vault("-t True").unwrap();

    let mut sink = Collector::new();
    dispatcher
        .vault("store note in notes", &mut scope(), &mut sink)
        .unwrap();
    assert_eq!(sink.stamps.len(), 1);
    assert!(std::path::Path::new(&vault_path(&dir)).exists());
}

#[test]
fn dispatchers_do_not_share_sessions() {
    let mut first = Fixture::new();
    let mut second = Fixture::new();
    first.run("store note in notes").unwrap();

    assert!(second.run("from notes import note as n").is_err());
    assert!(first.run("from notes import note as n").is_ok());
}

#[test]
fn metadata_log_collects_json_lines() {
    let mut f = Fixture::new();
    let log_path = f.dir.path().join("metadata.jsonl");
    let mut log = MetadataLog::new(&log_path);

    let mut sinks = Fanout::new(vec![&mut f.sink as &mut dyn Sink, &mut log]);
    f.dispatcher
        .vault("store frame in frames", &mut f.scope, &mut sinks)
        .unwrap();
    f.dispatcher
        .vault("del frame from frames", &mut f.scope, &mut sinks)
        .unwrap();
    drop(sinks);

    let records = log.read_all().unwrap();
    let actions: Vec<_> = records.iter().map(|r| r.action.as_str()).collect();
    assert_eq!(actions, vec!["store", "del"]);
    assert_eq!(f.sink.records, records);

    let raw = std::fs::read_to_string(&log_path).unwrap();
    let first: serde_json::Value = serde_json::from_str(raw.lines().next().unwrap()).unwrap();
    assert_eq!(first["command"], "store frame in frames");
    assert!(first["result"][0]["new_file"]["crc32"].is_string());
}
