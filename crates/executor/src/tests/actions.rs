//! Store, import and delete through the dispatcher.

use vault_core::{Binding, Namespace, Value};

use super::{frame_x, Harness};
use crate::Error;

// =============================================================================
// Store / Import
// =============================================================================

#[test]
fn test_store_then_import_round_trips() {
    let mut h = Harness::new();

    let stored = h.run("store x in my_frames").unwrap();
    assert_eq!(stored.action, "store");
    assert_eq!(stored.result.len(), 1);
    assert_eq!(stored.result[0].subject, "x");
    assert!(stored.result[0].old_file.is_none());

    let imported = h.run("from my_frames import x as x_copy").unwrap();
    assert_eq!(imported.action, "import");
    assert_eq!(imported.result[0].subject, "x_copy");
    assert_eq!(imported.result[0].new_file, stored.result[0].new_file);
    assert_eq!(h.value("x_copy"), Some(frame_x()));
}

#[test]
fn test_store_and_import_several() {
    let mut h = Harness::new();

    let stored = h.run("store x, y in batch").unwrap();
    let subjects: Vec<_> = stored.result.iter().map(|r| r.subject.as_str()).collect();
    assert_eq!(subjects, vec!["x", "y"]);

    h.scope.remove("x");
    h.scope.remove("y");
    let imported = h.run("from batch import x, y").unwrap();
    assert_eq!(imported.result.len(), 2);
    assert_eq!(h.value("x"), Some(frame_x()));
    assert_eq!(h.value("y"), Some(Value::from("text")));
}

#[test]
fn test_repeated_variable_is_stored_once() {
    let mut h = Harness::new();
    let stored = h.run("store x, x in batch").unwrap();
    assert_eq!(stored.result.len(), 1);
}

#[test]
fn test_store_as_renames_member() {
    let mut h = Harness::new();
    h.run("store x in frames as renamed").unwrap();

    h.run("from frames import renamed").unwrap();
    assert_eq!(h.value("renamed"), Some(frame_x()));
}

#[test]
fn test_store_several_with_as_is_rejected() {
    let mut h = Harness::new();
    let err = h.run("store x, y in frames as z").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {:?}", err);
}

#[test]
fn test_import_several_with_as_is_rejected() {
    let mut h = Harness::new();
    let err = h.run("from frames import a, b as c").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {:?}", err);
}

#[test]
fn test_store_in_path_and_import_path() {
    let mut h = Harness::new();
    h.run("store y in 'notes/y.json'").unwrap();

    let imported = h.run("import 'notes/y.json' as z").unwrap();
    assert_eq!(imported.result[0].subject, "z");
    assert_eq!(h.value("z"), Some(Value::from("text")));
}

#[test]
fn test_store_in_path_disallows_as() {
    let mut h = Harness::new();
    let err = h.run("store x in 'a/b' as c").unwrap_err();
    assert!(err
        .to_string()
        .starts_with("\"as\" is not allowed for storing in path"));
}

#[test]
fn test_overwrite_reports_previous_checksums() {
    let mut h = Harness::new();
    let first = h.run("store y in notes").unwrap();

    h.scope.assign("y", Value::from("changed").into());
    let second = h.run("store y in notes").unwrap();
    assert_eq!(second.result[0].old_file, first.result[0].new_file);
    assert_ne!(second.result[0].new_file, first.result[0].new_file);
}

// =============================================================================
// Functions
// =============================================================================

#[test]
fn test_custom_exporter_and_importer() {
    let mut h = Harness::new();
    h.run("store y in raw with json.dumps").unwrap();

    h.run("from raw import y as raw_text with text").unwrap();
    assert_eq!(h.value("raw_text"), Some(Value::from("\"text\"")));
}

#[test]
fn test_unknown_function_is_reported() {
    let mut h = Harness::new();
    let err = h
        .run("store x in my_frames with pipe_delimited")
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "function 'pipe_delimited' is not defined in the global namespace"
    );
}

#[test]
fn test_value_is_not_a_function() {
    let mut h = Harness::new();
    let err = h.run("store x in my_frames with y").unwrap_err();
    assert!(matches!(err, Error::NotCallable { ref name } if name == "y"));
}

#[test]
fn test_importer_cannot_export() {
    let mut h = Harness::new();
    let err = h.run("store y in raw with json.loads").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }), "got {:?}", err);
}

#[test]
fn test_modules_cannot_be_stored() {
    let mut h = Harness::new();
    let err = h.run("store json in raw").unwrap_err();
    assert_eq!(
        err.to_string(),
        "'json' is a module, only values can be stored"
    );
}

// =============================================================================
// Suggestions
// =============================================================================

#[test]
fn test_undefined_variable_is_listed_in_suggestions() {
    let mut h = Harness::new();
    let err = h.run("store missing_var").unwrap_err();
    let message = err.to_string();

    assert!(matches!(err, Error::NoHandlerMatched { .. }));
    assert!(message.starts_with(
        "No command matched. Did you mean:\
         \n\t - store <one_or_many_variables> in <module> [with <function> as <valid_id>]\
         \n\t\t> 'store <one_or_many_variables>': variable 'missing_var' is not defined in the global namespace, \
         'in <module>': is missing"
    ));
    // three suggestions
    assert_eq!(message.matches("\n\t - ").count(), 3);
}

// =============================================================================
// Delete
// =============================================================================

#[test]
fn test_delete_then_import_is_not_found() {
    let mut h = Harness::new();
    let stored = h.run("store x in f").unwrap();

    let deleted = h.run("del x from f").unwrap();
    assert_eq!(deleted.action, "del");
    assert_eq!(deleted.result[0].subject, "f/x");
    assert_eq!(deleted.result[0].old_file, stored.result[0].new_file);

    let err = h.run("from f import x as again").unwrap_err();
    assert_eq!(err.to_string(), "There is no item named 'f/x' in the archive");
}

#[test]
fn test_delete_does_not_need_the_variable() {
    let mut h = Harness::new();
    h.run("store x in f").unwrap();
    h.scope.remove("x");

    assert!(h.run("del x from f").is_ok());
    assert!(h.run("del 'f/x'").is_err());
}

#[test]
fn test_delete_by_path() {
    let mut h = Harness::new();
    h.run("store y in 'a/b/y'").unwrap();
    let deleted = h.run("del 'a/b/y'").unwrap();
    assert_eq!(deleted.result[0].subject, "a/b/y");
}

#[test]
fn test_delete_rejects_wildcards() {
    let mut h = Harness::new();
    h.run("store x in f").unwrap();
    let err = h.run("del 'f/*'").unwrap_err();
    assert!(matches!(err, Error::Validation { .. }));
    assert!(h.run("from f import x as still_there").is_ok());
}

#[test]
fn test_import_binds_values_not_functions() {
    let mut h = Harness::new();
    h.run("store y in f").unwrap();
    h.run("from f import y as loaded").unwrap();
    assert!(matches!(h.scope.lookup("loaded"), Some(Binding::Value(_))));
}
