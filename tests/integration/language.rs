//! The command language seen from outside.

use crate::common::*;
use datavault::parse::{extract_arguments, tokenize, unquote};

#[test]
fn comma_lists_are_one_token() {
    assert_eq!(
        tokenize("from module import a, b, c").unwrap(),
        vec!["from", "module", "import", "a,b,c"]
    );
}

#[test]
fn quoted_paths_keep_their_quotes() {
    let tokens = tokenize(r#"store x in 'data/a, b/it\'s' # trailing"#).unwrap();
    assert_eq!(tokens, vec!["store", "x", "in", r#"'data/a, b/it\'s'"#]);
    assert_eq!(unquote(&tokens[3]).unwrap(), "data/a, b/it's");
}

#[test]
fn hash_inside_quotes_is_not_a_comment() {
    let tokens = tokenize("del 'notes/#1' # gone").unwrap();
    assert_eq!(tokens, vec!["del", "'notes/#1'"]);
}

#[test]
fn dashed_keys_are_stripped() {
    let arguments = extract_arguments(tokenize("--path a.vault -s False").unwrap()).unwrap();
    assert_eq!(arguments.get("path").map(String::as_str), Some("a.vault"));
    assert_eq!(arguments.get("s").map(String::as_str), Some("False"));
}

#[test]
fn extra_keywords_do_not_block_a_match() {
    let mut f = Fixture::new();
    let stored = f.run("store note in notes because why_not").unwrap();
    assert_eq!(stored.result[0].subject, "note");
}

#[test]
fn odd_token_count_is_malformed() {
    let mut f = Fixture::new();
    assert!(matches!(
        f.run("import note from").unwrap_err(),
        Error::MalformedCommand { .. }
    ));
}

#[test]
fn suggestions_are_deterministic() {
    let mut f = Fixture::new();
    let first = f.run("store ghost").unwrap_err().to_string();
    let second = f.run("store ghost").unwrap_err().to_string();
    assert_eq!(first, second);
}

#[test]
fn suggestions_rank_closest_first() {
    let mut f = Fixture::new();
    let err = f.run("store note with json.dumps").unwrap_err();
    let message = err.to_string();
    assert!(matches!(err, Error::NoHandlerMatched { .. }), "{}", message);

    let first = message
        .lines()
        .nth(1)
        .unwrap_or_default()
        .trim_start_matches("\t - ");
    assert!(
        first.starts_with("store <one_or_many_variables> in <module>"),
        "{}",
        message
    );
    assert!(message.contains("'in <module>': is missing"));
}

#[test]
fn help_lists_every_action() {
    let dispatcher = Dispatcher::new();
    let help = dispatcher.help(None).unwrap();
    for action in Action::ALL {
        assert!(help.contains(&format!("# {}", action.main_keyword())));
    }
}
