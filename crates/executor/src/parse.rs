//! Tokenizing and pairing command lines.
//!
//! A command line is a flat sequence of `keyword value` pairs:
//!
//! ```text
//! store x, y in my_frames with json.dumps   # comment
//! ```
//!
//! - Whitespace separates tokens, except right after a comma, so
//!   `x, y` stays one token (`x,y`)
//! - `'...'` and `"..."` spans are one token, quotes included; a quote
//!   preceded by a backslash does not close the span
//! - `#` outside quotes drops the rest of the line

use std::collections::BTreeMap;

use crate::{Error, Result};

/// Keyword (without leading dashes) to raw value
pub type Arguments = BTreeMap<String, String>;

/// Split one command line into tokens.
///
/// # Errors
///
/// `MalformedCommand` if a quote opens in the middle of a token or is never
/// closed.
pub fn tokenize(line: &str) -> Result<Vec<String>> {
    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;

    for c in line.trim().chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q && prev != Some('\\') {
                    quote = None;
                    pieces.push(std::mem::take(&mut current));
                }
            }
            None => {
                if c == '"' || c == '\'' {
                    if !current.is_empty() {
                        return Err(Error::malformed(format!(
                            "quote {} must start a new token (after '{}')",
                            c, current
                        )));
                    }
                    current.push(c);
                    quote = Some(c);
                } else if c.is_whitespace() {
                    if !current.is_empty() && !current.ends_with(',') {
                        pieces.push(std::mem::take(&mut current));
                    }
                } else if c == '#' {
                    break;
                } else {
                    current.push(c);
                }
            }
        }
        prev = Some(c);
    }

    if let Some(q) = quote {
        return Err(Error::malformed(format!("unterminated {} quote", q)));
    }
    if !current.is_empty() {
        pieces.push(current);
    }
    Ok(pieces)
}

/// Pair tokens as `key value`, stripping leading dashes from keys.
///
/// A repeated key keeps its last value.
///
/// # Errors
///
/// `MalformedCommand` if the last key has no value.
pub fn extract_arguments(tokens: Vec<String>) -> Result<Arguments> {
    let mut arguments = Arguments::new();
    let mut tokens = tokens.into_iter();
    while let Some(key) = tokens.next() {
        let value = tokens
            .next()
            .ok_or_else(|| Error::malformed(format!("keyword '{}' has no value", key)))?;
        arguments.insert(key.trim_start_matches('-').to_string(), value);
    }
    Ok(arguments)
}

/// `tokenize` followed by `extract_arguments`
pub fn parse_line(line: &str) -> Result<Arguments> {
    extract_arguments(tokenize(line)?)
}

/// Strip matching surrounding quotes and unescape the quote character.
///
/// Unquoted text is returned unchanged.
///
/// # Errors
///
/// `MalformedCommand` if the opening quote is not matched at the end.
pub fn unquote(text: &str) -> Result<String> {
    for q in ['"', '\''] {
        if let Some(rest) = text.strip_prefix(q) {
            let inner = rest
                .strip_suffix(q)
                .ok_or_else(|| Error::malformed(format!("unbalanced quotes in {}", text)))?;
            return Ok(inner.replace(&format!("\\{}", q), &q.to_string()));
        }
    }
    Ok(text.to_string())
}

/// Split a comma-joined list, trimming each element.
///
/// # Errors
///
/// `Validation` for the `*` wildcard, which is never expanded.
pub fn split_variables(variables: &str) -> Result<Vec<String>> {
    let names: Vec<String> = variables.split(',').map(|v| v.trim().to_string()).collect();
    if names.iter().any(|v| v == "*") {
        return Err(Error::validation(
            "wildcard '*' is not supported, list the names explicitly",
        ));
    }
    if names.is_empty() {
        return Err(Error::validation("at least one name is required"));
    }
    Ok(names)
}

/// Whether `text` is an identifier: a letter or `_`, then letters, digits or `_`
pub fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) if first.is_alphabetic() || first == '_' => {
            chars.all(|c| c.is_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

/// `True`/`False` as booleans, anything else as text
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoolOrStr {
    /// `True` or `False`
    Bool(bool),
    /// Any other value
    Str(String),
}

/// Interpret a settings value
pub fn bool_or_str(value: &str) -> BoolOrStr {
    match value {
        "True" => BoolOrStr::Bool(true),
        "False" => BoolOrStr::Bool(false),
        other => BoolOrStr::Str(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(line: &str) -> Vec<String> {
        tokenize(line).unwrap()
    }

    #[test]
    fn test_commas_are_elastic() {
        assert_eq!(
            tokens("from module import a, b, c"),
            vec!["from", "module", "import", "a,b,c"]
        );
    }

    #[test]
    fn test_quoted_path_is_one_token() {
        assert_eq!(
            tokens("import 'my dir/a, b.tsv' as x"),
            vec!["import", "'my dir/a, b.tsv'", "as", "x"]
        );
    }

    #[test]
    fn test_escaped_quote_round_trip() {
        let toks = tokens(r#"del "say \"hi\"""#);
        assert_eq!(toks, vec!["del", r#""say \"hi\"""#]);
        assert_eq!(unquote(&toks[1]).unwrap(), r#"say "hi""#);
    }

    #[test]
    fn test_comment_is_dropped() {
        assert_eq!(
            tokens("store x in my_frames  # keep for later"),
            vec!["store", "x", "in", "my_frames"]
        );
        assert_eq!(tokens("# only a comment"), Vec::<String>::new());
    }

    #[test]
    fn test_hash_inside_quotes_is_kept() {
        assert_eq!(
            tokens("del 'data/#1' # real comment"),
            vec!["del", "'data/#1'"]
        );
    }

    #[test]
    fn test_whitespace_runs_collapse() {
        assert_eq!(tokens("  store   x\tin  f  "), vec!["store", "x", "in", "f"]);
    }

    #[test]
    fn test_closing_quote_ends_token() {
        assert_eq!(tokens("'a'b"), vec!["'a'", "b"]);
    }

    #[test]
    fn test_mid_token_quote_is_malformed() {
        assert!(matches!(
            tokenize("store x'y"),
            Err(Error::MalformedCommand { .. })
        ));
    }

    #[test]
    fn test_unterminated_quote_is_malformed() {
        assert!(matches!(
            tokenize("import 'abc as x"),
            Err(Error::MalformedCommand { .. })
        ));
    }

    #[test]
    fn test_extract_pairs_and_strips_dashes() {
        let args = parse_line("--path a.vault -e KEY").unwrap();
        assert_eq!(args.get("path").map(String::as_str), Some("a.vault"));
        assert_eq!(args.get("e").map(String::as_str), Some("KEY"));
    }

    #[test]
    fn test_extract_odd_tokens_is_malformed() {
        let err = parse_line("store x in").unwrap_err();
        assert!(matches!(err, Error::MalformedCommand { .. }));
        assert!(err.to_string().contains("'in'"));
    }

    #[test]
    fn test_unquote_variants() {
        assert_eq!(unquote("plain").unwrap(), "plain");
        assert_eq!(unquote("'a/b'").unwrap(), "a/b");
        assert_eq!(unquote(r"'it\'s'").unwrap(), "it's");
        assert!(unquote("'open").is_err());
    }

    #[test]
    fn test_split_variables() {
        assert_eq!(split_variables("a, b ,c").unwrap(), vec!["a", "b", "c"]);
        assert_eq!(split_variables("a").unwrap(), vec!["a"]);
        assert!(matches!(
            split_variables("a,*"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_identifiers() {
        assert!(is_identifier("x"));
        assert!(is_identifier("_private2"));
        assert!(is_identifier("données"));
        assert!(!is_identifier(""));
        assert!(!is_identifier("1x"));
        assert!(!is_identifier("a-b"));
        assert!(!is_identifier("a.b"));
    }

    #[test]
    fn test_bool_or_str() {
        assert_eq!(bool_or_str("True"), BoolOrStr::Bool(true));
        assert_eq!(bool_or_str("False"), BoolOrStr::Bool(false));
        assert_eq!(bool_or_str("true"), BoolOrStr::Str("true".to_string()));
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn test_plain_words_tokenize_to_themselves(
                words in prop::collection::vec("[a-z_][a-z0-9_./]{0,8}", 0..10)
            ) {
                let line = words.join(" ");
                prop_assert_eq!(tokenize(&line).unwrap(), words);
            }

            #[test]
            fn test_even_token_counts_always_pair(
                pairs in prop::collection::vec(("[a-z]{1,6}", "[a-z0-9]{1,6}"), 0..8)
            ) {
                let line = pairs
                    .iter()
                    .map(|(k, v)| format!("--{} {}", k, v))
                    .collect::<Vec<_>>()
                    .join(" ");
                let args = parse_line(&line).unwrap();
                for (k, _) in &pairs {
                    // the last occurrence of a repeated key wins
                    let last = pairs.iter().rev().find(|(key, _)| key == k).map(|(_, v)| v);
                    prop_assert_eq!(args.get(k), last);
                }
            }
        }
    }
}
