//! Keyword signatures and concordance scoring.
//!
//! A [`Syntax`] declares which keywords one command shape requires, which
//! it accepts, and which it rejects. Scoring gives every keyword of a rule
//! set half a point for being present and another half for passing its
//! validator; the ratio of points to keywords ranks competing shapes.

use std::cmp::Ordering;
use std::fmt;

use vault_core::Namespace;

use crate::parse::Arguments;
use crate::validators::Validator;
use crate::{Error, Result};

/// `(keyword, validator)` pairs of one rule set
pub type Rules = &'static [(&'static str, Validator)];

/// Keyword signature of one command shape
#[derive(Debug, Clone, Copy)]
pub struct Syntax {
    /// Keywords that must be present and valid
    pub required: Rules,
    /// Keywords that must be valid if present
    pub optional: Rules,
    /// Keywords that must not be present, with the reason shown to the user
    pub disallowed: &'static [(&'static str, &'static str)],
}

/// How well arguments match one rule set
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Concordance {
    /// Half points earned
    half_points: usize,
    /// Keywords in the rule set
    size: usize,
    /// `("<keyword> <<validator>>", explanation)` per shortfall
    pub misses: Vec<(String, String)>,
}

impl Concordance {
    /// Earned fraction of the attainable score, 0 for an empty rule set
    pub fn ratio(&self) -> f64 {
        if self.size == 0 {
            0.0
        } else {
            self.half_points as f64 / (2 * self.size) as f64
        }
    }

    /// Every keyword present and valid (never true for an empty rule set)
    pub fn is_complete(&self) -> bool {
        self.size > 0 && self.half_points == 2 * self.size
    }

    /// Exact ratio comparison (cross-multiplied, no rounding)
    pub fn cmp_ratio(&self, other: &Concordance) -> Ordering {
        let lhs = self.half_points * other.size.max(1);
        let rhs = other.half_points * self.size.max(1);
        lhs.cmp(&rhs)
    }

    /// `'<key>': <explanation>` per miss, comma separated
    pub fn diff(&self) -> String {
        self.misses
            .iter()
            .map(|(key, explanation)| format!("'{}': {}", key, explanation))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    /// Validator errors become misses
    Probe,
    /// Validator errors and rejections propagate
    Strict,
}

impl Syntax {
    /// Score the required keywords, recording validator errors as misses
    pub fn probe(&self, arguments: &Arguments, namespace: &dyn Namespace) -> Concordance {
        // Probe mode never returns an error.
        score(self.required, arguments, namespace, Mode::Probe).unwrap_or_default()
    }

    /// Full check: required keywords complete, optional keywords well formed,
    /// no disallowed keyword present.
    ///
    /// # Errors
    ///
    /// The first validator error, a `Validation` error naming a rejected
    /// value or the missing keywords, or the reason of a disallowed keyword.
    pub fn validate(&self, arguments: &Arguments, namespace: &dyn Namespace) -> Result<()> {
        let required = score(self.required, arguments, namespace, Mode::Strict)?;
        if !required.is_complete() {
            return Err(Error::validation(format!(
                "incomplete command: {}",
                required.diff()
            )));
        }

        score(self.optional, arguments, namespace, Mode::Strict)?;

        for (keyword, reason) in self.disallowed {
            if arguments.contains_key(*keyword) {
                return Err(Error::validation(*reason));
            }
        }
        Ok(())
    }

    /// Main keyword, i.e. the first required one
    pub fn keyword(&self) -> &'static str {
        self.required.first().map(|(k, _)| *k).unwrap_or_default()
    }
}

fn score(
    rules: Rules,
    arguments: &Arguments,
    namespace: &dyn Namespace,
    mode: Mode,
) -> Result<Concordance> {
    let mut concordance = Concordance {
        size: rules.len(),
        ..Concordance::default()
    };

    for (keyword, validator) in rules {
        let key = format!("{} <{}>", keyword, validator);
        let Some(value) = arguments.get(*keyword) else {
            concordance.misses.push((key, "is missing".to_string()));
            continue;
        };
        concordance.half_points += 1;

        match validator.check(value, namespace) {
            Ok(true) => concordance.half_points += 1,
            Ok(false) if mode == Mode::Strict => {
                return Err(Error::validation(format!(
                    "'{}': not a {}",
                    key, validator
                )));
            }
            Ok(false) => concordance
                .misses
                .push((key, format!("not a {}", validator))),
            Err(e) if mode == Mode::Strict => return Err(e),
            Err(e) => concordance.misses.push((key, e.to_string())),
        }
    }
    Ok(concordance)
}

fn write_rules(f: &mut fmt::Formatter<'_>, rules: Rules) -> fmt::Result {
    let text = rules
        .iter()
        .map(|(keyword, validator)| format!("{} <{}>", keyword, validator))
        .collect::<Vec<_>>()
        .join(" ");
    f.write_str(&text)
}

impl fmt::Display for Syntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_rules(f, self.required)?;
        f.write_str(" [")?;
        write_rules(f, self.optional)?;
        f.write_str("]")
    }
}
