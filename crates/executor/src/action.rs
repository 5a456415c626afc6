//! Actions and their ranked handler tables.
//!
//! Every action (`store`, `import`, `del`, `assert`) lists its command
//! shapes from the most specific to the most general. The first shape whose
//! required keywords are all present and valid wins; when none does, the
//! closest shapes are suggested together with what is wrong for each.

use tracing::debug;

use vault_core::{Namespace, ResultRecord};

use crate::handlers::{self, Context};
use crate::metadata::Metadata;
use crate::parse::Arguments;
use crate::syntax::{Concordance, Syntax};
use crate::validators::Validator;
use crate::{Error, Result};

/// Number of suggestions in a "did you mean" message
pub const SUGGESTIONS: usize = 3;

/// Concrete command shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Handler {
    /// `store <variable> in <folder> as <name>`
    StoreInModuleAs,
    /// `store <variables> in <folder>`
    StoreInModule,
    /// `store <variable> in '<path>'`
    StoreInPath,
    /// `from <folder> import <name> as <alias>`
    FromModuleImportAs,
    /// `from <folder> import <names>`
    FromModuleImport,
    /// `import '<path>' as <name>`
    ImportPathAs,
    /// `import <folder> [as <name>]`
    ImportModule,
    /// `del <name> from <folder>`
    DeleteVariable,
    /// `del '<path>'`
    DeletePath,
    /// `assert <variable> in <folder> is <hash>`
    AssertVariableHash,
    /// `assert '<path>' is <hash>`
    AssertPathHash,
}

impl Handler {
    /// Snake-case name used in logs
    pub fn name(&self) -> &'static str {
        match self {
            Handler::StoreInModuleAs => "store_in_module_as",
            Handler::StoreInModule => "store_in_module",
            Handler::StoreInPath => "store_in_path",
            Handler::FromModuleImportAs => "from_module_import_as",
            Handler::FromModuleImport => "from_module_import",
            Handler::ImportPathAs => "import_path_as",
            Handler::ImportModule => "import_module",
            Handler::DeleteVariable => "delete_variable",
            Handler::DeletePath => "delete_path",
            Handler::AssertVariableHash => "assert_variable_hash",
            Handler::AssertPathHash => "assert_path_hash",
        }
    }

    /// Run against validated arguments
    pub fn run(&self, ctx: &mut Context<'_>, arguments: &Arguments) -> Result<Vec<ResultRecord>> {
        match self {
            Handler::StoreInModuleAs => handlers::store::store_in_module_as(ctx, arguments),
            Handler::StoreInModule => handlers::store::store_in_module(ctx, arguments),
            Handler::StoreInPath => handlers::store::store_in_path(ctx, arguments),
            Handler::FromModuleImportAs => handlers::import::from_module_import_as(ctx, arguments),
            Handler::FromModuleImport => handlers::import::from_module_import(ctx, arguments),
            Handler::ImportPathAs => handlers::import::import_path_as(ctx, arguments),
            Handler::ImportModule => handlers::import::import_module(ctx, arguments),
            Handler::DeleteVariable => handlers::delete::delete_variable(ctx, arguments),
            Handler::DeletePath => handlers::delete::delete_path(ctx, arguments),
            Handler::AssertVariableHash => handlers::assert::assert_variable_hash(ctx, arguments),
            Handler::AssertPathHash => handlers::assert::assert_path_hash(ctx, arguments),
        }
    }
}

/// One entry of a handler table
#[derive(Debug, Clone, Copy)]
pub struct Candidate {
    /// What runs when this shape is chosen
    pub handler: Handler,
    /// The shape itself
    pub syntax: Syntax,
}

// =============================================================================
// Handler tables
// =============================================================================

const STORE_HANDLERS: &[Candidate] = &[
    Candidate {
        handler: Handler::StoreInModuleAs,
        syntax: Syntax {
            required: &[
                ("store", Validator::OneOrManyVariables),
                ("in", Validator::Module),
                ("as", Validator::ValidId),
            ],
            optional: &[("with", Validator::Function)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::StoreInModule,
        syntax: Syntax {
            required: &[
                ("store", Validator::OneOrManyVariables),
                ("in", Validator::Module),
            ],
            optional: &[("with", Validator::Function), ("as", Validator::ValidId)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::StoreInPath,
        syntax: Syntax {
            required: &[("store", Validator::OneVariable), ("in", Validator::Path)],
            optional: &[("with", Validator::Function)],
            disallowed: &[(
                "as",
                "\"as\" is not allowed for storing in path (it would be redundant as the path \
                 already specifies the target). If you wanted to point to a module in the \
                 archive, remove the quotes around the path.",
            )],
        },
    },
];

const IMPORT_HANDLERS: &[Candidate] = &[
    Candidate {
        handler: Handler::FromModuleImportAs,
        syntax: Syntax {
            required: &[
                ("import", Validator::ValidId),
                ("from", Validator::Module),
                ("as", Validator::ValidId),
            ],
            optional: &[("with", Validator::Function)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::FromModuleImport,
        syntax: Syntax {
            required: &[
                ("import", Validator::OneOrManyValidIds),
                ("from", Validator::Module),
            ],
            optional: &[("with", Validator::Function), ("as", Validator::ValidId)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::ImportPathAs,
        syntax: Syntax {
            required: &[("import", Validator::Path), ("as", Validator::ValidId)],
            optional: &[("with", Validator::Function)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::ImportModule,
        syntax: Syntax {
            required: &[("import", Validator::Module)],
            optional: &[("as", Validator::ValidId)],
            disallowed: &[(
                "with",
                "\"with\" not allowed for module import; to change the loading function for \
                 variables in the module, use module.set_importers({variable: function})",
            )],
        },
    },
];

const DELETE_HANDLERS: &[Candidate] = &[
    Candidate {
        handler: Handler::DeleteVariable,
        syntax: Syntax {
            required: &[("del", Validator::ValidId), ("from", Validator::Module)],
            optional: &[],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::DeletePath,
        syntax: Syntax {
            required: &[("del", Validator::Path)],
            optional: &[],
            disallowed: &[],
        },
    },
];

const ASSERT_HANDLERS: &[Candidate] = &[
    Candidate {
        handler: Handler::AssertVariableHash,
        syntax: Syntax {
            required: &[
                ("assert", Validator::OneVariable),
                ("in", Validator::Module),
                ("is", Validator::Hash),
            ],
            optional: &[("with", Validator::HashMethod)],
            disallowed: &[],
        },
    },
    Candidate {
        handler: Handler::AssertPathHash,
        syntax: Syntax {
            required: &[("assert", Validator::Path), ("is", Validator::Hash)],
            optional: &[("with", Validator::HashMethod)],
            disallowed: &[],
        },
    },
];

// =============================================================================
// Actions
// =============================================================================

/// The four kinds of vault operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    /// Write variables into the vault
    Store,
    /// Read members into the namespace
    Import,
    /// Remove members
    Delete,
    /// Verify a member's checksum
    Assert,
}

impl Action {
    /// Every action, in dispatch order
    pub const ALL: [Action; 4] = [Action::Store, Action::Import, Action::Delete, Action::Assert];

    /// Keyword identifying the action in a command
    pub fn main_keyword(&self) -> &'static str {
        match self {
            Action::Store => "store",
            Action::Import => "import",
            Action::Delete => "del",
            Action::Assert => "assert",
        }
    }

    /// Past tense used in stamps
    pub fn verb(&self) -> &'static str {
        match self {
            Action::Store => "stored",
            Action::Import => "imported",
            Action::Delete => "deleted",
            Action::Assert => "verified",
        }
    }

    /// Command shapes, most specific first
    pub fn handlers(&self) -> &'static [Candidate] {
        match self {
            Action::Store => STORE_HANDLERS,
            Action::Import => IMPORT_HANDLERS,
            Action::Delete => DELETE_HANDLERS,
            Action::Assert => ASSERT_HANDLERS,
        }
    }

    /// First candidate whose required keywords are all present and valid
    pub fn choose_handler(
        &self,
        arguments: &Arguments,
        namespace: &dyn Namespace,
    ) -> Option<&'static Candidate> {
        self.handlers()
            .iter()
            .find(|c| c.syntax.probe(arguments, namespace).is_complete())
    }

    /// Up to `n` candidates by descending required concordance, ties in
    /// declaration order
    pub fn closest(
        &self,
        arguments: &Arguments,
        namespace: &dyn Namespace,
        n: usize,
    ) -> Vec<(&'static Candidate, Concordance)> {
        let mut scored: Vec<_> = self
            .handlers()
            .iter()
            .map(|c| (c, c.syntax.probe(arguments, namespace)))
            .collect();
        // stable: equal ratios keep declaration order
        scored.sort_by(|(_, a), (_, b)| b.cmp_ratio(a));
        scored.truncate(n);
        scored
    }

    /// Listing of the closest shapes, each followed by its misses when
    /// arguments were given
    pub fn syntax_help(
        &self,
        arguments: &Arguments,
        namespace: &dyn Namespace,
        n: Option<usize>,
    ) -> String {
        let n = n.unwrap_or(usize::MAX);
        self.closest(arguments, namespace, n)
            .iter()
            .map(|(candidate, concordance)| {
                if arguments.is_empty() {
                    format!("\n\t - {}", candidate.syntax)
                } else {
                    format!("\n\t - {}\n\t\t> {}", candidate.syntax, concordance.diff())
                }
            })
            .collect()
    }

    /// `# <keyword>` followed by every shape of the action
    pub fn explain(&self) -> String {
        let mut text = format!("# {}", self.main_keyword());
        for candidate in self.handlers() {
            text.push_str(&format!("\n\t - {}", candidate.syntax));
        }
        text
    }

    /// Choose a handler, validate the arguments against it and run it.
    ///
    /// # Errors
    ///
    /// `NoHandlerMatched` with ranked suggestions when no shape fits. If the
    /// closest shape has all of its required keywords, the error of its
    /// strict validation is returned instead, so that a single bad value is
    /// reported as such.
    pub fn perform(&self, arguments: &Arguments, ctx: &mut Context<'_>) -> Result<Metadata> {
        let Some(candidate) = self.choose_handler(arguments, &*ctx.namespace) else {
            return Err(self.no_match(arguments, &*ctx.namespace));
        };
        debug!(
            action = self.main_keyword(),
            handler = candidate.handler.name(),
            "Chose handler"
        );

        candidate.syntax.validate(arguments, &*ctx.namespace)?;
        let result = candidate.handler.run(ctx, arguments)?;
        Ok(Metadata::new(self.main_keyword(), result))
    }

    fn no_match(&self, arguments: &Arguments, namespace: &dyn Namespace) -> Error {
        let closest = self.closest(arguments, namespace, 1);
        if let Some((candidate, _)) = closest.first() {
            let complete_keywords = candidate
                .syntax
                .required
                .iter()
                .all(|(keyword, _)| arguments.contains_key(*keyword));
            if complete_keywords {
                if let Err(e) = candidate.syntax.validate(arguments, namespace) {
                    return e;
                }
            }
        }
        Error::NoHandlerMatched {
            action: self.main_keyword().to_string(),
            suggestions: self.syntax_help(arguments, namespace, Some(SUGGESTIONS)),
        }
    }

    /// One-line (or bulleted) summary of a finished command
    pub fn short_stamp(&self, metadata: &Metadata) -> String {
        let results: Vec<String> = metadata.result.iter().map(describe_record).collect();
        let many = results.len() > 1;

        let mut verb = self.verb().to_string();
        if let Some(first) = verb.get_mut(0..1) {
            first.make_ascii_uppercase();
        }

        format!(
            "{}{}{}{}at {}",
            verb,
            if many { ":\n\n - " } else { " " },
            results.join("\n - "),
            if many { "\n\n" } else { " " },
            metadata.finished_human_readable.as_deref().unwrap_or_default()
        )
    }

    /// Action whose main keyword is `keyword`
    pub fn from_keyword(keyword: &str) -> Option<Action> {
        Action::ALL
            .into_iter()
            .find(|action| action.main_keyword() == keyword)
    }
}

/// `` `subject` (old → new) ``, without parentheses when no checksum is known
fn describe_record(record: &ResultRecord) -> String {
    let digests: Vec<&str> = [&record.old_file, &record.new_file]
        .into_iter()
        .flatten()
        .filter_map(|sums| sums.short())
        .collect();
    if digests.is_empty() {
        format!("`{}`", record.subject)
    } else {
        format!("`{}` ({})", record.subject, digests.join(" → "))
    }
}
