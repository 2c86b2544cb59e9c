//! Token classification.
//!
//! Every command-line token is classified on its own, without looking at its
//! neighbours. The parser loop in [`super::parse_args`] interprets the class,
//! consuming a following token only when an option asks for its value.

use super::args::OptionTable;
use super::catalog::{OptionCatalogs, split_value};
use crate::common::UsageError;

/// Where an emulator option gets its value from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionValue {
    /// The option is a flag.
    Flag,
    /// Given in the same token (`--seed=3`, `-s3`, `+max-cycles=3`).
    Inline(String),
    /// The next command-line token is the value (`--seed 3`, `-s 3`).
    FromNext,
}

/// One emulator option occurrence, named by its long form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionUse {
    /// Long option name without dashes.
    pub long: String,
    /// Value source.
    pub value: OptionValue,
}

impl OptionUse {
    fn new(long: impl Into<String>, value: OptionValue) -> Self {
        Self {
            long: long.into(),
            value,
        }
    }

    /// Returns `true` if this is `--help`.
    pub fn is_help(&self) -> bool {
        self.long == "help"
    }
}

/// The class of a single command-line token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenClass {
    /// One or more emulator options (several for a short cluster like `-cV`).
    Emulator(Vec<OptionUse>),
    /// A plus-arg destined for the design.
    PlusArg {
        /// Plus-arg name.
        name: String,
        /// Text after `=`, if any.
        value: Option<String>,
    },
    /// A host-interface option: local processing stops here.
    HostInterface,
    /// The first positional token (the target binary): local processing stops here.
    Binary,
    /// A bare `--`: local processing stops and the next token is the binary.
    EndOfOptions,
    /// The token cannot be accepted.
    Error(UsageError),
}

/// Legacy plus spellings of emulator options.
const LEGACY_FLAGS: &[(&str, &str)] = &[("+verbose", "verbose"), ("+cycle-count", "cycle-count")];

/// Legacy plus spellings that carry a value after `=`.
#[cfg(feature = "vcd")]
const LEGACY_VALUED: &[(&str, &str)] =
    &[("+max-cycles=", "max-cycles"), ("+dump-start=", "dump-start")];

#[cfg(not(feature = "vcd"))]
const LEGACY_VALUED: &[(&str, &str)] = &[("+max-cycles=", "max-cycles")];

/// Everything the classifier consults.
#[derive(Debug, Clone)]
pub(crate) struct Classifier<'a> {
    table: OptionTable,
    catalogs: &'a OptionCatalogs,
}

impl<'a> Classifier<'a> {
    pub fn new(catalogs: &'a OptionCatalogs) -> Self {
        Self {
            table: OptionTable::from_command(),
            catalogs,
        }
    }

    /// Classifies `token`.
    pub fn classify(&self, token: &str) -> TokenClass {
        if token == "--" {
            return TokenClass::EndOfOptions;
        }
        if let Some(long) = token.strip_prefix("--") {
            return self.classify_long(token, long);
        }
        if let Some(plus) = token.strip_prefix('+') {
            return self.classify_plus(token, plus);
        }
        match token.strip_prefix('-') {
            Some(cluster) if !cluster.is_empty() => self.classify_short(cluster),
            _ => TokenClass::Binary,
        }
    }

    fn classify_long(&self, token: &str, body: &str) -> TokenClass {
        let (name, inline) = split_value(body);
        match self.table.by_long(name) {
            Some(row) => match (row.takes_value, inline) {
                (true, Some(v)) => emulator(name, OptionValue::Inline(v.to_string())),
                (true, None) => emulator(name, OptionValue::FromNext),
                (false, None) => emulator(name, OptionValue::Flag),
                (false, Some(_)) => {
                    TokenClass::Error(UsageError::UnexpectedValue(name.to_string()))
                }
            },
            None if self.catalogs.host.contains(name) => TokenClass::HostInterface,
            None => TokenClass::Error(UsageError::UnknownOption(token.to_string())),
        }
    }

    fn classify_short(&self, cluster: &str) -> TokenClass {
        let mut uses = Vec::new();
        for (offset, ch) in cluster.char_indices() {
            let Some(row) = self.table.by_short(ch) else {
                return TokenClass::Error(UsageError::UnknownOption(format!("-{ch}")));
            };
            if row.takes_value {
                let rest = &cluster[offset + ch.len_utf8()..];
                let value = if rest.is_empty() {
                    OptionValue::FromNext
                } else {
                    OptionValue::Inline(rest.to_string())
                };
                uses.push(OptionUse::new(row.long.clone(), value));
                break;
            }
            uses.push(OptionUse::new(row.long.clone(), OptionValue::Flag));
        }
        TokenClass::Emulator(uses)
    }

    fn classify_plus(&self, token: &str, body: &str) -> TokenClass {
        if let Some((_, long)) = LEGACY_FLAGS.iter().find(|(spelling, _)| *spelling == token) {
            return emulator(long, OptionValue::Flag);
        }
        for (prefix, long) in LEGACY_VALUED {
            if let Some(value) = token.strip_prefix(*prefix) {
                return emulator(long, OptionValue::Inline(value.to_string()));
            }
        }

        let (name, value) = split_value(body);
        let plusarg = || TokenClass::PlusArg {
            name: name.to_string(),
            value: value.map(str::to_string),
        };
        if self.catalogs.plusargs.declares(name) {
            return plusarg();
        }
        if self.catalogs.host.contains(name) {
            return TokenClass::HostInterface;
        }
        if self.catalogs.plusargs.is_permissive() && !name.is_empty() {
            return plusarg();
        }
        TokenClass::Error(UsageError::InvalidPlusArg(token.to_string()))
    }
}

fn emulator(long: &str, value: OptionValue) -> TokenClass {
    TokenClass::Emulator(vec![OptionUse::new(long, value)])
}
