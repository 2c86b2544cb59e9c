//! Option catalogs supplied by the collaborators.
//!
//! The emulator does not own every option on its command line. The debug
//! transport (host interface) and the design itself each accept options the
//! driver has to recognize by name without interpreting them:
//! 1. **Host catalog:** names that end local option processing.
//! 2. **Plus-arg catalog:** names the design reads through `$test$plusargs` / `$value$plusargs`.

/// A single host-interface option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOption {
    /// Long name without any prefix (`signature` for `--signature` / `+signature`).
    pub name: &'static str,
    /// `true` if `--name VALUE` consumes the following token.
    pub takes_value: bool,
    /// Value placeholder shown in the usage text.
    pub value_name: Option<&'static str>,
    /// One-line description for the usage text.
    pub help: &'static str,
}

impl HostOption {
    const fn flag(name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            takes_value: false,
            value_name: None,
            help,
        }
    }

    const fn valued(name: &'static str, value_name: &'static str, help: &'static str) -> Self {
        Self {
            name,
            takes_value: true,
            value_name: Some(value_name),
            help,
        }
    }
}

/// Long options recognized by the host-interface front end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostOptionCatalog {
    options: Vec<HostOption>,
}

impl HostOptionCatalog {
    /// Creates a catalog from an explicit option list.
    pub const fn new(options: Vec<HostOption>) -> Self {
        Self { options }
    }

    /// Returns the catalog of the stock front-end server.
    pub fn fesvr() -> Self {
        Self::new(vec![
            HostOption {
                name: "rfb",
                takes_value: false,
                value_name: Some("DISPLAY"),
                help: "Add new remote frame buffer on display DISPLAY (port 5900 + DISPLAY)",
            },
            HostOption::valued("disk", "PATH", "Add PATH as a block device image"),
            HostOption::valued("signature", "FILE", "Write torture test signature to FILE"),
            HostOption::valued(
                "signature-granularity",
                "VAL",
                "Size of each line in the signature",
            ),
            HostOption::valued(
                "chroot",
                "PATH",
                "Use PATH as location of syscall-servicing binaries",
            ),
            HostOption::valued("payload", "PATH", "Load PATH memory as an additional ELF payload"),
            HostOption::valued("target-argument", "ARG", "Pass ARG to the target program"),
            HostOption::flag("permissive", "Ignore unparsable options up until +permissive-off"),
            HostOption::flag("permissive-off", "Stop ignoring unparsable options"),
        ])
    }

    /// Returns every option in declaration order.
    pub fn options(&self) -> &[HostOption] {
        &self.options
    }

    /// Looks up an option by its exact long name.
    pub fn get(&self, name: &str) -> Option<&HostOption> {
        self.options.iter().find(|opt| opt.name == name)
    }

    /// Returns `true` if `name` is a host-interface option.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Finds the first token of `tokens` that is neither a host option nor the
    /// value of one, i.e. the target binary.
    pub fn binary_index(&self, tokens: &[String]) -> Option<usize> {
        let mut index = 0;
        while let Some(token) = tokens.get(index) {
            if let Some(rest) = token.strip_prefix("--") {
                let (name, inline) = split_value(rest);
                let consumes_next =
                    inline.is_none() && self.get(name).is_some_and(|o| o.takes_value);
                index += if consumes_next { 2 } else { 1 };
                continue;
            }
            if token.starts_with('+') || (token.starts_with('-') && token.len() > 1) {
                index += 1;
                continue;
            }
            return Some(index);
        }
        None
    }
}

impl Default for HostOptionCatalog {
    fn default() -> Self {
        Self::fesvr()
    }
}

/// Plus-args the compiled design understands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PlusArgCatalog {
    /// The design did not publish its plus-args; accept any `+name[=value]`.
    #[default]
    Permissive,
    /// Only these names are legal design plus-args.
    Declared(Vec<String>),
}

impl PlusArgCatalog {
    /// Creates a strict catalog from the given names.
    pub fn declared<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::Declared(names.into_iter().map(Into::into).collect())
    }

    /// Returns `true` if `name` was explicitly declared by the design.
    pub fn declares(&self, name: &str) -> bool {
        match self {
            Self::Permissive => false,
            Self::Declared(names) => names.iter().any(|n| n == name),
        }
    }

    /// Returns `true` if unmatched plus-args should still be accepted.
    pub const fn is_permissive(&self) -> bool {
        matches!(self, Self::Permissive)
    }
}

/// Both catalogs consulted while classifying a command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionCatalogs {
    /// Host-interface options.
    pub host: HostOptionCatalog,
    /// Design plus-args.
    pub plusargs: PlusArgCatalog,
}

/// Splits `name=value` at the first `=`.
pub(crate) fn split_value(token: &str) -> (&str, Option<&str>) {
    match token.split_once('=') {
        Some((name, value)) => (name, Some(value)),
        None => (token, None),
    }
}
