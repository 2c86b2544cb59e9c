//! Arguments handed to the host-interface component.

use super::catalog::HostOptionCatalog;
use crate::common::UsageError;

/// The argument vector for the debug session.
///
/// Element 0 is the emulator's invocation name. The rest are the tokens from
/// the point where local option processing stopped, unchanged and in order:
/// optional host options, then the target binary, then the target's own
/// arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidualArgs {
    argv: Vec<String>,
    binary: usize,
}

impl ResidualArgs {
    /// Builds the residual vector, skipping host options to find the binary.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::NoBinary`] if no target binary is present.
    pub fn new(
        program: &str,
        tokens: Vec<String>,
        host: &HostOptionCatalog,
    ) -> Result<Self, UsageError> {
        let binary = host.binary_index(&tokens).ok_or(UsageError::NoBinary)?;
        Ok(Self::assemble(program, tokens, binary))
    }

    /// Builds the residual vector from the tokens after a bare `--`.
    ///
    /// The first token is the binary whatever it looks like.
    ///
    /// # Errors
    ///
    /// Returns [`UsageError::NoBinary`] if nothing follows the `--`.
    pub fn after_end_of_options(program: &str, tokens: Vec<String>) -> Result<Self, UsageError> {
        if tokens.is_empty() {
            return Err(UsageError::NoBinary);
        }
        Ok(Self::assemble(program, tokens, 0))
    }

    fn assemble(program: &str, tokens: Vec<String>, binary: usize) -> Self {
        let mut argv = Vec::with_capacity(tokens.len() + 1);
        argv.push(program.to_string());
        argv.extend(tokens);
        Self {
            argv,
            binary: binary + 1,
        }
    }

    /// Returns the emulator's invocation name.
    pub fn program(&self) -> &str {
        &self.argv[0]
    }

    /// Returns the target binary path.
    pub fn binary(&self) -> &str {
        &self.argv[self.binary]
    }

    /// Returns host-interface options that preceded the binary.
    pub fn host_options(&self) -> &[String] {
        &self.argv[1..self.binary]
    }

    /// Returns the arguments passed to the target binary.
    pub fn target_args(&self) -> &[String] {
        &self.argv[self.binary + 1..]
    }

    /// Returns the full vector, program name included.
    pub fn as_slice(&self) -> &[String] {
        &self.argv
    }
}
