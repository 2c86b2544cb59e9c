//! Compiled designs loaded from shared libraries.
//!
//! The emulator binary is not rebuilt for each design. A design library
//! exports a small C ABI (`rtlemu_model_*` for the design, `rtlemu_dtm_*` for
//! its debug transport) and is opened at run time with `libloading`.
//! Optional entry points (printf gating, bit-bang port, signal catalog) are
//! resolved when present and ignored otherwise.

mod ffi;
/// Design instance.
pub mod model;
/// Debug transport session.
pub mod session;

use std::path::Path;
use std::sync::Arc;

use libloading::Library;
use tracing::{debug, info};

use crate::common::SessionError;
use crate::common::constants::MODEL_ENV_VAR;
use crate::config::RunConfig;
use crate::options::ResidualArgs;
use crate::sim::{Backend, CycleCounter};
use ffi::DesignApi;
pub use model::LibraryModel;
pub use session::LibraryDebugSession;

/// [`Backend`] that instantiates collaborators from a design library.
#[derive(Debug)]
pub struct LibraryBackend {
    library: Arc<Library>,
    api: DesignApi,
}

impl LibraryBackend {
    /// Opens the library at `path` and resolves its entry points.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::LibraryLoad`] if the library cannot be opened and
    /// [`SessionError::MissingSymbol`] if a required entry point is absent.
    pub fn open(path: &Path) -> Result<Self, SessionError> {
        // SAFETY: loading runs the library's initializers; design libraries
        // are trusted build artifacts.
        let library = unsafe { Library::new(path) }.map_err(|source| SessionError::LibraryLoad {
            path: path.to_path_buf(),
            source,
        })?;
        // SAFETY: the symbols are declared with the documented C signatures.
        let api = unsafe { DesignApi::load(&library) }?;
        info!(path = %path.display(), "design library loaded");
        debug!(
            printf_gate = api.set_printf_enable.is_some(),
            rbb_port = api.set_rbb_port.is_some(),
            signals = api.signals.is_some(),
            "optional design entry points"
        );
        Ok(Self {
            library: Arc::new(library),
            api,
        })
    }

    /// Opens the library named by `config.model_library`.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoModel`] if no library was configured, or any
    /// error from [`LibraryBackend::open`].
    pub fn from_config(config: &RunConfig) -> Result<Self, SessionError> {
        let path = config
            .model_library
            .as_deref()
            .ok_or(SessionError::NoModel { var: MODEL_ENV_VAR })?;
        Self::open(path)
    }
}

impl Backend for LibraryBackend {
    type Model = LibraryModel;
    type Session = LibraryDebugSession;

    fn create_model(
        &mut self,
        _config: &RunConfig,
        argv: &[String],
        cycles: CycleCounter,
    ) -> Result<Self::Model, SessionError> {
        let model = LibraryModel::new(Arc::clone(&self.library), self.api, argv, cycles)?;
        debug!(argc = argv.len(), "design model constructed");
        Ok(model)
    }

    fn create_session(
        &mut self,
        _config: &RunConfig,
        args: &ResidualArgs,
    ) -> Result<Self::Session, SessionError> {
        LibraryDebugSession::new(Arc::clone(&self.library), self.api, args)
    }
}
