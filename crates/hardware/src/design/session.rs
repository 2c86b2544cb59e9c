//! Debug transport reached through the library ABI.

use std::ffi::c_void;
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::Library;

use super::ffi::{CArgs, DesignApi};
use crate::common::SessionError;
use crate::options::ResidualArgs;
use crate::sim::DebugSession;

/// A debug-transport session created by `rtlemu_dtm_new`.
#[derive(Debug)]
pub struct LibraryDebugSession {
    handle: NonNull<c_void>,
    api: DesignApi,
    _args: CArgs,
    _library: Arc<Library>,
}

impl LibraryDebugSession {
    pub(crate) fn new(
        library: Arc<Library>,
        api: DesignApi,
        residual: &ResidualArgs,
    ) -> Result<Self, SessionError> {
        let args = CArgs::new(residual.as_slice())?;
        // SAFETY: the argument vector is stored next to the handle.
        let raw = unsafe { (api.dtm_new)(args.argc(), args.argv()) };
        let handle = NonNull::new(raw).ok_or(SessionError::NullHandle("debug session"))?;
        Ok(Self {
            handle,
            api,
            _args: args,
            _library: library,
        })
    }
}

impl DebugSession for LibraryDebugSession {
    fn is_done(&self) -> bool {
        // SAFETY: `handle` is live until drop.
        unsafe { (self.api.dtm_done)(self.handle.as_ptr()) != 0 }
    }

    fn exit_code(&self) -> i32 {
        // SAFETY: as above.
        unsafe { (self.api.dtm_exit_code)(self.handle.as_ptr()) }
    }

    fn request_stop(&mut self) {
        // SAFETY: as above.
        unsafe { (self.api.dtm_stop)(self.handle.as_ptr()) };
    }
}

impl Drop for LibraryDebugSession {
    fn drop(&mut self) {
        // SAFETY: the handle came from `dtm_new` and is deleted once.
        unsafe { (self.api.dtm_delete)(self.handle.as_ptr()) };
    }
}
