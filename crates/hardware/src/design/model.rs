//! Design instance reached through the library ABI.

use std::ffi::{CStr, c_void};
use std::ptr::NonNull;
use std::sync::Arc;

use libloading::Library;

use super::ffi::{CArgs, DesignApi};
use crate::common::SessionError;
use crate::sim::state::time_stamp_callback;
use crate::sim::{ClockedModel, CycleCounter, SignalInfo};

/// A design instance created by `rtlemu_model_new`.
#[derive(Debug)]
pub struct LibraryModel {
    handle: NonNull<c_void>,
    api: DesignApi,
    _args: CArgs,
    _cycles: CycleCounter,
    _library: Arc<Library>,
}

impl LibraryModel {
    pub(crate) fn new(
        library: Arc<Library>,
        api: DesignApi,
        argv: &[String],
        cycles: CycleCounter,
    ) -> Result<Self, SessionError> {
        let args = CArgs::new(argv)?;
        // SAFETY: argv and the counter context outlive the handle; both are
        // stored alongside it and released after `model_delete`.
        let raw = unsafe {
            (api.model_new)(
                args.argc(),
                args.argv(),
                time_stamp_callback,
                cycles.as_context(),
            )
        };
        let handle = NonNull::new(raw).ok_or(SessionError::NullHandle("design model"))?;
        Ok(Self {
            handle,
            api,
            _args: args,
            _cycles: cycles,
            _library: library,
        })
    }

    fn ptr(&self) -> *mut c_void {
        self.handle.as_ptr()
    }
}

impl ClockedModel for LibraryModel {
    fn set_reset(&mut self, level: bool) {
        // SAFETY: `handle` is live until drop.
        unsafe { (self.api.set_reset)(self.ptr(), u8::from(level)) };
    }

    fn set_clock(&mut self, level: bool) {
        // SAFETY: as above.
        unsafe { (self.api.set_clock)(self.ptr(), u8::from(level)) };
    }

    fn eval(&mut self) {
        // SAFETY: as above.
        unsafe { (self.api.eval)(self.ptr()) };
    }

    fn set_printf_enable(&mut self, enabled: bool) {
        if let Some(set) = self.api.set_printf_enable {
            // SAFETY: as above.
            unsafe { set(self.ptr(), u8::from(enabled)) };
        }
    }

    fn set_rbb_port(&mut self, port: u16) -> bool {
        let Some(set) = self.api.set_rbb_port else {
            return false;
        };
        // SAFETY: as above.
        unsafe { set(self.ptr(), port) };
        true
    }

    fn signals(&self) -> Vec<SignalInfo> {
        let Some(api) = self.api.signals else {
            return Vec::new();
        };
        // SAFETY: indices stay below the reported count; names are NUL
        // terminated strings owned by the design.
        unsafe {
            (0..(api.count)(self.ptr()))
                .map(|index| {
                    let name = (api.name)(self.ptr(), index);
                    let name = if name.is_null() {
                        format!("signal{index}")
                    } else {
                        CStr::from_ptr(name).to_string_lossy().into_owned()
                    };
                    SignalInfo::new(name, (api.width)(self.ptr(), index))
                })
                .collect()
        }
    }

    fn sample(&self, index: usize) -> u64 {
        match self.api.signals {
            // SAFETY: as above.
            Some(api) => unsafe { (api.value)(self.ptr(), index) },
            None => 0,
        }
    }
}

impl Drop for LibraryModel {
    fn drop(&mut self) {
        // SAFETY: the handle came from `model_new` and is deleted once.
        unsafe { (self.api.model_delete)(self.ptr()) };
    }
}
