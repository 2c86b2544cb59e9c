//! C ABI of a compiled design library.

use std::ffi::{CString, c_char, c_int, c_void};

use libloading::Library;
use tracing::debug;

use crate::common::SessionError;

/// Time-stamp callback handed to the design.
pub(crate) type TimeStampFn = unsafe extern "C" fn(*const c_void) -> f64;

type ModelNewFn =
    unsafe extern "C" fn(c_int, *const *const c_char, TimeStampFn, *const c_void) -> *mut c_void;
type DtmNewFn = unsafe extern "C" fn(c_int, *const *const c_char) -> *mut c_void;
type HandleFn = unsafe extern "C" fn(*mut c_void);
type SetBitFn = unsafe extern "C" fn(*mut c_void, u8);
type SetPortFn = unsafe extern "C" fn(*mut c_void, u16);
type QueryFn = unsafe extern "C" fn(*mut c_void) -> c_int;
type SignalCountFn = unsafe extern "C" fn(*mut c_void) -> usize;
type SignalNameFn = unsafe extern "C" fn(*mut c_void, usize) -> *const c_char;
type SignalWidthFn = unsafe extern "C" fn(*mut c_void, usize) -> u32;
type SignalValueFn = unsafe extern "C" fn(*mut c_void, usize) -> u64;

/// Signal catalog entry points; present only if all four are exported.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SignalApi {
    pub count: SignalCountFn,
    pub name: SignalNameFn,
    pub width: SignalWidthFn,
    pub value: SignalValueFn,
}

/// Resolved entry points of a design library.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DesignApi {
    pub model_new: ModelNewFn,
    pub model_delete: HandleFn,
    pub set_reset: SetBitFn,
    pub set_clock: SetBitFn,
    pub eval: HandleFn,
    pub dtm_new: DtmNewFn,
    pub dtm_done: QueryFn,
    pub dtm_exit_code: QueryFn,
    pub dtm_stop: HandleFn,
    pub dtm_delete: HandleFn,
    pub set_printf_enable: Option<SetBitFn>,
    pub set_rbb_port: Option<SetPortFn>,
    pub signals: Option<SignalApi>,
}

impl DesignApi {
    /// Resolves every entry point from `lib`.
    ///
    /// # Safety
    ///
    /// `lib` must export the symbols with the signatures declared above.
    pub unsafe fn load(lib: &Library) -> Result<Self, SessionError> {
        // SAFETY: forwarded to the caller.
        unsafe {
            let signals = match (
                optional_symbol(lib, "rtlemu_model_signal_count"),
                optional_symbol(lib, "rtlemu_model_signal_name"),
                optional_symbol(lib, "rtlemu_model_signal_width"),
                optional_symbol(lib, "rtlemu_model_signal_value"),
            ) {
                (Some(count), Some(name), Some(width), Some(value)) => Some(SignalApi {
                    count,
                    name,
                    width,
                    value,
                }),
                _ => None,
            };
            Ok(Self {
                model_new: load_symbol(lib, "rtlemu_model_new")?,
                model_delete: load_symbol(lib, "rtlemu_model_delete")?,
                set_reset: load_symbol(lib, "rtlemu_model_set_reset")?,
                set_clock: load_symbol(lib, "rtlemu_model_set_clock")?,
                eval: load_symbol(lib, "rtlemu_model_eval")?,
                dtm_new: load_symbol(lib, "rtlemu_dtm_new")?,
                dtm_done: load_symbol(lib, "rtlemu_dtm_done")?,
                dtm_exit_code: load_symbol(lib, "rtlemu_dtm_exit_code")?,
                dtm_stop: load_symbol(lib, "rtlemu_dtm_stop")?,
                dtm_delete: load_symbol(lib, "rtlemu_dtm_delete")?,
                set_printf_enable: optional_symbol(lib, "rtlemu_model_set_printf_enable"),
                set_rbb_port: optional_symbol(lib, "rtlemu_model_set_rbb_port"),
                signals,
            })
        }
    }
}

unsafe fn load_symbol<T: Copy>(lib: &Library, symbol: &'static str) -> Result<T, SessionError> {
    // SAFETY: the caller vouches for the symbol's type.
    let sym: libloading::Symbol<'_, T> = unsafe { lib.get(symbol.as_bytes()) }
        .map_err(|source| SessionError::MissingSymbol { symbol, source })?;
    Ok(*sym)
}

unsafe fn optional_symbol<T: Copy>(lib: &Library, symbol: &'static str) -> Option<T> {
    // SAFETY: the caller vouches for the symbol's type.
    match unsafe { lib.get::<T>(symbol.as_bytes()) } {
        Ok(sym) => Some(*sym),
        Err(err) => {
            debug!(symbol, %err, "optional design symbol not exported");
            None
        }
    }
}

/// An argv converted for the C ABI.
///
/// Keeps the strings alive for as long as the pointer array is in use.
#[derive(Debug)]
pub(crate) struct CArgs {
    _strings: Vec<CString>,
    pointers: Vec<*const c_char>,
}

impl CArgs {
    pub fn new(args: &[String]) -> Result<Self, SessionError> {
        let strings = args
            .iter()
            .map(|arg| CString::new(arg.as_bytes()))
            .collect::<Result<Vec<_>, _>>()?;
        let mut pointers: Vec<*const c_char> = strings.iter().map(|s| s.as_ptr()).collect();
        pointers.push(std::ptr::null());
        Ok(Self {
            _strings: strings,
            pointers,
        })
    }

    pub fn argc(&self) -> c_int {
        (self.pointers.len() - 1) as c_int
    }

    pub fn argv(&self) -> *const *const c_char {
        self.pointers.as_ptr()
    }
}
