//! A loaded analysis entry point.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use libloading::{Library, Symbol};

use super::abi::{AnalyzeFn, RawElement};
use super::AnalysisKind;
use crate::error::{PhyError, Result};

/// The native engine: an entry point plus the library that keeps it alive.
///
/// Shared read-only between sessions. Calls may be serialized through the
/// engine's own lock for engines that are not reentrant.
pub struct NativeEngine {
    path: Option<PathBuf>,
    entry: AnalyzeFn,
    call_lock: Mutex<()>,
    // Dropped last: `entry` points into this library.
    _library: Option<Library>,
}

impl NativeEngine {
    /// Load a dynamic library and look up its entry point.
    ///
    /// Both a load failure and a missing symbol are reported as
    /// [`PhyError::LibraryNotAvailable`] with a `LoadFailed` reason.
    pub fn load(path: &Path, symbol: &str) -> Result<Self> {
        // SAFETY: loading runs the library's initialisers. The resolver only
        // loads files the caller or the environment points at.
        let library = unsafe { Library::new(path) }
            .map_err(|e| PhyError::library_load_failed(path, e.to_string()))?;

        // SAFETY: the symbol is declared by the call contract to have the
        // `AnalyzeFn` signature. The pointer is kept next to `library`.
        let entry: AnalyzeFn = unsafe {
            let sym: Symbol<AnalyzeFn> = library
                .get(symbol.as_bytes())
                .map_err(|e| PhyError::library_load_failed(path, format!("missing symbol '{}': {}", symbol, e)))?;
            *sym
        };

        Ok(Self {
            path: Some(path.to_path_buf()),
            entry,
            call_lock: Mutex::new(()),
            _library: Some(library),
        })
    }

    /// Wrap an entry point that lives in the current process.
    pub fn from_entry(entry: AnalyzeFn) -> Self {
        Self {
            path: None,
            entry,
            call_lock: Mutex::new(()),
            _library: None,
        }
    }

    /// Path the engine was loaded from, if it came from a file.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Invoke the entry point.
    ///
    /// `voltages` must hold exactly one slot per electrical node and every
    /// record's pointers must stay valid for the duration of the call.
    pub(crate) fn invoke(
        &self,
        analysis: AnalysisKind,
        elements: &[RawElement],
        voltages: &mut [f64],
        serialize: bool,
    ) -> i32 {
        let _guard = serialize.then(|| self.call_lock.lock().unwrap_or_else(PoisonError::into_inner));

        // SAFETY: all buffers are borrowed for the whole call and the engine
        // does not retain them after returning.
        unsafe {
            (self.entry)(
                analysis.wire_tag().as_ptr(),
                voltages.len(),
                elements.as_ptr(),
                elements.len(),
                voltages.as_mut_ptr(),
            )
        }
    }
}

impl fmt::Debug for NativeEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeEngine")
            .field("path", &self.path)
            .field("in_process", &self._library.is_none())
            .finish()
    }
}
