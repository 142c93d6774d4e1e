//! Native library discovery and loading.
//!
//! Resolution order, first match wins:
//!
//! 1. an explicit path supplied with the request
//! 2. the path named by the first set environment variable (by default
//!    `PHYENGINE_LIB`, then `PHYSICSLAB_PHYENGINE_LIB`)
//! 3. the platform search directories, in order; the first directory that
//!    holds the library file wins
//!
//! An explicit path or environment value that names a missing file is an
//! error, not a fall-through. A successful resolution is cached until
//! [`LibraryResolver::reset`].

use std::env;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use log::{debug, info, warn};

use super::abi::ENTRY_SYMBOL;
use super::NativeEngine;
use crate::error::{PhyError, Result};

/// Environment variable naming the library file.
pub const DEFAULT_ENV_VAR: &str = "PHYENGINE_LIB";

/// Older name of [`DEFAULT_ENV_VAR`], still honoured after it.
pub const LEGACY_ENV_VAR: &str = "PHYSICSLAB_PHYENGINE_LIB";

/// Base name of the library (`libphyengine.so`, `phyengine.dll`, ...).
pub const DEFAULT_LIBRARY_NAME: &str = "phyengine";

/// Anything that can hand out an engine for a request.
///
/// [`LibraryResolver`] is the production implementation; an
/// `Arc<NativeEngine>` serves a fixed, already loaded engine.
pub trait EngineSource {
    /// Produce the engine, honouring `explicit` where the source allows it.
    fn engine(&self, explicit: Option<&Path>) -> Result<Arc<NativeEngine>>;
}

impl EngineSource for Arc<NativeEngine> {
    fn engine(&self, _explicit: Option<&Path>) -> Result<Arc<NativeEngine>> {
        Ok(Arc::clone(self))
    }
}

/// Platform default directories searched for the library.
pub fn default_search_dirs() -> Vec<PathBuf> {
    let mut dirs = Vec::new();

    if let Some(dir) = env::current_exe().ok().as_deref().and_then(Path::parent) {
        dirs.push(dir.to_path_buf());
    }
    if let Ok(cwd) = env::current_dir() {
        dirs.push(cwd);
    }

    #[cfg(target_os = "macos")]
    {
        dirs.push(PathBuf::from("/usr/local/lib"));
        dirs.push(PathBuf::from("/opt/homebrew/lib"));
    }

    #[cfg(all(unix, not(target_os = "macos")))]
    {
        dirs.push(PathBuf::from("/usr/local/lib"));
        dirs.push(PathBuf::from("/usr/lib"));
    }

    #[cfg(windows)]
    {
        if let Some(program_files) = env::var_os("ProgramFiles") {
            dirs.push(PathBuf::from(program_files).join("PhyEngine"));
        }
    }

    dirs
}

/// Configuration for the library resolver.
#[derive(Debug, Clone)]
pub struct ResolverConfig {
    /// Environment variables consulted, in order, when no explicit path is
    /// given.
    pub env_vars: Vec<String>,
    /// Library base name, decorated per platform.
    pub library_name: String,
    /// Directories searched, in order, as the last resort.
    pub search_paths: Vec<PathBuf>,
    /// Entry point looked up after loading.
    pub entry_symbol: String,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            env_vars: vec![DEFAULT_ENV_VAR.to_string(), LEGACY_ENV_VAR.to_string()],
            library_name: DEFAULT_LIBRARY_NAME.to_string(),
            search_paths: default_search_dirs(),
            entry_symbol: ENTRY_SYMBOL.to_string(),
        }
    }
}

impl ResolverConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Consult only this environment variable.
    pub fn with_env_var(mut self, env_var: impl Into<String>) -> Self {
        self.env_vars = vec![env_var.into()];
        self
    }

    /// Replace the environment variables consulted.
    pub fn with_env_vars(mut self, env_vars: Vec<String>) -> Self {
        self.env_vars = env_vars;
        self
    }

    /// Set the library base name.
    pub fn with_library_name(mut self, name: impl Into<String>) -> Self {
        self.library_name = name.into();
        self
    }

    /// Replace the search directories.
    pub fn with_search_paths(mut self, paths: Vec<PathBuf>) -> Self {
        self.search_paths = paths;
        self
    }

    /// Set the entry point symbol.
    pub fn with_entry_symbol(mut self, symbol: impl Into<String>) -> Self {
        self.entry_symbol = symbol.into();
        self
    }

    /// Platform file name of the library.
    pub fn library_file_name(&self) -> PathBuf {
        PathBuf::from(libloading::library_filename(&self.library_name))
    }
}

enum ResolverState {
    Unresolved,
    Resolved(Arc<NativeEngine>),
}

/// Locates and loads the native engine, once.
///
/// Owned by the host and passed by reference into every session. Resolution
/// happens under a lock, so concurrent first callers trigger a single load
/// and later callers observe the cached engine.
pub struct LibraryResolver {
    config: ResolverConfig,
    state: Mutex<ResolverState>,
}

impl Default for LibraryResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl LibraryResolver {
    /// Create a resolver with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    /// Create a resolver with a custom configuration.
    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            config,
            state: Mutex::new(ResolverState::Unresolved),
        }
    }

    /// The resolver's configuration.
    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Find the library file without loading it or touching the cache.
    pub fn locate(&self, explicit: Option<&Path>) -> Result<PathBuf> {
        self.locate_with(explicit, |var| env::var_os(var))
    }

    fn locate_with(&self, explicit: Option<&Path>, lookup: impl Fn(&str) -> Option<OsString>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            debug!("library candidate (explicit): {}", path.display());
            return existing(path);
        }

        for var in &self.config.env_vars {
            if let Some(value) = lookup(var).filter(|v| !v.is_empty()) {
                let path = PathBuf::from(value);
                debug!("library candidate (${}): {}", var, path.display());
                return existing(&path);
            }
        }

        let file_name = self.config.library_file_name();
        let mut searched = Vec::with_capacity(self.config.search_paths.len());
        for dir in &self.config.search_paths {
            let candidate = dir.join(&file_name);
            debug!("library candidate (search path): {}", candidate.display());
            if candidate.is_file() {
                return Ok(candidate);
            }
            searched.push(candidate);
        }
        Err(PhyError::library_not_found(searched))
    }

    /// Locate, load and cache the engine.
    ///
    /// Once resolved, later calls return the cached engine and ignore
    /// `explicit`. A failed attempt leaves the resolver unresolved.
    pub fn resolve(&self, explicit: Option<&Path>) -> Result<Arc<NativeEngine>> {
        let mut state = self.lock();

        if let ResolverState::Resolved(engine) = &*state {
            if let Some(path) = explicit.filter(|p| engine.path() != Some(*p)) {
                warn!(
                    "library override {} ignored: engine already resolved from {}",
                    path.display(),
                    engine.path().map(|p| p.display().to_string()).unwrap_or_else(|| "<in-process>".to_string())
                );
            }
            return Ok(Arc::clone(engine));
        }

        let path = self.locate(explicit)?;
        let engine = Arc::new(NativeEngine::load(&path, &self.config.entry_symbol)?);
        info!("loaded native analysis engine from {}", path.display());
        *state = ResolverState::Resolved(Arc::clone(&engine));
        Ok(engine)
    }

    /// Seed the cache with an already constructed engine.
    pub fn install(&self, engine: NativeEngine) -> Arc<NativeEngine> {
        let engine = Arc::new(engine);
        *self.lock() = ResolverState::Resolved(Arc::clone(&engine));
        engine
    }

    /// Forget the cached engine; the next request resolves again.
    pub fn reset(&self) {
        *self.lock() = ResolverState::Unresolved;
    }

    /// Whether an engine is cached.
    pub fn is_resolved(&self) -> bool {
        matches!(*self.lock(), ResolverState::Resolved(_))
    }

    /// Path of the cached engine, if it was loaded from a file.
    pub fn resolved_path(&self) -> Option<PathBuf> {
        match &*self.lock() {
            ResolverState::Resolved(engine) => engine.path().map(Path::to_path_buf),
            ResolverState::Unresolved => None,
        }
    }

    fn lock(&self) -> MutexGuard<'_, ResolverState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl EngineSource for LibraryResolver {
    fn engine(&self, explicit: Option<&Path>) -> Result<Arc<NativeEngine>> {
        self.resolve(explicit)
    }
}

fn existing(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        Ok(path.to_path_buf())
    } else {
        Err(PhyError::library_not_found(vec![path.to_path_buf()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Unavailable;
    use crate::solver::phyengine_analyze;
    use std::fs;
    use tempfile::TempDir;

    /// A resolver limited to one variable and the given directories.
    fn isolated(var: &str, dirs: Vec<PathBuf>) -> LibraryResolver {
        LibraryResolver::with_config(ResolverConfig::new().with_env_var(var).with_search_paths(dirs))
    }

    fn touch(dir: &TempDir, name: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, b"stub").unwrap();
        path
    }

    fn lib_name() -> String {
        ResolverConfig::new().library_file_name().to_string_lossy().into_owned()
    }

    /// Environment lookup backed by a fixed table instead of the process env.
    fn vars(pairs: &[(&str, &Path)]) -> impl Fn(&str) -> Option<OsString> {
        let table: Vec<(String, OsString)> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.as_os_str().to_os_string()))
            .collect();
        move |var| table.iter().find(|(k, _)| k == var).map(|(_, v)| v.clone())
    }

    #[test]
    fn test_explicit_beats_env() {
        let dir = TempDir::new().unwrap();
        let explicit = touch(&dir, "explicit.so");
        let from_env = touch(&dir, "env.so");
        let lookup = vars(&[("PHYENGINE_LIB", &from_env)]);

        let resolver = isolated("PHYENGINE_LIB", Vec::new());
        assert_eq!(resolver.locate_with(Some(&explicit), &lookup).unwrap(), explicit);
        assert_eq!(resolver.locate_with(None, &lookup).unwrap(), from_env);
    }

    #[test]
    fn test_env_beats_search_paths() {
        let dir = TempDir::new().unwrap();
        let default = touch(&dir, &lib_name());
        let other = TempDir::new().unwrap();
        let from_env = touch(&other, "custom.so");

        let resolver = isolated("PHYENGINE_LIB", vec![dir.path().to_path_buf()]);
        assert_eq!(resolver.locate_with(None, vars(&[])).unwrap(), default);
        assert_eq!(resolver.locate_with(None, vars(&[("PHYENGINE_LIB", &from_env)])).unwrap(), from_env);
    }

    #[test]
    fn test_empty_env_is_ignored() {
        let dir = TempDir::new().unwrap();
        let default = touch(&dir, &lib_name());

        let resolver = isolated("PHYENGINE_LIB", vec![dir.path().to_path_buf()]);
        let lookup = vars(&[("PHYENGINE_LIB", Path::new(""))]);
        assert_eq!(resolver.locate_with(None, lookup).unwrap(), default);
    }

    #[test]
    fn test_legacy_env_var_is_honoured() {
        let dir = TempDir::new().unwrap();
        let current = touch(&dir, "current.so");
        let legacy = touch(&dir, "legacy.so");
        let resolver = LibraryResolver::with_config(ResolverConfig::new().with_search_paths(Vec::new()));
        assert_eq!(resolver.config().env_vars, vec![DEFAULT_ENV_VAR, LEGACY_ENV_VAR]);

        let only_legacy = vars(&[(LEGACY_ENV_VAR, &legacy)]);
        assert_eq!(resolver.locate_with(None, only_legacy).unwrap(), legacy);

        let both = vars(&[(LEGACY_ENV_VAR, &legacy), (DEFAULT_ENV_VAR, &current)]);
        assert_eq!(resolver.locate_with(None, both).unwrap(), current);
    }

    #[test]
    fn test_first_existing_search_path_wins() {
        let empty = TempDir::new().unwrap();
        let first = TempDir::new().unwrap();
        let second = TempDir::new().unwrap();
        let expected = touch(&first, &lib_name());
        touch(&second, &lib_name());

        let resolver = isolated(
            "PHYENGINE_TEST_SEARCH_ORDER",
            vec![empty.path().to_path_buf(), first.path().to_path_buf(), second.path().to_path_buf()],
        );
        assert_eq!(resolver.locate(None).unwrap(), expected);
    }

    #[test]
    fn test_nothing_found_lists_candidates() {
        let empty = TempDir::new().unwrap();
        let resolver = isolated("PHYENGINE_TEST_NOTHING", vec![empty.path().to_path_buf()]);
        match resolver.locate(None).unwrap_err() {
            PhyError::LibraryNotAvailable {
                reason: Unavailable::NotFound { searched },
            } => assert_eq!(searched, vec![empty.path().join(lib_name())]),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_explicit_does_not_fall_through() {
        let dir = TempDir::new().unwrap();
        touch(&dir, &lib_name());
        let resolver = isolated("PHYENGINE_TEST_MISSING_EXPLICIT", vec![dir.path().to_path_buf()]);
        let err = resolver.resolve(Some(Path::new("/no/such/libphyengine.so"))).unwrap_err();
        assert!(matches!(
            err,
            PhyError::LibraryNotAvailable {
                reason: Unavailable::NotFound { .. }
            }
        ));
        assert!(!resolver.is_resolved());
    }

    #[test]
    fn test_unloadable_file_is_load_failure() {
        let dir = TempDir::new().unwrap();
        let bogus = touch(&dir, &lib_name());
        let resolver = isolated("PHYENGINE_TEST_UNLOADABLE", Vec::new());
        match resolver.resolve(Some(&bogus)).unwrap_err() {
            PhyError::LibraryNotAvailable {
                reason: Unavailable::LoadFailed { path, .. },
            } => assert_eq!(path, bogus),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!resolver.is_resolved());
    }

    #[test]
    fn test_resolved_state_is_sticky_until_reset() {
        let resolver = isolated("PHYENGINE_TEST_STICKY", Vec::new());
        let installed = resolver.install(NativeEngine::from_entry(phyengine_analyze));
        assert!(resolver.is_resolved());

        let again = resolver.resolve(Some(Path::new("/elsewhere/libphyengine.so"))).unwrap();
        assert!(Arc::ptr_eq(&installed, &again));

        resolver.reset();
        assert!(!resolver.is_resolved());
        assert!(resolver.resolve(Some(Path::new("/elsewhere/libphyengine.so"))).is_err());
    }
}
