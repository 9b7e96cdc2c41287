//! Pluggable storage for precomputed omega tables.
//!
//! The retrieved reference material computes each root-of-unity table once and leaves it on
//! disk as a `W<omega>.cache` file for the next run to reuse. [`OmegaCacheStore`] keeps that
//! idea but as a trait, so a caller can plug in an in-memory store for tests or a shared cache
//! for a multi-process deployment instead of committing to one process's filesystem.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Mutex;

use crate::Element;

// ======================================================================
// OmegaCacheStore - PUBLIC

/// A cache of `omega -> [1, omega, omega^2, ...]` tables, keyed by the root's integer value.
///
/// Implementations only need to be correct for the `(key, values)` pairs a single
/// [`Ring`](crate::Ring) actually asks for; there is no requirement to validate that `key` is
/// really a root of unity of the caller's ring; [`Ring::compute_omegas_cached`](crate::Ring::compute_omegas_cached)
/// only checks that a cache hit has the expected length.
pub trait OmegaCacheStore<T: Element> {
    /// Returns the cached table for `omega`, if present.
    fn get(&self, omega: u128) -> Option<Vec<T>>;

    /// Stores `values` as the table for `omega`, overwriting any previous entry.
    fn put(&self, omega: u128, values: &[T]);
}

// ======================================================================
// NullOmegaCacheStore - PUBLIC

/// A store that never caches anything: every [`OmegaCacheStore::get`] misses.
///
/// Useful as the default when a caller has no cross-run cache to plug in, and in tests that
/// want to exercise the cache-population path every time.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullOmegaCacheStore;

impl<T: Element> OmegaCacheStore<T> for NullOmegaCacheStore {
    fn get(&self, _omega: u128) -> Option<Vec<T>> {
        None
    }

    fn put(&self, _omega: u128, _values: &[T]) {}
}

// ======================================================================
// FileOmegaCacheStore - PUBLIC

/// A store backed by one `W<omega>.cache` file per root, under a given directory.
///
/// Each file holds one decimal integer per line, in table order. A failed read or a
/// malformed file is treated as a cache miss, logged at `warn` level, rather than propagated
/// as an error: the cache is always safe to skip.
#[derive(Debug)]
pub struct FileOmegaCacheStore {
    dir: PathBuf,
    writes_in_flight: Mutex<()>,
}

impl FileOmegaCacheStore {
    /// Uses `dir` as the cache directory. Does not create it; a missing directory just means
    /// every lookup misses until something writes to it.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        FileOmegaCacheStore {
            dir: dir.into(),
            writes_in_flight: Mutex::new(()),
        }
    }

    fn path_for(&self, omega: u128) -> PathBuf {
        self.dir.join(format!("W{omega}.cache"))
    }
}

impl<T> OmegaCacheStore<T> for FileOmegaCacheStore
where
    T: Element + std::fmt::Display + FromStr,
    <T as FromStr>::Err: std::fmt::Debug,
{
    fn get(&self, omega: u128) -> Option<Vec<T>> {
        let path = self.path_for(omega);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                log::warn!("omega cache read failed for {}: {err}", path.display());
                return None;
            }
        };

        let mut values = Vec::new();
        for line in contents.lines().filter(|l| !l.is_empty()) {
            match line.parse::<T>() {
                Ok(value) => values.push(value),
                Err(err) => {
                    log::warn!("omega cache file {} is corrupt: {err:?}", path.display());
                    return None;
                }
            }
        }
        Some(values)
    }

    fn put(&self, omega: u128, values: &[T]) {
        let path = self.path_for(omega);
        let _guard = self.writes_in_flight.lock().unwrap_or_else(|e| e.into_inner());

        let mut contents = String::with_capacity(values.len() * 8);
        for value in values {
            contents.push_str(&value.to_string());
            contents.push('\n');
        }

        if let Some(parent) = Path::new(&path).parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("omega cache directory {} unavailable: {err}", parent.display());
                return;
            }
        }
        if let Err(err) = fs::write(&path, contents) {
            log::warn!("omega cache write failed for {}: {err}", path.display());
        }
    }
}

// ======================================================================
// TESTS
