//! Fingerprint entry points and their memoization.

use alloc::string::{String, ToString};
#[cfg(feature = "std")]
use core::fmt;
#[cfg(feature = "std")]
use core::num::NonZeroUsize;
#[cfg(feature = "std")]
use std::sync::{LazyLock, Mutex, MutexGuard, PoisonError};

#[cfg(feature = "std")]
use lru::LruCache;
#[cfg(feature = "std")]
use tracing::debug;

use crate::errors::Error;
use crate::normalize::normalize_whitespace;
use crate::parser::Statements;
use crate::simplify::simplify;

/// Compute the fingerprint of the first statement in `sql`, bypassing any
/// cache.
///
/// Input without statements (empty or blank) fingerprints to an empty string.
/// Statements after the first are ignored.
///
/// # Errors
///
/// Returns an [`Error`] when the statement matches a simplification rule's
/// leading keyword without the structure the rule expects.
///
/// # Example
///
/// ```
/// use sql_fingerprint_rs::fingerprint_uncached;
///
/// assert_eq!(
///     fingerprint_uncached("SELECT name FROM users WHERE id = 42", false).unwrap(),
///     "SELECT name FROM users WHERE id = #"
/// );
/// assert_eq!(fingerprint_uncached("   ", true).unwrap(), "");
/// ```
pub fn fingerprint_uncached(sql: &str, hide_columns: bool) -> Result<String, Error> {
    let Some(mut statement) = Statements::new(sql).next() else {
        return Ok(String::new());
    };
    simplify(normalize_whitespace(&mut statement), hide_columns)?;
    Ok(statement.to_string().trim().to_string())
}

/// Number of entries kept by [`FingerprintCache::default`] and by the cache
/// behind [`fingerprint()`].
#[cfg(feature = "std")]
pub const DEFAULT_CACHE_CAPACITY: NonZeroUsize = match NonZeroUsize::new(500) {
    Some(capacity) => capacity,
    None => panic!("cache capacity must be non-zero"),
};

#[cfg(feature = "std")]
type CacheKey = (String, bool);

/// A thread-safe, bounded memo of fingerprints keyed by
/// `(statement text, hide_columns)`.
///
/// Once full, inserting a new entry evicts the least recently used one.
/// Failed computations are not stored.
#[cfg(feature = "std")]
pub struct FingerprintCache {
    entries: Mutex<LruCache<CacheKey, String>>,
}

#[cfg(feature = "std")]
impl FingerprintCache {
    /// Create an empty cache holding at most `capacity` fingerprints.
    #[must_use]
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            entries: Mutex::new(LruCache::new(capacity)),
        }
    }

    /// Fingerprint `sql`, reusing the stored result for a repeated
    /// `(sql, hide_columns)` pair.
    ///
    /// # Errors
    ///
    /// Same as [`fingerprint_uncached`].
    pub fn fingerprint(&self, sql: &str, hide_columns: bool) -> Result<String, Error> {
        let key = (sql.to_string(), hide_columns);
        if let Some(cached) = self.lock().get(&key) {
            debug!(hide_columns, "fingerprint cache hit");
            return Ok(cached.clone());
        }

        debug!(hide_columns, "fingerprint cache miss");
        // Computed without holding the lock; a concurrent miss on the same key
        // stores an identical value.
        let fingerprint = fingerprint_uncached(sql, hide_columns)?;

        // `push` also hands back the previous entry when a concurrent miss
        // stored the same key first; only a different key is an eviction.
        let replaced = self.lock().push(key, fingerprint.clone());
        if let Some(((evicted_sql, evicted_hide_columns), _)) = replaced {
            if evicted_sql != sql || evicted_hide_columns != hide_columns {
                debug!(
                    evicted_hide_columns,
                    "evicted least recently used fingerprint"
                );
            }
        }
        Ok(fingerprint)
    }

    /// Number of stored fingerprints.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Whether no fingerprint is stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Maximum number of stored fingerprints.
    #[must_use]
    pub fn capacity(&self) -> NonZeroUsize {
        self.lock().cap()
    }

    fn lock(&self) -> MutexGuard<'_, LruCache<CacheKey, String>> {
        // Entries are written whole, so a poisoned lock still guards a
        // consistent map.
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(feature = "std")]
impl Default for FingerprintCache {
    fn default() -> Self {
        Self::new(DEFAULT_CACHE_CAPACITY)
    }
}

#[cfg(feature = "std")]
impl fmt::Debug for FingerprintCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FingerprintCache")
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .finish()
    }
}

#[cfg(feature = "std")]
static GLOBAL_CACHE: LazyLock<FingerprintCache> = LazyLock::new(FingerprintCache::default);

/// Fingerprint `sql` through a process-wide [`FingerprintCache`] of
/// [`DEFAULT_CACHE_CAPACITY`] entries.
///
/// Prefer an owned [`FingerprintCache`] where the cache's lifetime or size
/// matters, e.g. in tests.
///
/// # Errors
///
/// Same as [`fingerprint_uncached`].
///
/// # Example
///
/// ```
/// use sql_fingerprint_rs::fingerprint;
///
/// let first = fingerprint("SELECT a FROM t WHERE id IN (1, 2, 3)", true).unwrap();
/// assert_eq!(first, "SELECT a FROM t WHERE id IN (...)");
/// assert_eq!(fingerprint("SELECT a FROM t WHERE id IN (1, 2, 3)", true).unwrap(), first);
/// ```
#[cfg(feature = "std")]
pub fn fingerprint(sql: &str, hide_columns: bool) -> Result<String, Error> {
    GLOBAL_CACHE.fingerprint(sql, hide_columns)
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn test_cache_matches_uncached() {
        let cache = FingerprintCache::default();
        for sql in [
            "SELECT a, b FROM t WHERE c = 1",
            "UPDATE t SET a = 1 WHERE b = 2",
            "",
        ] {
            for hide_columns in [true, false] {
                let expected = fingerprint_uncached(sql, hide_columns).unwrap();
                assert_eq!(cache.fingerprint(sql, hide_columns).unwrap(), expected);
                assert_eq!(cache.fingerprint(sql, hide_columns).unwrap(), expected);
            }
        }
        assert_eq!(cache.len(), 6);
    }

    #[test]
    fn test_key_includes_hide_columns() {
        let cache = FingerprintCache::default();
        assert_eq!(
            cache.fingerprint("SELECT a, b FROM t", true).unwrap(),
            "SELECT ... FROM t"
        );
        assert_eq!(
            cache.fingerprint("SELECT a, b FROM t", false).unwrap(),
            "SELECT a, b FROM t"
        );
    }

    #[test]
    fn test_eviction_bounds_size() {
        let cache = FingerprintCache::new(NonZeroUsize::new(2).unwrap());
        assert!(cache.is_empty());
        for sql in ["SELECT 1", "SELECT 2", "SELECT 3"] {
            assert_eq!(cache.fingerprint(sql, true).unwrap(), "SELECT #");
        }
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.capacity().get(), 2);
    }

    #[test]
    fn test_evicts_least_recently_used() {
        let cache = FingerprintCache::new(NonZeroUsize::new(2).unwrap());
        for sql in ["SELECT 1", "SELECT 2", "SELECT 1", "SELECT 3"] {
            cache.fingerprint(sql, true).unwrap();
        }
        let entries = cache.lock();
        assert!(entries.contains(&("SELECT 1".to_string(), true)));
        assert!(entries.contains(&("SELECT 3".to_string(), true)));
        assert!(!entries.contains(&("SELECT 2".to_string(), true)));
    }

    #[test]
    fn test_errors_not_cached() {
        let cache = FingerprintCache::default();
        assert_eq!(cache.fingerprint("UPDATE t", true), Err(Error::MissingSet));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_only_first_statement() {
        assert_eq!(
            fingerprint_uncached("SELECT 1; UPDATE t", true).unwrap(),
            "SELECT #;"
        );
    }

    #[test]
    fn test_default_capacity() {
        assert_eq!(FingerprintCache::default().capacity(), DEFAULT_CACHE_CAPACITY);
    }
}
