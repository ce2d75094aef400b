//! Time-bounded cache in front of another source.

use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::{RawRows, SheetSource};
use crate::error::Result;

/// Cached fetch result.
struct CachedRows {
    range: String,
    rows: RawRows,
    fetched_at: Instant,
}

/// Wraps a source and reuses its last result for the same range while it is
/// younger than the TTL. A zero TTL disables caching.
pub struct CachedSource<S> {
    inner: S,
    ttl: Duration,
    cache: Mutex<Option<CachedRows>>,
}

impl<S: SheetSource> CachedSource<S> {
    pub fn new(inner: S, ttl: Duration) -> Self {
        Self {
            inner,
            ttl,
            cache: Mutex::new(None),
        }
    }

    fn cached(&self, range: &str) -> Option<RawRows> {
        let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
        let entry = cache.as_ref()?;
        let age = entry.fetched_at.elapsed();
        if entry.range == range && age < self.ttl {
            log::debug!("using cached rows for {range} (age: {age:?})");
            Some(entry.rows.clone())
        } else {
            None
        }
    }
}

impl<S: SheetSource> SheetSource for CachedSource<S> {
    fn fetch(&self, range: &str) -> Result<RawRows> {
        if self.ttl.is_zero() {
            return self.inner.fetch(range);
        }
        if let Some(rows) = self.cached(range) {
            return Ok(rows);
        }

        let rows = self.inner.fetch(range)?;
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = Some(CachedRows {
            range: range.to_string(),
            rows: rows.clone(),
            fetched_at: Instant::now(),
        });
        Ok(rows)
    }

    fn describe(&self) -> String {
        self.inner.describe()
    }

    fn invalidate(&self) {
        *self.cache.lock().unwrap_or_else(PoisonError::into_inner) = None;
        self.inner.invalidate();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SheetError;
    use std::cell::Cell;

    /// Counts fetches and returns the call number as the only cell.
    struct Counting {
        calls: Cell<usize>,
        fail: Cell<bool>,
    }

    impl Counting {
        fn new() -> Self {
            Self {
                calls: Cell::new(0),
                fail: Cell::new(false),
            }
        }
    }

    impl SheetSource for Counting {
        fn fetch(&self, range: &str) -> Result<RawRows> {
            if self.fail.get() {
                return Err(SheetError::SourceUnavailable("down".into()));
            }
            self.calls.set(self.calls.get() + 1);
            Ok(vec![vec![range.to_string(), self.calls.get().to_string()]])
        }

        fn describe(&self) -> String {
            "counting".into()
        }
    }

    #[test]
    fn same_range_within_ttl_hits_cache() {
        let source = CachedSource::new(Counting::new(), Duration::from_secs(300));
        let first = source.fetch("A:Z").unwrap();
        let second = source.fetch("A:Z").unwrap();
        assert_eq!(first, second);
        assert_eq!(source.inner.calls.get(), 1);
    }

    #[test]
    fn other_range_or_invalidate_refetches() {
        let source = CachedSource::new(Counting::new(), Duration::from_secs(300));
        source.fetch("A:Z").unwrap();
        source.fetch("A:C").unwrap();
        assert_eq!(source.inner.calls.get(), 2);
        source.invalidate();
        source.fetch("A:C").unwrap();
        assert_eq!(source.inner.calls.get(), 3);
    }

    #[test]
    fn zero_ttl_never_caches() {
        let source = CachedSource::new(Counting::new(), Duration::ZERO);
        source.fetch("A:Z").unwrap();
        source.fetch("A:Z").unwrap();
        assert_eq!(source.inner.calls.get(), 2);
    }

    #[test]
    fn expired_entry_is_refetched() {
        let source = CachedSource::new(Counting::new(), Duration::from_millis(1));
        source.fetch("A:Z").unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert_eq!(source.fetch("A:Z").unwrap()[0][1], "2");
    }

    #[test]
    fn failures_are_not_cached() {
        let source = CachedSource::new(Counting::new(), Duration::from_secs(300));
        source.inner.fail.set(true);
        assert!(source.fetch("A:Z").is_err());
        source.inner.fail.set(false);
        assert_eq!(source.fetch("A:Z").unwrap()[0][1], "1");
    }
}
