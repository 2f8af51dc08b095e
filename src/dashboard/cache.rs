use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::Result;

/// Which `/analise/*` view a cached result belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalyticsKind {
    SalaryBreakdown,
    ShiftDistribution,
    WeeklyDistribution,
    TopJobs,
    ReturnsBreakdown,
    FunctionDistribution,
}

impl fmt::Display for AnalyticsKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AnalyticsKind::SalaryBreakdown => "salary breakdown",
            AnalyticsKind::ShiftDistribution => "shift distribution",
            AnalyticsKind::WeeklyDistribution => "weekly distribution",
            AnalyticsKind::TopJobs => "top jobs",
            AnalyticsKind::ReturnsBreakdown => "returns breakdown",
            AnalyticsKind::FunctionDistribution => "function distribution",
        };
        f.write_str(s)
    }
}

/// Typed cache key; filter structs enter as their serialized query string
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum QueryKey {
    Statements(String),
    Statement(String),
    StatementDetails(Vec<String>),
    Analytics(AnalyticsKind, String),
}

/// Invalidation unit: every key of one kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryScope {
    Statements,
    Statement,
    StatementDetails,
    Analytics,
}

impl QueryScope {
    pub const ALL: [QueryScope; 4] = [
        QueryScope::Statements,
        QueryScope::Statement,
        QueryScope::StatementDetails,
        QueryScope::Analytics,
    ];
}

impl QueryKey {
    pub fn scope(&self) -> QueryScope {
        match self {
            QueryKey::Statements(_) => QueryScope::Statements,
            QueryKey::Statement(_) => QueryScope::Statement,
            QueryKey::StatementDetails(_) => QueryScope::StatementDetails,
            QueryKey::Analytics(..) => QueryScope::Analytics,
        }
    }
}

type Entry = Arc<dyn Any + Send + Sync>;

#[derive(Default)]
struct CacheInner {
    entries: HashMap<QueryKey, Entry>,
    generations: HashMap<QueryScope, u64>,
}

impl CacheInner {
    fn generation(&self, scope: QueryScope) -> u64 {
        self.generations.get(&scope).copied().unwrap_or(0)
    }
}

/// Snapshots of fetched data, shared across threads.
///
/// Entries are immutable once stored. Invalidating a scope drops its entries
/// and bumps the scope's generation; a fetch that started under an older
/// generation still returns its data to the caller but is not stored.
#[derive(Default)]
pub struct QueryCache {
    inner: Mutex<CacheInner>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<T: Send + Sync + 'static>(&self, key: &QueryKey) -> Option<Arc<T>> {
        let entry = self.inner.lock().entries.get(key).cloned()?;
        entry.downcast::<T>().ok()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// Errors are never cached, so a retry re-issues the request.
    pub fn get_or_fetch<T, F>(&self, key: QueryKey, fetch: F) -> Result<Arc<T>>
    where
        T: Send + Sync + 'static,
        F: FnOnce() -> Result<T>,
    {
        if let Some(hit) = self.get::<T>(&key) {
            log::debug!("cache hit: {key:?}");
            return Ok(hit);
        }

        let scope = key.scope();
        let started_at = self.inner.lock().generation(scope);
        let value = Arc::new(fetch()?);

        let mut inner = self.inner.lock();
        if inner.generation(scope) == started_at {
            inner.entries.insert(key, value.clone() as Entry);
        } else {
            log::debug!("not caching {key:?}: scope invalidated while fetching");
        }
        Ok(value)
    }

    pub fn invalidate(&self, scope: QueryScope) {
        let mut inner = self.inner.lock();
        inner.entries.retain(|key, _| key.scope() != scope);
        *inner.generations.entry(scope).or_default() += 1;
        log::debug!("invalidated {scope:?}");
    }

    pub fn invalidate_all(&self) {
        for scope in QueryScope::ALL {
            self.invalidate(scope);
        }
    }

    pub fn len(&self) -> usize {
        self.inner.lock().entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtratoError;
    use std::cell::Cell;

    #[test]
    fn second_lookup_is_served_from_cache() {
        let cache = QueryCache::new();
        let calls = Cell::new(0);
        let fetch = || {
            calls.set(calls.get() + 1);
            Ok(vec![1, 2, 3])
        };

        let a = cache
            .get_or_fetch(QueryKey::Statements(String::new()), fetch)
            .unwrap();
        let b = cache
            .get_or_fetch(QueryKey::Statements(String::new()), fetch)
            .unwrap();
        assert_eq!(*a, *b);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn different_filters_are_different_keys() {
        let cache = QueryCache::new();
        cache
            .get_or_fetch(QueryKey::Statements("ano=2024".into()), || Ok(1u32))
            .unwrap();
        let other = cache
            .get_or_fetch(QueryKey::Statements("ano=2025".into()), || Ok(2u32))
            .unwrap();
        assert_eq!(*other, 2);
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn invalidation_only_touches_its_scope() {
        let cache = QueryCache::new();
        cache
            .get_or_fetch(QueryKey::Statements(String::new()), || Ok(1u32))
            .unwrap();
        cache
            .get_or_fetch(QueryKey::Statement("7".into()), || Ok(2u32))
            .unwrap();

        cache.invalidate(QueryScope::Statements);
        assert!(cache
            .get::<u32>(&QueryKey::Statements(String::new()))
            .is_none());
        assert_eq!(
            cache.get::<u32>(&QueryKey::Statement("7".into())).as_deref(),
            Some(&2)
        );
    }

    #[test]
    fn errors_are_not_cached() {
        let cache = QueryCache::new();
        let key = QueryKey::Statement("1".into());
        let failed = cache.get_or_fetch::<u32, _>(key.clone(), || {
            Err(ExtratoError::StatementNotFound("1".into()))
        });
        assert!(failed.is_err());
        assert!(cache.is_empty());
        assert_eq!(*cache.get_or_fetch(key, || Ok(5u32)).unwrap(), 5);
    }

    #[test]
    fn result_from_before_invalidation_is_returned_but_not_stored() {
        let cache = QueryCache::new();
        let key = QueryKey::Statements(String::new());
        let value = cache
            .get_or_fetch(key.clone(), || {
                cache.invalidate(QueryScope::Statements);
                Ok("stale")
            })
            .unwrap();
        assert_eq!(*value, "stale");
        assert!(cache.get::<&str>(&key).is_none());
    }

    #[test]
    fn wrong_type_is_a_miss() {
        let cache = QueryCache::new();
        let key = QueryKey::Statement("1".into());
        cache.get_or_fetch(key.clone(), || Ok(1u32)).unwrap();
        assert!(cache.get::<String>(&key).is_none());
    }
}
