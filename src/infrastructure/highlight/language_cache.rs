//! Recency-bounded set of languages loaded into a syntax highlighter

use std::fmt::Debug;

use tracing::debug;

use crate::domain::{DomainError, LruCache};

/// Number of grammars kept loaded before the oldest is dropped
pub const DEFAULT_LANGUAGE_CAPACITY: usize = 20;

/// Highlighter engine operations the cache drives
pub trait LanguageLoader: Send + Debug {
    /// Loads the grammar for `language`
    fn load(&mut self, language: &str) -> Result<(), DomainError>;

    /// Releases the grammar for `language`
    fn unload(&mut self, language: &str);
}

/// Outcome of [`LanguageCache::ensure`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LanguageLoad {
    /// Already loaded; recency refreshed
    Cached,
    /// Freshly loaded, possibly pushing out the least recently used language
    Loaded { evicted: Option<String> },
}

/// Explicit handle over a highlighter's loaded languages
///
/// Construct one per highlighter and pass it to whoever renders code.
#[derive(Debug)]
pub struct LanguageCache<L> {
    languages: LruCache<String, ()>,
    loader: L,
}

impl<L: LanguageLoader> LanguageCache<L> {
    pub fn new(loader: L) -> Result<Self, DomainError> {
        Self::with_capacity(loader, DEFAULT_LANGUAGE_CAPACITY)
    }

    pub fn with_capacity(loader: L, capacity: usize) -> Result<Self, DomainError> {
        Ok(Self {
            languages: LruCache::new(capacity)?,
            loader,
        })
    }

    /// Makes sure `language` is loaded, unloading the oldest one on overflow
    pub fn ensure(&mut self, language: &str) -> Result<LanguageLoad, DomainError> {
        if self.languages.get(language).is_some() {
            return Ok(LanguageLoad::Cached);
        }

        self.loader.load(language)?;

        let evicted = self
            .languages
            .push(language.to_string(), ())
            .map(|(evicted, ())| evicted);

        if let Some(evicted) = &evicted {
            debug!(language, evicted = %evicted, "Unloading least recently used language");
            self.loader.unload(evicted);
        }

        Ok(LanguageLoad::Loaded { evicted })
    }

    pub fn is_loaded(&self, language: &str) -> bool {
        self.languages.has(language)
    }

    /// Loaded languages from least to most recently used
    pub fn loaded(&self) -> Vec<&str> {
        self.languages.keys().map(String::as_str).collect()
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }
}


#[cfg(test)]
mod tests {
    use super::mock::MockLanguageLoader;
    use super::*;

    #[test]
    fn test_loads_language_once() {
        let mut cache = LanguageCache::new(MockLanguageLoader::new()).unwrap();

        assert_eq!(
            cache.ensure("rust").unwrap(),
            LanguageLoad::Loaded { evicted: None }
        );
        assert_eq!(cache.ensure("rust").unwrap(), LanguageLoad::Cached);
        assert_eq!(cache.loader().loaded, vec!["rust"]);
    }

    #[test]
    fn test_unloads_least_recently_used_language() {
        let mut cache = LanguageCache::with_capacity(MockLanguageLoader::new(), 2).unwrap();
        cache.ensure("rust").unwrap();
        cache.ensure("python").unwrap();
        cache.ensure("rust").unwrap();

        let outcome = cache.ensure("go").unwrap();

        assert_eq!(
            outcome,
            LanguageLoad::Loaded {
                evicted: Some("python".to_string())
            }
        );
        assert_eq!(cache.loader().unloaded, vec!["python"]);
        assert_eq!(cache.loaded(), vec!["rust", "go"]);
        assert!(!cache.is_loaded("python"));
    }

    #[test]
    fn test_failed_load_is_not_cached() {
        let loader = MockLanguageLoader::new().with_unsupported("cobol");
        let mut cache = LanguageCache::new(loader).unwrap();

        assert!(cache.ensure("cobol").is_err());
        assert!(!cache.is_loaded("cobol"));
    }

    #[test]
    fn test_zero_capacity_is_rejected() {
        let result = LanguageCache::with_capacity(MockLanguageLoader::new(), 0);
        assert!(matches!(
            result,
            Err(DomainError::InvalidCapacity { capacity: 0 })
        ));
    }
}
