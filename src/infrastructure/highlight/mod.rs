//! Syntax highlighter support

mod language_cache;

pub use language_cache::{LanguageCache, LanguageLoad, LanguageLoader, DEFAULT_LANGUAGE_CAPACITY};

#[cfg(test)]
pub use language_cache::mock::MockLanguageLoader;
