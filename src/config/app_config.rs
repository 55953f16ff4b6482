use std::time::Duration;

use serde::Deserialize;

use crate::domain::{DomainError, RefCountRegistryConfig, StreamOptions};
use crate::infrastructure::highlight::{LanguageCache, LanguageLoader, DEFAULT_LANGUAGE_CAPACITY};
use crate::infrastructure::playback::PlaybackConfig;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub cache: CacheConfig,
    pub registry: RegistryConfig,
    pub stream: StreamConfig,
    pub playback: PlaybackSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Languages kept loaded in a highlighter
    pub language_capacity: usize,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// Retained sessions before idle ones are evicted; unset means unbounded
    pub max_cache_size: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StreamConfig {
    pub char_chunk: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PlaybackSettings {
    pub frame_interval_ms: u64,
    pub skip: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            language_capacity: DEFAULT_LANGUAGE_CAPACITY,
        }
    }
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self { char_chunk: 1 }
    }
}

impl Default for PlaybackSettings {
    fn default() -> Self {
        Self {
            frame_interval_ms: 24,
            skip: false,
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    /// Rejects capacities that would make a cache or registry unusable
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.cache.language_capacity == 0 {
            return Err(DomainError::invalid_capacity(0));
        }

        self.registry_config().validate()
    }

    pub fn registry_config(&self) -> RefCountRegistryConfig {
        RefCountRegistryConfig {
            max_cache_size: self.registry.max_cache_size,
        }
    }

    /// Language cache for a highlighter driven by `loader`, sized from `cache.language_capacity`
    pub fn language_cache<L: LanguageLoader>(
        &self,
        loader: L,
    ) -> Result<LanguageCache<L>, DomainError> {
        LanguageCache::with_capacity(loader, self.cache.language_capacity)
    }

    pub fn stream_options(&self) -> StreamOptions {
        StreamOptions::default().with_char_chunk(self.stream.char_chunk)
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig::default()
            .with_frame_interval(Duration::from_millis(self.playback.frame_interval_ms))
            .with_char_chunk(self.stream.char_chunk)
            .with_skip(self.playback.skip)
    }
}
