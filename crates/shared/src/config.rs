//! Application configuration management.

use serde::Deserialize;

/// Application configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Database configuration.
    pub database: DatabaseConfig,
    /// Quran content API configuration.
    #[serde(default)]
    pub quran_api: QuranApiConfig,
    /// Identifier numbering configuration.
    #[serde(default)]
    pub numbering: NumberingConfig,
}

/// Database configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL.
    pub url: String,
    /// Maximum number of connections in the pool.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Minimum number of connections in the pool.
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

/// Quran content API configuration (OAuth2 client credentials).
#[derive(Debug, Clone, Deserialize)]
pub struct QuranApiConfig {
    /// OAuth2 client ID. Empty disables remote lookups.
    #[serde(default)]
    pub client_id: String,
    /// OAuth2 client secret.
    #[serde(default)]
    pub client_secret: String,
    /// Base URL of the OAuth2 token endpoint host.
    #[serde(default = "default_oauth_url")]
    pub oauth_url: String,
    /// Base URL of the content API.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Base URL of the page image CDN.
    #[serde(default = "default_image_cdn_url")]
    pub image_cdn_url: String,
    /// Timeout applied to every outbound request.
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
    /// Time-to-live for cached content responses.
    #[serde(default = "default_content_cache_ttl")]
    pub content_cache_ttl_secs: u64,
    /// Access tokens are dropped this many seconds before they expire.
    #[serde(default = "default_token_refresh_margin")]
    pub token_refresh_margin_secs: u64,
    /// Maximum number of cached content entries.
    #[serde(default = "default_cache_capacity")]
    pub cache_capacity: u64,
}

fn default_oauth_url() -> String {
    "https://oauth2.quran.foundation".to_string()
}

fn default_api_base_url() -> String {
    "https://apis.quran.foundation/content/api/v4".to_string()
}

fn default_image_cdn_url() -> String {
    "https://static.quran.foundation/pages".to_string()
}

fn default_request_timeout() -> u64 {
    10
}

fn default_content_cache_ttl() -> u64 {
    86_400 // 24 hours
}

fn default_token_refresh_margin() -> u64 {
    60
}

fn default_cache_capacity() -> u64 {
    10_000
}

impl Default for QuranApiConfig {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            oauth_url: default_oauth_url(),
            api_base_url: default_api_base_url(),
            image_cdn_url: default_image_cdn_url(),
            request_timeout_secs: default_request_timeout(),
            content_cache_ttl_secs: default_content_cache_ttl(),
            token_refresh_margin_secs: default_token_refresh_margin(),
            cache_capacity: default_cache_capacity(),
        }
    }
}

impl QuranApiConfig {
    /// Returns true if client credentials are present.
    #[must_use]
    pub fn has_credentials(&self) -> bool {
        !self.client_id.is_empty() && !self.client_secret.is_empty()
    }
}

/// Identifier numbering configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct NumberingConfig {
    /// Attempts made when a generated identifier collides on insert.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    5
}

impl Default for NumberingConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
        }
    }
}

impl AppConfig {
    /// Loads configuration from environment and config files.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be loaded.
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{run_mode}")).required(false))
            .add_source(config::Environment::with_prefix("MADRASAH").separator("__"))
            .build()?;

        config.try_deserialize()
    }
}
