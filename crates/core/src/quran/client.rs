//! Quran Foundation content API client.
//!
//! Authenticates with OAuth2 client credentials and caches both the access
//! token and content responses. Quran structure never changes, so content
//! is cached for a long time.

use std::sync::Arc;
use std::time::{Duration, Instant};

use madrasah_shared::QuranApiConfig;
use moka::future::Cache;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use super::error::QuranApiError;
use super::juz::{JuzPageRange, JUZ_PAGE_RANGES};
use super::source::QuranContentSource;

/// Page image resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    /// 1920px wide.
    High,
    /// 960px wide.
    #[default]
    Medium,
    /// 480px wide.
    Low,
}

impl ImageQuality {
    /// CDN path segment for this quality.
    #[must_use]
    pub const fn width_segment(self) -> &'static str {
        match self {
            Self::High => "w1920",
            Self::Medium => "w960",
            Self::Low => "w480",
        }
    }
}

impl std::str::FromStr for ImageQuality {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "high" => Ok(Self::High),
            "medium" => Ok(Self::Medium),
            "low" => Ok(Self::Low),
            _ => Err(format!("Unknown image quality: {s}")),
        }
    }
}

/// A surah as described by the content API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Surah number.
    pub id: u32,
    /// Transliterated name.
    pub name_simple: String,
    /// Arabic name.
    #[serde(default)]
    pub name_arabic: String,
    /// Number of verses.
    pub verses_count: u32,
    /// `makkah` or `madinah`.
    #[serde(default)]
    pub revelation_place: String,
    /// First and last page.
    #[serde(default)]
    pub pages: Vec<u32>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct VerseByKeyResponse {
    verse: VerseData,
}

#[derive(Debug, Deserialize)]
struct VerseData {
    page_number: u32,
}

#[derive(Debug, Deserialize)]
struct ChaptersResponse {
    chapters: Vec<Chapter>,
}

#[derive(Debug, Clone)]
struct CachedToken {
    value: String,
    expires_at: Instant,
}

impl CachedToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

/// Quran content API client.
pub struct QuranApiClient {
    http: Client,
    config: QuranApiConfig,
    token: RwLock<Option<CachedToken>>,
    pages: Cache<(u32, u32), u32>,
    chapters: Cache<(), Arc<Vec<Chapter>>>,
}

impl QuranApiClient {
    /// Creates a client from configuration.
    ///
    /// # Errors
    ///
    /// Returns `QuranApiError::Request` if the HTTP client cannot be built.
    pub fn new(config: QuranApiConfig) -> Result<Self, QuranApiError> {
        let http = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()
            .map_err(|e| QuranApiError::Request(e.to_string()))?;

        let ttl = Duration::from_secs(config.content_cache_ttl_secs);
        let pages = Cache::builder()
            .max_capacity(config.cache_capacity)
            .time_to_live(ttl)
            .build();
        let chapters = Cache::builder().max_capacity(1).time_to_live(ttl).build();

        Ok(Self {
            http,
            config,
            token: RwLock::new(None),
            pages,
            chapters,
        })
    }

    /// Mushaf page of a verse.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn get_page_for_ayah(&self, surah: u32, verse: u32) -> Result<u32, QuranApiError> {
        self.pages
            .try_get_with((surah, verse), async {
                let response: VerseByKeyResponse = self
                    .get_json(&format!("/verses/by_key/{surah}:{verse}"))
                    .await?;
                Ok::<_, QuranApiError>(response.verse.page_number)
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// All 114 chapters.
    ///
    /// # Errors
    ///
    /// Returns an error if authentication or the request fails.
    pub async fn get_chapters(&self) -> Result<Arc<Vec<Chapter>>, QuranApiError> {
        self.chapters
            .try_get_with((), async {
                let response: ChaptersResponse = self.get_json("/chapters").await?;
                Ok::<_, QuranApiError>(Arc::new(response.chapters))
            })
            .await
            .map_err(|e| (*e).clone())
    }

    /// Juz page ranges. Static reference data, never fetched.
    #[must_use]
    pub fn get_juz_page_ranges(&self) -> Vec<JuzPageRange> {
        JUZ_PAGE_RANGES.to_vec()
    }

    /// CDN URL of a mushaf page image.
    #[must_use]
    pub fn page_image_url(&self, page: u32, quality: ImageQuality) -> String {
        format!(
            "{}/{}/page{:03}.png",
            self.config.image_cdn_url.trim_end_matches('/'),
            quality.width_segment(),
            page
        )
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, QuranApiError> {
        let token = self.access_token().await?;
        let mut response = self.send(path, &token).await?;

        if response.status() == StatusCode::UNAUTHORIZED {
            tracing::debug!(path, "Quran API rejected token, refreshing");
            self.invalidate_token().await;
            let token = self.access_token().await?;
            response = self.send(path, &token).await?;
        }

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuranApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json::<T>()
            .await
            .map_err(|e| QuranApiError::Decode(e.to_string()))
    }

    async fn send(&self, path: &str, token: &str) -> Result<Response, QuranApiError> {
        let url = format!("{}{path}", self.config.api_base_url.trim_end_matches('/'));
        self.http
            .get(&url)
            .header("x-auth-token", token)
            .header("x-client-id", &self.config.client_id)
            .send()
            .await
            .map_err(|e| QuranApiError::Request(e.to_string()))
    }

    async fn access_token(&self) -> Result<String, QuranApiError> {
        if let Some(token) = self.token.read().await.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let mut slot = self.token.write().await;
        if let Some(token) = slot.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        let token = self.request_token().await?;
        let value = token.value.clone();
        *slot = Some(token);
        Ok(value)
    }

    async fn invalidate_token(&self) {
        *self.token.write().await = None;
    }

    async fn request_token(&self) -> Result<CachedToken, QuranApiError> {
        if !self.config.has_credentials() {
            return Err(QuranApiError::NotConfigured);
        }

        let url = format!("{}/oauth2/token", self.config.oauth_url.trim_end_matches('/'));
        let response = self
            .http
            .post(&url)
            .basic_auth(&self.config.client_id, Some(&self.config.client_secret))
            .form(&[("grant_type", "client_credentials"), ("scope", "content")])
            .send()
            .await
            .map_err(|e| QuranApiError::Auth(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QuranApiError::Auth(format!("{status}: {body}")));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| QuranApiError::Decode(e.to_string()))?;

        let lifetime = token
            .expires_in
            .saturating_sub(self.config.token_refresh_margin_secs);
        tracing::debug!(expires_in = token.expires_in, "Quran API token acquired");

        Ok(CachedToken {
            value: token.access_token,
            expires_at: Instant::now() + Duration::from_secs(lifetime),
        })
    }
}

impl QuranContentSource for QuranApiClient {
    async fn juz_page_ranges(&self) -> Vec<JuzPageRange> {
        self.get_juz_page_ranges()
    }

    async fn page_for_ayah(&self, surah: u32, verse: u32) -> Option<u32> {
        match self.get_page_for_ayah(surah, verse).await {
            Ok(page) => Some(page),
            Err(err) => {
                tracing::warn!(
                    surah,
                    verse,
                    error = %err,
                    error_code = err.error_code(),
                    "Page lookup failed"
                );
                None
            }
        }
    }
}
