//! Poster client for the TMDB image-metadata service.
//!
//! This crate resolves a movie id to a poster image URL. It handles:
//! - Building the authenticated `GET /3/movie/{id}` request
//! - Decoding the optional `poster_path` field
//! - Falling back to a fixed placeholder on every failure
//!
//! `PosterLookup::resolve_poster` never fails. The reason a lookup fell back
//! is available through `PosterResolver::fetch_poster_path` and is logged.

use async_trait::async_trait;
use data_loader::MovieId;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, warn};

/// TMDB API root
pub const DEFAULT_API_URL: &str = "https://api.themoviedb.org";

/// Prefix joined with `poster_path` to form the image URL
pub const DEFAULT_IMAGE_BASE_URL: &str = "https://image.tmdb.org/t/p/w500";

/// Image shown whenever no poster can be resolved
pub const PLACEHOLDER_POSTER_URL: &str = "https://via.placeholder.com/500x750?text=No+Poster";

/// Reasons a poster lookup falls back to the placeholder
#[derive(Error, Debug)]
pub enum PosterError {
    #[error("No TMDB bearer token configured")]
    MissingCredential,

    #[error("Request to TMDB failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("TMDB returned status {0}")]
    Status(reqwest::StatusCode),

    #[error("Invalid response from TMDB: {0}")]
    InvalidResponse(String),
}

/// Where and how to look up posters
#[derive(Debug, Clone)]
pub struct PosterConfig {
    pub api_url: String,
    pub image_base_url: String,
    pub placeholder_url: String,
    /// Without a token no request is sent and every lookup yields the placeholder
    pub bearer_token: Option<String>,
}

impl Default for PosterConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            image_base_url: DEFAULT_IMAGE_BASE_URL.to_string(),
            placeholder_url: PLACEHOLDER_POSTER_URL.to_string(),
            bearer_token: None,
        }
    }
}

impl PosterConfig {
    pub fn with_bearer_token(mut self, token: impl Into<String>) -> Self {
        self.bearer_token = Some(token.into());
        self
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

/// Anything that can turn a movie id into a displayable poster URL.
///
/// Implementations must be total: every failure maps to some URL.
#[async_trait]
pub trait PosterLookup: Send + Sync {
    async fn resolve_poster(&self, movie_id: MovieId) -> String;
}

/// The part of the TMDB movie details body we read
#[derive(Debug, Deserialize)]
struct MovieDetails {
    #[serde(default)]
    poster_path: Option<String>,
}

/// HTTP client for TMDB poster lookups.
///
/// Cheap to clone; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct PosterResolver {
    http_client: reqwest::Client,
    config: PosterConfig,
}

impl PosterResolver {
    pub fn new(config: PosterConfig) -> Self {
        if config.bearer_token.is_none() {
            warn!("No TMDB bearer token configured, posters will use the placeholder");
        }
        Self {
            http_client: reqwest::Client::new(),
            config,
        }
    }

    pub fn config(&self) -> &PosterConfig {
        &self.config
    }

    /// Movie details endpoint for one id
    pub fn movie_url(&self, movie_id: MovieId) -> String {
        format!(
            "{}/3/movie/{}",
            self.config.api_url.trim_end_matches('/'),
            movie_id
        )
    }

    /// Full image URL for a TMDB poster path such as `/abc.jpg`
    pub fn poster_url(&self, poster_path: &str) -> String {
        format!("{}{}", self.config.image_base_url, poster_path)
    }

    /// Ask TMDB for a movie's poster path.
    ///
    /// Returns `Ok(None)` when the response has no usable `poster_path`
    /// (missing, null or empty).
    pub async fn fetch_poster_path(
        &self,
        movie_id: MovieId,
    ) -> Result<Option<String>, PosterError> {
        let token = self
            .config
            .bearer_token
            .as_deref()
            .ok_or(PosterError::MissingCredential)?;

        let url = self.movie_url(movie_id);
        debug!("Fetching poster metadata from {}", url);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .bearer_auth(token)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(PosterError::Status(status));
        }

        let body = response.bytes().await?;
        let details: MovieDetails = serde_json::from_slice(&body)
            .map_err(|e| PosterError::InvalidResponse(e.to_string()))?;

        Ok(details.poster_path.filter(|path| !path.is_empty()))
    }
}

#[async_trait]
impl PosterLookup for PosterResolver {
    async fn resolve_poster(&self, movie_id: MovieId) -> String {
        match self.fetch_poster_path(movie_id).await {
            Ok(Some(path)) => self.poster_url(&path),
            Ok(None) => {
                debug!("Movie {} has no poster, using placeholder", movie_id);
                self.config.placeholder_url.clone()
            }
            Err(PosterError::MissingCredential) => self.config.placeholder_url.clone(),
            Err(e) => {
                warn!("Poster lookup for movie {} failed: {}", movie_id, e);
                self.config.placeholder_url.clone()
            }
        }
    }
}
