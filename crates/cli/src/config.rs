use poster_client::{
    PosterConfig, DEFAULT_API_URL, DEFAULT_IMAGE_BASE_URL, PLACEHOLDER_POSTER_URL,
};
use serde::Deserialize;
use std::path::PathBuf;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// TMDB API read access token
    pub tmdb_bearer_token: Option<String>,

    /// TMDB API base URL
    #[serde(default = "default_tmdb_api_url")]
    pub tmdb_api_url: String,

    /// Prefix for poster image URLs
    #[serde(default = "default_tmdb_image_base_url")]
    pub tmdb_image_base_url: String,

    /// Image used when a poster cannot be resolved
    #[serde(default = "default_poster_placeholder_url")]
    pub poster_placeholder_url: String,

    /// Directory holding the artifacts (the --artifacts-dir flag wins)
    pub artifacts_dir: Option<PathBuf>,
}

fn default_tmdb_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_tmdb_image_base_url() -> String {
    DEFAULT_IMAGE_BASE_URL.to_string()
}

fn default_poster_placeholder_url() -> String {
    PLACEHOLDER_POSTER_URL.to_string()
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Settings for the poster resolver
    pub fn poster_config(&self) -> PosterConfig {
        PosterConfig {
            api_url: self.tmdb_api_url.clone(),
            image_base_url: self.tmdb_image_base_url.clone(),
            placeholder_url: self.poster_placeholder_url.clone(),
            bearer_token: self
                .tmdb_bearer_token
                .clone()
                .filter(|token| !token.trim().is_empty()),
        }
    }
}
