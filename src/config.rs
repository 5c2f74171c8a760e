use crate::error::{Result, VibeError};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-pro";
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_DEEZER_BASE_URL: &str = "https://api.deezer.com";
pub const DEFAULT_REDIRECT_URI: &str = "http://localhost:3000/api/auth/callback/deezer";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub model_name: String,
    pub google_api_key: Option<String>,
    pub gemini_base_url: String,
    pub deezer_base_url: String,
    pub deezer_access_token: Option<String>,
    pub deezer_app_id: Option<String>,
    pub deezer_secret: Option<String>,
    pub deezer_redirect_uri: String,
    pub supabase: Option<SupabaseConfig>,
    pub http_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct SupabaseConfig {
    pub url: String,
    pub anon_key: String,
}

impl Config {
    /// Build a config from a variable lookup; missing optional values fall back to defaults
    pub fn from_lookup<F>(lookup: F) -> Result<Config>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Blank values count as unset, like an empty line in `.env`
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let http_timeout = match var("HTTP_TIMEOUT_SECS") {
            Some(raw) => {
                let secs = raw.trim().parse::<u64>().map_err(|_| {
                    VibeError::Configuration(format!(
                        "HTTP_TIMEOUT_SECS must be a whole number of seconds, got '{raw}'"
                    ))
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        };

        let supabase = match (var("SUPABASE_URL"), var("SUPABASE_ANON_KEY")) {
            (Some(url), Some(anon_key)) => Some(SupabaseConfig { url, anon_key }),
            _ => None,
        };

        Ok(Config {
            model_name: var("GOOGLE_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            google_api_key: var("GOOGLE_GENERATIVE_AI_API_KEY"),
            gemini_base_url: var("GEMINI_BASE_URL")
                .unwrap_or_else(|| DEFAULT_GEMINI_BASE_URL.to_string()),
            deezer_base_url: var("DEEZER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_DEEZER_BASE_URL.to_string()),
            deezer_access_token: var("DEEZER_ACCESS_TOKEN"),
            deezer_app_id: var("DEEZER_CLIENT_ID"),
            deezer_secret: var("DEEZER_CLIENT_SECRET"),
            deezer_redirect_uri: var("DEEZER_REDIRECT_URI")
                .unwrap_or_else(|| DEFAULT_REDIRECT_URI.to_string()),
            supabase,
            http_timeout,
        })
    }

    /// Search works without any Deezer credentials; playlists need a token
    pub fn is_read_only(&self) -> bool {
        self.deezer_access_token.is_none()
    }

    pub fn require_google_api_key(&self) -> Result<&str> {
        self.google_api_key.as_deref().ok_or_else(|| {
            VibeError::Configuration("GOOGLE_GENERATIVE_AI_API_KEY is not set".to_string())
        })
    }

    /// The authorize URL only needs the public app id
    pub fn require_deezer_app_id(&self) -> Result<&str> {
        self.deezer_app_id
            .as_deref()
            .ok_or_else(|| VibeError::Configuration("DEEZER_CLIENT_ID is not set".to_string()))
    }

    pub fn require_deezer_app(&self) -> Result<(&str, &str)> {
        match (self.deezer_app_id.as_deref(), self.deezer_secret.as_deref()) {
            (Some(app_id), Some(secret)) => Ok((app_id, secret)),
            _ => Err(VibeError::Configuration(
                "DEEZER_CLIENT_ID and DEEZER_CLIENT_SECRET must both be set".to_string(),
            )),
        }
    }
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|name| std::env::var(name).ok())
}
