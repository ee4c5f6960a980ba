use std::env;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub sync: SyncConfig,
    pub upload: UploadConfig,
}

/// Application API connection settings
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL of the board REST API
    pub base_url: String,
    /// Bearer token attached to every API request
    pub auth_token: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
}

/// Background board-refresh settings
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Interval between poll ticks
    pub poll_interval_secs: u64,
}

/// Upload protocol settings
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// How long to hold the 100% progress state after a successful batch
    /// before clearing form state and triggering a board reload
    pub success_hold_ms: u64,
    /// Maximum accepted size for a single file, in bytes
    pub max_file_size: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, String> {
        // Load .env file if exists, ignore if not found (optional for production)
        if let Err(e) = dotenvy::dotenv() {
            if !e.to_string().contains("not found") {
                eprintln!("Warning: Error loading .env file: {}", e);
            }
        }

        Ok(Config {
            api: ApiConfig::from_env()?,
            sync: SyncConfig::from_env()?,
            upload: UploadConfig::from_env()?,
        })
    }
}

impl ApiConfig {
    const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let base_url = env::var("API_BASE_URL").map_err(|_| "API_BASE_URL must be set".to_string())?;
        let auth_token = env::var("API_AUTH_TOKEN").unwrap_or_default();

        let request_timeout_secs = env::var("API_REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_REQUEST_TIMEOUT_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "API_REQUEST_TIMEOUT_SECS must be a valid number".to_string())?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            auth_token,
            request_timeout_secs,
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl SyncConfig {
    /// Poll tick is a consistency backstop, not the primary update path
    const DEFAULT_POLL_INTERVAL_SECS: u64 = 30;

    pub fn from_env() -> Result<Self, String> {
        let poll_interval_secs = env::var("BOARD_POLL_INTERVAL_SECS")
            .unwrap_or_else(|_| Self::DEFAULT_POLL_INTERVAL_SECS.to_string())
            .parse::<u64>()
            .map_err(|_| "BOARD_POLL_INTERVAL_SECS must be a valid number".to_string())?;

        Ok(Self { poll_interval_secs })
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }
}

impl UploadConfig {
    const DEFAULT_SUCCESS_HOLD_MS: u64 = 1200;
    const DEFAULT_MAX_FILE_SIZE: u64 = 2 * 1024 * 1024 * 1024; // 2GB (clips archives)

    pub fn from_env() -> Result<Self, String> {
        let success_hold_ms = env::var("UPLOAD_SUCCESS_HOLD_MS")
            .unwrap_or_else(|_| Self::DEFAULT_SUCCESS_HOLD_MS.to_string())
            .parse::<u64>()
            .map_err(|_| "UPLOAD_SUCCESS_HOLD_MS must be a valid number".to_string())?;

        let max_file_size = env::var("UPLOAD_MAX_FILE_SIZE")
            .unwrap_or_else(|_| Self::DEFAULT_MAX_FILE_SIZE.to_string())
            .parse::<u64>()
            .map_err(|_| "UPLOAD_MAX_FILE_SIZE must be a valid number".to_string())?;

        Ok(Self {
            success_hold_ms,
            max_file_size,
        })
    }

    pub fn success_hold(&self) -> Duration {
        Duration::from_millis(self.success_hold_ms)
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: Self::DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            success_hold_ms: Self::DEFAULT_SUCCESS_HOLD_MS,
            max_file_size: Self::DEFAULT_MAX_FILE_SIZE,
        }
    }
}
