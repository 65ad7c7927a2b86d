use anyhow::{Context, Result, anyhow};

const DEFAULT_API_URL: &str = "https://api.spotify.com/v1";
const DEFAULT_ACCOUNTS_URL: &str = "https://accounts.spotify.com";
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub client_id: String,
    pub client_secret: String,
    pub api_url: String,
    pub accounts_url: String,
    pub timeout_secs: u64,
}

/// Load configuration from `.env` and environment
pub fn load_config() -> Result<Config> {
    // Load `.env` file if present
    dotenv::dotenv().ok();
    Config::from_lookup(|key| std::env::var(key).ok())
}

impl Config {
    /// Build a configuration from any key lookup (the process environment in production)
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // `cid` / `secret` are the names older deployments used in their .env
        let client_id = non_empty("SPOTIFY_CLIENT_ID")
            .or_else(|| non_empty("cid"))
            .ok_or_else(|| anyhow!("SPOTIFY_CLIENT_ID is not set"))?;
        let client_secret = non_empty("SPOTIFY_CLIENT_SECRET")
            .or_else(|| non_empty("secret"))
            .ok_or_else(|| anyhow!("SPOTIFY_CLIENT_SECRET is not set"))?;

        let api_url = non_empty("SPOTIFY_API_URL").unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let accounts_url = non_empty("SPOTIFY_ACCOUNTS_URL")
            .unwrap_or_else(|| DEFAULT_ACCOUNTS_URL.to_string());

        let timeout_secs = match non_empty("SPOTIFY_TIMEOUT_SECS") {
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .with_context(|| format!("SPOTIFY_TIMEOUT_SECS must be a number, got '{raw}'"))?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Config {
            client_id,
            client_secret,
            api_url: api_url.trim_end_matches('/').to_string(),
            accounts_url: accounts_url.trim_end_matches('/').to_string(),
            timeout_secs,
        })
    }
}
