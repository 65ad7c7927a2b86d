use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};
use ureq::{Agent, AgentBuilder};
use urlencoding::encode;

use crate::config::Config;
use crate::error::CatalogError;
use crate::models::{ArtistMeta, PlaylistMeta, TrackPage};

/// Field filter for playlist metadata requests
pub const PLAYLIST_FIELDS: &str = "name,description,followers.total,images,owner(display_name,external_urls)";

const MAX_RATE_LIMIT_RETRIES: u32 = 3;
const MAX_RETRY_AFTER_SECS: u64 = 30;
const TOKEN_EXPIRY_LEEWAY_SECS: i64 = 60;

/// Read-only access to a music catalog
#[cfg_attr(test, mockall::automock)]
pub trait CatalogClient {
    /// Fetch playlist metadata restricted to `fields`
    fn get_playlist(&self, id: &str, fields: &str) -> Result<PlaylistMeta, CatalogError>;

    /// Fetch one page of playlist entries
    fn get_playlist_tracks(&self, id: &str, offset: u32, limit: u32)
    -> Result<TrackPage, CatalogError>;

    /// Fetch a single artist
    fn get_artist(&self, id: &str) -> Result<ArtistMeta, CatalogError>;
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: DateTime<Utc>,
}

impl AccessToken {
    fn is_fresh(&self, now: DateTime<Utc>) -> bool {
        now + TimeDelta::seconds(TOKEN_EXPIRY_LEEWAY_SECS) < self.expires_at
    }
}

/// Spotify Web API client using the client credentials grant
pub struct SpotifyClient {
    agent: Agent,
    api_url: String,
    accounts_url: String,
    client_id: String,
    client_secret: String,
    token: Mutex<Option<AccessToken>>,
}

impl SpotifyClient {
    /// Create a new client; no request is made until the first call
    pub fn new(config: Config) -> Self {
        let agent = AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .build();

        SpotifyClient {
            agent,
            api_url: config.api_url,
            accounts_url: config.accounts_url,
            client_id: config.client_id,
            client_secret: config.client_secret,
            token: Mutex::new(None),
        }
    }

    /// Return a cached access token, requesting a new one when it is about to expire
    fn access_token(&self) -> Result<String, CatalogError> {
        let mut guard = self
            .token
            .lock()
            .map_err(|_| CatalogError::Auth("token cache poisoned".to_string()))?;

        if let Some(token) = guard.as_ref().filter(|t| t.is_fresh(Utc::now())) {
            return Ok(token.value.clone());
        }

        let token = self.request_token()?;
        let value = token.value.clone();
        *guard = Some(token);
        Ok(value)
    }

    fn request_token(&self) -> Result<AccessToken, CatalogError> {
        let url = format!("{}/api/token", self.accounts_url);
        debug!("Requesting access token from {url}");

        let response = self
            .agent
            .post(&url)
            .send_form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .map_err(|e| match e {
                ureq::Error::Status(code, response) => CatalogError::Auth(format!(
                    "token endpoint returned {code}: {}",
                    response.into_string().unwrap_or_default()
                )),
                ureq::Error::Transport(t) => CatalogError::Transport(t.to_string()),
            })?;

        let body = response
            .into_string()
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let parsed: TokenResponse = serde_json::from_str(&body)
            .map_err(|e| CatalogError::Auth(format!("malformed token response: {e}")))?;

        info!("Obtained access token valid for {}s", parsed.expires_in);
        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: Utc::now() + TimeDelta::seconds(parsed.expires_in),
        })
    }

    fn forget_token(&self) {
        if let Ok(mut guard) = self.token.lock() {
            *guard = None;
        }
    }

    /// GET a JSON resource, retrying on 429 and once on 401
    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, CatalogError> {
        let url = format!("{}{}", self.api_url, path);
        let mut rate_limit_retries = 0;
        let mut reauthenticated = false;

        loop {
            let token = self.access_token()?;
            let mut request = self
                .agent
                .get(&url)
                .set("Authorization", &format!("Bearer {token}"));
            for (key, value) in query {
                request = request.query(key, value);
            }

            debug!("GET {url} {query:?}");
            match request.call() {
                Ok(response) => {
                    let body = response
                        .into_string()
                        .map_err(|e| CatalogError::Transport(e.to_string()))?;
                    return Ok(serde_json::from_str(&body)?);
                }
                Err(ureq::Error::Status(429, response)) => {
                    let retry_after = parse_retry_after(response.header("Retry-After"));
                    if rate_limit_retries >= MAX_RATE_LIMIT_RETRIES {
                        return Err(CatalogError::RateLimited {
                            retry_after_secs: retry_after,
                        });
                    }
                    rate_limit_retries += 1;
                    warn!(
                        "Rate limited on {path}, retrying in {retry_after}s ({rate_limit_retries}/{MAX_RATE_LIMIT_RETRIES})"
                    );
                    std::thread::sleep(Duration::from_secs(retry_after));
                }
                Err(ureq::Error::Status(401, _)) if !reauthenticated => {
                    warn!("Access token rejected, requesting a new one");
                    reauthenticated = true;
                    self.forget_token();
                }
                Err(ureq::Error::Status(code, response)) => {
                    let body = response.into_string().unwrap_or_default();
                    return Err(CatalogError::Status {
                        code,
                        message: error_message(&body),
                    });
                }
                Err(ureq::Error::Transport(t)) => {
                    return Err(CatalogError::Transport(t.to_string()));
                }
            }
        }
    }
}

impl CatalogClient for SpotifyClient {
    fn get_playlist(&self, id: &str, fields: &str) -> Result<PlaylistMeta, CatalogError> {
        self.get_json(
            &format!("/playlists/{}", encode(id)),
            &[("fields", fields.to_string())],
        )
    }

    fn get_playlist_tracks(
        &self,
        id: &str,
        offset: u32,
        limit: u32,
    ) -> Result<TrackPage, CatalogError> {
        self.get_json(
            &format!("/playlists/{}/tracks", encode(id)),
            &[
                ("offset", offset.to_string()),
                ("limit", limit.to_string()),
                ("additional_types", "track".to_string()),
            ],
        )
    }

    fn get_artist(&self, id: &str) -> Result<ArtistMeta, CatalogError> {
        self.get_json(&format!("/artists/{}", encode(id)), &[])
    }
}

/// Seconds to wait from a `Retry-After` header, clamped to `1..=MAX_RETRY_AFTER_SECS`
fn parse_retry_after(header: Option<&str>) -> u64 {
    header
        .and_then(|value| value.trim().parse::<u64>().ok())
        .unwrap_or(1)
        .clamp(1, MAX_RETRY_AFTER_SECS)
}

/// Pull `error.message` out of a Spotify error body, falling back to the raw body
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.trim().to_string())
}
