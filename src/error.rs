//! Error types for catalog access and playlist analysis

use thiserror::Error;

/// Failures reported by a [`crate::client::CatalogClient`]
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Connection, DNS, TLS or I/O failure before a response was read
    #[error("Transport error: {0}")]
    Transport(String),

    /// The API answered with a non-success status
    #[error("API returned status {code}: {message}")]
    Status { code: u16, message: String },

    /// Still rate limited after the retry budget was spent
    #[error("Rate limited by the catalog API (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    /// The response body did not have the expected shape
    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// The client credentials were rejected
    #[error("Authentication failed: {0}")]
    Auth(String),
}

impl CatalogError {
    /// A record was fetched but is missing fields; callers may skip it
    pub fn is_data_shape(&self) -> bool {
        matches!(self, CatalogError::Decode(_))
    }
}

/// Which frequency table came up empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankingKind {
    Genre,
    Artist,
}

impl std::fmt::Display for RankingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RankingKind::Genre => write!(f, "genre"),
            RankingKind::Artist => write!(f, "artist"),
        }
    }
}

/// Reasons an analysis run ends in the failed state
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Not a playlist identifier: '{0}'")]
    InvalidPlaylistId(String),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Playlist has no cover image")]
    MissingCover,

    #[error("No {0} data to rank")]
    EmptyRanking(RankingKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_decode_errors_are_data_shape() {
        let decode = serde_json::from_str::<u32>("\"x\"").unwrap_err();
        assert!(CatalogError::Decode(decode).is_data_shape());
        assert!(!CatalogError::Transport("reset".into()).is_data_shape());
        assert!(
            !CatalogError::Status {
                code: 404,
                message: "Not found".into()
            }
            .is_data_shape()
        );
    }

    #[test]
    fn test_empty_ranking_message_names_kind() {
        let err = AnalysisError::EmptyRanking(RankingKind::Genre);
        assert_eq!(err.to_string(), "No genre data to rank");
    }
}
