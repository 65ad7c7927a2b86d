use std::fmt;

use url::Url;

use crate::error::AnalysisError;

/// A validated Spotify playlist id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaylistId(String);

impl PlaylistId {
    /// Parse a bare id, a `spotify:playlist:` URI or an open.spotify.com link
    pub fn parse(input: &str) -> Result<Self, AnalysisError> {
        let input = input.trim();
        let invalid = || AnalysisError::InvalidPlaylistId(input.to_string());

        let candidate = if let Some(rest) = input.strip_prefix("spotify:") {
            // spotify:playlist:<id> and the older spotify:user:<name>:playlist:<id>
            let parts: Vec<&str> = rest.split(':').collect();
            match parts.as_slice() {
                ["playlist", id] | ["user", _, "playlist", id] => id.to_string(),
                _ => return Err(invalid()),
            }
        } else if input.contains("://") {
            let url = Url::parse(input).map_err(|_| invalid())?;
            let on_spotify = url
                .host_str()
                .is_some_and(|host| host == "spotify.com" || host.ends_with(".spotify.com"));
            if !on_spotify {
                return Err(invalid());
            }
            let mut segments = url.path_segments().ok_or_else(invalid)?;
            if segments.find(|segment| *segment == "playlist").is_none() {
                return Err(invalid());
            }
            segments.next().ok_or_else(invalid)?.to_string()
        } else {
            input.to_string()
        };

        if is_base62(&candidate) {
            Ok(PlaylistId(candidate))
        } else {
            Err(invalid())
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlaylistId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn is_base62(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_alphanumeric())
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: &str = "37i9dQZF1DXcBWIGoYBM5M";

    #[test]
    fn test_bare_id() {
        assert_eq!(PlaylistId::parse(ID).unwrap().as_str(), ID);
        assert_eq!(PlaylistId::parse(&format!("  {ID}\n")).unwrap().as_str(), ID);
    }

    #[test]
    fn test_uri_forms() {
        let uri = format!("spotify:playlist:{ID}");
        assert_eq!(PlaylistId::parse(&uri).unwrap().as_str(), ID);

        let legacy = format!("spotify:user:someone:playlist:{ID}");
        assert_eq!(PlaylistId::parse(&legacy).unwrap().as_str(), ID);

        assert!(PlaylistId::parse(&format!("spotify:track:{ID}")).is_err());
    }

    #[test]
    fn test_share_links() {
        let link = format!("https://open.spotify.com/playlist/{ID}?si=abc123");
        assert_eq!(PlaylistId::parse(&link).unwrap().as_str(), ID);

        let localized = format!("https://open.spotify.com/intl-de/playlist/{ID}");
        assert_eq!(PlaylistId::parse(&localized).unwrap().as_str(), ID);
    }

    #[test]
    fn test_rejects_other_links_and_garbage() {
        assert!(PlaylistId::parse(&format!("https://example.com/playlist/{ID}")).is_err());
        assert!(PlaylistId::parse(&format!("https://notspotify.com/playlist/{ID}")).is_err());
        assert!(PlaylistId::parse(&format!("https://open.spotify.com/album/{ID}")).is_err());
        assert!(PlaylistId::parse("not-a-real-playlist").is_err());
        assert!(PlaylistId::parse("").is_err());
    }
}
