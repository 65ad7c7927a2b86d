use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Playlist metadata as returned by `GET /playlists/{id}` with a field filter
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlaylistMeta {
    pub name: String,
    pub description: Option<String>,
    pub followers: Followers,
    pub images: Option<Vec<Image>>, // null for playlists without artwork
    pub owner: Owner,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Followers {
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    pub height: Option<u32>,
    pub width: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Owner {
    pub display_name: Option<String>,
    pub external_urls: ExternalUrls,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExternalUrls {
    pub spotify: Option<String>,
}

impl PlaylistMeta {
    /// URL of the first (largest) cover image, if any
    pub fn cover_url(&self) -> Option<&str> {
        self.images
            .as_deref()
            .and_then(|images| images.first())
            .map(|image| image.url.as_str())
    }
}

/// One page of `GET /playlists/{id}/tracks`.
///
/// Items stay untyped so a single malformed entry can be skipped without
/// failing the page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackPage {
    pub items: Vec<Value>,
}

/// Artist metadata as returned by `GET /artists/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArtistMeta {
    pub id: String,
    pub name: String,
    pub popularity: u32,
    pub genres: Vec<String>,
}

/// The fields of a playlist entry needed for analysis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrackRecord {
    pub uri: String,
    pub name: String,
    pub artist_id: String,
    pub artist_name: String,
    pub album: String,
    pub popularity: u32,
}

#[derive(Deserialize)]
struct PlaylistItem {
    track: Option<TrackObject>,
}

#[derive(Deserialize)]
struct TrackObject {
    uri: String,
    name: String,
    popularity: u32,
    album: AlbumRef,
    artists: Vec<ArtistRef>,
}

#[derive(Deserialize)]
struct AlbumRef {
    name: String,
}

#[derive(Deserialize)]
struct ArtistRef {
    id: String,
    name: String,
}

impl TrackRecord {
    /// Extract a record from a raw playlist item.
    ///
    /// Returns `None` for removed tracks (`"track": null`), local files without
    /// artist ids, items without artists, and anything else missing a field.
    pub fn from_playlist_item(item: &Value) -> Option<Self> {
        let item = PlaylistItem::deserialize(item).ok()?;
        let track = item.track?;
        let primary = track.artists.into_iter().next()?;

        Some(TrackRecord {
            uri: track.uri,
            name: track.name,
            artist_id: primary.id,
            artist_name: primary.name,
            album: track.album.name,
            popularity: track.popularity,
        })
    }
}

/// A track paired with its primary artist's metadata
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EnrichedTrack {
    pub track: TrackRecord,
    pub artist: ArtistMeta,
}

/// A label and how often it occurred
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RankEntry {
    pub label: String,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn item(artists: Value) -> Value {
        json!({
            "added_at": "2023-01-01T00:00:00Z",
            "track": {
                "uri": "spotify:track:1",
                "name": "Song",
                "popularity": 42,
                "album": { "name": "Album" },
                "artists": artists,
            }
        })
    }

    #[test]
    fn test_extracts_primary_artist() {
        let record = TrackRecord::from_playlist_item(&item(json!([
            { "id": "a1", "name": "First", "uri": "spotify:artist:a1" },
            { "id": "a2", "name": "Second", "uri": "spotify:artist:a2" },
        ])))
        .unwrap();

        assert_eq!(record.artist_id, "a1");
        assert_eq!(record.artist_name, "First");
        assert_eq!(record.album, "Album");
        assert_eq!(record.popularity, 42);
    }

    #[test]
    fn test_removed_track_is_skipped() {
        assert!(TrackRecord::from_playlist_item(&json!({ "track": null })).is_none());
    }

    #[test]
    fn test_missing_or_empty_artists_is_skipped() {
        assert!(TrackRecord::from_playlist_item(&item(json!([]))).is_none());

        let mut no_artists = item(json!([]));
        no_artists["track"]
            .as_object_mut()
            .unwrap()
            .remove("artists");
        assert!(TrackRecord::from_playlist_item(&no_artists).is_none());
    }

    #[test]
    fn test_local_file_without_artist_id_is_skipped() {
        let local = item(json!([{ "id": null, "name": "Someone" }]));
        assert!(TrackRecord::from_playlist_item(&local).is_none());
    }

    #[test]
    fn test_cover_url_uses_first_image() {
        let meta: PlaylistMeta = serde_json::from_value(json!({
            "name": "Mix",
            "description": null,
            "followers": { "total": 3 },
            "images": [{ "url": "https://i/big", "height": 640, "width": 640 },
                       { "url": "https://i/small", "height": 60, "width": 60 }],
            "owner": { "display_name": "dj", "external_urls": { "spotify": "https://o" } }
        }))
        .unwrap();
        assert_eq!(meta.cover_url(), Some("https://i/big"));

        let bare = PlaylistMeta { images: None, ..meta };
        assert_eq!(bare.cover_url(), None);
    }
}
