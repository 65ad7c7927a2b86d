use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;

use crate::client::CatalogClient;
use crate::error::CatalogError;
use crate::models::{ArtistMeta, EnrichedTrack, TrackRecord};

/// Knobs for the enrichment pass
#[derive(Debug, Clone, Copy, Default)]
pub struct EnrichOptions {
    /// Reuse artist lookups within a run instead of fetching once per track
    pub cache_artists: bool,
}

/// Result of enriching a playlist's raw entries
#[derive(Debug, Default)]
pub struct Enrichment {
    pub tracks: Vec<EnrichedTrack>,
    pub skipped: usize,
}

/// Resolve each playlist entry's primary artist.
///
/// Entries or artists missing fields are skipped and counted. Any other
/// catalog failure aborts the pass.
pub fn enrich_tracks<C: CatalogClient + ?Sized>(
    client: &C,
    entries: &[Value],
    options: EnrichOptions,
) -> Result<Enrichment, CatalogError> {
    let mut enrichment = Enrichment::default();
    let mut cache: HashMap<String, Option<ArtistMeta>> = HashMap::new();

    for (index, entry) in entries.iter().enumerate() {
        let Some(track) = TrackRecord::from_playlist_item(entry) else {
            debug!("Skipping entry {index}: missing track fields");
            enrichment.skipped += 1;
            continue;
        };

        let artist = match cache.get(&track.artist_id) {
            Some(cached) => cached.clone(),
            None => {
                let fetched = match client.get_artist(&track.artist_id) {
                    Ok(artist) => Some(artist),
                    Err(e) if e.is_data_shape() => {
                        debug!("Artist {} has an unexpected shape: {e}", track.artist_id);
                        None
                    }
                    Err(e) => return Err(e),
                };
                if options.cache_artists {
                    cache.insert(track.artist_id.clone(), fetched.clone());
                }
                fetched
            }
        };

        match artist {
            Some(artist) => enrichment.tracks.push(EnrichedTrack { track, artist }),
            None => enrichment.skipped += 1,
        }
    }

    Ok(enrichment)
}
