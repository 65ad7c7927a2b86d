use serde::Serialize;
use tracing::{info, warn};

use super::collector::{PAGE_SIZE, collect_tracks};
use super::enrichment::{EnrichOptions, enrich_tracks};
use super::ranking::{rank_artists, rank_genres};
use crate::client::{CatalogClient, PLAYLIST_FIELDS};
use crate::error::{AnalysisError, RankingKind};
use crate::models::{EnrichedTrack, RankEntry};
use crate::playlist_id::PlaylistId;

/// The only message shown when a run fails, whatever the cause
pub const WARNING_MESSAGE: &str = "Playlist does not exist!";

/// Everything a successful run reports about a playlist
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaylistReport {
    pub name: String,
    pub description: Option<String>,
    pub followers: u64,
    pub owner_name: String,
    pub owner_url: Option<String>,
    pub image_url: String,
    pub top_genre: String,
    pub top_artist: String,
    pub top_genres: Vec<RankEntry>,
    pub top_artists: Vec<RankEntry>,
    pub tracks_analysed: usize,
    pub tracks_skipped: usize,
    pub mean_track_popularity: f64,
    pub mean_artist_popularity: f64,
}

/// Result of one submission
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum QueryOutcome {
    /// Nothing was submitted; leave the display untouched
    Idle,
    Success(PlaylistReport),
    /// Carries no field updates, only the warning
    Failed { message: String },
}

/// Runs the analysis pipeline against a catalog
pub struct Analyser<'a, C: CatalogClient + ?Sized> {
    client: &'a C,
    options: EnrichOptions,
}

impl<'a, C: CatalogClient + ?Sized> Analyser<'a, C> {
    pub fn new(client: &'a C, options: EnrichOptions) -> Self {
        Self { client, options }
    }

    /// Handle one submission from the user.
    ///
    /// Absent or blank input is a no-op. Every failure collapses into
    /// [`WARNING_MESSAGE`]; the underlying cause is only logged.
    pub fn submit(&self, input: Option<&str>) -> QueryOutcome {
        let Some(input) = input.map(str::trim).filter(|s| !s.is_empty()) else {
            return QueryOutcome::Idle;
        };

        match self.analyse(input) {
            Ok(report) => {
                info!(
                    "Analysed '{}': top genre {}, top artist {}",
                    report.name, report.top_genre, report.top_artist
                );
                QueryOutcome::Success(report)
            }
            Err(e) => {
                warn!("Analysis of '{input}' failed: {e}");
                QueryOutcome::Failed {
                    message: WARNING_MESSAGE.to_string(),
                }
            }
        }
    }

    /// Fetch, enrich and rank a playlist
    pub fn analyse(&self, input: &str) -> Result<PlaylistReport, AnalysisError> {
        let id = PlaylistId::parse(input)?;
        info!("Analysing playlist {id}");

        let meta = self.client.get_playlist(id.as_str(), PLAYLIST_FIELDS)?;
        let image_url = meta.cover_url().ok_or(AnalysisError::MissingCover)?.to_string();

        let entries = collect_tracks(self.client, id.as_str(), PAGE_SIZE)?;
        info!("Collected {} entries", entries.len());

        let enrichment = enrich_tracks(self.client, &entries, self.options)?;
        if enrichment.skipped > 0 {
            info!("Skipped {} entries with missing data", enrichment.skipped);
        }
        let tracks = enrichment.tracks;

        let top_genres = rank_genres(&tracks);
        let top_genre = top_genres
            .first()
            .ok_or(AnalysisError::EmptyRanking(RankingKind::Genre))?
            .label
            .clone();

        let top_artists = rank_artists(&tracks);
        let top_artist = top_artists
            .first()
            .ok_or(AnalysisError::EmptyRanking(RankingKind::Artist))?
            .label
            .clone();

        Ok(PlaylistReport {
            name: meta.name,
            description: meta.description.filter(|d| !d.is_empty()),
            followers: meta.followers.total,
            owner_name: meta
                .owner
                .display_name
                .unwrap_or_else(|| "Unknown".to_string()),
            owner_url: meta.owner.external_urls.spotify,
            image_url,
            top_genre,
            top_artist,
            top_genres,
            top_artists,
            tracks_analysed: tracks.len(),
            tracks_skipped: enrichment.skipped,
            mean_track_popularity: mean_popularity(&tracks, |t| t.track.popularity),
            mean_artist_popularity: mean_popularity(&tracks, |t| t.artist.popularity),
        })
    }
}

fn mean_popularity(tracks: &[EnrichedTrack], popularity: impl Fn(&EnrichedTrack) -> u32) -> f64 {
    if tracks.is_empty() {
        return 0.0;
    }
    let total: u64 = tracks.iter().map(|t| popularity(t) as u64).sum();
    total as f64 / tracks.len() as f64
}
