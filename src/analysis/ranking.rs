use crate::models::{EnrichedTrack, RankEntry};

/// Number of entries kept in each ranking
pub const TOP_N: usize = 5;

/// Count occurrences of each label and keep the `n` most frequent.
///
/// Labels are sorted before grouping and the count sort is stable, so equal
/// counts stay in lexicographic order.
pub fn rank_labels(mut labels: Vec<String>, n: usize) -> Vec<RankEntry> {
    labels.sort();

    let mut ranked: Vec<RankEntry> = labels
        .chunk_by(|a, b| a == b)
        .map(|group| RankEntry {
            label: group[0].clone(),
            count: group.len(),
        })
        .collect();

    ranked.sort_by(|a, b| b.count.cmp(&a.count));
    ranked.truncate(n);
    ranked
}

/// Top genres across the primary artists of all tracks
pub fn rank_genres(tracks: &[EnrichedTrack]) -> Vec<RankEntry> {
    let genres = tracks
        .iter()
        .flat_map(|t| t.artist.genres.iter().cloned())
        .collect();
    rank_labels(genres, TOP_N)
}

/// Top artists, counting one occurrence per track
pub fn rank_artists(tracks: &[EnrichedTrack]) -> Vec<RankEntry> {
    let artists = tracks.iter().map(|t| t.track.artist_name.clone()).collect();
    rank_labels(artists, TOP_N)
}
