use std::fmt::Write;

use super::orchestrator::{PlaylistReport, QueryOutcome};

/// What the user currently sees: the last successful report and a warning line
#[derive(Debug, Default)]
pub struct Dashboard {
    report: Option<PlaylistReport>,
    warning: String,
}

impl Dashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply an outcome. Failures only touch the warning; earlier results stay visible.
    pub fn apply(&mut self, outcome: QueryOutcome) {
        match outcome {
            QueryOutcome::Idle => {}
            QueryOutcome::Success(report) => {
                self.report = Some(report);
                self.warning.clear();
            }
            QueryOutcome::Failed { message } => self.warning = message,
        }
    }

    pub fn report(&self) -> Option<&PlaylistReport> {
        self.report.as_ref()
    }

    pub fn warning(&self) -> &str {
        &self.warning
    }

    pub fn render(&self) -> String {
        let mut out = String::new();

        if !self.warning().is_empty() {
            let _ = writeln!(out, "! {}", self.warning());
        }

        let Some(report) = self.report() else {
            return out;
        };

        let _ = writeln!(out, "{}", report.name);
        let _ = writeln!(out, "{}", "=".repeat(report.name.chars().count()));
        match &report.owner_url {
            Some(url) => {
                let _ = writeln!(out, "by {} <{}>", report.owner_name, url);
            }
            None => {
                let _ = writeln!(out, "by {}", report.owner_name);
            }
        }
        if let Some(description) = &report.description {
            let _ = writeln!(out, "{description}");
        }
        let _ = writeln!(out, "Cover: {}", report.image_url);
        let _ = writeln!(out);
        let _ = writeln!(out, "Top Genre: {}", report.top_genre.to_uppercase());
        let _ = writeln!(out, "Top Artist: {}", report.top_artist.to_uppercase());
        let _ = writeln!(out, "Likes: {}", report.followers);
        let _ = writeln!(out);

        let _ = writeln!(out, "Genres:");
        for (i, entry) in report.top_genres.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", i + 1, entry.label, entry.count);
        }
        let _ = writeln!(out, "Artists:");
        for (i, entry) in report.top_artists.iter().enumerate() {
            let _ = writeln!(out, "  {}. {} ({})", i + 1, entry.label, entry.count);
        }

        let _ = writeln!(
            out,
            "Tracks: {} analysed, {} skipped | Avg popularity: track {:.1}, artist {:.1}",
            report.tracks_analysed,
            report.tracks_skipped,
            report.mean_track_popularity,
            report.mean_artist_popularity
        );

        out
    }
}
