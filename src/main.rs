use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

mod analysis;
mod client;
mod config;
mod error;
mod models;
mod playlist_id;


use crate::analysis::{Analyser, Dashboard, EnrichOptions, QueryOutcome};
use crate::client::SpotifyClient;
use crate::config::load_config;

#[derive(Parser)]
#[command(name = "spotilyse")]
#[command(about = "Analyse a Spotify playlist's top genres and artists")]
#[command(version)]
struct Args {
    /// Playlist links, URIs or ids; read one per line from stdin when omitted
    playlists: Vec<String>,

    /// Look up each artist once per run instead of once per track
    #[arg(long = "cache-artists")]
    cache_artists: bool,

    /// Print each outcome as JSON instead of the dashboard
    #[arg(long)]
    json: bool,

    /// Quiet mode - only log warnings
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.quiet { "spotilyse=warn" } else { "spotilyse=info" };
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into()))
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    // Load credentials from .env
    let config = load_config().context("Failed to load Spotify credentials")?;

    // One client for the whole process; it caches the access token between runs
    let client = SpotifyClient::new(config);
    let analyser = Analyser::new(
        &client,
        EnrichOptions {
            cache_artists: args.cache_artists,
        },
    );
    let mut dashboard = Dashboard::new();

    if args.playlists.is_empty() {
        info!("Reading playlists from stdin");
        let stdin = io::stdin();
        prompt()?;
        for line in stdin.lock().lines() {
            let line = line.context("Failed to read from stdin")?;
            let outcome = analyser.submit(Some(&line));
            show(&mut dashboard, outcome, args.json)?;
            prompt()?;
        }
    } else {
        for playlist in &args.playlists {
            let outcome = analyser.submit(Some(playlist));
            show(&mut dashboard, outcome, args.json)?;
        }
    }

    Ok(())
}

fn prompt() -> Result<()> {
    let mut stderr = io::stderr();
    write!(stderr, "Paste Your Spotify Playlist URL Here: ")?;
    stderr.flush()?;
    Ok(())
}

fn show(dashboard: &mut Dashboard, outcome: QueryOutcome, json: bool) -> Result<()> {
    if matches!(outcome, QueryOutcome::Idle) {
        return Ok(());
    }

    if json {
        println!("{}", serde_json::to_string(&outcome)?);
    }
    dashboard.apply(outcome);
    if !json {
        println!("{}", dashboard.render());
    }
    Ok(())
}
