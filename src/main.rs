use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use std::io::BufRead;

mod commands;
mod config;
mod console;
mod crossfilter;
mod loader;
mod models;


use crate::commands::{apply_command, describe_filters, parse_command};
use crate::config::load_config;
use crate::console::ConsoleNotifier;
use crate::crossfilter::{CrossfilterSession, EngineConfig, ViewNotifier};
use crate::loader::CsvTrackSource;

#[derive(Parser)]
#[command(name = "track-crossfilter")]
#[command(about = "Cross-filter clustered tracks by cluster, release date, genre and artist")]
#[command(version)]
struct Args {
    /// Path to the clustered PCA track CSV (falls back to CROSSFILTER_DATA)
    #[arg(short = 'd', long = "data")]
    data: Option<String>,

    /// Engine settings JSON (falls back to CROSSFILTER_SETTINGS)
    #[arg(short = 's', long = "settings")]
    settings: Option<String>,

    /// Select a cluster
    #[arg(short = 'c', long = "cluster")]
    cluster: Option<u32>,

    /// Start of the release-date range (YYYY-MM-DD)
    #[arg(long = "from", requires = "to")]
    from: Option<NaiveDate>,

    /// End of the release-date range (YYYY-MM-DD)
    #[arg(long = "to", requires = "from")]
    to: Option<NaiveDate>,

    /// Toggle a genre (repeatable)
    #[arg(short = 'g', long = "genre")]
    genres: Vec<String>,

    /// Toggle an artist (repeatable)
    #[arg(short = 'a', long = "artist")]
    artists: Vec<String>,

    /// Keep reading filter commands from stdin
    #[arg(short = 'i', long = "interactive")]
    interactive: bool,

    /// Print aggregates as JSON
    #[arg(long = "json")]
    json: bool,

    /// Quiet mode - only print track counts
    #[arg(short = 'q', long = "quiet")]
    quiet: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    // Load configuration from .env
    let env = load_config();

    let data_path = args
        .data
        .or(env.data_path)
        .context("No track data given; pass --data or set CROSSFILTER_DATA")?;

    let engine_config = match args.settings.or(env.settings_path) {
        Some(path) => EngineConfig::load_from_file(&path)?,
        None => EngineConfig::default(),
    };

    let source = CsvTrackSource::new(&data_path);
    let notifier = ConsoleNotifier::new(args.quiet, args.json);
    let mut session = CrossfilterSession::open(&source, engine_config, notifier)
        .with_context(|| format!("Failed to load tracks from {data_path}"))?;
    if session.store().is_empty() {
        log::warn!("{data_path} holds no tracks; every view will be empty");
    }

    if let Some(cluster) = args.cluster {
        session.set_cluster(Some(cluster));
    }
    if let (Some(from), Some(to)) = (args.from, args.to) {
        session.select_dates(from, to)?;
    }
    for genre in &args.genres {
        session.toggle_genre(genre);
    }
    for artist in &args.artists {
        session.toggle_artist(artist);
    }
    print_filter_status(&session);

    if args.interactive {
        println!("\nType 'help' for commands.");
        for line in std::io::stdin().lock().lines() {
            let line = line.context("reading command")?;
            if line.trim().is_empty() {
                continue;
            }
            let command = match parse_command(&line) {
                Ok(command) => command,
                Err(message) => {
                    eprintln!("{message}");
                    continue;
                }
            };
            match apply_command(&mut session, command) {
                Ok(true) => print_filter_status(&session),
                Ok(false) => break,
                Err(e) => eprintln!("{e}"),
            }
        }
    }

    Ok(())
}

fn print_filter_status<N: ViewNotifier>(session: &CrossfilterSession<N>) {
    if !session.has_active_filters() {
        return;
    }
    if let Some(summary) = describe_filters(session.state()) {
        println!("Active filters: {summary} (type 'reset' to clear)");
    }
}
