use anyhow::Result;
use chrono::NaiveDate;

use crate::crossfilter::{CrossfilterSession, FilterState, ViewNotifier};
use crate::models::ClusterId;

/// One line of interactive input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Cluster(Option<ClusterId>),
    Dates(Option<(NaiveDate, NaiveDate)>),
    Genre(String),
    Artist(String),
    Reset,
    Options(Option<String>),
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  cluster <id|none>        select a cluster or clear it
  dates <from> <to>        keep releases within YYYY-MM-DD .. YYYY-MM-DD
  dates none               clear the date range
  genre <name>             toggle a genre
  artist <name>            toggle an artist
  options [query]          list genres and artists for the current cluster
  reset                    clear every filter
  quit";

/// Parse an interactive command; the error is a message for the user
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    let (keyword, rest) = match line.split_once(char::is_whitespace) {
        Some((keyword, rest)) => (keyword, rest.trim()),
        None => (line, ""),
    };

    match keyword.to_lowercase().as_str() {
        "cluster" => match rest {
            "" => Err("cluster needs an id or 'none'".to_string()),
            "none" => Ok(Command::Cluster(None)),
            id => id
                .parse::<ClusterId>()
                .map(|id| Command::Cluster(Some(id)))
                .map_err(|_| format!("'{id}' is not a cluster id")),
        },
        "dates" => {
            if rest == "none" {
                return Ok(Command::Dates(None));
            }
            let bounds: Vec<&str> = rest.split_whitespace().collect();
            let [from, to] = bounds.as_slice() else {
                return Err("dates needs <from> <to> or 'none'".to_string());
            };
            Ok(Command::Dates(Some((parse_date(from)?, parse_date(to)?))))
        }
        "genre" if !rest.is_empty() => Ok(Command::Genre(rest.to_string())),
        "artist" if !rest.is_empty() => Ok(Command::Artist(rest.to_string())),
        "genre" | "artist" => Err(format!("{keyword} needs a name")),
        "options" => Ok(Command::Options((!rest.is_empty()).then(|| rest.to_string()))),
        "reset" => Ok(Command::Reset),
        "help" | "?" => Ok(Command::Help),
        "quit" | "exit" => Ok(Command::Quit),
        "" => Err("empty command".to_string()),
        other => Err(format!("unknown command '{other}' (try 'help')")),
    }
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| format!("'{raw}' is not a YYYY-MM-DD date"))
}

/// Run a command against the session. Returns `false` once the user quits.
pub fn apply_command<N: ViewNotifier>(session: &mut CrossfilterSession<N>, command: Command) -> Result<bool> {
    match command {
        Command::Cluster(cluster) => session.set_cluster(cluster),
        Command::Dates(None) => session.set_date_range(None),
        Command::Dates(Some((from, to))) => session.select_dates(from, to)?,
        Command::Genre(genre) => session.toggle_genre(&genre),
        Command::Artist(artist) => session.toggle_artist(&artist),
        Command::Reset => session.reset(),
        Command::Options(query) => {
            let options = session.filter_options();
            let options = match query {
                Some(query) => options.search(&query),
                None => options,
            };
            println!("Genres ({}): {}", options.genres.len(), options.genres.join(", "));
            println!("Artists ({}): {}", options.artists.len(), options.artists.join(", "));
        }
        Command::Help => println!("{HELP}"),
        Command::Quit => return Ok(false),
    }
    Ok(true)
}

/// One-line summary of the active filters, `None` when nothing is narrowed
pub fn describe_filters(state: &FilterState) -> Option<String> {
    if !state.has_active_filters() {
        return None;
    }
    let mut parts = Vec::new();
    if let Some(cluster) = state.cluster {
        parts.push(format!("cluster {cluster}"));
    }
    if let Some(range) = state.date_range {
        parts.push(format!("released {} .. {}", range.start(), range.end()));
    }
    if !state.genres.is_empty() {
        parts.push(format!("genres {}", state.genres.iter().cloned().collect::<Vec<_>>().join(" | ")));
    }
    if !state.artists.is_empty() {
        parts.push(format!("artists {}", state.artists.iter().cloned().collect::<Vec<_>>().join(" | ")));
    }
    Some(parts.join("; "))
}
