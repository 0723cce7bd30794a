//! League Fixtures command-line host.
//!
//! Loads the season file named by `SEASON_FILE`, builds the fixture service
//! once, and answers a single query as JSON on stdout:
//!
//! ```text
//! league-fixtures list <league>
//! league-fixtures team <team> [league]
//! league-fixtures find <id>
//! league-fixtures summary
//! ```

use anyhow::{bail, Context, Result};
use serde::Serialize;
use tracing::{info, info_span, warn};

use league_fixtures::config::FixturesConfig;
use league_fixtures::fixtures::FixtureService;
use league_fixtures::logging;
use league_fixtures::season::SeasonFile;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct LeagueSummary<'a> {
    league_id: &'a str,
    teams: usize,
    fixtures: usize,
    merged: usize,
    dropped: usize,
}

fn usage() -> &'static str {
    "usage: league-fixtures <list <league> | team <team> [league] | find <id> | summary>"
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn main() -> Result<()> {
    // Load .env before reading any configuration
    dotenvy::dotenv().ok();

    let _log_guard = logging::init_logging();
    let run_id = logging::get_run_id();

    let config = FixturesConfig::from_env();
    let root_span = info_span!(
        "league_fixtures",
        run_id = %run_id,
        season_file = %config.season_file,
        leagues = ?config.leagues,
    );
    let _enter = root_span.enter();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let Some(command) = args.first() else {
        bail!(usage());
    };

    let season = SeasonFile::load_from(&config.season_file)
        .context("loading season definition")?
        .into_definition(config.placeholder_time);
    let service = FixtureService::build(&season, &config).context("building fixture service")?;

    match (command.as_str(), &args[1..]) {
        ("list", [league]) => print_json(&service.master_fixtures(league)),
        ("team", [team]) => print_json(&service.fixtures_for_team(team, None)),
        ("team", [team, league]) => {
            print_json(&service.fixtures_for_team(team, Some(league.as_str())))
        }
        ("find", [id]) => match service.find_match_by_id(id) {
            Some(view) => print_json(&view),
            None => {
                warn!(id = %id, "No fixture matches identifier");
                std::process::exit(2);
            }
        },
        ("summary", []) => {
            let summary: Vec<LeagueSummary> = service
                .leagues()
                .iter()
                .map(|l| LeagueSummary {
                    league_id: &l.league_id,
                    teams: l.registry.len(),
                    fixtures: l.fixtures.len(),
                    merged: l.merged,
                    dropped: l.dropped.len(),
                })
                .collect();
            info!(leagues = summary.len(), "Season summary");
            print_json(&summary)
        }
        _ => bail!(usage()),
    }
}
