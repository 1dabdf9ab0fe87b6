//! `sync`: materialize every completed gameweek that is not yet stored.

use serde::Serialize;
use std::collections::BTreeSet;
use tracing::{error, info};

use super::common::{CommandResources, RunContext};
use crate::{
    cli::{
        types::{GameweekNumber, SeasonLabel},
        GlobalArgs,
    },
    config::PipelineConfig,
    error::Result,
    fpl::FplSource,
    pipeline::{materialize, missing_gameweeks, normalize, reconcile},
    storage::{ArtifactStore, WriteOutcome},
};

/// A gameweek that could not be materialized, with the reason.
#[derive(Debug, Clone, Serialize)]
pub struct GameweekFailure {
    pub gameweek: GameweekNumber,
    pub error: String,
}

/// What one `sync` run did, gameweek by gameweek.
#[derive(Debug, Clone, Serialize)]
pub struct SyncReport {
    pub season: SeasonLabel,
    pub last_completed: Option<GameweekNumber>,
    pub written: Vec<GameweekNumber>,
    /// Completed gameweeks that already had an artifact.
    pub skipped: Vec<GameweekNumber>,
    pub failed: Vec<GameweekFailure>,
}

impl SyncReport {
    fn new(season: SeasonLabel, last_completed: Option<GameweekNumber>) -> Self {
        Self {
            season,
            last_completed,
            written: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Run the pipeline for every missing gameweek, in ascending order.
///
/// Season resolution and reference-table failures abort before any gameweek
/// is attempted. After that, a gameweek-local failure is recorded in the
/// report and the next gameweek is processed.
pub async fn run_sync<S, A>(source: &S, store: &mut A, config: PipelineConfig) -> Result<SyncReport>
where
    S: FplSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    let bootstrap = source.fetch_bootstrap().await?;
    let ctx = RunContext::from_bootstrap(&bootstrap, config)?;
    drop(bootstrap);

    let mut report = SyncReport::new(ctx.season, ctx.last_completed);
    let Some(last_completed) = ctx.last_completed else {
        info!(season = %ctx.season, "season has not started; nothing to do");
        return Ok(report);
    };

    let existing: BTreeSet<GameweekNumber> = store.existing(&ctx.season)?;
    report.skipped = last_completed
        .up_to()
        .filter(|gw| existing.contains(gw))
        .collect();

    let missing = missing_gameweeks(last_completed, &existing);
    info!(
        season = %ctx.season,
        missing = missing.len(),
        stored = report.skipped.len(),
        "starting sync"
    );

    for gameweek in missing {
        match sync_gameweek(source, store, &ctx, gameweek).await {
            Ok(WriteOutcome::Written) => {
                info!(gameweek = gameweek.as_u8(), "gameweek materialized");
                report.written.push(gameweek);
            }
            Ok(WriteOutcome::AlreadyPresent) => {
                info!(gameweek = gameweek.as_u8(), "gameweek already stored by another run");
                report.skipped.push(gameweek);
            }
            Err(e) if e.is_gameweek_local() => {
                error!(gameweek = gameweek.as_u8(), error = %e, "gameweek failed; continuing");
                report.failed.push(GameweekFailure {
                    gameweek,
                    error: e.to_string(),
                });
            }
            Err(e) => return Err(e),
        }
    }

    report.skipped.sort();
    Ok(report)
}

/// Fetch, normalize, reconcile and materialize one gameweek.
///
/// Existence is re-checked first so a gameweek stored since the run started
/// costs no fetch.
async fn sync_gameweek<S, A>(
    source: &S,
    store: &mut A,
    ctx: &RunContext,
    gameweek: GameweekNumber,
) -> Result<WriteOutcome>
where
    S: FplSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    if store.exists(&ctx.season, gameweek)? {
        return Ok(WriteOutcome::AlreadyPresent);
    }

    let payload = source.fetch_gameweek(gameweek).await?;
    let records = normalize(gameweek, &payload)?;
    let records = reconcile(records, &ctx.config.summed_fields)?;

    materialize(store, &ctx.season, gameweek, &records, &ctx.reference, &ctx.config)
}

/// Handle `fpl-gameweek sync`.
pub async fn handle_sync(args: &GlobalArgs) -> Result<SyncReport> {
    let CommandResources {
        config,
        client,
        mut store,
    } = CommandResources::open(args)?;

    let report = run_sync(&client, store.as_mut(), config).await?;
    print_sync_report(&report, &store.location());
    Ok(report)
}

fn print_sync_report(report: &SyncReport, location: &str) {
    println!("Season {}", report.season);
    match report.last_completed {
        Some(gw) => println!("Last completed gameweek: {}", gw),
        None => println!("Season has not started yet"),
    }
    println!("Store: {}", location);
    println!(
        "Written: {} | Already stored: {} | Failed: {}",
        report.written.len(),
        report.skipped.len(),
        report.failed.len()
    );
    for gw in &report.written {
        println!("  ✓ Gameweek {}", gw);
    }
    for failure in &report.failed {
        println!("  ✗ Gameweek {}: {}", failure.gameweek, failure.error);
    }
}
