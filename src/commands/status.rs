//! `status`: where the season stands and what is already stored.

use serde::Serialize;

use super::common::CommandResources;
use crate::{
    cli::{
        types::{GameweekNumber, SeasonLabel},
        GlobalArgs,
    },
    error::Result,
    fpl::FplSource,
    pipeline::{last_completed_gameweek, missing_gameweeks, resolve_season},
    storage::ArtifactStore,
};

#[derive(Debug, Clone, Serialize)]
pub struct StatusReport {
    pub season: SeasonLabel,
    pub last_completed: Option<GameweekNumber>,
    pub materialized: Vec<GameweekNumber>,
    pub missing: Vec<GameweekNumber>,
    pub store: String,
}

/// Only the season metadata is fetched; no gameweek data is touched.
pub async fn run_status<S, A>(source: &S, store: &A) -> Result<StatusReport>
where
    S: FplSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    let bootstrap = source.fetch_bootstrap().await?;
    let season = resolve_season(&bootstrap.events)?;
    let last_completed = last_completed_gameweek(&bootstrap.events);

    let existing = store.existing(&season)?;
    let missing = last_completed
        .map(|last| missing_gameweeks(last, &existing))
        .unwrap_or_default();

    Ok(StatusReport {
        season,
        last_completed,
        materialized: existing.into_iter().collect(),
        missing,
        store: store.location(),
    })
}

/// Handle `fpl-gameweek status`.
pub async fn handle_status(args: &GlobalArgs, as_json: bool) -> Result<()> {
    let resources = CommandResources::open(args)?;
    let report = run_status(&resources.client, resources.store.as_ref()).await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Season: {}", report.season);
    println!(
        "Last completed gameweek: {}",
        report
            .last_completed
            .map_or_else(|| "none (season not started)".to_string(), |gw| gw.to_string())
    );
    println!("Store: {}", report.store);
    println!("Materialized: {}", format_gameweeks(&report.materialized));
    println!("Missing: {}", format_gameweeks(&report.missing));
    Ok(())
}

/// `1-3, 5, 7-8`
pub fn format_gameweeks(gameweeks: &[GameweekNumber]) -> String {
    if gameweeks.is_empty() {
        return "none".to_string();
    }

    let mut ranges: Vec<(u8, u8)> = Vec::new();
    for gw in gameweeks.iter().map(|g| g.as_u8()) {
        match ranges.last_mut() {
            Some((_, end)) if *end + 1 == gw => *end = gw,
            _ => ranges.push((gw, gw)),
        }
    }

    ranges
        .into_iter()
        .map(|(start, end)| {
            if start == end {
                start.to_string()
            } else {
                format!("{}-{}", start, end)
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}
