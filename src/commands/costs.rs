//! `costs`: snapshot of every player's current price.

use tracing::{info, warn};

use super::common::CommandResources;
use crate::{
    cli::GlobalArgs,
    error::Result,
    fpl::{types::Bootstrap, FplSource},
    pipeline::{materialize::COST_DIVISOR, resolve_season},
    storage::{ArtifactStore, PlayerCost},
};

/// Current price in millions for every player that has one, by id.
pub fn player_costs(bootstrap: &Bootstrap) -> Vec<PlayerCost> {
    let mut costs: Vec<PlayerCost> = bootstrap
        .elements
        .iter()
        .filter_map(|element| match element.now_cost {
            Some(raw) => Some(PlayerCost {
                id: element.id,
                now_cost: raw / COST_DIVISOR,
            }),
            None => {
                warn!(player_id = element.id.as_u32(), "player has no price; left out of snapshot");
                None
            }
        })
        .collect();
    costs.sort_by_key(|cost| cost.id);
    costs.dedup_by_key(|cost| cost.id);
    costs
}

/// Fetch season metadata and replace the stored cost snapshot.
pub async fn run_costs<S, A>(source: &S, store: &mut A) -> Result<usize>
where
    S: FplSource + ?Sized,
    A: ArtifactStore + ?Sized,
{
    let bootstrap = source.fetch_bootstrap().await?;
    let season = resolve_season(&bootstrap.events)?;
    let costs = player_costs(&bootstrap);

    store.write_player_costs(&season, &costs)?;
    info!(season = %season, players = costs.len(), "cost snapshot written");
    Ok(costs.len())
}

/// Handle `fpl-gameweek costs`.
pub async fn handle_costs(args: &GlobalArgs) -> Result<()> {
    let CommandResources {
        client, mut store, ..
    } = CommandResources::open(args)?;

    let count = run_costs(&client, store.as_mut()).await?;
    println!("✓ Saved current cost for {} players to {}", count, store.location());
    Ok(())
}
