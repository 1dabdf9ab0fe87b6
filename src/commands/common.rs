//! Resources shared by the command handlers.
//!
//! Per-run state (season, config, reference table) lives in [`RunContext`]
//! and is passed down explicitly.

use tracing::{debug, info};

use crate::{
    cli::{
        types::{GameweekNumber, SeasonLabel},
        GlobalArgs,
    },
    config::PipelineConfig,
    core::resolve_data_dir,
    error::Result,
    fpl::{types::Bootstrap, FplClient},
    pipeline::{build_reference_from_bootstrap, last_completed_gameweek, resolve_season, ReferenceTable},
    storage::{open_store, ArtifactStore},
};

/// Immutable state for one pipeline run, built before any gameweek work.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub season: SeasonLabel,
    pub last_completed: Option<GameweekNumber>,
    pub config: PipelineConfig,
    pub reference: ReferenceTable,
}

impl RunContext {
    /// Resolve the season and build the reference table.
    ///
    /// Any failure here is global: no gameweek is attempted.
    pub fn from_bootstrap(bootstrap: &Bootstrap, config: PipelineConfig) -> Result<Self> {
        let season = resolve_season(&bootstrap.events)?;
        let last_completed = last_completed_gameweek(&bootstrap.events);
        let reference = build_reference_from_bootstrap(bootstrap)?;

        info!(
            season = %season,
            last_completed = last_completed.map(|gw| gw.as_u8()),
            players = reference.len(),
            "resolved season"
        );

        Ok(Self {
            season,
            last_completed,
            config,
            reference,
        })
    }
}

/// Config, upstream client and artifact store as selected by the global flags.
pub struct CommandResources {
    pub config: PipelineConfig,
    pub client: FplClient,
    pub store: Box<dyn ArtifactStore>,
}

impl CommandResources {
    pub fn open(args: &GlobalArgs) -> Result<Self> {
        let config = PipelineConfig::resolve(args.config.as_deref())?;
        let client = FplClient::from_config(&config)?;
        let data_dir = resolve_data_dir(args.data_dir.clone());
        let store = open_store(args.store, &data_dir)?;

        debug!(
            data_dir = %data_dir.display(),
            store = %args.store,
            base_url = client.base_url(),
            "opened command resources"
        );

        Ok(Self {
            config,
            client,
            store,
        })
    }
}
