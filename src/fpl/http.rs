//! HTTP access to the public FPL endpoints.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;

use crate::{
    cli::types::GameweekNumber,
    config::PipelineConfig,
    core::build_client,
    error::{FplError, Result},
    fpl::types::{Bootstrap, LivePayload},
};


/// Base path for the public FPL API.
pub const FPL_BASE_URL: &str = "https://fantasy.premierleague.com/api";

/// Upstream data the pipeline consumes.
///
/// Implementations must enforce their own time budget and report every
/// failure (transport, status, timeout, decode) as
/// [`FplError::UpstreamUnavailable`].
#[async_trait]
pub trait FplSource: Send + Sync {
    /// Season calendar plus player, team and position metadata.
    async fn fetch_bootstrap(&self) -> Result<Bootstrap>;

    /// Per-player performance for one gameweek.
    async fn fetch_gameweek(&self, gameweek: GameweekNumber) -> Result<LivePayload>;
}

/// [`FplSource`] backed by the public HTTP API.
#[derive(Debug, Clone)]
pub struct FplClient {
    client: Client,
    base_url: String,
    budget: Duration,
}

impl FplClient {
    pub fn new(base_url: impl Into<String>, budget: Duration) -> Result<Self> {
        Ok(Self {
            client: build_client(budget)?,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            budget,
        })
    }

    pub fn from_config(config: &PipelineConfig) -> Result<Self> {
        Self::new(config.base_url.clone(), config.fetch_timeout())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, resource: &str) -> Result<T> {
        let url = format!("{}/{}", self.base_url, path);
        debug!(%url, "requesting {}", resource);

        let request = async {
            self.client
                .get(&url)
                .send()
                .await?
                .error_for_status()?
                .json::<T>()
                .await
        };

        match tokio::time::timeout(self.budget, request).await {
            Ok(Ok(body)) => Ok(body),
            Ok(Err(e)) => Err(FplError::upstream(resource, e)),
            Err(_) => Err(FplError::upstream(
                resource,
                format!("timed out after {:.1}s", self.budget.as_secs_f64()),
            )),
        }
    }
}

#[async_trait]
impl FplSource for FplClient {
    async fn fetch_bootstrap(&self) -> Result<Bootstrap> {
        self.get_json("bootstrap-static/", "season metadata").await
    }

    async fn fetch_gameweek(&self, gameweek: GameweekNumber) -> Result<LivePayload> {
        self.get_json(
            &format!("event/{}/live/", gameweek),
            &format!("gameweek {} live data", gameweek),
        )
        .await
    }
}
