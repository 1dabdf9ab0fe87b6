//! CSV file backend: `<root>/<season>/Gameweek_<n>.csv`.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{ArtifactStore, PlayerCost, WriteOutcome};
use crate::{
    cli::types::{GameweekNumber, SeasonLabel},
    core::publish_atomically,
    error::{FplError, Result},
    pipeline::materialize::GameweekTable,
};

const ARTIFACT_PREFIX: &str = "Gameweek_";
const ARTIFACT_SUFFIX: &str = ".csv";
pub const COSTS_FILE_NAME: &str = "player_cost.csv";

#[derive(Debug, Clone)]
pub struct CsvStore {
    root: PathBuf,
}

impl CsvStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn season_dir(&self, season: &SeasonLabel) -> PathBuf {
        self.root.join(season.to_string())
    }

    pub fn artifact_path(&self, season: &SeasonLabel, gameweek: GameweekNumber) -> PathBuf {
        self.season_dir(season)
            .join(format!("{}{}{}", ARTIFACT_PREFIX, gameweek, ARTIFACT_SUFFIX))
    }

    pub fn costs_path(&self, season: &SeasonLabel) -> PathBuf {
        self.season_dir(season).join(COSTS_FILE_NAME)
    }
}

/// `Gameweek_7.csv` -> 7. Anything else (temp files, costs) is ignored.
fn parse_artifact_name(name: &str) -> Option<GameweekNumber> {
    name.strip_prefix(ARTIFACT_PREFIX)?
        .strip_suffix(ARTIFACT_SUFFIX)?
        .parse::<u8>()
        .ok()
        .and_then(|n| GameweekNumber::new(n).ok())
}

impl ArtifactStore for CsvStore {
    fn existing(&self, season: &SeasonLabel) -> Result<BTreeSet<GameweekNumber>> {
        let dir = self.season_dir(season);
        if !dir.is_dir() {
            return Ok(BTreeSet::new());
        }

        let mut found = BTreeSet::new();
        for entry in std::fs::read_dir(&dir)? {
            let entry = entry?;
            if !entry.file_type()?.is_file() {
                continue;
            }
            if let Some(gameweek) = entry.file_name().to_str().and_then(parse_artifact_name) {
                found.insert(gameweek);
            }
        }
        Ok(found)
    }

    fn exists(&self, season: &SeasonLabel, gameweek: GameweekNumber) -> Result<bool> {
        Ok(self.artifact_path(season, gameweek).is_file())
    }

    fn write(&mut self, season: &SeasonLabel, table: &GameweekTable) -> Result<WriteOutcome> {
        let path = self.artifact_path(season, table.gameweek);
        let bytes = table.to_csv()?;

        if publish_atomically(&path, &bytes, false)? {
            debug!(path = %path.display(), rows = table.len(), "published gameweek artifact");
            Ok(WriteOutcome::Written)
        } else {
            Ok(WriteOutcome::AlreadyPresent)
        }
    }

    fn write_player_costs(&mut self, season: &SeasonLabel, costs: &[PlayerCost]) -> Result<()> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        if costs.is_empty() {
            writer.write_record(["id", "now_cost"])?;
        }
        for cost in costs {
            writer.serialize(cost)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| FplError::Io(e.into_error()))?;

        let path = self.costs_path(season);
        publish_atomically(&path, &bytes, true)?;
        debug!(path = %path.display(), players = costs.len(), "published cost snapshot");
        Ok(())
    }

    fn location(&self) -> String {
        self.root.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_artifact_name() {
        assert_eq!(parse_artifact_name("Gameweek_7.csv"), GameweekNumber::new(7).ok());
        assert_eq!(parse_artifact_name("Gameweek_38.csv"), Some(GameweekNumber::LAST));
        assert_eq!(parse_artifact_name("Gameweek_39.csv"), None);
        assert_eq!(parse_artifact_name("Gameweek_0.csv"), None);
        assert_eq!(parse_artifact_name(".Gameweek_7.csv.123.tmp"), None);
        assert_eq!(parse_artifact_name("player_cost.csv"), None);
        assert_eq!(parse_artifact_name("Gameweek_x.csv"), None);
    }

    #[test]
    fn test_paths() {
        let store = CsvStore::new("/data/player_data");
        let season = SeasonLabel::starting(2024);
        assert_eq!(
            store.artifact_path(&season, GameweekNumber::new(5).unwrap()),
            PathBuf::from("/data/player_data/2024-25/Gameweek_5.csv")
        );
        assert_eq!(
            store.costs_path(&season),
            PathBuf::from("/data/player_data/2024-25/player_cost.csv")
        );
    }
}
