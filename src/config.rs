//! Pipeline configuration (the `fpl_config.json` document).
//!
//! Loaded once before any gameweek work and treated as immutable afterwards.
//! The built-in defaults live in `config/fpl_config.json` and are compiled in.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::{
    cli::types::Position,
    error::{FplError, Result},
    fpl::{StatField, FPL_BASE_URL},
    CONFIG_ENV_VAR,
};

const DEFAULT_CONFIG_JSON: &str = include_str!("../config/fpl_config.json");

/// Output type a column is cast to before publication.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    Int64,
    /// Integer column that publishes missing values as empty fields.
    #[serde(rename = "nullable_int64")]
    NullableInt64,
    Float64,
    String,
    Bool,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ColumnType::Int64 => "int64",
            ColumnType::NullableInt64 => "nullable_int64",
            ColumnType::Float64 => "float64",
            ColumnType::String => "string",
            ColumnType::Bool => "bool",
        };
        write!(f, "{}", s)
    }
}

/// One output column, in publication order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnSpec {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

fn default_base_url() -> String {
    FPL_BASE_URL.to_string()
}

fn default_fetch_timeout_secs() -> u64 {
    60
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Hard budget for each upstream fetch.
    #[serde(default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Stats summed when a player has two fixtures in one gameweek.
    /// Anything not listed keeps the first fixture's value.
    pub summed_fields: Vec<StatField>,

    /// FPL points per goal, by position.
    pub goal_values: BTreeMap<Position, f64>,

    /// Raw columns removed before casting.
    #[serde(default)]
    pub columns_to_drop: Vec<String>,

    /// Output columns in publication order, with their types.
    pub columns: Vec<ColumnSpec>,
}

impl PipelineConfig {
    /// The compiled-in defaults from `config/fpl_config.json`.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(DEFAULT_CONFIG_JSON)
    }

    /// Parse and validate a config document.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(|e| FplError::InvalidConfig {
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Read a config document from disk.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| FplError::InvalidConfig {
            message: format!("cannot read {}: {}", path.display(), e),
        })?;
        Self::from_json_str(&raw).map_err(|e| match e {
            FplError::InvalidConfig { message } => FplError::InvalidConfig {
                message: format!("{}: {}", path.display(), message),
            },
            other => other,
        })
    }

    /// Explicit path, then `FPL_GAMEWEEK_CONFIG`, then the built-in defaults.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        let from_env = std::env::var(CONFIG_ENV_VAR)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from);

        match explicit.map(Path::to_path_buf).or(from_env) {
            Some(path) => Self::load(&path),
            None => Self::builtin(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: String| Err(FplError::InvalidConfig { message });

        if self.fetch_timeout_secs == 0 {
            return invalid("fetch_timeout_secs must be greater than zero".to_string());
        }

        for position in Position::ALL {
            match self.goal_values.get(&position) {
                None => return invalid(format!("goal_values has no entry for {}", position)),
                Some(v) if !v.is_finite() => {
                    return invalid(format!("goal_values[{}] is not a finite number", position))
                }
                Some(_) => {}
            }
        }

        if self.columns.is_empty() {
            return invalid("columns must list at least one output column".to_string());
        }

        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.as_str()) {
                return invalid(format!("column `{}` is listed twice", column.name));
            }
        }

        for dropped in &self.columns_to_drop {
            if seen.contains(dropped.as_str()) {
                return invalid(format!(
                    "column `{}` is both dropped and listed for output",
                    dropped
                ));
            }
        }

        let mut summed = BTreeSet::new();
        for field in &self.summed_fields {
            if !summed.insert(field) {
                return invalid(format!("summed field `{}` is listed twice", field));
            }
        }

        Ok(())
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Points per goal for `position`.
    pub fn goal_value(&self, position: Position) -> Result<f64> {
        self.goal_values
            .get(&position)
            .copied()
            .ok_or_else(|| FplError::InvalidConfig {
                message: format!("goal_values has no entry for {}", position),
            })
    }

    pub fn is_summed(&self, field: StatField) -> bool {
        self.summed_fields.contains(&field)
    }
}
