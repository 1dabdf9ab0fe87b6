//! Error types for the FPL gameweek pipeline

use thiserror::Error;


pub type Result<T> = std::result::Result<T, FplError>;

/// Which code table a player reference failed to resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeKind {
    Team,
    Position,
}

impl std::fmt::Display for CodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodeKind::Team => write!(f, "team"),
            CodeKind::Position => write!(f, "position"),
        }
    }
}

#[derive(Error, Debug)]
pub enum FplError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Upstream unavailable ({resource}): {reason}")]
    UpstreamUnavailable { resource: String, reason: String },

    #[error("Season schedule missing: {reason}")]
    MissingSchedule { reason: String },

    #[error("Player {player_id} references unknown {kind} code {code}")]
    UnknownCode {
        player_id: u32,
        kind: CodeKind,
        code: u32,
    },

    #[error("Gameweek {gameweek}: player {player_id} has {count} fixture records (at most 2 supported)")]
    UnexpectedFixtureCount {
        gameweek: u8,
        player_id: u32,
        count: usize,
    },

    #[error("Gameweek {gameweek}: cannot coerce column `{column}`{}: {message}", fmt_player(.player_id))]
    TypeCoercion {
        gameweek: u8,
        player_id: Option<u32>,
        column: String,
        message: String,
    },

    #[error("Gameweek {gameweek}: invalid payload{}: {message}", fmt_player(.player_id))]
    InvalidPayload {
        gameweek: u8,
        player_id: Option<u32>,
        message: String,
    },

    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    #[error("Invalid position: {position}")]
    InvalidPosition { position: String },

    #[error("Invalid gameweek: {value} (expected 1-38)")]
    InvalidGameweek { value: String },
}

fn fmt_player(player_id: &Option<u32>) -> String {
    player_id
        .map(|id| format!(" for player {}", id))
        .unwrap_or_default()
}

impl FplError {
    /// Whether this error is confined to the gameweek being processed.
    ///
    /// Gameweek-local errors are reported and skipped; everything else aborts
    /// the run before (or instead of) touching further gameweeks.
    pub fn is_gameweek_local(&self) -> bool {
        matches!(
            self,
            FplError::Http(_)
                | FplError::Json(_)
                | FplError::Io(_)
                | FplError::Csv(_)
                | FplError::Database(_)
                | FplError::UpstreamUnavailable { .. }
                | FplError::UnexpectedFixtureCount { .. }
                | FplError::TypeCoercion { .. }
                | FplError::InvalidPayload { .. }
        )
    }

    /// Gameweek number carried by the error, if any.
    pub fn gameweek(&self) -> Option<u8> {
        match self {
            FplError::UnexpectedFixtureCount { gameweek, .. }
            | FplError::TypeCoercion { gameweek, .. }
            | FplError::InvalidPayload { gameweek, .. } => Some(*gameweek),
            _ => None,
        }
    }

    pub(crate) fn upstream(resource: impl Into<String>, reason: impl ToString) -> Self {
        FplError::UpstreamUnavailable {
            resource: resource.into(),
            reason: reason.to_string(),
        }
    }
}
