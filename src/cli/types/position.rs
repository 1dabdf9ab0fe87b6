//! FPL player positions.

use crate::error::FplError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Playing positions as FPL's `element_types` table names them
/// (`singular_name_short`).
///
/// # Examples
///
/// ```rust
/// use fpl_gameweek::Position;
///
/// let mid: Position = "MID".parse().unwrap();
/// assert_eq!(mid, Position::MID);
/// assert_eq!(Position::GKP.to_string(), "GKP");
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum Position {
    /// Goalkeeper
    GKP,
    /// Defender
    DEF,
    /// Midfielder
    MID,
    /// Forward
    FWD,
}

impl Position {
    pub const ALL: [Position; 4] = [Position::GKP, Position::DEF, Position::MID, Position::FWD];

    pub fn as_str(&self) -> &'static str {
        match self {
            Position::GKP => "GKP",
            Position::DEF => "DEF",
            Position::MID => "MID",
            Position::FWD => "FWD",
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = FplError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "GKP" => Ok(Position::GKP),
            "DEF" => Ok(Position::DEF),
            "MID" => Ok(Position::MID),
            "FWD" => Ok(Position::FWD),
            _ => Err(FplError::InvalidPosition {
                position: s.to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_from_str() {
        assert_eq!("gkp".parse::<Position>().unwrap(), Position::GKP);
        assert_eq!(" FWD ".parse::<Position>().unwrap(), Position::FWD);
        assert!("AM".parse::<Position>().is_err());
    }

    #[test]
    fn test_position_display_round_trip() {
        for position in Position::ALL {
            assert_eq!(position.to_string().parse::<Position>().unwrap(), position);
        }
    }

    #[test]
    fn test_position_serde_as_map_key() {
        let json = r#"{"GKP": 6, "FWD": 4}"#;
        let map: std::collections::BTreeMap<Position, u8> = serde_json::from_str(json).unwrap();
        assert_eq!(map[&Position::GKP], 6);
        assert_eq!(map[&Position::FWD], 4);
    }
}
