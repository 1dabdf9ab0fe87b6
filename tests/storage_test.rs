//! Integration tests for the artifact stores through the public API

use fpl_gameweek::{
    config::{ColumnSpec, ColumnType},
    pipeline::{Cell, GameweekTable},
    storage::*,
    GameweekNumber, PlayerId, SeasonLabel,
};
use tempfile::TempDir;

fn table(gameweek: u8, names: &[&str]) -> GameweekTable {
    GameweekTable {
        gameweek: GameweekNumber::new(gameweek).unwrap(),
        columns: vec![
            ColumnSpec::new("id", ColumnType::Int64),
            ColumnSpec::new("full_name", ColumnType::String),
            ColumnSpec::new("in_dreamteam", ColumnType::Bool),
        ],
        rows: names
            .iter()
            .enumerate()
            .map(|(i, name)| {
                vec![
                    Cell::Int(i as i64 + 1),
                    Cell::Text(name.to_string()),
                    Cell::Bool(i == 0),
                ]
            })
            .collect(),
    }
}

#[test]
fn test_sqlite_artifacts_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("nested").join("fpl.db");
    let season = SeasonLabel::starting(2023);

    {
        let mut store = SqliteStore::open(&path).unwrap();
        assert_eq!(
            store.write(&season, &table(1, &["Saka", "Palmer"])).unwrap(),
            WriteOutcome::Written
        );
        store
            .write_player_costs(
                &season,
                &[PlayerCost {
                    id: PlayerId::new(1),
                    now_cost: 10.0,
                }],
            )
            .unwrap();
    }

    let mut store = SqliteStore::open(&path).unwrap();
    assert!(store.exists(&season, GameweekNumber::new(1).unwrap()).unwrap());
    assert_eq!(
        store.write(&season, &table(1, &["Someone Else"])).unwrap(),
        WriteOutcome::AlreadyPresent
    );
    assert_eq!(store.location(), path.display().to_string());
}

#[test]
fn test_seasons_are_kept_apart() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let previous = SeasonLabel::starting(2023);
    let current = SeasonLabel::starting(2024);

    store.write(&previous, &table(38, &["Saka"])).unwrap();
    store.write(&current, &table(1, &["Saka"])).unwrap();

    let gameweeks = |season: &SeasonLabel| -> Vec<u8> {
        store
            .existing(season)
            .unwrap()
            .into_iter()
            .map(|g| g.as_u8())
            .collect()
    };
    assert_eq!(gameweeks(&previous), vec![38]);
    assert_eq!(gameweeks(&current), vec![1]);
    assert!(dir.path().join("2023-24").join("Gameweek_38.csv").is_file());
}

#[test]
fn test_csv_bool_and_empty_table() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let season = SeasonLabel::starting(2024);

    store.write(&season, &table(3, &["Saka", "Palmer"])).unwrap();
    let contents =
        std::fs::read_to_string(store.artifact_path(&season, GameweekNumber::new(3).unwrap())).unwrap();
    assert_eq!(contents, "id,full_name,in_dreamteam\n1,Saka,True\n2,Palmer,False\n");

    store.write(&season, &table(4, &[])).unwrap();
    let contents =
        std::fs::read_to_string(store.artifact_path(&season, GameweekNumber::new(4).unwrap())).unwrap();
    assert_eq!(contents, "id,full_name,in_dreamteam\n");
}
