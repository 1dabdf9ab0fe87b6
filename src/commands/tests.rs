//! Unit tests for the command handlers, driven by an in-memory source

use super::{costs::*, status::*, sync::*};
use crate::{
    cli::types::{GameweekNumber, PlayerId, SeasonLabel},
    config::PipelineConfig,
    error::{FplError, Result},
    fpl::{
        types::{Bootstrap, Element, ElementType, Event, LiveElement, LivePayload, Team},
        FplSource,
    },
    pipeline::GameweekTable,
    storage::{ArtifactStore, CsvStore, PlayerCost, SqliteStore, WriteOutcome},
};
use async_trait::async_trait;
use serde_json::json;
use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

const CONFIG: &str = r#"{
    "summed_fields": ["minutes", "goals_scored", "assists", "expected_goals", "expected_assists"],
    "goal_values": {"GKP": 6, "DEF": 6, "MID": 5, "FWD": 4},
    "columns": [
        {"name": "id", "type": "int64"},
        {"name": "full_name", "type": "string"},
        {"name": "gameweek", "type": "int64"},
        {"name": "minutes", "type": "int64"},
        {"name": "goals_scored", "type": "int64"},
        {"name": "expected_points", "type": "float64"}
    ]
}"#;

fn config() -> PipelineConfig {
    PipelineConfig::from_json_str(CONFIG).unwrap()
}

fn gw(n: u8) -> GameweekNumber {
    GameweekNumber::new(n).unwrap()
}

struct MockSource {
    bootstrap: Option<Bootstrap>,
    gameweeks: HashMap<u8, LivePayload>,
    bootstrap_calls: AtomicUsize,
    gameweek_calls: AtomicUsize,
}

impl MockSource {
    fn new(bootstrap: Bootstrap) -> Self {
        Self {
            bootstrap: Some(bootstrap),
            gameweeks: HashMap::new(),
            bootstrap_calls: AtomicUsize::new(0),
            gameweek_calls: AtomicUsize::new(0),
        }
    }

    fn with_gameweek(mut self, gameweek: u8, entries: Vec<LiveElement>) -> Self {
        self.gameweeks.insert(gameweek, LivePayload { elements: entries });
        self
    }

    fn gameweek_calls(&self) -> usize {
        self.gameweek_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl FplSource for MockSource {
    async fn fetch_bootstrap(&self) -> Result<Bootstrap> {
        self.bootstrap_calls.fetch_add(1, Ordering::SeqCst);
        self.bootstrap
            .clone()
            .ok_or_else(|| FplError::upstream("season metadata", "connection refused"))
    }

    async fn fetch_gameweek(&self, gameweek: GameweekNumber) -> Result<LivePayload> {
        self.gameweek_calls.fetch_add(1, Ordering::SeqCst);
        self.gameweeks
            .get(&gameweek.as_u8())
            .cloned()
            .ok_or_else(|| FplError::upstream(format!("gameweek {} live data", gameweek), "HTTP 503"))
    }
}

/// Counts writes on top of a real store.
struct CountingStore<S> {
    inner: S,
    writes: usize,
}

impl<S: ArtifactStore> ArtifactStore for CountingStore<S> {
    fn existing(&self, season: &SeasonLabel) -> Result<BTreeSet<GameweekNumber>> {
        self.inner.existing(season)
    }

    fn exists(&self, season: &SeasonLabel, gameweek: GameweekNumber) -> Result<bool> {
        self.inner.exists(season, gameweek)
    }

    fn write(&mut self, season: &SeasonLabel, table: &GameweekTable) -> Result<WriteOutcome> {
        self.writes += 1;
        self.inner.write(season, table)
    }

    fn write_player_costs(&mut self, season: &SeasonLabel, costs: &[PlayerCost]) -> Result<()> {
        self.inner.write_player_costs(season, costs)
    }

    fn location(&self) -> String {
        self.inner.location()
    }
}

fn event(id: u8, finished: bool) -> Event {
    Event {
        id,
        name: format!("Gameweek {}", id),
        deadline_time: (id == 1).then(|| "2024-08-16T17:30:00Z".to_string()),
        finished,
    }
}

fn bootstrap(finished_through: u8) -> Bootstrap {
    Bootstrap {
        events: (1..=38).map(|id| event(id, id <= finished_through)).collect(),
        elements: vec![
            Element {
                id: PlayerId::new(328),
                first_name: "Mohamed".to_string(),
                second_name: "Salah".to_string(),
                team: 12,
                element_type: 3,
                now_cost: Some(131.0),
            },
            Element {
                id: PlayerId::new(351),
                first_name: "Erling".to_string(),
                second_name: "Haaland".to_string(),
                team: 13,
                element_type: 4,
                now_cost: Some(151.0),
            },
        ],
        teams: vec![
            Team {
                id: 12,
                name: "Liverpool".to_string(),
            },
            Team {
                id: 13,
                name: "Man City".to_string(),
            },
        ],
        element_types: vec![
            ElementType {
                id: 3,
                singular_name_short: "MID".to_string(),
            },
            ElementType {
                id: 4,
                singular_name_short: "FWD".to_string(),
            },
        ],
    }
}

fn entry(id: u32, minutes: u32, goals: u32) -> LiveElement {
    LiveElement {
        id: PlayerId::new(id),
        stats: json!({
            "minutes": minutes,
            "goals_scored": goals,
            "assists": 0,
            "expected_goals": "0.50",
            "expected_assists": "0.00"
        }),
    }
}

#[tokio::test]
async fn test_sync_writes_missing_gameweeks() {
    let dir = TempDir::new().unwrap();
    let mut store = CountingStore {
        inner: CsvStore::new(dir.path()),
        writes: 0,
    };
    let source = MockSource::new(bootstrap(2))
        .with_gameweek(1, vec![entry(328, 90, 1), entry(351, 90, 0)])
        .with_gameweek(2, vec![entry(351, 90, 1), entry(351, 90, 1)]);

    let report = run_sync(&source, &mut store, config()).await.unwrap();

    assert_eq!(report.season.to_string(), "2024-25");
    assert_eq!(report.last_completed, Some(gw(2)));
    assert_eq!(report.written, vec![gw(1), gw(2)]);
    assert!(report.skipped.is_empty());
    assert!(report.is_success());
    assert_eq!(store.writes, 2);
    assert_eq!(source.gameweek_calls(), 2);

    let gw2 = std::fs::read_to_string(store.inner.artifact_path(&report.season, gw(2))).unwrap();
    // Double fixture: 180 minutes, 2 goals, 4 + 2 * 0.5 * 4
    assert_eq!(
        gw2,
        "id,full_name,gameweek,minutes,goals_scored,expected_points\n351,Erling Haaland,2,180,2,8\n"
    );
}

#[tokio::test]
async fn test_sync_rerun_fetches_and_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let source = MockSource::new(bootstrap(2))
        .with_gameweek(1, vec![entry(328, 90, 1)])
        .with_gameweek(2, vec![entry(328, 90, 0)]);

    let mut first = CsvStore::new(dir.path());
    run_sync(&source, &mut first, config()).await.unwrap();
    let before = std::fs::read(first.artifact_path(&SeasonLabel::starting(2024), gw(1))).unwrap();
    let calls_after_first = source.gameweek_calls();

    let mut store = CountingStore {
        inner: CsvStore::new(dir.path()),
        writes: 0,
    };
    let report = run_sync(&source, &mut store, config()).await.unwrap();

    assert_eq!(source.gameweek_calls(), calls_after_first);
    assert_eq!(store.writes, 0);
    assert!(report.written.is_empty());
    assert_eq!(report.skipped, vec![gw(1), gw(2)]);
    let after = std::fs::read(first.artifact_path(&SeasonLabel::starting(2024), gw(1))).unwrap();
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_sync_continues_past_failed_gameweeks() {
    let mut store = SqliteStore::new_in_memory().unwrap();
    let source = MockSource::new(bootstrap(4))
        .with_gameweek(1, vec![entry(328, 90, 1)])
        .with_gameweek(
            2,
            vec![entry(328, 90, 0), entry(328, 90, 0), entry(328, 45, 0)],
        )
        // no payload for gameweek 3: upstream failure
        .with_gameweek(4, vec![entry(351, 90, 2)]);

    let report = run_sync(&source, &mut store, config()).await.unwrap();

    assert_eq!(report.written, vec![gw(1), gw(4)]);
    assert!(!report.is_success());
    let failed: Vec<u8> = report.failed.iter().map(|f| f.gameweek.as_u8()).collect();
    assert_eq!(failed, vec![2, 3]);
    assert!(report.failed[0].error.contains("player 328"));
    assert!(report.failed[1].error.contains("gameweek 3"));
    assert!(!store.exists(&report.season, gw(2)).unwrap());

    // The failed gameweeks are retried on the next run.
    let retry = MockSource::new(bootstrap(4))
        .with_gameweek(2, vec![entry(328, 90, 0)])
        .with_gameweek(3, vec![entry(328, 90, 0)]);
    let report = run_sync(&retry, &mut store, config()).await.unwrap();
    assert_eq!(report.written, vec![gw(2), gw(3)]);
    assert_eq!(retry.gameweek_calls(), 2);
}

#[tokio::test]
async fn test_sync_metadata_failure_is_global() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let mut source = MockSource::new(bootstrap(2));
    source.bootstrap = None;

    let err = run_sync(&source, &mut store, config()).await.unwrap_err();
    assert!(matches!(err, FplError::UpstreamUnavailable { .. }));
    assert_eq!(source.gameweek_calls(), 0);
}

#[tokio::test]
async fn test_sync_unknown_code_aborts_before_any_gameweek() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let mut metadata = bootstrap(2);
    metadata.elements[1].team = 99;
    let source = MockSource::new(metadata).with_gameweek(1, vec![entry(328, 90, 1)]);

    let err = run_sync(&source, &mut store, config()).await.unwrap_err();
    assert!(matches!(err, FplError::UnknownCode { code: 99, .. }));
    assert_eq!(source.gameweek_calls(), 0);
    assert!(store.existing(&SeasonLabel::starting(2024)).unwrap().is_empty());
}

#[tokio::test]
async fn test_sync_before_season_start() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let source = MockSource::new(bootstrap(0));

    let report = run_sync(&source, &mut store, config()).await.unwrap();
    assert_eq!(report.last_completed, None);
    assert!(report.written.is_empty() && report.failed.is_empty());
    assert_eq!(source.gameweek_calls(), 0);
}

#[tokio::test]
async fn test_status_lists_stored_and_missing() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let source = MockSource::new(bootstrap(5))
        .with_gameweek(2, vec![entry(328, 90, 0)])
        .with_gameweek(3, vec![entry(328, 90, 0)]);
    run_sync(&source, &mut store, config()).await.unwrap();

    let status_source = MockSource::new(bootstrap(5));
    let report = run_status(&status_source, &store).await.unwrap();

    assert_eq!(report.last_completed, Some(gw(5)));
    assert_eq!(report.materialized, vec![gw(2), gw(3)]);
    assert_eq!(report.missing, vec![gw(1), gw(4), gw(5)]);
    assert_eq!(status_source.gameweek_calls(), 0);

    let json = serde_json::to_value(&report).unwrap();
    assert_eq!(json["season"], "2024-25");
    assert_eq!(json["missing"], json!([1, 4, 5]));
}

#[test]
fn test_format_gameweeks() {
    let list = |ns: &[u8]| ns.iter().map(|n| gw(*n)).collect::<Vec<_>>();
    assert_eq!(format_gameweeks(&[]), "none");
    assert_eq!(format_gameweeks(&list(&[1, 2, 3, 5, 7, 8])), "1-3, 5, 7-8");
    assert_eq!(format_gameweeks(&list(&[38])), "38");
}

#[test]
fn test_player_costs_in_millions() {
    let mut metadata = bootstrap(1);
    metadata.elements.push(Element {
        id: PlayerId::new(5),
        first_name: "No".to_string(),
        second_name: "Price".to_string(),
        team: 12,
        element_type: 3,
        now_cost: None,
    });

    let costs = player_costs(&metadata);
    assert_eq!(
        costs,
        vec![
            PlayerCost {
                id: PlayerId::new(328),
                now_cost: 13.1
            },
            PlayerCost {
                id: PlayerId::new(351),
                now_cost: 15.1
            },
        ]
    );
}

#[tokio::test]
async fn test_costs_snapshot_written_to_store() {
    let dir = TempDir::new().unwrap();
    let mut store = CsvStore::new(dir.path());
    let source = MockSource::new(bootstrap(1));

    let count = run_costs(&source, &mut store).await.unwrap();
    assert_eq!(count, 2);
    let contents = std::fs::read_to_string(store.costs_path(&SeasonLabel::starting(2024))).unwrap();
    assert_eq!(contents, "id,now_cost\n328,13.1\n351,15.1\n");
    assert_eq!(source.gameweek_calls(), 0);
}
