/// Integration tests against the Hawaii dataset in PostgreSQL
///
/// These tests check the PostgreSQL store returns the same shapes and
/// invariants as the in-memory store, using the real data.
///
/// Prerequisites:
/// - PostgreSQL running with the Hawaii `measurement` and `station`
///   tables loaded into the `public` schema
/// - DATABASE_URL set in .env
///
/// Run with: cargo test --test postgres_store -- --ignored --test-threads=1

use std::collections::HashSet;

use surfsup_service::anchor::{AnchorStrategy, TrailingWindow};
use surfsup_service::db;
use surfsup_service::error::ServiceError;
use surfsup_service::service::{most_active_station, QueryService};
use surfsup_service::store::{PostgresSource, PostgresStore, StoreSource, WeatherStore};

// ---------------------------------------------------------------------------
// Test Helpers
// ---------------------------------------------------------------------------

fn open_store() -> PostgresStore {
    let url = db::database_url().expect("DATABASE_URL must be set");
    PostgresSource::new(url, "public")
        .open()
        .expect("Failed to connect to test database")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
#[ignore] // Only run when database is available
fn test_dataset_tables_verify() {
    let url = db::database_url().expect("DATABASE_URL must be set");
    assert!(db::connect_and_verify(&url, "public").is_ok());
}

#[test]
#[ignore]
fn test_latest_measurement_matches_fixed_anchor() {
    let mut store = open_store();
    let latest = store.latest_measurement_date().unwrap();
    assert_eq!(latest.as_deref(), Some("2017-08-23"));
}

#[test]
#[ignore]
fn test_precipitation_stays_inside_window() {
    let mut store = open_store();
    let mut service = QueryService::new(&mut store, TrailingWindow::default());

    let readings = service.precipitation().unwrap();
    assert!(!readings.is_empty());
    assert!(readings.iter().all(|r| r.date.as_str() >= "2016-08-23"));
}

#[test]
#[ignore]
fn test_fixed_and_latest_anchor_agree_on_hawaii_data() {
    let mut store = open_store();

    let fixed = QueryService::new(&mut store, TrailingWindow::default())
        .precipitation()
        .unwrap();
    let latest_window = TrailingWindow {
        anchor: AnchorStrategy::LatestInDataset,
        days: 365,
    };
    let latest = QueryService::new(&mut store, latest_window).precipitation().unwrap();

    assert_eq!(fixed.len(), latest.len());
}

#[test]
#[ignore]
fn test_station_roster_has_unique_ids() {
    let mut store = open_store();
    let stations = QueryService::new(&mut store, TrailingWindow::default())
        .stations()
        .unwrap();

    let ids: HashSet<_> = stations.iter().map(|s| s.station.clone()).collect();
    assert_eq!(ids.len(), stations.len());
}

#[test]
#[ignore]
fn test_tobs_come_from_most_active_station() {
    let mut store = open_store();
    let activity = store.station_activity().unwrap();
    let expected = most_active_station(&activity).unwrap().station.clone();

    let observations = QueryService::new(&mut store, TrailingWindow::default())
        .temperature_observations()
        .unwrap();
    let direct = store.temperature_observations(&expected, "2016-08-23").unwrap();

    assert_eq!(observations, direct);
}

#[test]
#[ignore]
fn test_stats_are_ordered_and_empty_future_is_reported() {
    let mut store = open_store();
    let mut service = QueryService::new(&mut store, TrailingWindow::default());

    let stats = service.temperature_stats("2017-01-01", Some("2017-01-31")).unwrap();
    assert!(stats.tmin <= stats.tavg && stats.tavg <= stats.tmax);

    let err = service.temperature_stats("2099-01-01", None).unwrap_err();
    assert!(matches!(err, ServiceError::EmptyResult(_)));
}
