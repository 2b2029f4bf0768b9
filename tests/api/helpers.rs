use axum::Router;
use hawaii_climate_api::{
    app, AppState, ClimateAccess, ClimateData, Error, PrecipitationReading, Station,
    TemperatureObservation, TemperatureSummary,
};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::sync::Arc;

pub struct TestApp {
    pub app: Router,
}

/// Fixture rows for the `measurement` table: (station, date, prcp, tobs).
///
/// Dates straddle the 365-day window starting 2016-08-23, and 2017-06-01 /
/// 2017-08-23 appear for both stations to exercise duplicate-date collapsing.
pub const MEASUREMENTS: &[(&str, &str, Option<f64>, f64)] = &[
    ("USC00519281", "2016-08-01", Some(0.05), 75.0),
    ("USC00519281", "2016-08-23", Some(0.7), 74.0),
    ("USC00519281", "2017-01-01", Some(0.29), 62.0),
    ("USC00519281", "2017-01-03", Some(0.0), 68.0),
    ("USC00519281", "2017-06-01", Some(0.1), 78.0),
    ("USC00519281", "2017-08-23", Some(0.45), 81.0),
    ("USC00516128", "2015-12-31", Some(0.21), 70.0),
    ("USC00516128", "2017-01-07", Some(0.06), 74.0),
    ("USC00516128", "2017-03-05", None, 71.0),
    ("USC00516128", "2017-06-01", Some(0.3), 76.0),
    ("USC00516128", "2017-08-23", None, 79.0),
];

/// Fixture rows for the `station` table: (station, name, latitude, longitude, elevation).
pub const STATIONS: &[(&str, &str, f64, f64, f64)] = &[
    ("USC00519281", "WAIHEE 837.5, HI US", 21.45167, -157.84889, 32.9),
    ("USC00516128", "MANOA LYON ARBO 785.2, HI US", 21.3331, -157.8025, 152.4),
];

/// Build the router over an in-memory SQLite dataset seeded with the fixture
/// rows above.
pub async fn spawn_app() -> TestApp {
    let pool = seeded_pool().await;
    spawn_app_with(Arc::new(ClimateAccess::new(pool)))
}

/// Build the router over any [`ClimateData`] implementation (e.g. a mock).
pub fn spawn_app_with(climate_db: Arc<dyn ClimateData>) -> TestApp {
    TestApp {
        app: app(AppState { climate_db }),
    }
}

async fn seeded_pool() -> SqlitePool {
    // A single connection keeps every query on the same in-memory database.
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory sqlite");

    sqlx::query(
        "CREATE TABLE station (
            id INTEGER PRIMARY KEY,
            station TEXT NOT NULL,
            name TEXT NOT NULL,
            latitude REAL NOT NULL,
            longitude REAL NOT NULL,
            elevation REAL NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create station table");

    sqlx::query(
        "CREATE TABLE measurement (
            id INTEGER PRIMARY KEY,
            station TEXT NOT NULL,
            date TEXT NOT NULL,
            prcp REAL,
            tobs REAL NOT NULL
        )",
    )
    .execute(&pool)
    .await
    .expect("Failed to create measurement table");

    for (station, name, latitude, longitude, elevation) in STATIONS.iter().copied() {
        sqlx::query(
            "INSERT INTO station (station, name, latitude, longitude, elevation) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
        )
        .bind(station)
        .bind(name)
        .bind(latitude)
        .bind(longitude)
        .bind(elevation)
        .execute(&pool)
        .await
        .expect("Failed to seed station row");
    }

    for (station, date, prcp, tobs) in MEASUREMENTS.iter().copied() {
        sqlx::query(
            "INSERT INTO measurement (station, date, prcp, tobs) VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(station)
        .bind(date)
        .bind(prcp)
        .bind(tobs)
        .execute(&pool)
        .await
        .expect("Failed to seed measurement row");
    }

    pool
}

mockall::mock! {
    pub ClimateStore {}

    #[async_trait::async_trait]
    impl ClimateData for ClimateStore {
        async fn precipitation_since(
            &self,
            since: &str,
        ) -> Result<Vec<PrecipitationReading>, Error>;
        async fn stations(&self) -> Result<Vec<Station>, Error>;
        async fn temperature_observations(
            &self,
            station_id: &str,
            since: &str,
        ) -> Result<Vec<TemperatureObservation>, Error>;
        async fn temperature_summary_from(&self, start: &str) -> Result<TemperatureSummary, Error>;
        async fn temperature_summary_between(
            &self,
            start: &str,
            end: &str,
        ) -> Result<TemperatureSummary, Error>;
    }
}
