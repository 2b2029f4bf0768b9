use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, SqlitePool};
use utoipa::ToSchema;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Failed to query dataset: {0}")]
    Query(#[from] sqlx::Error),
}

/// Read-only queries over the observation dataset.
///
/// Date arguments are ISO 8601 strings compared lexicographically, which for
/// this format coincides with chronological order. Malformed dates are not
/// rejected; they simply match nothing.
#[async_trait]
pub trait ClimateData: Send + Sync {
    /// Daily precipitation readings on/after `since`, ascending by date.
    async fn precipitation_since(&self, since: &str) -> Result<Vec<PrecipitationReading>, Error>;
    /// All stations in the directory.
    async fn stations(&self) -> Result<Vec<Station>, Error>;
    /// Temperature observations for one station on/after `since`.
    async fn temperature_observations(
        &self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error>;
    /// Min/avg/max of temperature from `start` onward. Always yields one row;
    /// all fields are null when nothing matches.
    async fn temperature_summary_from(&self, start: &str) -> Result<TemperatureSummary, Error>;
    /// Min/avg/max of temperature over the inclusive range `[start, end]`.
    async fn temperature_summary_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, Error>;
}

pub struct ClimateAccess {
    pool: SqlitePool,
}

impl ClimateAccess {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ClimateData for ClimateAccess {
    async fn precipitation_since(&self, since: &str) -> Result<Vec<PrecipitationReading>, Error> {
        let readings = sqlx::query_as::<_, PrecipitationReading>(
            "SELECT date, prcp FROM measurement WHERE date >= ?1 ORDER BY date ASC",
        )
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(readings)
    }

    async fn stations(&self) -> Result<Vec<Station>, Error> {
        let stations = sqlx::query_as::<_, Station>(
            "SELECT station, name, latitude, longitude, elevation FROM station",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(stations)
    }

    async fn temperature_observations(
        &self,
        station_id: &str,
        since: &str,
    ) -> Result<Vec<TemperatureObservation>, Error> {
        let observations = sqlx::query_as::<_, TemperatureObservation>(
            "SELECT date, tobs FROM measurement WHERE station = ?1 AND date >= ?2",
        )
        .bind(station_id)
        .bind(since)
        .fetch_all(&self.pool)
        .await?;

        Ok(observations)
    }

    async fn temperature_summary_from(&self, start: &str) -> Result<TemperatureSummary, Error> {
        // Aggregation is delegated to SQLite; an aggregate over an empty set
        // still produces a single all-null row.
        let summary = sqlx::query_as::<_, TemperatureSummary>(
            "SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max \
             FROM measurement WHERE date >= ?1",
        )
        .bind(start)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }

    async fn temperature_summary_between(
        &self,
        start: &str,
        end: &str,
    ) -> Result<TemperatureSummary, Error> {
        let summary = sqlx::query_as::<_, TemperatureSummary>(
            "SELECT MIN(tobs) AS min, AVG(tobs) AS avg, MAX(tobs) AS max \
             FROM measurement WHERE date >= ?1 AND date <= ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        Ok(summary)
    }
}

/// One dated precipitation reading. Folded into the date-keyed response map
/// by the precipitation route.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PrecipitationReading {
    pub date: String,
    pub prcp: Option<f64>,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct Station {
    #[serde(rename = "Station")]
    pub station: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Lat")]
    pub latitude: f64,
    #[serde(rename = "Lon")]
    pub longitude: f64,
    #[serde(rename = "Elevation")]
    pub elevation: f64,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TemperatureObservation {
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Tobs")]
    pub tobs: f64,
}

/// Temperature aggregate over a date range. Null fields mean no observation
/// matched the range.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize, ToSchema)]
pub struct TemperatureSummary {
    #[serde(rename = "Minimum Temperature")]
    pub min: Option<f64>,
    #[serde(rename = "Average Temperature")]
    pub avg: Option<f64>,
    #[serde(rename = "Maximum Temperature")]
    pub max: Option<f64>,
}
