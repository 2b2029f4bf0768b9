use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use log::error;
use std::{collections::BTreeMap, sync::Arc};
use time::{
    macros::{date, format_description},
    Date, Duration,
};

use crate::{AppState, Station, TemperatureObservation, TemperatureSummary};

/// Last date present in the dataset. The observation window is anchored here,
/// not at "now": the data stops in 2017.
pub const REFERENCE_DATE: Date = date!(2017 - 08 - 23);

/// Station with the most observations in the dataset (WAIHEE 837.5).
pub const MOST_ACTIVE_STATION: &str = "USC00519281";

/// First date of the 365-day window ending at [`REFERENCE_DATE`].
pub fn observation_window_start() -> String {
    let start = REFERENCE_DATE - Duration::days(365);
    start
        .format(format_description!("[year]-[month]-[day]"))
        .expect("formatting a fixed date")
}

#[utoipa::path(
    get,
    path = "/api/v1.0/precipitation",
    responses(
        (status = OK, description = "Precipitation by date for the final year of the dataset", body = BTreeMap<String, Option<f64>>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn precipitation(
    State(state): State<Arc<AppState>>,
) -> Result<Json<BTreeMap<String, Option<f64>>>, (StatusCode, String)> {
    let since = observation_window_start();
    let readings = state
        .climate_db
        .precipitation_since(&since)
        .await
        .map_err(|err| {
            error!("error querying precipitation: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query precipitation: {}", err),
            )
        })?;

    // Duplicate dates across stations collapse to a single key, keeping the
    // last row read for that date.
    let mut by_date = BTreeMap::new();
    for reading in readings {
        by_date.insert(reading.date, reading.prcp);
    }

    Ok(Json(by_date))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/stations",
    responses(
        (status = OK, description = "All stations in the directory", body = Vec<Station>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn get_stations(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Station>>, (StatusCode, String)> {
    let stations = state.climate_db.stations().await.map_err(|err| {
        error!("error querying stations: {}", err);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Failed to query stations: {}", err),
        )
    })?;

    Ok(Json(stations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/tobs",
    responses(
        (status = OK, description = "Final-year temperature observations for the most active station", body = Vec<TemperatureObservation>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn tobs(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<TemperatureObservation>>, (StatusCode, String)> {
    let since = observation_window_start();
    let observations = state
        .climate_db
        .temperature_observations(MOST_ACTIVE_STATION, &since)
        .await
        .map_err(|err| {
            error!("error querying temperature observations: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to query temperature observations: {}", err),
            )
        })?;

    Ok(Json(observations))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}",
    params(
        ("start" = String, Path, description = "Start date (YYYY-MM-DD), inclusive; range is open-ended"),
    ),
    responses(
        (status = OK, description = "Temperature min/avg/max from the start date onward", body = Vec<TemperatureSummary>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temps_from_start(
    State(state): State<Arc<AppState>>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureSummary>>, (StatusCode, String)> {
    let summary = state
        .climate_db
        .temperature_summary_from(&start)
        .await
        .map_err(summary_error)?;

    Ok(Json(vec![summary]))
}

#[utoipa::path(
    get,
    path = "/api/v1.0/{start}/{end}",
    params(
        ("start" = String, Path, description = "Start date (YYYY-MM-DD), inclusive"),
        ("end" = String, Path, description = "End date (YYYY-MM-DD), inclusive"),
    ),
    responses(
        (status = OK, description = "Temperature min/avg/max over the date range", body = Vec<TemperatureSummary>),
        (status = INTERNAL_SERVER_ERROR, description = "Failed to query the dataset")
    ))]
pub async fn temps_for_range(
    State(state): State<Arc<AppState>>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureSummary>>, (StatusCode, String)> {
    let summary = state
        .climate_db
        .temperature_summary_between(&start, &end)
        .await
        .map_err(summary_error)?;

    Ok(Json(vec![summary]))
}

fn summary_error(err: crate::db::Error) -> (StatusCode, String) {
    error!("error querying temperature summary: {}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        format!("Failed to query temperature summary: {}", err),
    )
}
