use crate::{
    db, get_stations, index_handler, precipitation, routes, temps_for_range, temps_from_start,
    tobs, ClimateAccess, ClimateData, Database,
};
use anyhow::anyhow;
use axum::{
    body::Body,
    extract::Request,
    middleware::{self, Next},
    response::IntoResponse,
    routing::get,
    Router,
};
use hyper::{
    header::{ACCEPT, CONTENT_TYPE},
    Method,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

#[derive(Clone)]
pub struct AppState {
    pub climate_db: Arc<dyn ClimateData>,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::climate::climate_routes::precipitation,
        routes::climate::climate_routes::get_stations,
        routes::climate::climate_routes::tobs,
        routes::climate::climate_routes::temps_from_start,
        routes::climate::climate_routes::temps_for_range,
    ),
    components(
        schemas(
                db::Station,
                db::TemperatureObservation,
                db::TemperatureSummary
            )
    ),
    tags(
        (name = "hawaii climate api", description = "read-only queries over the Hawaii precipitation and temperature observation dataset")
    )
)]
struct ApiDoc;

pub async fn build_app_state(database_path: String) -> Result<AppState, anyhow::Error> {
    let database = Database::open(&database_path)
        .await
        .map_err(|e| anyhow!("error opening SQLite dataset: {}", e))?;
    let climate_db = Arc::new(ClimateAccess::new(database.pool().clone()));

    Ok(AppState { climate_db })
}

pub fn app(app_state: AppState) -> Router {
    let api_docs = ApiDoc::openapi();
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([ACCEPT, CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/", get(index_handler))
        // API routes
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(get_stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(temps_from_start))
        .route("/api/v1.0/{start}/{end}", get(temps_for_range))
        .with_state(Arc::new(app_state))
        .layer(middleware::from_fn(log_request))
        .merge(Scalar::with_url("/docs", api_docs))
        .layer(cors)
}

async fn log_request(request: Request<Body>, next: Next) -> impl IntoResponse {
    let now = time::OffsetDateTime::now_utc();
    let path = request
        .uri()
        .path_and_query()
        .map(|p| p.as_str())
        .unwrap_or_default();
    info!(target: "http_request","new request, {} {}", request.method().as_str(), path);

    let response = next.run(request).await;
    let response_time = time::OffsetDateTime::now_utc() - now;
    info!(target: "http_response", "response, code: {}, time: {}", response.status().as_str(), response_time);

    response
}
