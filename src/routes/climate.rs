use crate::{
    database::{DatedPrecipitation, DatedTemperature, TemperatureStats},
    error::AppError,
    server::Server,
};
use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};

const ROUTE_LISTING: &str = "\
Available routes:
  /api/v1.0/precipitation    precipitation readings for the 12 months ending at the most recent observation
  /api/v1.0/stations         all reporting station identifiers
  /api/v1.0/tobs             temperatures for the most active station over the trailing 12 months
  /api/v1.0/<start>          min, max and avg temperature on the given date (YYYY-MM-DD)
  /api/v1.0/<start>/<end>    min, max and avg temperature over the inclusive date range
";

/// Create the public climate API routes
pub fn create_climate_routes() -> Router<Server> {
    Router::new()
        .route("/", get(list_routes))
        .route("/api/v1.0/precipitation", get(precipitation))
        .route("/api/v1.0/stations", get(stations))
        .route("/api/v1.0/tobs", get(tobs))
        .route("/api/v1.0/{start}", get(stats_from_date))
        .route("/api/v1.0/{start}/{end}", get(stats_for_range))
}

/// Plain-text listing of the available endpoints
async fn list_routes() -> &'static str {
    ROUTE_LISTING
}

/// Precipitation readings for the trailing 12 months
async fn precipitation(
    State(server): State<Server>,
) -> Result<Json<Vec<DatedPrecipitation>>, AppError> {
    let readings = server.database.climate().precipitation_last_year().await?;
    Ok(Json(readings))
}

/// All station identifiers
async fn stations(State(server): State<Server>) -> Result<Json<Vec<String>>, AppError> {
    let ids = server.database.climate().station_ids().await?;
    Ok(Json(ids))
}

/// Temperatures for the most active station over the trailing 12 months
async fn tobs(State(server): State<Server>) -> Result<Json<Vec<DatedTemperature>>, AppError> {
    let readings = server.database.climate().most_active_temperatures().await?;
    Ok(Json(readings))
}

/// Temperature aggregates for one exact date. Route parameters are opaque
/// strings; a malformed date matches nothing and yields all-null aggregates.
async fn stats_from_date(
    State(server): State<Server>,
    Path(start): Path<String>,
) -> Result<Json<Vec<TemperatureStats>>, AppError> {
    let stats = server.database.climate().temperature_stats_on(&start).await?;
    Ok(Json(vec![stats]))
}

/// Temperature aggregates over an inclusive date range
async fn stats_for_range(
    State(server): State<Server>,
    Path((start, end)): Path<(String, String)>,
) -> Result<Json<Vec<TemperatureStats>>, AppError> {
    let stats = server
        .database
        .climate()
        .temperature_stats_between(&start, &end)
        .await?;
    Ok(Json(vec![stats]))
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{TestServerBuilder, seed_observation, seed_station};
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    async fn get_json(server: &crate::server::Server, uri: &str) -> (StatusCode, Value) {
        let app = server.create_app();
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
        (status, json)
    }

    #[tokio::test]
    async fn test_index_lists_routes_as_text() {
        let server = TestServerBuilder::new().build().await;
        let app = server.create_app();

        let request = Request::builder().uri("/").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("/api/v1.0/precipitation"));
        assert!(text.contains("/api/v1.0/<start>/<end>"));
    }

    #[tokio::test]
    async fn test_precipitation_window_and_null_passthrough() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_observation(db, "S1", "2016-05-01", Some(0.3), 70.0).await;
        seed_observation(db, "S1", "2017-08-23", None, 81.0).await;
        seed_observation(db, "S1", "2017-08-24", Some(0.08), 79.0).await;

        let (status, json) = get_json(&server, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::OK);

        let readings = json.as_array().unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0]["date"], "2017-08-23");
        assert!(readings[0]["prcp"].is_null());
        assert_eq!(readings[1]["prcp"].as_f64(), Some(0.08));
    }

    #[tokio::test]
    async fn test_precipitation_empty_store_is_no_data() {
        let server = TestServerBuilder::new().build().await;

        let (status, json) = get_json(&server, "/api/v1.0/precipitation").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(json["error"], "No data");
    }

    #[tokio::test]
    async fn test_stations_lists_all_identifiers() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_station(db, "USC00519397").await;
        seed_station(db, "USC00513117").await;

        let (status, json) = get_json(&server, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            json,
            serde_json::json!(["USC00519397", "USC00513117"])
        );
    }

    #[tokio::test]
    async fn test_stations_empty_store_is_empty_array() {
        let server = TestServerBuilder::new().build().await;

        let (status, json) = get_json(&server, "/api/v1.0/stations").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json, serde_json::json!([]));
    }

    #[tokio::test]
    async fn test_tobs_returns_most_active_station_series() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_observation(db, "S1", "2017-08-23", None, 81.0).await;
        seed_observation(db, "S1", "2017-08-24", None, 79.0).await;
        seed_observation(db, "S2", "2017-08-24", None, 99.0).await;

        let (status, json) = get_json(&server, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::OK);

        let readings = json.as_array().unwrap();
        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0]["date"], "2017-08-23");
        assert_eq!(readings[0]["tobs"].as_f64(), Some(81.0));
        assert_eq!(readings[1]["tobs"].as_f64(), Some(79.0));
    }

    #[tokio::test]
    async fn test_tobs_empty_store_is_no_data() {
        let server = TestServerBuilder::new().build().await;

        let (status, _) = get_json(&server, "/api/v1.0/tobs").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_stats_for_single_date() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_observation(db, "S1", "2017-08-23", Some(0.0), 81.0).await;
        seed_observation(db, "S1", "2017-08-24", Some(0.08), 79.0).await;

        let (status, json) = get_json(&server, "/api/v1.0/2017-08-23").await;
        assert_eq!(status, StatusCode::OK);

        let stats = json.as_array().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0]["max temp"].as_f64(), Some(81.0));
        assert_eq!(stats[0]["min temp"].as_f64(), Some(81.0));
        assert_eq!(stats[0]["avg temp"].as_f64(), Some(81.0));
    }

    #[tokio::test]
    async fn test_stats_for_date_range() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_observation(db, "S1", "2017-08-23", Some(0.0), 81.0).await;
        seed_observation(db, "S1", "2017-08-24", Some(0.08), 79.0).await;

        let (status, json) = get_json(&server, "/api/v1.0/2017-08-23/2017-08-24").await;
        assert_eq!(status, StatusCode::OK);

        let stats = json.as_array().unwrap();
        assert_eq!(stats.len(), 1);
        assert_eq!(stats[0]["max temp"].as_f64(), Some(81.0));
        assert_eq!(stats[0]["min temp"].as_f64(), Some(79.0));
        assert_eq!(stats[0]["avg temp"].as_f64(), Some(80.0));
    }

    #[tokio::test]
    async fn test_stats_empty_store_is_single_null_object() {
        let server = TestServerBuilder::new().build().await;

        let (status, json) = get_json(&server, "/api/v1.0/2020-01-01").await;
        assert_eq!(status, StatusCode::OK);

        let stats = json.as_array().unwrap();
        assert_eq!(stats.len(), 1);
        assert!(stats[0]["max temp"].is_null());
        assert!(stats[0]["min temp"].is_null());
        assert!(stats[0]["avg temp"].is_null());
    }

    #[tokio::test]
    async fn test_stats_malformed_date_is_all_null() {
        let server = TestServerBuilder::new().build().await;
        let db = server.database.connection();
        seed_observation(db, "S1", "2017-08-23", Some(0.0), 81.0).await;

        let (status, json) = get_json(&server, "/api/v1.0/definitely-not-a-date").await;
        assert_eq!(status, StatusCode::OK);

        let stats = json.as_array().unwrap();
        assert_eq!(stats.len(), 1);
        assert!(stats[0]["max temp"].is_null());
    }
}
