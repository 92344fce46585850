use actix_web::{web, HttpResponse, Responder};

use crate::core::CourierError;
use crate::models::{
    FindMatchesResponse, HealthResponse, MatchFailure, MatchesQuery, OpenMatch, OpenMatchesResponse,
};
use crate::routes::{parse_id, AppState};

/// Configure health and match routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/matches", web::get().to(find_matches))
        .route("/matches/open", web::get().to(list_open_matches));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let store_healthy = match state.health.health_check().await {
        Ok(healthy) => healthy,
        Err(e) => {
            tracing::warn!("Store health check failed: {}", e);
            false
        }
    };

    let status = if store_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Trips that can carry a parcel
///
/// GET /api/matches?parcelId={parcelId}
async fn find_matches(
    state: web::Data<AppState>,
    query: web::Query<MatchesQuery>,
) -> Result<HttpResponse, CourierError> {
    let raw_id = query
        .parcel_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            CourierError::Validation("parcelId query parameter is required".to_string())
        })?;
    let parcel_id = parse_id(raw_id, "Parcel")?;

    let result = state.matcher.find_matches(parcel_id).await?;

    tracing::info!(
        "Returning {} matching trips for parcel {}",
        result.matching_trips.len(),
        parcel_id
    );

    Ok(HttpResponse::Ok().json(FindMatchesResponse {
        count: result.matching_trips.len(),
        parcel: result.parcel,
        matching_trips: result.matching_trips,
    }))
}

/// Every parcel that has at least one matching trip
///
/// GET /api/matches/open
///
/// Parcels whose lookup failed are listed under `failures` instead of
/// failing the request.
async fn list_open_matches(state: web::Data<AppState>) -> Result<HttpResponse, CourierError> {
    let board = state.board.list_open_matches().await?;

    let matches: Vec<OpenMatch> = board
        .matches
        .into_iter()
        .map(|m| OpenMatch {
            parcel: m.parcel,
            matching_trips: m.matching_trips,
        })
        .collect();
    let failures = board
        .failures
        .into_iter()
        .map(|f| MatchFailure {
            parcel_id: f.parcel_id,
            error: f.error.to_string(),
        })
        .collect();

    Ok(HttpResponse::Ok().json(OpenMatchesResponse {
        count: matches.len(),
        matches,
        failures,
    }))
}
