// Route exports
pub mod bookings;
pub mod listings;
pub mod matches;

use actix_web::http::StatusCode;
use actix_web::{error, web, HttpRequest, HttpResponse, ResponseError};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::{
    BookingManager, CourierError, ListingService, MatchBoard, Matcher, TransitionPolicy,
};
use crate::models::ErrorResponse;
use crate::services::{BookingStore, ParcelStore, StoreHealth, TripStore};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub listings: ListingService,
    pub matcher: Matcher,
    pub board: MatchBoard,
    pub bookings: BookingManager,
    pub health: Arc<dyn StoreHealth>,
}

impl AppState {
    /// Wire every component to the one store, each seeing only the
    /// capabilities it needs.
    pub fn new<S>(store: Arc<S>, max_concurrent_lookups: usize, policy: TransitionPolicy) -> Self
    where
        S: ParcelStore + TripStore + BookingStore + StoreHealth + 'static,
    {
        let matcher = Matcher::new(store.clone(), store.clone());

        Self {
            listings: ListingService::new(store.clone(), store.clone()),
            board: MatchBoard::new(store.clone(), matcher.clone(), max_concurrent_lookups),
            bookings: BookingManager::new(store.clone(), store.clone(), store.clone(), policy),
            matcher,
            health: store,
        }
    }
}

impl ResponseError for CourierError {
    fn status_code(&self) -> StatusCode {
        match self {
            CourierError::NotFound(_) => StatusCode::NOT_FOUND,
            CourierError::Conflict(_) => StatusCode::CONFLICT,
            CourierError::Validation(_) => StatusCode::BAD_REQUEST,
            CourierError::Transient(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        }
        HttpResponse::build(status).json(ErrorResponse {
            error: self.kind().to_string(),
            message: self.to_string(),
            status_code: status.as_u16(),
        })
    }
}

/// Ids that are not UUIDs cannot name any record
pub(crate) fn parse_id(raw: &str, entity: &str) -> Result<Uuid, CourierError> {
    Uuid::parse_str(raw.trim()).map_err(|_| CourierError::not_found(entity))
}

/// Handle JSON payload errors
pub fn handle_json_payload_error(
    err: error::JsonPayloadError,
    req: &HttpRequest,
) -> actix_web::Error {
    tracing::info!("JSON payload error on {}: {}", req.path(), err);
    CourierError::Validation(format!("Invalid JSON: {}", err)).into()
}

/// Handle query payload errors
pub fn handle_query_payload_error(
    err: error::QueryPayloadError,
    _req: &HttpRequest,
) -> actix_web::Error {
    CourierError::Validation(format!("Invalid query: {}", err)).into()
}

/// Handle path parameter errors
pub fn handle_path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    CourierError::Validation(format!("Invalid path: {}", err)).into()
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .configure(matches::configure)
            .configure(listings::configure)
            .configure(bookings::configure),
    );
}
