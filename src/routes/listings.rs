use actix_web::{web, HttpResponse};

use crate::core::CourierError;
use crate::models::{CreateParcelRequest, CreateTripRequest, Parcel, ParcelStatus, StatusQuery};
use crate::routes::AppState;

/// Configure parcel and trip routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/parcels", web::post().to(create_parcel))
        .route("/parcels", web::get().to(list_parcels))
        .route("/trips", web::post().to(create_trip))
        .route("/trips", web::get().to(list_trips));
}

/// POST /api/parcels
async fn create_parcel(
    state: web::Data<AppState>,
    req: web::Json<CreateParcelRequest>,
) -> Result<HttpResponse, CourierError> {
    let parcel = state.listings.create_parcel(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(parcel))
}

/// GET /api/parcels?status={status}
async fn list_parcels(
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, CourierError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<ParcelStatus>() {
            Ok(status) => Some(status),
            Err(_) => return Ok(HttpResponse::Ok().json(Vec::<Parcel>::new())),
        },
    };

    let parcels = state.listings.list_parcels(status).await?;
    Ok(HttpResponse::Ok().json(parcels))
}

/// POST /api/trips
async fn create_trip(
    state: web::Data<AppState>,
    req: web::Json<CreateTripRequest>,
) -> Result<HttpResponse, CourierError> {
    let trip = state.listings.create_trip(req.into_inner()).await?;
    Ok(HttpResponse::Created().json(trip))
}

/// GET /api/trips
async fn list_trips(state: web::Data<AppState>) -> Result<HttpResponse, CourierError> {
    let trips = state.listings.list_trips().await?;
    Ok(HttpResponse::Ok().json(trips))
}
