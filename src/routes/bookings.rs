use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::core::CourierError;
use crate::models::{
    BookingStatus, BookingView, CreateBookingRequest, StatusQuery, UpdateBookingStatusRequest,
};
use crate::routes::{parse_id, AppState};

/// Configure booking routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/bookings", web::post().to(create_booking))
        .route("/bookings", web::get().to(list_bookings))
        .route("/bookings/{id}", web::put().to(update_booking_status));
}

/// Book a trip for a parcel
///
/// POST /api/bookings
///
/// Request body:
/// ```json
/// { "parcelId": "uuid", "tripId": "uuid" }
/// ```
async fn create_booking(
    state: web::Data<AppState>,
    req: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, CourierError> {
    req.validate()?;

    let parcel_id = parse_id(&req.parcel_id, "Parcel")?;
    let trip_id = parse_id(&req.trip_id, "Trip")?;

    let booking = state.bookings.create_booking(parcel_id, trip_id).await?;

    Ok(HttpResponse::Created().json(booking))
}

/// GET /api/bookings?status={requested|accepted|completed}
async fn list_bookings(
    state: web::Data<AppState>,
    query: web::Query<StatusQuery>,
) -> Result<HttpResponse, CourierError> {
    let status = match query.status.as_deref().filter(|s| !s.is_empty()) {
        None => None,
        Some(raw) => match raw.parse::<BookingStatus>() {
            Ok(status) => Some(status),
            // an unknown status matches no booking
            Err(_) => return Ok(HttpResponse::Ok().json(Vec::<BookingView>::new())),
        },
    };

    let bookings = state.bookings.list_bookings(status).await?;

    Ok(HttpResponse::Ok().json(bookings))
}

/// PUT /api/bookings/{id}
///
/// Request body:
/// ```json
/// { "status": "requested|accepted|completed" }
/// ```
async fn update_booking_status(
    state: web::Data<AppState>,
    path: web::Path<String>,
    req: web::Json<UpdateBookingStatusRequest>,
) -> Result<HttpResponse, CourierError> {
    // Status is checked before the id so a bad value is reported even for unknown bookings
    let status: BookingStatus = req.status.parse().map_err(CourierError::Validation)?;
    let booking_id = parse_id(&path, "Booking")?;

    let booking = state.bookings.update_status(booking_id, status.as_str()).await?;

    Ok(HttpResponse::Ok().json(booking))
}
