// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    Booking, BookingStatus, BookingView, NewParcel, NewTrip, Parcel, ParcelStatus, Trip,
};
pub use requests::{
    CreateBookingRequest, CreateParcelRequest, CreateTripRequest, MatchesQuery, StatusQuery,
    UpdateBookingStatusRequest,
};
pub use responses::{
    ErrorResponse, FindMatchesResponse, HealthResponse, MatchFailure, OpenMatch,
    OpenMatchesResponse,
};
