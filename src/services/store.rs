use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, NewParcel, NewTrip, Parcel, ParcelStatus, Trip};

/// Errors raised at the store boundary
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Booking already exists for parcel {parcel_id} and trip {trip_id}")]
    Duplicate { parcel_id: Uuid, trip_id: Uuid },

    /// A unique constraint other than the booking pair was violated
    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Store rejected the write: {0}")]
    Rejected(String),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

/// Outcome of a conditional booking status write
#[derive(Debug, Clone)]
pub enum StatusUpdate {
    Updated(Booking),
    /// The booking exists but its status was not one of the allowed sources
    Refused { current: BookingStatus },
    Missing,
}

/// Read and write access to parcels
#[async_trait]
pub trait ParcelStore: Send + Sync {
    async fn get_parcel(&self, id: Uuid) -> Result<Option<Parcel>, StoreError>;

    /// All parcels, optionally with an exact status, newest first
    async fn list_parcels(&self, status: Option<ParcelStatus>) -> Result<Vec<Parcel>, StoreError>;

    async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError>;
}

/// Read and write access to trips
#[async_trait]
pub trait TripStore: Send + Sync {
    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, StoreError>;

    /// All trips, earliest departure first
    async fn list_trips(&self) -> Result<Vec<Trip>, StoreError>;

    /// Trips departing on or after `date`, earliest first.
    ///
    /// Coarse pre-filter for the matcher; destination filtering happens in core.
    async fn trips_departing_on_or_after(&self, date: NaiveDate) -> Result<Vec<Trip>, StoreError>;

    async fn insert_trip(&self, trip: NewTrip) -> Result<Trip, StoreError>;
}

/// Read and write access to bookings
#[async_trait]
pub trait BookingStore: Send + Sync {
    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError>;

    /// All bookings, optionally with an exact status, newest first
    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError>;

    /// Atomically create a `requested` booking unless one already exists for
    /// the pair, in which case `StoreError::Duplicate` is returned.
    async fn insert_booking_if_absent(
        &self,
        parcel_id: Uuid,
        trip_id: Uuid,
    ) -> Result<Booking, StoreError>;

    /// Set the status if the current one is in `allowed_from`.
    ///
    /// The check and the write are one atomic step.
    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        allowed_from: &[BookingStatus],
    ) -> Result<StatusUpdate, StoreError>;
}

#[async_trait]
pub trait StoreHealth: Send + Sync {
    async fn health_check(&self) -> Result<bool, StoreError>;
}
