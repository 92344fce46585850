use serde::Deserialize;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::CourierError;
use crate::models::{Booking, BookingStatus, BookingView};
use crate::services::{BookingStore, ParcelStore, StatusUpdate, TripStore};

/// Which status changes `update_status` accepts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransitionPolicy {
    /// Any of the three statuses may be set at any time
    #[default]
    Permissive,
    /// Only requested -> accepted -> completed, one step at a time.
    /// Re-writing the current status is allowed.
    ForwardOnly,
}

impl TransitionPolicy {
    pub fn allows(&self, from: BookingStatus, to: BookingStatus) -> bool {
        match self {
            TransitionPolicy::Permissive => true,
            TransitionPolicy::ForwardOnly => from == to || from.next() == Some(to),
        }
    }

    /// Every status a booking may currently hold to be moved to `to`
    pub fn allowed_from(&self, to: BookingStatus) -> Vec<BookingStatus> {
        BookingStatus::ALL
            .into_iter()
            .filter(|from| self.allows(*from, to))
            .collect()
    }
}

/// Creates bookings and moves them through their status lifecycle
#[derive(Clone)]
pub struct BookingManager {
    parcels: Arc<dyn ParcelStore>,
    trips: Arc<dyn TripStore>,
    bookings: Arc<dyn BookingStore>,
    policy: TransitionPolicy,
}

impl BookingManager {
    pub fn new(
        parcels: Arc<dyn ParcelStore>,
        trips: Arc<dyn TripStore>,
        bookings: Arc<dyn BookingStore>,
        policy: TransitionPolicy,
    ) -> Self {
        Self {
            parcels,
            trips,
            bookings,
            policy,
        }
    }

    /// Book `trip_id` for `parcel_id`.
    ///
    /// Both records must exist. The pair is unique: a second request for the
    /// same pair is a `Conflict`, enforced by the store rather than a prior read.
    pub async fn create_booking(
        &self,
        parcel_id: Uuid,
        trip_id: Uuid,
    ) -> Result<BookingView, CourierError> {
        let parcel = self
            .parcels
            .get_parcel(parcel_id)
            .await?
            .ok_or_else(|| CourierError::not_found("Parcel"))?;

        let trip = self
            .trips
            .get_trip(trip_id)
            .await?
            .ok_or_else(|| CourierError::not_found("Trip"))?;

        let booking = self.bookings.insert_booking_if_absent(parcel_id, trip_id).await?;

        tracing::info!(
            "Created booking {} for parcel {} on trip {}",
            booking.id,
            parcel_id,
            trip_id
        );

        Ok(BookingView::join(booking, parcel, trip))
    }

    /// All bookings, newest first, joined with their parcel and trip.
    ///
    /// A booking whose parcel or trip cannot be found is left out and logged.
    pub async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<BookingView>, CourierError> {
        let bookings = self.bookings.list_bookings(status).await?;
        let mut views = Vec::with_capacity(bookings.len());

        for booking in bookings {
            let booking_id = booking.id;
            match self.join(booking).await {
                Ok(view) => views.push(view),
                Err(CourierError::NotFound(message)) => {
                    tracing::warn!("Skipping booking {}: {}", booking_id, message);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::debug!("Listed {} bookings (status filter: {:?})", views.len(), status);

        Ok(views)
    }

    /// Set a booking's status.
    ///
    /// `status` is raw text; anything outside requested/accepted/completed is a
    /// `Validation` error and nothing is written.
    pub async fn update_status(
        &self,
        booking_id: Uuid,
        status: &str,
    ) -> Result<BookingView, CourierError> {
        let status: BookingStatus = status.parse().map_err(CourierError::Validation)?;
        let allowed_from = self.policy.allowed_from(status);

        let booking = match self
            .bookings
            .update_booking_status(booking_id, status, &allowed_from)
            .await?
        {
            StatusUpdate::Updated(booking) => booking,
            StatusUpdate::Refused { current } => {
                return Err(CourierError::Validation(format!(
                    "Cannot change booking status from {} to {}",
                    current, status
                )));
            }
            StatusUpdate::Missing => return Err(CourierError::not_found("Booking")),
        };

        tracing::info!("Booking {} status set to {}", booking_id, status);

        self.join(booking).await
    }

    async fn join(&self, booking: Booking) -> Result<BookingView, CourierError> {
        let parcel = self
            .parcels
            .get_parcel(booking.parcel_id)
            .await?
            .ok_or_else(|| CourierError::not_found("Parcel"))?;

        let trip = self
            .trips
            .get_trip(booking.trip_id)
            .await?
            .ok_or_else(|| CourierError::not_found("Trip"))?;

        Ok(BookingView::join(booking, parcel, trip))
    }
}
