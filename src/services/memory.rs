use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, NewParcel, NewTrip, Parcel, ParcelStatus, Trip};
use crate::services::store::{
    BookingStore, ParcelStore, StatusUpdate, StoreError, StoreHealth, TripStore,
};

#[derive(Debug, Default)]
struct Tables {
    parcels: Vec<Parcel>,
    trips: Vec<Trip>,
    bookings: Vec<Booking>,
    booking_pairs: HashMap<(Uuid, Uuid), Uuid>,
}

/// In-process store used for local runs, tests and benchmarks
///
/// Rows are kept in insertion order. All writes go through a single write
/// lock, so `insert_booking_if_absent` is atomic.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed parcel, keeping its id and timestamp
    pub async fn seed_parcel(&self, parcel: Parcel) {
        self.tables.write().await.parcels.push(parcel);
    }

    pub async fn seed_trip(&self, trip: Trip) {
        self.tables.write().await.trips.push(trip);
    }

    pub async fn booking_count(&self) -> usize {
        self.tables.read().await.bookings.len()
    }
}

/// Newest first; ties keep the later insertion first
fn newest_first<T, F>(mut rows: Vec<T>, created_at: F) -> Vec<T>
where
    F: Fn(&T) -> chrono::DateTime<Utc>,
{
    rows.reverse();
    rows.sort_by(|a, b| created_at(b).cmp(&created_at(a)));
    rows
}

#[async_trait]
impl ParcelStore for InMemoryStore {
    async fn get_parcel(&self, id: Uuid) -> Result<Option<Parcel>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.parcels.iter().find(|p| p.id == id).cloned())
    }

    async fn list_parcels(&self, status: Option<ParcelStatus>) -> Result<Vec<Parcel>, StoreError> {
        let tables = self.tables.read().await;
        let rows: Vec<Parcel> = tables
            .parcels
            .iter()
            .filter(|p| status.map_or(true, |s| p.status == s))
            .cloned()
            .collect();
        Ok(newest_first(rows, |p| p.created_at))
    }

    async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        let parcel = Parcel {
            id: Uuid::new_v4(),
            sender_name: parcel.sender_name,
            from: parcel.from,
            to: parcel.to,
            weight: parcel.weight,
            date: parcel.date,
            status: parcel.status,
            created_at: Utc::now(),
        };
        self.tables.write().await.parcels.push(parcel.clone());
        Ok(parcel)
    }
}

#[async_trait]
impl TripStore for InMemoryStore {
    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.trips.iter().find(|t| t.id == id).cloned())
    }

    async fn list_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let mut trips = self.tables.read().await.trips.clone();
        trips.sort_by_key(|t| t.date);
        Ok(trips)
    }

    async fn trips_departing_on_or_after(&self, date: NaiveDate) -> Result<Vec<Trip>, StoreError> {
        let tables = self.tables.read().await;
        let mut trips: Vec<Trip> = tables
            .trips
            .iter()
            .filter(|t| t.date >= date)
            .cloned()
            .collect();
        trips.sort_by_key(|t| t.date);
        Ok(trips)
    }

    async fn insert_trip(&self, trip: NewTrip) -> Result<Trip, StoreError> {
        let trip = Trip {
            id: Uuid::new_v4(),
            traveler_name: trip.traveler_name,
            from: trip.from,
            to: trip.to,
            date: trip.date,
            capacity: trip.capacity,
            created_at: Utc::now(),
        };
        self.tables.write().await.trips.push(trip.clone());
        Ok(trip)
    }
}

#[async_trait]
impl BookingStore for InMemoryStore {
    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.bookings.iter().find(|b| b.id == id).cloned())
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        let tables = self.tables.read().await;
        let rows: Vec<Booking> = tables
            .bookings
            .iter()
            .filter(|b| status.map_or(true, |s| b.status == s))
            .cloned()
            .collect();
        Ok(newest_first(rows, |b| b.created_at))
    }

    async fn insert_booking_if_absent(
        &self,
        parcel_id: Uuid,
        trip_id: Uuid,
    ) -> Result<Booking, StoreError> {
        let mut tables = self.tables.write().await;

        if tables.booking_pairs.contains_key(&(parcel_id, trip_id)) {
            return Err(StoreError::Duplicate { parcel_id, trip_id });
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            parcel_id,
            trip_id,
            status: BookingStatus::Requested,
            created_at: now,
            updated_at: now,
        };
        tables.booking_pairs.insert((parcel_id, trip_id), booking.id);
        tables.bookings.push(booking.clone());
        Ok(booking)
    }

    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        allowed_from: &[BookingStatus],
    ) -> Result<StatusUpdate, StoreError> {
        let mut tables = self.tables.write().await;
        let Some(booking) = tables.bookings.iter_mut().find(|b| b.id == id) else {
            return Ok(StatusUpdate::Missing);
        };
        if !allowed_from.contains(&booking.status) {
            return Ok(StatusUpdate::Refused {
                current: booking.status,
            });
        }
        booking.status = status;
        booking.updated_at = Utc::now();
        Ok(StatusUpdate::Updated(booking.clone()))
    }
}

#[async_trait]
impl StoreHealth for InMemoryStore {
    async fn health_check(&self) -> Result<bool, StoreError> {
        Ok(true)
    }
}
