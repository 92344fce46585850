use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::error::ErrorKind;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;
use uuid::Uuid;

use crate::models::{Booking, BookingStatus, NewParcel, NewTrip, Parcel, ParcelStatus, Trip};
use crate::services::store::{
    BookingStore, ParcelStore, StatusUpdate, StoreError, StoreHealth, TripStore,
};

fn database_error(kind: ErrorKind, message: &str) -> StoreError {
    match kind {
        ErrorKind::UniqueViolation => StoreError::UniqueViolation(message.to_string()),
        _ => StoreError::Rejected(message.to_string()),
    }
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db) => database_error(db.kind(), db.message()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_) => {
                StoreError::Rejected(err.to_string())
            }
            _ => StoreError::Unavailable(err.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "parcel_status", rename_all = "snake_case")]
enum PgParcelStatus {
    Pending,
    Matched,
    InTransit,
    Delivered,
    Cancelled,
}

impl From<ParcelStatus> for PgParcelStatus {
    fn from(value: ParcelStatus) -> Self {
        match value {
            ParcelStatus::Pending => PgParcelStatus::Pending,
            ParcelStatus::Matched => PgParcelStatus::Matched,
            ParcelStatus::InTransit => PgParcelStatus::InTransit,
            ParcelStatus::Delivered => PgParcelStatus::Delivered,
            ParcelStatus::Cancelled => PgParcelStatus::Cancelled,
        }
    }
}

impl From<PgParcelStatus> for ParcelStatus {
    fn from(value: PgParcelStatus) -> Self {
        match value {
            PgParcelStatus::Pending => ParcelStatus::Pending,
            PgParcelStatus::Matched => ParcelStatus::Matched,
            PgParcelStatus::InTransit => ParcelStatus::InTransit,
            PgParcelStatus::Delivered => ParcelStatus::Delivered,
            PgParcelStatus::Cancelled => ParcelStatus::Cancelled,
        }
    }
}

#[derive(Debug, Clone, Copy, sqlx::Type)]
#[sqlx(type_name = "booking_status", rename_all = "lowercase")]
enum PgBookingStatus {
    Requested,
    Accepted,
    Completed,
}

impl From<BookingStatus> for PgBookingStatus {
    fn from(value: BookingStatus) -> Self {
        match value {
            BookingStatus::Requested => PgBookingStatus::Requested,
            BookingStatus::Accepted => PgBookingStatus::Accepted,
            BookingStatus::Completed => PgBookingStatus::Completed,
        }
    }
}

impl From<PgBookingStatus> for BookingStatus {
    fn from(value: PgBookingStatus) -> Self {
        match value {
            PgBookingStatus::Requested => BookingStatus::Requested,
            PgBookingStatus::Accepted => BookingStatus::Accepted,
            PgBookingStatus::Completed => BookingStatus::Completed,
        }
    }
}

const PARCEL_COLUMNS: &str =
    "id, sender_name, origin, destination, weight_kg, send_date, status, created_at";
const TRIP_COLUMNS: &str =
    "id, traveler_name, origin, destination, departure_date, capacity, created_at";
const BOOKING_COLUMNS: &str = "id, parcel_id, trip_id, status, created_at, updated_at";

fn parcel_from_row(row: &PgRow) -> Result<Parcel, sqlx::Error> {
    Ok(Parcel {
        id: row.try_get("id")?,
        sender_name: row.try_get("sender_name")?,
        from: row.try_get("origin")?,
        to: row.try_get("destination")?,
        weight: row.try_get("weight_kg")?,
        date: row.try_get("send_date")?,
        status: row.try_get::<PgParcelStatus, _>("status")?.into(),
        created_at: row.try_get("created_at")?,
    })
}

fn trip_from_row(row: &PgRow) -> Result<Trip, sqlx::Error> {
    Ok(Trip {
        id: row.try_get("id")?,
        traveler_name: row.try_get("traveler_name")?,
        from: row.try_get("origin")?,
        to: row.try_get("destination")?,
        date: row.try_get("departure_date")?,
        capacity: row.try_get("capacity")?,
        created_at: row.try_get("created_at")?,
    })
}

fn booking_from_row(row: &PgRow) -> Result<Booking, sqlx::Error> {
    Ok(Booking {
        id: row.try_get("id")?,
        parcel_id: row.try_get("parcel_id")?,
        trip_id: row.try_get("trip_id")?,
        status: row.try_get::<PgBookingStatus, _>("status")?.into(),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// PostgreSQL-backed store for parcels, trips and bookings
///
/// The `(parcel_id, trip_id)` pair is unique at the schema level, so
/// concurrent booking requests for the same pair cannot both succeed.
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connect, then run embedded migrations
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
        acquire_timeout: Duration,
        idle_timeout: Duration,
    ) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(acquire_timeout)
            .idle_timeout(idle_timeout)
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { pool })
    }

    /// Create a new PostgreSQL client from settings
    pub async fn from_settings(
        url: &str,
        max_connections: Option<u32>,
        min_connections: Option<u32>,
        acquire_timeout_secs: Option<u64>,
        idle_timeout_secs: Option<u64>,
    ) -> Result<Self, StoreError> {
        tracing::info!("Connecting to PostgreSQL");

        Self::new(
            url,
            max_connections.unwrap_or(10),
            min_connections.unwrap_or(1),
            Duration::from_secs(acquire_timeout_secs.unwrap_or(5)),
            Duration::from_secs(idle_timeout_secs.unwrap_or(600)),
        )
        .await
    }
}

#[async_trait]
impl ParcelStore for PostgresClient {
    async fn get_parcel(&self, id: Uuid) -> Result<Option<Parcel>, StoreError> {
        let query = format!("SELECT {PARCEL_COLUMNS} FROM parcels WHERE id = $1");

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(parcel_from_row).transpose()?)
    }

    async fn list_parcels(&self, status: Option<ParcelStatus>) -> Result<Vec<Parcel>, StoreError> {
        let query = format!(
            r#"
            SELECT {PARCEL_COLUMNS}
            FROM parcels
            WHERE ($1::parcel_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(status.map(PgParcelStatus::from))
            .fetch_all(&self.pool)
            .await?;

        let parcels: Result<Vec<Parcel>, _> = rows.iter().map(parcel_from_row).collect();
        Ok(parcels?)
    }

    async fn insert_parcel(&self, parcel: NewParcel) -> Result<Parcel, StoreError> {
        let query = format!(
            r#"
            INSERT INTO parcels (id, sender_name, origin, destination, weight_kg, send_date, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
            RETURNING {PARCEL_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&parcel.sender_name)
            .bind(&parcel.from)
            .bind(&parcel.to)
            .bind(parcel.weight)
            .bind(parcel.date)
            .bind(PgParcelStatus::from(parcel.status))
            .fetch_one(&self.pool)
            .await?;

        Ok(parcel_from_row(&row)?)
    }
}

#[async_trait]
impl TripStore for PostgresClient {
    async fn get_trip(&self, id: Uuid) -> Result<Option<Trip>, StoreError> {
        let query = format!("SELECT {TRIP_COLUMNS} FROM trips WHERE id = $1");

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(trip_from_row).transpose()?)
    }

    async fn list_trips(&self) -> Result<Vec<Trip>, StoreError> {
        let query = format!("SELECT {TRIP_COLUMNS} FROM trips ORDER BY departure_date ASC");

        let rows = sqlx::query(&query).fetch_all(&self.pool).await?;

        let trips: Result<Vec<Trip>, _> = rows.iter().map(trip_from_row).collect();
        Ok(trips?)
    }

    async fn trips_departing_on_or_after(&self, date: NaiveDate) -> Result<Vec<Trip>, StoreError> {
        let query = format!(
            r#"
            SELECT {TRIP_COLUMNS}
            FROM trips
            WHERE departure_date >= $1
            ORDER BY departure_date ASC
            "#
        );

        let rows = sqlx::query(&query).bind(date).fetch_all(&self.pool).await?;

        tracing::debug!("{} trips depart on or after {}", rows.len(), date);

        let trips: Result<Vec<Trip>, _> = rows.iter().map(trip_from_row).collect();
        Ok(trips?)
    }

    async fn insert_trip(&self, trip: NewTrip) -> Result<Trip, StoreError> {
        let query = format!(
            r#"
            INSERT INTO trips (id, traveler_name, origin, destination, departure_date, capacity, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, NOW())
            RETURNING {TRIP_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(&trip.traveler_name)
            .bind(&trip.from)
            .bind(&trip.to)
            .bind(trip.date)
            .bind(trip.capacity)
            .fetch_one(&self.pool)
            .await?;

        Ok(trip_from_row(&row)?)
    }
}

#[async_trait]
impl BookingStore for PostgresClient {
    async fn get_booking(&self, id: Uuid) -> Result<Option<Booking>, StoreError> {
        let query = format!("SELECT {BOOKING_COLUMNS} FROM bookings WHERE id = $1");

        let row = sqlx::query(&query).bind(id).fetch_optional(&self.pool).await?;

        Ok(row.as_ref().map(booking_from_row).transpose()?)
    }

    async fn list_bookings(
        &self,
        status: Option<BookingStatus>,
    ) -> Result<Vec<Booking>, StoreError> {
        let query = format!(
            r#"
            SELECT {BOOKING_COLUMNS}
            FROM bookings
            WHERE ($1::booking_status IS NULL OR status = $1)
            ORDER BY created_at DESC
            "#
        );

        let rows = sqlx::query(&query)
            .bind(status.map(PgBookingStatus::from))
            .fetch_all(&self.pool)
            .await?;

        let bookings: Result<Vec<Booking>, _> = rows.iter().map(booking_from_row).collect();
        Ok(bookings?)
    }

    /// Uses INSERT ... ON CONFLICT DO NOTHING so the uniqueness check and the
    /// write are a single statement.
    async fn insert_booking_if_absent(
        &self,
        parcel_id: Uuid,
        trip_id: Uuid,
    ) -> Result<Booking, StoreError> {
        let query = format!(
            r#"
            INSERT INTO bookings (id, parcel_id, trip_id, status, created_at, updated_at)
            VALUES ($1, $2, $3, 'requested', NOW(), NOW())
            ON CONFLICT (parcel_id, trip_id) DO NOTHING
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let row = sqlx::query(&query)
            .bind(Uuid::new_v4())
            .bind(parcel_id)
            .bind(trip_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(booking_from_row(&row)?),
            None => Err(StoreError::Duplicate { parcel_id, trip_id }),
        }
    }

    /// The allowed-source check lives in the UPDATE's WHERE clause.
    async fn update_booking_status(
        &self,
        id: Uuid,
        status: BookingStatus,
        allowed_from: &[BookingStatus],
    ) -> Result<StatusUpdate, StoreError> {
        let query = format!(
            r#"
            UPDATE bookings
            SET status = $2, updated_at = NOW()
            WHERE id = $1 AND status::text = ANY($3)
            RETURNING {BOOKING_COLUMNS}
            "#
        );

        let allowed: Vec<&str> = allowed_from.iter().map(BookingStatus::as_str).collect();

        let row = sqlx::query(&query)
            .bind(id)
            .bind(PgBookingStatus::from(status))
            .bind(allowed)
            .fetch_optional(&self.pool)
            .await?;

        if let Some(row) = row {
            return Ok(StatusUpdate::Updated(booking_from_row(&row)?));
        }

        Ok(match self.get_booking(id).await? {
            Some(current) => StatusUpdate::Refused {
                current: current.status,
            },
            None => StatusUpdate::Missing,
        })
    }
}

#[async_trait]
impl StoreHealth for PostgresClient {
    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .map(|_| true)
            .map_err(Into::into)
    }
}
