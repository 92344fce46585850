use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// A sender's shipment request between two locations by a target date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Parcel {
    pub id: Uuid,
    pub sender_name: String,
    pub from: String,
    pub to: String,
    /// Weight in kilograms, at least 0.1
    pub weight: f64,
    pub date: NaiveDate,
    pub status: ParcelStatus,
    pub created_at: DateTime<Utc>,
}

/// Informational only: nothing in the matching or booking flow moves a parcel
/// between these states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParcelStatus {
    #[default]
    Pending,
    Matched,
    InTransit,
    Delivered,
    Cancelled,
}

impl ParcelStatus {
    pub const ALL: [ParcelStatus; 5] = [
        ParcelStatus::Pending,
        ParcelStatus::Matched,
        ParcelStatus::InTransit,
        ParcelStatus::Delivered,
        ParcelStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ParcelStatus::Pending => "pending",
            ParcelStatus::Matched => "matched",
            ParcelStatus::InTransit => "in_transit",
            ParcelStatus::Delivered => "delivered",
            ParcelStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for ParcelStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParcelStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParcelStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| {
                "Invalid parcel status. Must be: pending, matched, in_transit, delivered, or cancelled"
                    .to_string()
            })
    }
}

/// A traveler's declared journey
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Trip {
    pub id: Uuid,
    pub traveler_name: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    /// Maximum number of parcels the traveler is willing to carry.
    /// Descriptive only, bookings never consume it.
    pub capacity: i32,
    pub created_at: DateTime<Utc>,
}

/// Link between one parcel and one trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Booking {
    pub id: Uuid,
    pub parcel_id: Uuid,
    pub trip_id: Uuid,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Requested,
    Accepted,
    Completed,
}

impl BookingStatus {
    pub const ALL: [BookingStatus; 3] = [
        BookingStatus::Requested,
        BookingStatus::Accepted,
        BookingStatus::Completed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            BookingStatus::Requested => "requested",
            BookingStatus::Accepted => "accepted",
            BookingStatus::Completed => "completed",
        }
    }

    /// The single forward step out of this status, if any
    pub fn next(&self) -> Option<BookingStatus> {
        match self {
            BookingStatus::Requested => Some(BookingStatus::Accepted),
            BookingStatus::Accepted => Some(BookingStatus::Completed),
            BookingStatus::Completed => None,
        }
    }
}

impl fmt::Display for BookingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BookingStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| "Invalid status. Must be: requested, accepted, or completed".to_string())
    }
}

/// A booking joined with the full parcel and trip it links
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingView {
    pub id: Uuid,
    pub parcel: Parcel,
    pub trip: Trip,
    pub status: BookingStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BookingView {
    pub fn join(booking: Booking, parcel: Parcel, trip: Trip) -> Self {
        Self {
            id: booking.id,
            parcel,
            trip,
            status: booking.status,
            created_at: booking.created_at,
            updated_at: booking.updated_at,
        }
    }
}

/// Parcel fields supplied at creation; the store assigns id and timestamp
#[derive(Debug, Clone, PartialEq)]
pub struct NewParcel {
    pub sender_name: String,
    pub from: String,
    pub to: String,
    pub weight: f64,
    pub date: NaiveDate,
    pub status: ParcelStatus,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewTrip {
    pub traveler_name: String,
    pub from: String,
    pub to: String,
    pub date: NaiveDate,
    pub capacity: i32,
}
