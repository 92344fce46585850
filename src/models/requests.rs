use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::domain::{NewParcel, NewTrip, ParcelStatus};

/// Request to post a parcel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateParcelRequest {
    #[validate(length(min = 1, message = "Please provide sender name"))]
    pub sender_name: String,
    #[validate(length(min = 1, message = "Please provide origin"))]
    pub from: String,
    #[validate(length(min = 1, message = "Please provide destination"))]
    pub to: String,
    #[validate(range(min = 0.1, message = "Weight must be at least 0.1 kg"))]
    pub weight: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub status: Option<ParcelStatus>,
}

impl CreateParcelRequest {
    /// Trim text fields before validation so whitespace-only values are rejected
    pub fn trimmed(mut self) -> Self {
        self.sender_name = self.sender_name.trim().to_string();
        self.from = self.from.trim().to_string();
        self.to = self.to.trim().to_string();
        self
    }

    pub fn into_new_parcel(self) -> NewParcel {
        NewParcel {
            sender_name: self.sender_name,
            from: self.from,
            to: self.to,
            weight: self.weight,
            date: self.date,
            status: self.status.unwrap_or_default(),
        }
    }
}

/// Request to post a trip
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTripRequest {
    #[validate(length(min = 1, message = "Please provide traveler name"))]
    pub traveler_name: String,
    #[validate(length(min = 1, message = "Please provide origin"))]
    pub from: String,
    #[validate(length(min = 1, message = "Please provide destination"))]
    pub to: String,
    pub date: NaiveDate,
    #[validate(range(min = 1, message = "Capacity must be at least 1"))]
    pub capacity: i32,
}

impl CreateTripRequest {
    pub fn trimmed(mut self) -> Self {
        self.traveler_name = self.traveler_name.trim().to_string();
        self.from = self.from.trim().to_string();
        self.to = self.to.trim().to_string();
        self
    }

    pub fn into_new_trip(self) -> NewTrip {
        NewTrip {
            traveler_name: self.traveler_name,
            from: self.from,
            to: self.to,
            date: self.date,
            capacity: self.capacity,
        }
    }
}

/// Request to book a trip for a parcel
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(min = 1, message = "Please provide parcel ID"))]
    pub parcel_id: String,
    #[validate(length(min = 1, message = "Please provide trip ID"))]
    pub trip_id: String,
}

/// Status is kept as raw text so an unknown value reaches the lifecycle
/// manager and is rejected with the allowed set in the message.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateBookingStatusRequest {
    #[serde(default)]
    pub status: String,
}

/// `GET /matches?parcelId=`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchesQuery {
    pub parcel_id: Option<String>,
}

/// `?status=` filter shared by the parcel and booking listings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}
