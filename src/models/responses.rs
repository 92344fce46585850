use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::{Parcel, Trip};

/// Response for the single-parcel match lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FindMatchesResponse {
    pub parcel: Parcel,
    pub matching_trips: Vec<Trip>,
    pub count: usize,
}

/// One parcel with at least one eligible trip
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMatch {
    pub parcel: Parcel,
    pub matching_trips: Vec<Trip>,
}

/// A parcel whose match lookup failed and was left out of the aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchFailure {
    pub parcel_id: Uuid,
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenMatchesResponse {
    pub matches: Vec<OpenMatch>,
    pub failures: Vec<MatchFailure>,
    pub count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
}
