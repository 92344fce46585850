use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::CourierError;
use crate::core::filters::is_eligible_carrier;
use crate::models::{Parcel, Trip};
use crate::services::{ParcelStore, TripStore};

/// Result of matching a single parcel
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub parcel: Parcel,
    pub matching_trips: Vec<Trip>,
}

/// Keep the eligible trips, earliest departure first.
///
/// The sort is stable, so trips on the same date stay in the order the
/// store returned them. No other tie-break is applied.
pub fn select_matches(parcel: &Parcel, candidates: Vec<Trip>) -> Vec<Trip> {
    let mut trips: Vec<Trip> = candidates
        .into_iter()
        .filter(|trip| is_eligible_carrier(trip, parcel))
        .collect();

    trips.sort_by_key(|trip| trip.date);
    trips
}

/// Finds the trips that can carry a parcel
///
/// # Pipeline Stages
/// 1. Store pre-filter: trips departing on or after the parcel date
/// 2. Destination and date eligibility
/// 3. Ordering by departure date
#[derive(Clone)]
pub struct Matcher {
    parcels: Arc<dyn ParcelStore>,
    trips: Arc<dyn TripStore>,
}

impl Matcher {
    pub fn new(parcels: Arc<dyn ParcelStore>, trips: Arc<dyn TripStore>) -> Self {
        Self { parcels, trips }
    }

    /// Look up a parcel and its matching trips.
    ///
    /// A missing parcel is `NotFound`; zero matching trips is an empty list.
    pub async fn find_matches(&self, parcel_id: Uuid) -> Result<MatchResult, CourierError> {
        let parcel = self
            .parcels
            .get_parcel(parcel_id)
            .await?
            .ok_or_else(|| CourierError::not_found("Parcel"))?;

        let matching_trips = self.matches_for(&parcel).await?;

        Ok(MatchResult {
            parcel,
            matching_trips,
        })
    }

    /// Matching trips for a parcel already in hand
    pub async fn matches_for(&self, parcel: &Parcel) -> Result<Vec<Trip>, CourierError> {
        let candidates = self.trips.trips_departing_on_or_after(parcel.date).await?;
        let total_candidates = candidates.len();

        let matches = select_matches(parcel, candidates);

        tracing::debug!(
            "Parcel {} to {:?}: {} matching trips (from {} candidates)",
            parcel.id,
            parcel.to,
            matches.len(),
            total_candidates
        );

        Ok(matches)
    }
}
