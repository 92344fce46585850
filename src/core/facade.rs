use futures::stream::{self, StreamExt};
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::CourierError;
use crate::core::matcher::{MatchResult, Matcher};
use crate::services::ParcelStore;

/// A parcel whose match lookup failed while building the board
#[derive(Debug)]
pub struct ParcelMatchFailure {
    pub parcel_id: Uuid,
    pub error: CourierError,
}

/// Every parcel with at least one matching trip, plus the lookups that failed
#[derive(Debug, Default)]
pub struct OpenMatches {
    pub matches: Vec<MatchResult>,
    pub failures: Vec<ParcelMatchFailure>,
}

/// Read-side view pairing each parcel with its matching trips
///
/// Lookups run concurrently, bounded by `max_concurrent_lookups`. A failed
/// lookup counts as zero matches for that parcel and is reported in
/// `failures`; it never fails the whole board.
#[derive(Clone)]
pub struct MatchBoard {
    parcels: Arc<dyn ParcelStore>,
    matcher: Matcher,
    max_concurrent_lookups: usize,
}

impl MatchBoard {
    pub fn new(
        parcels: Arc<dyn ParcelStore>,
        matcher: Matcher,
        max_concurrent_lookups: usize,
    ) -> Self {
        Self {
            parcels,
            matcher,
            max_concurrent_lookups: max_concurrent_lookups.max(1),
        }
    }

    /// Match every known parcel, whatever its status.
    ///
    /// Output follows the parcel listing order (newest first). Only the
    /// initial parcel listing can fail the call.
    pub async fn list_open_matches(&self) -> Result<OpenMatches, CourierError> {
        let parcels = self.parcels.list_parcels(None).await?;
        let total_parcels = parcels.len();

        let matcher = &self.matcher;
        let outcomes: Vec<(Uuid, Result<MatchResult, CourierError>)> = stream::iter(parcels)
            .map(|parcel| async move {
                let parcel_id = parcel.id;
                let found = matcher.matches_for(&parcel).await;
                let outcome = found.map(|matching_trips| MatchResult {
                    parcel,
                    matching_trips,
                });
                (parcel_id, outcome)
            })
            .buffered(self.max_concurrent_lookups)
            .collect()
            .await;

        let mut board = OpenMatches::default();
        for (parcel_id, outcome) in outcomes {
            match outcome {
                Ok(result) if !result.matching_trips.is_empty() => board.matches.push(result),
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(
                        "Match lookup failed for parcel {}, treating as no matches: {}",
                        parcel_id,
                        error
                    );
                    board.failures.push(ParcelMatchFailure { parcel_id, error });
                }
            }
        }

        tracing::info!(
            "Open matches: {} of {} parcels matched, {} lookups failed",
            board.matches.len(),
            total_parcels,
            board.failures.len()
        );

        Ok(board)
    }
}
