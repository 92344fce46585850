//! Parcel Courier - matching and booking service for a peer-to-peer parcel marketplace
//!
//! Senders post parcels, travelers post trips. This library decides which
//! trips can carry a parcel and manages the bookings that pair them.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{
    BookingManager, CourierError, ListingService, MatchBoard, Matcher, TransitionPolicy,
};
pub use crate::models::{Booking, BookingStatus, BookingView, Parcel, ParcelStatus, Trip};
pub use crate::services::{InMemoryStore, PostgresClient};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        assert_eq!(TransitionPolicy::default(), TransitionPolicy::Permissive);
        assert_eq!(BookingStatus::default(), BookingStatus::Requested);
    }
}
