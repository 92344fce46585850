// Core matching and booking exports
pub mod booking;
pub mod error;
pub mod facade;
pub mod filters;
pub mod listings;
pub mod matcher;

pub use booking::{BookingManager, TransitionPolicy};
pub use error::CourierError;
pub use facade::{MatchBoard, OpenMatches, ParcelMatchFailure};
pub use filters::{departs_on_or_after, is_eligible_carrier, matches_destination};
pub use listings::ListingService;
pub use matcher::{select_matches, MatchResult, Matcher};
