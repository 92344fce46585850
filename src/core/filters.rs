use crate::models::{Parcel, Trip};

/// Trip destination contains the parcel destination, ignoring case.
///
/// Substring, not equality: a parcel to "London" matches a trip to
/// "London, UK". The trip's origin is never consulted.
#[inline]
pub fn matches_destination(trip: &Trip, parcel: &Parcel) -> bool {
    trip.to.to_lowercase().contains(&parcel.to.to_lowercase())
}

/// Trip leaves on the parcel's date or later. No upper bound.
#[inline]
pub fn departs_on_or_after(trip: &Trip, parcel: &Parcel) -> bool {
    trip.date >= parcel.date
}

/// A trip may carry a parcel when both the destination and date rules hold.
/// Weight and capacity are not considered.
#[inline]
pub fn is_eligible_carrier(trip: &Trip, parcel: &Parcel) -> bool {
    departs_on_or_after(trip, parcel) && matches_destination(trip, parcel)
}
