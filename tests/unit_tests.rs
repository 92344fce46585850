// Unit tests for the matching and booking core

use chrono::{NaiveDate, Utc};
use parcel_courier::core::{
    filters::is_eligible_carrier, select_matches, BookingManager, CourierError, MatchBoard, Matcher,
    TransitionPolicy,
};
use parcel_courier::models::{BookingStatus, NewParcel, NewTrip, Parcel, ParcelStatus, Trip};
use parcel_courier::services::{InMemoryStore, ParcelStore, TripStore};
use std::sync::Arc;
use uuid::Uuid;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn parcel(to: &str, on: NaiveDate) -> Parcel {
    Parcel {
        id: Uuid::new_v4(),
        sender_name: "John Doe".to_string(),
        from: "New York, USA".to_string(),
        to: to.to_string(),
        weight: 2.5,
        date: on,
        status: ParcelStatus::Pending,
        created_at: Utc::now(),
    }
}

fn trip(to: &str, on: NaiveDate) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        traveler_name: "Alice Brown".to_string(),
        from: "New York, USA".to_string(),
        to: to.to_string(),
        date: on,
        capacity: 5,
        created_at: Utc::now(),
    }
}

async fn seeded_store() -> (Arc<InMemoryStore>, Parcel, Trip) {
    let store = Arc::new(InMemoryStore::new());
    let p = store
        .insert_parcel(NewParcel {
            sender_name: "John Doe".to_string(),
            from: "New York, USA".to_string(),
            to: "London, UK".to_string(),
            weight: 2.5,
            date: date(2024, 2, 15),
            status: ParcelStatus::Pending,
        })
        .await
        .unwrap();
    let t = store
        .insert_trip(NewTrip {
            traveler_name: "Alice Brown".to_string(),
            from: "New York, USA".to_string(),
            to: "london, uk".to_string(),
            date: date(2024, 2, 16),
            capacity: 5,
        })
        .await
        .unwrap();
    (store, p, t)
}

fn manager(store: &Arc<InMemoryStore>, policy: TransitionPolicy) -> BookingManager {
    BookingManager::new(store.clone(), store.clone(), store.clone(), policy)
}

#[test]
fn test_scenario_london_case_insensitive_later_date() {
    let p = parcel("London, UK", date(2024, 2, 15));

    assert!(is_eligible_carrier(&trip("london, uk", date(2024, 2, 16)), &p));
    assert!(!is_eligible_carrier(&trip("London, UK", date(2024, 2, 10)), &p));
}

#[test]
fn test_match_iff_destination_contains_and_not_earlier() {
    let destinations = ["London", "london, uk", "Greater LONDON", "Paris, France", "Lond"];
    let dates = [date(2024, 2, 14), date(2024, 2, 15), date(2024, 3, 1), date(2031, 1, 1)];
    let parcels = [parcel("London", date(2024, 2, 15)), parcel("paris", date(2024, 1, 1))];

    for p in &parcels {
        let candidates: Vec<Trip> = destinations
            .iter()
            .flat_map(|to| dates.iter().map(move |d| trip(to, *d)))
            .collect();

        let selected = select_matches(p, candidates.clone());

        for t in &candidates {
            let expected = t.to.to_lowercase().contains(&p.to.to_lowercase()) && t.date >= p.date;
            let included = selected.iter().any(|s| s.id == t.id);
            assert_eq!(
                included, expected,
                "trip to {:?} on {} for parcel to {:?}",
                t.to, t.date, p.to
            );
        }
    }
}

#[test]
fn test_selected_matches_non_decreasing_by_date() {
    let p = parcel("Tokyo", date(2024, 2, 25));
    let candidates = vec![
        trip("Tokyo, Japan", date(2024, 4, 1)),
        trip("Tokyo, Japan", date(2024, 2, 25)),
        trip("Osaka, Japan", date(2024, 3, 1)),
        trip("Tokyo", date(2024, 3, 10)),
        trip("Tokyo", date(2024, 2, 25)),
    ];

    let selected = select_matches(&p, candidates);

    assert_eq!(selected.len(), 4);
    assert!(selected.windows(2).all(|w| w[0].date <= w[1].date));
}

#[test]
fn test_equal_dates_keep_input_order() {
    let p = parcel("Paris", date(2024, 2, 20));
    let first = trip("Paris", date(2024, 2, 21));
    let second = trip("Paris", date(2024, 2, 21));

    let selected = select_matches(&p, vec![first.clone(), second.clone()]);

    assert_eq!(selected[0].id, first.id);
    assert_eq!(selected[1].id, second.id);
}

#[tokio::test]
async fn test_sequential_duplicate_booking_conflict() {
    let (store, p, t) = seeded_store().await;
    let bookings = manager(&store, TransitionPolicy::Permissive);

    bookings.create_booking(p.id, t.id).await.unwrap();
    let err = bookings.create_booking(p.id, t.id).await.unwrap_err();

    assert!(matches!(err, CourierError::Conflict(_)));
    assert_eq!(err.to_string(), "Booking already exists");
    assert_eq!(store.booking_count().await, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_duplicate_booking_single_winner() {
    let (store, p, t) = seeded_store().await;
    let bookings = Arc::new(manager(&store, TransitionPolicy::Permissive));
    let (parcel_id, trip_id) = (p.id, t.id);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let bookings = bookings.clone();
            tokio::spawn(async move { bookings.create_booking(parcel_id, trip_id).await })
        })
        .collect();

    let mut created = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => created += 1,
            Err(CourierError::Conflict(_)) => conflicts += 1,
            Err(e) => panic!("unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(store.booking_count().await, 1);
}

#[tokio::test]
async fn test_status_accepted_then_completed() {
    let (store, p, t) = seeded_store().await;
    let bookings = manager(&store, TransitionPolicy::Permissive);
    let booking = bookings.create_booking(p.id, t.id).await.unwrap();

    bookings.update_status(booking.id, "accepted").await.unwrap();
    let done = bookings.update_status(booking.id, "completed").await.unwrap();

    assert_eq!(done.status, BookingStatus::Completed);
    assert_eq!(done.parcel.id, p.id);
}

#[tokio::test]
async fn test_status_jump_requested_to_completed_accepted() {
    let (store, p, t) = seeded_store().await;
    let bookings = manager(&store, TransitionPolicy::Permissive);
    let booking = bookings.create_booking(p.id, t.id).await.unwrap();

    let done = bookings.update_status(booking.id, "completed").await.unwrap();

    assert_eq!(done.status, BookingStatus::Completed);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_forward_only_concurrent_updates_never_move_backward() {
    let store = Arc::new(InMemoryStore::new());
    let bookings = Arc::new(manager(&store, TransitionPolicy::ForwardOnly));

    for round in 0..50 {
        let (p, t) = (parcel("London", date(2024, 2, 15)), trip("London, UK", date(2024, 2, 16)));
        store.seed_parcel(p.clone()).await;
        store.seed_trip(t.clone()).await;
        let booking_id = bookings.create_booking(p.id, t.id).await.unwrap().id;

        let accept = {
            let bookings = bookings.clone();
            tokio::spawn(async move { bookings.update_status(booking_id, "accepted").await })
        };
        let reset = {
            let bookings = bookings.clone();
            tokio::spawn(async move { bookings.update_status(booking_id, "requested").await })
        };
        accept.await.unwrap().unwrap();
        let _ = reset.await.unwrap();

        let listed = bookings.list_bookings(None).await.unwrap();
        let current = listed.iter().find(|b| b.id == booking_id).unwrap();
        assert_eq!(current.status, BookingStatus::Accepted, "round {}", round);
    }
}

#[tokio::test]
async fn test_update_status_unknown_booking() {
    let (store, _p, _t) = seeded_store().await;
    let bookings = manager(&store, TransitionPolicy::Permissive);

    let err = bookings.update_status(Uuid::new_v4(), "accepted").await.unwrap_err();

    assert!(matches!(err, CourierError::NotFound(_)));
}

#[tokio::test]
async fn test_list_bookings_newest_first_and_filtered() {
    let (store, p, t) = seeded_store().await;
    let second_trip = store
        .insert_trip(NewTrip {
            traveler_name: "Bob Wilson".to_string(),
            from: "Boston, USA".to_string(),
            to: "London, UK".to_string(),
            date: date(2024, 2, 18),
            capacity: 3,
        })
        .await
        .unwrap();
    let bookings = manager(&store, TransitionPolicy::Permissive);

    let older = bookings.create_booking(p.id, t.id).await.unwrap();
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let newer = bookings.create_booking(p.id, second_trip.id).await.unwrap();
    bookings.update_status(older.id, "accepted").await.unwrap();

    let all = bookings.list_bookings(None).await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, newer.id);
    assert_eq!(all[1].id, older.id);
    assert_eq!(all[0].trip.traveler_name, "Bob Wilson");

    let accepted = bookings.list_bookings(Some(BookingStatus::Accepted)).await.unwrap();
    assert_eq!(accepted.len(), 1);
    assert_eq!(accepted[0].id, older.id);
}

#[tokio::test]
async fn test_open_matches_never_includes_unmatched_parcels() {
    let (store, p, _t) = seeded_store().await;
    let unmatched = store
        .insert_parcel(NewParcel {
            sender_name: "Mike Johnson".to_string(),
            from: "Chicago, USA".to_string(),
            to: "Tokyo, Japan".to_string(),
            weight: 3.2,
            date: date(2024, 2, 25),
            status: ParcelStatus::Delivered,
        })
        .await
        .unwrap();
    let matcher = Matcher::new(store.clone(), store.clone());
    let board = MatchBoard::new(store.clone(), matcher, 2);

    let open = board.list_open_matches().await.unwrap();

    assert_eq!(open.matches.len(), 1);
    assert_eq!(open.matches[0].parcel.id, p.id);
    assert!(open.matches.iter().all(|m| m.parcel.id != unmatched.id));
    assert!(open.matches.iter().all(|m| !m.matching_trips.is_empty()));
}

#[tokio::test]
async fn test_open_matches_ignores_parcel_status() {
    let store = Arc::new(InMemoryStore::new());
    let on = date(2024, 2, 20);
    for status in [ParcelStatus::Pending, ParcelStatus::Matched, ParcelStatus::Cancelled] {
        store
            .insert_parcel(NewParcel {
                sender_name: "Jane Smith".to_string(),
                from: "Los Angeles, USA".to_string(),
                to: "Paris".to_string(),
                weight: 1.8,
                date: on,
                status,
            })
            .await
            .unwrap();
    }
    store.seed_trip(trip("Paris, France", on)).await;
    let board = MatchBoard::new(store.clone(), Matcher::new(store.clone(), store.clone()), 8);

    let open = board.list_open_matches().await.unwrap();

    assert_eq!(open.matches.len(), 3);
}
