// Criterion benchmarks for the parcel courier matcher

use chrono::{Duration, NaiveDate, Utc};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use parcel_courier::core::{filters::is_eligible_carrier, select_matches, MatchBoard, Matcher};
use parcel_courier::models::{Parcel, ParcelStatus, Trip};
use parcel_courier::services::InMemoryStore;
use std::sync::Arc;
use uuid::Uuid;

const DESTINATIONS: [&str; 5] = [
    "London, UK",
    "Paris, France",
    "Tokyo, Japan",
    "Berlin, Germany",
    "Lagos, Nigeria",
];

fn base_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 2, 1).expect("valid date")
}

fn create_trip(i: usize) -> Trip {
    Trip {
        id: Uuid::new_v4(),
        traveler_name: format!("Traveler {}", i),
        from: "New York, USA".to_string(),
        to: DESTINATIONS[i % DESTINATIONS.len()].to_string(),
        date: base_date() + Duration::days((i % 60) as i64),
        capacity: 1 + (i % 5) as i32,
        created_at: Utc::now(),
    }
}

fn create_parcel(i: usize) -> Parcel {
    Parcel {
        id: Uuid::new_v4(),
        sender_name: format!("Sender {}", i),
        from: "Chicago, USA".to_string(),
        to: DESTINATIONS[i % DESTINATIONS.len()].split(',').next().unwrap_or_default().to_string(),
        weight: 1.5,
        date: base_date() + Duration::days((i % 30) as i64),
        status: ParcelStatus::Pending,
        created_at: Utc::now(),
    }
}

fn bench_eligibility(c: &mut Criterion) {
    let parcel = create_parcel(0);
    let trip = create_trip(7);

    c.bench_function("is_eligible_carrier", |b| {
        b.iter(|| is_eligible_carrier(black_box(&trip), black_box(&parcel)));
    });
}

fn bench_select_matches(c: &mut Criterion) {
    let parcel = create_parcel(0);

    let mut group = c.benchmark_group("select_matches");

    for trip_count in [10, 100, 1000, 10000].iter() {
        let trips: Vec<Trip> = (0..*trip_count).map(create_trip).collect();

        group.bench_with_input(BenchmarkId::new("trips", trip_count), trip_count, |b, _| {
            b.iter(|| select_matches(black_box(&parcel), black_box(trips.clone())));
        });
    }

    group.finish();
}

fn bench_open_matches(c: &mut Criterion) {
    let store = Arc::new(InMemoryStore::new());
    tokio_test::block_on(async {
        for i in 0..200 {
            store.seed_parcel(create_parcel(i)).await;
        }
        for i in 0..1000 {
            store.seed_trip(create_trip(i)).await;
        }
    });

    let board = MatchBoard::new(store.clone(), Matcher::new(store.clone(), store.clone()), 8);

    c.bench_function("list_open_matches_200_parcels_1000_trips", |b| {
        b.iter(|| tokio_test::block_on(board.list_open_matches()));
    });
}

criterion_group!(benches, bench_eligibility, bench_select_matches, bench_open_matches);

criterion_main!(benches);
