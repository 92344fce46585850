use std::sync::Arc;
use validator::Validate;

use crate::core::error::CourierError;
use crate::models::{CreateParcelRequest, CreateTripRequest, Parcel, ParcelStatus, Trip};
use crate::services::{ParcelStore, TripStore};

/// Intake and listing of parcels and trips
#[derive(Clone)]
pub struct ListingService {
    parcels: Arc<dyn ParcelStore>,
    trips: Arc<dyn TripStore>,
}

impl ListingService {
    pub fn new(parcels: Arc<dyn ParcelStore>, trips: Arc<dyn TripStore>) -> Self {
        Self { parcels, trips }
    }

    pub async fn create_parcel(
        &self,
        request: CreateParcelRequest,
    ) -> Result<Parcel, CourierError> {
        let request = request.trimmed();
        request.validate()?;

        let parcel = self.parcels.insert_parcel(request.into_new_parcel()).await?;
        tracing::info!("Created parcel {} from {:?} to {:?}", parcel.id, parcel.from, parcel.to);
        Ok(parcel)
    }

    /// Newest first
    pub async fn list_parcels(
        &self,
        status: Option<ParcelStatus>,
    ) -> Result<Vec<Parcel>, CourierError> {
        Ok(self.parcels.list_parcels(status).await?)
    }

    pub async fn create_trip(&self, request: CreateTripRequest) -> Result<Trip, CourierError> {
        let request = request.trimmed();
        request.validate()?;

        let trip = self.trips.insert_trip(request.into_new_trip()).await?;
        tracing::info!(
            "Created trip {} from {:?} to {:?} on {}",
            trip.id,
            trip.from,
            trip.to,
            trip.date
        );
        Ok(trip)
    }

    /// Earliest departure first
    pub async fn list_trips(&self) -> Result<Vec<Trip>, CourierError> {
        Ok(self.trips.list_trips().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::InMemoryStore;
    use chrono::NaiveDate;

    fn service() -> ListingService {
        let store = Arc::new(InMemoryStore::new());
        ListingService::new(store.clone(), store)
    }

    #[tokio::test]
    async fn test_create_parcel_trims_fields() {
        let listings = service();

        let parcel = listings
            .create_parcel(CreateParcelRequest {
                sender_name: "  Jane Smith ".to_string(),
                from: "Los Angeles, USA".to_string(),
                to: " Paris, France".to_string(),
                weight: 1.8,
                date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
                status: None,
            })
            .await
            .unwrap();

        assert_eq!(parcel.sender_name, "Jane Smith");
        assert_eq!(parcel.to, "Paris, France");
        assert_eq!(parcel.status, ParcelStatus::Pending);
    }

    #[tokio::test]
    async fn test_create_trip_rejects_zero_capacity() {
        let listings = service();

        let err = listings
            .create_trip(CreateTripRequest {
                traveler_name: "Bob Wilson".to_string(),
                from: "San Francisco, USA".to_string(),
                to: "Paris, France".to_string(),
                date: NaiveDate::from_ymd_opt(2024, 2, 20).unwrap(),
                capacity: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CourierError::Validation(_)));
        assert!(listings.list_trips().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_parcels_by_status() {
        let listings = service();
        let base = CreateParcelRequest {
            sender_name: "Mike Johnson".to_string(),
            from: "Chicago, USA".to_string(),
            to: "Tokyo, Japan".to_string(),
            weight: 3.2,
            date: NaiveDate::from_ymd_opt(2024, 2, 25).unwrap(),
            status: None,
        };
        listings.create_parcel(base.clone()).await.unwrap();
        listings
            .create_parcel(CreateParcelRequest {
                status: Some(ParcelStatus::Delivered),
                ..base
            })
            .await
            .unwrap();

        assert_eq!(listings.list_parcels(None).await.unwrap().len(), 2);
        let delivered = listings.list_parcels(Some(ParcelStatus::Delivered)).await.unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].status, ParcelStatus::Delivered);
    }
}
