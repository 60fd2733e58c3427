use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, instrument};

use super::domain::{Car, CarId, Manufacturer};
use super::repository::{CarRepository, ManufacturerRepository};
use crate::clients::{MapsClient, PriceClient};
use crate::errors::ServiceError;

/// Vehicle business rules: lookups enrich reads, saves upsert.
///
/// The only component that talks to the pricing and maps services.
pub struct CarService {
    cars: Arc<dyn CarRepository>,
    manufacturers: Arc<dyn ManufacturerRepository>,
    prices: Arc<dyn PriceClient>,
    maps: Arc<dyn MapsClient>,
}

impl CarService {
    pub fn new(
        cars: Arc<dyn CarRepository>,
        manufacturers: Arc<dyn ManufacturerRepository>,
        prices: Arc<dyn PriceClient>,
        maps: Arc<dyn MapsClient>,
    ) -> Self {
        Self { cars, manufacturers, prices, maps }
    }

    /// All stored cars as they are in the store, without price or address.
    #[instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<Car>, ServiceError> {
        let cars = self.cars.find_all().await?;
        debug!(count = cars.len(), "cars listed");
        Ok(cars)
    }

    /// Load one car and enrich it with its current price and street address.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::car::{CarService, domain::{Car, Condition, Details, Location}};
    /// use service::car::repository::{CarRepository, mock::{InMemoryCarRepository, InMemoryManufacturerRepository}};
    /// use service::clients::mock::{FixedMapsClient, FixedPriceClient};
    ///
    /// let cars = Arc::new(InMemoryCarRepository::default());
    /// let details = Details { model: Some("Impala".into()), mileage: Some(32280), ..Default::default() };
    /// let stored = tokio_test::block_on(cars.save(&Car::new(Condition::Used, details, Location::new(40.73, -73.93)))).unwrap();
    ///
    /// let svc = CarService::new(
    ///     cars,
    ///     Arc::new(InMemoryManufacturerRepository::seeded()),
    ///     Arc::new(FixedPriceClient::new("USD", 15000.0)),
    ///     Arc::new(FixedMapsClient::default()),
    /// );
    /// let car = tokio_test::block_on(svc.find_by_id(stored.id.get().unwrap())).unwrap();
    /// assert_eq!(car.price.as_deref(), Some("USD 15000.00"));
    /// assert_eq!(car.location.city.as_deref(), Some("Abington"));
    /// ```
    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> Result<Car, ServiceError> {
        if id <= 0 {
            return Err(ServiceError::InvalidArgument(format!("car id must be positive, got {id}")));
        }
        let mut car = self.cars.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("car"))?;

        car.price = Some(self.prices.get_price(id).await?);
        car.location = self.maps.get_address(car.location.clone()).await?;
        debug!(car_id = id, price = ?car.price, "car enriched");
        Ok(car)
    }

    /// Create or update depending on the car's id.
    ///
    /// Updates copy details, location, condition and price onto the stored
    /// record. Creates persist a transient manufacturer first; if that fails
    /// nothing is stored.
    #[instrument(skip(self, car), fields(car_id = ?car.id.get()))]
    pub async fn save(&self, car: Car) -> Result<Car, ServiceError> {
        match car.id {
            CarId::Existing(id) => self.update(id, car).await,
            CarId::New => self.create(car).await,
        }
    }

    async fn update(&self, id: i64, incoming: Car) -> Result<Car, ServiceError> {
        let mut stored = self.cars.find_by_id(id).await?.ok_or_else(|| ServiceError::not_found("car"))?;
        stored.details = incoming.details;
        stored.location = incoming.location;
        stored.condition = incoming.condition;
        stored.price = incoming.price;
        stored.modified_at = Some(Utc::now());

        let saved = self.cars.save(&stored).await?;
        info!(car_id = id, "car_updated");
        Ok(saved)
    }

    async fn create(&self, mut car: Car) -> Result<Car, ServiceError> {
        let now = Utc::now();
        if car.created_at.is_none() {
            car.created_at = Some(now);
        }
        car.modified_at = Some(now);

        if let Some(details) = car.details.as_mut() {
            let transient = details.manufacturer.clone().filter(Manufacturer::is_transient);
            if let Some(maker) = transient {
                let saved = self.manufacturers.save(&maker).await?;
                info!(code = ?saved.code, name = %saved.name, "manufacturer_created");
                details.manufacturer = Some(saved);
            }
        }

        let saved = self.cars.save(&car).await?;
        info!(car_id = ?saved.id.get(), "car_created");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.cars.find_by_id(id).await?.is_none() {
            return Err(ServiceError::not_found("car"));
        }
        self.cars.delete_by_id(id).await?;
        info!(car_id = id, "car_deleted");
        Ok(())
    }

    #[instrument(skip(self))]
    pub async fn list_manufacturers(&self) -> Result<Vec<Manufacturer>, ServiceError> {
        self.manufacturers.find_all().await
    }

    #[instrument(skip(self))]
    pub async fn find_manufacturer(&self, code: i32) -> Result<Manufacturer, ServiceError> {
        self.manufacturers
            .find_by_id(code)
            .await?
            .ok_or_else(|| ServiceError::not_found("manufacturer"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    use crate::car::domain::{Condition, Details, Location};
    use crate::car::repository::mock::{InMemoryCarRepository, InMemoryManufacturerRepository};
    use crate::clients::mock::{FixedMapsClient, FixedPriceClient, UnreachableClient};
    use crate::clients::ClientError;
    use crate::test_support::impala;

    struct Fixture {
        cars: Arc<InMemoryCarRepository>,
        makers: Arc<InMemoryManufacturerRepository>,
        prices: Arc<FixedPriceClient>,
        maps: Arc<FixedMapsClient>,
        svc: CarService,
    }

    fn fixture_with(makers: InMemoryManufacturerRepository) -> Fixture {
        let cars = Arc::new(InMemoryCarRepository::default());
        let makers = Arc::new(makers);
        let prices = Arc::new(FixedPriceClient::new("USD", 12345.67));
        let maps = Arc::new(FixedMapsClient::default());
        let svc = CarService::new(cars.clone(), makers.clone(), prices.clone(), maps.clone());
        Fixture { cars, makers, prices, maps, svc }
    }

    fn fixture() -> Fixture {
        fixture_with(InMemoryManufacturerRepository::seeded())
    }

    async fn stored(f: &Fixture) -> i64 {
        f.svc.save(impala()).await.unwrap().id.get().unwrap()
    }

    #[tokio::test]
    async fn non_positive_ids_are_rejected_before_the_store() {
        let f = fixture();
        for id in [0, -1, i64::MIN] {
            assert!(matches!(f.svc.find_by_id(id).await, Err(ServiceError::InvalidArgument(_))));
        }
        assert_eq!(f.cars.calls(), 0);
        assert_eq!(f.prices.calls(), 0);
    }

    #[tokio::test]
    async fn missing_records_are_not_found() {
        let f = fixture();
        assert!(matches!(f.svc.find_by_id(9).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(f.svc.delete(9).await, Err(ServiceError::NotFound(_))));

        let mut ghost = impala();
        ghost.id = CarId::Existing(9);
        assert!(matches!(f.svc.save(ghost).await, Err(ServiceError::NotFound(_))));
        assert!(f.cars.is_empty());
    }

    #[tokio::test]
    async fn find_by_id_enriches_only_the_returned_value() {
        let f = fixture();
        let id = stored(&f).await;

        let car = f.svc.find_by_id(id).await.unwrap();
        assert_eq!(car.price.as_deref(), Some("USD 12345.67"));
        assert_eq!(car.location.address.as_deref(), Some("777 Brockton Avenue"));
        assert_eq!(car.location.lat, 40.730610);
        assert_eq!((f.prices.calls(), f.maps.calls()), (1, 1));

        let plain = f.cars.stored(id).unwrap();
        assert_eq!(plain.price, None);
        assert_eq!(plain.location, Location::new(40.730610, -73.935242));
    }

    #[tokio::test]
    async fn list_returns_stored_cars_without_lookups() {
        let f = fixture();
        stored(&f).await;
        stored(&f).await;

        let cars = f.svc.list().await.unwrap();
        assert_eq!(cars.len(), 2);
        assert!(cars.iter().all(|c| c.price.is_none()));
        assert_eq!(f.prices.calls(), 0);
        assert_eq!(f.maps.calls(), 0);
    }

    #[tokio::test]
    async fn update_keeps_identity_and_replaces_the_rest() {
        let f = fixture();
        let created = f.svc.save(impala()).await.unwrap();
        let id = created.id.get().unwrap();

        // age the stored copy so the new timestamp is strictly later
        let mut aged = f.cars.stored(id).unwrap();
        let earlier = Utc::now() - Duration::hours(1);
        aged.created_at = Some(earlier);
        aged.modified_at = Some(earlier);
        f.cars.save(&aged).await.unwrap();

        let mut incoming = impala();
        incoming.id = CarId::Existing(id);
        incoming.created_at = Some(Utc::now() + Duration::days(3));
        incoming.condition = Condition::New;
        incoming.location = Location::new(51.5, -0.12);
        incoming.price = Some("USD 1.00".into());
        incoming.details.as_mut().unwrap().mileage = Some(40000);

        let updated = f.svc.save(incoming).await.unwrap();
        assert_eq!(updated.id, CarId::Existing(id));
        assert_eq!(updated.created_at, Some(earlier));
        assert!(updated.modified_at.unwrap() > earlier);
        assert_eq!(updated.condition, Condition::New);
        assert_eq!(updated.location, Location::new(51.5, -0.12));
        assert_eq!(updated.price.as_deref(), Some("USD 1.00"));
        assert_eq!(updated.details.unwrap().mileage, Some(40000));
        assert_eq!(f.makers.saves(), 0);
    }

    #[tokio::test]
    async fn create_persists_a_transient_manufacturer_first() {
        let f = fixture();
        let mut car = impala();
        car.details.as_mut().unwrap().manufacturer = Some(Manufacturer { code: Some(0), name: "Chevrolet".into() });

        let saved = f.svc.save(car).await.unwrap();
        let maker = saved.manufacturer().unwrap();
        assert_eq!(maker.code, Some(105));
        assert_eq!(f.makers.saves(), 1);
        assert_eq!(f.cars.stored(saved.id.get().unwrap()).unwrap().manufacturer(), Some(maker));
    }

    #[tokio::test]
    async fn create_reuses_an_existing_manufacturer_code() {
        let f = fixture();
        let saved = f.svc.save(impala()).await.unwrap();
        assert_eq!(saved.manufacturer().and_then(|m| m.code), Some(101));
        assert_eq!(f.makers.saves(), 0);
    }

    #[tokio::test]
    async fn minimal_new_car_gets_id_code_and_equal_timestamps() {
        let f = fixture();
        let car: Car = serde_json::from_value(serde_json::json!({
            "id": null,
            "condition": "USED",
            "details": {
                "manufacturer": { "code": 0, "name": "Chevrolet" },
                "model": "Impala",
                "mileage": 32280
            }
        }))
        .unwrap();

        let saved = f.svc.save(car).await.unwrap();
        assert!(saved.id.get().is_some());
        assert_ne!(saved.manufacturer().and_then(|m| m.code), Some(0));
        assert!(saved.created_at.is_some());
        assert_eq!(saved.created_at, saved.modified_at);
    }

    #[tokio::test]
    async fn create_keeps_a_caller_supplied_creation_time() {
        let f = fixture();
        let when = Utc::now() - Duration::days(30);
        let mut car = impala();
        car.created_at = Some(when);

        let saved = f.svc.save(car).await.unwrap();
        assert_eq!(saved.created_at, Some(when));
        assert!(saved.modified_at.unwrap() > when);
    }

    #[tokio::test]
    async fn failing_manufacturer_save_stores_no_car() {
        let f = fixture_with(InMemoryManufacturerRepository::failing());
        let mut car = impala();
        car.details = Some(Details {
            manufacturer: Some(Manufacturer::unsaved("Chevrolet")),
            ..car.details.unwrap()
        });

        assert!(matches!(f.svc.save(car).await, Err(ServiceError::Db(_))));
        assert_eq!(f.cars.saves(), 0);
        assert!(f.cars.is_empty());
    }

    #[tokio::test]
    async fn delete_then_find_is_not_found() {
        let f = fixture();
        let id = stored(&f).await;
        assert_eq!(id, 1);

        f.svc.delete(1).await.unwrap();
        assert!(matches!(f.svc.find_by_id(1).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn lookup_failures_propagate() {
        let cars = Arc::new(InMemoryCarRepository::default());
        let id = cars.save(&impala()).await.unwrap().id.get().unwrap();
        let down = Arc::new(UnreachableClient);

        let svc = CarService::new(
            cars.clone(),
            Arc::new(InMemoryManufacturerRepository::seeded()),
            down.clone(),
            Arc::new(FixedMapsClient::default()),
        );
        let err = svc.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Client(ClientError::Network { service: "pricing", .. })));

        let svc = CarService::new(
            cars,
            Arc::new(InMemoryManufacturerRepository::seeded()),
            Arc::new(FixedPriceClient::new("USD", 1.0)),
            down,
        );
        let err = svc.find_by_id(id).await.unwrap_err();
        assert!(matches!(err, ServiceError::Client(ClientError::Network { service: "maps", .. })));
    }

    #[tokio::test]
    async fn manufacturers_are_readable() {
        let f = fixture();
        assert_eq!(f.svc.list_manufacturers().await.unwrap().len(), 5);
        assert_eq!(f.svc.find_manufacturer(103).await.unwrap().name, "BMW");
        assert!(matches!(f.svc.find_manufacturer(999).await, Err(ServiceError::NotFound(_))));
    }
}
