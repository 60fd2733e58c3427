use async_trait::async_trait;

use super::domain::{Car, Manufacturer};
use crate::errors::ServiceError;

/// Persistence for vehicle records.
///
/// Stores never keep the transient parts of a car (price, resolved address);
/// `save` hands them back on the returned value.
#[async_trait]
pub trait CarRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Car>, ServiceError>;
    /// Insert when the id is `New`, update otherwise.
    async fn save(&self, car: &Car) -> Result<Car, ServiceError>;
    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError>;
}

/// Persistence for manufacturers.
#[async_trait]
pub trait ManufacturerRepository: Send + Sync {
    async fn find_by_id(&self, code: i32) -> Result<Option<Manufacturer>, ServiceError>;
    async fn find_all(&self) -> Result<Vec<Manufacturer>, ServiceError>;
    /// Assigns a code when the manufacturer is transient.
    async fn save(&self, manufacturer: &Manufacturer) -> Result<Manufacturer, ServiceError>;
    async fn delete_by_id(&self, code: i32) -> Result<(), ServiceError>;
}

pub(crate) fn reject_transient_reference(car: &Car) -> Result<Option<i32>, ServiceError> {
    match car.manufacturer() {
        Some(m) if m.is_transient() => Err(ServiceError::Validation(
            "manufacturer must be saved before a car references it".into(),
        )),
        Some(m) => Ok(m.code),
        None => Ok(None),
    }
}

/// In-memory stores for tests, doc examples and benches
pub mod mock {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    use crate::car::domain::CarId;

    #[derive(Default)]
    pub struct InMemoryCarRepository {
        cars: Mutex<BTreeMap<i64, Car>>,
        next_id: Mutex<i64>,
        calls: AtomicUsize,
        saves: AtomicUsize,
    }

    impl InMemoryCarRepository {
        /// Every call made against the store, reads included.
        pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }

        pub fn saves(&self) -> usize { self.saves.load(Ordering::SeqCst) }

        pub fn len(&self) -> usize { self.cars.lock().unwrap().len() }

        pub fn is_empty(&self) -> bool { self.len() == 0 }

        /// The stored copy, bypassing the counters.
        pub fn stored(&self, id: i64) -> Option<Car> { self.cars.lock().unwrap().get(&id).cloned() }

        fn touch(&self) { self.calls.fetch_add(1, Ordering::SeqCst); }
    }

    #[async_trait]
    impl CarRepository for InMemoryCarRepository {
        async fn find_by_id(&self, id: i64) -> Result<Option<Car>, ServiceError> {
            self.touch();
            Ok(self.cars.lock().unwrap().get(&id).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Car>, ServiceError> {
            self.touch();
            Ok(self.cars.lock().unwrap().values().cloned().collect())
        }

        async fn save(&self, car: &Car) -> Result<Car, ServiceError> {
            self.touch();
            self.saves.fetch_add(1, Ordering::SeqCst);
            reject_transient_reference(car)?;

            let mut cars = self.cars.lock().unwrap();
            let id = match car.id {
                CarId::Existing(id) if cars.contains_key(&id) => id,
                CarId::Existing(_) => return Err(ServiceError::not_found("car")),
                CarId::New => {
                    let mut next = self.next_id.lock().unwrap();
                    *next += 1;
                    *next
                }
            };
            let mut saved = car.clone();
            saved.id = CarId::Existing(id);
            cars.insert(id, saved.without_transient());
            Ok(saved)
        }

        async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
            self.touch();
            self.cars.lock().unwrap().remove(&id);
            Ok(())
        }
    }

    #[derive(Default)]
    pub struct InMemoryManufacturerRepository {
        makers: Mutex<BTreeMap<i32, Manufacturer>>,
        next_code: Mutex<i32>,
        saves: AtomicUsize,
        fail_saves: bool,
    }

    impl InMemoryManufacturerRepository {
        /// Pre-filled with the same rows the migrations seed.
        pub fn seeded() -> Self {
            let repo = Self::default();
            {
                let mut makers = repo.makers.lock().unwrap();
                for (code, name) in [(100, "Audi"), (101, "Chevrolet"), (102, "Ford"), (103, "BMW"), (104, "Dodge")] {
                    makers.insert(code, Manufacturer::new(code, name));
                }
                *repo.next_code.lock().unwrap() = 104;
            }
            repo
        }

        /// Every `save` fails with a database error.
        pub fn failing() -> Self {
            Self { fail_saves: true, ..Self::seeded() }
        }

        pub fn saves(&self) -> usize { self.saves.load(Ordering::SeqCst) }
    }

    #[async_trait]
    impl ManufacturerRepository for InMemoryManufacturerRepository {
        async fn find_by_id(&self, code: i32) -> Result<Option<Manufacturer>, ServiceError> {
            Ok(self.makers.lock().unwrap().get(&code).cloned())
        }

        async fn find_all(&self) -> Result<Vec<Manufacturer>, ServiceError> {
            Ok(self.makers.lock().unwrap().values().cloned().collect())
        }

        async fn save(&self, manufacturer: &Manufacturer) -> Result<Manufacturer, ServiceError> {
            self.saves.fetch_add(1, Ordering::SeqCst);
            if self.fail_saves {
                return Err(ServiceError::Db("manufacturer insert rejected".into()));
            }
            models::manufacturer::validate_name(&manufacturer.name)?;

            let mut makers = self.makers.lock().unwrap();
            let code = match manufacturer.code {
                Some(code) if code != 0 => code,
                _ => {
                    let mut next = self.next_code.lock().unwrap();
                    *next += 1;
                    *next
                }
            };
            let saved = Manufacturer::new(code, manufacturer.name.clone());
            makers.insert(code, saved.clone());
            Ok(saved)
        }

        async fn delete_by_id(&self, code: i32) -> Result<(), ServiceError> {
            self.makers.lock().unwrap().remove(&code);
            Ok(())
        }
    }

}
