use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, DbErr, EntityTrait, QueryOrder, Set};

use crate::car::domain::{Car, CarId, Details, Location, Manufacturer};
use crate::car::repository::{reject_transient_reference, CarRepository, ManufacturerRepository};
use crate::errors::ServiceError;

use models::{car, manufacturer};

pub struct SeaOrmCarRepository {
    pub db: DatabaseConnection,
}

pub struct SeaOrmManufacturerRepository {
    pub db: DatabaseConnection,
}

fn db_err(e: DbErr) -> ServiceError {
    ServiceError::Db(e.to_string())
}

fn to_domain(row: car::Model, maker: Option<manufacturer::Model>) -> Result<Car, ServiceError> {
    Ok(Car {
        id: CarId::Existing(row.id),
        created_at: Some(row.created_at.with_timezone(&Utc)),
        modified_at: Some(row.modified_at.with_timezone(&Utc)),
        condition: row.condition.parse()?,
        details: Some(Details {
            manufacturer: maker.map(|m| Manufacturer::new(m.code, m.name)),
            model: row.model,
            mileage: row.mileage,
            external_color: row.external_color,
            body: row.body,
            engine: row.engine,
            fuel_type: row.fuel_type,
            model_year: row.model_year,
            production_year: row.production_year,
            number_of_doors: row.number_of_doors,
        }),
        location: Location::new(row.lat, row.lon),
        price: None,
    })
}

#[async_trait::async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Car>, ServiceError> {
        match car::find_with_manufacturer(&self.db, id).await? {
            Some((row, maker)) => Ok(Some(to_domain(row, maker)?)),
            None => Ok(None),
        }
    }

    async fn find_all(&self) -> Result<Vec<Car>, ServiceError> {
        car::list_with_manufacturer(&self.db)
            .await?
            .into_iter()
            .map(|(row, maker)| to_domain(row, maker))
            .collect()
    }

    async fn save(&self, input: &Car) -> Result<Car, ServiceError> {
        let manufacturer_code = reject_transient_reference(input)?;
        models::car::validate_coordinates(input.location.lat, input.location.lon)?;

        let now = Utc::now();
        let details = input.details.clone().unwrap_or_default();
        let mut am = car::ActiveModel {
            created_at: Set(input.created_at.unwrap_or(now).into()),
            modified_at: Set(input.modified_at.unwrap_or(now).into()),
            condition: Set(input.condition.as_str().to_string()),
            lat: Set(input.location.lat),
            lon: Set(input.location.lon),
            manufacturer_code: Set(manufacturer_code),
            model: Set(details.model),
            mileage: Set(details.mileage),
            external_color: Set(details.external_color),
            body: Set(details.body),
            engine: Set(details.engine),
            fuel_type: Set(details.fuel_type),
            model_year: Set(details.model_year),
            production_year: Set(details.production_year),
            number_of_doors: Set(details.number_of_doors),
            ..Default::default()
        };

        let saved = match input.id {
            CarId::New => am.insert(&self.db).await.map_err(db_err)?,
            CarId::Existing(id) => {
                am.id = Set(id);
                am.update(&self.db).await.map_err(|e| match e {
                    DbErr::RecordNotUpdated => ServiceError::not_found("car"),
                    other => db_err(other),
                })?
            }
        };

        Ok(Car {
            id: CarId::Existing(saved.id),
            created_at: Some(saved.created_at.with_timezone(&Utc)),
            modified_at: Some(saved.modified_at.with_timezone(&Utc)),
            ..input.clone()
        })
    }

    async fn delete_by_id(&self, id: i64) -> Result<(), ServiceError> {
        car::Entity::delete_by_id(id).exec(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl ManufacturerRepository for SeaOrmManufacturerRepository {
    async fn find_by_id(&self, code: i32) -> Result<Option<Manufacturer>, ServiceError> {
        let row = manufacturer::Entity::find_by_id(code).one(&self.db).await.map_err(db_err)?;
        Ok(row.map(|m| Manufacturer::new(m.code, m.name)))
    }

    async fn find_all(&self) -> Result<Vec<Manufacturer>, ServiceError> {
        let rows = manufacturer::Entity::find()
            .order_by_asc(manufacturer::Column::Code)
            .all(&self.db)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(|m| Manufacturer::new(m.code, m.name)).collect())
    }

    async fn save(&self, input: &Manufacturer) -> Result<Manufacturer, ServiceError> {
        let row = match input.code {
            Some(code) if code != 0 => {
                models::manufacturer::validate_name(&input.name)?;
                let am = manufacturer::ActiveModel { code: Set(code), name: Set(input.name.clone()) };
                am.update(&self.db).await.map_err(db_err)?
            }
            _ => models::manufacturer::create(&self.db, &input.name).await?,
        };
        Ok(Manufacturer::new(row.code, row.name))
    }

    async fn delete_by_id(&self, code: i32) -> Result<(), ServiceError> {
        manufacturer::Entity::delete_by_id(code).exec(&self.db).await.map_err(db_err)?;
        Ok(())
    }
}
