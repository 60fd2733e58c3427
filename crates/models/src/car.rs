use sea_orm::{entity::prelude::*, DatabaseConnection, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::{errors, manufacturer};

pub const CONDITION_NEW: &str = "NEW";
pub const CONDITION_USED: &str = "USED";

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "car")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub created_at: DateTimeWithTimeZone,
    pub modified_at: DateTimeWithTimeZone,
    pub condition: String,
    #[sea_orm(column_type = "Double")]
    pub lat: f64,
    #[sea_orm(column_type = "Double")]
    pub lon: f64,
    pub manufacturer_code: Option<i32>,
    pub model: Option<String>,
    pub mileage: Option<i32>,
    pub external_color: Option<String>,
    pub body: Option<String>,
    pub engine: Option<String>,
    pub fuel_type: Option<String>,
    pub model_year: Option<i32>,
    pub production_year: Option<i32>,
    pub number_of_doors: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter)]
pub enum Relation { Manufacturer }

impl RelationTrait for Relation {
    fn def(&self) -> RelationDef {
        match self {
            Relation::Manufacturer => Entity::belongs_to(manufacturer::Entity)
                .from(Column::ManufacturerCode)
                .to(manufacturer::Column::Code)
                .into(),
        }
    }
}

impl Related<manufacturer::Entity> for Entity {
    fn to() -> RelationDef { Relation::Manufacturer.def() }
}

impl ActiveModelBehavior for ActiveModel {}

pub fn validate_condition(c: &str) -> Result<String, errors::ModelError> {
    let up = c.to_ascii_uppercase();
    if up != CONDITION_NEW && up != CONDITION_USED {
        return Err(errors::ModelError::Validation(format!("invalid condition '{c}'")));
    }
    Ok(up)
}

pub fn validate_coordinates(lat: f64, lon: f64) -> Result<(), errors::ModelError> {
    if !(-90.0..=90.0).contains(&lat) {
        return Err(errors::ModelError::Validation("lat must be within [-90, 90]".into()));
    }
    if !(-180.0..=180.0).contains(&lon) {
        return Err(errors::ModelError::Validation("lon must be within [-180, 180]".into()));
    }
    Ok(())
}

/// Load a car together with its manufacturer row, if any.
pub async fn find_with_manufacturer(
    db: &DatabaseConnection,
    id: i64,
) -> Result<Option<(Model, Option<manufacturer::Model>)>, errors::ModelError> {
    Entity::find_by_id(id)
        .find_also_related(manufacturer::Entity)
        .one(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}

/// All cars ordered by id, each with its manufacturer row.
pub async fn list_with_manufacturer(
    db: &DatabaseConnection,
) -> Result<Vec<(Model, Option<manufacturer::Model>)>, errors::ModelError> {
    Entity::find()
        .find_also_related(manufacturer::Entity)
        .order_by_asc(Column::Id)
        .all(db)
        .await
        .map_err(|e| errors::ModelError::Db(e.to_string()))
}
