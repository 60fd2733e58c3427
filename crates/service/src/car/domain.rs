use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::ServiceError;

/// Identity of a car record: not yet stored, or stored under a positive id.
///
/// On the wire this is a nullable integer. `null`, a missing field and `0`
/// all mean [`CarId::New`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum CarId {
    #[default]
    New,
    Existing(i64),
}

impl From<Option<i64>> for CarId {
    fn from(v: Option<i64>) -> Self {
        match v {
            None | Some(0) => CarId::New,
            Some(id) => CarId::Existing(id),
        }
    }
}

impl From<CarId> for Option<i64> {
    fn from(id: CarId) -> Self {
        match id {
            CarId::New => None,
            CarId::Existing(id) => Some(id),
        }
    }
}

impl CarId {
    pub fn get(self) -> Option<i64> { self.into() }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Condition {
    New,
    Used,
}

impl Condition {
    pub fn as_str(self) -> &'static str {
        match self {
            Condition::New => models::car::CONDITION_NEW,
            Condition::Used => models::car::CONDITION_USED,
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Condition {
    type Err = models::errors::ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let up = models::car::validate_condition(s)?;
        Ok(if up == models::car::CONDITION_NEW { Condition::New } else { Condition::Used })
    }
}

/// Coordinates plus the address parts resolved by the maps service.
/// Only `lat`/`lon` are stored.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Location {
    pub lat: f64,
    pub lon: f64,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

impl Location {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon, ..Default::default() }
    }

    /// Same coordinates with the resolved address dropped.
    pub fn coordinates_only(&self) -> Self {
        Self::new(self.lat, self.lon)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Manufacturer {
    #[serde(default)]
    pub code: Option<i32>,
    pub name: String,
}

impl Manufacturer {
    pub fn new(code: i32, name: impl Into<String>) -> Self {
        Self { code: Some(code), name: name.into() }
    }

    pub fn unsaved(name: impl Into<String>) -> Self {
        Self { code: None, name: name.into() }
    }

    /// Code null or zero: not stored yet.
    pub fn is_transient(&self) -> bool {
        matches!(self.code, None | Some(0))
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Details {
    #[serde(default)]
    pub manufacturer: Option<Manufacturer>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub mileage: Option<i32>,
    #[serde(default)]
    pub external_color: Option<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub engine: Option<String>,
    #[serde(default)]
    pub fuel_type: Option<String>,
    #[serde(default)]
    pub model_year: Option<i32>,
    #[serde(default)]
    pub production_year: Option<i32>,
    #[serde(default)]
    pub number_of_doors: Option<i32>,
}

/// A vehicle record as seen by callers of [`crate::car::CarService`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Car {
    #[serde(default)]
    pub id: CarId,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub modified_at: Option<DateTime<Utc>>,
    pub condition: Condition,
    #[serde(default)]
    pub details: Option<Details>,
    #[serde(default)]
    pub location: Location,
    #[serde(default)]
    pub price: Option<String>,
}

impl Car {
    pub fn new(condition: Condition, details: Details, location: Location) -> Self {
        Self {
            id: CarId::New,
            created_at: None,
            modified_at: None,
            condition,
            details: Some(details),
            location,
            price: None,
        }
    }

    /// The copy a store keeps: no price, no resolved address.
    pub fn without_transient(&self) -> Self {
        Self { price: None, location: self.location.coordinates_only(), ..self.clone() }
    }

    pub fn manufacturer(&self) -> Option<&Manufacturer> {
        self.details.as_ref().and_then(|d| d.manufacturer.as_ref())
    }

    /// Input checks applied to request bodies before they reach the service.
    pub fn validate(&self) -> Result<(), ServiceError> {
        models::car::validate_coordinates(self.location.lat, self.location.lon)?;
        let details = self
            .details
            .as_ref()
            .ok_or_else(|| ServiceError::Validation("details are required".into()))?;
        match details.model.as_deref() {
            Some(m) if !m.trim().is_empty() => {}
            _ => return Err(ServiceError::Validation("details.model is required".into())),
        }
        match details.mileage {
            Some(m) if m >= 0 => {}
            Some(_) => return Err(ServiceError::Validation("details.mileage must be >= 0".into())),
            None => return Err(ServiceError::Validation("details.mileage is required".into())),
        }
        if let Some(doors) = details.number_of_doors {
            if doors < 1 {
                return Err(ServiceError::Validation("details.numberOfDoors must be >= 1".into()));
            }
        }
        if let Some(m) = &details.manufacturer {
            models::manufacturer::validate_name(&m.name)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn impala() -> Car {
        Car::new(
            Condition::Used,
            Details {
                manufacturer: Some(Manufacturer::new(101, "Chevrolet")),
                model: Some("Impala".into()),
                mileage: Some(32280),
                ..Default::default()
            },
            Location::new(40.730610, -73.935242),
        )
    }

    #[test]
    fn zero_missing_and_null_ids_decode_as_new() {
        let zero: Car = serde_json::from_str(r#"{"id":0,"condition":"USED"}"#).unwrap();
        let missing: Car = serde_json::from_str(r#"{"condition":"USED"}"#).unwrap();
        let null: Car = serde_json::from_str(r#"{"id":null,"condition":"NEW"}"#).unwrap();
        assert_eq!(zero.id, CarId::New);
        assert_eq!(missing.id, CarId::New);
        assert_eq!(null.id, CarId::New);

        let existing: Car = serde_json::from_str(r#"{"id":7,"condition":"NEW"}"#).unwrap();
        assert_eq!(existing.id, CarId::Existing(7));
    }

    #[test]
    fn serializes_with_camel_case_and_null_id() {
        let json = serde_json::to_value(impala()).unwrap();
        assert!(json["id"].is_null());
        assert_eq!(json["condition"], "USED");
        assert_eq!(json["details"]["manufacturer"]["code"], 101);
        assert_eq!(json["details"]["model"], "Impala");
        assert!(json["details"].get("externalColor").is_some());
        assert_eq!(json["location"]["lat"], 40.730610);
    }

    #[test]
    fn transient_manufacturer_codes() {
        assert!(Manufacturer::unsaved("Chevrolet").is_transient());
        assert!(Manufacturer { code: Some(0), name: "Chevrolet".into() }.is_transient());
        assert!(!Manufacturer::new(101, "Chevrolet").is_transient());
    }

    #[test]
    fn without_transient_drops_price_and_address() {
        let mut car = impala();
        car.price = Some("USD 100.00".into());
        car.location.address = Some("777 Brockton Avenue".into());
        let stored = car.without_transient();
        assert_eq!(stored.price, None);
        assert_eq!(stored.location, Location::new(40.730610, -73.935242));
        assert_eq!(stored.details, car.details);
    }

    #[test]
    fn validate_rejects_bad_bodies() {
        assert!(impala().validate().is_ok());

        let mut no_details = impala();
        no_details.details = None;
        assert!(matches!(no_details.validate(), Err(ServiceError::Validation(_))));

        let mut off_map = impala();
        off_map.location.lat = 120.0;
        assert!(matches!(off_map.validate(), Err(ServiceError::Model(_))));

        let mut negative = impala();
        negative.details.as_mut().unwrap().mileage = Some(-1);
        assert!(negative.validate().is_err());

        let mut blank_model = impala();
        blank_model.details.as_mut().unwrap().model = Some("  ".into());
        assert!(blank_model.validate().is_err());

        let mut no_doors = impala();
        no_doors.details.as_mut().unwrap().number_of_doors = Some(0);
        assert!(matches!(no_doors.validate(), Err(ServiceError::Validation(_))));

        let mut unset_doors = impala();
        unset_doors.details.as_mut().unwrap().number_of_doors = None;
        assert!(unset_doors.validate().is_ok());
    }

    #[test]
    fn condition_parses_case_insensitively() {
        assert_eq!("used".parse::<Condition>().unwrap(), Condition::Used);
        assert_eq!("NEW".parse::<Condition>().unwrap(), Condition::New);
        assert!("broken".parse::<Condition>().is_err());
    }
}
