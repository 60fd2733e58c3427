//! Service layer for vehicle records.
//! - `car`: domain types, record stores and `CarService`.
//! - `clients`: pricing and maps lookups behind traits.
//! - `errors`: the error type every operation returns.

pub mod errors;
pub mod car;
pub mod clients;
#[cfg(test)]
pub mod test_support;
