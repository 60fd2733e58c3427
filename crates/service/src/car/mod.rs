//! Vehicle records: domain types, stores and the service that ties them to
//! the lookup clients.

pub mod domain;
pub mod repo;
pub mod repository;
pub mod service;

pub use service::CarService;
