pub mod errors;
pub mod db;
pub mod manufacturer;
pub mod car;
