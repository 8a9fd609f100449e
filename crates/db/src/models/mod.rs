//! Domain model structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the database
//! row plus the `Deserialize` DTOs used to write it.

pub mod preferences;
pub mod saved_city;
pub mod user;
pub mod weather_cache;
