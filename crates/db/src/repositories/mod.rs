//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod preferences_repo;
pub mod saved_city_repo;
pub mod user_repo;
pub mod weather_cache_repo;

pub use preferences_repo::PreferencesRepo;
pub use saved_city_repo::SavedCityRepo;
pub use user_repo::UserRepo;
pub use weather_cache_repo::WeatherCacheRepo;
