//! Domain types and pure logic shared by the SkyCast server and client.
//!
//! Nothing in this crate performs I/O: HTTP, database and provider access live
//! in `skycast-api`, `skycast-db` and `skycast-weather`.

pub mod alerts;
pub mod assistant;
pub mod error;
pub mod forecast;
pub mod query;
pub mod roles;
pub mod suggestions;
pub mod types;
pub mod validation;
pub mod weather;
