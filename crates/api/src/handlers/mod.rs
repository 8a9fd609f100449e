//! Request handlers.
//!
//! Each submodule provides the async handler functions for one resource.
//! Handlers delegate to repositories in `skycast_db` or to the weather
//! provider and map errors via [`AppError`](crate::error::AppError).

pub mod assistant;
pub mod auth;
pub mod mapbox;
pub mod tables;
pub mod weather;
