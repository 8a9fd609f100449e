/// Primary keys of `users`, `saved_cities` and `user_preferences` (BIGSERIAL).
pub type DbId = i64;

/// Stored and serialized in UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
