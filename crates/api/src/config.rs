use std::str::FromStr;

use skycast_weather::openweather::DEFAULT_BASE_URL;

use crate::auth::jwt::JwtConfig;

/// Default access token lifetime: 24 hours.
const DEFAULT_ACCESS_EXPIRY_MINS: i64 = 1440;

/// Raised when an environment variable is missing or unparsable.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in the environment")]
    Missing(&'static str),

    #[error("{name} has an invalid value '{value}'")]
    Invalid { name: &'static str, value: String },
}

/// Server configuration loaded from environment variables.
///
/// Everything except the database URL and JWT secret has a default suitable
/// for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3001`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    pub database_url: String,
    /// JWT token configuration (secret, expiry).
    pub jwt: JwtConfig,
    /// Minimum password length accepted at signup (default: `6`).
    pub password_min_length: usize,
    /// Unset means weather lookups answer 500.
    pub openweather_api_key: Option<String>,
    pub openweather_base_url: String,
    /// Unset means the token endpoint answers 500.
    pub mapbox_access_token: Option<String>,
    /// How long a cached weather report stays fresh (default: `600`).
    pub weather_cache_ttl_secs: u64,
    /// How often expired cache rows are purged (default: `3600`).
    pub weather_cache_purge_interval_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                             | Default                                   |
    /// |-------------------------------------|-------------------------------------------|
    /// | `HOST`                              | `0.0.0.0`                                 |
    /// | `PORT`                              | `3001`                                    |
    /// | `CORS_ORIGINS`                      | `http://localhost:5173`                   |
    /// | `REQUEST_TIMEOUT_SECS`              | `30`                                      |
    /// | `DATABASE_URL`                      | **required**                              |
    /// | `JWT_SECRET`                        | **required**                              |
    /// | `JWT_ACCESS_EXPIRY_MINS`            | `1440`                                    |
    /// | `PASSWORD_MIN_LENGTH`               | `6`                                       |
    /// | `OPENWEATHER_API_KEY`               | unset                                     |
    /// | `OPENWEATHER_BASE_URL`              | `https://api.openweathermap.org/data/2.5` |
    /// | `MAPBOX_ACCESS_TOKEN`               | unset                                     |
    /// | `WEATHER_CACHE_TTL_SECS`            | `600`                                     |
    /// | `WEATHER_CACHE_PURGE_INTERVAL_SECS` | `3600`                                    |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let cors_origins: Vec<String> = env
            .optional("CORS_ORIGINS")
            .unwrap_or_else(|| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        for origin in &cors_origins {
            if origin.parse::<axum::http::HeaderValue>().is_err() {
                return Err(ConfigError::Invalid {
                    name: "CORS_ORIGINS",
                    value: origin.clone(),
                });
            }
        }

        let secret = env.required("JWT_SECRET")?;

        Ok(Self {
            host: env.optional("HOST").unwrap_or_else(|| "0.0.0.0".into()),
            port: env.parse_or("PORT", 3001)?,
            cors_origins,
            request_timeout_secs: env.parse_or("REQUEST_TIMEOUT_SECS", 30)?,
            database_url: env.required("DATABASE_URL")?,
            jwt: JwtConfig {
                secret,
                access_token_expiry_mins: env
                    .parse_or("JWT_ACCESS_EXPIRY_MINS", DEFAULT_ACCESS_EXPIRY_MINS)?,
            },
            password_min_length: env.parse_or("PASSWORD_MIN_LENGTH", 6)?,
            openweather_api_key: env.optional("OPENWEATHER_API_KEY"),
            openweather_base_url: env
                .optional("OPENWEATHER_BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.into()),
            mapbox_access_token: env.optional("MAPBOX_ACCESS_TOKEN"),
            weather_cache_ttl_secs: env.parse_or("WEATHER_CACHE_TTL_SECS", 600)?,
            weather_cache_purge_interval_secs: env
                .parse_or("WEATHER_CACHE_PURGE_INTERVAL_SECS", 3600)?,
        })
    }
}

struct Env<F>(F);

impl<F: Fn(&str) -> Option<String>> Env<F> {
    /// Value of `name`, treating blank as unset.
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn parse_or<T: FromStr>(&self, name: &'static str, default: T) -> Result<T, ConfigError> {
        match self.optional(name) {
            None => Ok(default),
            Some(value) => value
                .parse()
                .map_err(|_| ConfigError::Invalid { name, value }),
        }
    }
}
