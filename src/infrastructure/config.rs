use std::env;
use std::time::Duration;

pub const DEFAULT_CACHE_TTL_SECONDS: u64 = 300;
/// Signing key used when `JWT_SECRET` is unset; only acceptable in debug builds
pub const DEV_JWT_SECRET: &str = "secret";

#[derive(Clone, Debug)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub cors_allowed_origins: Vec<String>,
    /// Lifetime of cached reference data (locations, category tree, banners)
    pub cache_ttl: Duration,
    pub seed_demo: bool,
    pub jwt_secret: String,
}

impl Config {
    /// True when tokens would be signed with the built-in development key
    pub fn uses_dev_jwt_secret(&self) -> bool {
        self.jwt_secret == DEV_JWT_SECRET
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from any key lookup (process env, test maps)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let database_url = lookup("DATABASE_URL")
            .unwrap_or_else(|| "sqlite://kedai.db?mode=rwc".to_string());

        Self {
            database_url,
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(8000),
            cors_allowed_origins: lookup("CORS_ALLOWED_ORIGINS")
                .map(|s| {
                    s.split(',')
                        .map(|s| s.trim().to_string())
                        .filter(|s| !s.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
            cache_ttl: Duration::from_secs(
                lookup("CACHE_TTL_SECONDS")
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CACHE_TTL_SECONDS),
            ),
            seed_demo: lookup("SEED_DEMO")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(false),
            jwt_secret: lookup("JWT_SECRET")
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| DEV_JWT_SECRET.to_string()),
        }
    }
}
