use core_config::cache::CacheTtlConfig;
use core_config::postgres::PostgresConfig;
use core_config::redis::RedisConfig;
use core_config::server::ServerConfig;
use core_config::{ConfigError, Environment, FromEnv};

/// Full application configuration, loaded from environment variables.
#[derive(Clone, Debug)]
pub struct Config {
    pub environment: Environment,
    pub server: ServerConfig,
    pub database: PostgresConfig,
    pub redis: RedisConfig,
    pub cache: CacheTtlConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            environment: Environment::from_env(),
            server: ServerConfig::from_env()?,
            database: PostgresConfig::from_env()?,
            redis: RedisConfig::from_env()?,
            cache: CacheTtlConfig::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_env_loads_complete_config() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", Some("postgresql://localhost/catalog")),
                ("REDIS_URL", Some("redis://localhost:6379")),
                ("PORT", Some("9000")),
                ("APP_ENV", Some("production")),
            ],
            || {
                let config = Config::from_env().unwrap();
                assert!(config.environment.is_production());
                assert_eq!(config.server.port, 9000);
                assert_eq!(config.database.url, "postgresql://localhost/catalog");
                assert_eq!(config.cache, CacheTtlConfig::default());
            },
        );
    }

    #[test]
    fn from_env_fails_without_database_url() {
        temp_env::with_vars(
            [
                ("DATABASE_URL", None::<&str>),
                ("REDIS_URL", Some("redis://localhost:6379")),
            ],
            || {
                assert!(Config::from_env().is_err());
            },
        );
    }
}
