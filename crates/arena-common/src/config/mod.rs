//! Configuration structs

mod app_config;

pub use app_config::{
    AdminConfig, AppConfig, AppSettings, ConfigError, CorsConfig, DatabaseConfig, Environment,
    ImageHostConfig, JwtConfig, OAuthConfig, RateLimitBackend, RateLimitConfig, RedisConfig,
    ServerConfig, SnowflakeConfig,
};
