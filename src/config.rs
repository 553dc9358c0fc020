/// Configuration management for Cinegraph
use crate::error::{ApiError, ApiResult};
use serde::{Deserialize, Serialize};
use std::env;

/// Main server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub authentication: AuthConfig,
    pub jobs: JobsConfig,
    pub logging: LoggingConfig,
}

/// Service-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceConfig {
    pub hostname: String,
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

/// Authentication configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    /// Bearer token lifetime in minutes
    pub token_expiry_minutes: i64,
}

/// Background job configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobsConfig {
    /// Seconds between actor rating refresh sweeps. 0 disables the job.
    pub actor_refresh_interval_secs: u64,
    /// Actors updated per batch within a sweep
    pub actor_refresh_batch_size: i64,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl ServerConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> ApiResult<Self> {
        dotenv::dotenv().ok();

        let hostname = env::var("CINEGRAPH_HOSTNAME").unwrap_or_else(|_| "localhost".to_string());
        let port = env::var("CINEGRAPH_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .map_err(|_| ApiError::Validation("Invalid port number".to_string()))?;

        let database_url = env::var("DATABASE_URL")
            .map_err(|_| ApiError::Validation("DATABASE_URL is required".to_string()))?;
        let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
            .unwrap_or_else(|_| "10".to_string())
            .parse()
            .unwrap_or(10);

        let jwt_secret = env::var("CINEGRAPH_JWT_SECRET")
            .map_err(|_| ApiError::Validation("JWT secret required".to_string()))?;
        let jwt_issuer = env::var("CINEGRAPH_JWT_ISSUER").ok();
        let jwt_audience = env::var("CINEGRAPH_JWT_AUDIENCE").ok();
        let token_expiry_minutes = env::var("CINEGRAPH_TOKEN_EXPIRY_MINUTES")
            .unwrap_or_else(|_| "60".to_string())
            .parse()
            .unwrap_or(60);

        let actor_refresh_interval_secs = env::var("CINEGRAPH_ACTOR_REFRESH_INTERVAL_SECS")
            .unwrap_or_else(|_| "3600".to_string())
            .parse()
            .unwrap_or(3600);
        let actor_refresh_batch_size = env::var("CINEGRAPH_ACTOR_REFRESH_BATCH_SIZE")
            .unwrap_or_else(|_| "500".to_string())
            .parse()
            .unwrap_or(500);

        let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        Ok(ServerConfig {
            service: ServiceConfig { hostname, port },
            database: DatabaseConfig {
                url: database_url,
                max_connections,
            },
            authentication: AuthConfig {
                jwt_secret,
                jwt_issuer,
                jwt_audience,
                token_expiry_minutes,
            },
            jobs: JobsConfig {
                actor_refresh_interval_secs,
                actor_refresh_batch_size,
            },
            logging: LoggingConfig { level: log_level },
        })
    }

    /// Validate configuration
    pub fn validate(&self) -> ApiResult<()> {
        if self.service.hostname.is_empty() {
            return Err(ApiError::Validation("Hostname cannot be empty".to_string()));
        }

        if self.authentication.jwt_secret.len() < 32 {
            return Err(ApiError::Validation(
                "JWT secret must be at least 32 characters".to_string(),
            ));
        }

        if self.authentication.token_expiry_minutes <= 0 {
            return Err(ApiError::Validation(
                "Token expiry must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> ServerConfig {
        ServerConfig {
            service: ServiceConfig {
                hostname: "localhost".to_string(),
                port: 8080,
            },
            database: DatabaseConfig {
                url: "postgres://localhost/cinegraph".to_string(),
                max_connections: 10,
            },
            authentication: AuthConfig {
                jwt_secret: "0123456789abcdef0123456789abcdef".to_string(),
                jwt_issuer: None,
                jwt_audience: None,
                token_expiry_minutes: 60,
            },
            jobs: JobsConfig {
                actor_refresh_interval_secs: 3600,
                actor_refresh_batch_size: 500,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
            },
        }
    }

    #[test]
    fn valid_config_passes() {
        assert!(test_config().validate().is_ok());
    }

    #[test]
    fn short_jwt_secret_rejected() {
        let mut config = test_config();
        config.authentication.jwt_secret = "too-short".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_expiry_rejected() {
        let mut config = test_config();
        config.authentication.token_expiry_minutes = 0;
        assert!(config.validate().is_err());
    }
}
