use anyhow::{anyhow, Result};
use chrono::Utc;
use restaurant_wallet_core::DEFAULT_COMMISSION_RATE;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;

const MIN_SECRET_LENGTH: usize = 32;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub jwt_secret: String,
    pub token_ttl_hours: i64,
    pub enable_cors: bool,
    pub cors_origins: String,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: "dev_jwt_secret".to_string(),
            token_ttl_hours: 24,
            enable_cors: true,
            cors_origins: "*".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub data_dir: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            data_dir: "./data".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationConfig {
    pub enabled: bool,
    pub admin_email: String,
    pub from_address: String,
    /// HTTP mail API endpoint; without it notifications are only logged.
    pub mail_api_url: Option<String>,
    pub mail_api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            admin_email: "admin@localhost".to_string(),
            from_address: "payouts@localhost".to_string(),
            mail_api_url: None,
            mail_api_key: None,
            timeout_secs: 10,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WithdrawalConfig {
    /// Commission applied to delivered orders without a recorded one.
    pub commission_rate: Decimal,
}

impl Default for WithdrawalConfig {
    fn default() -> Self {
        Self {
            commission_rate: DEFAULT_COMMISSION_RATE,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub environment: String,
    pub log_level: String,
    pub host: String,
    pub port: u16,
    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub notifications: NotificationConfig,
    pub withdrawals: WithdrawalConfig,
    pub last_modified: Option<u64>,
    pub version: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            log_level: "info".to_string(),
            host: "0.0.0.0".to_string(),
            port: 4000,
            security: SecurityConfig::default(),
            database: DatabaseConfig::default(),
            notifications: NotificationConfig::default(),
            withdrawals: WithdrawalConfig::default(),
            last_modified: Some(Utc::now().timestamp() as u64),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

impl Config {
    pub fn new() -> Result<Self> {
        // Load environment variables
        dotenv::dotenv().ok();

        let env = Self::validate_and_get_env_var("RUST_ENV", "development", false)?;

        // Validate critical environment variables on startup
        Self::validate_startup_env_vars(&env)?;

        // Try to load from config file first
        let config = match Self::load_from_file() {
            Ok(config) => config,
            Err(_) => match env.as_str() {
                "staging" => Self::staging_config()?,
                "production" => Self::production_config()?,
                _ => Self::development_config()?,
            },
        };

        config.validate()?;

        Ok(config)
    }

    /// Validates critical environment variables on startup
    fn validate_startup_env_vars(env: &str) -> Result<()> {
        let required_vars: &[&str] = match env {
            "production" => &["JWT_SECRET", "ADMIN_EMAIL"],
            "staging" => &["JWT_SECRET"],
            _ => &[],
        };

        let errors: Vec<String> = required_vars
            .iter()
            .filter(|var| env::var(var).map(|v| v.trim().is_empty()).unwrap_or(true))
            .map(|var| format!("Required environment variable {} is not set for {}", var, env))
            .collect();

        if !errors.is_empty() {
            return Err(anyhow!("Environment validation failed:\n{}", errors.join("\n")));
        }

        Ok(())
    }

    fn load_from_file() -> Result<Self> {
        let config_file = env::var("CONFIG_FILE").unwrap_or_else(|_| "config.json".to_string());

        if Path::new(&config_file).exists() {
            let content = fs::read_to_string(&config_file)
                .map_err(|e| anyhow!("Failed to read config file: {}", e))?;
            let mut config: Config = serde_json::from_str(&content)
                .map_err(|e| anyhow!("Failed to deserialize config: {}", e))?;
            config.last_modified = Some(Utc::now().timestamp() as u64);
            Ok(config)
        } else {
            Err(anyhow!("Config file not found"))
        }
    }

    pub fn save_to_file(&self, file_path: &str) -> Result<()> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| anyhow!("Failed to serialize config: {}", e))?;
        fs::write(file_path, content)
            .map_err(|e| anyhow!("Failed to write config file: {}", e))?;
        Ok(())
    }

    pub fn development_config() -> Result<Self> {
        Self::from_env("development", "debug", "dev_jwt_secret", "*")
    }

    fn staging_config() -> Result<Self> {
        Self::from_env("staging", "info", "", "https://staging-admin.localhost")
    }

    fn production_config() -> Result<Self> {
        Self::from_env("production", "warn", "", "https://admin.localhost")
    }

    fn from_env(environment: &str, log_level: &str, jwt_fallback: &str, cors_fallback: &str) -> Result<Self> {
        let defaults = NotificationConfig::default();

        Ok(Self {
            environment: environment.to_string(),
            log_level: Self::validate_and_get_env_var("LOG_LEVEL", log_level, false)?,
            host: Self::validate_and_get_env_var("HOST", "0.0.0.0", false)?,
            port: u16::from_str(&Self::validate_and_get_env_var("PORT", "4000", false)?)
                .map_err(|e| anyhow!("Invalid PORT: {}", e))?,
            security: SecurityConfig {
                jwt_secret: env::var("JWT_SECRET").unwrap_or_else(|_| jwt_fallback.to_string()),
                token_ttl_hours: i64::from_str(&Self::validate_and_get_env_var("TOKEN_TTL_HOURS", "24", false)?)
                    .map_err(|e| anyhow!("Invalid TOKEN_TTL_HOURS: {}", e))?,
                enable_cors: env::var("ENABLE_CORS").unwrap_or_else(|_| "true".to_string()) != "false",
                cors_origins: Self::validate_and_get_env_var("CORS_ORIGINS", cors_fallback, false)?,
            },
            database: DatabaseConfig {
                data_dir: Self::validate_and_get_env_var("DATA_DIR", "./data", false)?,
            },
            notifications: NotificationConfig {
                enabled: env::var("ENABLE_NOTIFICATIONS").unwrap_or_else(|_| "true".to_string()) != "false",
                admin_email: Self::validate_and_get_env_var("ADMIN_EMAIL", &defaults.admin_email, false)?,
                from_address: Self::validate_and_get_env_var("MAIL_FROM", &defaults.from_address, false)?,
                mail_api_url: env::var("MAIL_API_URL").ok().filter(|v| !v.trim().is_empty()),
                mail_api_key: env::var("MAIL_API_KEY").ok().filter(|v| !v.trim().is_empty()),
                timeout_secs: u64::from_str(&Self::validate_and_get_env_var("MAIL_TIMEOUT_SECS", "10", false)?)
                    .map_err(|e| anyhow!("Invalid MAIL_TIMEOUT_SECS: {}", e))?,
            },
            withdrawals: WithdrawalConfig {
                commission_rate: Decimal::from_str(&Self::validate_and_get_env_var(
                    "COMMISSION_RATE",
                    &DEFAULT_COMMISSION_RATE.to_string(),
                    false,
                )?)
                .map_err(|e| anyhow!("Invalid COMMISSION_RATE: {}", e))?,
            },
            last_modified: Some(Utc::now().timestamp() as u64),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    /// Validates environment variables and provides fallback values
    pub fn validate_and_get_env_var(key: &str, fallback: &str, required: bool) -> Result<String> {
        match env::var(key) {
            Ok(value) if !value.trim().is_empty() => Ok(value),
            _ if required => Err(anyhow!("Required environment variable {} is not set", key)),
            _ => Ok(fallback.to_string()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Invalid server port".to_string());
        }

        if self.database.data_dir.trim().is_empty() {
            errors.push("Data directory cannot be empty".to_string());
        }

        if self.security.jwt_secret.is_empty() {
            errors.push("JWT_SECRET is required".to_string());
        } else if self.environment != "development" && self.security.jwt_secret.len() < MIN_SECRET_LENGTH {
            errors.push(format!("JWT_SECRET must be at least {} characters outside development", MIN_SECRET_LENGTH));
        }

        if self.security.token_ttl_hours <= 0 {
            errors.push("TOKEN_TTL_HOURS must be positive".to_string());
        }

        let rate = self.withdrawals.commission_rate;
        if rate < Decimal::ZERO || rate >= Decimal::ONE {
            errors.push(format!("COMMISSION_RATE must be in [0, 1), got {}", rate));
        }

        if self.notifications.enabled && !self.notifications.admin_email.contains('@') {
            errors.push(format!("Invalid ADMIN_EMAIL: '{}'", self.notifications.admin_email));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow!("Configuration validation failed: {}", errors.join(", ")))
        }
    }

    pub fn summary(&self) -> serde_json::Value {
        serde_json::json!({
            "environment": self.environment,
            "version": self.version,
            "port": self.port,
            "log_level": self.log_level,
            "data_dir": self.database.data_dir,
            "cors_enabled": self.security.enable_cors,
            "notifications": {
                "enabled": self.notifications.enabled,
                "mail_api_configured": self.notifications.mail_api_url.is_some(),
            },
            "commission_rate": self.withdrawals.commission_rate.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_and_get_env_var() {
        let result = Config::validate_and_get_env_var("PAYOUT_NONEXISTENT_VAR", "fallback", false);
        assert_eq!(result.unwrap(), "fallback");

        std::env::set_var("PAYOUT_TEST_EMPTY_VAR", "  ");
        let result = Config::validate_and_get_env_var("PAYOUT_TEST_EMPTY_VAR", "fallback", false);
        assert_eq!(result.unwrap(), "fallback");

        std::env::set_var("PAYOUT_TEST_VALID_VAR", "test_value");
        let result = Config::validate_and_get_env_var("PAYOUT_TEST_VALID_VAR", "fallback", false);
        assert_eq!(result.unwrap(), "test_value");

        assert!(Config::validate_and_get_env_var("PAYOUT_REQUIRED_MISSING", "", true).is_err());

        // Clean up
        std::env::remove_var("PAYOUT_TEST_EMPTY_VAR");
        std::env::remove_var("PAYOUT_TEST_VALID_VAR");
    }

    #[test]
    fn test_rejects_bad_commission_rate() {
        let mut config = Config::default();
        config.withdrawals.commission_rate = Decimal::ONE;
        assert!(config.validate().is_err());

        config.withdrawals.commission_rate = Decimal::new(-1, 2);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_short_secret_rejected_outside_development() {
        let mut config = Config::default();
        config.environment = "production".to_string();
        config.security.jwt_secret = "short".to_string();

        let err = config.validate().unwrap_err().to_string();
        assert!(err.contains("JWT_SECRET"));

        config.security.jwt_secret = "x".repeat(64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_save_and_reload_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = Config::default();
        config.port = 5050;

        config.save_to_file(path.to_str().unwrap()).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let loaded: Config = serde_json::from_str(&content).unwrap();

        assert_eq!(loaded.port, 5050);
        assert_eq!(loaded.withdrawals.commission_rate, DEFAULT_COMMISSION_RATE);
    }
}
