//! Configuration management for the engagement service.
//!
//! Loads configuration from environment variables.

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Application settings
    pub app: AppConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// Kafka configuration
    pub kafka: KafkaConfig,
    /// SMTP configuration
    pub smtp: SmtpConfig,
}

/// Application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Application environment (dev, staging, prod)
    pub env: String,
    /// Host to bind the liveness server to
    pub host: String,
    /// HTTP port for health checks and metrics
    pub http_port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// PostgreSQL connection URL
    pub url: String,
    /// Max connections in pool
    pub max_connections: u32,
    /// Min connections in pool
    pub min_connections: u32,
}

/// Kafka consumer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KafkaConfig {
    /// Kafka brokers (comma-separated)
    pub brokers: String,
    /// Metric events topic
    pub metric_topic: String,
    /// Consumer group for metric events
    pub metric_group_id: String,
    /// Notification events topic
    pub notification_topic: String,
    /// Consumer group for notification events
    pub notification_group_id: String,
    /// Email events topic
    pub email_topic: String,
    /// Consumer group for email events
    pub email_group_id: String,
}

/// SMTP and email branding configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SmtpConfig {
    /// SMTP server host; empty disables delivery (no-op mode)
    pub host: String,
    /// SMTP server port (usually 587 for STARTTLS)
    pub port: u16,
    /// SMTP username
    pub username: Option<String>,
    /// SMTP password
    pub password: Option<String>,
    /// Sender address, e.g. "WorkHive <noreply@workhive.dev>"
    pub from: String,
    /// Frontend URL used in email links
    pub site_url: String,
    /// Brand name interpolated into templates
    pub brand_name: String,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Ok(Config {
            app: AppConfig {
                env: env_or("APP_ENV", "development"),
                host: env_or("APP_HOST", "0.0.0.0"),
                http_port: parse_env("APP_PORT", 8001)?,
            },
            database: DatabaseConfig {
                url: std::env::var("DATABASE_URL")
                    .map_err(|_| AppError::Config("DATABASE_URL is not set".into()))?,
                max_connections: parse_env("DB_MAX_CONNECTIONS", 20)?,
                min_connections: parse_env("DB_MIN_CONNECTIONS", 5)?,
            },
            kafka: KafkaConfig::from_env()?,
            smtp: SmtpConfig::from_env()?,
        })
    }
}

impl KafkaConfig {
    pub fn from_env() -> Result<Self> {
        Ok(KafkaConfig {
            brokers: env_or("KAFKA_BROKERS", "localhost:9092"),
            metric_topic: env_or("KAFKA_METRIC_TOPIC", "metric-events"),
            metric_group_id: env_or("KAFKA_METRIC_GROUP_ID", "metric-consumer"),
            notification_topic: env_or("KAFKA_NOTIFICATION_TOPIC", "notification-events"),
            notification_group_id: env_or("KAFKA_NOTIFICATION_GROUP_ID", "notification-consumer"),
            email_topic: env_or("KAFKA_EMAIL_TOPIC", "email-events"),
            email_group_id: env_or("KAFKA_EMAIL_GROUP_ID", "email-consumer"),
        })
    }
}

impl SmtpConfig {
    pub fn from_env() -> Result<Self> {
        Ok(SmtpConfig {
            host: env_or("SMTP_HOST", ""),
            port: parse_env("SMTP_PORT", 587)?,
            username: std::env::var("SMTP_USERNAME").ok(),
            password: std::env::var("SMTP_PASSWORD").ok(),
            from: env_or("SMTP_FROM", "WorkHive <noreply@workhive.dev>"),
            site_url: env_or("SITE_URL", "https://app.workhive.dev"),
            brand_name: env_or("BRAND_NAME", "WorkHive"),
        })
    }
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_env<T: std::str::FromStr>(key: &str, default: T) -> Result<T> {
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .map_err(|_| AppError::Config(format!("invalid value for {}: {}", key, raw))),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kafka_defaults_cover_all_three_topics() {
        let cfg = KafkaConfig::from_env().unwrap();
        assert_eq!(cfg.metric_topic, "metric-events");
        assert_eq!(cfg.notification_topic, "notification-events");
        assert_eq!(cfg.email_topic, "email-events");
        assert_ne!(cfg.metric_group_id, cfg.email_group_id);
    }
}
