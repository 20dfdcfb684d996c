use std::ops::RangeInclusive;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use fourtoon_cloud::s3::{DEFAULT_PRESIGN_MINUTES, MAX_PRESIGN_MINUTES};
use fourtoon_cloud::DEFAULT_REGION;
use fourtoon_midjourney::config::{DEFAULT_POLL_INTERVAL_MS, DEFAULT_PROCESSING_TIMEOUT_SECS};
use fourtoon_midjourney::MidjourneyConfig;

use crate::auth::jwt::JwtConfig;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `8080`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long post-shutdown cleanup may take (default: `30`).
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    pub storage: StorageConfig,
    /// `None` disables the signed URL and cookie endpoints.
    pub cloudfront: Option<CloudFrontConfig>,
    /// `None` disables diary-created notifications.
    pub sqs: Option<SqsConfig>,
    /// `None` disables panel generation.
    pub discord: Option<DiscordConfig>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `PORT`                 | `8080`                     |
    /// | `CORS_ORIGINS`         | `http://localhost:3000`    |
    /// | `REQUEST_TIMEOUT_SECS` | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`| `30`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        Self {
            host,
            port: env_or("PORT", 8080),
            cors_origins,
            request_timeout_secs: env_or("REQUEST_TIMEOUT_SECS", 30),
            shutdown_timeout_secs: env_or("SHUTDOWN_TIMEOUT_SECS", 30),
            jwt: JwtConfig::from_env(),
            storage: StorageConfig::from_env(),
            cloudfront: CloudFrontConfig::from_env(),
            sqs: SqsConfig::from_env(),
            discord: DiscordConfig::from_env(),
        }
    }
}

/// S3 settings for diary images.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub region: String,
    pub diary_image_bucket: String,
    /// Lifetime of presigned download URLs in minutes.
    pub presign_minutes: u64,
}

impl StorageConfig {
    /// | Env Var                  | Default                  |
    /// |--------------------------|--------------------------|
    /// | `AWS_REGION`             | `ap-northeast-2`         |
    /// | `AWS_DIARY_IMAGE_BUCKET` | `fourtoon-diary-images`  |
    /// | `AWS_PRESIGN_MINUTES`    | `60` (`1..=10080`)       |
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("AWS_REGION").unwrap_or_else(|_| DEFAULT_REGION.into()),
            diary_image_bucket: std::env::var("AWS_DIARY_IMAGE_BUCKET")
                .unwrap_or_else(|_| "fourtoon-diary-images".into()),
            presign_minutes: in_range(
                "AWS_PRESIGN_MINUTES",
                env_or("AWS_PRESIGN_MINUTES", DEFAULT_PRESIGN_MINUTES),
                1..=MAX_PRESIGN_MINUTES,
            ),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CloudFrontConfig {
    pub domain: String,
    pub key_pair_id: String,
    pub private_key_path: PathBuf,
}

impl CloudFrontConfig {
    /// Present only when `AWS_CLOUDFRONT_DOMAIN`, `AWS_CLOUDFRONT_KEY_PAIR_ID`
    /// and `AWS_CLOUDFRONT_PRIVATE_KEY_PATH` are all set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            domain: non_empty_env("AWS_CLOUDFRONT_DOMAIN")?,
            key_pair_id: non_empty_env("AWS_CLOUDFRONT_KEY_PAIR_ID")?,
            private_key_path: non_empty_env("AWS_CLOUDFRONT_PRIVATE_KEY_PATH")?.into(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct SqsConfig {
    pub diary_queue_url: String,
}

impl SqsConfig {
    pub fn from_env() -> Option<Self> {
        non_empty_env("AWS_SQS_DIARY_QUEUE_URL").map(|diary_queue_url| Self { diary_queue_url })
    }
}

/// Discord bot settings for the Midjourney bridge.
#[derive(Debug, Clone)]
pub struct DiscordConfig {
    pub bot_token: String,
    pub midjourney_bot_id: u64,
    pub default_channel_id: Option<u64>,
    pub poll_interval_ms: u64,
    pub processing_timeout_secs: u64,
}

impl DiscordConfig {
    /// Present only when `DISCORD_BOT_TOKEN` is set.
    ///
    /// | Env Var                               | Default  |
    /// |---------------------------------------|----------|
    /// | `MIDJOURNEY_BOT_ID`                   | **required** with a token |
    /// | `MIDJOURNEY_DEFAULT_CHANNEL_ID`       | --       |
    /// | `MIDJOURNEY_POLL_INTERVAL_MS`         | `1000` (must be positive) |
    /// | `MIDJOURNEY_PROCESSING_TIMEOUT_SECS`  | `600`    |
    pub fn from_env() -> Option<Self> {
        let bot_token = non_empty_env("DISCORD_BOT_TOKEN")?;
        let midjourney_bot_id: u64 = std::env::var("MIDJOURNEY_BOT_ID")
            .expect("MIDJOURNEY_BOT_ID must be set when DISCORD_BOT_TOKEN is set")
            .parse()
            .expect("MIDJOURNEY_BOT_ID must be a valid u64");
        let default_channel_id = non_empty_env("MIDJOURNEY_DEFAULT_CHANNEL_ID").map(|v| {
            v.parse()
                .expect("MIDJOURNEY_DEFAULT_CHANNEL_ID must be a valid u64")
        });

        Some(Self {
            bot_token,
            midjourney_bot_id,
            default_channel_id,
            poll_interval_ms: in_range(
                "MIDJOURNEY_POLL_INTERVAL_MS",
                env_or("MIDJOURNEY_POLL_INTERVAL_MS", DEFAULT_POLL_INTERVAL_MS),
                1..=u64::MAX,
            ),
            processing_timeout_secs: env_or(
                "MIDJOURNEY_PROCESSING_TIMEOUT_SECS",
                DEFAULT_PROCESSING_TIMEOUT_SECS,
            ),
        })
    }

    pub fn midjourney_config(&self) -> MidjourneyConfig {
        MidjourneyConfig {
            bot_id: self.midjourney_bot_id,
            default_channel_id: self.default_channel_id,
            poll_interval: Duration::from_millis(self.poll_interval_ms),
            processing_timeout: Duration::from_secs(self.processing_timeout_secs),
        }
    }
}

/// Parse `key` or fall back to `default` when unset.
///
/// # Panics
///
/// Panics if the variable is set but does not parse.
fn env_or<T>(key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(raw) => raw
            .parse()
            .unwrap_or_else(|e| panic!("{key} must be a valid value: {e}")),
        Err(_) => default,
    }
}

/// # Panics
///
/// Panics if `value` lies outside `range`.
fn in_range(key: &str, value: u64, range: RangeInclusive<u64>) -> u64 {
    if !range.contains(&value) {
        panic!(
            "{key} must be between {} and {}, got {value}",
            range.start(),
            range.end()
        );
    }
    value
}

fn non_empty_env(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.trim().is_empty())
}
