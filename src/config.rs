use anyhow::{bail, Context};
use serde::Deserialize;
use tracing::warn;

const DEV_SECRET: &str = "itemvault-dev-secret-change-me";
const DEFAULT_TTL_MINUTES: i64 = 30;
/// One year. Longer lifetimes are refused at startup.
pub const MAX_TTL_MINUTES: i64 = 365 * 24 * 60;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub ttl_minutes: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub jwt: JwtConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let host = std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = match std::env::var("APP_PORT") {
            Ok(v) => v.parse::<u16>()?,
            Err(_) => 8000,
        };

        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set; using the development secret");
            DEV_SECRET.into()
        });
        let jwt = JwtConfig {
            secret,
            ttl_minutes: parse_ttl_minutes(std::env::var("JWT_TTL_MINUTES").ok().as_deref())?,
        };
        Ok(Self { host, port, jwt })
    }

    /// Fixed configuration for tests; never reads the environment.
    pub fn for_tests() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 0,
            jwt: JwtConfig {
                secret: "test-secret".into(),
                ttl_minutes: 30,
            },
        }
    }
}

fn parse_ttl_minutes(raw: Option<&str>) -> anyhow::Result<i64> {
    let Some(raw) = raw else {
        return Ok(DEFAULT_TTL_MINUTES);
    };
    let minutes: i64 = raw
        .trim()
        .parse()
        .with_context(|| format!("JWT_TTL_MINUTES is not an integer: {raw:?}"))?;
    if !(1..=MAX_TTL_MINUTES).contains(&minutes) {
        bail!("JWT_TTL_MINUTES must be between 1 and {MAX_TTL_MINUTES}, got {minutes}");
    }
    Ok(minutes)
}
