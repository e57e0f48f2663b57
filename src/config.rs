/*
 * Responsibility
 * - read configuration from the environment (.env is loaded first)
 * - validate values (startup fails on invalid input)
 *
 * The token signing key is not configurable: it is generated at startup
 * and never leaves TokenService.
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

pub const DEFAULT_BCRYPT_COST: u32 = 12;
pub const MIN_BCRYPT_COST: u32 = 4;
pub const MAX_BCRYPT_COST: u32 = 31;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        Self::parse(&std::env::var("APP_ENV").unwrap_or_else(|_| "development".to_string()))
    }

    fn parse(raw: &str) -> Self {
        match raw.to_ascii_lowercase().as_str() {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug)]
pub enum ConfigError {
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,

    /// `None` selects the in-memory user store.
    pub database_url: Option<String>,

    pub cors_allowed_origins: Vec<String>,

    pub bcrypt_cost: u32,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = std::env::var("PORT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        let cors_allowed_origins = parse_origins(
            &std::env::var("CORS_ALLOWED_ORIGINS").unwrap_or_default(),
        );

        let bcrypt_cost = match std::env::var("BCRYPT_COST") {
            Ok(raw) => parse_bcrypt_cost(&raw)?,
            Err(_) => DEFAULT_BCRYPT_COST,
        };

        Ok(Self {
            addr,
            app_env,
            database_url,
            cors_allowed_origins,
            bcrypt_cost,
        })
    }
}

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_bcrypt_cost(raw: &str) -> Result<u32, ConfigError> {
    let cost = raw
        .trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::Invalid("BCRYPT_COST"))?;

    if !(MIN_BCRYPT_COST..=MAX_BCRYPT_COST).contains(&cost) {
        return Err(ConfigError::Invalid("BCRYPT_COST"));
    }

    Ok(cost)
}
