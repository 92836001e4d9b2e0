/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, DATABASE_URL, JWT_SECRET, CORS 許可など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 起動後は immutable (AppState 経由で参照する)
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;

const DEV_JWT_SECRET: &str = "dev-secret";
const DEFAULT_TOKEN_TTL_SECONDS: u64 = 7 * 24 * 60 * 60;
const MAX_TOKEN_TTL_SECONDS: u64 = 10 * 365 * 24 * 60 * 60;
const DEFAULT_CORS_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "https://localhost:3000",
    "https://localhost:3001",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn from_env() -> Self {
        match std::env::var("APP_ENV")
            .unwrap_or_else(|_| "development".to_string())
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub log_format: LogFormat,

    // None -> in-memory store
    pub database_url: Option<String>,

    pub cors_allowed_origins: Vec<String>,

    pub jwt_secret: String,
    pub cookie_secret: String,
    pub token_ttl_seconds: u64,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // secrets and the database url stay out of logs
        f.debug_struct("Config")
            .field("addr", &self.addr)
            .field("app_env", &self.app_env)
            .field("log_format", &self.log_format)
            .field("database", &self.database_url.is_some())
            .field("cors_allowed_origins", &self.cors_allowed_origins)
            .field("token_ttl_seconds", &self.token_ttl_seconds)
            .finish()
    }
}

// 1 秒以上 10 年以下
fn parse_token_ttl(raw: &str) -> Result<u64, ConfigError> {
    raw.trim()
        .parse::<u64>()
        .ok()
        .filter(|v| (1..=MAX_TOKEN_TTL_SECONDS).contains(v))
        .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let port: u16 = match std::env::var("PORT") {
            Ok(s) => s.parse().map_err(|_| ConfigError::Invalid("PORT"))?,
            Err(_) => 3000,
        };

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::from_env();

        let log_format = match std::env::var("LOG_FORMAT")
            .map(|v| v.to_ascii_lowercase())
            .as_deref()
        {
            Ok("json") => LogFormat::Json,
            Ok("pretty") => LogFormat::Pretty,
            Ok(_) => return Err(ConfigError::Invalid("LOG_FORMAT")),
            Err(_) if app_env.is_production() => LogFormat::Json,
            Err(_) => LogFormat::Pretty,
        };

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let cors_allowed_origins = match std::env::var("CORS_ALLOWED_ORIGINS") {
            Ok(v) => v
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>(),
            Err(_) => DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
        };

        // Production must bring its own secret; development falls back to a fixed one.
        let jwt_secret = match std::env::var("JWT_SECRET") {
            Ok(s) if !s.is_empty() => s,
            Ok(_) => return Err(ConfigError::Invalid("JWT_SECRET")),
            Err(_) if app_env.is_production() => return Err(ConfigError::Missing("JWT_SECRET")),
            Err(_) => DEV_JWT_SECRET.to_string(),
        };

        let cookie_secret = std::env::var("COOKIE_SECRET")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| jwt_secret.clone());

        let token_ttl_seconds = match std::env::var("TOKEN_TTL_SECONDS") {
            Ok(s) => parse_token_ttl(&s)?,
            Err(_) => DEFAULT_TOKEN_TTL_SECONDS,
        };

        Ok(Self {
            addr,
            app_env,
            log_format,
            database_url,
            cors_allowed_origins,
            jwt_secret,
            cookie_secret,
            token_ttl_seconds,
        })
    }

    #[cfg(test)]
    pub fn for_tests() -> Self {
        Self {
            addr: SocketAddr::from(([127, 0, 0, 1], 0)),
            app_env: AppEnv::Development,
            log_format: LogFormat::Pretty,
            database_url: None,
            cors_allowed_origins: DEFAULT_CORS_ORIGINS.iter().map(|s| s.to_string()).collect(),
            jwt_secret: "test-jwt-secret".to_string(),
            cookie_secret: "test-cookie-secret".to_string(),
            token_ttl_seconds: DEFAULT_TOKEN_TTL_SECONDS,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_ttl_accepts_values_up_to_ten_years() {
        assert_eq!(parse_token_ttl("604800").unwrap(), 604_800);
        assert_eq!(parse_token_ttl(" 1 ").unwrap(), 1);
        assert_eq!(
            parse_token_ttl(&MAX_TOKEN_TTL_SECONDS.to_string()).unwrap(),
            MAX_TOKEN_TTL_SECONDS
        );
    }

    #[test]
    fn token_ttl_out_of_range_is_invalid() {
        let too_long = (MAX_TOKEN_TTL_SECONDS + 1).to_string();
        let huge = u64::MAX.to_string();
        for raw in ["0", "-5", "week", "100000000000000", too_long.as_str(), huge.as_str()] {
            assert!(
                matches!(
                    parse_token_ttl(raw),
                    Err(ConfigError::Invalid("TOKEN_TTL_SECONDS"))
                ),
                "{raw}"
            );
        }
    }
}
