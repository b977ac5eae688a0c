// src/config.rs

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use dotenvy::dotenv;
use url::Url;

const DEFAULT_JWT_EXPIRATION: u64 = 60 * 60 * 24;
const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection string. `None` selects the in-memory store.
    pub database_url: Option<String>,
    pub jwt_secret: String,
    /// Token lifetime in seconds.
    pub jwt_expiration: u64,
    pub rust_log: String,
    pub bind_addr: SocketAddr,

    /// Directory where uploaded post images are written.
    pub upload_dir: PathBuf,
    /// Base that stored image URLs are built from, e.g. `https://cdn.example.com/`.
    pub public_base_url: Url,
    pub max_upload_bytes: usize,
    pub cors_origins: Vec<String>,

    /// Problems found while reading the environment, logged once tracing is up.
    pub warnings: Vec<String>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from `lookup`, which returns the raw value of a variable.
    /// Malformed optional values fall back to their defaults and are recorded in
    /// `warnings` for the caller to log.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();

        let database_url = lookup("DATABASE_URL").filter(|v| !v.is_empty());

        let jwt_secret = lookup("JWT_SECRET").expect("JWT_SECRET must be set");

        let rust_log = lookup("RUST_LOG").unwrap_or_else(|| "info".to_string());

        let upload_dir = lookup("UPLOAD_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("uploads"));

        let cors_origins = lookup("CORS_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_else(|| {
                vec![
                    "http://localhost:8081".to_string(),
                    "http://127.0.0.1:8081".to_string(),
                ]
            });

        let jwt_expiration = parse_or(
            &lookup,
            "JWT_EXPIRATION",
            DEFAULT_JWT_EXPIRATION,
            &mut warnings,
        );
        let bind_addr = parse_or(
            &lookup,
            "BIND_ADDR",
            SocketAddr::from(([0, 0, 0, 0], 8080)),
            &mut warnings,
        );
        let max_upload_bytes = parse_or(
            &lookup,
            "MAX_UPLOAD_BYTES",
            DEFAULT_MAX_UPLOAD_BYTES,
            &mut warnings,
        );
        let public_base_url = parse_base_url(lookup("PUBLIC_BASE_URL"), &mut warnings);

        Self {
            database_url,
            jwt_secret,
            jwt_expiration,
            rust_log,
            bind_addr,
            upload_dir,
            public_base_url,
            max_upload_bytes,
            cors_origins,
            warnings,
        }
    }
}

/// Parses `key`, falling back to `default` when unset or malformed.
fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    default: T,
    warnings: &mut Vec<String>,
) -> T {
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warnings.push(format!("Ignoring malformed {}={:?}, using default", key, raw));
            default
        }),
        None => default,
    }
}

/// The base URL must end with '/' so that `Url::join` appends instead of replacing
/// the last path segment.
fn parse_base_url(raw: Option<String>, warnings: &mut Vec<String>) -> Url {
    let fallback = || Url::parse("http://localhost:8080/").expect("static URL is valid");

    let Some(raw) = raw else {
        return fallback();
    };

    let normalized = if raw.ends_with('/') {
        raw.clone()
    } else {
        format!("{}/", raw)
    };

    Url::parse(&normalized).unwrap_or_else(|e| {
        warnings.push(format!("Ignoring malformed PUBLIC_BASE_URL={:?}: {}", raw, e));
        fallback()
    })
}
