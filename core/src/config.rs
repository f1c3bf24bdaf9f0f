use std::env;
use std::time::Duration;

use crate::domain::entities::{CurrentUser, UserId};

/// Page size used for both the live window and pagination unless overridden
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Which document backend the client talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    /// Process-local store seeded with demo posts
    Memory,
    /// JSON document backend over HTTP
    Rest,
}

impl std::str::FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "memory" | "mem" => Ok(BackendKind::Memory),
            "rest" | "http" => Ok(BackendKind::Rest),
            _ => Err(format!("Unknown backend: {}", s)),
        }
    }
}

/// Feed sizing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedConfig {
    /// Posts requested per historical page
    pub page_size: usize,
    /// Posts kept in the live window
    pub live_window: usize,
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            live_window: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub backend: BackendKind,
    /// Base URL of the REST document backend
    pub api_url: String,
    /// Bearer token for the REST backend
    pub api_token: Option<String>,
    pub feed: FeedConfig,
    /// How often the REST adapter polls to emulate live subscriptions
    pub poll_interval: Duration,
    pub request_timeout: Duration,
    /// Signed-in user, if any
    pub user: Option<CurrentUser>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let backend = match env::var("CATCHU_BACKEND") {
            Ok(value) => value.parse().unwrap_or_else(|e: String| {
                tracing::warn!("{}; falling back to the memory backend", e);
                BackendKind::Memory
            }),
            Err(_) => BackendKind::Memory,
        };

        let user = env::var("CATCHU_USER_ID").ok().map(|id| CurrentUser {
            id: UserId::new(id),
            display_name: env::var("CATCHU_USER_NAME").ok(),
            email: env::var("CATCHU_USER_EMAIL").ok(),
        });

        Self {
            backend,
            api_url: env::var("CATCHU_API_URL")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            api_token: env::var("CATCHU_API_TOKEN").ok(),
            feed: FeedConfig {
                page_size: parse_or("CATCHU_FEED_PAGE_SIZE", DEFAULT_PAGE_SIZE),
                live_window: parse_or("CATCHU_LIVE_WINDOW", DEFAULT_PAGE_SIZE),
            },
            poll_interval: Duration::from_millis(parse_or("CATCHU_POLL_INTERVAL_MS", 5_000)),
            request_timeout: Duration::from_millis(parse_or("CATCHU_REQUEST_TIMEOUT_MS", 10_000)),
            user,
        }
    }
}

fn parse_or<T: std::str::FromStr + Copy + std::fmt::Display>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => parse_value(&raw).unwrap_or_else(|| {
            tracing::warn!("Invalid value {:?} for {}, using {}", raw, key, default);
            default
        }),
        Err(_) => default,
    }
}

fn parse_value<T: std::str::FromStr>(raw: &str) -> Option<T> {
    raw.trim().parse().ok()
}
