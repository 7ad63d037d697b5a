//! Environment-driven server configuration.
//!
//! DESIGN
//! ======
//! Every knob has a default so the server starts with no environment at all.
//! Unparseable values fall back to the default rather than aborting startup.

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

use std::path::PathBuf;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_PUBLIC_DIR: &str = "public";
const DEFAULT_LEVELS_DIR: &str = "public/levels";

/// Server settings read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// TCP port to listen on (`PORT`).
    pub port: u16,
    /// Directory holding `<name>.json` level files (`LEVELS_DIR`).
    pub levels_dir: PathBuf,
    /// Static files served for unmatched paths (`PUBLIC_DIR`).
    pub public_dir: PathBuf,
}

impl Config {
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            port: env_parse("PORT", DEFAULT_PORT),
            levels_dir: env_path("LEVELS_DIR", DEFAULT_LEVELS_DIR),
            public_dir: env_path("PUBLIC_DIR", DEFAULT_PUBLIC_DIR),
        }
    }
}

pub(crate) fn env_parse<T>(key: &str, default: T) -> T
where
    T: std::str::FromStr + Copy,
{
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

fn env_path(key: &str, default: &str) -> PathBuf {
    std::env::var(key)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .map_or_else(|| PathBuf::from(default), PathBuf::from)
}
