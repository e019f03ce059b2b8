//! Process configuration read from the environment.
//!
//! - `BEEDASH_DATA`: survey CSV path (default `Dataset/intro_bees.csv`)
//! - `HOST` / `PORT`: listen address (default `127.0.0.1:8050`)
//! - `BEEDASH_DEBUG`: debug logging and pretty-printed JSON (default off)
//!
//! Unset or malformed values take their defaults.

use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;

pub const DEFAULT_DATA_PATH: &str = "Dataset/intro_bees.csv";
pub const DEFAULT_HOST: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_PORT: u16 = 8050;

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub data_path: PathBuf,
    pub host: IpAddr,
    pub port: u16,
    pub debug: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            host: DEFAULT_HOST,
            port: DEFAULT_PORT,
            debug: false,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_path = lookup("BEEDASH_DATA")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_PATH));

        Self {
            data_path,
            host: parsed(&lookup, "HOST", DEFAULT_HOST),
            port: parsed(&lookup, "PORT", DEFAULT_PORT),
            debug: lookup("BEEDASH_DEBUG")
                .and_then(|v| parse_bool(&v))
                .unwrap_or(false),
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parsed<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    lookup(name)
        .and_then(|v| v.trim().parse::<T>().ok())
        .unwrap_or(default)
}

fn parse_bool(raw: &str) -> Option<bool> {
    let raw = raw.trim();
    let any_of = |words: &[&str]| words.iter().any(|w| raw.eq_ignore_ascii_case(w));
    if any_of(&["1", "true", "yes", "on"]) {
        Some(true)
    } else if any_of(&["0", "false", "no", "off"]) {
        Some(false)
    } else {
        None
    }
}
