use crate::engine::RiskThresholds;
use std::{env, net::SocketAddr, path::PathBuf};
use tracing::warn;

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_DATA_PATH: &str = "data/state.json";

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub data_path: PathBuf,
    pub thresholds: RiskThresholds,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self {
            port: resolve_port(),
            data_path: resolve_data_path(),
            thresholds: resolve_thresholds(),
        }
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }
}

pub fn resolve_port() -> u16 {
    env::var("PORT")
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(DEFAULT_PORT)
}

pub fn resolve_data_path() -> PathBuf {
    env::var("APP_DATA_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_PATH))
}

pub fn resolve_thresholds() -> RiskThresholds {
    thresholds_from(
        env::var("AUDIT_SAFE_UP_TO").ok().as_deref(),
        env::var("AUDIT_CRITICAL_FROM").ok().as_deref(),
    )
}

fn thresholds_from(safe_up_to: Option<&str>, critical_from: Option<&str>) -> RiskThresholds {
    let defaults = RiskThresholds::default();
    if safe_up_to.is_none() && critical_from.is_none() {
        return defaults;
    }

    let parse = |raw: Option<&str>, fallback: f64| match raw {
        Some(value) => value.trim().parse::<f64>().ok(),
        None => Some(fallback),
    };

    let parsed = parse(safe_up_to, defaults.safe_up_to)
        .zip(parse(critical_from, defaults.critical_from))
        .and_then(|(safe, critical)| RiskThresholds::new(safe, critical));

    parsed.unwrap_or_else(|| {
        warn!(
            ?safe_up_to,
            ?critical_from,
            "invalid risk thresholds, using defaults"
        );
        defaults
    })
}
