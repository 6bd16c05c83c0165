use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Result, bail};

pub const STORE_ENV: &str = "LEARNFI_STORE";
pub const MARKETS_URL_ENV: &str = "LEARNFI_MARKETS_URL";

pub const DEFAULT_REFRESH_INTERVAL: Duration = Duration::from_secs(60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_MARKETS_URL: &str = "https://api.compound.finance/api/v2/ctoken";

/// Where market records come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarketSourceKind {
    /// Built-in four-asset table.
    Static,
    /// Compound-style `cTokens` HTTP endpoint.
    Compound { url: String },
}

/// Values the caller supplied explicitly (CLI flags). Anything left `None`
/// falls back to the environment, then to defaults.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub store_path: Option<PathBuf>,
    pub source: Option<String>,
    pub markets_url: Option<String>,
    pub refresh_secs: Option<u64>,
}

/// Runtime configuration for a learner session.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub market_source: MarketSourceKind,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
}

impl AppConfig {
    pub fn from_overrides(overrides: &ConfigOverrides) -> Result<Self> {
        Self::resolve(overrides, |key| std::env::var(key).ok())
    }

    /// Resolve with an explicit environment lookup.
    pub fn resolve(overrides: &ConfigOverrides, env: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let store_path = match overrides.store_path.clone().or_else(|| env(STORE_ENV).map(PathBuf::from)) {
            Some(path) => path,
            None => default_store_path()?,
        };

        let market_source = match overrides.source.as_deref().unwrap_or("static").to_lowercase().as_str() {
            "static" => MarketSourceKind::Static,
            "compound" => MarketSourceKind::Compound {
                url: overrides
                    .markets_url
                    .clone()
                    .or_else(|| env(MARKETS_URL_ENV))
                    .unwrap_or_else(|| DEFAULT_MARKETS_URL.to_string()),
            },
            other => bail!("Invalid market source '{other}'. Use 'static' or 'compound'."),
        };

        let refresh_interval = match overrides.refresh_secs {
            Some(0) => bail!("Refresh interval must be at least one second"),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_REFRESH_INTERVAL,
        };

        Ok(AppConfig {
            store_path,
            market_source,
            refresh_interval,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        })
    }
}

fn default_store_path() -> Result<PathBuf> {
    let Some(home) = dirs::home_dir() else {
        bail!("Could not locate a home directory. Pass --store or set {STORE_ENV}.");
    };
    Ok(home.join(".learnfi").join("profile.json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_env(_: &str) -> Option<String> {
        None
    }

    #[test]
    fn test_flags_win_over_env() {
        let overrides = ConfigOverrides {
            store_path: Some("/tmp/flag.json".into()),
            source: Some("compound".into()),
            markets_url: Some("http://flag".into()),
            refresh_secs: Some(5),
        };
        let env = |key: &str| match key {
            STORE_ENV => Some("/tmp/env.json".to_string()),
            MARKETS_URL_ENV => Some("http://env".to_string()),
            _ => None,
        };
        let config = AppConfig::resolve(&overrides, env).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/flag.json"));
        assert_eq!(config.market_source, MarketSourceKind::Compound { url: "http://flag".into() });
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
    }

    #[test]
    fn test_env_then_defaults() {
        let overrides = ConfigOverrides {
            source: Some("Compound".into()),
            ..Default::default()
        };
        let env = |key: &str| (key == STORE_ENV).then(|| "/tmp/env.json".to_string());
        let config = AppConfig::resolve(&overrides, env).unwrap();
        assert_eq!(config.store_path, PathBuf::from("/tmp/env.json"));
        assert_eq!(
            config.market_source,
            MarketSourceKind::Compound { url: DEFAULT_MARKETS_URL.into() }
        );
        assert_eq!(config.refresh_interval, DEFAULT_REFRESH_INTERVAL);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let bad_source = ConfigOverrides {
            store_path: Some("x.json".into()),
            source: Some("chainlink".into()),
            ..Default::default()
        };
        assert!(AppConfig::resolve(&bad_source, no_env).is_err());

        let zero = ConfigOverrides {
            store_path: Some("x.json".into()),
            refresh_secs: Some(0),
            ..Default::default()
        };
        let err = AppConfig::resolve(&zero, no_env).unwrap_err();
        assert!(err.to_string().contains("at least one second"));
    }
}
