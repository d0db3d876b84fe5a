//! Runtime configuration read from the environment.
//!
//! `.env` is loaded by the binary before [`DashboardConfig::from_env`] runs;
//! command-line flags override whatever is found here.

use std::time::Duration;

use crate::error::DashboardError;

pub const DEFAULT_SOURCE: &str = "https://test-dev.zero.co/dummy-api/";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    /// URL or local file path the experiment records are read from.
    pub source: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub page_size: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl DashboardConfig {
    /// Reads `DASHBOARD_SOURCE`, `DASHBOARD_TIMEOUT_SECS` and
    /// `DASHBOARD_PAGE_SIZE` from the process environment.
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup, falling back to defaults
    /// for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, DashboardError> {
        let mut config = Self::default();

        if let Some(source) = lookup("DASHBOARD_SOURCE").filter(|s| !s.trim().is_empty()) {
            config.source = source.trim().to_string();
        }
        if let Some(raw) = lookup("DASHBOARD_TIMEOUT_SECS") {
            config.timeout = Duration::from_secs(parse_positive("DASHBOARD_TIMEOUT_SECS", &raw)?);
        }
        if let Some(raw) = lookup("DASHBOARD_PAGE_SIZE") {
            config.page_size = parse_positive("DASHBOARD_PAGE_SIZE", &raw)? as usize;
        }

        Ok(config)
    }
}

fn parse_positive(key: &str, raw: &str) -> Result<u64, DashboardError> {
    match raw.trim().parse::<u64>() {
        Ok(0) => Err(DashboardError::InvalidConfig(format!("{key} must be greater than zero"))),
        Ok(v) => Ok(v),
        Err(e) => Err(DashboardError::InvalidConfig(format!("{key}='{raw}': {e}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.source, DEFAULT_SOURCE);
        assert_eq!(config.page_size, 10);
    }

    #[test]
    fn test_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("DASHBOARD_SOURCE", " data/experiments.json "),
            ("DASHBOARD_TIMEOUT_SECS", "5"),
            ("DASHBOARD_PAGE_SIZE", "25"),
        ]))
        .unwrap();

        assert_eq!(config.source, "data/experiments.json");
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.page_size, 25);
    }

    #[test]
    fn test_blank_source_keeps_default() {
        let config = DashboardConfig::from_lookup(lookup(&[("DASHBOARD_SOURCE", "  ")])).unwrap();
        assert_eq!(config.source, DEFAULT_SOURCE);
    }

    #[test]
    fn test_invalid_numbers() {
        let err =
            DashboardConfig::from_lookup(lookup(&[("DASHBOARD_PAGE_SIZE", "ten")])).unwrap_err();
        assert!(
            matches!(err, DashboardError::InvalidConfig(ref m) if m.contains("DASHBOARD_PAGE_SIZE"))
        );

        let err =
            DashboardConfig::from_lookup(lookup(&[("DASHBOARD_TIMEOUT_SECS", "0")])).unwrap_err();
        assert_eq!(
            err,
            DashboardError::InvalidConfig("DASHBOARD_TIMEOUT_SECS must be greater than zero".into())
        );
    }
}
