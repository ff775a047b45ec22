use std::{net::SocketAddr, time::Duration};

use powerwatch_core::constants::DEFAULT_SCAN_INTERVAL_MINUTES;
use powerwatch_core::errors::{Error, Result};
use powerwatch_core::settings::{AccountConfig, PollConfig};
use powerwatch_source::{AccountIds, DEFAULT_BASE_URL, DEFAULT_REQUEST_TIMEOUT};

pub struct Config {
    pub listen_addr: SocketAddr,
    pub account: AccountIds,
    pub poll: PollConfig,
    pub base_url: String,
    /// Per-operation timeout towards the utility platform.
    pub source_timeout: Duration,
    pub cors_allow: Vec<String>,
    /// Timeout of requests to this server.
    pub http_timeout: Duration,
}

impl Config {
    /// Loads `.env` if present, then reads `PW_*` variables.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let listen_addr: SocketAddr = var("PW_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .map_err(|_| Error::InvalidConfigValue("PW_LISTEN_ADDR".to_string()))?;

        let mut account = AccountConfig::new(
            lookup("PW_CONS_NO").ok_or_else(|| Error::MissingConfigKey("PW_CONS_NO".into()))?,
            lookup("PW_ORG_NO").ok_or_else(|| Error::MissingConfigKey("PW_ORG_NO".into()))?,
        );
        if let Some(open_id) = lookup("PW_OPEN_ID") {
            account = account.with_open_id(open_id);
        }
        let account = account.validate()?;

        let interval: u32 = var("PW_SCAN_INTERVAL", &DEFAULT_SCAN_INTERVAL_MINUTES.to_string())
            .trim()
            .parse()
            .map_err(|_| Error::InvalidConfigValue("PW_SCAN_INTERVAL".to_string()))?;
        let poll = PollConfig::new(interval)?;

        let source_timeout_secs = positive(
            "PW_REQUEST_TIMEOUT_SECS",
            &var(
                "PW_REQUEST_TIMEOUT_SECS",
                &DEFAULT_REQUEST_TIMEOUT.as_secs().to_string(),
            ),
        )?;

        let cors_allow = var("PW_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms = positive("PW_HTTP_TIMEOUT_MS", &var("PW_HTTP_TIMEOUT_MS", "30000"))?;

        Ok(Self {
            listen_addr,
            account,
            poll,
            base_url: var("PW_BASE_URL", DEFAULT_BASE_URL),
            source_timeout: Duration::from_secs(source_timeout_secs),
            cors_allow,
            http_timeout: Duration::from_millis(timeout_ms),
        })
    }
}

/// Parses a non-zero integer setting.
fn positive(key: &str, value: &str) -> Result<u64> {
    match value.trim().parse::<u64>() {
        Ok(parsed) if parsed > 0 => Ok(parsed),
        _ => Err(Error::InvalidConfigValue(format!("{key}={value}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn load(vars: &[(&str, &str)]) -> Result<Config> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = load(&[("PW_CONS_NO", " 1400123456 "), ("PW_ORG_NO", "14401")]).unwrap();
        assert_eq!(config.account.cons_no, "1400123456");
        assert_eq!(config.poll.interval_minutes(), 60);
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.source_timeout, Duration::from_secs(15));
        assert_eq!(config.listen_addr.port(), 8080);
        assert_eq!(config.cors_allow, vec!["*".to_string()]);
    }

    #[test]
    fn test_missing_account_is_rejected() {
        let err = load(&[("PW_ORG_NO", "14401")]).err().unwrap();
        assert!(matches!(err, Error::MissingConfigKey(ref key) if key == "PW_CONS_NO"));
    }

    #[test]
    fn test_interval_out_of_range_is_rejected() {
        let err = load(&[
            ("PW_CONS_NO", "1400123456"),
            ("PW_ORG_NO", "14401"),
            ("PW_SCAN_INTERVAL", "5"),
        ])
        .err()
        .unwrap();
        assert!(matches!(err, Error::InvalidConfigValue(_)));
    }

    #[test]
    fn test_open_id_is_optional() {
        let config = load(&[
            ("PW_CONS_NO", "1400123456"),
            ("PW_ORG_NO", "14401"),
            ("PW_OPEN_ID", "oAbC"),
        ])
        .unwrap();
        assert_eq!(config.account.open_id.as_deref(), Some("oAbC"));
    }

    #[test]
    fn test_bad_timeouts_are_rejected() {
        for (key, value) in [
            ("PW_REQUEST_TIMEOUT_SECS", "0"),
            ("PW_REQUEST_TIMEOUT_SECS", "fast"),
            ("PW_HTTP_TIMEOUT_MS", "0"),
            ("PW_HTTP_TIMEOUT_MS", "-5"),
        ] {
            let err = load(&[("PW_CONS_NO", "1400123456"), ("PW_ORG_NO", "14401"), (key, value)])
                .err()
                .unwrap();
            assert!(
                matches!(err, Error::InvalidConfigValue(ref msg) if msg.starts_with(key)),
                "{key}={value} should be rejected"
            );
        }
    }

    #[test]
    fn test_custom_timeouts() {
        let config = load(&[
            ("PW_CONS_NO", "1400123456"),
            ("PW_ORG_NO", "14401"),
            ("PW_REQUEST_TIMEOUT_SECS", "5"),
            ("PW_HTTP_TIMEOUT_MS", "2500"),
        ])
        .unwrap();
        assert_eq!(config.source_timeout, Duration::from_secs(5));
        assert_eq!(config.http_timeout, Duration::from_millis(2500));
    }
}
