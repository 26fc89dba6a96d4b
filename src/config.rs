// Runtime configuration: supplier endpoints and HTTP client settings
use std::time::Duration;

use thiserror::Error;

pub const DEFAULT_ACME_URL: &str = "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/acme";
pub const DEFAULT_PATAGONIA_URL: &str =
    "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/patagonia";
pub const DEFAULT_PAPERFLIES_URL: &str =
    "https://5f2be0b4ffc88500167b85a0.mockapi.io/suppliers/paperflies";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {name}: {value}")]
    InvalidValue { name: &'static str, value: String },

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub acme_url: String,
    pub patagonia_url: String,
    pub paperflies_url: String,
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            acme_url: DEFAULT_ACME_URL.to_string(),
            patagonia_url: DEFAULT_PATAGONIA_URL.to_string(),
            paperflies_url: DEFAULT_PAPERFLIES_URL.to_string(),
            timeout_secs: 20,
            user_agent: format!("hotel_merger/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl AppConfig {
    // Defaults overridden by ACME_URL, PATAGONIA_URL, PAPERFLIES_URL,
    // HOTEL_MERGER_TIMEOUT_SECS and HOTEL_MERGER_USER_AGENT
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let timeout_secs = match lookup("HOTEL_MERGER_TIMEOUT_SECS") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => secs,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        name: "HOTEL_MERGER_TIMEOUT_SECS",
                        value,
                    })
                }
            },
            None => defaults.timeout_secs,
        };

        Ok(Self {
            acme_url: lookup("ACME_URL").unwrap_or(defaults.acme_url),
            patagonia_url: lookup("PATAGONIA_URL").unwrap_or(defaults.patagonia_url),
            paperflies_url: lookup("PAPERFLIES_URL").unwrap_or(defaults.paperflies_url),
            timeout_secs,
            user_agent: lookup("HOTEL_MERGER_USER_AGENT").unwrap_or(defaults.user_agent),
        })
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn http_client(&self) -> Result<reqwest::Client, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(self.timeout())
            .user_agent(self.user_agent.clone())
            .build()?;
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| vars.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = AppConfig::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.acme_url, DEFAULT_ACME_URL);
        assert_eq!(config.timeout(), Duration::from_secs(20));
    }

    #[test]
    fn test_overrides_from_lookup() {
        let config = AppConfig::from_lookup(lookup_from(&[
            ("ACME_URL", "http://localhost:9000/acme"),
            ("HOTEL_MERGER_TIMEOUT_SECS", " 5 "),
            ("HOTEL_MERGER_USER_AGENT", "merger-test"),
        ]))
        .unwrap();

        assert_eq!(config.acme_url, "http://localhost:9000/acme");
        assert_eq!(config.patagonia_url, DEFAULT_PATAGONIA_URL);
        assert_eq!(config.timeout_secs, 5);
        assert_eq!(config.user_agent, "merger-test");
    }

    #[test]
    fn test_invalid_timeout_is_rejected() {
        for bad in ["abc", "0", "-3"] {
            let result = AppConfig::from_lookup(lookup_from(&[("HOTEL_MERGER_TIMEOUT_SECS", bad)]));
            assert!(
                matches!(result, Err(ConfigError::InvalidValue { name: "HOTEL_MERGER_TIMEOUT_SECS", .. })),
                "expected rejection for {bad:?}"
            );
        }
    }

    #[test]
    fn test_http_client_builds() {
        assert!(AppConfig::default().http_client().is_ok());
    }
}
