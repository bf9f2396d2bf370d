use crate::error::ConfigError;
use serde::Deserialize;
use std::env;
use std::time::Duration;

pub const DNS_TIMEOUT_VAR: &str = "MAILSIFT_DNS_TIMEOUT_SECS";
pub const BLACKLIST_VAR: &str = "MAILSIFT_BLACKLIST";

/// Library settings.
///
/// Everything is optional: an empty configuration means "resolver defaults
/// and the built-in blacklist seed".
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Per-query DNS timeout, in seconds. `None` keeps the resolver default.
    pub dns_timeout_secs: Option<u64>,
    /// Domains added to the process-wide blacklist on top of the default seed.
    pub extra_blacklist: Vec<String>,
}

impl Config {
    /// Reads the configuration from the environment, loading a `.env` file
    /// first when one is present.
    ///
    /// # Environment
    /// * `MAILSIFT_DNS_TIMEOUT_SECS` - positive integer, seconds
    /// * `MAILSIFT_BLACKLIST` - comma-separated list of domains
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let dns_timeout_secs = match lookup(DNS_TIMEOUT_VAR) {
            Some(raw) => Some(parse_timeout(&raw)?),
            None => None,
        };

        let extra_blacklist = lookup(BLACKLIST_VAR)
            .map(|raw| parse_domain_list(&raw))
            .unwrap_or_default();

        Ok(Self {
            dns_timeout_secs,
            extra_blacklist,
        })
    }

    /// Sets the DNS timeout, rounded up to whole seconds. A zero duration
    /// keeps the resolver default.
    pub fn with_dns_timeout(mut self, timeout: Duration) -> Self {
        let secs = timeout.as_secs() + u64::from(timeout.subsec_nanos() > 0);
        self.dns_timeout_secs = (secs > 0).then_some(secs);
        self
    }

    pub fn with_extra_blacklist<I, S>(mut self, domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.extra_blacklist.extend(domains.into_iter().map(Into::into));
        self
    }

    pub fn dns_timeout(&self) -> Option<Duration> {
        self.dns_timeout_secs
            .filter(|&secs| secs > 0)
            .map(Duration::from_secs)
    }
}

fn parse_timeout(raw: &str) -> Result<u64, ConfigError> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::InvalidValue {
            key: DNS_TIMEOUT_VAR,
            value: raw.to_string(),
        }),
    }
}

fn parse_domain_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|domain| !domain.is_empty())
        .map(str::to_string)
        .collect()
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
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_empty_environment() {
        let config = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.dns_timeout(), None);
    }

    #[test]
    fn test_reads_timeout_and_blacklist() {
        let config = Config::from_lookup(lookup_from(&[
            (DNS_TIMEOUT_VAR, "3"),
            (BLACKLIST_VAR, " spam.example , ,junk.example"),
        ]))
        .unwrap();

        assert_eq!(config.dns_timeout(), Some(Duration::from_secs(3)));
        assert_eq!(config.extra_blacklist, vec!["spam.example", "junk.example"]);
    }

    #[test]
    fn test_rejects_bad_timeout() {
        for raw in ["0", "-1", "soon", ""] {
            let err = Config::from_lookup(lookup_from(&[(DNS_TIMEOUT_VAR, raw)])).unwrap_err();
            assert_eq!(
                err,
                ConfigError::InvalidValue {
                    key: DNS_TIMEOUT_VAR,
                    value: raw.to_string(),
                }
            );
        }
    }

    #[test]
    fn test_builder_setters() {
        let config = Config::default()
            .with_dns_timeout(Duration::from_secs(5))
            .with_extra_blacklist(["a.example", "b.example"]);
        assert_eq!(config.dns_timeout_secs, Some(5));
        assert_eq!(config.extra_blacklist.len(), 2);
    }

    #[test]
    fn test_sub_second_timeout_rounds_up() {
        let config = Config::default().with_dns_timeout(Duration::from_millis(500));
        assert_eq!(config.dns_timeout(), Some(Duration::from_secs(1)));

        let config = Config::default().with_dns_timeout(Duration::from_millis(2500));
        assert_eq!(config.dns_timeout(), Some(Duration::from_secs(3)));
    }

    #[test]
    fn test_zero_timeout_keeps_default() {
        let config = Config::default().with_dns_timeout(Duration::ZERO);
        assert_eq!(config.dns_timeout_secs, None);
        assert_eq!(config.dns_timeout(), None);

        let config: Config = serde_json::from_str(r#"{"dns_timeout_secs": 0}"#).unwrap();
        assert_eq!(config.dns_timeout(), None);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: Config = serde_json::from_str(r#"{"dns_timeout_secs": 2}"#).unwrap();
        assert_eq!(config.dns_timeout_secs, Some(2));
        assert!(config.extra_blacklist.is_empty());
    }
}
