use crate::config::Config;
use crate::error::ValidationError;
use parking_lot::RwLock;
use std::collections::HashSet;
use std::sync::OnceLock;
use tracing::{info, trace, warn};

/// Known disposable or scam email domains.
pub const DEFAULT_BLACKLIST: &[&str] = &[
    "mailinator.com",
    "tempmail.com",
    "10minutemail.com",
    "guerrillamail.com",
    "sharklasers.com",
    "guerrillamailblock.com",
    "blacklisted.com",
];

static GLOBAL_REGISTRY: OnceLock<DomainRegistry> = OnceLock::new();

/// Thread-safe set of blacklisted domains.
///
/// Lookups take a shared lock, every mutation takes the exclusive lock.
/// Matching is exact and case-sensitive; sanitize addresses with
/// [`to_lower`](crate::sanitize::to_lower) first if that matters.
#[derive(Debug)]
pub struct DomainRegistry {
    domains: RwLock<HashSet<String>>,
}

impl Default for DomainRegistry {
    fn default() -> Self {
        Self::with_domains(DEFAULT_BLACKLIST.iter().copied())
    }
}

impl DomainRegistry {
    /// A registry with no domains at all.
    pub fn empty() -> Self {
        Self {
            domains: RwLock::new(HashSet::new()),
        }
    }

    pub fn with_domains<I, S>(domains: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            domains: RwLock::new(domains.into_iter().map(Into::into).collect()),
        }
    }

    /// Default seed plus the extra domains from `config`.
    pub fn from_config(config: &Config) -> Self {
        let registry = Self::default();
        registry.extend(config.extra_blacklist.iter().cloned());
        registry
    }

    pub fn is_blacklisted(&self, domain: &str) -> bool {
        self.domains.read().contains(domain)
    }

    /// Snapshot of the current contents. Changing the returned set does not
    /// touch the registry.
    pub fn list(&self) -> HashSet<String> {
        self.domains.read().clone()
    }

    /// Discards every domain and installs exactly `domains`.
    pub fn replace<I, S>(&self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fresh: HashSet<String> = domains.into_iter().map(Into::into).collect();
        let count = fresh.len();
        *self.domains.write() = fresh;
        info!(count, "blacklist replaced");
    }

    pub fn add(&self, domain: impl Into<String>) {
        let domain = domain.into();
        trace!(%domain, "blacklisting domain");
        self.domains.write().insert(domain);
    }

    /// Adds every domain under a single write lock.
    pub fn extend<I, S>(&self, domains: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.domains
            .write()
            .extend(domains.into_iter().map(Into::into));
    }

    pub fn remove(&self, domain: &str) {
        if self.domains.write().remove(domain) {
            trace!(%domain, "domain removed from blacklist");
        }
    }

    pub fn len(&self) -> usize {
        self.domains.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.read().is_empty()
    }

    /// Validator rejecting any domain held by this registry.
    pub fn validator(&self) -> BlacklistValidator<'_> {
        BlacklistValidator { registry: self }
    }
}

/// The process-wide registry.
///
/// Created on first use from [`Config::from_env`]; if the environment holds an
/// invalid configuration the default seed is used instead.
pub fn global() -> &'static DomainRegistry {
    GLOBAL_REGISTRY.get_or_init(|| match Config::from_env() {
        Ok(config) => DomainRegistry::from_config(&config),
        Err(err) => {
            warn!(error = %err, "ignoring invalid configuration for the global blacklist");
            DomainRegistry::default()
        }
    })
}

pub fn is_domain_blacklisted(domain: &str) -> bool {
    global().is_blacklisted(domain)
}

pub fn list_blacklist() -> HashSet<String> {
    global().list()
}

pub fn set_blacklist<I, S>(domains: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    global().replace(domains)
}

pub fn add_blacklist(domain: impl Into<String>) {
    global().add(domain)
}

pub fn remove_blacklist(domain: &str) {
    global().remove(domain)
}

/// Validator checking the domain against the process-wide registry.
pub fn is_address_blacklisted(_username: &str, domain: &str) -> Result<(), ValidationError> {
    global().validator().check(domain)
}

/// Blacklist check bound to a specific registry.
#[derive(Debug, Clone, Copy)]
pub struct BlacklistValidator<'a> {
    registry: &'a DomainRegistry,
}

impl BlacklistValidator<'_> {
    pub fn check(&self, domain: &str) -> Result<(), ValidationError> {
        if self.registry.is_blacklisted(domain) {
            return Err(ValidationError::BlacklistedDomain);
        }
        Ok(())
    }
}

impl crate::validation::pipeline::Validator for BlacklistValidator<'_> {
    fn validate(&self, _username: &str, domain: &str) -> Result<(), ValidationError> {
        self.check(domain)
    }
}
