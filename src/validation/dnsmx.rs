use crate::config::Config;
use crate::error::{LookupError, ValidationError};
use crate::validation::pipeline::Validator;
use std::io;
use std::net::IpAddr;
use std::sync::OnceLock;
use trust_dns_resolver::{
    Resolver,
    config::{ResolverConfig, ResolverOpts},
    error::ResolveError,
};
use tracing::{debug, warn};

static DEFAULT_RESOLVER: OnceLock<Option<DnsResolver>> = OnceLock::new();

/// Finds a host that can receive mail for a domain.
#[cfg_attr(test, mockall::automock)]
pub trait HostResolver {
    /// Returns the first mail exchanger of `domain`, or the first of its IP
    /// addresses when it has no MX record.
    fn lookup_host(&self, domain: &str) -> Result<String, LookupError>;
}

/// [`HostResolver`] backed by real DNS queries.
///
/// Every call performs fresh queries: the resolver cache is disabled and each
/// query is attempted once. The underlying resolver drives its own runtime,
/// so do not call it from inside an async executor; wrap it in
/// `spawn_blocking` (with your own timeout) instead.
pub struct DnsResolver {
    resolver: Resolver,
}

impl DnsResolver {
    /// Creates a resolver from the system DNS configuration, falling back to
    /// the library default upstreams when the system configuration cannot be
    /// read.
    ///
    /// # Arguments
    /// * `config` - Supplies the per-query timeout; `None` keeps the resolver
    ///   default
    ///
    /// # Returns
    /// The resolver, or the I/O error raised while building its runtime.
    pub fn new(config: &Config) -> io::Result<Self> {
        let (resolver_config, mut opts) = match trust_dns_resolver::system_conf::read_system_conf()
        {
            Ok(system) => system,
            Err(err) => {
                warn!(error = %err, "cannot read system DNS configuration, using defaults");
                (ResolverConfig::default(), ResolverOpts::default())
            }
        };

        opts.attempts = 1;
        opts.cache_size = 0;
        if let Some(timeout) = config.dns_timeout() {
            opts.timeout = timeout;
        }

        Ok(Self {
            resolver: Resolver::new(resolver_config, opts)?,
        })
    }
}

impl HostResolver for DnsResolver {
    fn lookup_host(&self, domain: &str) -> Result<String, LookupError> {
        resolve_host(&self.resolver, domain)
    }
}

/// The two record queries behind a host lookup.
#[cfg_attr(test, mockall::automock)]
trait RecordLookup {
    fn mx_hosts(&self, domain: &str) -> Result<Vec<String>, ResolveError>;
    fn ip_addrs(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError>;
}

impl RecordLookup for Resolver {
    fn mx_hosts(&self, domain: &str) -> Result<Vec<String>, ResolveError> {
        Ok(self
            .mx_lookup(domain)?
            .iter()
            .map(|mx| mx.exchange().to_string())
            .collect())
    }

    fn ip_addrs(&self, domain: &str) -> Result<Vec<IpAddr>, ResolveError> {
        Ok(self.lookup_ip(domain)?.iter().collect())
    }
}

/// Checks DNS records for a domain following RFC 5321 requirements
///
/// 1. First checks for MX records (mail server configuration)
/// 2. If MX lookup fails or is empty, checks for A (IPv4) or AAAA (IPv6) records
///
/// # Arguments
/// * `records` - Source of MX and address records
/// * `domain` - Domain name to check (without @ symbol)
///
/// # Returns
/// The first mail exchanger, or the first IP address when there is no MX
/// record, or [`LookupError::DomainLookupFailed`] when both lookups fail.
fn resolve_host<L>(records: &L, domain: &str) -> Result<String, LookupError>
where
    L: RecordLookup + ?Sized,
{
    match records.mx_hosts(domain) {
        Ok(hosts) => {
            if let Some(host) = hosts.into_iter().next() {
                debug!(domain, %host, "found MX record");
                return Ok(host);
            }
            debug!(domain, "MX lookup returned no records");
        }
        Err(err) => debug!(domain, error = %err, "MX lookup failed"),
    }

    // Fallback to A/AAAA records if MX lookup failed
    match records.ip_addrs(domain) {
        Ok(ips) => {
            if let Some(ip) = ips.into_iter().next() {
                debug!(domain, %ip, "found address record");
                return Ok(ip.to_string());
            }
            debug!(domain, "address lookup returned no records");
        }
        Err(err) => debug!(domain, error = %err, "address lookup failed"),
    }

    Err(LookupError::DomainLookupFailed {
        domain: domain.to_string(),
    })
}

/// Resolves `domain` with the process-wide [`DnsResolver`].
///
/// The resolver is built on first use from [`Config::from_env`]. If it cannot
/// be built every lookup fails.
///
/// # Arguments
/// * `domain` - Domain name to check (without @ symbol)
///
/// # Returns
/// The first mail exchanger or IP address, or
/// [`LookupError::DomainLookupFailed`] carrying `domain`.
pub fn lookup_host(domain: &str) -> Result<String, LookupError> {
    match default_resolver() {
        Some(resolver) => resolver.lookup_host(domain),
        None => Err(LookupError::DomainLookupFailed {
            domain: domain.to_string(),
        }),
    }
}

fn default_resolver() -> Option<&'static DnsResolver> {
    DEFAULT_RESOLVER
        .get_or_init(|| {
            let config = Config::from_env().unwrap_or_else(|err| {
                warn!(error = %err, "ignoring invalid resolver configuration");
                Config::default()
            });
            DnsResolver::new(&config)
                .inspect_err(|err| warn!(error = %err, "cannot create DNS resolver"))
                .ok()
        })
        .as_ref()
}

/// Validator checking that the domain has an MX or A/AAAA record, using the
/// process-wide resolver.
pub fn validate_host(_username: &str, domain: &str) -> Result<(), ValidationError> {
    lookup_host(domain)
        .map(|_| ())
        .map_err(ValidationError::InvalidHost)
}

/// Host check bound to a specific resolver.
pub struct HostValidator<R> {
    resolver: R,
}

impl<R: HostResolver> HostValidator<R> {
    pub fn new(resolver: R) -> Self {
        Self { resolver }
    }
}

impl<R: HostResolver> Validator for HostValidator<R> {
    fn validate(&self, _username: &str, domain: &str) -> Result<(), ValidationError> {
        self.resolver
            .lookup_host(domain)
            .map(|_| ())
            .map_err(ValidationError::InvalidHost)
    }
}
