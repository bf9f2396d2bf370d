/// Resolves the domain of an address through DNS.
///
/// Looks for MX records first and falls back to A/AAAA records. The
/// [`HostResolver`](dnsmx::HostResolver) trait keeps the DNS access
/// swappable; [`validate_host`](dnsmx::validate_host) uses the process-wide
/// resolver.
pub mod dnsmx;

/// Mailbox syntax (RFC 5322 `mailbox`: `addr-spec` or `name-addr`) and the
/// username/domain split.
///
/// # Examples
/// ```
/// use mailsift::validation::syntax::parse_email;
///
/// assert!(parse_email("user.name+tag@example.com").is_ok());
/// assert!(parse_email("Pelé@exämple.中国").is_ok());
/// assert!(parse_email("invalid@ex_mple.com").is_err());
/// ```
pub mod syntax;

/// Blacklist of disposable or scam domains.
pub mod disposable;

pub mod pipeline;
pub mod suffix;
pub mod username;
