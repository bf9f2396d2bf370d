//! Email address sanitizing and validation.
//!
//! Addresses go through two independent pipelines:
//!
//! * [`sanitize_email`] applies string transforms (trim, lowercase, strip
//!   non-ASCII, drop `+tag` suffixes).
//! * [`validate_email`] parses the address into username and domain, then
//!   runs validators in order and stops at the first failure: username
//!   format, ICANN public suffix, domain blacklist and DNS reachability.
//!
//! ```
//! use mailsift::sanitize::{remove_after_plus, to_lower, trim_space};
//! use mailsift::validation::{suffix::validate_icann_suffix, username::validate_username_format};
//! use mailsift::{ErrorKind, sanitize_email, validate_email};
//!
//! let email = sanitize_email(" Jane+news@Example.com ", &[&trim_space, &to_lower, &remove_after_plus]);
//! assert_eq!(email, "jane@example.com");
//! assert!(validate_email(&email, &[&validate_username_format, &validate_icann_suffix]).is_ok());
//!
//! let err = validate_email("jane@example.comm", &[&validate_icann_suffix]).unwrap_err();
//! assert!(err.is(ErrorKind::InvalidIcannSuffix));
//! ```

pub mod config;
pub mod error;
pub mod sanitize;
pub mod validation;

pub use config::Config;
pub use error::{ConfigError, EmailError, ErrorKind, LookupError, ValidationError};
pub use sanitize::{Sanitizer, SanitizerPipeline, sanitize_email};
pub use validation::disposable::{
    DomainRegistry, add_blacklist, is_domain_blacklisted, list_blacklist, remove_blacklist,
    set_blacklist,
};
pub use validation::dnsmx::{DnsResolver, HostResolver, HostValidator, lookup_host};
pub use validation::pipeline::{Validator, ValidatorPipeline, validate_email};
pub use validation::syntax::{ParsedAddress, parse_email};
