use crate::error::ValidationError;
use psl::Type;

/// Rejects domains whose public suffix is not managed by ICANN.
///
/// The lookup runs against the public suffix list compiled into the `psl`
/// crate, so it is only as fresh as the dependency. Unknown TLDs and private
/// suffixes (`blogspot.com`, `github.io`, ...) both fail. Treat a failure as a
/// hint rather than proof that the address is unusable.
pub fn validate_icann_suffix(_username: &str, domain: &str) -> Result<(), ValidationError> {
    if is_icann_domain(domain) {
        Ok(())
    } else {
        Err(ValidationError::InvalidIcannSuffix)
    }
}

/// Returns `true` if the public suffix of `domain` is an ICANN section entry.
pub fn is_icann_domain(domain: &str) -> bool {
    let domain = domain.to_lowercase();
    psl::suffix(domain.as_bytes())
        .and_then(|suffix| suffix.typ())
        .is_some_and(|typ| typ == Type::Icann)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icann_suffixes() {
        assert!(validate_icann_suffix("user", "example.com").is_ok());
        assert!(validate_icann_suffix("user", "example.co.uk").is_ok());
        assert!(validate_icann_suffix("user", "mail.example.org").is_ok());
    }

    #[test]
    fn test_suffix_lookup_ignores_case() {
        assert!(is_icann_domain("EXAMPLE.COM"));
        assert!(is_icann_domain("Example.Co.Uk"));
    }

    #[test]
    fn test_unknown_tld() {
        assert_eq!(
            validate_icann_suffix("user", "example.comm"),
            Err(ValidationError::InvalidIcannSuffix)
        );
        assert!(!is_icann_domain("localhost"));
    }

    #[test]
    fn test_private_suffix() {
        assert!(!is_icann_domain("someone.github.io"));
    }

    #[test]
    fn test_domain_literal() {
        assert!(!is_icann_domain("[192.168.0.1]"));
    }
}
