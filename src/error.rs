use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Flat code for every failure the library can report.
///
/// Serialized as `SCREAMING_SNAKE_CASE` codes (`"INVALID_FORMAT"`,
/// `"BLACKLISTED_DOMAIN"`, ...), which makes it suitable for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorKind {
    InvalidEmail,
    InvalidFormat,
    InvalidHost,
    InvalidIcannSuffix,
    DomainLookupFailed,
    BlacklistedDomain,
    EmptyUsername,
    UsernameTooLong,
    UsernameEdgeDot,
    ConsecutiveDots,
    InvalidUsernameChar,
    Custom,
}

/// Error returned by [`validate_email`](crate::validate_email) and
/// [`parse_email`](crate::parse_email).
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EmailError {
    /// The input is not a single, syntactically valid mailbox.
    #[error("invalid email format")]
    InvalidFormat,
    /// A validator rejected the address. The reason is available through
    /// [`EmailError::reason`] or `std::error::Error::source`.
    #[error("invalid email: {0}")]
    InvalidEmail(#[source] ValidationError),
}

impl EmailError {
    /// The most specific kind of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            EmailError::InvalidFormat => ErrorKind::InvalidFormat,
            EmailError::InvalidEmail(reason) => reason.kind(),
        }
    }

    /// The validator failure wrapped by the umbrella, if any.
    pub fn reason(&self) -> Option<&ValidationError> {
        match self {
            EmailError::InvalidFormat => None,
            EmailError::InvalidEmail(reason) => Some(reason),
        }
    }

    /// Returns `true` if `kind` names this error, the umbrella around it, or
    /// any cause further down the chain.
    ///
    /// ```
    /// use mailsift::{ErrorKind, validate_email, validation::username::validate_username_format};
    ///
    /// let err = validate_email("nam$e@example.com", &[&validate_username_format]).unwrap_err();
    /// assert!(err.is(ErrorKind::InvalidEmail));
    /// assert!(err.is(ErrorKind::InvalidUsernameChar));
    /// assert!(!err.is(ErrorKind::InvalidFormat));
    /// ```
    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            EmailError::InvalidFormat => kind == ErrorKind::InvalidFormat,
            EmailError::InvalidEmail(reason) => kind == ErrorKind::InvalidEmail || reason.is(kind),
        }
    }
}

/// Why a single validator rejected an address.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid email host")]
    InvalidHost(#[source] LookupError),
    #[error("invalid ICANN suffix")]
    InvalidIcannSuffix,
    #[error("blacklisted domain")]
    BlacklistedDomain,
    #[error("username is empty")]
    EmptyUsername,
    #[error("username is too long")]
    UsernameTooLong,
    #[error("username cannot start or end with a dot")]
    UsernameEdgeDot,
    #[error("username cannot contain consecutive dots")]
    ConsecutiveDots,
    #[error("invalid character in username: {0:?}")]
    InvalidUsernameChar(char),
    /// Reason reported by a caller-supplied validator.
    #[error("{0}")]
    Custom(String),
}

impl ValidationError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ValidationError::InvalidHost(_) => ErrorKind::InvalidHost,
            ValidationError::InvalidIcannSuffix => ErrorKind::InvalidIcannSuffix,
            ValidationError::BlacklistedDomain => ErrorKind::BlacklistedDomain,
            ValidationError::EmptyUsername => ErrorKind::EmptyUsername,
            ValidationError::UsernameTooLong => ErrorKind::UsernameTooLong,
            ValidationError::UsernameEdgeDot => ErrorKind::UsernameEdgeDot,
            ValidationError::ConsecutiveDots => ErrorKind::ConsecutiveDots,
            ValidationError::InvalidUsernameChar(_) => ErrorKind::InvalidUsernameChar,
            ValidationError::Custom(_) => ErrorKind::Custom,
        }
    }

    pub fn is(&self, kind: ErrorKind) -> bool {
        match self {
            ValidationError::InvalidHost(cause) => {
                kind == ErrorKind::InvalidHost || kind == cause.kind()
            }
            other => other.kind() == kind,
        }
    }
}

/// Neither a mail-exchange nor an address record could be found.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum LookupError {
    #[error("failed finding MX and A records for the email's domain: invalid domain: {domain}")]
    DomainLookupFailed { domain: String },
}

impl LookupError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            LookupError::DomainLookupFailed { .. } => ErrorKind::DomainLookupFailed,
        }
    }

    /// The domain that failed to resolve.
    pub fn domain(&self) -> &str {
        match self {
            LookupError::DomainLookupFailed { domain } => domain,
        }
    }
}

/// Invalid value in the environment configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    InvalidValue { key: &'static str, value: String },
}
