use crate::error::{EmailError, ValidationError};
use crate::validation::syntax::parse_email;
use std::fmt;
use tracing::debug;

/// A single check run against a parsed address.
///
/// Implemented for every `Fn(&str, &str) -> Result<(), ValidationError>`, so
/// plain functions such as
/// [`validate_username_format`](crate::validation::username::validate_username_format)
/// can be used directly.
pub trait Validator {
    fn validate(&self, username: &str, domain: &str) -> Result<(), ValidationError>;
}

impl<F> Validator for F
where
    F: Fn(&str, &str) -> Result<(), ValidationError>,
{
    fn validate(&self, username: &str, domain: &str) -> Result<(), ValidationError> {
        self(username, domain)
    }
}

/// Parses `email` and runs `validators` in order against it.
///
/// A malformed address fails with [`EmailError::InvalidFormat`] before any
/// validator runs. Otherwise the first validator failure stops the pipeline
/// and is returned wrapped in [`EmailError::InvalidEmail`].
///
/// # Arguments
/// * `email` - Raw address, parsed with [`parse_email`](crate::parse_email)
/// * `validators` - Checks to run, in order, against the username and domain
///
/// # Returns
/// `Ok(())` when every validator passes, otherwise the parse error or the
/// first validator failure.
///
/// # Examples
/// ```
/// use mailsift::{ErrorKind, validate_email};
/// use mailsift::validation::{disposable::is_address_blacklisted, username::validate_username_format};
///
/// assert!(validate_email("user@example.com", &[&validate_username_format]).is_ok());
///
/// let err = validate_email("user@blacklisted.com", &[&is_address_blacklisted]).unwrap_err();
/// assert!(err.is(ErrorKind::BlacklistedDomain));
/// ```
pub fn validate_email(email: &str, validators: &[&dyn Validator]) -> Result<(), EmailError> {
    run(email, validators.iter().copied())
}

fn run<'v>(
    email: &str,
    validators: impl Iterator<Item = &'v dyn Validator>,
) -> Result<(), EmailError> {
    let parsed = parse_email(email)?;

    for (index, validator) in validators.enumerate() {
        if let Err(reason) = validator.validate(&parsed.username, &parsed.domain) {
            debug!(email, index, reason = %reason, "validator rejected address");
            return Err(EmailError::InvalidEmail(reason));
        }
    }
    Ok(())
}

/// Reusable, ordered set of validators.
///
/// ```
/// use mailsift::{DomainRegistry, ValidatorPipeline};
/// use mailsift::validation::{suffix::validate_icann_suffix, username::validate_username_format};
///
/// let registry = DomainRegistry::with_domains(["spam.example"]);
/// let pipeline = ValidatorPipeline::new()
///     .with(validate_username_format)
///     .with(validate_icann_suffix)
///     .with(registry.validator());
///
/// assert!(pipeline.run("jane@example.com").is_ok());
/// assert!(pipeline.run("jane@spam.example").is_err());
/// ```
#[derive(Default)]
pub struct ValidatorPipeline<'a> {
    validators: Vec<Box<dyn Validator + Send + Sync + 'a>>,
}

impl<'a> ValidatorPipeline<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a validator; validators run in insertion order.
    pub fn with(mut self, validator: impl Validator + Send + Sync + 'a) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    /// See [`validate_email`].
    pub fn run(&self, email: &str) -> Result<(), EmailError> {
        run(
            email,
            self.validators.iter().map(|v| v.as_ref() as &dyn Validator),
        )
    }
}

impl fmt::Debug for ValidatorPipeline<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatorPipeline")
            .field("validators", &self.validators.len())
            .finish()
    }
}
