use std::fmt;

/// A total string transform applied to a raw address.
///
/// Implemented for every `Fn(&str) -> String`.
pub trait Sanitizer {
    fn sanitize(&self, email: &str) -> String;
}

impl<F> Sanitizer for F
where
    F: Fn(&str) -> String,
{
    fn sanitize(&self, email: &str) -> String {
        self(email)
    }
}

/// Applies `sanitizers` in order, each one receiving the previous output.
///
/// # Arguments
/// * `email` - Raw address; it does not have to be well formed
/// * `sanitizers` - Transforms to apply, in order
///
/// # Returns
/// The transformed address. An empty `sanitizers` slice returns `email`
/// unchanged.
///
/// # Examples
/// ```
/// use mailsift::sanitize::{remove_after_plus, sanitize_email, to_lower, trim_space};
///
/// let clean = sanitize_email("  Jane+News@Example.COM ", &[&trim_space, &remove_after_plus, &to_lower]);
/// assert_eq!(clean, "jane@example.com");
/// ```
pub fn sanitize_email(email: &str, sanitizers: &[&dyn Sanitizer]) -> String {
    sanitizers
        .iter()
        .fold(email.to_string(), |email, sanitizer| sanitizer.sanitize(&email))
}

pub fn to_lower(email: &str) -> String {
    email.to_lowercase()
}

pub fn trim_space(email: &str) -> String {
    email.trim().to_string()
}

/// Drops every character above U+007F, keeping the others in order.
pub fn remove_non_ascii(email: &str) -> String {
    email.chars().filter(char::is_ascii).collect()
}

/// Removes the `+tag` suffix of the local part: `name+tag@gmail.com` becomes
/// `name@gmail.com`. Input that does not split on `@` into exactly two parts
/// is returned unchanged.
pub fn remove_after_plus(email: &str) -> String {
    let mut parts = email.split('@');
    let (Some(username), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return email.to_string();
    };

    let username = username.split_once('+').map_or(username, |(head, _)| head);
    format!("{username}@{domain}")
}

/// Reusable, ordered set of sanitizers.
#[derive(Default)]
pub struct SanitizerPipeline {
    sanitizers: Vec<Box<dyn Sanitizer + Send + Sync>>,
}

impl SanitizerPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a sanitizer; sanitizers run in insertion order.
    pub fn with(mut self, sanitizer: impl Sanitizer + Send + Sync + 'static) -> Self {
        self.sanitizers.push(Box::new(sanitizer));
        self
    }

    pub fn len(&self) -> usize {
        self.sanitizers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sanitizers.is_empty()
    }

    pub fn run(&self, email: &str) -> String {
        self.sanitizers
            .iter()
            .fold(email.to_string(), |email, sanitizer| sanitizer.sanitize(&email))
    }
}

impl fmt::Debug for SanitizerPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SanitizerPipeline")
            .field("sanitizers", &self.sanitizers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercase() {
        assert_eq!(
            sanitize_email("EXAMPLE@EXAMPLE.COM", &[&to_lower]),
            "example@example.com"
        );
    }

    #[test]
    fn test_trim_spaces() {
        assert_eq!(
            sanitize_email("   example@example.com \t\n", &[&trim_space]),
            "example@example.com"
        );
    }

    #[test]
    fn test_remove_after_plus() {
        assert_eq!(remove_after_plus("name+tag@domain.com"), "name@domain.com");
        assert_eq!(remove_after_plus("name+a+b@domain.com"), "name@domain.com");
        assert_eq!(remove_after_plus("name@do+main.com"), "name@do+main.com");
        assert_eq!(remove_after_plus("name@domain.com"), "name@domain.com");
    }

    #[test]
    fn test_remove_after_plus_needs_single_separator() {
        assert_eq!(remove_after_plus("name+tag"), "name+tag");
        assert_eq!(remove_after_plus("a+b@c@d.com"), "a+b@c@d.com");
        assert_eq!(remove_after_plus(""), "");
    }

    #[test]
    fn test_remove_non_ascii() {
        assert_eq!(
            sanitize_email("ëxamplë@example.com", &[&remove_non_ascii]),
            "xampl@example.com"
        );
        assert_eq!(remove_non_ascii("用户@例子.中国"), "@.");
    }

    #[test]
    fn test_no_sanitizers() {
        assert_eq!(sanitize_email(" As Is ", &[]), " As Is ");
    }

    #[test]
    fn test_multiple_sanitizers() {
        let sanitizers: [&dyn Sanitizer; 4] =
            [&trim_space, &remove_non_ascii, &remove_after_plus, &to_lower];
        assert_eq!(
            sanitize_email("   ëxamplë+spam@EXAmplë.COM   ", &sanitizers),
            "xampl@exampl.com"
        );
    }

    #[test]
    fn test_composition_matches_sequential_application() {
        let input = "  Mixed+Tag@Exämple.com ";
        let composed = sanitize_email(input, &[&trim_space, &to_lower, &remove_after_plus]);
        let sequential = remove_after_plus(&to_lower(&trim_space(input)));
        assert_eq!(composed, sequential);

        let first = sanitize_email(input, &[&trim_space, &to_lower]);
        assert_eq!(sanitize_email(&first, &[&remove_after_plus]), composed);
    }

    #[test]
    fn test_order_matters() {
        // 'İ' lowercases to 'i' plus a combining dot.
        let input = "İnfo@example.com";
        assert_eq!(
            sanitize_email(input, &[&to_lower, &remove_non_ascii]),
            "info@example.com"
        );
        assert_eq!(
            sanitize_email(input, &[&remove_non_ascii, &to_lower]),
            "nfo@example.com"
        );
    }

    #[test]
    fn test_closures_are_sanitizers() {
        let strip_dots = |email: &str| email.replace('.', "");
        assert_eq!(sanitize_email("a.b@c", &[&strip_dots]), "ab@c");
    }

    #[test]
    fn test_pipeline() {
        let pipeline = SanitizerPipeline::new()
            .with(trim_space)
            .with(remove_after_plus)
            .with(to_lower);
        assert_eq!(pipeline.len(), 3);
        assert!(!pipeline.is_empty());
        assert_eq!(pipeline.run(" Jane+X@Example.com "), "jane@example.com");
        assert_eq!(SanitizerPipeline::new().run(" x "), " x ");
    }
}
