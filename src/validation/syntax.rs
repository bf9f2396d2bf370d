use crate::error::EmailError;
use std::net::{IpAddr, Ipv6Addr};
use tracing::debug;

/// Characters allowed in an atom besides letters and digits (RFC 5322 `atext`).
const ATEXT_SPECIALS: &str = "!#$%&'*+-/=?^_`{|}~";

/// A mailbox split into its two halves.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedAddress {
    pub username: String,
    pub domain: String,
}

/// Parses a single mailbox and splits it into username and domain.
///
/// Accepts a bare `addr-spec` (`user@example.com`) or a display name followed
/// by an angle address (`Jane Doe <jane@example.com>`). Groups, address lists
/// and anything else that is not exactly one mailbox are rejected with
/// [`EmailError::InvalidFormat`].
///
/// Comments (`(...)`, nestable) and whitespace around the address and inside
/// the angle brackets are skipped. A quoted local part is returned unquoted.
/// When the unquoted address does not split on `@` into exactly two non-empty
/// halves the input is rejected.
///
/// # Arguments
/// * `email` - A single mailbox, optionally with a display name
///
/// # Returns
/// The username and domain exactly as written (case preserved), or
/// [`EmailError::InvalidFormat`].
///
/// # Examples
/// ```
/// use mailsift::validation::syntax::parse_email;
///
/// let parsed = parse_email("Jane Doe <jane.doe@example.com>").unwrap();
/// assert_eq!(parsed.username, "jane.doe");
/// assert_eq!(parsed.domain, "example.com");
///
/// let parsed = parse_email("jane@example.com (Jane)").unwrap();
/// assert_eq!(parsed.username, "jane");
///
/// assert!(parse_email("user name@example.com").is_err());
/// assert!(parse_email("a@example.com, b@example.com").is_err());
/// ```
pub fn parse_email(email: &str) -> Result<ParsedAddress, EmailError> {
    let parsed = strip_comments(email)
        .and_then(|mailbox| parse_mailbox(mailbox.trim()))
        .ok_or(EmailError::InvalidFormat);
    if parsed.is_err() {
        debug!(email, "rejecting malformed address");
    }
    parsed
}

fn parse_mailbox(mailbox: &str) -> Option<ParsedAddress> {
    if mailbox.is_empty() {
        return None;
    }

    let addr_spec = match find_unquoted(mailbox, '<') {
        Some(open) => {
            // name-addr: [display-name] "<" addr-spec ">"
            let inner = mailbox[open + 1..].strip_suffix('>')?.trim();
            if !is_valid_display_name(mailbox[..open].trim_end()) {
                return None;
            }
            inner
        }
        None => mailbox,
    };

    split_addr_spec(addr_spec)
}

/// Splits `local@domain` after checking both halves, then re-splits the
/// unquoted address on `@`.
fn split_addr_spec(addr_spec: &str) -> Option<ParsedAddress> {
    let at = find_unquoted(addr_spec, '@')?;
    let (local_part, domain_part) = addr_spec.split_at(at);
    let domain_part = &domain_part[1..];

    if !is_valid_local_part(local_part) || !is_valid_domain_part(domain_part) {
        return None;
    }

    let address = format!("{}@{}", unquote(local_part), domain_part);
    let mut parts = address.split('@');
    match (parts.next(), parts.next(), parts.next()) {
        (Some(username), Some(domain), None) if !username.is_empty() && !domain.is_empty() => {
            Some(ParsedAddress {
                username: username.to_string(),
                domain: domain.to_string(),
            })
        }
        _ => None,
    }
}

/// Replaces every comment outside quoted strings and domain literals with a
/// single space. Returns `None` when a comment or quoted string is left open.
fn strip_comments(s: &str) -> Option<String> {
    let mut out = String::with_capacity(s.len());
    let mut in_quotes = false;
    let mut in_literal = false;
    let mut depth = 0usize;
    let mut escape = false;

    for c in s.chars() {
        if depth > 0 {
            match c {
                _ if escape => escape = false,
                '\\' => escape = true,
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        out.push(' ');
                    }
                }
                _ => {}
            }
            continue;
        }

        match c {
            _ if escape => escape = false,
            '\\' if in_quotes => escape = true,
            '"' if !in_literal => in_quotes = !in_quotes,
            '[' if !in_quotes => in_literal = true,
            ']' if !in_quotes => in_literal = false,
            '(' if !in_quotes && !in_literal => {
                depth = 1;
                continue;
            }
            ')' if !in_quotes && !in_literal => return None,
            _ => {}
        }
        out.push(c);
    }

    (depth == 0 && !in_quotes).then_some(out)
}

/// Byte index of the first `target` that is not inside a quoted string.
fn find_unquoted(s: &str, target: char) -> Option<usize> {
    let mut in_quotes = false;
    let mut escape = false;

    for (i, c) in s.char_indices() {
        match c {
            _ if escape => escape = false,
            '\\' if in_quotes => escape = true,
            '"' => in_quotes = !in_quotes,
            c if c == target && !in_quotes => return Some(i),
            _ => {}
        }
    }
    None
}

/// Validates the local-part component of an email address
///
/// Supports both dot-atom (RFC 5322) and quoted-string (RFC 5322) formats
fn is_valid_local_part(local: &str) -> bool {
    if local.len() >= 2 && local.starts_with('"') && local.ends_with('"') {
        is_valid_quoted_string(local)
    } else {
        is_valid_dot_atom(local)
    }
}

/// Validates the domain part component of an email address
///
/// Handles both domain names and domain literals (IP addresses)
fn is_valid_domain_part(domain: &str) -> bool {
    if let Some(domain_literal) = domain.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
        is_valid_domain_literal(domain_literal)
    } else {
        is_valid_domain_name(domain)
    }
}

/// Validates quoted-string format from RFC 5322 section 3.4.1
fn is_valid_quoted_string(quoted: &str) -> bool {
    let content = &quoted[1..quoted.len() - 1];
    let mut escape = false;

    for c in content.chars() {
        if escape {
            if !matches!(c, '\\' | '"') {
                return false;
            }
            escape = false;
        } else if c == '\\' {
            escape = true;
        } else if c == '"' {
            return false; // Unescaped quote
        }
    }
    !escape
}

/// Strips the quotes and escapes of a quoted local part. Dot-atoms are
/// returned as is.
fn unquote(local: &str) -> String {
    let Some(content) = local.strip_prefix('"').and_then(|s| s.strip_suffix('"')) else {
        return local.to_string();
    };

    let mut unquoted = String::with_capacity(content.len());
    let mut escape = false;
    for c in content.chars() {
        if c == '\\' && !escape {
            escape = true;
            continue;
        }
        escape = false;
        unquoted.push(c);
    }
    unquoted
}

/// Validates dot-atom format from RFC 5322 section 3.4.1
fn is_valid_dot_atom(s: &str) -> bool {
    !s.is_empty()
        && s
            .split('.')
            .all(|part| !part.is_empty() && part.chars().all(is_atext))
}

fn is_atext(c: char) -> bool {
    c.is_alphanumeric() || ATEXT_SPECIALS.contains(c)
}

/// Validates domain literals (IP addresses) from RFC 5322 section 3.4.1
fn is_valid_domain_literal(literal: &str) -> bool {
    literal.parse::<IpAddr>().is_ok()
        || literal
            .strip_prefix("IPv6:")
            .and_then(|ip| ip.parse::<Ipv6Addr>().ok())
            .is_some()
}

/// Domain names are dot-atoms (RFC 5322 section 3.4.1). Hostname rules such
/// as label length or hyphen placement are left to the DNS check.
fn is_valid_domain_name(domain: &str) -> bool {
    is_valid_dot_atom(domain)
}

/// A display name is a possibly empty phrase: atoms (dots allowed, as in
/// `John Q. Public`) and quoted strings separated by whitespace.
fn is_valid_display_name(name: &str) -> bool {
    let mut chars = name.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {
                let mut escape = false;
                let mut closed = false;
                for c in chars.by_ref() {
                    match c {
                        _ if escape => escape = false,
                        '\\' => escape = true,
                        '"' => {
                            closed = true;
                            break;
                        }
                        _ => {}
                    }
                }
                if !closed {
                    return false;
                }
            }
            c if c.is_whitespace() || c == '.' || is_atext(c) => {}
            _ => return false,
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn split(email: &str) -> ParsedAddress {
        parse_email(email).unwrap_or_else(|_| panic!("{email} should parse"))
    }

    fn assert_split(email: &str, username: &str, domain: &str) {
        let parsed = split(email);
        assert_eq!(parsed.username, username, "{email}");
        assert_eq!(parsed.domain, domain, "{email}");
    }

    #[test]
    fn valid_standard_emails() {
        assert_split("simple@example.com", "simple", "example.com");
        assert_split("very.common@example.com", "very.common", "example.com");
        assert_split("x@example.com", "x", "example.com");
        assert_split("user@exampl", "user", "exampl");
    }

    #[test]
    fn valid_special_chars() {
        assert!(parse_email("!#$%&'*+-/=?^_`{}|~@example.com").is_ok());
        assert_split("\"with space\"@example.com", "with space", "example.com");
        assert_split("\"escaped\\\"quote\"@example.com", "escaped\"quote", "example.com");
    }

    #[test]
    fn valid_domain_literals() {
        assert_eq!(split("user@[192.168.0.1]").domain, "[192.168.0.1]");
        assert!(parse_email("user@[IPv6:2001:db8::1]").is_ok());
    }

    #[test]
    fn valid_international() {
        assert_split("Pelé@exämple.中国", "Pelé", "exämple.中国");
        assert!(parse_email("用户@例子.中国").is_ok());
    }

    #[test]
    fn valid_long_local_part() {
        // Length rules belong to the username validator.
        let local = "a".repeat(65);
        assert_eq!(split(&format!("{local}@example.com")).username, local);
    }

    #[test]
    fn valid_display_names() {
        assert_split("Jane Doe <jane@example.com>", "jane", "example.com");
        assert_split("\"Doe, Jane\" <jane@example.com>", "jane", "example.com");
        assert_split("\"jane@home\" <jane@example.com>", "jane", "example.com");
        assert_eq!(split("John Q. Public <jqp@example.com>").username, "jqp");
        assert_eq!(split("<bare@example.com>").username, "bare");
        assert_eq!(split("  padded@example.com  ").username, "padded");
    }

    #[test]
    fn valid_atext_domains() {
        assert_split("user@mail_host.example.com", "user", "mail_host.example.com");
        assert_split("user@ex_ample.com", "user", "ex_ample.com");
        assert!(parse_email("user@-hyphenstart.com").is_ok());
        assert!(parse_email("user@hyphenend-.com").is_ok());
        assert!(parse_email(&format!("user@{}.com", "a".repeat(64))).is_ok());
    }

    #[test]
    fn valid_comments_and_bracket_whitespace() {
        assert_split("Jane < jane@example.com >", "jane", "example.com");
        assert_split("jane@example.com (Jane)", "jane", "example.com");
        assert_split("Jane <jane@example.com> (x)", "jane", "example.com");
        assert_split("(lead) jane@example.com", "jane", "example.com");
        assert_split("jane@example.com (outer (inner) \\) still)", "jane", "example.com");
        assert_split("\"(not a comment)\"@example.com", "(not a comment)", "example.com");
    }

    #[test]
    fn invalid_comments() {
        assert!(parse_email("jane@example.com (Jane").is_err());
        assert!(parse_email("jane@example.com (a (b)").is_err());
        assert!(parse_email("jane@example.com )").is_err());
        // A comment inside the address still separates its tokens.
        assert!(parse_email("user(c)name@example.com").is_err());
        assert!(parse_email("(only a comment)").is_err());
    }

    #[test]
    fn invalid_missing_parts() {
        assert!(parse_email("missing.example.com").is_err());
        assert!(parse_email("missing@").is_err());
        assert!(parse_email("@missing.com").is_err());
        assert!(parse_email("@").is_err());
        assert!(parse_email("").is_err());
        assert!(parse_email("   ").is_err());
    }

    #[test]
    fn invalid_local_parts() {
        assert!(parse_email("no..dots@example.com").is_err());
        assert!(parse_email(".leading@example.com").is_err());
        assert!(parse_email("trailing.@example.com").is_err());
        assert!(parse_email("un\"quoted@example.com").is_err());
        assert!(parse_email("\"unclosed@example.com").is_err());
        assert!(parse_email("\"@example.com").is_err());
        assert!(parse_email("user name@example.com").is_err());
        assert!(parse_email("\"\"@example.com").is_err());
    }

    #[test]
    fn invalid_quoted_separator() {
        // Valid syntax, but the unquoted address has two separators.
        assert!(parse_email("\"quoted@local\"@example.com").is_err());
    }

    #[test]
    fn invalid_domains() {
        assert!(parse_email("user@.leadingdot.com").is_err());
        assert!(parse_email("user@double..dot.com").is_err());
        assert!(parse_email("user@example.com.").is_err());
        assert!(parse_email("user@@example.com").is_err());
        assert!(parse_email("user@exa mple.com").is_err());
        assert!(parse_email("user@exa\"mple.com").is_err());
        assert!(parse_email("user@exa,mple.com").is_err());
    }

    #[test]
    fn invalid_domain_literals() {
        assert!(parse_email("user@[invalid.ip]").is_err());
        assert!(parse_email("user@[192.168.0.256]").is_err());
        assert!(parse_email("user@[missing.bracket").is_err());
    }

    #[test]
    fn invalid_multiple_mailboxes() {
        assert!(parse_email("a@example.com, b@example.com").is_err());
        assert!(parse_email("a@example.com b@example.com").is_err());
        assert!(parse_email("Team: a@example.com, b@example.com;").is_err());
        assert!(parse_email("Team: <a@example.com>;").is_err());
        assert!(parse_email("Team:;").is_err());
    }

    #[test]
    fn invalid_display_wrappers() {
        assert!(parse_email("a@b.com <c@example.com>").is_err());
        assert!(parse_email("Jane <jane@example.com").is_err());
        assert!(parse_email("Jane jane@example.com>").is_err());
        assert!(parse_email("Jane <jane@example.com> trailing").is_err());
        assert!(parse_email("Jane <<jane@example.com>>").is_err());
        assert!(parse_email("\"Jane <jane@example.com>").is_err());
    }

    #[test]
    fn case_is_preserved() {
        assert_split("User@Example.COM", "User", "Example.COM");
    }
}
