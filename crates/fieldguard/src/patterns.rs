//! Named pattern registry
//!
//! A fixed set of textual formats a field can be checked against through
//! its pattern attribute. The set is closed: looking up any other name is a
//! configuration error.

use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::ValidationError;

/// A format known to the registry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    Email,
    Ip,
    Phone,
    Url,
}

impl Pattern {
    pub const ALL: [Pattern; 4] = [Pattern::Email, Pattern::Ip, Pattern::Phone, Pattern::Url];

    /// Looks up a pattern by its exact name
    ///
    /// # Examples
    /// ```
    /// use fieldguard::Pattern;
    /// assert_eq!(Pattern::lookup("phone").unwrap(), Pattern::Phone);
    /// assert!(Pattern::lookup("zip").is_err());
    /// ```
    pub fn lookup(name: &str) -> Result<Self, ValidationError> {
        match name {
            "email" => Ok(Pattern::Email),
            "ip" => Ok(Pattern::Ip),
            "phone" => Ok(Pattern::Phone),
            "url" => Ok(Pattern::Url),
            other => Err(ValidationError::UnknownPattern(other.to_string())),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Email => "email",
            Pattern::Ip => "ip",
            Pattern::Phone => "phone",
            Pattern::Url => "url",
        }
    }

    pub fn matches(&self, value: &str) -> bool {
        match self {
            Pattern::Email => is_email(value),
            Pattern::Ip => IP.is_match(value),
            Pattern::Phone => PHONE.is_match(value),
            Pattern::Url => is_url(value),
        }
    }
}

impl FromStr for Pattern {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Pattern::lookup(s)
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// ip / phone
// ---------------------------------------------------------------------------

static IP: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[0-9]{1,2})\.){3}(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[0-9]{1,2})$",
    )
    .expect("ip pattern compiles")
});

static PHONE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:\([0-9]{3}\)\s*|[0-9]{3}-)[0-9]{3}-[0-9]{4}$").expect("phone pattern compiles")
});

// ---------------------------------------------------------------------------
// email
// ---------------------------------------------------------------------------

const MAX_ADDRESS_UNITS: usize = 254;
const MAX_LOCAL_UNITS: usize = 64;
const MAX_LABEL_RUN: usize = 63;

static EMAIL_LOCAL: Lazy<Regex> = Lazy::new(|| {
    let atom = r"[\x21\x23-\x27\x2A\x2B\x2D\x2F-\x39\x3D\x3F\x5E-\x7E]+";
    let quoted = r#"\x22(?:[\x01-\x08\x0B\x0C\x0E-\x1F\x21\x23-\x5B\x5D-\x7F]|\x5C[\x00-\x7F])*\x22"#;
    let word = format!("(?:{atom}|{quoted})");
    Regex::new(&format!(r"(?i)^{word}(?:\.{word})*$")).expect("email local part pattern compiles")
});

static EMAIL_DOMAIN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(?:(?:xn--)?[a-z0-9]+(?:-[a-z0-9]+)*\.){1,126}(?:[a-z][a-z0-9]*|xn--[a-z0-9]+)(?:-[a-z0-9]+)*$",
    )
    .expect("email domain pattern compiles")
});

static IPV4_OCTETS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])(?:\.(?:25[0-5]|2[0-4][0-9]|1[0-9]{2}|[1-9]?[0-9])){3}$")
        .expect("ipv4 pattern compiles")
});

fn is_email(value: &str) -> bool {
    if address_units(value) > MAX_ADDRESS_UNITS {
        return false;
    }
    // the domain never contains '@', the local part may (quoted)
    let Some((local, domain)) = value.rsplit_once('@') else {
        return false;
    };
    if address_units(local) > MAX_LOCAL_UNITS || !EMAIL_LOCAL.is_match(local) {
        return false;
    }
    match domain.strip_prefix('[').and_then(|d| d.strip_suffix(']')) {
        Some(literal) => is_address_literal(literal),
        None => {
            domain.split('.').all(|label| label.len() <= MAX_LABEL_RUN) && EMAIL_DOMAIN.is_match(domain)
        }
    }
}

/// Length of an address where an escape pair counts once and quotes are free
fn address_units(s: &str) -> usize {
    let mut units = 0;
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        match c {
            '"' => {}
            '\\' => {
                chars.next();
                units += 1;
            }
            _ => units += 1,
        }
    }
    units
}

/// Contents of a bracketed domain literal: IPv4, or `IPv6:` plus an address
fn is_address_literal(literal: &str) -> bool {
    let ipv6 = literal
        .get(..5)
        .filter(|prefix| prefix.eq_ignore_ascii_case("ipv6:"))
        .map(|_| &literal[5..]);

    match ipv6 {
        None => IPV4_OCTETS.is_match(literal),
        Some(address) => match address.rsplit_once(':') {
            Some((head, tail)) if tail.contains('.') => {
                IPV4_OCTETS.is_match(tail) && is_ipv6_prefix(&address[..head.len() + 1])
            }
            _ => is_ipv6(address),
        },
    }
}

fn hex_groups(part: &str) -> Option<usize> {
    if part.is_empty() {
        return Some(0);
    }
    let mut count = 0;
    for group in part.split(':') {
        if group.is_empty() || group.len() > 4 || !group.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        count += 1;
    }
    Some(count)
}

/// Eight groups, or a `::` form with at most six explicit groups
fn is_ipv6(address: &str) -> bool {
    match address.split_once("::") {
        Some((left, right)) => {
            !right.contains("::")
                && matches!((hex_groups(left), hex_groups(right)), (Some(l), Some(r)) if l + r <= 6)
        }
        None => hex_groups(address) == Some(8),
    }
}

/// Hex part ahead of an IPv4 tail, trailing ':' included: six groups, or a
/// `::` form with at most four explicit groups
fn is_ipv6_prefix(prefix: &str) -> bool {
    match prefix.split_once("::") {
        Some((left, right)) => {
            if right.contains("::") {
                return false;
            }
            let right = if right.is_empty() {
                Some(0)
            } else {
                right
                    .strip_suffix(':')
                    .filter(|r| !r.is_empty())
                    .and_then(hex_groups)
            };
            matches!((hex_groups(left), right), (Some(l), Some(r)) if l + r <= 4)
        }
        None => prefix.strip_suffix(':').and_then(hex_groups) == Some(6),
    }
}

// ---------------------------------------------------------------------------
// url
// ---------------------------------------------------------------------------

static URL: Lazy<Regex> = Lazy::new(|| {
    let public_ipv4 = r"(?:[1-9][0-9]?|1[0-9][0-9]|2[01][0-9]|22[0-3])(?:\.(?:1?[0-9]{1,2}|2[0-4][0-9]|25[0-5])){2}\.(?:[1-9][0-9]?|1[0-9][0-9]|2[0-4][0-9]|25[0-4])";
    let label = r"(?:[a-z\x{00a1}-\x{10ffff}0-9]-*)*[a-z\x{00a1}-\x{10ffff}0-9]+";
    let domain = format!(r"{label}(?:\.{label})*\.[a-z\x{{00a1}}-\x{{10ffff}}]{{2,}}");
    Regex::new(&format!(
        r"(?i)^(?:https?|ftp)://(?:\S+(?::\S*)?@)?(?P<host>{public_ipv4}|{domain})(?::[0-9]{{2,5}})?(?:/\S*)?$"
    ))
    .expect("url pattern compiles")
});

static PRIVATE_HOST: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?:(?:10|127)(?:\.[0-9]{1,3}){3}|(?:169\.254|192\.168)(?:\.[0-9]{1,3}){2}|172\.(?:1[6-9]|2[0-9]|3[01])(?:\.[0-9]{1,3}){2})",
    )
    .expect("private host pattern compiles")
});

fn is_url(value: &str) -> bool {
    URL.captures(value)
        .and_then(|caps| caps.name("host"))
        .is_some_and(|host| !PRIVATE_HOST.is_match(&value[host.start()..]))
}
