use lazy_static::lazy_static;
use regex::Regex;

const MAILTO_PREFIX: &str = "mailto:";

lazy_static! {
    // local@domain.tld, whole string
    static ref EMAIL_REGEX: Regex =
        Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex");
}

/// Returns the part after `mailto:` if `raw` is a mailto reference
///
/// The prefix match is case-sensitive.
pub fn mailto_address(raw: &str) -> Option<&str> {
    raw.strip_prefix(MAILTO_PREFIX)
}

/// Checks an address against the simple `local@domain.tld` shape
///
/// # Examples
///
/// ```
/// use link_crawler::url::is_valid_email;
///
/// assert!(is_valid_email("a@b.com"));
/// assert!(!is_valid_email("not-an-email"));
/// ```
pub fn is_valid_email(address: &str) -> bool {
    EMAIL_REGEX.is_match(address)
}
