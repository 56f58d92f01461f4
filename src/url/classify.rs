use crate::url::email::{is_valid_email, mailto_address};
use crate::url::{CrawlTarget, HostScope};
use ::url::Url;

/// A reference discovered on a page, after normalization and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Reference {
    /// Same site as the seed; a candidate for the frontier
    Internal(CrawlTarget),
    /// Any other site
    External(CrawlTarget),
    /// A `mailto:` link with a well-formed address
    Mailto(String),
    /// Anything that cannot be turned into a crawlable URL (keeps the raw href)
    Invalid(String),
}

/// The tag of a [`Reference`] without its payload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Internal,
    External,
    Mailto,
    Invalid,
}

impl Reference {
    pub fn kind(&self) -> ReferenceKind {
        match self {
            Self::Internal(_) => ReferenceKind::Internal,
            Self::External(_) => ReferenceKind::External,
            Self::Mailto(_) => ReferenceKind::Mailto,
            Self::Invalid(_) => ReferenceKind::Invalid,
        }
    }

    /// The resolved target, for internal and external references
    pub fn target(&self) -> Option<&CrawlTarget> {
        match self {
            Self::Internal(target) | Self::External(target) => Some(target),
            Self::Mailto(_) | Self::Invalid(_) => None,
        }
    }
}

/// Classifies a raw `href` found on the page at `base`
///
/// # Classification Steps
///
/// 1. `mailto:` links are `Mailto` when the address has a valid shape,
///    otherwise `Invalid`
/// 2. Everything else is resolved against `base`, with query and fragment
///    stripped; failures and host-less URLs are `Invalid`
/// 3. The resolved host is compared with the seed under `scope`:
///    same site over HTTP(S) is `Internal`, anything else `External`
///
/// # Examples
///
/// ```
/// use link_crawler::url::{classify, CrawlTarget, HostScope, Reference};
/// use url::Url;
///
/// let seed = CrawlTarget::parse_seed("https://example.com").unwrap();
/// let base = Url::parse("https://example.com/blog/post").unwrap();
///
/// let reference = classify("mailto:a@b.com", &base, &seed, HostScope::Exact);
/// assert_eq!(reference, Reference::Mailto("a@b.com".to_string()));
/// ```
pub fn classify(raw: &str, base: &Url, seed: &CrawlTarget, scope: HostScope) -> Reference {
    if let Some(address) = mailto_address(raw) {
        return if is_valid_email(address) {
            Reference::Mailto(address.to_string())
        } else {
            Reference::Invalid(raw.to_string())
        };
    }

    match CrawlTarget::resolve(raw, base) {
        Ok(target) if scope.contains(seed, &target) => Reference::Internal(target),
        Ok(target) => Reference::External(target),
        Err(_) => Reference::Invalid(raw.to_string()),
    }
}

/// Resolves an asset reference such as an `<img src>`
///
/// Assets are collected regardless of host, so no classification happens
/// here; only resolution and query/fragment stripping.
pub fn normalize_asset(raw: &str, base: &Url) -> Option<CrawlTarget> {
    CrawlTarget::resolve(raw, base).ok()
}
