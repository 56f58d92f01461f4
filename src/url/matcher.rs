use crate::url::CrawlTarget;

/// Which hosts count as "internal" relative to the seed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HostScope {
    /// Only the seed's exact host (and port)
    #[default]
    Exact,
    /// The seed's host and any of its subdomains, on the seed's port
    Subdomains,
}

impl HostScope {
    pub fn from_include_subdomains(include_subdomains: bool) -> Self {
        if include_subdomains {
            Self::Subdomains
        } else {
            Self::Exact
        }
    }

    /// Returns true if `candidate` belongs to the same site as `seed`
    ///
    /// Explicit ports must match, so `127.0.0.1:8080` and `127.0.0.1:9090` are
    /// different sites, while `http://example.com` and `https://example.com`
    /// are the same one. Only HTTP(S) candidates can be internal.
    pub fn contains(&self, seed: &CrawlTarget, candidate: &CrawlTarget) -> bool {
        candidate.is_http()
            && seed.port() == candidate.port()
            && matches_host(*self, seed.host(), candidate.host())
    }
}

/// Checks a candidate host against the seed host under a scope
///
/// This is a label-aware comparison, never a substring test:
/// `notexample.com` does not match `example.com` in either scope.
///
/// # Examples
///
/// ```
/// use link_crawler::url::{matches_host, HostScope};
///
/// assert!(matches_host(HostScope::Exact, "example.com", "example.com"));
/// assert!(!matches_host(HostScope::Exact, "example.com", "blog.example.com"));
///
/// assert!(matches_host(HostScope::Subdomains, "example.com", "blog.example.com"));
/// assert!(!matches_host(HostScope::Subdomains, "example.com", "notexample.com"));
/// ```
pub fn matches_host(scope: HostScope, base: &str, candidate: &str) -> bool {
    match scope {
        HostScope::Exact => candidate == base,
        HostScope::Subdomains => {
            candidate == base || candidate.ends_with(&format!(".{}", base))
        }
    }
}
