use crate::{UrlError, UrlResult};
use ::url::Url;
use std::fmt;

/// A normalized, absolute URL that the crawler can visit
///
/// A `CrawlTarget` is always produced by normalization, never taken verbatim
/// from an `href`. The query string and fragment are removed, so two links that
/// differ only in `?...` or `#...` are the same target. Identity (equality and
/// hashing) is the canonical serialized form.
///
/// # Examples
///
/// ```
/// use link_crawler::url::CrawlTarget;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/blog/post").unwrap();
/// let target = CrawlTarget::resolve("../about?x=1#top", &base).unwrap();
/// assert_eq!(target.as_str(), "https://example.com/about");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CrawlTarget {
    url: Url,
}

impl CrawlTarget {
    /// Builds a target from an already absolute URL
    ///
    /// # Normalization Steps
    ///
    /// 1. Reject URLs without a host (`javascript:`, `data:`, `mailto:` ...)
    /// 2. Remove the query string
    /// 3. Remove the fragment
    pub fn from_url(mut url: Url) -> UrlResult<Self> {
        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }

        url.set_query(None);
        url.set_fragment(None);

        Ok(Self { url })
    }

    /// Resolves a raw reference against the URL of the page it was found on
    ///
    /// Relative references are joined using standard URL resolution rules, so
    /// `../about` on `https://example.com/blog/post` becomes
    /// `https://example.com/about`.
    pub fn resolve(raw: &str, base: &Url) -> UrlResult<Self> {
        let url = base
            .join(raw.trim())
            .map_err(|e| UrlError::Parse(e.to_string()))?;
        Self::from_url(url)
    }

    /// Parses the seed URL given on the command line
    ///
    /// The seed must be an absolute HTTP(S) URL with a host.
    pub fn parse_seed(raw: &str) -> UrlResult<Self> {
        let url = Url::parse(raw.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }

        Self::from_url(url)
    }

    /// The canonical string form
    pub fn as_str(&self) -> &str {
        self.url.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.url
    }

    pub fn scheme(&self) -> &str {
        self.url.scheme()
    }

    pub fn is_http(&self) -> bool {
        matches!(self.url.scheme(), "http" | "https")
    }

    /// The host, lowercase for HTTP(S) URLs
    pub fn host(&self) -> &str {
        // from_url guarantees a host
        self.url.host_str().unwrap_or_default()
    }

    /// The explicit port, `None` when the URL uses its scheme's default
    pub fn port(&self) -> Option<u16> {
        self.url.port()
    }

    pub fn path(&self) -> &str {
        self.url.path()
    }
}

impl fmt::Display for CrawlTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.url.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/blog/post").unwrap()
    }

    #[test]
    fn test_resolve_parent_relative() {
        let target = CrawlTarget::resolve("../about", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://example.com/about");
    }

    #[test]
    fn test_resolve_sibling_relative() {
        let target = CrawlTarget::resolve("other", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://example.com/blog/other");
    }

    #[test]
    fn test_resolve_absolute_path() {
        let target = CrawlTarget::resolve("/contact", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://example.com/contact");
    }

    #[test]
    fn test_strip_query_and_fragment() {
        let target =
            CrawlTarget::resolve("https://example.com/page?x=1#section", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://example.com/page");
    }

    #[test]
    fn test_query_variants_are_equal() {
        let a = CrawlTarget::resolve("/page?x=1", &base_url()).unwrap();
        let b = CrawlTarget::resolve("/page?x=2", &base_url()).unwrap();
        let c = CrawlTarget::resolve("/page#top", &base_url()).unwrap();
        assert_eq!(a, b);
        assert_eq!(a, c);
    }

    #[test]
    fn test_fragment_only_resolves_to_page() {
        let target = CrawlTarget::resolve("#section", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://example.com/blog/post");
    }

    #[test]
    fn test_javascript_has_no_host() {
        let result = CrawlTarget::resolve("javascript:void(0)", &base_url());
        assert!(matches!(result, Err(UrlError::MissingHost)));
    }

    #[test]
    fn test_data_uri_has_no_host() {
        let result = CrawlTarget::resolve("data:text/html,<h1>x</h1>", &base_url());
        assert!(matches!(result, Err(UrlError::MissingHost)));
    }

    #[test]
    fn test_host_is_lowercased() {
        let target = CrawlTarget::resolve("https://EXAMPLE.COM/Page", &base_url()).unwrap();
        assert_eq!(target.host(), "example.com");
        assert_eq!(target.path(), "/Page");
    }

    #[test]
    fn test_root_serializes_with_slash() {
        let target = CrawlTarget::resolve("https://external.com", &base_url()).unwrap();
        assert_eq!(target.as_str(), "https://external.com/");
    }

    #[test]
    fn test_port_is_explicit_only() {
        let target = CrawlTarget::parse_seed("https://example.com").unwrap();
        assert_eq!(target.port(), None);

        let target = CrawlTarget::parse_seed("https://example.com:443/").unwrap();
        assert_eq!(target.port(), None);

        let target = CrawlTarget::parse_seed("http://127.0.0.1:8080/").unwrap();
        assert_eq!(target.port(), Some(8080));
    }

    #[test]
    fn test_parse_seed_rejects_relative() {
        let result = CrawlTarget::parse_seed("example.com/page");
        assert!(matches!(result, Err(UrlError::Parse(_))));
    }

    #[test]
    fn test_parse_seed_rejects_other_schemes() {
        let result = CrawlTarget::parse_seed("ftp://example.com/file");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));

        let result = CrawlTarget::parse_seed("mailto:someone@example.com");
        assert!(matches!(result, Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_display_matches_as_str() {
        let target = CrawlTarget::parse_seed("https://example.com/a?b=c").unwrap();
        assert_eq!(target.to_string(), "https://example.com/a");
    }
}
