use crate::UrlError;
use url::Url;

/// Normalizes a URL string into the crawler's canonical form
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or relative
/// 2. Require an http or https scheme
/// 3. Require a host
/// 4. Remove the fragment (everything after #)
/// 5. Remove the trailing slash from the path (except for the root `/`)
///
/// The host is lowercased by the `url` crate during parsing. Query strings
/// are preserved as-is: `?a=1` and `?b=2` are different pages.
///
/// # Examples
///
/// ```
/// use vibecheck::url::normalize_url;
///
/// let url = normalize_url("https://example.com/about/#team").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/about");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize(url)
}

/// Resolves a possibly-relative href against a base URL and normalizes it
///
/// This is what the link extractor uses for every candidate `href`: the
/// browser usually hands back absolute URLs, but relative references still
/// appear in raw attributes and in mocked backends.
pub fn resolve_against(base: &Url, href: &str) -> Result<Url, UrlError> {
    let url = base
        .join(href)
        .map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize(url)
}

fn normalize(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    Ok(url)
}
