//! URL handling for the crawler
//!
//! This module provides URL normalization, relative-reference resolution and
//! the same-origin test that defines crawl scope. The normalized string form
//! of a URL is the crawler's notion of page identity: two targets are the
//! same page iff their normalized strings are equal.

mod normalize;

pub use normalize::{normalize_url, resolve_against};

use url::Url;

/// Returns true if two URLs share an origin (scheme, host and port)
///
/// Crawl scope is same-origin only: discovered links pointing at a different
/// origin are never enqueued. Cross-origin links may still be probed by
/// detectors; that is a detector concern, separate from traversal scope.
pub fn same_origin(a: &Url, b: &Url) -> bool {
    a.origin() == b.origin()
}
