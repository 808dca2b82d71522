//! Relative URL construction for resource endpoints.
//!
//! URLs produced here are relative to whatever host the transport talks to,
//! e.g. `/people/1?expand=true`. Only single leading/trailing separators are
//! trimmed; anything else in the inputs is passed through untouched.

/// Joins a base endpoint, an optional sub-path and an optional query string.
///
/// The base loses one trailing `/` (a lone `/` base counts as empty), the
/// path loses one leading and one trailing `/`, and the query loses one
/// leading `?`. An empty result becomes `/`.
///
/// # Examples
///
/// ```
/// use apiservice::uri::build_uri;
///
/// assert_eq!(build_uri("/", Some("test/"), None), "/test");
/// assert_eq!(build_uri("/t1", Some("/t2/"), Some("q1=1&q2=2")), "/t1/t2?q1=1&q2=2");
/// assert_eq!(build_uri("/", None, None), "/");
/// ```
pub fn build_uri(base: &str, path: Option<&str>, query: Option<&str>) -> String {
    let mut base = if base == "/" { "" } else { base };
    if base.len() > 1 {
        base = base.strip_suffix('/').unwrap_or(base);
    }

    let mut path = path.unwrap_or_default();
    path = path.strip_prefix('/').unwrap_or(path);
    path = path.strip_suffix('/').unwrap_or(path);

    let query = query.unwrap_or_default();
    let query = query.strip_prefix('?').unwrap_or(query);

    let mut uri = String::with_capacity(base.len() + path.len() + query.len() + 2);
    uri.push_str(base);
    if !path.is_empty() {
        uri.push('/');
        uri.push_str(path);
    }
    if !query.is_empty() {
        uri.push('?');
        uri.push_str(query);
    }

    if uri.is_empty() {
        uri.push('/');
    }
    uri
}

/// Shorthand for [`build_uri`] without a query string.
pub fn build_uri_with_path(base: &str, path: &str) -> String {
    build_uri(base, Some(path), None)
}

/// Shorthand for [`build_uri`] without a sub-path.
pub fn build_uri_with_query(base: &str, query: &str) -> String {
    build_uri(base, None, Some(query))
}

/// Replaces every `//` with `/` in one left-to-right pass.
///
/// Matches do not overlap and the output is not rescanned, so `"///"`
/// becomes `"//"`.
pub fn format_url(url: &str) -> String {
    url.replace("//", "/")
}
