//! Helpers for reading state out of page URLs

use url::Url;

/// Value of query parameter `name` in `page_url`, decoded (`+` is a space).
/// Returns an empty string when the parameter is absent or has no value.
///
/// Relative URLs (`/library/?q=map`) are accepted.
pub fn search_param_from_url(page_url: &str, name: &str) -> String {
    let parsed = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => match Url::parse("http://localhost/").and_then(|base| base.join(page_url)) {
            Ok(url) => url,
            Err(_) => return String::new(),
        },
    };

    parsed
        .query_pairs()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
        .unwrap_or_default()
}

/// Initial search box text for a page, taken from its `q` parameter
pub fn initial_query(page_url: &str) -> String {
    search_param_from_url(page_url, "q")
}
