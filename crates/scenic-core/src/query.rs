//! Query string helpers

/// Parse a query string into decoded key/value pairs.
///
/// A leading `?` is ignored. Pairs without `=` get an empty value; pairs
/// that fail to decode as UTF-8 are skipped.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    let query = query.trim_start_matches('?');
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let mut parts = pair.splitn(2, '=');
            let key = parts.next()?;
            let value = parts.next().unwrap_or("");
            let key = urlencoding::decode(key).ok()?.into_owned();
            let value = urlencoding::decode(value).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

/// First value for `name`, if any
pub fn first_value<'a>(pairs: &'a [(String, String)], name: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.as_str())
}
