//! `Accept` header parsing.
//!
//! Produces the ordered candidate list the dispatcher consumes: media ranges
//! sorted by quality (highest first), header order breaking ties. Ranges with
//! `q=0` are refused by the client and dropped.

/// Media range assumed when a request carries no `Accept` header.
pub const ANY_MEDIA_TYPE: &str = "*/*";

/// Parse an `Accept` header into media types in client preference order.
pub fn parse_accept(header: &str) -> Vec<String> {
    let mut ranges: Vec<(f32, &str)> = header
        .split(',')
        .filter_map(|item| {
            let mut parts = item.split(';');
            let media_type = parts.next()?.trim();
            if media_type.is_empty() {
                return None;
            }
            let quality = parts
                .filter_map(|param| param.split_once('='))
                .find(|(key, _)| key.trim().eq_ignore_ascii_case("q"))
                .map(|(_, value)| value.trim().parse::<f32>().unwrap_or(1.0))
                .unwrap_or(1.0);
            Some((quality, media_type))
        })
        .filter(|(quality, _)| *quality > 0.0)
        .collect();

    // Stable: equal qualities keep header order.
    ranges.sort_by(|a, b| b.0.total_cmp(&a.0));
    ranges.into_iter().map(|(_, media_type)| media_type.to_string()).collect()
}

/// Candidates for an optional header value.
pub fn candidates(header: Option<&str>) -> Vec<String> {
    match header {
        Some(value) => parse_accept(value),
        None => vec![ANY_MEDIA_TYPE.to_string()],
    }
}
