//! Parse HTTP response header lines into HeadResult.

use super::HeadResult;

/// Parse collected header lines into HeadResult.
///
/// With redirects curl reports every hop. Each status line starts a fresh
/// result, so only headers of the final response count.
pub(crate) fn parse_headers(lines: &[String]) -> HeadResult {
    let mut result = HeadResult::default();

    for line in lines {
        let line = line.trim();
        if line.starts_with("HTTP/") {
            result = HeadResult::default();
            continue;
        }
        let Some((name, value)) = line.split_once(':') else {
            continue;
        };
        if name.trim().eq_ignore_ascii_case("content-length") {
            result.content_length = value.trim().parse::<u64>().ok();
        }
    }

    result
}
