//! URL parsing: split a URL string into scheme/host/port/path/query fields.
//!
//! Grammar: `SCHEME "://" HOST [":" PORT] ["/" [PATH]] ["?" QUERY]`, with
//! `SCHEME = [A-Za-z+.-]+` and `PORT = [0-9]+`. Implemented as a bracket-aware
//! hand-rolled scanning loop rather than built on the general-purpose `url`
//! crate, since this parser deliberately does not percent-decode the path
//! and must preserve a bracketed IPv6 host verbatim (including the
//! brackets) — behavior the general-purpose crate does not expose directly.

use crate::error::S3CommsError;

/// A URL split into its components.
///
/// `scheme` and `host` are always populated on a successful parse. Every
/// other field is `None` when genuinely absent from the input — a URL that
/// ends right after the host has `path: None`, not `path: Some("")`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Lowercased scheme, e.g. `"https"`.
    pub scheme: String,
    /// Host, verbatim. A bracketed IPv6 literal keeps its brackets, e.g.
    /// `"[::1]"`.
    pub host: String,
    /// Port, as digits, without validating range.
    pub port: Option<String>,
    /// Resource path with the leading `/` stripped. Never starts with `/`.
    pub path: Option<String>,
    /// Query string with the leading `?` stripped.
    pub query: Option<String>,
}

fn err(msg: impl Into<String>) -> S3CommsError {
    S3CommsError::UrlMalformed(msg.into())
}

/// Parse a URL string into its structural components.
///
/// See the module documentation for the grammar. Fails on empty input,
/// missing `://`, a scheme with disallowed characters, an empty host, a port
/// with non-digit characters or empty after `:`, an empty query after `?`,
/// or an unterminated bracketed IPv6 host.
pub fn parse_url(input: &str) -> Result<ParsedUrl, S3CommsError> {
    if input.is_empty() {
        return Err(err("input is empty"));
    }
    let urllen = input.len();
    let bytes = input.as_bytes();

    // ── SCHEME ──────────────────────────────────────────────────────────
    let scheme_end = input
        .find(':')
        .ok_or_else(|| err("missing scheme terminator ':'"))?;
    if scheme_end > urllen {
        return Err(err("scheme substring length exceeds input length"));
    }
    let scheme_raw = &input[..scheme_end];
    if scheme_raw.is_empty()
        || !scheme_raw
            .bytes()
            .all(|b| b.is_ascii_alphabetic() || b == b'+' || b == b'-' || b == b'.')
    {
        return Err(err("scheme contains disallowed characters"));
    }
    let scheme = scheme_raw.to_ascii_lowercase();

    let after_scheme = &input[scheme_end..];
    if !after_scheme.starts_with("://") {
        return Err(err("missing '://' after scheme"));
    }
    let mut pos = scheme_end + 3;

    // ── HOST ────────────────────────────────────────────────────────────
    let host_start = pos;
    if bytes.get(pos) == Some(&b'[') {
        loop {
            match bytes.get(pos) {
                None => return Err(err("reached end of url: incomplete IPv6 host")),
                Some(b']') => {
                    pos += 1;
                    break;
                }
                Some(_) => pos += 1,
            }
        }
    } else {
        while let Some(&b) = bytes.get(pos) {
            if b == b':' || b == b'/' || b == b'?' {
                break;
            }
            pos += 1;
        }
    }
    let host = &input[host_start..pos];
    if host.is_empty() {
        return Err(err("host substring cannot be empty"));
    }
    if host.len() > urllen {
        return Err(err("problem with length of host substring"));
    }
    let host = host.to_string();

    // ── PORT ────────────────────────────────────────────────────────────
    let mut port = None;
    if bytes.get(pos) == Some(&b':') {
        pos += 1;
        let port_start = pos;
        while let Some(&b) = bytes.get(pos) {
            if b == b'/' || b == b'?' {
                break;
            }
            pos += 1;
        }
        let port_str = &input[port_start..pos];
        if port_str.is_empty() {
            return Err(err("port element cannot be empty"));
        }
        if port_str.len() > urllen {
            return Err(err("problem with length of port substring"));
        }
        if !port_str.bytes().all(|b| b.is_ascii_digit()) {
            return Err(err("port is not a decimal string"));
        }
        port = Some(port_str.to_string());
    }

    // ── PATH ────────────────────────────────────────────────────────────
    let mut path = None;
    if bytes.get(pos) == Some(&b'/') {
        pos += 1;
        let path_start = pos;
        while let Some(&b) = bytes.get(pos) {
            if b == b'?' {
                break;
            }
            pos += 1;
        }
        let path_str = &input[path_start..pos];
        if path_str.len() > urllen {
            return Err(err("problem with length of path substring"));
        }
        if !path_str.is_empty() {
            path = Some(path_str.to_string());
        }
    }

    // ── QUERY ───────────────────────────────────────────────────────────
    let mut query = None;
    if bytes.get(pos) == Some(&b'?') {
        pos += 1;
        let query_str = &input[pos..];
        if query_str.is_empty() {
            return Err(err("query cannot be empty"));
        }
        if query_str.len() > urllen {
            return Err(err("problem with length of query substring"));
        }
        query = Some(query_str.to_string());
    }

    Ok(ParsedUrl {
        scheme,
        host,
        port,
        path,
        query,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_url_with_query() {
        let purl = parse_url("http://bucket.example.com/data.h5?x=1").unwrap();
        assert_eq!(purl.scheme, "http");
        assert_eq!(purl.host, "bucket.example.com");
        assert_eq!(purl.port, None);
        assert_eq!(purl.path.as_deref(), Some("data.h5"));
        assert_eq!(purl.query.as_deref(), Some("x=1"));
    }

    #[test]
    fn parses_bracketed_ipv6_with_port_and_no_path() {
        let purl = parse_url("https://[::1]:9000/").unwrap();
        assert_eq!(purl.scheme, "https");
        assert_eq!(purl.host, "[::1]");
        assert_eq!(purl.port.as_deref(), Some("9000"));
        assert_eq!(purl.path, None);
        assert_eq!(purl.query, None);
    }

    #[test]
    fn scheme_is_lowercased() {
        let purl = parse_url("HTTPS://example.com").unwrap();
        assert_eq!(purl.scheme, "https");
    }

    #[test]
    fn url_ending_after_host_has_no_path() {
        let purl = parse_url("https://example.com").unwrap();
        assert_eq!(purl.path, None);
    }

    #[test]
    fn trailing_slash_with_nothing_after_is_absent_path_not_empty() {
        let purl = parse_url("https://example.com/").unwrap();
        assert_eq!(purl.path, None);
    }

    #[test]
    fn path_leading_slash_is_stripped() {
        let purl = parse_url("https://example.com/foo/bar").unwrap();
        assert_eq!(purl.path.as_deref(), Some("foo/bar"));
    }

    #[test]
    fn rejects_empty_input() {
        assert!(parse_url("").is_err());
    }

    #[test]
    fn rejects_missing_scheme_separator() {
        assert!(parse_url("not-a-url").is_err());
    }

    #[test]
    fn rejects_scheme_with_disallowed_characters() {
        assert!(parse_url("ht!tp://example.com").is_err());
    }

    #[test]
    fn accepts_scheme_with_plus_dot_dash() {
        let purl = parse_url("s3+custom.scheme-x://example.com").unwrap();
        assert_eq!(purl.scheme, "s3+custom.scheme-x");
    }

    #[test]
    fn rejects_empty_host() {
        assert!(parse_url("https:///path").is_err());
    }

    #[test]
    fn rejects_empty_port() {
        assert!(parse_url("https://example.com:/path").is_err());
    }

    #[test]
    fn rejects_non_digit_port() {
        assert!(parse_url("https://example.com:abc/path").is_err());
    }

    #[test]
    fn rejects_empty_query() {
        assert!(parse_url("https://example.com/path?").is_err());
    }

    #[test]
    fn rejects_unterminated_ipv6_host() {
        assert!(parse_url("https://[::1").is_err());
    }

    #[test]
    fn round_trip_equivalent_up_to_case_and_leading_slash() {
        let purl = parse_url("https://Example.com:443/a/b?q=1").unwrap();
        let reassembled = format!(
            "{}://{}{}{}{}",
            purl.scheme,
            purl.host,
            purl.port.as_deref().map(|p| format!(":{p}")).unwrap_or_default(),
            purl.path.as_deref().map(|p| format!("/{p}")).unwrap_or_default(),
            purl.query.as_deref().map(|q| format!("?{q}")).unwrap_or_default(),
        );
        assert_eq!(reassembled, "https://Example.com:443/a/b?q=1");
    }
}
