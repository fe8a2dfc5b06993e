//! The HTTP request object built per-read, before it is handed to
//! `reqwest::blocking`.
//!
//! A small value type describing verb, resource path, protocol version, and
//! headers, kept separate from the actual transport so a request can be
//! constructed and inspected without performing any I/O.

use crate::headers::HeaderList;

/// An HTTP request, not yet sent.
#[derive(Debug, Clone)]
pub struct HttpRequestSpec {
    pub verb: String,
    /// Resource path; always starts with `/`.
    pub path: String,
    pub version: String,
    pub headers: HeaderList,
}

impl HttpRequestSpec {
    /// Build a request spec. Prepends `/` to `path` if the caller omitted it.
    pub fn new(verb: impl Into<String>, path: impl Into<String>, headers: HeaderList) -> Self {
        let path = path.into();
        let path = if path.starts_with('/') {
            path
        } else {
            format!("/{path}")
        };
        Self {
            verb: verb.into(),
            path,
            version: "HTTP/1.1".to_string(),
            headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_slash_if_absent() {
        let req = HttpRequestSpec::new("GET", "test.txt", HeaderList::new());
        assert_eq!(req.path, "/test.txt");
    }

    #[test]
    fn keeps_existing_leading_slash() {
        let req = HttpRequestSpec::new("GET", "/test.txt", HeaderList::new());
        assert_eq!(req.path, "/test.txt");
    }

    #[test]
    fn defaults_to_http_1_1() {
        let req = HttpRequestSpec::new("HEAD", "/x", HeaderList::new());
        assert_eq!(req.version, "HTTP/1.1");
    }
}
