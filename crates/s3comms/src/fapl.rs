//! CLI collaborator surface: the `(a,b,c)` tuple grammar and the
//! anonymous-vs-authenticated credential resolution it feeds.
//!
//! Narrow on purpose — a small CLI-facing surface included only because
//! `resolve_credentials`'s output shape depends on it. Nothing here performs
//! I/O.

use crate::error::S3CommsError;

/// Maximum accepted length (bytes) of the AWS region field.
pub const MAX_REGION_LEN: usize = 32;
/// Maximum accepted length (bytes) of the access key id field.
pub const MAX_ACCESS_KEY_ID_LEN: usize = 128;
/// Maximum accepted length (bytes) of the secret access key field.
pub const MAX_SECRET_ACCESS_KEY_LEN: usize = 128;

/// Parse `(elem0<SEP>elem1<SEP>...elemN)` into its element strings.
///
/// `sep` is a single separator byte chosen by the caller (typically `,`).
/// A backslash escapes the following byte literally, including the
/// separator and `)` itself. An unescaped `)` terminates the tuple. Nested
/// parentheses inside elements are ordinary characters. Empty elements are
/// permitted and appear as empty strings.
pub fn parse_tuple(input: &str, sep: u8) -> Result<Vec<String>, S3CommsError> {
    let bytes = input.as_bytes();
    let mut i = 0usize;

    if bytes.first() != Some(&b'(') {
        return Err(S3CommsError::ArgumentInvalid(
            "tuple must start with '('".to_string(),
        ));
    }
    i += 1;

    let mut elements = Vec::new();
    let mut current = String::new();
    let mut terminated = false;

    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 1;
            match bytes.get(i) {
                Some(&escaped) => {
                    current.push(escaped as char);
                    i += 1;
                }
                None => {
                    return Err(S3CommsError::ArgumentInvalid(
                        "dangling escape at end of input".to_string(),
                    ))
                }
            }
            continue;
        }
        if b == b')' {
            elements.push(current.clone());
            current.clear();
            terminated = true;
            break;
        }
        if b == sep {
            elements.push(current.clone());
            current.clear();
            i += 1;
            continue;
        }
        current.push(b as char);
        i += 1;
    }

    if !terminated {
        return Err(S3CommsError::ArgumentInvalid(
            "tuple missing terminating ')'".to_string(),
        ));
    }

    Ok(elements)
}

/// Resolved credential mode for opening a handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FaplCredentials {
    Anonymous,
    Authenticated {
        region: String,
        access_key_id: String,
        secret_access_key: String,
    },
}

/// Resolve a `[region, id, key, ...]` element sequence into anonymous or
/// authenticated mode.
///
/// - `None`, or all three of region/id/key empty → [`FaplCredentials::Anonymous`].
/// - `region` and `id` both non-empty (key may be empty) → authenticated.
/// - Any field exceeding its length maximum → anonymous (prior partial
///   fields are not surfaced — there is no "authenticated but half-filled"
///   result).
/// - Any other single-empty-field combination (e.g. id empty but region and
///   key non-empty) → anonymous.
pub fn resolve_credentials(values: Option<&[String]>) -> FaplCredentials {
    let (region, id, key) = match values {
        None => return FaplCredentials::Anonymous,
        Some(v) => (
            v.first().map(String::as_str).unwrap_or(""),
            v.get(1).map(String::as_str).unwrap_or(""),
            v.get(2).map(String::as_str).unwrap_or(""),
        ),
    };

    if region.is_empty() && id.is_empty() && key.is_empty() {
        return FaplCredentials::Anonymous;
    }

    if region.len() > MAX_REGION_LEN
        || id.len() > MAX_ACCESS_KEY_ID_LEN
        || key.len() > MAX_SECRET_ACCESS_KEY_LEN
    {
        return FaplCredentials::Anonymous;
    }

    if region.is_empty() || id.is_empty() {
        return FaplCredentials::Anonymous;
    }

    FaplCredentials::Authenticated {
        region: region.to_string(),
        access_key_id: id.to_string(),
        secret_access_key: key.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_simple_tuple() {
        let elems = parse_tuple("(a,b,c)", b',').unwrap();
        assert_eq!(elems, vec!["a", "b", "c"]);
    }

    #[test]
    fn empty_elements_are_preserved() {
        let elems = parse_tuple("(a,,c)", b',').unwrap();
        assert_eq!(elems, vec!["a", "", "c"]);
    }

    #[test]
    fn backslash_escapes_separator() {
        let elems = parse_tuple(r"(a\,b,c)", b',').unwrap();
        assert_eq!(elems, vec!["a,b", "c"]);
    }

    #[test]
    fn backslash_escapes_backslash() {
        let elems = parse_tuple(r"(a\\b)", b',').unwrap();
        assert_eq!(elems, vec![r"a\b"]);
    }

    #[test]
    fn unescaped_close_paren_terminates_early() {
        let elems = parse_tuple("(a,b)ignored", b',').unwrap();
        assert_eq!(elems, vec!["a", "b"]);
    }

    #[test]
    fn nested_parens_are_ordinary_characters() {
        let elems = parse_tuple("(a(b),c)", b',').unwrap();
        assert_eq!(elems, vec!["a(b)", "c"]);
    }

    #[test]
    fn missing_open_paren_errors() {
        assert!(parse_tuple("a,b,c)", b',').is_err());
    }

    #[test]
    fn missing_close_paren_errors() {
        assert!(parse_tuple("(a,b,c", b',').is_err());
    }

    #[test]
    fn resolve_credentials_none_is_anonymous() {
        assert_eq!(resolve_credentials(None), FaplCredentials::Anonymous);
    }

    #[test]
    fn resolve_credentials_all_empty_is_anonymous() {
        let v = vec![String::new(), String::new(), String::new()];
        assert_eq!(resolve_credentials(Some(&v)), FaplCredentials::Anonymous);
    }

    #[test]
    fn resolve_credentials_region_and_id_is_authenticated_key_optional() {
        let v = vec!["us-east-1".to_string(), "AKIA...".to_string(), String::new()];
        assert_eq!(
            resolve_credentials(Some(&v)),
            FaplCredentials::Authenticated {
                region: "us-east-1".to_string(),
                access_key_id: "AKIA...".to_string(),
                secret_access_key: String::new(),
            }
        );
    }

    #[test]
    fn resolve_credentials_missing_id_is_anonymous() {
        let v = vec!["us-east-1".to_string(), String::new(), "secret".to_string()];
        assert_eq!(resolve_credentials(Some(&v)), FaplCredentials::Anonymous);
    }

    #[test]
    fn resolve_credentials_overflow_is_anonymous() {
        let v = vec!["x".repeat(MAX_REGION_LEN + 1), "id".to_string(), "key".to_string()];
        assert_eq!(resolve_credentials(Some(&v)), FaplCredentials::Anonymous);
    }
}
