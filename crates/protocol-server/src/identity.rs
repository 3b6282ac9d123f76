//! Identity lookup from the request's cookies.

use http::header::COOKIE;
use http::HeaderMap;

use crate::error::DispatchError;

/// Read the identity stored under cookie `name`.
///
/// A missing cookie yields an empty string. Pairs are matched on raw bytes,
/// so unrelated cookies holding non-ASCII values are skipped rather than
/// failing the lookup. The value is returned as sent, minus one pair of
/// surrounding double quotes. Fails only when the matching cookie's value is
/// not valid UTF-8.
pub fn resolve(headers: &HeaderMap, name: &str) -> Result<String, DispatchError> {
    let found = headers
        .get_all(COOKIE)
        .iter()
        .flat_map(|header| header.as_bytes().split(|b| *b == b';'))
        .filter_map(|pair| {
            let eq = pair.iter().position(|b| *b == b'=')?;
            Some((trim(&pair[..eq]), trim(&pair[eq + 1..])))
        })
        .find(|(key, _)| *key == name.as_bytes());

    let Some((_, value)) = found else {
        return Ok(String::new());
    };

    let value = std::str::from_utf8(unquote(value)).map_err(DispatchError::IdentityLookup)?;
    Ok(value.to_string())
}

fn trim(bytes: &[u8]) -> &[u8] {
    let start = bytes.iter().position(|b| !b.is_ascii_whitespace()).unwrap_or(bytes.len());
    let end = bytes.iter().rposition(|b| !b.is_ascii_whitespace()).map_or(start, |i| i + 1);
    &bytes[start..end]
}

fn unquote(value: &[u8]) -> &[u8] {
    match value {
        [b'"', inner @ .., b'"'] => inner,
        _ => value,
    }
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_str(c).unwrap());
        }
        map
    }

    fn raw_headers(cookies: &[&[u8]]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for c in cookies {
            map.append(COOKIE, HeaderValue::from_bytes(c).unwrap());
        }
        map
    }

    #[test]
    fn test_missing_cookie_is_empty_identity() {
        assert_eq!(resolve(&HeaderMap::new(), "user").unwrap(), "");
        assert_eq!(resolve(&headers(&["other=1; theme=dark"]), "user").unwrap(), "");
    }

    #[test]
    fn test_value_returned_verbatim() {
        let h = headers(&["theme=dark; user=abc%20def==; lang=en"]);
        assert_eq!(resolve(&h, "user").unwrap(), "abc%20def==");
    }

    #[test]
    fn test_surrounding_quotes_removed() {
        assert_eq!(resolve(&headers(&["user=\"abc\""]), "user").unwrap(), "abc");
        assert_eq!(resolve(&headers(&["user=\""]), "user").unwrap(), "\"");
        assert_eq!(resolve(&headers(&["user=a\"b"]), "user").unwrap(), "a\"b");
    }

    #[test]
    fn test_name_must_match_exactly() {
        let h = headers(&["username=nope; user=yes"]);
        assert_eq!(resolve(&h, "user").unwrap(), "yes");
    }

    #[test]
    fn test_searches_every_cookie_header() {
        let h = headers(&["theme=dark", "test=test-user"]);
        assert_eq!(resolve(&h, "test").unwrap(), "test-user");
    }

    #[test]
    fn test_pairs_without_equals_are_skipped() {
        let h = headers(&["flag; user=x"]);
        assert_eq!(resolve(&h, "user").unwrap(), "x");
    }

    #[test]
    fn test_foreign_non_ascii_cookie_without_identity() {
        let h = raw_headers(&["theme=café".as_bytes()]);
        assert_eq!(resolve(&h, "user").unwrap(), "");
    }

    #[test]
    fn test_foreign_non_ascii_cookie_beside_identity() {
        let h = raw_headers(&["theme=café; user=abc".as_bytes()]);
        assert_eq!(resolve(&h, "user").unwrap(), "abc");

        let h = raw_headers(&[b"theme=\xff\xfe", b"user=abc"]);
        assert_eq!(resolve(&h, "user").unwrap(), "abc");
    }

    #[test]
    fn test_non_ascii_identity_is_text() {
        let h = raw_headers(&["user=café".as_bytes()]);
        assert_eq!(resolve(&h, "user").unwrap(), "café");
    }

    #[test]
    fn test_unreadable_identity_fails() {
        let h = raw_headers(&[b"theme=dark; user=\xff\xfe"]);
        let err = resolve(&h, "user").unwrap_err();
        assert!(matches!(err, DispatchError::IdentityLookup(_)));
    }
}
