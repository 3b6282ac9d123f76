//! Turning an [`AdapterResult`] into the outbound response.

use axum::body::Body;
use axum::response::Response;
use chrono::{DateTime, TimeDelta, Utc};
use http::header::SET_COOKIE;
use http::{HeaderValue, StatusCode};

use crate::adapter::AdapterResult;
use crate::error::DispatchError;
use crate::options::CookieSettings;

/// `Expires` format required by RFC 6265 (IMF-fixdate).
const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

/// Build the response for a successful adapter call.
///
/// The status defaults to 200, the body is passed through untouched (no
/// content type is inferred), and a non-empty assigned identity is issued as
/// a cookie.
pub fn materialize(
    result: AdapterResult,
    cookie: &CookieSettings,
    now: DateTime<Utc>,
) -> Result<Response, DispatchError> {
    let set_cookie = match result.assigned_identity.as_deref() {
        Some(identity) if !identity.is_empty() => Some(identity_cookie(cookie, identity, now)?),
        _ => None,
    };

    let mut response = Response::new(Body::from(result.body));
    *response.status_mut() = result.status.unwrap_or(StatusCode::OK);
    if let Some(value) = set_cookie {
        response.headers_mut().append(SET_COOKIE, value);
    }
    Ok(response)
}

/// Render the `Set-Cookie` value carrying `identity`.
///
/// Always `HttpOnly`. `Path` and `Domain` are omitted when empty, `Expires`
/// only appears for a non-zero ttl, and `SameSite` only when configured.
pub fn identity_cookie(
    settings: &CookieSettings,
    identity: &str,
    now: DateTime<Utc>,
) -> Result<HeaderValue, DispatchError> {
    if !identity.bytes().all(is_cookie_octet) {
        return Err(DispatchError::InvalidCookie(
            "identity contains characters not allowed in a cookie value".to_string(),
        ));
    }

    let mut cookie = format!("{}={}", settings.name, identity);

    if !settings.path.is_empty() {
        cookie.push_str("; Path=");
        cookie.push_str(attribute(&settings.path)?);
    }
    if !settings.domain.is_empty() {
        cookie.push_str("; Domain=");
        cookie.push_str(attribute(&settings.domain)?);
    }
    if !settings.ttl.is_zero() {
        let expires = TimeDelta::from_std(settings.ttl)
            .ok()
            .and_then(|ttl| now.checked_add_signed(ttl))
            .ok_or_else(|| DispatchError::InvalidCookie("cookie ttl out of range".to_string()))?;
        cookie.push_str("; Expires=");
        cookie.push_str(&expires.format(HTTP_DATE).to_string());
    }
    cookie.push_str("; HttpOnly");
    if settings.secure {
        cookie.push_str("; Secure");
    }
    if let Some(same_site) = settings.same_site {
        cookie.push_str("; SameSite=");
        cookie.push_str(same_site.as_str());
    }

    HeaderValue::from_str(&cookie).map_err(|e| DispatchError::InvalidCookie(e.to_string()))
}

/// RFC 6265 `cookie-octet`.
fn is_cookie_octet(b: u8) -> bool {
    matches!(b, 0x21 | 0x23..=0x2B | 0x2D..=0x3A | 0x3C..=0x5B | 0x5D..=0x7E)
}

fn attribute(value: &str) -> Result<&str, DispatchError> {
    if value.contains(';') {
        return Err(DispatchError::InvalidCookie(format!("attribute {value:?} contains ';'")));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::TimeZone;

    use super::*;
    use crate::options::SameSite;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 5, 6, 7).unwrap()
    }

    async fn body_of(response: Response) -> Vec<u8> {
        axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap()
            .to_vec()
    }

    #[test]
    fn test_session_cookie_with_defaults() {
        let value = identity_cookie(&CookieSettings::default(), "test-user", fixed_now()).unwrap();
        assert_eq!(value, "user=test-user; HttpOnly");
    }

    #[test]
    fn test_all_attributes() {
        let settings = CookieSettings {
            name: "uid".to_string(),
            path: "/".to_string(),
            domain: "example.com".to_string(),
            ttl: Duration::from_secs(24 * 60 * 60),
            secure: true,
            same_site: Some(SameSite::Strict),
        };
        let value = identity_cookie(&settings, "abc", fixed_now()).unwrap();
        assert_eq!(
            value,
            "uid=abc; Path=/; Domain=example.com; Expires=Fri, 05 Mar 2021 05:06:07 GMT; HttpOnly; Secure; SameSite=Strict"
        );
    }

    #[test]
    fn test_same_site_none() {
        let settings = CookieSettings {
            same_site: Some(SameSite::None),
            secure: true,
            ..CookieSettings::default()
        };
        let value = identity_cookie(&settings, "abc", fixed_now()).unwrap();
        assert_eq!(value, "user=abc; HttpOnly; Secure; SameSite=None");
    }

    #[test]
    fn test_rejects_unsafe_identity() {
        for identity in ["a;b", "a b", "quo\"te", "back\\slash", "new\nline"] {
            let err = identity_cookie(&CookieSettings::default(), identity, fixed_now()).unwrap_err();
            assert!(matches!(err, DispatchError::InvalidCookie(_)), "{identity:?}");
        }
    }

    #[test]
    fn test_rejects_attribute_injection() {
        let settings = CookieSettings {
            path: "/; Domain=evil.test".to_string(),
            ..CookieSettings::default()
        };
        assert!(identity_cookie(&settings, "abc", fixed_now()).is_err());
    }

    #[tokio::test]
    async fn test_default_status_and_verbatim_body() {
        let result = AdapterResult::new().with_body(&b"{\"ok\":true}"[..]);
        let response = materialize(result, &CookieSettings::default(), fixed_now()).unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(SET_COOKIE).is_none());
        assert!(response.headers().get(http::header::CONTENT_TYPE).is_none());
        assert_eq!(body_of(response).await, b"{\"ok\":true}");
    }

    #[tokio::test]
    async fn test_status_and_cookie() {
        let result = AdapterResult::new()
            .with_status(StatusCode::CREATED)
            .with_identity("fresh");
        let response = materialize(result, &CookieSettings::default(), fixed_now()).unwrap();

        assert_eq!(response.status(), StatusCode::CREATED);
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies, vec!["user=fresh; HttpOnly"]);
    }

    #[test]
    fn test_empty_assigned_identity_sets_no_cookie() {
        let result = AdapterResult::new().with_identity("");
        let response = materialize(result, &CookieSettings::default(), fixed_now()).unwrap();
        assert!(response.headers().get(SET_COOKIE).is_none());
    }
}
