use http::header::{COOKIE, HeaderMap};

use crate::session::config::{SESSION_COOKIE_NAME, SESSION_COOKIE_SECURE};
use crate::session::errors::SessionError;
use crate::session::types::SessionToken;

fn secure_attr() -> &'static str {
    if *SESSION_COOKIE_SECURE { "; Secure" } else { "" }
}

/// `Set-Cookie` value that hands `token` to the browser for `max_age` seconds.
pub fn session_cookie(token: &SessionToken, max_age: u64) -> String {
    format!(
        "{}={}; Path=/; HttpOnly; SameSite=Strict; Max-Age={max_age}{}",
        SESSION_COOKIE_NAME.as_str(),
        token.as_str(),
        secure_attr()
    )
}

/// `Set-Cookie` value that makes the browser drop the session cookie.
pub fn expired_session_cookie() -> String {
    format!(
        "{}=; Path=/; HttpOnly; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0{}",
        SESSION_COOKIE_NAME.as_str(),
        secure_attr()
    )
}

/// Session token from the request's `Cookie` header, if the session cookie is present.
pub fn get_session_token_from_headers(headers: &HeaderMap) -> Result<Option<&str>, SessionError> {
    let cookie_name = SESSION_COOKIE_NAME.as_str();

    // Browsers may split cookies across several headers
    for cookie_header in headers.get_all(COOKIE) {
        let cookie_str = cookie_header.to_str().map_err(|e| {
            tracing::error!("Invalid cookie header: {}", e);
            SessionError::HeaderError("Invalid cookie header".to_string())
        })?;

        let found = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
            let mut parts = s.splitn(2, '=');
            match (parts.next(), parts.next()) {
                (Some(k), Some(v)) if k == cookie_name => Some(v),
                _ => None,
            }
        });

        if found.is_some() {
            return Ok(found);
        }
    }

    tracing::debug!("No session cookie '{}' found in cookies", cookie_name);
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn name() -> &'static str {
        SESSION_COOKIE_NAME.as_str()
    }

    fn headers_with_cookie(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn test_session_cookie_attributes() {
        let token = SessionToken::new("tok123".to_string());

        let cookie = session_cookie(&token, 86400);

        assert!(cookie.starts_with(&format!("{}=tok123; ", name())));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Max-Age=86400"));
    }

    #[test]
    fn test_expired_session_cookie() {
        let cookie = expired_session_cookie();

        assert!(cookie.starts_with(&format!("{}=; ", name())));
        assert!(cookie.contains("Expires=Thu, 01 Jan 1970 00:00:00 GMT"));
        assert!(cookie.contains("Max-Age=0"));
    }

    #[test]
    fn test_get_session_token_present() {
        let headers = headers_with_cookie(&format!("theme=dark; {}=abc123; lang=en", name()));
        assert_eq!(
            get_session_token_from_headers(&headers).unwrap(),
            Some("abc123")
        );
    }

    #[test]
    fn test_get_session_token_value_with_equals() {
        let headers = headers_with_cookie(&format!("{}=abc=def", name()));
        assert_eq!(
            get_session_token_from_headers(&headers).unwrap(),
            Some("abc=def")
        );
    }

    #[test]
    fn test_get_session_token_absent() {
        let headers = headers_with_cookie(&format!("theme=dark; {}x=abc", name()));
        assert_eq!(get_session_token_from_headers(&headers).unwrap(), None);
        assert_eq!(get_session_token_from_headers(&HeaderMap::new()).unwrap(), None);
    }

    #[test]
    fn test_get_session_token_from_second_header() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark"));
        headers.append(
            COOKIE,
            HeaderValue::from_str(&format!("{}=later", name())).unwrap(),
        );
        assert_eq!(
            get_session_token_from_headers(&headers).unwrap(),
            Some("later")
        );
    }

    #[test]
    fn test_get_session_token_non_ascii_header() {
        let mut headers = HeaderMap::new();
        let mut raw = format!("{}=", name()).into_bytes();
        raw.push(0xff);
        headers.insert(COOKIE, HeaderValue::from_bytes(&raw).unwrap());
        assert!(matches!(
            get_session_token_from_headers(&headers),
            Err(SessionError::HeaderError(_))
        ));
    }
}
