//! Credential extraction from the `Authorization` header.
//!
//! Both schemes share one parser: `<Scheme> <credential>`, scheme matched
//! case-sensitively, exactly one credential segment. Nothing here indexes
//! into split results, so a bare scheme or trailing whitespace is a
//! [`AuthError::MalformedHeader`], never a panic.

use http::HeaderMap;
use http::header::AUTHORIZATION;

use super::AuthError;

/// Scheme for end-user access and refresh tokens.
pub const BEARER_SCHEME: &str = "Bearer";

/// Scheme for service-to-service webhook keys.
pub const API_KEY_SCHEME: &str = "ApiKey";

/// Extract the token from `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Result<String, AuthError> {
    credential(headers, BEARER_SCHEME)
}

/// Extract the key from `Authorization: ApiKey <key>`.
pub fn api_key(headers: &HeaderMap) -> Result<String, AuthError> {
    credential(headers, API_KEY_SCHEME)
}

fn credential(headers: &HeaderMap, scheme: &str) -> Result<String, AuthError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(AuthError::MissingHeader);
    };
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;
    parse_authorization(value, scheme).map(str::to_string)
}

/// Parse a raw `Authorization` value against the expected scheme.
pub fn parse_authorization<'a>(value: &'a str, scheme: &str) -> Result<&'a str, AuthError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(AuthError::MissingHeader);
    }

    let Some((found, rest)) = value.split_once(char::is_whitespace) else {
        // A lone word: either a bare scheme or something else entirely.
        return Err(AuthError::MalformedHeader);
    };
    if found != scheme {
        return Err(AuthError::MalformedHeader);
    }

    let credential = rest.trim();
    if credential.is_empty() || credential.contains(char::is_whitespace) {
        return Err(AuthError::MalformedHeader);
    }
    Ok(credential)
}

#[cfg(test)]
mod tests {
    use http::HeaderValue;

    use super::*;

    fn headers(value: &str) -> HeaderMap {
        let mut map = HeaderMap::new();
        map.insert(AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        map
    }

    #[test]
    fn bearer_token_is_extracted() {
        assert_eq!(bearer_token(&headers("Bearer abc123")).unwrap(), "abc123");
    }

    #[test]
    fn surrounding_whitespace_is_trimmed() {
        assert_eq!(bearer_token(&headers("Bearer   abc123  ")).unwrap(), "abc123");
    }

    #[test]
    fn absent_header_is_missing() {
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn empty_header_is_missing() {
        assert!(matches!(
            bearer_token(&headers("")),
            Err(AuthError::MissingHeader)
        ));
    }

    #[test]
    fn scheme_without_token_is_malformed() {
        for value in ["Bearer ", "Bearer", "Bearer    "] {
            assert!(
                matches!(
                    parse_authorization(value, BEARER_SCHEME),
                    Err(AuthError::MalformedHeader)
                ),
                "value {value:?}"
            );
        }
        assert!(matches!(
            bearer_token(&headers("Bearer ")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn other_scheme_is_malformed() {
        assert!(matches!(
            bearer_token(&headers("Basic xyz")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            bearer_token(&headers("ApiKey xyz")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn scheme_is_case_sensitive() {
        assert!(matches!(
            bearer_token(&headers("bearer abc")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            api_key(&headers("apikey abc")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn token_with_inner_whitespace_is_malformed() {
        assert!(matches!(
            bearer_token(&headers("Bearer abc def")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn token_without_scheme_is_malformed() {
        assert!(matches!(
            bearer_token(&headers("abc123")),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn non_ascii_header_is_malformed() {
        let mut map = HeaderMap::new();
        map.insert(
            AUTHORIZATION,
            HeaderValue::from_bytes(b"Bearer \xffabc").unwrap(),
        );
        assert!(matches!(bearer_token(&map), Err(AuthError::MalformedHeader)));
    }

    #[test]
    fn api_key_is_extracted() {
        assert_eq!(api_key(&headers("ApiKey f271c81ff7084ee5")).unwrap(), "f271c81ff7084ee5");
        assert!(matches!(
            api_key(&headers("Bearer f271c81ff7084ee5")),
            Err(AuthError::MalformedHeader)
        ));
        assert!(matches!(
            api_key(&headers("ApiKey ")),
            Err(AuthError::MalformedHeader)
        ));
    }
}
