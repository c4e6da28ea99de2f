use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::headers::{self, HeaderMapExt};

use crate::config::{ConfigError, SecretKey};

pub fn authenticated_headers(secret: &SecretKey) -> Result<HeaderMap, ConfigError> {
    let mut auth = HeaderValue::from_str(&format!("Bearer {}", secret.expose()))
        .map_err(|_| ConfigError::InvalidSecret)?;
    // Keeps the value out of Debug output
    auth.set_sensitive(true);
    let mut map = HeaderMap::new();
    map.insert(header::AUTHORIZATION, auth);
    map.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
    map.typed_insert(headers::UserAgent::from_static(concat!(
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION")
    )));
    Ok(map)
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use crate::config::SecretKey;

    #[test]
    fn bearer_header_is_sensitive() {
        let secret = SecretKey::new("sk_test_123").unwrap();
        let headers = super::authenticated_headers(&secret).unwrap();
        let auth = headers.get(header::AUTHORIZATION).unwrap();
        assert_eq!(auth, "Bearer sk_test_123");
        assert!(auth.is_sensitive());
        assert!(!format!("{headers:?}").contains("sk_test_123"));
    }
}
