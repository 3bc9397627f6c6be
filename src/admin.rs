//! Admin gate: a shared-secret check guarding product creation and order listing.
//!
//! The token may be presented as `Authorization: Bearer <token>`, as an
//! `X-Admin-Token` header, or as the `admin_token` query parameter. The gate
//! holds no session state and makes no network calls.

use axum::async_trait;
use axum::extract::{FromRef, FromRequestParts};
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum::http::{HeaderMap, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use secrecy::{ExposeSecret, SecretString};
use subtle::ConstantTimeEq;
use thiserror::Error;
use tracing::debug;

pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";
pub const ADMIN_TOKEN_QUERY: &str = "admin_token";

/// Why a guarded request was refused. Both cases produce the same response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AdminDenied {
    #[error("no admin credential supplied")]
    MissingCredential,
    #[error("admin credential rejected")]
    InvalidCredential,
}

impl IntoResponse for AdminDenied {
    fn into_response(self) -> Response {
        (StatusCode::FORBIDDEN, Json(serde_json::json!({ "message": "Unauthorized" }))).into_response()
    }
}

#[derive(Clone)]
pub struct AdminGate {
    token: SecretString,
}

impl AdminGate {
    pub fn new(token: SecretString) -> Self { Self { token } }

    pub fn check(&self, headers: &HeaderMap, uri: &Uri) -> Result<(), AdminDenied> {
        let presented = presented_tokens(headers, uri);
        if presented.is_empty() {
            return Err(AdminDenied::MissingCredential);
        }
        if presented.iter().any(|token| self.matches(token)) {
            Ok(())
        } else {
            Err(AdminDenied::InvalidCredential)
        }
    }

    pub fn is_authorized(&self, headers: &HeaderMap, uri: &Uri) -> bool { self.check(headers, uri).is_ok() }

    fn matches(&self, candidate: &str) -> bool {
        let expected = self.token.expose_secret().as_bytes();
        let candidate = candidate.as_bytes();
        candidate.len() == expected.len() && bool::from(candidate.ct_eq(expected))
    }
}

/// Every non-empty token the request carries, in header-then-query order.
fn presented_tokens(headers: &HeaderMap, uri: &Uri) -> Vec<String> {
    let mut tokens = Vec::new();

    if let Some(value) = headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()) {
        let token = match value.split_once(' ') {
            Some((scheme, rest)) if scheme.eq_ignore_ascii_case("bearer") => rest.trim(),
            _ => value.trim(),
        };
        tokens.push(token.to_string());
    }
    if let Some(value) = headers.get(ADMIN_TOKEN_HEADER).and_then(|v| v.to_str().ok()) {
        tokens.push(value.trim().to_string());
    }
    if let Some(query) = uri.query() {
        tokens.extend(
            url::form_urlencoded::parse(query.as_bytes())
                .filter(|(key, _)| key == ADMIN_TOKEN_QUERY)
                .map(|(_, value)| value.into_owned()),
        );
    }

    tokens.retain(|t| !t.is_empty());
    tokens
}

/// Extractor that rejects the request with `403` unless the admin token is presented.
pub struct RequireAdmin;

#[async_trait]
impl<S> FromRequestParts<S> for RequireAdmin
where
    AdminGate: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = AdminDenied;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        AdminGate::from_ref(state).check(&parts.headers, &parts.uri).map_err(|denied| {
            debug!(reason = %denied, path = parts.uri.path(), "Admin request rejected");
            denied
        })?;
        Ok(Self)
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    const TOKEN: &str = "letmein-123";

    fn gate() -> AdminGate { AdminGate::new(SecretString::from(TOKEN)) }

    fn headers(pairs: &[(&'static str, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.insert(*name, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    fn uri(s: &str) -> Uri { s.parse().unwrap() }

    #[test]
    fn test_missing_credential() {
        assert_eq!(gate().check(&HeaderMap::new(), &uri("/api/v1/orders")), Err(AdminDenied::MissingCredential));
        let blank = headers(&[("authorization", "Bearer ")]);
        assert_eq!(gate().check(&blank, &uri("/api/v1/orders?admin_token=")), Err(AdminDenied::MissingCredential));
    }

    #[test]
    fn test_bearer_header() {
        assert!(gate().is_authorized(&headers(&[("authorization", "Bearer letmein-123")]), &uri("/")));
        assert!(gate().is_authorized(&headers(&[("authorization", "bearer letmein-123")]), &uri("/")));
    }

    #[test]
    fn test_admin_token_header() {
        assert!(gate().is_authorized(&headers(&[("x-admin-token", TOKEN)]), &uri("/")));
    }

    #[test]
    fn test_query_parameter() {
        assert!(gate().is_authorized(&HeaderMap::new(), &uri("/api/v1/orders?page=2&admin_token=letmein-123")));
        assert!(gate().is_authorized(&HeaderMap::new(), &uri("/api/v1/orders?admin_token=letmein%2D123")));
    }

    #[test]
    fn test_repeated_query_parameter() {
        let h = HeaderMap::new();
        assert!(gate().is_authorized(&h, &uri("/api/v1/orders?admin_token=x&admin_token=letmein-123")));
        assert_eq!(gate().check(&h, &uri("/api/v1/orders?admin_token=x&admin_token=y")), Err(AdminDenied::InvalidCredential));
    }

    #[test]
    fn test_wrong_token_same_length() {
        let wrong = "letmein-124";
        assert_eq!(wrong.len(), TOKEN.len());
        let h = headers(&[("authorization", "Bearer letmein-124")]);
        assert_eq!(gate().check(&h, &uri("/")), Err(AdminDenied::InvalidCredential));
        assert_eq!(gate().check(&HeaderMap::new(), &uri("/?admin_token=letmein-124")), Err(AdminDenied::InvalidCredential));
    }

    #[test]
    fn test_wrong_token_other_length() {
        let h = headers(&[("authorization", "Bearer letmein")]);
        assert_eq!(gate().check(&h, &uri("/")), Err(AdminDenied::InvalidCredential));
    }

    #[test]
    fn test_rejections_share_status() {
        assert_eq!(AdminDenied::MissingCredential.into_response().status(), StatusCode::FORBIDDEN);
        assert_eq!(AdminDenied::InvalidCredential.into_response().status(), StatusCode::FORBIDDEN);
    }
}
