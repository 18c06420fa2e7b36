use axum::{
    extract::Request,
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::session::{Session, SessionUser};

/// Headers the identity-aware edge attaches after resolving the session
pub const USER_ID_HEADER: &str = "x-auth-user-id";
pub const USER_ROLE_HEADER: &str = "x-auth-role";
/// Set while the edge is still resolving the session
pub const PENDING_HEADER: &str = "x-auth-pending";

/// Builds the session from edge headers and injects it into the request.
///
/// This service only reads the already-resolved session; it never
/// authenticates. An absent user is a normal state, not an error.
pub async fn session_middleware(mut request: Request, next: Next) -> Response {
    let session = session_from_headers(request.headers());
    request.extensions_mut().insert(session);
    next.run(request).await
}

pub fn session_from_headers(headers: &HeaderMap) -> Session {
    let is_loading = headers
        .get(PENDING_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
        .unwrap_or(false);

    let user = match (header_str(headers, USER_ID_HEADER), header_str(headers, USER_ROLE_HEADER)) {
        (Some(id), Some(role)) => Some(SessionUser { id, role }),
        _ => None,
    };

    Session { user, is_loading }
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn no_headers_means_resolved_anonymous() {
        let session = session_from_headers(&HeaderMap::new());
        assert!(session.user.is_none());
        assert!(!session.is_loading);
    }

    #[test]
    fn pending_header_marks_session_loading() {
        let mut headers = HeaderMap::new();
        headers.insert(PENDING_HEADER, HeaderValue::from_static("1"));

        let session = session_from_headers(&headers);
        assert!(session.is_loading);
        assert!(!session.is_authenticated());
    }

    #[test]
    fn user_requires_both_id_and_role() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("u-7"));

        assert!(session_from_headers(&headers).user.is_none());

        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("admin"));
        let session = session_from_headers(&headers);
        let user = session.user.clone().expect("user extracted");
        assert_eq!(user.id, "u-7");
        assert_eq!(user.role, "admin");
        assert!(session.is_authenticated());
    }
}
