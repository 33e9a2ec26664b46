//! Session authentication middleware
//!
//! Sessions are issued by an external identity provider which writes opaque
//! tokens to the `sessions` table; this middleware only validates them. The
//! resolved identity is threaded to handlers as an `Extension<CurrentUser>`
//! rather than ambient state.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::db::sessions;
use crate::error::{AppError, ErrorCode};
use crate::state::AppState;
use crate::util::now_millis;

/// Authenticated user attached to every protected request
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub id: String,
    pub name: String,
    pub email: String,
}

const SESSION_COOKIE: &str = "session_token";

/// Token from `Authorization: Bearer <token>`, falling back to the
/// `session_token` cookie
fn extract_token(request: &Request) -> Option<String> {
    if let Some(bearer) = request
        .headers()
        .get(http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
    {
        return Some(bearer.to_string());
    }

    request
        .headers()
        .get(http::header::COOKIE)
        .and_then(|v| v.to_str().ok())
        .and_then(|cookies| {
            cookies.split(';').find_map(|pair| {
                let (name, value) = pair.trim().split_once('=')?;
                (name == SESSION_COOKIE).then(|| value.to_string())
            })
        })
}

/// Middleware that resolves the session token to a user and rejects
/// unauthenticated requests with a 401 envelope
pub async fn session_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_token(&request)
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    let session = sessions::find_user_by_token(&state.pool, &token)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Session lookup failed");
            AppError::new(ErrorCode::InternalError).into_response()
        })?
        .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated).into_response())?;

    if session.expires_at <= now_millis() {
        return Err(AppError::new(ErrorCode::SessionExpired).into_response());
    }

    request.extensions_mut().insert(CurrentUser {
        id: session.user_id,
        name: session.name,
        email: session.email,
    });

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with_header(name: http::HeaderName, value: &str) -> Request {
        Request::builder()
            .header(name, value)
            .body(Body::empty())
            .unwrap()
    }

    #[test]
    fn test_bearer_token_extraction() {
        let req = request_with_header(http::header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(extract_token(&req).as_deref(), Some("abc123"));
    }

    #[test]
    fn test_cookie_token_extraction() {
        let req = request_with_header(
            http::header::COOKIE,
            "theme=dark; session_token=tok-42; lang=en",
        );
        assert_eq!(extract_token(&req).as_deref(), Some("tok-42"));
    }

    #[test]
    fn test_missing_token() {
        let req = Request::builder().body(Body::empty()).unwrap();
        assert!(extract_token(&req).is_none());

        let req = request_with_header(http::header::AUTHORIZATION, "Basic abc");
        assert!(extract_token(&req).is_none());

        let req = request_with_header(http::header::COOKIE, "other_cookie=x");
        assert!(extract_token(&req).is_none());
    }
}
