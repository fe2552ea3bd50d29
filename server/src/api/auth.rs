//! Bearer-credential middleware
//!
//! Every non-health endpoint requires `Authorization: Bearer <secret>`
//! matching the server-configured secret. The comparison is constant-time.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header;
use axum::middleware::Next;
use axum::response::Response;
use subtle::ConstantTimeEq;

use super::types::ApiError;

/// Shared auth state for the middleware
#[derive(Clone)]
pub struct AuthState {
    /// None when the server operator never configured a secret; requests
    /// then fail with a configuration error rather than an auth error.
    pub bearer_secret: Option<Arc<str>>,
}

/// Authentication middleware
pub async fn require_bearer(
    State(state): State<AuthState>,
    request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let Some(secret) = state.bearer_secret.as_deref() else {
        tracing::error!("Bearer secret is not configured; rejecting request");
        return Err(ApiError::configuration(
            "API credential is not configured on the server",
        ));
    };

    let token = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ApiError::unauthorized("Missing or malformed Authorization header"))?;

    if bool::from(token.as_bytes().ct_eq(secret.as_bytes())) {
        Ok(next.run(request).await)
    } else {
        Err(ApiError::unauthorized("Invalid API credential"))
    }
}

#[cfg(test)]
mod tests {
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use tower::ServiceExt;

    use super::*;

    fn app(secret: Option<&str>) -> Router {
        let state = AuthState {
            bearer_secret: secret.map(Arc::from),
        };
        Router::new()
            .route("/protected", get(|| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(state, require_bearer))
    }

    async fn status_for(app: Router, auth_header: Option<&str>) -> StatusCode {
        let mut builder = Request::builder().uri("/protected");
        if let Some(value) = auth_header {
            builder = builder.header("authorization", value);
        }
        let request = builder.body(Body::empty()).unwrap();
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn accepts_the_configured_secret() {
        let status = status_for(app(Some("s3cret")), Some("Bearer s3cret")).await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn rejects_a_wrong_secret() {
        let status = status_for(app(Some("s3cret")), Some("Bearer nope")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_a_missing_header() {
        let status = status_for(app(Some("s3cret")), None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn rejects_a_malformed_header() {
        let status = status_for(app(Some("s3cret")), Some("Basic s3cret")).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unconfigured_secret_is_a_server_error() {
        let status = status_for(app(None), Some("Bearer anything")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }
}
