//! Rate limiting middleware
//!
//! Fixed window counter per client IP. Each window starts when the first
//! request arrives and resets after the configured duration. Fixed windows
//! admit up to 2x the limit across a window boundary; that is acceptable for
//! this surface.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::Json;
use axum::extract::{ConnectInfo, Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;

use crate::core::constants::RATE_LIMIT_MAX_TRACKED_CLIENTS;

/// Rate limit check result
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    pub limit: u32,
    /// Unix timestamp when the window resets
    pub reset_at: u64,
    /// Seconds until retry (only if blocked)
    pub retry_after: Option<u64>,
}

#[derive(Debug)]
struct Window {
    started: u64,
    count: u32,
}

/// Fixed-window rate limiter over in-process counters
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window_secs: u64,
    max_requests: u32,
}

impl RateLimiter {
    pub fn new(window_secs: u64, max_requests: u32) -> Self {
        Self {
            windows: DashMap::new(),
            window_secs,
            max_requests,
        }
    }

    /// Check and count one request for `key`
    pub fn check(&self, key: &str) -> RateLimitResult {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_else(|e| {
                tracing::error!(error = %e, "System clock is before UNIX epoch");
                0
            });
        self.check_at(key, now)
    }

    fn check_at(&self, key: &str, now: u64) -> RateLimitResult {
        if self.windows.len() > RATE_LIMIT_MAX_TRACKED_CLIENTS {
            let window_secs = self.window_secs;
            self.windows
                .retain(|_, w| now < w.started + window_secs);
        }

        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window {
                started: now,
                count: 0,
            });

        if now >= entry.started + self.window_secs {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        let reset_at = entry.started + self.window_secs;
        let allowed = entry.count <= self.max_requests;

        RateLimitResult {
            allowed,
            remaining: self.max_requests.saturating_sub(entry.count),
            limit: self.max_requests,
            reset_at,
            retry_after: if allowed {
                None
            } else {
                Some(reset_at.saturating_sub(now))
            },
        }
    }
}

/// Rate limit middleware state
#[derive(Clone)]
pub struct RateLimitState {
    pub limiter: Arc<RateLimiter>,
}

/// Rate limit exceeded response
pub struct RateLimitExceeded(RateLimitResult);

impl IntoResponse for RateLimitExceeded {
    fn into_response(self) -> Response {
        let r = &self.0;
        let body = serde_json::json!({
            "success": false,
            "error": "rate_limited",
            "message": "Rate limit exceeded",
        });

        let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
        add_rate_limit_headers(&mut response, r);
        if let Ok(v) = HeaderValue::from_str(&r.retry_after.unwrap_or(60).to_string()) {
            response.headers_mut().insert(header::RETRY_AFTER, v);
        }
        response
    }
}

/// Add rate limit headers to a response
fn add_rate_limit_headers(response: &mut Response, result: &RateLimitResult) {
    let headers = response.headers_mut();
    if let Ok(v) = HeaderValue::from_str(&result.limit.to_string()) {
        headers.insert("X-RateLimit-Limit", v);
    }
    if let Ok(v) = HeaderValue::from_str(&result.remaining.to_string()) {
        headers.insert("X-RateLimit-Remaining", v);
    }
    if let Ok(v) = HeaderValue::from_str(&result.reset_at.to_string()) {
        headers.insert("X-RateLimit-Reset", v);
    }
}

/// Prefer X-Forwarded-For (first hop) for proxied requests
fn client_key(request: &Request, addr: SocketAddr) -> String {
    request
        .headers()
        .get("X-Forwarded-For")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .map(|s| s.trim().to_string())
        .unwrap_or_else(|| addr.ip().to_string())
}

/// Rate limiting middleware function
pub async fn rate_limit_middleware(
    State(state): State<RateLimitState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request,
    next: Next,
) -> Response {
    let key = client_key(&request, addr);
    let result = state.limiter.check(&key);

    if !result.allowed {
        tracing::debug!(%key, "Rate limit exceeded");
        return RateLimitExceeded(result).into_response();
    }

    let mut response = next.run(request).await;
    add_rate_limit_headers(&mut response, &result);
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = RateLimiter::new(60, 3);

        for _ in 0..3 {
            assert!(limiter.check_at("10.0.0.1", 100).allowed);
        }
        let blocked = limiter.check_at("10.0.0.1", 100);
        assert!(!blocked.allowed);
        assert_eq!(blocked.remaining, 0);
        assert_eq!(blocked.retry_after, Some(60));
    }

    #[test]
    fn window_reset_admits_again() {
        let limiter = RateLimiter::new(60, 1);

        assert!(limiter.check_at("10.0.0.1", 100).allowed);
        assert!(!limiter.check_at("10.0.0.1", 159).allowed);
        assert!(limiter.check_at("10.0.0.1", 160).allowed);
    }

    #[test]
    fn clients_are_counted_independently() {
        let limiter = RateLimiter::new(60, 1);

        assert!(limiter.check_at("10.0.0.1", 100).allowed);
        assert!(limiter.check_at("10.0.0.2", 100).allowed);
        assert!(!limiter.check_at("10.0.0.1", 101).allowed);
    }

    #[test]
    fn rate_limit_exceeded_response() {
        let result = RateLimitResult {
            allowed: false,
            remaining: 0,
            limit: 100,
            reset_at: 1705593600,
            retry_after: Some(45),
        };
        let response = RateLimitExceeded(result).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(
            response.headers().get("X-RateLimit-Limit").unwrap(),
            "100"
        );
        assert_eq!(response.headers().get("Retry-After").unwrap(), "45");
    }
}
