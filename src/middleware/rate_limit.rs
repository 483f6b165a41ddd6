use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use governor::{DefaultDirectRateLimiter, Quota, RateLimiter};
use std::num::NonZeroU32;
use std::sync::Arc;
use tracing::warn;

use crate::config::RateLimitConfig;
use crate::error::NaviconomyError;

const RATE_LIMITED: &str = "Rate limit exceeded.";

/// Process-wide quotas per route group. `None` means unlimited.
#[derive(Clone, Default)]
pub struct RateLimits {
    register: Option<Arc<DefaultDirectRateLimiter>>,
    requests: Option<Arc<DefaultDirectRateLimiter>>,
}

impl RateLimits {
    pub fn from_config(cfg: &RateLimitConfig) -> Self {
        if !cfg.enabled {
            return Self::disabled();
        }
        Self {
            register: NonZeroU32::new(cfg.register_per_hour)
                .map(|n| Arc::new(RateLimiter::direct(Quota::per_hour(n)))),
            requests: NonZeroU32::new(cfg.requests_per_minute)
                .map(|n| Arc::new(RateLimiter::direct(Quota::per_minute(n)))),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }
}

fn check(limiter: Option<&DefaultDirectRateLimiter>, group: &str) -> Result<(), NaviconomyError> {
    match limiter {
        Some(l) if l.check().is_err() => {
            warn!(group, "rate limit exceeded");
            Err(NaviconomyError::RateLimited(RATE_LIMITED.to_string()))
        }
        _ => Ok(()),
    }
}

pub async fn limit_registration(
    State(limits): State<RateLimits>,
    req: Request,
    next: Next,
) -> Result<Response, NaviconomyError> {
    check(limits.register.as_deref(), "register")?;
    Ok(next.run(req).await)
}

pub async fn limit_requests(
    State(limits): State<RateLimits>,
    req: Request,
    next: Next,
) -> Result<Response, NaviconomyError> {
    check(limits.requests.as_deref(), "resources")?;
    Ok(next.run(req).await)
}
