use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

use crate::auth::{AccountDirectory, AuthService, TokenService};
use crate::config::Config;
use crate::db::Database;
use crate::error::NaviconomyError;
use crate::handlers::{self, auth, brands, octanes, refills};
use crate::middleware::{RateLimits, limit_registration, limit_requests, require_active_user};
use crate::repository::Repositories;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct NaviconomyState {
    pub auth: Arc<AuthService>,
    pub repos: Repositories,
    pub limits: RateLimits,
}

impl NaviconomyState {
    /// Wire services from configuration. Fails on an unusable signing algorithm.
    pub fn new(db: Database, cfg: &Config) -> Result<Self, NaviconomyError> {
        let ttl = Duration::from_secs(cfg.auth.access_token_expire_minutes.saturating_mul(60));
        let tokens = TokenService::new(&cfg.auth.secret_key, cfg.auth.algorithm()?, ttl);
        Ok(Self::with_tokens(
            db,
            tokens,
            RateLimits::from_config(&cfg.rate_limit),
        ))
    }

    pub fn with_tokens(db: Database, tokens: TokenService, limits: RateLimits) -> Self {
        let accounts = AccountDirectory::new(db.clone());
        Self {
            auth: Arc::new(AuthService::new(accounts, tokens)),
            repos: Repositories::new(db),
            limits,
        }
    }
}

pub fn naviconomy_router(state: NaviconomyState) -> Router {
    let protected = Router::new()
        .route(
            "/brand/",
            get(brands::list_brands).post(brands::create_brand),
        )
        .route(
            "/brand/{id}",
            get(brands::read_brand)
                .put(brands::update_brand)
                .delete(brands::delete_brand),
        )
        .route(
            "/octane/",
            get(octanes::list_octanes).post(octanes::create_octane),
        )
        .route(
            "/octane/{id}",
            get(octanes::read_octane)
                .put(octanes::update_octane)
                .delete(octanes::delete_octane),
        )
        .route(
            "/refill/",
            get(refills::list_refills).post(refills::create_refill),
        )
        .route(
            "/refill/{id}",
            get(refills::read_refill)
                .put(refills::update_refill)
                .delete(refills::delete_refill),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_active_user,
        ))
        .route_layer(middleware::from_fn_with_state(
            state.limits.clone(),
            limit_requests,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route(
            "/auth/",
            post(auth::register).layer(middleware::from_fn_with_state(
                state.limits.clone(),
                limit_registration,
            )),
        )
        .route("/auth/token", post(auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
