//! UserHub Server — HTTP transport over the identity workflow.
//!
//! Handlers only decode requests, pull the bearer token out of the
//! `Authorization` header and map [`UserHubError`]s to status codes;
//! all rules live in `userhub-auth`.
//!
//! [`UserHubError`]: userhub_core::error::UserHubError

pub mod config;
pub mod error;
pub mod handlers;

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::{get, post};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use userhub_auth::IdentityService;
use userhub_core::repository::AccountRepository;

/// State shared by every handler.
pub struct AppState<R: AccountRepository> {
    pub identity: Arc<IdentityService<R>>,
}

impl<R: AccountRepository> Clone for AppState<R> {
    fn clone(&self) -> Self {
        Self {
            identity: Arc::clone(&self.identity),
        }
    }
}

impl<R: AccountRepository> AppState<R> {
    pub fn new(identity: IdentityService<R>) -> Self {
        Self {
            identity: Arc::new(identity),
        }
    }
}

/// Build the application router.
///
/// Every request is bounded by `request_timeout`; dropping the handler
/// future cancels in-flight store and key-file calls.
pub fn router<R>(state: AppState<R>, request_timeout: Duration) -> Router
where
    R: AccountRepository + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .route(
            "/profile",
            get(handlers::get_profile::<R>).patch(handlers::update_profile::<R>),
        )
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
