//! Moderation Router

use std::sync::Arc;

use auth::{AuthStore, PgAuthRepository, SessionGuard, require_admin};
use axum::{
    Router, middleware,
    routing::{delete, get, put},
};
use catalog::{CatalogStore, PgCatalogRepository};

use crate::presentation::handlers::{self, ModerationAppState};

/// Create the Moderation router with PostgreSQL repositories
pub fn moderation_router(
    auth_repo: PgAuthRepository,
    catalog_repo: PgCatalogRepository,
    guard: SessionGuard<PgAuthRepository>,
) -> Router {
    moderation_router_generic(auth_repo, catalog_repo, guard)
}

/// Create a generic Moderation router; every route requires an admin session
pub fn moderation_router_generic<A, C>(
    auth_repo: A,
    catalog_repo: C,
    guard: SessionGuard<A>,
) -> Router
where
    A: AuthStore,
    C: CatalogStore,
{
    let state = ModerationAppState {
        auth: Arc::new(auth_repo),
        catalog: Arc::new(catalog_repo),
    };

    Router::new()
        .route("/users", get(handlers::list_users::<A, C>))
        .route("/users/{id}", delete(handlers::ban_user::<A, C>))
        .route("/banned-users", get(handlers::list_banned::<A, C>))
        .route("/banned-users/{id}/unblock", put(handlers::unblock::<A, C>))
        .route(
            "/courses-with-users",
            get(handlers::courses_with_users::<A, C>),
        )
        .route_layer(middleware::from_fn_with_state(guard, require_admin::<A>))
        .with_state(state)
}
