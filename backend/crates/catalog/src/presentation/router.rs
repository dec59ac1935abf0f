//! Catalog Router
//!
//! Course reads are public; course writes need an admin session. Profile
//! routes need any session and go through the ban-checking middleware; the
//! handlers also refuse a banned target email.

use std::sync::Arc;

use auth::{AuthStore, PgAuthRepository, SessionGuard, require_admin, require_session};
use axum::extract::DefaultBodyLimit;
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::application::config::CatalogConfig;
use crate::domain::repository::CatalogStore;
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState};

/// Create the Catalog router with PostgreSQL repositories
pub fn catalog_router(
    repo: PgCatalogRepository,
    guard: SessionGuard<PgAuthRepository>,
    config: Arc<CatalogConfig>,
) -> Router {
    catalog_router_generic(repo, guard, config)
}

/// Create a generic Catalog router for any repository implementation
pub fn catalog_router_generic<R, A>(
    repo: R,
    guard: SessionGuard<A>,
    config: Arc<CatalogConfig>,
) -> Router
where
    R: CatalogStore,
    A: AuthStore,
{
    let state = CatalogAppState {
        repo: Arc::new(repo),
        auth: guard.repo.clone(),
        uploads: Arc::new(config.upload_store()),
        config: config.clone(),
    };

    let admin = middleware::from_fn_with_state(guard.clone(), require_admin::<A>);
    let session = middleware::from_fn_with_state(guard, require_session::<A>);

    Router::new()
        .route(
            "/courses",
            get(handlers::list_courses::<R, A>)
                .merge(post(handlers::create_course::<R, A>).route_layer(admin.clone())),
        )
        .route(
            "/courses/{id}",
            get(handlers::get_course::<R, A>).merge(
                put(handlers::update_course::<R, A>)
                    .delete(handlers::delete_course::<R, A>)
                    .route_layer(admin),
            ),
        )
        .route("/course/{id}", get(handlers::get_course::<R, A>))
        .route(
            "/profile",
            get(handlers::get_profile::<R, A>)
                .post(handlers::create_profile::<R, A>)
                .put(handlers::update_profile::<R, A>)
                .route_layer(session),
        )
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .with_state(state)
}
