//! Catalog Backend Module
//!
//! Course content and learner profiles.
//!
//! Clean Architecture structure:
//! - `domain/` - Course tree, profile, repository traits
//! - `application/` - Course and profile services, configuration
//! - `infra/` - PostgreSQL and in-memory implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! Courses are stored as whole documents: an update replaces the scalar
//! fields and the full section tree (last writer wins). Profiles are created
//! lazily on first read.

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::config::CatalogConfig;
pub use application::profile_gateway::CatalogProfiles;
pub use domain::repository::CatalogStore;
pub use error::{CatalogError, CatalogResult};
pub use infra::memory::InMemoryCatalogRepository;
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::{catalog_router, catalog_router_generic};
