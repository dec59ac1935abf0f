//! Application Layer
//!
//! Course and profile use cases.

pub mod config;
pub mod courses;
pub mod profile;
pub mod profile_gateway;

// Re-exports
pub use config::CatalogConfig;
pub use courses::CourseService;
pub use profile::{
    GetProfileUseCase, ImageUpload, ProfileFormRules, ProfileInput, ProfileView,
    SaveProfileUseCase,
};
pub use profile_gateway::CatalogProfiles;
