//! Domain Layer

pub mod course;
pub mod profile;
pub mod repository;

pub use course::{Chapter, Course, CourseDraft, Section, SubChapter};
pub use profile::Profile;
pub use repository::{CatalogStore, CourseRepository, ProfileRepository};
