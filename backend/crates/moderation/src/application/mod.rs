//! Application Layer

pub mod ban_user;
pub mod listings;
pub mod unban_user;

// Re-exports
pub use ban_user::BanUserUseCase;
pub use listings::{
    CourseEnrollment, CoursesWithUsersUseCase, EnrolledUser, ListBansUseCase, ListUsersUseCase,
    UserSummary,
};
pub use unban_user::UnbanUserUseCase;
