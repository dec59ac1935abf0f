//! Profile Entity

use auth::Email;
use chrono::{DateTime, Utc};
use kernel::id::{CourseId, ProfileId};

/// Display and preference record of one account
#[derive(Debug, Clone, PartialEq)]
pub struct Profile {
    pub id: ProfileId,
    pub email: Email,
    pub name: String,
    /// May dangle after the course is deleted
    pub selected_course: Option<CourseId>,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Profile {
    pub fn new(
        email: Email,
        name: impl Into<String>,
        selected_course: Option<CourseId>,
        profile_image: impl Into<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ProfileId::new(),
            email,
            name: name.into(),
            selected_course,
            profile_image: profile_image.into(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Apply an update; `None` keeps the current value
    pub fn apply(
        &mut self,
        name: String,
        selected_course: Option<CourseId>,
        profile_image: Option<String>,
    ) {
        self.name = name;
        if let Some(course) = selected_course {
            self.selected_course = Some(course);
        }
        if let Some(image) = profile_image {
            self.profile_image = image;
        }
        self.updated_at = Utc::now();
    }
}
