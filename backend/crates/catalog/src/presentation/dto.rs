//! API DTOs (Data Transfer Objects)
//!
//! Courses serialize as-is (`Course` is already camelCase). Course request
//! bodies deserialize straight into `CourseDraft`.

use chrono::{DateTime, Utc};
use kernel::id::ProfileId;
use serde::{Deserialize, Serialize};

use crate::application::profile::ProfileView;
use crate::domain::course::Course;

/// `GET /profile?email=`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileQuery {
    pub email: Option<String>,
}

/// Profile with the selected course populated
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileResponse {
    pub id: ProfileId,
    pub email: String,
    pub name: String,
    /// `null` when unset or when the course was deleted
    pub selected_course: Option<Course>,
    pub profile_image: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProfileView> for ProfileResponse {
    fn from(view: ProfileView) -> Self {
        let profile = view.profile;
        Self {
            id: profile.id,
            email: profile.email.into_inner(),
            name: profile.name,
            selected_course: view.course,
            profile_image: profile.profile_image,
            created_at: profile.created_at,
            updated_at: profile.updated_at,
        }
    }
}
