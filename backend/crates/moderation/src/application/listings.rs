//! Read-only admin listings

use std::collections::HashMap;
use std::sync::Arc;

use auth::domain::entity::banned_email::BannedEmail;
use auth::domain::repository::{BannedEmailRepository, UserRepository};
use catalog::domain::course::Course;
use catalog::domain::repository::{CourseRepository, ProfileRepository};
use chrono::{DateTime, Utc};
use kernel::id::{CourseId, UserId};
use serde::Serialize;

use crate::error::ModerationResult;

/// User row without the password hash
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserSummary {
    pub id: UserId,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrolledUser {
    pub name: String,
    pub email: String,
    pub profile_image: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseEnrollment {
    pub course: Course,
    pub enrolled_users: Vec<EnrolledUser>,
}

pub struct ListUsersUseCase<U: UserRepository> {
    user_repo: Arc<U>,
}

impl<U: UserRepository> ListUsersUseCase<U> {
    pub fn new(user_repo: Arc<U>) -> Self {
        Self { user_repo }
    }

    pub async fn execute(&self) -> ModerationResult<Vec<UserSummary>> {
        let users = self.user_repo.list_users().await?;
        Ok(users
            .into_iter()
            .map(|u| UserSummary {
                id: u.user_id,
                email: u.email.into_inner(),
                created_at: u.created_at,
            })
            .collect())
    }
}

pub struct ListBansUseCase<B: BannedEmailRepository> {
    ban_repo: Arc<B>,
}

impl<B: BannedEmailRepository> ListBansUseCase<B> {
    pub fn new(ban_repo: Arc<B>) -> Self {
        Self { ban_repo }
    }

    pub async fn execute(&self) -> ModerationResult<Vec<BannedEmail>> {
        Ok(self.ban_repo.list_bans().await?)
    }
}

/// Profiles grouped under the course they selected
///
/// Every course appears, with an empty list when nobody selected it.
/// Profiles pointing at deleted courses are left out.
pub struct CoursesWithUsersUseCase<C, P>
where
    C: CourseRepository,
    P: ProfileRepository,
{
    course_repo: Arc<C>,
    profile_repo: Arc<P>,
}

impl<C, P> CoursesWithUsersUseCase<C, P>
where
    C: CourseRepository,
    P: ProfileRepository,
{
    pub fn new(course_repo: Arc<C>, profile_repo: Arc<P>) -> Self {
        Self {
            course_repo,
            profile_repo,
        }
    }

    pub async fn execute(&self) -> ModerationResult<Vec<CourseEnrollment>> {
        let courses = self.course_repo.list_courses().await?;
        let profiles = self.profile_repo.list_profiles().await?;

        let mut by_course: HashMap<CourseId, Vec<EnrolledUser>> = HashMap::new();
        for profile in profiles {
            if let Some(course_id) = profile.selected_course {
                by_course.entry(course_id).or_default().push(EnrolledUser {
                    name: profile.name,
                    email: profile.email.into_inner(),
                    profile_image: profile.profile_image,
                });
            }
        }

        Ok(courses
            .into_iter()
            .map(|course| CourseEnrollment {
                enrolled_users: by_course.remove(&course.id).unwrap_or_default(),
                course,
            })
            .collect())
    }
}
