//! Course Use Cases
//!
//! Reads are public. Writes replace whole documents: `update` overwrites the
//! scalar fields and the full section tree, so two concurrent updates resolve
//! as last writer wins.

use std::sync::Arc;

use kernel::id::CourseId;

use crate::domain::course::{Course, CourseDraft};
use crate::domain::repository::CourseRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct CourseService<C>
where
    C: CourseRepository,
{
    course_repo: Arc<C>,
}

impl<C> CourseService<C>
where
    C: CourseRepository,
{
    pub fn new(course_repo: Arc<C>) -> Self {
        Self { course_repo }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Course>> {
        self.course_repo.list_courses().await
    }

    pub async fn get(&self, id: &CourseId) -> CatalogResult<Course> {
        self.course_repo
            .find_course(id)
            .await?
            .ok_or(CatalogError::CourseNotFound)
    }

    pub async fn create(&self, draft: CourseDraft) -> CatalogResult<Course> {
        let course = Course::create(draft)?;
        self.course_repo.insert_course(&course).await?;

        tracing::info!(course_id = %course.id, title = %course.title, "Course created");

        Ok(course)
    }

    pub async fn update(&self, id: &CourseId, draft: CourseDraft) -> CatalogResult<Course> {
        let mut course = self.get(id).await?;
        course.replace_with(draft)?;

        // Deleted between the read and the write
        if !self.course_repo.replace_course(&course).await? {
            return Err(CatalogError::CourseNotFound);
        }

        tracing::info!(
            course_id = %course.id,
            sections = course.sections.len(),
            "Course replaced"
        );

        Ok(course)
    }

    /// Profiles that selected the course keep the dangling reference
    pub async fn delete(&self, id: &CourseId) -> CatalogResult<()> {
        if !self.course_repo.delete_course(id).await? {
            return Err(CatalogError::CourseNotFound);
        }

        tracing::info!(course_id = %id, "Course deleted");
        Ok(())
    }
}

/// Parse a path or form course id; anything that is not a UUID names no course
pub fn parse_course_id(raw: &str) -> Option<CourseId> {
    raw.parse().ok()
}
