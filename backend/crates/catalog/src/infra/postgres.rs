//! PostgreSQL Repository Implementations
//!
//! A course is one row; its section tree is a JSONB array stored and
//! returned verbatim.

use auth::Email;
use chrono::{DateTime, Utc};
use kernel::id::{CourseId, ProfileId};
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use crate::domain::course::{Course, Section};
use crate::domain::profile::Profile;
use crate::domain::repository::{CourseRepository, ProfileRepository};
use crate::error::{CatalogError, CatalogResult};

/// PostgreSQL-backed catalog repository
#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// ============================================================================
// Course Repository Implementation
// ============================================================================

const COURSE_COLUMNS: &str = "id, title, description, category, image, teacher_id, name, \
                              sections, enrollments, created_at, updated_at";

impl CourseRepository for PgCatalogRepository {
    async fn list_courses(&self) -> CatalogResult<Vec<Course>> {
        let rows = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses ORDER BY created_at"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(CourseRow::into_course).collect())
    }

    async fn find_course(&self, id: &CourseId) -> CatalogResult<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(CourseRow::into_course))
    }

    async fn insert_course(&self, course: &Course) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO courses (
                id,
                title,
                description,
                category,
                image,
                teacher_id,
                name,
                sections,
                enrollments,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(&course.image)
        .bind(&course.teacher_id)
        .bind(&course.name)
        .bind(Json(&course.sections))
        .bind(course.enrollments)
        .bind(course.created_at)
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn replace_course(&self, course: &Course) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE courses SET
                title = $2,
                description = $3,
                category = $4,
                image = $5,
                teacher_id = $6,
                name = $7,
                sections = $8,
                updated_at = $9
            WHERE id = $1
            "#,
        )
        .bind(course.id.as_uuid())
        .bind(&course.title)
        .bind(&course.description)
        .bind(&course.category)
        .bind(&course.image)
        .bind(&course.teacher_id)
        .bind(&course.name)
        .bind(Json(&course.sections))
        .bind(course.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_course(&self, id: &CourseId) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }
}

// ============================================================================
// Profile Repository Implementation
// ============================================================================

impl ProfileRepository for PgCatalogRepository {
    async fn find_profile(&self, email: &Email) -> CatalogResult<Option<Profile>> {
        let row = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, name, selected_course, profile_image, created_at, updated_at
            FROM profiles
            WHERE email = $1
            "#,
        )
        .bind(email.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn insert_profile_if_absent(&self, profile: &Profile) -> CatalogResult<Profile> {
        sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, name, selected_course, profile_image, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (email) DO NOTHING
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.email.as_str())
        .bind(&profile.name)
        .bind(profile.selected_course.map(CourseId::into_uuid))
        .bind(&profile.profile_image)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        self.find_profile(&profile.email)
            .await?
            .ok_or_else(|| CatalogError::Internal("profile vanished after insert".to_string()))
    }

    async fn insert_profile(&self, profile: &Profile) -> CatalogResult<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO profiles (
                id, email, name, selected_course, profile_image, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(profile.id.as_uuid())
        .bind(profile.email.as_str())
        .bind(&profile.name)
        .bind(profile.selected_course.map(CourseId::into_uuid))
        .bind(&profile.profile_image)
        .bind(profile.created_at)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(CatalogError::ProfileExists)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn update_profile(&self, profile: &Profile) -> CatalogResult<bool> {
        let updated = sqlx::query(
            r#"
            UPDATE profiles SET
                name = $2,
                selected_course = $3,
                profile_image = $4,
                updated_at = $5
            WHERE email = $1
            "#,
        )
        .bind(profile.email.as_str())
        .bind(&profile.name)
        .bind(profile.selected_course.map(CourseId::into_uuid))
        .bind(&profile.profile_image)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?
        .rows_affected();

        Ok(updated > 0)
    }

    async fn delete_profile(&self, email: &Email) -> CatalogResult<bool> {
        let deleted = sqlx::query("DELETE FROM profiles WHERE email = $1")
            .bind(email.as_str())
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(deleted > 0)
    }

    async fn list_profiles(&self) -> CatalogResult<Vec<Profile>> {
        let rows = sqlx::query_as::<_, ProfileRow>(
            r#"
            SELECT id, email, name, selected_course, profile_image, created_at, updated_at
            FROM profiles
            ORDER BY created_at
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ProfileRow::into_profile).collect())
    }
}

// ============================================================================
// Row Types for sqlx mapping
// ============================================================================

#[derive(sqlx::FromRow)]
struct CourseRow {
    id: Uuid,
    title: String,
    description: String,
    category: String,
    image: Option<String>,
    teacher_id: Option<String>,
    name: Option<String>,
    sections: Json<Vec<Section>>,
    enrollments: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl CourseRow {
    fn into_course(self) -> Course {
        Course {
            id: CourseId::from_uuid(self.id),
            title: self.title,
            description: self.description,
            category: self.category,
            image: self.image,
            teacher_id: self.teacher_id,
            name: self.name,
            sections: self.sections.0,
            enrollments: self.enrollments,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    name: String,
    selected_course: Option<Uuid>,
    profile_image: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> Profile {
        Profile {
            id: ProfileId::from_uuid(self.id),
            email: Email::from_db(self.email),
            name: self.name,
            selected_course: self.selected_course.map(CourseId::from_uuid),
            profile_image: self.profile_image,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
