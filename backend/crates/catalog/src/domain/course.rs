//! Course Entity
//!
//! A course owns an ordered tree: sections hold chapters, chapters hold
//! sub-chapters. Child order is display order and is stored verbatim.

use chrono::{DateTime, Utc};
use kernel::id::CourseId;
use serde::{Deserialize, Serialize};

use crate::error::{CatalogError, CatalogResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubChapter {
    #[serde(default)]
    pub sub_title: String,
    /// Video link
    #[serde(default)]
    pub sub_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(default)]
    pub chapter_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chapter_content: Option<String>,
    #[serde(default)]
    pub sub_chapters: Vec<SubChapter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    #[serde(default)]
    pub section_title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub chapters: Vec<Chapter>,
}

/// Client-supplied course content, used for both create and replace
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CourseDraft {
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub teacher_id: Option<String>,
    /// Instructor display name
    pub name: Option<String>,
    pub sections: Vec<Section>,
}

impl CourseDraft {
    /// Check required fields across the whole tree
    ///
    /// Paths in messages use the JSON field names, e.g.
    /// `sections[0].chapters[2].subUrl is required`.
    pub fn validate(&self) -> CatalogResult<()> {
        require(&self.title, "title")?;
        require(&self.description, "description")?;
        require(&self.category, "category")?;

        for (s, section) in self.sections.iter().enumerate() {
            require(&section.section_title, &format!("sections[{s}].sectionTitle"))?;

            for (c, chapter) in section.chapters.iter().enumerate() {
                let path = format!("sections[{s}].chapters[{c}]");
                require(&chapter.chapter_title, &format!("{path}.chapterTitle"))?;

                for (i, sub) in chapter.sub_chapters.iter().enumerate() {
                    let path = format!("{path}.subChapters[{i}]");
                    require(&sub.sub_title, &format!("{path}.subTitle"))?;
                    require(&sub.sub_url, &format!("{path}.subUrl"))?;
                }
            }
        }

        Ok(())
    }
}

fn require(value: &str, field: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    pub title: String,
    pub description: String,
    pub category: String,
    pub image: Option<String>,
    pub teacher_id: Option<String>,
    pub name: Option<String>,
    pub sections: Vec<Section>,
    pub enrollments: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    /// New course from a validated draft
    pub fn create(draft: CourseDraft) -> CatalogResult<Self> {
        draft.validate()?;
        let now = Utc::now();

        Ok(Self {
            id: CourseId::new(),
            title: draft.title,
            description: draft.description,
            category: draft.category,
            image: non_blank(draft.image),
            teacher_id: non_blank(draft.teacher_id),
            name: non_blank(draft.name),
            sections: draft.sections,
            enrollments: 0,
            created_at: now,
            updated_at: now,
        })
    }

    /// Whole-document replace; id, enrollments and createdAt survive
    pub fn replace_with(&mut self, draft: CourseDraft) -> CatalogResult<()> {
        draft.validate()?;

        self.title = draft.title;
        self.description = draft.description;
        self.category = draft.category;
        self.image = non_blank(draft.image);
        self.teacher_id = non_blank(draft.teacher_id);
        self.name = non_blank(draft.name);
        self.sections = draft.sections;
        self.updated_at = Utc::now();

        Ok(())
    }
}
