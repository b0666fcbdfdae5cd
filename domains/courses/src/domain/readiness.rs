//! Publish readiness
//!
//! One evaluator backs both the publish guards and the progress report
//! returned by the read endpoints, so the two never disagree on which
//! fields are required.

use serde::Serialize;

use coursecraft_common::{Error, Result};

use crate::domain::entities::{Chapter, Course, MuxData};

/// A single required field and whether it is satisfied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Requirement {
    pub name: &'static str,
    pub satisfied: bool,
}

/// Result of checking an entity's required fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Readiness {
    requirements: Vec<Requirement>,
}

/// Serializable progress report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReadinessReport {
    pub completed: usize,
    pub total: usize,
    pub percentage: u8,
    pub is_complete: bool,
    pub missing: Vec<String>,
    pub summary: String,
}

impl Readiness {
    pub fn new(requirements: Vec<Requirement>) -> Self {
        Self { requirements }
    }

    pub fn completed(&self) -> usize {
        self.requirements.iter().filter(|r| r.satisfied).count()
    }

    pub fn total(&self) -> usize {
        self.requirements.len()
    }

    /// Names of unsatisfied requirements, in declaration order
    pub fn missing(&self) -> Vec<&'static str> {
        self.requirements
            .iter()
            .filter(|r| !r.satisfied)
            .map(|r| r.name)
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.requirements.iter().all(|r| r.satisfied)
    }

    /// Completion percentage, rounded down
    pub fn percentage(&self) -> u8 {
        if self.requirements.is_empty() {
            return 100;
        }
        ((self.completed() * 100) / self.total()) as u8
    }

    /// e.g. `4/6 fields completed (66%)`
    pub fn summary(&self) -> String {
        format!(
            "{}/{} fields completed ({}%)",
            self.completed(),
            self.total(),
            self.percentage()
        )
    }

    pub fn report(&self) -> ReadinessReport {
        ReadinessReport {
            completed: self.completed(),
            total: self.total(),
            percentage: self.percentage(),
            is_complete: self.is_complete(),
            missing: self.missing().into_iter().map(str::to_string).collect(),
            summary: self.summary(),
        }
    }

    /// Fail with `BadRequest` naming the missing requirements
    pub fn ensure_complete(&self, subject: &str) -> Result<()> {
        if self.is_complete() {
            return Ok(());
        }
        Err(Error::BadRequest(format!(
            "{} cannot be published, missing: {}",
            subject,
            self.missing().join(", ")
        )))
    }
}

fn present(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// Course requirements: title, description, image, price, category and at
/// least one published chapter
pub fn course_readiness(course: &Course, chapters: &[Chapter]) -> Readiness {
    Readiness::new(vec![
        Requirement {
            name: "title",
            satisfied: present(Some(&course.title)),
        },
        Requirement {
            name: "description",
            satisfied: present(course.description.as_deref()),
        },
        Requirement {
            name: "image",
            satisfied: present(course.image_url.as_deref()),
        },
        Requirement {
            name: "price",
            satisfied: course.price.is_some(),
        },
        Requirement {
            name: "category",
            satisfied: course.category_id.is_some(),
        },
        Requirement {
            name: "published chapter",
            satisfied: chapters.iter().any(|c| c.is_published),
        },
    ])
}

/// Chapter requirements: title, description and video
pub fn chapter_readiness(chapter: &Chapter) -> Readiness {
    Readiness::new(vec![
        Requirement {
            name: "title",
            satisfied: present(Some(&chapter.title)),
        },
        Requirement {
            name: "description",
            satisfied: present(chapter.description.as_deref()),
        },
        Requirement {
            name: "video",
            satisfied: present(chapter.video_url.as_deref()),
        },
    ])
}

/// Publish gate for a chapter: the readiness fields plus a processed video
pub fn ensure_chapter_publishable(chapter: &Chapter, mux_data: Option<&MuxData>) -> Result<()> {
    let mut requirements = chapter_readiness(chapter).requirements;
    requirements.push(Requirement {
        name: "video processing",
        satisfied: mux_data.is_some(),
    });
    Readiness::new(requirements).ensure_complete("Chapter")
}

/// Publish gate for a course
pub fn ensure_course_publishable(course: &Course, chapters: &[Chapter]) -> Result<()> {
    course_readiness(course, chapters).ensure_complete("Course")
}
