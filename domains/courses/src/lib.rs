//! Courses domain: course and chapter authoring, attachments, categories,
//! chapter video lifecycle

pub mod api;
pub mod domain;
pub mod repository;

// Re-export domain types at the crate root for convenience
pub use domain::entities::{Attachment, Category, Chapter, Course, MuxData};
pub use domain::readiness::{
    chapter_readiness, course_readiness, Readiness, ReadinessReport, Requirement,
};
pub use domain::reorder::{
    current_positions, resolve_move, validate_assignments, PositionAssignment,
};
pub use domain::state::{StateError, VideoEvent, VideoState, VideoStateMachine};

// Re-export repository types
pub use repository::{
    AttachmentRepository, CategoryRepository, ChapterRepository, CourseRepository,
    CoursesRepositories, MuxDataRepository,
};

// Re-export API types
pub use api::routes;
pub use api::CoursesState;
