//! Repository implementations for the Courses domain

pub mod attachments;
pub mod categories;
pub mod chapters;
pub mod courses;
pub mod mux_data;
pub mod transactions;

use sqlx::{PgPool, Postgres, Transaction};

pub use attachments::AttachmentRepository;
pub use categories::CategoryRepository;
pub use chapters::ChapterRepository;
pub use courses::CourseRepository;
pub use mux_data::MuxDataRepository;
pub use transactions::{
    count_published_chapters_tx, create_chapter_tx, delete_chapter_tx, replace_video_url_tx,
    set_chapter_published_tx, unpublish_course_if_no_published_chapters_tx, unpublish_course_tx,
    update_chapter_positions_tx,
};

/// Combined repository access for the Courses domain
#[derive(Clone)]
pub struct CoursesRepositories {
    pool: PgPool,
    pub courses: CourseRepository,
    pub chapters: ChapterRepository,
    pub attachments: AttachmentRepository,
    pub categories: CategoryRepository,
    pub mux_data: MuxDataRepository,
}

impl CoursesRepositories {
    pub fn new(pool: PgPool) -> Self {
        Self {
            courses: CourseRepository::new(pool.clone()),
            chapters: ChapterRepository::new(pool.clone()),
            attachments: AttachmentRepository::new(pool.clone()),
            categories: CategoryRepository::new(pool.clone()),
            mux_data: MuxDataRepository::new(pool.clone()),
            pool,
        }
    }

    /// Begin a new database transaction.
    pub async fn begin(&self) -> std::result::Result<Transaction<'static, Postgres>, sqlx::Error> {
        self.pool.begin().await
    }
}
