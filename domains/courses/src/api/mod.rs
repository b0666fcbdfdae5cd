//! API layer for the Courses domain
//!
//! Contains HTTP handlers, routes, the ownership guard, the chapter video
//! lifecycle and the domain state definition.

pub mod guard;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod video;

pub use middleware::CoursesState;
pub use routes::routes;
