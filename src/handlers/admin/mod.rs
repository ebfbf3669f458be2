// handlers/admin/mod.rs - Admin-only record management

pub mod courses;
pub mod sessions;
pub mod subjects;
pub mod users;

pub use courses::{courses_get, courses_post};
pub use sessions::sessions_post;
pub use subjects::subjects_post;
pub use users::{staff_post, students_get, students_post};
