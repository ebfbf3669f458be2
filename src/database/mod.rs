pub mod memory;
pub mod models;
pub mod postgres;
pub mod store;

pub use memory::MemoryStore;
pub use models::{
    AcademicSession, Admin, Course, NewUser, Profile, ProfileAssignment, RecordCounts, Staff,
    Student, StudentListing, Subject, User,
};
pub use postgres::PgStore;
pub use store::{DatabaseError, Store};
