pub mod academics;
pub mod profile;
pub mod user;

pub use academics::{AcademicSession, Course, Subject};
pub use profile::{Admin, Profile, ProfileAssignment, RecordCounts, Staff, Student, StudentListing};
pub use user::{NewUser, User};
