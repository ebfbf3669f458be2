use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::models::{
    AcademicSession, Admin, Course, NewUser, Profile, ProfileAssignment, RecordCounts, Staff,
    Student, StudentListing, Subject, User,
};
use super::store::{DatabaseError, Store};
use crate::types::Role;

#[derive(Debug, Default)]
struct Tables {
    users: Vec<User>,
    admins: Vec<Admin>,
    staff: Vec<Staff>,
    students: Vec<Student>,
    courses: Vec<Course>,
    sessions: Vec<AcademicSession>,
    subjects: Vec<Subject>,
}

impl Tables {
    fn check_course(&self, course_id: Option<Uuid>) -> Result<(), DatabaseError> {
        match course_id {
            Some(id) if !self.courses.iter().any(|c| c.id == id) => Err(
                DatabaseError::InvalidReference(format!("Course {} does not exist", id)),
            ),
            _ => Ok(()),
        }
    }

    fn check_session(&self, session_id: Option<Uuid>) -> Result<(), DatabaseError> {
        match session_id {
            Some(id) if !self.sessions.iter().any(|s| s.id == id) => Err(
                DatabaseError::InvalidReference(format!("Session {} does not exist", id)),
            ),
            _ => Ok(()),
        }
    }
}

/// In-process store used by tests and by the server when no database URL
/// is configured. Every operation holds the table lock for its whole
/// duration, so multi-row writes are atomic.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_or_create_course(&self, name: &str) -> Result<(Course, bool), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(course) = tables.courses.iter().find(|c| c.name == name) {
            return Ok((course.clone(), false));
        }

        let course = Course {
            id: Uuid::new_v4(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        tables.courses.push(course.clone());
        Ok((course, true))
    }

    async fn get_or_create_session(
        &self,
        start_year: NaiveDate,
        end_year: NaiveDate,
    ) -> Result<(AcademicSession, bool), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(session) = tables
            .sessions
            .iter()
            .find(|s| s.start_year == start_year && s.end_year == end_year)
        {
            return Ok((session.clone(), false));
        }

        let session = AcademicSession {
            id: Uuid::new_v4(),
            start_year,
            end_year,
        };
        tables.sessions.push(session.clone());
        Ok((session, true))
    }

    async fn get_or_create_subject(
        &self,
        name: &str,
        staff_id: Uuid,
        course_id: Uuid,
    ) -> Result<(Subject, bool), DatabaseError> {
        let mut tables = self.tables.write().await;
        if let Some(subject) = tables.subjects.iter().find(|s| s.name == name) {
            return Ok((subject.clone(), false));
        }

        if !tables.staff.iter().any(|s| s.id == staff_id) {
            return Err(DatabaseError::InvalidReference(format!(
                "Staff {} does not exist",
                staff_id
            )));
        }
        tables.check_course(Some(course_id))?;

        let subject = Subject {
            id: Uuid::new_v4(),
            name: name.to_string(),
            staff_id,
            course_id,
        };
        tables.subjects.push(subject.clone());
        Ok((subject, true))
    }

    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|u| u.email.eq_ignore_ascii_case(email))
            .cloned())
    }

    async fn get_user(&self, id: Uuid) -> Result<User, DatabaseError> {
        let tables = self.tables.read().await;
        tables
            .users
            .iter()
            .find(|u| u.id == id)
            .cloned()
            .ok_or_else(|| DatabaseError::NotFound(format!("User {} not found", id)))
    }

    async fn create_user_with_profile(
        &self,
        user: NewUser,
        assignment: ProfileAssignment,
    ) -> Result<(User, Profile), DatabaseError> {
        let mut tables = self.tables.write().await;

        if tables.users.iter().any(|u| u.email.eq_ignore_ascii_case(&user.email)) {
            return Err(DatabaseError::Conflict(format!(
                "User with email '{}' already exists",
                user.email
            )));
        }
        // Validate everything before touching any table
        if user.role != Role::Admin {
            tables.check_course(assignment.course_id)?;
        }
        if user.role == Role::Student {
            tables.check_session(assignment.session_id)?;
        }

        let created = User {
            id: Uuid::new_v4(),
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            user_type: user.role.code().to_string(),
            gender: user.gender,
            address: user.address,
            password_hash: user.password_hash,
            created_at: Utc::now(),
        };

        let profile = match user.role {
            Role::Admin => {
                let admin = Admin {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                };
                tables.admins.push(admin.clone());
                Profile::Admin(admin)
            }
            Role::Staff => {
                let staff = Staff {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                    course_id: assignment.course_id,
                };
                tables.staff.push(staff.clone());
                Profile::Staff(staff)
            }
            Role::Student => {
                let student = Student {
                    id: Uuid::new_v4(),
                    user_id: created.id,
                    course_id: assignment.course_id,
                    session_id: assignment.session_id,
                };
                tables.students.push(student.clone());
                Profile::Student(student)
            }
        };
        tables.users.push(created.clone());

        Ok((created, profile))
    }

    async fn find_staff_by_user(&self, user_id: Uuid) -> Result<Option<Staff>, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(tables.staff.iter().find(|s| s.user_id == user_id).cloned())
    }

    async fn list_courses(&self) -> Result<Vec<Course>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut courses = tables.courses.clone();
        courses.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(courses)
    }

    async fn list_students(&self) -> Result<Vec<StudentListing>, DatabaseError> {
        let tables = self.tables.read().await;
        let mut listings: Vec<StudentListing> = tables
            .students
            .iter()
            .filter_map(|student| {
                let user = tables.users.iter().find(|u| u.id == student.user_id)?;
                Some(StudentListing {
                    student_id: student.id,
                    user_id: user.id,
                    email: user.email.clone(),
                    first_name: user.first_name.clone(),
                    last_name: user.last_name.clone(),
                    course_id: student.course_id,
                    session_id: student.session_id,
                })
            })
            .collect();
        listings.sort_by(|a, b| {
            (a.last_name.as_str(), a.first_name.as_str()).cmp(&(b.last_name.as_str(), b.first_name.as_str()))
        });
        Ok(listings)
    }

    async fn counts(&self) -> Result<RecordCounts, DatabaseError> {
        let tables = self.tables.read().await;
        Ok(RecordCounts {
            users: tables.users.len() as i64,
            admins: tables.admins.len() as i64,
            staff: tables.staff.len() as i64,
            students: tables.students.len() as i64,
            courses: tables.courses.len() as i64,
            sessions: tables.sessions.len() as i64,
            subjects: tables.subjects.len() as i64,
        })
    }

    async fn health_check(&self) -> Result<(), DatabaseError> {
        Ok(())
    }
}
