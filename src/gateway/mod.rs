//! Persistence gateway: request-scoped sessions over the student and course tables.
//!
//! A `Session` is acquired per request and released when dropped. Changes made
//! through a session become durable only on `commit`; dropping an uncommitted
//! session discards them.

mod memory;
mod postgres;

pub use memory::MemoryGateway;
pub use postgres::PgGateway;

use crate::model::{Course, Student};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Entity {
    Student,
    Course,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Entity::Student => f.write_str("student"),
            Entity::Course => f.write_str("course"),
        }
    }
}

#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("duplicate {entity} id {id}")]
    Duplicate { entity: Entity, id: i32 },
    #[error("{entity} {id} does not exist")]
    NotFound { entity: Entity, id: i32 },
    #[error("course {course_id} does not exist")]
    MissingCourse { course_id: i32 },
    #[error("course {course_id} still has students")]
    CourseInUse { course_id: i32 },
    #[error("database: {0}")]
    Db(#[from] sqlx::Error),
}

#[async_trait]
pub trait Gateway: Send + Sync {
    async fn session(&self) -> Result<Box<dyn Session>, GatewayError>;

    async fn ping(&self) -> Result<(), GatewayError>;
}

/// Reads and writes within one unit of work. Inserts and updates do not re-run
/// handler pre-checks; the store's own key and reference constraints are
/// reported as `Duplicate`, `MissingCourse`, or `CourseInUse`. An update or
/// delete that matches no row is `NotFound`.
#[async_trait]
pub trait Session: Send {
    async fn list_students(&mut self) -> Result<Vec<Student>, GatewayError>;
    async fn find_student(&mut self, student_id: i32) -> Result<Option<Student>, GatewayError>;
    async fn student_exists(&mut self, student_id: i32) -> Result<bool, GatewayError>;
    async fn students_in_course(&mut self, course_id: i32) -> Result<Vec<Student>, GatewayError>;
    async fn course_has_students(&mut self, course_id: i32) -> Result<bool, GatewayError>;
    async fn insert_student(&mut self, student: &Student) -> Result<(), GatewayError>;
    async fn update_student(&mut self, student: &Student) -> Result<(), GatewayError>;
    async fn delete_student(&mut self, student_id: i32) -> Result<(), GatewayError>;

    async fn list_courses(&mut self) -> Result<Vec<Course>, GatewayError>;
    async fn find_course(&mut self, course_id: i32) -> Result<Option<Course>, GatewayError>;
    async fn course_exists(&mut self, course_id: i32) -> Result<bool, GatewayError>;
    async fn insert_course(&mut self, course: &Course) -> Result<(), GatewayError>;
    async fn update_course(&mut self, course: &Course) -> Result<(), GatewayError>;
    async fn delete_course(&mut self, course_id: i32) -> Result<(), GatewayError>;

    async fn commit(self: Box<Self>) -> Result<(), GatewayError>;
}
