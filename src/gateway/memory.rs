//! In-process gateway with the same key and reference constraints as the SQL schema.
//!
//! Sessions are serialized: each holds the table lock for its lifetime. Reads go
//! through the lock; the first write takes a private copy, which replaces the
//! shared tables on commit.

use super::{Entity, Gateway, GatewayError, Session};
use crate::model::{Course, Student};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Clone, Debug, Default)]
struct Tables {
    students: BTreeMap<i32, Student>,
    courses: BTreeMap<i32, Course>,
}

#[derive(Clone, Default)]
pub struct MemoryGateway {
    tables: Arc<Mutex<Tables>>,
}

impl MemoryGateway {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Gateway for MemoryGateway {
    async fn session(&self) -> Result<Box<dyn Session>, GatewayError> {
        let guard = self.tables.clone().lock_owned().await;
        Ok(Box::new(MemorySession { guard, work: None }))
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        Ok(())
    }
}

struct MemorySession {
    guard: OwnedMutexGuard<Tables>,
    /// Uncommitted copy, present once the session has written.
    work: Option<Tables>,
}

impl MemorySession {
    fn tables(&self) -> &Tables {
        self.work.as_ref().unwrap_or(&*self.guard)
    }

    fn tables_mut(&mut self) -> &mut Tables {
        let shared = &self.guard;
        self.work.get_or_insert_with(|| (**shared).clone())
    }
}

#[async_trait]
impl Session for MemorySession {
    async fn list_students(&mut self) -> Result<Vec<Student>, GatewayError> {
        Ok(self.tables().students.values().cloned().collect())
    }

    async fn find_student(&mut self, student_id: i32) -> Result<Option<Student>, GatewayError> {
        Ok(self.tables().students.get(&student_id).cloned())
    }

    async fn student_exists(&mut self, student_id: i32) -> Result<bool, GatewayError> {
        Ok(self.tables().students.contains_key(&student_id))
    }

    async fn students_in_course(&mut self, course_id: i32) -> Result<Vec<Student>, GatewayError> {
        Ok(self
            .tables()
            .students
            .values()
            .filter(|s| s.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn course_has_students(&mut self, course_id: i32) -> Result<bool, GatewayError> {
        Ok(self.tables().students.values().any(|s| s.course_id == course_id))
    }

    async fn insert_student(&mut self, student: &Student) -> Result<(), GatewayError> {
        let tables = self.tables_mut();
        if tables.students.contains_key(&student.student_id) {
            return Err(GatewayError::Duplicate {
                entity: Entity::Student,
                id: student.student_id,
            });
        }
        if !tables.courses.contains_key(&student.course_id) {
            return Err(GatewayError::MissingCourse {
                course_id: student.course_id,
            });
        }
        tables.students.insert(student.student_id, student.clone());
        Ok(())
    }

    async fn update_student(&mut self, student: &Student) -> Result<(), GatewayError> {
        let tables = self.tables_mut();
        if !tables.courses.contains_key(&student.course_id) {
            return Err(GatewayError::MissingCourse {
                course_id: student.course_id,
            });
        }
        let row = tables.students.get_mut(&student.student_id).ok_or(GatewayError::NotFound {
            entity: Entity::Student,
            id: student.student_id,
        })?;
        *row = student.clone();
        Ok(())
    }

    async fn delete_student(&mut self, student_id: i32) -> Result<(), GatewayError> {
        self.tables_mut()
            .students
            .remove(&student_id)
            .map(|_| ())
            .ok_or(GatewayError::NotFound {
                entity: Entity::Student,
                id: student_id,
            })
    }

    async fn list_courses(&mut self) -> Result<Vec<Course>, GatewayError> {
        Ok(self.tables().courses.values().cloned().collect())
    }

    async fn find_course(&mut self, course_id: i32) -> Result<Option<Course>, GatewayError> {
        Ok(self.tables().courses.get(&course_id).cloned())
    }

    async fn course_exists(&mut self, course_id: i32) -> Result<bool, GatewayError> {
        Ok(self.tables().courses.contains_key(&course_id))
    }

    async fn insert_course(&mut self, course: &Course) -> Result<(), GatewayError> {
        let tables = self.tables_mut();
        if tables.courses.contains_key(&course.course_id) {
            return Err(GatewayError::Duplicate {
                entity: Entity::Course,
                id: course.course_id,
            });
        }
        tables.courses.insert(course.course_id, course.clone());
        Ok(())
    }

    async fn update_course(&mut self, course: &Course) -> Result<(), GatewayError> {
        let row = self.tables_mut().courses.get_mut(&course.course_id).ok_or(GatewayError::NotFound {
            entity: Entity::Course,
            id: course.course_id,
        })?;
        *row = course.clone();
        Ok(())
    }

    async fn delete_course(&mut self, course_id: i32) -> Result<(), GatewayError> {
        let tables = self.tables_mut();
        if tables.students.values().any(|s| s.course_id == course_id) {
            return Err(GatewayError::CourseInUse { course_id });
        }
        tables
            .courses
            .remove(&course_id)
            .map(|_| ())
            .ok_or(GatewayError::NotFound {
                entity: Entity::Course,
                id: course_id,
            })
    }

    async fn commit(self: Box<Self>) -> Result<(), GatewayError> {
        let MemorySession { mut guard, work } = *self;
        if let Some(work) = work {
            *guard = work;
        }
        Ok(())
    }
}
