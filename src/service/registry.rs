//! Check-then-act registry operations.
//!
//! Pre-checks give early, specific errors. The store's own constraints remain
//! authoritative: a concurrent writer that slips past a pre-check is rejected by
//! the insert or commit and mapped to the same error.

use crate::error::{
    AppError, COURSE_IN_USE, COURSE_NOT_FOUND, DUPLICATE_COURSE, DUPLICATE_STUDENT, INVALID_COURSE_ID,
    NO_STUDENTS_ENROLLED, STUDENT_NOT_FOUND,
};
use crate::gateway::Gateway;
use crate::model::{Course, CourseChanges, NewCourse, NewStudent, Student, StudentChanges, StudentSummary};

pub struct RegistryService;

impl RegistryService {
    pub async fn list_students(gateway: &dyn Gateway) -> Result<Vec<Student>, AppError> {
        let mut session = gateway.session().await?;
        Ok(session.list_students().await?)
    }

    pub async fn get_student(gateway: &dyn Gateway, student_id: i32) -> Result<Student, AppError> {
        let mut session = gateway.session().await?;
        session
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(STUDENT_NOT_FOUND.into()))
    }

    pub async fn list_courses(gateway: &dyn Gateway) -> Result<Vec<Course>, AppError> {
        let mut session = gateway.session().await?;
        Ok(session.list_courses().await?)
    }

    pub async fn get_course(gateway: &dyn Gateway, course_id: i32) -> Result<Course, AppError> {
        let mut session = gateway.session().await?;
        session
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(COURSE_NOT_FOUND.into()))
    }

    /// Students enrolled in a course. An empty result is NotFound, whether or not the course exists.
    pub async fn students_in_course(gateway: &dyn Gateway, course_id: i32) -> Result<Vec<StudentSummary>, AppError> {
        let mut session = gateway.session().await?;
        let students = session.students_in_course(course_id).await?;
        if students.is_empty() {
            return Err(AppError::NotFound(NO_STUDENTS_ENROLLED.into()));
        }
        Ok(students.into_iter().map(StudentSummary::from).collect())
    }

    pub async fn add_student(gateway: &dyn Gateway, dto: NewStudent) -> Result<Student, AppError> {
        let mut session = gateway.session().await?;
        if !session.course_exists(dto.course_id).await? {
            return Err(AppError::ReferentialViolation(INVALID_COURSE_ID.into()));
        }
        if session.student_exists(dto.student_id).await? {
            return Err(AppError::ConstraintViolation(DUPLICATE_STUDENT.into()));
        }
        let student = Student::from(dto);
        session.insert_student(&student).await?;
        session.commit().await?;
        tracing::info!(student_id = student.student_id, course_id = student.course_id, "student added");
        Ok(student)
    }

    pub async fn add_course(gateway: &dyn Gateway, dto: NewCourse) -> Result<Course, AppError> {
        let mut session = gateway.session().await?;
        if session.course_exists(dto.course_id).await? {
            return Err(AppError::ConstraintViolation(DUPLICATE_COURSE.into()));
        }
        let course = Course::from(dto);
        session.insert_course(&course).await?;
        session.commit().await?;
        tracing::info!(course_id = course.course_id, "course added");
        Ok(course)
    }

    /// Overwrite every mutable field. The new course must exist.
    pub async fn update_student(
        gateway: &dyn Gateway,
        student_id: i32,
        changes: StudentChanges,
    ) -> Result<Student, AppError> {
        let mut session = gateway.session().await?;
        let mut student = session
            .find_student(student_id)
            .await?
            .ok_or_else(|| AppError::NotFound(STUDENT_NOT_FOUND.into()))?;
        if !session.course_exists(changes.course_id).await? {
            return Err(AppError::ReferentialViolation(INVALID_COURSE_ID.into()));
        }
        student.apply(changes);
        session.update_student(&student).await?;
        session.commit().await?;
        tracing::info!(student_id, course_id = student.course_id, "student updated");
        Ok(student)
    }

    pub async fn update_course(
        gateway: &dyn Gateway,
        course_id: i32,
        changes: CourseChanges,
    ) -> Result<Course, AppError> {
        let mut session = gateway.session().await?;
        let mut course = session
            .find_course(course_id)
            .await?
            .ok_or_else(|| AppError::NotFound(COURSE_NOT_FOUND.into()))?;
        course.apply(changes);
        session.update_course(&course).await?;
        session.commit().await?;
        tracing::info!(course_id, "course updated");
        Ok(course)
    }

    pub async fn delete_student(gateway: &dyn Gateway, student_id: i32) -> Result<(), AppError> {
        let mut session = gateway.session().await?;
        if !session.student_exists(student_id).await? {
            return Err(AppError::NotFound(STUDENT_NOT_FOUND.into()));
        }
        session.delete_student(student_id).await?;
        session.commit().await?;
        tracing::info!(student_id, "student removed");
        Ok(())
    }

    /// Remove a course. Blocked while any student still references it; no cascade.
    pub async fn delete_course(gateway: &dyn Gateway, course_id: i32) -> Result<(), AppError> {
        let mut session = gateway.session().await?;
        if !session.course_exists(course_id).await? {
            return Err(AppError::NotFound(COURSE_NOT_FOUND.into()));
        }
        if session.course_has_students(course_id).await? {
            return Err(AppError::ConstraintViolation(COURSE_IN_USE.into()));
        }
        session.delete_course(course_id).await?;
        session.commit().await?;
        tracing::info!(course_id, "course removed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::MemoryGateway;

    fn cs101() -> NewCourse {
        NewCourse {
            course_id: 1,
            course_title: "CS101".into(),
            max_students: 30,
        }
    }

    fn ann(course_id: i32) -> NewStudent {
        NewStudent {
            student_id: 5,
            student_name: "Ann".into(),
            age: 20,
            town: "X".into(),
            course_id,
        }
    }

    #[tokio::test]
    async fn rejected_student_leaves_no_row() {
        let gw = MemoryGateway::new();
        let err = RegistryService::add_student(&gw, ann(1)).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialViolation(_)));
        assert!(RegistryService::list_students(&gw).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn update_student_requires_existing_course() {
        let gw = MemoryGateway::new();
        RegistryService::add_course(&gw, cs101()).await.unwrap();
        RegistryService::add_student(&gw, ann(1)).await.unwrap();

        let changes = StudentChanges {
            student_name: "Ann".into(),
            age: 21,
            town: "X".into(),
            course_id: 42,
        };
        let err = RegistryService::update_student(&gw, 5, changes).await.unwrap_err();
        assert!(matches!(err, AppError::ReferentialViolation(ref m) if m == INVALID_COURSE_ID));
        assert_eq!(RegistryService::get_student(&gw, 5).await.unwrap().age, 20);
    }

    #[tokio::test]
    async fn max_students_is_not_a_cap() {
        let gw = MemoryGateway::new();
        RegistryService::add_course(&gw, NewCourse { max_students: 1, ..cs101() }).await.unwrap();
        RegistryService::add_student(&gw, ann(1)).await.unwrap();
        RegistryService::add_student(&gw, NewStudent { student_id: 6, ..ann(1) }).await.unwrap();
        assert_eq!(RegistryService::students_in_course(&gw, 1).await.unwrap().len(), 2);
    }
}
