//! Typed errors and HTTP mapping.

use crate::gateway::{Entity, GatewayError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    InvalidInput(String),
    #[error("{0}")]
    ConstraintViolation(String),
    #[error("{0}")]
    ReferentialViolation(String),
    #[error(transparent)]
    Gateway(GatewayError),
}

pub const STUDENT_NOT_FOUND: &str = "Student not found.";
pub const COURSE_NOT_FOUND: &str = "Course not found.";
pub const NO_STUDENTS_ENROLLED: &str = "No students enrolled for the given course.";
pub const INVALID_COURSE_ID: &str = "Invalid course ID. The course does not exist.";
pub const DUPLICATE_STUDENT: &str = "A student with the same studentId already exists.";
pub const DUPLICATE_COURSE: &str = "A course with the same courseId already exists.";
pub const COURSE_IN_USE: &str = "Cannot delete course. Students are enrolled in this course.";
const UNEXPECTED: &str = "An unexpected error occurred.";

impl From<GatewayError> for AppError {
    fn from(e: GatewayError) -> Self {
        match e {
            GatewayError::Duplicate { entity: Entity::Student, .. } => {
                AppError::ConstraintViolation(DUPLICATE_STUDENT.into())
            }
            GatewayError::Duplicate { entity: Entity::Course, .. } => {
                AppError::ConstraintViolation(DUPLICATE_COURSE.into())
            }
            GatewayError::NotFound { entity: Entity::Student, .. } => AppError::NotFound(STUDENT_NOT_FOUND.into()),
            GatewayError::NotFound { entity: Entity::Course, .. } => AppError::NotFound(COURSE_NOT_FOUND.into()),
            GatewayError::MissingCourse { .. } => AppError::ReferentialViolation(INVALID_COURSE_ID.into()),
            GatewayError::CourseInUse { .. } => AppError::ConstraintViolation(COURSE_IN_USE.into()),
            other => AppError::Gateway(other),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(m) => (StatusCode::NOT_FOUND, m.as_str()),
            AppError::InvalidInput(m) | AppError::ConstraintViolation(m) | AppError::ReferentialViolation(m) => {
                (StatusCode::BAD_REQUEST, m.as_str())
            }
            AppError::Gateway(e) => {
                tracing::error!(error = %e, "gateway failure");
                (StatusCode::INTERNAL_SERVER_ERROR, UNEXPECTED)
            }
        };
        (status, Json(crate::response::MessageBody::new(message))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn not_found_is_404_with_message() {
        let response = AppError::NotFound(STUDENT_NOT_FOUND.into()).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({ "Message": "Student not found." }));
    }

    #[tokio::test]
    async fn violations_are_400() {
        for err in [
            AppError::InvalidInput("Invalid student data.".into()),
            AppError::ConstraintViolation(DUPLICATE_COURSE.into()),
            AppError::ReferentialViolation(INVALID_COURSE_ID.into()),
        ] {
            assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
        }
    }

    #[tokio::test]
    async fn database_failure_hides_details() {
        let err = AppError::from(GatewayError::Db(sqlx::Error::PoolTimedOut));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["Message"], UNEXPECTED);
    }

    #[test]
    fn gateway_constraints_map_to_violations() {
        let dup = AppError::from(GatewayError::Duplicate { entity: Entity::Student, id: 5 });
        assert!(matches!(dup, AppError::ConstraintViolation(ref m) if m == DUPLICATE_STUDENT));

        let missing = AppError::from(GatewayError::MissingCourse { course_id: 9 });
        assert!(matches!(missing, AppError::ReferentialViolation(_)));

        let in_use = AppError::from(GatewayError::CourseInUse { course_id: 1 });
        assert!(matches!(in_use, AppError::ConstraintViolation(ref m) if m == COURSE_IN_USE));
    }

    #[tokio::test]
    async fn write_to_vanished_row_is_404() {
        let err = AppError::from(GatewayError::NotFound { entity: Entity::Student, id: 5 });
        assert!(matches!(err, AppError::NotFound(ref m) if m == STUDENT_NOT_FOUND));

        let response = AppError::from(GatewayError::NotFound { entity: Entity::Course, id: 1 }).into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(body_json(response).await, serde_json::json!({ "Message": "Course not found." }));
    }
}
