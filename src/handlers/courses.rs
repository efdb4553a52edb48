//! Course handlers, including the per-course enrollment listing.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody};
use crate::model::{CourseChanges, NewCourse};
use crate::response::{ok, ok_course, ok_message};
use crate::service::RegistryService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn list_courses(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let courses = RegistryService::list_courses(state.gateway.as_ref()).await?;
    Ok(ok(courses))
}

pub async fn get_course(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let course = RegistryService::get_course(state.gateway.as_ref(), id).await?;
    Ok(ok(course))
}

/// GET /course/:courseId: `[{studentId, studentName}]` of enrolled students.
pub async fn course_students(
    State(state): State<AppState>,
    EntityId(course_id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let students = RegistryService::students_in_course(state.gateway.as_ref(), course_id).await?;
    Ok(ok(students))
}

pub async fn add_course(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<NewCourse>,
) -> Result<impl IntoResponse, AppError> {
    let course = RegistryService::add_course(state.gateway.as_ref(), dto).await?;
    Ok(ok_course("Course added successfully.", course))
}

pub async fn update_course(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(changes): JsonBody<CourseChanges>,
) -> Result<impl IntoResponse, AppError> {
    let course = RegistryService::update_course(state.gateway.as_ref(), id, changes).await?;
    Ok(ok_course("Course updated successfully.", course))
}

pub async fn delete_course(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    RegistryService::delete_course(state.gateway.as_ref(), id).await?;
    Ok(ok_message("Course removed successfully."))
}
