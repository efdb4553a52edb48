//! Student handlers: list, get, add, update, delete.

use crate::error::AppError;
use crate::extractors::{EntityId, JsonBody};
use crate::model::{NewStudent, StudentChanges};
use crate::response::{ok, ok_message, ok_student};
use crate::service::RegistryService;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse};

pub async fn list_students(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let students = RegistryService::list_students(state.gateway.as_ref()).await?;
    Ok(ok(students))
}

pub async fn get_student(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    let student = RegistryService::get_student(state.gateway.as_ref(), id).await?;
    Ok(ok(student))
}

pub async fn add_student(
    State(state): State<AppState>,
    JsonBody(dto): JsonBody<NewStudent>,
) -> Result<impl IntoResponse, AppError> {
    let student = RegistryService::add_student(state.gateway.as_ref(), dto).await?;
    Ok(ok_student("Student added successfully.", student))
}

pub async fn update_student(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    JsonBody(changes): JsonBody<StudentChanges>,
) -> Result<impl IntoResponse, AppError> {
    let student = RegistryService::update_student(state.gateway.as_ref(), id, changes).await?;
    Ok(ok_student("Student updated successfully.", student))
}

pub async fn delete_student(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<impl IntoResponse, AppError> {
    RegistryService::delete_student(state.gateway.as_ref(), id).await?;
    Ok(ok_message("Student removed successfully."))
}
