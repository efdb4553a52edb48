//! Student and course routes. Mounted under the configured base path by the binary.

use crate::handlers::{
    add_course, add_student, course_students, delete_course, delete_student, get_course, get_student, list_courses,
    list_students, update_course, update_student,
};
use crate::state::AppState;
use axum::{
    routing::{delete, get, post, put},
    Router,
};

pub fn registry_routes(state: AppState) -> Router {
    Router::new()
        .route("/get-students", get(list_students))
        .route("/get-student/:id", get(get_student))
        .route("/get-courses", get(list_courses))
        .route("/get-course/:id", get(get_course))
        .route("/course/:course_id", get(course_students))
        .route("/add-student", post(add_student))
        .route("/add-course", post(add_course))
        .route("/update-student/:id", put(update_student))
        .route("/update-course/:id", put(update_course))
        .route("/delete-student/:id", delete(delete_student))
        .route("/delete-course/:id", delete(delete_course))
        .with_state(state)
}
