//! Response envelopes: `{"Message": ...}` optionally carrying the affected entity.

use crate::model::{Course, Student};
use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Serialize, Debug)]
pub struct MessageBody {
    #[serde(rename = "Message")]
    pub message: String,
}

impl MessageBody {
    pub fn new(message: impl Into<String>) -> Self {
        MessageBody {
            message: message.into(),
        }
    }
}

#[derive(Serialize, Debug)]
pub struct StudentBody {
    #[serde(rename = "Message")]
    pub message: &'static str,
    #[serde(rename = "Student")]
    pub student: Student,
}

#[derive(Serialize, Debug)]
pub struct CourseBody {
    #[serde(rename = "Message")]
    pub message: &'static str,
    #[serde(rename = "Course")]
    pub course: Course,
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn ok_student(message: &'static str, student: Student) -> (StatusCode, Json<StudentBody>) {
    ok(StudentBody { message, student })
}

pub fn ok_course(message: &'static str, course: Course) -> (StatusCode, Json<CourseBody>) {
    ok(CourseBody { message, course })
}

pub fn ok_message(message: &'static str) -> (StatusCode, Json<MessageBody>) {
    ok(MessageBody::new(message))
}

/// Replace the bodies of 408/413 responses produced by the timeout and body-limit
/// layers with a `MessageBody`. JSON responses pass through unchanged.
pub async fn middleware_error_body(response: Response) -> Response {
    let message = match response.status() {
        StatusCode::REQUEST_TIMEOUT => "Request timed out.",
        StatusCode::PAYLOAD_TOO_LARGE => "Request body too large.",
        _ => return response,
    };
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.starts_with("application/json"));
    if is_json {
        return response;
    }
    (response.status(), Json(MessageBody::new(message))).into_response()
}
