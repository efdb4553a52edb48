//! JSON request body that is required and well-formed, or a 400 with the DTO's message.

use crate::error::AppError;
use crate::model::Payload;
use async_trait::async_trait;
use axum::{
    extract::{FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

#[derive(Debug)]
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Payload + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<Option<T>>::from_request(req, state).await {
            Ok(Json(Some(body))) => Ok(JsonBody(body)),
            Ok(Json(None)) => Err(AppError::InvalidInput(T::INVALID.into())),
            Err(rejection) => {
                tracing::debug!(%rejection, "rejected request body");
                Err(AppError::InvalidInput(T::INVALID.into()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewCourse;
    use axum::body::Body;

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .header("content-type", "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn accepts_complete_body() {
        let JsonBody(course) = JsonBody::<NewCourse>::from_request(
            request(r#"{"courseId": 1, "courseTitle": "CS101", "maxStudents": 30}"#),
            &(),
        )
        .await
        .unwrap();
        assert_eq!(course.course_title, "CS101");
    }

    #[tokio::test]
    async fn null_and_malformed_bodies_are_invalid_input() {
        for body in ["null", "", "{", r#"{"courseId": 1}"#] {
            let err = JsonBody::<NewCourse>::from_request(request(body), &()).await.unwrap_err();
            assert!(matches!(err, AppError::InvalidInput(ref m) if m == "Invalid course data."));
        }
    }
}
