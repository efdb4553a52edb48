//! HTTP handlers for students and courses.

pub mod courses;
pub mod students;
pub use courses::*;
pub use students::*;
