//! Stored entities and request DTOs.
//!
//! Course and Student reference each other only by key: a course never
//! embeds its students and a student never embeds its course.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub student_id: i32,
    pub student_name: String,
    pub age: i32,
    pub town: String,
    pub course_id: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub course_id: i32,
    pub course_title: String,
    pub max_students: i32,
}

/// Projection returned when listing the students of one course.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentSummary {
    pub student_id: i32,
    pub student_name: String,
}

impl From<Student> for StudentSummary {
    fn from(s: Student) -> Self {
        StudentSummary {
            student_id: s.student_id,
            student_name: s.student_name,
        }
    }
}

/// A request body type; `INVALID` is the message returned when the body is missing or malformed.
pub trait Payload {
    const INVALID: &'static str;
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewStudent {
    pub student_id: i32,
    pub student_name: String,
    pub age: i32,
    pub town: String,
    pub course_id: i32,
}

/// Update body for a student. A `studentId` in the body is ignored; the key comes from the path.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentChanges {
    pub student_name: String,
    pub age: i32,
    pub town: String,
    pub course_id: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCourse {
    pub course_id: i32,
    pub course_title: String,
    pub max_students: i32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseChanges {
    pub course_title: String,
    pub max_students: i32,
}

impl Payload for NewStudent {
    const INVALID: &'static str = "Invalid student data.";
}

impl Payload for StudentChanges {
    const INVALID: &'static str = "Invalid student data.";
}

impl Payload for NewCourse {
    const INVALID: &'static str = "Invalid course data.";
}

impl Payload for CourseChanges {
    const INVALID: &'static str = "Invalid course data.";
}

impl From<NewStudent> for Student {
    fn from(d: NewStudent) -> Self {
        Student {
            student_id: d.student_id,
            student_name: d.student_name,
            age: d.age,
            town: d.town,
            course_id: d.course_id,
        }
    }
}

impl From<NewCourse> for Course {
    fn from(d: NewCourse) -> Self {
        Course {
            course_id: d.course_id,
            course_title: d.course_title,
            max_students: d.max_students,
        }
    }
}

impl Student {
    /// Overwrite every mutable field; the primary key is left untouched.
    pub fn apply(&mut self, changes: StudentChanges) {
        self.student_name = changes.student_name;
        self.age = changes.age;
        self.town = changes.town;
        self.course_id = changes.course_id;
    }
}

impl Course {
    pub fn apply(&mut self, changes: CourseChanges) {
        self.course_title = changes.course_title;
        self.max_students = changes.max_students;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_serializes_without_students() {
        let course = Course {
            course_id: 1,
            course_title: "CS101".into(),
            max_students: 30,
        };
        let v = serde_json::to_value(&course).unwrap();
        assert_eq!(v, serde_json::json!({ "courseId": 1, "courseTitle": "CS101", "maxStudents": 30 }));
    }

    #[test]
    fn student_changes_ignore_body_id() {
        let changes: StudentChanges = serde_json::from_str(
            r#"{"studentId": 99, "studentName": "Bo", "age": 21, "town": "Y", "courseId": 2}"#,
        )
        .unwrap();
        let mut student = Student {
            student_id: 5,
            student_name: "Ann".into(),
            age: 20,
            town: "X".into(),
            course_id: 1,
        };
        student.apply(changes);
        assert_eq!(student.student_id, 5);
        assert_eq!(student.student_name, "Bo");
        assert_eq!(student.course_id, 2);
    }

    #[test]
    fn new_student_requires_every_field() {
        let r: Result<NewStudent, _> = serde_json::from_str(r#"{"studentName": "Ann", "age": 20}"#);
        assert!(r.is_err());
    }
}
