//! PostgreSQL gateway. Each session is one transaction on a pooled connection.

use super::{Entity, Gateway, GatewayError, Session};
use crate::model::{Course, Student};
use async_trait::async_trait;
use sqlx::postgres::PgQueryResult;
use sqlx::{PgPool, Postgres, Transaction};

#[derive(Clone)]
pub struct PgGateway {
    pool: PgPool,
}

impl PgGateway {
    pub fn new(pool: PgPool) -> Self {
        PgGateway { pool }
    }
}

#[async_trait]
impl Gateway for PgGateway {
    async fn session(&self) -> Result<Box<dyn Session>, GatewayError> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgSession { tx }))
    }

    async fn ping(&self) -> Result<(), GatewayError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }
}

struct PgSession {
    tx: Transaction<'static, Postgres>,
}

/// Classify a write failure. Unique and foreign-key violations become typed
/// gateway errors; anything else stays a database error.
fn classify(err: sqlx::Error, on_unique: GatewayError, on_foreign_key: GatewayError) -> GatewayError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() {
            tracing::warn!(constraint = ?db.constraint(), "unique constraint rejected write");
            return on_unique;
        }
        if db.is_foreign_key_violation() {
            tracing::warn!(constraint = ?db.constraint(), "foreign key rejected write");
            return on_foreign_key;
        }
    }
    GatewayError::Db(err)
}

/// An update or delete that touched nothing lost a race with a concurrent delete.
fn expect_row(result: PgQueryResult, entity: Entity, id: i32) -> Result<(), GatewayError> {
    if result.rows_affected() == 0 {
        tracing::warn!(%entity, id, "write matched no row");
        return Err(GatewayError::NotFound { entity, id });
    }
    Ok(())
}

const STUDENT_COLUMNS: &str = "student_id, student_name, age, town, course_id";
const COURSE_COLUMNS: &str = "course_id, course_title, max_students";

#[async_trait]
impl Session for PgSession {
    async fn list_students(&mut self) -> Result<Vec<Student>, GatewayError> {
        let sql = format!("SELECT {} FROM students ORDER BY student_id", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Student>(&sql).fetch_all(&mut *self.tx).await?;
        Ok(rows)
    }

    async fn find_student(&mut self, student_id: i32) -> Result<Option<Student>, GatewayError> {
        let sql = format!("SELECT {} FROM students WHERE student_id = $1", STUDENT_COLUMNS);
        tracing::debug!(sql = %sql, student_id, "query");
        let row = sqlx::query_as::<_, Student>(&sql)
            .bind(student_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn student_exists(&mut self, student_id: i32) -> Result<bool, GatewayError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM students WHERE student_id = $1)")
            .bind(student_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists.0)
    }

    async fn students_in_course(&mut self, course_id: i32) -> Result<Vec<Student>, GatewayError> {
        let sql = format!(
            "SELECT {} FROM students WHERE course_id = $1 ORDER BY student_id",
            STUDENT_COLUMNS
        );
        tracing::debug!(sql = %sql, course_id, "query");
        let rows = sqlx::query_as::<_, Student>(&sql)
            .bind(course_id)
            .fetch_all(&mut *self.tx)
            .await?;
        Ok(rows)
    }

    async fn course_has_students(&mut self, course_id: i32) -> Result<bool, GatewayError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM students WHERE course_id = $1)")
            .bind(course_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists.0)
    }

    async fn insert_student(&mut self, student: &Student) -> Result<(), GatewayError> {
        sqlx::query(
            "INSERT INTO students (student_id, student_name, age, town, course_id) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(student.student_id)
        .bind(&student.student_name)
        .bind(student.age)
        .bind(&student.town)
        .bind(student.course_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| {
            classify(
                e,
                GatewayError::Duplicate {
                    entity: Entity::Student,
                    id: student.student_id,
                },
                GatewayError::MissingCourse {
                    course_id: student.course_id,
                },
            )
        })?;
        Ok(())
    }

    async fn update_student(&mut self, student: &Student) -> Result<(), GatewayError> {
        let result = sqlx::query("UPDATE students SET student_name = $2, age = $3, town = $4, course_id = $5 WHERE student_id = $1")
            .bind(student.student_id)
            .bind(&student.student_name)
            .bind(student.age)
            .bind(&student.town)
            .bind(student.course_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| {
                classify(
                    e,
                    GatewayError::Duplicate {
                        entity: Entity::Student,
                        id: student.student_id,
                    },
                    GatewayError::MissingCourse {
                        course_id: student.course_id,
                    },
                )
            })?;
        expect_row(result, Entity::Student, student.student_id)
    }

    async fn delete_student(&mut self, student_id: i32) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM students WHERE student_id = $1")
            .bind(student_id)
            .execute(&mut *self.tx)
            .await?;
        expect_row(result, Entity::Student, student_id)
    }

    async fn list_courses(&mut self) -> Result<Vec<Course>, GatewayError> {
        let sql = format!("SELECT {} FROM courses ORDER BY course_id", COURSE_COLUMNS);
        tracing::debug!(sql = %sql, "query");
        let rows = sqlx::query_as::<_, Course>(&sql).fetch_all(&mut *self.tx).await?;
        Ok(rows)
    }

    async fn find_course(&mut self, course_id: i32) -> Result<Option<Course>, GatewayError> {
        let sql = format!("SELECT {} FROM courses WHERE course_id = $1", COURSE_COLUMNS);
        tracing::debug!(sql = %sql, course_id, "query");
        let row = sqlx::query_as::<_, Course>(&sql)
            .bind(course_id)
            .fetch_optional(&mut *self.tx)
            .await?;
        Ok(row)
    }

    async fn course_exists(&mut self, course_id: i32) -> Result<bool, GatewayError> {
        let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM courses WHERE course_id = $1)")
            .bind(course_id)
            .fetch_one(&mut *self.tx)
            .await?;
        Ok(exists.0)
    }

    async fn insert_course(&mut self, course: &Course) -> Result<(), GatewayError> {
        sqlx::query("INSERT INTO courses (course_id, course_title, max_students) VALUES ($1, $2, $3)")
            .bind(course.course_id)
            .bind(&course.course_title)
            .bind(course.max_students)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_unique_violation() => GatewayError::Duplicate {
                    entity: Entity::Course,
                    id: course.course_id,
                },
                other => GatewayError::Db(other),
            })?;
        Ok(())
    }

    async fn update_course(&mut self, course: &Course) -> Result<(), GatewayError> {
        let result = sqlx::query("UPDATE courses SET course_title = $2, max_students = $3 WHERE course_id = $1")
            .bind(course.course_id)
            .bind(&course.course_title)
            .bind(course.max_students)
            .execute(&mut *self.tx)
            .await?;
        expect_row(result, Entity::Course, course.course_id)
    }

    async fn delete_course(&mut self, course_id: i32) -> Result<(), GatewayError> {
        let result = sqlx::query("DELETE FROM courses WHERE course_id = $1")
            .bind(course_id)
            .execute(&mut *self.tx)
            .await
            .map_err(|e| match e {
                sqlx::Error::Database(ref db) if db.is_foreign_key_violation() => {
                    tracing::warn!(course_id, "foreign key blocked course delete");
                    GatewayError::CourseInUse { course_id }
                }
                other => GatewayError::Db(other),
            })?;
        expect_row(result, Entity::Course, course_id)
    }

    async fn commit(self: Box<Self>) -> Result<(), GatewayError> {
        self.tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored
    use super::*;
    use crate::store::ensure_schema;

    #[tokio::test]
    #[ignore]
    async fn constraints_are_enforced_by_postgres() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = sqlx::postgres::PgPoolOptions::new()
            .max_connections(2)
            .connect(&url)
            .await
            .unwrap();
        ensure_schema(&pool).await.unwrap();
        let gateway = PgGateway::new(pool);

        let student = Student {
            student_id: 900_001,
            student_name: "Ann".into(),
            age: 20,
            town: "X".into(),
            course_id: 900_001,
        };
        let mut session = gateway.session().await.unwrap();
        let err = session.insert_student(&student).await.unwrap_err();
        assert!(matches!(err, GatewayError::MissingCourse { course_id: 900_001 }));
        // session is dropped uncommitted, rolling back
    }
}
