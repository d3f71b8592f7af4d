use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Clone, FromRow)]
pub struct AdminRow {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

#[derive(Clone, FromRow)]
pub struct StudentRow {
    pub id: Uuid,
    pub name: String,
    pub age: i32,
    pub roll_number: String,
    pub grade: String,
    pub email: String,
    pub photo: Option<String>,
    pub password_hash: String,
}

#[derive(Clone, FromRow)]
pub struct MarkRow {
    pub id: Uuid,
    pub student_id: Uuid,
    pub subject: String,
    pub marks: i32,
    pub date: DateTime<Utc>,
}

/// Projection of a student row used by the roster view.
#[derive(Clone, Debug, PartialEq, FromRow)]
pub struct RosterStudentRow {
    pub id: Uuid,
    pub name: String,
    pub roll_number: String,
    pub grade: String,
    pub email: String,
    pub photo: Option<String>,
}
