use sqlx::PgPool;
use uuid::Uuid;

use crate::web::models::{MarkRow, RosterStudentRow, StudentRow};

/// Optional exact-match filters for the roster view. Empty form values
/// arrive as empty strings and mean "no filter".
#[derive(Debug, Default, Clone)]
pub struct RosterFilter {
    pub grade: Option<String>,
    pub roll_number: Option<String>,
}

impl RosterFilter {
    pub fn new(grade: Option<String>, roll_number: Option<String>) -> Self {
        let normalize = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            grade: normalize(grade),
            roll_number: normalize(roll_number),
        }
    }
}

/// One roster group: a grade and its students in insertion order.
#[derive(Debug, PartialEq)]
pub struct GradeGroup {
    pub grade: String,
    pub students: Vec<RosterStudentRow>,
}

pub async fn fetch_roster_rows(
    pool: &PgPool,
    filter: &RosterFilter,
) -> sqlx::Result<Vec<RosterStudentRow>> {
    sqlx::query_as::<_, RosterStudentRow>(
        "SELECT id, name, roll_number, grade, email, photo FROM students
         WHERE ($1::text IS NULL OR grade = $1)
           AND ($2::text IS NULL OR roll_number = $2)
         ORDER BY grade, created_at",
    )
    .bind(filter.grade.as_deref())
    .bind(filter.roll_number.as_deref())
    .fetch_all(pool)
    .await
}

/// Group roster rows by grade, ascending by grade value. Row order within a
/// group follows the input order.
pub fn group_by_grade(rows: Vec<RosterStudentRow>) -> Vec<GradeGroup> {
    let mut groups: Vec<GradeGroup> = Vec::new();

    for row in rows {
        match groups.iter_mut().find(|group| group.grade == row.grade) {
            Some(group) => group.students.push(row),
            None => groups.push(GradeGroup {
                grade: row.grade.clone(),
                students: vec![row],
            }),
        }
    }

    groups.sort_by(|a, b| a.grade.cmp(&b.grade));
    groups
}

pub async fn distinct_grades(pool: &PgPool) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar("SELECT DISTINCT grade FROM students ORDER BY grade")
        .fetch_all(pool)
        .await
}

/// Distinct roll numbers, scoped to one grade when a grade filter is active.
pub async fn distinct_roll_numbers(
    pool: &PgPool,
    grade: Option<&str>,
) -> sqlx::Result<Vec<String>> {
    sqlx::query_scalar(
        "SELECT DISTINCT roll_number FROM students
         WHERE ($1::text IS NULL OR grade = $1)
         ORDER BY roll_number",
    )
    .bind(grade)
    .fetch_all(pool)
    .await
}

pub async fn fetch_student(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<StudentRow>> {
    sqlx::query_as::<_, StudentRow>(
        "SELECT id, name, age, roll_number, grade, email, photo, password_hash
         FROM students WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_mark(pool: &PgPool, id: Uuid) -> sqlx::Result<Option<MarkRow>> {
    sqlx::query_as::<_, MarkRow>(
        "SELECT id, student_id, subject, marks, date FROM marks WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_marks_for_student(
    pool: &PgPool,
    student_id: Uuid,
) -> sqlx::Result<Vec<MarkRow>> {
    sqlx::query_as::<_, MarkRow>(
        "SELECT id, student_id, subject, marks, date FROM marks WHERE student_id = $1",
    )
    .bind(student_id)
    .fetch_all(pool)
    .await
}

/// True when the email is already taken by any account, admin or student.
pub async fn email_exists(pool: &PgPool, email: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM admins WHERE LOWER(email) = LOWER($1))
             OR EXISTS(SELECT 1 FROM students WHERE LOWER(email) = LOWER($1))",
    )
    .bind(email)
    .fetch_one(pool)
    .await
}

pub async fn grade_roll_taken(pool: &PgPool, grade: &str, roll_number: &str) -> sqlx::Result<bool> {
    sqlx::query_scalar(
        "SELECT EXISTS(SELECT 1 FROM students WHERE grade = $1 AND roll_number = $2)",
    )
    .bind(grade)
    .bind(roll_number)
    .fetch_one(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster_row(name: &str, grade: &str, roll: &str) -> RosterStudentRow {
        RosterStudentRow {
            id: Uuid::new_v4(),
            name: name.to_string(),
            roll_number: roll.to_string(),
            grade: grade.to_string(),
            email: format!("{}@x.com", name.to_lowercase()),
            photo: None,
        }
    }

    #[test]
    fn filter_treats_empty_strings_as_absent() {
        let filter = RosterFilter::new(Some(String::new()), Some("  ".to_string()));
        assert!(filter.grade.is_none());
        assert!(filter.roll_number.is_none());

        let filter = RosterFilter::new(Some("5A".to_string()), None);
        assert_eq!(filter.grade.as_deref(), Some("5A"));
        assert!(filter.roll_number.is_none());
    }

    #[test]
    fn grouping_orders_grades_ascending() {
        let rows = vec![
            roster_row("Cam", "6B", "2"),
            roster_row("Ann", "5A", "1"),
            roster_row("Ben", "5A", "2"),
        ];

        let groups = group_by_grade(rows);
        let grades: Vec<&str> = groups.iter().map(|g| g.grade.as_str()).collect();
        assert_eq!(grades, vec!["5A", "6B"]);
        assert_eq!(groups[0].students.len(), 2);
        assert_eq!(groups[1].students.len(), 1);
    }

    #[test]
    fn grouping_preserves_row_order_within_a_grade() {
        let rows = vec![
            roster_row("Ann", "5A", "1"),
            roster_row("Ben", "5A", "2"),
            roster_row("Cam", "5A", "3"),
        ];

        let groups = group_by_grade(rows);
        let names: Vec<&str> = groups[0]
            .students
            .iter()
            .map(|s| s.name.as_str())
            .collect();
        assert_eq!(names, vec!["Ann", "Ben", "Cam"]);
    }

    #[test]
    fn grouping_of_no_rows_is_empty() {
        assert!(group_by_grade(Vec::new()).is_empty());
    }
}
