use axum::{
    extract::{Multipart, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use tracing::error;
use uuid::Uuid;

use crate::web::{
    AppState, RequestError,
    auth::{self, require_admin},
    data,
    forms::{FieldErrors, StudentFormData},
    storage, templates, uploads,
};

const DUPLICATE_ROLL_NOTICE: &str =
    "Roll number already exists for the grade. Please use a different roll number.";
const DUPLICATE_EMAIL_MESSAGE: &str = "Email already exists. Please use a different email.";

fn add_form_page(form: &StudentFormData, errors: &FieldErrors, notice: Option<&str>) -> Response {
    Html(templates::render_student_form_page(
        "Add Student",
        "/admin/add_student",
        form,
        errors,
        None,
        false,
        notice,
    ))
    .into_response()
}

fn edit_form_page(
    id: Uuid,
    form: &StudentFormData,
    errors: &FieldErrors,
    existing_photo: Option<&str>,
    notice: Option<&str>,
) -> Response {
    Html(templates::render_student_form_page(
        "Edit Student",
        &format!("/admin/edit_student/{id}"),
        form,
        errors,
        existing_photo,
        true,
        notice,
    ))
    .into_response()
}

pub async fn add_student_page(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    Ok(add_form_page(
        &StudentFormData::default(),
        &FieldErrors::default(),
        None,
    ))
}

pub async fn add_student_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    multipart: Multipart,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let submission = uploads::read_form(multipart)
        .await
        .map_err(|err| RequestError::Internal(anyhow::Error::new(err)))?;
    let form = StudentFormData::from_fields(&submission.fields);

    let mut errors = form.validate(true);
    if submission.photo.is_none() {
        errors.push("photo", "This field is required.");
    }
    if errors.get("email").is_none() && data::email_exists(state.pool_ref(), &form.email).await? {
        errors.push("email", DUPLICATE_EMAIL_MESSAGE);
    }

    let photo = match (errors.is_empty(), submission.photo) {
        (true, Some(photo)) => photo,
        _ => return Ok(add_form_page(&form, &errors, None)),
    };
    let Some(age) = form.age_value() else {
        return Ok(add_form_page(&form, &errors, None));
    };

    if data::grade_roll_taken(state.pool_ref(), &form.grade, &form.roll_number).await? {
        return Ok(add_form_page(&form, &errors, Some(DUPLICATE_ROLL_NOTICE)));
    }

    let filename = storage::photo_filename(
        &form.name,
        &form.grade,
        &form.roll_number,
        &photo.original_name,
    );
    storage::save_photo(state.upload_dir(), &filename, &photo.bytes).await?;

    let password_hash = auth::hash_password(&form.password)
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?;

    let result = sqlx::query(
        "INSERT INTO students (id, name, age, roll_number, grade, email, photo, password_hash)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(Uuid::new_v4())
    .bind(&form.name)
    .bind(age)
    .bind(&form.roll_number)
    .bind(&form.grade)
    .bind(&form.email)
    .bind(&filename)
    .bind(&password_hash)
    .execute(state.pool_ref())
    .await;

    match result {
        Ok(_) => Ok(Redirect::to("/admin?status=student_added").into_response()),
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("idx_students_grade_roll") =>
        {
            storage::remove_photo(state.upload_dir(), &filename).await;
            Ok(add_form_page(&form, &errors, Some(DUPLICATE_ROLL_NOTICE)))
        }
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("idx_students_email_lower") =>
        {
            storage::remove_photo(state.upload_dir(), &filename).await;
            errors.push("email", DUPLICATE_EMAIL_MESSAGE);
            Ok(add_form_page(&form, &errors, None))
        }
        Err(err) => {
            error!(?err, "failed to insert student");
            Err(err.into())
        }
    }
}

pub async fn edit_student_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;
    let student = data::fetch_student(state.pool_ref(), student_id)
        .await?
        .ok_or(RequestError::not_found("student_not_found"))?;

    let form = StudentFormData {
        name: student.name.clone(),
        age: student.age.to_string(),
        roll_number: student.roll_number.clone(),
        grade: student.grade.clone(),
        email: student.email.clone(),
        password: String::new(),
    };

    Ok(edit_form_page(
        student_id,
        &form,
        &FieldErrors::default(),
        student.photo.as_deref(),
        None,
    ))
}

pub async fn edit_student_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;
    let existing = data::fetch_student(state.pool_ref(), student_id)
        .await?
        .ok_or(RequestError::not_found("student_not_found"))?;

    let submission = uploads::read_form(multipart)
        .await
        .map_err(|err| RequestError::Internal(anyhow::Error::new(err)))?;
    let form = StudentFormData::from_fields(&submission.fields);

    let mut errors = form.validate(false);
    if errors.get("email").is_none()
        && !form.email.eq_ignore_ascii_case(&existing.email)
        && data::email_exists(state.pool_ref(), &form.email).await?
    {
        errors.push("email", DUPLICATE_EMAIL_MESSAGE);
    }
    if !errors.is_empty() {
        return Ok(edit_form_page(
            student_id,
            &form,
            &errors,
            existing.photo.as_deref(),
            None,
        ));
    }
    let Some(age) = form.age_value() else {
        return Ok(edit_form_page(
            student_id,
            &form,
            &errors,
            existing.photo.as_deref(),
            None,
        ));
    };

    // A new photo replaces the stored file before the row is updated; the
    // stored reference is otherwise left untouched.
    let mut new_photo: Option<String> = None;
    if let Some(photo) = submission.photo {
        if let Some(previous) = existing.photo.as_deref() {
            storage::remove_photo(state.upload_dir(), previous).await;
        }
        let filename = storage::photo_filename(
            &form.name,
            &form.grade,
            &form.roll_number,
            &photo.original_name,
        );
        storage::save_photo(state.upload_dir(), &filename, &photo.bytes).await?;
        new_photo = Some(filename);
    }

    let password_hash = if form.password.is_empty() {
        None
    } else {
        Some(
            auth::hash_password(&form.password)
                .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?,
        )
    };

    let result = sqlx::query(
        "UPDATE students SET name = $2, age = $3, roll_number = $4, grade = $5, email = $6,
             photo = COALESCE($7, photo),
             password_hash = COALESCE($8, password_hash)
         WHERE id = $1",
    )
    .bind(student_id)
    .bind(&form.name)
    .bind(age)
    .bind(&form.roll_number)
    .bind(&form.grade)
    .bind(&form.email)
    .bind(new_photo.as_deref())
    .bind(password_hash.as_deref())
    .execute(state.pool_ref())
    .await;

    match result {
        Ok(res) if res.rows_affected() > 0 => {
            Ok(Redirect::to("/admin?status=student_updated").into_response())
        }
        Ok(_) => Err(RequestError::not_found("student_not_found")),
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("idx_students_grade_roll") =>
        {
            Ok(edit_form_page(
                student_id,
                &form,
                &errors,
                existing.photo.as_deref(),
                Some(DUPLICATE_ROLL_NOTICE),
            ))
        }
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("idx_students_email_lower") =>
        {
            errors.push("email", DUPLICATE_EMAIL_MESSAGE);
            Ok(edit_form_page(
                student_id,
                &form,
                &errors,
                existing.photo.as_deref(),
                None,
            ))
        }
        Err(err) => {
            error!(?err, "failed to update student");
            Err(err.into())
        }
    }
}

pub async fn delete_student(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
) -> Result<Redirect, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;
    let student = data::fetch_student(state.pool_ref(), student_id)
        .await?
        .ok_or(RequestError::not_found("student_not_found"))?;

    let result = sqlx::query("DELETE FROM students WHERE id = $1")
        .bind(student_id)
        .execute(state.pool_ref())
        .await?;

    if result.rows_affected() == 0 {
        return Err(RequestError::not_found("student_not_found"));
    }

    if let Some(photo) = student.photo.as_deref() {
        storage::remove_photo(state.upload_dir(), photo).await;
    }

    sqlx::query("DELETE FROM marks WHERE student_id = $1")
        .bind(student_id)
        .execute(state.pool_ref())
        .await?;

    Ok(Redirect::to("/admin?status=student_deleted"))
}
