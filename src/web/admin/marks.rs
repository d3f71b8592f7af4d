use axum::{
    extract::{Form, Path, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use chrono::Utc;
use tracing::error;
use uuid::Uuid;

use crate::web::{
    AppState, RequestError,
    auth::require_admin,
    data,
    forms::MarksForm,
    templates,
};

pub async fn student_marks(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
) -> Result<Html<String>, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;
    let student = data::fetch_student(state.pool_ref(), student_id)
        .await?
        .ok_or(RequestError::not_found("student_not_found"))?;

    let marks = data::fetch_marks_for_student(state.pool_ref(), student_id).await?;

    Ok(Html(templates::render_student_marks_page(&student, &marks)))
}

pub async fn add_marks_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
) -> Result<Html<String>, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;
    let student = data::fetch_student(state.pool_ref(), student_id)
        .await?
        .ok_or(RequestError::not_found("student_not_found"))?;

    Ok(Html(templates::render_marks_form_page(
        "Add Marks",
        &format!("/admin/add_marks/{student_id}"),
        &MarksForm::default(),
        &Default::default(),
        Some(&student.name),
    )))
}

pub async fn add_marks_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(student_id): Path<String>,
    Form(form): Form<MarksForm>,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let student_id = Uuid::parse_str(&student_id)
        .map_err(|_| RequestError::not_found("invalid_student_id"))?;

    let errors = form.validate();
    let marks = match form.marks_value() {
        Some(marks) if errors.is_empty() => marks,
        _ => {
            let student = data::fetch_student(state.pool_ref(), student_id).await?;
            return Ok(Html(templates::render_marks_form_page(
                "Add Marks",
                &format!("/admin/add_marks/{student_id}"),
                &form,
                &errors,
                student.as_ref().map(|s| s.name.as_str()),
            ))
            .into_response());
        }
    };

    sqlx::query("INSERT INTO marks (id, student_id, subject, marks, date) VALUES ($1, $2, $3, $4, $5)")
        .bind(Uuid::new_v4())
        .bind(student_id)
        .bind(form.subject.trim())
        .bind(marks)
        .bind(Utc::now())
        .execute(state.pool_ref())
        .await
        .map_err(|err| {
            error!(?err, "failed to insert mark");
            RequestError::from(err)
        })?;

    Ok(Redirect::to("/admin?status=marks_added").into_response())
}

pub async fn edit_marks_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(mark_id): Path<String>,
) -> Result<Html<String>, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let mark_id =
        Uuid::parse_str(&mark_id).map_err(|_| RequestError::not_found("invalid_mark_id"))?;
    let mark = data::fetch_mark(state.pool_ref(), mark_id)
        .await?
        .ok_or(RequestError::not_found("marks_not_found"))?;

    let form = MarksForm {
        subject: mark.subject.clone(),
        marks: mark.marks.to_string(),
    };

    Ok(Html(templates::render_marks_form_page(
        "Edit Marks",
        &format!("/admin/edit_marks/{mark_id}"),
        &form,
        &Default::default(),
        None,
    )))
}

pub async fn edit_marks_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(mark_id): Path<String>,
    Form(form): Form<MarksForm>,
) -> Result<Response, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let mark_id =
        Uuid::parse_str(&mark_id).map_err(|_| RequestError::not_found("invalid_mark_id"))?;
    data::fetch_mark(state.pool_ref(), mark_id)
        .await?
        .ok_or(RequestError::not_found("marks_not_found"))?;

    let errors = form.validate();
    let marks = match form.marks_value() {
        Some(marks) if errors.is_empty() => marks,
        _ => {
            return Ok(Html(templates::render_marks_form_page(
                "Edit Marks",
                &format!("/admin/edit_marks/{mark_id}"),
                &form,
                &errors,
                None,
            ))
            .into_response());
        }
    };

    let result = sqlx::query("UPDATE marks SET subject = $2, marks = $3, date = $4 WHERE id = $1")
        .bind(mark_id)
        .bind(form.subject.trim())
        .bind(marks)
        .bind(Utc::now())
        .execute(state.pool_ref())
        .await;

    match result {
        Ok(res) if res.rows_affected() > 0 => {
            Ok(Redirect::to("/admin?status=marks_updated").into_response())
        }
        Ok(_) => Err(RequestError::not_found("marks_not_found")),
        Err(err) => {
            error!(?err, "failed to update mark");
            Err(err.into())
        }
    }
}

pub async fn delete_marks(
    State(state): State<AppState>,
    jar: CookieJar,
    Path(mark_id): Path<String>,
) -> Result<Redirect, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let mark_id =
        Uuid::parse_str(&mark_id).map_err(|_| RequestError::not_found("invalid_mark_id"))?;

    let result = sqlx::query("DELETE FROM marks WHERE id = $1")
        .bind(mark_id)
        .execute(state.pool_ref())
        .await?;

    if result.rows_affected() > 0 {
        Ok(Redirect::to("/admin?status=marks_deleted"))
    } else {
        Err(RequestError::not_found("marks_not_found"))
    }
}
