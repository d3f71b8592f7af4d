use axum::{extract::State, response::Html};
use axum_extra::extract::cookie::CookieJar;

use crate::web::{AppState, RequestError, auth::require_student, data, templates};

/// Self-service view: the signed-in student's own marks.
pub async fn marks_list(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Html<String>, RequestError> {
    let student = require_student(&state, &jar).await?;

    let marks = data::fetch_marks_for_student(state.pool_ref(), student.id).await?;

    Ok(Html(templates::render_marks_list_page(&student, &marks)))
}
