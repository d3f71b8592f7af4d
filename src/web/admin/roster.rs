use axum::{
    extract::{Query, State},
    response::Html,
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;

use crate::web::{
    AppState, RequestError,
    auth::require_admin,
    data::{self, RosterFilter},
    templates::{self, NoticeQuery},
};

#[derive(Default, Deserialize)]
pub struct RosterQuery {
    pub grade: Option<String>,
    pub roll_number: Option<String>,
    pub status: Option<String>,
    pub error: Option<String>,
}

pub async fn roster(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<RosterQuery>,
) -> Result<Html<String>, RequestError> {
    let _admin = require_admin(&state, &jar).await?;

    let filter = RosterFilter::new(params.grade, params.roll_number);

    let rows = data::fetch_roster_rows(state.pool_ref(), &filter).await?;
    let groups = data::group_by_grade(rows);

    let all_grades = data::distinct_grades(state.pool_ref()).await?;
    let roll_numbers =
        data::distinct_roll_numbers(state.pool_ref(), filter.grade.as_deref()).await?;

    let notices = NoticeQuery {
        status: params.status,
        error: params.error,
    };

    Ok(Html(templates::render_roster_page(
        &groups,
        &all_grades,
        &roll_numbers,
        filter.grade.as_deref(),
        filter.roll_number.as_deref(),
        &notices,
    )))
}
