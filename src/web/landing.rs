use axum::{extract::Query, response::Html};

use crate::web::templates::{self, NoticeQuery};

pub async fn home_page(Query(params): Query<NoticeQuery>) -> Html<String> {
    Html(templates::render_home(&params))
}
