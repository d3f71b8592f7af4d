use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{Html, Response},
};

use crate::web::{AppState, storage, templates};

/// Photo display page. No existence check: a missing file simply renders as
/// a broken image.
pub async fn show_page(Path(filename): Path<String>) -> Html<String> {
    Html(templates::render_show_photo_page(&filename))
}

pub async fn photo_file(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> Result<Response, StatusCode> {
    storage::stream_photo(state.upload_dir(), &filename).await
}
