use axum::{
    Router,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, admin, auth, landing, photos, register, student};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::home_page))
        .route("/healthz", get(healthz))
        .route(
            "/admin/login",
            get(auth::admin_login_page).post(auth::admin_login_submit),
        )
        .route(
            "/admin/register",
            get(register::register_page).post(register::register_submit),
        )
        .route("/admin/logout", get(auth::admin_logout))
        .route(
            "/student/login",
            get(auth::student_login_page).post(auth::student_login_submit),
        )
        .route("/student/logout", get(auth::student_logout))
        .route("/admin", get(admin::roster::roster))
        .route("/admin/student_marks/:id", get(admin::marks::student_marks))
        .route(
            "/admin/add_student",
            get(admin::students::add_student_page).post(admin::students::add_student_submit),
        )
        .route(
            "/admin/edit_student/:id",
            get(admin::students::edit_student_page).post(admin::students::edit_student_submit),
        )
        .route(
            "/admin/delete_student/:id",
            post(admin::students::delete_student),
        )
        .route(
            "/admin/add_marks/:id",
            get(admin::marks::add_marks_page).post(admin::marks::add_marks_submit),
        )
        .route(
            "/admin/edit_marks/:id",
            get(admin::marks::edit_marks_page).post(admin::marks::edit_marks_submit),
        )
        .route("/admin/delete_marks/:id", post(admin::marks::delete_marks))
        .route("/student/marks_list", get(student::marks_list))
        .route("/show/:filename", get(photos::show_page))
        .route("/uploads/:filename", get(photos::photo_file))
        .with_state(state)
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
