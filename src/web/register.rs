use axum::{
    extract::{Form, State},
    response::{Html, IntoResponse, Redirect, Response},
};
use tracing::error;
use uuid::Uuid;

use crate::web::{
    AppState, RequestError, auth, data,
    forms::RegisterForm,
    templates,
};

pub async fn register_page() -> Html<String> {
    Html(templates::render_register_page(
        &RegisterForm::default(),
        &Default::default(),
    ))
}

pub async fn register_submit(
    State(state): State<AppState>,
    Form(form): Form<RegisterForm>,
) -> Result<Response, RequestError> {
    let mut errors = form.validate();

    let email = form.email.trim().to_string();
    if errors.get("email").is_none() && data::email_exists(state.pool_ref(), &email).await? {
        errors.push("email", "Email already exists. Please use a different email.");
    }

    if !errors.is_empty() {
        return Ok(Html(templates::render_register_page(&form, &errors)).into_response());
    }

    let password_hash = auth::hash_password(&form.password)
        .map_err(|err| anyhow::anyhow!("failed to hash password: {err}"))?;

    let result = sqlx::query("INSERT INTO admins (id, email, password_hash) VALUES ($1, $2, $3)")
        .bind(Uuid::new_v4())
        .bind(&email)
        .bind(&password_hash)
        .execute(state.pool_ref())
        .await;

    match result {
        Ok(_) => Ok(Redirect::to("/admin/login?status=registered").into_response()),
        Err(sqlx::Error::Database(db_err))
            if db_err.constraint() == Some("idx_admins_email_lower") =>
        {
            errors.push("email", "Email already exists. Please use a different email.");
            Ok(Html(templates::render_register_page(&form, &errors)).into_response())
        }
        Err(err) => {
            error!(?err, "failed to register admin");
            Err(err.into())
        }
    }
}
