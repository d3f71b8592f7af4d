use axum::response::{IntoResponse, Redirect, Response};
use tracing::error;

/// Request failures that end in a redirect rather than a re-rendered form.
///
/// Validation failures are the fourth kind of error this application
/// distinguishes; they carry per-field messages and re-render the
/// originating form, so they live in [`crate::web::forms::FieldErrors`]
/// instead of this enum.
pub enum RequestError {
    /// No usable session for a protected route.
    SignIn { login: &'static str },
    /// Authenticated, but the wrong principal kind for the route.
    Forbidden,
    /// Malformed or unknown identity in a path parameter.
    NotFound { notice: &'static str },
    /// Wrong email or password on a login form.
    Credentials { login: &'static str },
    /// Storage or filesystem failure; already-committed state is left as is.
    Internal(anyhow::Error),
}

impl RequestError {
    pub fn not_found(notice: &'static str) -> Self {
        Self::NotFound { notice }
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        match self {
            RequestError::SignIn { login } => Redirect::to(login).into_response(),
            RequestError::Forbidden => Redirect::to("/?error=not_authorized").into_response(),
            RequestError::NotFound { notice } => {
                Redirect::to(&format!("/admin?error={notice}")).into_response()
            }
            RequestError::Credentials { login } => {
                Redirect::to(&format!("{login}?error=invalid_credentials")).into_response()
            }
            RequestError::Internal(err) => {
                error!(?err, "request failed");
                Redirect::to("/?error=unknown").into_response()
            }
        }
    }
}

impl From<sqlx::Error> for RequestError {
    fn from(err: sqlx::Error) -> Self {
        Self::Internal(err.into())
    }
}

impl From<anyhow::Error> for RequestError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err)
    }
}

impl From<std::io::Error> for RequestError {
    fn from(err: std::io::Error) -> Self {
        Self::Internal(err.into())
    }
}
