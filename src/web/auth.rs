use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use chrono::{Duration as ChronoDuration, Utc};
use cookie::time::Duration as CookieDuration;
use rand_core::OsRng;
use sqlx::PgPool;
use tracing::error;
use uuid::Uuid;

use crate::web::{
    AppState, RequestError,
    forms::LoginForm,
    models::{AdminRow, StudentRow},
    templates::{self, NoticeQuery},
};

pub const SESSION_COOKIE: &str = "session_token";
pub const SESSION_TTL_DAYS: i64 = 7;

/// The authenticated identity behind a session, tagged by which account
/// table the email matched.
#[derive(Clone)]
pub enum Principal {
    Admin(AdminRow),
    Student(StudentRow),
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

pub async fn fetch_admin_by_email(pool: &PgPool, email: &str) -> sqlx::Result<Option<AdminRow>> {
    sqlx::query_as::<_, AdminRow>(
        "SELECT id, email, password_hash FROM admins WHERE LOWER(email) = LOWER($1)",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

pub async fn fetch_student_by_email(
    pool: &PgPool,
    email: &str,
) -> sqlx::Result<Option<StudentRow>> {
    sqlx::query_as::<_, StudentRow>(
        "SELECT id, name, age, roll_number, grade, email, photo, password_hash
         FROM students WHERE LOWER(email) = LOWER($1)",
    )
    .bind(email)
    .fetch_optional(pool)
    .await
}

/// Resolve a session token to its principal, checking the admin table first
/// and the student table second.
pub async fn fetch_principal_by_session(
    pool: &PgPool,
    token: Uuid,
) -> sqlx::Result<Option<Principal>> {
    let email: Option<String> = sqlx::query_scalar(
        "SELECT principal_email FROM sessions WHERE id = $1 AND expires_at > NOW()",
    )
    .bind(token)
    .fetch_optional(pool)
    .await?;

    let Some(email) = email else {
        return Ok(None);
    };

    if let Some(admin) = fetch_admin_by_email(pool, &email).await? {
        return Ok(Some(Principal::Admin(admin)));
    }

    Ok(fetch_student_by_email(pool, &email)
        .await?
        .map(Principal::Student))
}

pub async fn current_principal(state: &AppState, jar: &CookieJar) -> Option<Principal> {
    let token_cookie = jar.get(SESSION_COOKIE)?;
    let token = Uuid::parse_str(token_cookie.value()).ok()?;

    match fetch_principal_by_session(state.pool_ref(), token).await {
        Ok(principal) => principal,
        Err(err) => {
            error!(?err, "failed to resolve session principal");
            None
        }
    }
}

pub async fn require_admin(state: &AppState, jar: &CookieJar) -> Result<AdminRow, RequestError> {
    match current_principal(state, jar).await {
        Some(Principal::Admin(admin)) => Ok(admin),
        Some(Principal::Student(_)) => Err(RequestError::Forbidden),
        None => Err(RequestError::SignIn {
            login: "/admin/login",
        }),
    }
}

pub async fn require_student(
    state: &AppState,
    jar: &CookieJar,
) -> Result<StudentRow, RequestError> {
    match current_principal(state, jar).await {
        Some(Principal::Student(student)) => Ok(student),
        Some(Principal::Admin(_)) => Err(RequestError::Forbidden),
        None => Err(RequestError::SignIn {
            login: "/student/login",
        }),
    }
}

async fn open_session(pool: &PgPool, email: &str) -> sqlx::Result<Uuid> {
    let token = Uuid::new_v4();
    let expires_at = Utc::now() + ChronoDuration::days(SESSION_TTL_DAYS);

    sqlx::query("INSERT INTO sessions (id, principal_email, expires_at) VALUES ($1, $2, $3)")
        .bind(token)
        .bind(email)
        .bind(expires_at)
        .execute(pool)
        .await?;

    Ok(token)
}

fn session_cookie(token: Uuid) -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, token.to_string());
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::days(SESSION_TTL_DAYS));
    cookie
}

fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::new(SESSION_COOKIE, "");
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_same_site(SameSite::Lax);
    cookie.set_max_age(CookieDuration::seconds(0));
    cookie
}

pub async fn admin_login_page(Query(params): Query<NoticeQuery>) -> Html<String> {
    Html(templates::render_login_page(
        "Admin Login",
        "/admin/login",
        true,
        &params,
    ))
}

pub async fn admin_login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), RequestError> {
    let email = form.email.trim();

    let admin = fetch_admin_by_email(state.pool_ref(), email)
        .await?
        .ok_or(RequestError::Credentials {
            login: "/admin/login",
        })?;

    if !verify_password(&form.password, &admin.password_hash) {
        return Err(RequestError::Credentials {
            login: "/admin/login",
        });
    }

    let token = open_session(state.pool_ref(), &admin.email).await?;
    Ok((jar.add(session_cookie(token)), Redirect::to("/admin")))
}

pub async fn student_login_page(Query(params): Query<NoticeQuery>) -> Html<String> {
    Html(templates::render_login_page(
        "Student Login",
        "/student/login",
        false,
        &params,
    ))
}

pub async fn student_login_submit(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<(CookieJar, Redirect), RequestError> {
    let email = form.email.trim();

    let student = fetch_student_by_email(state.pool_ref(), email)
        .await?
        .ok_or(RequestError::Credentials {
            login: "/student/login",
        })?;

    if !verify_password(&form.password, &student.password_hash) {
        return Err(RequestError::Credentials {
            login: "/student/login",
        });
    }

    let token = open_session(state.pool_ref(), &student.email).await?;
    Ok((
        jar.add(session_cookie(token)),
        Redirect::to("/student/marks_list"),
    ))
}

pub async fn admin_logout(State(state): State<AppState>, jar: CookieJar) -> (CookieJar, Redirect) {
    logout(state, jar).await
}

pub async fn student_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> (CookieJar, Redirect) {
    logout(state, jar).await
}

async fn logout(state: AppState, jar: CookieJar) -> (CookieJar, Redirect) {
    let mut jar = jar;

    if let Some(cookie) = jar.get(SESSION_COOKIE) {
        if let Ok(token) = Uuid::parse_str(cookie.value()) {
            if let Err(err) = sqlx::query("DELETE FROM sessions WHERE id = $1")
                .bind(token)
                .execute(state.pool_ref())
                .await
            {
                error!(?err, "failed to remove session during logout");
            }
        }
    }

    jar = jar.remove(removal_cookie());

    (jar, Redirect::to("/?status=logged_out"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_round_trip() {
        let hash = hash_password("secret1").expect("hash");
        assert!(verify_password("secret1", &hash));
        assert!(!verify_password("secret2", &hash));
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        assert!(!verify_password("secret1", "not-a-phc-string"));
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("secret1").expect("hash");
        let second = hash_password("secret1").expect("hash");
        assert_ne!(first, second);
    }
}
