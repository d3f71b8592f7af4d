pub mod admin;
pub mod auth;
pub mod data;
pub mod errors;
pub mod forms;
pub mod landing;
pub mod models;
pub mod photos;
pub mod register;
pub mod router;
pub mod state;
pub mod storage;
pub mod student;
pub mod templates;
pub mod uploads;

pub use auth::{Principal, SESSION_COOKIE, SESSION_TTL_DAYS};
pub use errors::RequestError;
pub use state::AppState;
pub use templates::escape_html;
