use std::collections::HashMap;

use axum::extract::Multipart;

/// Result type used by the multipart form reader.
pub type UploadResult<T> = Result<T, UploadError>;

/// Error returned when reading a multipart submission.
#[derive(Debug)]
pub struct UploadError {
    message: String,
}

impl UploadError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl std::fmt::Display for UploadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for UploadError {}

/// An uploaded photo, buffered in memory until the form it arrived with has
/// passed validation and a stored filename can be composed.
pub struct PhotoUpload {
    pub original_name: String,
    pub bytes: Vec<u8>,
}

/// Text fields plus the optional photo of a student form submission.
#[derive(Default)]
pub struct FormSubmission {
    pub fields: HashMap<String, Vec<String>>,
    pub photo: Option<PhotoUpload>,
}

const PHOTO_FIELD: &str = "photo";

/// Reads a student form submission. A photo part with an empty filename is
/// what browsers send when no file was chosen; it counts as no photo.
pub async fn read_form(mut multipart: Multipart) -> UploadResult<FormSubmission> {
    let mut submission = FormSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| UploadError::new(format!("failed to parse upload form: {err}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            let value = field.text().await.map_err(|err| {
                UploadError::new(format!("failed to read field `{field_name}`: {err}"))
            })?;
            submission
                .fields
                .entry(field_name)
                .or_default()
                .push(value);
            continue;
        };

        if field_name != PHOTO_FIELD {
            return Err(UploadError::new(format!(
                "unsupported file field: `{field_name}`"
            )));
        }

        if file_name.is_empty() {
            continue;
        }

        if submission.photo.is_some() {
            return Err(UploadError::new("only one photo may be uploaded"));
        }

        let bytes = field
            .bytes()
            .await
            .map_err(|err| UploadError::new(format!("failed to read uploaded photo: {err}")))?;

        submission.photo = Some(PhotoUpload {
            original_name: file_name,
            bytes: bytes.to_vec(),
        });
    }

    Ok(submission)
}
