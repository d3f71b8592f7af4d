use std::path::Path;

use anyhow::{Context, Result};
use axum::{
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use tokio::{fs::File, io::AsyncWriteExt};
use tracing::warn;

/// Ensure the photo upload directory exists.
pub async fn ensure_upload_root(path: &Path) -> Result<()> {
    tokio::fs::create_dir_all(path)
        .await
        .with_context(|| format!("failed to ensure upload root at {}", path.display()))
}

/// Compose the stored filename for a student photo from the record fields
/// and the sanitized original filename. The composite runs through the
/// sanitizer a second time so that record fields cannot smuggle path
/// separators into the stored name.
pub fn photo_filename(name: &str, grade: &str, roll_number: &str, original: &str) -> String {
    let original = sanitize_filename::sanitize(original);
    sanitize_filename::sanitize(format!("{name}{grade}{roll_number}{original}"))
}

pub async fn save_photo(dir: &Path, filename: &str, bytes: &[u8]) -> std::io::Result<()> {
    let path = dir.join(filename);
    let mut file = File::create(&path).await?;
    file.write_all(bytes).await?;
    file.flush().await?;
    Ok(())
}

/// Best-effort removal: a file that is already gone is not an error.
pub async fn remove_photo(dir: &Path, filename: &str) {
    let path = dir.join(filename);
    match tokio::fs::remove_file(&path).await {
        Ok(()) => {}
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            warn!(?err, file = %path.display(), "failed to remove photo file");
        }
    }
}

pub fn photo_mime(filename: &str) -> mime::Mime {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        "png" => mime::IMAGE_PNG,
        "jpg" | "jpeg" => mime::IMAGE_JPEG,
        "gif" => mime::IMAGE_GIF,
        _ => mime::APPLICATION_OCTET_STREAM,
    }
}

/// Serve a stored photo inline. The filename is re-sanitized so the route
/// cannot be used to read outside the upload directory.
pub async fn stream_photo(dir: &Path, filename: &str) -> Result<Response, StatusCode> {
    let safe_name = sanitize_filename::sanitize(filename);
    let path = dir.join(&safe_name);

    let bytes = tokio::fs::read(&path)
        .await
        .map_err(|_| StatusCode::NOT_FOUND)?;

    let content_type = HeaderValue::from_str(photo_mime(&safe_name).as_ref())
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, content_type);

    Ok((headers, bytes).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_concatenates_record_fields() {
        assert_eq!(
            photo_filename("Ann", "5A", "1", "portrait.png"),
            "Ann5A1portrait.png"
        );
    }

    #[test]
    fn filename_strips_path_components() {
        let name = photo_filename("Ann", "5A", "1", "../../etc/passwd");
        assert!(!name.contains(".."));
        assert!(!name.contains('/'));
    }

    #[test]
    fn filename_sanitizes_record_fields_too() {
        let name = photo_filename("../Ann", "5A", "1", "p.png");
        assert!(!name.contains('/'));
    }

    #[test]
    fn content_type_by_extension() {
        assert_eq!(photo_mime("a.png"), mime::IMAGE_PNG);
        assert_eq!(photo_mime("a.JPG"), mime::IMAGE_JPEG);
        assert_eq!(photo_mime("a.bin"), mime::APPLICATION_OCTET_STREAM);
    }

    #[tokio::test]
    async fn save_and_remove_round_trip() {
        let dir = tempfile::tempdir().expect("tempdir");
        save_photo(dir.path(), "Ann5A1p.png", b"png-bytes")
            .await
            .expect("save");
        assert!(dir.path().join("Ann5A1p.png").exists());

        remove_photo(dir.path(), "Ann5A1p.png").await;
        assert!(!dir.path().join("Ann5A1p.png").exists());

        // removing again is a no-op
        remove_photo(dir.path(), "Ann5A1p.png").await;
    }
}
