use serde::{Deserialize, Serialize};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// One file of a multipart upload batch, already read into memory.
#[derive(Debug, Clone)]
pub struct IncomingImage {
    pub file_name: String,
    pub content_type: String,
    pub bytes: bytes::Bytes,
}

impl IncomingImage {
    pub fn new(file_name: String, content_type: Option<String>, bytes: bytes::Bytes) -> Self {
        let content_type = content_type
            .filter(|value| !value.is_empty())
            .unwrap_or_else(|| {
                mime_guess::from_path(&file_name)
                    .first_or_octet_stream()
                    .essence_str()
                    .to_string()
            });

        Self {
            file_name,
            content_type,
            bytes,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        if !self.content_type.starts_with("image/") {
            return Err(format!("{} is not an image file", self.file_name));
        }
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(format!("{} is larger than 10MB", self.file_name));
        }
        Ok(())
    }
}

/// Collects every per-file problem so the caller can reject the whole batch at once.
pub fn validate_batch(files: &[IncomingImage]) -> Result<(), Vec<String>> {
    let errors: Vec<String> = files
        .iter()
        .filter_map(|file| file.validate().err())
        .collect();

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}

/// Every character outside `[A-Za-z0-9]` becomes `_`.
pub fn sanitize_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Text after the last `.`, or the whole name when there is no dot.
pub fn file_extension(file_name: &str) -> &str {
    file_name.rsplit('.').next().unwrap_or(file_name)
}

/// `<sanitized project name>_<seq:02>.<ext>`
pub fn stored_file_name(project_name: &str, sequence: usize, original_name: &str) -> String {
    format!(
        "{}_{:02}.{}",
        sanitize_name(project_name),
        sequence,
        file_extension(original_name)
    )
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UploadOutcome {
    pub file_name: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl UploadOutcome {
    pub fn succeeded(file_name: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            success: true,
            error: None,
        }
    }

    pub fn failed(file_name: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            success: false,
            error: Some(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    fn image(name: &str, content_type: &str, len: usize) -> IncomingImage {
        IncomingImage::new(
            name.to_string(),
            Some(content_type.to_string()),
            Bytes::from(vec![0u8; len]),
        )
    }

    #[test]
    fn stored_file_name_sanitizes_and_pads() {
        assert_eq!(
            stored_file_name("Villa Rosa #2", 3, "IMG.0001.JPG"),
            "Villa_Rosa__2_03.JPG"
        );
        assert_eq!(stored_file_name("Loft", 12, "noext"), "Loft_12.noext");
    }

    #[test]
    fn batch_reports_every_invalid_file() {
        let files = vec![
            image("a.jpg", "image/jpeg", 10),
            image("notes.pdf", "application/pdf", 10),
            image("huge.png", "image/png", MAX_UPLOAD_BYTES + 1),
        ];

        let errors = validate_batch(&files).unwrap_err();
        assert_eq!(
            errors,
            vec![
                "notes.pdf is not an image file".to_string(),
                "huge.png is larger than 10MB".to_string(),
            ]
        );
    }

    #[test]
    fn exactly_ten_megabytes_is_accepted() {
        assert!(image("edge.jpg", "image/jpeg", MAX_UPLOAD_BYTES).validate().is_ok());
    }

    #[test]
    fn missing_content_type_is_guessed_from_extension() {
        let file = IncomingImage::new("kitchen.png".into(), None, Bytes::from_static(b"x"));
        assert_eq!(file.content_type, "image/png");
        assert!(file.validate().is_ok());
    }
}
