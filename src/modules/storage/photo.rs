use base64::prelude::*;

use crate::core::error::AppError;
use crate::shared::constants::{ALLOWED_PHOTO_TYPES, MAX_PHOTO_SIZE};

/// A validated image ready for upload
#[derive(Debug, Clone)]
pub struct Photo {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

impl Photo {
    /// Validate raw bytes from a multipart field
    pub fn new(bytes: Vec<u8>, content_type: &str) -> Result<Self, AppError> {
        let content_type = content_type.trim().to_ascii_lowercase();

        if bytes.is_empty() {
            return Err(AppError::BadRequest("Photo is empty".to_string()));
        }
        if bytes.len() > MAX_PHOTO_SIZE {
            return Err(AppError::BadRequest(format!(
                "Photo too large. Maximum size is {} MB",
                MAX_PHOTO_SIZE / 1024 / 1024
            )));
        }
        if !ALLOWED_PHOTO_TYPES.contains(&content_type.as_str()) {
            return Err(AppError::BadRequest(format!(
                "Photo type '{}' is not allowed. Allowed types: {}",
                content_type,
                ALLOWED_PHOTO_TYPES.join(", ")
            )));
        }

        Ok(Self {
            bytes,
            content_type,
        })
    }

    /// Decode a camera capture sent as `data:image/jpeg;base64,...`
    pub fn from_data_url(data_url: &str) -> Result<Self, AppError> {
        let invalid = || AppError::BadRequest("Photo must be a base64 image data URL".to_string());

        let rest = data_url.trim().strip_prefix("data:").ok_or_else(invalid)?;
        let (meta, payload) = rest.split_once(',').ok_or_else(invalid)?;
        let content_type = meta.strip_suffix(";base64").ok_or_else(invalid)?;

        let bytes = BASE64_STANDARD
            .decode(payload.trim())
            .map_err(|e| AppError::BadRequest(format!("Photo is not valid base64: {}", e)))?;

        Self::new(bytes, content_type)
    }

    pub fn extension(&self) -> &'static str {
        match self.content_type.as_str() {
            "image/png" => "png",
            "image/webp" => "webp",
            _ => "jpg",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_data_url() {
        let encoded = BASE64_STANDARD.encode([0xFF, 0xD8, 0xFF, 0xE0]);
        let photo = Photo::from_data_url(&format!("data:image/jpeg;base64,{}", encoded)).unwrap();
        assert_eq!(photo.content_type, "image/jpeg");
        assert_eq!(photo.bytes, vec![0xFF, 0xD8, 0xFF, 0xE0]);
        assert_eq!(photo.extension(), "jpg");
    }

    #[test]
    fn test_from_data_url_rejects_malformed() {
        assert!(Photo::from_data_url("https://example.com/a.jpg").is_err());
        assert!(Photo::from_data_url("data:image/png,abc").is_err());
        assert!(Photo::from_data_url("data:image/png;base64,@@@").is_err());
    }

    #[test]
    fn test_rejects_disallowed_type() {
        let err = Photo::new(vec![1, 2, 3], "application/pdf").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }

    #[test]
    fn test_rejects_oversized() {
        let err = Photo::new(vec![0; MAX_PHOTO_SIZE + 1], "image/png").unwrap_err();
        assert!(matches!(err, AppError::BadRequest(_)));
    }
}
