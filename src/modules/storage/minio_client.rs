//! MinIO/S3-compatible storage client for record photos.
//!
//! Photos live under the public prefix (`public/<folder>/<id>.<ext>`) and are
//! referenced from records by their public URL. Anonymous read access on the
//! public prefix is configured on the bucket itself.

use s3::creds::Credentials;
use s3::{Bucket, BucketConfiguration, Region};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::core::config::MinIOConfig;
use crate::core::error::AppError;

use super::photo::Photo;

pub struct MinIOClient {
    bucket: Box<Bucket>,
    region: Region,
    credentials: Credentials,
    endpoint: String,
    public_endpoint: String,
    public_prefix: String,
}

impl MinIOClient {
    pub async fn new(config: MinIOConfig) -> Result<Self, AppError> {
        let credentials = Credentials::new(
            Some(&config.access_key),
            Some(&config.secret_key),
            None,
            None,
            None,
        )
        .map_err(|e| AppError::Internal(format!("Failed to create MinIO credentials: {}", e)))?;

        let region = Region::Custom {
            region: config.region.clone(),
            endpoint: config.endpoint.clone(),
        };

        let mut bucket = Bucket::new(&config.bucket, region.clone(), credentials.clone())
            .map_err(|e| AppError::Internal(format!("Failed to create MinIO bucket: {}", e)))?;

        // http://endpoint/bucket rather than http://bucket.endpoint
        bucket.set_path_style();

        let client = Self {
            bucket,
            region,
            credentials,
            endpoint: config.endpoint,
            public_endpoint: config.public_endpoint,
            public_prefix: config.public_prefix,
        };

        info!(
            "MinIO client initialized for endpoint: {}, bucket: {}",
            client.endpoint,
            client.bucket.name()
        );

        Ok(client)
    }

    /// Create the bucket unless it is already there
    pub async fn ensure_bucket_exists(&self) -> Result<(), AppError> {
        let created = Bucket::create_with_path_style(
            &self.bucket.name(),
            self.region.clone(),
            self.credentials.clone(),
            BucketConfiguration::default(),
        )
        .await;

        match created {
            Ok(_) => {
                info!("Bucket '{}' created", self.bucket.name());
                Ok(())
            }
            Err(e) => {
                let error_str = e.to_string();
                if error_str.contains("BucketAlreadyOwnedByYou")
                    || error_str.contains("BucketAlreadyExists")
                {
                    debug!("Bucket '{}' already exists", self.bucket.name());
                } else {
                    warn!(
                        "Could not create bucket '{}': {}. Assuming it exists.",
                        self.bucket.name(),
                        e
                    );
                }
                Ok(())
            }
        }
    }

    pub fn bucket_name(&self) -> String {
        self.bucket.name()
    }

    /// `public/<folder>/<uuid v7>.<ext>`
    pub fn photo_key(&self, folder: &str, photo: &Photo) -> String {
        format!(
            "{}/{}/{}.{}",
            self.public_prefix,
            folder,
            Uuid::now_v7(),
            photo.extension()
        )
    }

    /// Store a photo under `folder` and return its public URL
    pub async fn upload_photo(&self, folder: &str, photo: Photo) -> Result<String, AppError> {
        let key = self.photo_key(folder, &photo);

        self.bucket
            .put_object_with_content_type(&key, &photo.bytes, &photo.content_type)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to upload file '{}': {}", key, e)))?;

        debug!("Uploaded '{}' ({} bytes)", key, photo.bytes.len());
        Ok(self.public_url(&key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), AppError> {
        self.bucket
            .delete_object(key)
            .await
            .map_err(|e| AppError::Internal(format!("Failed to delete file '{}': {}", key, e)))?;

        debug!("Deleted '{}' from bucket '{}'", key, self.bucket.name());
        Ok(())
    }

    /// Delete the object behind a stored public URL.
    ///
    /// URLs that do not point into this bucket are left alone.
    pub async fn delete_by_url(&self, url: &str) -> Result<(), AppError> {
        match self.extract_key_from_url(url) {
            Some(key) => self.delete(&key).await,
            None => {
                warn!("Not deleting '{}': not an object URL of this bucket", url);
                Ok(())
            }
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        object_url(&self.public_endpoint, &self.bucket.name(), key)
    }

    /// Object key behind a public or internal URL of this bucket
    pub fn extract_key_from_url(&self, url: &str) -> Option<String> {
        let bucket = self.bucket.name();
        [&self.public_endpoint, &self.endpoint]
            .into_iter()
            .find_map(|endpoint| key_from_url(endpoint, &bucket, url))
    }
}

fn object_url(endpoint: &str, bucket: &str, key: &str) -> String {
    format!("{}/{}/{}", endpoint, bucket, key)
}

fn key_from_url(endpoint: &str, bucket: &str, url: &str) -> Option<String> {
    let prefix = format!("{}/{}/", endpoint, bucket);
    url.strip_prefix(&prefix)
        .filter(|key| !key.is_empty())
        .map(|key| key.split(['?', '#']).next().unwrap_or(key).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_round_trip_through_url() {
        let url = object_url(
            "https://cdn.example.com",
            "haulage-photos",
            "public/vehicle-photos/a.jpg",
        );
        assert_eq!(
            url,
            "https://cdn.example.com/haulage-photos/public/vehicle-photos/a.jpg"
        );
        assert_eq!(
            key_from_url("https://cdn.example.com", "haulage-photos", &url).as_deref(),
            Some("public/vehicle-photos/a.jpg")
        );
    }

    #[test]
    fn test_key_from_foreign_url() {
        assert_eq!(
            key_from_url(
                "https://cdn.example.com",
                "haulage-photos",
                "https://elsewhere.net/haulage-photos/x.jpg"
            ),
            None
        );
        assert_eq!(
            key_from_url(
                "https://cdn.example.com",
                "haulage-photos",
                "https://cdn.example.com/haulage-photos/"
            ),
            None
        );
    }

    #[test]
    fn test_key_drops_query_string() {
        assert_eq!(
            key_from_url(
                "http://localhost:9000",
                "b",
                "http://localhost:9000/b/public/driver-licenses/l.png?v=2"
            )
            .as_deref(),
            Some("public/driver-licenses/l.png")
        );
    }
}
