//! Object storage for record photos
//!
//! MinIO/S3-compatible client plus validation of incoming images.

mod minio_client;
mod photo;

pub use minio_client::MinIOClient;
pub use photo::Photo;
