//! Object storage for media assets (S3 / MinIO).

use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use thiserror::Error;
use tracing::info;
use uuid::Uuid;

use crate::config::Config;

/// Content types accepted for upload. Anything else is rejected up front.
const ALLOWED_CONTENT_TYPES: &[&str] = &["video/mp4", "application/pdf"];

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("upload of '{key}' failed: {message}")]
    Upload { key: String, message: String },

    #[error("delete of '{key}' failed: {message}")]
    Delete { key: String, message: String },
}

#[derive(Clone)]
pub struct MediaStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_url: String,
}

impl MediaStore {
    /// Constructs an S3 client configured for MinIO (local) or AWS (production).
    pub async fn from_config(config: &Config) -> Self {
        let credentials = Credentials::new(
            &config.aws_access_key_id,
            &config.aws_secret_access_key,
            None,
            None,
            "mediacms-static",
        );

        let s3_config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(config.s3_region.clone()))
            .credentials_provider(credentials)
            .endpoint_url(&config.s3_endpoint)
            .load()
            .await;

        let s3 = aws_sdk_s3::config::Builder::from(&s3_config)
            .force_path_style(true)
            .build();

        Self {
            client: aws_sdk_s3::Client::from_conf(s3),
            bucket: config.s3_bucket.clone(),
            public_url: config.s3_public_url.clone(),
        }
    }

    pub fn public_url(&self, key: &str) -> String {
        public_url(&self.public_url, key)
    }

    /// Uploads `bytes` under `key` and returns the public URL.
    pub async fn put(
        &self,
        key: &str,
        bytes: Bytes,
        content_type: &str,
    ) -> Result<String, StorageError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| StorageError::Upload {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Uploaded s3://{}/{}", self.bucket, key);
        Ok(self.public_url(key))
    }

    pub async fn delete(&self, key: &str) -> Result<(), StorageError> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| StorageError::Delete {
                key: key.to_string(),
                message: e.to_string(),
            })?;

        info!("Deleted s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

pub fn is_allowed_content_type(content_type: &str) -> bool {
    let ct = content_type.trim().to_ascii_lowercase();
    ct.starts_with("image/") || ALLOWED_CONTENT_TYPES.contains(&ct.as_str())
}

/// `tenants/{tenant_id}/media/{uuid}-{sanitized file name}`
pub fn media_key(tenant_id: Uuid, file_name: &str) -> String {
    format!(
        "tenants/{}/media/{}-{}",
        tenant_id,
        Uuid::new_v4(),
        sanitize_file_name(file_name)
    )
}

/// Keeps ASCII alphanumerics, `.`, `-` and `_`; everything else becomes `_`.
pub fn sanitize_file_name(name: &str) -> String {
    // Browsers on Windows may send a full path.
    let base = name.rsplit(['/', '\\']).next().unwrap_or(name);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let cleaned = cleaned.trim_matches('.').to_string();
    if cleaned.is_empty() {
        "file".to_string()
    } else {
        cleaned
    }
}

fn public_url(base: &str, key: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), key)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_paths_and_unicode() {
        assert_eq!(sanitize_file_name("C:\\Users\\me\\photo 1.png"), "photo_1.png");
        assert_eq!(sanitize_file_name("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_file_name("写真.jpg"), "__.jpg");
        assert_eq!(sanitize_file_name("..."), "file");
    }

    #[test]
    fn test_media_key_is_scoped_to_tenant() {
        let tenant = Uuid::new_v4();
        let key = media_key(tenant, "cover.webp");
        assert!(key.starts_with(&format!("tenants/{tenant}/media/")));
        assert!(key.ends_with("-cover.webp"));
    }

    #[test]
    fn test_allowed_content_types() {
        assert!(is_allowed_content_type("image/png"));
        assert!(is_allowed_content_type("IMAGE/WEBP"));
        assert!(is_allowed_content_type("application/pdf"));
        assert!(!is_allowed_content_type("application/x-msdownload"));
        assert!(!is_allowed_content_type("text/html"));
    }

    #[test]
    fn test_public_url_joins_without_double_slash() {
        assert_eq!(
            public_url("https://cdn.example.com/", "tenants/a/media/b.png"),
            "https://cdn.example.com/tenants/a/media/b.png"
        );
    }
}
