use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use thiserror::Error;
use url::Url;

use crate::{util::random_string, StorageConfig};

/// Timeout for storage requests. Uploads can be large, so this is generous.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("invalid storage configuration: {0}")]
    Configuration(String),
    #[error("storage request failed: {0}")]
    Request(String),
    #[error("storage service responded with {status}")]
    Response { status: StatusCode },
}

/// A successfully stored object
#[derive(Debug, Clone)]
pub struct StoredObject {
    pub key: String,
    /// Public URL the object is served from
    pub url: String,
    pub mime_type: String,
    pub size: usize,
}

/// Client for the object-storage service uploads are proxied to.
///
/// One request per upload, no retries. A failed write surfaces directly to
/// the caller of the current request.
pub struct StorageClient {
    client: Client,
    base_url: Url,
    bucket: String,
    key: String,
    public_url: String,
}

impl StorageClient {
    pub fn new(config: &StorageConfig) -> Result<Self, StorageError> {
        let mut base_url =
            Url::parse(&config.url).map_err(|e| StorageError::Configuration(e.to_string()))?;

        // Url::join treats a path without a trailing slash as a file
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            bucket: config.bucket.clone(),
            key: config.key.clone(),
            public_url: config.public_url.trim_end_matches('/').to_string(),
        })
    }

    /// Writes an object under the given key and returns where it is
    /// publicly served from
    pub async fn put_object(
        &self,
        key: &str,
        mime_type: &str,
        bytes: Vec<u8>,
    ) -> Result<StoredObject, StorageError> {
        let url = self
            .base_url
            .join(&format!("object/{}/{}", self.bucket, key))
            .map_err(|e| StorageError::Configuration(e.to_string()))?;

        let size = bytes.len();

        let response = self
            .client
            .post(url)
            .bearer_auth(&self.key)
            .header(header::CONTENT_TYPE, mime_type)
            .body(bytes)
            .send()
            .await
            .map_err(|e| StorageError::Request(e.to_string()))?;

        if !response.status().is_success() {
            return Err(StorageError::Response {
                status: response.status(),
            });
        }

        Ok(StoredObject {
            key: key.to_string(),
            url: format!("{}/{}", self.public_url, key),
            mime_type: mime_type.to_string(),
            size,
        })
    }
}

/// Builds a collision-safe object key from an uploaded filename
pub fn object_key(filename: &str) -> String {
    let safe: String = filename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '-'
            }
        })
        .collect();

    format!("{}-{}", random_string(8).to_lowercase(), safe)
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(server: &MockServer) -> StorageConfig {
        StorageConfig {
            url: server.uri(),
            key: "service-key".to_string(),
            bucket: "media".to_string(),
            public_url: "https://cdn.example.com/media/".to_string(),
        }
    }

    #[tokio::test]
    async fn stored_objects_get_a_public_url() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/object/media/parties/cover.jpg"))
            .and(header("authorization", "Bearer service-key"))
            .and(header("content-type", "image/jpeg"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let storage = StorageClient::new(&config(&server)).expect("client is built");

        let stored = storage
            .put_object("parties/cover.jpg", "image/jpeg", vec![0xff; 64])
            .await
            .expect("object is stored");

        assert_eq!(stored.key, "parties/cover.jpg");
        assert_eq!(stored.url, "https://cdn.example.com/media/parties/cover.jpg");
        assert_eq!(stored.size, 64);
    }

    #[tokio::test]
    async fn upstream_failures_are_surfaced() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let storage = StorageClient::new(&config(&server)).expect("client is built");

        let result = storage
            .put_object("parties/cover.jpg", "image/jpeg", vec![0xff; 64])
            .await;

        assert!(matches!(
            result,
            Err(StorageError::Response {
                status: StatusCode::INTERNAL_SERVER_ERROR
            })
        ));
    }

    #[test]
    fn object_keys_keep_no_unsafe_characters() {
        let key = object_key("my party pic?.jpg");
        let (_, name) = key.split_once('-').expect("key has a random prefix");

        assert_eq!(name, "my-party-pic-.jpg");
    }
}
