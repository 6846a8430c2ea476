//! services/api/src/adapters/storage.rs
//!
//! This module contains the object-store adapter, the concrete implementation
//! of the `ObjectStore` port against the managed platform's cloud storage
//! upload API. Every stored object gets a public download URL.

use async_trait::async_trait;
use bytes::Bytes;
use uuid::Uuid;

use achameupet_core::ports::{ObjectStore, PortError, PortResult};

const DEFAULT_UPLOAD_ENDPOINT: &str = "https://storage.googleapis.com/upload/storage/v1";
const PUBLIC_URL_BASE: &str = "https://storage.googleapis.com";

/// Objects are grouped under the listing-photo prefix.
const OBJECT_PREFIX: &str = "animais";

/// An object-store adapter backed by the cloud storage JSON upload API.
#[derive(Clone)]
pub struct CloudObjectStore {
    client: reqwest::Client,
    bucket: String,
    endpoint: String,
    token: Option<String>,
}

impl CloudObjectStore {
    pub fn new(client: reqwest::Client, bucket: &str, token: Option<String>) -> Self {
        Self::with_endpoint(client, bucket, token, DEFAULT_UPLOAD_ENDPOINT)
    }

    /// Points the adapter at a different endpoint (a local emulator).
    pub fn with_endpoint(
        client: reqwest::Client,
        bucket: &str,
        token: Option<String>,
        endpoint: &str,
    ) -> Self {
        Self {
            client,
            bucket: bucket.to_string(),
            endpoint: endpoint.to_string(),
            token,
        }
    }
}

/// Client file names go into the object name, reduced to a safe subset.
fn sanitize(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "foto".to_string()
    } else {
        cleaned
    }
}

#[async_trait]
impl ObjectStore for CloudObjectStore {
    async fn store(
        &self,
        data: Bytes,
        content_type: &str,
        suggested_name: &str,
    ) -> PortResult<String> {
        // A random prefix keeps concurrent uploads of same-named files from
        // clobbering each other.
        let object_name = format!(
            "{OBJECT_PREFIX}/{}_{}",
            Uuid::new_v4(),
            sanitize(suggested_name)
        );

        let url = format!("{}/b/{}/o", self.endpoint, self.bucket);
        let mut req = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", object_name.as_str())])
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(data);
        if let Some(token) = &self.token {
            req = req.bearer_auth(token);
        }

        let resp = req
            .send()
            .await
            .map_err(|e| PortError::Upload(format!("{suggested_name}: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(PortError::Upload(format!(
                "{suggested_name}: {status} {body}"
            )));
        }

        Ok(format!("{PUBLIC_URL_BASE}/{}/{object_name}", self.bucket))
    }
}
