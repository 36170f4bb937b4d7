//! Asset host client.
//!
//! Generated images live on the provider's short-lived URLs; the asset
//! host gives them a stable home. Upload failures fall back to the
//! original URL and deletion is best-effort, so history persistence
//! never fails on hosting problems alone.

use async_trait::async_trait;
use serde::Deserialize;

use rusher_core::error::CoreError;

/// Capability for hosting generated images.
#[async_trait]
pub trait AssetHost: Send + Sync {
    /// Upload the image behind `source_url`, returning the hosted URL.
    async fn upload(&self, source_url: &str) -> Result<String, CoreError>;

    /// Remove a hosted asset by its public id. Best-effort: failures are
    /// logged, never propagated.
    async fn delete(&self, public_id: &str);
}

/// Response returned by the upload endpoint.
#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// HTTP client for a Cloudinary-style asset host.
pub struct CloudinaryHost {
    client: reqwest::Client,
    base_url: String,
    upload_preset: String,
    api_key: Option<String>,
    api_secret: Option<String>,
}

impl CloudinaryHost {
    /// Create a client for the given cloud account.
    ///
    /// `api_key`/`api_secret` are only needed for deletion; uploads use
    /// the unsigned preset.
    pub fn new(
        cloud_name: &str,
        upload_preset: String,
        api_key: Option<String>,
        api_secret: Option<String>,
    ) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: format!("https://api.cloudinary.com/v1_1/{cloud_name}"),
            upload_preset,
            api_key,
            api_secret,
        }
    }

    /// Override the base URL (tests point this at a local server).
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }
}

#[async_trait]
impl AssetHost for CloudinaryHost {
    async fn upload(&self, source_url: &str) -> Result<String, CoreError> {
        let form = reqwest::multipart::Form::new()
            .text("file", source_url.to_string())
            .text("upload_preset", self.upload_preset.clone());

        let response = self
            .client
            .post(format!("{}/image/upload", self.base_url))
            .multipart(form)
            .send()
            .await
            .map_err(|e| CoreError::AssetUpload(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CoreError::AssetUpload(format!(
                "Upload failed ({status}): {body}"
            )));
        }

        let parsed: UploadResponse = response
            .json()
            .await
            .map_err(|e| CoreError::AssetUpload(e.to_string()))?;
        Ok(parsed.secure_url)
    }

    async fn delete(&self, public_id: &str) {
        let (Some(api_key), Some(api_secret)) = (&self.api_key, &self.api_secret) else {
            tracing::debug!(public_id, "Asset deletion skipped: no admin credentials");
            return;
        };

        let result = self
            .client
            .post(format!("{}/image/destroy", self.base_url))
            .basic_auth(api_key, Some(api_secret))
            .form(&[("public_id", public_id)])
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => {
                tracing::debug!(public_id, "Deleted hosted asset");
            }
            Ok(response) => {
                tracing::warn!(
                    public_id,
                    status = %response.status(),
                    "Failed to delete hosted asset",
                );
            }
            Err(e) => {
                tracing::warn!(public_id, error = %e, "Failed to delete hosted asset");
            }
        }
    }
}

/// Extract the public id from a hosted asset URL: the last path segment
/// with its extension stripped.
pub fn extract_public_id(url: &str) -> Option<String> {
    let last = url.split('/').next_back()?;
    if last.is_empty() {
        return None;
    }
    let id = last.split('.').next().unwrap_or(last);
    if id.is_empty() {
        None
    } else {
        Some(id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_id_strips_extension() {
        assert_eq!(
            extract_public_id("https://res.example.com/img/upload/v1/abc123.png"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn public_id_without_extension() {
        assert_eq!(
            extract_public_id("https://res.example.com/img/abc123"),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn public_id_keeps_only_first_dot_segment() {
        assert_eq!(
            extract_public_id("https://res.example.com/img/abc.tar.gz"),
            Some("abc".to_string())
        );
    }

    #[test]
    fn public_id_of_trailing_slash_is_none() {
        assert_eq!(extract_public_id("https://res.example.com/img/"), None);
    }
}
