//! Client for the media host that stores product images.
//!
//! Speaks the Cloudinary upload API: signed multipart uploads and signed
//! destroy calls. Credentials never leave the server.

use std::str::FromStr;
use std::sync::Arc;

use color_eyre::eyre::{eyre, WrapErr};
use serde::Deserialize;
use sha1::Sha1;
use sha2::{Digest, Sha256};
use thiserror::Error;
use tracing::{error, info, warn};

/// Delivery transformation applied to uploaded images
pub const DELIVERY_TRANSFORMATION: &str = "w_800,c_fit,f_auto";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    Sha1,
    Sha256,
}

impl FromStr for SignatureAlgorithm {
    type Err = color_eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "sha1" => Ok(Self::Sha1),
            "sha256" => Ok(Self::Sha256),
            other => Err(eyre!("Unsupported media signature algorithm: {other}")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct MediaHostConfig {
    pub base_url: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    pub folder: String,
    pub signature_algorithm: SignatureAlgorithm,
}

impl MediaHostConfig {
    pub fn from_env() -> crate::Result<Self> {
        let required = |name: &str| {
            std::env::var(name).wrap_err_with(|| format!("{name} environment variable not set"))
        };

        Ok(Self {
            base_url: std::env::var("MEDIA_BASE_URL")
                .unwrap_or_else(|_| "https://api.cloudinary.com".to_string()),
            cloud_name: required("MEDIA_CLOUD_NAME")?,
            api_key: required("MEDIA_API_KEY")?,
            api_secret: required("MEDIA_API_SECRET")?,
            folder: std::env::var("MEDIA_FOLDER").unwrap_or_else(|_| "storefront".to_string()),
            signature_algorithm: std::env::var("MEDIA_SIGNATURE_ALGORITHM")
                .unwrap_or_else(|_| "sha1".to_string())
                .parse()?,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{}",
            self.base_url.trim_end_matches('/'),
            self.cloud_name,
            action
        )
    }
}

#[derive(Debug, Error)]
pub enum MediaError {
    #[error("media host request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("media host responded with {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    #[error("media host refused to destroy {public_id}: {result}")]
    Destroy { public_id: String, result: String },
}

/// An image stored on the media host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedImage {
    /// Delivery URL with [`DELIVERY_TRANSFORMATION`] applied
    pub url: String,
    pub public_id: String,
}

#[derive(Deserialize)]
struct UploadResponse {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResponse {
    result: String,
}

#[derive(Clone)]
pub struct MediaHost {
    config: Arc<MediaHostConfig>,
    client: reqwest::Client,
}

impl MediaHost {
    pub fn new(config: MediaHostConfig, client: reqwest::Client) -> Self {
        Self {
            config: Arc::new(config),
            client,
        }
    }

    /// Upload an image into the configured folder
    #[tracing::instrument(skip(self, bytes), fields(size = bytes.len()), err)]
    pub async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        content_type: &str,
    ) -> Result<UploadedImage, MediaError> {
        let timestamp = unix_timestamp();
        let signature = sign(
            &[("folder", self.config.folder.as_str()), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(content_type)?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("timestamp", timestamp)
            .text("folder", self.config.folder.clone())
            .text("signature", signature);

        let response = self
            .client
            .post(self.config.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;

        let uploaded: UploadResponse = error_for_status(response).await?.json().await?;
        info!("Uploaded image {}", uploaded.public_id);

        Ok(UploadedImage {
            url: delivery_url(&uploaded.secure_url),
            public_id: uploaded.public_id,
        })
    }

    /// Delete an image. An image that is already gone counts as success.
    #[tracing::instrument(skip(self), err)]
    pub async fn destroy(&self, public_id: &str) -> Result<(), MediaError> {
        let timestamp = unix_timestamp();
        let signature = sign(
            &[("public_id", public_id), ("timestamp", timestamp.as_str())],
            &self.config.api_secret,
            self.config.signature_algorithm,
        );

        let response = self
            .client
            .post(self.config.endpoint("destroy"))
            .form(&[
                ("public_id", public_id),
                ("api_key", self.config.api_key.as_str()),
                ("timestamp", timestamp.as_str()),
                ("signature", signature.as_str()),
            ])
            .send()
            .await?;

        let destroyed: DestroyResponse = error_for_status(response).await?.json().await?;
        match destroyed.result.as_str() {
            "ok" => {
                info!("Destroyed image {}", public_id);
                Ok(())
            }
            "not found" => {
                warn!("Image {} was already gone from the media host", public_id);
                Ok(())
            }
            _ => Err(MediaError::Destroy {
                public_id: public_id.to_string(),
                result: destroyed.result,
            }),
        }
    }

    /// Destroy `current` if `incoming` replaces it. Failures are only logged.
    pub async fn discard_replaced(&self, current: Option<&str>, incoming: Option<&str>) {
        if !should_replace_image(current, incoming) {
            return;
        }
        let Some(current) = current else {
            return;
        };

        if let Err(err) = self.destroy(current).await {
            error!(error = ?err, "Error deleting old image {} from the media host", current);
        }
    }
}

async fn error_for_status(response: reqwest::Response) -> Result<reqwest::Response, MediaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .await
        .unwrap_or_else(|_| "Failed to read error response".to_string());
    Err(MediaError::Status { status, body })
}

fn unix_timestamp() -> String {
    chrono::Utc::now().timestamp().to_string()
}

/// Sign request parameters: sort by name, join as `k=v&k=v`, append the
/// secret, and hex-encode the digest.
pub fn sign(params: &[(&str, &str)], api_secret: &str, algorithm: SignatureAlgorithm) -> String {
    let mut params = params.to_vec();
    params.sort_by(|a, b| a.0.cmp(b.0));

    let mut payload = params
        .iter()
        .map(|(key, value)| format!("{key}={value}"))
        .collect::<Vec<_>>()
        .join("&");
    payload.push_str(api_secret);

    match algorithm {
        SignatureAlgorithm::Sha1 => format!("{:x}", Sha1::digest(payload.as_bytes())),
        SignatureAlgorithm::Sha256 => format!("{:x}", Sha256::digest(payload.as_bytes())),
    }
}

/// Rewrite a media-host URL so it is delivered through [`DELIVERY_TRANSFORMATION`].
/// URLs without an `/upload/` segment are returned unchanged.
pub fn delivery_url(secure_url: &str) -> String {
    secure_url.replacen(
        "/upload/",
        &format!("/upload/{DELIVERY_TRANSFORMATION}/"),
        1,
    )
}

/// Whether saving `incoming` over `current` should destroy the current image.
///
/// Only when both identifiers are present and they differ: an update that
/// carries no image, or the same image, leaves the stored one alone.
pub fn should_replace_image(current: Option<&str>, incoming: Option<&str>) -> bool {
    match (current, incoming) {
        (Some(current), Some(incoming)) => {
            !current.is_empty() && !incoming.is_empty() && current != incoming
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signs_sorted_params_with_sha1() {
        let signature = sign(
            &[
                ("timestamp", "1315060510"),
                ("public_id", "sample_image"),
                ("eager", "w_400,h_300,c_pad|w_260,h_200,c_crop"),
            ],
            "abcd",
            SignatureAlgorithm::Sha1,
        );

        assert_eq!(signature, "bfd09f95f331f558cbd1320e67aa8d488770583e");
    }

    #[test]
    fn signs_with_sha256() {
        let signature = sign(
            &[("timestamp", "1315060510"), ("public_id", "sample_image")],
            "abcd",
            SignatureAlgorithm::Sha256,
        );

        assert_eq!(
            signature,
            "e3c44b54e67a3ecc918f5d7236ca5faa36250ea8a8cd6cbabfd2d6bb2453acac"
        );
    }

    #[test]
    fn parses_signature_algorithm() {
        assert_eq!("SHA256".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Sha256);
        assert_eq!("sha1".parse::<SignatureAlgorithm>().unwrap(), SignatureAlgorithm::Sha1);
        assert!("md5".parse::<SignatureAlgorithm>().is_err());
    }

    #[test]
    fn delivery_url_inserts_transformation_once() {
        assert_eq!(
            delivery_url("https://res.cloudinary.com/demo/image/upload/v1712/storefront/mug.png"),
            "https://res.cloudinary.com/demo/image/upload/w_800,c_fit,f_auto/v1712/storefront/mug.png"
        );
        assert_eq!(
            delivery_url("https://via.placeholder.com/150"),
            "https://via.placeholder.com/150"
        );
    }

    #[test]
    fn replaces_image_only_when_ids_differ() {
        assert!(should_replace_image(Some("shop/old"), Some("shop/new")));
        assert!(!should_replace_image(Some("shop/old"), Some("shop/old")));
        assert!(!should_replace_image(None, Some("shop/new")));
        assert!(!should_replace_image(Some("shop/old"), None));
        assert!(!should_replace_image(Some("shop/old"), Some("")));
    }

    #[test]
    fn endpoint_joins_base_and_cloud() {
        let config = MediaHostConfig {
            base_url: "http://127.0.0.1:9000/".to_string(),
            cloud_name: "demo".to_string(),
            api_key: "key".to_string(),
            api_secret: "secret".to_string(),
            folder: "storefront".to_string(),
            signature_algorithm: SignatureAlgorithm::Sha1,
        };

        assert_eq!(
            config.endpoint("destroy"),
            "http://127.0.0.1:9000/v1_1/demo/image/destroy"
        );
    }
}
