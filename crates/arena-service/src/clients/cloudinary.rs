//! Signed uploads and deletes against the Cloudinary REST API

use arena_common::ImageHostConfig;
use arena_core::traits::{ImageHost, PortResult};
use arena_core::{DomainError, HostedImage, ImageUpload, UploadTarget};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use tracing::{debug, instrument};

const API_BASE: &str = "https://api.cloudinary.com/v1_1";

#[derive(Deserialize)]
struct UploadResult {
    secure_url: String,
    public_id: String,
}

#[derive(Deserialize)]
struct DestroyResult {
    result: String,
}

/// Cloudinary-backed [`ImageHost`]
pub struct CloudinaryImageHost {
    client: reqwest::Client,
    config: ImageHostConfig,
}

impl CloudinaryImageHost {
    pub fn new(config: ImageHostConfig) -> reqwest::Result<Self> {
        Ok(Self {
            client: super::http_client()?,
            config,
        })
    }

    fn endpoint(&self, action: &str) -> String {
        format!("{API_BASE}/{}/image/{action}", self.config.cloud_name)
    }

    fn signature(&self, params: &[(&str, String)]) -> String {
        sign_params(params, &self.config.api_secret)
    }
}

/// Request signature: SHA-1 over `k=v` pairs sorted by key and joined with
/// `&`, immediately followed by the API secret.
pub fn sign_params(params: &[(&str, String)], secret: &str) -> String {
    let mut sorted: Vec<&(&str, String)> = params.iter().collect();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha1::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

fn upstream(context: &str, err: impl std::fmt::Display) -> DomainError {
    DomainError::UpstreamError(format!("{context}: {err}"))
}

#[async_trait]
impl ImageHost for CloudinaryImageHost {
    #[instrument(skip(self, image), fields(public_id = %target.qualified_id(), bytes = image.bytes.len()))]
    async fn upload(&self, image: &ImageUpload, target: &UploadTarget) -> PortResult<HostedImage> {
        let signed = vec![
            ("folder", target.folder.to_string()),
            ("invalidate", "true".to_string()),
            ("overwrite", "true".to_string()),
            ("public_id", target.public_id.clone()),
            ("timestamp", Utc::now().timestamp().to_string()),
            ("transformation", target.transformation.to_param()),
        ];
        let signature = self.signature(&signed);

        let file = Part::bytes(image.bytes.clone())
            .file_name(image.filename.clone())
            .mime_str(image.format.mime_type())
            .map_err(|e| upstream("image upload", e))?;

        let mut form = Form::new().part("file", file);
        for (key, value) in signed {
            form = form.text(key, value);
        }
        form = form
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        let result: UploadResult = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| upstream("image upload", e))?
            .json()
            .await
            .map_err(|e| upstream("image upload response", e))?;

        debug!(url = %result.secure_url, "Image uploaded");
        Ok(HostedImage {
            url: result.secure_url,
            public_id: result.public_id,
        })
    }

    #[instrument(skip(self))]
    async fn delete(&self, public_id: &str) -> PortResult<bool> {
        let signed = vec![
            ("invalidate", "true".to_string()),
            ("public_id", public_id.to_string()),
            ("timestamp", Utc::now().timestamp().to_string()),
        ];
        let signature = self.signature(&signed);

        let mut form: Vec<(&str, String)> = signed;
        form.push(("api_key", self.config.api_key.clone()));
        form.push(("signature", signature));

        let result: DestroyResult = self
            .client
            .post(self.endpoint("destroy"))
            .form(&form)
            .send()
            .await
            .and_then(reqwest::Response::error_for_status)
            .map_err(|e| upstream("image delete", e))?
            .json()
            .await
            .map_err(|e| upstream("image delete response", e))?;

        Ok(result.result == "ok")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signature_sorts_params() {
        let a = sign_params(
            &[("timestamp", "1315060510".into()), ("public_id", "sample_image".into())],
            "abcd",
        );
        let b = sign_params(
            &[("public_id", "sample_image".into()), ("timestamp", "1315060510".into())],
            "abcd",
        );
        assert_eq!(a, b);
        // sha1("public_id=sample_image&timestamp=1315060510abcd")
        assert_eq!(a, "b4ad47fb4e25c7bf5f92a20089f9db59bc302313");
    }

    #[test]
    fn test_endpoint() {
        let host = CloudinaryImageHost::new(ImageHostConfig {
            cloud_name: "demo".into(),
            api_key: "k".into(),
            api_secret: "s".into(),
        })
        .unwrap();
        assert_eq!(host.endpoint("upload"), "https://api.cloudinary.com/v1_1/demo/image/upload");
    }
}
