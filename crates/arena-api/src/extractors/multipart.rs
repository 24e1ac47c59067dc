//! Submissions that may carry an image file

use std::collections::HashMap;

use axum::{
    async_trait,
    extract::{FromRequest, Multipart, Request},
};
use arena_service::dto::{CheckinRequest, UploadedFile};

use super::negotiate::{content_type, FormOrJson};
use crate::response::ApiError;

/// Form field carrying the image
const PHOTO_FIELD: &str = "photo";

/// Text fields plus the `photo` file part of a multipart form
#[derive(Debug, Default)]
struct MultipartParts {
    fields: HashMap<String, String>,
    file: Option<UploadedFile>,
}

impl MultipartParts {
    async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut parts = Self::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match field.file_name().map(str::to_string) {
                Some(filename) => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::invalid_body(e.body_text()))?;
                    // blank file inputs arrive as `filename=""`
                    if name == PHOTO_FIELD && !filename.is_empty() && parts.file.is_none() {
                        parts.file = Some(UploadedFile {
                            filename,
                            bytes: bytes.to_vec(),
                        });
                    }
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::invalid_body(e.body_text()))?;
                    parts.fields.insert(name, text);
                }
            }
        }
        Ok(parts)
    }

    fn take(&mut self, name: &str) -> Option<String> {
        self.fields.remove(name)
    }
}

fn is_multipart(req: &Request) -> bool {
    content_type(req.headers()).starts_with("multipart/form-data")
}

/// A check-in: multipart with an optional photo, or a plain form/JSON body
#[derive(Debug)]
pub struct CheckinSubmission {
    pub request: CheckinRequest,
    pub photo: Option<UploadedFile>,
}

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for CheckinSubmission {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            let FormOrJson(request) = FormOrJson::<CheckinRequest>::from_request(req, state).await?;
            return Ok(Self { request, photo: None });
        }

        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;
        let mut parts = MultipartParts::read(multipart).await?;
        Ok(Self {
            request: CheckinRequest {
                note: parts.take("note"),
                client_timezone: parts.take("client_timezone"),
                client_date: parts.take("client_date"),
            },
            photo: parts.file,
        })
    }
}

/// A profile photo upload. A form without a file part yields `None`.
#[derive(Debug)]
pub struct PhotoUpload(pub Option<UploadedFile>);

#[async_trait]
impl<S: Send + Sync> FromRequest<S> for PhotoUpload {
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if !is_multipart(&req) {
            return Ok(Self(None));
        }
        let multipart = Multipart::from_request(req, state)
            .await
            .map_err(|e| ApiError::invalid_body(e.body_text()))?;
        Ok(Self(MultipartParts::read(multipart).await?.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::header;

    const BOUNDARY: &str = "XBOUNDARYX";

    fn multipart_request(body: String) -> Request {
        Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, format!("multipart/form-data; boundary={BOUNDARY}"))
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn test_checkin_multipart_fields_and_file() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"note\"\r\n\r\nran 5k\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"client_date\"\r\n\r\n2025-03-01\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"run.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{BOUNDARY}--\r\n"
        );
        let submission = CheckinSubmission::from_request(multipart_request(body), &()).await.unwrap();
        assert_eq!(submission.request.note.as_deref(), Some("ran 5k"));
        assert_eq!(submission.request.client_date.as_deref(), Some("2025-03-01"));
        assert!(submission.request.client_timezone.is_none());
        let photo = submission.photo.unwrap();
        assert_eq!(photo.filename, "run.png");
        assert_eq!(photo.bytes, b"PNGDATA");
    }

    #[tokio::test]
    async fn test_only_named_photo_part_is_taken() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"other.png\"\r\n\
             Content-Type: image/png\r\n\r\nOTHER\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\r\n\r\n\
             --{BOUNDARY}\r\nContent-Disposition: form-data; name=\"photo\"; filename=\"run.jpg\"\r\n\
             Content-Type: image/jpeg\r\n\r\nJPEGDATA\r\n--{BOUNDARY}--\r\n"
        );
        let submission = CheckinSubmission::from_request(multipart_request(body), &()).await.unwrap();
        let photo = submission.photo.unwrap();
        assert_eq!(photo.filename, "run.jpg");
        assert_eq!(photo.bytes, b"JPEGDATA");
    }

    #[tokio::test]
    async fn test_file_under_other_name_is_not_a_photo() {
        let body = format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"avatar\"; filename=\"me.png\"\r\n\
             Content-Type: image/png\r\n\r\nPNGDATA\r\n--{BOUNDARY}--\r\n"
        );
        let PhotoUpload(file) = PhotoUpload::from_request(multipart_request(body), &()).await.unwrap();
        assert!(file.is_none());
    }

    #[tokio::test]
    async fn test_checkin_form_body() {
        let req = Request::builder()
            .method("POST")
            .uri("/")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("note=hello&client_timezone=Europe%2FParis"))
            .unwrap();
        let submission = CheckinSubmission::from_request(req, &()).await.unwrap();
        assert_eq!(submission.request.note.as_deref(), Some("hello"));
        assert_eq!(submission.request.client_timezone.as_deref(), Some("Europe/Paris"));
        assert!(submission.photo.is_none());
    }

    #[tokio::test]
    async fn test_photo_upload_without_file() {
        let body = format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"x\"\r\n\r\n1\r\n--{BOUNDARY}--\r\n");
        let PhotoUpload(file) = PhotoUpload::from_request(multipart_request(body), &()).await.unwrap();
        assert!(file.is_none());
    }
}
