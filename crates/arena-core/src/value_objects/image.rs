//! Uploaded images: signature sniffing, upload targets and hosted URL rewriting

use chrono::NaiveDate;

use crate::error::DomainError;
use crate::value_objects::Snowflake;

/// Largest accepted upload (5 MiB)
pub const MAX_IMAGE_BYTES: usize = 5 * 1024 * 1024;

const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "webp"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
}

impl ImageFormat {
    /// Identify an image by its leading bytes.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(Self::Png)
        } else if bytes.starts_with(b"\xff\xd8\xff") {
            Some(Self::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(Self::Gif)
        } else if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP".as_slice()) {
            Some(Self::Webp)
        } else {
            None
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Gif => "image/gif",
            Self::Webp => "image/webp",
        }
    }
}

/// Whether the filename carries one of the accepted image extensions
pub fn has_allowed_extension(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .is_some_and(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
}

/// An image upload whose extension, size and signature have been checked.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub filename: String,
    pub format: ImageFormat,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(filename: impl Into<String>, bytes: Vec<u8>) -> Result<Self, DomainError> {
        let filename = filename.into();
        if !has_allowed_extension(&filename) {
            return Err(DomainError::UnsupportedImageType);
        }
        if bytes.len() > MAX_IMAGE_BYTES {
            return Err(DomainError::ImageTooLarge {
                max_bytes: MAX_IMAGE_BYTES,
            });
        }
        let format = ImageFormat::sniff(&bytes).ok_or(DomainError::InvalidImage)?;
        Ok(Self {
            filename,
            format,
            bytes,
        })
    }
}

impl std::fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ImageUpload")
            .field("filename", &self.filename)
            .field("format", &self.format)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// Server-side transformation applied by the image host at upload time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transformation {
    pub width: u32,
    pub height: u32,
    pub crop: &'static str,
    pub gravity: Option<&'static str>,
    pub quality: &'static str,
}

impl Transformation {
    /// Host transformation string, e.g. `w_400,h_400,c_fill,g_face,q_auto,f_auto`
    pub fn to_param(&self) -> String {
        let mut parts = vec![
            format!("w_{}", self.width),
            format!("h_{}", self.height),
            format!("c_{}", self.crop),
        ];
        if let Some(gravity) = self.gravity {
            parts.push(format!("g_{gravity}"));
        }
        parts.push(format!("q_{}", self.quality));
        parts.push("f_auto".to_string());
        parts.join(",")
    }
}

/// Where and how an image is stored at the host
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadTarget {
    pub folder: &'static str,
    pub public_id: String,
    pub transformation: Transformation,
}

impl UploadTarget {
    pub const PROFILE_FOLDER: &'static str = "social-contract/profiles";
    pub const CHECKIN_FOLDER: &'static str = "social-contract/checkins";

    pub fn profile_photo(user_id: Snowflake) -> Self {
        Self {
            folder: Self::PROFILE_FOLDER,
            public_id: format!("user_{user_id}"),
            transformation: Transformation {
                width: 400,
                height: 400,
                crop: "fill",
                gravity: Some("face"),
                quality: "auto",
            },
        }
    }

    pub fn checkin_photo(challenge_id: Snowflake, user_id: Snowflake, date: NaiveDate) -> Self {
        Self {
            folder: Self::CHECKIN_FOLDER,
            public_id: format!("checkin_{challenge_id}_{user_id}_{date}"),
            transformation: Transformation {
                width: 1200,
                height: 1200,
                crop: "limit",
                gravity: None,
                quality: "auto:good",
            },
        }
    }

    /// Full public id including the folder
    pub fn qualified_id(&self) -> String {
        format!("{}/{}", self.folder, self.public_id)
    }
}

/// Result of a successful upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedImage {
    pub url: String,
    pub public_id: String,
}

/// Insert delivery transformations into a hosted image URL.
///
/// URLs that are not hosted images, or do not contain exactly one
/// `/upload/` segment, are returned unchanged.
pub fn optimized_url(url: &str, width: Option<u32>, height: Option<u32>, crop: &str) -> String {
    if !url.contains("cloudinary.com") {
        return url.to_string();
    }
    let parts: Vec<&str> = url.split("/upload/").collect();
    let [base, path] = parts.as_slice() else {
        return url.to_string();
    };

    let mut transforms = vec!["f_auto".to_string(), "q_auto".to_string()];
    if let Some(w) = width {
        transforms.push(format!("w_{w}"));
    }
    if let Some(h) = height {
        transforms.push(format!("h_{h}"));
    }
    if !crop.is_empty() && (width.is_some() || height.is_some()) {
        transforms.push(format!("c_{crop}"));
    }

    format!("{base}/upload/{}/{path}", transforms.join(","))
}
