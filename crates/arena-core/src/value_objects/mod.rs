//! Value objects - immutable types that represent domain concepts

mod image;
mod join_code;
mod snowflake;
mod timezone;

pub use image::{
    has_allowed_extension, optimized_url, HostedImage, ImageFormat, ImageUpload, Transformation,
    UploadTarget, MAX_IMAGE_BYTES,
};
pub use join_code::JoinCode;
pub use snowflake::{Snowflake, SnowflakeGenerator, SnowflakeParseError};
pub use timezone::{
    parse_form_date, resolve_checkin_date, resolve_checkin_timezone, yesterday, UserTimezone,
};
