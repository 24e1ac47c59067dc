//! Axum extractors for request handling
//!
//! Custom extractors for authentication, path ids, body negotiation and
//! multipart uploads.

mod auth;
mod multipart;
mod negotiate;
mod path;

pub use auth::AuthUser;
pub use multipart::{CheckinSubmission, PhotoUpload};
pub use negotiate::{FormOrJson, ResponseMode};
pub use path::{ChallengeIdPath, CheckinIdPath, NudgePath};
