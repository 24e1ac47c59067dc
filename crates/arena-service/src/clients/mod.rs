//! HTTP clients for the external ports: image hosting and Google sign-in

mod cloudinary;
mod google;

pub use cloudinary::{sign_params, CloudinaryImageHost};
pub use google::GoogleIdentityProvider;

use std::time::Duration;

/// Outbound requests never hold a user request longer than this
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

fn http_client() -> reqwest::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("social-contract/", env!("CARGO_PKG_VERSION")))
        .build()
}
