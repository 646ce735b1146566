mod api;
mod client;
mod cloudflare_response;
pub mod domain;

pub use api::{ApiError, FLEET_STATUS_WINDOW_MINUTES, ZeroTrustApi};
pub use client::{CloudflareClientError, new_client};
pub use cloudflare_response::CloudflareError;
