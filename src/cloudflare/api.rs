use crate::app_config::AppConfig;
use crate::cloudflare::cloudflare_response::{CloudflareError, CloudflareResponse, describe_errors};
use crate::cloudflare::domain::{Device, DeviceDetails, FleetStatus, User};
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Trailing window of the live fleet status, in minutes.
pub const FLEET_STATUS_WINDOW_MINUTES: u32 = 60;

/// Read-only client for the Zero Trust endpoints of a single Cloudflare account.
#[derive(Debug, Clone)]
pub struct ZeroTrustApi {
    client: Client,
    account_url: String,
}

impl ZeroTrustApi {
    pub fn new(client: Client, config: &AppConfig) -> Self {
        ZeroTrustApi {
            client,
            account_url: config.cloudflare().account_url(),
        }
    }

    /// Returns the first Access user registered under `email`, if any.
    #[instrument(skip(self))]
    pub async fn search_user_by_email(&self, email: &str) -> Result<Option<User>, ApiError> {
        info!("Searching Access user...");

        let users = self.get::<Vec<User>>("/access/users", &[("email", email)]).await?.unwrap_or_default();
        info!("Searching Access user... OK, {} found", users.len());

        Ok(users.into_iter().next())
    }

    #[instrument(skip(self))]
    pub async fn get_device_list(&self) -> Result<Vec<Device>, ApiError> {
        info!("Retrieving devices...");

        let devices = self.get::<Vec<Device>>("/devices", &[]).await?.unwrap_or_default();
        info!("Retrieving devices... OK, {} found", devices.len());

        Ok(devices)
    }

    #[instrument(skip(self))]
    pub async fn get_device_details(&self, device_id: &str) -> Result<DeviceDetails, ApiError> {
        info!("Retrieving device details...");

        let raw = self
            .get::<Map<String, Value>>(&format!("/devices/{}", device_id), &[])
            .await?
            .ok_or(ApiError::MissingResult)?;
        let details = DeviceDetails::from_raw(raw)?;
        info!("Retrieving device details... OK");

        Ok(details)
    }

    #[instrument(skip(self))]
    pub async fn get_fleet_status(&self, device_id: &str) -> Result<FleetStatus, ApiError> {
        info!("Retrieving fleet status...");

        let since_minutes = FLEET_STATUS_WINDOW_MINUTES.to_string();
        let fleet_status = self
            .get::<FleetStatus>(
                &format!("/dex/devices/{}/fleet-status/live", device_id),
                &[("since_minutes", since_minutes.as_str())],
            )
            .await?
            .ok_or(ApiError::MissingResult)?;
        info!("Retrieving fleet status... OK, {} metrics", fleet_status.0.len());

        Ok(fleet_status)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<T>, ApiError> {
        let response = self
            .client
            .get(format!("{}{}", self.account_url, path))
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let errors = serde_json::from_str::<CloudflareResponse>(&body)
                .map(|response| response.errors)
                .unwrap_or_default();
            warn!(status_code = %status, "⚠️ Request to {} failed: {}", path, describe_errors(&errors));
            return Err(ApiError::Status { status, errors });
        }

        let result = serde_json::from_str::<CloudflareResponse>(&body)?.into_result();
        if let Err(ApiError::Rejected { errors }) = &result {
            warn!("⚠️ Cloudflare rejected the request to {}: {}", path, describe_errors(errors));
        }
        result
    }
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request error: {0}")]
    Request(#[from] reqwest::Error),
    #[error("malformed response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("unexpected HTTP status {status}: {}", describe_errors(.errors))]
    Status { status: StatusCode, errors: Vec<CloudflareError> },
    #[error("request rejected: {}", describe_errors(.errors))]
    Rejected { errors: Vec<CloudflareError> },
    #[error("response did not contain a result")]
    MissingResult,
}

impl ApiError {
    /// Network level failures, as opposed to the API answering with a rejection.
    pub fn is_transport(&self) -> bool {
        matches!(self, ApiError::Request(_) | ApiError::Decode(_))
    }
}

#[cfg(test)]
impl ZeroTrustApi {
    pub fn for_server(url: String) -> Self {
        let config = crate::app_config::AppConfigBuilder::new().api_url(url).build();
        let client = crate::cloudflare::new_client(&config).expect("test client");
        ZeroTrustApi::new(client, &config)
    }
}
