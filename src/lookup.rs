use crate::cloudflare::domain::{DeviceDetails, FleetStatus, User};
use crate::cloudflare::{ApiError, ZeroTrustApi};
use crate::device_resolver::find_active_device;
use serde::Serialize;
use std::fmt;
use thiserror::Error;
use tracing::{info, instrument};

/// Everything known about the device a user is currently enrolled with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupReport {
    pub user_email: String,
    #[serde(skip)]
    pub user: User,
    pub active_device_id: String,
    pub device_details: DeviceDetails,
    pub fleet_status: FleetStatus,
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Email address is required.")]
    MissingEmail,
    #[error("No user found with that email address.")]
    UserNotFound,
    #[error("No devices found.")]
    NoDevices,
    #[error("No active device found for this user.")]
    NoActiveDevice,
    #[error("Error while querying {stage}: {source}")]
    Api { stage: LookupStage, source: ApiError },
}

/// The remote call a lookup was waiting on when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupStage {
    SearchUser,
    ListDevices,
    DeviceDetails,
    FleetStatus,
}

impl fmt::Display for LookupStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            LookupStage::SearchUser => "user by email",
            LookupStage::ListDevices => "device list",
            LookupStage::DeviceDetails => "device details",
            LookupStage::FleetStatus => "fleet status",
        };
        f.write_str(text)
    }
}

impl LookupStage {
    fn wrap(self) -> impl FnOnce(ApiError) -> LookupError {
        move |source| LookupError::Api { stage: self, source }
    }
}

/// Resolves `email` to its active device and collects the device details and fleet status.
///
/// Stops at the first failing step; later endpoints are not called and no partial report is
/// returned.
#[instrument(skip(api))]
pub async fn lookup_active_device(api: &ZeroTrustApi, email: &str) -> Result<LookupReport, LookupError> {
    let email = email.trim();
    if email.is_empty() {
        return Err(LookupError::MissingEmail);
    }

    let user = api
        .search_user_by_email(email)
        .await
        .map_err(LookupStage::SearchUser.wrap())?
        .ok_or(LookupError::UserNotFound)?;
    info!(user_email = %user.email, "👤 User found");

    let devices = api.get_device_list().await.map_err(LookupStage::ListDevices.wrap())?;
    if devices.is_empty() {
        return Err(LookupError::NoDevices);
    }

    let active_device_id = find_active_device(email, &devices)
        .ok_or(LookupError::NoActiveDevice)?
        .to_string();
    info!(device_id = %active_device_id, "💻 Active device found");

    let device_details = api
        .get_device_details(&active_device_id)
        .await
        .map_err(LookupStage::DeviceDetails.wrap())?;
    let fleet_status = api
        .get_fleet_status(&active_device_id)
        .await
        .map_err(LookupStage::FleetStatus.wrap())?;

    Ok(LookupReport {
        user_email: email.to_string(),
        user,
        active_device_id,
        device_details,
        fleet_status,
    })
}
