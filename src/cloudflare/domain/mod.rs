mod device_get;
mod fleet_status;
mod user_get;

pub use device_get::{Device, DeviceDetails, DeviceUser};
pub use fleet_status::FleetStatus;
pub use user_get::User;
