use crate::cloudflare::domain::Device;

/// Id of the first device, in API order, enrolled by exactly `email`.
pub fn find_active_device<'a>(email: &str, devices: &'a [Device]) -> Option<&'a str> {
    devices
        .iter()
        .find(|device| device.user_email() == Some(email))
        .map(|device| device.id.as_str())
}
