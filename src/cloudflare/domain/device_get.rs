use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

// API: https://developers.cloudflare.com/api/resources/zero_trust/subresources/devices/methods/get/
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Device {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub device_type: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub tunnel_type: Option<String>,
    #[serde(default)]
    pub last_seen: Option<String>,
    #[serde(default)]
    pub user: Option<DeviceUser>,
}

impl Device {
    pub fn user_email(&self) -> Option<&str> {
        self.user.as_ref().and_then(|user| user.email.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeviceUser {
    #[serde(default)]
    pub email: Option<String>,
}

/// A single device `result`: the typed view next to the object exactly as the API sent it.
/// Serializes as the untouched object.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceDetails {
    pub device: Device,
    pub raw: Map<String, Value>,
}

impl DeviceDetails {
    pub fn from_raw(raw: Map<String, Value>) -> Result<Self, serde_json::Error> {
        let device = serde_json::from_value(Value::Object(raw.clone()))?;
        Ok(DeviceDetails { device, raw })
    }
}

impl Serialize for DeviceDetails {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.raw.serialize(serializer)
    }
}
