use crate::cloudflare::api::ApiError;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

// API: https://developers.cloudflare.com/fundamentals/api/how-to/make-api-calls/
#[derive(Debug, Deserialize)]
pub struct CloudflareResponse {
    pub success: bool,
    #[serde(default)]
    pub errors: Vec<CloudflareError>,
    #[serde(default)]
    pub result: Value,
}

impl CloudflareResponse {
    /// Returns the typed `result`, or `None` when it is null. Never looks at `result` unless
    /// `success` is set.
    pub fn into_result<T: DeserializeOwned>(self) -> Result<Option<T>, ApiError> {
        if !self.success {
            return Err(ApiError::Rejected { errors: self.errors });
        }

        match self.result {
            Value::Null => Ok(None),
            result => Ok(Some(serde_json::from_value(result)?)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct CloudflareError {
    #[serde(default)]
    pub code: i64,
    pub message: String,
}

impl fmt::Display for CloudflareError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code {})", self.message, self.code)
    }
}

pub fn describe_errors(errors: &[CloudflareError]) -> String {
    if errors.is_empty() {
        return "no error details".to_string();
    }

    errors.iter().map(CloudflareError::to_string).collect::<Vec<_>>().join("; ")
}
