use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// API: https://developers.cloudflare.com/api/resources/zero_trust/subresources/access/subresources/users/methods/list/
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct User {
    pub email: String,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}
