use crate::app_config::AppConfig;
use reqwest::header::HeaderValue;
use reqwest::{Client, header};
use thiserror::Error;

pub fn new_client(config: &AppConfig) -> Result<Client, CloudflareClientError> {
    let mut headers = header::HeaderMap::new();
    headers.insert("X-Auth-Email", HeaderValue::from_str(config.cloudflare().auth_email())?);

    let mut auth_key_value = HeaderValue::from_str(config.cloudflare().auth_key())?;
    auth_key_value.set_sensitive(true);
    headers.insert("X-Auth-Key", auth_key_value);
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));

    let client = Client::builder().default_headers(headers).build()?;
    Ok(client)
}

#[derive(Error, Debug)]
pub enum CloudflareClientError {
    #[error("request error: {0}")]
    RequestError(#[from] reqwest::Error),
    #[error("Cloudflare client set an invalid header value: {0}")]
    InvalidHeaderValue(#[from] header::InvalidHeaderValue),
}
