pub mod app_config;
pub mod cloudflare;
pub mod console;
pub mod device_resolver;
pub mod lookup;
pub mod web;
