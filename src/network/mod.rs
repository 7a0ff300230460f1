//! HTTP networking module
//!
//! Provides HTTP client functionality for making requests to search providers.

mod client;
mod user_agent;

pub use client::HttpClient;
pub use user_agent::{accept_json, accept_xml, generate_user_agent};
