//! C6 — Log directory.
//!
//! Fetches the well-known `log_list.json` published by the Chrome CT team
//! and flattens it to the list of endpoint URLs.

use std::time::Duration;

use log::warn;

use crate::error::{Error, Result};
use crate::jsons::LogList;

pub const LOG_LIST_URL: &str = "https://www.gstatic.com/ct/log_list/v3/log_list.json";
pub const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(2);

/// Fetch and flatten the current set of public CT log URLs. Failure here
/// is surfaced to the scheduler, which skips the current cycle.
pub async fn fetch_log_urls(disable_cert_validation: bool) -> Result<Vec<String>> {
    fetch_log_urls_from(LOG_LIST_URL, disable_cert_validation).await
}

/// Same as [`fetch_log_urls`] against an arbitrary URL, split out so tests
/// can point it at a local mock server instead of the real Chrome CT
/// log-list endpoint.
async fn fetch_log_urls_from(log_list_url: &str, disable_cert_validation: bool) -> Result<Vec<String>> {
    let client = reqwest::Client::builder()
        .timeout(DIRECTORY_TIMEOUT)
        .danger_accept_invalid_certs(disable_cert_validation)
        .build()
        .map_err(Error::from)?;

    let resp = client.get(log_list_url).send().await.map_err(Error::from)?;
    if resp.status() != reqwest::StatusCode::OK {
        let status = resp.status();
        warn!("log directory responded with {}", status.as_u16());
        return Err(Error::InvalidResponseStatus(status));
    }

    let bytes = resp.bytes().await.map_err(Error::from)?;
    let list: LogList = serde_json::from_slice(&bytes).map_err(Error::from)?;
    Ok(list.urls())
}
