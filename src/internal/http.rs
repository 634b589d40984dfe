//! Shared HTTP client construction for all CT log API calls.

use std::time::Duration;

use crate::error::{Error, Result};

/// Build the process-wide HTTP client used for all CT log API calls.
///
/// `disable_cert_validation` skips TLS certificate validation for this
/// channel only: some log operators present certificates chained outside
/// the general trust fabric. This has no bearing on certificates observed
/// inside the logs themselves.
pub fn new_http_client(disable_cert_validation: bool, timeout: Duration) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(timeout)
        .danger_accept_invalid_certs(disable_cert_validation)
        .build()
        .map_err(Error::from)
}
