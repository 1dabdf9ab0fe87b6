//! HTTP utilities for FPL API communication

use crate::Result;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, USER_AGENT};
use reqwest::Client;
use std::time::Duration;

/// Default headers sent with every FPL request.
///
/// The public endpoints reject some requests without a browser-ish user agent.
pub fn default_header_map() -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(ACCEPT, HeaderValue::from_static("application/json"));
    h.insert(
        USER_AGENT,
        HeaderValue::from_static(concat!("fpl-gameweek/", env!("CARGO_PKG_VERSION"))),
    );
    h
}

/// Build the shared HTTP client with a per-request timeout.
pub fn build_client(timeout: Duration) -> Result<Client> {
    let client = Client::builder()
        .default_headers(default_header_map())
        .timeout(timeout)
        .connect_timeout(timeout)
        .build()?;
    Ok(client)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_header_map() {
        let headers = default_header_map();
        assert_eq!(headers.get(ACCEPT).unwrap(), "application/json");
        assert!(headers
            .get(USER_AGENT)
            .unwrap()
            .to_str()
            .unwrap()
            .starts_with("fpl-gameweek/"));
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(Duration::from_secs(5)).is_ok());
    }
}
