//! Header construction for upstream calls
//!
//! Client headers are never forwarded; every upstream request carries only the
//! provider credential and a JSON content type.

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};

use super::UpstreamAuth;
use super::transport::TransportError;

/// Build the headers for one upstream request
pub fn build_upstream_headers(auth: &UpstreamAuth) -> Result<HeaderMap, TransportError> {
    let mut headers = HeaderMap::new();

    match auth {
        UpstreamAuth::Bearer(token) => {
            let value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| TransportError::InvalidCredential)?;
            headers.insert(AUTHORIZATION, value);
        }
        UpstreamAuth::ApiKeyHeader { name, value } => {
            let value =
                HeaderValue::from_str(value).map_err(|_| TransportError::InvalidCredential)?;
            headers.insert(HeaderName::from_static(*name), value);
        }
    }
    headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

    Ok(headers)
}
