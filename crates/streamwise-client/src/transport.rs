//! HTTP transport shared by the service clients, and the mapping of HTTP
//! failures onto `ServiceError`.

use std::time::Duration;

use serde::Deserialize;

use streamwise_core::ServiceError;

/// Shared HTTP plumbing for the service clients.
#[derive(Debug, Clone)]
pub(crate) struct Transport {
    base_url: String,
    client: reqwest::Client,
    timeout: Duration,
}

impl Transport {
    pub(crate) fn new(base_url: &str, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .expect("failed to build HTTP client");

        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            timeout,
        }
    }

    pub(crate) fn base_url(&self) -> &str {
        &self.base_url
    }

    pub(crate) fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub(crate) fn client(&self) -> &reqwest::Client {
        &self.client
    }

    /// Send a request and turn any non-2xx status into a `ServiceError`.
    pub(crate) async fn send(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<reqwest::Response, ServiceError> {
        let response = request
            .send()
            .await
            .map_err(|e| classify(e, self.timeout))?;

        let status = response.status().as_u16();
        if status == 401 || status == 403 {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Unauthorized(error_detail(&body)));
        }
        if status >= 400 {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Api {
                status,
                message: error_detail(&body),
            });
        }
        Ok(response)
    }

    /// Read a whole response body as bytes.
    pub(crate) async fn bytes(
        &self,
        response: reqwest::Response,
    ) -> Result<Vec<u8>, ServiceError> {
        response
            .bytes()
            .await
            .map(|b| b.to_vec())
            .map_err(|e| classify(e, self.timeout))
    }
}

/// Classify a transport-level `reqwest` failure.
pub(crate) fn classify(err: reqwest::Error, timeout: Duration) -> ServiceError {
    if err.is_timeout() {
        ServiceError::timeout(timeout)
    } else if err.is_decode() {
        ServiceError::InvalidResponse(err.to_string())
    } else {
        ServiceError::Network(err.to_string())
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: String,
}

/// Pull the human-readable message out of an error body.
///
/// The services answer errors as `{"detail": "..."}`; anything else is
/// passed through as-is.
pub(crate) fn error_detail(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.detail)
        .unwrap_or_else(|_| body.trim().to_string())
}
