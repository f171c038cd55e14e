use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HttpClientError {
    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Service tidak tersedia: {0}")]
    ServiceUnavailable(String),

    #[error("Response parsing error: {0}")]
    ParseError(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Not found: {0}")]
    NotFound(String),
}

pub struct ServiceClient {
    client: Client,
    base_url: String,
    bearer_token: Option<String>,
}

impl ServiceClient {
    // Buat client untuk HR portal API
    pub fn new(
        base_url: &str,
        bearer_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, HttpClientError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();
        if base_url.is_empty() {
            return Err(HttpClientError::ServiceUnavailable(
                "Base URL kosong".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| HttpClientError::RequestFailed(e.to_string()))?;

        Ok(Self {
            client,
            base_url,
            bearer_token: bearer_token.filter(|t| !t.trim().is_empty()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // Gabungkan base URL dengan endpoint
    pub fn url(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    // GET request dengan query parameters
    pub async fn get<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        query: &[(&str, String)],
    ) -> Result<T, HttpClientError> {
        let mut request = self.client.get(self.url(endpoint)).query(query);

        if let Some(t) = &self.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", t));
        }

        let response = request.send().await.map_err(map_send_error)?;

        self.handle_response(response).await
    }

    // POST tanpa body, hanya butuh acknowledgement 2xx
    pub async fn post_ack(&self, endpoint: &str) -> Result<(), HttpClientError> {
        let mut request = self.client.post(self.url(endpoint));

        if let Some(t) = &self.bearer_token {
            request = request.header("Authorization", format!("Bearer {}", t));
        }

        let response = request.send().await.map_err(map_send_error)?;
        let status = response.status();

        if status.is_success() {
            Ok(())
        } else {
            Err(error_from_status(status, response).await)
        }
    }

    // Handle response dan parse JSON
    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: Response,
    ) -> Result<T, HttpClientError> {
        let status = response.status();

        match status {
            StatusCode::OK | StatusCode::CREATED => response
                .json::<T>()
                .await
                .map_err(|e| HttpClientError::ParseError(e.to_string())),
            _ => Err(error_from_status(status, response).await),
        }
    }
}

fn map_send_error(err: reqwest::Error) -> HttpClientError {
    if err.is_timeout() {
        HttpClientError::RequestFailed(format!("timeout: {}", err))
    } else if err.is_connect() {
        HttpClientError::ServiceUnavailable(err.to_string())
    } else {
        HttpClientError::RequestFailed(err.to_string())
    }
}

async fn error_from_status(status: StatusCode, response: Response) -> HttpClientError {
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| "Unknown error".to_string());

    tracing::warn!("HR API responded {}: {}", status, error_text);
    classify_status(status, error_text)
}

// Mapping status code ke error variant
pub fn classify_status(status: StatusCode, error_text: String) -> HttpClientError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
            HttpClientError::Unauthorized("Token invalid".to_string())
        }
        StatusCode::NOT_FOUND => HttpClientError::NotFound(error_text),
        StatusCode::BAD_GATEWAY | StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            HttpClientError::ServiceUnavailable(format!("Status: {}", status))
        }
        _ => HttpClientError::RequestFailed(format!("Status: {} {}", status, error_text)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> ServiceClient {
        ServiceClient::new(base, None, Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slash() {
        let c = client("http://localhost:5000/api/");
        assert_eq!(c.base_url(), "http://localhost:5000/api");
        assert_eq!(c.url("/notifications"), "http://localhost:5000/api/notifications");
        assert_eq!(c.url("notifications/read-all"), "http://localhost:5000/api/notifications/read-all");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        let result = ServiceClient::new("  ", None, Duration::from_secs(5));
        assert!(matches!(result, Err(HttpClientError::ServiceUnavailable(_))));
    }

    #[test]
    fn test_blank_token_is_dropped() {
        let c = ServiceClient::new("http://hr.local", Some("  ".to_string()), Duration::from_secs(5)).unwrap();
        assert!(c.bearer_token.is_none());
    }

    #[test]
    fn test_classify_status() {
        assert!(matches!(
            classify_status(StatusCode::UNAUTHORIZED, String::new()),
            HttpClientError::Unauthorized(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, "missing".to_string()),
            HttpClientError::NotFound(msg) if msg == "missing"
        ));
        assert!(matches!(
            classify_status(StatusCode::SERVICE_UNAVAILABLE, String::new()),
            HttpClientError::ServiceUnavailable(_)
        ));
        assert!(matches!(
            classify_status(StatusCode::INTERNAL_SERVER_ERROR, "boom".to_string()),
            HttpClientError::RequestFailed(_)
        ));
    }
}
