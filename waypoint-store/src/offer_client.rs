use async_trait::async_trait;
use reqwest::Client;
use tracing::{error, info};
use waypoint_core::{AccessToken, CoreError, CoreResult, LowFareSearchRequest, LowFareSearchResponse, OfferSource};
use waypoint_shared::Masked;

use crate::app_config::FlightSearchConfig;
use crate::http_client::transport;

/// `OfferSource` against the flight-search provider: a client-credentials
/// token endpoint plus the low-fare search endpoint.
#[derive(Debug, Clone)]
pub struct HttpOfferSource {
    client: Client,
    base_url: String,
    client_id: String,
    client_secret: Masked<String>,
}

impl HttpOfferSource {
    pub fn new(config: &FlightSearchConfig) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| CoreError::TransportError(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
        })
    }

    pub fn token_url(&self) -> String {
        format!("{}/token", self.base_url)
    }

    pub fn search_url(&self) -> String {
        format!("{}/LowFareSearch", self.base_url)
    }

    async fn read_json<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
        what: &str,
    ) -> CoreResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("{} failed with status {}: {}", what, status, body);
            return Err(CoreError::RemoteStatus { status: status.as_u16(), body });
        }

        let body = response.text().await.map_err(transport)?;
        serde_json::from_str(&body).map_err(|e| {
            let preview: String = body.chars().take(500).collect();
            error!("Failed to parse {} response: {}", what, e);
            CoreError::DecodeError(format!("{}: {}. Response: {}", what, e, preview))
        })
    }
}

#[async_trait]
impl OfferSource for HttpOfferSource {
    async fn issue_token(&self) -> CoreResult<AccessToken> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", self.client_id.as_str()),
            ("client_secret", self.client_secret.expose().as_str()),
        ];

        info!("Requesting access token for {}", self.client_id);
        let response = self
            .client
            .post(self.token_url())
            .form(&form)
            .send()
            .await
            .map_err(transport)?;

        self.read_json(response, "Token request").await
    }

    async fn low_fare_search(
        &self,
        token: &AccessToken,
        request: &LowFareSearchRequest,
    ) -> CoreResult<LowFareSearchResponse> {
        let response = self
            .client
            .post(self.search_url())
            .header("Authorization", token.header_value())
            .header("Accept", "application/json")
            .json(request)
            .send()
            .await
            .map_err(transport)?;

        self.read_json(response, "Low-fare search").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> FlightSearchConfig {
        FlightSearchConfig {
            base_url: "https://fares.example.com/api/".to_string(),
            client_id: "backoffice".to_string(),
            client_secret: Masked::new("s3cret".to_string()),
            timeout_seconds: 10,
        }
    }

    #[test]
    fn test_endpoint_urls() {
        let source = HttpOfferSource::new(&config()).unwrap();
        assert_eq!(source.token_url(), "https://fares.example.com/api/token");
        assert_eq!(source.search_url(), "https://fares.example.com/api/LowFareSearch");
    }

    #[test]
    fn test_debug_hides_secret() {
        let source = HttpOfferSource::new(&config()).unwrap();
        assert!(!format!("{:?}", source).contains("s3cret"));
    }
}
