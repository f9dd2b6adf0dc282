use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use waypoint_shared::Masked;

/// Parameters of a low-fare search.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct LowFareSearchRequest {
    pub origin: String,
    pub destination: String,
    pub departure_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub return_date: Option<NaiveDate>,
    #[serde(default = "default_adults")]
    pub adults: u32,
    #[serde(default)]
    pub children: u32,
    #[serde(default)]
    pub infants: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cabin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}

fn default_adults() -> u32 {
    1
}

/// Bearer token handed out by the token-issuance endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct AccessToken {
    pub access_token: Masked<String>,
    #[serde(default)]
    pub token_type: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
}

impl AccessToken {
    pub fn bearer(value: impl Into<String>) -> Self {
        Self {
            access_token: Masked::new(value.into()),
            token_type: Some("Bearer".to_string()),
            expires_in: None,
        }
    }

    /// `Authorization` header value.
    pub fn header_value(&self) -> String {
        format!("Bearer {}", self.access_token.expose())
    }
}
