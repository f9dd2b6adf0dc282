use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, error};
use waypoint_core::{ColumnUpdate, CoreError, CoreResult, EntityClient, Endpoint};
use waypoint_shared::Record;

/// `EntityClient` over the back-office REST backend.
#[derive(Debug, Clone)]
pub struct HttpEntityClient {
    client: Client,
    base_url: String,
}

impl HttpEntityClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> CoreResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| CoreError::TransportError(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::with_client(client, base_url))
    }

    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {}", method, url);
        self.client
            .request(method, url)
            .header("Accept", "application/json")
    }

    async fn send(&self, builder: RequestBuilder) -> CoreResult<Response> {
        let response = builder.send().await.map_err(transport)?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!("Backend request failed with status {}: {}", status, body);
            return Err(CoreError::RemoteStatus { status: status.as_u16(), body });
        }
        Ok(response)
    }
}

pub(crate) fn transport(e: reqwest::Error) -> CoreError {
    CoreError::TransportError(e.to_string())
}

/// The list endpoint answers with a bare array or `{ "data": [...] }`.
pub fn decode_records(payload: Value) -> CoreResult<Vec<Record>> {
    let rows = match payload {
        Value::Array(rows) => rows,
        Value::Object(mut map) => match map.remove("data") {
            Some(Value::Array(rows)) => rows,
            _ => return Err(CoreError::DecodeError("expected an array of records".into())),
        },
        other => {
            return Err(CoreError::DecodeError(format!(
                "expected an array of records, got {}",
                other
            )))
        }
    };

    rows.into_iter()
        .map(|row| {
            Record::try_from(row)
                .map_err(|v| CoreError::DecodeError(format!("row is not an object: {}", v)))
        })
        .collect()
}

#[async_trait]
impl EntityClient for HttpEntityClient {
    async fn list(&self, endpoint: Endpoint<'_>) -> CoreResult<Vec<Record>> {
        let response = self.send(self.request(Method::GET, &endpoint.list_path())).await?;
        let payload: Value = response
            .json()
            .await
            .map_err(|e| CoreError::DecodeError(e.to_string()))?;
        let records = decode_records(payload)?;
        debug!("Fetched {} {}", records.len(), endpoint.collection);
        Ok(records)
    }

    async fn create(&self, endpoint: Endpoint<'_>, record: &Record) -> CoreResult<()> {
        self.send(self.request(Method::POST, &endpoint.list_path()).json(record))
            .await?;
        Ok(())
    }

    async fn update_field(
        &self,
        endpoint: Endpoint<'_>,
        id: &str,
        update: &ColumnUpdate,
    ) -> CoreResult<()> {
        self.send(self.request(Method::PUT, &endpoint.item_path(id)).json(update))
            .await?;
        Ok(())
    }

    async fn update_fields(
        &self,
        endpoint: Endpoint<'_>,
        id: &str,
        updates: &[ColumnUpdate],
    ) -> CoreResult<()> {
        self.send(self.request(Method::PUT, &endpoint.bulk_path(id)).json(updates))
            .await?;
        Ok(())
    }

    async fn delete(&self, endpoint: Endpoint<'_>, id: &str) -> CoreResult<()> {
        self.send(self.request(Method::DELETE, &endpoint.item_path(id)))
            .await?;
        Ok(())
    }
}
