//! Delivery data providers

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;

use crate::{DeliveryRecord, TrackerConfig, TrackerError};

/// Read-only source of delivery records.
#[async_trait]
pub trait DeliveryProvider: Send + Sync {
    async fn get_delivery_by_id(&self, delivery_id: &str) -> Result<DeliveryRecord, TrackerError>;
}

/// Fetches deliveries from the Superette REST backend.
#[derive(Debug, Clone)]
pub struct HttpDeliveryProvider {
    client: Client,
    base_url: String,
}

impl HttpDeliveryProvider {
    pub fn new(config: &TrackerConfig) -> Result<Self, TrackerError> {
        let client = Client::builder().build()?;
        Self::with_client(config, client)
    }

    /// Use a preconfigured client (proxy, TLS or timeout settings).
    pub fn with_client(config: &TrackerConfig, client: Client) -> Result<Self, TrackerError> {
        config.validate()?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    pub fn delivery_url(&self, delivery_id: &str) -> String {
        format!("{}/deliveries/{}", self.base_url, delivery_id)
    }
}

#[async_trait]
impl DeliveryProvider for HttpDeliveryProvider {
    async fn get_delivery_by_id(&self, delivery_id: &str) -> Result<DeliveryRecord, TrackerError> {
        let url = self.delivery_url(delivery_id);
        debug!(%url, "fetching delivery");

        let resp = self.client.get(&url).send().await?;
        match resp.status() {
            StatusCode::NOT_FOUND => Err(TrackerError::NotFound {
                delivery_id: delivery_id.to_string(),
            }),
            status if !status.is_success() => Err(TrackerError::UnexpectedStatus {
                code: status.as_u16(),
                delivery_id: delivery_id.to_string(),
            }),
            _ => {
                let body = resp.text().await?;
                parse_delivery_record(&body)
            }
        }
    }
}

/// Decode a delivery record from the backend's JSON body
pub fn parse_delivery_record(body: &str) -> Result<DeliveryRecord, TrackerError> {
    Ok(serde_json::from_str(body)?)
}
