use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ProviderError {
    #[error("distance provider timed out")]
    Timeout,
    #[error("distance provider returned http status {0}")]
    HttpError(u16),
    #[error("distance provider returned an invalid response: {0}")]
    InvalidResponse(String),
}

/// Driving distance and duration as reported by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderDistance {
    pub distance_km: f64,
    pub duration_seconds: Option<f64>,
}

#[async_trait]
pub trait DistanceProvider {
    async fn driving_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<ProviderDistance, ProviderError>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Response {
    status: String,
    #[serde(default)]
    rows: Vec<Row>,
    #[serde(default)]
    error_message: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Row {
    #[serde(default)]
    elements: Vec<Element>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Element {
    status: String,
    distance: Option<Value>,
    duration: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct Value {
    value: f64,
}

/// Client for a distance-matrix style HTTP API (driving mode, metric units).
#[derive(Clone, Debug)]
pub struct DistanceMatrixClient {
    client: reqwest::Client,
    api_base: String,
    key: String,
}

impl DistanceMatrixClient {
    pub fn new(api_base: &str, key: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            key: key.to_string(),
        })
    }
}

#[async_trait]
impl DistanceProvider for DistanceMatrixClient {
    #[tracing::instrument(skip(self))]
    async fn driving_distance(
        &self,
        origin: &str,
        destination: &str,
    ) -> Result<ProviderDistance, ProviderError> {
        let url = format!("{}/maps/api/distancematrix/json", self.api_base);

        let res = self
            .client
            .get(url)
            .query(&[("key", self.key.as_str())])
            .query(&[("origins", origin)])
            .query(&[("destinations", destination)])
            .query(&[("mode", "driving")])
            .query(&[("units", "metric")])
            .send()
            .await
            .map_err(classify)?;

        let status_code = res.status().as_u16();

        if status_code != 200 {
            return Err(ProviderError::HttpError(status_code));
        }

        let data: Response = res.json().await.map_err(classify)?;

        parse_response(data)
    }
}

fn classify(err: reqwest::Error) -> ProviderError {
    if err.is_timeout() {
        ProviderError::Timeout
    } else if let Some(status) = err.status() {
        ProviderError::HttpError(status.as_u16())
    } else {
        ProviderError::InvalidResponse(err.to_string())
    }
}

fn parse_response(data: Response) -> Result<ProviderDistance, ProviderError> {
    if data.status != "OK" {
        let reason = data.error_message.unwrap_or(data.status);
        return Err(ProviderError::InvalidResponse(reason));
    }

    let element = data
        .rows
        .into_iter()
        .next()
        .and_then(|row| row.elements.into_iter().next())
        .ok_or_else(|| ProviderError::InvalidResponse("no route element".into()))?;

    if element.status != "OK" {
        return Err(ProviderError::InvalidResponse(element.status));
    }

    let meters = element
        .distance
        .map(|d| d.value)
        .ok_or_else(|| ProviderError::InvalidResponse("missing distance".into()))?;

    if !meters.is_finite() || meters <= 0.0 {
        return Err(ProviderError::InvalidResponse(format!(
            "non-positive distance {}",
            meters
        )));
    }

    let duration_seconds = element
        .duration
        .map(|d| d.value)
        .filter(|s| s.is_finite() && *s >= 0.0);

    Ok(ProviderDistance {
        distance_km: meters / 1000.0,
        duration_seconds,
    })
}
