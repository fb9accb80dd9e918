use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use reqwest::header::{CACHE_CONTROL, COOKIE};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::entities::decimal::{decimal, optional_decimal};
use crate::entities::{
    BookingPayload, BookingReceipt, CarAvailability, CarType, InquiryRecord, DEFAULT_RATE_SPREAD,
};
use crate::error::{invalid_input_error, not_found_error, upstream_error, Error};

/// Why a booking submission did not go through. Never retried automatically.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SubmitError {
    #[error("please check these details: {}", join(.fields))]
    Validation { fields: Vec<String> },
    #[error("booking service error ({message}), please try again shortly")]
    Server { status: u16, message: String },
    #[error("the booking was not accepted: {0}")]
    Application(String),
    #[error("could not reach the booking service, please check your connection ({0})")]
    Network(String),
}

fn join(fields: &[String]) -> String {
    fields.join("; ")
}

#[async_trait]
pub trait BookingBackend {
    async fn car_types(&self) -> Result<Vec<CarType>, Error>;

    async fn available_cars_by_type(&self) -> Result<HashMap<String, Vec<String>>, Error>;

    async fn car_availability(&self, car_id: &str) -> Result<CarAvailability, Error>;

    async fn create_booking(&self, payload: &BookingPayload)
        -> Result<BookingReceipt, SubmitError>;

    async fn find_booking(&self, booking_id: &str) -> Result<InquiryRecord, Error>;
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CarTypesResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    car_types: Vec<CarTypeRecord>,
    #[serde(default)]
    timestamp: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct CarTypeRecord {
    #[serde(default)]
    id: Option<i64>,
    name: String,
    #[serde(default, alias = "displayName")]
    display_name: Option<String>,
    #[serde(alias = "ratePerKm", deserialize_with = "decimal")]
    rate_per_km: f64,
    #[serde(default, alias = "minRatePerKm", deserialize_with = "optional_decimal")]
    min_rate_per_km: Option<f64>,
    #[serde(default, alias = "maxRatePerKm", deserialize_with = "optional_decimal")]
    max_rate_per_km: Option<f64>,
    #[serde(default, alias = "minimumDistanceCap", deserialize_with = "optional_decimal")]
    minimum_distance_cap: Option<f64>,
    #[serde(default, alias = "isActive")]
    is_active: Option<bool>,
}

impl CarTypeRecord {
    fn into_car_type(self, position: usize) -> Option<CarType> {
        let rate = self.rate_per_km;
        let name = self.name.trim().to_lowercase();

        let car_type = CarType {
            id: self.id.unwrap_or(position as i64 + 1),
            display_name: self.display_name.unwrap_or_else(|| self.name.trim().to_string()),
            name,
            rate_per_km: rate,
            min_rate_per_km: self
                .min_rate_per_km
                .unwrap_or((rate - DEFAULT_RATE_SPREAD).max(0.0)),
            max_rate_per_km: self.max_rate_per_km.unwrap_or(rate + DEFAULT_RATE_SPREAD),
            minimum_distance_cap: self.minimum_distance_cap.unwrap_or(0.0),
            is_active: self.is_active.unwrap_or(true),
        };

        if car_type.name.is_empty() || !car_type.has_valid_rates() {
            tracing::warn!("dropping car type with invalid rates: {:?}", car_type);
            return None;
        }

        Some(car_type)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct DataResponse<T> {
    #[serde(default)]
    success: bool,
    data: Option<T>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
struct AvailabilityResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    available: bool,
    #[serde(default)]
    car_name: String,
    #[serde(default)]
    car_type: String,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
struct SubmissionResponse {
    success: bool,
    booking_id: Option<String>,
    message: Option<Value>,
    error: Option<Value>,
    details: Option<Value>,
    data: Option<Value>,
}

impl SubmissionResponse {
    fn reason(&self) -> Option<String> {
        self.error
            .as_ref()
            .or(self.message.as_ref())
            .and_then(text)
    }

    /// `field: message` lines when the backend sent a per-field error map.
    fn field_errors(&self) -> Option<Vec<String>> {
        let details = self.details.as_ref()?.as_object()?;

        let fields = details
            .iter()
            .map(|(field, messages)| {
                let messages = match messages {
                    Value::Array(items) => items.iter().filter_map(text).collect::<Vec<_>>(),
                    other => text(other).into_iter().collect(),
                };
                format!("{}: {}", field, messages.join(", "))
            })
            .collect::<Vec<_>>();

        match fields.is_empty() {
            true => None,
            false => Some(fields),
        }
    }
}

fn text(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => map
            .iter()
            .map(|(k, v)| format!("{}: {}", k, text(v).unwrap_or_default()))
            .reduce(|a, b| format!("{}; {}", a, b)),
        Value::Array(items) => items.iter().filter_map(text).reduce(|a, b| format!("{}, {}", a, b)),
        other => Some(other.to_string()),
    }
}

/// Maps a booking-creation response onto exactly one outcome.
pub fn interpret_submission(status: u16, body: &str) -> Result<BookingReceipt, SubmitError> {
    let parsed: Option<SubmissionResponse> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        if let Some(fields) = parsed.as_ref().and_then(|r| r.field_errors()) {
            return Err(SubmitError::Validation { fields });
        }

        let message = parsed
            .as_ref()
            .and_then(|r| r.reason())
            .unwrap_or_else(|| format!("HTTP {}", status));

        return Err(SubmitError::Server { status, message });
    }

    let response = parsed.ok_or_else(|| {
        SubmitError::Application("unreadable response from booking service".into())
    })?;

    if !response.success {
        let reason = response
            .reason()
            .unwrap_or_else(|| "booking was not accepted".into());
        return Err(SubmitError::Application(reason));
    }

    let booking_id = response
        .booking_id
        .filter(|id| !id.trim().is_empty())
        .ok_or_else(|| SubmitError::Application("response did not include a booking id".into()))?;

    let data = response
        .data
        .and_then(|data| serde_json::from_value(data).ok());

    Ok(BookingReceipt { booking_id, data })
}

/// REST client for the tours site backend.
#[derive(Clone, Debug)]
pub struct HttpBookingBackend {
    client: reqwest::Client,
    api_base: String,
    csrf_token: Option<String>,
}

impl HttpBookingBackend {
    pub fn new(api_base: &str, csrf_token: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: api_base.trim_end_matches('/').to_string(),
            csrf_token,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }
}

#[async_trait]
impl BookingBackend for HttpBookingBackend {
    #[tracing::instrument(skip(self))]
    async fn car_types(&self) -> Result<Vec<CarType>, Error> {
        let cache_buster = Utc::now().timestamp_millis().to_string();

        let res = self
            .client
            .get(self.url("/api/car-types/"))
            .query(&[("_", cache_buster)])
            .header(CACHE_CONTROL, "no-cache")
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(upstream_error(&format!("car types returned {}", res.status())));
        }

        let data: CarTypesResponse = res.json().await?;

        if !data.success {
            return Err(upstream_error("car types reported failure"));
        }

        tracing::debug!("car types catalog timestamp: {:?}", data.timestamp);

        let car_types: Vec<CarType> = data
            .car_types
            .into_iter()
            .enumerate()
            .filter_map(|(i, record)| record.into_car_type(i))
            .collect();

        if car_types.is_empty() {
            return Err(upstream_error("car types catalog is empty"));
        }

        Ok(car_types)
    }

    #[tracing::instrument(skip(self))]
    async fn available_cars_by_type(&self) -> Result<HashMap<String, Vec<String>>, Error> {
        let res = self
            .client
            .get(self.url("/api/available-cars-by-type/"))
            .send()
            .await?;

        if res.status().as_u16() != 200 {
            return Err(upstream_error(&format!(
                "available cars returned {}",
                res.status()
            )));
        }

        let data: DataResponse<HashMap<String, Vec<String>>> = res.json().await?;

        if !data.success {
            return Err(upstream_error("available cars reported failure"));
        }

        Ok(data.data.unwrap_or_default())
    }

    #[tracing::instrument(skip(self))]
    async fn car_availability(&self, car_id: &str) -> Result<CarAvailability, Error> {
        let res = self
            .client
            .get(self.url("/api/car-availability/"))
            .query(&[("car_id", car_id)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code == 404 {
            return Err(not_found_error("car"));
        } else if status_code == 400 {
            return Err(invalid_input_error("car id"));
        } else if status_code != 200 {
            return Err(upstream_error(&format!("car availability returned {}", status_code)));
        }

        let data: AvailabilityResponse = res.json().await?;

        if !data.success {
            let reason = data.error.as_ref().and_then(text).unwrap_or_default();
            return Err(upstream_error(&reason));
        }

        Ok(CarAvailability {
            car_id: car_id.to_string(),
            available: data.available,
            car_name: data.car_name,
            car_type: data.car_type,
        })
    }

    #[tracing::instrument(skip(self, payload), fields(car_type = %payload.car_type))]
    async fn create_booking(
        &self,
        payload: &BookingPayload,
    ) -> Result<BookingReceipt, SubmitError> {
        let body = payload.clone().rounded();

        let mut req = self
            .client
            .post(self.url("/api/inquiry/create-booking/"))
            .json(&body);

        if let Some(token) = &self.csrf_token {
            req = req
                .header("X-CSRFToken", token)
                .header(COOKIE, format!("csrftoken={}", token));
        }

        let res = req
            .send()
            .await
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let status_code = res.status().as_u16();
        let text = res
            .text()
            .await
            .map_err(|err| SubmitError::Network(err.to_string()))?;

        let outcome = interpret_submission(status_code, &text);

        match &outcome {
            Ok(receipt) => tracing::info!("booking created: {}", receipt.booking_id),
            Err(err) => tracing::warn!("booking rejected ({}): {}", status_code, err),
        }

        outcome
    }

    #[tracing::instrument(skip(self))]
    async fn find_booking(&self, booking_id: &str) -> Result<InquiryRecord, Error> {
        let res = self
            .client
            .get(self.url("/api/inquiry/by-booking-id/"))
            .query(&[("booking_id", booking_id)])
            .send()
            .await?;

        let status_code = res.status().as_u16();

        if status_code == 404 {
            return Err(not_found_error("booking"));
        } else if status_code == 400 {
            return Err(invalid_input_error("booking id is required"));
        } else if status_code != 200 {
            return Err(upstream_error(&format!("booking lookup returned {}", status_code)));
        }

        let data: DataResponse<InquiryRecord> = res.json().await?;

        if !data.success {
            let reason = data.error.as_ref().and_then(text).unwrap_or_default();
            return Err(upstream_error(&reason));
        }

        data.data.ok_or_else(|| upstream_error("booking lookup returned no data"))
    }
}
