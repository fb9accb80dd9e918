use axum::extract::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::env;
use std::fmt;

use crate::engine::FareError;
use crate::entities::InputValidationError;
use crate::external::SubmitError;

pub const CONFIG_ERROR: i32 = 1;
pub const REQWEST_ERROR: i32 = 3;
pub const UPSTREAM_ERROR: i32 = 4;
pub const UNEXPECTED_ERROR: i32 = 5;

pub const INVALID_STATE: i32 = 100;
pub const INVALID_INPUT: i32 = 101;
pub const UNKNOWN_CAR_TYPE: i32 = 102;
pub const NOT_FOUND: i32 = 103;
pub const SUBMISSION_IN_PROGRESS: i32 = 104;

pub const BOOKING_VALIDATION: i32 = 110;
pub const BOOKING_SERVER: i32 = 111;
pub const BOOKING_APPLICATION: i32 = 112;
pub const BOOKING_NETWORK: i32 = 113;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Error {
    pub code: i32,
    pub message: String,
    pub details: Vec<String>,
}

impl Error {
    fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    pub fn is_internal(&self) -> bool {
        (1..=99).contains(&self.code)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        reqwest_error(err)
    }
}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<InputValidationError> for Error {
    fn from(err: InputValidationError) -> Self {
        Error {
            code: INVALID_INPUT,
            message: err.to_string(),
            details: err.errors.iter().map(|e| e.to_string()).collect(),
        }
    }
}

impl From<FareError> for Error {
    fn from(err: FareError) -> Self {
        match err {
            FareError::UnknownCarType(_) => Error::new(UNKNOWN_CAR_TYPE, err.to_string()),
            FareError::InvalidDistance(_) => Error::new(INVALID_INPUT, err.to_string()),
        }
    }
}

impl From<SubmitError> for Error {
    fn from(err: SubmitError) -> Self {
        let code = match &err {
            SubmitError::Validation { .. } => BOOKING_VALIDATION,
            SubmitError::Server { .. } => BOOKING_SERVER,
            SubmitError::Application(_) => BOOKING_APPLICATION,
            SubmitError::Network(_) => BOOKING_NETWORK,
        };

        let details = match &err {
            SubmitError::Validation { fields } => fields.clone(),
            _ => Vec::new(),
        };

        Error {
            code,
            message: err.to_string(),
            details,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match self.code {
            1..=99 => StatusCode::INTERNAL_SERVER_ERROR,
            INVALID_STATE | SUBMISSION_IN_PROGRESS => StatusCode::CONFLICT,
            NOT_FOUND => StatusCode::NOT_FOUND,
            BOOKING_SERVER | BOOKING_NETWORK => StatusCode::BAD_GATEWAY,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = if self.is_internal() {
            Json(json!({
                "code": self.code,
                "error": "Internal Server Error",
            }))
        } else {
            Json(json!({
                "code": self.code,
                "error": self.message,
                "details": self.details,
            }))
        };

        (status, body).into_response()
    }
}

pub fn invalid_state_error(reason: &str) -> Error {
    Error::new(INVALID_STATE, format!("invalid state: {}", reason))
}

pub fn invalid_input_error(reason: &str) -> Error {
    Error::new(INVALID_INPUT, format!("invalid input: {}", reason))
}

pub fn not_found_error(what: &str) -> Error {
    Error::new(NOT_FOUND, format!("{} not found", what))
}

pub fn submission_in_progress_error() -> Error {
    Error::new(
        SUBMISSION_IN_PROGRESS,
        "a booking request is already being submitted, please wait",
    )
}

pub fn config_error(variable: &str, reason: &str) -> Error {
    Error::new(
        CONFIG_ERROR,
        format!("configuration error in {}: {}", variable, reason),
    )
}

pub fn env_var_error(err: env::VarError) -> Error {
    Error::new(CONFIG_ERROR, format!("configuration error: {}", err))
}

pub fn reqwest_error(err: reqwest::Error) -> Error {
    Error::new(REQWEST_ERROR, format!("reqwest error: {}", err))
}

pub fn upstream_error(reason: &str) -> Error {
    Error::new(UPSTREAM_ERROR, format!("upstream error: {}", reason))
}

pub fn unexpected_error() -> Error {
    Error::new(UNEXPECTED_ERROR, "unexpected error")
}
