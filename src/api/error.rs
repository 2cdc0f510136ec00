use axum::{Json, http::StatusCode, response::IntoResponse};
use thiserror::Error;
use tracing::error;

use super::models::ErrorResponse;
use crate::hashlist::HashListError;
use crate::processor::ProcessorError;

/// Every way a hash query can fail, in the order the handler checks them.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Body is not a JSON object, or a required key has the wrong type.
    #[error("Could not parse JSON payload")]
    MalformedPayload(String),

    /// Body could not be read at all.
    #[error("Exception in request")]
    RequestFailed(String),

    #[error("not all keys present")]
    MissingField(&'static str),

    /// Carries the whole request body, as received.
    #[error("Could not parse JSON payload {payload}")]
    UnparseableHashList {
        payload: String,
        #[source]
        source: HashListError,
    },

    #[error("payload too large: limit is {0} bytes")]
    PayloadTooLarge(usize),

    #[error("Problem with query to Autofocus: {0}")]
    Processor(#[from] ProcessorError),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MalformedPayload(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::RequestFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::MissingField(_) => StatusCode::BAD_REQUEST,
            ApiError::UnparseableHashList { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Processor(_) => StatusCode::NOT_IMPLEMENTED,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::MalformedPayload(_) => "MALFORMED_PAYLOAD",
            ApiError::RequestFailed(_) => "REQUEST_FAILED",
            ApiError::MissingField(_) => "MISSING_FIELD",
            ApiError::UnparseableHashList { .. } => "UNPARSEABLE_HASH_LIST",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::Processor(_) => "PROCESSOR_FAILED",
        }
    }

    /// Diagnostic detail that stays in the logs and out of the response.
    fn detail(&self) -> Option<&str> {
        match self {
            ApiError::MalformedPayload(detail) | ApiError::RequestFailed(detail) => {
                Some(detail.as_str())
            }
            ApiError::MissingField(key) => Some(*key),
            ApiError::UnparseableHashList {
                source: HashListError::Unparseable(hashes),
                ..
            } => Some(hashes.as_str()),
            _ => None,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = self.status_code();
        error!(
            code = self.code(),
            status = status.as_u16(),
            detail = self.detail().unwrap_or_default(),
            "{}",
            self
        );

        let body = ErrorResponse {
            message: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(value: serde_json::Error) -> Self {
        ApiError::MalformedPayload(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_match_the_failure_table() {
        assert_eq!(
            ApiError::MalformedPayload("eof".into()).to_string(),
            "Could not parse JSON payload"
        );
        assert_eq!(
            ApiError::RequestFailed("reset".into()).to_string(),
            "Exception in request"
        );
        assert_eq!(
            ApiError::MissingField("hashes").to_string(),
            "not all keys present"
        );
        assert_eq!(
            ApiError::UnparseableHashList {
                payload: r#"{"hashes":"abc"}"#.into(),
                source: HashListError::Unparseable("abc".into()),
            }
            .to_string(),
            r#"Could not parse JSON payload {"hashes":"abc"}"#
        );
        assert_eq!(
            ApiError::Processor(ProcessorError::QuotaExceeded).to_string(),
            "Problem with query to Autofocus: quota exceeded"
        );
    }

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::MissingField("output").status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::UnparseableHashList {
                payload: "{}".into(),
                source: HashListError::Unparseable("abc".into()),
            }
            .status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::Processor(ProcessorError::AuthFailure).status_code(),
            StatusCode::NOT_IMPLEMENTED
        );
    }
}
