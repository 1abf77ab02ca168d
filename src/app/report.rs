//! Outward result envelope
//!
//! Every outcome handed to a caller, success or failure, is wrapped as
//! `{ success, data?, error?: { kind, message } }` so failures are reported
//! instead of swallowed.

use serde::{Deserialize, Serialize};

use crate::errors::{AppError, Result};

/// Serializable description of a failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorReport {
    /// Stable error category, see [`AppError::category`]
    pub kind: String,
    pub message: String,
}

impl From<&AppError> for ErrorReport {
    fn from(error: &AppError) -> Self {
        Self {
            kind: error.category().to_string(),
            message: error.to_string(),
        }
    }
}

/// Result envelope for downloads and validation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Response<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorReport>,
}

impl<T> Response<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(error: &AppError) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(ErrorReport::from(error)),
        }
    }

    /// Build the envelope from a borrowed result, leaving the error with the caller
    pub fn from_result(result: &Result<T>) -> Self
    where
        T: Clone,
    {
        match result {
            Ok(data) => Self::ok(data.clone()),
            Err(e) => Self::failed(e),
        }
    }
}

impl<T> From<Result<T>> for Response<T> {
    fn from(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(e) => Self::failed(&e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::models::RunSummary;
    use crate::errors::{AcquisitionError, DownloadError};
    use serde_json::json;

    #[test]
    fn test_success_envelope() {
        let summary = RunSummary {
            runtime_duration_in_seconds: 12,
            accession_download_attempt_count: 1,
        };
        let response = Response::ok(summary);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(
            value,
            json!({
                "success": true,
                "data": {
                    "runtimeDurationInSeconds": 12,
                    "accessionDownloadAttemptCount": 1
                }
            })
        );
    }

    #[test]
    fn test_failure_envelope() {
        let result: Result<RunSummary> =
            Err(AcquisitionError::AccessionsUnobtainable { attempts: 5 }.into());
        let response = Response::from(result);

        assert!(!response.success);
        assert!(response.data.is_none());
        let error = response.error.unwrap();
        assert_eq!(error.kind, "accessions_unobtainable");
        assert!(error.message.contains("5 attempts"));
    }

    #[test]
    fn test_request_failure_kind() {
        let error: AppError = DownloadError::RequestFailed {
            status: 503,
            url: "https://api.example.com/3/accession/".to_string(),
        }
        .into();
        let response: Response<()> = Response::failed(&error);

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["success"], json!(false));
        assert_eq!(value["error"]["kind"], json!("request_failed"));
        assert!(value.get("data").is_none());
    }
}
