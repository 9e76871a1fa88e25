use serde_json::Value;

use crate::{
    domain::PDF_MIME_TYPE,
    error::{ErrorCode, UploadFailure, UNKNOWN_ERROR_MESSAGE},
};

pub const PROCESS_PATH: &str = "/process";
pub const FILE_FIELD: &str = "file";
pub const SENSITIVITY_FIELD: &str = "sensitivity";

pub const STATUS_SUCCESS: &str = "success";
pub const STATUS_NO_WATERMARKS: &str = "no_watermarks";

/// JSON body returned by `POST /process`. Every field is optional on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessResponse {
    pub status: Option<String>,
    pub download_url: Option<String>,
    pub error: Option<String>,
    pub message: Option<String>,
    pub file_base64: Option<String>,
    pub filename: Option<String>,
    pub removed_count: Option<u64>,
}

impl ProcessResponse {
    /// Reads the consumed fields out of any JSON value. Fields of the wrong
    /// type count as absent, and a non-object body has no fields at all.
    pub fn from_json(value: &Value) -> Self {
        let text = |key: &str| value.get(key).and_then(Value::as_str).map(str::to_string);
        Self {
            status: text("status"),
            download_url: text("download_url"),
            error: text("error"),
            message: text("message"),
            file_base64: text("file_base64"),
            filename: text("filename"),
            removed_count: value.get("removed_count").and_then(Value::as_u64),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status.as_deref() == Some(STATUS_SUCCESS)
    }

    /// `error`, then `message`, then a generic default. Empty strings are skipped.
    pub fn failure_message(&self) -> String {
        non_empty(&self.error)
            .or_else(|| non_empty(&self.message))
            .unwrap_or(UNKNOWN_ERROR_MESSAGE)
            .to_string()
    }

    /// `download_url` verbatim, or a data URL wrapping an inline payload.
    pub fn download_target(&self) -> Option<String> {
        if let Some(url) = non_empty(&self.download_url) {
            return Some(url.to_string());
        }
        non_empty(&self.file_base64).map(|b64| format!("data:{PDF_MIME_TYPE};base64,{b64}"))
    }
}

fn non_empty(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|value| !value.is_empty())
}

/// The settled result of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProcessOutcome {
    Completed {
        download_url: String,
        filename: Option<String>,
        removed_count: Option<u64>,
    },
    Failed(UploadFailure),
}

impl ProcessOutcome {
    /// Classifies a response that was received and parsed as JSON.
    pub fn from_reply(http_ok: bool, body: &ProcessResponse) -> Self {
        if http_ok && body.is_success() {
            return Self::Completed {
                download_url: body.download_target().unwrap_or_default(),
                filename: body.filename.clone(),
                removed_count: body.removed_count,
            };
        }
        Self::Failed(UploadFailure::new(
            ErrorCode::Application,
            body.failure_message(),
        ))
    }

    pub fn connection_failed() -> Self {
        Self::Failed(UploadFailure::network())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CONNECT_FAILURE_MESSAGE;
    use serde_json::json;

    #[test]
    fn success_requires_http_ok_and_success_status() {
        let body = ProcessResponse::from_json(&json!({ "status": "success", "download_url": "X" }));
        assert_eq!(
            ProcessOutcome::from_reply(true, &body),
            ProcessOutcome::Completed {
                download_url: "X".to_string(),
                filename: None,
                removed_count: None,
            }
        );
        assert!(matches!(
            ProcessOutcome::from_reply(false, &body),
            ProcessOutcome::Failed(UploadFailure {
                code: ErrorCode::Application,
                ..
            })
        ));
    }

    #[test]
    fn failure_message_falls_back_from_error_to_message_to_default() {
        let both = ProcessResponse::from_json(&json!({ "error": "bad file", "message": "ignored" }));
        assert_eq!(both.failure_message(), "bad file");

        let message_only = ProcessResponse::from_json(&json!({
            "status": "no_watermarks",
            "message": "No consistent watermarks detected."
        }));
        assert_eq!(
            message_only.failure_message(),
            "No consistent watermarks detected."
        );

        let empty_error = ProcessResponse::from_json(&json!({ "error": "", "message": "fallback" }));
        assert_eq!(empty_error.failure_message(), "fallback");

        let nothing = ProcessResponse::from_json(&json!({ "status": "fail" }));
        assert_eq!(nothing.failure_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn non_object_and_mistyped_bodies_have_no_fields() {
        assert_eq!(ProcessResponse::from_json(&Value::Null), ProcessResponse::default());
        let mistyped = ProcessResponse::from_json(&json!({ "status": 1, "error": ["x"] }));
        assert!(!mistyped.is_success());
        assert_eq!(mistyped.failure_message(), UNKNOWN_ERROR_MESSAGE);
    }

    #[test]
    fn inline_payload_becomes_data_url() {
        let body = ProcessResponse::from_json(&json!({
            "status": "success",
            "file_base64": "JVBERi0=",
            "filename": "clean_a.pdf",
            "removed_count": 2
        }));
        assert_eq!(
            ProcessOutcome::from_reply(true, &body),
            ProcessOutcome::Completed {
                download_url: "data:application/pdf;base64,JVBERi0=".to_string(),
                filename: Some("clean_a.pdf".to_string()),
                removed_count: Some(2),
            }
        );
    }

    #[test]
    fn connection_failure_uses_generic_message() {
        assert_eq!(
            ProcessOutcome::connection_failed(),
            ProcessOutcome::Failed(UploadFailure::new(
                ErrorCode::Network,
                CONNECT_FAILURE_MESSAGE
            ))
        );
    }
}
