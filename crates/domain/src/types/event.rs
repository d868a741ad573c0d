//! Error event records
//!
//! [`ErrorRecord`] is what callers hand to the collector; the collector stamps
//! it with a timestamp and a unique id to produce an [`ErrorEvent`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One recorded occurrence of an application error
///
/// Events are values: readers always receive copies, so nothing a reader does
/// can change what the collector holds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEvent {
    /// Application-defined error code, conventionally 0-9999
    pub error_code: i32,
    /// Exception or error kind name
    pub error_name: String,
    /// Transport (HTTP) status code
    pub status_code: u16,
    pub message: String,
    /// Arbitrary structured context; may contain PII, masking happens
    /// downstream
    pub detail: Option<Value>,
    /// Request path, if known
    pub path: Option<String>,
    /// Request method, if known
    pub method: Option<String>,
    pub timestamp: DateTime<Utc>,
    /// Unique within the lifetime of a collector
    pub event_id: String,
}

impl ErrorEvent {
    /// Stamp a record with `timestamp` and a fresh v4 UUID.
    pub fn from_record(record: ErrorRecord, timestamp: DateTime<Utc>) -> Self {
        let ErrorRecord { error_code, error_name, status_code, message, detail, path, method } =
            record;
        Self {
            error_code,
            error_name,
            status_code,
            message,
            detail,
            path,
            method,
            timestamp,
            event_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Draft of an error event, built by the caller before recording
///
/// # Example
/// ```
/// use faultline_domain::ErrorRecord;
/// use serde_json::json;
///
/// let record = ErrorRecord::new(404, "NotFound", 404, "Resource not found")
///     .with_path("/api/users/123")
///     .with_method("GET")
///     .with_detail(json!({ "user_id": 123 }));
/// assert_eq!(record.path.as_deref(), Some("/api/users/123"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorRecord {
    pub error_code: i32,
    pub error_name: String,
    pub status_code: u16,
    pub message: String,
    pub detail: Option<Value>,
    pub path: Option<String>,
    pub method: Option<String>,
}

impl ErrorRecord {
    /// Create a record with the required fields and no request context
    pub fn new(
        error_code: i32,
        error_name: impl Into<String>,
        status_code: u16,
        message: impl Into<String>,
    ) -> Self {
        Self {
            error_code,
            error_name: error_name.into(),
            status_code,
            message: message.into(),
            detail: None,
            path: None,
            method: None,
        }
    }

    /// Attach structured detail
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Attach the request path
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the request method
    pub fn with_method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }
}
