//! User notifications carrying opaque JSON payloads.

use chrono::Utc;
use inkwell_core::{AppError, AppResult, NonEmptyString};
use serde_json::Value;

use crate::UserId;

/// Maximum notification name length.
pub const NOTIFICATION_NAME_MAX_LENGTH: usize = 128;

/// Stored notification. At most one exists per user and name.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Notification name, for example `unread_count`.
    pub name: String,
    /// Owning user.
    pub user_id: UserId,
    /// Seconds since the Unix epoch at which the payload was written.
    pub timestamp: f64,
    /// JSON-encoded payload.
    pub payload_json: String,
}

impl Notification {
    /// Decodes the stored payload.
    pub fn get_data(&self) -> AppResult<Value> {
        serde_json::from_str(self.payload_json.as_str()).map_err(|error| {
            AppError::Decode(format!(
                "notification '{}' has a malformed payload: {error}",
                self.name
            ))
        })
    }
}

/// Validated notification write.
#[derive(Debug, Clone, PartialEq)]
pub struct NewNotification {
    name: NonEmptyString,
    payload_json: String,
    timestamp: f64,
}

impl NewNotification {
    /// Serializes `data` and stamps the write with the current time.
    pub fn new(name: impl Into<String>, data: &Value) -> AppResult<Self> {
        let name = NonEmptyString::with_max_chars(
            "notification name",
            name,
            NOTIFICATION_NAME_MAX_LENGTH,
        )?;
        let payload_json = serde_json::to_string(data).map_err(|error| {
            AppError::Internal(format!("failed to encode notification payload: {error}"))
        })?;

        Ok(Self {
            name,
            payload_json,
            timestamp: unix_timestamp_now(),
        })
    }

    /// Returns the notification name.
    #[must_use]
    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    /// Returns the encoded payload.
    #[must_use]
    pub fn payload_json(&self) -> &str {
        self.payload_json.as_str()
    }

    /// Returns the write timestamp in seconds since the Unix epoch.
    #[must_use]
    pub fn timestamp(&self) -> f64 {
        self.timestamp
    }
}

/// Current time as fractional seconds since the Unix epoch.
#[must_use]
pub fn unix_timestamp_now() -> f64 {
    let micros = Utc::now().timestamp_micros();
    micros as f64 / 1_000_000.0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn stored(payload_json: &str) -> Notification {
        Notification {
            id: 1,
            name: "unread_count".to_owned(),
            user_id: UserId::new(),
            timestamp: unix_timestamp_now(),
            payload_json: payload_json.to_owned(),
        }
    }

    #[test]
    fn payload_is_encoded_as_json() {
        let notification = NewNotification::new("unread_count", &json!({"count": 5}));
        assert!(matches!(
            notification,
            Ok(value) if value.payload_json() == r#"{"count":5}"#
        ));
    }

    #[test]
    fn get_data_decodes_payload() {
        let data = stored(r#"{"count":5}"#).get_data();
        assert!(matches!(data, Ok(value) if value == json!({"count": 5})));
    }

    #[test]
    fn malformed_payload_is_a_decode_error() {
        let data = stored("{not json").get_data();
        assert!(matches!(data, Err(AppError::Decode(_))));
    }

    #[test]
    fn blank_name_is_rejected() {
        assert!(NewNotification::new("", &json!(null)).is_err());
    }

    #[test]
    fn timestamp_is_recent() {
        let before = unix_timestamp_now();
        let notification = NewNotification::new("task_progress", &json!({}))
            .unwrap_or_else(|_| unreachable!());
        assert!(notification.timestamp() >= before);
    }
}
