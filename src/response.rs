//! The envelope returned by every API call.
//!
//! [`ApiResponse`] carries the outcome of a call as data instead of as an
//! error: a success flag, the HTTP status code, the deserialized payload when
//! one was obtained, and an error message when the call failed. Callers check
//! [`ApiResponse::is_success`] instead of matching on errors.

use http::StatusCode;
use serde::{Deserialize, Serialize};

/// Status code an envelope reports when nothing else was recorded.
pub const DEFAULT_STATUS_CODE: u16 = 200;

fn default_status_code() -> u16 {
    DEFAULT_STATUS_CODE
}

/// Outcome of a single API call.
///
/// When serialized the field names are `data`, `message`, `httpStatusCode`
/// and `success`; `data` and `message` are omitted when absent. A document
/// missing `httpStatusCode` reads back as 200 and one missing `success` as
/// `false`.
///
/// # Examples
///
/// ```
/// use apiservice::ApiResponse;
///
/// let response: ApiResponse<u32> = ApiResponse::success(201, Some(7));
/// assert!(response.is_success());
/// assert_eq!(response.data, Some(7));
///
/// let json = serde_json::to_string(&response).unwrap();
/// assert_eq!(json, r#"{"data":7,"httpStatusCode":201,"success":true}"#);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    /// The deserialized payload, if any was obtained.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    /// Error text for failed calls.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// The HTTP status code of the exchange.
    ///
    /// Validation failures keep the default of 200 since no exchange took
    /// place; transport failures without a response report 0.
    #[serde(default = "default_status_code")]
    pub http_status_code: u16,

    /// Whether the call completed with a success status.
    #[serde(default)]
    pub success: bool,
}

impl<T> ApiResponse<T> {
    /// Creates a successful envelope.
    pub fn success(http_status_code: u16, data: Option<T>) -> Self {
        Self {
            data,
            message: None,
            http_status_code,
            success: true,
        }
    }

    /// Creates a failed envelope for a call that never reached the server.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::default()
        }
    }

    /// Creates a failed envelope for a call that reached the transport.
    pub fn failure(http_status_code: u16, message: impl Into<String>, data: Option<T>) -> Self {
        Self {
            data,
            message: Some(message.into()),
            http_status_code,
            success: false,
        }
    }

    /// Returns `true` if the call succeeded.
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Returns the status code as an [`http::StatusCode`], if it is a valid one.
    ///
    /// ```
    /// use apiservice::ApiResponse;
    /// use http::StatusCode;
    ///
    /// let response: ApiResponse<()> = ApiResponse::success(204, None);
    /// assert_eq!(response.status(), Some(StatusCode::NO_CONTENT));
    /// ```
    pub fn status(&self) -> Option<StatusCode> {
        StatusCode::from_u16(self.http_status_code).ok()
    }

    /// Maps the payload to a different type, keeping the rest of the envelope.
    pub fn map<U, F>(self, f: F) -> ApiResponse<U>
    where
        F: FnOnce(T) -> U,
    {
        ApiResponse {
            data: self.data.map(f),
            message: self.message,
            http_status_code: self.http_status_code,
            success: self.success,
        }
    }

    /// Splits the envelope on its success flag.
    ///
    /// Successful calls yield their (possibly absent) payload; failed calls
    /// hand the whole envelope back so the status and message stay available.
    pub fn into_result(self) -> Result<Option<T>, ApiResponse<T>> {
        if self.success {
            Ok(self.data)
        } else {
            Err(self)
        }
    }
}

impl<T> Default for ApiResponse<T> {
    fn default() -> Self {
        Self {
            data: None,
            message: None,
            http_status_code: DEFAULT_STATUS_CODE,
            success: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_envelope() {
        let response: ApiResponse<String> = ApiResponse::default();
        assert!(!response.success);
        assert_eq!(response.http_status_code, 200);
        assert!(response.data.is_none());
        assert!(response.message.is_none());
    }

    #[test]
    fn test_serialize_omits_absent_fields() {
        let response: ApiResponse<String> = ApiResponse::invalid("No valid payload.");
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "message": "No valid payload.",
                "httpStatusCode": 200,
                "success": false
            })
        );
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let response: ApiResponse<u32> = serde_json::from_str(r#"{"data": 3}"#).unwrap();
        assert_eq!(response.data, Some(3));
        assert_eq!(response.http_status_code, 200);
        assert!(!response.success);
        assert!(response.message.is_none());
    }

    #[test]
    fn test_map_keeps_metadata() {
        let response = ApiResponse::failure(404, "not found", Some(41)).map(|n| n + 1);
        assert_eq!(response.data, Some(42));
        assert_eq!(response.http_status_code, 404);
        assert_eq!(response.message.as_deref(), Some("not found"));
        assert!(!response.success);
    }

    #[test]
    fn test_into_result() {
        let ok: ApiResponse<u8> = ApiResponse::success(200, Some(1));
        assert_eq!(ok.into_result(), Ok(Some(1)));

        let failed: ApiResponse<u8> = ApiResponse::failure(500, "boom", None);
        let err = failed.into_result().unwrap_err();
        assert_eq!(err.http_status_code, 500);
    }

    #[test]
    fn test_status_out_of_range() {
        let response: ApiResponse<()> = ApiResponse::failure(0, "unreachable", None);
        assert_eq!(response.status(), None);
    }
}
