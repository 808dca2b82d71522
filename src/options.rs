//! Per-call options.

use http::{HeaderMap, HeaderName, HeaderValue};
use serde::Serialize;

/// How a request payload is written to JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonOptions {
    /// Emit indented JSON instead of the compact form.
    pub pretty: bool,
}

impl JsonOptions {
    /// Serializes `value` according to these options.
    pub fn to_body<T: Serialize + ?Sized>(&self, value: &T) -> serde_json::Result<String> {
        if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        }
    }
}

/// Options for a single call on [`ApiService`](crate::ApiService).
///
/// Every field is optional; `RequestOptions::default()` targets the base
/// endpoint itself with no query string.
///
/// # Examples
///
/// ```
/// use apiservice::RequestOptions;
///
/// let options = RequestOptions::path("42").with_query("expand=true");
/// assert_eq!(options.path.as_deref(), Some("42"));
/// assert_eq!(options.query.as_deref(), Some("expand=true"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    /// Sub-path appended to the base endpoint.
    pub path: Option<String>,

    /// Query string, with or without the leading `?`.
    pub query: Option<String>,

    /// Headers added to this call only, on top of the client defaults.
    pub headers: HeaderMap,

    /// Serialization settings for the request payload.
    pub json: JsonOptions,

    /// Caller name recorded in the `Funz` tag of the call's log line.
    pub function: Option<String>,
}

impl RequestOptions {
    /// Options targeting `path` under the base endpoint.
    pub fn path(path: impl Into<String>) -> Self {
        Self::default().with_path(path)
    }

    /// Options carrying only a query string.
    pub fn query(query: impl Into<String>) -> Self {
        Self::default().with_query(query)
    }

    /// Sets the sub-path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Sets the query string.
    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Adds a header to this call.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Sets the payload serialization settings.
    pub fn with_json(mut self, json: JsonOptions) -> Self {
        self.json = json;
        self
    }

    /// Records `name` as the calling function in the log line.
    pub fn with_function(mut self, name: impl Into<String>) -> Self {
        self.function = Some(name.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_header_is_configuration_error() {
        let result = RequestOptions::default().with_header("bad header", "x");
        assert!(matches!(result, Err(crate::Error::Configuration(_))));
    }

    #[test]
    fn test_pretty_body() {
        let compact = JsonOptions::default().to_body(&serde_json::json!({"a": 1})).unwrap();
        assert_eq!(compact, r#"{"a":1}"#);

        let pretty = JsonOptions { pretty: true }
            .to_body(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(pretty, "{\n  \"a\": 1\n}");
    }
}
