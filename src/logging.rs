//! Per-call log lines and the logger seam.
//!
//! Every call that reaches dispatch produces one [`LogLine`], rendered as a
//! run of bracketed tags:
//!
//! ```text
//! [DBG][HttpVerb: GET][URL: /people/1][HttpCode: 200]
//! ```
//!
//! Lines are handed to a [`CallLogger`]. [`TracingLogger`] forwards them to
//! `tracing`; [`NoopLogger`] drops them and is what a service uses when no
//! logger was configured.

use crate::Error;
use http::Method;
use std::fmt;
use std::time::Duration;
use tracing::Level;

/// Receives the log line of each call.
pub trait CallLogger: Send + Sync {
    /// Records `line` at `level`.
    fn log(&self, level: Level, line: &LogLine);
}

/// Discards every line.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopLogger;

impl CallLogger for NoopLogger {
    fn log(&self, _level: Level, _line: &LogLine) {}
}

/// Emits lines as `tracing` events.
///
/// The rendered tag line is the event message; verb, url and status are
/// also attached as fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl CallLogger for TracingLogger {
    fn log(&self, level: Level, line: &LogLine) {
        let verb = line.verb.as_str();
        let url = line.url.as_str();
        let status = line.status;

        match level {
            Level::ERROR => tracing::error!(verb, url, status, "{}", line),
            Level::WARN => tracing::warn!(verb, url, status, "{}", line),
            Level::INFO => tracing::info!(verb, url, status, "{}", line),
            Level::DEBUG => tracing::debug!(verb, url, status, "{}", line),
            _ => tracing::trace!(verb, url, status, "{}", line),
        }
    }
}

/// Error details carried by a log line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorTags {
    /// The error's display text.
    pub message: String,
    /// The immediate cause, or the error kind when there is none.
    pub source: String,
    /// Every cause in the chain, outermost first.
    pub stack: String,
}

impl ErrorTags {
    /// Collects the tags for `err`.
    pub fn from_error(err: &Error) -> Self {
        let causes: Vec<String> =
            std::iter::successors(std::error::Error::source(err), |e| e.source())
                .map(|e| e.to_string())
                .collect();

        let source = match causes.first() {
            Some(cause) => cause.clone(),
            None => err.kind().to_string(),
        };

        Self {
            message: err.to_string(),
            source,
            stack: causes.join(" <- "),
        }
    }
}

/// A single structured log line describing one call.
#[derive(Debug, Clone)]
pub struct LogLine {
    /// Prefix the line with `[DBG]`.
    pub debug: bool,
    /// `HttpVerb` tag.
    pub verb: Method,
    /// `URL` tag: the host-relative URL the call was sent to.
    pub url: String,
    /// Name of the calling function, when the caller wants it recorded.
    pub function: Option<String>,
    /// `HttpCode` tag. 0 when no response was received.
    pub status: u16,
    /// `Description` tag, e.g. `Json Conversion`.
    pub description: Option<String>,
    /// `Duration` tag, rendered in whole milliseconds.
    pub duration: Option<Duration>,
    /// `Error`, `ErrSource` and `ErrStack` tags.
    pub error: Option<ErrorTags>,
    /// Raw response body of a failed call.
    pub http_stream: Option<String>,
}

impl LogLine {
    /// A debug-tagged line with only the mandatory tags.
    pub fn new(verb: Method, url: impl Into<String>, status: u16) -> Self {
        Self {
            debug: true,
            verb,
            url: url.into(),
            function: None,
            status,
            description: None,
            duration: None,
            error: None,
            http_stream: None,
        }
    }

    /// Sets the `Description` tag.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the `Duration` tag.
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = Some(duration);
        self
    }

    /// Records `err` as the `Error`, `ErrSource` and `ErrStack` tags.
    pub fn with_error(mut self, err: &Error) -> Self {
        self.error = Some(ErrorTags::from_error(err));
        self
    }

    /// Sets the `HttpStream` tag.
    pub fn with_http_stream(mut self, body: impl Into<String>) -> Self {
        self.http_stream = Some(body.into());
        self
    }
}

fn write_tag(f: &mut fmt::Formatter<'_>, key: &str, value: &str) -> fmt::Result {
    if value.is_empty() {
        write!(f, "[{}]", key)
    } else {
        write!(f, "[{}: {}]", key, value)
    }
}

impl fmt::Display for LogLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.debug {
            write_tag(f, "DBG", "")?;
        }
        write_tag(f, "HttpVerb", self.verb.as_str())?;
        write_tag(f, "URL", &self.url)?;
        if let Some(function) = self.function.as_deref().filter(|s| !s.is_empty()) {
            write_tag(f, "Funz", function)?;
        }
        write_tag(f, "HttpCode", &self.status.to_string())?;
        if let Some(description) = self.description.as_deref().filter(|s| !s.is_empty()) {
            write_tag(f, "Description", description)?;
        }
        if let Some(duration) = self.duration {
            write_tag(f, "Duration", &duration.as_millis().to_string())?;
        }
        if let Some(error) = &self.error {
            write_tag(f, "Error", &error.message)?;
            write_tag(f, "ErrSource", &error.source)?;
            write_tag(f, "ErrStack", &error.stack)?;
        }
        if let Some(body) = self.http_stream.as_deref().filter(|s| !s.is_empty()) {
            write_tag(f, "HttpStream", body)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::StatusCode;

    #[test]
    fn test_minimal_line() {
        let line = LogLine::new(Method::GET, "/people/1", 200);
        assert_eq!(
            line.to_string(),
            "[DBG][HttpVerb: GET][URL: /people/1][HttpCode: 200]"
        );
    }

    #[test]
    fn test_optional_tags_in_order() {
        let mut line = LogLine::new(Method::PUT, "/people/1", 500)
            .with_description("Json Conversion")
            .with_duration(Duration::from_millis(12))
            .with_http_stream("{}");
        line.function = Some("update_person".to_string());
        line.debug = false;

        assert_eq!(
            line.to_string(),
            "[HttpVerb: PUT][URL: /people/1][Funz: update_person][HttpCode: 500]\
             [Description: Json Conversion][Duration: 12][HttpStream: {}]"
        );
    }

    #[test]
    fn test_error_without_source_uses_kind() {
        let err = Error::Status {
            status: StatusCode::NOT_FOUND,
            body: String::new(),
        };
        let line = LogLine::new(Method::GET, "/people/9", 404).with_error(&err);
        assert_eq!(
            line.to_string(),
            "[DBG][HttpVerb: GET][URL: /people/9][HttpCode: 404]\
             [Error: Response status code does not indicate success: 404 Not Found]\
             [ErrSource: Status][ErrStack]"
        );
    }

    #[test]
    fn test_error_with_source_chain() {
        let err: Error = url::Url::parse("not a url").unwrap_err().into();
        let tags = ErrorTags::from_error(&err);
        assert_eq!(tags.source, "relative URL without a base");
        assert_eq!(tags.stack, "relative URL without a base");
        assert_eq!(tags.message, "Invalid URL: relative URL without a base");
    }
}
