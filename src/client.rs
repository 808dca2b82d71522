//! Generic API client.
//!
//! [`ApiService`] is the base resource clients are built on. It is fixed to
//! one base endpoint (such as `/people`), sends its calls through an
//! [`ApiTransport`] and reports every outcome as an [`ApiResponse`].
//! Use [`ApiServiceBuilder`] to configure and create services.

use crate::{
    logging::{CallLogger, LogLine, NoopLogger},
    options::RequestOptions,
    response::DEFAULT_STATUS_CODE,
    transport::{ApiTransport, TransportRequest, TransportResponse},
    uri::build_uri,
    ApiResponse, Error, Result,
};
use http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::Level;

/// Message of the envelope returned when a write call has no payload.
pub const NO_VALID_PAYLOAD: &str = "No valid payload.";

/// Message of the envelope returned when no URL could be built.
pub const INVALID_URL: &str = "Url non valid";

/// Content type of every request body.
pub const JSON_CONTENT_TYPE: &str = "application/json; charset=utf-8";

const JSON_CONVERSION: &str = "Json Conversion";
const JSON_SERIALIZATION: &str = "Json Serialization";

/// A client bound to one base endpoint.
///
/// Verb operations never fail: network errors, timeouts, non-2xx statuses
/// and unreadable bodies all come back as an [`ApiResponse`] with
/// `success == false` (or, for unreadable 2xx bodies, `success == true` and
/// no data), and each call writes one line to the configured
/// [`CallLogger`].
///
/// Cloning is cheap; clones share configuration and transport.
///
/// # Examples
///
/// ```no_run
/// use apiservice::{ApiService, ReqwestTransport, RequestOptions, TracingLogger};
/// use serde::Deserialize;
/// use std::sync::Arc;
///
/// #[derive(Deserialize)]
/// struct Order { id: u64 }
///
/// # async fn example() -> Result<(), apiservice::Error> {
/// let service = ApiService::builder()
///     .base_endpoint("/orders")
///     .api_key("secret")
///     .transport(ReqwestTransport::from_host("https://api.example.com")?)
///     .logger(Arc::new(TracingLogger))
///     .build()?;
///
/// let response = service.get::<Order>(RequestOptions::path("42")).await;
/// if response.is_success() {
///     println!("order {:?}", response.data.map(|o| o.id));
/// }
/// # Ok(())
/// # }
/// ```
pub struct ApiService<T> {
    inner: Arc<ServiceInner<T>>,
}

struct ServiceInner<T> {
    transport: T,
    base_endpoint: String,
    default_headers: HeaderMap,
    logger: Arc<dyn CallLogger>,
    capture_error_body: bool,
}

impl<T> Clone for ApiService<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ApiTransport> ApiService<T> {
    /// Creates a new `ApiServiceBuilder`.
    pub fn builder() -> ApiServiceBuilder<T> {
        ApiServiceBuilder::new()
    }

    /// Creates a service without credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_endpoint` is empty.
    pub fn new(
        base_endpoint: impl Into<String>,
        transport: T,
        logger: Option<Arc<dyn CallLogger>>,
    ) -> Result<Self> {
        let mut builder = Self::builder().base_endpoint(base_endpoint).transport(transport);
        if let Some(logger) = logger {
            builder = builder.logger(logger);
        }
        builder.build()
    }

    /// Creates a service that sends `api_key` as the `Authorization` header.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_endpoint` or `api_key` is empty.
    pub fn with_api_key(
        base_endpoint: impl Into<String>,
        api_key: impl Into<String>,
        transport: T,
        logger: Option<Arc<dyn CallLogger>>,
    ) -> Result<Self> {
        let mut builder = Self::builder()
            .base_endpoint(base_endpoint)
            .api_key(api_key)
            .transport(transport);
        if let Some(logger) = logger {
            builder = builder.logger(logger);
        }
        builder.build()
    }

    /// The base endpoint every call is relative to.
    pub fn base_endpoint(&self) -> &str {
        &self.inner.base_endpoint
    }

    /// The transport this service dispatches through.
    pub fn transport(&self) -> &T {
        &self.inner.transport
    }

    /// Sends a GET request.
    pub async fn get<Res>(&self, options: RequestOptions) -> ApiResponse<Res>
    where
        Res: DeserializeOwned,
    {
        self.call::<(), Res>(Method::GET, None, options).await
    }

    /// Sends a POST request with `payload` as JSON body.
    ///
    /// A `None` payload short-circuits to a failed envelope with message
    /// [`NO_VALID_PAYLOAD`]; nothing is sent.
    pub async fn post<Req, Res>(
        &self,
        payload: Option<&Req>,
        options: RequestOptions,
    ) -> ApiResponse<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call_with_payload(Method::POST, payload, options).await
    }

    /// Sends a PUT request with `payload` as JSON body.
    pub async fn put<Req, Res>(
        &self,
        payload: Option<&Req>,
        options: RequestOptions,
    ) -> ApiResponse<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call_with_payload(Method::PUT, payload, options).await
    }

    /// Sends a PATCH request with `payload` as JSON body.
    pub async fn patch<Req, Res>(
        &self,
        payload: Option<&Req>,
        options: RequestOptions,
    ) -> ApiResponse<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        self.call_with_payload(Method::PATCH, payload, options).await
    }

    async fn call_with_payload<Req, Res>(
        &self,
        method: Method,
        payload: Option<&Req>,
        options: RequestOptions,
    ) -> ApiResponse<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let Some(payload) = payload else {
            return ApiResponse::invalid(NO_VALID_PAYLOAD);
        };
        self.call(method, Some(payload), options).await
    }

    /// Runs one call: build the URL, serialize, dispatch, classify, log.
    async fn call<Req, Res>(
        &self,
        method: Method,
        payload: Option<&Req>,
        options: RequestOptions,
    ) -> ApiResponse<Res>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let url = build_uri(
            &self.inner.base_endpoint,
            options.path.as_deref(),
            options.query.as_deref(),
        );
        if url.is_empty() {
            return ApiResponse::invalid(INVALID_URL);
        }

        let line = LogLine {
            function: options.function,
            ..LogLine::new(method.clone(), url.clone(), DEFAULT_STATUS_CODE)
        };

        let mut headers = self.inner.default_headers.clone();
        headers.extend(options.headers);

        let body = match payload {
            Some(payload) => match options.json.to_body(payload) {
                Ok(body) => {
                    headers.insert(
                        header::CONTENT_TYPE,
                        HeaderValue::from_static(JSON_CONTENT_TYPE),
                    );
                    Some(body)
                }
                Err(e) => {
                    let err = Error::Serialization(e.to_string());
                    self.write_log(
                        Level::ERROR,
                        line.with_description(JSON_SERIALIZATION).with_error(&err),
                    );
                    return ApiResponse::invalid(err.to_string());
                }
            },
            None => None,
        };

        let request = TransportRequest {
            method,
            url,
            headers,
            body,
        };

        let started = Instant::now();
        let result = self.inner.transport.send(request).await;
        let elapsed = started.elapsed();

        match result {
            Ok(response) => self.classify(line, response, elapsed),
            Err(err) => self.transport_failure(line, err),
        }
    }

    /// Turns a failed exchange into an envelope.
    fn transport_failure<Res>(&self, line: LogLine, err: Error) -> ApiResponse<Res> {
        let code = err.status().map(|s| s.as_u16()).unwrap_or(0);

        self.write_log(
            Level::ERROR,
            LogLine {
                status: code,
                ..line
            }
            .with_error(&err),
        );

        ApiResponse::failure(code, err.to_string(), None)
    }

    /// Turns a completed exchange into an envelope based on its status.
    fn classify<Res>(
        &self,
        line: LogLine,
        response: TransportResponse,
        elapsed: Duration,
    ) -> ApiResponse<Res>
    where
        Res: DeserializeOwned,
    {
        let status = response.status;
        let line = LogLine {
            status: status.as_u16(),
            ..line
        };

        if !status.is_success() {
            let body = response.body;

            if !self.inner.capture_error_body {
                let err = Error::Status { status, body };
                self.write_log(Level::ERROR, line.with_duration(elapsed));
                return ApiResponse::failure(status.as_u16(), err.to_string(), None);
            }

            let data = self.read_body::<Res>(&line, status, &body);
            let err = Error::Status {
                status,
                body: body.clone(),
            };

            self.write_log(Level::ERROR, line.with_error(&err).with_http_stream(body));
            return ApiResponse::failure(status.as_u16(), err.to_string(), data);
        }

        let data = self.read_body::<Res>(&line, status, &response.body);

        tracing::debug!(
            status = status.as_u16(),
            latency_ms = elapsed.as_millis(),
            "Received HTTP response"
        );

        self.write_log(Level::INFO, line);
        ApiResponse::success(status.as_u16(), data)
    }

    /// Deserializes a response body, logging and swallowing failures.
    ///
    /// An empty body yields `None` without being treated as a failure.
    fn read_body<Res>(&self, line: &LogLine, status: StatusCode, body: &str) -> Option<Res>
    where
        Res: DeserializeOwned,
    {
        if body.trim().is_empty() {
            return None;
        }

        match serde_json::from_str::<Res>(body) {
            Ok(data) => Some(data),
            Err(e) => {
                let err = Error::Deserialization {
                    status,
                    serde_error: e.to_string(),
                };
                self.write_log(
                    Level::ERROR,
                    line.clone()
                        .with_description(JSON_CONVERSION)
                        .with_error(&err)
                        .with_http_stream(body),
                );
                None
            }
        }
    }

    fn write_log(&self, level: Level, line: LogLine) {
        self.inner.logger.log(level, &line);
    }
}

/// Builder for configuring and creating an [`ApiService`].
///
/// # Examples
///
/// ```no_run
/// use apiservice::{ApiService, ReqwestTransport};
///
/// # fn example() -> Result<(), apiservice::Error> {
/// let service = ApiService::builder()
///     .base_endpoint("/people")
///     .transport(ReqwestTransport::from_host("https://api.example.com")?)
///     .default_header("User-Agent", "my-app/1.0")?
///     .capture_error_body(false)
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ApiServiceBuilder<T> {
    base_endpoint: Option<String>,
    api_key: Option<String>,
    transport: Option<T>,
    logger: Option<Arc<dyn CallLogger>>,
    default_headers: HeaderMap,
    capture_error_body: bool,
}

impl<T: ApiTransport> ApiServiceBuilder<T> {
    /// Creates a new `ApiServiceBuilder` with default settings.
    pub fn new() -> Self {
        Self {
            base_endpoint: None,
            api_key: None,
            transport: None,
            logger: None,
            default_headers: HeaderMap::new(),
            capture_error_body: true,
        }
    }

    /// Sets the base endpoint all calls are relative to.
    pub fn base_endpoint(mut self, base_endpoint: impl Into<String>) -> Self {
        self.base_endpoint = Some(base_endpoint.into());
        self
    }

    /// Sets the credential sent as the `Authorization` header.
    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Sets the transport calls are dispatched through.
    pub fn transport(mut self, transport: T) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Sets the logger. Without one, calls are not logged.
    pub fn logger(mut self, logger: Arc<dyn CallLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Whether to read the body of non-2xx responses into the envelope.
    ///
    /// Enabled by default. When disabled, failed statuses produce an
    /// envelope without data and a log line carrying the call duration.
    pub fn capture_error_body(mut self, enabled: bool) -> Self {
        self.capture_error_body = enabled;
        self
    }

    /// Builds the configured `ApiService`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base endpoint is missing or empty, if an api
    /// key was given but is empty or not a valid header value, or if no
    /// transport was provided.
    pub fn build(self) -> Result<ApiService<T>> {
        let base_endpoint = self
            .base_endpoint
            .filter(|b| !b.is_empty())
            .ok_or_else(|| Error::Configuration("Base endpoint is required".to_string()))?;

        let mut default_headers = self.default_headers;
        if let Some(api_key) = self.api_key {
            if api_key.is_empty() {
                return Err(Error::Configuration("Api key must not be empty".to_string()));
            }
            let mut value = HeaderValue::try_from(api_key)
                .map_err(|e| Error::Configuration(format!("Invalid api key: {}", e)))?;
            value.set_sensitive(true);
            default_headers.insert(header::AUTHORIZATION, value);
        }

        let transport = self
            .transport
            .ok_or_else(|| Error::Configuration("Transport is required".to_string()))?;

        let logger = self.logger.unwrap_or_else(|| Arc::new(NoopLogger));

        Ok(ApiService {
            inner: Arc::new(ServiceInner {
                transport,
                base_endpoint,
                default_headers,
                logger,
                capture_error_body: self.capture_error_body,
            }),
        })
    }
}

impl<T: ApiTransport> Default for ApiServiceBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}
