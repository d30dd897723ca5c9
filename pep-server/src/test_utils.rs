use crate::config::PEPConfig;
use crate::create_app;
use crate::state::AppState;
use axum::body::{Body, Bytes};
use axum::Router;
use http::{HeaderMap, Method, Request, StatusCode};
use http_body_util::BodyExt;
use log::LevelFilter;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tower::ServiceExt;
use wiremock::matchers;
use wiremock::Mock;
use wiremock::MockServer;
use wiremock::ResponseTemplate;

/// Test fixture for setting up a complete test environment with a mocked decision authority.
///
/// The fixture starts a wiremock server standing in for the authority, configures the
/// application to query it, and provides helpers for sending requests through the
/// full router.
///
/// # Examples
///
/// ```rust
/// #[tokio::test]
/// async fn test_endpoint() {
///     let fixture = TestFixture::new().await;
///     fixture
///         .add_authority_mock(json!({"decision": "Allow"}), StatusCode::OK, 1)
///         .await;
///
///     let response = fixture.get("/article", Some("alice")).await;
///     response.assert_ok();
///     fixture.authority_mock.verify().await;
/// }
/// ```
pub struct TestFixture {
    /// The application router
    pub app: Router,
    /// The application state the router was built with
    pub state: AppState,
    /// Configuration settings
    pub config: PEPConfig,
    /// Mock server for the decision authority
    pub authority_mock: MockServer,
}

impl TestFixture {
    /// Creates a new test fixture with the default test configuration
    pub async fn new() -> Self {
        Self::with_config(|_| {}).await
    }

    /// Creates a new test fixture, letting the caller adjust the configuration
    /// before the application is built.
    ///
    /// ```rust
    /// let fixture = TestFixture::with_config(|config| {
    ///     config.enforcement.fail_open = true;
    /// })
    /// .await;
    /// ```
    pub async fn with_config<F: FnOnce(&mut PEPConfig)>(configure: F) -> Self {
        Self::setup_logger(LevelFilter::Debug);

        let authority_mock = MockServer::start().await;
        let mut config = PEPConfig::for_test_with_mock(&authority_mock);
        configure(&mut config);

        let state = AppState::for_testing(&config);
        let app = create_app(state.clone()).await;

        Self {
            app,
            state,
            config,
            authority_mock,
        }
    }

    /// Initializes the test logger with the given level
    pub fn setup_logger(level: LevelFilter) {
        let _ = env_logger::builder()
            .filter_level(level)
            .is_test(true)
            .try_init();
    }

    /// Creates a request builder, setting the identity header when an identity is given
    pub fn request_builder(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        identity: Option<&str>,
    ) -> http::request::Builder {
        let mut builder = Request::builder().method(method).uri(uri.as_ref());
        if let Some(identity) = identity {
            builder = builder.header(self.config.enforcement.identity_header.as_str(), identity);
        }
        builder
    }

    /// Sends a request without a body
    pub async fn request(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        identity: Option<&str>,
    ) -> TestResponse {
        let request = self
            .request_builder(method, uri, identity)
            .body(Body::empty())
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a GET request to the specified URI
    pub async fn get(&self, uri: impl AsRef<str>, identity: Option<&str>) -> TestResponse {
        self.request(Method::GET, uri, identity).await
    }

    /// Sends a request with a JSON body
    pub async fn send_json<T: Serialize>(
        &self,
        method: Method,
        uri: impl AsRef<str>,
        identity: Option<&str>,
        body: &T,
    ) -> TestResponse {
        let json_body = serde_json::to_vec(body).expect("Failed to serialize body to JSON");
        let request = self
            .request_builder(method, uri, identity)
            .header("Content-Type", "application/json")
            .body(Body::from(json_body))
            .expect("Failed to build request");

        self.send(request).await
    }

    /// Sends a request and returns a TestResponse
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        send_to(&self.app, request).await
    }

    /// Mounts an authority mock answering `is_authorized` calls with the given body
    pub async fn add_authority_mock(
        &self,
        response_body: impl Serialize,
        status_code: StatusCode,
        expected_calls: u64,
    ) {
        Mock::given(matchers::method("POST"))
            .and(matchers::path("/v1/is_authorized"))
            .respond_with(ResponseTemplate::new(status_code.as_u16()).set_body_json(response_body))
            .expect(expected_calls)
            .mount(&self.authority_mock)
            .await;
    }

    /// Returns the JSON bodies of all queries the authority received so far
    pub async fn received_queries(&self) -> Vec<Value> {
        self.authority_mock
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|request| {
                serde_json::from_slice(&request.body).expect("Query body is not valid JSON")
            })
            .collect()
    }
}

/// Sends a request to the given router and collects the response
pub async fn send_to(app: &Router, request: Request<Body>) -> TestResponse {
    let response = app
        .clone()
        .oneshot(request)
        .await
        .expect("Failed to send request");

    let status = response.status();
    let headers = response.headers().clone();
    let body = response
        .into_body()
        .collect()
        .await
        .expect("Failed to read response body")
        .to_bytes();

    TestResponse {
        status,
        headers,
        body,
    }
}

/// Returns a local address nothing is listening on
pub fn unused_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind");
    listener
        .local_addr()
        .expect("Failed to read local address")
        .port()
}

/// Response from a test request that provides convenient access to status and body.
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Raw response body
    pub body: Bytes,
}

impl TestResponse {
    /// Asserts that the response has the expected status code
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "Expected status {} but got {} with body: {}",
            expected,
            self.status,
            self.text()
        );
        self
    }

    /// Asserts that the response status is OK (200)
    pub fn assert_ok(&self) -> &Self {
        self.assert_status(StatusCode::OK)
    }

    /// Asserts that the response is the plain-text access denied rejection
    pub fn assert_access_denied(&self) -> &Self {
        self.assert_status(StatusCode::FORBIDDEN);
        assert_eq!(self.text(), "Access Denied");
        let content_type = self
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        assert!(content_type.starts_with("text/plain"));
        self
    }

    /// The response body as UTF-8 text
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// The response body as JSON
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).expect("Response body is not valid JSON")
    }

    /// Converts the response body to the specified type
    pub fn json_as<T: DeserializeOwned>(&self) -> T {
        serde_json::from_slice(&self.body).expect("Failed to deserialize response JSON")
    }
}
