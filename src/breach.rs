//! Breach corpus lookup
//!
//! Queries a k-anonymity range API: only the first five hex characters of the
//! password's SHA-1 hash leave the process, the suffix is matched locally.

use sha1::{Digest, Sha1};

use crate::error::LookupError;

/// Default Have I Been Pwned password range API.
pub const BREACH_API_URL: &str = "https://api.pwnedpasswords.com";

const PREFIX_LEN: usize = 5;

/// Source of hash-suffix lists for a given hash prefix.
pub trait BreachLookup: Send + Sync {
    /// Returns the raw range body for `prefix`: lines of `<suffix>:<count>`.
    fn range(&self, prefix: &str) -> Result<String, LookupError>;
}

/// Uppercase SHA-1 of a password split for a range query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HashParts {
    hash: String,
}

impl HashParts {
    pub fn of(password: &str) -> Self {
        let mut hasher = Sha1::new();
        hasher.update(password.as_bytes());
        Self {
            hash: format!("{:X}", hasher.finalize()),
        }
    }

    /// First five hex characters, the only part sent over the wire.
    pub fn prefix(&self) -> &str {
        &self.hash[..PREFIX_LEN]
    }

    /// Remaining 35 hex characters.
    pub fn suffix(&self) -> &str {
        &self.hash[PREFIX_LEN..]
    }
}

/// Checks whether a range body lists `suffix`.
///
/// Lines are trimmed, so `\r\n` and stray `\r` separators are tolerated.
pub fn range_contains(body: &str, suffix: &str) -> bool {
    body.lines()
        .map(str::trim)
        .filter_map(|line| line.split(':').next())
        .any(|found| found == suffix)
}

/// Returns the breach API base URL.
///
/// Priority:
/// 1. Environment variable `PWD_BREACH_API_URL`
/// 2. [`BREACH_API_URL`]
pub fn get_breach_api_url() -> String {
    std::env::var("PWD_BREACH_API_URL").unwrap_or_else(|_| BREACH_API_URL.to_string())
}

#[cfg(feature = "hibp")]
pub use client::HibpClient;

#[cfg(feature = "hibp")]
mod client {
    use std::time::Duration;

    use reqwest::blocking::Client;

    use super::{get_breach_api_url, BreachLookup, BREACH_API_URL};
    use crate::error::LookupError;

    /// Blocking HTTP client for the range API.
    ///
    /// Must not be created, used or dropped from within an async task; use
    /// `tokio::task::spawn_blocking` there.
    #[derive(Debug, Clone)]
    pub struct HibpClient {
        client: Client,
        base_url: String,
        timeout: Option<Duration>,
    }

    impl HibpClient {
        pub fn new() -> Result<Self, LookupError> {
            Ok(Self {
                client: build_client(None)?,
                base_url: BREACH_API_URL.to_string(),
                timeout: None,
            })
        }

        /// Client pointed at `PWD_BREACH_API_URL` when set.
        pub fn from_env() -> Result<Self, LookupError> {
            Self::new()?.with_base_url(get_breach_api_url())
        }

        pub fn with_base_url(mut self, base_url: impl Into<String>) -> Result<Self, LookupError> {
            let base_url = base_url.into();
            if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                return Err(LookupError::InvalidBaseUrl(base_url));
            }
            self.base_url = base_url.trim_end_matches('/').to_string();
            Ok(self)
        }

        /// Replaces the underlying HTTP client, e.g. to set proxies or TLS roots.
        pub fn with_http_client(mut self, client: Client) -> Self {
            self.client = client;
            self.timeout = None;
            self
        }

        pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, LookupError> {
            self.client = build_client(Some(timeout))?;
            self.timeout = Some(timeout);
            Ok(self)
        }

        pub fn base_url(&self) -> &str {
            &self.base_url
        }

        pub fn timeout(&self) -> Option<Duration> {
            self.timeout
        }

        pub fn range_url(&self, prefix: &str) -> String {
            format!("{}/range/{}", self.base_url, prefix)
        }
    }

    fn build_client(timeout: Option<Duration>) -> Result<Client, LookupError> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder
            .build()
            .map_err(|e| LookupError::Transport(e.to_string()))
    }

    impl BreachLookup for HibpClient {
        fn range(&self, prefix: &str) -> Result<String, LookupError> {
            let url = self.range_url(prefix);

            #[cfg(feature = "tracing")]
            tracing::debug!("Querying breach range {}", url);

            let response = self.client.get(&url).send().map_err(|e| {
                #[cfg(feature = "tracing")]
                tracing::error!("Breach lookup request failed: {}", e);
                LookupError::Transport(e.to_string())
            })?;

            let status = response.status();
            if !status.is_success() {
                #[cfg(feature = "tracing")]
                tracing::error!("Breach lookup returned status {}", status);
                return Err(LookupError::Status(status.as_u16()));
            }

            response
                .text()
                .map_err(|e| LookupError::Body(e.to_string()))
        }
    }
}



#[cfg(all(test, feature = "hibp"))]
mod client_tests {
    use super::*;
    use serial_test::serial;
    use std::net::TcpListener;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn set_env(key: &str, value: &str) {
        unsafe { std::env::set_var(key, value); }
    }

    fn remove_env(key: &str) {
        unsafe { std::env::remove_var(key); }
    }

    fn local_client(base_url: String) -> HibpClient {
        let http = reqwest::blocking::Client::builder()
            .no_proxy()
            .build()
            .expect("Failed to build client");
        HibpClient::new()
            .unwrap()
            .with_http_client(http)
            .with_base_url(base_url)
            .unwrap()
    }

    /// Runs the blocking client off the async runtime.
    async fn range_from(base_url: String, prefix: &'static str) -> Result<String, LookupError> {
        tokio::task::spawn_blocking(move || local_client(base_url).range(prefix))
            .await
            .expect("blocking task panicked")
    }

    #[test]
    fn test_range_url() {
        let client = HibpClient::new().unwrap();
        assert_eq!(client.base_url(), BREACH_API_URL);
        assert_eq!(
            client.range_url("B1B37"),
            "https://api.pwnedpasswords.com/range/B1B37"
        );

        let client = client.with_base_url("http://localhost:8080/").unwrap();
        assert_eq!(client.range_url("B1B37"), "http://localhost:8080/range/B1B37");
    }

    #[test]
    fn test_invalid_base_url() {
        let result = HibpClient::new().unwrap().with_base_url("ftp://example.com");
        assert!(matches!(result, Err(LookupError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_with_timeout() {
        let timeout = std::time::Duration::from_secs(3);
        let client = HibpClient::new().unwrap().with_timeout(timeout).unwrap();
        assert_eq!(client.timeout(), Some(timeout));
    }

    #[test]
    #[serial]
    fn test_from_env() {
        set_env("PWD_BREACH_API_URL", "http://127.0.0.1:9/");
        let client = HibpClient::from_env().unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:9");
        remove_env("PWD_BREACH_API_URL");

        assert_eq!(get_breach_api_url(), BREACH_API_URL);
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_range_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/range/B1B37"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string("73A05C0ED0176787A4F1574FF0075F7521E:10556095\r\n"),
            )
            .expect(1)
            .mount(&server)
            .await;

        let body = range_from(server.uri(), "B1B37").await.unwrap();
        assert!(range_contains(&body, HashParts::of("qwerty").suffix()));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn test_range_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/range/B1B37"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        assert_eq!(
            range_from(server.uri(), "B1B37").await,
            Err(LookupError::Status(503))
        );
    }

    #[test]
    fn test_range_transport_failure() {
        // Bind then drop to get a port with nothing listening
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let client = local_client(format!("http://{}", addr));

        assert!(matches!(client.range("B1B37"), Err(LookupError::Transport(_))));
    }
}
