//! Product lookup — resolve a barcode to a product title.
//!
//! The upstream barcode database is known to prefix its JSON with a
//! non-JSON preamble, so the body is not parsed from its first byte: the
//! payload starts at the first `{`.

use fridge_domain::credential::ApiKey;

use crate::ports::{HttpClient, NetworkError};

/// Base URL of the upcdatabase.org API.
pub const DEFAULT_BASE_URL: &str = "https://api.upcdatabase.org";

/// Why a lookup did not produce a title.
///
/// Callers in the entry flow treat every variant the same way: the draft
/// simply stays untitled.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// No API key is configured; no request was made.
    #[error("no API key configured")]
    MissingCredential,

    /// The barcode is empty; no request was made.
    #[error("no barcode to look up")]
    MissingBarcode,

    /// The response body contains no `{`.
    #[error("response contains no JSON payload")]
    NoPayload,

    /// The payload is not a JSON object with a string `title`.
    #[error("could not read a title from the response")]
    Parse(#[from] TitleParseError),

    /// The request failed or returned a non-2xx status.
    #[error("lookup request failed")]
    Network(#[from] NetworkError),
}

/// Details about why a payload did not yield a title.
#[derive(Debug, thiserror::Error)]
pub enum TitleParseError {
    /// The text from the first `{` onward is not valid JSON.
    #[error("payload is not valid JSON")]
    Json(#[from] serde_json::Error),

    /// The JSON has no string field named `title`.
    #[error("payload has no title field")]
    MissingTitle,
}

/// Extract the product title from a raw response body.
///
/// # Errors
///
/// - [`LookupError::NoPayload`] when `body` has no `{`.
/// - [`LookupError::Parse`] when the payload is not JSON or lacks a string
///   `title`.
pub fn extract_title(body: &str) -> Result<String, LookupError> {
    let start = body.find('{').ok_or(LookupError::NoPayload)?;
    let payload: serde_json::Value =
        serde_json::from_str(&body[start..]).map_err(TitleParseError::from)?;

    payload
        .get("title")
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .ok_or_else(|| TitleParseError::MissingTitle.into())
}

/// Client for the barcode database.
pub struct ProductLookup<H> {
    http: H,
    base_url: String,
}

impl<H: HttpClient> ProductLookup<H> {
    /// Create a client pointed at [`DEFAULT_BASE_URL`].
    pub fn new(http: H) -> Self {
        Self::with_base_url(http, DEFAULT_BASE_URL)
    }

    /// Create a client pointed at another deployment of the same API.
    pub fn with_base_url(http: H, base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self { http, base_url }
    }

    /// Request URL for `barcode`, with the key as the `apikey` query value.
    #[must_use]
    pub fn url_for(&self, barcode: &str, api_key: &ApiKey) -> String {
        format!(
            "{}/product/{}?apikey={}",
            self.base_url,
            urlencoding::encode(barcode),
            urlencoding::encode(api_key.expose()),
        )
    }

    /// Look up the product title for `barcode`.
    ///
    /// # Errors
    ///
    /// Fails fast with [`LookupError::MissingCredential`] or
    /// [`LookupError::MissingBarcode`] without touching the network;
    /// otherwise see [`extract_title`] and [`LookupError::Network`].
    pub async fn lookup(
        &self,
        barcode: &str,
        api_key: Option<&ApiKey>,
    ) -> Result<String, LookupError> {
        let api_key = api_key.ok_or(LookupError::MissingCredential)?;
        let barcode = barcode.trim();
        if barcode.is_empty() {
            return Err(LookupError::MissingBarcode);
        }

        tracing::debug!(%barcode, "looking up product");
        let response = self.http.get(&self.url_for(barcode, api_key)).await?;
        if !response.is_success() {
            return Err(NetworkError::Status(response.status).into());
        }

        let body = String::from_utf8_lossy(&response.body);
        tracing::trace!(%barcode, body = %body, "lookup response");
        let title = extract_title(&body)?;
        tracing::debug!(%barcode, %title, "product found");
        Ok(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::HttpResponse;
    use std::future::Future;
    use std::sync::Mutex;

    struct FakeHttp {
        reply: Mutex<Option<Result<HttpResponse, NetworkError>>>,
        requested: Mutex<Vec<String>>,
    }

    impl FakeHttp {
        fn replying(status: u16, body: &str) -> Self {
            Self {
                reply: Mutex::new(Some(Ok(HttpResponse {
                    status,
                    body: body.as_bytes().to_vec(),
                }))),
                requested: Mutex::default(),
            }
        }

        fn failing(err: NetworkError) -> Self {
            Self {
                reply: Mutex::new(Some(Err(err))),
                requested: Mutex::default(),
            }
        }

        fn requests(&self) -> Vec<String> {
            self.requested.lock().unwrap().clone()
        }
    }

    impl HttpClient for FakeHttp {
        fn get(
            &self,
            url: &str,
        ) -> impl Future<Output = Result<HttpResponse, NetworkError>> + Send {
            self.requested.lock().unwrap().push(url.to_string());
            let reply = self
                .reply
                .lock()
                .unwrap()
                .take()
                .unwrap_or(Err(NetworkError::Timeout));
            async { reply }
        }
    }

    fn key() -> ApiKey {
        ApiKey::new("k3y").unwrap()
    }

    #[test]
    fn should_extract_title_after_preamble() {
        let title = extract_title(r#"garbage-prefix{"title":"Whole Milk","id":5}"#).unwrap();
        assert_eq!(title, "Whole Milk");
    }

    #[test]
    fn should_fail_with_no_payload_when_body_has_no_brace() {
        let result = extract_title("<html>Service Unavailable</html>");
        assert!(matches!(result, Err(LookupError::NoPayload)));
    }

    #[test]
    fn should_fail_with_parse_error_when_title_missing() {
        let result = extract_title(r#"{"id":5}"#);
        assert!(matches!(
            result,
            Err(LookupError::Parse(TitleParseError::MissingTitle))
        ));
    }

    #[test]
    fn should_fail_with_parse_error_when_title_is_not_a_string() {
        let result = extract_title(r#"{"title":42}"#);
        assert!(matches!(
            result,
            Err(LookupError::Parse(TitleParseError::MissingTitle))
        ));
    }

    #[test]
    fn should_fail_with_parse_error_when_payload_is_truncated() {
        let result = extract_title(r#"ok {"title":"Whole"#);
        assert!(matches!(
            result,
            Err(LookupError::Parse(TitleParseError::Json(_)))
        ));
    }

    #[test]
    fn should_build_url_with_barcode_and_key() {
        let lookup = ProductLookup::with_base_url(FakeHttp::replying(200, ""), "https://example.test/");
        assert_eq!(
            lookup.url_for("012345", &key()),
            "https://example.test/product/012345?apikey=k3y"
        );
    }

    #[test]
    fn should_percent_encode_url_parts() {
        let lookup = ProductLookup::new(FakeHttp::replying(200, ""));
        let key = ApiKey::new("a&b=c").unwrap();
        assert_eq!(
            lookup.url_for("12 34", &key),
            "https://api.upcdatabase.org/product/12%2034?apikey=a%26b%3Dc"
        );
    }

    #[tokio::test]
    async fn should_return_title_from_successful_response() {
        let http = FakeHttp::replying(200, r#"garbage-prefix{"title":"Whole Milk","id":5}"#);
        let lookup = ProductLookup::new(http);

        let title = lookup.lookup("0123", Some(&key())).await.unwrap();

        assert_eq!(title, "Whole Milk");
        assert_eq!(
            lookup.http.requests(),
            ["https://api.upcdatabase.org/product/0123?apikey=k3y"]
        );
    }

    #[tokio::test]
    async fn should_fail_fast_without_credential() {
        let lookup = ProductLookup::new(FakeHttp::replying(200, r#"{"title":"x"}"#));

        let result = lookup.lookup("0123", None).await;

        assert!(matches!(result, Err(LookupError::MissingCredential)));
        assert!(lookup.http.requests().is_empty());
    }

    #[tokio::test]
    async fn should_fail_fast_without_barcode() {
        let lookup = ProductLookup::new(FakeHttp::replying(200, r#"{"title":"x"}"#));

        let result = lookup.lookup("  ", Some(&key())).await;

        assert!(matches!(result, Err(LookupError::MissingBarcode)));
        assert!(lookup.http.requests().is_empty());
    }

    #[tokio::test]
    async fn should_report_non_2xx_as_network_error() {
        let lookup = ProductLookup::new(FakeHttp::replying(404, r#"{"title":"x"}"#));

        let result = lookup.lookup("0123", Some(&key())).await;

        assert!(matches!(
            result,
            Err(LookupError::Network(NetworkError::Status(404)))
        ));
    }

    #[tokio::test]
    async fn should_report_transport_failure_as_network_error() {
        let lookup = ProductLookup::new(FakeHttp::failing(NetworkError::Timeout));

        let result = lookup.lookup("0123", Some(&key())).await;

        assert!(matches!(
            result,
            Err(LookupError::Network(NetworkError::Timeout))
        ));
    }
}
