use std::borrow::Cow;
use std::time::{SystemTime, UNIX_EPOCH};

use tracing::debug;
use url::{Position, Url};

use crate::base_string::BaseStringParams;
use crate::credentials::{Credentials, Key};
use crate::error::{Error, Result};
use crate::header::AuthorizationHeader;
use crate::mac::Nonce;

/// The request metadata covered by a Hawk signature, plus the optional
/// header fields the client wants to send.
///
/// A `Request` describes the same HTTP request on both sides of the
/// exchange: clients build one to generate an `Authorization` header,
/// servers build one from the request they received to validate that header.
#[derive(Debug, Clone)]
pub struct Request<'a> {
    method: &'a str,
    host: &'a str,
    port: u16,
    path: &'a str,
    hash: Option<&'a str>,
    ext: Option<&'a str>,
    app: Option<&'a str>,
    dlg: Option<&'a str>,
}

impl<'a> Request<'a> {
    /// Generate an `Authorization` header for this request.
    ///
    /// The timestamp is the current system clock plus `offset` seconds (the
    /// caller's estimate of the server clock skew, typically learned from a
    /// `WWW-Authenticate` challenge), and the nonce is freshly drawn from
    /// the system random source.
    pub fn make_header(
        &self,
        credentials: &'a Credentials,
        offset: i64,
    ) -> Result<AuthorizationHeader<'a>> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_err(|_| Error::TimeValue("system clock before unix epoch".to_string()))?;
        let now = i64::try_from(now.as_secs()).map_err(|_| Error::Overflow)?;
        let ts = now.checked_add(offset).ok_or(Error::Overflow)?;
        let nonce = Nonce::new()?;
        self.make_header_full(credentials, ts, nonce.as_str())
    }

    /// Generate an `Authorization` header with an explicit timestamp and
    /// nonce. This is the deterministic core of [`make_header`](Self::make_header).
    pub fn make_header_full(
        &self,
        credentials: &'a Credentials,
        ts: i64,
        nonce: &str,
    ) -> Result<AuthorizationHeader<'a>> {
        let base = self.base_string_params(ts, nonce, self.hash, self.ext, self.app, self.dlg);
        let mac = credentials.key.sign(base.build()?.as_bytes())?;
        debug!(id = credentials.id.as_str(), ts, "signed request");
        Ok(AuthorizationHeader {
            id: Cow::Borrowed(credentials.id.as_str()),
            ts,
            nonce: Cow::Owned(nonce.to_string()),
            mac: Cow::Owned(mac.as_str().to_string()),
            hash: self.hash.map(Cow::Borrowed),
            ext: self.ext.map(Cow::Borrowed),
            app: self.app.map(Cow::Borrowed),
            dlg: self.dlg.map(Cow::Borrowed),
        })
    }

    /// Validate the MAC of a received `Authorization` (or
    /// `Server-Authorization`) header against this request.
    ///
    /// The MAC is recomputed from the request metadata and the header's own
    /// fields, then compared in fixed time. `Ok(false)` means the MAC does
    /// not match; errors are reserved for internal failures such as an
    /// oversized base string.
    ///
    /// This checks the signature only. Replay protection (nonce reuse,
    /// timestamp freshness) and payload-hash verification remain the
    /// caller's responsibility.
    pub fn validate_header(&self, header: &AuthorizationHeader<'_>, key: &Key) -> Result<bool> {
        let base = self.base_string_params(
            header.ts,
            &header.nonce,
            header.hash.as_deref(),
            header.ext.as_deref(),
            header.app.as_deref(),
            header.dlg.as_deref(),
        );
        let mac = key.sign(base.build()?.as_bytes())?;
        let valid = mac == header.mac.as_ref();
        if !valid {
            debug!(id = header.id.as_ref(), ts = header.ts, "request MAC mismatch");
        }
        Ok(valid)
    }

    fn base_string_params<'p>(
        &'p self,
        ts: i64,
        nonce: &'p str,
        hash: Option<&'p str>,
        ext: Option<&'p str>,
        app: Option<&'p str>,
        dlg: Option<&'p str>,
    ) -> BaseStringParams<'p> {
        BaseStringParams {
            ts,
            nonce,
            method: self.method,
            path: self.path,
            host: self.host,
            port: self.port,
            hash,
            ext,
            app,
            dlg,
        }
    }
}

/// Builder for [`Request`].
#[derive(Debug, Clone)]
pub struct RequestBuilder<'a>(Request<'a>);

impl<'a> RequestBuilder<'a> {
    pub fn new(method: &'a str, host: &'a str, port: u16, path: &'a str) -> RequestBuilder<'a> {
        RequestBuilder(Request {
            method,
            host,
            port,
            path,
            hash: None,
            ext: None,
            app: None,
            dlg: None,
        })
    }

    /// Derive host, port and path (including the query string) from a parsed
    /// URL. Fails when the URL carries no host or no usable port.
    pub fn from_url(method: &'a str, url: &'a Url) -> Result<RequestBuilder<'a>> {
        let host = url
            .host_str()
            .ok_or_else(|| Error::Generic(format!("url has no host: {url}")))?;
        let port = url
            .port_or_known_default()
            .ok_or_else(|| Error::Generic(format!("url has no port: {url}")))?;
        let path = &url[Position::BeforePath..Position::AfterQuery];
        Ok(RequestBuilder::new(method, host, port, path))
    }

    /// Set the payload hash to include in the signature. The hash must have
    /// been computed by the caller; this crate does not hash payloads.
    pub fn hash<H: Into<Option<&'a str>>>(mut self, hash: H) -> RequestBuilder<'a> {
        self.0.hash = hash.into();
        self
    }

    /// Set the `ext` application data. Emitted verbatim between double
    /// quotes: the value must not contain unescaped `"` or `\`.
    pub fn ext<S: Into<Option<&'a str>>>(mut self, ext: S) -> RequestBuilder<'a> {
        self.0.ext = ext.into();
        self
    }

    /// Set the `app` identifier for delegated applications.
    pub fn app<S: Into<Option<&'a str>>>(mut self, app: S) -> RequestBuilder<'a> {
        self.0.app = app.into();
        self
    }

    /// Set the `dlg` delegated-by identifier.
    pub fn dlg<S: Into<Option<&'a str>>>(mut self, dlg: S) -> RequestBuilder<'a> {
        self.0.dlg = dlg.into();
        self
    }

    /// Get the request from this builder.
    pub fn request(self) -> Request<'a> {
        self.0
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::algorithm::SHA256;

    // The worked example from the Hawk protocol documentation.
    fn example_credentials() -> Credentials {
        Credentials::new(
            "dh37fgj492je",
            "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn",
            &SHA256,
        )
    }

    fn example_request<'a>() -> Request<'a> {
        RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
            .ext("some-app-ext-data")
            .request()
    }

    #[test]
    fn hawk_example_mac() {
        let credentials = example_credentials();
        let header = example_request()
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        assert_eq!(
            header.mac.as_ref(),
            "6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE="
        );
        assert_eq!(
            header.to_string(),
            "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", \
             ext=\"some-app-ext-data\", mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\""
        );
    }

    #[test]
    fn validate_matches_generated() {
        let credentials = example_credentials();
        let request = example_request();
        let header = request
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        assert!(request.validate_header(&header, &credentials.key).unwrap());
    }

    #[test]
    fn validate_rejects_wrong_key() {
        let credentials = example_credentials();
        let request = example_request();
        let header = request
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        let wrong = Key::new("WRONG", &SHA256);
        assert!(!request.validate_header(&header, &wrong).unwrap());
    }

    #[test]
    fn validate_rejects_changed_request() {
        let credentials = example_credentials();
        let header = example_request()
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        let other = RequestBuilder::new("GET", "example.com", 8000, "/resource/2")
            .ext("some-app-ext-data")
            .request();
        assert!(!other.validate_header(&header, &credentials.key).unwrap());
    }

    #[test]
    fn validate_uses_header_fields_not_local_ones() {
        // The server request carries no ext; the ext signed by the client
        // arrives in the header and must be honored.
        let credentials = example_credentials();
        let header = example_request()
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        let server_view = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
            .request();
        assert!(server_view
            .validate_header(&header, &credentials.key)
            .unwrap());
    }

    #[test]
    fn app_and_dlg_change_the_mac() {
        let credentials = example_credentials();
        let plain = example_request()
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        let delegated = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
            .ext("some-app-ext-data")
            .app("my-app")
            .dlg("my-dlg")
            .request()
            .make_header_full(&credentials, 1353832234, "j4h3g2")
            .unwrap();
        assert_ne!(plain.mac, delegated.mac);
    }

    #[test]
    fn oversized_path_is_rejected() {
        let credentials = example_credentials();
        let path = format!("/{}", "a".repeat(3000));
        let request = RequestBuilder::new("GET", "example.com", 8000, &path).request();
        assert!(matches!(
            request.make_header_full(&credentials, 1353832234, "j4h3g2"),
            Err(Error::BufferTooLarge { .. })
        ));
    }

    #[test]
    fn from_url_extracts_request_parts() {
        let url = Url::parse("http://EXAMPLE.com:8000/resource/1?b=1&a=2").unwrap();
        let request = RequestBuilder::from_url("GET", &url).unwrap().request();
        assert_eq!(request.host, "example.com");
        assert_eq!(request.port, 8000);
        assert_eq!(request.path, "/resource/1?b=1&a=2");
    }

    #[test]
    fn from_url_defaults_the_port() {
        let url = Url::parse("https://example.com/x").unwrap();
        let request = RequestBuilder::from_url("GET", &url).unwrap().request();
        assert_eq!(request.port, 443);
    }

    #[test]
    fn from_url_requires_a_host() {
        let url = Url::parse("mailto:someone@example.com").unwrap();
        assert!(RequestBuilder::from_url("GET", &url).is_err());
    }

    #[test]
    fn make_header_applies_clock_offset() {
        let credentials = example_credentials();
        let request = example_request();
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_secs() as i64;
        let header = request.make_header(&credentials, 600).unwrap();
        assert!((header.ts - now - 600).abs() <= 2);
        assert_eq!(header.nonce.len(), 12);
        assert!(request.validate_header(&header, &credentials.key).unwrap());
    }
}
