//! Hawk HTTP authentication: parsing, signing and validating the scheme's
//! headers with a shared secret.
//!
//! Clients use this crate to generate `Authorization` request headers and to
//! check `Server-Authorization` and `WWW-Authenticate` values coming back;
//! servers use it to validate incoming `Authorization` headers and to issue
//! signed timestamp challenges. Transport, credential lookup, nonce replay
//! caches and payload hashing stay with the caller.
//!
//! # Examples
//!
//! ## Signing a request (client)
//!
//! ```
//! use hawkc::{Credentials, RequestBuilder, SHA256};
//!
//! # fn main() -> hawkc::Result<()> {
//! let credentials = Credentials::new(
//!     "dh37fgj492je",
//!     "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn",
//!     &SHA256,
//! );
//! let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
//!     .ext("some-app-ext-data")
//!     .request();
//!
//! // make_header draws a fresh nonce and stamps the current time; the
//! // explicit variant is shown here so the output is reproducible.
//! let header = request.make_header_full(&credentials, 1353832234, "j4h3g2")?;
//! assert_eq!(
//!     header.to_string(),
//!     "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", \
//!      ext=\"some-app-ext-data\", mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\""
//! );
//! # Ok(())
//! # }
//! ```
//!
//! ## Validating a request (server)
//!
//! ```
//! use hawkc::{AuthorizationHeader, Credentials, RequestBuilder, SHA256};
//!
//! # fn main() -> hawkc::Result<()> {
//! let value = "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", \
//!              ext=\"some-app-ext-data\", mac=\"6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=\"";
//! // Borrows from `value`; nothing is copied.
//! let header = AuthorizationHeader::parse(value)?;
//!
//! // Look up the key for header.id, then check the MAC against the request
//! // actually received.
//! let credentials = Credentials::new(
//!     "dh37fgj492je",
//!     "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn",
//!     &SHA256,
//! );
//! let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2").request();
//! assert!(request.validate_header(&header, &credentials.key)?);
//! # Ok(())
//! # }
//! ```
//!
//! ## Timestamp challenges
//!
//! ```
//! use hawkc::{Credentials, WwwAuthenticateHeader, SHA256};
//!
//! # fn main() -> hawkc::Result<()> {
//! let credentials = Credentials::new("dh37fgj492je", "no-secret", &SHA256);
//!
//! // Server: tell the client what time it is, signed.
//! let challenge = WwwAuthenticateHeader::new(1353832234, &credentials.key)?;
//! let value = challenge.to_string();
//!
//! // Client: verify the timestamp MAC before adjusting the clock offset.
//! let parsed = WwwAuthenticateHeader::parse(&value)?;
//! assert!(parsed.validate(&credentials.key)?);
//! # Ok(())
//! # }
//! ```
//!
//! Parsed headers borrow from the input buffer and stay valid for as long as
//! it does; use [`AuthorizationHeader::into_owned`] to detach one. Header
//! values are emitted verbatim between double quotes, so field values such
//! as `ext` must not contain unescaped `"` or `\` characters.

mod algorithm;
pub mod b64;
mod base_string;
mod credentials;
mod error;
mod header;
mod mac;
mod parse;
mod request;
mod www;

pub use algorithm::{Algorithm, SHA1, SHA256};
pub use credentials::{Credentials, Key};
pub use error::{Error, Result};
pub use header::AuthorizationHeader;
pub use mac::{Mac, Nonce, MAX_HMAC_BYTES, MAX_NONCE_BYTES};
pub use request::{Request, RequestBuilder};
pub use www::WwwAuthenticateHeader;
