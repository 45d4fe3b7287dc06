//! End-to-end exercises of the client and server header flows, built around
//! the Hawk protocol documentation's worked example and a header captured from a
//! production deployment.

use hawkc::{
    AuthorizationHeader, Credentials, Error, Key, RequestBuilder, WwwAuthenticateHeader, SHA256,
};

const EXAMPLE_PASSWORD: &str = "werxhqb98rpaxn39848xrunpaw3489ruxnpa98w4rxn";
const EXAMPLE_MAC: &str = "6R4rV5iE+NPoym+WwjeHzjAGXUtLNIxmo1vpMofpLAE=";

// A header from a real request made with the JS Hawk library, to
// https://pulse.taskcluster.net:443/v1/namespaces with credentials "me"/"tok".
const REAL_HEADER: &str = "Hawk id=\"me\", ts=\"1491183061\", nonce=\"RVnYzW\", \
                           mac=\"1kqRT9EoxiZ9AA/ayOCXB+AcjfK/BoJ+n7z0gfvZotQ=\"";

fn example_credentials() -> Credentials {
    Credentials::new("dh37fgj492je", EXAMPLE_PASSWORD, &SHA256)
}

#[test]
fn hawk_example_verifies() {
    let credentials = example_credentials();
    let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
        .ext("some-app-ext-data")
        .request();
    let header = request
        .make_header_full(&credentials, 1353832234, "j4h3g2")
        .unwrap();
    assert_eq!(header.mac.as_ref(), EXAMPLE_MAC);
    assert!(request.validate_header(&header, &credentials.key).unwrap());
}

#[test]
fn generated_header_round_trips() {
    let credentials = example_credentials();
    let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
        .ext("some-app-ext-data")
        .request();
    let header = request
        .make_header_full(&credentials, 1353832234, "j4h3g2")
        .unwrap();

    let mut buf = vec![0u8; header.required_len()];
    let n = header.write_to(&mut buf).unwrap();
    assert_eq!(n, buf.len());
    let value = std::str::from_utf8(&buf).unwrap();

    let parsed = AuthorizationHeader::parse(value).unwrap();
    assert_eq!(parsed, header);
    assert!(request.validate_header(&parsed, &credentials.key).unwrap());
}

#[test]
fn fresh_header_round_trips_through_server_view() {
    let credentials = example_credentials();
    let client_request = RequestBuilder::new("POST", "example.com", 443, "/v1/submit?x=1")
        .ext("submission")
        .request();
    let value = client_request
        .make_header(&credentials, 0)
        .unwrap()
        .to_string();

    // The server reconstructs the request from what it received.
    let header = AuthorizationHeader::parse(&value).unwrap();
    assert_eq!(header.id.as_ref(), "dh37fgj492je");
    let server_request = RequestBuilder::new("POST", "example.com", 443, "/v1/submit?x=1").request();
    assert!(server_request
        .validate_header(&header, &credentials.key)
        .unwrap());
}

#[test]
fn basic_scheme_is_rejected() {
    assert!(matches!(
        AuthorizationHeader::parse("Basic dXNlcjpwYXNz"),
        Err(Error::BadScheme)
    ));
}

#[test]
fn unknown_parameters_are_tolerated() {
    let value = format!(
        "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", \
         future=\"xyz\", ext=\"some-app-ext-data\", mac=\"{EXAMPLE_MAC}\""
    );
    let header = AuthorizationHeader::parse(&value).unwrap();
    assert_eq!(header.id.as_ref(), "dh37fgj492je");
    assert_eq!(header.ts, 1353832234);
    assert_eq!(header.nonce.as_ref(), "j4h3g2");
    assert_eq!(header.mac.as_ref(), EXAMPLE_MAC);

    let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2").request();
    assert!(request
        .validate_header(&header, &example_credentials().key)
        .unwrap());
}

#[test]
fn challenge_round_trips() {
    let key = Key::new(EXAMPLE_PASSWORD, &SHA256);
    let challenge = WwwAuthenticateHeader::new(1353832234, &key).unwrap();
    let value = challenge.to_string();

    let parsed = WwwAuthenticateHeader::parse(&value).unwrap();
    assert_eq!(parsed.ts, 1353832234);
    assert!(parsed.validate(&key).unwrap());

    let recomputed = WwwAuthenticateHeader::new(parsed.ts, &key).unwrap();
    assert_eq!(recomputed.tsm, parsed.tsm);
}

#[test]
fn oversized_request_is_rejected_without_signing() {
    let credentials = example_credentials();
    let path = format!("/{}", "a".repeat(3000));
    let request = RequestBuilder::new("GET", "example.com", 8000, &path).request();
    assert!(matches!(
        request.make_header_full(&credentials, 1353832234, "j4h3g2"),
        Err(Error::BufferTooLarge { .. })
    ));

    // The same guard protects the validation side.
    let value = format!(
        "Hawk id=\"dh37fgj492je\", ts=\"1353832234\", nonce=\"j4h3g2\", mac=\"{EXAMPLE_MAC}\""
    );
    let header = AuthorizationHeader::parse(&value).unwrap();
    assert!(matches!(
        request.validate_header(&header, &credentials.key),
        Err(Error::BufferTooLarge { .. })
    ));
}

#[test]
fn real_request_verifies() {
    let header = AuthorizationHeader::parse(REAL_HEADER).unwrap();
    let credentials = Credentials::new("me", "tok", &SHA256);
    let request = RequestBuilder::new("GET", "pulse.taskcluster.net", 443, "/v1/namespaces")
        .request();
    assert!(request.validate_header(&header, &credentials.key).unwrap());
}

#[test]
fn real_request_rejects_bad_credentials() {
    let header = AuthorizationHeader::parse(REAL_HEADER).unwrap();
    let credentials = Credentials::new("me", "WRONG", &SHA256);
    let request = RequestBuilder::new("GET", "pulse.taskcluster.net", 443, "/v1/namespaces")
        .request();
    assert!(!request.validate_header(&header, &credentials.key).unwrap());
}

#[test]
fn real_request_rejects_bad_request_info() {
    let header = AuthorizationHeader::parse(REAL_HEADER).unwrap();
    let credentials = Credentials::new("me", "tok", &SHA256);
    let request = RequestBuilder::new("GET", "pulse.taskcluster.net", 443, "/v1/WRONGPATH")
        .request();
    assert!(!request.validate_header(&header, &credentials.key).unwrap());
}

#[test]
fn tampered_mac_is_rejected() {
    let credentials = example_credentials();
    let request = RequestBuilder::new("GET", "example.com", 8000, "/resource/1?b=1&a=2")
        .ext("some-app-ext-data")
        .request();
    let mut header = request
        .make_header_full(&credentials, 1353832234, "j4h3g2")
        .unwrap();

    let mut tampered = header.mac.clone().into_owned().into_bytes();
    tampered[0] ^= 0x01;
    header.mac = String::from_utf8(tampered).unwrap().into();
    assert!(!request.validate_header(&header, &credentials.key).unwrap());

    // A truncated MAC (length mismatch) must also fail, not panic.
    let full = request
        .make_header_full(&credentials, 1353832234, "j4h3g2")
        .unwrap();
    let short = full.mac.as_ref()[..full.mac.len() - 2].to_string();
    header.mac = short.into();
    assert!(!request.validate_header(&header, &credentials.key).unwrap());
}

#[test]
fn negative_and_extreme_timestamps_round_trip() {
    let credentials = example_credentials();
    let request = RequestBuilder::new("GET", "example.com", 80, "/t").request();
    for ts in [0, -1, -62135596800, i64::MAX] {
        let header = request.make_header_full(&credentials, ts, "j4h3g2").unwrap();
        let value = header.to_string();
        let parsed = AuthorizationHeader::parse(&value).unwrap();
        assert_eq!(parsed.ts, ts);
        assert!(request.validate_header(&parsed, &credentials.key).unwrap());
    }
}

#[test]
fn malformed_headers_yield_parse_errors() {
    for value in [
        "Hawk id=\"x\", ts=\"1\", nonce=\"n\", mac=\"m\",",
        "Hawk id \"x\"",
        "Hawk id=\"x",
        "Hawk",
    ] {
        assert!(matches!(
            AuthorizationHeader::parse(value),
            Err(Error::Parse { .. })
        ));
    }
}
