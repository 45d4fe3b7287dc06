use std::fmt;
use std::str;

use ring::constant_time;
use ring::rand::{SecureRandom, SystemRandom};

use crate::b64;
use crate::error::{Error, Result};

/// Longest raw MAC any registered algorithm produces.
pub const MAX_HMAC_BYTES: usize = 32;

/// Base64 form of a `MAX_HMAC_BYTES` MAC.
const MAX_HMAC_B64_LEN: usize = 44;

/// Number of random bytes drawn for a nonce.
pub const MAX_NONCE_BYTES: usize = 6;

const NONCE_HEX_LEN: usize = MAX_NONCE_BYTES * 2;

/// The base64 rendering of an HMAC, as it appears in a `mac` or `tsm`
/// header parameter.
///
/// Equality against received MAC text runs in fixed time: the comparison
/// looks at every byte position regardless of where the inputs differ, so it
/// is safe to use directly on attacker-controlled input.
#[derive(Clone, Copy)]
pub struct Mac {
    buf: [u8; MAX_HMAC_B64_LEN],
    len: usize,
}

impl Mac {
    /// Encode a raw HMAC tag.
    pub(crate) fn from_tag(tag: &[u8]) -> Result<Mac> {
        let mut buf = [0u8; MAX_HMAC_B64_LEN];
        let len = b64::encode(tag, &mut buf)?;
        Ok(Mac { buf, len })
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    pub fn as_str(&self) -> &str {
        // base64 output is pure ASCII
        str::from_utf8(self.as_bytes()).expect("base64 output is ASCII")
    }
}

/// Fixed-time equality: unequal lengths compare unequal, equal lengths are
/// compared without short-circuiting.
pub(crate) fn fixed_time_eq(lhs: &[u8], rhs: &[u8]) -> bool {
    constant_time::verify_slices_are_equal(lhs, rhs).is_ok()
}

impl PartialEq for Mac {
    fn eq(&self, other: &Mac) -> bool {
        fixed_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl Eq for Mac {}

impl PartialEq<str> for Mac {
    fn eq(&self, other: &str) -> bool {
        fixed_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl PartialEq<&str> for Mac {
    fn eq(&self, other: &&str) -> bool {
        fixed_time_eq(self.as_bytes(), other.as_bytes())
    }
}

impl fmt::Display for Mac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Mac {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Mac({})", self.as_str())
    }
}

/// A freshly generated request nonce: [`MAX_NONCE_BYTES`] bytes from the
/// system's cryptographic random source, hex-encoded.
pub struct Nonce {
    hex: [u8; NONCE_HEX_LEN],
}

impl Nonce {
    /// Draw a new nonce. Fails with [`Error::Crypto`] if the system random
    /// source cannot be read.
    pub fn new() -> Result<Nonce> {
        let rng = SystemRandom::new();
        let mut raw = [0u8; MAX_NONCE_BYTES];
        rng.fill(&mut raw)
            .map_err(|_| Error::Crypto("system random source unavailable"))?;
        let mut hex = [0u8; NONCE_HEX_LEN];
        hex::encode_to_slice(raw, &mut hex)
            .map_err(|_| Error::Crypto("nonce hex encoding failed"))?;
        Ok(Nonce { hex })
    }

    pub fn as_str(&self) -> &str {
        // hex output is pure ASCII
        str::from_utf8(&self.hex).expect("hex output is ASCII")
    }
}

impl fmt::Display for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Debug for Nonce {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Nonce({})", self.as_str())
    }
}
