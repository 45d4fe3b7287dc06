use std::fmt;

use ring::hmac;

use crate::error::{Error, Result};

/// An HMAC algorithm usable for Hawk signatures.
///
/// Two instances exist, [`SHA256`] and [`SHA1`]; they are selected by name
/// with [`Algorithm::by_name`] and carry their MAC output length as an
/// intrinsic property.
pub struct Algorithm {
    name: &'static str,
    hmac: &'static hmac::Algorithm,
    mac_len: usize,
}

/// HMAC-SHA-256, producing a 32-byte MAC. The Hawk default.
pub static SHA256: Algorithm = Algorithm {
    name: "sha256",
    hmac: &hmac::HMAC_SHA256,
    mac_len: 32,
};

/// HMAC-SHA-1, producing a 20-byte MAC. Supported for interoperability with
/// peers that still sign with it.
pub static SHA1: Algorithm = Algorithm {
    name: "sha1",
    hmac: &hmac::HMAC_SHA1_FOR_LEGACY_USE_ONLY,
    mac_len: 20,
};

static ALGORITHMS: [&Algorithm; 2] = [&SHA256, &SHA1];

impl Algorithm {
    /// Look up an algorithm by its Hawk name (`"sha256"` or `"sha1"`).
    ///
    /// Names are matched exactly; lookup is case-sensitive.
    pub fn by_name(name: &str) -> Result<&'static Algorithm> {
        ALGORITHMS
            .iter()
            .copied()
            .find(|a| a.name == name)
            .ok_or_else(|| Error::UnknownAlgorithm(name.to_string()))
    }

    /// The algorithm's Hawk name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Length in bytes of the raw MAC this algorithm produces.
    pub fn mac_len(&self) -> usize {
        self.mac_len
    }

    pub(crate) fn hmac(&self) -> hmac::Algorithm {
        *self.hmac
    }
}

impl PartialEq for Algorithm {
    fn eq(&self, other: &Algorithm) -> bool {
        self.name == other.name
    }
}

impl Eq for Algorithm {}

impl fmt::Debug for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Algorithm").field("name", &self.name).finish()
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name)
    }
}
