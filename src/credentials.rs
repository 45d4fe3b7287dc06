use std::fmt;

use ring::hmac;

use crate::algorithm::Algorithm;
use crate::mac::Mac;
use crate::error::Result;

/// Hawk credentials: a client id and the key shared with the server.
pub struct Credentials {
    pub id: String,
    pub key: Key,
}

impl Credentials {
    pub fn new<S, B>(id: S, password: B, algorithm: &'static Algorithm) -> Credentials
    where
        S: Into<String>,
        B: AsRef<[u8]>,
    {
        Credentials {
            id: id.into(),
            key: Key::new(password, algorithm),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("id", &self.id)
            .field("key", &self.key)
            .finish()
    }
}

/// A shared secret bound to an HMAC algorithm.
///
/// The key material itself is absorbed by the HMAC construction and is not
/// readable back out (nor printed by `Debug`).
pub struct Key {
    key: hmac::Key,
    algorithm: &'static Algorithm,
}

impl Key {
    pub fn new<B: AsRef<[u8]>>(password: B, algorithm: &'static Algorithm) -> Key {
        Key {
            key: hmac::Key::new(algorithm.hmac(), password.as_ref()),
            algorithm,
        }
    }

    /// The algorithm this key signs with.
    pub fn algorithm(&self) -> &'static Algorithm {
        self.algorithm
    }

    /// Compute the base64 form of `HMAC(key, data)`.
    pub(crate) fn sign(&self, data: &[u8]) -> Result<Mac> {
        let tag = hmac::sign(&self.key, data);
        Mac::from_tag(tag.as_ref())
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("algorithm", self.algorithm)
            .finish()
    }
}
