use std::borrow::Cow;
use std::fmt;

use tracing::debug;

use crate::base_string::{decimal_len, ts_base_string};
use crate::credentials::Key;
use crate::error::{Error, Result};
use crate::header::{param_len, parse_ts, write_checked};
use crate::parse::parse_header_value;

/// The value of a Hawk `WWW-Authenticate` challenge carrying a signed server
/// timestamp, e.g. `Hawk ts="1353832234", tsm="..."`.
///
/// Servers build one with [`new`](WwwAuthenticateHeader::new) so clients can
/// learn the server's clock; clients parse the received value and check the
/// timestamp MAC with [`validate`](WwwAuthenticateHeader::validate) before
/// trusting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WwwAuthenticateHeader<'a> {
    pub ts: i64,
    pub tsm: Cow<'a, str>,
}

impl<'a> WwwAuthenticateHeader<'a> {
    /// Build a challenge for the timestamp `ts`, computing its MAC with
    /// `key`.
    pub fn new(ts: i64, key: &Key) -> Result<WwwAuthenticateHeader<'static>> {
        let base = ts_base_string(ts)?;
        let mac = key.sign(base.as_bytes())?;
        Ok(WwwAuthenticateHeader {
            ts,
            tsm: Cow::Owned(mac.as_str().to_string()),
        })
    }

    /// Parse a challenge value. The scheme must be exactly `Hawk`; `ts` and
    /// `tsm` are both required; unrecognized parameters are ignored. The
    /// result borrows from `value`.
    pub fn parse(value: &'a str) -> Result<WwwAuthenticateHeader<'a>> {
        let (scheme, params) = parse_header_value(value)?;
        if scheme != "Hawk" {
            return Err(Error::BadScheme);
        }

        let mut ts = None;
        let mut tsm = None;
        for param in params {
            let (key, val) = param?;
            match key {
                "ts" => ts = Some(parse_ts(val)?),
                "tsm" => tsm = Some(val),
                other => debug!(parameter = other, "ignoring unknown challenge parameter"),
            }
        }

        let end = value.len();
        Ok(WwwAuthenticateHeader {
            ts: ts.ok_or(Error::parse(end, "missing ts parameter"))?,
            tsm: Cow::Borrowed(tsm.ok_or(Error::parse(end, "missing tsm parameter"))?),
        })
    }

    /// Recompute the timestamp MAC with `key` and compare it against `tsm`
    /// in fixed time.
    pub fn validate(&self, key: &Key) -> Result<bool> {
        let base = ts_base_string(self.ts)?;
        let mac = key.sign(base.as_bytes())?;
        let valid = mac == self.tsm.as_ref();
        if !valid {
            debug!(ts = self.ts, "timestamp MAC mismatch");
        }
        Ok(valid)
    }

    /// Exact byte length of the serialized challenge value.
    pub fn required_len(&self) -> usize {
        5 + param_len("ts", decimal_len(self.ts)) + 2 + param_len("tsm", self.tsm.len())
    }

    /// Serialize into `buf`, returning the number of bytes written. The
    /// buffer length is checked before anything is written.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        write_checked(buf, self.required_len(), |w| self.emit(w))
    }

    fn emit<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        write!(w, "Hawk ts=\"{}\", tsm=\"{}\"", self.ts, self.tsm)
    }
}

impl fmt::Display for WwwAuthenticateHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.emit(f)
    }
}
