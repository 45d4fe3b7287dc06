use std::borrow::Cow;
use std::fmt;
use std::num::IntErrorKind;

use tracing::debug;

use crate::base_string::decimal_len;
use crate::error::{Error, Result};
use crate::parse::parse_header_value;

/// The value of a Hawk `Authorization` (or `Server-Authorization`) header.
///
/// [`parse`](AuthorizationHeader::parse) borrows every field from the input
/// buffer without copying; headers produced by
/// [`Request::make_header`](crate::Request::make_header) own their computed
/// fields. Quoted-string escape bytes inside parsed values are preserved
/// as received.
///
/// Emission writes field values verbatim inside double quotes: callers are
/// responsible for supplying values free of `"` and `\`, or pre-escaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader<'a> {
    pub id: Cow<'a, str>,
    pub ts: i64,
    pub nonce: Cow<'a, str>,
    pub mac: Cow<'a, str>,
    pub hash: Option<Cow<'a, str>>,
    pub ext: Option<Cow<'a, str>>,
    pub app: Option<Cow<'a, str>>,
    pub dlg: Option<Cow<'a, str>>,
}

impl<'a> AuthorizationHeader<'a> {
    /// Parse a header value such as
    /// `Hawk id="dh37fgj492je", ts="1353832234", nonce="j4h3g2", mac="..."`.
    ///
    /// The scheme must be exactly `Hawk`; `id`, `ts`, `nonce` and `mac` are
    /// required; unrecognized parameters are ignored for forward
    /// compatibility. The result borrows from `value`.
    pub fn parse(value: &'a str) -> Result<AuthorizationHeader<'a>> {
        let (scheme, params) = parse_header_value(value)?;
        if scheme != "Hawk" {
            return Err(Error::BadScheme);
        }

        let mut id = None;
        let mut ts = None;
        let mut nonce = None;
        let mut mac = None;
        let mut hash = None;
        let mut ext = None;
        let mut app = None;
        let mut dlg = None;

        for param in params {
            let (key, val) = param?;
            match key {
                "id" => id = Some(val),
                "ts" => ts = Some(parse_ts(val)?),
                "nonce" => nonce = Some(val),
                "mac" => mac = Some(val),
                "hash" => hash = Some(val),
                "ext" => ext = Some(val),
                "app" => app = Some(val),
                "dlg" => dlg = Some(val),
                other => debug!(parameter = other, "ignoring unknown authorization parameter"),
            }
        }

        let end = value.len();
        Ok(AuthorizationHeader {
            id: Cow::Borrowed(id.ok_or(Error::parse(end, "missing id parameter"))?),
            ts: ts.ok_or(Error::parse(end, "missing ts parameter"))?,
            nonce: Cow::Borrowed(nonce.ok_or(Error::parse(end, "missing nonce parameter"))?),
            mac: Cow::Borrowed(mac.ok_or(Error::parse(end, "missing mac parameter"))?),
            hash: hash.map(Cow::Borrowed),
            ext: ext.map(Cow::Borrowed),
            app: app.map(Cow::Borrowed),
            dlg: dlg.map(Cow::Borrowed),
        })
    }

    /// Exact byte length of the serialized header value, scheme included.
    pub fn required_len(&self) -> usize {
        let mut len = 5 + param_len("id", self.id.len());
        len += 2 + param_len("ts", decimal_len(self.ts));
        len += 2 + param_len("nonce", self.nonce.len());
        for (key, value) in [
            ("hash", &self.hash),
            ("ext", &self.ext),
            ("app", &self.app),
            ("dlg", &self.dlg),
        ] {
            if let Some(value) = value {
                len += 2 + param_len(key, value.len());
            }
        }
        len + 2 + param_len("mac", self.mac.len())
    }

    /// Serialize into `buf`, returning the number of bytes written (always
    /// exactly [`required_len`](Self::required_len)). The buffer length is
    /// checked before anything is written.
    pub fn write_to(&self, buf: &mut [u8]) -> Result<usize> {
        write_checked(buf, self.required_len(), |w| self.emit(w))
    }

    fn emit<W: fmt::Write>(&self, w: &mut W) -> fmt::Result {
        write!(
            w,
            "Hawk id=\"{}\", ts=\"{}\", nonce=\"{}\"",
            self.id, self.ts, self.nonce
        )?;
        for (key, value) in [
            ("hash", &self.hash),
            ("ext", &self.ext),
            ("app", &self.app),
            ("dlg", &self.dlg),
        ] {
            if let Some(value) = value {
                write!(w, ", {key}=\"{value}\"")?;
            }
        }
        write!(w, ", mac=\"{}\"", self.mac)
    }

    /// Copy every borrowed field, detaching the header from its input buffer.
    pub fn into_owned(self) -> AuthorizationHeader<'static> {
        AuthorizationHeader {
            id: Cow::Owned(self.id.into_owned()),
            ts: self.ts,
            nonce: Cow::Owned(self.nonce.into_owned()),
            mac: Cow::Owned(self.mac.into_owned()),
            hash: self.hash.map(|v| Cow::Owned(v.into_owned())),
            ext: self.ext.map(|v| Cow::Owned(v.into_owned())),
            app: self.app.map(|v| Cow::Owned(v.into_owned())),
            dlg: self.dlg.map(|v| Cow::Owned(v.into_owned())),
        }
    }
}

impl fmt::Display for AuthorizationHeader<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.emit(f)
    }
}

/// Serialized size of one `key="value"` parameter.
pub(crate) fn param_len(key: &str, value_len: usize) -> usize {
    key.len() + value_len + 3
}

/// Run `emit` against `buf` after checking that the full `required` size
/// fits, so a short buffer fails cleanly instead of truncating.
pub(crate) fn write_checked<F>(buf: &mut [u8], required: usize, emit: F) -> Result<usize>
where
    F: FnOnce(&mut SliceWriter<'_>) -> fmt::Result,
{
    if buf.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            actual: buf.len(),
        });
    }
    let mut w = SliceWriter { buf, pos: 0 };
    emit(&mut w)?;
    debug_assert_eq!(w.pos, required);
    Ok(w.pos)
}

/// `fmt::Write` into a caller-supplied byte buffer, refusing writes past its
/// end.
pub(crate) struct SliceWriter<'a> {
    buf: &'a mut [u8],
    pos: usize,
}

impl fmt::Write for SliceWriter<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.pos + s.len();
        if end > self.buf.len() {
            return Err(fmt::Error);
        }
        self.buf[self.pos..end].copy_from_slice(s.as_bytes());
        self.pos = end;
        Ok(())
    }
}

/// Parse a `ts` parameter: a signed decimal count of seconds.
pub(crate) fn parse_ts(value: &str) -> Result<i64> {
    match value.parse::<i64>() {
        Ok(ts) => Ok(ts),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow | IntErrorKind::NegOverflow => Err(Error::Overflow),
            _ => Err(Error::TimeValue(value.to_string())),
        },
    }
}
