//! Construction of the canonical strings that Hawk MACs are computed over.
//!
//! Two flavors exist: the `hawk.1.header` request base string and the
//! `hawk.1.ts` timestamp base string used by `WWW-Authenticate` challenges.
//! Every builder first computes the exact output size, then fills a buffer:
//! inline storage for common sizes, a bounded heap buffer for occasional
//! larger requests, and a hard failure beyond that bound so that oversized
//! URLs cannot force large allocations.

use std::fmt::{self, Write};

use crate::error::{Error, Result};

/// Base strings up to this size are built in inline storage.
pub(crate) const BASE_BUFFER_SIZE: usize = 512;

/// Hard cap on dynamically allocated base-string buffers.
pub(crate) const MAX_DYN_BASE_BUFFER_SIZE: usize = 2048;

/// Number of bytes in the decimal rendering of `value`, sign included.
pub(crate) fn decimal_len(value: i64) -> usize {
    let mut len = if value < 0 { 1 } else { 0 };
    let mut n = value.unsigned_abs();
    loop {
        len += 1;
        n /= 10;
        if n == 0 {
            break;
        }
    }
    len
}

/// A base-string buffer of precomputed exact size.
pub(crate) enum BaseString {
    Inline { buf: [u8; BASE_BUFFER_SIZE], len: usize },
    Heap(Vec<u8>),
}

impl BaseString {
    /// Obtain storage for a base string of exactly `required` bytes.
    fn with_capacity(required: usize) -> Result<BaseString> {
        if required > MAX_DYN_BASE_BUFFER_SIZE {
            return Err(Error::BufferTooLarge {
                required,
                max: MAX_DYN_BASE_BUFFER_SIZE,
            });
        }
        if required > BASE_BUFFER_SIZE {
            let mut buf = Vec::new();
            buf.try_reserve_exact(required).map_err(|_| Error::NoMemory)?;
            Ok(BaseString::Heap(buf))
        } else {
            Ok(BaseString::Inline {
                buf: [0; BASE_BUFFER_SIZE],
                len: 0,
            })
        }
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        match self {
            BaseString::Inline { buf, len } => &buf[..*len],
            BaseString::Heap(buf) => buf,
        }
    }

    fn len(&self) -> usize {
        self.as_bytes().len()
    }

    #[cfg(test)]
    fn is_inline(&self) -> bool {
        matches!(self, BaseString::Inline { .. })
    }
}

impl Write for BaseString {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self {
            BaseString::Inline { buf, len } => {
                let end = *len + s.len();
                if end > buf.len() {
                    return Err(fmt::Error);
                }
                buf[*len..end].copy_from_slice(s.as_bytes());
                *len = end;
                Ok(())
            }
            BaseString::Heap(buf) => {
                buf.extend_from_slice(s.as_bytes());
                Ok(())
            }
        }
    }
}

/// The fields contributing to a `hawk.1.header` base string.
///
/// On the client these come from the request being signed; on the server the
/// request metadata comes from the received request and the remaining fields
/// from the received `Authorization` header.
pub(crate) struct BaseStringParams<'a> {
    pub ts: i64,
    pub nonce: &'a str,
    pub method: &'a str,
    pub path: &'a str,
    pub host: &'a str,
    pub port: u16,
    pub hash: Option<&'a str>,
    pub ext: Option<&'a str>,
    pub app: Option<&'a str>,
    pub dlg: Option<&'a str>,
}

const HEADER_PREAMBLE: &str = "hawk.1.header\n";
const TS_PREAMBLE: &str = "hawk.1.ts\n";

impl BaseStringParams<'_> {
    fn app_lines(&self) -> Option<(&str, &str)> {
        match self.app {
            Some(app) if !app.is_empty() => Some((app, self.dlg.unwrap_or(""))),
            _ => None,
        }
    }

    /// Exact byte length of the base string [`build`](Self::build) produces.
    pub(crate) fn required_len(&self) -> usize {
        let mut len = HEADER_PREAMBLE.len()
            + decimal_len(self.ts)
            + 1
            + self.nonce.len()
            + 1
            + self.method.len()
            + 1
            + self.path.len()
            + 1
            + self.host.len()
            + 1
            + decimal_len(i64::from(self.port))
            + 1
            + self.hash.map_or(0, str::len)
            + 1
            + self.ext.map_or(0, str::len)
            + 1;
        if let Some((app, dlg)) = self.app_lines() {
            len += app.len() + 1 + dlg.len() + 1;
        }
        len
    }

    /// Build the base string. Lines are LF-terminated, the host is
    /// lowercased, and absent optional fields contribute empty lines.
    pub(crate) fn build(&self) -> Result<BaseString> {
        let required = self.required_len();
        let mut out = BaseString::with_capacity(required)?;
        write!(
            out,
            "{}{}\n{}\n{}\n{}\n",
            HEADER_PREAMBLE, self.ts, self.nonce, self.method, self.path
        )?;
        for c in self.host.chars() {
            out.write_char(c.to_ascii_lowercase())?;
        }
        write!(
            out,
            "\n{}\n{}\n{}\n",
            self.port,
            self.hash.unwrap_or(""),
            self.ext.unwrap_or("")
        )?;
        if let Some((app, dlg)) = self.app_lines() {
            write!(out, "{app}\n{dlg}\n")?;
        }
        debug_assert_eq!(out.len(), required);
        Ok(out)
    }
}

/// Build the `hawk.1.ts` base string for a timestamp challenge.
pub(crate) fn ts_base_string(ts: i64) -> Result<BaseString> {
    let required = TS_PREAMBLE.len() + decimal_len(ts) + 1;
    let mut out = BaseString::with_capacity(required)?;
    write!(out, "{TS_PREAMBLE}{ts}\n")?;
    debug_assert_eq!(out.len(), required);
    Ok(out)
}
