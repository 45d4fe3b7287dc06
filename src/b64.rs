//! Base64 encoding and decoding as used in Hawk headers.
//!
//! Two padded variants are provided: the standard alphabet (used for `mac`,
//! `hash` and `tsm` parameter values) and the URL-safe alphabet (for values
//! that travel inside URIs). All operations work on caller-supplied slices
//! with exact length semantics: size a destination with [`encoded_length`] or
//! [`decoded_length`] before encoding into it. Decoding is strict and accepts
//! canonical padding only.

use base64::engine::general_purpose::{GeneralPurpose, STANDARD, URL_SAFE};
use base64::Engine;

use crate::error::{Error, Result};

const STANDARD_ENGINE: GeneralPurpose = STANDARD;
const URL_SAFE_ENGINE: GeneralPurpose = URL_SAFE;

/// Exact number of bytes `encode` produces for `n` input bytes:
/// `4 * ceil(n / 3)`, padding included.
pub fn encoded_length(n: usize) -> Result<usize> {
    base64::encoded_len(n, true).ok_or(Error::Overflow)
}

/// Exact number of bytes `decode` produces for an `n`-byte input carrying
/// `pad_count` trailing `=` bytes.
pub fn decoded_length(n: usize, pad_count: usize) -> Result<usize> {
    if n % 4 != 0 {
        return Err(Error::Base64(format!("invalid input length {n}")));
    }
    if pad_count > 2 || (n == 0 && pad_count != 0) {
        return Err(Error::Base64(format!("invalid padding count {pad_count}")));
    }
    Ok(n / 4 * 3 - pad_count)
}

/// Encode `src` into `dst` with the standard alphabet, returning the number
/// of bytes written. No terminator is appended. `dst` must hold at least
/// [`encoded_length`]`(src.len())` bytes.
pub fn encode(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    encode_with(&STANDARD_ENGINE, src, dst)
}

/// [`encode`] with the URL-safe alphabet (`-` and `_` replacing `+` and `/`).
pub fn encode_url_safe(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    encode_with(&URL_SAFE_ENGINE, src, dst)
}

/// Decode standard-alphabet base64 from `src` into `dst`, returning the
/// number of bytes written. Unknown bytes, misaligned input length and
/// non-canonical padding are all rejected.
pub fn decode(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    decode_with(&STANDARD_ENGINE, src, dst)
}

/// [`decode`] with the URL-safe alphabet.
pub fn decode_url_safe(src: &[u8], dst: &mut [u8]) -> Result<usize> {
    decode_with(&URL_SAFE_ENGINE, src, dst)
}

fn encode_with(engine: &GeneralPurpose, src: &[u8], dst: &mut [u8]) -> Result<usize> {
    let required = encoded_length(src.len())?;
    if dst.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }
    engine
        .encode_slice(src, dst)
        .map_err(|_| Error::BufferTooSmall {
            required,
            actual: dst.len(),
        })
}

fn decode_with(engine: &GeneralPurpose, src: &[u8], dst: &mut [u8]) -> Result<usize> {
    // Upper bound on what the engine can write before it rejects malformed
    // input; for canonical input this is the exact decoded length.
    let pad_count = src.iter().rev().take(2).filter(|&&b| b == b'=').count();
    let required = (src.len() / 4 * 3).saturating_sub(pad_count);
    if dst.len() < required {
        return Err(Error::BufferTooSmall {
            required,
            actual: dst.len(),
        });
    }
    Ok(engine.decode_slice_unchecked(src, dst)?)
}
