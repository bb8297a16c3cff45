//! Unsigned base-128 varints.
//!
//! Every byte carries 7 value bits, least significant group first. The high bit
//! is set on all bytes but the last. Protocol codes and the length prefix of
//! variable sized addresses use this encoding.

use unsigned_varint::{decode as uvi_decode, encode as uvi_encode};

use crate::errors::VarintError;

/// Bytes needed for `u64::MAX`.
const MAX_LEN: usize = 10;

/// Encode `n` as a varint.
pub fn encode(n: u64) -> Vec<u8> {
    let mut buf = uvi_encode::u64_buffer();
    uvi_encode::u64(n, &mut buf).to_vec()
}

/// Append the varint encoding of `n` to `out`.
pub(crate) fn write(n: u64, out: &mut Vec<u8>) {
    let mut buf = uvi_encode::u64_buffer();
    out.extend_from_slice(uvi_encode::u64(n, &mut buf))
}

/// Decode a varint from the front of `input`.
///
/// Returns the value and the number of bytes it occupied.
pub fn decode(input: &[u8]) -> Result<(u64, usize), VarintError> {
    let (n, rest) = read(input)?;
    Ok((n, input.len() - rest.len()))
}

/// Like [`decode`], but hands back the remaining input.
pub(crate) fn read(input: &[u8]) -> Result<(u64, &[u8]), VarintError> {
    let (n, rest) = uvi_decode::u64(input)?;
    // The tenth byte holds only bit 63.
    if input.len() - rest.len() == MAX_LEN && input[MAX_LEN - 1] > 1 {
        return Err(VarintError::Overflow);
    }
    Ok((n, rest))
}
