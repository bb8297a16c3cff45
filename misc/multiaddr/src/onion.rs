//! Tor onion (v2) addresses: `<16 base32 characters>:<port>`.

use data_encoding::BASE32;

use crate::{Error, Result};

/// Length of the base32 host part.
pub const HOST_LEN: usize = 16;
/// Length of the decoded host part.
pub const HOST_BYTES: usize = 10;
/// The big-endian port trailing the host on the wire.
pub const PORT_BYTES: usize = 2;

/// Decode a base32 onion host (without `.onion`).
///
/// The alphabet is case-insensitive.
pub fn decode_host(host: &str) -> Result<[u8; HOST_BYTES]> {
    let upper = host.to_uppercase();
    let decoded_len = BASE32
        .decode_len(upper.len())
        .map_err(Error::FailedBase32Decoding)?;
    if decoded_len != HOST_BYTES {
        return Err(Error::NotTorOnion(host.into()));
    }
    let mut buf = [0u8; HOST_BYTES];
    BASE32
        .decode_mut(upper.as_bytes(), &mut buf)
        .map_err(|e| Error::FailedBase32Decoding(e.error))?;
    Ok(buf)
}

/// Lowercase base32 text of an onion host.
pub fn encode_host(host: &[u8; HOST_BYTES]) -> String {
    BASE32.encode(host).to_lowercase()
}

/// Encode `host:port` as 10 host bytes followed by the big-endian port.
pub(crate) fn to_bytes(s: &str) -> Result<Vec<u8>> {
    let parts: Vec<&str> = s.split(':').collect();
    let [host, port] = parts[..] else {
        return Err(Error::NoPortNumber);
    };

    if host.len() != HOST_LEN {
        return Err(Error::NotTorOnion(host.into()));
    }
    let host = decode_host(host)?;

    let port = parse_port(port)?;

    let mut out = Vec::with_capacity(HOST_BYTES + PORT_BYTES);
    out.extend_from_slice(&host);
    out.extend_from_slice(&port.to_be_bytes());
    Ok(out)
}

/// Decimal port in `1..=65535`. A leading `-` is read as a value below range.
fn parse_port(port: &str) -> Result<u16> {
    let (negative, digits) = match port.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, port),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::InvalidPortNumber(port.into()));
    }
    if negative || digits.bytes().all(|b| b == b'0') {
        return Err(Error::PortValueTooSmall);
    }
    digits.parse().map_err(|_| Error::PortValueTooBig)
}

/// Inverse of [`to_bytes`].
pub(crate) fn to_string(bytes: &[u8]) -> Result<String> {
    if bytes.len() != HOST_BYTES + PORT_BYTES {
        return Err(Error::TruncatedComponent {
            protocol: "onion",
            needed: HOST_BYTES + PORT_BYTES,
            available: bytes.len(),
        });
    }
    let mut host = [0u8; HOST_BYTES];
    host.copy_from_slice(&bytes[..HOST_BYTES]);
    let port = u16::from_be_bytes([bytes[HOST_BYTES], bytes[HOST_BYTES + 1]]);
    Ok(format!("{}:{}", encode_host(&host), port))
}
