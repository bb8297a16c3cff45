//! Content identifiers used by the `ipfs` protocol: base58btc text of a multihash.

use crate::Result;

/// The `64` bounds the digest size, enough for SHA-512.
type Multihash = multihash::Multihash<64>;

/// Decode base58 text into raw multihash bytes.
///
/// # Examples
///
/// ```
/// let bytes = multiaddr::content_id::from_text("QmcgpsyWgH8Y8ajJz1Cu72KnS5uo2Aa2LpzU7kinSupNKC").unwrap();
/// assert_eq!(bytes.len(), 34);
/// assert_eq!(&bytes[..2], &[0x12, 0x20]);
/// ```
pub fn from_text(s: &str) -> Result<Vec<u8>> {
    let decoded = multibase::Base::Base58Btc.decode(s)?;
    Multihash::from_bytes(&decoded)?;
    Ok(decoded)
}

/// Base58 text of raw multihash bytes.
pub fn to_text(bytes: &[u8]) -> Result<String> {
    Multihash::from_bytes(bytes)?;
    Ok(multibase::Base::Base58Btc.encode(bytes))
}
