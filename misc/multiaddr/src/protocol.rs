use std::{fmt, sync::LazyLock};

use crate::{varint, Error, Result};

// Codes are part of the wire format and must never change.
pub const IP4: u64 = 4;
pub const TCP: u64 = 6;
pub const UDP: u64 = 17;
pub const DCCP: u64 = 33;
pub const IP6: u64 = 41;
pub const SCTP: u64 = 132;
pub const UTP: u64 = 301;
pub const UDT: u64 = 302;
pub const IPFS: u64 = 421;
pub const HTTPS: u64 = 443;
pub const ONION: u64 = 444;
pub const HTTP: u64 = 480;

/// Size of the address that follows a protocol code on the wire.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Size {
    /// An address of exactly this many bits.
    Fixed(u32),
    /// No address at all.
    None,
    /// A varint byte length, then that many bytes.
    LengthPrefixed,
}

/// A known multiaddr protocol.
#[derive(PartialEq, Eq, Debug, Hash)]
pub struct Protocol {
    code: u64,
    name: &'static str,
    size: Size,
    encoded_code: Vec<u8>,
}

const TABLE: [(u64, &str, Size); 12] = [
    (IP4, "ip4", Size::Fixed(32)),
    (TCP, "tcp", Size::Fixed(16)),
    (UDP, "udp", Size::Fixed(16)),
    (DCCP, "dccp", Size::Fixed(16)),
    (IP6, "ip6", Size::Fixed(128)),
    (SCTP, "sctp", Size::Fixed(16)),
    (UTP, "utp", Size::None),
    (UDT, "udt", Size::None),
    (IPFS, "ipfs", Size::LengthPrefixed),
    (HTTPS, "https", Size::None),
    (ONION, "onion", Size::Fixed(80)),
    (HTTP, "http", Size::None),
];

static PROTOCOLS: LazyLock<Vec<Protocol>> = LazyLock::new(|| {
    TABLE
        .iter()
        .map(|&(code, name, size)| Protocol {
            code,
            name,
            size,
            encoded_code: varint::encode(code),
        })
        .collect()
});

impl Protocol {
    /// Look up a protocol by its textual name.
    ///
    /// # Examples
    ///
    /// ```
    /// use multiaddr::Protocol;
    ///
    /// assert_eq!(Protocol::by_name("tcp").unwrap().code(), 6);
    /// assert!(Protocol::by_name("quic").is_none());
    /// ```
    pub fn by_name(name: &str) -> Option<&'static Protocol> {
        PROTOCOLS.iter().find(|p| p.name == name)
    }

    /// Look up a protocol by its numeric code.
    pub fn by_code(code: u64) -> Option<&'static Protocol> {
        PROTOCOLS.iter().find(|p| p.code == code)
    }

    /// All known protocols, in registry order.
    pub fn iter() -> impl Iterator<Item = &'static Protocol> {
        PROTOCOLS.iter()
    }

    pub fn code(&self) -> u64 {
        self.code
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn size(&self) -> Size {
        self.size
    }

    /// The varint encoding of [`Protocol::code`], as it appears on the wire.
    pub fn encoded_code(&self) -> &[u8] {
        &self.encoded_code
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// Parse a slash separated list of protocol names such as `/ip4/tcp`.
///
/// Leading and trailing slashes are ignored. Empty names between two slashes
/// are rejected like any other unknown name.
pub fn split_protocol_names(s: &str) -> Result<Vec<&'static Protocol>> {
    let trimmed = s.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }
    trimmed
        .split('/')
        .map(|name| Protocol::by_name(name).ok_or_else(|| Error::UnknownProtocolName(name.into())))
        .collect()
}
