use thiserror::Error;

pub type Result<T> = ::std::result::Result<T, Error>;

/// Error types
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error("invalid multiaddr")]
    InvalidMultiaddr,
    #[error("unknown protocol string: {0:?}")]
    UnknownProtocolName(String),
    #[error("unknown protocol id: {0}")]
    UnknownProtocolCode(u64),
    #[error("protocol `{0}` requires an address, none given")]
    MissingAddress(&'static str),
    #[error("failed to parse {value:?} as a `{protocol}` address")]
    ParseAddressFail {
        protocol: &'static str,
        value: String,
    },
    #[error("port {0} is out of range")]
    PortRangeFail(String),
    #[error("onion address has no port number")]
    NoPortNumber,
    #[error("{0:?} is not a tor onion host")]
    NotTorOnion(String),
    #[error("failed to decode base32 onion host")]
    FailedBase32Decoding(#[source] data_encoding::DecodeError),
    #[error("invalid onion port number {0:?}")]
    InvalidPortNumber(String),
    #[error("onion port must be greater than zero")]
    PortValueTooSmall,
    #[error("onion port must not exceed 65535")]
    PortValueTooBig,
    #[error("failed to decode content identifier")]
    InvalidContentId(#[from] multibase::Error),
    #[error("invalid multihash")]
    InvalidMultihash(#[from] multihash::Error),
    #[error("length prefix declares {declared} bytes but {actual} follow")]
    InconsistentLength { declared: u64, actual: usize },
    #[error("`{protocol}` component needs {needed} bytes, only {available} left")]
    TruncatedComponent {
        protocol: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("invalid IP address: {0}")]
    InvalidIp(#[from] IpError),
    #[error("failed to decode unsigned varint: {0}")]
    InvalidVarint(#[from] VarintError),
}

/// Errors of the textual IP address grammar.
///
/// Octet positions are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IpError {
    #[error("not an IP address")]
    InvalidIpString,
    #[error("IPv4 address must have exactly 4 octets")]
    WrongSize,
    #[error("bad octet at position {0}")]
    BadOctet(usize),
    #[error("embedded IPv4 address in wrong position")]
    SeparatorInWrongPosition,
    #[error("not enough room for embedded IPv4 address")]
    NotEnoughRoom,
    #[error("more than one `::`")]
    TooManyEllipsis,
    #[error("too few groups and no `::` to expand")]
    NoEllipsisToExpand,
    #[error("trailing characters after address")]
    NotUsedEntireString,
    #[error("`::` in an address that is already complete")]
    UnusedEllipsis,
}

/// Errors while reading an unsigned varint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VarintError {
    #[error("varint exceeds 64 bits")]
    Overflow,
    #[error("varint ends before its last byte")]
    Insufficient,
    #[error("varint is not minimally encoded")]
    NotMinimal,
}

impl From<unsigned_varint::decode::Error> for VarintError {
    fn from(e: unsigned_varint::decode::Error) -> VarintError {
        use unsigned_varint::decode::Error::*;
        match e {
            Overflow => VarintError::Overflow,
            NotMinimal => VarintError::NotMinimal,
            _ => VarintError::Insufficient,
        }
    }
}
