//! Conversion between the text form (`/ip4/127.0.0.1/tcp/80`) and the binary
//! form (`varint(code) ∥ address` per component) of a multiaddr.

use crate::{
    content_id, ip, onion,
    protocol::{Protocol, Size, DCCP, IP4, IP6, IPFS, ONION, SCTP, TCP, UDP},
    varint, Error, Result,
};

/// Encode a multiaddr string.
///
/// Trailing slashes are ignored. The string must start with `/`.
///
/// # Examples
///
/// ```
/// use multiaddr::codec::string_to_bytes;
///
/// let bytes = string_to_bytes("/ip4/127.0.0.1/tcp/4321").unwrap();
/// assert_eq!(bytes, [0x04, 127, 0, 0, 1, 0x06, 0x10, 0xe1]);
/// ```
pub fn string_to_bytes(address: &str) -> Result<Vec<u8>> {
    let trimmed = address.trim_end_matches('/');
    let Some(path) = trimmed.strip_prefix('/') else {
        // A multiaddr must start with `/`
        return Err(Error::InvalidMultiaddr);
    };

    let mut bytes = Vec::new();
    let mut parts = path.split('/');
    while let Some(name) = parts.next() {
        let protocol = Protocol::by_name(name).ok_or_else(|| {
            tracing::trace!(%address, protocol=%name, "Unknown protocol name");
            Error::UnknownProtocolName(name.to_owned())
        })?;
        bytes.extend_from_slice(protocol.encoded_code());

        if protocol.size() == Size::None {
            continue;
        }

        let value = parts
            .next()
            .ok_or(Error::MissingAddress(protocol.name()))?;
        bytes.extend(address_string_to_bytes(protocol, value)?);
    }

    Ok(bytes)
}

/// Decode the binary form of a multiaddr back into its string.
///
/// # Examples
///
/// ```
/// use multiaddr::codec::bytes_to_string;
///
/// let s = bytes_to_string(&[0x04, 127, 0, 0, 1, 0x11, 0x04, 0xd2]).unwrap();
/// assert_eq!(s, "/ip4/127.0.0.1/udp/1234");
/// ```
pub fn bytes_to_string(buffer: &[u8]) -> Result<String> {
    let mut out = String::new();
    let mut rest = buffer;

    while !rest.is_empty() {
        let (protocol, value, next) = split_component(rest)?;
        out.push('/');
        out.push_str(protocol.name());

        if protocol.size() != Size::None {
            let text = address_bytes_to_string(protocol, value)?;
            if !text.is_empty() {
                out.push('/');
                out.push_str(&text);
            }
        }
        rest = next;
    }

    Ok(out)
}

/// Encode the address part of a single component.
///
/// Length prefixed protocols get their varint length prepended.
pub fn address_string_to_bytes(protocol: &Protocol, value: &str) -> Result<Vec<u8>> {
    match protocol.code() {
        IP4 => Ok(ip::parse(value)?.to_ipv4()?.to_vec()),
        IP6 => Ok(ip::parse(value)?.to_ipv6().to_vec()),
        TCP | UDP | DCCP | SCTP => Ok(parse_port(protocol, value)?.to_be_bytes().to_vec()),
        ONION => onion::to_bytes(value),
        IPFS => {
            let hash = content_id::from_text(value)?;
            let mut out = varint::encode(hash.len() as u64);
            out.extend_from_slice(&hash);
            Ok(out)
        }
        _ => Err(Error::ParseAddressFail {
            protocol: protocol.name(),
            value: value.to_owned(),
        }),
    }
}

/// Decode the address part of a single component, as produced by
/// [`address_string_to_bytes`].
///
/// Returns an empty string for protocols without a textual address.
pub fn address_bytes_to_string(protocol: &Protocol, bytes: &[u8]) -> Result<String> {
    match protocol.code() {
        IP4 => Ok(ip::Ip::V4(fixed(protocol, bytes)?).to_string()),
        IP6 => Ok(ip::Ip::V6(fixed(protocol, bytes)?).to_string()),
        TCP | UDP | DCCP | SCTP => Ok(u16::from_be_bytes(fixed(protocol, bytes)?).to_string()),
        ONION => onion::to_string(bytes),
        IPFS => {
            let (declared, width) = varint::decode(bytes)?;
            let hash = &bytes[width..];
            if declared != hash.len() as u64 {
                return Err(Error::InconsistentLength {
                    declared,
                    actual: hash.len(),
                });
            }
            content_id::to_text(hash)
        }
        _ => Ok(String::new()),
    }
}

/// Number of address bytes following the protocol code at the front of `input`.
///
/// For length prefixed protocols this includes the prefix itself. An `onion`
/// host is followed by its port, which the registry size does not count.
pub fn size_for_address(protocol: &Protocol, input: &[u8]) -> Result<usize> {
    match protocol.size() {
        Size::Fixed(bits) if protocol.code() == ONION => {
            Ok(bits as usize / 8 + onion::PORT_BYTES)
        }
        Size::Fixed(bits) => Ok(bits as usize / 8),
        Size::None => Ok(0),
        Size::LengthPrefixed => {
            let (len, width) = varint::decode(input)?;
            Ok(usize::try_from(len)
                .unwrap_or(usize::MAX)
                .saturating_add(width))
        }
    }
}

/// Split the first component off a binary multiaddr.
///
/// Returns the protocol, its encoded address bytes and the remaining input.
pub(crate) fn split_component(input: &[u8]) -> Result<(&'static Protocol, &[u8], &[u8])> {
    let (code, input) = varint::read(input)?;
    let protocol = Protocol::by_code(code).ok_or_else(|| {
        tracing::trace!(%code, "Unknown protocol code");
        Error::UnknownProtocolCode(code)
    })?;

    let size = size_for_address(protocol, input)?;
    if input.len() < size {
        return Err(Error::TruncatedComponent {
            protocol: protocol.name(),
            needed: size,
            available: input.len(),
        });
    }
    let (value, rest) = input.split_at(size);
    Ok((protocol, value, rest))
}

fn parse_port(protocol: &Protocol, value: &str) -> Result<u16> {
    if value.is_empty() || !value.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::ParseAddressFail {
            protocol: protocol.name(),
            value: value.to_owned(),
        });
    }
    value
        .parse()
        .map_err(|_| Error::PortRangeFail(value.to_owned()))
}

fn fixed<const N: usize>(protocol: &Protocol, bytes: &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| Error::TruncatedComponent {
        protocol: protocol.name(),
        needed: N,
        available: bytes.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::{IpError, VarintError};

    fn hex(s: &str) -> Vec<u8> {
        data_encoding::HEXLOWER.decode(s.as_bytes()).unwrap()
    }

    #[test]
    fn string_to_bytes_vectors() {
        for (address, expected) in [
            ("/ip4/127.0.0.1/udp/1234", "047f0000011104d2"),
            ("/ip4/127.0.0.1/tcp/4321", "047f0000010610e1"),
            (
                "/ip4/127.0.0.1/udp/1234/ip4/127.0.0.1/tcp/4321",
                "047f0000011104d2047f0000010610e1",
            ),
        ] {
            assert_eq!(string_to_bytes(address).unwrap(), hex(expected), "{address}");
            assert_eq!(bytes_to_string(&hex(expected)).unwrap(), address);
        }
    }

    #[test]
    fn trailing_slashes_are_ignored() {
        assert_eq!(
            string_to_bytes("/ip4/127.0.0.1/tcp/1234///").unwrap(),
            string_to_bytes("/ip4/127.0.0.1/tcp/1234").unwrap()
        );
    }

    #[test]
    fn grammar_errors() {
        assert!(matches!(string_to_bytes(""), Err(Error::InvalidMultiaddr)));
        assert!(matches!(string_to_bytes("/"), Err(Error::InvalidMultiaddr)));
        assert!(matches!(string_to_bytes("ip4/1.2.3.4"), Err(Error::InvalidMultiaddr)));
        assert!(matches!(
            string_to_bytes("/ip4/1.2.3.4//tcp/80"),
            Err(Error::UnknownProtocolName(name)) if name.is_empty()
        ));
        assert!(matches!(
            string_to_bytes("/quic"),
            Err(Error::UnknownProtocolName(name)) if name == "quic"
        ));
        assert!(matches!(string_to_bytes("/tcp"), Err(Error::MissingAddress("tcp"))));
    }

    #[test]
    fn port_errors() {
        assert!(matches!(
            string_to_bytes("/ip4/127.0.0.1/udp/99999"),
            Err(Error::PortRangeFail(_))
        ));
        assert!(matches!(
            string_to_bytes("/tcp/-1"),
            Err(Error::ParseAddressFail { protocol: "tcp", .. })
        ));
        assert!(matches!(
            string_to_bytes("/sctp/jfodsajfidosajfoidsa"),
            Err(Error::ParseAddressFail { .. })
        ));
        assert_eq!(string_to_bytes("/dccp/65535").unwrap(), [0x21, 0xff, 0xff]);
    }

    #[test]
    fn ip_family_mismatch() {
        assert!(matches!(
            string_to_bytes("/ip4/::1"),
            Err(Error::InvalidIp(IpError::InvalidIpString))
        ));
        assert_eq!(
            string_to_bytes("/ip4/::ffff:10.0.0.1").unwrap(),
            string_to_bytes("/ip4/10.0.0.1").unwrap()
        );
        assert_eq!(
            bytes_to_string(&string_to_bytes("/ip6/10.0.0.1").unwrap()).unwrap(),
            "/ip6/::ffff:10.0.0.1"
        );
    }

    #[test]
    fn ipfs_is_length_prefixed() {
        let bytes =
            string_to_bytes("/ipfs/QmcgpsyWgH8Y8ajJz1Cu72KnS5uo2Aa2LpzU7kinSupNKC/tcp/1234").unwrap();
        assert_eq!(
            bytes,
            hex("a503221220d52ebb89d85b02a284948203a62ff28389c57c9f42beec4ec20db76a68911c0b0604d2")
        );
    }

    #[test]
    fn onion_host_and_port_are_one_component() {
        let address = "/onion/timaq4ygg2iegci7:80/http";
        let bytes = string_to_bytes(address).unwrap();
        assert_eq!(bytes, hex("bc039a18087306369043091f0050e003"));
        assert_eq!(bytes_to_string(&bytes).unwrap(), address);

        assert!(matches!(
            bytes_to_string(&bytes[..12]),
            Err(Error::TruncatedComponent { protocol: "onion", needed: 12, available: 10 })
        ));
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(matches!(
            bytes_to_string(&[0x91, 0x02, 0x04, 0xd2]),
            Err(Error::UnknownProtocolCode(273))
        ));
    }

    #[test]
    fn truncated_buffers_are_errors() {
        assert!(matches!(
            bytes_to_string(&hex("047f0000")),
            Err(Error::TruncatedComponent { protocol: "ip4", needed: 4, available: 3 })
        ));
        assert!(matches!(
            bytes_to_string(&hex("a50322122012")),
            Err(Error::TruncatedComponent { protocol: "ipfs", .. })
        ));
        assert!(matches!(
            bytes_to_string(&[0xa5]),
            Err(Error::InvalidVarint(VarintError::Insufficient))
        ));
        assert!(matches!(
            bytes_to_string(&[0xff; 11]),
            Err(Error::InvalidVarint(VarintError::Overflow))
        ));
    }

    #[test]
    fn inconsistent_length_prefix() {
        let ipfs = Protocol::by_name("ipfs").unwrap();
        assert!(matches!(
            address_bytes_to_string(ipfs, &[0x05, 1, 2]),
            Err(Error::InconsistentLength { declared: 5, actual: 2 })
        ));
    }

    #[test]
    fn component_sizes() {
        let tcp = Protocol::by_name("tcp").unwrap();
        let http = Protocol::by_name("http").unwrap();
        let ipfs = Protocol::by_name("ipfs").unwrap();
        let onion = Protocol::by_name("onion").unwrap();
        assert_eq!(onion.size(), Size::Fixed(80));
        assert_eq!(size_for_address(onion, &[]).unwrap(), 12);
        assert_eq!(size_for_address(tcp, &[]).unwrap(), 2);
        assert_eq!(size_for_address(http, &[]).unwrap(), 0);
        assert_eq!(size_for_address(ipfs, &[0x22]).unwrap(), 35);
    }
}
