//! Textual IPv4 and IPv6 literals.
//!
//! Accepts dotted-decimal IPv4, and IPv6 with `::` zero-run elision, an embedded
//! dotted-decimal suffix and, where allowed, a `%zone` suffix.

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
};

use crate::errors::IpError;

pub const IPV4_LEN: usize = 4;
pub const IPV6_LEN: usize = 16;

const V4_IN_V6_PREFIX: [u8; 12] = [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xff, 0xff];

/// A parsed IP address in network byte order.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum Ip {
    V4([u8; IPV4_LEN]),
    V6([u8; IPV6_LEN]),
}

impl Ip {
    /// The 4 byte form, if this is IPv4 or an IPv4-mapped IPv6 address.
    pub fn to_ipv4(self) -> Result<[u8; IPV4_LEN], IpError> {
        match self {
            Ip::V4(octets) => Ok(octets),
            Ip::V6(bytes) if bytes[..12] == V4_IN_V6_PREFIX => {
                Ok([bytes[12], bytes[13], bytes[14], bytes[15]])
            }
            Ip::V6(_) => Err(IpError::InvalidIpString),
        }
    }

    /// The 16 byte form. IPv4 addresses become `::ffff:a.b.c.d`.
    pub fn to_ipv6(self) -> [u8; IPV6_LEN] {
        match self {
            Ip::V4(octets) => {
                let mut bytes = [0; IPV6_LEN];
                bytes[..12].copy_from_slice(&V4_IN_V6_PREFIX);
                bytes[12..].copy_from_slice(&octets);
                bytes
            }
            Ip::V6(bytes) => bytes,
        }
    }

    pub fn is_ipv4_mapped(&self) -> bool {
        matches!(self, Ip::V6(bytes) if bytes[..12] == V4_IN_V6_PREFIX)
    }
}

impl From<Ip> for IpAddr {
    fn from(ip: Ip) -> IpAddr {
        match ip {
            Ip::V4(octets) => IpAddr::V4(Ipv4Addr::from(octets)),
            Ip::V6(bytes) => IpAddr::V6(Ipv6Addr::from(bytes)),
        }
    }
}

impl fmt::Display for Ip {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        IpAddr::from(*self).fmt(f)
    }
}

/// Parse an IPv4 or IPv6 literal.
///
/// The family is picked by whichever of `.` and `:` shows up first. Zones are
/// not accepted here.
///
/// # Examples
///
/// ```
/// use multiaddr::ip::{parse, Ip};
///
/// assert_eq!(parse("127.0.0.1").unwrap(), Ip::V4([127, 0, 0, 1]));
/// assert_eq!(parse("::ffff:127.0.0.1").unwrap().to_ipv4().unwrap(), [127, 0, 0, 1]);
/// ```
pub fn parse(text: &str) -> Result<Ip, IpError> {
    for c in text.bytes() {
        match c {
            b'.' => return parse_ipv4(text).map(Ip::V4),
            b':' => return parse_ipv6(text, false).map(|(bytes, _)| Ip::V6(bytes)),
            _ => {}
        }
    }
    Err(IpError::InvalidIpString)
}

/// Parse a dotted-decimal IPv4 address.
///
/// Octets may carry leading zeros (`127.001.002.003`); they are read as decimal.
pub fn parse_ipv4(text: &str) -> Result<[u8; IPV4_LEN], IpError> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() != IPV4_LEN {
        return Err(IpError::WrongSize);
    }

    let mut octets = [0; IPV4_LEN];
    for (i, part) in parts.into_iter().enumerate() {
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return Err(IpError::BadOctet(i + 1));
        }
        octets[i] = part.parse().map_err(|_| IpError::BadOctet(i + 1))?;
    }
    Ok(octets)
}

/// Parse an IPv6 address, returning its bytes and the zone if one was given.
///
/// With `zone_allowed` the text is split at the first `%`; otherwise `%` is
/// just an invalid character.
pub fn parse_ipv6(
    text: &str,
    zone_allowed: bool,
) -> Result<([u8; IPV6_LEN], Option<&str>), IpError> {
    let (host, zone) = match text.split_once('%') {
        Some((host, zone)) if zone_allowed => (host, Some(zone)),
        _ => (text, None),
    };
    let input = host.as_bytes();

    let mut ip = [0u8; IPV6_LEN];
    let mut ellipsis: Option<usize> = None;
    let mut pos = 0;

    if input.starts_with(b"::") {
        ellipsis = Some(0);
        pos = 2;
        if pos == input.len() {
            return Ok((ip, zone));
        }
    }

    let mut written = 0;
    while written < IPV6_LEN {
        let group_start = pos;
        let mut value: u32 = 0;
        while pos < input.len() && input[pos].is_ascii_hexdigit() {
            value = (value << 4) | u32::from(hex_value(input[pos]));
            if value > 0xffff {
                return Err(IpError::InvalidIpString);
            }
            pos += 1;
        }
        if pos == group_start {
            return Err(IpError::InvalidIpString);
        }

        let separator = input.get(pos).copied();
        if separator.is_some() {
            pos += 1;
            // A separator must be followed by something.
            if pos == input.len() {
                return Err(IpError::InvalidIpString);
            }
        }

        if separator == Some(b'.') {
            if ellipsis.is_none() && written != IPV6_LEN - IPV4_LEN {
                return Err(IpError::SeparatorInWrongPosition);
            }
            if written + IPV4_LEN > IPV6_LEN {
                return Err(IpError::NotEnoughRoom);
            }
            let octets = parse_ipv4(&host[group_start..])?;
            ip[written..written + IPV4_LEN].copy_from_slice(&octets);
            written += IPV4_LEN;
            pos = input.len();
            break;
        }

        ip[written] = (value >> 8) as u8;
        ip[written + 1] = value as u8;
        written += 2;

        if pos == input.len() {
            break;
        }
        if separator != Some(b':') {
            return Err(IpError::InvalidIpString);
        }

        if input[pos] == b':' {
            if ellipsis.is_some() {
                return Err(IpError::TooManyEllipsis);
            }
            ellipsis = Some(written);
            pos += 1;
            if pos == input.len() {
                break;
            }
        }
    }

    if pos != input.len() {
        return Err(IpError::NotUsedEntireString);
    }

    if written < IPV6_LEN {
        expand_ellipsis(&mut ip, written, ellipsis)?;
    } else if ellipsis.is_some() {
        return Err(IpError::UnusedEllipsis);
    }

    Ok((ip, zone))
}

/// Move the groups written after the `::` to the end of `ip` and zero the gap.
///
/// `ip[ellipsis..written]` ends up at `ip[ellipsis + 16 - written..]`, and the
/// `16 - written` bytes starting at `ellipsis` are cleared.
pub fn expand_ellipsis(
    ip: &mut [u8; IPV6_LEN],
    written: usize,
    ellipsis: Option<usize>,
) -> Result<(), IpError> {
    let ellipsis = ellipsis.ok_or(IpError::NoEllipsisToExpand)?;
    if ellipsis > written || written > IPV6_LEN {
        return Err(IpError::NoEllipsisToExpand);
    }
    let gap = IPV6_LEN - written;
    // Overlapping ranges: `copy_within` moves them like `memmove`.
    ip.copy_within(ellipsis..written, ellipsis + gap);
    ip[ellipsis..ellipsis + gap].fill(0);
    Ok(())
}

fn hex_value(c: u8) -> u8 {
    match c {
        b'0'..=b'9' => c - b'0',
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v4(a: u8, b: u8, c: u8, d: u8) -> [u8; IPV6_LEN] {
        Ip::V4([a, b, c, d]).to_ipv6()
    }

    #[test]
    fn parse_valid() {
        let google = [
            0x20, 0x01, 0x48, 0x60, 0, 0, 0x20, 0x01, 0, 0, 0, 0, 0, 0, 0x00, 0x68,
        ];
        let cases = [
            ("127.0.1.2", v4(127, 0, 1, 2)),
            ("127.0.0.1", v4(127, 0, 0, 1)),
            ("127.001.002.003", v4(127, 1, 2, 3)),
            ("::ffff:127.1.2.3", v4(127, 1, 2, 3)),
            ("::ffff:127.001.002.003", v4(127, 1, 2, 3)),
            ("::ffff:7f01:0203", v4(127, 1, 2, 3)),
            ("0:0:0:0:0000:ffff:127.1.2.3", v4(127, 1, 2, 3)),
            ("0:0:0:0:000000:ffff:127.1.2.3", v4(127, 1, 2, 3)),
            ("0:0:0:0::ffff:127.1.2.3", v4(127, 1, 2, 3)),
            ("2001:4860:0:2001::68", google),
            ("2001:4860:0000:2001:0000:0000:0000:0068", google),
            ("::", [0; 16]),
        ];
        for (input, expected) in cases {
            assert_eq!(parse(input).unwrap().to_ipv6(), expected, "{input}");
        }
    }

    #[test]
    fn mapped_address_layout() {
        let ip = parse("::ffff:127.1.2.3").unwrap();
        let bytes = ip.to_ipv6();
        assert_eq!(&bytes[10..12], &[0xff, 0xff]);
        assert_eq!(&bytes[12..], &[127, 1, 2, 3]);
        assert!(ip.is_ipv4_mapped());
        assert_eq!(ip.to_ipv4().unwrap(), [127, 1, 2, 3]);
    }

    #[test]
    fn parse_invalid() {
        for input in [
            "127.0.0.256",
            "abc",
            "fe80::1%lo0",
            "fe80::1%911",
            "",
            "a1:a2:a3:a4::b1:b2:b3:b4",
            "1:2:3:4:5:6:7:8:9",
            "1:2:3:4:5:6:7",
            "1::2::3",
            "12345::",
            "1:",
            "::1:",
            ":1",
            "1:2:3:4:5:6:7:8::",
            "1:2:3:4:5:1.2.3.4",
            "::1.2.3",
            "1.2.3.4.",
        ] {
            assert!(parse(input).is_err(), "{input}");
        }
    }

    #[test]
    fn ipv4_errors() {
        assert_eq!(parse_ipv4("127.0.0.256"), Err(IpError::BadOctet(4)));
        assert_eq!(parse_ipv4("x.0.0.1"), Err(IpError::BadOctet(1)));
        assert_eq!(parse_ipv4("1.+2.3.4"), Err(IpError::BadOctet(2)));
        assert_eq!(parse_ipv4("1..3.4"), Err(IpError::BadOctet(2)));
        assert_eq!(parse_ipv4("1.2.3"), Err(IpError::WrongSize));
        assert_eq!(parse_ipv4("1.2.3.4.5"), Err(IpError::WrongSize));
    }

    #[test]
    fn ipv6_errors() {
        let err = |s| parse_ipv6(s, false).unwrap_err();
        assert_eq!(err("a1:a2:a3:a4::b1:b2:b3:b4"), IpError::UnusedEllipsis);
        assert_eq!(err("1::2::3"), IpError::TooManyEllipsis);
        assert_eq!(err("1:2:3"), IpError::NoEllipsisToExpand);
        assert_eq!(err("1:2:3:4:5:6:7:8:9"), IpError::NotUsedEntireString);
        assert_eq!(err("1:2:3:4:5:1.2.3.4"), IpError::SeparatorInWrongPosition);
        assert_eq!(err("1:2:3:4:5:6:7:1.2.3.4"), IpError::SeparatorInWrongPosition);
        assert_eq!(err("1:2:3:4:5:6::7:1.2.3.4"), IpError::NotEnoughRoom);
        assert_eq!(err("::1.2.3.400"), IpError::BadOctet(4));
        assert_eq!(err("10000::"), IpError::InvalidIpString);
        assert_eq!(err("g::"), IpError::InvalidIpString);
    }

    #[test]
    fn zones() {
        let (bytes, zone) = parse_ipv6("fe80::1%lo0", true).unwrap();
        assert_eq!(zone, Some("lo0"));
        assert_eq!(bytes[0..2], [0xfe, 0x80]);
        assert_eq!(bytes[15], 1);

        let (_, zone) = parse_ipv6("fe80::1", true).unwrap();
        assert_eq!(zone, None);

        assert!(parse_ipv6("fe80::1%lo0", false).is_err());
    }

    #[test]
    fn ellipsis_positions() {
        let cases = [
            ("1::", [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0]),
            ("::1", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1]),
            ("1:2:3:4:5:6:7::", [0, 1, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 0]),
            ("::2:3:4:5:6:7:8", [0, 0, 0, 2, 0, 3, 0, 4, 0, 5, 0, 6, 0, 7, 0, 8]),
            ("1::8", [0, 1, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 8]),
            ("::1.2.3.4", [0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 1, 2, 3, 4]),
            ("FE80::ABCD", [0xfe, 0x80, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0, 0xab, 0xcd]),
        ];
        for (input, expected) in cases {
            assert_eq!(parse_ipv6(input, false).unwrap().0, expected, "{input}");
        }
    }

    #[test]
    fn expand_moves_suffix_to_the_end() {
        let mut ip = [32, 1, 72, 96, 0, 0, 32, 1, 0, 104, 0, 0, 0, 0, 0, 0];
        expand_ellipsis(&mut ip, 10, Some(8)).unwrap();
        assert_eq!(ip, [32, 1, 72, 96, 0, 0, 32, 1, 0, 0, 0, 0, 0, 0, 0, 104]);

        let mut ip = [0; 16];
        assert_eq!(
            expand_ellipsis(&mut ip, 4, None),
            Err(IpError::NoEllipsisToExpand)
        );
    }

    #[test]
    fn matches_std_formatting() {
        for s in ["::1", "2601:9:4f81:9700:803e:ca65:66e8:c21", "::ffff:1.2.3.4", "1::"] {
            assert_eq!(parse(s).unwrap().to_string(), s);
        }
        assert_eq!(parse("10.0.0.1").unwrap().to_string(), "10.0.0.1");
    }
}
