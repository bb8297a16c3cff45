//! Implementation of [multiaddr](https://github.com/multiformats/multiaddr) in Rust.
//!
//! A multiaddr names a network endpoint as a path of protocols and their
//! addresses, e.g. `/ip4/127.0.0.1/tcp/4321`. The same address has a compact
//! binary form in which every component is `varint(code)` followed by the
//! address bytes. [`Multiaddr`] holds the binary form and converts to text on
//! demand.
//!
//! ```
//! use multiaddr::Multiaddr;
//!
//! let addr: Multiaddr = "/ip4/127.0.0.1/udp/1234".parse().unwrap();
//! assert_eq!(addr.to_vec(), [0x04, 127, 0, 0, 1, 0x11, 0x04, 0xd2]);
//!
//! let tunnel = addr.encapsulate(&"/udp/5678".parse().unwrap());
//! assert_eq!(tunnel.to_string(), "/ip4/127.0.0.1/udp/1234/udp/5678");
//! assert_eq!(tunnel.decapsulate(&"/udp/5678".parse().unwrap()).unwrap(), addr);
//! ```

pub mod codec;
pub mod content_id;
mod errors;
pub mod ip;
pub mod onion;
pub mod protocol;
pub mod varint;

#[cfg(feature = "serde")]
mod serde_impl;

use std::{
    fmt,
    net::{IpAddr, Ipv4Addr, Ipv6Addr},
    str::FromStr,
    sync::Arc,
};

pub use self::errors::{Error, IpError, Result, VarintError};
pub use self::protocol::{split_protocol_names, Protocol, Size};

/// Representation of a Multiaddr.
///
/// Always holds a valid, non-empty binary address. Two multiaddrs are equal
/// when their bytes are.
#[derive(PartialEq, Eq, Clone, Hash)]
pub struct Multiaddr {
    bytes: Arc<Vec<u8>>,
}

impl Multiaddr {
    fn from_vec(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Arc::new(bytes),
        }
    }

    /// Return the length in bytes of this multiaddress.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Always `false`: every `Multiaddr` holds at least one component.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Return a copy of this [`Multiaddr`]'s byte representation.
    pub fn to_vec(&self) -> Vec<u8> {
        Vec::from(&self.bytes[..])
    }

    /// The protocols of this address, in order.
    ///
    /// # Example
    ///
    /// ```
    /// use multiaddr::Multiaddr;
    ///
    /// let address: Multiaddr = "/ip4/127.0.0.1/udt/sctp/5678".parse().unwrap();
    /// let names = address
    ///     .protocols()
    ///     .unwrap()
    ///     .iter()
    ///     .map(|p| p.name())
    ///     .collect::<Vec<_>>();
    /// assert_eq!(names, ["ip4", "udt", "sctp"]);
    /// ```
    pub fn protocols(&self) -> Result<Vec<&'static Protocol>> {
        let mut protocols = Vec::new();
        let mut rest = &self.bytes[..];
        while !rest.is_empty() {
            let (protocol, _, next) = codec::split_component(rest)?;
            protocols.push(protocol);
            rest = next;
        }
        Ok(protocols)
    }

    /// Returns the components of this multiaddress.
    pub fn iter(&self) -> Iter<'_> {
        Iter(&self.bytes)
    }

    /// Wrap `inner` inside this address: the result is `self` followed by `inner`.
    pub fn encapsulate(&self, inner: &Multiaddr) -> Multiaddr {
        let mut bytes = Vec::with_capacity(self.len() + inner.len());
        bytes.extend_from_slice(&self.bytes);
        bytes.extend_from_slice(&inner.bytes);
        Multiaddr::from_vec(bytes)
    }

    /// Remove the last occurrence of `outer` and everything after it.
    ///
    /// Addresses not containing `outer` are returned unchanged. Use
    /// [`Multiaddr::try_decapsulate`] to tell the two cases apart.
    ///
    /// Fails with [`Error::InvalidMultiaddr`] if nothing would be left.
    pub fn decapsulate(&self, outer: &Multiaddr) -> Result<Multiaddr> {
        Ok(self.try_decapsulate(outer)?.unwrap_or_else(|| {
            tracing::trace!(address=%self, suffix=%outer, "Suffix not present, nothing to decapsulate");
            self.clone()
        }))
    }

    /// Like [`Multiaddr::decapsulate`], but returns `Ok(None)` when `outer`
    /// does not occur in this address.
    ///
    /// Matches are aligned to component boundaries, so `/tcp/1` never matches
    /// inside `/tcp/12`.
    pub fn try_decapsulate(&self, outer: &Multiaddr) -> Result<Option<Multiaddr>> {
        match self.rfind(outer) {
            None => Ok(None),
            Some(0) => Err(Error::InvalidMultiaddr),
            Some(at) => Ok(Some(Multiaddr::from_vec(self.bytes[..at].to_vec()))),
        }
    }

    /// Checks whether the given `Multiaddr` is a suffix of this `Multiaddr`.
    pub fn ends_with(&self, other: &Multiaddr) -> bool {
        let (n, m) = (self.len(), other.len());
        if n < m || m == 0 {
            return false;
        }
        self.bytes.ends_with(&other.bytes) && self.boundaries().contains(&(n - m))
    }

    /// Byte offsets at which components start, plus the total length.
    fn boundaries(&self) -> Vec<usize> {
        let mut offsets = vec![0];
        let mut offset = 0;
        for component in self.iter() {
            offset += component.encoded_len();
            offsets.push(offset);
        }
        offsets
    }

    /// Offset of the last component aligned occurrence of `needle`.
    fn rfind(&self, needle: &Multiaddr) -> Option<usize> {
        if needle.is_empty() {
            return None;
        }
        let boundaries = self.boundaries();
        boundaries.iter().rev().copied().find(|&start| {
            self.bytes[start..].starts_with(&needle.bytes)
                && boundaries.binary_search(&(start + needle.len())).is_ok()
        })
    }
}

impl fmt::Debug for Multiaddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_string().fmt(f)
    }
}

impl fmt::Display for Multiaddr {
    /// Convert a Multiaddr to a string
    ///
    /// # Example
    ///
    /// ```
    /// use multiaddr::Multiaddr;
    ///
    /// let address: Multiaddr = "/ip4/127.0.0.1/udt".parse().unwrap();
    /// assert_eq!(address.to_string(), "/ip4/127.0.0.1/udt");
    /// ```
    ///
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = codec::bytes_to_string(&self.bytes).map_err(|_| fmt::Error)?;
        f.write_str(&s)
    }
}

impl AsRef<[u8]> for Multiaddr {
    fn as_ref(&self) -> &[u8] {
        self.bytes.as_ref()
    }
}

impl<'a> IntoIterator for &'a Multiaddr {
    type Item = Component<'a>;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Iter<'a> {
        Iter(&self.bytes)
    }
}

impl FromStr for Multiaddr {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        codec::string_to_bytes(input).map(Multiaddr::from_vec)
    }
}

/// A single protocol of a [`Multiaddr`] together with its encoded address.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
pub struct Component<'a> {
    protocol: &'static Protocol,
    value: &'a [u8],
}

impl<'a> Component<'a> {
    pub fn protocol(&self) -> &'static Protocol {
        self.protocol
    }

    /// The address bytes as they appear on the wire, including any length prefix.
    pub fn value(&self) -> &'a [u8] {
        self.value
    }

    /// The textual address, or `None` for protocols without one.
    pub fn value_string(&self) -> Result<Option<String>> {
        let s = codec::address_bytes_to_string(self.protocol, self.value)?;
        Ok(if s.is_empty() { None } else { Some(s) })
    }

    fn encoded_len(&self) -> usize {
        self.protocol.encoded_code().len() + self.value.len()
    }
}

impl fmt::Display for Component<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "/{}", self.protocol)?;
        match self.value_string().map_err(|_| fmt::Error)? {
            Some(value) => write!(f, "/{value}"),
            None => Ok(()),
        }
    }
}

/// Iterator over the [`Component`]s of a `Multiaddr`.
///
/// Stops at the first malformed component, which a `Multiaddr` never contains.
pub struct Iter<'a>(&'a [u8]);

impl<'a> Iterator for Iter<'a> {
    type Item = Component<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.0.is_empty() {
            return None;
        }

        match codec::split_component(self.0) {
            Ok((protocol, value, rest)) => {
                self.0 = rest;
                Some(Component { protocol, value })
            }
            Err(_) => {
                self.0 = &[];
                None
            }
        }
    }
}

impl From<IpAddr> for Multiaddr {
    fn from(v: IpAddr) -> Multiaddr {
        match v {
            IpAddr::V4(a) => a.into(),
            IpAddr::V6(a) => a.into(),
        }
    }
}

impl From<Ipv4Addr> for Multiaddr {
    fn from(v: Ipv4Addr) -> Multiaddr {
        let mut bytes = Vec::with_capacity(5);
        varint::write(protocol::IP4, &mut bytes);
        bytes.extend_from_slice(&v.octets());
        Multiaddr::from_vec(bytes)
    }
}

impl From<Ipv6Addr> for Multiaddr {
    fn from(v: Ipv6Addr) -> Multiaddr {
        let mut bytes = Vec::with_capacity(17);
        varint::write(protocol::IP6, &mut bytes);
        bytes.extend_from_slice(&v.octets());
        Multiaddr::from_vec(bytes)
    }
}

impl TryFrom<Vec<u8>> for Multiaddr {
    type Error = Error;

    fn try_from(v: Vec<u8>) -> Result<Self> {
        Multiaddr::try_from(&v[..])
    }
}

impl<'a> TryFrom<&'a [u8]> for Multiaddr {
    type Error = Error;

    fn try_from(v: &'a [u8]) -> Result<Self> {
        // Validate by a full round trip through the text form.
        let s = codec::bytes_to_string(v)?;
        s.parse()
    }
}

impl TryFrom<String> for Multiaddr {
    type Error = Error;

    fn try_from(s: String) -> Result<Multiaddr> {
        s.parse()
    }
}

impl<'a> TryFrom<&'a str> for Multiaddr {
    type Error = Error;

    fn try_from(s: &'a str) -> Result<Multiaddr> {
        s.parse()
    }
}
