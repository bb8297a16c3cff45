//! Text form for human-readable formats, wire bytes for everything else.

use std::fmt;

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};

use crate::Multiaddr;

impl Serialize for Multiaddr {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if serializer.is_human_readable() {
            serializer.collect_str(self)
        } else {
            serializer.serialize_bytes(self.as_ref())
        }
    }
}

impl<'de> Deserialize<'de> for Multiaddr {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        if deserializer.is_human_readable() {
            deserializer.deserialize_str(MultiaddrVisitor)
        } else {
            deserializer.deserialize_bytes(MultiaddrVisitor)
        }
    }
}

/// Accepts either representation, whatever the format claims.
struct MultiaddrVisitor;

impl MultiaddrVisitor {
    fn from_wire<E: de::Error>(bytes: &[u8]) -> Result<Multiaddr, E> {
        Multiaddr::try_from(bytes)
            .map_err(|e| E::custom(format_args!("invalid binary multiaddr: {e}")))
    }
}

impl<'de> de::Visitor<'de> for MultiaddrVisitor {
    type Value = Multiaddr;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a multiaddr such as `/ip4/127.0.0.1/tcp/80`, or its binary form")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Multiaddr, E> {
        v.parse()
            .map_err(|e| E::custom(format_args!("invalid multiaddr {v:?}: {e}")))
    }

    fn visit_bytes<E: de::Error>(self, v: &[u8]) -> Result<Multiaddr, E> {
        Self::from_wire(v)
    }

    // Formats without a native byte type hand the buffer over as a sequence.
    fn visit_seq<A: de::SeqAccess<'de>>(self, mut seq: A) -> Result<Multiaddr, A::Error> {
        let mut bytes = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(b) = seq.next_element::<u8>()? {
            bytes.push(b);
        }
        Self::from_wire(&bytes)
    }
}
