//! # Entity Checksums
//!
//! A digest of every deterministic entity, compared between networked peers
//! after each tick to detect divergence.
//!
//! Entities are fed kind by kind in [`EntityKind::CHECKSUMMED`] order and
//! by ascending id within a kind, through the same encoding used for
//! replication. SipHash-2-4 with fixed zero keys turns the byte stream into
//! 128 bits; the keys are public, this is an integrity check, not a MAC.

use std::fmt;
use std::hash::Hasher as _;

use siphasher::sip128::{Hasher128, SipHasher24};

use crate::entity::{Entity, EntityKind, KindLists};
use crate::serialise::{ByteSink, DataSerialiser, Serialise};

/// 128-bit entity state digest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct EntityChecksum(pub [u8; 16]);

impl EntityChecksum {
    /// The all-zero digest produced when checksums are compiled out.
    pub const ZERO: Self = Self([0; 16]);

    /// Returns true for the all-zero digest.
    #[inline]
    #[must_use]
    pub fn is_zero(&self) -> bool {
        *self == Self::ZERO
    }

    /// Raw digest bytes.
    #[inline]
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; 16] {
        &self.0
    }

    /// Lowercase hex rendering, 32 characters.
    #[must_use]
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for EntityChecksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// Byte sink feeding an incremental SipHash-2-4.
#[derive(Clone, Debug)]
pub struct ChecksumStream {
    hasher: SipHasher24,
}

impl ChecksumStream {
    /// Starts an empty stream.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hasher: SipHasher24::new_with_keys(0, 0),
        }
    }

    /// Digest of everything written so far.
    #[must_use]
    pub fn finish(&self) -> EntityChecksum {
        let hash = self.hasher.finish128();
        let mut bytes = [0; 16];
        bytes[..8].copy_from_slice(&hash.h1.to_le_bytes());
        bytes[8..].copy_from_slice(&hash.h2.to_le_bytes());
        EntityChecksum(bytes)
    }
}

impl Default for ChecksumStream {
    fn default() -> Self {
        Self::new()
    }
}

impl ByteSink for ChecksumStream {
    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.hasher.write(bytes);
    }
}

/// Writes every entity of `kind` to `stream`, ascending id.
pub fn serialise_kind<S: ByteSink>(
    entities: &[Entity],
    lists: &KindLists,
    kind: EntityKind,
    stream: &mut DataSerialiser<'_, S>,
) {
    for id in lists.ids(kind) {
        if let Some(entity) = entities.get(id.index()) {
            entity.serialise(stream);
        }
    }
}

/// Digest of every checksummed kind.
#[cfg(feature = "network")]
#[must_use]
pub fn compute(entities: &[Entity], lists: &KindLists) -> EntityChecksum {
    let mut sink = ChecksumStream::new();
    let mut stream = DataSerialiser::new(&mut sink);
    for kind in EntityKind::CHECKSUMMED {
        serialise_kind(entities, lists, kind, &mut stream);
    }
    sink.finish()
}

/// Checksums are compiled out: always [`EntityChecksum::ZERO`].
#[cfg(not(feature = "network"))]
#[must_use]
pub fn compute(_entities: &[Entity], _lists: &KindLists) -> EntityChecksum {
    EntityChecksum::ZERO
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_rendering() {
        let mut bytes = [0; 16];
        bytes[0] = 0xAB;
        bytes[15] = 0x01;
        let checksum = EntityChecksum(bytes);
        let hex = checksum.to_hex();
        assert_eq!(hex.len(), 32);
        assert!(hex.starts_with("ab00"));
        assert!(hex.ends_with("01"));
        assert!(EntityChecksum::ZERO.is_zero());
    }

    #[test]
    fn test_stream_is_order_sensitive() {
        let mut a = ChecksumStream::new();
        a.put(&[1, 2]);
        a.put(&[3]);
        let mut b = ChecksumStream::new();
        b.put(&[3]);
        b.put(&[1, 2]);
        assert_ne!(a.finish(), b.finish());

        let mut c = ChecksumStream::new();
        c.put(&[1, 2]);
        c.put(&[3]);
        assert_eq!(a.finish(), c.finish());
    }

    #[cfg(feature = "network")]
    #[test]
    fn test_empty_world_digest_is_stable() {
        let lists = KindLists::new();
        let first = compute(&[], &lists);
        assert_eq!(first, compute(&[], &lists));
        assert_eq!(first, ChecksumStream::new().finish());
    }

    #[cfg(not(feature = "network"))]
    #[test]
    fn test_compiled_out_digest_is_zero() {
        assert!(compute(&[], &KindLists::new()).is_zero());
    }
}
