//! # Entity Serialisation
//!
//! Fixed little-endian encoding of entity state.
//!
//! ## Design
//!
//! - Every primitive is written with an explicit byte order, so the same
//!   state yields the same bytes on every platform
//! - Sinks are infallible: a checksum stream and a `Vec<u8>` are the only
//!   consumers and neither can fail
//! - No floating point ever reaches a serialiser

/// Destination for serialised bytes.
pub trait ByteSink {
    /// Appends bytes to the sink.
    fn put(&mut self, bytes: &[u8]);
}

impl ByteSink for Vec<u8> {
    #[inline]
    fn put(&mut self, bytes: &[u8]) {
        self.extend_from_slice(bytes);
    }
}

/// Writes primitives into a [`ByteSink`] in a fixed encoding.
pub struct DataSerialiser<'a, S: ByteSink> {
    sink: &'a mut S,
    written: usize,
}

impl<'a, S: ByteSink> DataSerialiser<'a, S> {
    /// Wraps a sink.
    pub fn new(sink: &'a mut S) -> Self {
        Self { sink, written: 0 }
    }

    /// Number of bytes written so far.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.written
    }

    /// Returns true if nothing has been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.written == 0
    }

    #[inline]
    fn put(&mut self, bytes: &[u8]) -> &mut Self {
        self.sink.put(bytes);
        self.written += bytes.len();
        self
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> &mut Self {
        self.put(&[value])
    }

    /// Writes a bool as one byte (0 or 1).
    #[inline]
    pub fn write_bool(&mut self, value: bool) -> &mut Self {
        self.write_u8(u8::from(value))
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) -> &mut Self {
        self.put(&value.to_le_bytes())
    }

    /// Writes an optional UTF-8 string as a presence byte, u16 length and bytes.
    ///
    /// Strings longer than `u16::MAX` bytes are truncated at a char boundary.
    pub fn write_opt_str(&mut self, value: Option<&str>) -> &mut Self {
        let Some(text) = value else {
            return self.write_u8(0);
        };
        let mut end = text.len().min(usize::from(u16::MAX));
        while !text.is_char_boundary(end) {
            end -= 1;
        }
        let bytes = &text.as_bytes()[..end];
        self.write_u8(1);
        // `end` is at most u16::MAX by construction
        self.write_u16(u16::try_from(bytes.len()).unwrap_or(u16::MAX));
        self.put(bytes)
    }
}

/// Types with a stable wire encoding.
///
/// The encoding is part of the network protocol: peers compare checksums
/// of it, so field order and widths must not change within a protocol
/// version.
pub trait Serialise {
    /// Writes `self` to the stream.
    fn serialise<S: ByteSink>(&self, stream: &mut DataSerialiser<'_, S>);
}
