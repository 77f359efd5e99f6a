//! Serialization/deserialization support.
//!
//! This crate uses a single, simple binary format: a 32-byte fixed header followed by one
//! fixed-width big-endian count per histogram bin. The header records enough to reconstruct the
//! histogram's layout (`lowest_discernible_value`, `highest_trackable_value`,
//! `significant_value_digits`) and counter width, so a decoded histogram always has the same shape
//! as the one that was encoded.
//!
//! These formats are intended for archival or transmission to other systems for further analysis.
//! A typical use case would be to periodically serialize a histogram, save it somewhere, and reset
//! the histogram. Histograms are designed to be added together, so an hour's worth of serialized
//! minute-granularity histograms can be deserialized, summed, and queried as if they had always
//! been one histogram.
//!
//! # API
//!
//! Each serialization format has its own serializer struct, but since each format is reliably
//! distinguishable from the others by its leading cookie, there is only one [`Deserializer`] that
//! will work for any of the formats this module implements.
//!
//! Serializers and deserializers are intended to be re-used for many histograms; their internal
//! buffers are retained between calls.
//!
//! # Examples
//!
//! ```
//! use hdr_histogram_core::serialization::{Deserializer, Serializer, V2Serializer};
//! use hdr_histogram_core::Histogram;
//!
//! let mut vec = Vec::new();
//! let orig_histogram = Histogram::<u64>::new_with_max(3600000, 3).unwrap();
//! V2Serializer::new().serialize(&orig_histogram, &mut vec).unwrap();
//!
//! let _histogram: Histogram<u64> = Deserializer::new()
//!     .deserialize(&mut vec.as_slice()).unwrap();
//! ```

use std::{fmt, io};

use crate::{Counter, Histogram};


mod v2_serializer;
pub use self::v2_serializer::{V2SerializeError, V2Serializer};

mod v2_deflate_serializer;
pub use self::v2_deflate_serializer::{V2DeflateSerializeError, V2DeflateSerializer};

mod deserializer;
pub use self::deserializer::Deserializer;

/// Base cookie for the uncompressed frame. The actual cookie written to the wire is this base
/// plus `word_size_bytes << 4`, so the counter width travels in the cookie itself rather than in a
/// separate header byte.
pub(crate) const V2_COOKIE_BASE: u32 = 0x1c84_9308;

/// Base cookie for the zlib-wrapped frame, encoded the same way as [`V2_COOKIE_BASE`].
pub(crate) const V2_COMPRESSED_COOKIE_BASE: u32 = 0x1c84_9309;

/// cookie(4) + significant_digits(4) + lowest(8) + highest(8) + total_count(8)
pub(crate) const HEADER_SIZE: usize = 32;

/// Builds the on-the-wire cookie for a given base and counter word size.
pub(crate) fn cookie_for_word_size(base: u32, word_size_bytes: u8) -> u32 {
    base + (u32::from(word_size_bytes) << 4)
}

/// Recovers the counter word size encoded in the cookie's high nibble.
pub(crate) fn word_size_from_cookie(cookie: u32) -> u8 {
    ((cookie >> 4) & 0xf) as u8
}

/// Strips the word-size nibble back out, leaving the base cookie to compare against
/// [`V2_COOKIE_BASE`] / [`V2_COMPRESSED_COOKIE_BASE`].
pub(crate) fn cookie_base(cookie: u32) -> u32 {
    cookie & !0xf0
}

/// Histogram serializer.
///
/// Different implementations serialize to different formats.
pub trait Serializer {
    /// Error type returned when serialization fails.
    type SerializeError: fmt::Debug;

    /// Serialize the histogram into the provided writer.
    /// Returns the number of bytes written, or an error.
    ///
    /// Note that `Vec<u8>` is a reasonable `Write` implementation for simple usage.
    fn serialize<T: Counter, W: io::Write>(
        &mut self,
        h: &Histogram<T>,
        writer: &mut W,
    ) -> Result<usize, Self::SerializeError>;
}

impl<T: Counter> Histogram<T> {
    /// The number of bytes [`V2Serializer`] will write for this histogram: a 32-byte header plus
    /// one fixed-width count per bin.
    pub fn encoded_size(&self) -> usize {
        HEADER_SIZE + self.distinct_values() * usize::from(T::WORD_SIZE_BYTES)
    }

    /// Serialize this histogram using [`V2Serializer`], returning the number of bytes written.
    pub fn encode<W: io::Write>(&self, writer: &mut W) -> Result<usize, V2SerializeError> {
        V2Serializer::new().serialize(self, writer)
    }

    /// Serialize this histogram using [`V2DeflateSerializer`] at the given compression level,
    /// returning the number of bytes written.
    pub fn encode_compressed<W: io::Write>(
        &self,
        writer: &mut W,
        compression: flate2::Compression,
    ) -> Result<usize, V2DeflateSerializeError> {
        V2DeflateSerializer::with_compression(compression).serialize(self, writer)
    }
}
