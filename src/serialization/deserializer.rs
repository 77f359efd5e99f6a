use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ReadBytesExt};
use num_traits::ToPrimitive;

use crate::errors::DeserializeError;
use crate::serialization::{
    cookie_base, word_size_from_cookie, V2_COMPRESSED_COOKIE_BASE, V2_COOKIE_BASE,
};
use crate::{Counter, Histogram};

/// Deserializer for all formats this crate writes.
///
/// Deserializers are intended to be re-used for many histograms; the internal buffer used to hold
/// compressed payloads is retained between calls.
pub struct Deserializer {
    compressed_buf: Vec<u8>,
}

impl Default for Deserializer {
    fn default() -> Self {
        Self::new()
    }
}

impl Deserializer {
    /// Create a new deserializer.
    pub fn new() -> Deserializer {
        Deserializer {
            compressed_buf: Vec::new(),
        }
    }

    /// Deserialize an encoded histogram, regardless of whether it was written by
    /// [`super::V2Serializer`] or [`super::V2DeflateSerializer`].
    pub fn deserialize<T: Counter, R: Read>(
        &mut self,
        reader: &mut R,
    ) -> Result<Histogram<T>, DeserializeError> {
        let cookie = reader.read_u32::<BigEndian>()?;
        let identity = cookie_base(cookie);

        if identity == V2_COOKIE_BASE {
            if word_size_from_cookie(cookie) != T::WORD_SIZE_BYTES {
                return Err(DeserializeError::WordSizeMismatch);
            }
            Self::deserialize_header_and_counts(reader)
        } else if identity == V2_COMPRESSED_COOKIE_BASE {
            if word_size_from_cookie(cookie) != T::WORD_SIZE_BYTES {
                return Err(DeserializeError::WordSizeMismatch);
            }

            self.compressed_buf.clear();
            reader.read_to_end(&mut self.compressed_buf)?;
            let mut decoder = flate2::read::ZlibDecoder::new(self.compressed_buf.as_slice());
            let mut inner = Vec::new();
            decoder
                .read_to_end(&mut inner)
                .map_err(DeserializeError::DecompressionFailed)?;

            let mut cursor = std::io::Cursor::new(inner);
            let inner_cookie = cursor.read_u32::<BigEndian>()?;
            if cookie_base(inner_cookie) != V2_COOKIE_BASE {
                return Err(DeserializeError::InvalidCookie);
            }
            if word_size_from_cookie(inner_cookie) != T::WORD_SIZE_BYTES {
                return Err(DeserializeError::WordSizeMismatch);
            }
            Self::deserialize_header_and_counts(&mut cursor)
        } else {
            Err(DeserializeError::InvalidCookie)
        }
    }

    fn deserialize_header_and_counts<T: Counter, R: Read>(
        reader: &mut R,
    ) -> Result<Histogram<T>, DeserializeError> {
        let sigfig = reader.read_u32::<BigEndian>()?;
        let sigfig = u8::try_from(sigfig).map_err(|_| DeserializeError::InvalidParameters)?;
        let low = reader.read_u64::<BigEndian>()?;
        let high = reader.read_u64::<BigEndian>()?;
        let total_count = reader.read_u64::<BigEndian>()?;

        let mut h =
            Histogram::new_with_bounds(low, high, sigfig).map_err(|_| DeserializeError::InvalidParameters)?;

        let len = h
            .distinct_values()
            .to_usize()
            .ok_or(DeserializeError::UsizeTypeTooSmall)?;

        let word_size = usize::from(T::WORD_SIZE_BYTES);
        let mut word = [0u8; 8];
        for index in 0..len {
            reader.read_exact(&mut word[..word_size])?;
            let count = T::read_be_bytes(&word[..word_size]);
            h.set_count_at_index(index, count)
                .map_err(|_| DeserializeError::EncodedArrayTooLong)?;
        }

        // Recompute min/max from the counts we just read, but trust the header's total_count
        // verbatim: a narrow counter type may have saturated individual bins while the wider
        // total_count kept an accurate tally, and recomputing would silently lose that fidelity.
        h.restat(len);
        h.set_total_count(total_count);
        Ok(h)
    }
}
