use std::{error, fmt, io};

use byteorder::{BigEndian, WriteBytesExt};

use crate::serialization::{cookie_for_word_size, Serializer, HEADER_SIZE, V2_COOKIE_BASE};
use crate::{Counter, Histogram};

/// Errors that can occur during [`V2Serializer::serialize`].
#[derive(Debug)]
pub enum V2SerializeError {
    /// An i/o error occurred while writing.
    IoError(io::Error),
}

impl fmt::Display for V2SerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            V2SerializeError::IoError(e) => write!(f, "Error while writing: {}", e),
        }
    }
}

impl error::Error for V2SerializeError {}

impl From<io::Error> for V2SerializeError {
    fn from(e: io::Error) -> Self {
        V2SerializeError::IoError(e)
    }
}

/// Serializes a histogram into this crate's binary format: a 32-byte header (cookie with the
/// counter word size folded into its high nibble, significant figures, lowest/highest trackable
/// value, total count) followed by one fixed-width big-endian count per bin.
///
/// `V2Serializer`s are intended to be re-used for many histograms; the internal buffer is retained
/// between calls.
#[derive(Debug, Default)]
pub struct V2Serializer {
    buf: Vec<u8>,
}

impl V2Serializer {
    /// Create a new serializer.
    pub fn new() -> V2Serializer {
        V2Serializer { buf: Vec::new() }
    }
}

impl Serializer for V2Serializer {
    type SerializeError = V2SerializeError;

    fn serialize<T: Counter, W: io::Write>(
        &mut self,
        h: &Histogram<T>,
        writer: &mut W,
    ) -> Result<usize, V2SerializeError> {
        self.buf.clear();
        self.buf
            .reserve(h.encoded_size().saturating_sub(self.buf.capacity()));

        self.buf
            .write_u32::<BigEndian>(cookie_for_word_size(V2_COOKIE_BASE, T::WORD_SIZE_BYTES))?;
        self.buf.write_u32::<BigEndian>(u32::from(h.sigfig()))?;
        self.buf.write_u64::<BigEndian>(h.low())?;
        self.buf.write_u64::<BigEndian>(h.high())?;
        self.buf.write_u64::<BigEndian>(h.len())?;
        debug_assert_eq!(HEADER_SIZE, self.buf.len());

        let word_size = usize::from(T::WORD_SIZE_BYTES);
        let mut word = [0u8; 8];
        for index in 0..h.distinct_values() {
            let count = h
                .count_at_index(index)
                .expect("index < distinct_values() is always in range");
            count.write_be_bytes(&mut word[..word_size]);
            self.buf.extend_from_slice(&word[..word_size]);
        }

        writer.write_all(&self.buf)?;
        Ok(self.buf.len())
    }
}
