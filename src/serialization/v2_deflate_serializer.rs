use std::io::{self, Write};
use std::{error, fmt};

use byteorder::{BigEndian, WriteBytesExt};
use flate2::write::ZlibEncoder;
use flate2::Compression;

use crate::serialization::v2_serializer::{V2SerializeError, V2Serializer};
use crate::serialization::{cookie_for_word_size, Serializer, V2_COMPRESSED_COOKIE_BASE};
use crate::{Counter, Histogram};

/// Errors that can occur during [`V2DeflateSerializer::serialize`].
#[derive(Debug)]
pub enum V2DeflateSerializeError {
    /// The underlying plain serialization failed.
    InternalSerializationError(V2SerializeError),
    /// An i/o error occurred while compressing or writing.
    IoError(io::Error),
}

impl fmt::Display for V2DeflateSerializeError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            V2DeflateSerializeError::InternalSerializationError(e) => {
                write!(f, "Underlying serialization failed: {}", e)
            }
            V2DeflateSerializeError::IoError(e) => write!(f, "Error while writing: {}", e),
        }
    }
}

impl error::Error for V2DeflateSerializeError {}

impl From<io::Error> for V2DeflateSerializeError {
    fn from(e: io::Error) -> Self {
        V2DeflateSerializeError::IoError(e)
    }
}

/// Serializer for the V2 + DEFLATE binary format.
///
/// It's called "deflate" to stay consistent with the naming used in the Java implementation, but
/// it actually uses zlib's wrapper format around plain DEFLATE.
///
/// `V2DeflateSerializer`s are intended to be re-used for many histograms; the internal buffers are
/// retained between calls.
pub struct V2DeflateSerializer {
    uncompressed_buf: Vec<u8>,
    compressed_buf: Vec<u8>,
    v2_serializer: V2Serializer,
    compression: Compression,
}

impl Default for V2DeflateSerializer {
    fn default() -> Self {
        Self::new()
    }
}

impl V2DeflateSerializer {
    /// Create a new serializer using the default compression level.
    pub fn new() -> V2DeflateSerializer {
        Self::with_compression(Compression::default())
    }

    /// Create a new serializer that compresses at the given level.
    pub fn with_compression(compression: Compression) -> V2DeflateSerializer {
        V2DeflateSerializer {
            uncompressed_buf: Vec::new(),
            compressed_buf: Vec::new(),
            v2_serializer: V2Serializer::new(),
            compression,
        }
    }
}

impl Serializer for V2DeflateSerializer {
    type SerializeError = V2DeflateSerializeError;

    fn serialize<T: Counter, W: Write>(
        &mut self,
        h: &Histogram<T>,
        writer: &mut W,
    ) -> Result<usize, V2DeflateSerializeError> {
        self.uncompressed_buf.clear();
        self.compressed_buf.clear();

        self.v2_serializer
            .serialize(h, &mut self.uncompressed_buf)
            .map_err(V2DeflateSerializeError::InternalSerializationError)?;

        // Real-world histogram data tends to repeat a lot, so reserve optimistically; if we're
        // wrong it's just one more allocation the first time it's needed.
        self.compressed_buf.reserve(self.uncompressed_buf.len() / 2);
        self.compressed_buf.write_u32::<BigEndian>(cookie_for_word_size(
            V2_COMPRESSED_COOKIE_BASE,
            T::WORD_SIZE_BYTES,
        ))?;

        {
            let mut compressor = ZlibEncoder::new(&mut self.compressed_buf, self.compression);
            compressor.write_all(&self.uncompressed_buf)?;
            let _ = compressor.finish()?;
        }

        writer.write_all(&self.compressed_buf)?;
        Ok(self.compressed_buf.len())
    }
}
