use byteorder::{BigEndian, ByteOrder};
use num_traits;

/// This trait represents the operations a histogram must be able to perform on the underlying
/// counter type. The `ToPrimitive` trait is needed to perform floating point operations on the
/// counts (usually for quantiles). The `FromPrimitive` to convert back into an integer count.
/// Partial ordering is used for threshholding, also usually in the context of quantiles.
///
/// Only `u16`, `u32`, and `u64` implement this trait; the wire format fixes each counter's
/// encoded width at 2, 4, or 8 bytes, and a `u8` counter can't represent that.
pub trait Counter
    : num_traits::Num + num_traits::ToPrimitive + num_traits::FromPrimitive
    + num_traits::Saturating + num_traits::CheckedSub + num_traits::CheckedAdd
    + Copy + PartialOrd<Self> {

    /// Number of bytes this counter occupies in the wire format. One of 2, 4, or 8.
    const WORD_SIZE_BYTES: u8;

    /// Counter as a f64.
    fn as_f64(&self) -> f64;
    /// Counter as a u64.
    fn as_u64(&self) -> u64;

    /// Write this counter into `buf` as `WORD_SIZE_BYTES` big-endian bytes.
    fn write_be_bytes(&self, buf: &mut [u8]);
    /// Read a counter of this type from the first `WORD_SIZE_BYTES` big-endian bytes of `buf`.
    fn read_be_bytes(buf: &[u8]) -> Self;
}

impl Counter for u16 {
    const WORD_SIZE_BYTES: u8 = 2;

    #[inline]
    fn as_f64(&self) -> f64 { *self as f64 }
    #[inline]
    fn as_u64(&self) -> u64 { *self as u64 }

    #[inline]
    fn write_be_bytes(&self, buf: &mut [u8]) {
        BigEndian::write_u16(buf, *self);
    }

    #[inline]
    fn read_be_bytes(buf: &[u8]) -> Self {
        BigEndian::read_u16(buf)
    }
}

impl Counter for u32 {
    const WORD_SIZE_BYTES: u8 = 4;

    #[inline]
    fn as_f64(&self) -> f64 { *self as f64 }
    #[inline]
    fn as_u64(&self) -> u64 { *self as u64 }

    #[inline]
    fn write_be_bytes(&self, buf: &mut [u8]) {
        BigEndian::write_u32(buf, *self);
    }

    #[inline]
    fn read_be_bytes(buf: &[u8]) -> Self {
        BigEndian::read_u32(buf)
    }
}

impl Counter for u64 {
    const WORD_SIZE_BYTES: u8 = 8;

    #[inline]
    fn as_f64(&self) -> f64 { *self as f64 }
    #[inline]
    fn as_u64(&self) -> u64 { *self }

    #[inline]
    fn write_be_bytes(&self, buf: &mut [u8]) {
        BigEndian::write_u64(buf, *self);
    }

    #[inline]
    fn read_be_bytes(buf: &[u8]) -> Self {
        BigEndian::read_u64(buf)
    }
}
