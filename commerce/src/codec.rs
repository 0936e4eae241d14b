//! Byte cursors and fixed-stride array regions.
//!
//! [`ByteReader`] reads little-endian scalars off a slice and reports a
//! [`CodecError::Truncated`] instead of panicking when the slice runs out.
//! [`ByteWriter`] is its counterpart over a pre-sized `Vec<u8>`.
//!
//! Array regions are sequences of fixed-size [`SubRecord`]s whose length
//! comes from a count stored elsewhere (usually a header field). There is
//! no terminator: the count alone decides where a region ends.

use crate::error::CodecError;
use crate::layout::Field;

/// A fixed-size element of an array region.
///
/// Every value occupies exactly [`SubRecord::SIZE`] bytes on the wire, so
/// the `n`th element of a region starts at `region_start + n * SIZE`.
pub trait SubRecord: Sized {
    /// Encoded width in bytes.
    const SIZE: usize;

    /// Writes the value into `out`, which is exactly [`Self::SIZE`] bytes
    /// long and zero-filled.
    ///
    /// # Errors
    ///
    /// Returns an error if the value cannot be represented on the wire.
    fn write_to(&self, out: &mut [u8]) -> Result<(), CodecError>;

    /// Reads a value from `bytes`, which is exactly [`Self::SIZE`] bytes
    /// long.
    ///
    /// # Errors
    ///
    /// Returns an error if the bytes do not hold a valid value.
    fn read_from(bytes: &[u8]) -> Result<Self, CodecError>;
}

/// Bounds-checked read cursor over a byte slice.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    /// Creates a reader positioned at the start of `data`.
    #[must_use]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Creates a reader positioned at `offset`. An offset past the end is
    /// allowed; the first read then fails with [`CodecError::Truncated`].
    #[must_use]
    pub const fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    /// Current byte offset into the underlying slice.
    #[must_use]
    pub const fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left from the current position.
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    /// Fails unless at least `n` bytes remain. Does not advance.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than `n` bytes remain.
    pub fn ensure(&self, n: usize) -> Result<(), CodecError> {
        if self.remaining() < n {
            return Err(CodecError::truncated(self.pos, n, self.data.len()));
        }
        Ok(())
    }

    /// Returns the next `n` bytes and advances past them.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than `n` bytes remain.
    pub fn take(&mut self, n: usize) -> Result<&'a [u8], CodecError> {
        self.ensure(n)?;
        let start = self.pos;
        self.pos += n;
        Ok(&self.data[start..self.pos])
    }

    /// Returns the bytes of `field` and advances past them.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the field does not fit.
    pub fn field(&mut self, field: &Field) -> Result<&'a [u8], CodecError> {
        self.take(field.width)
    }

    /// Reads a fixed-size byte array.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than `N` bytes remain.
    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.take(N)?);
        Ok(out)
    }

    /// Reads one byte.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] at the end of the slice.
    pub fn read_u8(&mut self) -> Result<u8, CodecError> {
        Ok(self.take(1)?[0])
    }

    /// Reads a little-endian `u16`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 2 bytes remain.
    pub fn read_u16(&mut self) -> Result<u16, CodecError> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads a little-endian `u32`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 4 bytes remain.
    pub fn read_u32(&mut self) -> Result<u32, CodecError> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads a little-endian `u64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 8 bytes remain.
    pub fn read_u64(&mut self) -> Result<u64, CodecError> {
        self.read_array().map(u64::from_le_bytes)
    }

    /// Reads a little-endian `i64`.
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if fewer than 8 bytes remain.
    pub fn read_i64(&mut self) -> Result<i64, CodecError> {
        self.read_array().map(i64::from_le_bytes)
    }

    /// Reads one [`SubRecord`].
    ///
    /// # Errors
    ///
    /// Returns [`CodecError::Truncated`] if the element does not fit, or
    /// whatever the element's own decoder raises.
    pub fn read_record<T: SubRecord>(&mut self) -> Result<T, CodecError> {
        T::read_from(self.take(T::SIZE)?)
    }
}

/// Append-only write cursor.
#[derive(Debug, Clone, Default)]
pub struct ByteWriter {
    buf: Vec<u8>,
}

impl ByteWriter {
    /// Creates a writer whose buffer can hold `capacity` bytes without
    /// reallocating.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
        }
    }

    /// Number of bytes written so far.
    #[must_use]
    pub fn position(&self) -> usize {
        self.buf.len()
    }

    /// Appends raw bytes.
    pub fn put_bytes(&mut self, bytes: &[u8]) {
        self.buf.extend_from_slice(bytes);
    }

    /// Appends one byte.
    pub fn put_u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    /// Appends a little-endian `u16`.
    pub fn put_u16(&mut self, value: u16) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `u32`.
    pub fn put_u32(&mut self, value: u32) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `u64`.
    pub fn put_u64(&mut self, value: u64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends a little-endian `i64`.
    pub fn put_i64(&mut self, value: i64) {
        self.put_bytes(&value.to_le_bytes());
    }

    /// Appends one [`SubRecord`] into a zero-filled span of
    /// [`SubRecord::SIZE`] bytes.
    ///
    /// # Errors
    ///
    /// Propagates the element's encoder error; the buffer is left at its
    /// previous length in that case.
    pub fn put_record<T: SubRecord>(&mut self, record: &T) -> Result<(), CodecError> {
        let start = self.buf.len();
        self.buf.resize(start + T::SIZE, 0);
        if let Err(e) = record.write_to(&mut self.buf[start..]) {
            self.buf.truncate(start);
            return Err(e);
        }
        Ok(())
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn into_inner(self) -> Vec<u8> {
        self.buf
    }
}

/// Converts a region length to its on-wire `u32` count.
///
/// # Errors
///
/// Returns [`CodecError::CountOverflow`] if `len` exceeds `u32::MAX`.
pub fn region_count(region: &'static str, len: usize) -> Result<u32, CodecError> {
    u32::try_from(len).map_err(|_| CodecError::CountOverflow { region, len })
}

/// Size in bytes of a region of `count` elements of type `T`.
///
/// Computed in `u64` so that any `u32` count fits.
#[must_use]
pub const fn region_size<T: SubRecord>(count: u32) -> u64 {
    count as u64 * T::SIZE as u64
}

/// Writes every element of `items` back to back.
///
/// # Errors
///
/// Propagates the first element encoder error unchanged.
pub fn write_region<T: SubRecord>(writer: &mut ByteWriter, items: &[T]) -> Result<(), CodecError> {
    items.iter().try_for_each(|item| writer.put_record(item))
}

/// Reads exactly `count` elements of type `T`.
///
/// The whole region is bounds-checked before anything is allocated, so a
/// corrupt count cannot trigger a huge allocation; each element read is
/// checked again as it happens.
///
/// # Errors
///
/// Returns [`CodecError::Truncated`] if the reader holds fewer than
/// `count * T::SIZE` bytes, or the first element decoder error.
pub fn read_region<T: SubRecord>(
    reader: &mut ByteReader<'_>,
    count: u32,
) -> Result<Vec<T>, CodecError> {
    let needed = usize::try_from(region_size::<T>(count)).unwrap_or(usize::MAX);
    reader.ensure(needed)?;
    (0..count).map(|_| reader.read_record()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Three-byte stand-in for a real element codec; `0xff` in the first
    /// byte is treated as invalid.
    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Triple([u8; 3]);

    impl SubRecord for Triple {
        const SIZE: usize = 3;

        fn write_to(&self, out: &mut [u8]) -> Result<(), CodecError> {
            if self.0[0] == 0xff {
                return Err(CodecError::UnknownPolicyType(0xff));
            }
            out.copy_from_slice(&self.0);
            Ok(())
        }

        fn read_from(bytes: &[u8]) -> Result<Self, CodecError> {
            if bytes[0] == 0xff {
                return Err(CodecError::UnknownPolicyType(0xff));
            }
            let mut out = [0u8; 3];
            out.copy_from_slice(bytes);
            Ok(Self(out))
        }
    }

    #[test]
    fn test_reader_little_endian() {
        let data = [0x01, 0x34, 0x12, 0x78, 0x56, 0x34, 0x12];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u8().unwrap(), 1);
        assert_eq!(r.read_u16().unwrap(), 0x1234);
        assert_eq!(r.read_u32().unwrap(), 0x1234_5678);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_reader_truncated_reports_position() {
        let data = [0u8; 5];
        let mut r = ByteReader::at(&data, 2);
        let err = r.read_u64().unwrap_err();
        assert_eq!(
            err,
            CodecError::Truncated {
                offset: 2,
                needed: 8,
                available: 3,
            }
        );
        // A failed read does not move the cursor.
        assert_eq!(r.position(), 2);
    }

    #[test]
    fn test_reader_offset_past_end() {
        let data = [0u8; 4];
        let mut r = ByteReader::at(&data, 10);
        assert_eq!(r.remaining(), 0);
        assert!(r.read_u8().unwrap_err().is_truncated());
    }

    #[test]
    fn test_writer_little_endian() {
        let mut w = ByteWriter::with_capacity(15);
        w.put_u8(7);
        w.put_u16(0x0102);
        w.put_u32(0x0304_0506);
        w.put_i64(-1);
        assert_eq!(
            w.into_inner(),
            vec![7, 0x02, 0x01, 0x06, 0x05, 0x04, 0x03, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]
        );
    }

    #[test]
    fn test_region_preserves_order() {
        let items = vec![Triple([1, 2, 3]), Triple([4, 5, 6]), Triple([1, 2, 3])];
        let mut w = ByteWriter::default();
        write_region(&mut w, &items).unwrap();
        let bytes = w.into_inner();
        assert_eq!(bytes, vec![1, 2, 3, 4, 5, 6, 1, 2, 3]);

        let mut r = ByteReader::new(&bytes);
        let decoded: Vec<Triple> = read_region(&mut r, 3).unwrap();
        assert_eq!(decoded, items);
        assert_eq!(r.position(), 9);
    }

    #[test]
    fn test_region_count_drives_length() {
        let bytes = [1, 2, 3, 4, 5, 6, 7, 8, 9];
        let mut r = ByteReader::new(&bytes);
        let decoded: Vec<Triple> = read_region(&mut r, 2).unwrap();
        assert_eq!(decoded.len(), 2);
        assert_eq!(r.remaining(), 3);
    }

    #[test]
    fn test_region_truncated_before_allocation() {
        let bytes = [1, 2, 3, 4];
        let mut r = ByteReader::new(&bytes);
        let err = read_region::<Triple>(&mut r, u32::MAX).unwrap_err();
        assert!(err.is_truncated());
        assert_eq!(r.position(), 0);
    }

    #[test]
    fn test_region_element_error_propagates() {
        let bytes = [1, 2, 3, 0xff, 0, 0];
        let mut r = ByteReader::new(&bytes);
        let err = read_region::<Triple>(&mut r, 2).unwrap_err();
        assert_eq!(err, CodecError::UnknownPolicyType(0xff));
    }

    #[test]
    fn test_put_record_error_leaves_buffer() {
        let mut w = ByteWriter::default();
        w.put_u8(9);
        let err = w.put_record(&Triple([0xff, 0, 0])).unwrap_err();
        assert_eq!(err, CodecError::UnknownPolicyType(0xff));
        assert_eq!(w.into_inner(), vec![9]);
    }

    #[test]
    fn test_region_size_no_overflow() {
        assert_eq!(region_size::<Triple>(u32::MAX), u64::from(u32::MAX) * 3);
    }

    #[test]
    fn test_region_count_overflow() {
        assert_eq!(region_count("keys", 5).unwrap(), 5);
        #[cfg(target_pointer_width = "64")]
        assert_eq!(
            region_count("keys", usize::MAX),
            Err(CodecError::CountOverflow {
                region: "keys",
                len: usize::MAX,
            })
        );
    }
}
