//! Binary reader for zero-copy parsing of byte slices.
//!
//! This module provides [`BinaryReader`], a cursor-like type that reads
//! binary data from a byte slice without copying. Every read is bounds-checked
//! and fails with [`Error::UnexpectedEof`] instead of reading past the end.

use byteorder::{BigEndian, ByteOrder};
use zerocopy::FromBytes;

use crate::{Error, Result};

/// A binary reader that provides zero-copy reading from a byte slice.
///
/// Multi-byte integers are read big-endian (network order), which is what
/// PNG and most other chunked image containers use.
///
/// # Example
///
/// ```
/// use cardmeta_common::BinaryReader;
///
/// let data = [0x00, 0x00, 0x00, 0x0D, b'I', b'H', b'D', b'R'];
/// let mut reader = BinaryReader::new(&data);
///
/// assert_eq!(reader.read_u32_be().unwrap(), 13);
/// assert_eq!(reader.read_bytes(4).unwrap(), b"IHDR");
/// assert_eq!(reader.remaining(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct BinaryReader<'a> {
    data: &'a [u8],
    position: usize,
}

impl<'a> BinaryReader<'a> {
    /// Create a new reader from a byte slice.
    #[inline]
    pub const fn new(data: &'a [u8]) -> Self {
        Self { data, position: 0 }
    }

    /// Create a new reader starting at a specific position.
    #[inline]
    pub const fn new_at(data: &'a [u8], position: usize) -> Self {
        Self { data, position }
    }

    /// Get the current position in the buffer.
    #[inline]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Get the number of bytes remaining to read.
    #[inline]
    pub const fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.position)
    }

    /// Get the remaining bytes as a slice.
    #[inline]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.data[self.position.min(self.data.len())..]
    }

    /// Peek at bytes without advancing the position.
    #[inline]
    pub fn peek_bytes(&self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::UnexpectedEof {
                needed: count,
                available: self.remaining(),
            });
        }
        Ok(&self.remaining_bytes()[..count])
    }

    /// Read bytes and advance the position.
    #[inline]
    pub fn read_bytes(&mut self, count: usize) -> Result<&'a [u8]> {
        let bytes = self.peek_bytes(count)?;
        self.position += count;
        Ok(bytes)
    }

    /// Read a big-endian u32.
    #[inline]
    pub fn read_u32_be(&mut self) -> Result<u32> {
        self.read_bytes(4).map(BigEndian::read_u32)
    }

    /// Read a null-terminated UTF-8 string.
    ///
    /// The terminator is consumed but not included in the result.
    pub fn read_cstring(&mut self) -> Result<&'a str> {
        let remaining = self.remaining_bytes();

        let null_pos = memchr::memchr(0, remaining).ok_or(Error::MissingNullTerminator)?;

        let string_bytes = &remaining[..null_pos];
        self.position += null_pos + 1;

        std::str::from_utf8(string_bytes).map_err(Error::Utf8)
    }

    /// Read a struct using zerocopy.
    ///
    /// The struct must implement `FromBytes` from the zerocopy crate.
    #[inline]
    pub fn read_struct<T: FromBytes>(&mut self) -> Result<T> {
        let size = std::mem::size_of::<T>();
        let bytes = self.read_bytes(size)?;
        T::read_from_bytes(bytes).map_err(|_| Error::UnexpectedEof {
            needed: size,
            available: bytes.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_big_endian() {
        let data = [
            0x00u8, 0x00, 0x01, 0x02, // u32: 0x00000102
            0xAE, 0x42, 0x60, 0x82, // u32: IEND CRC
        ];
        let mut reader = BinaryReader::new(&data);

        assert_eq!(reader.read_u32_be().unwrap(), 0x0102);
        assert_eq!(reader.read_u32_be().unwrap(), 0xAE42_6082);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_cstring() {
        let data = b"chara\0eyJ9";
        let mut reader = BinaryReader::new(data);

        assert_eq!(reader.read_cstring().unwrap(), "chara");
        assert_eq!(reader.position(), 6);
        assert_eq!(reader.remaining_bytes(), b"eyJ9");
    }

    #[test]
    fn test_read_cstring_without_terminator() {
        let mut reader = BinaryReader::new(b"Software");
        assert!(matches!(
            reader.read_cstring(),
            Err(Error::MissingNullTerminator)
        ));
        assert_eq!(reader.position(), 0);
    }

    #[test]
    fn test_peek_does_not_advance() {
        let reader = BinaryReader::new_at(b"....IEND", 4);

        assert_eq!(reader.peek_bytes(4).unwrap(), b"IEND");
        assert_eq!(reader.position(), 4);
    }

    #[test]
    fn test_read_struct() {
        #[derive(zerocopy::FromBytes)]
        #[repr(C)]
        struct Pair {
            a: [u8; 2],
            b: [u8; 2],
        }

        let mut reader = BinaryReader::new(b"abcde");
        let pair: Pair = reader.read_struct().unwrap();
        assert_eq!(&pair.a, b"ab");
        assert_eq!(&pair.b, b"cd");
        assert_eq!(reader.remaining(), 1);
        assert!(reader.read_struct::<Pair>().is_err());
    }

    #[test]
    fn test_eof_error() {
        let data = [0x01, 0x02];
        let mut reader = BinaryReader::new(&data);

        match reader.read_u32_be() {
            Err(Error::UnexpectedEof { needed, available }) => {
                assert_eq!(needed, 4);
                assert_eq!(available, 2);
            }
            other => panic!("expected EOF, got {other:?}"),
        }
    }

    #[test]
    fn test_position_past_end() {
        let reader = BinaryReader::new_at(&[1, 2, 3], 10);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.remaining_bytes().is_empty());
        assert!(reader.peek_bytes(1).is_err());
    }
}
