//! PNG chunk headers and the chunk walker.
//!
//! Every chunk is laid out as:
//! - 4 bytes: payload length (big-endian, payload only)
//! - 4 bytes: ASCII type tag (case-significant)
//! - N bytes: payload
//! - 4 bytes: CRC-32 over type tag + payload (big-endian)

use std::fmt;
use std::iter::FusedIterator;

use cardmeta_common::crc::Crc32;
use cardmeta_common::BinaryReader;
use log::trace;
use serde::{Serialize, Serializer};
use zerocopy::byteorder::big_endian::U32;
use zerocopy::{FromBytes, Immutable, IntoBytes, KnownLayout};

use crate::signature::{validate_signature, PNG_SIGNATURE};
use crate::{Error, Result};

/// Size of the length + type header.
pub const CHUNK_HEADER_LEN: usize = 8;

/// Size of the trailing CRC.
pub const CRC_LEN: usize = 4;

/// A 4-byte chunk type tag.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct ChunkType(pub [u8; 4]);

#[allow(non_upper_case_globals)]
impl ChunkType {
    pub const IHDR: Self = Self(*b"IHDR");
    pub const IDAT: Self = Self(*b"IDAT");
    pub const IEND: Self = Self(*b"IEND");
    pub const tEXt: Self = Self(*b"tEXt");

    /// Raw tag bytes.
    #[inline]
    pub const fn as_bytes(&self) -> &[u8; 4] {
        &self.0
    }
}

impl From<[u8; 4]> for ChunkType {
    fn from(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }
}

impl fmt::Display for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &b in &self.0 {
            let c = if b.is_ascii_graphic() { b as char } else { '.' };
            fmt::Write::write_char(f, c)?;
        }
        Ok(())
    }
}

impl fmt::Debug for ChunkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ChunkType({self})")
    }
}

impl Serialize for ChunkType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// On-disk chunk header.
#[derive(Debug, Clone, Copy, FromBytes, IntoBytes, Immutable, KnownLayout)]
#[repr(C)]
struct RawChunkHeader {
    length: U32,
    chunk_type: [u8; 4],
}

/// A decoded chunk header with the offsets it implies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkHeader {
    /// Payload length in bytes.
    pub length: u32,
    pub chunk_type: ChunkType,
    /// Absolute offset of the first payload byte.
    pub payload_offset: usize,
    /// Absolute offset of the stored CRC.
    pub crc_offset: usize,
}

impl ChunkHeader {
    /// Read and bounds-check the header of the chunk starting at `offset`.
    ///
    /// Fails if the header itself, or the declared payload plus CRC, would
    /// extend past the end of `data`. The payload is not touched.
    pub fn read(data: &[u8], offset: usize) -> Result<Self> {
        let mut reader = BinaryReader::new_at(data, offset);
        if reader.remaining() < CHUNK_HEADER_LEN {
            return Err(Error::TruncatedHeader {
                offset,
                available: reader.remaining(),
            });
        }

        let raw: RawChunkHeader = reader.read_struct()?;
        let length = raw.length.get();
        let chunk_type = ChunkType(raw.chunk_type);

        let fits = (length as usize)
            .checked_add(CRC_LEN)
            .is_some_and(|needed| needed <= reader.remaining());
        if !fits {
            return Err(Error::TruncatedContent {
                offset,
                chunk_type,
                length,
                available: data.len() - offset,
            });
        }

        let payload_offset = reader.position();
        Ok(Self {
            length,
            chunk_type,
            payload_offset,
            crc_offset: payload_offset + length as usize,
        })
    }
}

/// A CRC-verified chunk borrowed from the PNG buffer.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    pub chunk_type: ChunkType,
    pub payload: &'a [u8],
    /// Absolute offset of the chunk's length field.
    pub offset: usize,
    pub payload_offset: usize,
    pub crc_offset: usize,
    pub crc: u32,
}

impl<'a> Chunk<'a> {
    /// Read the chunk starting at `offset` and verify its CRC.
    pub fn read(data: &'a [u8], offset: usize) -> Result<Self> {
        let header = ChunkHeader::read(data, offset)?;

        let mut reader = BinaryReader::new_at(data, header.payload_offset);
        let payload = reader.read_bytes(header.length as usize)?;
        let stored = reader.read_u32_be()?;

        let mut hasher = Crc32::new();
        hasher.update(header.chunk_type.as_bytes());
        hasher.update(payload);
        let computed = hasher.finalize();

        if computed != stored {
            return Err(Error::CrcMismatch {
                chunk_type: header.chunk_type,
                offset,
                expected: stored,
                computed,
            });
        }

        Ok(Self {
            chunk_type: header.chunk_type,
            payload,
            offset,
            payload_offset: header.payload_offset,
            crc_offset: header.crc_offset,
            crc: stored,
        })
    }

    /// Payload length in bytes.
    #[inline]
    pub fn length(&self) -> usize {
        self.payload.len()
    }

    /// Offset of the byte just past this chunk's CRC.
    #[inline]
    pub fn end(&self) -> usize {
        self.crc_offset + CRC_LEN
    }

    #[inline]
    pub fn is_terminator(&self) -> bool {
        self.chunk_type == ChunkType::IEND
    }
}

impl fmt::Debug for Chunk<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chunk")
            .field("chunk_type", &self.chunk_type)
            .field("offset", &self.offset)
            .field("length", &self.payload.len())
            .field("crc", &format_args!("{:#010x}", self.crc))
            .finish()
    }
}

/// Iterator over the chunks of a PNG buffer.
///
/// Starts right after the signature and stops after `IEND` or at the end of
/// the buffer, whichever comes first. A missing `IEND` is not an error. The
/// first error is yielded once and then the iterator is exhausted.
///
/// The iterator only borrows the buffer, so cloning it restarts the walk from
/// the clone point.
#[derive(Debug, Clone)]
pub struct Chunks<'a> {
    data: &'a [u8],
    offset: usize,
    done: bool,
}

impl<'a> Chunks<'a> {
    /// Validate the signature and position the walker on the first chunk.
    pub fn new(data: &'a [u8]) -> Result<Self> {
        validate_signature(data, 0)?;
        Ok(Self {
            data,
            offset: PNG_SIGNATURE.len(),
            done: false,
        })
    }
}

impl<'a> Iterator for Chunks<'a> {
    type Item = Result<Chunk<'a>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.offset >= self.data.len() {
            self.done = true;
            return None;
        }

        match Chunk::read(self.data, self.offset) {
            Ok(chunk) => {
                trace!(
                    "chunk {} at {} ({} bytes)",
                    chunk.chunk_type,
                    chunk.offset,
                    chunk.length()
                );
                self.offset = chunk.end();
                if chunk.is_terminator() {
                    self.done = true;
                }
                Some(Ok(chunk))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for Chunks<'_> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::writer::write_chunk;
    use crate::ErrorKind;

    fn png(chunks: &[(ChunkType, &[u8])]) -> Vec<u8> {
        let mut out = PNG_SIGNATURE.to_vec();
        for (chunk_type, payload) in chunks {
            write_chunk(&mut out, *chunk_type, payload).unwrap();
        }
        out
    }

    #[test]
    fn test_walks_until_iend() {
        let data = png(&[
            (ChunkType::IHDR, &[0u8; 13]),
            (ChunkType::IDAT, b"\x78\x9c"),
            (ChunkType::IEND, b""),
            (ChunkType::tEXt, b"after\0end"),
        ]);

        let chunks: Vec<_> = Chunks::new(&data).unwrap().collect::<Result<_>>().unwrap();
        let types: Vec<_> = chunks.iter().map(|c| c.chunk_type).collect();
        assert_eq!(types, [ChunkType::IHDR, ChunkType::IDAT, ChunkType::IEND]);

        assert_eq!(chunks[0].offset, 8);
        assert_eq!(chunks[0].payload_offset, 16);
        assert_eq!(chunks[0].crc_offset, 29);
        assert_eq!(chunks[1].offset, 33);
        assert_eq!(chunks[1].payload, b"\x78\x9c");
        assert_eq!(chunks[2].crc, 0xAE42_6082);
    }

    #[test]
    fn test_missing_iend_is_tolerated() {
        let data = png(&[(ChunkType::IHDR, &[1u8; 13])]);
        let chunks: Vec<_> = Chunks::new(&data).unwrap().collect::<Result<_>>().unwrap();
        assert_eq!(chunks.len(), 1);
    }

    #[test]
    fn test_signature_only() {
        assert_eq!(Chunks::new(&PNG_SIGNATURE).unwrap().count(), 0);
    }

    #[test]
    fn test_truncated_header() {
        let mut data = png(&[(ChunkType::IHDR, &[0u8; 13])]);
        data.extend_from_slice(&[0, 0, 0]);

        let results: Vec<_> = Chunks::new(&data).unwrap().collect();
        assert_eq!(results.len(), 2);
        assert!(matches!(
            results[1],
            Err(Error::TruncatedHeader { offset: 33, available: 3 })
        ));
    }

    #[test]
    fn test_truncated_content() {
        let mut data = png(&[(ChunkType::tEXt, b"chara\0abc")]);
        data.pop();

        let err = Chunks::new(&data).unwrap().next().unwrap().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Truncated);
        assert!(matches!(
            err,
            Error::TruncatedContent { chunk_type: ChunkType::tEXt, length: 9, .. }
        ));
    }

    #[test]
    fn test_huge_declared_length_fails_fast() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(&u32::MAX.to_be_bytes());
        data.extend_from_slice(b"IDAT");
        data.extend_from_slice(&[0u8; 16]);

        let err = ChunkHeader::read(&data, 8).unwrap_err();
        assert!(matches!(
            err,
            Error::TruncatedContent { length: u32::MAX, available: 24, .. }
        ));
    }

    #[test]
    fn test_crc_bit_flip_is_integrity_error() {
        let data = png(&[(ChunkType::IHDR, &[0u8; 13]), (ChunkType::IEND, b"")]);

        for bit in 0..32 {
            let mut corrupt = data.clone();
            let crc_offset = 8 + 8 + 13;
            let mut crc = u32::from_be_bytes(corrupt[crc_offset..crc_offset + 4].try_into().unwrap());
            crc ^= 1 << bit;
            corrupt[crc_offset..crc_offset + 4].copy_from_slice(&crc.to_be_bytes());

            let err = Chunks::new(&corrupt).unwrap().next().unwrap().unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Integrity);
            match err {
                Error::CrcMismatch {
                    chunk_type,
                    expected,
                    computed,
                    ..
                } => {
                    assert_eq!(chunk_type, ChunkType::IHDR);
                    assert_eq!(expected, crc);
                    assert_eq!(computed ^ (1 << bit), crc);
                }
                other => panic!("expected CRC mismatch, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_fused_after_error() {
        let mut data = png(&[(ChunkType::IHDR, &[0u8; 13])]);
        data[20] ^= 0xFF;

        let mut chunks = Chunks::new(&data).unwrap();
        assert!(chunks.next().unwrap().is_err());
        assert!(chunks.next().is_none());
        assert!(chunks.next().is_none());
    }

    #[test]
    fn test_clone_restarts_from_position() {
        let data = png(&[
            (ChunkType::IHDR, &[0u8; 13]),
            (ChunkType::tEXt, b"Title\0x"),
            (ChunkType::IEND, b""),
        ]);

        let mut chunks = Chunks::new(&data).unwrap();
        chunks.next();
        let snapshot = chunks.clone();
        assert_eq!(chunks.count(), 2);
        assert_eq!(snapshot.count(), 2);
    }

    #[test]
    fn test_chunk_type_display() {
        assert_eq!(ChunkType::tEXt.to_string(), "tEXt");
        assert_eq!(ChunkType(*b"ab\0c").to_string(), "ab.c");
        assert_ne!(ChunkType(*b"ccv3"), ChunkType(*b"CCV3"));
    }
}
