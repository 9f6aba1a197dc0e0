//! `tEXt` chunk payloads.
//!
//! A text chunk's payload is a keyword, a single NUL separator and the text.

use cardmeta_common::BinaryReader;

/// A `tEXt` payload split into keyword and text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChunk<'a> {
    pub keyword: &'a str,
    pub text: &'a str,
}

impl<'a> TextChunk<'a> {
    /// Split a payload on its first NUL.
    ///
    /// Returns `None` when there is no separator or either side is not UTF-8.
    pub fn parse(payload: &'a [u8]) -> Option<Self> {
        let mut reader = BinaryReader::new(payload);
        let keyword = reader.read_cstring().ok()?;
        let text = std::str::from_utf8(reader.remaining_bytes()).ok()?;
        Some(Self { keyword, text })
    }

    /// Serialize back into a chunk payload.
    pub fn to_payload(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.keyword.len() + 1 + self.text.len());
        out.extend_from_slice(self.keyword.as_bytes());
        out.push(0);
        out.extend_from_slice(self.text.as_bytes());
        out
    }
}
