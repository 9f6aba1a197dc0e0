//! Card keywords.
//!
//! The same two identifiers name both the structured metadata chunk types and
//! the `tEXt` keywords that carry card JSON.

use std::fmt;
use std::str::FromStr;

use crate::ChunkType;

/// A recognized card metadata keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CardKeyword {
    /// `chara`, written by v1/v2-era tools.
    Chara,
    /// `ccv3`, written alongside or instead of `chara` by v3-aware tools.
    Ccv3,
}

impl CardKeyword {
    pub const ALL: [CardKeyword; 2] = [CardKeyword::Chara, CardKeyword::Ccv3];

    pub const fn as_str(self) -> &'static str {
        match self {
            CardKeyword::Chara => "chara",
            CardKeyword::Ccv3 => "ccv3",
        }
    }

    /// Match a raw `tEXt` keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.as_str() == keyword)
    }

    /// The chunk type this keyword occupies when embedded as its own chunk.
    ///
    /// Chunk types are exactly four bytes, so only keywords of that length
    /// have one.
    pub fn chunk_type(self) -> Option<ChunkType> {
        let bytes: [u8; 4] = self.as_str().as_bytes().try_into().ok()?;
        Some(ChunkType(bytes))
    }

    /// Match a chunk type against the structured metadata tags.
    pub fn from_chunk_type(chunk_type: ChunkType) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|k| k.chunk_type() == Some(chunk_type))
    }
}

impl fmt::Display for CardKeyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CardKeyword {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_keyword(s).ok_or_else(|| format!("unknown card keyword: {s}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_lookup() {
        assert_eq!(CardKeyword::from_keyword("chara"), Some(CardKeyword::Chara));
        assert_eq!(CardKeyword::from_keyword("ccv3"), Some(CardKeyword::Ccv3));
        assert_eq!(CardKeyword::from_keyword("Chara"), None);
        assert_eq!(CardKeyword::from_keyword("Software"), None);
    }

    #[test]
    fn test_chunk_types() {
        assert_eq!(CardKeyword::Ccv3.chunk_type(), Some(ChunkType(*b"ccv3")));
        assert_eq!(CardKeyword::Chara.chunk_type(), None);
        assert_eq!(
            CardKeyword::from_chunk_type(ChunkType(*b"ccv3")),
            Some(CardKeyword::Ccv3)
        );
        assert_eq!(CardKeyword::from_chunk_type(ChunkType(*b"CCV3")), None);
        assert_eq!(CardKeyword::from_chunk_type(ChunkType::tEXt), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("ccv3".parse::<CardKeyword>(), Ok(CardKeyword::Ccv3));
        assert!("v3".parse::<CardKeyword>().is_err());
    }
}
