//! Card metadata extraction.
//!
//! Walks the chunks of a PNG buffer and decodes every chunk that can carry a
//! character card:
//!
//! - Structured chunks whose type is a card keyword hold JSON directly. A
//!   structured chunk that fails to decode aborts the extraction.
//! - `tEXt` chunks with a card keyword hold base64-wrapped JSON, or raw JSON
//!   in hand-edited files. Text chunks that cannot be decoded are skipped.

use base64::alphabet;
use base64::engine::general_purpose::{GeneralPurpose, GeneralPurposeConfig};
use base64::engine::DecodePaddingMode;
use base64::Engine as _;
use log::debug;
use serde_json::Value;

use crate::{
    CardFormat, CardKeyword, Chunk, ChunkType, Chunks, Encoding, Error, ExtractOptions,
    MetadataEntry, MetadataMap, Result, TextChunk,
};

/// Standard alphabet, accepting card text with or without `=` padding.
const CARD_BASE64: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Extract card metadata from a complete PNG buffer using default options.
pub fn extract_metadata(data: &[u8]) -> Result<MetadataMap> {
    extract_metadata_with(data, &ExtractOptions::default())
}

/// Extract card metadata from a complete PNG buffer.
pub fn extract_metadata_with(data: &[u8], options: &ExtractOptions) -> Result<MetadataMap> {
    if let Some(limit) = options.limit() {
        if data.len() > limit {
            return Err(Error::InputTooLarge {
                size: data.len(),
                limit,
            });
        }
    }

    let mut map = MetadataMap::new();

    for chunk in Chunks::new(data)? {
        let chunk = chunk?;

        if chunk.is_terminator() && options.is_strict_terminator() && !chunk.payload.is_empty() {
            return Err(Error::InvalidTerminator {
                offset: chunk.offset,
                length: chunk.length() as u32,
            });
        }

        if let Some(keyword) = CardKeyword::from_chunk_type(chunk.chunk_type) {
            let entry = decode_structured(&chunk)?;
            debug!(
                "decoded {} chunk at {} as {}",
                chunk.chunk_type, chunk.offset, entry.format
            );
            map.insert(keyword.as_str(), entry);
        } else if chunk.chunk_type == ChunkType::tEXt {
            if let Some((keyword, entry)) = decode_text(&chunk) {
                debug!(
                    "decoded tEXt '{}' at {} as {}",
                    keyword, chunk.offset, entry.format
                );
                map.insert(keyword.as_str(), entry);
            }
        }
    }

    Ok(map)
}

/// Decode a structured metadata chunk whose payload is UTF-8 JSON.
pub fn decode_structured(chunk: &Chunk<'_>) -> Result<MetadataEntry> {
    let decode_error = |reason: String| Error::Decode {
        chunk_type: chunk.chunk_type,
        reason,
    };

    let text = std::str::from_utf8(chunk.payload).map_err(|e| decode_error(e.to_string()))?;
    let data: Value = serde_json::from_str(text).map_err(|e| decode_error(e.to_string()))?;

    Ok(MetadataEntry {
        chunk_type: chunk.chunk_type,
        format: CardFormat::classify(&data),
        data,
        size: chunk.length(),
        encoding: None,
    })
}

/// Decode a `tEXt` chunk carrying a card.
///
/// Returns `None` for text chunks without a separator, with a keyword that is
/// not a card keyword, or whose content is neither base64 JSON nor raw JSON.
pub fn decode_text(chunk: &Chunk<'_>) -> Option<(CardKeyword, MetadataEntry)> {
    let Some(text) = TextChunk::parse(chunk.payload) else {
        debug!("skipping tEXt at {}: no keyword separator", chunk.offset);
        return None;
    };

    let Some(keyword) = CardKeyword::from_keyword(text.keyword) else {
        debug!("skipping tEXt '{}' at {}", text.keyword, chunk.offset);
        return None;
    };

    let Some((data, encoding)) = decode_card_text(text.text) else {
        debug!(
            "skipping tEXt '{}' at {}: content is neither base64 nor JSON",
            keyword, chunk.offset
        );
        return None;
    };

    let entry = MetadataEntry {
        chunk_type: chunk.chunk_type,
        format: CardFormat::classify(&data),
        data,
        size: chunk.length(),
        encoding,
    };
    Some((keyword, entry))
}

/// Decode card text as base64-wrapped JSON, falling back to raw JSON.
pub fn decode_card_text(content: &str) -> Option<(Value, Option<Encoding>)> {
    let compact: String = content
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();

    if let Ok(bytes) = CARD_BASE64.decode(compact.as_bytes()) {
        if let Ok(data) = serde_json::from_slice::<Value>(&bytes) {
            return Some((data, Some(Encoding::Base64)));
        }
    }

    serde_json::from_str::<Value>(content)
        .ok()
        .map(|data| (data, None))
}
