//! Writing chunks and embedding cards.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use cardmeta_common::crc::Crc32;
use log::debug;
use serde_json::Value;

use crate::{CardKeyword, ChunkType, Chunks, Error, Result, TextChunk, PNG_SIGNATURE};

/// Append a complete chunk (length, type, payload, CRC) to `out`.
pub fn write_chunk(out: &mut Vec<u8>, chunk_type: ChunkType, payload: &[u8]) -> Result<()> {
    let length = u32::try_from(payload.len()).map_err(|_| Error::PayloadTooLarge(payload.len()))?;

    let mut hasher = Crc32::new();
    hasher.update(chunk_type.as_bytes());
    hasher.update(payload);

    out.reserve(12 + payload.len());
    out.extend_from_slice(&length.to_be_bytes());
    out.extend_from_slice(chunk_type.as_bytes());
    out.extend_from_slice(payload);
    out.extend_from_slice(&hasher.finalize().to_be_bytes());
    Ok(())
}

/// Re-emit `png` with `card` stored under `keyword`.
///
/// Every existing chunk that carries a card under the same keyword is dropped,
/// both `tEXt` chunks and structured chunks. The card is written as a base64
/// `tEXt` chunk just before `IEND`, or at the end when there is no `IEND`.
/// All other chunks are copied byte for byte.
pub fn embed_card(png: &[u8], keyword: CardKeyword, card: &Value) -> Result<Vec<u8>> {
    let json = serde_json::to_string(card)?;
    let encoded = STANDARD.encode(json);
    let payload = TextChunk {
        keyword: keyword.as_str(),
        text: &encoded,
    }
    .to_payload();

    let chunks = Chunks::new(png)?;
    let mut out = Vec::with_capacity(png.len() + payload.len() + 12);
    out.extend_from_slice(&PNG_SIGNATURE);

    let mut written = false;
    for chunk in chunks {
        let chunk = chunk?;

        if carries_keyword(chunk.chunk_type, chunk.payload, keyword) {
            debug!("dropping {} '{}' at {}", chunk.chunk_type, keyword, chunk.offset);
            continue;
        }

        if chunk.is_terminator() {
            write_chunk(&mut out, ChunkType::tEXt, &payload)?;
            written = true;
        }
        out.extend_from_slice(&png[chunk.offset..chunk.end()]);
    }

    if !written {
        write_chunk(&mut out, ChunkType::tEXt, &payload)?;
    }

    Ok(out)
}

fn carries_keyword(chunk_type: ChunkType, payload: &[u8], keyword: CardKeyword) -> bool {
    if keyword.chunk_type() == Some(chunk_type) {
        return true;
    }
    chunk_type == ChunkType::tEXt
        && TextChunk::parse(payload).is_some_and(|text| text.keyword == keyword.as_str())
}
