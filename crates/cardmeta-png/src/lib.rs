//! PNG character card metadata reader.
//!
//! Character cards are PNG images with a JSON character definition embedded in
//! their chunk stream. This crate walks the chunks of an in-memory PNG, checks
//! every chunk's CRC-32 and recovers the embedded cards.
//!
//! # Carriers
//!
//! A card is found in one of two places:
//! - A structured chunk whose type is a card keyword (`ccv3`), holding UTF-8
//!   JSON directly
//! - A `tEXt` chunk with keyword `chara` or `ccv3`, holding base64-encoded
//!   JSON, or raw JSON in hand-edited files
//!
//! Each decoded card is classified by its `spec` marker as v1, v2, v3 or
//! unknown.
//!
//! # Example
//!
//! ```no_run
//! use cardmeta_png::{extract_metadata, CardFormat};
//!
//! let bytes = std::fs::read("Seraphina.png")?;
//! let metadata = extract_metadata(&bytes)?;
//!
//! for (key, entry) in metadata.iter() {
//!     println!("{key}: {} ({} bytes)", entry.format, entry.size);
//! }
//!
//! if let Some(card) = metadata.primary() {
//!     if card.format == CardFormat::V3 {
//!         println!("name: {}", card.data["data"]["name"]);
//!     }
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod chunk;
mod error;
mod extract;
mod file;
mod format;
mod keyword;
mod metadata;
mod options;
mod signature;
mod text;
mod writer;

pub use chunk::{Chunk, ChunkHeader, ChunkType, Chunks, CHUNK_HEADER_LEN, CRC_LEN};
pub use error::{Error, ErrorKind, Result};
pub use extract::{
    decode_card_text, decode_structured, decode_text, extract_metadata, extract_metadata_with,
};
pub use file::{read_capped, read_metadata, read_metadata_from_path};
pub use format::{CardFormat, SPEC_FIELD, SPEC_V2, SPEC_V3};
pub use keyword::CardKeyword;
pub use metadata::{Encoding, MetadataEntry, MetadataMap};
pub use options::{ExtractOptions, DEFAULT_MAX_INPUT_LEN};
pub use signature::{has_signature, validate_signature, PNG_SIGNATURE};
pub use text::TextChunk;
pub use writer::{embed_card, write_chunk};
