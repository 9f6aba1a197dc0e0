//! cardmeta - character card metadata extraction library.
//!
//! This crate provides a unified interface to the cardmeta crates.
//!
//! # Crates
//!
//! - [`cardmeta_common`] - Common utilities (binary reading, CRC-32)
//! - [`cardmeta_png`] - PNG chunk walking and card decoding
//!
//! # Example
//!
//! ```no_run
//! use cardmeta::prelude::*;
//!
//! let metadata = read_metadata_from_path("card.png", &ExtractOptions::default())?;
//! if let Some(entry) = metadata.get("chara") {
//!     println!("{} card, {} bytes", entry.format, entry.size);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

// Re-export all sub-crates
pub use cardmeta_common as common;
pub use cardmeta_png as png;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use cardmeta_common::{crc, BinaryReader};
    pub use cardmeta_png::{
        embed_card, extract_metadata, extract_metadata_with, read_metadata,
        read_metadata_from_path, CardFormat, CardKeyword, Chunk, ChunkType, Chunks, Encoding,
        ExtractOptions, MetadataEntry, MetadataMap,
    };
}

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
