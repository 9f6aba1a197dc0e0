//! Reading card metadata from files and streams.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::{extract_metadata_with, Error, ExtractOptions, MetadataMap, Result};

/// Read a whole stream, honoring [`ExtractOptions::stream_limit`].
///
/// At most `limit + 1` bytes are read, so an oversized stream is rejected
/// without buffering all of it.
pub fn read_capped<R: Read>(reader: R, options: &ExtractOptions) -> Result<Vec<u8>> {
    let limit = options.stream_limit();
    let cap = u64::try_from(limit).unwrap_or(u64::MAX).saturating_add(1);

    let mut data = Vec::new();
    reader.take(cap).read_to_end(&mut data)?;
    if data.len() > limit {
        return Err(Error::InputTooLarge {
            size: data.len(),
            limit,
        });
    }
    Ok(data)
}

/// Read a stream to the end and extract its card metadata.
pub fn read_metadata<R: Read>(reader: R, options: &ExtractOptions) -> Result<MetadataMap> {
    let data = read_capped(reader, options)?;
    extract_metadata_with(&data, options)
}

/// Open a file and extract its card metadata.
pub fn read_metadata_from_path<P: AsRef<Path>>(
    path: P,
    options: &ExtractOptions,
) -> Result<MetadataMap> {
    let path = path.as_ref();
    debug!("reading card metadata from {}", path.display());
    read_metadata(File::open(path)?, options)
}
