//! Common utilities for cardmeta.
//!
//! This crate provides the foundational pieces the container parsers build on:
//!
//! - [`BinaryReader`] - Bounds-checked, zero-copy reading from byte slices
//! - [`crc`] - Table-driven CRC-32 as used by PNG and zlib

mod error;
mod reader;

pub mod crc;

pub use error::{Error, Result};
pub use reader::BinaryReader;
