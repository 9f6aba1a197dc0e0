//! Extraction options.

/// Cap applied when reading from a stream or file and no explicit limit is set.
pub const DEFAULT_MAX_INPUT_LEN: usize = 64 * 1024 * 1024;

/// Knobs for [`extract_metadata_with`](crate::extract_metadata_with).
///
/// # Example
///
/// ```
/// use cardmeta_png::ExtractOptions;
///
/// let options = ExtractOptions::new()
///     .max_input_len(Some(8 * 1024 * 1024))
///     .strict_terminator(true);
/// assert!(options.is_strict_terminator());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractOptions {
    max_input_len: Option<usize>,
    strict_terminator: bool,
}

impl ExtractOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject inputs longer than `limit` bytes.
    ///
    /// `None` (the default) leaves in-memory buffers uncapped. Stream and file
    /// reads still stop at [`DEFAULT_MAX_INPUT_LEN`] unless a limit is set.
    pub fn max_input_len(mut self, limit: Option<usize>) -> Self {
        self.max_input_len = limit;
        self
    }

    /// Fail on an `IEND` chunk that carries a payload.
    pub fn strict_terminator(mut self, strict: bool) -> Self {
        self.strict_terminator = strict;
        self
    }

    pub fn limit(&self) -> Option<usize> {
        self.max_input_len
    }

    /// Number of bytes a stream read may buffer.
    pub fn stream_limit(&self) -> usize {
        self.max_input_len.unwrap_or(DEFAULT_MAX_INPUT_LEN)
    }

    pub fn is_strict_terminator(&self) -> bool {
        self.strict_terminator
    }
}

impl Default for ExtractOptions {
    fn default() -> Self {
        Self {
            max_input_len: None,
            strict_terminator: false,
        }
    }
}
