//! PNG signature validation.

use crate::{Error, Result};

/// The fixed 8-byte magic every PNG stream starts with.
pub const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Check that `data[offset..offset + 8]` is the PNG signature.
///
/// On mismatch the error names the absolute index of the first differing byte.
pub fn validate_signature(data: &[u8], offset: usize) -> Result<()> {
    let available = data.len().saturating_sub(offset);
    if available < PNG_SIGNATURE.len() {
        return Err(Error::TooSmall { offset, available });
    }

    let window = &data[offset..offset + PNG_SIGNATURE.len()];
    match window
        .iter()
        .zip(PNG_SIGNATURE.iter())
        .position(|(actual, expected)| actual != expected)
    {
        Some(i) => Err(Error::SignatureMismatch {
            index: offset + i,
            expected: PNG_SIGNATURE[i],
            actual: window[i],
        }),
        None => Ok(()),
    }
}

/// Quick check used when sniffing files.
#[inline]
pub fn has_signature(data: &[u8]) -> bool {
    data.starts_with(&PNG_SIGNATURE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_valid_signature() {
        assert!(validate_signature(&PNG_SIGNATURE, 0).is_ok());
        assert!(has_signature(&PNG_SIGNATURE));
    }

    #[test]
    fn test_sniffing() {
        let mut data = PNG_SIGNATURE.to_vec();
        data.extend_from_slice(b"trailing chunk data");
        assert!(has_signature(&data));
        assert!(!has_signature(&PNG_SIGNATURE[..7]));
        assert!(!has_signature(b"GIF89a\x01\x00"));
        assert!(!has_signature(b""));
    }

    #[test]
    fn test_short_buffers_are_format_errors() {
        for len in 0..PNG_SIGNATURE.len() {
            let err = validate_signature(&PNG_SIGNATURE[..len], 0).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Format);
            assert!(matches!(err, Error::TooSmall { available, .. } if available == len));
        }
    }

    #[test]
    fn test_mismatch_reports_each_position() {
        for i in 0..PNG_SIGNATURE.len() {
            let mut data = PNG_SIGNATURE.to_vec();
            data[i] ^= 0x20;
            match validate_signature(&data, 0) {
                Err(Error::SignatureMismatch {
                    index,
                    expected,
                    actual,
                }) => {
                    assert_eq!(index, i);
                    assert_eq!(expected, PNG_SIGNATURE[i]);
                    assert_eq!(actual, PNG_SIGNATURE[i] ^ 0x20);
                }
                other => panic!("expected mismatch at {i}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_offset_signature() {
        let mut data = vec![0u8; 3];
        data.extend_from_slice(&PNG_SIGNATURE);
        assert!(validate_signature(&data, 3).is_ok());
        assert!(matches!(
            validate_signature(&data, 4),
            Err(Error::TooSmall { offset: 4, available: 7 })
        ));

        data[5] = b'p';
        assert!(matches!(
            validate_signature(&data, 3),
            Err(Error::SignatureMismatch { index: 5, .. })
        ));
    }

    #[test]
    fn test_offset_past_end() {
        assert!(matches!(
            validate_signature(&PNG_SIGNATURE, 100),
            Err(Error::TooSmall { available: 0, .. })
        ));
    }
}
