//! CRC-32 hashing utilities.
//!
//! This is the reflected CRC-32 used by PNG and zlib (polynomial `0xEDB88320`,
//! initial register and final XOR of `0xFFFFFFFF`). The lookup table is built at
//! compile time, so it is shared read-only by every caller.

/// Reflected form of the CRC-32 polynomial.
pub const POLYNOMIAL: u32 = 0xEDB8_8320;

/// Precomputed lookup table, one entry per byte value.
pub static TABLE: [u32; 256] = make_table();

const fn make_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut n = 0;
    while n < 256 {
        let mut c = n as u32;
        let mut k = 0;
        while k < 8 {
            if (c & 1) != 0 {
                c = POLYNOMIAL ^ (c >> 1);
            } else {
                c >>= 1;
            }
            k += 1;
        }
        table[n] = c;
        n += 1;
    }
    table
}

/// Incremental CRC-32 hasher.
///
/// Lets a checksum span several non-contiguous slices (a chunk's type tag and
/// its payload) without copying them together first.
///
/// # Example
///
/// ```
/// use cardmeta_common::crc::{crc32, Crc32};
///
/// let mut hasher = Crc32::new();
/// hasher.update(b"IE");
/// hasher.update(b"ND");
/// assert_eq!(hasher.finalize(), crc32(b"IEND"));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Crc32 {
    register: u32,
}

impl Crc32 {
    /// Create a hasher with the register primed to `0xFFFFFFFF`.
    #[inline]
    pub const fn new() -> Self {
        Self { register: u32::MAX }
    }

    /// Feed more bytes into the checksum.
    #[inline]
    pub fn update(&mut self, data: &[u8]) {
        let mut crc = self.register;
        for &byte in data {
            crc = TABLE[((crc ^ u32::from(byte)) & 0xFF) as usize] ^ (crc >> 8);
        }
        self.register = crc;
    }

    /// Finish the computation, applying the final XOR.
    #[inline]
    pub const fn finalize(self) -> u32 {
        self.register ^ u32::MAX
    }
}

impl Default for Crc32 {
    fn default() -> Self {
        Self::new()
    }
}

/// Compute the CRC-32 of a byte slice.
#[inline]
pub fn crc32(data: &[u8]) -> u32 {
    let mut hasher = Crc32::new();
    hasher.update(data);
    hasher.finalize()
}
