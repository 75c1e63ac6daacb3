//! The djb2 string hash and bucket selection.
//!
//! The hash is deterministic and platform independent: bytes are read as
//! unsigned values and the accumulator is a `u32` with wrapping arithmetic,
//! so the same key lands in the same bucket on every target.

/// Initial accumulator value for djb2.
pub const DJB2_SEED: u32 = 5381;

/// Hash a byte string with djb2 (`acc = acc * 33 + byte`).
pub const fn djb2(bytes: &[u8]) -> u32 {
    let mut acc = DJB2_SEED;
    let mut i = 0;
    while i < bytes.len() {
        acc = (acc << 5).wrapping_add(acc).wrapping_add(bytes[i] as u32);
        i += 1;
    }
    acc
}

/// Map a hash onto one of `capacity` buckets.
///
/// `capacity` must be non-zero.
#[inline]
pub fn bucket_index(hash: u32, capacity: usize) -> usize {
    debug_assert!(capacity > 0, "bucket count must be positive");
    (hash as usize) % capacity
}
