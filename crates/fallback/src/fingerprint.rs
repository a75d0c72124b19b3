//! Content Fingerprint
//!
//! Base-31 rolling hash over UTF-16 code units with signed 32-bit
//! wraparound. Collisions are fine; the value only has to be stable so the
//! same ad text always maps to the same metrics.

/// Fingerprint a string into a non-negative 32-bit value.
///
/// `h = h * 31 + unit` for every UTF-16 code unit, wrapping at `i32`, then
/// the absolute value. `i32::MIN` maps to `2^31`, which is why the result is
/// `u32` rather than `i32`.
pub fn fingerprint(s: &str) -> u32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
        .unsigned_abs()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string() {
        assert_eq!(fingerprint(""), 0);
    }

    #[test]
    fn test_known_values() {
        assert_eq!(fingerprint("a"), 97);
        assert_eq!(fingerprint("hello"), 99_162_322);
        assert_eq!(fingerprint("Summer Sale"), 352_189_928);
        assert_eq!(fingerprint("Get 50% off all items now"), 932_389_542);
        assert_eq!(fingerprint("young adults"), 1_598_579_455);
    }

    #[test]
    fn test_wraparound_takes_absolute_value() {
        // Overflows i32 and lands negative before abs()
        assert_eq!(fingerprint("Hello, World!"), 1_498_789_909);
    }

    #[test]
    fn test_hashes_utf16_surrogate_pairs() {
        // U+1F600 is 0xD83D 0xDE00 in UTF-16
        assert_eq!(fingerprint("😀"), 0xD83D * 31 + 0xDE00);
    }
}
