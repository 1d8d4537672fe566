//! Stable identifier generation and recognition.
//!
//! # Responsibility
//! - Produce v4 identifiers for new items.
//! - Recognize the exact v4 textual shape when decoding persisted data.
//!
//! # Invariants
//! - Generated IDs always satisfy `is_valid_id` in their string form.
//! - The seeded generator is deterministic for a given seed.

use crate::model::todo::TodoId;
use once_cell::sync::Lazy;
use regex::Regex;
use uuid::{Builder, Uuid};

// 8-4-4-4-12 hex groups, version nibble 4, variant nibble in {8,9,a,b}.
static UUID_V4_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^[0-9a-f]{8}-[0-9a-f]{4}-4[0-9a-f]{3}-[89ab][0-9a-f]{3}-[0-9a-f]{12}$",
    )
    .expect("uuid v4 pattern is a valid regex")
});

/// Generates a fresh v4 identifier from the crate's random source.
pub fn generate_id() -> TodoId {
    Uuid::new_v4()
}

/// Generates a deterministic v4-shaped identifier from `seed`.
///
/// Fallback for contexts without a usable random source and for tests that
/// need reproducible IDs. Uses an xorshift64* sequence for the random bytes;
/// the builder stamps version and variant nibbles so the textual shape is
/// indistinguishable from `generate_id` output.
pub fn generate_id_seeded(seed: u64) -> TodoId {
    let mut state = seed.wrapping_add(0x9e37_79b9_7f4a_7c15).max(1);
    let mut bytes = [0u8; 16];
    for chunk in bytes.chunks_mut(8) {
        state ^= state << 13;
        state ^= state >> 7;
        state ^= state << 17;
        let word = state.wrapping_mul(0x2545_f491_4f6c_dd1d);
        chunk.copy_from_slice(&word.to_le_bytes());
    }
    Builder::from_random_bytes(bytes).into_uuid()
}

/// Returns whether `value` has the exact v4 textual shape, case-insensitive.
pub fn is_valid_id(value: &str) -> bool {
    UUID_V4_PATTERN.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::{generate_id, generate_id_seeded, is_valid_id};

    #[test]
    fn generated_ids_match_the_v4_shape() {
        for _ in 0..32 {
            let id = generate_id();
            assert!(is_valid_id(&id.to_string()));
        }
    }

    #[test]
    fn generated_ids_are_unique() {
        let a = generate_id();
        let b = generate_id();
        assert_ne!(a, b);
    }

    #[test]
    fn seeded_ids_are_deterministic_and_valid() {
        let a = generate_id_seeded(42);
        let b = generate_id_seeded(42);
        let c = generate_id_seeded(43);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(is_valid_id(&a.to_string()));
        assert!(is_valid_id(&c.to_string()));
    }

    #[test]
    fn recognizes_valid_ids_case_insensitively() {
        assert!(is_valid_id("550e8400-e29b-41d4-a716-446655440000"));
        assert!(is_valid_id("550E8400-E29B-41D4-A716-446655440000"));
    }

    #[test]
    fn rejects_non_v4_shapes() {
        assert!(!is_valid_id("not-a-uuid"));
        assert!(!is_valid_id(""));
        // Version nibble must be 4.
        assert!(!is_valid_id("550e8400-e29b-11d4-a716-446655440000"));
        // Variant nibble must be 8, 9, a or b.
        assert!(!is_valid_id("550e8400-e29b-41d4-c716-446655440000"));
        // No surrounding garbage.
        assert!(!is_valid_id(" 550e8400-e29b-41d4-a716-446655440000"));
    }
}
