//! Stable, non-cryptographic digests.
//!
//! Used to reduce composite lookup keys (pattern id + serialized binding
//! context) to a fixed-width string.
//!
//! - algorithm: **FNV-1a 64-bit**
//! - output: `"fnv1a64:<16 lowercase hex digits>"`
//!
//! This is not a security primitive; only practical uniqueness matters.

/// Prefix used in serialized digests.
pub const DIGEST_PREFIX: &str = "fnv1a64:";

const FNV_OFFSET_BASIS: u64 = 0xcbf29ce484222325;
const FNV_PRIME: u64 = 0x00000100000001b3;

/// Digest of a sequence of parts, each terminated by a `0x1f` unit
/// separator so that `["ab", "c"]` and `["a", "bc"]` differ.
pub fn fnv1a64_digest_parts<'a>(parts: impl IntoIterator<Item = &'a str>) -> String {
    let mut hash = FNV_OFFSET_BASIS;
    for part in parts {
        add(&mut hash, part.as_bytes());
        add(&mut hash, &[0x1f]);
    }
    format!("{DIGEST_PREFIX}{hash:016x}")
}

fn add(hash: &mut u64, bytes: &[u8]) {
    for b in bytes {
        *hash ^= (*b) as u64;
        *hash = hash.wrapping_mul(FNV_PRIME);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_has_expected_prefix_and_width() {
        let d = fnv1a64_digest_parts(["tp0", r#"{"y":"b"}"#]);
        assert!(d.starts_with(DIGEST_PREFIX));
        assert_eq!(d.len(), DIGEST_PREFIX.len() + 16);
    }

    #[test]
    fn no_parts_is_offset_basis() {
        assert_eq!(fnv1a64_digest_parts([]), "fnv1a64:cbf29ce484222325");
    }

    #[test]
    fn part_boundaries_matter() {
        assert_ne!(
            fnv1a64_digest_parts(["ab", "c"]),
            fnv1a64_digest_parts(["a", "bc"])
        );
        assert_eq!(
            fnv1a64_digest_parts(["tp0", "{}"]),
            fnv1a64_digest_parts(["tp0", "{}"])
        );
    }
}
