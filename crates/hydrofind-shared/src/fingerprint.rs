//! # Stable Query Fingerprint
//!
//! Cache key derivation: Unicode NFC-normalize the query, collapse runs of
//! whitespace to a single ASCII space, trim, then SHA-256 the result and
//! hex-encode. Two queries that differ only by composition form or
//! incidental whitespace must hash identically so the
//! `search:<fingerprint>` cache actually hits.
//!
//! Follows the cache-key normalization the original service applies in
//! `backend/app/services/cache_service.py` before hashing.

use sha2::{Digest, Sha256};
use unicode_normalization::UnicodeNormalization;

/// Normalize a query the same way on every call site that needs the
/// fingerprint's input (the fingerprint itself, and debug/log output).
pub fn normalize(query: &str) -> String {
    let nfc: String = query.nfc().collect();
    let mut out = String::with_capacity(nfc.len());
    let mut last_was_space = false;
    for ch in nfc.trim().chars() {
        if ch.is_whitespace() {
            if !last_was_space {
                out.push(' ');
            }
            last_was_space = true;
        } else {
            out.push(ch);
            last_was_space = false;
        }
    }
    out
}

/// Hex-encoded SHA-256 of the normalized query. Used as the `<fingerprint>`
/// component of the `search:<fingerprint>` cache key.
pub fn fingerprint(query: &str) -> String {
    let normalized = normalize(query);
    let mut hasher = Sha256::new();
    hasher.update(normalized.as_bytes());
    let digest = hasher.finalize();
    let mut hex = String::with_capacity(digest.len() * 2);
    for byte in digest {
        hex.push_str(&format!("{byte:02x}"));
    }
    hex
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_runs_collapse_to_single_space() {
        let a = fingerprint("угловой  штуцер\t12x1.5");
        let b = fingerprint("угловой штуцер 12x1.5");
        assert_eq!(a, b);
    }

    #[test]
    fn leading_and_trailing_whitespace_is_trimmed() {
        let a = fingerprint("  fitting DKOL  ");
        let b = fingerprint("fitting DKOL");
        assert_eq!(a, b);
    }

    #[test]
    fn differing_unicode_composition_forms_hash_identically() {
        // "é" as a single codepoint (U+00E9) vs. "e" + combining acute (U+0065 U+0301)
        let precomposed = "caf\u{00e9}";
        let decomposed = "cafe\u{0301}";
        assert_eq!(fingerprint(precomposed), fingerprint(decomposed));
    }

    #[test]
    fn distinct_queries_produce_distinct_fingerprints() {
        assert_ne!(fingerprint("fitting DKOL 12x1.5"), fingerprint("adapter DKOL 12x1.5"));
    }

    #[test]
    fn fingerprint_is_64_char_lowercase_hex() {
        let fp = fingerprint("banjo bolt M10");
        assert_eq!(fp.len(), 64);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }
}
