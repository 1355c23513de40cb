//! Identity mapping: caller token -> synthetic phone number.
//!
//! The digest algorithm is a port so the mapping logic can be tested without
//! a real hash and so infra can pick the algorithm from configuration.

use webtoys_types::identity::{IDENTIFIER_DIGITS, SyntheticIdentifier};

/// Abstraction over the hash used to derive identifiers.
pub trait TokenDigest: Send + Sync {
    /// Hex-encoded digest of `token`.
    fn hex_digest(&self, token: &str) -> String;
}

/// Deterministically maps caller tokens to synthetic identifiers.
///
/// Pure: the same token always yields the same identifier for a given
/// digest. Collisions between distinct tokens are tolerated.
pub struct IdentityMapper<D> {
    digest: D,
}

impl<D: TokenDigest> IdentityMapper<D> {
    pub fn new(digest: D) -> Self {
        Self { digest }
    }

    /// Map a token to its identifier. Absent or empty tokens map to the sentinel.
    pub fn map(&self, token: Option<&str>) -> SyntheticIdentifier {
        let token = match token {
            Some(t) if !t.is_empty() => t,
            _ => return SyntheticIdentifier::sentinel(),
        };

        let digits = digits_from_hex(&self.digest.hex_digest(token));
        // digits_from_hex always yields exactly IDENTIFIER_DIGITS ASCII digits.
        SyntheticIdentifier::from_digits(&digits).unwrap_or_else(|_| SyntheticIdentifier::sentinel())
    }
}

/// Keep the decimal digits of `hex` in order, truncated or right-padded with
/// `0` to exactly seven.
pub fn digits_from_hex(hex: &str) -> String {
    let mut digits: String = hex
        .chars()
        .filter(char::is_ascii_digit)
        .take(IDENTIFIER_DIGITS)
        .collect();
    while digits.len() < IDENTIFIER_DIGITS {
        digits.push('0');
    }
    digits
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Hex-encodes the token bytes; deterministic and digit-rich.
    struct HexBytes;

    impl TokenDigest for HexBytes {
        fn hex_digest(&self, token: &str) -> String {
            token.bytes().map(|b| format!("{b:02x}")).collect()
        }
    }

    /// Always returns the same digest.
    struct Fixed(&'static str);

    impl TokenDigest for Fixed {
        fn hex_digest(&self, _token: &str) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn test_digits_from_hex_filters_and_truncates() {
        assert_eq!(digits_from_hex("a1b2c3d4e5f6a7b8c9"), "1234567");
    }

    #[test]
    fn test_digits_from_hex_pads_short_input() {
        assert_eq!(digits_from_hex("abc1def2"), "1200000");
        assert_eq!(digits_from_hex("abcdef"), "0000000");
    }

    #[test]
    fn test_absent_and_empty_tokens_map_to_sentinel() {
        let mapper = IdentityMapper::new(HexBytes);
        assert!(mapper.map(None).is_sentinel());
        assert!(mapper.map(Some("")).is_sentinel());
        assert_eq!(mapper.map(None), mapper.map(Some("")));
    }

    #[test]
    fn test_mapping_is_deterministic() {
        let mapper = IdentityMapper::new(HexBytes);
        for token in ["alice", "bob", "user-42", "🦀 unicode"] {
            let owned = token.to_string();
            assert_eq!(mapper.map(Some(token)), mapper.map(Some(owned.as_str())));
        }
    }

    #[test]
    fn test_non_empty_tokens_have_fixed_format() {
        let mapper = IdentityMapper::new(HexBytes);
        for token in ["a", "zz", "default", "some much longer caller token"] {
            let id = mapper.map(Some(token));
            let s = id.as_str();
            assert!(s.starts_with("+1999"), "{s}");
            assert_eq!(s.len(), 12, "{s}");
            assert!(s[5..].bytes().all(|b| b.is_ascii_digit()), "{s}");
        }
    }

    #[test]
    fn test_digit_poor_digest_is_padded() {
        let mapper = IdentityMapper::new(Fixed("ffffffff9fffffff"));
        assert_eq!(mapper.map(Some("anyone")).as_str(), "+19999000000");
    }
}
