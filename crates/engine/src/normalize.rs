//! Canonical part-number keys.
//!
//! The same function is applied to catalog cells and incoming demand rows;
//! matching requires bit-exact equality of the results, so this must stay a
//! pure function of (input, strip set) with no locale-sensitive casing.

/// Characters stripped from part numbers when no strip set is configured.
pub const DEFAULT_STRIP_CHARS: [char; 4] = ['-', '.', ' ', '/'];

/// Turn a raw part-number string into its canonical matching key.
///
/// Total: unrecognized characters pass through uppercased. Strips every
/// occurrence of the configured characters, including leading/trailing ones.
pub fn normalize(raw: &str, strip: &[char]) -> String {
    raw.chars()
        .filter(|c| !strip.contains(c))
        .flat_map(char::to_uppercase)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(raw: &str) -> String {
        normalize(raw, &DEFAULT_STRIP_CHARS)
    }

    #[test]
    fn strips_and_uppercases() {
        assert_eq!(key("1AS-BJ00132"), "1ASBJ00132");
        assert_eq!(key("TRQ.123 / A"), "TRQ123A");
    }

    #[test]
    fn leading_trailing_whitespace_stripped() {
        assert_eq!(key("  k123456 "), "K123456");
    }

    #[test]
    fn unrecognized_characters_pass_through() {
        assert_eq!(key("ab#12_3"), "AB#12_3");
    }

    #[test]
    fn empty_after_stripping() {
        assert_eq!(key(" -./ "), "");
        assert_eq!(key(""), "");
    }

    #[test]
    fn custom_strip_set() {
        assert_eq!(normalize("a_b-c", &['_']), "AB-C");
    }

    #[test]
    fn idempotent() {
        for raw in ["1AS-BJ00132", "TRQ.123 / A", "ms98765", ""] {
            let once = key(raw);
            assert_eq!(key(&once), once);
        }
    }
}
