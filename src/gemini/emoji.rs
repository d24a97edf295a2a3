//! Emoji extraction from free-text model output.
//!
//! The model is asked to answer with a bare emoji, but replies occasionally
//! include stray prose ("🎉 nice!"). The extractor scans the reply for the
//! first code point inside the Unicode emoji blocks and uses that as the
//! prediction. Digits, `#`, `*`, and other ASCII that broad emoji properties
//! technically cover are deliberately excluded: a reply of "maybe 5?" must
//! not turn into the prediction "5".

/// Returned when the reply contains no emoji at all.
pub const FALLBACK_EMOJI: &str = "❓";

/// Code-point ranges (inclusive) treated as emoji.
///
/// Covers the pictographic blocks plus the legacy symbol blocks that hold
/// common emoji such as ☀, ❤, ✨, and ⭐.
const EMOJI_RANGES: &[(u32, u32)] = &[
    (0x231A, 0x231B),   // watch, hourglass
    (0x2600, 0x26FF),   // miscellaneous symbols
    (0x2700, 0x27BF),   // dingbats
    (0x2B00, 0x2BFF),   // arrows and stars (⭐ lives here)
    (0x1F1E6, 0x1F1FF), // regional indicators
    (0x1F300, 0x1F5FF), // misc symbols and pictographs
    (0x1F600, 0x1F64F), // emoticons
    (0x1F680, 0x1F6FF), // transport and map
    (0x1F900, 0x1F9FF), // supplemental symbols
    (0x1FA70, 0x1FAFF), // symbols and pictographs extended
];

/// Whether a character falls in one of the emoji ranges.
#[must_use]
pub fn is_emoji(c: char) -> bool {
    let cp = c as u32;
    EMOJI_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Extracts the first emoji from `text`, if any.
///
/// Only the first match is returned even when the reply contains several.
#[must_use]
pub fn first_emoji(text: &str) -> Option<String> {
    text.chars().find(|&c| is_emoji(c)).map(String::from)
}

/// Extracts the first emoji from `text`, or [`FALLBACK_EMOJI`] when the reply
/// contains none. Never fails.
#[must_use]
pub fn extract_prediction(text: &str) -> String {
    first_emoji(text).unwrap_or_else(|| FALLBACK_EMOJI.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        assert_eq!(extract_prediction("🎉 nice!"), "🎉");
        assert_eq!(extract_prediction("sure: 🌧 or maybe ⛈"), "🌧");
    }

    #[test]
    fn emoji_after_prose_is_found() {
        assert_eq!(extract_prediction("The best fit would be 🚀"), "🚀");
    }

    #[test]
    fn no_emoji_yields_fallback() {
        assert_eq!(extract_prediction("I cannot answer that."), FALLBACK_EMOJI);
        assert_eq!(extract_prediction(""), FALLBACK_EMOJI);
    }

    #[test]
    fn ascii_digits_and_symbols_are_not_emoji() {
        assert_eq!(extract_prediction("maybe 5?"), FALLBACK_EMOJI);
        assert!(!is_emoji('5'));
        assert!(!is_emoji('#'));
        assert!(!is_emoji('*'));
    }

    #[test]
    fn legacy_symbol_blocks_count_as_emoji() {
        assert!(is_emoji('☀'));
        assert!(is_emoji('❤'));
        assert!(is_emoji('⭐'));
    }
}
