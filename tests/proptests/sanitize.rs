//! Property Tests: Sanitiser
//!
//! Inputs are built from a fixed table of characters whose Unicode general
//! category is known: controls (Cc), format (Cf), private use (Co) and
//! unassigned or noncharacter code points (Cn) must be removed; letters,
//! marks, numbers, punctuation, symbols and separators must survive in
//! their original order. Sanitising twice must change nothing.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use testlog::logging::{sanitise, sanitise_lossy};

    /// Characters of the "Other" class
    const REMOVED: &[char] = &[
        '\u{0}', '\u{7}', '\t', '\n', '\r', '\u{1b}', '\u{7f}', '\u{85}', '\u{9f}', // Cc
        '\u{AD}', '\u{600}', '\u{200B}', '\u{200D}', '\u{202E}', '\u{2066}', '\u{FEFF}',
        '\u{E0001}', // Cf
        '\u{E000}', '\u{F8FF}', '\u{F0000}', '\u{10FFFD}', // Co
        '\u{378}', '\u{E01F0}', '\u{FDD0}', '\u{FFFE}', '\u{FFFF}', '\u{1FFFF}',
        '\u{10FFFF}', // Cn
    ];

    /// Characters outside the "Other" class
    const KEPT: &[char] = &[
        'a', 'Z', 'é', 'ß', '世', 'ж', // L
        '\u{301}', '\u{903}', // M
        '0', '٣', 'Ⅻ', // N
        '!', '<', '&', '"', '«', // P
        '+', '€', '✓', '🦀', '∑', // S
        ' ', '\u{A0}', '\u{2028}', '\u{3000}', // Z
    ];

    /// (input, expected output)
    fn labelled_text() -> impl Strategy<Value = (String, String)> {
        prop::collection::vec(
            prop_oneof![
                prop::sample::select(REMOVED).prop_map(|c| (c, false)),
                prop::sample::select(KEPT).prop_map(|c| (c, true)),
            ],
            0..64,
        )
        .prop_map(|chars| {
            let input: String = chars.iter().map(|&(c, _)| c).collect();
            let expected: String = chars.iter().filter(|&&(_, keep)| keep).map(|&(c, _)| c).collect();
            (input, expected)
        })
    }

    proptest! {
        /// **Property:** exactly the non-"Other" characters survive, in
        /// their original order.
        #[test]
        fn test_keeps_exactly_the_printable_chars((input, expected) in labelled_text()) {
            prop_assert_eq!(sanitise(&input), expected);
        }

        /// **Property:** `sanitise(sanitise(x)) == sanitise(x)`.
        #[test]
        fn test_idempotent(input in any::<String>()) {
            let once = sanitise(&input);
            prop_assert_eq!(sanitise(&once), once.clone());
        }

        /// **Property:** arbitrary bytes never panic and never yield control
        /// characters.
        #[test]
        fn test_lossy_never_panics(input in any::<Vec<u8>>()) {
            let out = sanitise_lossy(&input);
            prop_assert!(!out.chars().any(char::is_control));
        }
    }
}
