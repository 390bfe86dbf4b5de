// SPDX-License-Identifier: Apache-2.0 OR MIT
//! Stripping of non-printable characters before text is embedded in XML.
//!
//! Everything in the Unicode "Other" major class (general categories Cc, Cf,
//! Cs, Co and Cn) is removed. Cn includes both unassigned code points and
//! the noncharacters.

use unicode_general_category::{get_general_category, GeneralCategory};

/// Remove every "Other"-class character, preserving the rest in order
pub fn sanitise(message: &str) -> String {
    message.chars().filter(|&ch| !is_other(ch)).collect()
}

/// Decode arbitrary bytes (invalid UTF-8 becomes U+FFFD), then sanitise
pub fn sanitise_lossy(bytes: &[u8]) -> String {
    sanitise(&String::from_utf8_lossy(bytes))
}

/// Drop only what XML 1.0 cannot carry, keeping tabs and line breaks
///
/// Used for multi-line report text where newlines are significant.
pub fn xml_safe(text: &str) -> String {
    text.chars().filter(|&ch| is_xml_char(ch)).collect()
}

/// Whether `ch` belongs to the Unicode "Other" major category
pub fn is_other(ch: char) -> bool {
    matches!(
        get_general_category(ch),
        GeneralCategory::Control
            | GeneralCategory::Format
            | GeneralCategory::Surrogate
            | GeneralCategory::PrivateUse
            | GeneralCategory::Unassigned
    )
}

/// The XML 1.0 `Char` production
fn is_xml_char(ch: char) -> bool {
    matches!(
        ch,
        '\t' | '\n'
            | '\r'
            | '\u{20}'..='\u{D7FF}'
            | '\u{E000}'..='\u{FFFD}'
            | '\u{10000}'..='\u{10FFFF}'
    )
}
