//! Claim-name validity and invalid-character stripping.

/// True if `c` may not appear in a claim name or locator segment.
pub fn is_invalid_uri_char(c: char) -> bool {
    matches!(
        c,
        ' ' | '='
            | '&'
            | '#'
            | ':'
            | '$'
            | '@'
            | '%'
            | '?'
            | ';'
            | '/'
            | '\\'
            | '"'
            | '<'
            | '>'
            | '{'
            | '}'
            | '|'
            | '^'
            | '~'
            | '['
            | ']'
            | '`'
            | '\u{0000}'..='\u{0008}'
            | '\u{000B}'..='\u{000C}'
            | '\u{000E}'..='\u{001F}'
            | '\u{FFFE}'
            | '\u{FFFF}'
    )
}

/// Returns true if `name` contains no invalid locator characters.
pub fn is_name_valid(name: &str) -> bool {
    !name.chars().any(is_invalid_uri_char)
}

/// Removes every invalid locator character from `text`.
pub fn strip_invalid_uri_chars(text: &str) -> String {
    text.chars().filter(|c| !is_invalid_uri_char(*c)).collect()
}
