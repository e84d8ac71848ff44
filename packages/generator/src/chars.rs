/*
 * Character Codes
 *
 * Character classes shared by the directive tokenizer, the Go lexer and the
 * template lexer.
 */

//! Character constants and classification helpers

pub const EOF: char = '\0';
pub const TAB: char = '\t';
pub const NEWLINE: char = '\n';
pub const RETURN: char = '\r';
pub const SPACE: char = ' ';
/// Byte order mark, allowed once at the start of a Go file.
pub const BOM: char = '\u{FEFF}';

pub const DQ: char = '"';
pub const SQ: char = '\'';
pub const BT: char = '`';
pub const DOLLAR: char = '$';
pub const LPAREN: char = '(';
pub const RPAREN: char = ')';
pub const LBRACKET: char = '[';
pub const RBRACKET: char = ']';
pub const LBRACE: char = '{';
pub const RBRACE: char = '}';
pub const STAR: char = '*';
pub const COMMA: char = ',';
pub const MINUS: char = '-';
pub const PERIOD: char = '.';
pub const SLASH: char = '/';
pub const COLON: char = ':';
pub const SEMICOLON: char = ';';
pub const BACKSLASH: char = '\\';
pub const UNDERSCORE: char = '_';
pub const BAR: char = '|';

/// Every code point carrying the Unicode `Quotation_Mark` property.
pub const QUOTATION_MARKS: &[char] = &[
    '\u{0022}', '\u{0027}', '\u{00AB}', '\u{00BB}', '\u{2018}', '\u{2019}', '\u{201A}',
    '\u{201B}', '\u{201C}', '\u{201D}', '\u{201E}', '\u{201F}', '\u{2039}', '\u{203A}',
    '\u{2E42}', '\u{300C}', '\u{300D}', '\u{300E}', '\u{300F}', '\u{301D}', '\u{301E}',
    '\u{301F}', '\u{FE41}', '\u{FE42}', '\u{FE43}', '\u{FE44}', '\u{FF02}', '\u{FF07}',
    '\u{FF62}', '\u{FF63}',
];

/// Check if character is a Unicode quotation mark
pub fn is_quotation_mark(ch: char) -> bool {
    QUOTATION_MARKS.contains(&ch)
}

/// Check if character is whitespace (Unicode `White_Space`)
pub fn is_whitespace(ch: char) -> bool {
    ch.is_whitespace()
}

/// Check if character is a decimal digit
pub fn is_digit(ch: char) -> bool {
    ch.is_ascii_digit()
}

/// Check if character can start a Go identifier
pub fn is_identifier_start(ch: char) -> bool {
    ch == UNDERSCORE || ch.is_alphabetic()
}

/// Check if character can be part of a Go identifier
pub fn is_identifier_part(ch: char) -> bool {
    is_identifier_start(ch) || ch.is_numeric()
}

/// Remove one surrounding pair of identical quotation marks, if present.
pub fn strip_outer_quotes(value: &str) -> &str {
    let mut chars = value.chars();
    match (chars.next(), chars.next_back()) {
        (Some(open), Some(close)) if open == close && is_quotation_mark(open) => {
            &value[open.len_utf8()..value.len() - close.len_utf8()]
        }
        _ => value,
    }
}

/// Remove every quotation mark from the value.
pub fn remove_quotation_marks(value: &str) -> String {
    value.chars().filter(|ch| !is_quotation_mark(*ch)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_quotation_mark() {
        assert!(is_quotation_mark('"'));
        assert!(is_quotation_mark('\''));
        assert!(is_quotation_mark('«'));
        assert!(is_quotation_mark('“'));
        assert!(is_quotation_mark('」'));
        assert!(!is_quotation_mark('`'));
        assert!(!is_quotation_mark('a'));
    }

    #[test]
    fn test_is_identifier_start() {
        assert!(is_identifier_start('a'));
        assert!(is_identifier_start('Z'));
        assert!(is_identifier_start('_'));
        assert!(is_identifier_start('é'));
        assert!(!is_identifier_start('5'));
        assert!(!is_identifier_start('$'));
    }

    #[test]
    fn test_strip_outer_quotes() {
        assert_eq!(strip_outer_quotes("\"a b\""), "a b");
        assert_eq!(strip_outer_quotes("«x»"), "«x»");
        assert_eq!(strip_outer_quotes("'q'"), "q");
        assert_eq!(strip_outer_quotes("\""), "\"");
        assert_eq!(strip_outer_quotes("plain"), "plain");
    }

    #[test]
    fn test_remove_quotation_marks() {
        assert_eq!(remove_quotation_marks("\"ctx, \"id\""), "ctx, id");
    }
}
