/**
 * Directive Tokenizer
 *
 * Splits one comment line into whitespace separated fields. Quoted spans and the
 * whitespace run following a colon never split a field.
 */
use crate::chars;

/// Sentinel word that marks a comment line as a directive.
pub const DIRECTIVE_SENTINEL: &str = "apig";

/// Split state carried across characters of a single line.
struct FieldScanner {
    open_quote: Option<char>,
    last_significant: char,
}

impl FieldScanner {
    fn new() -> Self {
        FieldScanner {
            open_quote: None,
            last_significant: chars::EOF,
        }
    }

    /// Returns true when `ch` separates two fields.
    fn is_separator(&mut self, ch: char) -> bool {
        if let Some(quote) = self.open_quote {
            if ch == quote {
                self.open_quote = None;
            }
            self.last_significant = ch;
            return false;
        }
        if chars::is_quotation_mark(ch) {
            self.open_quote = Some(ch);
            self.last_significant = ch;
            return false;
        }
        if chars::is_whitespace(ch) {
            return self.last_significant != chars::COLON;
        }
        self.last_significant = ch;
        false
    }
}

/// Split a line into fields. Never yields empty fields.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim();
    let mut scanner = FieldScanner::new();
    let mut fields = Vec::new();
    let mut start: Option<usize> = None;

    for (index, ch) in line.char_indices() {
        if scanner.is_separator(ch) {
            if let Some(begin) = start.take() {
                fields.push(&line[begin..index]);
            }
        } else if start.is_none() {
            start = Some(index);
        }
    }
    if let Some(begin) = start {
        fields.push(&line[begin..]);
    }
    fields
}

/// Tokenize a directive line. Returns `None` unless the first field is the sentinel.
pub fn tokenize(line: &str) -> Option<Vec<&str>> {
    let fields = split_fields(line);
    match fields.first() {
        Some(first) if *first == DIRECTIVE_SENTINEL => Some(fields),
        _ => None,
    }
}
