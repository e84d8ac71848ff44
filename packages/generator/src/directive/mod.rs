/**
 * Directive Module
 *
 * Recognizes `apig` comment lines and interprets their fields.
 */
pub mod interpreter;
pub mod tokenizer;

pub use interpreter::{
    split_field, Diagnostic, DirectiveInterpreter, FieldKey, LineOutcome, SpecialKey,
};
pub use tokenizer::{split_fields, tokenize, DIRECTIVE_SENTINEL};
