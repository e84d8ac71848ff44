//! Go Parser Tests
//!
//! Declaration parsing and comment extraction on realistic Go files

use apigen::go::{extract_comment_lines, Parser, TypeExpr};
use pretty_assertions::assert_eq;

const WIDGETS: &str = r#"// Package widgets does things.
package widgets

import (
	"context"
	"fmt"
)

const limit = 10

type Widget struct {
	name string
	tags map[string]int
}

var registry = map[string]*Widget{}

func NewWidget(name string) *Widget {
	w := &Widget{name: name}
	if len(name) > limit {
		fmt.Println("}")
	}
	return w
}

func (w *Widget) Send(ctx context.Context, msg string) error {
	return nil
}

func (Widget) Name() (name string, err error) { return "", nil }

func Map[T any](items []T, f func(T) T) []T { return items }
"#;

#[test]
fn should_find_all_top_level_funcs() {
    let file = Parser::new().parse_file(WIDGETS).unwrap();
    assert_eq!(file.package, "widgets");
    let names: Vec<_> = file.funcs.iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["NewWidget", "Send", "Name", "Map"]);
}

#[test]
fn should_parse_method_receiver() {
    let file = Parser::new().parse_file(WIDGETS).unwrap();
    let send = &file.funcs[1];
    let receiver = send.receiver.as_ref().unwrap();
    assert_eq!(receiver[0].names, vec!["w"]);
    assert_eq!(receiver[0].ty, TypeExpr::Pointer(Box::new(TypeExpr::named("Widget"))));
    assert_eq!(send.signature.params.len(), 2);
    assert_eq!(
        send.signature.params[0].ty,
        TypeExpr::Named {
            package: Some("context".to_string()),
            name: "Context".to_string()
        }
    );
}

#[test]
fn should_parse_unnamed_receiver_and_named_results() {
    let file = Parser::new().parse_file(WIDGETS).unwrap();
    let name = &file.funcs[2];
    assert!(name.receiver.as_ref().unwrap()[0].names.is_empty());
    assert_eq!(name.signature.results.len(), 2);
    assert_eq!(name.signature.results[1].names, vec!["err"]);
}

#[test]
fn should_flag_type_parameters() {
    let file = Parser::new().parse_file(WIDGETS).unwrap();
    assert!(file.funcs[3].has_type_params);
    assert!(!file.funcs[0].has_type_params);
}

#[test]
fn should_extract_comment_lines() {
    let source = "package p\n\n// apig fooAll:bar\n/* apig a:1\n   apig b:2 */\nfunc F() {}\n";
    let lines = extract_comment_lines(source).unwrap();
    let texts: Vec<_> = lines.iter().map(|l| (l.line, l.text.trim())).collect();
    assert_eq!(
        texts,
        vec![(3, "apig fooAll:bar"), (4, "apig a:1"), (5, "apig b:2")]
    );
}

#[test]
fn should_report_syntax_error_line() {
    let err = Parser::new()
        .parse_file("package p\n\nfunc F(a int {\n")
        .unwrap_err();
    assert_eq!(err.line, 3);
}
