//! CLI Tests
//!
//! Argument handling, option merging and exit status

use std::fs;
use std::path::Path;

use apigen_cli::generator::UnsupportedTypePolicy;
use apigen_cli::main_entry::{run, Cli, EXIT_DEFINITION_FAILED};
use clap::error::ErrorKind;
use clap::Parser;

const WIDGETS: &str = "package widgets\n\nfunc (w *Widget) Send(msg string) error { return nil }\n";

fn workspace(dir: &Path, host: &str) {
    let pkg = dir.join("src/example.com/widgets");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("widget.go"), WIDGETS).unwrap();
    fs::write(dir.join("send.tmpl"), "{{.Definition.Alias}}({{range .Definition.Symbol.Arguments}}{{.}}{{end}})").unwrap();
    fs::write(dir.join("main.go"), host).unwrap();
}

fn parse(args: &[&str]) -> Cli {
    Cli::try_parse_from(args.iter().copied()).unwrap()
}

#[test]
fn should_require_exactly_one_file() {
    let err = Cli::try_parse_from(["apigen"]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MissingRequiredArgument);
    assert_eq!(err.exit_code(), 2);

    let err = Cli::try_parse_from(["apigen", "a.go", "b.go"]).unwrap_err();
    assert_eq!(err.exit_code(), 2);
}

#[test]
fn should_merge_flags_over_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = dir.path().join("apigen.json");
    fs::write(
        &config,
        r#"{ "templateRoot": "tpl", "packageRoots": ["src"], "unsupportedTypes": "abort" }"#,
    )
    .unwrap();

    let cli = parse(&[
        "apigen",
        "main.go",
        "--config",
        config.to_str().unwrap(),
        "--package-root",
        "/first",
        "--skip-unsupported",
    ]);
    let options = cli.generator_options().unwrap();
    assert_eq!(options.template_root, Some(dir.path().join("tpl")));
    assert_eq!(
        options.package_roots,
        vec![Path::new("/first").to_path_buf(), dir.path().join("src")]
    );
    assert_eq!(options.unsupported_types, UnsupportedTypePolicy::Skip);
}

#[test]
fn should_fail_on_missing_input() {
    let cli = parse(&["apigen", "/no/such/file.go"]);
    assert!(run(&cli).is_err());
}

#[test]
fn should_write_output_file() {
    let dir = tempfile::tempdir().unwrap();
    workspace(
        dir.path(),
        "package main\n// apig sendTemplate:send.tmpl\n// apig gen:example.com/widgets.Widget->Send template:send alias:Post\n",
    );
    let out = dir.path().join("out.txt");
    let src = dir.path().join("src");
    let host = dir.path().join("main.go");

    let cli = parse(&[
        "apigen",
        host.to_str().unwrap(),
        "--package-root",
        src.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ]);
    assert_eq!(run(&cli).unwrap(), 0);
    assert_eq!(fs::read_to_string(&out).unwrap(), "Post(msg string)\n");
}

#[test]
fn should_exit_nonzero_in_strict_mode() {
    let dir = tempfile::tempdir().unwrap();
    workspace(
        dir.path(),
        "package main\n// apig sendTemplate:send.tmpl\n// apig gen:example.com/widgets.Missing template:send\n",
    );
    let out = dir.path().join("out.txt");
    let src = dir.path().join("src");
    let host = dir.path().join("main.go");
    let base = [
        "apigen",
        host.to_str().unwrap(),
        "--package-root",
        src.to_str().unwrap(),
        "--output",
        out.to_str().unwrap(),
    ];

    assert_eq!(run(&parse(&base)).unwrap(), 0);

    let mut strict = base.to_vec();
    strict.push("--strict");
    assert_eq!(run(&parse(&strict)).unwrap(), EXIT_DEFINITION_FAILED);
}
