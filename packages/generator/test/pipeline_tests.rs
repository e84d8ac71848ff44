//! Pipeline Tests
//!
//! Host file in, generated text out

use std::fs;
use std::path::Path;

use apigen::{
    FsPackageLoader, GeneratorError, GeneratorOptions, Generator, MemoryPackageLoader,
    ResolveError, TemplateError, UnsupportedTypePolicy,
};
use pretty_assertions::assert_eq;

const WIDGETS: &str = r#"package widgets

type Widget struct{}

func (w *Widget) Send(msg string) error { return nil }

func Index(m map[string]int) {}
"#;

fn loader() -> MemoryPackageLoader {
    MemoryPackageLoader::new().with_file("pkg", "widget.go", WIDGETS)
}

fn write_template(dir: &Path, name: &str, text: &str) {
    fs::write(dir.join(name), text).unwrap();
}

fn generator(template_root: &Path) -> Generator<MemoryPackageLoader> {
    let options = GeneratorOptions {
        template_root: Some(template_root.to_path_buf()),
        ..Default::default()
    };
    Generator::new(options, loader())
}

fn run(generator: &Generator<MemoryPackageLoader>, host: &str) -> (String, apigen::GenerationReport) {
    let mut out = Vec::new();
    let report = generator.process_source(host, &mut out).unwrap();
    (String::from_utf8(out).unwrap(), report)
}

#[test]
fn should_render_definition_once_with_alias() {
    let dir = tempfile::tempdir().unwrap();
    write_template(
        dir.path(),
        "t1.tmpl",
        "alias={{.Definition.Alias}} method={{.Definition.Method}} recv={{range .Definition.Symbol.Receivers}}{{.}}{{end}}",
    );
    let host = "package host\n\n// apig t1Template:t1.tmpl\n// apig gen:pkg.Widget->Send template:t1 alias:foo\nfunc main() {}\n";

    let (out, report) = run(&generator(dir.path()), host);
    assert_eq!(out, "alias=foo method=Send recv=w *Widget\n");
    assert_eq!(report.definitions, 1);
    assert_eq!(report.resolved, 1);
    assert_eq!(report.rendered, 1);
    assert!(report.is_success());
}

#[test]
fn should_register_templates_declared_after_definition() {
    let dir = tempfile::tempdir().unwrap();
    write_template(dir.path(), "late.tmpl", "{{.Definition.Alias}}");
    let host = "package host\n// apig gen:pkg.Widget->Send template:late alias:early\n// apig lateTemplate:late.tmpl\n";

    let (out, report) = run(&generator(dir.path()), host);
    assert_eq!(out, "early\n");
    assert!(report.is_success());
}

#[test]
fn should_apply_aliases_from_registry() {
    let dir = tempfile::tempdir().unwrap();
    write_template(
        dir.path(),
        "sig.tmpl",
        "func {{.Definition.Alias}}({{.Definition.Arguments}}) {{.Definition.Return}}",
    );
    let host = r#"package host
// apig sigTemplate:sig.tmpl stdArgs:"ctx context.Context" errReturn:error
// apig gen:pkg.Widget->Send template:sig alias:Send args:std return:err
"#;

    let (out, _) = run(&generator(dir.path()), host);
    assert_eq!(out, "func Send(ctx context.Context) error\n");
}

#[test]
fn should_keep_going_after_failed_definition() {
    let dir = tempfile::tempdir().unwrap();
    write_template(dir.path(), "t.tmpl", "ok {{.Definition.Alias}}");
    let host = "package host\n// apig tTemplate:t.tmpl\n// apig gen:pkg.Send template:t alias:first\n// apig gen:pkg.Widget->Send template:t alias:second\n";

    let (out, report) = run(&generator(dir.path()), host);
    assert_eq!(out, "ok second\n");
    assert_eq!(report.definitions, 2);
    assert_eq!(report.rendered, 1);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].line, 3);
    assert!(matches!(
        report.failures[0].error,
        GeneratorError::Resolve(ResolveError::SymbolNotFound { .. })
    ));
    assert!(!report.is_success());
}

#[test]
fn should_report_unregistered_template() {
    let dir = tempfile::tempdir().unwrap();
    let host = "package host\n// apig gen:pkg.Widget->Send template:nope\n";

    let (out, report) = run(&generator(dir.path()), host);
    assert!(out.is_empty());
    assert_eq!(report.resolved, 1);
    assert!(matches!(
        report.failures[0].error,
        GeneratorError::Template(TemplateError::NotRegistered { .. })
    ));
}

#[test]
fn should_accept_host_with_byte_order_mark() {
    let dir = tempfile::tempdir().unwrap();
    write_template(dir.path(), "t.tmpl", "{{.Definition.Alias}}");
    let host = "\u{FEFF}package host\n// apig tTemplate:t.tmpl\n// apig gen:pkg.Widget->Send template:t alias:bom\n";

    let (out, report) = run(&generator(dir.path()), host);
    assert_eq!(out, "bom\n");
    assert!(report.is_success());
}

#[test]
fn should_not_count_empty_gen_as_definition() {
    let dir = tempfile::tempdir().unwrap();
    let (out, report) = run(&generator(dir.path()), "package host\n// apig gen:\n");
    assert!(out.is_empty());
    assert_eq!(report.definitions, 0);
    assert!(report.is_success());
}

#[test]
fn should_collect_interpretation_diagnostics() {
    let dir = tempfile::tempdir().unwrap();
    let host = "package host\n// apig stray gen:pkg.Widget->Send\n// apig missingTemplate:none.tmpl\n";

    let (_, report) = run(&generator(dir.path()), host);
    assert_eq!(report.diagnostics.len(), 2);
    assert_eq!(report.diagnostics[0].line, 2);
    assert_eq!(report.diagnostics[1].line, 3);
}

#[test]
fn should_honor_unsupported_type_policy() {
    let dir = tempfile::tempdir().unwrap();
    write_template(dir.path(), "t.tmpl", "{{.Definition.Method}}");
    let host = "package host\n// apig tTemplate:t.tmpl\n// apig gen:pkg.Index template:t\n";

    let (_, report) = run(&generator(dir.path()), host);
    assert!(matches!(
        report.failures[0].error,
        GeneratorError::Resolve(ResolveError::UnsupportedFieldType { .. })
    ));

    let options = GeneratorOptions {
        template_root: Some(dir.path().to_path_buf()),
        unsupported_types: UnsupportedTypePolicy::Skip,
        ..Default::default()
    };
    let (_, report) = run(&Generator::new(options, loader()), host);
    assert!(matches!(
        report.failures[0].error,
        GeneratorError::Resolve(ResolveError::SymbolNotFound { .. })
    ));
}

#[test]
fn should_be_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    write_template(
        dir.path(),
        "t.tmpl",
        "{{range .Global.Templates}}{{.}} {{end}}{{.Global.Options.a}}{{.Global.Options.b}}",
    );
    let host = "package host\n// apig tTemplate:t.tmpl aAll:1 bAll:2\n// apig gen:pkg.Widget->Send template:t\n";
    let generator = generator(dir.path());

    let (first, _) = run(&generator, host);
    let (second, _) = run(&generator, host);
    assert_eq!(first, "t 12\n");
    assert_eq!(first, second);
}

#[test]
fn should_process_file_with_templates_beside_it() {
    let dir = tempfile::tempdir().unwrap();
    let pkg = dir.path().join("src/example.com/widgets");
    fs::create_dir_all(&pkg).unwrap();
    fs::write(pkg.join("widget.go"), WIDGETS).unwrap();

    let host_dir = dir.path().join("host");
    fs::create_dir_all(&host_dir).unwrap();
    write_template(&host_dir, "wrap.tmpl", "wrap {{.Definition.Symbol}}");
    let host = host_dir.join("main.go");
    fs::write(
        &host,
        "package main\n// apig wrapTemplate:wrap.tmpl\n// apig gen:example.com/widgets.Widget->Send template:wrap\n",
    )
    .unwrap();

    let generator = Generator::new(
        GeneratorOptions::default(),
        FsPackageLoader::new(vec![dir.path().join("src")]),
    );
    let mut out = Vec::new();
    let report = generator.process_file(&host, &mut out).unwrap();
    assert!(report.is_success());
    assert_eq!(String::from_utf8(out).unwrap(), "wrap widgets.Send\n");
}

#[test]
fn should_fail_on_missing_host_file() {
    let generator = Generator::new(GeneratorOptions::default(), loader());
    let err = generator
        .process_file(Path::new("/no/such/host.go"), Vec::new())
        .unwrap_err();
    assert!(matches!(err, GeneratorError::Io { .. }));
}
