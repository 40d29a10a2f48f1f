use std::collections::BTreeMap;

use handlebars::handlebars_helper;
use ifacegen::{extract, render, Error, FunctionLibrary, Import, Package, RenderOptions};
use indoc::indoc;
use pretty_assertions::assert_eq;

const SERVICE: &str = indoc! {"
    package foo

    import \"context\"

    type Service interface {
    \tFoo(string) Bar
    \tMult(p1, p2 string) (r1, r2 string)
    }

    type Store interface {
    \tLoad(ctx context.Context, id string) (*Bar, error)
    \tPut(items ...Bar) error
    }
"};

const DEFAULT_TEMPLATE: &str = include_str!("../src/bin/ifacegen/default.hbs");

fn service() -> Package {
    extract(Some(SERVICE.as_bytes())).unwrap()
}

fn options(template: &str) -> RenderOptions {
    RenderOptions {
        source: "service.go".into(),
        template: template.as_bytes().to_vec(),
        ..RenderOptions::default()
    }
}

fn render_str(package: &Package, options: RenderOptions) -> String {
    match render(package, options) {
        Ok(bytes) => String::from_utf8(bytes).unwrap(),
        Err(e) => panic!("render failed: {e}"),
    }
}

const SIGNATURES: &str =
    "{{#each methods}}{{name}}({{input_parameters this}}) {{output_parameters this}}\n{{/each}}";

#[test]
fn renders_selected_interface_signatures() {
    let mut opts = options(SIGNATURES);
    opts.interfaces = vec!["Service".into()];
    let out = render_str(&service(), opts);
    assert_eq!(
        out,
        indoc! {"
            // Code generated by ifacegen. DO NOT EDIT.

            package foo

            Foo(_param1 string) (_result1 Bar)
            Mult(p1 string, p2 string) (r1 string, r2 string)
        "}
    );
}

#[test]
fn empty_filter_renders_every_interface_in_order() {
    let out = render_str(&service(), options("// {{name}}\n"));
    let comments: Vec<_> = out.lines().filter(|l| l.starts_with("// ") && !l.contains("generated")).collect();
    assert_eq!(comments, vec!["// Service", "// Store"]);
}

#[test]
fn unknown_interface_is_rejected() {
    let mut opts = options(SIGNATURES);
    opts.interfaces = vec!["Service".into(), "Nope".into()];
    let err = render(&service(), opts).unwrap_err();
    assert!(matches!(err, Error::UnknownInterface(ref name) if name == "Nope"), "{err}");
}

#[test]
fn imports_follow_the_rendered_code() {
    let mut opts = options(indoc! {"
        {{#each methods}}
        func {{name}}({{input_parameters this}}) {{output_parameters this}} {
        \tfmt.Println(\"{{name}}\")
        }
        {{/each}}
    "});
    opts.interfaces = vec!["Store".into()];
    opts.imports = vec![Import::aliased("kit", "github.com/go-kit/kit")];
    let out = render_str(&service(), opts);
    assert!(
        out.contains("import (\n\t\"context\"\n\t\"fmt\"\n\tkit \"github.com/go-kit/kit\"\n)\n"),
        "{out}"
    );
    assert!(out.contains("func Load(ctx context.Context, id string) (_result1 *Bar, _result2 error) {"));
    assert!(out.contains("func Put(items ...Bar) (_result1 error) {"));
}

#[test]
fn override_package_qualifies_source_types() {
    let mut opts = options(SIGNATURES);
    opts.interfaces = vec!["Store".into()];
    opts.package_name = Some("mocks".into());
    opts.imports = vec![Import::new("example.com/app/foo")];
    let out = render_str(&service(), opts);
    assert!(out.contains("package mocks\n"), "{out}");
    assert!(out.contains("Load(ctx context.Context, id string) (_result1 *foo.Bar, _result2 error)"));
    assert!(out.contains("\t\"context\"\n\t\"example.com/app/foo\"\n"), "{out}");
}

#[test]
fn empty_override_keeps_source_package() {
    let mut opts = options("");
    opts.package_name = Some(String::new());
    let out = render_str(&service(), opts);
    assert!(out.contains("package foo\n"));
}

#[test]
fn exposes_meta_and_template_context() {
    let mut opts = options(
        "// {{name}} ({{qualified_name}}) from {{source}} in {{source_package}} for {{meta.owner}}{{meta.missing}}\n",
    );
    opts.interfaces = vec!["Service".into()];
    opts.package_name = Some("logging".into());
    opts.meta = BTreeMap::from([("owner".to_string(), "platform".to_string())]);
    let out = render_str(&service(), opts);
    assert!(
        out.ends_with("// Service (foo.Service) from service.go in foo for platform\n"),
        "{out}"
    );
}

#[test]
fn error_variable_and_return_helpers() {
    let mut opts = options(indoc! {"
        {{#each methods}}
        {{name}}: [{{return this}}] [{{output_var_error this}}] [{{input_calls this}}]
        {{/each}}
    "});
    opts.interfaces = vec!["Store".into()];
    let out = render_str(&service(), opts);
    assert!(out.contains("Load: [return] [_result2] [ctx, id]\n"), "{out}");
    assert!(out.contains("Put: [return] [_result1] [items...]\n"), "{out}");
}

#[test]
fn parameter_type_helper_respects_output_package() {
    let mut opts = options("{{#each methods}}{{#each outputs}}{{parameter_type this}};{{/each}}{{/each}}\n");
    opts.interfaces = vec!["Store".into()];
    let out = render_str(&service(), opts);
    assert!(out.ends_with("*Bar;error;error;\n"), "{out}");
}

#[test]
fn template_syntax_errors_are_reported() {
    let err = render(&service(), options("{{#each methods}}")).unwrap_err();
    assert!(matches!(err, Error::Template(_)), "{err}");
}

#[test]
fn helper_arguments_must_be_methods() {
    let err = render(&service(), options("{{input_parameters name}}")).unwrap_err();
    match err {
        Error::Template(msg) => assert!(msg.contains("input_parameters"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

handlebars_helper!(shout: |s: str| format!("{}!", s.to_uppercase()));

#[test]
fn function_library_extends_templates() {
    let mut opts = options(
        "// {{upper name}} {{trimPrefix \"Se\" name}} {{snakeCase name}} {{shout name}} {{default \"none\" meta.tag}}\n",
    );
    opts.interfaces = vec!["Service".into()];
    opts.functions = FunctionLibrary::standard().with("shout", shout);
    let out = render_str(&service(), opts);
    assert!(out.ends_with("// SERVICE rvice service SERVICE! none\n"), "{out}");
}

#[test]
fn vocabulary_cannot_be_shadowed() {
    let mut opts = options("{{#each methods}}{{return this}}|{{/each}}\n");
    opts.interfaces = vec!["Service".into()];
    opts.functions = FunctionLibrary::new().with("return", shout);
    let out = render_str(&service(), opts);
    assert!(out.ends_with("return|return|\n"), "{out}");
}

#[test]
fn default_template_builds_a_logging_decorator() {
    let mut opts = options(DEFAULT_TEMPLATE);
    opts.interfaces = vec!["Store".into()];
    let out = render_str(&service(), opts);

    for line in [
        "package foo",
        "\t\"context\"",
        "\t\"log\"",
        "\t\"time\"",
        "func NewStoreLogger(s Store) Store {",
        "type loggerStore struct {",
        "func (l *loggerStore) Load(ctx context.Context, id string) (_result1 *Bar, _result2 error) {",
        "\t\tvar err error = _result2",
        "\t\tlog.Print(\"method\", \"load\", \"took\", time.Since(begin), \"error\", err)",
        "\treturn l.s.Load(ctx, id)",
        "func (l *loggerStore) Put(items ...Bar) (_result1 error) {",
        "\treturn l.s.Put(items...)",
    ] {
        assert!(out.lines().any(|l| l == line), "missing {line:?} in\n{out}");
    }
    assert!(!out.contains("\n\n\n"));
}

#[test]
fn imports_versioned_modules_by_package_name() {
    let package = extract(Some(
        indoc! {r#"
            package store

            import (
            	"github.com/go-redis/redis/v8"
            	"gopkg.in/yaml.v2"
            )

            type Cache interface {
            	Get(c *redis.Client, n yaml.Node) error
            }
        "#}
        .as_bytes(),
    ))
    .unwrap();
    let out = render_str(
        &package,
        options("{{#each methods}}func {{name}}({{input_parameters this}}) {{output_parameters this}}\n{{/each}}"),
    );
    assert!(
        out.contains("import (\n\t\"github.com/go-redis/redis/v8\"\n\t\"gopkg.in/yaml.v2\"\n)\n"),
        "{out}"
    );
    assert!(out.contains("func Get(c *redis.Client, n yaml.Node) (_result1 error)"), "{out}");
}
