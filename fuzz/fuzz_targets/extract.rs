#![no_main]

use ifacegen::lexer::Lexer;
use ifacegen::{extract, render, Error, RenderOptions};
use libfuzzer_sys::fuzz_target;

const TEMPLATE: &str = "{{#each methods}}func (l *logger) {{name}}({{input_parameters this}}) {{output_parameters this}} {\n\t{{return this}} l.s.{{name}}({{input_calls this}}) // {{output_var_error this}}\n}\n{{/each}}";

fuzz_target!(|data: &[u8]| {
    // Diagnostics become error positions, so they must stay inside the input.
    if let Ok(src) = std::str::from_utf8(data) {
        let mut lx = Lexer::new(src);
        lx.by_ref().for_each(drop);
        for diag in lx.take_diags() {
            assert!(diag.span.start <= diag.span.end);
            assert!(diag.span.end as usize <= src.len());
        }
    }

    let package = match extract(Some(data)) {
        Ok(package) => package,
        Err(Error::Syntax { position, .. } | Error::UnsupportedType { position, .. }) => {
            assert!(position.line >= 1 && position.column >= 1);
            return;
        }
        Err(e) => panic!("unexpected error kind: {e}"),
    };

    // Anything extracted must render with the signature vocabulary, and the
    // import block must only name imports the source file or stdlib provide.
    let opts = RenderOptions {
        template: TEMPLATE.as_bytes().to_vec(),
        ..RenderOptions::default()
    };
    let out = match render(&package, opts) {
        Ok(out) => String::from_utf8(out).expect("rendered output is UTF-8"),
        Err(e) => panic!("render failed: {e}"),
    };
    let clause = format!("package {}\n", package.name);
    assert!(out.contains(&clause));
    for import in &package.imports {
        let line = format!("\t{import}\n");
        if out.contains(&line) {
            assert!(out.contains(&format!("{}.", import.name())));
        }
    }
});
