//! Template-driven code generation from an extracted [`Package`].
//!
//! Templates are Handlebars. Each selected interface is rendered once with
//! this data at the root:
//!
//! | key              | value                                              |
//! |------------------|----------------------------------------------------|
//! | `name`           | interface name                                     |
//! | `qualified_name` | interface name as seen from the output package     |
//! | `methods`        | the interface's [`Method`]s                        |
//! | `package`        | output package name                                |
//! | `source_package` | package the interface was extracted from           |
//! | `source`         | source identifier given in [`RenderOptions`]       |
//! | `meta`           | caller-supplied key/value pairs                    |
//! | `imports`        | explicit imports                                   |
//!
//! Rendered blocks are concatenated under a generated-code header, a
//! package clause and an import block, then tidied: trailing whitespace
//! is stripped and runs of blank lines collapse to one.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Import, Interface, Method, Package};

mod helpers;
mod imports;

pub use helpers::{
    input_calls, input_parameters, output_parameters, output_var_error, return_keyword,
    FunctionLibrary,
};

/// First line of every generated file.
pub const GENERATED_HEADER: &str = "// Code generated by ifacegen. DO NOT EDIT.";

#[derive(Debug, Default)]
pub struct RenderOptions {
    /// Identifies the source in diagnostics and to templates.
    pub source: String,
    /// Package clause of the output; the source package when unset or empty.
    pub package_name: Option<String>,
    /// Interfaces to render, by name. Empty renders all of them.
    pub interfaces: Vec<String>,
    pub template: Vec<u8>,
    pub meta: BTreeMap<String, String>,
    /// Always imported, in addition to what the rendered code references.
    pub imports: Vec<Import>,
    pub functions: FunctionLibrary,
}

#[derive(Serialize)]
struct InterfaceData<'a> {
    name: &'a str,
    qualified_name: String,
    methods: &'a [Method],
    package: &'a str,
    source_package: &'a str,
    source: &'a str,
    meta: &'a BTreeMap<String, String>,
    imports: &'a [Import],
}

/// Renders the selected interfaces of `package` into one Go source file.
pub fn render(package: &Package, options: RenderOptions) -> Result<Vec<u8>> {
    let RenderOptions {
        source,
        package_name,
        interfaces,
        template,
        meta,
        imports: explicit,
        functions,
    } = options;

    let output_package = package_name
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| package.name.clone());
    let selected = select(package, &interfaces)?;
    let template = String::from_utf8(template)
        .map_err(|e| Error::Template(format!("template is not valid UTF-8: {e}")))?;
    let template_name = if source.is_empty() { "template" } else { source.as_str() };

    let mut registry = Handlebars::new();
    registry.register_escape_fn(handlebars::no_escape);
    functions.install(&mut registry);
    helpers::register_vocabulary(&mut registry, &output_package);
    registry.register_template_string(template_name, template)?;

    let count = selected.len();
    let mut body = String::new();
    for iface in selected {
        let data = InterfaceData {
            name: &iface.name,
            qualified_name: qualified_name(iface, &package.name, &output_package),
            methods: &iface.methods,
            package: &output_package,
            source_package: &package.name,
            source: &source,
            meta: &meta,
            imports: &explicit,
        };
        body.push_str(&registry.render(template_name, &data)?);
        body.push('\n');
    }
    log::debug!("rendered {count} interface(s) from {template_name} into package {output_package}");

    let imports = imports::resolve(&body, package, &explicit);
    let mut out = String::with_capacity(body.len() + 256);
    let _ = writeln!(out, "{GENERATED_HEADER}\n\npackage {output_package}\n");
    if !imports.is_empty() {
        out.push_str("import (\n");
        for import in &imports {
            let _ = writeln!(out, "\t{import}");
        }
        out.push_str(")\n\n");
    }
    out.push_str(&body);

    Ok(tidy(&out).into_bytes())
}

fn select<'p>(package: &'p Package, names: &[String]) -> Result<Vec<&'p Interface>> {
    if let Some(missing) = names.iter().find(|n| package.interface(n).is_none()) {
        return Err(Error::UnknownInterface(missing.clone()));
    }
    Ok(package
        .interfaces
        .iter()
        .filter(|i| names.is_empty() || names.contains(&i.name))
        .collect())
}

fn qualified_name(iface: &Interface, source_package: &str, output_package: &str) -> String {
    if source_package == output_package {
        iface.name.clone()
    } else {
        format!("{source_package}.{}", iface.name)
    }
}

/// Strips trailing whitespace, drops leading blank lines, collapses blank
/// runs and ends the text with exactly one newline.
fn tidy(code: &str) -> String {
    let mut out = String::with_capacity(code.len());
    let mut blank = false;
    for line in code.lines().map(str::trim_end) {
        if line.is_empty() {
            if blank || out.is_empty() {
                continue;
            }
            blank = true;
        } else {
            blank = false;
        }
        out.push_str(line);
        out.push('\n');
    }
    while out.ends_with("\n\n") {
        out.pop();
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tidy_collapses_blank_runs() {
        assert_eq!(tidy("\n\na  \n\n\n\nb\t\n\n"), "a\n\nb\n");
        assert_eq!(tidy(""), "");
    }

    #[test]
    fn unknown_filter_name_is_rejected() {
        let package = Package {
            name: "foo".into(),
            ..Package::default()
        };
        let err = select(&package, &["Missing".to_string()]).unwrap_err();
        assert!(matches!(err, Error::UnknownInterface(name) if name == "Missing"));
    }

    #[test]
    fn qualified_name_depends_on_output_package() {
        let iface = Interface {
            name: "Service".into(),
            methods: vec![],
        };
        assert_eq!(qualified_name(&iface, "foo", "foo"), "Service");
        assert_eq!(qualified_name(&iface, "foo", "mocks"), "foo.Service");
    }
}
