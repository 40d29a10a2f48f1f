//! Turns a parsed source file into the [`Package`] model.
//!
//! Only interface type declarations contribute. Each method signature is
//! converted parameter by parameter; unnamed parameters get positional
//! names (`_param1`, `_result1`, ...) so that every parameter of the
//! result can be referred to from generated code.

use std::collections::HashMap;

use crate::ast::{self, ArrayLen, AstArena, FieldList, InterfaceElem, SourceFile, Span, TypeId, TypeSpec};
use crate::error::{Error, Position, Result};
use crate::model::{ChanDir, Import, Interface, Method, Package, Parameter, Type};
use crate::parser::{parse_source, MAX_NESTING};

/// Extracts every interface declared in a Go source file.
///
/// `None` fails with [`Error::MissingSource`]. Parse errors fail with
/// [`Error::Syntax`] pointing at the first problem; types the model cannot
/// represent fail with [`Error::UnsupportedType`].
pub fn extract(source: Option<&[u8]>) -> Result<Package> {
    let bytes = source.ok_or(Error::MissingSource)?;
    let src = std::str::from_utf8(bytes).map_err(|e| {
        let valid = &bytes[..e.valid_up_to()];
        let valid = std::str::from_utf8(valid).unwrap_or_default();
        Error::Syntax {
            position: Position::locate(valid, valid.len() as u32),
            message: "invalid UTF-8 encoding".to_string(),
        }
    })?;

    let file = parse_source(src).map_err(|failure| Error::from_parse_failure(src, &failure))?;
    let package = Extractor::new(src, &file).package()?;
    log::debug!(
        "extracted {} interface(s) from package {}",
        package.interfaces.len(),
        package.name
    );
    Ok(package)
}

/// Go's export rule: the name starts with an upper-case letter.
fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Integer literal in any Go base, with `_` separators.
fn parse_int_literal(lit: &str) -> Option<i64> {
    let digits: String = lit
        .chars()
        .filter(|&c| c != '_')
        .collect::<String>()
        .to_ascii_lowercase();
    let (radix, body) = if let Some(hex) = digits.strip_prefix("0x") {
        (16, hex)
    } else if let Some(bin) = digits.strip_prefix("0b") {
        (2, bin)
    } else if let Some(oct) = digits.strip_prefix("0o") {
        (8, oct)
    } else if digits.len() > 1 && digits.starts_with('0') {
        (8, &digits[1..])
    } else {
        (10, digits.as_str())
    };
    i64::from_str_radix(body, radix).ok()
}

/// Hands out positional names for unnamed parameters of one list.
struct Positional {
    prefix: &'static str,
    next: usize,
}

impl Positional {
    fn new(prefix: &'static str) -> Self {
        Self { prefix, next: 0 }
    }

    fn next_name(&mut self) -> String {
        self.next += 1;
        format!("{}{}", self.prefix, self.next)
    }
}

struct Extractor<'a> {
    src: &'a str,
    file: &'a SourceFile,
    /// Interface declarations by name, in source order.
    interfaces: Vec<&'a TypeSpec>,
    by_name: HashMap<&'a str, &'a TypeSpec>,
}

impl<'a> Extractor<'a> {
    fn new(src: &'a str, file: &'a SourceFile) -> Self {
        let interfaces: Vec<&'a TypeSpec> = file
            .type_specs()
            .filter(|ts| {
                !ts.alias && matches!(file.arena.get_type(ts.typ), ast::Type::Interface { .. })
            })
            .collect();
        let by_name = interfaces
            .iter()
            .map(|ts| (file.arena.name(ts.name), *ts))
            .collect();
        Self {
            src,
            file,
            interfaces,
            by_name,
        }
    }

    fn arena(&self) -> &'a AstArena {
        &self.file.arena
    }

    fn unsupported(&self, span: Span, reason: impl Into<String>) -> Error {
        Error::unsupported(self.src, span, reason)
    }

    fn text(&self, span: Span) -> &'a str {
        self.src
            .get(span.start as usize..span.end as usize)
            .unwrap_or_default()
    }

    fn package(&self) -> Result<Package> {
        let imports = self
            .file
            .imports
            .iter()
            .map(|spec| Import {
                alias: spec.name.map(|n| self.arena().name(n).to_string()),
                path: spec.path.value.clone(),
            })
            .collect();

        let mut interfaces = Vec::with_capacity(self.interfaces.len());
        for &spec in &self.interfaces {
            let name = self.arena().name(spec.name);
            if let Some(params) = &spec.type_params {
                return Err(self.unsupported(params.span, format!("generic interface {name}")));
            }
            let mut methods = Vec::new();
            let mut visiting = vec![name];
            self.collect_methods(spec, &mut methods, &mut visiting)?;
            log::trace!("interface {name}: {} method(s)", methods.len());
            interfaces.push(Interface {
                name: name.to_string(),
                methods,
            });
        }

        Ok(Package {
            name: self.file.package().to_string(),
            imports,
            interfaces,
        })
    }

    /// Appends the methods of `spec` in declaration order, flattening
    /// embedded interfaces where they appear.
    fn collect_methods(
        &self,
        spec: &'a TypeSpec,
        methods: &mut Vec<Method>,
        visiting: &mut Vec<&'a str>,
    ) -> Result<()> {
        let ast::Type::Interface { elems } = self.arena().get_type(spec.typ) else {
            return Ok(());
        };
        for elem in elems {
            match elem {
                InterfaceElem::Method { name, sig } => {
                    let name_text = self.arena().name(*name);
                    let signature = self.arena().get_signature(*sig);
                    let (inputs, outputs) = self.signature(&signature.params, &signature.results)?;
                    let method = Method {
                        name: name_text.to_string(),
                        inputs,
                        outputs,
                    };
                    self.add_method(methods, method, name.span)?;
                }
                InterfaceElem::Embed(typ) => self.embed(*typ, methods, visiting)?,
            }
        }
        Ok(())
    }

    fn add_method(&self, methods: &mut Vec<Method>, method: Method, span: Span) -> Result<()> {
        match methods.iter().find(|m| m.name == method.name) {
            None => methods.push(method),
            Some(existing) if *existing == method => {}
            Some(_) => {
                return Err(self.unsupported(
                    span,
                    format!("duplicate method {} with a different signature", method.name),
                ))
            }
        }
        Ok(())
    }

    fn embed(&self, typ: TypeId, methods: &mut Vec<Method>, visiting: &mut Vec<&'a str>) -> Result<()> {
        let span = self.arena().type_span(typ);
        let named = match self.arena().get_type(typ) {
            ast::Type::Named(named) if named.pkg.is_none() && named.type_args.is_empty() => named,
            ast::Type::Named(_) => {
                return Err(self.unsupported(
                    span,
                    format!("embedded interface {} is not declared in this file", self.text(span)),
                ))
            }
            _ => {
                return Err(self.unsupported(
                    span,
                    format!("type constraint {} in interface", self.text(span)),
                ))
            }
        };

        let name = self.arena().name(named.name);
        if let Some(&spec) = self.by_name.get(name) {
            if visiting.contains(&name) {
                return Err(self.unsupported(span, format!("invalid recursive embedding of {name}")));
            }
            if spec.type_params.is_some() {
                return Err(self.unsupported(span, format!("generic interface {name}")));
            }
            if visiting.len() >= MAX_NESTING {
                return Err(self.unsupported(span, "exceeded max embedding depth"));
            }
            visiting.push(name);
            self.collect_methods(spec, methods, visiting)?;
            visiting.pop();
            return Ok(());
        }

        match name {
            "any" => Ok(()),
            "error" => self.add_method(
                methods,
                Method {
                    name: "Error".to_string(),
                    inputs: Vec::new(),
                    outputs: vec![Parameter::new("_result1", Type::builtin("string"))],
                },
                span,
            ),
            _ => Err(self.unsupported(
                span,
                format!("embedded type {name} is not an interface declared in this file"),
            )),
        }
    }

    /// Builds the input and output parameters of one signature.
    fn signature(&self, params: &FieldList, results: &FieldList) -> Result<(Vec<Parameter>, Vec<Parameter>)> {
        let inputs = self.parameters(params, Positional::new("_param"), true)?;
        let outputs = self.parameters(results, Positional::new("_result"), false)?;
        Ok((inputs, outputs))
    }

    fn parameters(&self, list: &FieldList, mut positional: Positional, allow_variadic: bool) -> Result<Vec<Parameter>> {
        let mut params = Vec::new();
        for (i, field) in list.fields.iter().enumerate() {
            let mut ty = self.resolve(field.typ)?;
            if let Some(dots) = field.ellipsis {
                let last = i + 1 == list.fields.len() && field.names.len() <= 1;
                if !(allow_variadic && last) {
                    return Err(self.unsupported(dots, "can only use ... with final parameter"));
                }
                ty = Type::variadic(ty);
            }

            if field.names.is_empty() {
                params.push(Parameter::new(positional.next_name(), ty));
            } else {
                for name in &field.names {
                    params.push(Parameter::new(self.arena().name(*name), ty.clone()));
                }
            }
        }
        Ok(params)
    }

    fn resolve(&self, id: TypeId) -> Result<Type> {
        let span = self.arena().type_span(id);
        let ty = match self.arena().get_type(id) {
            ast::Type::Named(named) => {
                if !named.type_args.is_empty() {
                    return Err(self.unsupported(
                        span,
                        format!("instantiated generic type {}", self.text(span)),
                    ));
                }
                let name = self.arena().name(named.name);
                match named.pkg {
                    Some(pkg) => Type::exported(self.arena().name(pkg), name),
                    None if is_exported(name) => Type::exported(self.file.package(), name),
                    None => Type::builtin(name),
                }
            }
            ast::Type::Pointer(elem) => Type::pointer(self.resolve(*elem)?),
            ast::Type::Slice(elem) => Type::slice(self.resolve(*elem)?),
            ast::Type::Array { len, elem } => {
                let len = match len {
                    ArrayLen::Lit(lit) => parse_int_literal(lit),
                    ArrayLen::Expr(_) => None,
                };
                let Some(len) = len else {
                    return Err(self.unsupported(
                        span,
                        format!("array length in {} is not an integer literal", self.text(span)),
                    ));
                };
                Type::array(len, self.resolve(*elem)?)
            }
            ast::Type::Map { key, value } => Type::map(self.resolve(*key)?, self.resolve(*value)?),
            ast::Type::Chan { dir, elem } => {
                let dir = match dir {
                    ast::ChanDir::Both => ChanDir::Both,
                    ast::ChanDir::Recv => ChanDir::Recv,
                    ast::ChanDir::Send => ChanDir::Send,
                };
                Type::chan(dir, self.resolve(*elem)?)
            }
            ast::Type::Func(sig) => {
                let signature = self.arena().get_signature(*sig);
                let (inputs, outputs) = self.signature(&signature.params, &signature.results)?;
                Type::func(
                    inputs.into_iter().map(|p| p.ty).collect(),
                    outputs.into_iter().map(|p| p.ty).collect(),
                )
            }
            ast::Type::Struct { fields } if fields.is_empty() => Type::builtin("struct{}"),
            ast::Type::Struct { .. } => {
                return Err(self.unsupported(span, "non-empty anonymous struct type"))
            }
            ast::Type::Interface { elems } if elems.is_empty() => Type::builtin("interface{}"),
            ast::Type::Interface { .. } => {
                return Err(self.unsupported(span, "non-empty anonymous interface type"))
            }
            ast::Type::Paren(inner) => self.resolve(*inner)?,
            ast::Type::Union(_) | ast::Type::Tilde(_) => {
                return Err(self.unsupported(
                    span,
                    format!("type constraint {} outside an interface", self.text(span)),
                ))
            }
        };
        Ok(ty)
    }
}
