//! The extracted view of a Go package: its interfaces, their methods and
//! a structural representation of every parameter type.
//!
//! Everything here is plain data. It serializes with serde so that the
//! rendering engine can hand it to templates unchanged.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Package {
    pub name: String,
    /// Imports declared by the source file, used to resolve package
    /// qualifiers that appear in generated code.
    #[serde(default)]
    pub imports: Vec<Import>,
    #[serde(default)]
    pub interfaces: Vec<Interface>,
}

impl Package {
    pub fn interface(&self, name: &str) -> Option<&Interface> {
        self.interfaces.iter().find(|i| i.name == name)
    }
}

/// A Go import: `"path"` or `alias "path"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Import {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    pub path: String,
}

impl Import {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            alias: None,
            path: path.into(),
        }
    }

    pub fn aliased(alias: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            alias: Some(alias.into()),
            path: path.into(),
        }
    }

    /// The name code refers to the package by: the alias, or else the name
    /// `goimports` assumes from the path. A `/vN` major version element is
    /// skipped, a `go-` prefix dropped, and the element is cut at the first
    /// character that cannot appear in an identifier (`yaml.v2`, `redis-go`).
    pub fn name(&self) -> &str {
        if let Some(alias) = &self.alias {
            return alias;
        }
        let mut elems = self.path.rsplit('/');
        let last = elems.next().unwrap_or_default();
        let base = match elems.next() {
            Some(parent) if is_major_version(last) => parent,
            _ => last,
        };
        let base = base.strip_prefix("go-").unwrap_or(base);
        let end = base
            .find(|c: char| !(c.is_alphanumeric() || c == '_'))
            .unwrap_or(base.len());
        &base[..end]
    }
}

/// `v2`, `v10`, ...
fn is_major_version(elem: &str) -> bool {
    elem.strip_prefix('v')
        .is_some_and(|n| !n.is_empty() && n.bytes().all(|b| b.is_ascii_digit()))
}

impl fmt::Display for Import {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.alias {
            Some(alias) => write!(f, "{alias} {:?}", self.path),
            None => write!(f, "{:?}", self.path),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interface {
    pub name: String,
    #[serde(default)]
    pub methods: Vec<Method>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Method {
    pub name: String,
    #[serde(default)]
    pub inputs: Vec<Parameter>,
    #[serde(default)]
    pub outputs: Vec<Parameter>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameter {
    /// Empty only for parameters built by hand; extraction always names
    /// every parameter.
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Type,
}

impl Parameter {
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChanDir {
    /// `chan T`
    #[default]
    Both,
    /// `<-chan T`
    Recv,
    /// `chan<- T`
    Send,
}

impl ChanDir {
    pub fn read_only(self) -> bool {
        self == ChanDir::Recv
    }

    pub fn write_only(self) -> bool {
        self == ChanDir::Send
    }
}

/// Structural description of a Go type.
///
/// `Exported` qualifies a name with the package it belongs to: an exported
/// identifier of the source package, or any `pkg.Name` selector. Everything
/// else named (predeclared or unexported identifiers) is `Builtin`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Type {
    Builtin {
        name: String,
    },
    Exported {
        package: String,
        #[serde(rename = "type")]
        ty: Box<Type>,
    },
    Pointer {
        elem: Box<Type>,
    },
    /// A negative `len` is a slice.
    Array {
        len: i64,
        elem: Box<Type>,
    },
    Map {
        key: Box<Type>,
        value: Box<Type>,
    },
    Chan {
        dir: ChanDir,
        elem: Box<Type>,
    },
    /// Final parameter written `...T`.
    Variadic {
        elem: Box<Type>,
    },
    Func {
        #[serde(default)]
        inputs: Vec<Type>,
        #[serde(default)]
        outputs: Vec<Type>,
    },
}

impl Type {
    pub fn builtin(name: impl Into<String>) -> Self {
        Type::Builtin { name: name.into() }
    }

    pub fn exported(package: impl Into<String>, name: impl Into<String>) -> Self {
        Type::Exported {
            package: package.into(),
            ty: Box::new(Type::builtin(name)),
        }
    }

    pub fn pointer(elem: Type) -> Self {
        Type::Pointer {
            elem: Box::new(elem),
        }
    }

    pub fn slice(elem: Type) -> Self {
        Type::array(-1, elem)
    }

    pub fn array(len: i64, elem: Type) -> Self {
        Type::Array {
            len,
            elem: Box::new(elem),
        }
    }

    pub fn map(key: Type, value: Type) -> Self {
        Type::Map {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn chan(dir: ChanDir, elem: Type) -> Self {
        Type::Chan {
            dir,
            elem: Box::new(elem),
        }
    }

    pub fn variadic(elem: Type) -> Self {
        Type::Variadic {
            elem: Box::new(elem),
        }
    }

    pub fn func(inputs: Vec<Type>, outputs: Vec<Type>) -> Self {
        Type::Func { inputs, outputs }
    }

    pub fn is_variadic(&self) -> bool {
        matches!(self, Type::Variadic { .. })
    }

    /// Exactly the predeclared `error` interface.
    pub fn is_error(&self) -> bool {
        matches!(self, Type::Builtin { name } if name == "error")
    }

    /// Go source text for this type as seen from code in package
    /// `package`: names exported from that package are left unqualified.
    /// `None` qualifies every exported name.
    pub fn source_in<'a>(&'a self, package: Option<&'a str>) -> TypeSource<'a> {
        TypeSource { ty: self, package }
    }
}

/// Fully qualified Go source text.
impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.source_in(None).fmt(f)
    }
}

/// Display adapter returned by [`Type::source_in`].
#[derive(Debug, Clone, Copy)]
pub struct TypeSource<'a> {
    ty: &'a Type,
    package: Option<&'a str>,
}

impl<'a> TypeSource<'a> {
    fn of(&self, ty: &'a Type) -> TypeSource<'a> {
        TypeSource {
            ty,
            package: self.package,
        }
    }

    fn list(&self, f: &mut fmt::Formatter<'_>, types: &'a [Type]) -> fmt::Result {
        for (i, ty) in types.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", self.of(ty))?;
        }
        Ok(())
    }
}

impl fmt::Display for TypeSource<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.ty {
            Type::Builtin { name } => f.write_str(name),
            Type::Exported { package, ty } => {
                if self.package != Some(package.as_str()) {
                    write!(f, "{package}.")?;
                }
                write!(f, "{}", self.of(ty))
            }
            Type::Pointer { elem } => write!(f, "*{}", self.of(elem)),
            Type::Array { len, elem } if *len < 0 => write!(f, "[]{}", self.of(elem)),
            Type::Array { len, elem } => write!(f, "[{len}]{}", self.of(elem)),
            Type::Map { key, value } => write!(f, "map[{}]{}", self.of(key), self.of(value)),
            Type::Chan { dir, elem } => {
                f.write_str(match dir {
                    ChanDir::Both => "chan ",
                    ChanDir::Recv => "<-chan ",
                    ChanDir::Send => "chan<- ",
                })?;
                // `chan <-chan T` would read as `chan<- (chan T)`.
                let recv_elem = matches!(**elem, Type::Chan { dir: ChanDir::Recv, .. });
                if recv_elem && *dir != ChanDir::Recv {
                    write!(f, "({})", self.of(elem))
                } else {
                    write!(f, "{}", self.of(elem))
                }
            }
            Type::Variadic { elem } => write!(f, "...{}", self.of(elem)),
            Type::Func { inputs, outputs } => {
                f.write_str("func(")?;
                self.list(f, inputs)?;
                f.write_str(")")?;
                match outputs.as_slice() {
                    [] => Ok(()),
                    [only] => write!(f, " {}", self.of(only)),
                    many => {
                        f.write_str(" (")?;
                        self.list(f, many)?;
                        f.write_str(")")
                    }
                }
            }
        }
    }
}

/// Indented listing used by `--debug-parser`.
impl fmt::Display for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "package {}", self.name)?;
        for import in &self.imports {
            writeln!(f, "  import {import}")?;
        }
        for iface in &self.interfaces {
            writeln!(f, "  interface {}", iface.name)?;
            for method in &iface.methods {
                writeln!(f, "    method {}", method.name)?;
                for p in &method.inputs {
                    writeln!(f, "      in  {} {}", p.name, p.ty)?;
                }
                for p in &method.outputs {
                    writeln!(f, "      out {} {}", p.name, p.ty)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_every_type_shape() {
        let cases = [
            (Type::builtin("int"), "int"),
            (Type::exported("foo", "Entity"), "foo.Entity"),
            (Type::pointer(Type::exported("foo", "Entity")), "*foo.Entity"),
            (Type::slice(Type::builtin("byte")), "[]byte"),
            (Type::array(4, Type::builtin("int")), "[4]int"),
            (
                Type::map(Type::builtin("string"), Type::slice(Type::builtin("int"))),
                "map[string][]int",
            ),
            (Type::chan(ChanDir::Both, Type::builtin("int")), "chan int"),
            (Type::chan(ChanDir::Recv, Type::builtin("int")), "<-chan int"),
            (Type::chan(ChanDir::Send, Type::builtin("int")), "chan<- int"),
            (Type::variadic(Type::builtin("string")), "...string"),
            (Type::func(vec![], vec![]), "func()"),
            (
                Type::func(vec![Type::builtin("int")], vec![Type::builtin("error")]),
                "func(int) error",
            ),
            (
                Type::func(
                    vec![Type::builtin("int"), Type::builtin("string")],
                    vec![Type::builtin("bool"), Type::builtin("error")],
                ),
                "func(int, string) (bool, error)",
            ),
        ];
        for (ty, want) in cases {
            assert_eq!(ty.to_string(), want);
        }
    }

    #[test]
    fn parenthesizes_receive_channel_elements() {
        let inner = Type::chan(ChanDir::Recv, Type::builtin("int"));
        assert_eq!(
            Type::chan(ChanDir::Both, inner.clone()).to_string(),
            "chan (<-chan int)"
        );
        assert_eq!(
            Type::chan(ChanDir::Recv, inner).to_string(),
            "<-chan <-chan int"
        );
    }

    #[test]
    fn channel_direction_flags_are_exclusive() {
        for dir in [ChanDir::Both, ChanDir::Recv, ChanDir::Send] {
            assert!(!(dir.read_only() && dir.write_only()));
        }
        assert!(ChanDir::Recv.read_only());
        assert!(ChanDir::Send.write_only());
        assert!(!ChanDir::Both.read_only() && !ChanDir::Both.write_only());
    }

    #[test]
    fn drops_qualifier_of_the_current_package() {
        let ty = Type::map(
            Type::builtin("string"),
            Type::pointer(Type::exported("foo", "Entity")),
        );
        assert_eq!(ty.source_in(Some("foo")).to_string(), "map[string]*Entity");
        assert_eq!(ty.source_in(Some("bar")).to_string(), "map[string]*foo.Entity");
    }

    #[test]
    fn import_name_defaults_to_last_path_element() {
        assert_eq!(Import::new("net/http").name(), "http");
        assert_eq!(Import::new("fmt").name(), "fmt");
        assert_eq!(Import::aliased("str", "strings").name(), "str");
        assert_eq!(Import::aliased("str", "strings").to_string(), "str \"strings\"");
    }

    #[test]
    fn import_name_follows_module_conventions() {
        let cases = [
            ("github.com/go-redis/redis/v8", "redis"),
            ("gopkg.in/yaml.v2", "yaml"),
            ("github.com/mattn/go-sqlite3", "sqlite3"),
            ("github.com/nats-io/nats.go", "nats"),
            ("github.com/foo/redis-go", "redis"),
            ("github.com/jackc/pgx/v5/pgxpool", "pgxpool"),
            ("example.com/v2", "example"),
        ];
        for (path, want) in cases {
            assert_eq!(Import::new(path).name(), want, "{path}");
        }
        assert_eq!(Import::aliased("rdb", "github.com/go-redis/redis/v8").name(), "rdb");
    }

    #[test]
    fn serializes_types_with_kind_tags() {
        let json = serde_json::to_value(Type::exported("context", "Context")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "kind": "exported",
                "package": "context",
                "type": { "kind": "builtin", "name": "Context" }
            })
        );
    }

    #[test]
    fn debug_listing_is_indented() {
        let pkg = Package {
            name: "foo".into(),
            imports: vec![],
            interfaces: vec![Interface {
                name: "Service".into(),
                methods: vec![Method {
                    name: "Load".into(),
                    inputs: vec![Parameter::new("id", Type::builtin("string"))],
                    outputs: vec![Parameter::new("_result1", Type::builtin("error"))],
                }],
            }],
        };
        assert_eq!(
            pkg.to_string(),
            "package foo\n  interface Service\n    method Load\n      in  id string\n      out _result1 error\n"
        );
    }
}
