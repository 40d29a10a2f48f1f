//! Syntax tree for Go source files.
//!
//! Declarations and the full type grammar are kept; statement and expression
//! bodies are only recorded as spans because nothing downstream looks inside
//! them.
//!
//! ## Layout
//!
//! - **Arena allocation**: type and signature nodes live in [`AstArena`] and
//!   are referenced through typed `la_arena` indices, so recursive types
//!   never need boxing.
//! - **Interned names**: identifiers are [`Symbol`]s resolved through the
//!   arena's [`Interner`].
//! - **Spans**: every node is wrapped in [`Spanned`] so later stages can
//!   point diagnostics at the offending source.

use std::collections::HashMap;

use la_arena::{Arena, Idx};
use smallvec::SmallVec;

pub use crate::error::Span;

// =============================================================================
// Core types, IDs and arena
// =============================================================================

/// Type-safe index into the types arena.
pub type TypeId = Idx<Spanned<Type>>;

/// Type-safe index into the function signatures arena.
pub type SignatureId = Idx<Spanned<Signature>>;

/// An interned string handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(transparent)]
pub struct Symbol(u32);

/// Wrapper that associates a node with its source location.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub node: T,
    pub span: Span,
}

/// Deduplicating string interner.
#[derive(Debug, Default)]
pub struct Interner {
    map: HashMap<Box<str>, Symbol>,
    vec: Vec<Box<str>>,
}

impl Interner {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        let boxed: Box<str> = s.into();
        let sym = Symbol(self.vec.len() as u32);
        self.map.insert(boxed.clone(), sym);
        self.vec.push(boxed);
        sym
    }

    #[inline]
    pub fn resolve(&self, sym: Symbol) -> &str {
        &self.vec[sym.0 as usize]
    }
}

/// Owns every type and signature node of one source file.
#[derive(Debug, Default)]
pub struct AstArena {
    pub types: Arena<Spanned<Type>>,
    pub signatures: Arena<Spanned<Signature>>,
    pub names: Interner,
}

impl AstArena {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn alloc_type(&mut self, typ: Type, span: Span) -> TypeId {
        self.types.alloc(Spanned { node: typ, span })
    }

    #[inline]
    pub fn alloc_signature(&mut self, sig: Signature, span: Span) -> SignatureId {
        self.signatures.alloc(Spanned { node: sig, span })
    }

    #[inline]
    pub fn get_type(&self, id: TypeId) -> &Type {
        &self.types[id].node
    }

    #[inline]
    pub fn type_span(&self, id: TypeId) -> Span {
        self.types[id].span
    }

    #[inline]
    pub fn get_signature(&self, id: SignatureId) -> &Signature {
        &self.signatures[id].node
    }

    #[inline]
    pub fn intern(&mut self, s: &str) -> Symbol {
        self.names.intern(s)
    }

    #[inline]
    pub fn name(&self, ident: IdentName) -> &str {
        self.names.resolve(ident.sym)
    }
}

/// An identifier occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentName {
    pub sym: Symbol,
    pub span: Span,
}

// =============================================================================
// Root structure and declarations
// =============================================================================

/// A parsed Go source file.
#[derive(Debug)]
pub struct SourceFile {
    pub package_name: IdentName,
    pub arena: AstArena,
    pub imports: Vec<ImportSpec>,
    pub decls: Vec<TopLevelDecl>,
}

impl SourceFile {
    pub fn package(&self) -> &str {
        self.arena.name(self.package_name)
    }

    /// Type specs of every `type` declaration, in source order.
    pub fn type_specs(&self) -> impl Iterator<Item = &TypeSpec> {
        self.decls
            .iter()
            .filter_map(|d| match d {
                TopLevelDecl::Gen(g) if g.kind == GenDeclKind::Type => Some(&g.specs),
                _ => None,
            })
            .flatten()
            .filter_map(|s| match s {
                Spec::Type(ts) => Some(ts),
                _ => None,
            })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TopLevelDecl {
    Gen(GenDecl),
    Func(FuncDecl),
}

/// `import`, `const`, `type` or `var` declaration, single or grouped.
#[derive(Debug, Clone, PartialEq)]
pub struct GenDecl {
    pub kind: GenDeclKind,
    pub specs: Vec<Spec>,
    pub span: Span,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenDeclKind {
    Import,
    Const,
    Type,
    Var,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Spec {
    Import(ImportSpec),
    Value(ValueSpec),
    Type(TypeSpec),
}

/// `import "path"`, `import name "path"`, `import . "path"`, `import _ "path"`.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportSpec {
    pub name: Option<IdentName>,
    pub path: StringLit,
}

/// Names, optional type, and the span of the initializer expressions.
#[derive(Debug, Clone, PartialEq)]
pub struct ValueSpec {
    pub names: SmallVec<[IdentName; 2]>,
    pub typ: Option<TypeId>,
    pub values: Option<Span>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeSpec {
    pub name: IdentName,
    pub type_params: Option<TypeParamList>,
    pub typ: TypeId,
    /// `type A = B` rather than `type A B`.
    pub alias: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FuncDecl {
    pub recv: Option<FieldList>,
    pub name: IdentName,
    pub type_params: Option<TypeParamList>,
    pub signature: SignatureId,
    /// Span of the `{ ... }` body; `None` for external declarations.
    pub body: Option<Span>,
}

/// Parameters and results. A single unparenthesized result type is stored
/// as one unnamed result field.
#[derive(Debug, Clone, PartialEq)]
pub struct Signature {
    pub params: FieldList,
    pub results: FieldList,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParamList {
    pub params: Vec<TypeParam>,
    pub span: Span,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeParam {
    pub names: SmallVec<[IdentName; 2]>,
    pub constraint: TypeId,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FieldList {
    pub fields: Vec<Field>,
    pub span: Span,
}

impl FieldList {
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

/// One field group: zero or more names sharing a type.
#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub names: SmallVec<[IdentName; 2]>,
    pub typ: TypeId,
    /// Position of `...` for a variadic parameter.
    pub ellipsis: Option<Span>,
    pub tag: Option<StringLit>,
    /// Embedded struct field (`T`, `*T`, `pkg.T`).
    pub embedded: bool,
}

/// A string literal with its decoded value.
#[derive(Debug, Clone, PartialEq)]
pub struct StringLit {
    pub raw: Span,
    pub value: String,
}

// =============================================================================
// Types
// =============================================================================

#[derive(Debug, Clone, PartialEq)]
pub enum Type {
    /// Named type, possibly package-qualified and possibly instantiated.
    Named(NamedType),

    /// `*T`
    Pointer(TypeId),

    /// `[len]T`
    Array { len: ArrayLen, elem: TypeId },

    /// `[]T`
    Slice(TypeId),

    /// `map[K]V`
    Map { key: TypeId, value: TypeId },

    /// `chan T`, `chan<- T`, `<-chan T`
    Chan { dir: ChanDir, elem: TypeId },

    Struct { fields: Vec<Field> },

    Interface { elems: Vec<InterfaceElem> },

    /// `func(...) ...`
    Func(SignatureId),

    /// Constraint union `A | B`.
    Union(Vec<TypeId>),

    /// Constraint term `~T`.
    Tilde(TypeId),

    /// `(T)`
    Paren(TypeId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct NamedType {
    pub pkg: Option<IdentName>,
    pub name: IdentName,
    pub type_args: SmallVec<[TypeId; 2]>,
}

/// Array length as written.
#[derive(Debug, Clone, PartialEq)]
pub enum ArrayLen {
    /// A lone integer literal.
    Lit(String),
    /// Any other constant expression.
    Expr(Span),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChanDir {
    Both,
    Send,
    Recv,
}

#[derive(Debug, Clone, PartialEq)]
pub enum InterfaceElem {
    Method { name: IdentName, sig: SignatureId },
    /// Embedded interface, type term or union.
    Embed(TypeId),
}
