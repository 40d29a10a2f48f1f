//! Recursive-descent parser for Go source files.
//!
//! Declarations and types are parsed completely. Function bodies and
//! initializer expressions are consumed as balanced token runs: they must
//! tokenize and nest correctly, but their statements are not modelled.

use smallvec::SmallVec;

use crate::ast::{
    ArrayLen, AstArena, ChanDir, Field, FieldList, FuncDecl, GenDecl, GenDeclKind, IdentName,
    ImportSpec, InterfaceElem, NamedType, Signature, SignatureId, SourceFile, Span, Spec,
    StringLit, TopLevelDecl, Type, TypeId, TypeParam, TypeParamList, TypeSpec, ValueSpec,
};
use crate::error::{Diag, ParseFailure};
use crate::lexer::{Lexer, SpannedTok, Tok};

type PResult<T> = Result<T, Diag>;

/// Deepest type nesting accepted before giving up with a syntax error.
pub(crate) const MAX_NESTING: usize = 100;

/// Parses a Go source file.
///
/// Any lexer diagnostic fails the parse; otherwise the first syntax error
/// is returned.
pub fn parse_source(src: &str) -> Result<SourceFile, ParseFailure> {
    let mut lexer = Lexer::new(src);
    let toks: Vec<_> = lexer.by_ref().collect();
    let diags = lexer.take_diags();
    if !diags.is_empty() {
        return Err(ParseFailure { diags });
    }

    Parser::new(src, toks)
        .source_file()
        .map_err(|diag| ParseFailure { diags: vec![diag] })
}

/// Tokens that can begin a type.
fn can_start_type(tok: Tok<'_>) -> bool {
    matches!(
        tok,
        Tok::Ident(_)
            | Tok::Star
            | Tok::LBrack
            | Tok::LParen
            | Tok::Arrow
            | Tok::KwMap
            | Tok::KwChan
            | Tok::KwFunc
            | Tok::KwStruct
            | Tok::KwInterface
    )
}

/// Decodes the simple escapes that appear in import paths and struct tags.
fn unquote(raw: &str) -> String {
    let body = &raw[1..raw.len() - 1];
    if raw.starts_with('`') {
        return body.replace('\r', "");
    }
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

/// One comma-separated entry of a parameter list before Go's
/// "all named or none named" rule has been applied.
struct ParamEntry {
    name: Option<IdentName>,
    typ: Option<TypeId>,
    ellipsis: Option<Span>,
    span: Span,
}

struct Parser<'src> {
    toks: Vec<SpannedTok<'src>>,
    pos: usize,
    prev_end: usize,
    src_len: usize,
    arena: AstArena,
    /// Types currently being parsed, innermost last.
    depth: usize,
}

impl<'src> Parser<'src> {
    fn new(src: &'src str, toks: Vec<SpannedTok<'src>>) -> Self {
        Self {
            toks,
            pos: 0,
            prev_end: 0,
            src_len: src.len(),
            arena: AstArena::new(),
            depth: 0,
        }
    }

    // --- Token cursor ---

    #[inline]
    fn nth(&self, n: usize) -> Option<Tok<'src>> {
        self.toks.get(self.pos + n).map(|t| t.1)
    }

    #[inline]
    fn peek(&self) -> Option<Tok<'src>> {
        self.nth(0)
    }

    #[inline]
    fn at(&self, tok: Tok<'src>) -> bool {
        self.peek() == Some(tok)
    }

    fn cur_span(&self) -> Span {
        match self.toks.get(self.pos) {
            Some(&(start, _, end)) => Span::new(start, end),
            None => Span::empty_at(self.src_len),
        }
    }

    fn bump(&mut self) -> Span {
        let span = self.cur_span();
        if self.pos < self.toks.len() {
            self.prev_end = span.end as usize;
            self.pos += 1;
        }
        span
    }

    fn eat(&mut self, tok: Tok<'src>) -> bool {
        if self.at(tok) {
            self.bump();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, tok: Tok<'src>) -> PResult<Span> {
        if self.at(tok) {
            Ok(self.bump())
        } else {
            Err(self.unexpected(&tok.to_string()))
        }
    }

    fn found(&self) -> String {
        match self.toks.get(self.pos) {
            None => "EOF".to_string(),
            Some((start, Tok::Semi, end)) if start == end => "newline".to_string(),
            Some((_, tok, _)) => tok.to_string(),
        }
    }

    fn unexpected(&self, expected: &str) -> Diag {
        Diag::parse(
            self.cur_span(),
            format!("expected {expected}, found {}", self.found()),
        )
    }

    fn span_from(&self, start: Span) -> Span {
        Span {
            start: start.start,
            end: (self.prev_end as u32).max(start.start),
        }
    }

    fn ident(&mut self) -> PResult<IdentName> {
        match self.peek() {
            Some(Tok::Ident(name)) => {
                let span = self.bump();
                Ok(IdentName {
                    sym: self.arena.intern(name),
                    span,
                })
            }
            _ => Err(self.unexpected("'IDENT'")),
        }
    }

    /// `;` may be omitted right before the closing token of a group.
    fn expect_semi(&mut self, close: Tok<'src>) -> PResult<()> {
        if self.eat(Tok::Semi) || self.at(close) {
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    fn top_level_semi(&mut self) -> PResult<()> {
        if self.peek().is_none() || self.eat(Tok::Semi) {
            Ok(())
        } else {
            Err(self.unexpected("';'"))
        }
    }

    /// Consumes tokens up to, not including, the first token at bracket
    /// depth zero for which `stop` holds. Brackets must nest properly.
    fn skip_balanced(&mut self, stop: impl Fn(Tok<'src>) -> bool) -> PResult<()> {
        let mut closers: Vec<Tok<'src>> = Vec::new();
        loop {
            let Some(tok) = self.peek() else {
                return match closers.last() {
                    Some(close) => Err(self.unexpected(&close.to_string())),
                    None => Ok(()),
                };
            };
            if closers.is_empty() && stop(tok) {
                return Ok(());
            }
            match tok {
                Tok::LParen => closers.push(Tok::RParen),
                Tok::LBrack => closers.push(Tok::RBrack),
                Tok::LBrace => closers.push(Tok::RBrace),
                Tok::RParen | Tok::RBrack | Tok::RBrace => match closers.pop() {
                    Some(close) if close == tok => {}
                    Some(close) => return Err(self.unexpected(&close.to_string())),
                    None => {
                        return Err(Diag::parse(
                            self.cur_span(),
                            format!("unexpected {}", self.found()),
                        ))
                    }
                },
                _ => {}
            }
            self.bump();
        }
    }

    /// With `[` at lookahead `offset`, reports whether the bracket pair
    /// reads as type arguments: it is non-empty and the token after the
    /// matching `]` satisfies `is_end`.
    fn bracket_closes_type_args(&self, offset: usize, is_end: impl Fn(Tok<'src>) -> bool) -> bool {
        if self.nth(offset + 1) == Some(Tok::RBrack) {
            return false;
        }
        let mut depth = 0usize;
        let mut i = offset;
        while let Some(tok) = self.nth(i) {
            match tok {
                Tok::LBrack | Tok::LParen | Tok::LBrace => depth += 1,
                Tok::RBrack | Tok::RParen | Tok::RBrace => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return self.nth(i + 1).map_or(false, &is_end);
                    }
                }
                _ => {}
            }
            i += 1;
        }
        false
    }

    // --- Declarations ---

    fn source_file(mut self) -> PResult<SourceFile> {
        self.expect(Tok::KwPackage)?;
        let package_name = self.ident()?;
        self.top_level_semi()?;

        let mut imports = Vec::new();
        let mut decls = Vec::new();

        while self.at(Tok::KwImport) {
            let decl = self.gen_decl(GenDeclKind::Import)?;
            imports.extend(decl.specs.iter().filter_map(|s| match s {
                Spec::Import(i) => Some(i.clone()),
                _ => None,
            }));
            decls.push(TopLevelDecl::Gen(decl));
            self.top_level_semi()?;
        }

        while let Some(tok) = self.peek() {
            let decl = match tok {
                Tok::KwConst => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Const)?),
                Tok::KwVar => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Var)?),
                Tok::KwType => TopLevelDecl::Gen(self.gen_decl(GenDeclKind::Type)?),
                Tok::KwFunc => TopLevelDecl::Func(self.func_decl()?),
                Tok::KwImport => {
                    return Err(Diag::parse(
                        self.cur_span(),
                        "imports must appear before other declarations",
                    ))
                }
                _ => return Err(self.unexpected("declaration")),
            };
            decls.push(decl);
            self.top_level_semi()?;
        }

        Ok(SourceFile {
            package_name,
            arena: self.arena,
            imports,
            decls,
        })
    }

    fn gen_decl(&mut self, kind: GenDeclKind) -> PResult<GenDecl> {
        let start = self.bump();
        let mut specs = Vec::new();
        if self.eat(Tok::LParen) {
            while !self.at(Tok::RParen) {
                if self.peek().is_none() {
                    return Err(self.unexpected("')'"));
                }
                specs.push(self.spec(kind)?);
                self.expect_semi(Tok::RParen)?;
            }
            self.bump();
        } else {
            specs.push(self.spec(kind)?);
        }
        Ok(GenDecl {
            kind,
            specs,
            span: self.span_from(start),
        })
    }

    fn spec(&mut self, kind: GenDeclKind) -> PResult<Spec> {
        match kind {
            GenDeclKind::Import => self.import_spec().map(Spec::Import),
            GenDeclKind::Type => self.type_spec().map(Spec::Type),
            GenDeclKind::Const | GenDeclKind::Var => self.value_spec(kind).map(Spec::Value),
        }
    }

    fn import_spec(&mut self) -> PResult<ImportSpec> {
        let name = match self.peek() {
            Some(Tok::Ident(_)) => Some(self.ident()?),
            Some(Tok::Dot) => {
                let span = self.bump();
                Some(IdentName {
                    sym: self.arena.intern("."),
                    span,
                })
            }
            _ => None,
        };
        let path = self
            .string_lit()
            .ok_or_else(|| self.unexpected("import path"))?;
        Ok(ImportSpec { name, path })
    }

    fn string_lit(&mut self) -> Option<StringLit> {
        match self.peek() {
            Some(Tok::StringLit(raw) | Tok::RawStringLit(raw)) => {
                let span = self.bump();
                Some(StringLit {
                    raw: span,
                    value: unquote(raw),
                })
            }
            _ => None,
        }
    }

    fn type_spec(&mut self) -> PResult<TypeSpec> {
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) && self.starts_type_params() {
            Some(self.type_params()?)
        } else {
            None
        };
        let alias = self.eat(Tok::Assign);
        let typ = self.parse_type()?;
        Ok(TypeSpec {
            name,
            type_params,
            typ,
            alias,
        })
    }

    /// `type T[P any] ...` versus `type T [N]int`.
    fn starts_type_params(&self) -> bool {
        matches!(self.nth(1), Some(Tok::Ident(_)))
            && matches!(
                self.nth(2),
                Some(
                    Tok::Ident(_)
                        | Tok::Comma
                        | Tok::Tilde
                        | Tok::LBrack
                        | Tok::KwInterface
                        | Tok::KwFunc
                        | Tok::KwMap
                        | Tok::KwChan
                        | Tok::KwStruct
                )
            )
    }

    fn type_params(&mut self) -> PResult<TypeParamList> {
        let start = self.expect(Tok::LBrack)?;
        let mut params = Vec::new();
        loop {
            let mut names = SmallVec::new();
            names.push(self.ident()?);
            while self.at(Tok::Comma) && matches!(self.nth(1), Some(Tok::Ident(_))) {
                self.bump();
                names.push(self.ident()?);
            }
            let constraint = self.constraint()?;
            params.push(TypeParam { names, constraint });
            if !self.eat(Tok::Comma) || self.at(Tok::RBrack) {
                break;
            }
        }
        self.expect(Tok::RBrack)?;
        Ok(TypeParamList {
            params,
            span: self.span_from(start),
        })
    }

    fn value_spec(&mut self, kind: GenDeclKind) -> PResult<ValueSpec> {
        let mut names = SmallVec::new();
        names.push(self.ident()?);
        while self.eat(Tok::Comma) {
            names.push(self.ident()?);
        }

        let typ = match self.peek() {
            Some(tok) if can_start_type(tok) => Some(self.parse_type()?),
            _ => None,
        };
        let values = if self.eat(Tok::Assign) {
            Some(self.expr_list()?)
        } else {
            None
        };
        if kind == GenDeclKind::Var && typ.is_none() && values.is_none() {
            return Err(self.unexpected("type"));
        }
        Ok(ValueSpec { names, typ, values })
    }

    fn expr_list(&mut self) -> PResult<Span> {
        let start = self.cur_span();
        let first = self.pos;
        self.skip_balanced(|t| matches!(t, Tok::Semi | Tok::RParen))?;
        if self.pos == first {
            return Err(self.unexpected("expression"));
        }
        Ok(self.span_from(start))
    }

    fn func_decl(&mut self) -> PResult<FuncDecl> {
        let start = self.bump();
        let recv = if self.at(Tok::LParen) {
            Some(self.param_list()?)
        } else {
            None
        };
        let name = self.ident()?;
        let type_params = if self.at(Tok::LBrack) {
            Some(self.type_params()?)
        } else {
            None
        };
        let signature = self.signature(start)?;
        let body = if self.at(Tok::LBrace) {
            Some(self.block()?)
        } else {
            None
        };
        Ok(FuncDecl {
            recv,
            name,
            type_params,
            signature,
            body,
        })
    }

    fn block(&mut self) -> PResult<Span> {
        let start = self.expect(Tok::LBrace)?;
        self.skip_balanced(|t| t == Tok::RBrace)?;
        self.expect(Tok::RBrace)?;
        Ok(self.span_from(start))
    }

    // --- Signatures ---

    fn signature(&mut self, start: Span) -> PResult<SignatureId> {
        let params = self.param_list()?;
        let results = self.results()?;
        let span = self.span_from(start);
        Ok(self
            .arena
            .alloc_signature(Signature { params, results }, span))
    }

    fn results(&mut self) -> PResult<FieldList> {
        if self.at(Tok::LParen) {
            return self.param_list();
        }
        match self.peek() {
            Some(tok) if can_start_type(tok) => {
                let start = self.cur_span();
                let typ = self.parse_type()?;
                Ok(FieldList {
                    fields: vec![unnamed_field(typ, None)],
                    span: self.span_from(start),
                })
            }
            _ => Ok(FieldList {
                fields: Vec::new(),
                span: Span::empty_at(self.prev_end),
            }),
        }
    }

    fn param_list(&mut self) -> PResult<FieldList> {
        let start = self.expect(Tok::LParen)?;
        let mut entries = Vec::new();
        while !self.at(Tok::RParen) {
            entries.push(self.param_entry()?);
            if !self.eat(Tok::Comma) {
                break;
            }
        }
        self.expect(Tok::RParen)?;
        let fields = self.resolve_params(entries)?;
        Ok(FieldList {
            fields,
            span: self.span_from(start),
        })
    }

    fn param_entry(&mut self) -> PResult<ParamEntry> {
        let start = self.cur_span();
        if let Some(Tok::Ident(_)) = self.peek() {
            let named = match self.nth(1) {
                Some(Tok::Comma | Tok::RParen) => {
                    let name = self.ident()?;
                    return Ok(ParamEntry {
                        name: Some(name),
                        typ: None,
                        ellipsis: None,
                        span: name.span,
                    });
                }
                Some(Tok::Dot) => false,
                Some(Tok::Ellipsis) => true,
                Some(Tok::LBrack) => {
                    !self.bracket_closes_type_args(1, |t| matches!(t, Tok::Comma | Tok::RParen))
                }
                Some(tok) => can_start_type(tok),
                None => false,
            };
            if named {
                let name = self.ident()?;
                let (typ, ellipsis) = self.param_type()?;
                return Ok(ParamEntry {
                    name: Some(name),
                    typ: Some(typ),
                    ellipsis,
                    span: self.span_from(start),
                });
            }
        }
        let (typ, ellipsis) = self.param_type()?;
        Ok(ParamEntry {
            name: None,
            typ: Some(typ),
            ellipsis,
            span: self.span_from(start),
        })
    }

    fn param_type(&mut self) -> PResult<(TypeId, Option<Span>)> {
        let ellipsis = if self.at(Tok::Ellipsis) {
            Some(self.bump())
        } else {
            None
        };
        Ok((self.parse_type()?, ellipsis))
    }

    /// Either every entry carries a name or none does. In the unnamed form
    /// a bare identifier is a type name; in the named form it shares the
    /// type of the next typed entry (`a, b int`).
    fn resolve_params(&mut self, entries: Vec<ParamEntry>) -> PResult<Vec<Field>> {
        let named = entries
            .iter()
            .any(|e| e.name.is_some() && e.typ.is_some());

        if !named {
            return Ok(entries
                .into_iter()
                .map(|e| match (e.typ, e.name) {
                    (Some(typ), _) => unnamed_field(typ, e.ellipsis),
                    (None, Some(name)) => {
                        let typ = self.named_type_from_ident(name);
                        unnamed_field(typ, None)
                    }
                    (None, None) => unreachable!("parameter entry without name or type"),
                })
                .collect());
        }

        let mut fields = Vec::new();
        let mut pending: SmallVec<[IdentName; 2]> = SmallVec::new();
        for entry in entries {
            match (entry.name, entry.typ) {
                (Some(name), None) => pending.push(name),
                (Some(name), Some(typ)) => {
                    pending.push(name);
                    fields.push(Field {
                        names: std::mem::take(&mut pending),
                        typ,
                        ellipsis: entry.ellipsis,
                        tag: None,
                        embedded: false,
                    });
                }
                (None, _) => {
                    return Err(Diag::parse(
                        entry.span,
                        "mixed named and unnamed parameters",
                    ))
                }
            }
        }
        if let Some(last) = pending.last() {
            return Err(Diag::parse(last.span, "mixed named and unnamed parameters"));
        }
        Ok(fields)
    }

    fn named_type_from_ident(&mut self, name: IdentName) -> TypeId {
        self.arena.alloc_type(
            Type::Named(NamedType {
                pkg: None,
                name,
                type_args: SmallVec::new(),
            }),
            name.span,
        )
    }

    // --- Types ---

    fn parse_type(&mut self) -> PResult<TypeId> {
        if self.depth >= MAX_NESTING {
            return Err(Diag::parse(self.cur_span(), "exceeded max nesting depth"));
        }
        self.depth += 1;
        let typ = self.type_node();
        self.depth -= 1;
        typ
    }

    fn type_node(&mut self) -> PResult<TypeId> {
        let start = self.cur_span();
        let node = match self.peek() {
            Some(Tok::Ident(_)) => Type::Named(self.named_type()?),
            Some(Tok::Star) => {
                self.bump();
                Type::Pointer(self.parse_type()?)
            }
            Some(Tok::LBrack) => self.array_or_slice()?,
            Some(Tok::KwMap) => {
                self.bump();
                self.expect(Tok::LBrack)?;
                let key = self.parse_type()?;
                self.expect(Tok::RBrack)?;
                let value = self.parse_type()?;
                Type::Map { key, value }
            }
            Some(Tok::KwChan) => {
                self.bump();
                let dir = if self.eat(Tok::Arrow) {
                    ChanDir::Send
                } else {
                    ChanDir::Both
                };
                Type::Chan {
                    dir,
                    elem: self.parse_type()?,
                }
            }
            Some(Tok::Arrow) => {
                self.bump();
                self.expect(Tok::KwChan)?;
                Type::Chan {
                    dir: ChanDir::Recv,
                    elem: self.parse_type()?,
                }
            }
            Some(Tok::KwFunc) => {
                let func = self.bump();
                Type::Func(self.signature(func)?)
            }
            Some(Tok::KwStruct) => self.struct_type()?,
            Some(Tok::KwInterface) => self.interface_type()?,
            Some(Tok::LParen) => {
                self.bump();
                let inner = self.parse_type()?;
                self.expect(Tok::RParen)?;
                Type::Paren(inner)
            }
            _ => return Err(self.unexpected("type")),
        };
        Ok(self.arena.alloc_type(node, self.span_from(start)))
    }

    fn named_type(&mut self) -> PResult<NamedType> {
        let first = self.ident()?;
        let (pkg, name) = if self.eat(Tok::Dot) {
            (Some(first), self.ident()?)
        } else {
            (None, first)
        };
        let mut type_args = SmallVec::new();
        if self.eat(Tok::LBrack) {
            loop {
                type_args.push(self.parse_type()?);
                if !self.eat(Tok::Comma) || self.at(Tok::RBrack) {
                    break;
                }
            }
            self.expect(Tok::RBrack)?;
        }
        Ok(NamedType {
            pkg,
            name,
            type_args,
        })
    }

    fn array_or_slice(&mut self) -> PResult<Type> {
        self.bump();
        if self.eat(Tok::RBrack) {
            return Ok(Type::Slice(self.parse_type()?));
        }
        if self.at(Tok::Ellipsis) && self.nth(1) == Some(Tok::RBrack) {
            return Err(Diag::parse(
                self.cur_span(),
                "invalid use of [...] array (outside a composite literal)",
            ));
        }

        let len_start = self.cur_span();
        let first = self.pos;
        self.skip_balanced(|t| t == Tok::RBrack)?;
        let len = match &self.toks[first..self.pos] {
            [(_, Tok::IntLit(lit), _)] => ArrayLen::Lit(lit.to_string()),
            _ => ArrayLen::Expr(self.span_from(len_start)),
        };
        self.expect(Tok::RBrack)?;
        Ok(Type::Array {
            len,
            elem: self.parse_type()?,
        })
    }

    fn struct_type(&mut self) -> PResult<Type> {
        self.bump();
        self.expect(Tok::LBrace)?;
        let mut fields = Vec::new();
        while !self.at(Tok::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("'}'"));
            }
            fields.push(self.field_decl()?);
            self.expect_semi(Tok::RBrace)?;
        }
        self.bump();
        Ok(Type::Struct { fields })
    }

    fn field_decl(&mut self) -> PResult<Field> {
        let ends_field = |t: Tok<'src>| {
            matches!(
                t,
                Tok::Semi | Tok::RBrace | Tok::StringLit(_) | Tok::RawStringLit(_)
            )
        };
        let embedded = match (self.peek(), self.nth(1)) {
            (Some(Tok::Star), _) => true,
            (Some(Tok::Ident(_)), Some(Tok::Dot)) | (Some(Tok::Ident(_)), None) => true,
            (Some(Tok::Ident(_)), Some(Tok::LBrack)) => self.bracket_closes_type_args(1, ends_field),
            (Some(Tok::Ident(_)), Some(tok)) => ends_field(tok),
            _ => false,
        };

        let mut names = SmallVec::new();
        if !embedded {
            names.push(self.ident()?);
            while self.eat(Tok::Comma) {
                names.push(self.ident()?);
            }
        }
        let typ = self.parse_type()?;
        let tag = self.string_lit();
        Ok(Field {
            names,
            typ,
            ellipsis: None,
            tag,
            embedded,
        })
    }

    fn interface_type(&mut self) -> PResult<Type> {
        self.bump();
        self.expect(Tok::LBrace)?;
        let mut elems = Vec::new();
        while !self.at(Tok::RBrace) {
            if self.peek().is_none() {
                return Err(self.unexpected("'}'"));
            }
            let elem = match (self.peek(), self.nth(1)) {
                (Some(Tok::Ident(_)), Some(Tok::LParen)) => {
                    let name = self.ident()?;
                    let sig = self.signature(name.span)?;
                    InterfaceElem::Method { name, sig }
                }
                _ => InterfaceElem::Embed(self.constraint()?),
            };
            elems.push(elem);
            self.expect_semi(Tok::RBrace)?;
        }
        self.bump();
        Ok(Type::Interface { elems })
    }

    /// Constraint or embedded element: `T`, `~T`, `A | ~B | C`.
    fn constraint(&mut self) -> PResult<TypeId> {
        let start = self.cur_span();
        let first = self.constraint_term()?;
        if !self.at(Tok::Pipe) {
            return Ok(first);
        }
        let mut terms = vec![first];
        while self.eat(Tok::Pipe) {
            terms.push(self.constraint_term()?);
        }
        Ok(self
            .arena
            .alloc_type(Type::Union(terms), self.span_from(start)))
    }

    fn constraint_term(&mut self) -> PResult<TypeId> {
        let start = self.cur_span();
        if self.eat(Tok::Tilde) {
            let inner = self.parse_type()?;
            return Ok(self
                .arena
                .alloc_type(Type::Tilde(inner), self.span_from(start)));
        }
        self.parse_type()
    }
}

fn unnamed_field(typ: TypeId, ellipsis: Option<Span>) -> Field {
    Field {
        names: SmallVec::new(),
        typ,
        ellipsis,
        tag: None,
        embedded: false,
    }
}
