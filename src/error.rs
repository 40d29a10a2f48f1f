use std::fmt;

use thiserror::Error;

/// Compact byte-span into the source text.
///
/// Offsets are `u32`; sources larger than 4GiB are clamped rather than
/// rejected, which only degrades diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: u32,
    pub end: u32, // exclusive
}

impl Span {
    #[inline]
    pub const fn new(start: usize, end: usize) -> Self {
        Self {
            start: clamp(start),
            end: clamp(end),
        }
    }

    #[inline]
    pub const fn empty_at(pos: usize) -> Self {
        let p = clamp(pos);
        Self { start: p, end: p }
    }

    #[inline]
    pub const fn from_range(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

#[inline]
const fn clamp(pos: usize) -> u32 {
    if pos > u32::MAX as usize {
        u32::MAX
    } else {
        pos as u32
    }
}

/// 1-based line and byte column, the way Go tooling reports positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    /// Resolves a byte offset against the text it was taken from.
    pub fn locate(src: &str, offset: u32) -> Self {
        let offset = (offset as usize).min(src.len());
        let before = &src.as_bytes()[..offset];
        let line = before.iter().filter(|&&b| b == b'\n').count() + 1;
        let line_start = before
            .iter()
            .rposition(|&b| b == b'\n')
            .map_or(0, |nl| nl + 1);
        Self {
            line,
            column: offset - line_start + 1,
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagKind {
    Lex,
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diag {
    pub kind: DiagKind,
    pub span: Span,
    pub message: String,
}

impl Diag {
    pub fn parse(span: Span, message: impl Into<String>) -> Self {
        Self {
            kind: DiagKind::Parse,
            span,
            message: message.into(),
        }
    }
}

/// Diagnostics collected while tokenizing and parsing one source file.
///
/// The parser stops at the first structural error, so `diags` holds any
/// lexer diagnostics seen up to that point followed by at most one parse
/// diagnostic.
#[derive(Debug, Clone)]
pub struct ParseFailure {
    pub diags: Vec<Diag>,
}

impl ParseFailure {
    /// The diagnostic closest to the start of the file.
    pub fn first(&self) -> Option<&Diag> {
        self.diags.iter().min_by_key(|d| d.span.start)
    }
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
pub enum LexErrorKind {
    #[default]
    #[error("invalid token")]
    InvalidToken,
    #[error("invalid numeric literal")]
    InvalidNumber,
    #[error("invalid escape sequence")]
    InvalidEscape,
    #[error("string literal not terminated")]
    UnterminatedString,
    #[error("comment not terminated")]
    UnterminatedComment,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("{kind}: {span:?}")]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    #[inline]
    pub fn diag(&self) -> Diag {
        Diag {
            kind: DiagKind::Lex,
            span: self.span,
            message: self.kind.to_string(),
        }
    }
}

/// Every way extraction or rendering can fail. None of them leave partial
/// output behind.
#[derive(Debug, Error)]
pub enum Error {
    #[error("no source supplied")]
    MissingSource,

    #[error("failed parsing source {position}: {message}")]
    Syntax { position: Position, message: String },

    #[error("unsupported type at {position}: {reason}")]
    UnsupportedType { position: Position, reason: String },

    #[error("unknown interface {0:?}")]
    UnknownInterface(String),

    #[error("template error: {0}")]
    Template(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Error {
    pub(crate) fn syntax(src: &str, diag: &Diag) -> Self {
        Error::Syntax {
            position: Position::locate(src, diag.span.start),
            message: diag.message.clone(),
        }
    }

    pub(crate) fn unsupported(src: &str, span: Span, reason: impl Into<String>) -> Self {
        Error::UnsupportedType {
            position: Position::locate(src, span.start),
            reason: reason.into(),
        }
    }

    pub(crate) fn from_parse_failure(src: &str, failure: &ParseFailure) -> Self {
        match failure.first() {
            Some(diag) => Error::syntax(src, diag),
            None => Error::Syntax {
                position: Position { line: 1, column: 1 },
                message: "invalid source".to_string(),
            },
        }
    }
}

impl From<handlebars::TemplateError> for Error {
    fn from(e: handlebars::TemplateError) -> Self {
        Error::Template(e.to_string())
    }
}

impl From<handlebars::RenderError> for Error {
    fn from(e: handlebars::RenderError) -> Self {
        Error::Template(e.to_string())
    }
}
