//! Go tokenizer.
//!
//! Logos does the raw scanning; [`Lexer`] wraps it to implement Go's
//! automatic semicolon insertion and to turn scanning failures into
//! diagnostics plus a [`Tok::Error`] token, so callers always see a
//! complete token stream.

use std::ops::Range;

use logos::{Lexer as LogosLexer, Logos};

use crate::error::{Diag, LexError, LexErrorKind, Span};

// =============================================================================
// Raw scanner
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumKind {
    Int,
    Float,
    Imag,
}

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(error = LexErrorKind)]
#[logos(skip r"[ \t\f]+")]
#[rustfmt::skip]
enum RawTok {
    #[token("\u{FEFF}")] Bom,

    #[regex(r"\r\n|\n|\r")] Newline,
    #[regex(r"//[^\n\r]*", logos::skip)] _LineComment,
    #[token("/*", block_comment)] BlockComment,

    // Keywords are split out of identifiers in `keyword`.
    #[regex(r"[_\p{L}][_\p{L}\p{Nd}]*")] Ident,

    #[regex(r"[0-9]|\.[0-9]", lex_number)] Number(NumKind),

    #[regex(r"`[^`]*`")] RawString,
    #[regex(r"`[^`]*", unterminated)] _UnterminatedRaw,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*""#, interpreted_string)] String,
    #[regex(r#""([^"\\\n\r]|\\[^\n\r])*"#, unterminated)] _UnterminatedString,
    #[regex(r"'([^'\\\n\r]|\\[^\n\r])+'", rune_lit)] Rune,

    #[token("...")] Ellipsis,
    #[token("<<=")] ShlAssign,
    #[token(">>=")] ShrAssign,
    #[token("&^=")] AndNotAssign,
    #[token("+=")] AddAssign,
    #[token("-=")] SubAssign,
    #[token("*=")] MulAssign,
    #[token("/=")] DivAssign,
    #[token("%=")] ModAssign,
    #[token("&=")] AndAssign,
    #[token("|=")] OrAssign,
    #[token("^=")] XorAssign,
    #[token("<<")] Shl,
    #[token(">>")] Shr,
    #[token("&^")] AndNot,
    #[token("&&")] LAnd,
    #[token("||")] LOr,
    #[token("==")] EqEq,
    #[token("!=")] NotEq,
    #[token("<=")] Le,
    #[token(">=")] Ge,
    #[token("++")] Inc,
    #[token("--")] Dec,
    #[token(":=")] Define,
    #[token("<-")] Arrow,
    #[token("=")] Assign,
    #[token("+")] Plus,
    #[token("-")] Minus,
    #[token("*")] Star,
    #[token("/")] Slash,
    #[token("%")] Percent,
    #[token("&")] Amp,
    #[token("|")] Pipe,
    #[token("^")] Caret,
    #[token("~")] Tilde,
    #[token("!")] Bang,
    #[token("<")] Lt,
    #[token(">")] Gt,

    #[token("(")] LParen,
    #[token(")")] RParen,
    #[token("[")] LBrack,
    #[token("]")] RBrack,
    #[token("{")] LBrace,
    #[token("}")] RBrace,
    #[token(",")] Comma,
    #[token(";")] Semi,
    #[token(":")] Colon,
    #[token(".")] Dot,
}

fn block_comment(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    match lex.remainder().find("*/") {
        Some(end) => {
            lex.bump(end + 2);
            Ok(())
        }
        None => {
            lex.bump(lex.remainder().len());
            Err(LexErrorKind::UnterminatedComment)
        }
    }
}

fn unterminated(_: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    Err(LexErrorKind::UnterminatedString)
}

fn interpreted_string(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    validate_escapes(&s[1..s.len() - 1], '"').map(|_| ())
}

fn rune_lit(lex: &mut LogosLexer<'_, RawTok>) -> Result<(), LexErrorKind> {
    let s = lex.slice();
    match validate_escapes(&s[1..s.len() - 1], '\'')? {
        1 => Ok(()),
        _ => Err(LexErrorKind::InvalidToken),
    }
}

/// Checks Go escape sequences in a literal body and returns how many
/// characters (escapes count as one) it contains.
fn validate_escapes(body: &str, quote: char) -> Result<usize, LexErrorKind> {
    let mut chars = body.chars();
    let mut count = 0;
    while let Some(c) = chars.next() {
        count += 1;
        if c != '\\' {
            continue;
        }
        let digits = match chars.next() {
            Some('a' | 'b' | 'f' | 'n' | 'r' | 't' | 'v' | '\\') => continue,
            Some(q) if q == quote => continue,
            Some('x') => (2, 16),
            Some('u') => (4, 16),
            Some('U') => (8, 16),
            Some('0'..='7') => (2, 8),
            _ => return Err(LexErrorKind::InvalidEscape),
        };
        let (n, radix) = digits;
        for _ in 0..n {
            match chars.next() {
                Some(d) if d.is_digit(radix) => {}
                _ => return Err(LexErrorKind::InvalidEscape),
            }
        }
    }
    Ok(count)
}

// =============================================================================
// Numbers (maximal munch, then validation)
// =============================================================================

fn lex_number(lex: &mut LogosLexer<'_, RawTok>) -> Result<NumKind, LexErrorKind> {
    let start = lex.span().start;
    let end = scan_number(lex.source().as_bytes(), start);
    let already = lex.span().end;
    if end > already {
        lex.bump(end - already);
    }
    classify_number(&lex.source()[start..end])
}

fn scan_number(src: &[u8], start: usize) -> usize {
    let at = |i: usize| src.get(i).copied().unwrap_or(0);
    let digits = |mut i: usize, hex: bool| {
        while at(i) == b'_' || at(i).is_ascii_digit() || (hex && at(i).is_ascii_hexdigit()) {
            i += 1;
        }
        i
    };

    let mut i = start;
    let mut hex = false;
    if at(i) == b'0' && matches!(at(i + 1), b'x' | b'X' | b'b' | b'B' | b'o' | b'O') {
        hex = matches!(at(i + 1), b'x' | b'X');
        i = digits(i + 2, hex);
    } else {
        i = digits(i, false);
    }
    if at(i) == b'.' {
        i = digits(i + 1, hex);
    }
    let exp = if hex { [b'p', b'P'] } else { [b'e', b'E'] };
    if exp.contains(&at(i)) {
        i += 1;
        if matches!(at(i), b'+' | b'-') {
            i += 1;
        }
        i = digits(i, false);
    }
    if at(i) == b'i' {
        i += 1;
    }
    i
}

/// Validates a scanned numeric literal against Go's literal grammar.
pub fn classify_number(lit: &str) -> Result<NumKind, LexErrorKind> {
    let (body, imag) = match lit.strip_suffix('i') {
        Some(b) => (b, true),
        None => (lit, false),
    };
    let bytes = body.as_bytes();
    let (radix, digits): (u32, &[u8]) = match bytes {
        [b'0', b'x' | b'X', rest @ ..] => (16, rest),
        [b'0', b'b' | b'B', rest @ ..] => (2, rest),
        [b'0', b'o' | b'O', rest @ ..] => (8, rest),
        _ => (10, bytes),
    };
    let prefixed = radix != 10;

    let exp_at = match radix {
        16 => digits.iter().position(|b| matches!(b, b'p' | b'P')),
        10 => digits.iter().position(|b| matches!(b, b'e' | b'E')),
        _ => None,
    };
    let (mantissa, exponent) = match exp_at {
        Some(i) => (&digits[..i], Some(&digits[i + 1..])),
        None => (digits, None),
    };
    let (int_part, frac_part) = match mantissa.iter().position(|&b| b == b'.') {
        Some(i) => (&mantissa[..i], Some(&mantissa[i + 1..])),
        None => (mantissa, None),
    };

    let invalid = Err(LexErrorKind::InvalidNumber);
    if !digit_run_ok(int_part, radix, prefixed) {
        return invalid;
    }
    if let Some(frac) = frac_part {
        if !matches!(radix, 10 | 16) || !digit_run_ok(frac, radix, false) {
            return invalid;
        }
        if int_part.is_empty() && frac.is_empty() {
            return invalid;
        }
    } else if int_part.is_empty() {
        return invalid;
    }
    if let Some(exp) = exponent {
        let exp = exp.strip_prefix(b"+").or_else(|| exp.strip_prefix(b"-")).unwrap_or(exp);
        if exp.is_empty() || !digit_run_ok(exp, 10, false) {
            return invalid;
        }
    }

    let is_float = frac_part.is_some() || exponent.is_some();
    if radix == 16 && is_float && exponent.is_none() {
        // hexadecimal mantissa requires a 'p' exponent
        return invalid;
    }
    // legacy octal: 0777 is an int, 0789 is not (but 0789.0 and 0789i are)
    if radix == 10 && !is_float && !imag && int_part.len() > 1 && int_part[0] == b'0' {
        if int_part.iter().any(|b| matches!(b, b'8' | b'9')) {
            return invalid;
        }
    }

    Ok(if imag {
        NumKind::Imag
    } else if is_float {
        NumKind::Float
    } else {
        NumKind::Int
    })
}

/// Digits of `radix` separated by single underscores. A base prefix may be
/// followed directly by an underscore.
fn digit_run_ok(run: &[u8], radix: u32, after_prefix: bool) -> bool {
    let mut prev_digit = after_prefix;
    for &b in run {
        if b == b'_' {
            if !prev_digit {
                return false;
            }
            prev_digit = false;
        } else if (b as char).is_digit(radix) {
            prev_digit = true;
        } else {
            return false;
        }
    }
    run.is_empty() || prev_digit
}

// =============================================================================
// Public tokens
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tok<'src> {
    Ident(&'src str),
    IntLit(&'src str),
    FloatLit(&'src str),
    ImagLit(&'src str),
    RuneLit(&'src str),
    StringLit(&'src str),
    RawStringLit(&'src str),

    // Keywords
    KwBreak,
    KwCase,
    KwChan,
    KwConst,
    KwContinue,
    KwDefault,
    KwDefer,
    KwElse,
    KwFallthrough,
    KwFor,
    KwFunc,
    KwGo,
    KwGoto,
    KwIf,
    KwImport,
    KwInterface,
    KwMap,
    KwPackage,
    KwRange,
    KwReturn,
    KwSelect,
    KwStruct,
    KwSwitch,
    KwType,
    KwVar,

    // Operators / delimiters
    Ellipsis,
    ShlAssign,
    ShrAssign,
    AndNotAssign,
    AddAssign,
    SubAssign,
    MulAssign,
    DivAssign,
    ModAssign,
    AndAssign,
    OrAssign,
    XorAssign,
    Shl,
    Shr,
    AndNot,
    LAnd,
    LOr,
    EqEq,
    NotEq,
    Le,
    Ge,
    Inc,
    Dec,
    Define,
    Arrow,
    Assign,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Amp,
    Pipe,
    Caret,
    Tilde,
    Bang,
    Lt,
    Gt,
    LParen,
    RParen,
    LBrack,
    RBrack,
    LBrace,
    RBrace,
    Comma,
    Semi,
    Colon,
    Dot,

    Error,
}

impl<'src> Tok<'src> {
    /// Go's rule: a newline after one of these ends the statement.
    fn ends_statement(&self) -> bool {
        matches!(
            self,
            Tok::Ident(_)
                | Tok::IntLit(_)
                | Tok::FloatLit(_)
                | Tok::ImagLit(_)
                | Tok::RuneLit(_)
                | Tok::StringLit(_)
                | Tok::RawStringLit(_)
                | Tok::KwBreak
                | Tok::KwContinue
                | Tok::KwFallthrough
                | Tok::KwReturn
                | Tok::Inc
                | Tok::Dec
                | Tok::RParen
                | Tok::RBrack
                | Tok::RBrace
        )
    }

    /// Source spelling of fixed tokens; `None` for tokens that carry text.
    pub fn spelling(&self) -> Option<&'static str> {
        Some(match self {
            Tok::KwBreak => "break",
            Tok::KwCase => "case",
            Tok::KwChan => "chan",
            Tok::KwConst => "const",
            Tok::KwContinue => "continue",
            Tok::KwDefault => "default",
            Tok::KwDefer => "defer",
            Tok::KwElse => "else",
            Tok::KwFallthrough => "fallthrough",
            Tok::KwFor => "for",
            Tok::KwFunc => "func",
            Tok::KwGo => "go",
            Tok::KwGoto => "goto",
            Tok::KwIf => "if",
            Tok::KwImport => "import",
            Tok::KwInterface => "interface",
            Tok::KwMap => "map",
            Tok::KwPackage => "package",
            Tok::KwRange => "range",
            Tok::KwReturn => "return",
            Tok::KwSelect => "select",
            Tok::KwStruct => "struct",
            Tok::KwSwitch => "switch",
            Tok::KwType => "type",
            Tok::KwVar => "var",
            Tok::Ellipsis => "...",
            Tok::ShlAssign => "<<=",
            Tok::ShrAssign => ">>=",
            Tok::AndNotAssign => "&^=",
            Tok::AddAssign => "+=",
            Tok::SubAssign => "-=",
            Tok::MulAssign => "*=",
            Tok::DivAssign => "/=",
            Tok::ModAssign => "%=",
            Tok::AndAssign => "&=",
            Tok::OrAssign => "|=",
            Tok::XorAssign => "^=",
            Tok::Shl => "<<",
            Tok::Shr => ">>",
            Tok::AndNot => "&^",
            Tok::LAnd => "&&",
            Tok::LOr => "||",
            Tok::EqEq => "==",
            Tok::NotEq => "!=",
            Tok::Le => "<=",
            Tok::Ge => ">=",
            Tok::Inc => "++",
            Tok::Dec => "--",
            Tok::Define => ":=",
            Tok::Arrow => "<-",
            Tok::Assign => "=",
            Tok::Plus => "+",
            Tok::Minus => "-",
            Tok::Star => "*",
            Tok::Slash => "/",
            Tok::Percent => "%",
            Tok::Amp => "&",
            Tok::Pipe => "|",
            Tok::Caret => "^",
            Tok::Tilde => "~",
            Tok::Bang => "!",
            Tok::Lt => "<",
            Tok::Gt => ">",
            Tok::LParen => "(",
            Tok::RParen => ")",
            Tok::LBrack => "[",
            Tok::RBrack => "]",
            Tok::LBrace => "{",
            Tok::RBrace => "}",
            Tok::Comma => ",",
            Tok::Semi => ";",
            Tok::Colon => ":",
            Tok::Dot => ".",
            _ => return None,
        })
    }
}

impl std::fmt::Display for Tok<'_> {
    /// Renders the token the way Go diagnostics quote it.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tok::Ident(s)
            | Tok::IntLit(s)
            | Tok::FloatLit(s)
            | Tok::ImagLit(s)
            | Tok::RuneLit(s)
            | Tok::StringLit(s)
            | Tok::RawStringLit(s) => f.write_str(s),
            Tok::Error => f.write_str("ILLEGAL"),
            other => write!(f, "'{}'", other.spelling().unwrap_or("?")),
        }
    }
}

fn keyword(s: &str) -> Option<Tok<'static>> {
    Some(match s {
        "break" => Tok::KwBreak,
        "case" => Tok::KwCase,
        "chan" => Tok::KwChan,
        "const" => Tok::KwConst,
        "continue" => Tok::KwContinue,
        "default" => Tok::KwDefault,
        "defer" => Tok::KwDefer,
        "else" => Tok::KwElse,
        "fallthrough" => Tok::KwFallthrough,
        "for" => Tok::KwFor,
        "func" => Tok::KwFunc,
        "go" => Tok::KwGo,
        "goto" => Tok::KwGoto,
        "if" => Tok::KwIf,
        "import" => Tok::KwImport,
        "interface" => Tok::KwInterface,
        "map" => Tok::KwMap,
        "package" => Tok::KwPackage,
        "range" => Tok::KwRange,
        "return" => Tok::KwReturn,
        "select" => Tok::KwSelect,
        "struct" => Tok::KwStruct,
        "switch" => Tok::KwSwitch,
        "type" => Tok::KwType,
        "var" => Tok::KwVar,
        _ => return None,
    })
}

impl RawTok {
    #[rustfmt::skip]
    fn simple(self) -> Tok<'static> {
        match self {
            RawTok::Ellipsis => Tok::Ellipsis,
            RawTok::ShlAssign => Tok::ShlAssign,
            RawTok::ShrAssign => Tok::ShrAssign,
            RawTok::AndNotAssign => Tok::AndNotAssign,
            RawTok::AddAssign => Tok::AddAssign,
            RawTok::SubAssign => Tok::SubAssign,
            RawTok::MulAssign => Tok::MulAssign,
            RawTok::DivAssign => Tok::DivAssign,
            RawTok::ModAssign => Tok::ModAssign,
            RawTok::AndAssign => Tok::AndAssign,
            RawTok::OrAssign => Tok::OrAssign,
            RawTok::XorAssign => Tok::XorAssign,
            RawTok::Shl => Tok::Shl,
            RawTok::Shr => Tok::Shr,
            RawTok::AndNot => Tok::AndNot,
            RawTok::LAnd => Tok::LAnd,
            RawTok::LOr => Tok::LOr,
            RawTok::EqEq => Tok::EqEq,
            RawTok::NotEq => Tok::NotEq,
            RawTok::Le => Tok::Le,
            RawTok::Ge => Tok::Ge,
            RawTok::Inc => Tok::Inc,
            RawTok::Dec => Tok::Dec,
            RawTok::Define => Tok::Define,
            RawTok::Arrow => Tok::Arrow,
            RawTok::Assign => Tok::Assign,
            RawTok::Plus => Tok::Plus,
            RawTok::Minus => Tok::Minus,
            RawTok::Star => Tok::Star,
            RawTok::Slash => Tok::Slash,
            RawTok::Percent => Tok::Percent,
            RawTok::Amp => Tok::Amp,
            RawTok::Pipe => Tok::Pipe,
            RawTok::Caret => Tok::Caret,
            RawTok::Tilde => Tok::Tilde,
            RawTok::Bang => Tok::Bang,
            RawTok::Lt => Tok::Lt,
            RawTok::Gt => Tok::Gt,
            RawTok::LParen => Tok::LParen,
            RawTok::RParen => Tok::RParen,
            RawTok::LBrack => Tok::LBrack,
            RawTok::RBrack => Tok::RBrack,
            RawTok::LBrace => Tok::LBrace,
            RawTok::RBrace => Tok::RBrace,
            RawTok::Comma => Tok::Comma,
            RawTok::Semi => Tok::Semi,
            RawTok::Colon => Tok::Colon,
            RawTok::Dot => Tok::Dot,
            _ => Tok::Error,
        }
    }
}

// =============================================================================
// Lexer wrapper: semicolon insertion + diagnostics
// =============================================================================

pub type SpannedTok<'src> = (usize, Tok<'src>, usize);

pub struct Lexer<'src> {
    logos: LogosLexer<'src, RawTok>,
    pending: Option<SpannedTok<'src>>,
    diags: Vec<Diag>,
    last_can_insert_semi: bool,
    src_len: usize,
    eof_done: bool,
}

impl<'src> Lexer<'src> {
    pub fn new(input: &'src str) -> Self {
        Self {
            logos: RawTok::lexer(input),
            pending: None,
            diags: Vec::new(),
            last_can_insert_semi: false,
            src_len: input.len(),
            eof_done: false,
        }
    }

    pub fn take_diags(&mut self) -> Vec<Diag> {
        std::mem::take(&mut self.diags)
    }

    fn push_lex_diag(&mut self, kind: LexErrorKind, span: Range<usize>) {
        let err = LexError {
            kind,
            span: Span::from_range(span),
        };
        self.diags.push(err.diag());
    }

    fn insert_semi_at(&mut self, pos: usize) {
        if self.last_can_insert_semi {
            self.last_can_insert_semi = false;
            self.pending = Some((pos, Tok::Semi, pos));
        }
    }

    fn error_token(&mut self, kind: LexErrorKind, span: Range<usize>) -> SpannedTok<'src> {
        self.push_lex_diag(kind, span.clone());
        self.last_can_insert_semi = false;
        (span.start, Tok::Error, span.end)
    }

    fn token(&mut self, tok: Tok<'src>, span: Range<usize>) -> SpannedTok<'src> {
        self.last_can_insert_semi = tok.ends_statement();
        (span.start, tok, span.end)
    }
}

impl<'src> Iterator for Lexer<'src> {
    type Item = SpannedTok<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(tok) = self.pending.take() {
                return Some(tok);
            }
            if self.eof_done {
                return None;
            }

            let Some(raw) = self.logos.next() else {
                self.eof_done = true;
                self.insert_semi_at(self.src_len);
                continue;
            };
            let span = self.logos.span();
            let slice = self.logos.slice();

            let raw = match raw {
                Ok(raw) => raw,
                Err(kind) => {
                    // an unterminated comment still ends the line it opened on
                    if kind == LexErrorKind::UnterminatedComment {
                        self.insert_semi_at(span.start);
                        self.push_lex_diag(kind, span);
                        continue;
                    }
                    return Some(self.error_token(kind, span));
                }
            };

            let tok = match raw {
                RawTok::Bom if span.start == 0 => continue,
                RawTok::Bom => return Some(self.error_token(LexErrorKind::InvalidToken, span)),
                RawTok::Newline => {
                    self.insert_semi_at(span.start);
                    continue;
                }
                RawTok::BlockComment => {
                    if let Some(off) = slice.find(|c| c == '\n' || c == '\r') {
                        self.insert_semi_at(span.start + off);
                    }
                    continue;
                }
                RawTok::Ident => keyword(slice).unwrap_or(Tok::Ident(slice)),
                RawTok::Number(NumKind::Int) => Tok::IntLit(slice),
                RawTok::Number(NumKind::Float) => Tok::FloatLit(slice),
                RawTok::Number(NumKind::Imag) => Tok::ImagLit(slice),
                RawTok::String => Tok::StringLit(slice),
                RawTok::RawString => Tok::RawStringLit(slice),
                RawTok::Rune => Tok::RuneLit(slice),
                other => other.simple(),
            };
            return Some(self.token(tok, span));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn toks(src: &str) -> Vec<Tok<'_>> {
        Lexer::new(src).map(|(_, t, _)| t).collect()
    }

    #[test]
    fn inserts_semicolon_after_closing_paren_at_newline() {
        assert_eq!(
            toks("Load(ctx)\nSave()"),
            vec![
                Tok::Ident("Load"),
                Tok::LParen,
                Tok::Ident("ctx"),
                Tok::RParen,
                Tok::Semi,
                Tok::Ident("Save"),
                Tok::LParen,
                Tok::RParen,
                Tok::Semi,
            ]
        );
    }

    #[test]
    fn no_semicolon_after_operator() {
        assert_eq!(
            toks("a +\nb"),
            vec![Tok::Ident("a"), Tok::Plus, Tok::Ident("b"), Tok::Semi]
        );
    }

    #[test]
    fn multiline_block_comment_acts_as_newline() {
        let got: Vec<_> = Lexer::new("x /* a\nb */ y").collect();
        assert_eq!(got[1], (6, Tok::Semi, 6));
    }

    #[test]
    fn keywords_are_split_from_identifiers() {
        assert_eq!(
            toks("interface interfaces"),
            vec![Tok::KwInterface, Tok::Ident("interfaces"), Tok::Semi]
        );
    }

    #[test]
    fn classifies_numbers() {
        assert_eq!(classify_number("42"), Ok(NumKind::Int));
        assert_eq!(classify_number("0x_FF"), Ok(NumKind::Int));
        assert_eq!(classify_number("0b1010"), Ok(NumKind::Int));
        assert_eq!(classify_number("0o17"), Ok(NumKind::Int));
        assert_eq!(classify_number("0777"), Ok(NumKind::Int));
        assert_eq!(classify_number("1_000.5e-3"), Ok(NumKind::Float));
        assert_eq!(classify_number(".5"), Ok(NumKind::Float));
        assert_eq!(classify_number("0x1p-2"), Ok(NumKind::Float));
        assert_eq!(classify_number("0789i"), Ok(NumKind::Imag));

        assert_eq!(classify_number("0789"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("1__0"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("1_"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("0x1.8"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("0b102"), Err(LexErrorKind::InvalidNumber));
        assert_eq!(classify_number("1e"), Err(LexErrorKind::InvalidNumber));
    }

    #[test]
    fn hex_e_is_a_digit_not_an_exponent() {
        assert_eq!(
            toks("0xe+1"),
            vec![Tok::IntLit("0xe"), Tok::Plus, Tok::IntLit("1"), Tok::Semi]
        );
    }

    #[test]
    fn strings_and_runes() {
        assert_eq!(
            toks(r#""a\tb" `raw` '\n'"#),
            vec![
                Tok::StringLit(r#""a\tb""#),
                Tok::RawStringLit("`raw`"),
                Tok::RuneLit(r"'\n'"),
                Tok::Semi,
            ]
        );
    }

    #[test]
    fn bad_escape_is_reported() {
        let mut lx = Lexer::new(r#""\q""#);
        let got: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
        assert_eq!(got, vec![Tok::Error]);
        let diags = lx.take_diags();
        assert_eq!(diags.len(), 1);
        assert_eq!(diags[0].message, "invalid escape sequence");
    }

    #[test]
    fn unterminated_string_is_reported() {
        let mut lx = Lexer::new("\"abc\nx");
        let _ = lx.by_ref().count();
        let diags = lx.take_diags();
        assert_eq!(diags[0].message, "string literal not terminated");
    }

    #[test]
    fn unterminated_comment_is_reported() {
        let mut lx = Lexer::new("x /* never closed");
        let got: Vec<_> = lx.by_ref().map(|(_, t, _)| t).collect();
        assert_eq!(got, vec![Tok::Ident("x"), Tok::Semi]);
        assert_eq!(lx.take_diags()[0].message, "comment not terminated");
    }

    #[test]
    fn leading_bom_is_ignored() {
        assert_eq!(
            toks("\u{FEFF}package p"),
            vec![Tok::KwPackage, Tok::Ident("p"), Tok::Semi]
        );
    }
}
