//! Works out the import block of generated code.
//!
//! Explicit imports are always kept. Any other `pkg.Name` selector in the
//! rendered body is matched by package name against the source file's
//! imports and then against well-known standard library packages.

use std::collections::BTreeSet;

use crate::lexer::{Lexer, Tok};
use crate::model::{Import, Package};

/// Standard library packages by the name code refers to them with.
const STD_PACKAGES: &[(&str, &str)] = &[
    ("atomic", "sync/atomic"),
    ("base64", "encoding/base64"),
    ("binary", "encoding/binary"),
    ("bufio", "bufio"),
    ("bytes", "bytes"),
    ("context", "context"),
    ("errors", "errors"),
    ("exec", "os/exec"),
    ("filepath", "path/filepath"),
    ("fmt", "fmt"),
    ("fs", "io/fs"),
    ("hex", "encoding/hex"),
    ("http", "net/http"),
    ("io", "io"),
    ("json", "encoding/json"),
    ("log", "log"),
    ("math", "math"),
    ("net", "net"),
    ("os", "os"),
    ("path", "path"),
    ("rand", "math/rand"),
    ("reflect", "reflect"),
    ("regexp", "regexp"),
    ("runtime", "runtime"),
    ("slog", "log/slog"),
    ("sort", "sort"),
    ("sql", "database/sql"),
    ("strconv", "strconv"),
    ("strings", "strings"),
    ("sync", "sync"),
    ("time", "time"),
    ("unicode", "unicode"),
    ("url", "net/url"),
    ("utf8", "unicode/utf8"),
];

/// Package qualifiers of selector expressions in `code`: `a` in `a.B`, but
/// not `b` in `a.b.C`.
pub(crate) fn qualifiers(code: &str) -> BTreeSet<&str> {
    let toks: Vec<Tok<'_>> = Lexer::new(code).map(|(_, tok, _)| tok).collect();
    toks.windows(3)
        .enumerate()
        .filter_map(|(i, w)| match w {
            [Tok::Ident(pkg), Tok::Dot, Tok::Ident(_)] => {
                let selected = i > 0 && toks[i - 1] == Tok::Dot;
                (!selected).then_some(*pkg)
            }
            _ => None,
        })
        .collect()
}

/// Explicit imports plus whatever the rendered `body` needs, sorted by
/// path without duplicates.
pub(crate) fn resolve(body: &str, package: &Package, explicit: &[Import]) -> Vec<Import> {
    let mut imports = explicit.to_vec();

    for qualifier in qualifiers(body) {
        if imports.iter().any(|i| i.name() == qualifier) {
            continue;
        }
        if let Some(found) = package.imports.iter().find(|i| i.name() == qualifier) {
            imports.push(found.clone());
            continue;
        }
        match STD_PACKAGES.iter().find(|(name, _)| *name == qualifier) {
            Some((_, path)) => imports.push(Import::new(*path)),
            None => log::debug!("no import known for qualifier {qualifier:?}"),
        }
    }

    imports.sort_by(|a, b| a.path.cmp(&b.path).then_with(|| a.alias.cmp(&b.alias)));
    imports.dedup();
    imports
}
