use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{ArgAction, Parser};
use ifacegen::Import;

/// Generates Go code from interface declarations using a Handlebars template.
///
/// The source is read from stdin when it is piped in, otherwise from
/// --source. Piped input writes to stdout unless --destination says
/// otherwise.
#[derive(Debug, Parser)]
#[command(name = "ifacegen", version)]
#[command(after_help = "Examples:\n  cat service.go | ifacegen\n  ifacegen --source service.go --destination -")]
pub struct Args {
    /// Path to the Go source file.
    #[arg(long)]
    pub source: Option<PathBuf>,

    /// Path to a Handlebars template; a logging decorator is generated by default.
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Output file, or '-' for stdout (defaults to <source>.gen.go).
    #[arg(long)]
    pub destination: Option<String>,

    /// Package of the generated code; defaults to the package of the source.
    #[arg(long)]
    pub package: Option<String>,

    /// Comma-separated [name=]path pairs of imports to always include.
    #[arg(long, default_value = "")]
    pub imports: String,

    /// Comma-separated names of interfaces to generate (default: all).
    #[arg(long, default_value = "")]
    pub interfaces: String,

    /// Comma-separated key=value pairs made available to templates as `meta`.
    #[arg(long, default_value = "")]
    pub meta: String,

    /// Print the extracted package and exit.
    #[arg(long, alias = "debug_parser")]
    pub debug_parser: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Where generated code goes.
#[derive(Debug, PartialEq, Eq)]
pub enum Destination {
    Stdout,
    File(PathBuf),
}

/// Non-empty, trimmed entries of a comma-separated list.
pub fn split_list(list: &str) -> Vec<String> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn parse_meta(meta: &str) -> Result<BTreeMap<String, String>> {
    let mut out = BTreeMap::new();
    for kv in split_list(meta) {
        let Some((key, value)) = kv.split_once('=') else {
            bail!("invalid meta value: {kv}");
        };
        out.insert(key.to_string(), value.to_string());
    }
    Ok(out)
}

pub fn parse_imports(imports: &str) -> Vec<Import> {
    split_list(imports)
        .into_iter()
        .map(|kv| match kv.split_once('=') {
            Some((alias, path)) => Import::aliased(alias, path),
            None => Import::new(kv),
        })
        .collect()
}

pub fn destination(requested: Option<&str>, source: Option<&Path>, piped: bool) -> Destination {
    match requested.filter(|d| !d.is_empty()) {
        Some("-") => Destination::Stdout,
        Some(path) => Destination::File(PathBuf::from(path)),
        None if piped => Destination::Stdout,
        None => match source {
            Some(source) => Destination::File(generated_path(source)),
            None => Destination::Stdout,
        },
    }
}

/// `dir/service.go` becomes `dir/service.gen.go`.
pub fn generated_path(source: &Path) -> PathBuf {
    let stem = source
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match source.extension() {
        Some(ext) => format!("{stem}.gen.{}", ext.to_string_lossy()),
        None => format!("{stem}.gen"),
    };
    source.with_file_name(name)
}
