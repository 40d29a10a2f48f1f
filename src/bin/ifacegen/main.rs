//! `ifacegen` command line.

use std::fs;
use std::io::{self, IsTerminal, Read, Write};

use anyhow::{Context, Result};
use clap::Parser;
use ifacegen::{FunctionLibrary, RenderOptions};

mod args;

use args::{Args, Destination};

const DEFAULT_TEMPLATE: &str = include_str!("default.hbs");

struct Source {
    name: String,
    bytes: Option<Vec<u8>>,
    piped: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let source = read_source(&args)?;
    let package = ifacegen::extract(source.bytes.as_deref()).context("failed parsing package")?;

    if args.debug_parser {
        print!("{package}");
        return Ok(());
    }

    let template = match &args.template {
        Some(path) => fs::read(path)
            .with_context(|| format!("failed reading template {}", path.display()))?,
        None => DEFAULT_TEMPLATE.as_bytes().to_vec(),
    };

    let options = RenderOptions {
        source: source.name,
        package_name: args.package.clone(),
        interfaces: args::split_list(&args.interfaces),
        template,
        meta: args::parse_meta(&args.meta)?,
        imports: args::parse_imports(&args.imports),
        functions: FunctionLibrary::standard(),
    };
    let code = ifacegen::render(&package, options).context("failed generating code")?;

    match args::destination(args.destination.as_deref(), args.source.as_deref(), source.piped) {
        Destination::Stdout => io::stdout()
            .lock()
            .write_all(&code)
            .context("failed writing to stdout")?,
        Destination::File(path) => {
            fs::write(&path, &code).with_context(|| format!("failed writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
    }
    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => log::LevelFilter::Warn,
        1 => log::LevelFilter::Info,
        2 => log::LevelFilter::Debug,
        _ => log::LevelFilter::Trace,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();
}

/// `--source` wins; otherwise stdin is used when something is piped in.
fn read_source(args: &Args) -> Result<Source> {
    if let Some(path) = &args.source {
        let bytes = fs::read(path)
            .with_context(|| format!("failed reading source file {}", path.display()))?;
        return Ok(Source {
            name: path.display().to_string(),
            bytes: Some(bytes),
            piped: false,
        });
    }

    let stdin = io::stdin();
    if stdin.is_terminal() {
        return Ok(Source {
            name: String::new(),
            bytes: None,
            piped: false,
        });
    }
    let mut bytes = Vec::new();
    stdin
        .lock()
        .read_to_end(&mut bytes)
        .context("failed reading source from stdin")?;
    Ok(Source {
        name: "stdin".to_string(),
        bytes: Some(bytes),
        piped: true,
    })
}
