//! Go interface extraction and template-driven code generation.
//!
//! - [`extract`] parses a Go source file and collects every interface it
//!   declares into a [`Package`]: methods in declaration order, each
//!   parameter named and typed structurally.
//! - [`render`] runs a Handlebars template once per selected interface and
//!   assembles the results into a Go file with a package clause and the
//!   imports the generated code needs.
//!
//! Lexing follows Go's rules, including automatic semicolon insertion.
//! The parser understands every declaration form and the full type grammar
//! but only skims function bodies and initializers.
//!
//! ```
//! use ifacegen::{extract, render, RenderOptions};
//!
//! let src = b"package foo\n\ntype Store interface {\n\tLoad(id string) ([]byte, error)\n}\n";
//! let package = extract(Some(src)).unwrap();
//! assert_eq!(package.interfaces[0].methods[0].outputs[1].name, "_result2");
//!
//! let out = render(
//!     &package,
//!     RenderOptions {
//!         template: b"// {{name}}: {{#each methods}}{{name}}({{input_parameters this}}){{/each}}".to_vec(),
//!         ..RenderOptions::default()
//!     },
//! )
//! .unwrap();
//! assert!(String::from_utf8(out).unwrap().ends_with("// Store: Load(id string)\n"));
//! ```

pub mod ast;
pub mod error;
pub mod extract;
pub mod lexer;
pub mod model;
pub mod parser;
pub mod render;

// Re-exports for convenience
pub use error::{Error, Result};
pub use extract::extract;
pub use lexer::Lexer;
pub use model::{ChanDir, Import, Interface, Method, Package, Parameter, Type};
pub use parser::parse_source;
pub use render::{render, FunctionLibrary, RenderOptions};
