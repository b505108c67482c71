//! Go lexer + parser + printer on an arena AST.
//!
//! - Lexer uses Logos and implements Go semicolon insertion.
//! - Parser is a hand-written recursive-descent/Pratt parser.
//! - Printer re-lays source deterministically (gofmt-flavored).

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod printer;
pub mod walk;

// Re-exports for convenience
pub use lexer::Lexer;
pub use parser::{parse_file, parse_source};
pub use printer::{print_file, print_stmt, print_type};
