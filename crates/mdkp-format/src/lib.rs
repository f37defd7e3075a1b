pub mod lexer;
pub mod parser;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use lexer::{Lexer, Token, TokenKind};
pub use parser::{FormatError, Parser};
