mod ast;
mod lexer;
#[allow(clippy::module_inception)]
mod parser;

pub use ast::{CommandLine, CommandSegment, ParsedCommand, RedirectionSpec};
pub use parser::parse;
