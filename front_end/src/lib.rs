pub mod token;
pub mod lexer;
pub mod source_location;
pub mod source_manager;
pub mod ast;
pub mod types;
pub mod parser;
pub mod symbol;
pub mod symbol_table;
pub mod name_analysis;
pub mod unparse;
pub mod error;
pub mod diagnostics_reporter;

#[cfg(test)]
mod tests;
