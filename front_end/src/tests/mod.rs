mod errors;
mod lexer_tests;
mod symbol_table_tests;
