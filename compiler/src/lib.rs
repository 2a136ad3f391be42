//! Driver for the Mini front end: configuration and the check pipeline used
//! by the `minic` binary.

pub mod compile_pipeline;
pub mod config;

pub use compile_pipeline::{CompilationPipeline, CompilationResult, ExitStatus, TokenDump};
pub use config::{ColorChoice, CompilerConfig};
