use clap::ValueEnum;
use tracing::level_filters::LevelFilter;

/// When to colour diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ColorChoice {
    /// Let `colored` decide from the terminal and environment.
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorChoice {
    /// Install this choice as the process-wide `colored` override.
    pub fn apply(self) {
        match self {
            ColorChoice::Auto => colored::control::unset_override(),
            ColorChoice::Always => colored::control::set_override(true),
            ColorChoice::Never => colored::control::set_override(false),
        }
    }
}

/// Settings for one compiler invocation
#[derive(Debug, Clone, Default)]
pub struct CompilerConfig {
    /// Number of `-v` flags given.
    pub verbosity: u8,
    pub color: ColorChoice,
    /// Print the annotated program whenever parsing succeeded, even when
    /// name analysis reported errors.
    pub unparse: bool,
}

impl CompilerConfig {
    pub fn log_level(&self) -> LevelFilter {
        match self.verbosity {
            0 => LevelFilter::WARN,
            1 => LevelFilter::INFO,
            2 => LevelFilter::DEBUG,
            _ => LevelFilter::TRACE,
        }
    }
}
