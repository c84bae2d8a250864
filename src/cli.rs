use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "class-content")]
#[command(about = "Resolve readable source for classes inside compiled or source archives")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, value_name = "FILE")]
    pub cfr: Option<PathBuf>,

    /// External Java-to-Kotlin converter (reads Java on stdin, writes Kotlin
    /// on stdout). When given, resolved Java content is translated.
    #[arg(long, value_name = "CMD")]
    pub translate_cmd: Option<PathBuf>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    Resolve {
        /// Canonical locator, e.g. jar:/repo/demo.jar!/org/x/Foo.class
        locator: String,

        #[arg(short = 'f', long, value_enum, default_value_t = OutputFormat::Json)]
        format: OutputFormat,

        #[arg(short = 'o', long, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Text,
    Code,
}
