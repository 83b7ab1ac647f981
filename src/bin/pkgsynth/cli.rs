//! CLI definitions using clap.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// pkgsynth - synthesize a deployment package.json from a bundle
#[derive(Parser)]
#[command(name = "pkgsynth")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate package.json from a bundler stats document
    Generate(GenerateArgs),

    /// List the external package names detected in a stats document
    Externals(ExternalsArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct GenerateArgs {
    /// Bundler stats document (webpack --json output or compatible)
    #[arg(long)]
    pub stats: PathBuf,

    /// Base manifest to merge into
    #[arg(long, default_value = "package.json")]
    pub base: PathBuf,

    /// Directory the generated package.json is written to
    #[arg(short, long, default_value = "dist")]
    pub out_dir: PathBuf,

    /// Configuration file (defaults to pkgsynth.toml when present)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Secondary version-source manifest; repeatable, later wins
    #[arg(long = "source")]
    pub sources: Vec<PathBuf>,

    /// Resolve versions from the installed tree instead of declared sources
    #[arg(long = "installed")]
    pub use_installed_versions: bool,

    /// Search root for installed-tree resolution; repeatable
    #[arg(long = "context")]
    pub contexts: Vec<PathBuf>,

    /// Dependency name to exclude from the output; repeatable
    #[arg(long = "exclude")]
    pub excludes: Vec<String>,

    /// Indentation width for the emitted document
    #[arg(long)]
    pub space: Option<usize>,

    /// Fail instead of omitting when a detected dependency has no version
    #[arg(long)]
    pub fail_on_missing: bool,
}

#[derive(Args)]
pub struct ExternalsArgs {
    /// Bundler stats document to inspect
    #[arg(long)]
    pub stats: PathBuf,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
