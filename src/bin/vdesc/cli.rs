use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "vdesc",
    about = "Voronoi dilute local-environment descriptors",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute the descriptor of a single structure
    #[command(visible_alias = "c")]
    Compute(ComputeArgs),

    /// Compute descriptors for every structure file in a directory
    #[command(visible_alias = "b")]
    Batch(BatchArgs),
}

/// Pipeline options shared by all commands.
#[derive(Args)]
#[command(next_help_heading = "Descriptor Options")]
pub struct DescriptorOptions {
    /// Voronoi candidate search radius in ångströms
    #[arg(long, value_name = "ANGSTROM", default_value = "13.0")]
    pub cutoff: f64,

    /// Custom elemental property table (TOML)
    #[arg(long, value_name = "FILE")]
    pub properties: Option<PathBuf>,

    /// Reference base structure for equivalence analysis (JSON)
    #[arg(long, value_name = "FILE")]
    pub base: Option<PathBuf>,
}

#[derive(Args)]
pub struct ComputeArgs {
    /// Structure file (JSON)
    pub input: PathBuf,

    /// Output file (stdout if omitted)
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    #[command(flatten)]
    pub descriptor: DescriptorOptions,
}

#[derive(Args)]
pub struct BatchArgs {
    /// Directory of structure files (JSON)
    pub input: PathBuf,

    /// Output directory (defaults to the input directory)
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Suppress the progress bar (for scripting)
    #[arg(short, long)]
    pub quiet: bool,

    #[command(flatten)]
    pub descriptor: DescriptorOptions,
}

pub fn parse() -> Cli {
    Cli::parse()
}
