use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "fforge",
    about = "Molecular feature-extraction toolkit",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Read geometry files (XYZ/MOL2) and summarize each molecule
    #[command(visible_alias = "i")]
    Inspect(InspectArgs),
}

#[derive(Args)]
pub struct InspectArgs {
    /// Geometry files to read (.xyz or .mol2)
    #[arg(value_name = "FILE", required = true)]
    pub files: Vec<PathBuf>,

    /// Worker count: 1 reads sequentially, negative uses every core
    #[arg(
        short = 'j',
        long = "jobs",
        value_name = "N",
        default_value = "1",
        allow_hyphen_values = true
    )]
    pub jobs: i64,

    /// Print the molecules as JSON on stdout
    #[arg(long)]
    pub json: bool,

    /// Suppress progress output (for scripting)
    #[arg(short, long)]
    pub quiet: bool,
}

pub fn parse() -> Cli {
    Cli::parse()
}
