use clap::{Parser, Subcommand};

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generates a bookpress.toml config file
    Config,
    /// Checks that the build descriptors are well-formed
    Check {
        /// Check a single variant instead of all of them
        #[clap(long)]
        variant: Option<String>,
    },
    /// Stages the build directories and runs the external renderer
    Build {
        /// Build a single variant instead of all of them
        #[clap(long)]
        variant: Option<String>,
        /// Open the produced file(s) when the build succeeds
        #[clap(long)]
        open: bool,
    },
    /// Deletes the build directories
    Clean,
}

#[derive(Parser, Debug)]
#[clap(author, version, about)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}
