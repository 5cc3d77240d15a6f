use anyhow::Result;
use cli::Cli;
use descriptor::{BuildDescriptor, Configuration};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::ExitCode;

mod builder;
mod cli;
mod config_wizard;
mod descriptor;
mod detection;
mod entry_ordering;
mod preprocess;

fn main() -> ExitCode {
    env_logger::init();

    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();

    match &cli.command {
        cli::Commands::Config => config_wizard::run(),
        cli::Commands::Check { variant } => {
            let config = Configuration::load()?;
            let mut failures = 0;

            for (name, descriptor) in selected(&config, variant.as_deref())? {
                match descriptor.validate(name, Path::new(".")) {
                    Ok(()) => println!("  {} {name}", console::style("ok").green()),
                    Err(e) => {
                        failures += 1;
                        println!("  {} {e:#}", console::style("failed").red());
                    }
                }
            }

            if failures > 0 {
                Err(anyhow::anyhow!("{failures} descriptor(s) failed the check"))
            } else {
                Ok(())
            }
        }
        cli::Commands::Build { variant, open } => {
            println!("Loading configuration...");
            let config = Configuration::load()?;

            for (name, descriptor) in selected(&config, variant.as_deref())? {
                let progress = ProgressBar::new(descriptor.entry.len() as u64);
                progress.set_style(
                    ProgressStyle::default_bar()
                        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                        .expect("can parse progress style")
                        .progress_chars("#>-"),
                );
                progress.set_message(format!("Building '{name}'..."));

                let outputs = builder::build(Path::new("."), name, descriptor, &progress)?;

                println!("Built '{name}':");
                for output in &outputs {
                    println!("  {}", output.display());
                }

                if *open {
                    if let Some(first) = outputs.first() {
                        builder::open(first)?;
                    }
                }
            }

            Ok(())
        }
        cli::Commands::Clean => {
            let config = Configuration::load()?;
            let removed = builder::clean(Path::new("."), &config)?;
            if removed.is_empty() {
                println!("Nothing to clean.");
            } else {
                for dir in removed {
                    println!("Removed {}", dir.display());
                }
            }
            Ok(())
        }
    }
}

/// The variants a command should operate on: one when `--variant` was given,
/// otherwise all of them in name order.
fn selected<'a>(
    config: &'a Configuration,
    variant: Option<&'a str>,
) -> Result<Vec<(&'a str, &'a BuildDescriptor)>> {
    match variant {
        Some(name) => Ok(vec![(name, config.variant(name)?)]),
        None => Ok(config
            .descriptors
            .iter()
            .map(|(name, descriptor)| (name.as_str(), descriptor))
            .collect()),
    }
}
