//! Interactive configuration wizard for creating `bookpress.toml`.
//!
//! The wizard collects the book metadata once, then walks through the build
//! variants (general, print, ebook) asking for what actually differs between
//! them: theme, cover-page inclusion, and output filename. Each variant is
//! written as a complete, independent descriptor.

use crate::descriptor::{
    BuildDescriptorBuilder, Configuration, PageSize, Theme,
};
use crate::detection::{detect_defaults, DetectedDefaults};
use crate::entry_ordering::{classify, sort_entries, EntryRole};
use anyhow::{anyhow, Context, Result};
use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, FuzzySelect, Input, MultiSelect};
use std::path::PathBuf;

const VARIANTS: &[&str] = &["general", "print", "ebook"];

/// Run the interactive configuration wizard.
///
/// Prompts for book metadata and per-variant settings, then writes
/// `bookpress.toml` to the current directory.
pub fn run() -> Result<()> {
    let theme = ColorfulTheme {
        ..ColorfulTheme::default()
    };

    // get the project path first so we can detect defaults
    let project_dir = Input::with_theme(&theme)
        .with_prompt("Project directory")
        .default(".".to_string())
        .interact()
        .with_context(|| "Failed to obtain project path")?;
    let project_dir = PathBuf::from(project_dir);
    if !project_dir.exists() || !project_dir.is_dir() {
        return Err(anyhow!(
            "Path '{}' isn't a directory!",
            project_dir.display()
        ));
    }

    // detect defaults from project conventions
    let DetectedDefaults {
        title: detected_title,
        author: detected_author,
        entries: detected_entries,
        stylesheets: detected_stylesheets,
    } = detect_defaults(&project_dir);

    let title: String = Input::with_theme(&theme)
        .with_prompt("Book title")
        .with_initial_text(detected_title.unwrap_or_default())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain title")?;

    let author: String = Input::with_theme(&theme)
        .with_prompt("Author (e.g. Jane Doe <jane@example.com>)")
        .with_initial_text(detected_author.unwrap_or_default())
        .allow_empty(false)
        .interact()
        .with_context(|| "Failed to obtain author")?;

    let size_idx = FuzzySelect::with_theme(&theme)
        .with_prompt("Page size")
        .items(PageSize::all())
        .default(0)
        .interact()?;
    let size = PageSize::all()[size_idx];

    use globset::{Glob, GlobMatcher};
    let mut block_globs: Vec<GlobMatcher> = Vec::default();

    if !detected_entries.is_empty()
        && Confirm::with_theme(&theme)
            .with_prompt("Do you wish to block some of the detected source files?")
            .default(false)
            .interact()?
    {
        'block: loop {
            if !block_globs.is_empty() {
                println!(
                    "Blocked globs: [{}]",
                    block_globs
                        .iter()
                        .map(|gm| gm.glob().glob().to_string())
                        .collect::<Vec<String>>()
                        .join("], [")
                );
            }
            let glob: String = Input::with_theme(&theme)
                .with_prompt("Glob syntax of files you want to block (leave blank to move on)")
                .allow_empty(true)
                .interact()?;
            if glob.trim().is_empty() {
                break 'block;
            }

            let glob = Glob::new(&glob)
                .with_context(|| "Failed to parse glob!")?
                .compile_matcher();
            block_globs.push(glob);
        }
    }

    let candidates: Vec<PathBuf> = detected_entries
        .into_iter()
        .filter(|entry| !block_globs.iter().any(|glob| glob.is_match(entry)))
        .collect();
    if candidates.is_empty() {
        return Err(anyhow!(
            "No Markdown source files found in '{}'",
            project_dir.display()
        ));
    }

    let candidate_strings: Vec<String> = candidates
        .iter()
        .map(|p| p.display().to_string())
        .collect();
    let defaults: Vec<bool> = candidates.iter().map(|_| true).collect();
    let selections = MultiSelect::with_theme(&theme)
        .with_prompt("Select the source files to include")
        .items(&candidate_strings)
        .defaults(&defaults)
        .interact()?;

    let mut entries: Vec<PathBuf> = selections
        .into_iter()
        .map(|i| candidates[i].clone())
        .collect();
    sort_entries(&mut entries);
    if entries.is_empty() {
        return Err(anyhow!("At least one source file must be selected"));
    }

    let output_stem = output_stem(&title);
    let mut config = Configuration::default();

    for &variant in VARIANTS {
        if !Confirm::with_theme(&theme)
            .with_prompt(format!("Configure the '{variant}' variant?"))
            .default(true)
            .interact()?
        {
            continue;
        }

        let variant_theme: String = Input::with_theme(&theme)
            .with_prompt(format!(
                "Theme for '{variant}' (stylesheet path or package name@versionRange)"
            ))
            .default(default_theme(variant, &detected_stylesheets))
            .validate_with(|input: &String| {
                input
                    .parse::<Theme>()
                    .map(|_| ())
                    .map_err(|e| e.to_string())
            })
            .interact()?;
        let variant_theme: Theme = variant_theme.parse()?;

        // print runs typically get covers from the printer, not the renderer
        let include_covers = Confirm::with_theme(&theme)
            .with_prompt(format!("Include cover pages in '{variant}'?"))
            .default(variant != "print")
            .interact()?;

        let variant_entries: Vec<PathBuf> = entries
            .iter()
            .filter(|entry| {
                include_covers
                    || !matches!(
                        classify(entry),
                        EntryRole::FrontCover | EntryRole::BackCover
                    )
            })
            .cloned()
            .collect();

        let default_output = if variant == "general" {
            format!("./{output_stem}.pdf")
        } else {
            format!("./{output_stem}.{variant}.pdf")
        };
        let outfile: String = Input::with_theme(&theme)
            .with_prompt(format!("Output file for '{variant}'"))
            .default(default_output)
            .allow_empty(false)
            .interact()?;
        let mut outfile = PathBuf::from(outfile);
        let ext = outfile
            .extension()
            .map(std::ffi::OsStr::to_ascii_lowercase)
            .unwrap_or_default();
        if ext != *"pdf" {
            outfile.set_extension("pdf");
        }

        let descriptor = BuildDescriptorBuilder::default()
            .title(title.clone())
            .author(author.clone())
            .size(size)
            .theme(variant_theme)
            .entry(variant_entries)
            .output(vec![outfile])
            .build()
            .with_context(|| format!("Failed to build '{variant}' descriptor"))?;

        config.descriptors.insert(variant.to_string(), descriptor);
    }

    if config.descriptors.is_empty() {
        return Err(anyhow!("No variants configured, nothing to write"));
    }

    let config = toml::to_string_pretty(&config)
        .with_context(|| "Failed to convert configuration to TOML")?;

    let config_path = PathBuf::from(Configuration::FILE_NAME);
    if config_path.exists()
        && !Confirm::with_theme(&theme)
            .with_prompt(format!(
                "{} already exists, do you want to override it?",
                Configuration::FILE_NAME
            ))
            .interact()?
    {
        println!("Configuration:");
        println!("{}", config);
    } else {
        std::fs::write(&config_path, config)
            .with_context(|| "Failed to write configuration file")?;
        println!("{} written!", Configuration::FILE_NAME);
    }

    Ok(())
}

/// A filename stem derived from the title: `Kumade Book` becomes `KumadeBook`.
fn output_stem(title: &str) -> String {
    let stem: String = title
        .split_whitespace()
        .flat_map(|word| word.chars())
        .filter(|c| c.is_alphanumeric())
        .collect();

    if stem.is_empty() {
        "book".to_string()
    } else {
        stem
    }
}

fn default_theme(variant: &str, stylesheets: &[PathBuf]) -> String {
    // a stylesheet named after the variant wins, e.g. theme/theme_print.css
    if let Some(stylesheet) = stylesheets.iter().find(|path| {
        path.file_stem()
            .and_then(|s| s.to_str())
            .map(|s| s.contains(variant))
            .unwrap_or(false)
    }) {
        return stylesheet.display().to_string();
    }

    "@vivliostyle/theme-techbook@^1.0.0".to_string()
}
