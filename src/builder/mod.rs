//! Staging and building of one variant.
//!
//! The external renderer owns everything about document rendering; our job is
//! to hand it a self-contained build directory. For a variant named `print`
//! that directory is `build_print/`, assembled from:
//!
//! - `package.json` / `package-lock.json` from the project root (so theme
//!   packages can be installed with `npm install`)
//! - the contents of `assets_print/`, if present (images, css)
//! - the local theme stylesheet, when the descriptor names one
//! - every entry file, run through line-feed normalization
//! - an emitted `vivliostyle.config.js`
//!
//! then built by running the renderer CLI inside it.

mod emit;
pub use emit::{vivliostyle_config, CONFIG_FILE_NAME};

use crate::descriptor::{BuildDescriptor, Configuration};
use anyhow::{anyhow, Context, Result};
use indicatif::ProgressBar;
use std::path::{Path, PathBuf};
use std::process::Command;

const PACKAGE_MANIFESTS: &[&str] = &["package.json", "package-lock.json"];

/// Where staging for a variant lives, relative to the project root.
pub fn build_dir(variant: &str) -> PathBuf {
    PathBuf::from(format!("build_{variant}"))
}

/// Per-variant asset directory, relative to the project root.
pub fn assets_dir(variant: &str) -> PathBuf {
    PathBuf::from(format!("assets_{variant}"))
}

/// Stage and build one variant in `project_dir`.
///
/// Validates the descriptor first; the external renderer gives poor errors for
/// malformed input, so we refuse to hand it one. Returns the produced output
/// paths, resolved inside the build directory.
pub fn build(
    project_dir: &Path,
    variant: &str,
    descriptor: &BuildDescriptor,
    progress: &ProgressBar,
) -> Result<Vec<PathBuf>> {
    descriptor.validate(variant, project_dir)?;

    let build_dir = stage(project_dir, variant, descriptor, progress)?;

    progress.set_message("Running renderer...");
    run_checked(
        Command::new("npx")
            .args(["vivliostyle", "build"])
            .current_dir(&build_dir),
        "npx vivliostyle build",
    )?;
    progress.finish_and_clear();

    Ok(descriptor
        .output
        .iter()
        .map(|out| resolve_output(&build_dir, out))
        .collect())
}

/// An output path resolved inside the build directory, without `./` segments
/// the descriptor may carry.
fn resolve_output(build_dir: &Path, output: &Path) -> PathBuf {
    let output: PathBuf = output
        .components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .collect();
    build_dir.join(output)
}

/// Assemble the build directory for one variant, returning its path.
pub fn stage(
    project_dir: &Path,
    variant: &str,
    descriptor: &BuildDescriptor,
    progress: &ProgressBar,
) -> Result<PathBuf> {
    let build_dir = project_dir.join(self::build_dir(variant));
    std::fs::create_dir_all(&build_dir)
        .with_context(|| format!("Failed to create {}", build_dir.display()))?;

    progress.set_message("Copying package manifests...");
    let mut has_manifest = false;
    for manifest in PACKAGE_MANIFESTS {
        let src = project_dir.join(manifest);
        if src.is_file() {
            copy_file(&src, &build_dir.join(manifest))?;
            has_manifest = true;
        }
    }
    if has_manifest && !build_dir.join("node_modules").is_dir() {
        progress.set_message("Installing renderer dependencies...");
        run_checked(
            Command::new("npm").arg("install").current_dir(&build_dir),
            "npm install",
        )?;
    }

    progress.set_message("Copying assets...");
    let assets = project_dir.join(assets_dir(variant));
    if assets.is_dir() {
        copy_dir_contents(&assets, &build_dir)?;
    }

    if let Some(stylesheet) = descriptor.theme.stylesheet() {
        if let Some(theme_dir) = theme_build_dir(project_dir, stylesheet) {
            progress.set_message("Building theme...");
            if !theme_dir.join("node_modules").is_dir() {
                run_checked(
                    Command::new("npm").arg("install").current_dir(&theme_dir),
                    "npm install",
                )?;
            }
            run_checked(
                Command::new("npm")
                    .args(["run", "build"])
                    .current_dir(&theme_dir),
                "npm run build",
            )?;
        }

        let src = project_dir.join(stylesheet);
        if !src.is_file() {
            return Err(anyhow!(
                "Theme stylesheet '{}' does not exist",
                stylesheet.display()
            ));
        }
        copy_file(&src, &build_dir.join(stylesheet))?;
    }

    progress.set_message("Preprocessing sources...");
    for entry in &descriptor.entry {
        let dst = build_dir.join(entry);
        if let Some(parent) = dst.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        crate::preprocess::preprocess_file(&project_dir.join(entry), &dst)?;
        progress.inc(1);
    }

    let config_path = build_dir.join(CONFIG_FILE_NAME);
    std::fs::write(&config_path, vivliostyle_config(descriptor))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    Ok(build_dir)
}

/// Delete the build directories of every variant in the configuration.
pub fn clean(project_dir: &Path, config: &Configuration) -> Result<Vec<PathBuf>> {
    let mut removed = Vec::new();
    for variant in config.descriptors.keys() {
        let dir = project_dir.join(build_dir(variant));
        if dir.is_dir() {
            std::fs::remove_dir_all(&dir)
                .with_context(|| format!("Failed to remove {}", dir.display()))?;
            removed.push(dir);
        }
    }
    Ok(removed)
}

/// Open a produced file with the platform's default opener.
pub fn open(path: &Path) -> Result<()> {
    #[cfg(target_os = "macos")]
    let mut command = {
        let mut c = Command::new("open");
        c.arg(path);
        c
    };
    #[cfg(target_os = "windows")]
    let mut command = {
        let mut c = Command::new("cmd");
        c.args(["/C", "start", ""]).arg(path);
        c
    };
    #[cfg(not(any(target_os = "macos", target_os = "windows")))]
    let mut command = {
        let mut c = Command::new("xdg-open");
        c.arg(path);
        c
    };

    run_checked(&mut command, "platform opener")
}

/// The directory whose npm build can produce a missing local stylesheet.
///
/// Theme sources may ship as scss with their own `package.json`, with the
/// stylesheet only existing after the theme's build has run. When the
/// descriptor names a stylesheet that is absent but its directory carries a
/// manifest, staging runs that build before copying.
fn theme_build_dir(project_dir: &Path, stylesheet: &Path) -> Option<PathBuf> {
    if project_dir.join(stylesheet).is_file() {
        return None;
    }

    let theme_dir = project_dir.join(stylesheet.parent()?);
    theme_dir
        .join("package.json")
        .is_file()
        .then_some(theme_dir)
}

fn run_checked(command: &mut Command, what: &str) -> Result<()> {
    log::debug!("running {what}");
    let status = command
        .status()
        .with_context(|| format!("Failed to launch '{what}'"))?;
    if !status.success() {
        return Err(anyhow!("'{what}' exited with {status}"));
    }
    Ok(())
}

fn copy_file(src: &Path, dst: &Path) -> Result<()> {
    if let Some(parent) = dst.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    log::debug!("copying {} -> {}", src.display(), dst.display());
    std::fs::copy(src, dst)
        .with_context(|| format!("Failed to copy {} to {}", src.display(), dst.display()))?;
    Ok(())
}

/// Copy the contents of `src` into `dst`, recursing into subdirectories.
fn copy_dir_contents(src: &Path, dst: &Path) -> Result<()> {
    let read_dir = std::fs::read_dir(src)
        .with_context(|| format!("Failed to read directory {}", src.display()))?;

    for entry in read_dir {
        let entry = entry.with_context(|| format!("Failed to read entry in {}", src.display()))?;
        let target = dst.join(entry.file_name());
        if entry.path().is_dir() {
            std::fs::create_dir_all(&target)
                .with_context(|| format!("Failed to create {}", target.display()))?;
            copy_dir_contents(&entry.path(), &target)?;
        } else {
            copy_file(&entry.path(), &target)?;
        }
    }

    Ok(())
}
