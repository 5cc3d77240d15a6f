//! The build descriptor data model.
//!
//! A [`BuildDescriptor`] is a passive record describing one publishable
//! variant of the book: title, author, page size, theme, the ordered entry
//! list, and the output paths. The external renderer consumes it wholesale;
//! nothing here renders anything. A project's `bookpress.toml` holds several
//! sibling descriptors keyed by variant name (`print`, `ebook`, `general`),
//! duplicated in full rather than derived from a shared template.

mod page_size;
pub use page_size::*;

mod theme;
pub use theme::*;

use anyhow::{anyhow, Context, Result};
use derive_builder::Builder;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Everything the external renderer needs to know to build one variant.
#[derive(Builder, Debug, Clone, Serialize, Deserialize)]
#[builder(setter(into))]
pub struct BuildDescriptor {
    /// The title of the book
    pub title: String,

    /// Author name and contact, e.g. `Jane Doe <jane@example.com>`
    pub author: String,

    /// Page size token passed through to the renderer
    pub size: PageSize,

    /// Local stylesheet or external theme package
    pub theme: Theme,

    /// Ordered source documents; order determines the final document order
    #[builder(setter(each(name = "entry_file", into)), default)]
    pub entry: Vec<PathBuf>,

    /// Output file(s) the renderer should produce
    #[builder(setter(each(name = "output_file", into)), default)]
    pub output: Vec<PathBuf>,
}

impl BuildDescriptor {
    /// Check the structural invariants of the descriptor.
    ///
    /// Entry paths are resolved relative to `base_dir` (the directory the
    /// descriptor was loaded from). All problems are gathered into a single
    /// error so the user can fix everything in one pass.
    pub fn validate(&self, variant: &str, base_dir: &Path) -> Result<()> {
        let mut problems: Vec<String> = Vec::default();

        if self.title.trim().is_empty() {
            problems.push("title must not be empty".to_string());
        }
        if self.author.trim().is_empty() {
            problems.push("author must not be empty".to_string());
        }

        if self.entry.is_empty() {
            problems.push("entry must list at least one source document".to_string());
        }
        let mut seen: HashSet<&PathBuf> = HashSet::default();
        for path in &self.entry {
            if !seen.insert(path) {
                problems.push(format!("entry lists '{}' more than once", path.display()));
            }
            if !base_dir.join(path).is_file() {
                problems.push(format!(
                    "entry file '{}' does not exist under {}",
                    path.display(),
                    base_dir.display()
                ));
            }
        }

        if self.output.is_empty() {
            problems.push("output must list at least one destination".to_string());
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(anyhow!(
                "Descriptor '{}' is not well-formed:\n  - {}",
                variant,
                problems.join("\n  - ")
            ))
        }
    }
}

/// The parsed contents of a `bookpress.toml` file.
///
/// Variant names map to complete, independent descriptors; the map is ordered
/// so reports and builds are deterministic.
#[derive(Serialize, Deserialize, Default)]
pub struct Configuration {
    #[serde(rename = "descriptor")]
    pub descriptors: BTreeMap<String, BuildDescriptor>,
}

impl Configuration {
    pub const FILE_NAME: &'static str = "bookpress.toml";

    /// Load and parse the configuration file in the current directory.
    pub fn load() -> Result<Configuration> {
        let contents = std::fs::read_to_string(Self::FILE_NAME).with_context(|| {
            format!(
                "Failed to load {} - run 'bookpress config' first",
                Self::FILE_NAME
            )
        })?;
        let config: Configuration = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", Self::FILE_NAME))?;

        if config.descriptors.is_empty() {
            return Err(anyhow!("{} defines no descriptors", Self::FILE_NAME));
        }

        Ok(config)
    }

    /// Look up one variant's descriptor by name.
    pub fn variant(&self, name: &str) -> Result<&BuildDescriptor> {
        self.descriptors.get(name).ok_or_else(|| {
            anyhow!(
                "No descriptor named '{}' (known variants: {})",
                name,
                self.descriptors
                    .keys()
                    .map(String::as_str)
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const KUMADE_BOOK: &str = r#"
        [descriptor.general]
        title = "タスクランナーkumade - Pythonで作業を自動化しよう"
        author = "やまいも <hello@yamaimo.dev>"
        size = "A5"
        theme = "@vivliostyle/theme-techbook@^1.0.0"
        entry = [
            "cover1.md",
            "opening.md",
            "toc.md",
            "chap1_intro.md",
            "chap2_getstart.md",
            "chap3_kumadefile.md",
            "chap4_usecase.md",
            "closing.md",
            "cover4.md",
        ]
        output = ["./KumadeBook.pdf"]

        [descriptor.print]
        title = "タスクランナーkumade - Pythonで作業を自動化しよう"
        author = "やまいも <hello@yamaimo.dev>"
        size = "A5"
        theme = "theme/theme_print.css"
        entry = [
            "opening.md",
            "toc.md",
            "chap1_intro.md",
            "chap2_getstart.md",
            "chap3_kumadefile.md",
            "chap4_usecase.md",
            "closing.md",
        ]
        output = ["./KumadeBook.print.pdf"]
    "#;

    fn kumade_config() -> Configuration {
        toml::from_str(KUMADE_BOOK).expect("can parse fixture")
    }

    #[test]
    fn print_descriptor_has_expected_entries_and_output() {
        let config = kumade_config();
        let print = config.variant("print").expect("print variant exists");

        let entries: Vec<_> = print
            .entry
            .iter()
            .map(|p| p.display().to_string())
            .collect();
        assert_eq!(
            entries,
            vec![
                "opening.md",
                "toc.md",
                "chap1_intro.md",
                "chap2_getstart.md",
                "chap3_kumadefile.md",
                "chap4_usecase.md",
                "closing.md",
            ]
        );
        assert_eq!(print.output, vec![PathBuf::from("./KumadeBook.print.pdf")]);
        assert_eq!(print.size, PageSize::A5);
        assert!(print.theme.stylesheet().is_some());
    }

    #[test]
    fn general_descriptor_wraps_print_entries_in_covers() {
        let config = kumade_config();
        let print = config.variant("print").expect("print variant exists");
        let general = config.variant("general").expect("general variant exists");

        let mut expected = vec![PathBuf::from("cover1.md")];
        expected.extend(print.entry.iter().cloned());
        expected.push(PathBuf::from("cover4.md"));

        assert_eq!(general.entry, expected);
        assert_eq!(general.output, vec![PathBuf::from("./KumadeBook.pdf")]);
        assert!(general.theme.stylesheet().is_none());
    }

    #[test]
    fn unknown_variant_names_the_known_ones() {
        let config = kumade_config();
        let err = config.variant("audiobook").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("audiobook"));
        assert!(msg.contains("general"));
        assert!(msg.contains("print"));
    }

    #[test]
    fn validate_accepts_a_well_formed_descriptor() {
        let dir = tempfile::tempdir().expect("can create tempdir");
        for name in ["opening.md", "closing.md"] {
            std::fs::write(dir.path().join(name), "# hi\n").expect("can write entry");
        }

        let descriptor = BuildDescriptorBuilder::default()
            .title("A Book")
            .author("Someone <someone@example.com>")
            .size(PageSize::A5)
            .theme(Theme::Stylesheet(PathBuf::from("theme/theme.css")))
            .entry_file("opening.md")
            .entry_file("closing.md")
            .output_file("./book.pdf")
            .build()
            .expect("can build descriptor");

        descriptor
            .validate("general", dir.path())
            .expect("descriptor is well-formed");
    }

    #[test]
    fn validate_reports_every_problem_at_once() {
        let dir = tempfile::tempdir().expect("can create tempdir");

        let descriptor = BuildDescriptorBuilder::default()
            .title("")
            .author("  ")
            .size(PageSize::A5)
            .theme(Theme::Stylesheet(PathBuf::from("theme/theme.css")))
            .entry_file("missing.md")
            .entry_file("missing.md")
            .build()
            .expect("can build descriptor");

        let err = descriptor.validate("print", dir.path()).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("title must not be empty"));
        assert!(msg.contains("author must not be empty"));
        assert!(msg.contains("more than once"));
        assert!(msg.contains("does not exist"));
        assert!(msg.contains("output must list at least one destination"));
    }

    #[test]
    fn validate_rejects_an_empty_entry_list() {
        let dir = tempfile::tempdir().expect("can create tempdir");

        let descriptor = BuildDescriptorBuilder::default()
            .title("A Book")
            .author("Someone")
            .size(PageSize::A4)
            .theme(Theme::Stylesheet(PathBuf::from("theme.css")))
            .output_file("./book.pdf")
            .build()
            .expect("can build descriptor");

        let err = descriptor.validate("ebook", dir.path()).unwrap_err();
        assert!(err
            .to_string()
            .contains("entry must list at least one source document"));
    }

    #[test]
    fn descriptors_round_trip_through_toml() {
        let config = kumade_config();
        let serialized = toml::to_string_pretty(&config).expect("can serialize");
        let reparsed: Configuration = toml::from_str(&serialized).expect("can reparse");

        assert_eq!(
            reparsed.variant("general").unwrap().entry,
            config.variant("general").unwrap().entry
        );
        assert_eq!(
            reparsed.variant("print").unwrap().theme.to_string(),
            "theme/theme_print.css"
        );
    }
}
