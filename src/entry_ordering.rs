//! Reading-order sorting for entry files.
//!
//! The entry list determines the final document order, so the wizard needs a
//! sensible default ordering for the files it detects. Book projects follow a
//! strong convention: front cover, opening pages, table of contents, numbered
//! chapters, closing pages, back cover. Anything unrecognized lands between
//! the chapters and the closing pages.
//!
//! Within a role, files sort with a numeric-aware comparison so `chap10`
//! follows `chap9` instead of `chap1`.

use std::cmp::Ordering;
use std::path::{Path, PathBuf};

/// The role a file plays in the book's reading order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Ord, PartialOrd)]
pub enum EntryRole {
    FrontCover,
    Opening,
    TableOfContents,
    Chapter,
    Other,
    Closing,
    BackCover,
}

/// Classify a file by its name.
///
/// Conventions follow common Japanese technical-book project layouts:
/// `cover1`/`cover4` are the front and back covers, `chapN_*` the chapters.
pub fn classify(path: &Path) -> EntryRole {
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or_default()
        .to_ascii_lowercase();

    if matches!(stem.as_str(), "cover1" | "front_cover" | "cover_front") {
        return EntryRole::FrontCover;
    }
    if matches!(stem.as_str(), "cover4" | "back_cover" | "cover_back") {
        return EntryRole::BackCover;
    }
    if matches!(stem.as_str(), "opening" | "preface" | "foreword") {
        return EntryRole::Opening;
    }
    if matches!(stem.as_str(), "toc" | "contents") {
        return EntryRole::TableOfContents;
    }
    if matches!(
        stem.as_str(),
        "closing" | "afterword" | "postscript" | "colophon"
    ) {
        return EntryRole::Closing;
    }
    if stem.starts_with("chap") {
        return EntryRole::Chapter;
    }

    EntryRole::Other
}

/// Sort entries into reading order: roles first, numeric-aware names within
/// each role.
pub fn sort_entries(entries: &mut [PathBuf]) {
    entries.sort_by(|a, b| match classify(a).cmp(&classify(b)) {
        Ordering::Equal => natural_cmp(
            &a.display().to_string().to_ascii_lowercase(),
            &b.display().to_string().to_ascii_lowercase(),
        ),
        o => o,
    });
}

/// Compare strings treating runs of digits as numbers.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a = a.chars().peekable();
    let mut b = b.chars().peekable();

    loop {
        match (a.peek().copied(), b.peek().copied()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(ca), Some(cb)) => {
                if ca.is_ascii_digit() && cb.is_ascii_digit() {
                    let na = take_number(&mut a);
                    let nb = take_number(&mut b);
                    match na.cmp(&nb) {
                        Ordering::Equal => {}
                        o => return o,
                    }
                } else {
                    match ca.cmp(&cb) {
                        Ordering::Equal => {
                            a.next();
                            b.next();
                        }
                        o => return o,
                    }
                }
            }
        }
    }
}

fn take_number(chars: &mut std::iter::Peekable<std::str::Chars>) -> u64 {
    let mut n: u64 = 0;
    while let Some(c) = chars.peek().copied() {
        if let Some(d) = c.to_digit(10) {
            n = n.saturating_mul(10).saturating_add(d as u64);
            chars.next();
        } else {
            break;
        }
    }
    n
}

#[cfg(test)]
mod test {
    use super::*;

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    #[test]
    fn classifies_conventional_names() {
        assert_eq!(classify(Path::new("cover1.md")), EntryRole::FrontCover);
        assert_eq!(classify(Path::new("cover4.md")), EntryRole::BackCover);
        assert_eq!(classify(Path::new("opening.md")), EntryRole::Opening);
        assert_eq!(classify(Path::new("toc.md")), EntryRole::TableOfContents);
        assert_eq!(classify(Path::new("chap1_intro.md")), EntryRole::Chapter);
        assert_eq!(classify(Path::new("closing.md")), EntryRole::Closing);
        assert_eq!(classify(Path::new("appendix_a.md")), EntryRole::Other);
    }

    #[test]
    fn sorts_a_shuffled_book_into_reading_order() {
        let mut entries = paths(&[
            "chap4_usecase.md",
            "cover4.md",
            "toc.md",
            "chap1_intro.md",
            "closing.md",
            "chap3_kumadefile.md",
            "cover1.md",
            "opening.md",
            "chap2_getstart.md",
        ]);

        sort_entries(&mut entries);

        assert_eq!(
            entries,
            paths(&[
                "cover1.md",
                "opening.md",
                "toc.md",
                "chap1_intro.md",
                "chap2_getstart.md",
                "chap3_kumadefile.md",
                "chap4_usecase.md",
                "closing.md",
                "cover4.md",
            ])
        );
    }

    #[test]
    fn chapter_numbers_sort_numerically() {
        let mut entries = paths(&["chap10.md", "chap2.md", "chap1.md"]);
        sort_entries(&mut entries);
        assert_eq!(entries, paths(&["chap1.md", "chap2.md", "chap10.md"]));
    }

    #[test]
    fn unrecognized_files_land_before_closing_pages() {
        let mut entries = paths(&["closing.md", "appendix.md", "chap1.md"]);
        sort_entries(&mut entries);
        assert_eq!(entries, paths(&["chap1.md", "appendix.md", "closing.md"]));
    }

    #[test]
    fn natural_compare_handles_mixed_text() {
        assert_eq!(natural_cmp("chap2", "chap10"), Ordering::Less);
        assert_eq!(natural_cmp("chap2a", "chap2b"), Ordering::Less);
        assert_eq!(natural_cmp("chap2", "chap2"), Ordering::Equal);
        assert_eq!(natural_cmp("b1", "a2"), Ordering::Greater);
    }
}
