//! Line-feed normalization for Markdown sources.
//!
//! The external renderer turns every source line break into a half-width
//! space, which is wrong inside CJK prose. This pass joins ordinary wrapped
//! lines before staging, while keeping breaks that are structurally
//! meaningful:
//!
//! 1. front matter passes through untouched
//! 2. code blocks pass through untouched
//! 3. a break stays before a list item
//! 4. a break stays after a line ending in `？` or `！`
//! 5. empty lines stay
//!
//! Implemented as a small state machine over lines; a pending join is held in
//! [`State::DelayedLineFeed`] until the next line shows whether the break was
//! structural.

use anyhow::{Context, Result};
use std::path::Path;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
enum State {
    Init,
    FrontMatter,
    CodeBlock,
    Normal,
    DelayedLineFeed,
}

impl State {
    fn step(self, line: &str, out: &mut String) -> State {
        match self {
            State::Init => {
                if is_front_matter_fence(line) {
                    out.push_str(line);
                    State::FrontMatter
                } else {
                    State::Normal.step(line, out)
                }
            }
            State::FrontMatter => {
                out.push_str(line);
                if is_front_matter_fence(line) {
                    State::Normal
                } else {
                    State::FrontMatter
                }
            }
            State::CodeBlock => {
                out.push_str(line);
                if is_code_fence(line) {
                    State::Normal
                } else {
                    State::CodeBlock
                }
            }
            State::Normal => {
                if is_code_fence(line) {
                    out.push_str(line);
                    State::CodeBlock
                } else if is_empty(line) || keeps_line_feed(line) {
                    out.push_str(line);
                    State::Normal
                } else {
                    out.push_str(line.trim_end());
                    State::DelayedLineFeed
                }
            }
            State::DelayedLineFeed => {
                if is_code_fence(line) {
                    out.push('\n');
                    out.push_str(line);
                    State::CodeBlock
                } else if is_empty(line) || is_list_item(line) {
                    out.push('\n');
                    State::Normal.step(line, out)
                } else if keeps_line_feed(line) {
                    out.push_str(line);
                    State::Normal
                } else {
                    out.push_str(line.trim_end());
                    State::DelayedLineFeed
                }
            }
        }
    }
}

/// Normalize line feeds in a whole document.
pub fn preprocess_str(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut state = State::Init;
    for line in input.split_inclusive('\n') {
        state = state.step(line, &mut out);
    }
    out
}

/// Normalize line feeds from `src` into `dst`.
pub fn preprocess_file(src: &Path, dst: &Path) -> Result<()> {
    let input = std::fs::read_to_string(src)
        .with_context(|| format!("Failed to read {}", src.display()))?;
    std::fs::write(dst, preprocess_str(&input))
        .with_context(|| format!("Failed to write {}", dst.display()))?;
    Ok(())
}

fn body(line: &str) -> &str {
    line.strip_suffix('\n').unwrap_or(line)
}

fn is_front_matter_fence(line: &str) -> bool {
    line.starts_with("---")
}

fn is_code_fence(line: &str) -> bool {
    line.starts_with("```")
}

fn is_empty(line: &str) -> bool {
    body(line).is_empty()
}

/// Fullwidth question and exclamation marks end a sentence that should keep
/// its line break.
fn keeps_line_feed(line: &str) -> bool {
    body(line).ends_with(['？', '！'])
}

/// Does the line start a list item (`- `, `+ `, `* `, or `1. ` style)?
fn is_list_item(line: &str) -> bool {
    let trimmed = line.trim_start();

    if let Some(rest) = trimmed.strip_prefix(['-', '+', '*']) {
        return rest.starts_with(char::is_whitespace);
    }

    let digits = trimmed.chars().take_while(char::is_ascii_digit).count();
    if digits == 0 {
        return false;
    }
    trimmed[digits..]
        .strip_prefix('.')
        .map(|rest| rest.starts_with(char::is_whitespace))
        .unwrap_or(false)
}
