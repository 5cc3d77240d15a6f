//! Emission of the renderer's native configuration.
//!
//! The external renderer does not read `bookpress.toml`; it expects a
//! `vivliostyle.config.js` CommonJS module in the directory it builds from.
//! This writes the descriptor out in that form, keys in the order the renderer
//! documents them: title, author, size, theme, entry, output.

use crate::descriptor::BuildDescriptor;
use std::fmt::Write;
use std::path::PathBuf;

pub const CONFIG_FILE_NAME: &str = "vivliostyle.config.js";

/// Render a descriptor as the renderer's `module.exports` literal.
pub fn vivliostyle_config(descriptor: &BuildDescriptor) -> String {
    let mut out = String::new();

    out.push_str("module.exports = {\n");
    writeln!(out, "  title: {},", js_string(&descriptor.title)).expect("can write to string");
    writeln!(out, "  author: {},", js_string(&descriptor.author)).expect("can write to string");
    writeln!(out, "  size: {},", js_string(descriptor.size.token())).expect("can write to string");
    writeln!(out, "  theme: {},", js_string(&descriptor.theme.to_string()))
        .expect("can write to string");
    write_path_array(&mut out, "entry", &descriptor.entry);
    write_path_array(&mut out, "output", &descriptor.output);
    out.push_str("}\n");

    out
}

fn write_path_array(out: &mut String, key: &str, paths: &[PathBuf]) {
    writeln!(out, "  {key}: [").expect("can write to string");
    for path in paths {
        writeln!(out, "    {},", js_string(&path.display().to_string()))
            .expect("can write to string");
    }
    out.push_str("  ],\n");
}

/// Single-quoted JS string literal.
fn js_string(s: &str) -> String {
    let mut escaped = String::with_capacity(s.len() + 2);
    escaped.push('\'');
    for c in s.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\'' => escaped.push_str("\\'"),
            '\n' => escaped.push_str("\\n"),
            c => escaped.push(c),
        }
    }
    escaped.push('\'');
    escaped
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::descriptor::{BuildDescriptorBuilder, PageSize, Theme};

    #[test]
    fn emits_the_renderer_config_shape() {
        let descriptor = BuildDescriptorBuilder::default()
            .title("タスクランナーkumade - Pythonで作業を自動化しよう")
            .author("やまいも <hello@yamaimo.dev>")
            .size(PageSize::A5)
            .theme(
                "@vivliostyle/theme-techbook@^1.0.0"
                    .parse::<Theme>()
                    .unwrap(),
            )
            .entry_file("cover1.md")
            .entry_file("opening.md")
            .entry_file("cover4.md")
            .output_file("./KumadeBook.pdf")
            .build()
            .expect("can build descriptor");

        let config = vivliostyle_config(&descriptor);
        assert_eq!(
            config,
            "module.exports = {\n\
             \x20 title: 'タスクランナーkumade - Pythonで作業を自動化しよう',\n\
             \x20 author: 'やまいも <hello@yamaimo.dev>',\n\
             \x20 size: 'A5',\n\
             \x20 theme: '@vivliostyle/theme-techbook@^1.0.0',\n\
             \x20 entry: [\n\
             \x20   'cover1.md',\n\
             \x20   'opening.md',\n\
             \x20   'cover4.md',\n\
             \x20 ],\n\
             \x20 output: [\n\
             \x20   './KumadeBook.pdf',\n\
             \x20 ],\n\
             }\n"
        );
    }

    #[test]
    fn escapes_quotes_and_backslashes() {
        assert_eq!(js_string("it's"), r"'it\'s'");
        assert_eq!(js_string(r"a\b"), r"'a\\b'");
        assert_eq!(js_string("plain"), "'plain'");
    }
}
