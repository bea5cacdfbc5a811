//! Filesystem content source: turns a demos directory into [`ContentItem`]s.
//!
//! Layout conventions:
//! - `a/b/name.demo.{jsx,tsx,html}` becomes a demo item named `a/b/name`, with the
//!   file's source as its raw content.
//! - `a/b/name.md` next to such a demo is that demo's markdown write-up.
//! - Any other `.md` file becomes a standalone markdown item named by its path
//!   without the extension.

use crate::document::{ContentItem, DocKind};
use crate::error::Result;
use ahash::{AHashMap, AHashSet};
use anyhow::bail;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// Suffixes that mark a file as a demo.
const DEMO_SUFFIXES: &[&str] = &[".demo.jsx", ".demo.tsx", ".demo.html"];

const MARKDOWN_SUFFIX: &str = ".md";

/// Load every demo and markdown item under `root`, sorted by name.
///
/// Hidden files and anything excluded by ignore files are skipped. Entries that
/// cannot be walked or read are logged and skipped; only a missing root is an error.
pub fn load_directory(root: &Path) -> Result<Vec<ContentItem>> {
    if !root.is_dir() {
        bail!("Content root {} is not a directory", root.display());
    }

    let mut files: Vec<(String, PathBuf)> = WalkBuilder::new(root)
        .build()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(e) => {
                tracing::warn!("Skipping unreadable entry under {}: {}", root.display(), e);
                None
            }
        })
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter_map(|entry| {
            let relative = relative_name(root, entry.path())?;
            Some((relative, entry.into_path()))
        })
        .collect();
    files.sort();

    let markdown: AHashMap<&str, &Path> = files
        .iter()
        .filter_map(|(name, path)| Some((name.strip_suffix(MARKDOWN_SUFFIX)?, path.as_path())))
        .collect();

    let mut paired = AHashSet::new();
    let mut items = vec![];

    for (name, path) in &files {
        let Some(base) = DEMO_SUFFIXES
            .iter()
            .find_map(|suffix| name.strip_suffix(suffix))
        else {
            continue;
        };
        let Some(source) = read(path) else {
            continue;
        };

        let mut item = ContentItem::new(base)
            .with_kind(DocKind::Demo)
            .with_raw_content(source);
        if let Some(md_path) = markdown.get(base) {
            paired.insert(base);
            if let Some(markdown) = read(md_path) {
                item = item.with_markdown(markdown);
            }
        }
        items.push(item);
    }

    for (base, path) in &markdown {
        if paired.contains(base) {
            continue;
        }
        let Some(markdown) = read(path) else {
            continue;
        };
        items.push(
            ContentItem::new(*base)
                .with_kind(DocKind::Markdown)
                .with_markdown(markdown),
        );
    }

    items.sort_by(|a, b| a.name.cmp(&b.name));

    tracing::info!(
        "Loaded {} content items ({} demos with markdown) from {}",
        items.len(),
        paired.len(),
        root.display()
    );
    Ok(items)
}

/// File contents, or `None` (with a warning) when the file is unreadable or not UTF-8.
fn read(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(content) => Some(content),
        Err(e) => {
            tracing::warn!("Skipping unreadable content file {}: {}", path.display(), e);
            None
        }
    }
}

/// `/`-joined path of `path` relative to `root`.
fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<&str> = relative
        .components()
        .map(|c| c.as_os_str().to_str())
        .collect::<Option<_>>()?;
    Some(parts.join("/"))
}
