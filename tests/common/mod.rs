//! Shared fixtures for integration tests.
//!
//! # Available Fixtures
//!
//! - `guide_index`: Two documents (a React hooks guide and a Vue page)
//! - `demo_index`: A mixed set of demos and markdown pages with metadata

use docsift::{ContentItem, DocKind, SearchIndex};
use rstest::fixture;
use std::path::Path;
use tempfile::TempDir;

/// A temporary content directory, removed on drop.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempContent {
    _temp: TempDir,
    root: std::path::PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempContent {
    /// # Panics
    /// Panics if the temporary directory cannot be created.
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file, making parent directories as needed.
    ///
    /// # Panics
    /// Panics if the file cannot be written.
    pub fn create_file(&self, path: &str, content: &str) {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
    }
}

impl Default for TempContent {
    fn default() -> Self {
        Self::new()
    }
}

/// The two-document index used throughout the query tests.
///
/// - id 0: title "React Hooks Guide", path `hooks/guide`, tags `hooks react`
/// - id 1: title "Vue Basics", path `vue/basics`, tags `vue`
#[allow(dead_code)] // Used by some integration test crates only
#[fixture]
pub fn guide_index() -> SearchIndex {
    docsift::tracing::init();
    SearchIndex::build(&[
        ContentItem::new("hooks/guide")
            .with_tags(["hooks", "react"])
            .with_markdown("---\ntitle: React Hooks Guide\n---\nuseState and useEffect basics"),
        ContentItem::new("vue/basics")
            .with_tags(["vue"])
            .with_markdown("---\ntitle: Vue Basics\n---\nVue fundamentals"),
    ])
}

/// A larger index mixing demos and markdown pages.
#[allow(dead_code)] // Used by some integration test crates only
#[fixture]
pub fn demo_index() -> SearchIndex {
    docsift::tracing::init();
    SearchIndex::build(&[
        ContentItem::new("buttons/primary")
            .with_kind(DocKind::Demo)
            .with_tags(["buttons", "forms"])
            .with_raw_content("export default () => <Button primary>Save</Button>;")
            .with_markdown(
                "---\ntitle: Primary Button\ndescription: The main call to action\nauthor: Grace\nminute: 2\n---\nUse one primary button per view.",
            ),
        ContentItem::new("forms/validation")
            .with_kind(DocKind::Demo)
            .with_tags(["forms"])
            .with_raw_content("const schema = object({ email: string().email() });")
            .with_markdown("---\ntitle: Form Validation\n---\nValidate forms before submitting."),
        ContentItem::new("guides/theming")
            .with_kind(DocKind::Markdown)
            .with_markdown(
                "---\ntitle: Theming\ntags: [design, colors]\n---\nOverride design tokens to theme every button.",
            ),
        ContentItem::new("guides/accessibility")
            .with_kind(DocKind::Markdown)
            .with_markdown("# Accessibility\n\nLabel every form control."),
    ])
}
