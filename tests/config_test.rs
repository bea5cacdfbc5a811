mod common;

use assert2::check;
use common::TempContent;
use docsift::{ContentItem, SearchConfig, SearchIndex};

#[test]
fn test_load_config_from_file() {
    let dir = TempContent::new();
    dir.create_file(
        "docsift.toml",
        r#"
default_limit = 1

[weights]
content = 10.0

[highlight]
pre_tag = "<em>"
post_tag = "</em>"
"#,
    );

    let config = SearchConfig::load(&dir.path().join("docsift.toml")).unwrap();
    check!(config.default_limit == 1);
    check!(config.weights.content == 10.0);
    check!(config.weights.title == 3.0);
    check!(config.highlight.pre_tag == "<em>");
}

#[test]
fn test_load_missing_config_names_the_file() {
    let dir = TempContent::new();
    let err = SearchConfig::load(&dir.path().join("absent.toml")).unwrap_err();
    check!(format!("{:#}", err).contains("absent.toml"));
}

#[test]
fn test_config_changes_ranking_and_markup() {
    let items = [
        ContentItem::new("guides/styling").with_markdown("Styling with tokens"),
        ContentItem::new("tokens").with_markdown("Overview"),
    ];

    // Default weights favor the title match
    let index = SearchIndex::build(&items);
    check!(index.search("tokens")[0].name == "tokens");

    let config = SearchConfig::from_toml_str(
        "[weights]\ncontent = 10.0\n[highlight]\npre_tag = \"[\"\npost_tag = \"]\"\n",
    )
    .unwrap();
    let index = SearchIndex::build_with_config(&items, config);
    let results = index.search("tokens");
    check!(results[0].name == "guides/styling");

    let fragments = &results[0].highlights[0].fragments;
    check!(fragments[0].to_lowercase().contains("[tokens]"));
}
