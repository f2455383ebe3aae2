//! Integration tests for the catalog: category index, listing parser and
//! the per-process listing cache.

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod helpers;

use std::sync::Arc;

use helpers::fake_remote::FakeRemote;
use toolshelf::catalog::{
    CatalogError, CategoryIndex, DEFAULT_API_URL, RemoteApi, ToolEntry, ToolMap, ToolRegistry,
    contents_url, parse_listing,
};

const LISTING_URL: &str =
    "https://raw.githubusercontent.com/Pythonista-Tools/Pythonista-Tools/master/Widgets.md";

const WIDGETS_MD: &str = "\
# Widgets

| Name | Description |
| ---- | ----------- |
| [Clock][clock] by [@alice][] | Shows the time |
| [Weather][] by bob | [weather-docs] |
| [Broken][nowhere] by carol | Never resolves |
| [AppStore][store] by dave | Paid app |

[clock]: https://github.com/alice/clock
[@alice]: https://github.com/alice
[Weather]: https://gist.github.com/bob/0123456789abcdef
[weather-docs]: https://example.com/weather
[store]: https://itunes.apple.com/app/id1
";

// ============================================================================
// Parser
// ============================================================================

mod parser_tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    #[test]
    fn test_parse_full_document() {
        let tools = parse_listing(WIDGETS_MD);

        let mut expected = ToolMap::new();
        for (name, url, description) in [
            ("AppStore", "https://itunes.apple.com/app/id1", "Paid app"),
            ("Clock", "https://github.com/alice/clock", "Shows the time"),
            (
                "Weather",
                "https://gist.github.com/bob/0123456789abcdef",
                "https://example.com/weather",
            ),
        ] {
            expected.insert(
                name.to_string(),
                ToolEntry::new(name.to_string(), url.to_string(), description.to_string()),
            );
        }

        assert_eq!(tools, expected);
    }

    #[test]
    fn test_single_row_and_definition() {
        let tools = parse_listing("| [Foo][f] by x | desc |\n[f]: http://x\n");

        assert_eq!(tools.len(), 1);
        assert_eq!(
            tools["Foo"],
            ToolEntry::new("Foo".to_string(), "http://x".to_string(), "desc".to_string())
        );
    }

    #[test]
    fn test_url_and_description_labels() {
        let tools = parse_listing("| [Foo][f] by x | [g] |\n[f]: http://x\n[g]: http://y\n");

        assert_eq!(tools["Foo"].source_url, "http://x");
        assert_eq!(tools["Foo"].description, "http://y");
    }

    #[test]
    fn test_missing_definition_excludes_tool() {
        let tools = parse_listing("| [Foo][f] by x | desc |\n[g]: http://y\n");
        assert!(tools.is_empty());
    }

    #[test]
    fn test_tool_name_definition_supplies_url() {
        let tools = parse_listing("| [Foo][1] by x | desc |\n[Foo]: https://github.com/a/foo\n");

        assert_eq!(tools.len(), 1);
        assert_eq!(tools["Foo"].source_url, "https://github.com/a/foo");
    }

    #[test]
    fn test_empty_document() {
        assert!(parse_listing("").is_empty());
    }

    proptest! {
        #[test]
        fn prop_every_tool_has_resolved_url(
            rows in prop::collection::vec(
                ("[A-Za-z]{1,8}", "[a-z]{0,4}", "[a-z ]{1,12}"),
                0..8,
            ),
            defs in prop::collection::vec(("[a-z]{1,4}", "(https?://[a-z]{1,8}\\.com)?"), 0..8),
        ) {
            let mut text = String::new();
            for (name, label, description) in &rows {
                text.push_str(&format!("| [{}][{}] by x | {} |\n", name, label, description));
            }
            for (label, url) in &defs {
                text.push_str(&format!("[{}]: {}\n", label, url));
            }

            for (name, entry) in parse_listing(&text) {
                prop_assert_eq!(&name, &entry.name);
                prop_assert!(!entry.source_url.is_empty());
                prop_assert!(!entry.source_url.starts_with('['));
            }
        }
    }
}

// ============================================================================
// Category index
// ============================================================================

mod index_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index(remote: &Arc<FakeRemote>) -> CategoryIndex {
        let remote: Arc<dyn RemoteApi> = remote.clone();
        CategoryIndex::new(remote, DEFAULT_API_URL, "Pythonista-Tools", "Pythonista-Tools")
    }

    #[test]
    fn test_list_categories() {
        let remote = Arc::new(FakeRemote::new());
        remote.serve(
            &contents_url(DEFAULT_API_URL, "Pythonista-Tools", "Pythonista-Tools"),
            r#"[
                {"name": "README.md", "type": "file", "sha": "r1", "download_url": "http://r/README.md"},
                {"name": "Widgets.md", "type": "file", "sha": "w1", "download_url": "http://r/Widgets.md"},
                {"name": "Games.md", "type": "file", "sha": "g1", "download_url": "http://r/Games.md"},
                {"name": "ptinstaller.py", "type": "file", "sha": "p1", "download_url": "http://r/ptinstaller.py"},
                {"name": "img", "type": "dir", "sha": "i1", "download_url": null}
            ]"#,
        );

        let categories = index(&remote).list_categories().unwrap();

        assert_eq!(
            categories.keys().cloned().collect::<Vec<_>>(),
            vec!["Games".to_string(), "Widgets".to_string()]
        );
        assert_eq!(categories["Games"].source_url, "http://r/Games.md");
        assert_eq!(categories["Games"].content_hash, "g1");
    }

    #[test]
    fn test_list_categories_propagates_failure() {
        let remote = Arc::new(FakeRemote::new());
        let err = index(&remote).list_categories().unwrap_err();
        assert!(matches!(err, CatalogError::RemoteListing(_)));
    }

    #[test]
    fn test_list_categories_rejects_malformed_body() {
        let remote = Arc::new(FakeRemote::new());
        remote.serve(
            &contents_url(DEFAULT_API_URL, "Pythonista-Tools", "Pythonista-Tools"),
            r#"{"message": "Not Found"}"#,
        );

        let err = index(&remote).list_categories().unwrap_err();
        assert!(matches!(err, CatalogError::RemoteListing(_)));
    }

    #[test]
    fn test_categories_rebuilt_on_every_call() {
        let remote = Arc::new(FakeRemote::new());
        let url = contents_url(DEFAULT_API_URL, "Pythonista-Tools", "Pythonista-Tools");
        remote.serve(&url, "[]");

        let index = index(&remote);
        index.list_categories().unwrap();
        index.list_categories().unwrap();

        assert_eq!(remote.request_count(&url), 2);
    }
}

// ============================================================================
// Listing cache
// ============================================================================

mod registry_tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_second_lookup_uses_cache() {
        let remote = Arc::new(FakeRemote::new());
        remote.serve(LISTING_URL, WIDGETS_MD);

        let registry = ToolRegistry::new(remote.clone());
        let first = registry.list_tools(LISTING_URL).unwrap();
        let second = registry.list_tools(LISTING_URL).unwrap();

        assert_eq!(first, second);
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(remote.request_count(LISTING_URL), 1);
        assert!(registry.cache().contains(LISTING_URL));
    }

    #[test]
    fn test_failed_lookup_not_cached() {
        let remote = Arc::new(FakeRemote::new());
        let registry = ToolRegistry::new(remote.clone());

        assert!(matches!(
            registry.list_tools(LISTING_URL),
            Err(CatalogError::Network(_))
        ));
        assert!(registry.cache().is_empty());

        remote.serve(LISTING_URL, WIDGETS_MD);
        let tools = registry.list_tools(LISTING_URL).unwrap();
        assert_eq!(tools.len(), 3);
        assert_eq!(remote.request_count(LISTING_URL), 2);
    }

    #[test]
    fn test_cache_is_per_url() {
        let remote = Arc::new(FakeRemote::new());
        let other = "https://raw.githubusercontent.com/x/y/master/Games.md";
        remote.serve(LISTING_URL, WIDGETS_MD);
        remote.serve(other, "| [Chess][c] x | board |\n[c]: https://github.com/a/chess\n");

        let registry = ToolRegistry::new(remote.clone());
        let widgets = registry.list_tools(LISTING_URL).unwrap();
        let games = registry.list_tools(other).unwrap();

        assert!(widgets.contains_key("Clock"));
        assert!(games.contains_key("Chess"));
        assert_eq!(registry.cache().len(), 2);
    }
}
