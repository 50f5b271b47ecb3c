//! Property tests for the URL codec and request builder.

use episode_search::url_state::{self, EXACT_PHRASE_KEY, QUERY_KEY, SEARCH_TITLE_KEY};
use episode_search::{build, QueryParams, SearchQuery};
use proptest::prelude::*;

// =============================================================================
// STRATEGIES
// =============================================================================

/// Arbitrary search text, including characters the encoder must escape.
fn text_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(String::new()),
        prop::string::string_regex("[a-z ]{1,20}").unwrap(),
        prop::string::string_regex("[ -~]{1,20}").unwrap(),
        any::<String>(),
    ]
}

fn query_strategy() -> impl Strategy<Value = SearchQuery> {
    (text_strategy(), any::<bool>(), any::<bool>()).prop_map(|(text, exact_phrase, search_title)| {
        SearchQuery::new(text)
            .with_exact_phrase(exact_phrase)
            .with_search_title(search_title)
    })
}

/// Unrelated parameters already in the address bar.
fn foreign_params_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(
        (
            prop::string::string_regex("(ref|utm_[a-z]{1,6}|page)").unwrap(),
            prop::string::string_regex("[a-z0-9]{0,8}").unwrap(),
        ),
        0..4,
    )
}

fn render(pairs: &[(String, String)]) -> String {
    let mut params = QueryParams::new();
    for (key, value) in pairs {
        params.append(key, value.clone());
    }
    params.to_string()
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// decode(encode(q)) == q for every query.
    #[test]
    fn prop_round_trip(query in query_strategy()) {
        let encoded = url_state::encode("", &url_state::to_changes(&query));
        prop_assert_eq!(url_state::decode(&encoded), query.clone());
        prop_assert_eq!(url_state::decode(&url_state::location(&encoded)), query);
    }

    /// Default values never appear as parameters.
    #[test]
    fn prop_defaults_are_absent(query in query_strategy()) {
        let encoded = url_state::encode("", &url_state::to_changes(&query));
        let params = QueryParams::parse(&encoded);

        prop_assert_eq!(params.get(QUERY_KEY).is_some(), !query.text.is_empty());
        prop_assert_eq!(params.get(EXACT_PHRASE_KEY).is_some(), query.exact_phrase);
        prop_assert_eq!(params.get(SEARCH_TITLE_KEY).is_some(), query.search_title);
        prop_assert!(!encoded.contains("=false"));
    }

    /// Encoding on top of a foreign query string keeps the foreign keys.
    #[test]
    fn prop_foreign_params_survive(
        query in query_strategy(),
        foreign in foreign_params_strategy(),
    ) {
        let current = render(&foreign);
        let encoded = url_state::encode(&current, &url_state::to_changes(&query));
        let params = QueryParams::parse(&encoded);

        for (key, value) in &foreign {
            prop_assert!(params.iter().any(|(k, v)| k == key && v == value));
        }
        prop_assert_eq!(url_state::decode(&encoded), query);
    }

    /// Facets are always sent; blank text never is; offset only past zero.
    #[test]
    fn prop_request_shape(
        query in query_strategy(),
        limit in 1usize..100,
        offset in prop::option::of(0usize..500),
    ) {
        let request = build(&query, limit, offset);
        let params = request.params();
        let limit_text = limit.to_string();

        prop_assert!(params.get(EXACT_PHRASE_KEY).is_some());
        prop_assert!(params.get(SEARCH_TITLE_KEY).is_some());
        prop_assert_eq!(params.get(QUERY_KEY).is_some(), !query.text.trim().is_empty());
        prop_assert_eq!(params.get("limit"), Some(limit_text.as_str()));
        prop_assert_eq!(
            params.get("offset").is_some(),
            offset.is_some_and(|o| o > 0)
        );
    }
}
