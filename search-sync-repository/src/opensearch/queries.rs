//! OpenSearch query builders.
//!
//! This module provides functions to build search and multi-search bodies
//! from query text and search options.

use serde_json::{json, Value};

use search_sync_shared::{MultiSearchOptions, SearchOptions};

/// Marker appended to the query text for fuzzy matching.
pub const FUZZY_MARKER: &str = "~";

/// Name of the aggregation bucketing hits by originating index.
pub const INDEX_AGGREGATION: &str = "indices";

/// Query text as sent to the engine.
pub fn query_text(query: &str, options: &SearchOptions) -> String {
    if options.fuzzy {
        format!("{}{}", query, FUZZY_MARKER)
    } else {
        query.to_string()
    }
}

/// Build the `query_string` clause.
///
/// Fuzziness is only forwarded for fuzzy searches.
pub fn build_query_string(query: &str, options: &SearchOptions) -> Value {
    let mut query_string = json!({ "query": query_text(query, options) });
    if options.fuzzy {
        if let Some(fuzziness) = options.fuzziness {
            query_string["fuzziness"] = fuzziness.to_json();
        }
    }
    json!({ "query_string": query_string })
}

/// Build the body of a single search.
///
/// Includes a terms aggregation on `_index` so callers searching several
/// indices at once can tell where hits came from. Pagination defaults to
/// `from = 0, size = 10`.
pub fn build_search_body(query: &str, options: &SearchOptions) -> Value {
    json!({
        "query": build_query_string(query, options),
        "aggs": {
            INDEX_AGGREGATION: {
                "terms": { "field": "_index" }
            }
        },
        "from": options.from_or_default(),
        "size": options.size_or_default()
    })
}

/// Build the alternating header/body lines of a multi-search, one pair per
/// index, honoring per-index option overrides.
pub fn build_msearch_lines(query: &str, indices: &[String], options: &MultiSearchOptions) -> Vec<Value> {
    let mut lines = Vec::with_capacity(indices.len() * 2);
    for index in indices {
        let index_options = options.options_for(index);
        lines.push(json!({ "index": index }));
        lines.push(json!({
            "query": build_query_string(query, index_options),
            "from": index_options.from_or_default(),
            "size": index_options.size_or_default()
        }));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use search_sync_shared::Fuzziness;

    #[test]
    fn test_search_body_pagination_defaults() {
        let body = build_search_body("x", &SearchOptions::new());

        assert_eq!(body["from"], 0);
        assert_eq!(body["size"], 10);
        assert_eq!(body["query"]["query_string"]["query"], "x");
        assert!(body["query"]["query_string"].get("fuzziness").is_none());
    }

    #[test]
    fn test_search_body_fuzzy() {
        let options = SearchOptions::new().fuzzy(Fuzziness::Auto);
        let body = build_search_body("cat", &options);

        assert_eq!(body["query"]["query_string"]["query"], "cat~");
        assert_eq!(body["query"]["query_string"]["fuzziness"], "AUTO");
    }

    #[test]
    fn test_fuzziness_ignored_without_fuzzy_flag() {
        let options = SearchOptions {
            fuzziness: Some(Fuzziness::Edits(2)),
            ..SearchOptions::default()
        };
        let body = build_search_body("cat", &options);

        assert_eq!(body["query"]["query_string"]["query"], "cat");
        assert!(body["query"]["query_string"].get("fuzziness").is_none());
    }

    #[test]
    fn test_search_body_aggregates_by_index() {
        let body = build_search_body("x", &SearchOptions::new());
        assert_eq!(body["aggs"]["indices"]["terms"]["field"], "_index");
    }

    #[test]
    fn test_msearch_lines_with_override() {
        let indices = vec!["authors".to_string(), "books".to_string()];
        let options = MultiSearchOptions::new()
            .with_defaults(SearchOptions::new().paginate(5, 20))
            .with_override("books", SearchOptions::new().fuzzy(Fuzziness::Edits(1)));

        let lines = build_msearch_lines("tolkien", &indices, &options);

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], json!({ "index": "authors" }));
        assert_eq!(lines[1]["query"]["query_string"]["query"], "tolkien");
        assert_eq!(lines[1]["from"], 5);
        assert_eq!(lines[1]["size"], 20);

        assert_eq!(lines[2], json!({ "index": "books" }));
        assert_eq!(lines[3]["query"]["query_string"]["query"], "tolkien~");
        assert_eq!(lines[3]["query"]["query_string"]["fuzziness"], 1);
        assert_eq!(lines[3]["from"], 0);
        assert_eq!(lines[3]["size"], 10);
    }

    #[test]
    fn test_msearch_lines_empty() {
        let lines = build_msearch_lines("x", &[], &MultiSearchOptions::new());
        assert!(lines.is_empty());
    }
}
