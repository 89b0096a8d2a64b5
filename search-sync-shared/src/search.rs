//! Options for sync and search operations, and search result shapes.

use std::collections::HashMap;

use serde_json::{json, Value};

/// Default page offset when none is given.
pub const DEFAULT_FROM: u64 = 0;

/// Default page size when none is given.
pub const DEFAULT_SIZE: u64 = 10;

/// Per-invocation flags for a sync run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncOptions {
    /// Force a refresh of each index after its bulk load so the documents
    /// are visible to searches immediately.
    pub refresh: bool,
}

impl SyncOptions {
    pub fn refreshing() -> Self {
        Self { refresh: true }
    }
}

/// Edit-distance tolerance for fuzzy matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fuzziness {
    /// Let the engine pick the distance from the term length.
    Auto,
    /// Fixed maximum number of edits.
    Edits(u8),
}

impl Fuzziness {
    pub fn to_json(self) -> Value {
        match self {
            Fuzziness::Auto => json!("AUTO"),
            Fuzziness::Edits(n) => json!(n),
        }
    }
}

/// Options of a single search.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchOptions {
    /// Append the fuzzy marker to the query text.
    pub fuzzy: bool,
    /// Forwarded to the engine when `fuzzy` is set.
    pub fuzziness: Option<Fuzziness>,
    pub from: Option<u64>,
    pub size: Option<u64>,
    /// Return the whole engine response instead of just the hits.
    pub whole_response: bool,
}

impl SearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fuzzy(mut self, fuzziness: Fuzziness) -> Self {
        self.fuzzy = true;
        self.fuzziness = Some(fuzziness);
        self
    }

    pub fn paginate(mut self, from: u64, size: u64) -> Self {
        self.from = Some(from);
        self.size = Some(size);
        self
    }

    pub fn whole_response(mut self) -> Self {
        self.whole_response = true;
        self
    }

    pub fn from_or_default(&self) -> u64 {
        self.from.unwrap_or(DEFAULT_FROM)
    }

    pub fn size_or_default(&self) -> u64 {
        self.size.unwrap_or(DEFAULT_SIZE)
    }
}

/// Options of a fan-out search over several indices.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiSearchOptions {
    /// Restrict the search to these indices. Names that do not exist are
    /// dropped. `None` searches every live index.
    pub indices: Option<Vec<String>>,
    /// Options applied to every index without an override.
    pub defaults: SearchOptions,
    /// Per-index options.
    pub overrides: HashMap<String, SearchOptions>,
}

impl MultiSearchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_indices<I, S>(mut self, indices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.indices = Some(indices.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_defaults(mut self, defaults: SearchOptions) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn with_override(mut self, index: impl Into<String>, options: SearchOptions) -> Self {
        self.overrides.insert(index.into(), options);
        self
    }

    /// Effective options for one index.
    pub fn options_for(&self, index: &str) -> &SearchOptions {
        self.overrides.get(index).unwrap_or(&self.defaults)
    }
}

/// Result of a single search, in the shape the caller asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    /// Only the hit array (`hits.hits`).
    Hits(Vec<Value>),
    /// The whole engine response envelope.
    Raw(Value),
}

impl SearchOutcome {
    /// An empty result in the requested shape.
    pub fn empty(whole_response: bool) -> Self {
        if whole_response {
            SearchOutcome::Raw(json!({
                "hits": { "total": { "value": 0, "relation": "eq" }, "hits": [] },
                "aggregations": { "indices": { "buckets": [] } }
            }))
        } else {
            SearchOutcome::Hits(Vec::new())
        }
    }

    /// Shape an engine response.
    pub fn from_response(response: Value, whole_response: bool) -> Self {
        if whole_response {
            return SearchOutcome::Raw(response);
        }
        let hits = response
            .get("hits")
            .and_then(|h| h.get("hits"))
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();
        SearchOutcome::Hits(hits)
    }

    /// The hits, whichever shape was requested.
    pub fn hits(&self) -> Vec<Value> {
        match self {
            SearchOutcome::Hits(hits) => hits.clone(),
            SearchOutcome::Raw(response) => response["hits"]["hits"]
                .as_array()
                .cloned()
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits().is_empty()
    }
}
