//! OpenSearch index mappings derived from relational attribute schemas.
//!
//! Every retained attribute becomes one entry of `mappings.properties`.
//! Structured (JSON) and computed (virtual) attributes are never surfaced as
//! searchable fields.

use serde_json::{json, Map, Value};

use search_sync_shared::{AttributeSchema, AttributeType};

/// Field type used for short text attributes.
pub const FULL_TEXT_TYPE: &str = "text";

/// Index field type for one attribute, or `None` if the attribute is dropped.
///
/// Short text maps to the full-text type; every other tag is already the
/// name of an engine field type and passes through unchanged.
pub fn field_type(attribute_type: &AttributeType) -> Option<&'static str> {
    if attribute_type.is_opaque() || attribute_type.is_computed() {
        return None;
    }
    match attribute_type.resolve() {
        AttributeType::String => Some(FULL_TEXT_TYPE),
        other => Some(other.tag()),
    }
}

/// Build the `properties` of an index mapping from an attribute schema.
///
/// A schema with no retained attributes yields an empty map; the index then
/// relies on dynamic mapping.
pub fn field_mappings(schema: &AttributeSchema) -> Map<String, Value> {
    schema
        .iter()
        .filter_map(|(name, attribute_type)| {
            field_type(attribute_type).map(|ty| (name.clone(), json!({ "type": ty })))
        })
        .collect()
}

/// Build the index creation body.
///
/// The optional alias is attached to the new index.
pub fn index_body(properties: Map<String, Value>, alias: Option<&str>) -> Value {
    let mut body = json!({
        "mappings": {
            "properties": properties
        }
    });
    if let Some(alias) = alias {
        body["aliases"] = json!({ alias: {} });
    }
    body
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schema() -> AttributeSchema {
        AttributeSchema::new()
            .with("id", AttributeType::Integer)
            .with("title", AttributeType::String)
            .with("summary", AttributeType::Text)
            .with("published_at", AttributeType::Date)
            .with("metadata", AttributeType::Json)
            .with("display_name", AttributeType::Virtual(Some(Box::new(AttributeType::String))))
            .with("tags", AttributeType::Array(Box::new(AttributeType::Keyword)))
            .with("blobs", AttributeType::Array(Box::new(AttributeType::Json)))
    }

    #[test]
    fn test_opaque_and_computed_are_dropped() {
        let properties = field_mappings(&schema());

        assert!(!properties.contains_key("metadata"));
        assert!(!properties.contains_key("display_name"));
        assert!(!properties.contains_key("blobs"));
        assert_eq!(properties.len(), 5);
    }

    #[test]
    fn test_short_text_maps_to_full_text() {
        let properties = field_mappings(&schema());
        assert_eq!(properties["title"]["type"], "text");
    }

    #[test]
    fn test_other_types_pass_through() {
        let properties = field_mappings(&schema());

        assert_eq!(properties["id"]["type"], "integer");
        assert_eq!(properties["summary"]["type"], "text");
        assert_eq!(properties["published_at"]["type"], "date");
        assert_eq!(properties["tags"]["type"], "keyword");
    }

    #[test]
    fn test_empty_schema_yields_empty_mapping() {
        let properties = field_mappings(&AttributeSchema::new());
        assert!(properties.is_empty());

        let only_dropped = AttributeSchema::new().with("payload", AttributeType::Json);
        assert!(field_mappings(&only_dropped).is_empty());
    }

    #[test]
    fn test_index_body_structure() {
        let body = index_body(field_mappings(&schema()), None);

        assert!(body["mappings"]["properties"].is_object());
        assert_eq!(body["mappings"]["properties"]["title"]["type"], "text");
        assert!(body.get("aliases").is_none());
    }

    #[test]
    fn test_index_body_with_alias() {
        let body = index_body(Map::new(), Some("library"));

        assert!(body["aliases"]["library"].is_object());
        assert_eq!(body["mappings"]["properties"], json!({}));
    }
}
