//! Index name derivation.

use inflector::string::pluralize::to_plural;

/// Derive the index name for a data source from its logical name.
///
/// The name is lowercased first and then pluralized, so `"Author"` becomes
/// `"authors"` and `"Category"` becomes `"categories"`.
pub fn index_name(logical_name: &str) -> String {
    to_plural(&logical_name.trim().to_lowercase())
}
