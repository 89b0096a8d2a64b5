//! Relational model trait definition.

use futures::stream::BoxStream;

use crate::errors::RelationalError;
use search_sync_shared::{AttributeSchema, FindOptions, Record};

/// One relational entity that can be mirrored into a search index.
///
/// The relational store is treated as an opaque provider of rows: the
/// synchronizer only needs the model's name, its declared attribute types and
/// a way to read every row for a projection.
pub trait RelationalModel: Send + Sync {
    /// Logical name of the model (e.g. `"Author"`).
    fn name(&self) -> &str;

    /// Declared attribute types, one entry per column.
    fn attributes(&self) -> AttributeSchema;

    /// Read every row matching the projection, with associations resolved
    /// and embedded as nested values.
    ///
    /// The returned stream is lazy and one-shot; it is drained once per sync.
    fn find_all(&self, options: FindOptions) -> BoxStream<'_, Result<Record, RelationalError>>;
}
