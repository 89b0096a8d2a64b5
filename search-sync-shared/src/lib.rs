//! # Search Sync Shared
//!
//! Plain data types shared by the repository, pipeline and facade crates:
//! relational attribute schemas, projections, records, the documents built
//! from them, and the options accepted by the sync and query operations.

pub mod attributes;
pub mod naming;
pub mod projection;
pub mod record;
pub mod search;

pub use attributes::{AttributeSchema, AttributeType};
pub use naming::index_name;
pub use projection::{Association, FindOptions, Projection};
pub use record::{BulkAction, DocumentRecord, Record};
pub use search::{Fuzziness, MultiSearchOptions, SearchOptions, SearchOutcome, SyncOptions};
