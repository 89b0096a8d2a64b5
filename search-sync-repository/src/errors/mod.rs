//! Error types for the search sync repository.

mod relational_error;
mod search_error;

pub use relational_error::RelationalError;
pub use search_error::SearchError;
