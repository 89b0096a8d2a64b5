//! Projection and association directives passed to the relational store.

use serde::{Deserialize, Serialize};

/// Which fields of a relational model are read and surfaced in documents.
///
/// Inclusion and exclusion are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Projection {
    /// Read only the listed fields.
    Include(Vec<String>),
    /// Read every field except the listed ones.
    Exclude(Vec<String>),
}

impl Projection {
    /// Whether a field survives this projection.
    pub fn allows(&self, field: &str) -> bool {
        match self {
            Projection::Include(fields) => fields.iter().any(|f| f == field),
            Projection::Exclude(fields) => !fields.iter().any(|f| f == field),
        }
    }
}

/// A nested data source embedded into each parent document.
///
/// Associations are resolved by the relational store; the documents carry
/// them as nested structures under `alias` (or the model name).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Association {
    /// Logical name of the associated model.
    pub model: String,
    /// Key under which the association is embedded.
    #[serde(default)]
    pub alias: Option<String>,
    #[serde(default)]
    pub projection: Option<Projection>,
    /// Associations of the associated model.
    #[serde(default)]
    pub include: Vec<Association>,
}

impl Association {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            alias: None,
            projection: None,
            include: Vec::new(),
        }
    }

    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }

    pub fn with_projection(mut self, projection: Projection) -> Self {
        self.projection = Some(projection);
        self
    }

    pub fn with_include(mut self, association: Association) -> Self {
        self.include.push(association);
        self
    }

    /// Key the association is embedded under.
    pub fn key(&self) -> &str {
        self.alias.as_deref().unwrap_or(&self.model)
    }
}

/// Parameters of a full read of one relational model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FindOptions {
    pub projection: Option<Projection>,
    pub include: Vec<Association>,
    /// Bypass default scopes (soft-delete filters, tenant scoping, ...).
    pub unscoped: bool,
}
