//! Data source configuration.
//!
//! Callers configure data sources either as a bare relational model or as a
//! descriptor adding a projection, associations and an alias. Both forms are
//! normalized once, at construction time, into a [`SourceSpec`] which is the
//! only shape the rest of the pipeline deals with.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use search_sync_repository::RelationalModel;
use search_sync_shared::{index_name, Association, AttributeSchema, Projection};

use crate::errors::SyncError;

/// A relational model plus sync directives.
#[derive(Clone)]
pub struct DataSourceDescriptor {
    pub model: Arc<dyn RelationalModel>,
    pub projection: Option<Projection>,
    pub include: Vec<Association>,
    pub alias: Option<String>,
}

impl DataSourceDescriptor {
    pub fn new(model: Arc<dyn RelationalModel>) -> Self {
        Self {
            model,
            projection: None,
            include: Vec::new(),
            alias: None,
        }
    }

    /// Only read the listed fields.
    pub fn including<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(Projection::Include(fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Read every field but the listed ones.
    pub fn excluding<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.projection = Some(Projection::Exclude(fields.into_iter().map(Into::into).collect()));
        self
    }

    /// Embed an associated model in every document.
    pub fn with_association(mut self, association: Association) -> Self {
        self.include.push(association);
        self
    }

    /// Attach an alias to the index when it is created.
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        self.alias = Some(alias.into());
        self
    }
}

/// A configured data source.
#[derive(Clone)]
pub enum DataSource {
    /// Bare model, synced with the global exclusions and no associations.
    Model(Arc<dyn RelationalModel>),
    /// Model with explicit sync directives.
    Descriptor(DataSourceDescriptor),
}

impl From<Arc<dyn RelationalModel>> for DataSource {
    fn from(model: Arc<dyn RelationalModel>) -> Self {
        DataSource::Model(model)
    }
}

impl From<DataSourceDescriptor> for DataSource {
    fn from(descriptor: DataSourceDescriptor) -> Self {
        DataSource::Descriptor(descriptor)
    }
}

/// Normalized data source consumed by the provisioner, extractor and
/// orchestrator.
#[derive(Clone)]
pub struct SourceSpec {
    model: Arc<dyn RelationalModel>,
    name: String,
    index: String,
    attributes: AttributeSchema,
    projection: Option<Projection>,
    include: Vec<Association>,
    alias: Option<String>,
}

impl SourceSpec {
    fn from_descriptor(descriptor: DataSourceDescriptor) -> Result<Self, SyncError> {
        let name = descriptor.model.name().trim().to_string();
        if name.is_empty() {
            return Err(SyncError::config("data source has an empty name"));
        }
        let attributes = descriptor.model.attributes();
        Ok(Self {
            index: index_name(&name),
            name,
            attributes,
            model: descriptor.model,
            projection: descriptor.projection,
            include: descriptor.include,
            alias: descriptor.alias,
        })
    }

    pub fn model(&self) -> &dyn RelationalModel {
        self.model.as_ref()
    }

    /// Logical name of the data source.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name of the index the data source is mirrored into.
    pub fn index(&self) -> &str {
        &self.index
    }

    pub fn attributes(&self) -> &AttributeSchema {
        &self.attributes
    }

    /// The source's own projection, if it has one.
    pub fn projection(&self) -> Option<&Projection> {
        self.projection.as_ref()
    }

    pub fn include(&self) -> &[Association] {
        &self.include
    }

    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref()
    }
}

impl fmt::Debug for SourceSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceSpec")
            .field("name", &self.name)
            .field("index", &self.index)
            .field("attributes", &self.attributes.len())
            .field("projection", &self.projection)
            .field("include", &self.include)
            .field("alias", &self.alias)
            .finish_non_exhaustive()
    }
}

impl TryFrom<DataSource> for SourceSpec {
    type Error = SyncError;

    fn try_from(source: DataSource) -> Result<Self, Self::Error> {
        match source {
            DataSource::Model(model) => Self::from_descriptor(DataSourceDescriptor::new(model)),
            DataSource::Descriptor(descriptor) => Self::from_descriptor(descriptor),
        }
    }
}

/// Normalize configured data sources.
///
/// Two data sources deriving the same index name would write into one index,
/// so this is rejected.
pub fn normalize_sources(sources: Vec<DataSource>) -> Result<Vec<SourceSpec>, SyncError> {
    let mut seen: HashMap<String, String> = HashMap::new();
    let mut specs = Vec::with_capacity(sources.len());

    for source in sources {
        let spec = SourceSpec::try_from(source)?;
        if let Some(previous) = seen.insert(spec.index.clone(), spec.name.clone()) {
            return Err(SyncError::config(format!(
                "data sources {} and {} both map to index {}",
                previous, spec.name, spec.index
            )));
        }
        specs.push(spec);
    }

    Ok(specs)
}
