use serde::{Deserialize, Serialize};

use crate::types::{AssociationTable, Model};

/// Everything one generator run produces.
///
/// Each list is sorted by class name, so serializing or rendering a schema
/// twice gives identical output.
///
/// # Examples
///
/// ```
/// use modelgen_core::Schema;
///
/// let schema = Schema::default();
/// assert_eq!(schema.file_count(), 0);
/// assert!(schema.model("Event").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub mixins: Vec<Model>,
    pub models: Vec<Model>,
    pub association_tables: Vec<AssociationTable>,
}

impl Schema {
    /// Finds a model by class name.
    pub fn model(&self, name: &str) -> Option<&Model> {
        self.models.iter().find(|m| m.name() == name)
    }

    /// Finds a mixin by definition name.
    pub fn mixin(&self, name: &str) -> Option<&Model> {
        self.mixins.iter().find(|m| m.name() == name)
    }

    /// Finds an association table by association model name.
    pub fn association_table(&self, name: &str) -> Option<&AssociationTable> {
        self.association_tables.iter().find(|t| t.name == name)
    }

    /// Number of Python files a render of this schema writes.
    pub fn file_count(&self) -> usize {
        self.mixins.len() + self.models.len() + self.association_tables.len()
    }
}
