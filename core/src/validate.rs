//! Schema validation.
//!
//! Runs over the fully resolved [`Schema`] and collects every structural
//! problem instead of stopping at the first one, so a single run reports
//! all mistakes in the YAML.
//!
//! # Examples
//!
//! ```
//! use modelgen_core::*;
//!
//! let schema = Generator::new(
//!     vec![],
//!     vec![ModelDefinition::new("Event").with_column(ColumnDefinition::new("name", "string!"))],
//! )
//! .run()
//! .unwrap();
//! assert!(validate_schema(&schema).is_empty());
//! ```

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::schema::Schema;
use crate::types::Model;

/// Schema validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A model or mixin has an empty or whitespace-only class name.
    #[error("model class name cannot be empty")]
    EmptyClassName,
    /// Two tables share a name.
    #[error("duplicate table '{table}' declared by {first} and {second}")]
    DuplicateTable {
        table: String,
        first: String,
        second: String,
    },
    /// Two columns of one model share a name, generated foreign keys included.
    #[error("duplicate column {model}.{column}")]
    DuplicateColumn { model: String, column: String },
    /// Two relationships of one model share a name.
    #[error("duplicate relationship {model}.{relationship}")]
    DuplicateRelationship { model: String, relationship: String },
    /// A relationship is named like a column of the same model.
    #[error("relationship {model}.{name} shadows a column of the same name")]
    RelationshipShadowsColumn { model: String, name: String },
    /// A constraint names a column the model and its mixins do not declare.
    #[error("constraint on {model} references unknown column '{column}'")]
    UnknownConstraintColumn { model: String, column: String },
    /// An index names a column the model and its mixins do not declare.
    #[error("index {index} on {model} references unknown column '{column}'")]
    UnknownIndexColumn {
        model: String,
        index: String,
        column: String,
    },
}

/// Validates a resolved schema and returns every problem found.
pub fn validate_schema(schema: &Schema) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    for model in schema.mixins.iter().chain(&schema.models) {
        errors.extend(validate_model(schema, model));
    }

    let mut tables: HashMap<&str, &str> = HashMap::new();
    let owners = schema
        .models
        .iter()
        .map(|m| (m.names.table_name.as_str(), m.name()))
        .chain(
            schema
                .association_tables
                .iter()
                .map(|t| (t.table_name.as_str(), t.name.as_str())),
        );
    for (table, owner) in owners {
        if let Some(first) = tables.insert(table, owner) {
            errors.push(ValidationError::DuplicateTable {
                table: table.to_string(),
                first: first.to_string(),
                second: owner.to_string(),
            });
        }
    }

    for table in &schema.association_tables {
        if table.left.foreign_key == table.right.foreign_key {
            errors.push(ValidationError::DuplicateColumn {
                model: table.name.clone(),
                column: table.left.foreign_key.clone(),
            });
        }
    }

    errors
}

fn validate_model(schema: &Schema, model: &Model) -> Vec<ValidationError> {
    let mut errors = Vec::new();
    let name = model.name();

    if name.trim().is_empty() {
        errors.push(ValidationError::EmptyClassName);
        return errors;
    }

    let mut columns = HashSet::new();
    for column in &model.columns {
        if !columns.insert(column.name.as_str()) {
            errors.push(ValidationError::DuplicateColumn {
                model: name.to_string(),
                column: column.name.clone(),
            });
        }
    }

    let mut relationships = HashSet::new();
    for relationship in &model.relationships {
        if !relationships.insert(relationship.name.as_str()) {
            errors.push(ValidationError::DuplicateRelationship {
                model: name.to_string(),
                relationship: relationship.name.clone(),
            });
        }
        if columns.contains(relationship.name.as_str()) {
            errors.push(ValidationError::RelationshipShadowsColumn {
                model: name.to_string(),
                name: relationship.name.clone(),
            });
        }
    }

    let mut known = columns;
    for mixin in model.mixins.iter().filter_map(|r| schema.mixin(&r.name)) {
        known.extend(mixin.columns.iter().map(|c| c.name.as_str()));
    }

    for constraint in &model.constraints {
        for column in constraint.columns() {
            if !known.contains(column.as_str()) {
                errors.push(ValidationError::UnknownConstraintColumn {
                    model: name.to_string(),
                    column: column.clone(),
                });
            }
        }
    }

    for index in &model.indexes {
        for column in &index.columns {
            if !known.contains(column.as_str()) {
                errors.push(ValidationError::UnknownIndexColumn {
                    model: name.to_string(),
                    index: index.name.clone(),
                    column: column.clone(),
                });
            }
        }
    }

    errors
}
