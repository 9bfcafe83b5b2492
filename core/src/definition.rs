//! Declarative model definitions as they appear in the YAML files.
//!
//! Every YAML file carries a top-level `models:` list. Entries are
//! deserialized into [`ModelDefinition`] values; the generator turns them
//! into the intermediate representation in [`crate::types`].
//!
//! # Example YAML
//!
//! ```yaml
//! models:
//!   - name: Event
//!     mixins: [Trackable]
//!     columns:
//!       - name: name
//!         type: string!
//!       - name: status
//!         type: enum!
//!         enum: [scheduled, cancelled]
//!         default: scheduled
//!     relationships:
//!       - name: organizer
//!         target: EventOrganizer
//!         pattern: many-to-one
//! ```

use serde::{Deserialize, Serialize};

use crate::types::{Pattern, Relation};

/// Contents of one YAML definition file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefinitionFile {
    /// Model (or mixin) entries in file order.
    #[serde(default)]
    pub models: Vec<ModelDefinition>,
}

/// One model or mixin entry.
///
/// All naming fields are optional; [`ModelNames::resolve`] derives the
/// missing ones from `name`.
///
/// [`ModelNames::resolve`]: crate::ModelNames::resolve
///
/// # Examples
///
/// ```
/// use modelgen_core::{ColumnDefinition, ModelDefinition};
///
/// let event = ModelDefinition::new("Event")
///     .with_column(ColumnDefinition::new("name", "string!"));
/// assert_eq!(event.columns.len(), 1);
/// assert!(event.table_name.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelDefinition {
    /// Class name, e.g. `AdminUnit`.
    pub name: String,
    pub table_name: Option<String>,
    pub file_name: Option<String>,
    pub plural_name: Option<String>,
    pub display_name: Option<String>,
    pub display_name_plural: Option<String>,
    /// Names of mixin definitions this model includes.
    #[serde(default)]
    pub mixins: Vec<String>,
    #[serde(default)]
    pub columns: Vec<ColumnDefinition>,
    #[serde(default)]
    pub relationships: Vec<RelationshipDefinition>,
    #[serde(default)]
    pub constraints: Vec<ConstraintDefinition>,
    #[serde(default)]
    pub indexes: Vec<IndexDefinition>,
}

impl ModelDefinition {
    /// Creates an empty definition with only a class name.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            table_name: None,
            file_name: None,
            plural_name: None,
            display_name: None,
            display_name_plural: None,
            mixins: Vec::new(),
            columns: Vec::new(),
            relationships: Vec::new(),
            constraints: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Adds a column.
    pub fn with_column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Adds a relationship.
    pub fn with_relationship(mut self, relationship: RelationshipDefinition) -> Self {
        self.relationships.push(relationship);
        self
    }

    /// Adds a mixin reference.
    pub fn with_mixin(mut self, mixin: &str) -> Self {
        self.mixins.push(mixin.to_string());
        self
    }
}

/// A YAML column entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnDefinition {
    pub name: String,
    /// Type token such as `string`, `string!` or `enum`. Defaults to `string`.
    #[serde(rename = "type")]
    pub column_type: Option<String>,
    pub length: Option<u32>,
    pub precision: Option<u32>,
    pub scale: Option<u32>,
    pub geometry_type: Option<String>,
    pub array_type: Option<String>,
    /// Enum value names in ordinal order.
    #[serde(rename = "enum")]
    pub enum_values: Option<Vec<String>>,
    pub nullable: Option<bool>,
    pub default: Option<DefaultValue>,
    pub server_default: Option<String>,
    pub onupdate: Option<String>,
    #[serde(default)]
    pub unique: bool,
    #[serde(default)]
    pub index: bool,
    #[serde(default)]
    pub primary_key: bool,
    pub deferred: Option<DeferredSetting>,
}

impl ColumnDefinition {
    /// Creates a column entry with a type token and no other settings.
    pub fn new(name: &str, column_type: &str) -> Self {
        Self {
            name: name.to_string(),
            column_type: Some(column_type.to_string()),
            length: None,
            precision: None,
            scale: None,
            geometry_type: None,
            array_type: None,
            enum_values: None,
            nullable: None,
            default: None,
            server_default: None,
            onupdate: None,
            unique: false,
            index: false,
            primary_key: false,
            deferred: None,
        }
    }

    /// Sets the default value.
    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }

    /// Sets the enum values.
    pub fn with_enum_values(mut self, values: &[&str]) -> Self {
        self.enum_values = Some(values.iter().map(|v| v.to_string()).collect());
        self
    }
}

/// A scalar or list default as written in YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DefaultValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    List(Vec<String>),
}

impl DefaultValue {
    /// Short description used in error messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Bool(b) => format!("boolean {b}"),
            Self::Integer(i) => format!("integer {i}"),
            Self::Float(f) => format!("float {f}"),
            Self::Text(s) => format!("string '{s}'"),
            Self::List(items) => format!("list of {} item(s)", items.len()),
        }
    }
}

/// `deferred: true` or `deferred: <group>`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DeferredSetting {
    Flag(bool),
    Group(String),
}

/// A YAML relationship entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RelationshipDefinition {
    pub name: String,
    /// Class name of the related model.
    pub target: String,
    #[serde(default)]
    pub pattern: Pattern,
    #[serde(default)]
    pub relation: Relation,
    pub nullable: Option<bool>,
    pub back_populates: Option<String>,
    pub primaryjoin: Option<String>,
    pub order_by: Option<String>,
    pub foreign_keys: Option<String>,
    pub lazy: Option<String>,
    pub association_model: Option<String>,
    pub association_table: Option<String>,
    /// This side's foreign key column in the association table.
    pub association_foreign_key: Option<String>,
}

impl RelationshipDefinition {
    /// Creates a `reference` relationship with the given pattern.
    pub fn new(name: &str, target: &str, pattern: Pattern) -> Self {
        Self {
            name: name.to_string(),
            target: target.to_string(),
            pattern,
            relation: Relation::Reference,
            nullable: None,
            back_populates: None,
            primaryjoin: None,
            order_by: None,
            foreign_keys: None,
            lazy: None,
            association_model: None,
            association_table: None,
            association_foreign_key: None,
        }
    }

    /// Sets the ownership classifier.
    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relation = relation;
        self
    }

    /// Sets the association model and table of a many-to-many relationship.
    pub fn via(mut self, association_model: &str, association_table: &str) -> Self {
        self.association_model = Some(association_model.to_string());
        self.association_table = Some(association_table.to_string());
        self
    }

    /// Sets an explicit back reference (`"none"` suppresses it).
    pub fn with_back_populates(mut self, back_populates: &str) -> Self {
        self.back_populates = Some(back_populates.to_string());
        self
    }
}

/// A table-level constraint entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ConstraintDefinition {
    Unique {
        columns: Vec<String>,
        #[serde(default)]
        name: Option<String>,
    },
    Check {
        condition: String,
        #[serde(default)]
        name: Option<String>,
    },
}

/// A table index entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IndexDefinition {
    pub name: Option<String>,
    pub columns: Vec<String>,
    #[serde(default)]
    pub unique: bool,
    /// Index method, emitted as `postgresql_using`.
    pub using: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_model_entry() {
        let yaml = r#"
models:
  - name: AdminUnitVerificationRequest
    table_name: adminunitverificationrequest
    mixins: [Trackable]
    columns:
      - name: review_status
        type: enum!
        enum: [inbox, verified, rejected]
        default: inbox
      - name: rejection_reason
        type: text
        deferred: details
    relationships:
      - name: source_admin_unit
        target: AdminUnit
        relation: parent
    constraints:
      - type: unique
        columns: [source_admin_unit_id, target_admin_unit_id]
    indexes:
      - columns: [review_status]
"#;
        let file: DefinitionFile = serde_yaml::from_str(yaml).unwrap();
        let model = &file.models[0];
        assert_eq!(model.name, "AdminUnitVerificationRequest");
        assert_eq!(model.mixins, vec!["Trackable".to_string()]);
        assert_eq!(
            model.columns[0].default,
            Some(DefaultValue::Text("inbox".to_string()))
        );
        assert_eq!(
            model.columns[1].deferred,
            Some(DeferredSetting::Group("details".to_string()))
        );
        assert_eq!(model.relationships[0].pattern, Pattern::ManyToOne);
        assert_eq!(model.relationships[0].relation, Relation::Parent);
        assert!(matches!(
            model.constraints[0],
            ConstraintDefinition::Unique { ref columns, name: None } if columns.len() == 2
        ));
        assert!(model.indexes[0].name.is_none());
    }

    #[test]
    fn test_default_value_shapes() {
        let values: Vec<DefaultValue> =
            serde_yaml::from_str("[true, 3, 1.5, now, [a, b]]").unwrap();
        assert_eq!(
            values,
            vec![
                DefaultValue::Bool(true),
                DefaultValue::Integer(3),
                DefaultValue::Float(1.5),
                DefaultValue::Text("now".to_string()),
                DefaultValue::List(vec!["a".to_string(), "b".to_string()]),
            ]
        );
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let yaml = "models:\n  - name: Event\n    colums: []\n";
        assert!(serde_yaml::from_str::<DefinitionFile>(yaml).is_err());
    }

    #[test]
    fn test_missing_models_key_is_empty() {
        let file: DefinitionFile = serde_yaml::from_str("{}").unwrap();
        assert!(file.models.is_empty());
    }
}
