//! Generator context: turns definitions into a validated [`Schema`].

use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::association::AssociationResolver;
use crate::column::parse_column;
use crate::definition::{ConstraintDefinition, IndexDefinition, ModelDefinition};
use crate::error::{CodegenError, Result};
use crate::relationship::parse_relationship;
use crate::schema::Schema;
use crate::types::{Column, Constraint, Index, MixinRef, Model, ModelKind, ModelNames, Pattern};
use crate::validate::validate_schema;

/// One generator run.
///
/// Owns every piece of state of the run; [`run`](Self::run) consumes it.
///
/// # Examples
///
/// ```
/// use modelgen_core::*;
///
/// let event = ModelDefinition::new("Event")
///     .with_column(ColumnDefinition::new("name", "string!"))
///     .with_relationship(RelationshipDefinition::new("organizer", "EventOrganizer", Pattern::ManyToOne));
/// let organizer = ModelDefinition::new("EventOrganizer");
///
/// let schema = Generator::new(vec![], vec![event, organizer]).run().unwrap();
/// let event = schema.model("Event").unwrap();
/// assert_eq!(event.columns[0].name, "id");
/// assert!(event.column("organizer_id").unwrap().nullable);
/// ```
#[derive(Debug)]
pub struct Generator {
    mixin_definitions: BTreeMap<String, ModelDefinition>,
    model_definitions: BTreeMap<String, ModelDefinition>,
    generated_mixins: BTreeMap<String, Model>,
    association_tables: AssociationResolver,
}

impl Generator {
    /// Creates a generator. Later definitions replace earlier ones of the
    /// same name.
    pub fn new(mixins: Vec<ModelDefinition>, models: Vec<ModelDefinition>) -> Self {
        Self {
            mixin_definitions: by_name(mixins),
            model_definitions: by_name(models),
            generated_mixins: BTreeMap::new(),
            association_tables: AssociationResolver::new(),
        }
    }

    /// Parses mixins, then models, resolves association tables and
    /// validates the result.
    pub fn run(mut self) -> Result<Schema> {
        let targets: BTreeMap<String, ModelNames> = self
            .model_definitions
            .iter()
            .map(|(name, definition)| (name.clone(), ModelNames::resolve(definition)))
            .collect();

        for (name, definition) in &self.mixin_definitions {
            let mixin = parse_model(definition, ModelKind::Mixin, &targets, &self.generated_mixins)?;
            debug!(mixin = %name, columns = mixin.columns.len(), "parsed mixin");
            self.generated_mixins.insert(name.clone(), mixin);
        }

        let mut models = Vec::with_capacity(self.model_definitions.len());
        for (name, definition) in &self.model_definitions {
            let model = parse_model(definition, ModelKind::Model, &targets, &self.generated_mixins)?;
            debug!(
                model = %name,
                columns = model.columns.len(),
                relationships = model.relationships.len(),
                "parsed model"
            );
            models.push(model);
        }

        for model in &models {
            for relationship in &model.relationships {
                self.association_tables.declare(model, relationship)?;
            }
        }

        let schema = Schema {
            mixins: self.generated_mixins.into_values().collect(),
            models,
            association_tables: self.association_tables.finish()?,
        };

        let errors = validate_schema(&schema);
        if !errors.is_empty() {
            return Err(CodegenError::Invalid(errors));
        }

        info!(
            mixins = schema.mixins.len(),
            models = schema.models.len(),
            association_tables = schema.association_tables.len(),
            "generated schema"
        );
        Ok(schema)
    }
}

fn by_name(definitions: Vec<ModelDefinition>) -> BTreeMap<String, ModelDefinition> {
    definitions
        .into_iter()
        .map(|definition| (definition.name.clone(), definition))
        .collect()
}

fn parse_model(
    definition: &ModelDefinition,
    kind: ModelKind,
    targets: &BTreeMap<String, ModelNames>,
    mixins: &BTreeMap<String, Model>,
) -> Result<Model> {
    let names = ModelNames::resolve(definition);

    let mut enums = Vec::new();
    let mut columns = definition
        .columns
        .iter()
        .map(|column| parse_column(&names, column, &mut enums))
        .collect::<Result<Vec<_>>>()?;

    let mut mixin_refs = Vec::new();
    for mixin_name in &definition.mixins {
        if kind == ModelKind::Mixin {
            warn!(mixin = %names.class_name, nested = %mixin_name, "nested mixins are not supported, skipping");
            continue;
        }
        match mixins.get(mixin_name) {
            Some(mixin) => mixin_refs.push(MixinRef {
                name: mixin_name.clone(),
                class_name: mixin.names.generated_class_name(),
                file_name: mixin.names.file_name.clone(),
            }),
            None => {
                warn!(model = %names.class_name, mixin = %mixin_name, "mixin not found, skipping");
            }
        }
    }

    let inherits_primary_key = mixin_refs
        .iter()
        .filter_map(|r| mixins.get(&r.name))
        .flat_map(|m| &m.columns)
        .any(|c| c.primary_key);
    if kind == ModelKind::Model && !inherits_primary_key && !columns.iter().any(|c| c.primary_key) {
        columns.insert(0, Column::primary_key_id());
    }

    let mut relationships = Vec::with_capacity(definition.relationships.len());
    for relationship in &definition.relationships {
        if kind == ModelKind::Mixin && relationship.pattern == Pattern::ManyToMany {
            return Err(CodegenError::MixinAssociation {
                mixin: names.class_name.clone(),
                relationship: relationship.name.clone(),
            });
        }
        let target = targets
            .get(&relationship.target)
            .ok_or_else(|| CodegenError::UnknownModel {
                model: names.class_name.clone(),
                relationship: relationship.name.clone(),
                target: relationship.target.clone(),
            })?;
        let parsed = parse_relationship(&names, relationship, target)?;
        if let Some(foreign_key) = parsed.foreign_key {
            columns.push(foreign_key);
        }
        relationships.push(parsed.relationship);
    }

    let constraints = definition.constraints.iter().map(constraint).collect();
    let indexes = definition
        .indexes
        .iter()
        .map(|index| table_index(&names.table_name, index))
        .collect();

    Ok(Model {
        kind,
        names,
        columns,
        relationships,
        constraints,
        indexes,
        mixins: mixin_refs,
        enums,
    })
}

fn constraint(definition: &ConstraintDefinition) -> Constraint {
    match definition {
        ConstraintDefinition::Unique { columns, name } => Constraint::Unique {
            name: name.clone(),
            columns: columns.clone(),
        },
        ConstraintDefinition::Check { condition, name } => Constraint::Check {
            name: name.clone(),
            condition: condition.clone(),
        },
    }
}

fn table_index(table_name: &str, definition: &IndexDefinition) -> Index {
    let name = definition
        .name
        .clone()
        .unwrap_or_else(|| format!("ix_{table_name}_{}", definition.columns.join("_")));
    Index {
        name,
        columns: definition.columns.clone(),
        unique: definition.unique,
        using: definition.using.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::{ColumnDefinition, RelationshipDefinition};

    #[test]
    fn test_mixins_never_get_an_implicit_id() {
        let trackable = ModelDefinition::new("Trackable")
            .with_column(ColumnDefinition::new("created_at", "datetime"));
        let schema = Generator::new(vec![trackable], vec![]).run().unwrap();
        let mixin = schema.mixin("Trackable").unwrap();
        assert_eq!(mixin.kind, ModelKind::Mixin);
        assert!(mixin.column("id").is_none());
    }

    #[test]
    fn test_declared_primary_key_suppresses_implicit_id() {
        let mut code = ColumnDefinition::new("code", "string!");
        code.primary_key = true;
        let schema = Generator::new(vec![], vec![ModelDefinition::new("Country").with_column(code)])
            .run()
            .unwrap();
        let country = schema.model("Country").unwrap();
        assert_eq!(country.columns.len(), 1);
        assert_eq!(country.columns[0].name, "code");
    }

    #[test]
    fn test_many_to_many_on_mixin_fails() {
        let taggable = ModelDefinition::new("Taggable").with_relationship(
            RelationshipDefinition::new("tags", "Tag", Pattern::ManyToMany).via("ItemTag", "item_tags"),
        );
        let item = ModelDefinition::new("Item").with_mixin("Taggable");
        let tag = ModelDefinition::new("Tag");

        let err = Generator::new(vec![taggable], vec![item, tag]).run().unwrap_err();
        assert_eq!(
            err,
            CodegenError::MixinAssociation {
                mixin: "Taggable".into(),
                relationship: "tags".into(),
            }
        );
    }

    #[test]
    fn test_many_to_one_on_mixin_is_allowed() {
        let owned = ModelDefinition::new("Owned").with_relationship(RelationshipDefinition::new(
            "owner",
            "User",
            Pattern::ManyToOne,
        ));
        let schema = Generator::new(vec![owned], vec![ModelDefinition::new("User")])
            .run()
            .unwrap();
        assert!(schema.mixin("Owned").unwrap().column("owner_id").is_some());
    }

    #[test]
    fn test_missing_mixin_is_skipped() {
        let event = ModelDefinition::new("Event").with_mixin("Missing");
        let schema = Generator::new(vec![], vec![event]).run().unwrap();
        assert!(schema.model("Event").unwrap().mixins.is_empty());
    }

    #[test]
    fn test_mixin_reference_is_resolved() {
        let trackable = ModelDefinition::new("Trackable");
        let event = ModelDefinition::new("Event").with_mixin("Trackable");
        let schema = Generator::new(vec![trackable], vec![event]).run().unwrap();
        assert_eq!(
            schema.model("Event").unwrap().mixins,
            vec![MixinRef {
                name: "Trackable".into(),
                class_name: "TrackableGeneratedMixin".into(),
                file_name: "trackable".into(),
            }]
        );
    }

    #[test]
    fn test_unknown_target_fails() {
        let event = ModelDefinition::new("Event")
            .with_relationship(RelationshipDefinition::new("place", "Place", Pattern::ManyToOne));
        let err = Generator::new(vec![], vec![event]).run().unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnknownModel {
                model: "Event".into(),
                relationship: "place".into(),
                target: "Place".into(),
            }
        );
    }

    #[test]
    fn test_default_index_name() {
        let index = table_index(
            "event",
            &IndexDefinition {
                name: None,
                columns: vec!["start".into(), "end".into()],
                unique: false,
                using: None,
            },
        );
        assert_eq!(index.name, "ix_event_start_end");
    }

    #[test]
    fn test_validation_failures_are_reported_together() {
        let event = ModelDefinition::new("Event")
            .with_column(ColumnDefinition::new("name", "string"))
            .with_column(ColumnDefinition::new("name", "text"));
        let mut other = ModelDefinition::new("Other");
        other.table_name = Some("event".into());

        match Generator::new(vec![], vec![event, other]).run() {
            Err(CodegenError::Invalid(errors)) => assert_eq!(errors.len(), 2),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }
}
