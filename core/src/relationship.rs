//! Relationship parser.
//!
//! Turns a YAML relationship entry into a [`Relationship`] and, when the
//! foreign key lives on the declaring model, the `{name}_id` column that
//! backs it.

use crate::definition::RelationshipDefinition;
use crate::error::{CodegenError, Result};
use crate::types::{
    AssociationLink, Column, ColumnType, ForeignKey, ForeignKeys, JoinCondition, ModelNames,
    OnDelete, Pattern, Relation, Relationship,
};

const NO_BACK_REFERENCE: &str = "none";
const DELETE_ORPHAN: &str = "all, delete-orphan";

/// Output of [`parse_relationship`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedRelationship {
    pub relationship: Relationship,
    /// Implicit foreign key column to append to the owning model.
    pub foreign_key: Option<Column>,
}

/// Parses one relationship of `owner` pointing at `target`.
pub(crate) fn parse_relationship(
    owner: &ModelNames,
    definition: &RelationshipDefinition,
    target: &ModelNames,
) -> Result<ParsedRelationship> {
    let pattern = definition.pattern;
    let relation = definition.relation;

    let nullable = definition
        .nullable
        .unwrap_or(relation != Relation::Parent);
    let ondelete = if relation == Relation::Parent {
        Some(OnDelete::Cascade)
    } else if nullable {
        Some(OnDelete::SetNull)
    } else {
        None
    };

    let foreign_key = pattern.owns_foreign_key(relation).then(|| Column {
        foreign_key: Some(ForeignKey::to_id(&target.table_name, ondelete)),
        nullable,
        ..Column::new(&format!("{}_id", definition.name), ColumnType::Integer)
    });

    let association = match pattern {
        Pattern::ManyToMany => Some(association_link(owner, definition)?),
        _ => None,
    };

    let back_populates = match definition.back_populates.as_deref() {
        Some(explicit) if explicit.eq_ignore_ascii_case(NO_BACK_REFERENCE) => None,
        Some(explicit) => Some(explicit.to_string()),
        None => Some(match pattern {
            Pattern::ManyToOne | Pattern::ManyToMany => owner.plural_name.clone(),
            Pattern::OneToMany | Pattern::OneToOne => owner.model_name.clone(),
        }),
    };

    let primaryjoin = match &definition.primaryjoin {
        Some(explicit) => Some(JoinCondition::Explicit(explicit.clone())),
        None if pattern == Pattern::OneToMany => {
            let reference = back_populates.as_deref().unwrap_or(&owner.model_name);
            Some(JoinCondition::ReverseForeignKey {
                target_model: target.class_name.clone(),
                foreign_key: format!("{reference}_id"),
            })
        }
        None => None,
    };

    let foreign_keys = match (&definition.foreign_keys, &foreign_key) {
        (Some(explicit), _) => Some(ForeignKeys::Explicit(explicit.clone())),
        (None, Some(column)) => Some(ForeignKeys::Column(column.name.clone())),
        (None, None) => None,
    };

    let owned = relation == Relation::Owned;
    let relationship = Relationship {
        name: definition.name.clone(),
        target_model: target.class_name.clone(),
        pattern,
        relation,
        uselist: (pattern == Pattern::OneToOne).then_some(false),
        cascade: owned.then(|| DELETE_ORPHAN.to_string()),
        single_parent: owned && pattern == Pattern::OneToOne,
        back_populates,
        association,
        primaryjoin,
        order_by: definition.order_by.clone(),
        foreign_keys,
        lazy: definition.lazy.clone(),
    };

    Ok(ParsedRelationship {
        relationship,
        foreign_key,
    })
}

fn association_link(
    owner: &ModelNames,
    definition: &RelationshipDefinition,
) -> Result<AssociationLink> {
    match (&definition.association_model, &definition.association_table) {
        (Some(model), Some(table)) => Ok(AssociationLink {
            model: model.clone(),
            table: table.clone(),
            foreign_key: definition
                .association_foreign_key
                .clone()
                .unwrap_or_else(|| format!("{}_id", owner.model_name)),
        }),
        _ => Err(CodegenError::MissingAssociation {
            model: owner.class_name.clone(),
            relationship: definition.name.clone(),
        }),
    }
}
