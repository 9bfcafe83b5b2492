//! Association table resolver.
//!
//! Every many-to-many relationship names an association model. The first
//! model to declare it fills the left side, the second fills the right side
//! and completes the table. Anything else is an error, reported either
//! immediately (a third side, a table name mismatch) or by [`finish`]
//! (a side that was never reciprocated).
//!
//! [`finish`]: AssociationResolver::finish

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::{CodegenError, Result};
use crate::naming::class_name_to_model_name;
use crate::types::{AssociationSide, AssociationTable, Constraint, Model, Relationship};

/// Resolution state of one association model.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AssociationState {
    #[default]
    Unseen,
    LeftDeclared {
        table_name: String,
        left: AssociationSide,
    },
    Complete(AssociationTable),
}

impl AssociationState {
    /// Applies one declaration and returns the next state.
    fn declare(self, association: &str, table_name: &str, side: AssociationSide) -> Result<Self> {
        match self {
            Self::Unseen => Ok(Self::LeftDeclared {
                table_name: table_name.to_string(),
                left: side,
            }),
            Self::LeftDeclared {
                table_name: expected,
                left,
            } => {
                if expected != table_name {
                    return Err(CodegenError::AssociationTableMismatch {
                        association: association.to_string(),
                        model: side.model,
                        expected,
                        found: table_name.to_string(),
                    });
                }
                let constraints = vec![Constraint::Unique {
                    name: None,
                    columns: vec![left.foreign_key.clone(), side.foreign_key.clone()],
                }];
                Ok(Self::Complete(AssociationTable {
                    name: association.to_string(),
                    table_name: expected,
                    file_name: class_name_to_model_name(association),
                    left,
                    right: side,
                    constraints,
                }))
            }
            Self::Complete(_) => Err(CodegenError::AssociationOverdeclared {
                association: association.to_string(),
                model: side.model,
            }),
        }
    }
}

static UNSEEN: AssociationState = AssociationState::Unseen;

/// Collects many-to-many declarations into association tables.
#[derive(Debug, Default)]
pub struct AssociationResolver {
    states: BTreeMap<String, AssociationState>,
}

impl AssociationResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `relationship` of `model`. Relationships without an
    /// association link are ignored.
    pub fn declare(&mut self, model: &Model, relationship: &Relationship) -> Result<()> {
        let Some(link) = &relationship.association else {
            return Ok(());
        };
        let side = AssociationSide {
            model: model.names.class_name.clone(),
            table: model.names.table_name.clone(),
            foreign_key: link.foreign_key.clone(),
        };
        debug!(
            association = %link.model,
            model = %side.model,
            relationship = %relationship.name,
            "declaring association side"
        );

        let state = self.states.entry(link.model.clone()).or_default();
        *state = std::mem::take(state).declare(&link.model, &link.table, side)?;
        Ok(())
    }

    /// Current state of an association model.
    pub fn state(&self, association: &str) -> &AssociationState {
        self.states.get(association).unwrap_or(&UNSEEN)
    }

    /// Returns the completed tables in name order, or the first association
    /// that only one model declared.
    pub fn finish(self) -> Result<Vec<AssociationTable>> {
        self.states
            .into_iter()
            .filter_map(|(association, state)| match state {
                AssociationState::Unseen => None,
                AssociationState::LeftDeclared { left, .. } => {
                    Some(Err(CodegenError::IncompleteAssociation {
                        association,
                        model: left.model,
                    }))
                }
                AssociationState::Complete(table) => Some(Ok(table)),
            })
            .collect()
    }
}
