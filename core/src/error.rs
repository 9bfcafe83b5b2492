//! Error types for model parsing and association resolution.

use thiserror::Error;

use crate::validate::ValidationError;

/// Errors that abort generation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodegenError {
    /// The column's type token is not a known column kind.
    #[error("unknown column type '{type_name}' for {model}.{column}")]
    UnknownColumnType {
        model: String,
        column: String,
        type_name: String,
    },

    /// Arrays of arrays or enums are not supported.
    #[error("unsupported array element type '{type_name}' for {model}.{column}")]
    UnsupportedArrayType {
        model: String,
        column: String,
        type_name: String,
    },

    /// An enum column without values.
    #[error("enum column {model}.{column} declares no values")]
    MissingEnumValues { model: String, column: String },

    /// An enum value that cannot be rendered as an enum member.
    #[error("invalid enum value '{value}' for {model}.{column}: {reason}")]
    InvalidEnumValue {
        model: String,
        column: String,
        value: String,
        reason: String,
    },

    /// A default, server default or onupdate value that does not fit the column.
    #[error("invalid default for {model}.{column}: {reason}")]
    InvalidDefault {
        model: String,
        column: String,
        reason: String,
    },

    /// A relationship names a model that was never declared.
    #[error("relationship {model}.{relationship} references unknown model '{target}'")]
    UnknownModel {
        model: String,
        relationship: String,
        target: String,
    },

    /// A many-to-many relationship without `association_model` or `association_table`.
    #[error(
        "many-to-many relationship {model}.{relationship} requires association_model and association_table"
    )]
    MissingAssociation { model: String, relationship: String },

    /// Mixins are shared by several models, so they cannot own one side of an association.
    #[error("mixin {mixin} declares many-to-many relationship '{relationship}'; declare it on the models")]
    MixinAssociation { mixin: String, relationship: String },

    /// Only one model declared its side of an association.
    #[error("association '{association}' is only declared by {model}; the other model must declare its side")]
    IncompleteAssociation { association: String, model: String },

    /// A third model declared a side of an already complete association.
    #[error("association '{association}' already has two sides; {model} declares a third")]
    AssociationOverdeclared { association: String, model: String },

    /// The two sides of an association disagree on the table name.
    #[error("association '{association}' uses table '{expected}' but {model} names '{found}'")]
    AssociationTableMismatch {
        association: String,
        model: String,
        expected: String,
        found: String,
    },

    /// The parsed schema failed validation.
    #[error("schema validation failed: {}", join_errors(.0))]
    Invalid(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Convenience alias for results with [`CodegenError`].
pub type Result<T> = std::result::Result<T, CodegenError>;
