//! Type mapper: turns YAML column entries into [`Column`] values.
//!
//! The `!` suffix on a type token marks the column `NOT NULL`. Defaults are
//! checked against the column type, and non-nullable columns get a
//! server default derived from the driver-level default unless one is given
//! explicitly.

use crate::definition::{ColumnDefinition, DefaultValue, DeferredSetting};
use crate::error::{CodegenError, Result};
use crate::naming::{is_python_identifier, snake_to_camel};
use crate::types::{
    Column, ColumnKind, ColumnType, DefaultExpr, Deferred, EnumDef, ModelNames, ServerDefault,
    string_literal,
};

const DEFAULT_STRING_LENGTH: u32 = 255;
const DEFAULT_GEOMETRY_TYPE: &str = "POINT";
const NOW: &str = "now";

/// Parses one column entry of `owner`.
///
/// Enum columns register their synthesized enum class on `enums`.
pub(crate) fn parse_column(
    owner: &ModelNames,
    definition: &ColumnDefinition,
    enums: &mut Vec<EnumDef>,
) -> Result<Column> {
    let token = definition.column_type.as_deref().unwrap_or("string").trim();
    let (base, required) = match token.strip_suffix('!') {
        Some(base) => (base, true),
        None => (token, false),
    };

    let kind = ColumnKind::from_token(base).ok_or_else(|| CodegenError::UnknownColumnType {
        model: owner.class_name.clone(),
        column: definition.name.clone(),
        type_name: base.to_string(),
    })?;

    let enum_def = match kind {
        ColumnKind::Enum => Some(build_enum(owner, definition)?),
        _ => None,
    };
    let column_type = match (&enum_def, scalar_type(kind, definition)) {
        (Some(def), _) => ColumnType::Enum {
            class_name: def.name.clone(),
        },
        (None, Some(scalar)) => scalar,
        (None, None) => array_type(owner, definition)?,
    };

    let nullable = definition.nullable.unwrap_or(!required);
    let invalid = |reason: String| CodegenError::InvalidDefault {
        model: owner.class_name.clone(),
        column: definition.name.clone(),
        reason,
    };

    let (default, derived_server_default) = match &definition.default {
        Some(value) => {
            let (default, server_default) =
                resolve_default(&column_type, enum_def.as_ref(), value).map_err(invalid)?;
            (Some(default), Some(server_default))
        }
        None => (None, None),
    };

    let server_default = match &definition.server_default {
        Some(explicit) => Some(ServerDefault::Text(explicit.clone())),
        None if !nullable => derived_server_default,
        None => None,
    };

    let onupdate = match definition.onupdate.as_deref() {
        None => None,
        Some(NOW) if column_type.is_temporal() => Some(DefaultExpr::Now),
        Some(other) => {
            return Err(invalid(format!(
                "onupdate '{other}' is not supported; only 'now' on date/datetime columns"
            )));
        }
    };

    let deferred = match &definition.deferred {
        None | Some(DeferredSetting::Flag(false)) => Deferred::Eager,
        Some(DeferredSetting::Flag(true)) => Deferred::Deferred,
        Some(DeferredSetting::Group(group)) => Deferred::Group(group.clone()),
    };

    if let Some(def) = enum_def {
        enums.push(def);
    }

    Ok(Column {
        name: definition.name.clone(),
        column_type,
        deferred,
        foreign_key: None,
        primary_key: definition.primary_key,
        nullable,
        default,
        server_default,
        onupdate,
        unique: definition.unique,
        index: definition.index,
    })
}

/// Builds the type of every kind except arrays and enums.
fn scalar_type(kind: ColumnKind, definition: &ColumnDefinition) -> Option<ColumnType> {
    let column_type = match kind {
        ColumnKind::Integer => ColumnType::Integer,
        ColumnKind::BigInteger => ColumnType::BigInteger,
        ColumnKind::SmallInteger => ColumnType::SmallInteger,
        ColumnKind::Boolean => ColumnType::Boolean,
        ColumnKind::String => ColumnType::String {
            length: definition.length.unwrap_or(DEFAULT_STRING_LENGTH),
        },
        ColumnKind::Text => ColumnType::Text,
        ColumnKind::Float => ColumnType::Float,
        ColumnKind::Numeric => ColumnType::Numeric {
            precision: definition.precision,
            scale: definition.scale,
        },
        ColumnKind::Date => ColumnType::Date,
        ColumnKind::DateTime => ColumnType::DateTime,
        ColumnKind::Time => ColumnType::Time,
        ColumnKind::Interval => ColumnType::Interval,
        ColumnKind::Json => ColumnType::Json,
        ColumnKind::Binary => ColumnType::Binary,
        ColumnKind::Uuid => ColumnType::Uuid,
        ColumnKind::Color => ColumnType::Color,
        ColumnKind::TsVector => ColumnType::TsVector,
        ColumnKind::Geometry => ColumnType::Geometry {
            geometry_type: definition
                .geometry_type
                .clone()
                .unwrap_or_else(|| DEFAULT_GEOMETRY_TYPE.to_string()),
        },
        ColumnKind::Array | ColumnKind::Enum => return None,
    };
    Some(column_type)
}

fn array_type(owner: &ModelNames, definition: &ColumnDefinition) -> Result<ColumnType> {
    let token = definition.array_type.as_deref().unwrap_or("string");
    let unsupported = || CodegenError::UnsupportedArrayType {
        model: owner.class_name.clone(),
        column: definition.name.clone(),
        type_name: token.to_string(),
    };

    let element = match ColumnKind::from_token(token).ok_or_else(unsupported)? {
        // Array elements ignore the column's own length.
        ColumnKind::String => ColumnType::String {
            length: DEFAULT_STRING_LENGTH,
        },
        kind => scalar_type(kind, definition).ok_or_else(unsupported)?,
    };
    Ok(ColumnType::Array(Box::new(element)))
}

fn build_enum(owner: &ModelNames, definition: &ColumnDefinition) -> Result<EnumDef> {
    let values = definition
        .enum_values
        .clone()
        .filter(|values| !values.is_empty())
        .ok_or_else(|| CodegenError::MissingEnumValues {
            model: owner.class_name.clone(),
            column: definition.name.clone(),
        })?;

    for (index, value) in values.iter().enumerate() {
        let reason = if !is_python_identifier(value) {
            "not a Python identifier or a reserved keyword"
        } else if values[..index].contains(value) {
            "declared twice"
        } else {
            continue;
        };
        return Err(CodegenError::InvalidEnumValue {
            model: owner.class_name.clone(),
            column: definition.name.clone(),
            value: value.clone(),
            reason: reason.to_string(),
        });
    }

    Ok(EnumDef {
        name: format!("{}{}", owner.class_name, snake_to_camel(&definition.name)),
        values,
    })
}

/// Resolves a YAML default into the driver default and the server default
/// it implies for non-nullable columns.
fn resolve_default(
    column_type: &ColumnType,
    enum_def: Option<&EnumDef>,
    value: &DefaultValue,
) -> std::result::Result<(DefaultExpr, ServerDefault), String> {
    let resolved = match (column_type, value) {
        (ColumnType::Boolean, DefaultValue::Bool(flag)) => (
            DefaultExpr::Literal(if *flag { "True" } else { "False" }.to_string()),
            ServerDefault::Text(if *flag { "1" } else { "0" }.to_string()),
        ),
        (
            ColumnType::Integer
            | ColumnType::BigInteger
            | ColumnType::SmallInteger
            | ColumnType::Float
            | ColumnType::Numeric { .. },
            DefaultValue::Integer(number),
        ) => (
            DefaultExpr::Literal(number.to_string()),
            ServerDefault::Text(number.to_string()),
        ),
        (ColumnType::Float | ColumnType::Numeric { .. }, DefaultValue::Float(number)) => (
            DefaultExpr::Literal(format!("{number:?}")),
            ServerDefault::Text(format!("{number:?}")),
        ),
        (ColumnType::Enum { class_name }, DefaultValue::Text(member)) => {
            let ordinal = enum_def
                .and_then(|def| def.ordinal(member))
                .ok_or_else(|| format!("'{member}' is not a value of {class_name}"))?;
            (
                DefaultExpr::EnumMember {
                    enum_name: class_name.clone(),
                    member: member.clone(),
                },
                ServerDefault::Text(ordinal.to_string()),
            )
        }
        (ColumnType::Date | ColumnType::DateTime, DefaultValue::Text(text)) if text == NOW => {
            (DefaultExpr::Now, ServerDefault::Now)
        }
        (ColumnType::Array(_), DefaultValue::List(items)) => {
            let default = if items.is_empty() {
                DefaultExpr::EmptyList
            } else {
                let quoted: Vec<String> = items.iter().map(|item| string_literal(item)).collect();
                DefaultExpr::Literal(format!("[{}]", quoted.join(", ")))
            };
            (default, ServerDefault::Text("{}".to_string()))
        }
        (
            ColumnType::String { .. } | ColumnType::Text | ColumnType::Color | ColumnType::Uuid,
            DefaultValue::Text(text),
        ) => (
            DefaultExpr::Literal(string_literal(text)),
            ServerDefault::Text(text.clone()),
        ),
        (column_type, value) => {
            return Err(format!(
                "{} does not fit column type {}",
                value.describe(),
                column_type.expression()
            ));
        }
    };
    Ok(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::ModelDefinition;

    fn owner(name: &str) -> ModelNames {
        ModelNames::resolve(&ModelDefinition::new(name))
    }

    fn parse(definition: &ColumnDefinition) -> Result<Column> {
        parse_column(&owner("Event"), definition, &mut Vec::new())
    }

    #[test]
    fn test_bang_suffix_means_not_null() {
        let required = parse(&ColumnDefinition::new("name", "string!")).unwrap();
        assert!(!required.nullable);
        assert_eq!(required.column_type, ColumnType::String { length: 255 });

        let optional = parse(&ColumnDefinition::new("name", "string")).unwrap();
        assert!(optional.nullable);
    }

    #[test]
    fn test_explicit_nullable_wins() {
        let mut definition = ColumnDefinition::new("name", "string!");
        definition.nullable = Some(true);
        assert!(parse(&definition).unwrap().nullable);
    }

    #[test]
    fn test_missing_type_defaults_to_string() {
        let mut definition = ColumnDefinition::new("name", "string");
        definition.column_type = None;
        definition.length = Some(80);
        let column = parse(&definition).unwrap();
        assert_eq!(column.column_type, ColumnType::String { length: 80 });
    }

    #[test]
    fn test_unknown_type_fails() {
        let err = parse(&ColumnDefinition::new("name", "strnig!")).unwrap_err();
        assert_eq!(
            err,
            CodegenError::UnknownColumnType {
                model: "Event".into(),
                column: "name".into(),
                type_name: "strnig".into(),
            }
        );
    }

    #[test]
    fn test_enum_registers_class_on_model() {
        let mut enums = Vec::new();
        let definition = ColumnDefinition::new("review_status", "enum!")
            .with_enum_values(&["inbox", "verified", "rejected"])
            .with_default(DefaultValue::Text("verified".into()));
        let column = parse_column(
            &owner("AdminUnitVerificationRequest"),
            &definition,
            &mut enums,
        )
        .unwrap();

        assert_eq!(
            column.column_type,
            ColumnType::Enum {
                class_name: "AdminUnitVerificationRequestReviewStatus".into()
            }
        );
        assert_eq!(enums.len(), 1);
        assert_eq!(enums[0].values, vec!["inbox", "verified", "rejected"]);
        assert_eq!(
            column.default,
            Some(DefaultExpr::EnumMember {
                enum_name: "AdminUnitVerificationRequestReviewStatus".into(),
                member: "verified".into(),
            })
        );
        assert_eq!(column.server_default, Some(ServerDefault::Text("2".into())));
    }

    #[test]
    fn test_enum_default_must_be_member() {
        let definition = ColumnDefinition::new("status", "enum")
            .with_enum_values(&["scheduled"])
            .with_default(DefaultValue::Text("postponed".into()));
        assert!(matches!(
            parse(&definition),
            Err(CodegenError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_enum_without_values_fails() {
        let err = parse(&ColumnDefinition::new("status", "enum")).unwrap_err();
        assert!(matches!(err, CodegenError::MissingEnumValues { .. }));
    }

    #[test]
    fn test_enum_values_must_be_identifiers() {
        let cases: [&[&str]; 3] = [&["in-progress"], &["None"], &["scheduled", "2nd"]];
        for values in cases {
            let definition = ColumnDefinition::new("status", "enum").with_enum_values(values);
            let err = parse(&definition).unwrap_err();
            assert!(
                matches!(err, CodegenError::InvalidEnumValue { ref value, .. } if value.as_str() == *values.last().unwrap()),
                "{err}"
            );
        }
    }

    #[test]
    fn test_duplicate_enum_value_fails() {
        let definition =
            ColumnDefinition::new("status", "enum").with_enum_values(&["draft", "draft"]);
        match parse(&definition).unwrap_err() {
            CodegenError::InvalidEnumValue { value, reason, .. } => {
                assert_eq!(value, "draft");
                assert_eq!(reason, "declared twice");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_boolean_server_default_for_non_nullable() {
        let column = parse(
            &ColumnDefinition::new("public", "boolean!").with_default(DefaultValue::Bool(true)),
        )
        .unwrap();
        assert_eq!(column.default, Some(DefaultExpr::Literal("True".into())));
        assert_eq!(column.server_default, Some(ServerDefault::Text("1".into())));
    }

    #[test]
    fn test_nullable_column_has_no_derived_server_default() {
        let column = parse(
            &ColumnDefinition::new("public", "boolean").with_default(DefaultValue::Bool(false)),
        )
        .unwrap();
        assert_eq!(column.default, Some(DefaultExpr::Literal("False".into())));
        assert_eq!(column.server_default, None);
    }

    #[test]
    fn test_explicit_server_default_always_wins() {
        let mut definition =
            ColumnDefinition::new("rating", "integer!").with_default(DefaultValue::Integer(50));
        definition.server_default = Some("10".into());
        let column = parse(&definition).unwrap();
        assert_eq!(column.default, Some(DefaultExpr::Literal("50".into())));
        assert_eq!(column.server_default, Some(ServerDefault::Text("10".into())));

        let mut nullable = ColumnDefinition::new("rating", "integer");
        nullable.server_default = Some("10".into());
        assert_eq!(
            parse(&nullable).unwrap().server_default,
            Some(ServerDefault::Text("10".into()))
        );
    }

    #[test]
    fn test_datetime_now() {
        let mut definition = ColumnDefinition::new("created_at", "datetime!")
            .with_default(DefaultValue::Text("now".into()));
        definition.onupdate = Some("now".into());
        let column = parse(&definition).unwrap();
        assert_eq!(column.default, Some(DefaultExpr::Now));
        assert_eq!(column.server_default, Some(ServerDefault::Now));
        assert_eq!(column.onupdate, Some(DefaultExpr::Now));
    }

    #[test]
    fn test_onupdate_rejected_on_non_temporal() {
        let mut definition = ColumnDefinition::new("name", "string");
        definition.onupdate = Some("now".into());
        assert!(matches!(
            parse(&definition),
            Err(CodegenError::InvalidDefault { .. })
        ));
    }

    #[test]
    fn test_array_defaults_to_string_elements() {
        let column = parse(
            &ColumnDefinition::new("tags", "array!").with_default(DefaultValue::List(vec![])),
        )
        .unwrap();
        assert_eq!(
            column.column_type,
            ColumnType::Array(Box::new(ColumnType::String { length: 255 }))
        );
        assert_eq!(column.default, Some(DefaultExpr::EmptyList));
        assert_eq!(column.server_default, Some(ServerDefault::Text("{}".into())));
    }

    #[test]
    fn test_array_of_enum_is_unsupported() {
        let mut definition = ColumnDefinition::new("tags", "array");
        definition.array_type = Some("enum".into());
        assert!(matches!(
            parse(&definition),
            Err(CodegenError::UnsupportedArrayType { .. })
        ));
    }

    #[test]
    fn test_string_default_is_quoted() {
        let column = parse(
            &ColumnDefinition::new("language", "string!")
                .with_default(DefaultValue::Text("de".into())),
        )
        .unwrap();
        assert_eq!(column.default, Some(DefaultExpr::Literal("\"de\"".into())));
        assert_eq!(column.server_default, Some(ServerDefault::Text("de".into())));
    }

    #[test]
    fn test_mismatched_default_fails() {
        let err = parse(
            &ColumnDefinition::new("count", "integer").with_default(DefaultValue::Text("x".into())),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid default for Event.count: string 'x' does not fit column type Integer()"
        );
    }

    #[test]
    fn test_deferred_settings() {
        let mut definition = ColumnDefinition::new("description", "text");
        definition.deferred = Some(DeferredSetting::Flag(true));
        assert_eq!(parse(&definition).unwrap().deferred, Deferred::Deferred);

        definition.deferred = Some(DeferredSetting::Group("details".into()));
        assert_eq!(
            parse(&definition).unwrap().deferred,
            Deferred::Group("details".into())
        );

        definition.deferred = Some(DeferredSetting::Flag(false));
        assert_eq!(parse(&definition).unwrap().deferred, Deferred::Eager);
    }

    #[test]
    fn test_geometry_and_numeric_parameters() {
        let mut location = ColumnDefinition::new("coordinate", "geometry");
        location.geometry_type = Some("POLYGON".into());
        assert_eq!(
            parse(&location).unwrap().column_type.expression(),
            "Geometry(geometry_type=\"POLYGON\")"
        );

        let mut price = ColumnDefinition::new("price", "numeric");
        price.precision = Some(10);
        price.scale = Some(2);
        assert_eq!(
            parse(&price).unwrap().column_type.expression(),
            "Numeric(precision=10, scale=2)"
        );
    }
}
