//! Python source fragments shared by the model and association templates.

use modelgen_core::{
    Column, Constraint, DefaultExpr, Deferred, ForeignKeys, Index, JoinCondition, Relationship,
    ServerDefault, string_literal,
};

use crate::imports::{Imports, Section};
use crate::settings::RenderSettings;

pub(crate) const HEADER: &str =
    "# Generated by modelgen from the YAML model definitions. Do not edit by hand.";

const INDENT: &str = "    ";

fn py_bool(value: bool) -> &'static str {
    if value { "True" } else { "False" }
}

/// Joins the header, the import block and top-level definitions with the
/// blank lines PEP 8 expects.
pub(crate) fn assemble(imports: &Imports, definitions: &[String]) -> String {
    let mut out = String::from(HEADER);
    out.push('\n');

    let imports = imports.render();
    if !imports.is_empty() {
        out.push('\n');
        out.push_str(&imports);
    }
    for definition in definitions {
        out.push_str("\n\n");
        out.push_str(definition);
    }
    out
}

/// `class {name}({bases}):` followed by the body blocks, one blank line
/// apart. An empty body renders as `pass`.
pub(crate) fn class_definition(name: &str, bases: &[String], blocks: &[String]) -> String {
    let mut out = if bases.is_empty() {
        format!("class {name}:\n")
    } else {
        format!("class {name}({}):\n", bases.join(", "))
    };
    if blocks.is_empty() {
        out.push_str(INDENT);
        out.push_str("pass\n");
    } else {
        out.push_str(&blocks.join("\n"));
    }
    out
}

/// A `@declared_attr` method returning `expression`.
pub(crate) fn declared_attr(imports: &mut Imports, name: &str, expression: &str) -> String {
    imports.orm("declared_attr");
    format!(
        r#"{INDENT}@declared_attr
{INDENT}def {name}(cls):
{INDENT}{INDENT}return {expression}
"#
    )
}

/// A class attribute assignment line.
pub(crate) fn attribute(name: &str, value: &str) -> String {
    format!("{INDENT}{name} = {value}\n")
}

/// The `Column(...)` call of a column, wrapped in `deferred(...)` when the
/// column loads lazily.
pub(crate) fn column_expression(
    column: &Column,
    imports: &mut Imports,
    settings: &RenderSettings,
) -> String {
    let mut types = Vec::new();
    column.column_type.imports(&mut types);
    for import in types {
        imports.type_import(import, settings);
    }
    imports.sqlalchemy("Column");

    let mut args = vec![column.column_type.expression()];
    if let Some(foreign_key) = &column.foreign_key {
        imports.sqlalchemy("ForeignKey");
        let target = string_literal(&foreign_key.target());
        args.push(match foreign_key.ondelete {
            Some(ondelete) => format!(
                "ForeignKey({target}, ondelete={})",
                string_literal(ondelete.as_sql())
            ),
            None => format!("ForeignKey({target})"),
        });
    }
    if column.primary_key {
        args.push("primary_key=True".to_string());
    } else {
        args.push(format!("nullable={}", py_bool(column.nullable)));
    }
    if let Some(default) = &column.default {
        args.push(format!("default={}", default_expression(default, imports)));
    }
    if let Some(server_default) = &column.server_default {
        let value = match server_default {
            ServerDefault::Text(text) => string_literal(text),
            ServerDefault::Now => {
                imports.sqlalchemy("func");
                "func.now()".to_string()
            }
        };
        args.push(format!("server_default={value}"));
    }
    if let Some(onupdate) = &column.onupdate {
        args.push(format!("onupdate={}", default_expression(onupdate, imports)));
    }
    if column.unique {
        args.push("unique=True".to_string());
    }
    if column.index {
        args.push("index=True".to_string());
    }

    let call = format!("Column({})", args.join(", "));
    match &column.deferred {
        Deferred::Eager => call,
        Deferred::Deferred => {
            imports.orm("deferred");
            format!("deferred({call})")
        }
        Deferred::Group(group) => {
            imports.orm("deferred");
            format!("deferred({call}, group={})", string_literal(group))
        }
    }
}

fn default_expression(default: &DefaultExpr, imports: &mut Imports) -> String {
    match default {
        DefaultExpr::Literal(literal) => literal.clone(),
        DefaultExpr::Now => {
            imports.module(Section::Stdlib, "datetime");
            "datetime.datetime.utcnow".to_string()
        }
        DefaultExpr::EnumMember { enum_name, member } => format!("{enum_name}.{member}"),
        DefaultExpr::EmptyList => "list".to_string(),
    }
}

/// The `relationship(...)` call of a relationship.
pub(crate) fn relationship_expression(relationship: &Relationship, imports: &mut Imports) -> String {
    imports.orm("relationship");

    let mut args = vec![string_literal(&relationship.target_model)];
    if let Some(secondary) = relationship.secondary() {
        args.push(format!("secondary={}", string_literal(secondary)));
    }
    if let Some(uselist) = relationship.uselist {
        args.push(format!("uselist={}", py_bool(uselist)));
    }
    if let Some(cascade) = &relationship.cascade {
        args.push(format!("cascade={}", string_literal(cascade)));
    }
    if relationship.single_parent {
        args.push("single_parent=True".to_string());
    }
    if let Some(back_populates) = &relationship.back_populates {
        args.push(format!("back_populates={}", string_literal(back_populates)));
    }
    match &relationship.primaryjoin {
        Some(JoinCondition::Explicit(condition)) => {
            args.push(format!("primaryjoin={}", string_literal(condition)));
        }
        // The owner is read from cls so the condition also works on classes
        // that inherit the relationship from a mixin.
        Some(JoinCondition::ReverseForeignKey {
            target_model,
            foreign_key,
        }) => {
            args.push(format!(
                "primaryjoin=f\"{{cls.__name__}}.id == {target_model}.{foreign_key}\""
            ));
        }
        None => {}
    }
    if let Some(order_by) = &relationship.order_by {
        args.push(format!("order_by={}", string_literal(order_by)));
    }
    match &relationship.foreign_keys {
        Some(ForeignKeys::Explicit(expression)) => {
            args.push(format!("foreign_keys={}", string_literal(expression)));
        }
        Some(ForeignKeys::Column(column)) => args.push(format!("foreign_keys=[cls.{column}]")),
        None => {}
    }
    if let Some(lazy) = &relationship.lazy {
        args.push(format!("lazy={}", string_literal(lazy)));
    }

    format!("relationship({})", args.join(", "))
}

/// The `__table_args__` tuple, or `None` when there is nothing to declare.
pub(crate) fn table_args_expression(
    constraints: &[Constraint],
    indexes: &[Index],
    imports: &mut Imports,
) -> Option<String> {
    let mut entries = Vec::new();

    for constraint in constraints {
        match constraint {
            Constraint::Unique { name, columns } => {
                imports.sqlalchemy("UniqueConstraint");
                let mut args: Vec<String> = columns.iter().map(|c| string_literal(c)).collect();
                if let Some(name) = name {
                    args.push(format!("name={}", string_literal(name)));
                }
                entries.push(format!("UniqueConstraint({})", args.join(", ")));
            }
            Constraint::Check { name, condition } => {
                imports.sqlalchemy("CheckConstraint");
                let mut args = vec![string_literal(condition)];
                if let Some(name) = name {
                    args.push(format!("name={}", string_literal(name)));
                }
                entries.push(format!("CheckConstraint({})", args.join(", ")));
            }
        }
    }

    for index in indexes {
        imports.sqlalchemy("Index");
        let mut args = vec![string_literal(&index.name)];
        args.extend(index.columns.iter().map(|c| string_literal(c)));
        if index.unique {
            args.push("unique=True".to_string());
        }
        if let Some(using) = &index.using {
            args.push(format!("postgresql_using={}", string_literal(using)));
        }
        entries.push(format!("Index({})", args.join(", ")));
    }

    if entries.is_empty() {
        return None;
    }
    let mut tuple = String::from("(\n");
    for entry in entries {
        tuple.push_str(&format!("{INDENT}{INDENT}{INDENT}{entry},\n"));
    }
    tuple.push_str(INDENT);
    tuple.push_str(INDENT);
    tuple.push(')');
    Some(tuple)
}
