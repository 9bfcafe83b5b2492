//! Model and mixin template.
//!
//! A rendered module contains, in order: the generated-file header, the
//! import block, one `IntEnum` class per enum column, and the generated
//! mixin class. Every column and relationship becomes a `@declared_attr`
//! method so the mixin can be combined with any declarative base.

use modelgen_core::{Model, string_literal};

use crate::imports::{Imports, Section};
use crate::python::{
    assemble, attribute, class_definition, column_expression, declared_attr,
    relationship_expression, table_args_expression,
};
use crate::settings::RenderSettings;

/// Renders the module of a model or mixin.
///
/// # Examples
///
/// ```
/// use modelgen_core::{ColumnDefinition, Generator, ModelDefinition};
/// use modelgen_render::{RenderSettings, render_model};
///
/// let schema = Generator::new(
///     vec![],
///     vec![ModelDefinition::new("Event").with_column(ColumnDefinition::new("name", "string!"))],
/// )
/// .run()
/// .unwrap();
/// let source = render_model(schema.model("Event").unwrap(), &RenderSettings::default());
/// assert!(source.contains("class EventGeneratedMixin:\n"));
/// assert!(source.contains("return Column(Unicode(255), nullable=False)\n"));
/// ```
pub fn render_model(model: &Model, settings: &RenderSettings) -> String {
    let mut imports = Imports::default();
    let mut definitions = Vec::new();

    if !model.enums.is_empty() {
        imports.name(Section::Stdlib, "enum", "IntEnum");
    }
    for enum_def in &model.enums {
        let members: String = enum_def
            .values
            .iter()
            .zip(1..)
            .map(|(value, ordinal)| attribute(value, &ordinal.to_string()))
            .collect();
        definitions.push(class_definition(
            &enum_def.name,
            &["IntEnum".to_string()],
            &[members],
        ));
    }

    let mut bases = Vec::with_capacity(model.mixins.len());
    for mixin in &model.mixins {
        imports.name(
            Section::Project,
            &settings.mixin_module(&mixin.file_name),
            &mixin.class_name,
        );
        bases.push(mixin.class_name.clone());
    }

    let mut blocks = Vec::new();
    if model.has_table() {
        let names = &model.names;
        blocks.push(
            [
                attribute("__model_name__", &string_literal(&names.model_name)),
                attribute("__plural_name__", &string_literal(&names.plural_name)),
                attribute("__display_name__", &string_literal(&names.display_name)),
                attribute(
                    "__display_name_plural__",
                    &string_literal(&names.display_name_plural),
                ),
            ]
            .concat(),
        );
        blocks.push(declared_attr(
            &mut imports,
            "__tablename__",
            &string_literal(&names.table_name),
        ));
    }

    for column in &model.columns {
        let expression = column_expression(column, &mut imports, settings);
        blocks.push(declared_attr(&mut imports, &column.name, &expression));
    }
    for relationship in &model.relationships {
        let expression = relationship_expression(relationship, &mut imports);
        blocks.push(declared_attr(&mut imports, &relationship.name, &expression));
    }
    if let Some(table_args) =
        table_args_expression(&model.constraints, &model.indexes, &mut imports)
    {
        blocks.push(declared_attr(&mut imports, "__table_args__", &table_args));
    }

    definitions.push(class_definition(
        &model.names.generated_class_name(),
        &bases,
        &blocks,
    ));

    assemble(&imports, &definitions)
}
