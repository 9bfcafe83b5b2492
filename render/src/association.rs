//! Association table template.

use modelgen_core::{
    AssociationSide, AssociationTable, Column, ColumnType, ForeignKey, OnDelete, string_literal,
};

use crate::imports::Imports;
use crate::python::{
    assemble, class_definition, column_expression, declared_attr, table_args_expression,
};
use crate::settings::RenderSettings;

/// Columns of an association table: an `id` key and one required foreign
/// key per side, cascading on delete.
pub fn association_columns(table: &AssociationTable) -> Vec<Column> {
    let side_column = |side: &AssociationSide| Column {
        foreign_key: Some(ForeignKey::to_id(&side.table, Some(OnDelete::Cascade))),
        nullable: false,
        ..Column::new(&side.foreign_key, ColumnType::Integer)
    };
    vec![
        Column::primary_key_id(),
        side_column(&table.left),
        side_column(&table.right),
    ]
}

/// Renders the module of an association table.
pub fn render_association_table(table: &AssociationTable, settings: &RenderSettings) -> String {
    let mut imports = Imports::default();
    let mut blocks = vec![declared_attr(
        &mut imports,
        "__tablename__",
        &string_literal(&table.table_name),
    )];

    for column in association_columns(table) {
        let expression = column_expression(&column, &mut imports, settings);
        blocks.push(declared_attr(&mut imports, &column.name, &expression));
    }
    if let Some(table_args) = table_args_expression(&table.constraints, &[], &mut imports) {
        blocks.push(declared_attr(&mut imports, "__table_args__", &table_args));
    }

    let class = class_definition(&table.generated_class_name(), &[], &blocks);
    assemble(&imports, &[class])
}
