use std::path::Path;

use modelgen_core::{DefinitionFile, Generator, ModelDefinition, Schema};
use modelgen_render::{OutputWriter, RenderSettings, render_schema};

const MODELS: &str = r#"
models:
  - name: Event
    columns:
      - name: name
        type: string!
      - name: tags
        type: array
        default: []
      - name: location
        type: geometry
      - name: fulltext_vector
        type: tsvector
        deferred: true
    relationships:
      - name: organizer
        target: EventOrganizer
      - name: co_organizers
        target: EventOrganizer
        pattern: many-to-many
        association_model: EventCoOrganizer
        association_table: event_coorganizers
        back_populates: co_organized_events
    indexes:
      - columns: [fulltext_vector]
        using: gin
  - name: EventOrganizer
    columns:
      - name: color
        type: color
    relationships:
      - name: co_organized_events
        target: Event
        pattern: many-to-many
        association_model: EventCoOrganizer
        association_table: event_coorganizers
        back_populates: co_organizers
"#;

fn definitions(yaml: &str) -> Vec<ModelDefinition> {
    serde_yaml::from_str::<DefinitionFile>(yaml).unwrap().models
}

fn schema() -> Schema {
    Generator::new(vec![], definitions(MODELS)).run().unwrap()
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_rendering_is_idempotent() {
    let settings = RenderSettings::default();
    assert_eq!(render_schema(&schema(), &settings), render_schema(&schema(), &settings));

    let dir = tempfile::tempdir().unwrap();
    let writer = OutputWriter::new(dir.path());
    let first: Vec<String> = writer
        .write_schema(&schema(), &settings)
        .unwrap()
        .iter()
        .map(|p| read(p))
        .collect();
    let second: Vec<String> = writer
        .write_schema(&schema(), &settings)
        .unwrap()
        .iter()
        .map(|p| read(p))
        .collect();
    assert_eq!(first, second);
}

#[test]
fn test_event_module_uses_every_import_source() {
    let files = render_schema(&schema(), &RenderSettings::new("app.models", "app.dbtypes"));
    let event = files
        .iter()
        .find(|f| f.path == Path::new("models/event_generated.py"))
        .unwrap();

    for line in [
        "from geoalchemy2 import Geometry\n",
        "from sqlalchemy import Column, ForeignKey, Index, Integer, Unicode\n",
        "from sqlalchemy.dialects.postgresql import ARRAY, TSVECTOR\n",
        "from sqlalchemy.orm import declared_attr, deferred, relationship\n",
        "return Column(ARRAY(Unicode(255)), nullable=True, default=list)\n",
        "return Column(Geometry(geometry_type=\"POINT\"), nullable=True)\n",
        "return deferred(Column(TSVECTOR(), nullable=True))\n",
        "return relationship(\"EventOrganizer\", secondary=\"event_coorganizers\", back_populates=\"co_organized_events\")\n",
        "Index(\"ix_event_fulltext_vector\", \"fulltext_vector\", postgresql_using=\"gin\"),\n",
    ] {
        assert!(event.contents.contains(line), "missing {line:?} in:\n{}", event.contents);
    }

    let organizer = files
        .iter()
        .find(|f| f.path == Path::new("models/event_organizer_generated.py"))
        .unwrap();
    assert!(organizer.contents.contains("from sqlalchemy_utils import ColorType\n"));
}

#[test]
fn test_association_table_file() {
    let files = render_schema(&schema(), &RenderSettings::default());
    let table = files
        .iter()
        .find(|f| f.path == Path::new("models/association_tables/event_co_organizer_generated.py"))
        .unwrap();
    assert!(table.contents.contains("return \"event_coorganizers\"\n"));
    assert!(table.contents.contains("UniqueConstraint(\"event_id\", \"event_organizer_id\"),\n"));
}
