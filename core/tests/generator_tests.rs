//! End-to-end generator tests over YAML fixtures.

use modelgen_core::*;

const EVENTS: &str = r#"
models:
  - name: Event
    mixins: [Trackable]
    columns:
      - name: name
        type: string!
      - name: description
        type: text
        deferred: details
      - name: status
        type: enum!
        enum: [scheduled, cancelled, postponed]
        default: scheduled
    relationships:
      - name: organizer
        target: EventOrganizer
      - name: admin_unit
        target: AdminUnit
        relation: parent
      - name: co_organizers
        target: EventOrganizer
        pattern: many-to-many
        association_model: EventCoOrganizer
        association_table: event_coorganizers
        back_populates: co_organized_events
    indexes:
      - columns: [name]
  - name: EventOrganizer
    columns:
      - name: name
        type: string!
    relationships:
      - name: co_organized_events
        target: Event
        pattern: many-to-many
        association_model: EventCoOrganizer
        association_table: event_coorganizers
        back_populates: co_organizers
  - name: AdminUnit
    columns:
      - name: name
        type: string!
    relationships:
      - name: events
        target: Event
        pattern: one-to-many
"#;

const MIXINS: &str = r#"
models:
  - name: Trackable
    columns:
      - name: created_at
        type: datetime!
        default: now
      - name: updated_at
        type: datetime
        onupdate: now
"#;

fn definitions(yaml: &str) -> Vec<ModelDefinition> {
    serde_yaml::from_str::<DefinitionFile>(yaml)
        .expect("fixture must parse")
        .models
}

fn generate() -> Schema {
    Generator::new(definitions(MIXINS), definitions(EVENTS))
        .run()
        .expect("fixture must generate")
}

#[test]
fn test_bang_controls_nullability() {
    let schema = generate();
    let event = schema.model("Event").unwrap();
    assert!(!event.column("name").unwrap().nullable);
    assert!(event.column("description").unwrap().nullable);
}

#[test]
fn test_many_to_one_and_many_to_many_foreign_keys() {
    let schema = generate();
    let event = schema.model("Event").unwrap();

    let organizer_id = event.column("organizer_id").unwrap();
    assert!(organizer_id.nullable);
    let foreign_key = organizer_id.foreign_key.as_ref().unwrap();
    assert_eq!(foreign_key.target(), "eventorganizer.id");
    assert_eq!(foreign_key.ondelete, Some(OnDelete::SetNull));

    let admin_unit_id = event.column("admin_unit_id").unwrap();
    assert!(!admin_unit_id.nullable);
    assert_eq!(
        admin_unit_id.foreign_key.as_ref().unwrap().ondelete,
        Some(OnDelete::Cascade)
    );

    assert!(event.column("co_organizers_id").is_none());
    let organizer = schema.model("EventOrganizer").unwrap();
    assert!(organizer.column("co_organized_events_id").is_none());
    assert_eq!(
        organizer.columns.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        vec!["id", "name"]
    );
}

#[test]
fn test_association_table_is_complete() {
    let schema = generate();
    assert_eq!(schema.association_tables.len(), 1);

    let table = schema.association_table("EventCoOrganizer").unwrap();
    assert_eq!(table.table_name, "event_coorganizers");
    assert_eq!(table.file_name, "event_co_organizer");
    assert_eq!(table.left.model, "Event");
    assert_eq!(table.left.foreign_key, "event_id");
    assert_eq!(table.right.model, "EventOrganizer");
    assert_eq!(table.right.foreign_key, "event_organizer_id");
    assert_eq!(
        table.constraints,
        vec![Constraint::Unique {
            name: None,
            columns: vec!["event_id".into(), "event_organizer_id".into()],
        }]
    );
}

#[test]
fn test_one_sided_association_fails() {
    let mut models = definitions(EVENTS);
    models
        .iter_mut()
        .find(|m| m.name == "EventOrganizer")
        .unwrap()
        .relationships
        .clear();

    let err = Generator::new(definitions(MIXINS), models).run().unwrap_err();
    assert_eq!(
        err,
        CodegenError::IncompleteAssociation {
            association: "EventCoOrganizer".into(),
            model: "Event".into(),
        }
    );
}

#[test]
fn test_enum_and_mixin_resolution() {
    let schema = generate();
    let event = schema.model("Event").unwrap();

    assert_eq!(event.enums.len(), 1);
    assert_eq!(event.enums[0].name, "EventStatus");
    assert_eq!(event.enums[0].ordinal("scheduled"), Some(1));
    assert_eq!(
        event.column("status").unwrap().server_default,
        Some(ServerDefault::Text("1".into()))
    );

    assert_eq!(event.mixins.len(), 1);
    assert_eq!(event.mixins[0].class_name, "TrackableGeneratedMixin");
    assert_eq!(event.indexes[0].name, "ix_event_name");

    let trackable = schema.mixin("Trackable").unwrap();
    let created_at = trackable.column("created_at").unwrap();
    assert_eq!(created_at.default, Some(DefaultExpr::Now));
    assert_eq!(created_at.server_default, Some(ServerDefault::Now));
}

#[test]
fn test_one_to_many_primaryjoin() {
    let schema = generate();
    let events = schema
        .model("AdminUnit")
        .unwrap()
        .relationship("events")
        .unwrap();
    assert_eq!(
        events.primaryjoin,
        Some(JoinCondition::ReverseForeignKey {
            target_model: "Event".into(),
            foreign_key: "admin_unit_id".into(),
        })
    );
}

#[test]
fn test_generation_is_deterministic() {
    let first = serde_json::to_string(&generate()).unwrap();
    let second = serde_json::to_string(&generate()).unwrap();
    assert_eq!(first, second);

    let mut reversed = definitions(EVENTS);
    reversed.reverse();
    let third = serde_json::to_string(
        &Generator::new(definitions(MIXINS), reversed).run().unwrap(),
    )
    .unwrap();
    assert_eq!(first, third);
}
