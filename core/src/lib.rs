//! Model definitions, naming rules and the intermediate representation of
//! the modelgen schema compiler.
//!
//! The pipeline inside this crate:
//!
//! - [`ModelDefinition`] and friends mirror the YAML input.
//! - [`Generator`] parses mixins and models into [`Model`] values, derives
//!   foreign key columns from relationships, and resolves many-to-many
//!   association tables.
//! - [`validate_schema`] collects structural problems of the result.
//! - [`Schema`] is the immutable output handed to the renderer.
//!
//! # Example
//!
//! ```
//! use modelgen_core::*;
//!
//! let event = ModelDefinition::new("Event")
//!     .with_column(ColumnDefinition::new("name", "string!"))
//!     .with_relationship(
//!         RelationshipDefinition::new("co_organizers", "EventOrganizer", Pattern::ManyToMany)
//!             .via("EventCoOrganizer", "event_coorganizers"),
//!     );
//! let organizer = ModelDefinition::new("EventOrganizer").with_relationship(
//!     RelationshipDefinition::new("events", "Event", Pattern::ManyToMany)
//!         .via("EventCoOrganizer", "event_coorganizers"),
//! );
//!
//! let schema = Generator::new(vec![], vec![event, organizer]).run().unwrap();
//! assert!(!schema.model("Event").unwrap().column("name").unwrap().nullable);
//! assert_eq!(schema.association_tables.len(), 1);
//! assert_eq!(schema.file_count(), 3);
//! ```

mod association;
mod column;
mod definition;
mod error;
mod generator;
mod naming;
mod relationship;
mod schema;
mod types;
mod validate;

pub use association::{AssociationResolver, AssociationState};
pub use definition::{
    ColumnDefinition, ConstraintDefinition, DefaultValue, DeferredSetting, DefinitionFile,
    IndexDefinition, ModelDefinition, RelationshipDefinition,
};
pub use error::{CodegenError, Result};
pub use generator::Generator;
pub use naming::{class_name_to_model_name, display_name, model_name_to_plural, snake_to_camel};
pub use schema::Schema;
pub use types::*;
pub use validate::{ValidationError, validate_schema};
