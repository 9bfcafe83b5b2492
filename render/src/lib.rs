//! Renders the modelgen intermediate representation into Python modules
//! holding SQLAlchemy declarative mixins.
//!
//! - [`render_model`] and [`render_association_table`] are pure functions
//!   from IR to source text; the same input always renders the same bytes.
//! - [`OutputWriter`] places rendered modules in the output tree.
//! - [`Formatter`] runs an external formatter such as `black` over it.
//!
//! # Example
//!
//! ```
//! use modelgen_core::{ColumnDefinition, Generator, ModelDefinition};
//! use modelgen_render::{RenderSettings, render_schema};
//!
//! let schema = Generator::new(
//!     vec![],
//!     vec![ModelDefinition::new("Event").with_column(ColumnDefinition::new("name", "string!"))],
//! )
//! .run()
//! .unwrap();
//!
//! let files = render_schema(&schema, &RenderSettings::default());
//! assert_eq!(files.len(), 1);
//! assert_eq!(files[0].path.to_str(), Some("models/event_generated.py"));
//! ```

mod association;
mod error;
mod format;
mod imports;
mod model;
mod python;
mod settings;
mod writer;

pub use association::{association_columns, render_association_table};
pub use error::{RenderError, Result};
pub use format::Formatter;
pub use model::render_model;
pub use settings::RenderSettings;
pub use writer::{GeneratedFile, OutputWriter, render_schema};
