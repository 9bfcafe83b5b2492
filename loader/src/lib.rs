//! Definition loading and configuration for modelgen.
//!
//! - [`ProjectDefinitions`] reads the models directory and its mixins
//!   directory into [`DefinitionSet`]s.
//! - [`GeneratorConfig`] is the optional `modelgen.yml` file that locates
//!   those directories and configures the output.
//!
//! # Quick start
//!
//! ```no_run
//! use std::path::Path;
//! use modelgen_loader::{GeneratorConfig, ProjectDefinitions};
//!
//! let root = Path::new(".");
//! let config = GeneratorConfig::discover(root).unwrap();
//! let project =
//!     ProjectDefinitions::load(config.models_path(root), config.mixins_path(root)).unwrap();
//! for name in project.models.names() {
//!     println!("{name}");
//! }
//! ```

mod config;
mod error;
mod loader;

pub use config::{CONFIG_FILE_NAME, FormatterConfig, GeneratorConfig};
pub use error::{LoaderError, Result};
pub use loader::{DefinitionSet, ProjectDefinitions};
