//! Definition loading from directories of YAML files.
//!
//! ```no_run
//! use modelgen_loader::ProjectDefinitions;
//!
//! let project = ProjectDefinitions::load("codegen/models", "codegen/models/mixins").unwrap();
//! println!(
//!     "{} models, {} mixins",
//!     project.models.len(),
//!     project.mixins.len()
//! );
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use modelgen_core::{DefinitionFile, ModelDefinition};
use tracing::debug;

use crate::error::{LoaderError, Result};

/// Definitions loaded from one directory, keyed by model name.
#[derive(Debug, Clone)]
pub struct DefinitionSet {
    definitions: BTreeMap<String, ModelDefinition>,
    source: PathBuf,
}

impl DefinitionSet {
    /// Loads every `*.yml` and `*.yaml` file of `path`.
    ///
    /// Subdirectories are not searched. Files are read in name order; when two
    /// files define the same model name the later file wins.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::IoError`] if the directory or a file cannot be
    /// read, or [`LoaderError::InvalidDefinitionFile`] naming the first file
    /// that fails to parse.
    pub fn from_dir(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let mut files = Vec::new();
        for entry in std::fs::read_dir(path)? {
            let file_path = entry?.path();
            let is_yaml = matches!(
                file_path.extension().and_then(|e| e.to_str()),
                Some("yml" | "yaml")
            );
            if is_yaml && file_path.is_file() {
                files.push(file_path);
            }
        }
        files.sort();

        let mut definitions = BTreeMap::new();
        for file_path in files {
            let contents = std::fs::read_to_string(&file_path)?;
            let file: DefinitionFile = serde_yaml::from_str(&contents).map_err(|source| {
                LoaderError::InvalidDefinitionFile {
                    path: file_path.clone(),
                    source,
                }
            })?;
            debug!(path = %file_path.display(), models = file.models.len(), "loaded definition file");

            for definition in file.models {
                let name = definition.name.clone();
                if definitions.insert(name.clone(), definition).is_some() {
                    debug!(model = %name, path = %file_path.display(), "definition overridden by later file");
                }
            }
        }

        Ok(Self {
            definitions,
            source: path.to_path_buf(),
        })
    }

    /// An empty set for a directory that does not exist.
    pub fn empty(path: impl AsRef<Path>) -> Self {
        Self {
            definitions: BTreeMap::new(),
            source: path.as_ref().to_path_buf(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&ModelDefinition> {
        self.definitions.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.definitions.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    /// Model names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.definitions.keys().map(String::as_str)
    }

    /// Directory the set was loaded from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Consumes the set, returning definitions in name order.
    pub fn into_definitions(self) -> Vec<ModelDefinition> {
        self.definitions.into_values().collect()
    }
}

/// Model and mixin definitions of one project.
#[derive(Debug, Clone)]
pub struct ProjectDefinitions {
    pub models: DefinitionSet,
    pub mixins: DefinitionSet,
}

impl ProjectDefinitions {
    /// Loads the models directory and the mixins directory.
    ///
    /// A missing mixins directory is treated as empty.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::MissingDirectory`] if `models_dir` does not
    /// exist, and any error of [`DefinitionSet::from_dir`].
    pub fn load(models_dir: impl AsRef<Path>, mixins_dir: impl AsRef<Path>) -> Result<Self> {
        let models_dir = models_dir.as_ref();
        let mixins_dir = mixins_dir.as_ref();

        if !models_dir.is_dir() {
            return Err(LoaderError::MissingDirectory(models_dir.to_path_buf()));
        }
        let models = DefinitionSet::from_dir(models_dir)?;

        let mixins = if mixins_dir.is_dir() {
            DefinitionSet::from_dir(mixins_dir)?
        } else {
            debug!(path = %mixins_dir.display(), "mixins directory not found, no mixins loaded");
            DefinitionSet::empty(mixins_dir)
        };

        Ok(Self { models, mixins })
    }
}
