//! Generator configuration.
//!
//! Every key is optional; missing keys fall back to the defaults below.
//!
//! # Example YAML
//!
//! ```yaml
//! models_dir: codegen/models
//! mixins_dir: codegen/models/mixins
//! output_dir: project
//! package: project.models
//! enum_type_module: project.dbtypes
//! formatter:
//!   enabled: true
//!   command: black
//!   args: ["--quiet"]
//!   timeout_secs: 120
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// File name looked up in the project root when no config path is given.
pub const CONFIG_FILE_NAME: &str = "modelgen.yml";

/// External formatter run over the output tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FormatterConfig {
    pub enabled: bool,
    /// Executable name or path.
    pub command: String,
    /// Arguments placed before the output directory.
    pub args: Vec<String>,
    /// The formatter is killed after this many seconds.
    pub timeout_secs: u64,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            command: "black".to_string(),
            args: Vec::new(),
            timeout_secs: 120,
        }
    }
}

/// Top-level generator configuration.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use modelgen_loader::GeneratorConfig;
///
/// let config = GeneratorConfig::default();
/// let root = Path::new("/srv/app");
/// assert_eq!(config.models_path(root), Path::new("/srv/app/codegen/models"));
/// assert_eq!(config.mixins_path(root), Path::new("/srv/app/codegen/models/mixins"));
/// assert_eq!(config.output_path(root), Path::new("/srv/app/project"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GeneratorConfig {
    pub models_dir: PathBuf,
    /// Defaults to `{models_dir}/mixins`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mixins_dir: Option<PathBuf>,
    /// Generated files go to `{output_dir}/models`.
    pub output_dir: PathBuf,
    /// Python package of the generated models, used for mixin imports.
    pub package: String,
    /// Python module that provides the integer enum column type.
    pub enum_type_module: String,
    pub formatter: FormatterConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            models_dir: PathBuf::from("codegen/models"),
            mixins_dir: None,
            output_dir: PathBuf::from("project"),
            package: "project.models".to_string(),
            enum_type_module: "project.dbtypes".to_string(),
            formatter: FormatterConfig::default(),
        }
    }
}

impl GeneratorConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::LoaderError::IoError) if the file cannot
    /// be read, or [`YamlError`](crate::LoaderError::YamlError) if parsing
    /// fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let config = serde_yaml::from_reader(reader)?;
        Ok(config)
    }

    /// Loads `{root}/modelgen.yml` if it exists, otherwise the defaults.
    pub fn discover(root: impl AsRef<Path>) -> Result<Self> {
        let path = root.as_ref().join(CONFIG_FILE_NAME);
        if path.is_file() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    pub fn models_path(&self, root: &Path) -> PathBuf {
        root.join(&self.models_dir)
    }

    pub fn mixins_path(&self, root: &Path) -> PathBuf {
        match &self.mixins_dir {
            Some(dir) => root.join(dir),
            None => self.models_path(root).join("mixins"),
        }
    }

    pub fn output_path(&self, root: &Path) -> PathBuf {
        root.join(&self.output_dir)
    }
}
