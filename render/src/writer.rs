//! Rendering a whole schema and writing it to the output tree.
//!
//! Layout under the output directory:
//!
//! - `models/{file}_generated.py` for models
//! - `models/mixins/{file}_generated.py` for mixins
//! - `models/association_tables/{file}_generated.py` for association tables
//!
//! [`OutputWriter::write_schema`] removes `*_generated.py` files in those
//! directories that the schema no longer produces. Other files are never
//! touched.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use modelgen_core::Schema;
use tracing::{debug, info};

use crate::association::render_association_table;
use crate::error::{RenderError, Result};
use crate::model::render_model;
use crate::settings::RenderSettings;

const MODELS_DIR: &str = "models";
const MIXINS_DIR: &str = "mixins";
const ASSOCIATION_TABLES_DIR: &str = "association_tables";
const GENERATED_SUFFIX: &str = "_generated.py";

/// One rendered module and its path relative to the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub contents: String,
}

fn generated_path(subdir: &[&str], file_name: &str) -> PathBuf {
    let mut path = PathBuf::from(MODELS_DIR);
    path.extend(subdir);
    path.push(format!("{file_name}{GENERATED_SUFFIX}"));
    path
}

/// Renders every module of `schema`: mixins, then models, then
/// association tables.
pub fn render_schema(schema: &Schema, settings: &RenderSettings) -> Vec<GeneratedFile> {
    let mixins = schema.mixins.iter().map(|mixin| GeneratedFile {
        path: generated_path(&[MIXINS_DIR], &mixin.names.file_name),
        contents: render_model(mixin, settings),
    });
    let models = schema.models.iter().map(|model| GeneratedFile {
        path: generated_path(&[], &model.names.file_name),
        contents: render_model(model, settings),
    });
    let tables = schema.association_tables.iter().map(|table| GeneratedFile {
        path: generated_path(&[ASSOCIATION_TABLES_DIR], &table.file_name),
        contents: render_association_table(table, settings),
    });
    mixins.chain(models).chain(tables).collect()
}

/// Writes generated files below an output directory.
#[derive(Debug, Clone)]
pub struct OutputWriter {
    output_dir: PathBuf,
}

impl OutputWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Directory holding every generated module.
    pub fn models_dir(&self) -> PathBuf {
        self.output_dir.join(MODELS_DIR)
    }

    /// Deletes generated modules that are not among `files` and returns the
    /// deleted paths.
    ///
    /// Only `*_generated.py` files directly inside the generated
    /// directories are considered.
    pub fn remove_stale(&self, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
        let keep: BTreeSet<PathBuf> = files
            .iter()
            .map(|file| self.output_dir.join(&file.path))
            .collect();

        let mut removed = Vec::new();
        let subdirs: [&[&str]; 3] = [&[], &[MIXINS_DIR], &[ASSOCIATION_TABLES_DIR]];
        for subdir in subdirs {
            let mut dir = self.models_dir();
            dir.extend(subdir);
            if !dir.is_dir() {
                continue;
            }
            for entry in std::fs::read_dir(&dir)? {
                let path = entry?.path();
                let generated = path
                    .file_name()
                    .and_then(|name| name.to_str())
                    .is_some_and(|name| name.ends_with(GENERATED_SUFFIX));
                if generated && path.is_file() && !keep.contains(&path) {
                    std::fs::remove_file(&path).map_err(|source| RenderError::WriteFailed {
                        path: path.clone(),
                        source,
                    })?;
                    debug!(path = %path.display(), "removed stale generated file");
                    removed.push(path);
                }
            }
        }
        removed.sort();
        Ok(removed)
    }

    /// Writes `files`, creating directories as needed, and returns the
    /// absolute paths written.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::WriteFailed`] naming the first file that could
    /// not be written. Files written before the failure are left in place.
    pub fn write(&self, files: &[GeneratedFile]) -> Result<Vec<PathBuf>> {
        let mut written = Vec::with_capacity(files.len());
        for file in files {
            let path = self.output_dir.join(&file.path);
            let write_failed = |source| RenderError::WriteFailed {
                path: path.clone(),
                source,
            };
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(write_failed)?;
            }
            std::fs::write(&path, &file.contents).map_err(write_failed)?;
            debug!(path = %path.display(), bytes = file.contents.len(), "wrote generated file");
            written.push(path);
        }
        info!(
            files = written.len(),
            output = %self.output_dir.display(),
            "wrote generated files"
        );
        Ok(written)
    }

    /// Renders and writes a whole schema, removing modules of definitions
    /// that no longer exist.
    pub fn write_schema(&self, schema: &Schema, settings: &RenderSettings) -> Result<Vec<PathBuf>> {
        let files = render_schema(schema, settings);
        let removed = self.remove_stale(&files)?;
        if !removed.is_empty() {
            info!(files = removed.len(), "removed stale generated files");
        }
        self.write(&files)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use modelgen_core::{Generator, ModelDefinition, Pattern, RelationshipDefinition};

    fn schema() -> Schema {
        let trackable = ModelDefinition::new("Trackable");
        let item = ModelDefinition::new("Item").with_mixin("Trackable").with_relationship(
            RelationshipDefinition::new("tags", "Tag", Pattern::ManyToMany).via("ItemTag", "item_tags"),
        );
        let tag = ModelDefinition::new("Tag").with_relationship(
            RelationshipDefinition::new("items", "Item", Pattern::ManyToMany).via("ItemTag", "item_tags"),
        );
        Generator::new(vec![trackable], vec![item, tag]).run().unwrap()
    }

    #[test]
    fn test_render_schema_paths() {
        let files = render_schema(&schema(), &RenderSettings::default());
        let paths: Vec<PathBuf> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("models/mixins/trackable_generated.py"),
                PathBuf::from("models/item_generated.py"),
                PathBuf::from("models/tag_generated.py"),
                PathBuf::from("models/association_tables/item_tag_generated.py"),
            ]
        );
    }

    #[test]
    fn test_write_creates_directories() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path().join("project"));
        let written = writer
            .write_schema(&schema(), &RenderSettings::default())
            .unwrap();

        assert_eq!(written.len(), 4);
        let association = dir
            .path()
            .join("project/models/association_tables/item_tag_generated.py");
        assert!(association.is_file());
        assert!(
            std::fs::read_to_string(association)
                .unwrap()
                .contains("class ItemTagGeneratedMixin:")
        );
    }

    #[test]
    fn test_write_schema_removes_stale_generated_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        let models = writer.models_dir();
        std::fs::create_dir_all(models.join("mixins")).unwrap();
        std::fs::write(models.join("venue_generated.py"), "stale").unwrap();
        std::fs::write(models.join("mixins/old_generated.py"), "stale").unwrap();
        std::fs::write(models.join("venue.py"), "hand written").unwrap();
        std::fs::write(models.join("__init__.py"), "").unwrap();

        writer
            .write_schema(&schema(), &RenderSettings::default())
            .unwrap();

        assert!(!models.join("venue_generated.py").exists());
        assert!(!models.join("mixins/old_generated.py").exists());
        assert!(models.join("venue.py").is_file());
        assert!(models.join("__init__.py").is_file());
        assert!(models.join("item_generated.py").is_file());
    }

    #[test]
    fn test_remove_stale_keeps_current_files() {
        let dir = tempfile::tempdir().unwrap();
        let writer = OutputWriter::new(dir.path());
        let files = render_schema(&schema(), &RenderSettings::default());
        writer.write(&files).unwrap();

        assert!(writer.remove_stale(&files).unwrap().is_empty());
        assert_eq!(writer.remove_stale(&files[..1]).unwrap().len(), 3);
    }
}
