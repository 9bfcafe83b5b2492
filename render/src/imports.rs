//! Import collection for generated modules.
//!
//! Names are grouped into standard library, third-party and project
//! sections. Sections, modules and names are all emitted in sorted order so
//! the import block only changes when the set of used names changes.

use std::collections::{BTreeMap, BTreeSet};

use modelgen_core::{ENUM_TYPE_NAME, TypeImport};

use crate::settings::RenderSettings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Section {
    Stdlib,
    ThirdParty,
    Project,
}

#[derive(Debug, Default)]
pub(crate) struct Imports {
    modules: BTreeMap<Section, BTreeSet<String>>,
    names: BTreeMap<(Section, String), BTreeSet<String>>,
}

impl Imports {
    /// `import {module}`
    pub fn module(&mut self, section: Section, module: &str) {
        self.modules
            .entry(section)
            .or_default()
            .insert(module.to_string());
    }

    /// `from {module} import {name}`
    pub fn name(&mut self, section: Section, module: &str, name: &str) {
        self.names
            .entry((section, module.to_string()))
            .or_default()
            .insert(name.to_string());
    }

    pub fn sqlalchemy(&mut self, name: &str) {
        self.name(Section::ThirdParty, "sqlalchemy", name);
    }

    pub fn orm(&mut self, name: &str) {
        self.name(Section::ThirdParty, "sqlalchemy.orm", name);
    }

    pub fn type_import(&mut self, import: TypeImport, settings: &RenderSettings) {
        match import {
            TypeImport::Sqlalchemy(name) => self.sqlalchemy(name),
            TypeImport::Postgresql(name) => {
                self.name(Section::ThirdParty, "sqlalchemy.dialects.postgresql", name)
            }
            TypeImport::SqlalchemyUtils(name) => {
                self.name(Section::ThirdParty, "sqlalchemy_utils", name)
            }
            TypeImport::Geoalchemy(name) => self.name(Section::ThirdParty, "geoalchemy2", name),
            TypeImport::EnumType => {
                self.name(Section::Project, &settings.enum_type_module, ENUM_TYPE_NAME)
            }
        }
    }

    /// Renders the import block, sections separated by a blank line.
    pub fn render(&self) -> String {
        let mut sections: BTreeMap<Section, Vec<String>> = BTreeMap::new();

        for (section, modules) in &self.modules {
            let lines = sections.entry(*section).or_default();
            lines.extend(modules.iter().map(|module| format!("import {module}")));
        }
        for ((section, module), names) in &self.names {
            let names = names.iter().map(String::as_str).collect::<Vec<_>>().join(", ");
            sections
                .entry(*section)
                .or_default()
                .push(format!("from {module} import {names}"));
        }

        sections
            .into_values()
            .map(|lines| lines.join("\n") + "\n")
            .collect::<Vec<_>>()
            .join("\n")
    }
}
