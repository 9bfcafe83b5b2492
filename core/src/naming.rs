//! Naming conventions shared by the parser and the renderer.

use std::sync::LazyLock;

use heck::{ToSnakeCase, ToTitleCase, ToUpperCamelCase};
use regex::Regex;

use crate::definition::ModelDefinition;
use crate::types::ModelNames;

static IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static regex must compile"));

const PYTHON_KEYWORDS: &[&str] = &[
    "False", "None", "True", "and", "as", "assert", "async", "await", "break", "class",
    "continue", "def", "del", "elif", "else", "except", "finally", "for", "from", "global",
    "if", "import", "in", "is", "lambda", "nonlocal", "not", "or", "pass", "raise", "return",
    "try", "while", "with", "yield",
];

/// Whether `name` can be used as a Python attribute name.
pub(crate) fn is_python_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name) && !PYTHON_KEYWORDS.contains(&name)
}

/// Converts a CamelCase class name to a snake_case model name.
///
/// Acronyms stay together (`APIKey` becomes `api_key`), and a single
/// leading capital is joined to the following word (`OAuth2Client` becomes
/// `oauth2_client`).
///
/// # Examples
///
/// ```
/// use modelgen_core::class_name_to_model_name;
///
/// assert_eq!(class_name_to_model_name("AdminUnit"), "admin_unit");
/// assert_eq!(class_name_to_model_name("APIKey"), "api_key");
/// ```
pub fn class_name_to_model_name(class_name: &str) -> String {
    let mut result = class_name.to_snake_case();
    if result.as_bytes().get(1) == Some(&b'_') {
        result.remove(1);
    }
    result
}

/// Pluralizes a snake_case model name.
///
/// Names already ending in `s` are returned unchanged, so applying the
/// function twice is the same as applying it once.
///
/// # Examples
///
/// ```
/// use modelgen_core::model_name_to_plural;
///
/// assert_eq!(model_name_to_plural("event"), "events");
/// assert_eq!(model_name_to_plural("category"), "categories");
/// assert_eq!(model_name_to_plural("key"), "keys");
/// assert_eq!(model_name_to_plural("settings"), "settings");
/// ```
pub fn model_name_to_plural(model_name: &str) -> String {
    if model_name.is_empty() || model_name.ends_with('s') {
        return model_name.to_string();
    }
    if let Some(stem) = model_name.strip_suffix('y') {
        if !stem.ends_with(['a', 'e', 'i', 'o', 'u']) {
            return format!("{stem}ies");
        }
    }
    if model_name.ends_with('x') || model_name.ends_with("ch") || model_name.ends_with("sh") {
        return format!("{model_name}es");
    }
    format!("{model_name}s")
}

/// Converts a snake_case name to CamelCase.
///
/// # Examples
///
/// ```
/// use modelgen_core::snake_to_camel;
///
/// assert_eq!(snake_to_camel("review_status"), "ReviewStatus");
/// ```
pub fn snake_to_camel(name: &str) -> String {
    name.to_upper_camel_case()
}

/// Human-readable name: `admin_unit` becomes `Admin unit`.
pub fn display_name(model_name: &str) -> String {
    let title = model_name.to_title_case();
    match title.split_once(' ') {
        Some((first, rest)) => format!("{first} {}", rest.to_lowercase()),
        None => title,
    }
}

impl ModelNames {
    /// Derives every name of a model, honoring explicit YAML overrides.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::{ModelDefinition, ModelNames};
    ///
    /// let names = ModelNames::resolve(&ModelDefinition::new("EventCategory"));
    /// assert_eq!(names.model_name, "event_category");
    /// assert_eq!(names.table_name, "eventcategory");
    /// assert_eq!(names.plural_name, "event_categories");
    /// assert_eq!(names.display_name_plural, "Event categories");
    /// ```
    pub fn resolve(definition: &ModelDefinition) -> Self {
        let class_name = definition.name.clone();
        let model_name = class_name_to_model_name(&class_name);
        let table_name = definition
            .table_name
            .clone()
            .unwrap_or_else(|| class_name.to_lowercase());
        let file_name = definition
            .file_name
            .clone()
            .unwrap_or_else(|| model_name.clone());
        let plural_name = definition
            .plural_name
            .clone()
            .unwrap_or_else(|| model_name_to_plural(&model_name));
        let display = definition
            .display_name
            .clone()
            .unwrap_or_else(|| display_name(&model_name));
        let display_plural = definition
            .display_name_plural
            .clone()
            .unwrap_or_else(|| display_name(&plural_name));

        Self {
            class_name,
            model_name,
            table_name,
            file_name,
            plural_name,
            display_name: display,
            display_name_plural: display_plural,
        }
    }
}
