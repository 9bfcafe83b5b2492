/// Python module paths the generated code refers to.
///
/// # Examples
///
/// ```
/// use modelgen_render::RenderSettings;
///
/// let settings = RenderSettings::new("app.models", "app.dbtypes");
/// assert_eq!(settings.mixin_module("trackable"), "app.models.mixins.trackable_generated");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSettings {
    /// Package of the generated models.
    pub package: String,
    /// Module providing the integer enum column type.
    pub enum_type_module: String,
}

impl RenderSettings {
    pub fn new(package: impl Into<String>, enum_type_module: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            enum_type_module: enum_type_module.into(),
        }
    }

    /// Module of a generated mixin file.
    pub fn mixin_module(&self, file_name: &str) -> String {
        format!("{}.mixins.{file_name}_generated", self.package)
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self::new("project.models", "project.dbtypes")
    }
}
