//! Intermediate representation produced by the generator.
//!
//! These types are the renderer's only input. Everything a template needs is
//! computed while parsing, so renderers never re-derive naming or defaults.
//! All types serialize with [`serde`] for `modelgen inspect`.

use serde::{Deserialize, Serialize};

/// Name of the integer-backed enum column wrapper in the target project.
pub const ENUM_TYPE_NAME: &str = "IntegerEnum";

/// Suffix of every generated mixin class name.
pub const GENERATED_CLASS_SUFFIX: &str = "GeneratedMixin";

/// Relationship cardinality classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Pattern {
    #[default]
    ManyToOne,
    OneToMany,
    ManyToMany,
    OneToOne,
}

impl Pattern {
    /// Returns `true` when the foreign key lives on the declaring model.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::{Pattern, Relation};
    ///
    /// assert!(Pattern::ManyToOne.owns_foreign_key(Relation::Reference));
    /// assert!(Pattern::OneToOne.owns_foreign_key(Relation::Owned));
    /// assert!(!Pattern::OneToOne.owns_foreign_key(Relation::Reference));
    /// assert!(!Pattern::ManyToMany.owns_foreign_key(Relation::Owned));
    /// ```
    pub fn owns_foreign_key(self, relation: Relation) -> bool {
        match self {
            Self::ManyToOne => true,
            Self::OneToOne => relation == Relation::Owned,
            Self::OneToMany | Self::ManyToMany => false,
        }
    }
}

/// Relationship ownership classifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Relation {
    /// Weak link.
    #[default]
    Reference,
    /// Required link; deleting the parent deletes this row.
    Parent,
    /// Exclusive child; orphans are deleted.
    Owned,
}

/// Whether a definition describes a table model or a reusable mixin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    Model,
    Mixin,
}

/// All names derived from a model's class name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelNames {
    /// Class name as declared, e.g. `AdminUnit`.
    pub class_name: String,
    /// Snake case name, e.g. `admin_unit`.
    pub model_name: String,
    pub table_name: String,
    pub file_name: String,
    pub plural_name: String,
    pub display_name: String,
    pub display_name_plural: String,
}

impl ModelNames {
    /// Name of the generated mixin class, e.g. `AdminUnitGeneratedMixin`.
    pub fn generated_class_name(&self) -> String {
        generated_class_name(&self.class_name)
    }
}

/// Appends [`GENERATED_CLASS_SUFFIX`] to a class name.
pub fn generated_class_name(class_name: &str) -> String {
    format!("{class_name}{GENERATED_CLASS_SUFFIX}")
}

/// Column type tokens understood in YAML, without parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Integer,
    BigInteger,
    SmallInteger,
    Boolean,
    String,
    Text,
    Float,
    Numeric,
    Date,
    DateTime,
    Time,
    Interval,
    Json,
    Binary,
    Uuid,
    Color,
    TsVector,
    Geometry,
    Array,
    Enum,
}

impl ColumnKind {
    /// Maps a type token (without the `!` suffix) to its kind.
    ///
    /// Returns `None` for unrecognized tokens.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::ColumnKind;
    ///
    /// assert_eq!(ColumnKind::from_token("string"), Some(ColumnKind::String));
    /// assert_eq!(ColumnKind::from_token("int"), Some(ColumnKind::Integer));
    /// assert_eq!(ColumnKind::from_token("strnig"), None);
    /// ```
    pub fn from_token(token: &str) -> Option<Self> {
        let kind = match token {
            "integer" | "int" => Self::Integer,
            "biginteger" => Self::BigInteger,
            "smallinteger" => Self::SmallInteger,
            "boolean" | "bool" => Self::Boolean,
            "string" => Self::String,
            "text" => Self::Text,
            "float" => Self::Float,
            "numeric" | "decimal" => Self::Numeric,
            "date" => Self::Date,
            "datetime" => Self::DateTime,
            "time" => Self::Time,
            "interval" => Self::Interval,
            "json" => Self::Json,
            "binary" => Self::Binary,
            "uuid" => Self::Uuid,
            "color" => Self::Color,
            "tsvector" => Self::TsVector,
            "geometry" => Self::Geometry,
            "array" => Self::Array,
            "enum" => Self::Enum,
            _ => return None,
        };
        Some(kind)
    }
}

/// A resolved column type with its parameters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    BigInteger,
    SmallInteger,
    Boolean,
    String { length: u32 },
    Text,
    Float,
    Numeric { precision: Option<u32>, scale: Option<u32> },
    Date,
    DateTime,
    Time,
    Interval,
    Json,
    Binary,
    Uuid,
    Color,
    TsVector,
    Geometry { geometry_type: String },
    Array(Box<ColumnType>),
    Enum { class_name: String },
}

/// Where a name used by a type expression is imported from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum TypeImport {
    Sqlalchemy(&'static str),
    Postgresql(&'static str),
    SqlalchemyUtils(&'static str),
    Geoalchemy(&'static str),
    /// The project's integer enum wrapper ([`ENUM_TYPE_NAME`]).
    EnumType,
}

impl ColumnType {
    /// Renders the SQLAlchemy type expression.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::ColumnType;
    ///
    /// assert_eq!(ColumnType::String { length: 80 }.expression(), "Unicode(80)");
    /// assert_eq!(
    ///     ColumnType::Array(Box::new(ColumnType::String { length: 255 })).expression(),
    ///     "ARRAY(Unicode(255))"
    /// );
    /// ```
    pub fn expression(&self) -> String {
        match self {
            Self::Integer => "Integer()".to_string(),
            Self::BigInteger => "BigInteger()".to_string(),
            Self::SmallInteger => "SmallInteger()".to_string(),
            Self::Boolean => "Boolean()".to_string(),
            Self::String { length } => format!("Unicode({length})"),
            Self::Text => "UnicodeText()".to_string(),
            Self::Float => "Float()".to_string(),
            Self::Numeric { precision, scale } => {
                let mut params = Vec::new();
                if let Some(precision) = precision {
                    params.push(format!("precision={precision}"));
                }
                if let Some(scale) = scale {
                    params.push(format!("scale={scale}"));
                }
                format!("Numeric({})", params.join(", "))
            }
            Self::Date => "Date()".to_string(),
            Self::DateTime => "DateTime(timezone=True)".to_string(),
            Self::Time => "Time()".to_string(),
            Self::Interval => "Interval()".to_string(),
            Self::Json => "JSONB()".to_string(),
            Self::Binary => "LargeBinary()".to_string(),
            Self::Uuid => "UUID(as_uuid=True)".to_string(),
            Self::Color => "ColorType()".to_string(),
            Self::TsVector => "TSVECTOR()".to_string(),
            Self::Geometry { geometry_type } => {
                format!("Geometry(geometry_type={})", string_literal(geometry_type))
            }
            Self::Array(element) => format!("ARRAY({})", element.expression()),
            Self::Enum { class_name } => format!("{ENUM_TYPE_NAME}({class_name})"),
        }
    }

    /// Collects the imports needed by [`expression`](Self::expression).
    pub fn imports(&self, out: &mut Vec<TypeImport>) {
        let import = match self {
            Self::Integer => TypeImport::Sqlalchemy("Integer"),
            Self::BigInteger => TypeImport::Sqlalchemy("BigInteger"),
            Self::SmallInteger => TypeImport::Sqlalchemy("SmallInteger"),
            Self::Boolean => TypeImport::Sqlalchemy("Boolean"),
            Self::String { .. } => TypeImport::Sqlalchemy("Unicode"),
            Self::Text => TypeImport::Sqlalchemy("UnicodeText"),
            Self::Float => TypeImport::Sqlalchemy("Float"),
            Self::Numeric { .. } => TypeImport::Sqlalchemy("Numeric"),
            Self::Date => TypeImport::Sqlalchemy("Date"),
            Self::DateTime => TypeImport::Sqlalchemy("DateTime"),
            Self::Time => TypeImport::Sqlalchemy("Time"),
            Self::Interval => TypeImport::Sqlalchemy("Interval"),
            Self::Json => TypeImport::Postgresql("JSONB"),
            Self::Binary => TypeImport::Sqlalchemy("LargeBinary"),
            Self::Uuid => TypeImport::Postgresql("UUID"),
            Self::Color => TypeImport::SqlalchemyUtils("ColorType"),
            Self::TsVector => TypeImport::Postgresql("TSVECTOR"),
            Self::Geometry { .. } => TypeImport::Geoalchemy("Geometry"),
            Self::Array(element) => {
                element.imports(out);
                TypeImport::Postgresql("ARRAY")
            }
            Self::Enum { .. } => TypeImport::EnumType,
        };
        out.push(import);
    }

    /// Returns `true` for date and datetime columns.
    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

/// Deferred loading setting of a column.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Deferred {
    #[default]
    Eager,
    Deferred,
    /// Deferred and fetched together with the named group.
    Group(String),
}

impl Deferred {
    pub fn is_deferred(&self) -> bool {
        !matches!(self, Self::Eager)
    }
}

/// `ON DELETE` clause of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OnDelete {
    Cascade,
    SetNull,
}

impl OnDelete {
    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
        }
    }
}

/// Foreign key positional argument of a column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub ondelete: Option<OnDelete>,
}

impl ForeignKey {
    /// References `{table}.id`.
    pub fn to_id(table: &str, ondelete: Option<OnDelete>) -> Self {
        Self {
            table: table.to_string(),
            column: "id".to_string(),
            ondelete,
        }
    }

    /// The `table.column` target string.
    pub fn target(&self) -> String {
        format!("{}.{}", self.table, self.column)
    }
}

/// Driver-level default (`default=` / `onupdate=`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DefaultExpr {
    /// Python literal text, already quoted where needed.
    Literal(String),
    /// Current UTC time.
    Now,
    EnumMember { enum_name: String, member: String },
    EmptyList,
}

/// Schema-level default (`server_default=`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerDefault {
    /// Unquoted SQL default text.
    Text(String),
    /// `func.now()`.
    Now,
}

/// A generated column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    pub name: String,
    pub column_type: ColumnType,
    pub deferred: Deferred,
    pub foreign_key: Option<ForeignKey>,
    pub primary_key: bool,
    pub nullable: bool,
    pub default: Option<DefaultExpr>,
    pub server_default: Option<ServerDefault>,
    pub onupdate: Option<DefaultExpr>,
    pub unique: bool,
    pub index: bool,
}

impl Column {
    /// Creates a nullable column with no extra settings.
    pub fn new(name: &str, column_type: ColumnType) -> Self {
        Self {
            name: name.to_string(),
            column_type,
            deferred: Deferred::Eager,
            foreign_key: None,
            primary_key: false,
            nullable: true,
            default: None,
            server_default: None,
            onupdate: None,
            unique: false,
            index: false,
        }
    }

    /// The implicit `id` integer primary key.
    pub fn primary_key_id() -> Self {
        Self {
            primary_key: true,
            nullable: false,
            ..Self::new("id", ColumnType::Integer)
        }
    }
}

/// How a relationship's `primaryjoin` is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinCondition {
    /// Verbatim expression from YAML.
    Explicit(String),
    /// `{Owner}.id == {target_model}.{foreign_key}`, owner taken from `cls`.
    ReverseForeignKey {
        target_model: String,
        foreign_key: String,
    },
}

/// How a relationship's `foreign_keys` is expressed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ForeignKeys {
    /// Verbatim expression from YAML.
    Explicit(String),
    /// The generated foreign key column on the same class.
    Column(String),
}

/// Association model and table behind a many-to-many relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationLink {
    pub model: String,
    /// Emitted as `secondary=`.
    pub table: String,
    /// The declaring side's foreign key column in the association table.
    pub foreign_key: String,
}

/// A generated relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub name: String,
    pub target_model: String,
    pub pattern: Pattern,
    pub relation: Relation,
    pub uselist: Option<bool>,
    pub cascade: Option<String>,
    pub single_parent: bool,
    pub back_populates: Option<String>,
    pub association: Option<AssociationLink>,
    pub primaryjoin: Option<JoinCondition>,
    pub order_by: Option<String>,
    pub foreign_keys: Option<ForeignKeys>,
    pub lazy: Option<String>,
}

impl Relationship {
    /// Table name passed as `secondary=`.
    pub fn secondary(&self) -> Option<&str> {
        self.association.as_ref().map(|a| a.table.as_str())
    }
}

/// A table-level constraint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Constraint {
    Unique {
        name: Option<String>,
        columns: Vec<String>,
    },
    Check {
        name: Option<String>,
        condition: String,
    },
}

impl Constraint {
    /// Columns the constraint refers to by name.
    pub fn columns(&self) -> &[String] {
        match self {
            Self::Unique { columns, .. } => columns,
            Self::Check { .. } => &[],
        }
    }
}

/// A table index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    pub name: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub using: Option<String>,
}

/// A synthesized enum class and its ordered values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumDef {
    pub name: String,
    pub values: Vec<String>,
}

impl EnumDef {
    /// 1-based ordinal of a value.
    ///
    /// # Examples
    ///
    /// ```
    /// use modelgen_core::EnumDef;
    ///
    /// let status = EnumDef {
    ///     name: "EventStatus".into(),
    ///     values: vec!["scheduled".into(), "cancelled".into()],
    /// };
    /// assert_eq!(status.ordinal("cancelled"), Some(2));
    /// assert_eq!(status.ordinal("postponed"), None);
    /// ```
    pub fn ordinal(&self, value: &str) -> Option<usize> {
        self.values.iter().position(|v| v == value).map(|i| i + 1)
    }
}

/// A mixin included by a model, resolved to its generated class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixinRef {
    /// Mixin definition name.
    pub name: String,
    pub class_name: String,
    pub file_name: String,
}

/// A parsed model or mixin.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    pub kind: ModelKind,
    pub names: ModelNames,
    pub columns: Vec<Column>,
    pub relationships: Vec<Relationship>,
    pub constraints: Vec<Constraint>,
    pub indexes: Vec<Index>,
    pub mixins: Vec<MixinRef>,
    pub enums: Vec<EnumDef>,
}

impl Model {
    /// Class name as declared.
    pub fn name(&self) -> &str {
        &self.names.class_name
    }

    /// Finds a column by name.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Finds a relationship by name.
    pub fn relationship(&self, name: &str) -> Option<&Relationship> {
        self.relationships.iter().find(|r| r.name == name)
    }

    /// Returns `true` when the model carries its own table.
    pub fn has_table(&self) -> bool {
        self.kind == ModelKind::Model
    }
}

/// One side of an association table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationSide {
    /// Class name of the participating model.
    pub model: String,
    /// Table the foreign key points to.
    pub table: String,
    /// Foreign key column in the association table.
    pub foreign_key: String,
}

/// A synthesized many-to-many join table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssociationTable {
    /// Association model class name.
    pub name: String,
    pub table_name: String,
    pub file_name: String,
    pub left: AssociationSide,
    pub right: AssociationSide,
    pub constraints: Vec<Constraint>,
}

impl AssociationTable {
    /// Name of the generated mixin class.
    pub fn generated_class_name(&self) -> String {
        generated_class_name(&self.name)
    }
}

/// Quotes a string as a double-quoted Python literal.
///
/// # Examples
///
/// ```
/// use modelgen_core::string_literal;
///
/// assert_eq!(string_literal("POINT"), "\"POINT\"");
/// assert_eq!(string_literal("say \"hi\""), "\"say \\\"hi\\\"\"");
/// ```
pub fn string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for ch in value.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}
