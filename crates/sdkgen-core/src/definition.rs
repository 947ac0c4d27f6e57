//! Entity definitions and the loader that reads them.
//!
//! A project keeps one YAML document per entity under `models/`,
//! `resources/` and `services/`. The top-level key named after the kind
//! (`model:`, `resource:`, `service:`) holds the entity's name:
//!
//! ```yaml
//! service: auth
//! resources:
//!   users: user
//! actions:
//!   login:
//!     method: post
//!     uri: auth/login
//!     args:
//!       email: data
//!       password: data
//!     return:
//!       type: boolean
//!       value: ret.success
//!     events:
//!       after:
//!         token: accessToken
//! ```
//!
//! Definitions are loaded once per build and never mutated.

use crate::error::{GenError, GenResult};
use indexmap::IndexMap;
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// The three kinds of entity a project declares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Model,
    Resource,
    Service,
}

impl EntityKind {
    pub const ALL: [EntityKind; 3] = [EntityKind::Model, EntityKind::Resource, EntityKind::Service];

    /// Top-level YAML key holding the entity name
    pub fn key(self) -> &'static str {
        match self {
            EntityKind::Model => "model",
            EntityKind::Resource => "resource",
            EntityKind::Service => "service",
        }
    }

    /// Project subdirectory holding this kind's files
    pub fn directory(self) -> &'static str {
        match self {
            EntityKind::Model => "models",
            EntityKind::Resource => "resources",
            EntityKind::Service => "services",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One loaded model, resource or service
#[derive(Debug, Clone, PartialEq)]
pub struct EntityDefinition {
    pub name: String,
    pub kind: EntityKind,
    pub description: Option<String>,
    pub actions: IndexMap<String, ActionDefinition>,
    /// Service only: local id to resource type name
    pub resources: IndexMap<String, String>,
}

/// How an argument feeds the generated request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ArgKind {
    /// `{name}` path segment in the URI
    Param,
    /// The whole request body
    Unique,
    /// One field of the request body
    #[default]
    Data,
    /// The whole query
    #[serde(alias = "query-unique")]
    QueryUnique,
    /// One field of the query
    Query,
}

/// Default value of an argument, emitted as a literal token
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawDefault")]
pub enum DefaultValue {
    Bool(bool),
    Literal(String),
}

impl DefaultValue {
    pub fn literal(&self) -> String {
        match self {
            DefaultValue::Bool(b) => b.to_string(),
            DefaultValue::Literal(s) => s.clone(),
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefault {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
}

impl From<RawDefault> for DefaultValue {
    fn from(raw: RawDefault) -> Self {
        match raw {
            RawDefault::Bool(b) => DefaultValue::Bool(b),
            RawDefault::Int(i) => DefaultValue::Literal(i.to_string()),
            RawDefault::Float(f) => DefaultValue::Literal(f.to_string()),
            RawDefault::Text(s) => DefaultValue::Literal(s),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(from = "RawArg")]
pub struct ArgSpec {
    pub kind: ArgKind,
    pub default: Option<DefaultValue>,
}

impl ArgSpec {
    pub fn new(kind: ArgKind) -> Self {
        Self {
            kind,
            default: None,
        }
    }

    pub fn with_default(mut self, default: DefaultValue) -> Self {
        self.default = Some(default);
        self
    }
}

/// `id: param` or `id: { type: param, default: 1 }`
#[derive(Deserialize)]
#[serde(untagged)]
enum RawArg {
    Kind(ArgKind),
    Full {
        #[serde(rename = "type", default)]
        kind: ArgKind,
        #[serde(default)]
        default: Option<DefaultValue>,
    },
}

impl From<RawArg> for ArgSpec {
    fn from(raw: RawArg) -> Self {
        match raw {
            RawArg::Kind(kind) => ArgSpec::new(kind),
            RawArg::Full { kind, default } => ArgSpec { kind, default },
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnKind {
    #[default]
    Direct,
    Model,
    #[serde(alias = "bool")]
    Boolean,
}

/// Boolean return: a literal or a dotted path into the result
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum BoolExpr {
    Literal(bool),
    Path(String),
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct ReturnSpec {
    #[serde(rename = "type", default)]
    pub kind: ReturnKind,
    #[serde(default)]
    pub resource: Option<String>,
    #[serde(rename = "value", default)]
    pub bool_expr: Option<BoolExpr>,
}

/// Copy `source` from the result into client parameter `target`; with no
/// target, clear `source` instead
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AfterHook {
    pub source: String,
    pub target: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "RawAction")]
pub struct ActionDefinition {
    /// Filled in from the `actions` map key
    pub name: String,
    pub method: String,
    pub uri: String,
    pub description: Option<String>,
    pub args: IndexMap<String, ArgSpec>,
    pub returns: Option<ReturnSpec>,
    pub after_hooks: Vec<AfterHook>,
}

#[derive(Deserialize)]
struct RawAction {
    #[serde(default = "default_method")]
    method: String,
    #[serde(default)]
    uri: String,
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    args: IndexMap<String, Option<ArgSpec>>,
    #[serde(rename = "return", default)]
    returns: Option<ReturnSpec>,
    #[serde(default)]
    events: RawEvents,
}

#[derive(Deserialize, Default)]
struct RawEvents {
    #[serde(default)]
    after: IndexMap<String, Option<String>>,
}

fn default_method() -> String {
    "get".to_string()
}

impl From<RawAction> for ActionDefinition {
    fn from(raw: RawAction) -> Self {
        Self {
            name: String::new(),
            method: raw.method.to_lowercase(),
            uri: raw.uri,
            description: raw.desc,
            args: raw
                .args
                .into_iter()
                .map(|(name, spec)| (name, spec.unwrap_or_default()))
                .collect(),
            returns: raw.returns,
            after_hooks: raw
                .events
                .after
                .into_iter()
                .map(|(source, target)| AfterHook { source, target })
                .collect(),
        }
    }
}

#[derive(Deserialize)]
struct RawEntity {
    #[serde(default)]
    desc: Option<String>,
    #[serde(default)]
    actions: IndexMap<String, ActionDefinition>,
    #[serde(default)]
    resources: IndexMap<String, String>,
}

/// Every entity of a project, keyed by declared name within each kind
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DefinitionSet {
    pub models: IndexMap<String, EntityDefinition>,
    pub resources: IndexMap<String, EntityDefinition>,
    pub services: IndexMap<String, EntityDefinition>,
}

impl DefinitionSet {
    /// Load `models/`, `resources/` and `services/` under `project_dir`
    pub fn load(project_dir: impl AsRef<Path>) -> GenResult<Self> {
        let project_dir = project_dir.as_ref();
        let load = |kind: EntityKind| load_kind(&project_dir.join(kind.directory()), kind);

        Ok(Self {
            models: load(EntityKind::Model)?,
            resources: load(EntityKind::Resource)?,
            services: load(EntityKind::Service)?,
        })
    }

    pub fn of_kind(&self, kind: EntityKind) -> &IndexMap<String, EntityDefinition> {
        match kind {
            EntityKind::Model => &self.models,
            EntityKind::Resource => &self.resources,
            EntityKind::Service => &self.services,
        }
    }

    pub fn len(&self) -> usize {
        self.models.len() + self.resources.len() + self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Load every `*.yml` file in `dir` as an entity of `kind`.
///
/// Files are read in lexical order. A file without the kind's name key is
/// skipped. When two files declare the same name, the later file replaces
/// the earlier one in place.
pub fn load_kind(dir: &Path, kind: EntityKind) -> GenResult<IndexMap<String, EntityDefinition>> {
    let mut entities = IndexMap::new();
    if !dir.is_dir() {
        debug!(dir = %dir.display(), %kind, "definition directory absent");
        return Ok(entities);
    }

    let pattern = format!("{}/*.yml", glob::Pattern::escape(&dir.to_string_lossy()));
    let mut files = glob::glob(&pattern)?
        .map(|entry| {
            entry.map_err(|e| {
                let path = e.path().to_path_buf();
                GenError::io(path, std::io::Error::from(e))
            })
        })
        .collect::<GenResult<Vec<PathBuf>>>()?;
    files.sort();

    for file in files {
        let Some(entity) = load_file(&file, kind)? else {
            warn!(file = %file.display(), key = kind.key(), "skipping definition without name");
            continue;
        };
        if entities.contains_key(&entity.name) {
            warn!(
                file = %file.display(),
                name = %entity.name,
                %kind,
                "duplicate definition replaces earlier file"
            );
        }
        entities.insert(entity.name.clone(), entity);
    }

    Ok(entities)
}

/// Parse one definition file; `None` when it lacks its name key
pub fn load_file(path: &Path, kind: EntityKind) -> GenResult<Option<EntityDefinition>> {
    let text = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    parse_definition(&text, kind).map_err(|source| GenError::DefinitionLoad {
        path: path.to_path_buf(),
        source,
    })
}

/// A non-blank string or a number (`model: 404`) names an entity; any
/// other value leaves the file unnamed
fn entity_name(value: &serde_yaml::Value) -> Option<String> {
    match value {
        serde_yaml::Value::String(name) if !name.trim().is_empty() => Some(name.clone()),
        serde_yaml::Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Parse a definition document of the given kind
pub fn parse_definition(
    text: &str,
    kind: EntityKind,
) -> Result<Option<EntityDefinition>, serde_yaml::Error> {
    let value: serde_yaml::Value = serde_yaml::from_str(text)?;

    let Some(name) = value.get(kind.key()).and_then(entity_name) else {
        return Ok(None);
    };

    let raw: RawEntity = serde_yaml::from_value(value)?;
    let actions = raw
        .actions
        .into_iter()
        .map(|(action_name, mut action)| {
            action.name = action_name.clone();
            (action_name, action)
        })
        .collect();

    Ok(Some(EntityDefinition {
        name,
        kind,
        description: raw.desc,
        actions,
        resources: if kind == EntityKind::Service {
            raw.resources
        } else {
            IndexMap::new()
        },
    }))
}
