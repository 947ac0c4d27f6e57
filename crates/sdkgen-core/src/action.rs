//! Action compilation.
//!
//! Turns one [`ActionDefinition`] into the code fragments an `Action` stub
//! consumes. Each argument feeds exactly one fragment, chosen by its
//! [`ArgKind`]:
//!
//! | kind | fragment |
//! |------|----------|
//! | `param` | `{name}` in the URI becomes an interpolation |
//! | `unique` | the whole body is this variable |
//! | `data` | one entry of the body literal |
//! | `query_unique` | the whole query is this variable |
//! | `query` | one entry of the query literal |
//!
//! Every argument also appears in the generated parameter list.
//!
//! A `unique` argument replaces the body literal outright: any `data`
//! arguments declared beside it stay in the parameter list but are not
//! sent. The first `unique` in declaration order is the one used. The same
//! policy applies to `query_unique` over `query`.

use crate::definition::{ActionDefinition, ArgKind, BoolExpr, ReturnKind};
use crate::error::{GenError, GenResult};
use crate::naming::{model_alias, to_camel_case, to_pascal_case};
use crate::stub::{StubParams, StubRenderer, names};
use crate::syntax::{BackendSyntax, ObjectLiteral};
use tracing::debug;

/// Leading segment stripped from boolean return paths
const RESULT_PREFIX: &str = "ret.";

/// Fragments generated for one action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompiledAction {
    /// Method identifier in the generated class
    pub name: String,
    pub description: String,
    /// Lower-case HTTP verb, also the client helper to call
    pub http_method: String,
    pub args: String,
    pub uri: String,
    pub body: String,
    /// Empty, or a separator followed by the query expression
    pub query: String,
    pub returns: String,
    pub events: String,
}

impl CompiledAction {
    /// Placeholder values for the `Action` stub
    pub fn params(&self) -> StubParams {
        StubParams::new()
            .with("name", self.name.as_str())
            .with("description", self.description.as_str())
            .with("method", self.http_method.as_str())
            .with("args", self.args.as_str())
            .with("uri", self.uri.as_str())
            .with("body", self.body.as_str())
            .with("query", self.query.as_str())
            .with("return", self.returns.as_str())
            .with("events", self.events.as_str())
    }
}

/// Compiles actions against one backend's syntax table and stubs
pub struct ActionCompiler<'a> {
    syntax: &'a dyn BackendSyntax,
    stubs: &'a StubRenderer,
}

impl<'a> ActionCompiler<'a> {
    pub fn new(syntax: &'a dyn BackendSyntax, stubs: &'a StubRenderer) -> Self {
        Self { syntax, stubs }
    }

    /// Compute every fragment of `action`; `entity` names it in errors
    pub fn compile(&self, entity: &str, action: &ActionDefinition) -> GenResult<CompiledAction> {
        Ok(CompiledAction {
            name: to_camel_case(&action.name),
            description: action
                .description
                .clone()
                .unwrap_or_else(|| action.name.clone()),
            http_method: action.method.to_lowercase(),
            args: self.argument_list(action),
            uri: self.uri(action),
            body: self.body(action),
            query: self.query(action),
            returns: self.return_fragment(entity, action)?,
            events: self.after_hooks(action)?,
        })
    }

    /// Compile `action` and wrap it in the `Action` stub
    pub fn render_method(&self, entity: &str, action: &ActionDefinition) -> GenResult<String> {
        let compiled = self.compile(entity, action)?;
        self.stubs.render(names::ACTION, &compiled.params())
    }

    pub fn argument_list(&self, action: &ActionDefinition) -> String {
        action
            .args
            .iter()
            .map(|(name, spec)| {
                let var = self.syntax.variable_reference(name);
                match &spec.default {
                    Some(default) => format!("{var} = {}", default.literal()),
                    None => var,
                }
            })
            .collect::<Vec<_>>()
            .join(self.syntax.argument_separator())
    }

    pub fn uri(&self, action: &ActionDefinition) -> String {
        action
            .args
            .iter()
            .filter(|(_, spec)| spec.kind == ArgKind::Param)
            .fold(action.uri.clone(), |uri, (name, _)| {
                uri.replace(&format!("{{{name}}}"), &self.syntax.string_interpolate(name))
            })
    }

    pub fn body(&self, action: &ActionDefinition) -> String {
        self.collect(action, ArgKind::Unique, ArgKind::Data)
    }

    pub fn query(&self, action: &ActionDefinition) -> String {
        let has_query = action
            .args
            .values()
            .any(|spec| matches!(spec.kind, ArgKind::QueryUnique | ArgKind::Query));
        if !has_query {
            return String::new();
        }

        let query = self.collect(action, ArgKind::QueryUnique, ArgKind::Query);
        format!("{}{query}", self.syntax.argument_separator())
    }

    /// Whole-value override if a `unique_kind` arg exists, else a literal of
    /// every `entry_kind` arg
    fn collect(
        &self,
        action: &ActionDefinition,
        unique_kind: ArgKind,
        entry_kind: ArgKind,
    ) -> String {
        let unique = action
            .args
            .iter()
            .find(|(_, spec)| spec.kind == unique_kind)
            .map(|(name, _)| name);

        let mut literal = ObjectLiteral::new();
        for (name, spec) in &action.args {
            if spec.kind == entry_kind {
                literal.push(name.as_str(), self.syntax.variable_reference(name));
            }
        }

        match unique {
            Some(name) => {
                if !literal.is_empty() {
                    debug!(
                        action = %action.name,
                        unique = %name,
                        dropped = literal.len(),
                        "unique argument replaces literal entries"
                    );
                }
                self.syntax.variable_reference(name)
            }
            None => literal.render(self.syntax),
        }
    }

    pub fn return_fragment(&self, entity: &str, action: &ActionDefinition) -> GenResult<String> {
        let Some(spec) = &action.returns else {
            return Ok(self.syntax.return_statement().to_string());
        };

        match spec.kind {
            ReturnKind::Direct => Ok(self.syntax.return_statement().to_string()),
            ReturnKind::Model => {
                let resource = spec.resource.as_deref().ok_or_else(|| GenError::InvalidAction {
                    entity: entity.to_string(),
                    action: action.name.clone(),
                    reason: "model return without a resource name".to_string(),
                })?;
                let params = StubParams::new()
                    .with("class", to_pascal_case(resource))
                    .with("const", model_alias(resource));
                Ok(self
                    .stubs
                    .render(names::RETURN_MODEL, &params)?
                    .trim_end()
                    .to_string())
            }
            ReturnKind::Boolean => Ok(match &spec.bool_expr {
                None => self.syntax.literal_return(true),
                Some(BoolExpr::Literal(value)) => self.syntax.literal_return(*value),
                Some(BoolExpr::Path(path)) => match path.trim() {
                    "true" => self.syntax.literal_return(true),
                    "false" => self.syntax.literal_return(false),
                    path => {
                        let path = path.strip_prefix(RESULT_PREFIX).unwrap_or(path);
                        self.syntax.boolean_extract_expression(path)
                    }
                },
            }),
        }
    }

    pub fn after_hooks(&self, action: &ActionDefinition) -> GenResult<String> {
        let mut code = String::new();
        for hook in &action.after_hooks {
            let rendered = match &hook.target {
                Some(target) => self.stubs.render(
                    names::EVENT_AFTER,
                    &StubParams::new()
                        .with("key", hook.source.as_str())
                        .with("target", target.as_str()),
                )?,
                None => self.stubs.render(
                    names::EVENT_AFTER_NULL,
                    &StubParams::new().with("key", hook.source.as_str()),
                )?,
            };
            code.push('\n');
            code.push_str(rendered.trim_end_matches(['\r', '\n']));
        }
        Ok(code)
    }
}
