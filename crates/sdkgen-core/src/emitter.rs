//! Entity emitters.
//!
//! One generated file per model, resource and service. Every emitter
//! computes the derived blocks (uses, constructor, properties, methods),
//! then renders the class-level stub into `<dir>/<ClassName><ext>`.

use crate::action::ActionCompiler;
use crate::definition::{EntityDefinition, EntityKind, ReturnKind};
use crate::error::GenResult;
use crate::naming::{class_name, model_alias, to_pascal_case};
use crate::stub::{GeneratedFile, StubParams, StubRenderer, names};
use crate::syntax::BackendSyntax;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Namespace directory of generated models
pub const MODELS_NAMESPACE: &str = "Models";

/// Namespace directory of generated resources
pub const RESOURCES_NAMESPACE: &str = "Resources";

/// Where one kind of entity is written and how its imports are rooted
#[derive(Debug, Clone)]
pub struct EmitTarget {
    pub dir: PathBuf,
    /// Prefix before namespace segments in imports (`./`, `../`, `Acme\Sdk`)
    pub namespace_prefix: String,
}

impl EmitTarget {
    pub fn new(dir: impl Into<PathBuf>, namespace_prefix: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            namespace_prefix: namespace_prefix.into(),
        }
    }
}

/// A class written by an emitter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmittedClass {
    pub class_name: String,
    pub file: GeneratedFile,
}

impl EmittedClass {
    pub fn path(&self) -> &Path {
        &self.file.path
    }
}

/// Emits entity classes for one backend
pub struct Emitter<'a> {
    syntax: &'a dyn BackendSyntax,
    stubs: &'a StubRenderer,
    compiler: ActionCompiler<'a>,
    /// Values every class stub receives, such as the root namespace
    shared: StubParams,
}

impl<'a> Emitter<'a> {
    pub fn new(syntax: &'a dyn BackendSyntax, stubs: &'a StubRenderer, shared: StubParams) -> Self {
        Self {
            syntax,
            stubs,
            compiler: ActionCompiler::new(syntax, stubs),
            shared,
        }
    }

    pub fn emit(&self, target: &EmitTarget, def: &EntityDefinition) -> GenResult<EmittedClass> {
        match def.kind {
            EntityKind::Model => self.emit_model(target, def),
            EntityKind::Resource => self.emit_resource(target, def),
            EntityKind::Service => self.emit_service(target, def),
        }
    }

    pub fn emit_model(
        &self,
        target: &EmitTarget,
        def: &EntityDefinition,
    ) -> GenResult<EmittedClass> {
        let class = class_name(EntityKind::Model, &def.name);
        let params = self.class_params(&class, def);
        self.write(names::MODEL, target, class, &params)
    }

    pub fn emit_resource(
        &self,
        target: &EmitTarget,
        def: &EntityDefinition,
    ) -> GenResult<EmittedClass> {
        let class = class_name(EntityKind::Resource, &def.name);
        let mut params = self.class_params(&class, def);
        params.insert("uses", self.uses_block(target, def)?);
        params.insert("methods", self.methods_block(def)?);
        self.write(names::RESOURCE, target, class, &params)
    }

    pub fn emit_service(
        &self,
        target: &EmitTarget,
        def: &EntityDefinition,
    ) -> GenResult<EmittedClass> {
        let class = class_name(EntityKind::Service, &def.name);
        let mut params = self.class_params(&class, def);
        params.insert("uses", self.uses_block(target, def)?);
        params.insert("constructor", self.dependency_block(names::CONSTRUCTOR, target, def)?);
        params.insert("properties", self.dependency_block(names::PROPERTY, target, def)?);
        params.insert("methods", self.methods_block(def)?);
        self.write(names::SERVICE, target, class, &params)
    }

    fn class_params(&self, class: &str, def: &EntityDefinition) -> StubParams {
        let mut params = self.shared.clone();
        params.insert("class", class);
        params.insert(
            "description",
            def.description.clone().unwrap_or_else(|| class.to_string()),
        );
        params
    }

    fn write(
        &self,
        stub: &str,
        target: &EmitTarget,
        class_name: String,
        params: &StubParams,
    ) -> GenResult<EmittedClass> {
        let path = target
            .dir
            .join(format!("{class_name}{}", self.syntax.file_extension()));
        let file = self.stubs.write_rendered(stub, path, params)?;
        debug!(class = %class_name, path = %file.path.display(), "emitted class");
        Ok(EmittedClass { class_name, file })
    }

    fn namespace(&self, target: &EmitTarget, part: &str) -> String {
        format!("{}{}", target.namespace_prefix, self.syntax.namespace_segment(part))
    }

    /// Imports for model return types, then for service resource
    /// dependencies. Identical entries are emitted once.
    pub fn uses_block(&self, target: &EmitTarget, def: &EntityDefinition) -> GenResult<String> {
        let mut entries: Vec<String> = Vec::new();

        for action in def.actions.values() {
            let Some(returns) = &action.returns else {
                continue;
            };
            if returns.kind != ReturnKind::Model {
                continue;
            }
            let Some(resource) = &returns.resource else {
                continue;
            };
            let params = StubParams::new()
                .with("ns", self.namespace(target, MODELS_NAMESPACE))
                .with("const", model_alias(resource))
                .with("class", to_pascal_case(resource));
            push_unique(&mut entries, self.stubs.render(names::USES, &params)?);
        }

        for resource in def.resources.values() {
            let class = to_pascal_case(resource);
            let params = StubParams::new()
                .with("ns", self.namespace(target, RESOURCES_NAMESPACE))
                .with("const", class.as_str())
                .with("class", class.as_str());
            push_unique(&mut entries, self.stubs.render(names::USES, &params)?);
        }

        Ok(join_blocks(&entries))
    }

    /// One rendering of `stub` per declared resource dependency
    fn dependency_block(
        &self,
        stub: &str,
        target: &EmitTarget,
        def: &EntityDefinition,
    ) -> GenResult<String> {
        let entries = def
            .resources
            .iter()
            .map(|(id, resource)| {
                let params = StubParams::new()
                    .with("name", id.as_str())
                    .with("ns", self.namespace(target, RESOURCES_NAMESPACE))
                    .with("class", to_pascal_case(resource));
                self.stubs.render(stub, &params)
            })
            .collect::<GenResult<Vec<_>>>()?;
        Ok(join_blocks(&entries))
    }

    pub fn methods_block(&self, def: &EntityDefinition) -> GenResult<String> {
        let methods = def
            .actions
            .values()
            .map(|action| self.compiler.render_method(&def.name, action))
            .collect::<GenResult<Vec<_>>>()?;
        Ok(join_blocks(&methods))
    }
}

fn push_unique(entries: &mut Vec<String>, entry: String) {
    if !entries.contains(&entry) {
        entries.push(entry);
    }
}

/// Concatenate rendered snippets, each on its own line
fn join_blocks(blocks: &[String]) -> String {
    blocks
        .iter()
        .map(|block| format!("\n{}", block.trim_end_matches(['\r', '\n'])))
        .collect()
}
