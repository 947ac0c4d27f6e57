//! Backend drivers.
//!
//! A driver owns one target language: its [`BackendSyntax`], the static
//! files copied into every package, and the output layout. The generation
//! flow itself is shared ([`BackendDriver::build`]):
//!
//! ```text
//! outputPath ([version] tokens)
//!     ↓  delete + recreate
//! static files  (templates/<id>/...)
//!     ↓
//! models → resources → services  (templates/<id>/src/stubs/*.txt)
//!     ↓
//! index file listing the generated services
//! ```

mod js;
mod php;

pub use js::JsDriver;
pub use php::PhpDriver;

use crate::config::ProjectConfig;
use crate::definition::DefinitionSet;
use crate::emitter::{EmitTarget, Emitter};
use crate::error::{GenError, GenResult};
use crate::stub::{StubParams, StubRenderer};
use crate::syntax::BackendSyntax;
use std::fs;
use std::path::{Component, Path, PathBuf};
use tracing::info;

/// Backend ids with a driver, in the order they are documented
pub const SUPPORTED_BACKENDS: &[&str] = &["js", "php"];

/// Directory under a backend's templates holding the class stubs
pub const STUBS_DIR: &str = "src/stubs";

/// Driver for an id from `build.outputs`
pub fn backend_for(id: &str) -> GenResult<Box<dyn BackendDriver>> {
    match id {
        "js" => Ok(Box::new(JsDriver)),
        "php" => Ok(Box::new(PhpDriver)),
        other => Err(GenError::UnsupportedBackend(other.to_string())),
    }
}

/// A template copied into the package, relative to the backend's
/// templates directory and output root
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StaticFile {
    pub source: &'static str,
    pub target: &'static str,
}

impl StaticFile {
    pub const fn new(source: &'static str, target: &'static str) -> Self {
        Self { source, target }
    }
}

/// Output directories for each entity kind
#[derive(Debug, Clone)]
pub struct Layout {
    pub models: EmitTarget,
    pub resources: EmitTarget,
    pub services: EmitTarget,
}

/// Inputs shared by every driver in a run
#[derive(Debug, Clone, Copy)]
pub struct BuildContext<'a> {
    pub project_dir: &'a Path,
    pub templates_dir: &'a Path,
    pub config: &'a ProjectConfig,
    pub definitions: &'a DefinitionSet,
}

/// Outcome of one backend run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackendReport {
    pub backend: &'static str,
    pub output_dir: PathBuf,
    /// Generated service class names, in definition order
    pub services: Vec<String>,
    pub files_written: usize,
}

pub trait BackendDriver {
    fn id(&self) -> &'static str;

    fn syntax(&self) -> &dyn BackendSyntax;

    /// Values for static files and class stubs
    fn params(&self, config: &ProjectConfig) -> StubParams;

    fn static_files(&self) -> &'static [StaticFile];

    fn layout(&self, root: &Path, config: &ProjectConfig) -> Layout;

    /// Template of the services index, rendered with `{{services}}`
    fn index_file(&self) -> StaticFile;

    /// Body of the services index
    fn index_entries(&self, services: &[String]) -> String;

    /// Regenerate this backend's whole output tree under `root`, as
    /// resolved by [`output_root`]
    fn build(&self, ctx: &BuildContext<'_>, root: &Path) -> GenResult<BackendReport> {
        let id = self.id();
        info!(backend = id, output = %root.display(), "building backend");

        guard_output_root(id, root, &[ctx.project_dir, ctx.templates_dir])?;
        reset_output_dir(root)?;
        let root = root.to_path_buf();

        let templates = StubRenderer::new(ctx.templates_dir.join(id));
        let class_stubs = StubRenderer::new(templates.root().join(STUBS_DIR));
        let params = self.params(ctx.config);
        let mut files_written = 0;

        for file in self.static_files() {
            templates.write_rendered(file.source, root.join(file.target), &params)?;
            files_written += 1;
        }

        let emitter = Emitter::new(self.syntax(), &class_stubs, params.clone());
        let layout = self.layout(&root, ctx.config);

        for model in ctx.definitions.models.values() {
            emitter.emit(&layout.models, model)?;
            files_written += 1;
        }
        for resource in ctx.definitions.resources.values() {
            emitter.emit(&layout.resources, resource)?;
            files_written += 1;
        }
        let mut services = Vec::with_capacity(ctx.definitions.services.len());
        for service in ctx.definitions.services.values() {
            services.push(emitter.emit(&layout.services, service)?.class_name);
            files_written += 1;
        }

        let index = self.index_file();
        let mut index_params = params;
        index_params.insert("services", self.index_entries(&services));
        templates.write_rendered(index.source, root.join(index.target), &index_params)?;
        files_written += 1;

        info!(backend = id, services = services.len(), files = files_written, "backend complete");

        Ok(BackendReport {
            backend: id,
            output_dir: root,
            services,
            files_written,
        })
    }
}

/// Resolve backend `id`'s output root and make sure deleting it cannot
/// touch the project or the templates
pub fn output_root(
    config: &ProjectConfig,
    project_dir: &Path,
    templates_dir: &Path,
    id: &str,
) -> GenResult<PathBuf> {
    let root = config.output_dir(project_dir, id)?;
    guard_output_root(id, &root, &[project_dir, templates_dir])?;
    Ok(root)
}

/// Reject a root that is, or lies above, one of the `protected` directories
fn guard_output_root(id: &str, root: &Path, protected: &[&Path]) -> GenResult<()> {
    let normalized_root = normalize(root)?;
    for dir in protected {
        if normalize(dir)?.starts_with(&normalized_root) {
            return Err(GenError::Configuration(format!(
                "build.config.{id}.outputPath resolves to {}, which contains {}",
                root.display(),
                dir.display()
            )));
        }
    }
    Ok(())
}

/// Absolute form of `path` with `.` and `..` resolved lexically
fn normalize(path: &Path) -> GenResult<PathBuf> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map_err(|e| GenError::io(path, e))?
            .join(path)
    };

    let mut normalized = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other),
        }
    }
    Ok(normalized)
}

/// Delete a previous output tree so the build starts from nothing
fn reset_output_dir(root: &Path) -> GenResult<()> {
    if root.exists() {
        fs::remove_dir_all(root).map_err(|e| GenError::io(root, e))?;
    }
    fs::create_dir_all(root).map_err(|e| GenError::io(root, e))
}
