//! sdkgen-core - Client SDK generation from YAML API definitions
//!
//! This crate turns a project of entity definitions into one client
//! package per target language:
//! - [`DefinitionSet`] loads models, resources and services
//! - [`StubRenderer`] fills `{{key}}` stub templates
//! - [`BackendSyntax`] describes how a target language spells variables,
//!   literals and returns
//! - [`ActionCompiler`] and [`Emitter`] turn definitions into classes
//! - [`BackendDriver`] lays out one package per language
//! - [`BuildOrchestrator`] runs the enabled backends from `build.yml`

pub mod action;
pub mod backend;
pub mod config;
pub mod definition;
pub mod emitter;
pub mod error;
pub mod naming;
pub mod orchestrator;
pub mod stub;
pub mod syntax;

pub use action::{ActionCompiler, CompiledAction};
pub use backend::{BackendDriver, BackendReport, JsDriver, PhpDriver, backend_for};
pub use config::{BackendConfig, ProjectConfig};
pub use definition::{DefinitionSet, EntityDefinition, EntityKind};
pub use emitter::{EmitTarget, Emitter};
pub use error::{GenError, GenResult};
pub use orchestrator::{BuildEvent, BuildOrchestrator, BuildPlan, BuildState, BuildSummary};
pub use stub::{GeneratedFile, StubParams, StubRenderer};
pub use syntax::{BackendSyntax, JsSyntax, PhpSyntax};
