//! Build orchestration.
//!
//! ```text
//! Idle ──run()──→ Running ──(all backends done | first failure)──→ Idle
//! ```
//!
//! Backends run one after another in `build.outputs` order. Each one owns
//! its output tree for the duration of its run, and the first failure ends
//! the whole build.

use crate::backend::{BackendDriver, BackendReport, BuildContext, backend_for, output_root};
use crate::config::ProjectConfig;
use crate::definition::DefinitionSet;
use crate::error::{GenError, GenResult};
use std::path::{Path, PathBuf};
use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BuildState {
    #[default]
    Idle,
    Running,
}

impl std::fmt::Display for BuildState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildState::Idle => write!(f, "Idle"),
            BuildState::Running => write!(f, "Running"),
        }
    }
}

/// Progress notifications emitted during [`BuildOrchestrator::run_with`]
#[derive(Debug)]
pub enum BuildEvent<'a> {
    /// Definitions are loaded and the listed backends are about to run
    Started {
        version: &'a str,
        backends: &'a [&'static str],
        definitions: &'a DefinitionSet,
    },
    BackendStarted(&'static str),
    BackendFinished(&'a BackendReport),
}

/// Result of a completed build
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSummary {
    pub version: String,
    /// One report per backend, in build order
    pub reports: Vec<BackendReport>,
}

impl BuildSummary {
    pub fn files_written(&self) -> usize {
        self.reports.iter().map(|r| r.files_written).sum()
    }
}

/// What a build would do, resolved without writing anything
#[derive(Debug, Clone, PartialEq)]
pub struct BuildPlan {
    pub version: String,
    /// Backend id and resolved output root, in build order
    pub backends: Vec<(&'static str, PathBuf)>,
    pub definitions: DefinitionSet,
}

pub struct BuildOrchestrator {
    project_dir: PathBuf,
    templates_dir: PathBuf,
    config: ProjectConfig,
    state: BuildState,
}

impl BuildOrchestrator {
    pub fn new(
        project_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
        config: ProjectConfig,
    ) -> Self {
        Self {
            project_dir: project_dir.into(),
            templates_dir: templates_dir.into(),
            config,
            state: BuildState::Idle,
        }
    }

    /// Read `build.yml` from `project_dir`
    pub fn load(
        project_dir: impl Into<PathBuf>,
        templates_dir: impl Into<PathBuf>,
    ) -> GenResult<Self> {
        let project_dir = project_dir.into();
        let config = ProjectConfig::from_project_dir(&project_dir)?;
        Ok(Self::new(project_dir, templates_dir, config))
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Drivers for `build.outputs`, in order.
    ///
    /// Fails when no backend is enabled or any id has no driver, so a bad
    /// configuration is rejected before any backend touches the disk.
    pub fn enabled_backends(&self) -> GenResult<Vec<Box<dyn BackendDriver>>> {
        let outputs = &self.config.build.outputs;
        if outputs.is_empty() {
            return Err(GenError::Configuration(
                "no backend enabled in build.outputs".to_string(),
            ));
        }
        outputs.iter().map(|id| backend_for(id)).collect()
    }

    /// Validate configuration and definitions the way [`run`](Self::run)
    /// would, including every backend's output path
    pub fn plan(&self) -> GenResult<BuildPlan> {
        let drivers = self.enabled_backends()?;
        let roots = self.output_roots(&drivers)?;

        Ok(BuildPlan {
            version: self.config.version().to_string(),
            backends: drivers.iter().map(|d| d.id()).zip(roots).collect(),
            definitions: DefinitionSet::load(&self.project_dir)?,
        })
    }

    /// Output root of every driver, resolved and checked before any
    /// backend deletes or writes a file
    fn output_roots(&self, drivers: &[Box<dyn BackendDriver>]) -> GenResult<Vec<PathBuf>> {
        drivers
            .iter()
            .map(|driver| {
                output_root(&self.config, &self.project_dir, &self.templates_dir, driver.id())
            })
            .collect()
    }

    pub fn run(&mut self) -> GenResult<BuildSummary> {
        self.run_with(|_| {})
    }

    /// Run every enabled backend, reporting progress to `on_event`
    pub fn run_with<F>(&mut self, mut on_event: F) -> GenResult<BuildSummary>
    where
        F: FnMut(BuildEvent<'_>),
    {
        self.state = BuildState::Running;
        let result = self.run_backends(&mut on_event);
        self.state = BuildState::Idle;

        if let Err(e) = &result {
            error!(kind = e.kind(), error = %e, "build failed");
        }
        result
    }

    fn run_backends(&self, on_event: &mut dyn FnMut(BuildEvent<'_>)) -> GenResult<BuildSummary> {
        let drivers = self.enabled_backends()?;
        let roots = self.output_roots(&drivers)?;
        let ids: Vec<&'static str> = drivers.iter().map(|d| d.id()).collect();
        let definitions = DefinitionSet::load(&self.project_dir)?;
        let version = self.config.version();

        info!(
            version,
            backends = ?ids,
            models = definitions.models.len(),
            resources = definitions.resources.len(),
            services = definitions.services.len(),
            "starting build"
        );
        on_event(BuildEvent::Started {
            version,
            backends: &ids,
            definitions: &definitions,
        });

        let ctx = BuildContext {
            project_dir: &self.project_dir,
            templates_dir: &self.templates_dir,
            config: &self.config,
            definitions: &definitions,
        };

        let mut reports = Vec::with_capacity(drivers.len());
        for (driver, root) in drivers.iter().zip(&roots) {
            on_event(BuildEvent::BackendStarted(driver.id()));
            let report = driver.build(&ctx, root)?;
            on_event(BuildEvent::BackendFinished(&report));
            reports.push(report);
        }

        Ok(BuildSummary {
            version: version.to_string(),
            reports,
        })
    }
}
