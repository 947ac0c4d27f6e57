//! Check command implementation

use anyhow::{Context, Result};
use sdkgen_core::{BuildOrchestrator, EntityKind};
use std::path::PathBuf;

/// Validate `build.yml` and every definition file, writing nothing
pub fn run(project: Option<PathBuf>) -> Result<()> {
    let project_dir = crate::project_dir(project);

    println!("Checking project: {}", project_dir.display());

    let orchestrator = BuildOrchestrator::load(&project_dir, crate::DEFAULT_TEMPLATES)
        .with_context(|| format!("Failed to load project {}", project_dir.display()))?;
    let plan = orchestrator.plan().context("Project is invalid")?;

    println!("✓ Version: {}", plan.version);
    for (backend, output) in &plan.backends {
        println!("✓ Backend {backend}: {}", output.display());
    }
    for kind in EntityKind::ALL {
        println!("✓ {}: {}", kind.directory(), plan.definitions.of_kind(kind).len());
    }
    println!("\nProject is valid!");

    Ok(())
}
