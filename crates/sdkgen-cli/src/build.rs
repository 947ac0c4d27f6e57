//! Build command implementation

use anyhow::{Context, Result};
use sdkgen_core::{BuildEvent, BuildOrchestrator};
use std::path::PathBuf;
use tracing::debug;

/// Run the build command
pub fn run(project: Option<PathBuf>, templates: PathBuf) -> Result<()> {
    let project_dir = crate::project_dir(project);

    println!("Building SDKs in: {}", project_dir.display());
    debug!(templates = %templates.display(), "using stub templates");

    let mut orchestrator = BuildOrchestrator::load(&project_dir, &templates)
        .with_context(|| format!("Failed to load project {}", project_dir.display()))?;

    let summary = orchestrator
        .run_with(|event| match event {
            BuildEvent::Started {
                version,
                backends,
                definitions,
            } => {
                println!("Version: {version}");
                println!("Backends: {}", backends.join(", "));
                println!(
                    "Definitions: {} models, {} resources, {} services",
                    definitions.models.len(),
                    definitions.resources.len(),
                    definitions.services.len()
                );
            }
            BuildEvent::BackendStarted(id) => println!("\nBuilding {id}..."),
            BuildEvent::BackendFinished(report) => {
                for service in &report.services {
                    println!("  {service}");
                }
                println!(
                    "✓ {}: {} files in {}",
                    report.backend,
                    report.files_written,
                    report.output_dir.display()
                );
            }
        })
        .context("Build failed")?;

    println!(
        "\n✓ Build successful! {} files across {} backends",
        summary.files_written(),
        summary.reports.len()
    );

    Ok(())
}
