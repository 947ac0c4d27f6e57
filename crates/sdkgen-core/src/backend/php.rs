//! PHP (composer) package driver

use super::{BackendDriver, Layout, StaticFile};
use crate::config::ProjectConfig;
use crate::emitter::EmitTarget;
use crate::stub::StubParams;
use crate::syntax::{BackendSyntax, PhpSyntax};
use std::path::Path;

const STATIC_FILES: &[StaticFile] = &[
    StaticFile::new("composer.json", "composer.json"),
    StaticFile::new("src/Client.txt", "src/Base/Client.php"),
    StaticFile::new("src/Response.txt", "src/Base/Response.php"),
    StaticFile::new("src/Resource.txt", "src/Base/Resource.php"),
    StaticFile::new("src/Model.txt", "src/Base/Model.php"),
];

const DEFAULT_NAMESPACE: &str = "NetForce\\Sdk";

#[derive(Debug, Clone, Copy, Default)]
pub struct PhpDriver;

impl PhpDriver {
    fn namespace(config: &ProjectConfig) -> String {
        let backend = config.backend("php");
        backend
            .option_or(&backend.namespace, DEFAULT_NAMESPACE)
            .trim_matches('\\')
            .to_string()
    }
}

impl BackendDriver for PhpDriver {
    fn id(&self) -> &'static str {
        "php"
    }

    fn syntax(&self) -> &dyn BackendSyntax {
        &PhpSyntax
    }

    fn params(&self, config: &ProjectConfig) -> StubParams {
        let backend = config.backend(self.id());
        let endpoints = &config.build.endpoints;
        let ns = Self::namespace(config);

        StubParams::new()
            .with("version", config.version())
            .with("name", backend.option_or(&backend.name, "netforce/sdk-php"))
            .with(
                "description",
                backend.option_or(&backend.description, "NetForce SDK PHP"),
            )
            .with("keyword", backend.option_or(&backend.keyword, "netforce"))
            // composer.json needs JSON-escaped backslashes
            .with("ns_json", ns.replace('\\', "\\\\"))
            .with("ns", ns)
            .with("env_production", endpoints.production.as_str())
            .with("env_sandbox", endpoints.sandbox.as_str())
            .with("env_local", endpoints.local.as_str())
    }

    fn static_files(&self) -> &'static [StaticFile] {
        STATIC_FILES
    }

    fn layout(&self, root: &Path, config: &ProjectConfig) -> Layout {
        let src = root.join("src");
        let ns = Self::namespace(config);
        Layout {
            models: EmitTarget::new(src.join("Models"), ns.as_str()),
            resources: EmitTarget::new(src.join("Resources"), ns.as_str()),
            services: EmitTarget::new(src, ns),
        }
    }

    fn index_file(&self) -> StaticFile {
        StaticFile::new("src/Services.txt", "src/Services.php")
    }

    fn index_entries(&self, services: &[String]) -> String {
        services
            .iter()
            .map(|class| format!("        '{class}' => {class}::class,"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
