//! JavaScript (CommonJS) package driver

use super::{BackendDriver, Layout, StaticFile};
use crate::config::ProjectConfig;
use crate::emitter::EmitTarget;
use crate::stub::StubParams;
use crate::syntax::{BackendSyntax, JsSyntax};
use std::path::Path;

const STATIC_FILES: &[StaticFile] = &[
    StaticFile::new(".babelrc", ".babelrc"),
    StaticFile::new(".npmrc.txt", ".npmrc"),
    StaticFile::new("package.json", "package.json"),
    StaticFile::new("webpack.config.js", "webpack.config.js"),
    StaticFile::new("browser.js", "browser.js"),
    StaticFile::new("src/Client.js", "src/Base/Client.js"),
    StaticFile::new("src/Global.js", "src/Base/Global.js"),
    StaticFile::new("src/Consts.js", "src/Base/Consts.js"),
    StaticFile::new("src/Model.js", "src/Base/Model.js"),
    StaticFile::new("src/Resource.js", "src/Base/Resource.js"),
    StaticFile::new("src/ApiClient.js", "src/ApiClient.js"),
];

#[derive(Debug, Clone, Copy, Default)]
pub struct JsDriver;

impl BackendDriver for JsDriver {
    fn id(&self) -> &'static str {
        "js"
    }

    fn syntax(&self) -> &dyn BackendSyntax {
        &JsSyntax
    }

    fn params(&self, config: &ProjectConfig) -> StubParams {
        let backend = config.backend(self.id());
        let endpoints = &config.build.endpoints;

        StubParams::new()
            .with("version", config.version())
            .with("name", backend.option_or(&backend.name, "nws-sdk"))
            .with(
                "internal_name",
                backend.option_or(&backend.internal_name, "nws"),
            )
            .with("keyword", backend.option_or(&backend.keyword, "netforce"))
            .with(
                "github",
                backend.option_or(&backend.github, "git@github.com:netforcews/sdk-js.git"),
            )
            .with("env_production", endpoints.production.as_str())
            .with("env_sandbox", endpoints.sandbox.as_str())
            .with("env_local", endpoints.local.as_str())
    }

    fn static_files(&self) -> &'static [StaticFile] {
        STATIC_FILES
    }

    fn layout(&self, root: &Path, _config: &ProjectConfig) -> Layout {
        let src = root.join("src");
        Layout {
            models: EmitTarget::new(src.join("Models"), "../"),
            resources: EmitTarget::new(src.join("Resources"), "../"),
            services: EmitTarget::new(src, "./"),
        }
    }

    fn index_file(&self) -> StaticFile {
        StaticFile::new("index.js", "index.js")
    }

    fn index_entries(&self, services: &[String]) -> String {
        services
            .iter()
            .map(|class| format!("    '{class}': require('./src/{class}')"))
            .collect::<Vec<_>>()
            .join(",\n")
    }
}
