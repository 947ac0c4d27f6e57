//! Stub template rendering.
//!
//! Stubs are plain text files with `{{key}}` placeholders. Rendering is a
//! single left-to-right pass: a substituted value is never scanned again, so
//! a value that itself contains `{{other}}` comes out verbatim. Placeholders
//! without a supplied value are left in place.
//!
//! Output paths use a separate `[key]` token syntax, see
//! [`substitute_path_tokens`].

use crate::error::{GenError, GenResult};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Stub file names shared by every backend's `src/stubs` directory.
pub mod names {
    pub const MODEL: &str = "Model.txt";
    pub const RESOURCE: &str = "Resource.txt";
    pub const SERVICE: &str = "Service.txt";
    pub const USES: &str = "Uses.txt";
    pub const CONSTRUCTOR: &str = "Constructor.txt";
    pub const PROPERTY: &str = "Property.txt";
    pub const ACTION: &str = "Action.txt";
    pub const RETURN_MODEL: &str = "ReturnModel.txt";
    pub const EVENT_AFTER: &str = "EventAfter.txt";
    pub const EVENT_AFTER_NULL: &str = "EventAfterNull.txt";
}

/// Placeholder values for one render call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StubParams(BTreeMap<String, String>);

impl StubParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    /// Copy every entry of `other` into `self`, replacing existing keys
    pub fn extend(&mut self, other: &StubParams) {
        for (key, value) in &other.0 {
            self.0.insert(key.clone(), value.clone());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for StubParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// A finished output file, written once and dropped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub content: String,
}

impl GeneratedFile {
    pub fn new(path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: content.into(),
        }
    }

    /// Write the file, creating parent directories and replacing any
    /// previous content
    pub fn write(&self) -> GenResult<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| GenError::io(parent, e))?;
        }
        fs::write(&self.path, &self.content).map_err(|e| GenError::io(&self.path, e))
    }
}

/// Renders stubs from one backend's templates directory
#[derive(Debug, Clone)]
pub struct StubRenderer {
    root: PathBuf,
}

impl StubRenderer {
    /// Create a renderer resolving relative stub paths against `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Load a stub and substitute `params` into it
    pub fn render(&self, template: impl AsRef<Path>, params: &StubParams) -> GenResult<String> {
        let path = self.root.join(template.as_ref());
        if !path.is_file() {
            return Err(GenError::StubNotFound(path));
        }
        let text = fs::read_to_string(&path).map_err(|e| GenError::io(&path, e))?;
        Ok(substitute(&text, params))
    }

    /// Render a stub, collapse blank lines and write it to `target`
    pub fn write_rendered(
        &self,
        template: impl AsRef<Path>,
        target: impl Into<PathBuf>,
        params: &StubParams,
    ) -> GenResult<GeneratedFile> {
        let rendered = self.render(template, params)?;
        let file = GeneratedFile::new(target, collapse_blank_lines(&rendered));
        file.write()?;
        Ok(file)
    }
}

/// Replace every `{{key}}` whose key is in `params`, in one pass.
pub fn substitute(template: &str, params: &StubParams) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let candidate = &rest[start..];

        let replaced = candidate[2..]
            .find("}}")
            .and_then(|end| params.get(&candidate[2..2 + end]).map(|v| (v, end + 4)));

        match replaced {
            Some((value, consumed)) => {
                out.push_str(value);
                rest = &candidate[consumed..];
            }
            None => {
                // Keep one brace and rescan, so `{{{key}}}` still matches at
                // the inner `{{`
                out.push('{');
                rest = &candidate[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

/// Merge every run of two or more blank lines into a single blank line.
///
/// Whitespace-only lines count as blank. Line endings are preserved.
pub fn collapse_blank_lines(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_blank = false;

    for line in text.split_inclusive('\n') {
        let blank = line.trim().is_empty();
        if !(blank && previous_blank) {
            out.push_str(line);
        }
        previous_blank = blank;
    }

    out
}

/// Replace `[key]` tokens in an output path template.
///
/// ```
/// use sdkgen_core::stub::substitute_path_tokens;
///
/// let tokens = [("version", "1.2.0"), ("backend", "js")];
/// let path = substitute_path_tokens("dist/[backend]/[version]", &tokens);
/// assert_eq!(path, "dist/js/1.2.0");
/// ```
pub fn substitute_path_tokens(path: &str, tokens: &[(&str, &str)]) -> String {
    tokens.iter().fold(path.to_string(), |acc, (key, value)| {
        acc.replace(&format!("[{key}]"), value)
    })
}
