//! Backend syntax tables.
//!
//! A [`BackendSyntax`] is the only place target-language syntax lives. The
//! action compiler and the entity emitters ask it how to spell a variable,
//! an interpolation or a map literal, so one generation algorithm serves
//! every backend.

/// Language-specific syntax primitives for one backend
pub trait BackendSyntax: Send + Sync {
    /// Reference a local variable (`id`, `$id`)
    fn variable_reference(&self, name: &str) -> String;

    /// Splice a variable into a string literal (`${id}`, `{$id}`)
    fn string_interpolate(&self, name: &str) -> String;

    /// One component of an import or namespace path
    fn namespace_segment(&self, part: &str) -> String;

    /// Wrap rendered key/value pairs into a map literal
    fn object_literal(&self, inner: &str) -> String;

    /// One literal key bound to a value expression, separator included
    fn key_value_pair(&self, key: &str, value: &str) -> String;

    /// Canonical "return the result" statement
    fn return_statement(&self) -> &'static str;

    /// Statement extracting a nested boolean field from the result
    fn boolean_extract_expression(&self, path: &str) -> String;

    /// Suffix of generated source files, dot included
    fn file_extension(&self) -> &'static str;

    /// Statement returning a boolean literal
    fn literal_return(&self, value: bool) -> String {
        format!("return {value};")
    }

    /// Separator between positional call arguments
    fn argument_separator(&self) -> &'static str {
        ", "
    }
}

/// JavaScript (CommonJS) syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct JsSyntax;

impl BackendSyntax for JsSyntax {
    fn variable_reference(&self, name: &str) -> String {
        name.to_string()
    }

    fn string_interpolate(&self, name: &str) -> String {
        format!("${{{name}}}")
    }

    fn namespace_segment(&self, part: &str) -> String {
        format!("{part}/")
    }

    fn object_literal(&self, inner: &str) -> String {
        format!("{{{inner}}}")
    }

    fn key_value_pair(&self, key: &str, value: &str) -> String {
        format!("'{key}': {value},")
    }

    fn return_statement(&self) -> &'static str {
        "return ret;"
    }

    fn boolean_extract_expression(&self, path: &str) -> String {
        format!("return (Arr.get(ret, '{path}') == true);")
    }

    fn file_extension(&self) -> &'static str {
        ".js"
    }
}

/// PHP syntax
#[derive(Debug, Clone, Copy, Default)]
pub struct PhpSyntax;

impl BackendSyntax for PhpSyntax {
    fn variable_reference(&self, name: &str) -> String {
        format!("${name}")
    }

    fn string_interpolate(&self, name: &str) -> String {
        format!("{{${name}}}")
    }

    fn namespace_segment(&self, part: &str) -> String {
        format!("\\{part}\\")
    }

    fn object_literal(&self, inner: &str) -> String {
        format!("[{inner}]")
    }

    fn key_value_pair(&self, key: &str, value: &str) -> String {
        format!("'{key}' => {value},")
    }

    fn return_statement(&self) -> &'static str {
        "return $ret;"
    }

    fn boolean_extract_expression(&self, path: &str) -> String {
        format!("return (Arr::get($ret, '{path}') == true);")
    }

    fn file_extension(&self) -> &'static str {
        ".php"
    }
}

/// Ordered key/value entries rendered once into a backend map literal
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ObjectLiteral {
    entries: Vec<(String, String)>,
}

impl ObjectLiteral {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.entries.push((key.into(), value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn render(&self, syntax: &dyn BackendSyntax) -> String {
        let inner: String = self
            .entries
            .iter()
            .map(|(key, value)| syntax.key_value_pair(key, value))
            .collect();
        syntax.object_literal(&inner)
    }
}
