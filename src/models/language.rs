//! Language registry (C1)
//!
//! A `LanguageSpec` is an immutable execution recipe keyed by a short string
//! (`python`, `cpp`, …). Dispatch on language must never hard-code branches
//! against it; the registry is consulted as data instead.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A single language's execution recipe, as loaded from `languages.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LanguageSpec {
    pub key: String,
    pub label: String,
    pub image: String,
    pub file_name: String,
    /// Command template with `{file}` and `{input}` placeholders.
    pub command_template: String,
    pub ace_mode: String,
}

/// On-disk shape of `languages.yaml`.
#[derive(Debug, Deserialize)]
struct LanguagesFile {
    languages: Vec<LanguageSpec>,
}

/// Publicly listable subset of a `LanguageSpec`, for the UI's language picker.
#[derive(Debug, Clone, Serialize)]
pub struct PublicLanguage {
    pub key: String,
    pub label: String,
    pub ace_mode: String,
}

/// Process-wide, read-only registry of supported languages.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    by_key: HashMap<String, LanguageSpec>,
}

/// Errors that can occur while loading the language registry. All are
/// startup-fatal: a broken registry means the runner cannot dispatch.
#[derive(Debug, thiserror::Error)]
pub enum LanguageRegistryError {
    #[error("failed to read languages config at {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse languages config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("duplicate language key: {0}")]
    DuplicateKey(String),

    #[error("language '{key}' has an empty required field: {field}")]
    EmptyField { key: String, field: &'static str },
}

impl LanguageRegistry {
    /// Load and validate the registry from a YAML file on disk.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LanguageRegistryError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| LanguageRegistryError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let parsed: LanguagesFile = serde_yaml::from_str(&raw)?;

        let mut by_key = HashMap::with_capacity(parsed.languages.len());
        for spec in parsed.languages {
            Self::validate_non_empty(&spec)?;
            if by_key.contains_key(&spec.key) {
                return Err(LanguageRegistryError::DuplicateKey(spec.key));
            }
            by_key.insert(spec.key.clone(), spec);
        }

        Ok(Self { by_key })
    }

    fn validate_non_empty(spec: &LanguageSpec) -> Result<(), LanguageRegistryError> {
        let fields: &[(&str, &str)] = &[
            ("key", &spec.key),
            ("label", &spec.label),
            ("image", &spec.image),
            ("file_name", &spec.file_name),
            ("command_template", &spec.command_template),
            ("ace_mode", &spec.ace_mode),
        ];

        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(LanguageRegistryError::EmptyField {
                    key: spec.key.clone(),
                    field: name,
                });
            }
        }

        Ok(())
    }

    /// Look up a language by key.
    pub fn lookup(&self, key: &str) -> Option<&LanguageSpec> {
        self.by_key.get(key)
    }

    /// The sorted, deduplicated set of image references this registry needs,
    /// used to pre-pull images at startup.
    pub fn required_images(&self) -> Vec<String> {
        let mut images: Vec<String> = self
            .by_key
            .values()
            .map(|spec| spec.image.clone())
            .collect();
        images.sort();
        images.dedup();
        images
    }

    /// The UI-facing listing of supported languages.
    pub fn public_list(&self) -> Vec<PublicLanguage> {
        let mut list: Vec<PublicLanguage> = self
            .by_key
            .values()
            .map(|spec| PublicLanguage {
                key: spec.key.clone(),
                label: spec.label.clone(),
                ace_mode: spec.ace_mode.clone(),
            })
            .collect();
        list.sort_by(|a, b| a.key.cmp(&b.key));
        list
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_temp_yaml(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_valid_registry() {
        let file = write_temp_yaml(
            r#"
languages:
  - key: python
    label: Python
    image: "python:3.12-slim"
    file_name: code.py
    command_template: "echo {input} | python /app/{file}"
    ace_mode: python
"#,
        );

        let registry = LanguageRegistry::load(file.path()).unwrap();
        assert!(registry.lookup("python").is_some());
        assert_eq!(registry.required_images(), vec!["python:3.12-slim"]);
    }

    #[test]
    fn rejects_duplicate_key() {
        let file = write_temp_yaml(
            r#"
languages:
  - key: python
    label: Python
    image: "python:3.12-slim"
    file_name: code.py
    command_template: "echo {input} | python /app/{file}"
    ace_mode: python
  - key: python
    label: Python 2
    image: "python:2-slim"
    file_name: code.py
    command_template: "echo {input} | python2 /app/{file}"
    ace_mode: python
"#,
        );

        let err = LanguageRegistry::load(file.path()).unwrap_err();
        assert!(matches!(err, LanguageRegistryError::DuplicateKey(_)));
    }

    #[test]
    fn rejects_empty_field() {
        let file = write_temp_yaml(
            r#"
languages:
  - key: python
    label: ""
    image: "python:3.12-slim"
    file_name: code.py
    command_template: "echo {input} | python /app/{file}"
    ace_mode: python
"#,
        );

        let err = LanguageRegistry::load(file.path()).unwrap_err();
        assert!(matches!(err, LanguageRegistryError::EmptyField { .. }));
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = LanguageRegistry::load("/nonexistent/languages.yaml").unwrap_err();
        assert!(matches!(err, LanguageRegistryError::Read { .. }));
    }
}
