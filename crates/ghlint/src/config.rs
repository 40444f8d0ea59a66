//! Loading and discovery for `ghlint.yml`.

use std::{collections::HashMap, fs};

use camino::Utf8Path;
use serde::Deserialize;
use thiserror::Error;

use crate::finding::Finding;

const CONFIG_CANDIDATES: &[&str] = &[
    ".github/ghlint.yml",
    ".github/ghlint.yaml",
    "ghlint.yml",
    "ghlint.yaml",
];

#[derive(Error, Debug)]
#[error("configuration error in {path}")]
pub struct ConfigError {
    /// The path to the configuration file that caused this error.
    path: String,
    /// The source of this error.
    #[source]
    pub source: ConfigErrorInner,
}

#[derive(Error, Debug)]
pub enum ConfigErrorInner {
    /// An I/O error occurred while loading the configuration.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The configuration file is syntactically invalid.
    #[error("invalid configuration syntax")]
    Syntax(#[source] serde_yaml::Error),
}

/// Per-issue configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct IssueConfig {
    /// Drops every finding of the issue if `true`.
    #[serde(default)]
    disable: bool,
}

/// Data model for ghlint's configuration file, keyed by issue id.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    #[serde(default)]
    rules: HashMap<String, IssueConfig>,
}

impl Config {
    fn load(contents: &str) -> Result<Self, ConfigErrorInner> {
        serde_yaml::from_str(contents).map_err(ConfigErrorInner::Syntax)
    }

    /// Loads the config at `path`.
    pub fn load_file(path: &Utf8Path) -> Result<Self, ConfigError> {
        fs::read_to_string(path)
            .map_err(ConfigErrorInner::from)
            .and_then(|contents| Self::load(&contents))
            .map_err(|source| ConfigError {
                path: path.to_string(),
                source,
            })
    }

    /// Finds the config that applies to `path`, if any.
    ///
    /// Starting from `path` (or its parent, for files), each directory is
    /// checked for a config candidate, walking upwards until a directory
    /// containing `.git` or the filesystem root. A search starting at
    /// `.github/workflows/` starts at `.github/` instead.
    pub fn discover(path: &Utf8Path) -> Result<Option<Self>, ConfigError> {
        tracing::debug!("discovering config for `{path}`");

        let start = if path.is_dir() {
            path
        } else {
            match path.parent().map(|p| p.as_str()) {
                // `parent()` is `Some("")` for bare file names.
                Some("") => Utf8Path::new("."),
                Some(parent) => Utf8Path::new(parent),
                None => {
                    tracing::debug!("no parent for `{path}`, cannot discover config");
                    return Ok(None);
                }
            }
        };

        Self::discover_in_dir(start).map_err(|source| ConfigError {
            path: start.to_string(),
            source,
        })
    }

    fn discover_in_dir(path: &Utf8Path) -> Result<Option<Self>, ConfigErrorInner> {
        let canonical = path.canonicalize_utf8()?;

        let mut candidate_dir = if canonical.file_name() == Some("workflows") {
            let Some(parent) = canonical.parent() else {
                tracing::debug!("no parent for `{canonical}`, cannot discover config");
                return Ok(None);
            };

            parent
        } else {
            canonical.as_path()
        };

        loop {
            for candidate in CONFIG_CANDIDATES {
                let candidate_path = candidate_dir.join(candidate);
                if candidate_path.is_file() {
                    tracing::debug!("found config candidate at `{candidate_path}`");
                    return Ok(Some(Self::load(&fs::read_to_string(&candidate_path)?)?));
                }
            }

            if candidate_dir.join(".git").is_dir() {
                tracing::debug!("found `{candidate_dir}/.git`, stopping search");
                return Ok(None);
            }

            let Some(parent) = candidate_dir.parent() else {
                tracing::debug!("reached filesystem root without finding a config");
                return Ok(None);
            };

            candidate_dir = parent;
        }
    }

    /// Whether every finding of the issue `id` should be dropped.
    pub fn disables(&self, id: &str) -> bool {
        self.rules.get(id).is_some_and(|rule| rule.disable)
    }

    /// Whether `finding` should be dropped.
    pub fn ignores(&self, finding: &Finding<'_>) -> bool {
        self.disables(finding.id())
    }
}
