//! Models for the documents `ghlint` analyzes.
//!
//! These wrap the raw serde models in [`ghlint_models`], adding the context
//! (ids, ordinal positions, parents) that rules need without having to keep
//! any state of their own.

use std::fmt::Display;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

use crate::models::workflow::Workflow;

pub mod permissions;
pub mod workflow;

/// Errors that can occur while turning an input into a [`File`].
#[derive(Error, Debug)]
pub enum InputError {
    /// The input's syntax is invalid.
    /// This typically indicates a user error.
    #[error("invalid YAML syntax: {0}")]
    Syntax(#[source] anyhow::Error),
    /// The input couldn't be converted into the expected model.
    /// This typically indicates a bug in `ghlint-models`.
    #[error("couldn't turn input into an appropriate model")]
    Model(#[source] anyhow::Error),
    /// The input doesn't match the schema for the expected model.
    /// This typically indicates a user error.
    #[error("input does not match expected validation schema")]
    Schema(#[source] anyhow::Error),
    /// The input matches the schema, but is internally inconsistent,
    /// e.g. a job `needs:` a job that doesn't exist.
    #[error("invalid input: {0}")]
    Invalid(String),
    /// An I/O error occurred while loading the input.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// The input's name is missing.
    #[error("invalid input: no filename component")]
    MissingName,
}

/// A unique identifier for a [`File`]: the path it was loaded from.
#[derive(Debug, Clone, Eq, Hash, PartialEq, PartialOrd, Ord)]
pub struct InputKey {
    path: Utf8PathBuf,
}

impl InputKey {
    /// Creates a new key from the given path.
    ///
    /// Fails if the path has no file name component, since the file name
    /// is what gives a workflow its id.
    pub fn new(path: impl AsRef<Utf8Path>) -> Result<Self, InputError> {
        let path = path.as_ref();
        if path.file_name().is_none() {
            return Err(InputError::MissingName);
        }

        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// The path this key was created from.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// The file name without its extension, e.g. `ci` for
    /// `.github/workflows/ci.yml`.
    pub fn stem(&self) -> &str {
        self.path.file_stem().unwrap_or_default()
    }
}

impl Display for InputKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// The parsed content of a [`File`].
///
/// Workflows are the only kind of document analyzed today.
#[derive(Debug)]
pub enum FileContent {
    Workflow(Workflow),
}

/// A single analyzed document, owning everything that was parsed from it.
#[derive(Debug)]
pub struct File {
    key: InputKey,
    content: FileContent,
}

impl File {
    /// Load a file from a buffer, validating it against the workflow schema
    /// and checking it for internal consistency.
    #[tracing::instrument(skip(contents), fields(key = %key))]
    pub fn from_string(contents: &str, key: InputKey) -> Result<Self, InputError> {
        let workflow = Workflow::from_string(contents, key.stem())?;

        Ok(Self {
            key,
            content: FileContent::Workflow(workflow),
        })
    }

    /// Load a file from a buffer without any validation beyond what's needed
    /// to build the model.
    ///
    /// This accepts documents that GitHub would reject, e.g. ones with jobs
    /// that need nonexistent jobs.
    #[tracing::instrument(skip(contents), fields(key = %key))]
    pub fn from_string_unvalidated(contents: &str, key: InputKey) -> Result<Self, InputError> {
        let workflow = Workflow::from_string_unvalidated(contents, key.stem())?;

        Ok(Self {
            key,
            content: FileContent::Workflow(workflow),
        })
    }

    /// Load a file from disk.
    pub fn from_path(path: &Utf8Path, validate: bool) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)?;
        let key = InputKey::new(path)?;

        if validate {
            Self::from_string(&contents, key)
        } else {
            Self::from_string_unvalidated(&contents, key)
        }
    }

    pub fn key(&self) -> &InputKey {
        &self.key
    }

    pub fn content(&self) -> &FileContent {
        &self.content
    }
}
