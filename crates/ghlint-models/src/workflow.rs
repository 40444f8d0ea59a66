//! Workflow document models.
//!
//! Resources:
//! * [Workflow syntax for GitHub Actions](https://docs.github.com/en/actions/writing-workflows/workflow-syntax-for-github-actions)

use indexmap::IndexMap;
use serde::Deserialize;

use crate::common::{Env, Permissions};

pub mod job;

/// A single GitHub Actions workflow, e.g. `.github/workflows/ci.yml`.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Workflow {
    /// The workflow's display name.
    pub name: Option<String>,
    /// The top-level `permissions:`.
    #[serde(default)]
    pub permissions: Permissions,
    /// The top-level `env:`.
    #[serde(default)]
    pub env: Env,
    /// The top-level `defaults:`.
    pub defaults: Option<Defaults>,
    /// The workflow's jobs, in document order.
    #[serde(default)]
    pub jobs: IndexMap<String, Job>,
}

/// A `defaults:` block, either on the workflow or on a job.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct Defaults {
    /// `defaults.run`.
    pub run: Option<RunDefaults>,
}

/// A `defaults.run:` block.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct RunDefaults {
    /// The default `shell:` for `run:` steps.
    pub shell: Option<String>,
    /// The default `working-directory:` for `run:` steps.
    pub working_directory: Option<String>,
}

/// A job, which either runs its own steps or calls a reusable workflow.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum Job {
    /// A job that calls a reusable workflow via `uses:`.
    ///
    /// This must be tried first: every field of a normal job is optional,
    /// so the normal variant would otherwise absorb reusable calls.
    ReusableWorkflowCallJob(Box<job::ReusableWorkflowCallJob>),
    /// A job with `runs-on:` and `steps:`.
    NormalJob(Box<job::NormalJob>),
}

impl Job {
    /// The job's display `name:`, if present.
    pub fn name(&self) -> Option<&str> {
        match self {
            Self::NormalJob(job) => job.name.as_deref(),
            Self::ReusableWorkflowCallJob(job) => job.name.as_deref(),
        }
    }

    /// The job's `needs:` dependencies.
    pub fn needs(&self) -> &[String] {
        match self {
            Self::NormalJob(job) => &job.needs,
            Self::ReusableWorkflowCallJob(job) => &job.needs,
        }
    }
}
