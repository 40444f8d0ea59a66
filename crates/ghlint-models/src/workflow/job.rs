//! Workflow jobs and their steps.

use serde::Deserialize;

use crate::common::{
    Env, If, Permissions, Uses, bool_is_string, reusable_step_uses, scalar_or_vector, step_uses,
};
use crate::workflow::Defaults;

/// A "normal" job: one that runs its own `steps:` on a runner.
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case")]
pub struct NormalJob {
    /// The job's display name.
    pub name: Option<String>,
    /// The job's `permissions:`.
    #[serde(default)]
    pub permissions: Permissions,
    /// Jobs that must complete before this one.
    #[serde(default, deserialize_with = "scalar_or_vector")]
    pub needs: Vec<String>,
    /// The job's `if:` condition.
    pub r#if: Option<If>,
    /// The runner(s) the job runs on.
    pub runs_on: Option<RunsOn>,
    /// The job's `env:`.
    #[serde(default)]
    pub env: Env,
    /// The job's `defaults:`, overriding the workflow's.
    pub defaults: Option<Defaults>,
    /// The job's steps, in document order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

/// A `runs-on:` target.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum RunsOn {
    /// One label or a list of labels, e.g. `runs-on: ubuntu-latest`.
    Target(#[serde(deserialize_with = "scalar_or_vector")] Vec<String>),
    /// A runner group, optionally narrowed by labels.
    Group {
        /// The runner group's name.
        group: Option<String>,
        /// Labels selecting runners within the group.
        #[serde(default, deserialize_with = "scalar_or_vector")]
        labels: Vec<String>,
    },
}

impl RunsOn {
    /// All labels named by this target.
    pub fn labels(&self) -> &[String] {
        match self {
            RunsOn::Target(labels) => labels,
            RunsOn::Group { labels, .. } => labels,
        }
    }
}

/// A job that calls a reusable workflow.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct ReusableWorkflowCallJob {
    /// The job's display name.
    pub name: Option<String>,
    /// The job's `permissions:`.
    #[serde(default)]
    pub permissions: Permissions,
    /// Jobs that must complete before this one.
    #[serde(default, deserialize_with = "scalar_or_vector")]
    pub needs: Vec<String>,
    /// The job's `if:` condition.
    pub r#if: Option<If>,
    /// The reusable workflow being called.
    #[serde(deserialize_with = "reusable_step_uses")]
    pub uses: Uses,
    /// Inputs passed to the reusable workflow.
    #[serde(default)]
    pub with: Env,
    /// Secrets passed to the reusable workflow.
    pub secrets: Option<Secrets>,
}

/// The `inherit` keyword for `secrets:`.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum Inherit {
    /// `secrets: inherit`
    Inherit,
}

/// The `secrets:` of a reusable workflow call.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum Secrets {
    /// `secrets: inherit` passes every secret of the caller.
    Inherit(Inherit),
    /// An explicit mapping of secret names to values.
    Env(Env),
}

/// A single step within a normal job.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "kebab-case")]
pub struct Step {
    /// The step's `id:`, used to refer to it from other steps.
    pub id: Option<String>,
    /// The step's display name.
    pub name: Option<String>,
    /// The step's `if:` condition.
    pub r#if: Option<If>,
    /// The step's `env:`.
    #[serde(default)]
    pub env: Env,
    /// What the step does.
    #[serde(flatten)]
    pub body: StepBody,
}

/// The body of a step: an action invocation or a shell command.
#[derive(Deserialize, Debug)]
#[serde(untagged)]
pub enum StepBody {
    /// `uses:`, with optional `with:` inputs.
    Uses {
        /// The action being invoked.
        #[serde(deserialize_with = "step_uses")]
        uses: Uses,
        /// The action's inputs.
        #[serde(default)]
        with: Env,
    },
    /// `run:`, with an optional shell and working directory.
    Run {
        /// The command text.
        #[serde(deserialize_with = "bool_is_string")]
        run: String,
        /// The `shell:` override.
        shell: Option<String>,
        /// The `working-directory:` override.
        #[serde(rename = "working-directory")]
        working_directory: Option<String>,
    },
}
