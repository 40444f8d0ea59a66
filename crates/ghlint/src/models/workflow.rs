//! GitHub Actions workflow models.
//!
//! These models enrich the models under [`ghlint_models::workflow`],
//! providing the borrowed views that the visitor walks.

use std::fmt::{self, Display};

use anyhow::Context as _;
use ghlint_models::{
    common::{self, Env, If},
    workflow::{self, job},
};

use crate::{
    models::{InputError, permissions::Permissions},
    utils::{WORKFLOW_VALIDATOR, from_str_with_validation},
};

/// Represents an entire GitHub Actions workflow.
///
/// This type implements [`std::ops::Deref`] for [`workflow::Workflow`],
/// providing access to the underlying data model.
pub struct Workflow {
    /// The workflow's logical id, i.e. its file stem.
    id: String,
    inner: workflow::Workflow,
}

impl fmt::Debug for Workflow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Workflow[{id}]", id = self.id)
    }
}

impl std::ops::Deref for Workflow {
    type Target = workflow::Workflow;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Workflow {
    /// Load a workflow from a buffer, validating it against the workflow
    /// schema and then for internal consistency.
    pub(crate) fn from_string(contents: &str, id: &str) -> Result<Self, InputError> {
        let inner = from_str_with_validation(contents, &WORKFLOW_VALIDATOR)?;
        let workflow = Self::new(id, inner);
        workflow.check_needs()?;

        Ok(workflow)
    }

    /// Load a workflow from a buffer, with no validation beyond what
    /// deserialization itself requires.
    pub(crate) fn from_string_unvalidated(contents: &str, id: &str) -> Result<Self, InputError> {
        match serde_yaml::from_str(contents) {
            Ok(inner) => Ok(Self::new(id, inner)),
            // Re-parse as a plain value to tell syntax errors apart from
            // documents that are valid YAML but don't fit the model.
            Err(e) => match serde_yaml::from_str::<serde_yaml::Value>(contents) {
                Ok(_) => Err(e)
                    .context("input does not fit the workflow model")
                    .map_err(InputError::Model),
                Err(e) => Err(InputError::Syntax(e.into())),
            },
        }
    }

    pub(crate) fn new(id: &str, inner: workflow::Workflow) -> Self {
        Self {
            id: id.into(),
            inner,
        }
    }

    /// Every `needs:` entry must name a job in this workflow.
    fn check_needs(&self) -> Result<(), InputError> {
        for (id, job) in &self.inner.jobs {
            if let Some(missing) = job
                .needs()
                .iter()
                .find(|need| !self.inner.jobs.contains_key(need.as_str()))
            {
                return Err(InputError::Invalid(format!(
                    "job `{id}` needs `{missing}`, which does not exist"
                )));
            }
        }

        Ok(())
    }

    /// This workflow's logical id, i.e. the stem of the file it came from.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// This workflow's display `name:`, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.inner.name.as_deref()
    }

    /// A [`Jobs`] iterator over this workflow's constituent [`Job`]s,
    /// in document order.
    pub fn jobs(&self) -> Jobs<'_> {
        Jobs::new(self)
    }

    /// The job with the given id, if there is one.
    pub fn job(&self, id: &str) -> Option<Job<'_>> {
        self.inner
            .jobs
            .get_key_value(id)
            .map(|(id, job)| Job::new(id, job, self))
    }

    /// The workflow's top-level permissions, or `None` when it doesn't
    /// declare any.
    pub fn permissions(&self) -> Option<Permissions> {
        Permissions::from_model(&self.inner.permissions)
    }

    /// The workflow's `defaults.run.shell`, if set.
    pub fn default_shell(&self) -> Option<&str> {
        run_defaults(self.inner.defaults.as_ref()).and_then(|run| run.shell.as_deref())
    }

    /// The workflow's `defaults.run.working-directory`, if set.
    pub fn default_working_directory(&self) -> Option<&str> {
        run_defaults(self.inner.defaults.as_ref())
            .and_then(|run| run.working_directory.as_deref())
    }
}

fn run_defaults(defaults: Option<&workflow::Defaults>) -> Option<&workflow::RunDefaults> {
    defaults.and_then(|defaults| defaults.run.as_ref())
}

/// Common behavior across every kind of job.
pub trait JobCommon<'doc> {
    /// The job's unique ID (i.e., its key in the workflow's `jobs:` block).
    fn id(&self) -> &'doc str;

    /// The job's name, if it has one.
    fn name(&self) -> Option<&'doc str>;

    /// The ids of the jobs this job depends on.
    fn needs(&self) -> &'doc [String];

    /// The job's `if:` condition, if it has one.
    fn condition(&self) -> Option<&'doc If>;

    /// The job's own permissions, or `None` when it doesn't declare any.
    fn permissions(&self) -> Option<Permissions>;

    /// The job's parent [`Workflow`].
    fn parent(&self) -> &'doc Workflow;
}

/// The abstract job.
///
/// Loading never produces this variant: it only exists so that [`Job`] has
/// a common supertype, and dispatching it is a contract violation.
#[derive(Clone, Copy)]
pub struct BaseJob<'doc> {
    id: &'doc str,
    parent: &'doc Workflow,
}

impl<'doc> BaseJob<'doc> {
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn new(id: &'doc str, parent: &'doc Workflow) -> Self {
        Self { id, parent }
    }
}

impl<'doc> JobCommon<'doc> for BaseJob<'doc> {
    fn id(&self) -> &'doc str {
        self.id
    }

    fn name(&self) -> Option<&'doc str> {
        None
    }

    fn needs(&self) -> &'doc [String] {
        &[]
    }

    fn condition(&self) -> Option<&'doc If> {
        None
    }

    fn permissions(&self) -> Option<Permissions> {
        None
    }

    fn parent(&self) -> &'doc Workflow {
        self.parent
    }
}

/// Represents a single "normal" GitHub Actions job.
#[derive(Clone, Copy)]
pub struct NormalJob<'doc> {
    /// The job's unique ID (i.e., its key in the workflow's `jobs:` block).
    id: &'doc str,
    /// The underlying job.
    inner: &'doc job::NormalJob,
    /// The job's parent [`Workflow`].
    parent: &'doc Workflow,
}

impl<'doc> NormalJob<'doc> {
    pub(crate) fn new(id: &'doc str, inner: &'doc job::NormalJob, parent: &'doc Workflow) -> Self {
        Self { id, inner, parent }
    }

    /// The labels of the runner(s) this job runs on.
    pub fn runs_on(&self) -> &'doc [String] {
        self.inner
            .runs_on
            .as_ref()
            .map(job::RunsOn::labels)
            .unwrap_or_default()
    }

    /// The job's own `defaults.run.shell`, if set.
    pub fn default_shell(&self) -> Option<&'doc str> {
        run_defaults(self.inner.defaults.as_ref()).and_then(|run| run.shell.as_deref())
    }

    /// The job's own `defaults.run.working-directory`, if set.
    pub fn default_working_directory(&self) -> Option<&'doc str> {
        run_defaults(self.inner.defaults.as_ref())
            .and_then(|run| run.working_directory.as_deref())
    }

    /// The job's `env:`.
    pub fn env(&self) -> &'doc Env {
        &self.inner.env
    }

    /// An iterator of this job's constituent [`Step`]s.
    pub fn steps(&self) -> Steps<'doc> {
        Steps::new(*self)
    }
}

impl<'doc> JobCommon<'doc> for NormalJob<'doc> {
    fn id(&self) -> &'doc str {
        self.id
    }

    fn name(&self) -> Option<&'doc str> {
        self.inner.name.as_deref()
    }

    fn needs(&self) -> &'doc [String] {
        &self.inner.needs
    }

    fn condition(&self) -> Option<&'doc If> {
        self.inner.r#if.as_ref()
    }

    fn permissions(&self) -> Option<Permissions> {
        Permissions::from_model(&self.inner.permissions)
    }

    fn parent(&self) -> &'doc Workflow {
        self.parent
    }
}

impl<'doc> std::ops::Deref for NormalJob<'doc> {
    type Target = &'doc job::NormalJob;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Represents a reusable workflow call job.
#[derive(Clone, Copy)]
pub struct ReusableWorkflowCallJob<'doc> {
    /// The job's unique ID (i.e., its key in the workflow's `jobs:` block).
    id: &'doc str,
    /// The underlying job.
    inner: &'doc job::ReusableWorkflowCallJob,
    /// The job's parent [`Workflow`].
    parent: &'doc Workflow,
}

impl<'doc> ReusableWorkflowCallJob<'doc> {
    pub(crate) fn new(
        id: &'doc str,
        inner: &'doc job::ReusableWorkflowCallJob,
        parent: &'doc Workflow,
    ) -> Self {
        Self { id, inner, parent }
    }

    /// The reusable workflow being called.
    pub fn uses(&self) -> &'doc common::Uses {
        &self.inner.uses
    }

    /// The inputs passed to the called workflow.
    pub fn with(&self) -> &'doc Env {
        &self.inner.with
    }

    /// The secrets passed to the called workflow.
    pub fn secrets(&self) -> Option<&'doc job::Secrets> {
        self.inner.secrets.as_ref()
    }
}

impl<'doc> JobCommon<'doc> for ReusableWorkflowCallJob<'doc> {
    fn id(&self) -> &'doc str {
        self.id
    }

    fn name(&self) -> Option<&'doc str> {
        self.inner.name.as_deref()
    }

    fn needs(&self) -> &'doc [String] {
        &self.inner.needs
    }

    fn condition(&self) -> Option<&'doc If> {
        self.inner.r#if.as_ref()
    }

    fn permissions(&self) -> Option<Permissions> {
        Permissions::from_model(&self.inner.permissions)
    }

    fn parent(&self) -> &'doc Workflow {
        self.parent
    }
}

impl<'doc> std::ops::Deref for ReusableWorkflowCallJob<'doc> {
    type Target = &'doc job::ReusableWorkflowCallJob;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

/// Represents a single GitHub Actions job.
#[derive(Clone, Copy)]
pub enum Job<'doc> {
    BaseJob(BaseJob<'doc>),
    NormalJob(NormalJob<'doc>),
    ReusableWorkflowCallJob(ReusableWorkflowCallJob<'doc>),
}

impl<'doc> Job<'doc> {
    fn new(id: &'doc str, inner: &'doc workflow::Job, parent: &'doc Workflow) -> Self {
        match inner {
            workflow::Job::NormalJob(normal) => Job::NormalJob(NormalJob::new(id, normal, parent)),
            workflow::Job::ReusableWorkflowCallJob(reusable) => {
                Job::ReusableWorkflowCallJob(ReusableWorkflowCallJob::new(id, reusable, parent))
            }
        }
    }

    fn common(&self) -> &dyn JobCommon<'doc> {
        match self {
            Job::BaseJob(job) => job,
            Job::NormalJob(job) => job,
            Job::ReusableWorkflowCallJob(job) => job,
        }
    }
}

impl<'doc> JobCommon<'doc> for Job<'doc> {
    fn id(&self) -> &'doc str {
        self.common().id()
    }

    fn name(&self) -> Option<&'doc str> {
        self.common().name()
    }

    fn needs(&self) -> &'doc [String] {
        self.common().needs()
    }

    fn condition(&self) -> Option<&'doc If> {
        self.common().condition()
    }

    fn permissions(&self) -> Option<Permissions> {
        self.common().permissions()
    }

    fn parent(&self) -> &'doc Workflow {
        self.common().parent()
    }
}

/// An iterable container for jobs within a [`Workflow`].
pub struct Jobs<'doc> {
    parent: &'doc Workflow,
    inner: indexmap::map::Iter<'doc, String, workflow::Job>,
}

impl<'doc> Jobs<'doc> {
    fn new(workflow: &'doc Workflow) -> Self {
        Self {
            parent: workflow,
            inner: workflow.inner.jobs.iter(),
        }
    }
}

impl<'doc> Iterator for Jobs<'doc> {
    type Item = Job<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(id, job)| Job::new(id, job, self.parent))
    }
}

/// Common behavior across every kind of step.
pub trait StepCommon<'doc> {
    /// The step's ordinal position within its job.
    fn index(&self) -> usize;

    /// The step's `id:`, if it has one.
    fn id(&self) -> Option<&'doc str>;

    /// The step's `name:`, if it has one.
    fn name(&self) -> Option<&'doc str>;

    /// The step's `if:` condition, if it has one.
    fn condition(&self) -> Option<&'doc If>;

    /// The step's parent [`NormalJob`].
    fn job(&self) -> NormalJob<'doc>;
}

/// The abstract step.
///
/// Like [`BaseJob`], this is never produced by loading.
#[derive(Clone, Copy)]
pub struct BaseStep<'doc> {
    index: usize,
    job: NormalJob<'doc>,
}

impl<'doc> BaseStep<'doc> {
    #[cfg_attr(not(test), allow(dead_code))]
    pub(crate) fn new(index: usize, job: NormalJob<'doc>) -> Self {
        Self { index, job }
    }
}

impl<'doc> StepCommon<'doc> for BaseStep<'doc> {
    fn index(&self) -> usize {
        self.index
    }

    fn id(&self) -> Option<&'doc str> {
        None
    }

    fn name(&self) -> Option<&'doc str> {
        None
    }

    fn condition(&self) -> Option<&'doc If> {
        None
    }

    fn job(&self) -> NormalJob<'doc> {
        self.job
    }
}

/// The position and parentage shared by concrete steps.
#[derive(Clone, Copy)]
struct StepHeader<'doc> {
    index: usize,
    inner: &'doc job::Step,
    job: NormalJob<'doc>,
}

impl<'doc> StepCommon<'doc> for StepHeader<'doc> {
    fn index(&self) -> usize {
        self.index
    }

    fn id(&self) -> Option<&'doc str> {
        self.inner.id.as_deref()
    }

    fn name(&self) -> Option<&'doc str> {
        self.inner.name.as_deref()
    }

    fn condition(&self) -> Option<&'doc If> {
        self.inner.r#if.as_ref()
    }

    fn job(&self) -> NormalJob<'doc> {
        self.job
    }
}

/// A `run:` step.
#[derive(Clone, Copy)]
pub struct Run<'doc> {
    header: StepHeader<'doc>,
    run: &'doc str,
    shell: Option<&'doc str>,
    working_directory: Option<&'doc str>,
}

impl<'doc> Run<'doc> {
    /// The command text.
    pub fn run(&self) -> &'doc str {
        self.run
    }

    /// The step's own `shell:`, if set.
    pub fn shell(&self) -> Option<&'doc str> {
        self.shell
    }

    /// The step's own `working-directory:`, if set.
    pub fn working_directory(&self) -> Option<&'doc str> {
        self.working_directory
    }

    /// The step's `env:`.
    pub fn env(&self) -> &'doc Env {
        &self.header.inner.env
    }
}

/// A `uses:` step.
#[derive(Clone, Copy)]
pub struct Uses<'doc> {
    header: StepHeader<'doc>,
    uses: &'doc common::Uses,
    with: &'doc Env,
}

impl<'doc> Uses<'doc> {
    /// The action this step invokes.
    pub fn uses(&self) -> &'doc common::Uses {
        self.uses
    }

    /// The inputs passed to the action.
    pub fn with(&self) -> &'doc Env {
        self.with
    }

    /// The step's `env:`.
    pub fn env(&self) -> &'doc Env {
        &self.header.inner.env
    }
}

macro_rules! delegate_step_common {
    ($ty:ident) => {
        impl<'doc> StepCommon<'doc> for $ty<'doc> {
            fn index(&self) -> usize {
                self.header.index()
            }

            fn id(&self) -> Option<&'doc str> {
                self.header.id()
            }

            fn name(&self) -> Option<&'doc str> {
                self.header.name()
            }

            fn condition(&self) -> Option<&'doc If> {
                self.header.condition()
            }

            fn job(&self) -> NormalJob<'doc> {
                self.header.job()
            }
        }
    };
}

delegate_step_common!(Run);
delegate_step_common!(Uses);

/// Represents a single step in a normal job.
#[derive(Clone, Copy)]
pub enum Step<'doc> {
    BaseStep(BaseStep<'doc>),
    Run(Run<'doc>),
    Uses(Uses<'doc>),
}

impl<'doc> Step<'doc> {
    fn new(index: usize, inner: &'doc job::Step, job: NormalJob<'doc>) -> Self {
        let header = StepHeader { index, inner, job };

        match &inner.body {
            job::StepBody::Run {
                run,
                shell,
                working_directory,
            } => Step::Run(Run {
                header,
                run,
                shell: shell.as_deref(),
                working_directory: working_directory.as_deref(),
            }),
            job::StepBody::Uses { uses, with } => Step::Uses(Uses { header, uses, with }),
        }
    }

    fn common(&self) -> &dyn StepCommon<'doc> {
        match self {
            Step::BaseStep(step) => step,
            Step::Run(step) => step,
            Step::Uses(step) => step,
        }
    }
}

impl<'doc> StepCommon<'doc> for Step<'doc> {
    fn index(&self) -> usize {
        self.common().index()
    }

    fn id(&self) -> Option<&'doc str> {
        self.common().id()
    }

    fn name(&self) -> Option<&'doc str> {
        self.common().name()
    }

    fn condition(&self) -> Option<&'doc If> {
        self.common().condition()
    }

    fn job(&self) -> NormalJob<'doc> {
        self.common().job()
    }
}

/// An iterable container for steps within a [`NormalJob`].
pub struct Steps<'doc> {
    inner: std::iter::Enumerate<std::slice::Iter<'doc, job::Step>>,
    parent: NormalJob<'doc>,
}

impl<'doc> Steps<'doc> {
    fn new(job: NormalJob<'doc>) -> Self {
        Self {
            inner: job.inner.steps.iter().enumerate(),
            parent: job,
        }
    }
}

impl<'doc> Iterator for Steps<'doc> {
    type Item = Step<'doc>;

    fn next(&mut self) -> Option<Self::Item> {
        self.inner
            .next()
            .map(|(index, step)| Step::new(index, step, self.parent))
    }
}

/// A reference to a single node in a workflow, renderable as its address
/// in the tree (e.g. `Step[#0] in Job[test]`).
#[derive(Clone, Copy)]
pub enum Node<'doc> {
    Workflow(&'doc Workflow),
    Job(Job<'doc>),
    Step(Step<'doc>),
}

impl Display for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Node::Workflow(workflow) => write!(f, "Workflow[{}]", workflow.id()),
            Node::Job(job) => write!(f, "Job[{}]", job.id()),
            Node::Step(step) => {
                write!(f, "Step[")?;
                match (step.id(), step.name(), step) {
                    (Some(id), _, _) => write!(f, "{id}")?,
                    (None, Some(name), _) => write!(f, "\"{name}\"")?,
                    (None, None, Step::Uses(uses)) => write!(f, "{}", uses.uses())?,
                    (None, None, _) => write!(f, "#{}", step.index())?,
                }
                write!(f, "] in Job[{}]", step.job().id())
            }
        }
    }
}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl<'doc> From<&'doc Workflow> for Node<'doc> {
    fn from(workflow: &'doc Workflow) -> Self {
        Node::Workflow(workflow)
    }
}

impl<'doc> From<Job<'doc>> for Node<'doc> {
    fn from(job: Job<'doc>) -> Self {
        Node::Job(job)
    }
}

impl<'doc> From<&NormalJob<'doc>> for Node<'doc> {
    fn from(job: &NormalJob<'doc>) -> Self {
        Node::Job(Job::NormalJob(*job))
    }
}

impl<'doc> From<&ReusableWorkflowCallJob<'doc>> for Node<'doc> {
    fn from(job: &ReusableWorkflowCallJob<'doc>) -> Self {
        Node::Job(Job::ReusableWorkflowCallJob(*job))
    }
}

impl<'doc> From<Step<'doc>> for Node<'doc> {
    fn from(step: Step<'doc>) -> Self {
        Node::Step(step)
    }
}

impl<'doc> From<&Run<'doc>> for Node<'doc> {
    fn from(step: &Run<'doc>) -> Self {
        Node::Step(Step::Run(*step))
    }
}

impl<'doc> From<&Uses<'doc>> for Node<'doc> {
    fn from(step: &Uses<'doc>) -> Self {
        Node::Step(Step::Uses(*step))
    }
}
