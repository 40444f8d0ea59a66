//! The traversal protocol rules use to walk a [`File`].
//!
//! [`WorkflowVisitor`] has one `visit_*` hook per node type. Every hook
//! defaults to its `super_*` counterpart, which holds the default traversal:
//! a single depth-first, pre-order walk of
//! `File -> Workflow -> Job -> Step`, in document order.
//!
//! An override that wants the walk to continue below its node must call the
//! matching `super_*` method itself; nothing is chained around it.
//!
//! ```rust
//! use ghlint::finding::Reporting;
//! use ghlint::models::workflow::{JobCommon as _, NormalJob};
//! use ghlint::visitor::{VisitError, WorkflowVisitor};
//!
//! struct JobCounter;
//!
//! impl WorkflowVisitor for JobCounter {
//!     fn visit_normal_job<'doc>(
//!         &self,
//!         reporting: &mut Reporting<'doc>,
//!         job: &NormalJob<'doc>,
//!     ) -> Result<(), VisitError> {
//!         tracing::info!("visiting {}", job.id());
//!         // Keep walking into the job's steps.
//!         self.super_normal_job(reporting, job)
//!     }
//! }
//! ```

use thiserror::Error;

use crate::{
    finding::Reporting,
    models::{
        File, FileContent,
        workflow::{Job, Node, NormalJob, ReusableWorkflowCallJob, Run, Step, Uses, Workflow},
    },
};

/// A failure that aborts a traversal.
#[derive(Debug, Error)]
pub enum VisitError {
    /// An abstract [`Job::BaseJob`] or [`Step::BaseStep`] was dispatched.
    ///
    /// Loading never produces these, so this always indicates a bug in
    /// model construction rather than a problem with the document.
    #[error("can't dispatch {target}: it is an abstract {kind}")]
    AbstractVariant {
        /// `job` or `step`.
        kind: &'static str,
        /// The label of the offending node.
        target: String,
    },
    /// A rule chose to propagate a failure instead of treating it as
    /// "no finding".
    #[error("rule failed while visiting {target}")]
    Rule {
        /// The label of the node being visited.
        target: String,
        #[source]
        source: anyhow::Error,
    },
}

impl VisitError {
    /// Wraps a rule-local failure that occurred while visiting `node`.
    pub fn rule<'doc>(node: impl Into<Node<'doc>>, source: anyhow::Error) -> Self {
        Self::Rule {
            target: node.into().to_string(),
            source,
        }
    }

    fn abstract_variant<'doc>(kind: &'static str, node: impl Into<Node<'doc>>) -> Self {
        Self::AbstractVariant {
            kind,
            target: node.into().to_string(),
        }
    }
}

/// A visitor over the nodes of a [`File`].
///
/// All hooks take `&self`: visitors are expected to be stateless, and to
/// record what they find through the [`Reporting`] sink.
pub trait WorkflowVisitor {
    /// Visit a file. This is the entry point of a traversal.
    fn visit_file<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        file: &'doc File,
    ) -> Result<(), VisitError> {
        self.super_file(reporting, file)
    }

    /// Visit a workflow.
    fn visit_workflow<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        workflow: &'doc Workflow,
    ) -> Result<(), VisitError> {
        self.super_workflow(reporting, workflow)
    }

    /// Visit a job of any kind.
    fn visit_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: Job<'doc>,
    ) -> Result<(), VisitError> {
        self.super_job(reporting, job)
    }

    /// Visit a normal job.
    fn visit_normal_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: &NormalJob<'doc>,
    ) -> Result<(), VisitError> {
        self.super_normal_job(reporting, job)
    }

    /// Visit a reusable workflow call job.
    fn visit_reusable_workflow_call_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: &ReusableWorkflowCallJob<'doc>,
    ) -> Result<(), VisitError> {
        self.super_reusable_workflow_call_job(reporting, job)
    }

    /// Visit a step of any kind.
    fn visit_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: Step<'doc>,
    ) -> Result<(), VisitError> {
        self.super_step(reporting, step)
    }

    /// Visit a `run:` step.
    fn visit_run_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: &Run<'doc>,
    ) -> Result<(), VisitError> {
        self.super_run_step(reporting, step)
    }

    /// Visit a `uses:` step.
    fn visit_uses_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: &Uses<'doc>,
    ) -> Result<(), VisitError> {
        self.super_uses_step(reporting, step)
    }

    // Super methods hold the default traversal and are not meant to be overridden.

    /// Default traversal for files.
    ///
    /// Dispatches on the file's content.
    fn super_file<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        file: &'doc File,
    ) -> Result<(), VisitError> {
        match file.content() {
            FileContent::Workflow(workflow) => self.visit_workflow(reporting, workflow),
        }
    }

    /// Default traversal for workflows.
    ///
    /// Visits every job, in document order.
    fn super_workflow<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        workflow: &'doc Workflow,
    ) -> Result<(), VisitError> {
        for job in workflow.jobs() {
            self.visit_job(reporting, job)?;
        }
        Ok(())
    }

    /// Default traversal for jobs.
    ///
    /// Dispatches on the job's variant, and fails on [`Job::BaseJob`].
    fn super_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: Job<'doc>,
    ) -> Result<(), VisitError> {
        match job {
            Job::NormalJob(normal) => self.visit_normal_job(reporting, &normal),
            Job::ReusableWorkflowCallJob(reusable) => {
                self.visit_reusable_workflow_call_job(reporting, &reusable)
            }
            Job::BaseJob(_) => Err(VisitError::abstract_variant("job", job)),
        }
    }

    /// Default traversal for normal jobs.
    ///
    /// Visits every step, in order.
    fn super_normal_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: &NormalJob<'doc>,
    ) -> Result<(), VisitError> {
        for step in job.steps() {
            self.visit_step(reporting, step)?;
        }
        Ok(())
    }

    /// Terminal for `visit_reusable_workflow_call_job`.
    fn super_reusable_workflow_call_job<'doc>(
        &self,
        _reporting: &mut Reporting<'doc>,
        _job: &ReusableWorkflowCallJob<'doc>,
    ) -> Result<(), VisitError> {
        Ok(())
    }

    /// Default traversal for steps.
    ///
    /// Dispatches on the step's variant, and fails on [`Step::BaseStep`].
    fn super_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: Step<'doc>,
    ) -> Result<(), VisitError> {
        match step {
            Step::Run(run) => self.visit_run_step(reporting, &run),
            Step::Uses(uses) => self.visit_uses_step(reporting, &uses),
            Step::BaseStep(_) => Err(VisitError::abstract_variant("step", step)),
        }
    }

    /// Terminal for `visit_run_step`.
    fn super_run_step<'doc>(
        &self,
        _reporting: &mut Reporting<'doc>,
        _step: &Run<'doc>,
    ) -> Result<(), VisitError> {
        Ok(())
    }

    /// Terminal for `visit_uses_step`.
    fn super_uses_step<'doc>(
        &self,
        _reporting: &mut Reporting<'doc>,
        _step: &Uses<'doc>,
    ) -> Result<(), VisitError> {
        Ok(())
    }
}
