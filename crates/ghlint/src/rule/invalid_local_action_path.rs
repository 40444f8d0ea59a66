//! Detects local `./` references to actions or reusable workflows that
//! don't exist in the repository.
//!
//! References are resolved against the repository root the rule is created
//! with. A reference only counts as missing when the filesystem says so,
//! either because nothing is there or because a parent component is a file.
//! Any other I/O failure makes the check inconclusive, which is logged and
//! reported as no finding.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use ghlint_models::common;

use crate::{
    finding::Reporting,
    models::workflow::{Node, ReusableWorkflowCallJob, Uses},
    rule::{Example, Issue, RuleState, VisitorRule},
    utils::contains_expression,
    visitor::{VisitError, WorkflowVisitor},
};

pub static INVALID_LOCAL_ACTION_PATH: Issue = Issue {
    id: "InvalidLocalActionPath",
    title: "Local action reference is invalid.",
    description: "\
Referencing an action that does not exist is an error: the workflow's \
dependencies can't be satisfied, so GitHub refuses to start it. Make sure \
every local action referenced in `uses:` exists in the repository, as a \
directory containing an `action.yml` or `action.yaml`.

GitHub may give an error similar to this:
> The workflow is not valid. `.github/workflows/???.yml` (Line: ?, Col: ?):
> Can't find 'action.yml', 'action.yaml' or 'Dockerfile' under '???'.",
    compliant: &[Example {
        path: "example.yml",
        content: r#"
on: push
jobs:
  example:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
"#,
    }],
    non_compliant: &[Example {
        path: "example.yml",
        content: r#"
on: push
jobs:
  example:
    runs-on: ubuntu-latest
    steps:
      - uses: ./.github/actions/this-action-does-not-exist
"#,
    }],
};

/// Candidate metadata files inside a local action's directory.
const ACTION_FILES: &[&str] = &["action.yml", "action.yaml", "Dockerfile"];

enum Resolution {
    Exists,
    Missing,
    Unknown(io::Error),
}

impl Resolution {
    fn from_error(e: io::Error) -> Self {
        match e.kind() {
            // `./README.md/setup` can't exist when `README.md` is a file.
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory => Self::Missing,
            _ => Self::Unknown(e),
        }
    }
}

pub struct InvalidLocalActionPathRule {
    root: Utf8PathBuf,
}

impl InvalidLocalActionPathRule {
    pub fn new(state: &RuleState) -> Self {
        Self {
            root: state.root.clone(),
        }
    }

    fn resolve_action(&self, relative: &str) -> Resolution {
        let dir = self.root.join(relative);

        match std::fs::metadata(&dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Resolution::Missing,
            Err(e) => return Resolution::from_error(e),
        }

        for candidate in ACTION_FILES {
            match resolve_file(&dir.join(candidate)) {
                Resolution::Missing => continue,
                resolution => return resolution,
            }
        }

        Resolution::Missing
    }

    fn resolve_workflow(&self, relative: &str) -> Resolution {
        resolve_file(&self.root.join(relative))
    }

    fn report_missing<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        node: Node<'doc>,
        local: &common::LocalUses,
        resolution: Resolution,
        what: &'static str,
    ) {
        match resolution {
            Resolution::Exists => {}
            Resolution::Missing => {
                reporting.report(&INVALID_LOCAL_ACTION_PATH, node, |it| {
                    format!("{it} references {what} that does not exist.")
                });
            }
            Resolution::Unknown(e) => tracing::warn!(
                "couldn't check whether {path} exists, skipping {node}: {e}",
                path = local.path
            ),
        }
    }
}

fn resolve_file(path: &Utf8Path) -> Resolution {
    match std::fs::metadata(path) {
        Ok(meta) if meta.is_file() => Resolution::Exists,
        Ok(_) => Resolution::Missing,
        Err(e) => Resolution::from_error(e),
    }
}

/// The local reference in `uses`, unless it's remote or can't be resolved
/// statically.
fn local_reference(uses: &common::Uses) -> Option<&common::LocalUses> {
    match uses {
        common::Uses::Local(local) if contains_expression(&local.path) => {
            tracing::debug!("not resolving {path}: contains an expression", path = local.path);
            None
        }
        common::Uses::Local(local) => Some(local),
        common::Uses::Repository(_) | common::Uses::Docker(_) | common::Uses::Expression(_) => {
            None
        }
    }
}

impl VisitorRule for InvalidLocalActionPathRule {
    fn name(&self) -> &'static str {
        "InvalidLocalActionPathRule"
    }

    fn issues(&self) -> &'static [&'static Issue] {
        static ISSUES: &[&Issue] = &[&INVALID_LOCAL_ACTION_PATH];
        ISSUES
    }
}

impl WorkflowVisitor for InvalidLocalActionPathRule {
    fn visit_uses_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: &Uses<'doc>,
    ) -> Result<(), VisitError> {
        if let Some(local) = local_reference(step.uses()) {
            let resolution = self.resolve_action(local.relative_path());
            self.report_missing(reporting, step.into(), local, resolution, "an action");
        }

        self.super_uses_step(reporting, step)
    }

    fn visit_reusable_workflow_call_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: &ReusableWorkflowCallJob<'doc>,
    ) -> Result<(), VisitError> {
        if let Some(local) = local_reference(job.uses()) {
            let resolution = self.resolve_workflow(local.relative_path());
            self.report_missing(
                reporting,
                job.into(),
                local,
                resolution,
                "a reusable workflow",
            );
        }

        self.super_reusable_workflow_call_job(reporting, job)
    }
}
