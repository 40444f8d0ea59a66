//! Detects `shell:` declarations that repeat the default they'd inherit.

use crate::{
    finding::Reporting,
    models::workflow::{JobCommon as _, Node, NormalJob, Run, StepCommon as _},
    rule::{Example, Issue, VisitorRule},
    visitor::{VisitError, WorkflowVisitor},
};

pub static REDUNDANT_DEFAULT_SHELL: Issue = Issue {
    id: "RedundantDefaultShell",
    title: "Job has the same default shell as the workflow.",
    description: "\
A job's `defaults.run.shell` that is identical to the workflow's \
`defaults.run.shell` has no effect: every job already inherits the \
workflow's defaults. Remove one of them, keeping the workflow level \
declaration if every job should use that shell.",
    compliant: &[Example {
        path: "example.yml",
        content: r#"
on: push
defaults:
  run:
    shell: bash
jobs:
  example:
    runs-on: ubuntu-latest
    steps:
      - run: echo "Example"
"#,
    }],
    non_compliant: &[Example {
        path: "example.yml",
        content: r#"
on: push
defaults:
  run:
    shell: bash
jobs:
  example:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Example"
"#,
    }],
};

pub static REDUNDANT_SHELL: Issue = Issue {
    id: "RedundantShell",
    title: "Step has the same shell as the default.",
    description: "\
A step's `shell:` that is identical to the `defaults.run.shell` it would \
otherwise use has no effect. The closest default wins: the job's, if it \
declares one, otherwise the workflow's.",
    compliant: &[
        Example {
            path: "example.yml",
            content: r#"
on: push
jobs:
  example:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Example"
"#,
        },
        Example {
            path: "example.yml",
            content: r#"
on: push
jobs:
  example:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Example"
        shell: sh
"#,
        },
    ],
    non_compliant: &[
        Example {
            path: "example.yml",
            content: r#"
on: push
jobs:
  example:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Example"
        shell: bash
"#,
        },
        Example {
            path: "example.yml",
            content: r#"
on: push
defaults:
  run:
    shell: bash
jobs:
  example:
    runs-on: ubuntu-latest
    steps:
      - run: echo "Example"
        shell: bash
"#,
        },
    ],
};

pub struct RedundantShellRule;

impl VisitorRule for RedundantShellRule {
    fn name(&self) -> &'static str {
        "RedundantShellRule"
    }

    fn issues(&self) -> &'static [&'static Issue] {
        static ISSUES: &[&Issue] = &[&REDUNDANT_DEFAULT_SHELL, &REDUNDANT_SHELL];
        ISSUES
    }
}

impl WorkflowVisitor for RedundantShellRule {
    fn visit_normal_job<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        job: &NormalJob<'doc>,
    ) -> Result<(), VisitError> {
        let workflow = job.parent();

        if let (Some(job_shell), Some(workflow_shell)) =
            (job.default_shell(), workflow.default_shell())
            && job_shell == workflow_shell
        {
            reporting.report(&REDUNDANT_DEFAULT_SHELL, job, |it| {
                format!(
                    "Both {it} and {workflow} has {job_shell} shell as default, \
                     one of them can be removed.",
                    workflow = Node::from(workflow)
                )
            });
        }

        self.super_normal_job(reporting, job)
    }

    fn visit_run_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: &Run<'doc>,
    ) -> Result<(), VisitError> {
        let Some(shell) = step.shell() else {
            return self.super_run_step(reporting, step);
        };

        let job = step.job();
        let closest = match job.default_shell() {
            Some(default) => Some((default, Node::from(&job))),
            None => job
                .parent()
                .default_shell()
                .map(|default| (default, Node::from(job.parent()))),
        };

        if let Some((default, owner)) = closest
            && default == shell
        {
            reporting.report(&REDUNDANT_SHELL, step, |it| {
                format!("Both {it} and {owner} has {shell} shell, the step's shell can be removed.")
            });
        }

        self.super_run_step(reporting, step)
    }
}
