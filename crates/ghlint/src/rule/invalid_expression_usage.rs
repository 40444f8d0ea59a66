//! Detects GitHub expressions in `uses:`, where they're never evaluated.

use crate::{
    finding::Reporting,
    models::workflow::Uses,
    rule::{Example, Issue, VisitorRule},
    utils::contains_expression,
    visitor::{VisitError, WorkflowVisitor},
};

pub static INVALID_EXPRESSION_USAGE: Issue = Issue {
    id: "InvalidExpressionUsage",
    title: "Expression used in a field that doesn't support it.",
    description: "\
GitHub resolves `uses:` before any expression is evaluated, so a value like \
`actions/checkout@${{ github.sha }}` is taken literally and the workflow \
fails to start. Reference a fixed tag, branch or commit instead.",
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
      - uses: actions/checkout@${{ github.sha }}
"#,
    }],
};

pub struct InvalidExpressionUsageRule;

impl VisitorRule for InvalidExpressionUsageRule {
    fn name(&self) -> &'static str {
        "InvalidExpressionUsageRule"
    }

    fn issues(&self) -> &'static [&'static Issue] {
        static ISSUES: &[&Issue] = &[&INVALID_EXPRESSION_USAGE];
        ISSUES
    }
}

impl WorkflowVisitor for InvalidExpressionUsageRule {
    fn visit_uses_step<'doc>(
        &self,
        reporting: &mut Reporting<'doc>,
        step: &Uses<'doc>,
    ) -> Result<(), VisitError> {
        if contains_expression(&step.uses().raw()) {
            reporting.report(&INVALID_EXPRESSION_USAGE, step, |it| {
                format!("{it} uses a GitHub expression in the uses field.")
            });
        }

        self.super_uses_step(reporting, step)
    }
}
