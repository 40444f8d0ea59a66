//! Core namespace for ghlint's rules.

use std::hash::{Hash, Hasher};

use camino::Utf8PathBuf;

use crate::{
    finding::{Finding, Reporting},
    models::File,
    visitor::{VisitError, WorkflowVisitor},
};

pub mod invalid_expression_usage;
pub mod invalid_local_action_path;
pub mod redundant_shell;

/// Static metadata for one kind of problem a rule can detect.
///
/// Issues are declared once, as `static` items next to the rule that
/// reports them. Two issues are the same issue if they have the same id.
#[derive(Debug)]
pub struct Issue {
    /// A stable id, unique across every rule, e.g. `RedundantShell`.
    pub id: &'static str,
    /// A one-line summary.
    pub title: &'static str,
    /// A longer, human-readable explanation.
    pub description: &'static str,
    /// Documents that must not produce this issue.
    pub compliant: &'static [Example],
    /// Documents that must produce this issue at least once.
    pub non_compliant: &'static [Example],
}

impl PartialEq for Issue {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Issue {}

impl Hash for Issue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl std::fmt::Display for Issue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id)
    }
}

/// A fixture document attached to an [`Issue`].
#[derive(Debug)]
pub struct Example {
    /// The file name the document is checked under, e.g. `example.yml`.
    pub path: &'static str,
    /// The document itself.
    pub content: &'static str,
}

/// Shared state that rules are constructed with.
#[derive(Debug, Clone)]
pub struct RuleState {
    /// The repository root that local `./` references are resolved against.
    pub root: Utf8PathBuf,
}

/// An analysis plugin.
///
/// Rules must be stateless while checking, so that a single instance can
/// check any number of files, from any number of threads.
pub trait Rule: Send + Sync {
    /// The rule's name, e.g. `RedundantShellRule`.
    fn name(&self) -> &'static str;

    /// Every issue this rule may ever report, in a stable order.
    fn issues(&self) -> &'static [&'static Issue];

    /// Checks a single file, returning findings in report order.
    fn check<'doc>(&self, file: &'doc File) -> Result<Vec<Finding<'doc>>, VisitError>;
}

/// A [`Rule`] that drives itself by walking the file as a [`WorkflowVisitor`].
///
/// Every `VisitorRule` is a [`Rule`], whose `check` runs
/// [`WorkflowVisitor::visit_file`] over a fresh [`Reporting`] sink.
pub trait VisitorRule: WorkflowVisitor + Send + Sync {
    /// See [`Rule::name`].
    fn name(&self) -> &'static str;

    /// See [`Rule::issues`].
    fn issues(&self) -> &'static [&'static Issue];
}

impl<T: VisitorRule> Rule for T {
    fn name(&self) -> &'static str {
        VisitorRule::name(self)
    }

    fn issues(&self) -> &'static [&'static Issue] {
        VisitorRule::issues(self)
    }

    #[tracing::instrument(skip_all, fields(rule = VisitorRule::name(self), file = %file.key()))]
    fn check<'doc>(&self, file: &'doc File) -> Result<Vec<Finding<'doc>>, VisitError> {
        let mut reporting = Reporting::new();
        self.visit_file(&mut reporting, file)?;

        let findings = reporting.into_findings();
        tracing::debug!("{} finding(s)", findings.len());
        Ok(findings)
    }
}
