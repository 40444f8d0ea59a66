//! Findings and the sink rules report them to.

use std::fmt;

use serde::{Serialize, ser::SerializeStruct as _};

use crate::{models::workflow::Node, rule::Issue};

/// A single occurrence of an [`Issue`] at a specific node.
///
/// Findings can only be created through [`Reporting::report`].
pub struct Finding<'doc> {
    issue: &'static Issue,
    target: Node<'doc>,
    message: String,
}

impl<'doc> Finding<'doc> {
    /// The issue this finding is an occurrence of.
    pub fn issue(&self) -> &'static Issue {
        self.issue
    }

    /// The issue's id, e.g. `RedundantShell`.
    pub fn id(&self) -> &'static str {
        self.issue.id
    }

    /// The issue's title.
    pub fn title(&self) -> &'static str {
        self.issue.title
    }

    /// The rendered, human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// The node this finding is about.
    pub fn target(&self) -> Node<'doc> {
        self.target
    }

    /// The rendered label of the node this finding is about,
    /// e.g. `Step[#0] in Job[test]`.
    pub fn location(&self) -> String {
        self.target.to_string()
    }
}

impl fmt::Debug for Finding<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Finding")
            .field("issue", &self.issue.id)
            .field("target", &self.location())
            .field("message", &self.message)
            .finish()
    }
}

impl Serialize for Finding<'_> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut finding = serializer.serialize_struct("Finding", 4)?;
        finding.serialize_field("id", self.id())?;
        finding.serialize_field("title", self.title())?;
        finding.serialize_field("message", self.message())?;
        finding.serialize_field("location", &self.location())?;
        finding.end()
    }
}

/// Collects the findings of a single rule run over a single file.
#[derive(Default)]
pub struct Reporting<'doc> {
    findings: Vec<Finding<'doc>>,
}

impl<'doc> Reporting<'doc> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one finding of `issue` on `node`.
    ///
    /// `message` receives the node's label and builds the final message.
    /// Findings are kept in the order they're reported; nothing is
    /// deduplicated or checked against the reporting rule's declared issues.
    pub fn report(
        &mut self,
        issue: &'static Issue,
        node: impl Into<Node<'doc>>,
        message: impl FnOnce(&Node<'doc>) -> String,
    ) {
        let target = node.into();
        let message = message(&target);

        tracing::trace!(issue = issue.id, %target, "reported: {message}");

        self.findings.push(Finding {
            issue,
            target,
            message,
        });
    }

    /// The findings reported so far.
    pub fn findings(&self) -> &[Finding<'doc>] {
        &self.findings
    }

    /// Consumes the sink, returning every finding in report order.
    pub fn into_findings(self) -> Vec<Finding<'doc>> {
        self.findings
    }
}
