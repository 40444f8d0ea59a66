//! Test harness for ghlint rules.
//!
//! Every `check*` function loads a document, runs a rule over it and
//! asserts that the rule only reported issues it declares in
//! [`Rule::issues`]. Anything that goes wrong along the way is a panic, so
//! the surrounding test fails at the call site.
//!
//! Set `GHLINT_DEBUG=1` to log each checked document and its findings.

use std::{collections::HashSet, sync::LazyLock};

use ghlint::{
    finding::Finding,
    models::{File, InputKey},
    rule::Rule,
};
use self_cell::self_cell;

/// The file name documents are checked under unless one is given.
pub const DEFAULT_FILE_NAME: &str = "test.yml";

type Findings<'a> = Vec<Finding<'a>>;

self_cell!(
    /// A checked document, along with the findings reported against it.
    pub struct Checked {
        owner: File,

        #[covariant]
        dependent: Findings,
    }

    impl {Debug}
);

impl Checked {
    pub fn file(&self) -> &File {
        self.borrow_owner()
    }

    /// Every finding, in the order the rule reported them.
    pub fn findings(&self) -> &[Finding<'_>] {
        self.borrow_dependent()
    }
}

static DEBUG: LazyLock<bool> = LazyLock::new(|| {
    let enabled = std::env::var("GHLINT_DEBUG").is_ok_and(|v| v == "true" || v == "1");

    if enabled {
        // Another harness user may have installed one already.
        let _ = tracing_subscriber::fmt()
            .with_test_writer()
            .with_max_level(tracing::Level::DEBUG)
            .try_init();
    }

    enabled
});

/// Whether `GHLINT_DEBUG` is set, read once per process.
pub fn is_debug_enabled() -> bool {
    *DEBUG
}

/// Loads `yaml` as [`DEFAULT_FILE_NAME`] with validation and checks it with `rule`.
#[track_caller]
pub fn check(rule: &dyn Rule, yaml: &str) -> Checked {
    check_named(rule, yaml, DEFAULT_FILE_NAME)
}

/// Like [`check`], but under the given file name, which determines the
/// workflow's id.
#[track_caller]
pub fn check_named(rule: &dyn Rule, yaml: &str, file_name: &str) -> Checked {
    let file = match File::from_string(yaml, key(file_name)) {
        Ok(file) => file,
        Err(e) => panic!("failed to load {file_name}: {e:#}"),
    };

    run(rule, file, yaml)
}

/// Loads `yaml` as [`DEFAULT_FILE_NAME`] without validation and checks it
/// with `rule`.
///
/// Use this for documents GitHub would reject but the model can still
/// represent.
#[track_caller]
pub fn check_unsafe(rule: &dyn Rule, yaml: &str) -> Checked {
    check_unsafe_named(rule, yaml, DEFAULT_FILE_NAME)
}

/// Like [`check_unsafe`], but under the given file name.
#[track_caller]
pub fn check_unsafe_named(rule: &dyn Rule, yaml: &str, file_name: &str) -> Checked {
    let file = match File::from_string_unvalidated(yaml, key(file_name)) {
        Ok(file) => file,
        Err(e) => panic!("failed to load {file_name}: {e:#}"),
    };

    run(rule, file, yaml)
}

#[track_caller]
fn key(file_name: &str) -> InputKey {
    match InputKey::new(file_name) {
        Ok(key) => key,
        Err(e) => panic!("bad file name `{file_name}`: {e}"),
    }
}

#[track_caller]
fn run(rule: &dyn Rule, file: File, yaml: &str) -> Checked {
    let debug = is_debug_enabled();
    if debug {
        tracing::debug!(
            "checking {key} with {rule}:\n{yaml}",
            key = file.key(),
            rule = rule.name()
        );
    }

    let checked = match Checked::try_new(file, |file| rule.check(file)) {
        Ok(checked) => checked,
        Err(e) => panic!("{rule} failed: {e:#}", rule = rule.name()),
    };

    if debug {
        for finding in checked.findings() {
            tracing::debug!(
                "{location}: [{id}] {message}",
                location = finding.location(),
                id = finding.id(),
                message = finding.message()
            );
        }
    }

    assert_findings_producible_by_rule(checked.findings(), rule);
    checked
}

/// Panics if any of `findings` is of an issue `rule` doesn't declare.
#[track_caller]
pub fn assert_findings_producible_by_rule(findings: &[Finding<'_>], rule: &dyn Rule) {
    for finding in findings {
        if !rule.issues().contains(&finding.issue()) {
            panic!(
                "{rule} reported {id}, which isn't one of its issues ({declared}): {location}: {message}",
                rule = rule.name(),
                id = finding.id(),
                declared = rule
                    .issues()
                    .iter()
                    .map(|issue| issue.id)
                    .collect::<Vec<_>>()
                    .join(", "),
                location = finding.location(),
                message = finding.message(),
            );
        }
    }
}

/// Validates the static metadata of `rule`: every issue needs a unique id,
/// a title and a description, and its examples must behave as labelled.
#[track_caller]
pub fn test_metadata(rule: &dyn Rule) {
    let name = rule.name();
    assert!(!name.is_empty(), "rule has an empty name");
    assert!(!rule.issues().is_empty(), "{name} declares no issues");

    let mut ids = HashSet::new();
    for issue in rule.issues() {
        assert!(!issue.id.is_empty(), "{name} has an issue with an empty id");
        assert!(ids.insert(issue.id), "{name} declares {} twice", issue.id);
        assert!(!issue.title.is_empty(), "{} has an empty title", issue.id);
        assert!(
            !issue.description.is_empty(),
            "{} has an empty description",
            issue.id
        );

        for example in issue.compliant {
            let checked = check_named(rule, example.content, example.path);
            let count = count_of(checked.findings(), issue.id);
            assert!(
                count == 0,
                "compliant example of {id} reported {count} finding(s):\n{content}",
                id = issue.id,
                content = example.content,
            );
        }

        for example in issue.non_compliant {
            let checked = check_named(rule, example.content, example.path);
            assert!(
                count_of(checked.findings(), issue.id) > 0,
                "non-compliant example of {id} reported nothing:\n{content}",
                id = issue.id,
                content = example.content,
            );
        }
    }
}

fn count_of(findings: &[Finding<'_>], id: &str) -> usize {
    findings.iter().filter(|f| f.id() == id).count()
}

fn render(findings: &[Finding<'_>]) -> String {
    findings
        .iter()
        .map(|f| format!("  [{id}] {message}", id = f.id(), message = f.message()))
        .collect::<Vec<_>>()
        .join("\n")
}

#[track_caller]
pub fn assert_no_findings(findings: &[Finding<'_>]) {
    assert!(
        findings.is_empty(),
        "expected no findings, got {}:\n{}",
        findings.len(),
        render(findings)
    );
}

/// Asserts that `findings` is exactly one finding of `id` with `message`.
#[track_caller]
pub fn assert_single_finding(findings: &[Finding<'_>], id: &str, message: &str) {
    assert!(
        findings.len() == 1,
        "expected a single finding, got {}:\n{}",
        findings.len(),
        render(findings)
    );
    assert_eq!((findings[0].id(), findings[0].message()), (id, message));
}

/// Asserts that at least one of `findings` is of `id` with `message`.
#[track_caller]
pub fn assert_has_finding(findings: &[Finding<'_>], id: &str, message: &str) {
    assert!(
        findings
            .iter()
            .any(|f| f.id() == id && f.message() == message),
        "expected [{id}] {message}, got:\n{}",
        render(findings)
    );
}
