use camino::Utf8Path;
use ghlint::rule::{RuleState, invalid_local_action_path::InvalidLocalActionPathRule};
use ghlint_testing::{assert_no_findings, assert_single_finding, check, test_metadata};
use tempfile::TempDir;

/// A repository root with a couple of local actions and a reusable workflow.
fn repository() -> (TempDir, InvalidLocalActionPathRule) {
    let root = tempfile::tempdir().unwrap();
    let path = Utf8Path::from_path(root.path()).unwrap();

    for (file, content) in [
        (".github/actions/some-valid-action/action.yml", "runs: {}"),
        (".github/actions/yaml-action/action.yaml", "runs: {}"),
        (".github/actions/docker-action/Dockerfile", "FROM scratch"),
        (".github/actions/empty-action/README.md", "nothing here"),
        (".github/workflows/reusable.yml", "on: workflow_call"),
    ] {
        let file = path.join(file);
        std::fs::create_dir_all(file.parent().unwrap()).unwrap();
        std::fs::write(file, content).unwrap();
    }

    let rule = InvalidLocalActionPathRule::new(&RuleState {
        root: path.to_path_buf(),
    });

    (root, rule)
}

#[test]
fn test_metadata_invalid_local_action_path() {
    let (_root, rule) = repository();
    test_metadata(&rule);
}

#[test]
fn test_no_local_action() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        r#"
on: push
jobs:
  test:
    runs-on: test
    steps:
      - run: echo "Test"
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_remote_action() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        r#"
on: push
jobs:
  test:
    runs-on: test
    steps:
      - name: "Test"
        uses: actions/checkout@v2
      - uses: docker://alpine:3.20
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_missing_local_action() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        r#"
on: push
jobs:
  test:
    runs-on: test
    steps:
      - name: "Test"
        uses: ./.github/actions/some-missing-action
"#,
    );

    assert_single_finding(
        checked.findings(),
        "InvalidLocalActionPath",
        r#"Step["Test"] in Job[test] references an action that does not exist."#,
    );
}

#[test]
fn test_existing_local_actions() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        r#"
on: push
jobs:
  test:
    runs-on: test
    steps:
      - name: "Test"
        uses: ./.github/actions/some-valid-action
      - uses: ./.github/actions/yaml-action
      - uses: ./.github/actions/docker-action/
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_directory_without_action_file() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        "
on: push
jobs:
  test:
    runs-on: test
    steps:
      - uses: ./.github/actions/empty-action
",
    );

    assert_single_finding(
        checked.findings(),
        "InvalidLocalActionPath",
        "Step[./.github/actions/empty-action] in Job[test] references an action that does not exist.",
    );
}

#[test]
fn test_expression_in_local_path_is_skipped() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        "
on: push
jobs:
  test:
    runs-on: test
    steps:
      - uses: ./.github/actions/${{ matrix.action }}
",
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_local_reusable_workflow() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        "
on: push
jobs:
  present:
    uses: ./.github/workflows/reusable.yml
  missing:
    uses: ./.github/workflows/missing.yml
  remote:
    uses: octo-org/example/.github/workflows/reusable.yml@v1
",
    );

    assert_single_finding(
        checked.findings(),
        "InvalidLocalActionPath",
        "Job[missing] references a reusable workflow that does not exist.",
    );
}

#[test]
fn test_path_through_a_file() {
    let (_root, rule) = repository();
    let checked = check(
        &rule,
        "
on: push
jobs:
  test:
    runs-on: test
    steps:
      - uses: ./.github/actions/empty-action/README.md/setup
",
    );

    assert_single_finding(
        checked.findings(),
        "InvalidLocalActionPath",
        "Step[./.github/actions/empty-action/README.md/setup] in Job[test] references an action that does not exist.",
    );
}

#[test]
fn test_inconclusive_lookup_reports_nothing() {
    let (_root, rule) = repository();

    // No filesystem accepts a 300 byte path component, so the lookup fails
    // with something other than "not found".
    let checked = check(
        &rule,
        &format!(
            "
on: push
jobs:
  test:
    runs-on: test
    steps:
      - uses: ./.github/actions/{name}
",
            name = "a".repeat(300)
        ),
    );

    assert_no_findings(checked.findings());
}
