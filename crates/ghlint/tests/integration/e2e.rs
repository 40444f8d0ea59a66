//! End-to-end tests of the `ghlint` binary.

use crate::common::{OutputMode, ghlint, input_under_test};

#[test]
fn test_single_file() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .input(input_under_test("redundant-shell.yml"))
            .run()?,
        @r"
    @@INPUT@@: Job[test]: [RedundantDefaultShell] Both Job[test] and Workflow[redundant-shell] has bash shell as default, one of them can be removed.
    @@INPUT@@: Step[#0] in Job[test]: [RedundantShell] Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.
    2 findings
    "
    );

    Ok(())
}

#[test]
fn test_no_findings() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint().input(input_under_test("clean.yml")).run()?,
        @"No findings to report."
    );

    Ok(())
}

#[test]
fn test_no_exit_codes() -> anyhow::Result<()> {
    let output = ghlint()
        .args(["--no-exit-codes"])
        .input(input_under_test("redundant-shell.yml"))
        .run()?;

    assert!(output.ends_with("2 findings\n"));

    Ok(())
}

#[test]
fn test_directory_input() -> anyhow::Result<()> {
    // `broken.yml` is skipped with a warning, `README.md` isn't a workflow.
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .input(input_under_test("mixed"))
            .run()?,
        @r"
    @@INPUT@@/.github/workflows/a.yaml: Step[#0] in Job[test]: [RedundantShell] Both Step[#0] in Job[test] and Workflow[a] has bash shell, the step's shell can be removed.
    @@INPUT@@/.github/workflows/b.yml: Step[actions/checkout@${{ github.sha }}] in Job[test]: [InvalidExpressionUsage] Step[actions/checkout@${{ github.sha }}] in Job[test] uses a GitHub expression in the uses field.
    2 findings
    "
    );

    let stderr = ghlint()
        .expects_findings(true)
        .output(OutputMode::Stderr)
        .input(input_under_test("mixed"))
        .run()?;
    assert!(stderr.contains("skipping @@INPUT@@/.github/workflows/broken.yml"));

    Ok(())
}

#[test]
fn test_json_format() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .args(["--format", "json"])
            .input(input_under_test("invalid-expression-usage.yml"))
            .run()?,
        @r#"
    [
      {
        "path": "@@INPUT@@",
        "id": "InvalidExpressionUsage",
        "title": "Expression used in a field that doesn't support it.",
        "location": "Step[actions/checkout@${{ github.sha }}] in Job[test]",
        "message": "Step[actions/checkout@${{ github.sha }}] in Job[test] uses a GitHub expression in the uses field."
      }
    ]
    "#
    );

    insta::assert_snapshot!(
        ghlint()
            .args(["--format", "json"])
            .input(input_under_test("clean.yml"))
            .run()?,
        @"[]"
    );

    Ok(())
}

#[test]
fn test_local_actions() -> anyhow::Result<()> {
    let root = input_under_test("local-actions");

    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .args(["--root", root.as_str()])
            .input(&root)
            .run()?,
        @r#"
    @@INPUT@@/.github/workflows/ci.yml: Step["Missing"] in Job[test]: [InvalidLocalActionPath] Step["Missing"] in Job[test] references an action that does not exist.
    @@INPUT@@/.github/workflows/ci.yml: Job[call]: [InvalidLocalActionPath] Job[call] references a reusable workflow that does not exist.
    2 findings
    "#
    );

    Ok(())
}

#[test]
fn test_validation() -> anyhow::Result<()> {
    let output = ghlint()
        .expects_failure(true)
        .input(input_under_test("dangling-needs.yml"))
        .run()?;
    assert!(output.contains("fatal: no checks were performed"));
    assert!(output.contains("failed to load @@INPUT@@"));
    assert!(output.contains("job `test` needs `build`, which does not exist"));

    let output = ghlint()
        .expects_failure(true)
        .input(input_under_test("schema-violation.yml"))
        .run()?;
    assert!(output.contains("input does not match expected validation schema"));

    // Without validation, the dangling `needs:` is accepted.
    insta::assert_snapshot!(
        ghlint()
            .args(["--no-validate"])
            .input(input_under_test("dangling-needs.yml"))
            .run()?,
        @"No findings to report."
    );

    Ok(())
}

#[test]
fn test_missing_input() -> anyhow::Result<()> {
    let output = ghlint()
        .expects_failure(true)
        .input("this-file-does-not-exist.yml")
        .run()?;
    assert!(output.contains("fatal: no checks were performed"));
    assert!(output.contains("failed to load @@INPUT@@"));

    Ok(())
}
