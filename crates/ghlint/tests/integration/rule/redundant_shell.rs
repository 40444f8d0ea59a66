use ghlint::rule::redundant_shell::RedundantShellRule;
use ghlint_testing::{
    assert_has_finding, assert_no_findings, assert_single_finding, check, test_metadata,
};

#[test]
fn test_metadata_redundant_shell() {
    test_metadata(&RedundantShellRule);
}

#[test]
fn test_job_and_workflow_same_default_shell() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: bash
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Test"
"#,
    );

    assert_single_finding(
        checked.findings(),
        "RedundantDefaultShell",
        "Both Job[test] and Workflow[test] has bash shell as default, one of them can be removed.",
    );
}

#[test]
fn test_job_and_workflow_different_default_shell() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: sh
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Test"
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_step_same_shell_as_job_default() {
    let checked = check(
        &RedundantShellRule,
        r#"
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Test"
        shell: bash
"#,
    );

    assert_single_finding(
        checked.findings(),
        "RedundantShell",
        "Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.",
    );
}

#[test]
fn test_step_same_shell_as_workflow_default() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: bash
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - run: echo "Test"
        shell: bash
"#,
    );

    assert_single_finding(
        checked.findings(),
        "RedundantShell",
        "Both Step[#0] in Job[test] and Workflow[test] has bash shell, the step's shell can be removed.",
    );
}

#[test]
fn test_step_job_and_workflow_all_same_shell() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: bash
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Test"
        shell: bash
"#,
    );

    // The step is only compared against the job, its closest default.
    assert_eq!(checked.findings().len(), 2);
    assert_has_finding(
        checked.findings(),
        "RedundantShell",
        "Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.",
    );
    assert_has_finding(
        checked.findings(),
        "RedundantDefaultShell",
        "Both Job[test] and Workflow[test] has bash shell as default, one of them can be removed.",
    );
}

#[test]
fn test_job_and_step_different_shell() {
    let checked = check(
        &RedundantShellRule,
        r#"
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: sh
    steps:
      - run: echo "Test"
        shell: bash
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_workflow_and_step_different_shell() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: sh
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - run: echo "Test"
        shell: bash
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_step_matches_workflow_but_not_job() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: sh
jobs:
  test:
    runs-on: ubuntu-latest
    defaults:
      run:
        shell: bash
    steps:
      - run: echo "Test"
        shell: sh
"#,
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_named_steps_and_uses_steps() {
    let checked = check(
        &RedundantShellRule,
        r#"
defaults:
  run:
    shell: bash
jobs:
  test:
    runs-on: ubuntu-latest
    steps:
      - uses: actions/checkout@v4
      - name: Build
        run: make
        shell: bash
      - id: test
        run: make test
        shell: bash
"#,
    );

    assert_eq!(checked.findings().len(), 2);
    assert_has_finding(
        checked.findings(),
        "RedundantShell",
        r#"Both Step["Build"] in Job[test] and Workflow[test] has bash shell, the step's shell can be removed."#,
    );
    assert_has_finding(
        checked.findings(),
        "RedundantShell",
        "Both Step[test] in Job[test] and Workflow[test] has bash shell, the step's shell can be removed.",
    );
}
