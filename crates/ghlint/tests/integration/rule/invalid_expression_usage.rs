use ghlint::{contains_expression, rule::invalid_expression_usage::InvalidExpressionUsageRule};
use ghlint_testing::{assert_no_findings, assert_single_finding, check, test_metadata};

#[test]
fn test_metadata_invalid_expression_usage() {
    test_metadata(&InvalidExpressionUsageRule);
}

#[test]
fn test_no_expression_in_uses() {
    let checked = check(
        &InvalidExpressionUsageRule,
        "
on: push
jobs:
  test:
    runs-on: test
    steps:
    - uses: actions/checkout@v4
",
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_expression_in_uses() {
    let checked = check(
        &InvalidExpressionUsageRule,
        "
on: push
jobs:
  test:
    runs-on: test
    steps:
    - uses: actions/checkout@${{ github.sha }}
",
    );

    assert_single_finding(
        checked.findings(),
        "InvalidExpressionUsage",
        "Step[actions/checkout@${{ github.sha }}] in Job[test] uses a GitHub expression in the uses field.",
    );
}

#[test]
fn test_whole_uses_is_an_expression() {
    let checked = check(
        &InvalidExpressionUsageRule,
        "
on: push
jobs:
  test:
    runs-on: test
    strategy:
      matrix:
        action: [actions/checkout@v4, actions/setup-node@v4]
    steps:
    - uses: ${{ matrix.action }}
",
    );

    assert_single_finding(
        checked.findings(),
        "InvalidExpressionUsage",
        "Step[${{ matrix.action }}] in Job[test] uses a GitHub expression in the uses field.",
    );
}

#[test]
fn test_expressions_elsewhere_are_fine() {
    let checked = check(
        &InvalidExpressionUsageRule,
        "
on: push
jobs:
  test:
    runs-on: ${{ matrix.os }}
    steps:
    - name: ${{ github.sha }}
      uses: actions/checkout@v4
      with:
        ref: ${{ github.sha }}
    - run: echo ${{ github.sha }}
",
    );

    assert_no_findings(checked.findings());
}

#[test]
fn test_contains_expression() {
    assert!(contains_expression("owner/repo@${{ github.sha }}"));
    assert!(!contains_expression("owner/repo@main"));
}
