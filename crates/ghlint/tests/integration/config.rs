//! Configuration discovery tests.

use crate::common::{OutputMode, ghlint, input_under_test};

/// Ensures we discover `.github/ghlint.yml` in a given input directory.
#[test]
fn test_discovers_config_in_dotgithub() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .input(input_under_test("config-scenarios/config-in-dotgithub"))
            .run()?,
        @"
    @@INPUT@@/.github/workflows/ci.yml: Job[test]: [RedundantDefaultShell] Both Job[test] and Workflow[ci] has bash shell as default, one of them can be removed.
    1 finding (1 ignored)
    "
    );

    Ok(())
}

/// Ensures we discover `ghlint.yaml` at the root of a given input directory.
#[test]
fn test_discovers_config_in_root() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .input(input_under_test("config-scenarios/config-in-root"))
            .run()?,
        @"
    @@INPUT@@/.github/workflows/ci.yml: Step[#0] in Job[test]: [RedundantShell] Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.
    1 finding (1 ignored)
    "
    );

    Ok(())
}

/// Ensures we discover a config by walking up from an individual workflow.
#[test]
fn test_discovers_config_from_workflow() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .input(input_under_test(
                "config-scenarios/config-in-root/.github/workflows/ci.yml"
            ))
            .run()?,
        @"
    @@INPUT@@: Step[#0] in Job[test]: [RedundantShell] Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.
    1 finding (1 ignored)
    "
    );

    Ok(())
}

/// Ensures we ignore a discoverable config when `--no-config` is specified.
#[test]
fn test_ignores_config_in_root() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .expects_findings(true)
            .no_config(true)
            .input(input_under_test("config-scenarios/config-in-root"))
            .run()?,
        @"
    @@INPUT@@/.github/workflows/ci.yml: Job[test]: [RedundantDefaultShell] Both Job[test] and Workflow[ci] has bash shell as default, one of them can be removed.
    @@INPUT@@/.github/workflows/ci.yml: Step[#0] in Job[test]: [RedundantShell] Both Step[#0] in Job[test] and Job[test] has bash shell, the step's shell can be removed.
    2 findings
    "
    );

    Ok(())
}

/// Ensures an explicit `--config` takes precedence over discovery.
#[test]
fn test_explicit_config() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .config(input_under_test("config-scenarios/configs/disable-all.yml"))
            .input(input_under_test("config-scenarios/config-in-root"))
            .run()?,
        @"No findings to report. (2 ignored)"
    );

    Ok(())
}

/// Ensures `GHLINT_CONFIG` works like `--config`.
#[test]
fn test_config_from_env() -> anyhow::Result<()> {
    insta::assert_snapshot!(
        ghlint()
            .setenv(
                "GHLINT_CONFIG",
                &input_under_test("config-scenarios/configs/disable-all.yml")
            )
            .input(input_under_test("redundant-shell.yml"))
            .run()?,
        @"No findings to report. (2 ignored)"
    );

    Ok(())
}

/// Ensures an invalid config is a fatal error.
#[test]
fn test_invalid_config() -> anyhow::Result<()> {
    let output = ghlint()
        .expects_failure(true)
        .output(OutputMode::Stderr)
        .config(input_under_test("config-scenarios/configs/invalid.yml"))
        .input(input_under_test("redundant-shell.yml"))
        .run()?;

    assert!(output.contains("fatal: no checks were performed"));
    assert!(output.contains("configuration error in @@CONFIG@@"));
    assert!(output.contains("invalid configuration syntax"));

    Ok(())
}
