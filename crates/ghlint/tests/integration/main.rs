/// Helpers.
mod common;
/// Configuration discovery tests.
mod config;
/// "Big picture" end-to-end tests of the `ghlint` binary.
mod e2e;
/// Rule-specific tests.
mod rule;
