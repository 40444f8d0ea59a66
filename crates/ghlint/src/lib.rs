//! Static analysis for GitHub Actions workflows.
//!
//! Workflows are loaded into [`models::File`]s, which [`rule::Rule`]s check
//! to produce [`finding::Finding`]s. Most rules are
//! [`rule::VisitorRule`]s, driven by a [`visitor::WorkflowVisitor`] walk.

#![forbid(unsafe_code)]

pub mod config;
pub mod finding;
pub mod models;
pub mod output;
pub mod registry;
pub mod rule;
pub(crate) mod utils;
pub mod visitor;

pub use utils::contains_expression;
