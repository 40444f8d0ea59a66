//! Data models for GitHub Actions workflow documents.
//!
//! These models are deliberately lenient: almost every field is optional
//! or defaulted, so that a structurally incomplete document can still be
//! turned into a model. Structural validation is the caller's job.

#![forbid(unsafe_code)]

pub mod common;
pub mod workflow;
