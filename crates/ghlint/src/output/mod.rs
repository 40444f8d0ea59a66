//! Output formats for ghlint's findings.

pub mod json;
pub mod plain;
