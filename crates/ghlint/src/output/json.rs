//! ghlint's JSON output format.
//!
//! A flat array of findings, each represented as an object.

use std::io;

use serde::Serialize;

use crate::registry::KeyedFinding;

#[derive(Serialize)]
struct JsonFinding<'a> {
    path: &'a str,
    id: &'a str,
    title: &'a str,
    location: String,
    message: &'a str,
}

impl<'a> From<&'a KeyedFinding<'a>> for JsonFinding<'a> {
    fn from(keyed: &'a KeyedFinding<'a>) -> Self {
        Self {
            path: keyed.key.path().as_str(),
            id: keyed.finding.id(),
            title: keyed.finding.title(),
            location: keyed.finding.location(),
            message: keyed.finding.message(),
        }
    }
}

pub fn output(mut sink: impl io::Write, findings: &[KeyedFinding<'_>]) -> anyhow::Result<()> {
    serde_json::to_writer_pretty(
        &mut sink,
        &findings.iter().map(JsonFinding::from).collect::<Vec<_>>(),
    )?;
    writeln!(sink)?;
    Ok(())
}
