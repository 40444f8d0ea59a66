//! "plain" (i.e. line-oriented) output.

use std::io;

use owo_colors::OwoColorize;

use crate::registry::{FindingRegistry, KeyedFinding};

/// Writes one line per finding, followed by a summary line.
pub fn render_findings(mut sink: impl io::Write, findings: &FindingRegistry) -> io::Result<()> {
    for finding in findings.findings() {
        render_finding(&mut sink, finding)?;
    }

    let qualifier = if findings.ignored().is_empty() {
        String::new()
    } else {
        format!(
            " ({nignored} ignored)",
            nignored = findings.ignored().len().bright_yellow()
        )
    };

    if findings.findings().is_empty() {
        writeln!(
            sink,
            "{no_findings}{qualifier}",
            no_findings = "No findings to report.".green()
        )
    } else {
        let nfindings = findings.findings().len();
        writeln!(
            sink,
            "{nfindings} finding{s}{qualifier}",
            nfindings = nfindings.red(),
            s = if nfindings == 1 { "" } else { "s" },
        )
    }
}

fn render_finding(sink: &mut impl io::Write, keyed: &KeyedFinding<'_>) -> io::Result<()> {
    writeln!(
        sink,
        "{path}: {location}: [{id}] {message}",
        path = keyed.key.bold(),
        location = keyed.finding.location(),
        id = keyed.finding.id().yellow(),
        message = keyed.finding.message(),
    )
}
