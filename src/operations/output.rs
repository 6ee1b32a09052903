//! Simulator stdout handling and annotated result files

use crate::operations::compare::Comparison;
use crate::operations::metrics::{METRIC_FIELD_COUNTS, MetricRow};

/// Last line of every result file
pub const END_MARKER: &str = "# End of the simulation.";

/// Marker appended to a result row whose FER is out of tolerance
pub const WRONG_MARKER: &str = "WRONG! FER=";

/// The simulator's stdout, split into table rows and everything else
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SimulationOutput {
    /// Comment and free-form lines, in order
    pub passthrough: Vec<String>,
    /// Result table rows, in order
    pub rows: Vec<MetricRow>,
}

impl SimulationOutput {
    /// Classify stdout lines
    ///
    /// Empty lines, lines starting with `(` and any previous end marker are
    /// dropped. Lines with the column count of a result row that parse as one
    /// become rows; every other line is kept verbatim.
    #[must_use]
    pub fn parse(stdout: &str) -> Self {
        let mut output = Self::default();

        for line in stdout.lines() {
            if line.is_empty() || line.starts_with('(') {
                continue;
            }

            if line.starts_with('#') {
                if !line.contains(END_MARKER) {
                    output.passthrough.push(line.to_owned());
                }
                continue;
            }

            match MetricRow::parse(line) {
                Some(row) if METRIC_FIELD_COUNTS.contains(&row.field_count) => {
                    output.rows.push(row);
                }
                _ => output.passthrough.push(line.to_owned()),
            }
        }

        output
    }
}

/// Render the annotated result file of a completed simulation
///
/// Only the rows that took part in the comparison are written; rows out of
/// tolerance carry the reference FER they were expected to match.
#[must_use]
pub fn render_results(output: &SimulationOutput, comparison: &Comparison) -> String {
    let mut content = String::new();

    for line in &output.passthrough {
        content.push_str(line);
        content.push('\n');
    }

    for (row, check) in output.rows.iter().zip(&comparison.checks) {
        content.push_str(&row.line);
        if !check.valid {
            content.push(' ');
            content.push_str(WRONG_MARKER);
            content.push_str(check.reference.as_str());
        }
        content.push('\n');
    }

    content.push_str(END_MARKER);
    content.push('\n');
    content
}
