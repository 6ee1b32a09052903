//! Reference result files
//!
//! A reference file is the saved output of an earlier simulation: a title
//! line, the command line that produced it, a few header lines, then the
//! result table interleaved with `#` comment lines.

use crate::error::RegressionError;
use crate::operations::metrics::MetricRow;
use anyhow::Result;

/// Lines before the first possible metric row
pub const HEADER_LINES: usize = 7;

/// Zero-based index of the line holding the command line
const COMMAND_LINE_INDEX: usize = 1;

/// A parsed reference file
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceCase {
    /// The recorded command line, trimmed
    pub command_line: String,
    /// Reference SNR points in table order
    pub rows: Vec<MetricRow>,
}

impl ReferenceCase {
    /// Parse the contents of a reference file
    ///
    /// # Errors
    ///
    /// Returns a reference error if:
    /// - The file has no command line
    /// - A table row does not expose SNR, FE and FER columns
    pub fn parse(content: &str) -> Result<Self> {
        let lines: Vec<&str> = content.lines().collect();

        let command_line = lines
            .get(COMMAND_LINE_INDEX)
            .map(|line| line.trim())
            .filter(|line| !line.is_empty())
            .ok_or_else(|| {
                RegressionError::reference("The reference file has no command line on line 2")
            })?
            .to_owned();

        let mut rows = Vec::new();
        for (index, line) in lines.iter().enumerate().skip(HEADER_LINES) {
            if line.trim().is_empty() || line.starts_with('#') {
                continue;
            }

            let row = MetricRow::parse(line).ok_or_else(|| {
                RegressionError::reference(format!(
                    "Malformed result row on line {}: {}",
                    index + 1,
                    line.trim()
                ))
            })?;
            rows.push(row);
        }

        Ok(Self { command_line, rows })
    }
}
