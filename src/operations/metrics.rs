//! Metric rows of the simulator's tabular output
//!
//! A row looks like
//! `  1.00 |  -0.76 |  1215 | 23081 |  100 | 3.80e-02 | 8.23e-02 ||  0.342 | 00h00'01`
//! and is read column-wise once separators and blanks are squeezed out.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// Column holding the SNR of the point (Eb/N0, in dB)
pub const SNR_FIELD: usize = 1;

/// Column holding the number of frame errors
pub const FE_FIELD: usize = 4;

/// Column holding the frame error rate
pub const FER_FIELD: usize = 6;

/// Column counts the simulator prints for a metric row
pub const METRIC_FIELD_COUNTS: [usize; 2] = [9, 12];

static SCIENTIFIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([+-]?(?:\d+\.?\d*|\.\d+))[eE]([+-]?\d+)$")
        .expect("scientific notation pattern is valid")
});

/// A number written in scientific notation, kept as mantissa and exponent
#[derive(Debug, Clone, PartialEq)]
pub struct SciValue {
    pub mantissa: f64,
    pub exponent: i32,
    text: String,
}

impl SciValue {
    /// Parse `d.dde±xx`; returns `None` for anything else
    #[must_use]
    pub fn parse(text: &str) -> Option<Self> {
        let captures = SCIENTIFIC.captures(text.trim())?;
        let mantissa = captures.get(1)?.as_str().parse::<f64>().ok()?;
        let exponent = captures.get(2)?.as_str().parse::<i32>().ok()?;
        Some(Self {
            mantissa,
            exponent,
            text: text.trim().to_owned(),
        })
    }

    /// The value as written in the table
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// The mantissa re-expressed in units of `10^exponent`
    #[must_use]
    pub fn mantissa_at(&self, exponent: i32) -> f64 {
        let shift = i64::from(self.exponent) - i64::from(exponent);
        let shift = i32::try_from(shift).unwrap_or(if shift > 0 { i32::MAX } else { i32::MIN });
        self.mantissa * 10_f64.powi(shift)
    }

    /// Signed mantissa deviation of `self` from `reference`
    ///
    /// Both mantissas are scaled to the smaller of the two exponents before
    /// subtracting, so `9.50e-04` against `1.00e-03` deviates by `-0.5`.
    /// Exponents too far apart to compare give an infinite deviation.
    #[must_use]
    pub fn deviation_from(&self, reference: &Self) -> f64 {
        let common = self.exponent.min(reference.exponent);
        let deviation = self.mantissa_at(common) - reference.mantissa_at(common);
        if deviation.is_nan() {
            f64::INFINITY
        } else {
            deviation
        }
    }
}

impl fmt::Display for SciValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

/// One SNR point of a result table
#[derive(Debug, Clone, PartialEq)]
pub struct MetricRow {
    /// The line as it was read, without its line terminator
    pub line: String,
    pub snr: f64,
    pub frame_errors: u64,
    pub fer: SciValue,
    pub field_count: usize,
}

impl MetricRow {
    /// Interpret a table line; `None` when the columns cannot be read
    #[must_use]
    pub fn parse(line: &str) -> Option<Self> {
        let fields = split_fields(line);
        let snr = fields.get(SNR_FIELD)?.parse::<f64>().ok()?;
        let frame_errors = fields.get(FE_FIELD)?.parse::<u64>().ok()?;
        let fer = SciValue::parse(fields.get(FER_FIELD)?)?;
        Some(Self {
            line: line.trim_end_matches(['\r', '\n']).to_owned(),
            snr,
            frame_errors,
            fer,
            field_count: fields.len(),
        })
    }
}

/// Squeeze a table line into its columns
///
/// Double separators become single ones and every space is removed before
/// splitting on `|`.
#[must_use]
pub fn split_fields(line: &str) -> Vec<String> {
    line.trim()
        .replace("||", "|")
        .replace(' ', "")
        .split('|')
        .map(str::to_owned)
        .collect()
}
