//! Tolerance-based comparison of simulated and reference SNR points

use crate::operations::metrics::{MetricRow, SciValue};
use std::fmt;

/// Thresholds a simulated curve is judged against
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Criteria {
    /// Largest accepted absolute mantissa deviation
    pub sensibility: f64,
    /// Minimum ratio of valid points for a weak pass
    pub weak_rate: f64,
    /// Frame errors requested per point; points below half of it are not judged
    pub max_fe: u64,
}

/// Outcome of a single test case
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Every compared point is within tolerance
    StrongPassed,
    /// Enough points are within tolerance
    WeakPassed,
    /// Too many points are out of tolerance
    Failed,
    /// The simulation could not be run or its reference could not be read
    Aborted,
}

impl Verdict {
    /// Whether this outcome counts as a failed test
    #[must_use]
    #[inline]
    pub const fn is_failure(self) -> bool {
        matches!(self, Self::Failed | Self::Aborted)
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match *self {
            Self::StrongPassed => "STRONG PASSED",
            Self::WeakPassed => "WEAK PASSED",
            Self::Failed => "FAILED",
            Self::Aborted => "ABORTED",
        })
    }
}

/// Judgement of one SNR point
#[derive(Debug, Clone, PartialEq)]
pub struct PointCheck {
    /// SNR of the simulated point
    pub snr: f64,
    pub reference: SciValue,
    pub current: SciValue,
    /// Signed mantissa deviation of the simulated FER from the reference
    pub deviation: f64,
    pub valid: bool,
}

/// Aggregate of the absolute deviations of a comparison
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SensibilityStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    /// Average deviation as a percentage of the sensibility
    pub rate: f64,
}

/// Point-by-point comparison of a simulated curve with its reference
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Comparison {
    pub checks: Vec<PointCheck>,
}

impl Comparison {
    /// Number of points that were judged
    #[must_use]
    pub fn compared(&self) -> usize {
        self.checks.len()
    }

    /// Number of points within tolerance
    #[must_use]
    pub fn valid(&self) -> usize {
        self.checks.iter().filter(|check| check.valid).count()
    }

    /// The points out of tolerance
    pub fn invalid_checks(&self) -> impl Iterator<Item = &PointCheck> {
        self.checks.iter().filter(|check| !check.valid)
    }

    /// Verdict for this comparison
    ///
    /// A comparison with no judged point is a strong pass.
    #[must_use]
    pub fn verdict(&self, weak_rate: f64) -> Verdict {
        let compared = self.compared();
        let valid = self.valid();

        if valid == compared {
            return Verdict::StrongPassed;
        }

        let ratio = ratio(valid, compared);
        if ratio >= weak_rate {
            Verdict::WeakPassed
        } else {
            Verdict::Failed
        }
    }

    /// Statistics of the absolute deviations
    #[must_use]
    pub fn stats(&self, sensibility: f64) -> SensibilityStats {
        if self.checks.is_empty() {
            return SensibilityStats::default();
        }

        let deviations = self.checks.iter().map(|check| check.deviation.abs());
        let total: f64 = deviations.clone().sum();
        let avg = total / count_as_f64(self.checks.len());
        let min = deviations.clone().fold(f64::INFINITY, f64::min);
        let max = deviations.fold(0.0, f64::max);
        let rate = if sensibility > 0.0 {
            avg / sensibility * 100.0
        } else {
            0.0
        };

        SensibilityStats { avg, min, max, rate }
    }
}

/// Compare simulated rows against reference rows, pairing them by position
///
/// Pairing stops at the first simulated point that is missing or that did not
/// reach half of the requested frame errors.
#[must_use]
pub fn compare(reference: &[MetricRow], current: &[MetricRow], criteria: &Criteria) -> Comparison {
    let mut checks = Vec::new();

    for (reference_row, current_row) in reference.iter().zip(current) {
        if current_row.frame_errors.saturating_mul(2) < criteria.max_fe {
            break;
        }

        let deviation = current_row.fer.deviation_from(&reference_row.fer);
        checks.push(PointCheck {
            snr: current_row.snr,
            reference: reference_row.fer.clone(),
            current: current_row.fer.clone(),
            deviation,
            valid: deviation.abs() <= criteria.sensibility,
        });
    }

    Comparison { checks }
}

fn ratio(valid: usize, compared: usize) -> f64 {
    if compared == 0 {
        return 0.0;
    }
    count_as_f64(valid) / count_as_f64(compared)
}

fn count_as_f64(count: usize) -> f64 {
    u32::try_from(count).map_or(f64::from(u32::MAX), f64::from)
}
