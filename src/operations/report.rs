//! Console report lines

use crate::config::Config;
use crate::operations::compare::Comparison;

/// Lines describing the settings of the run
#[must_use]
pub fn parameter_lines(config: &Config) -> Vec<String> {
    vec![
        "Parameters:".to_owned(),
        format!("  refs path      = {}", config.refs_path.display()),
        format!("  results path   = {}", config.results_path.display()),
        format!("  build path     = {}", config.build_path.display()),
        format!("  start id       = {}", config.start_id),
        format!("  sensibility    = {}", config.sensibility),
        format!("  n threads      = {}", config.n_threads),
        format!("  recursive scan = {}", config.recursive_scan),
        format!("  max fe         = {}", config.max_fe),
        format!("  weak rate      = {}", config.weak_rate),
        format!("  max snr time   = {}", config.max_snr_time),
        format!("  verbose        = {}", config.verbose),
        format!("  extensions     = {}", config.extensions.join(", ")),
    ]
}

/// Verbose details of a completed comparison
#[must_use]
pub fn detail_lines(comparison: &Comparison, sensibility: f64) -> Vec<String> {
    let stats = comparison.stats(sensibility);
    let mut lines = vec![format!(
        "---- Details: 'valid SNR points' = {} / {}, 'sensibility [avg,min,max,rate]' = [ {:.2}, {:.2}, {:.2}, {:.1}% ].",
        comparison.valid(),
        comparison.compared(),
        stats.avg,
        stats.min,
        stats.max,
        stats.rate
    )];

    if let (Some(first), Some(last)) = (comparison.checks.first(), comparison.checks.last()) {
        lines.push(format!(
            "---- Details: 'first SNR point' = {:.2} dB (@ {} FER), 'last SNR point' = {:.2} dB (@ {} FER).",
            first.snr, first.current, last.snr, last.current
        ));
    }

    let errors: Vec<String> = comparison
        .invalid_checks()
        .map(|check| format!("{{ {:.2} dB -> {:+.2} }}", check.snr, check.deviation))
        .collect();
    if !errors.is_empty() {
        lines.push(format!(
            "---- Details: 'errors list' = [{}].",
            errors.join(", ")
        ));
    }

    lines
}

/// Closing line listing failed test ids, `None` when everything passed
#[must_use]
pub fn failure_line(failed_ids: &[usize]) -> Option<String> {
    if failed_ids.is_empty() {
        return None;
    }

    let ids: Vec<String> = failed_ids.iter().map(|id| format!("n°{id}")).collect();
    Some(format!("Some tests FAILED: {}.", ids.join(", ")))
}
