//! Replay of a reference corpus: the per-file test loop

use crate::cli::Args;
use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::error::RegressionError;
use crate::operations::command_line::{OutputFormat, SimulationCommand};
use crate::operations::compare::{Comparison, Criteria, Verdict, compare};
use crate::operations::discovery::{Discovery, discover_references};
use crate::operations::output::{SimulationOutput, render_results};
use crate::operations::reference::ReferenceCase;
use crate::operations::report::{detail_lines, failure_line, parameter_lines};
use crate::system::System;
use crate::utils::fs::{ensure_directory, write_text_file};
use crate::utils::path::mirror_path;
use anyhow::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};

/// Largest exit code a process can report
const MAX_EXIT_CODE: usize = 255;

/// Totals of a regression pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    /// Reference files discovered
    pub total: usize,
    /// Reference files actually replayed (not skipped by the start id)
    pub replayed: usize,
    pub strong_passed: usize,
    pub weak_passed: usize,
    /// Ids of failed and aborted tests, counted from 1
    pub failed_ids: Vec<usize>,
}

impl RunSummary {
    /// Number of failed tests
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed_ids.len()
    }

    /// Process exit code: the number of failed tests, saturated at 255
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        i32::try_from(self.failed().min(MAX_EXIT_CODE)).unwrap_or(i32::from(u8::MAX))
    }

    fn record(&mut self, id: usize, verdict: Verdict) {
        self.replayed += 1;
        match verdict {
            Verdict::StrongPassed => self.strong_passed += 1,
            Verdict::WeakPassed => self.weak_passed += 1,
            Verdict::Failed | Verdict::Aborted => self.failed_ids.push(id),
        }
    }
}

/// How a single case ended
#[derive(Debug)]
enum CaseOutcome {
    /// The simulation ran and its curve was judged
    Completed {
        verdict: Verdict,
        elapsed: Duration,
        comparison: Comparison,
    },
    /// The case could not be judged
    Aborted { message: String },
}

/// One entry of the dry-run listing
#[derive(Debug, Serialize)]
struct PlannedCase {
    id: usize,
    reference: PathBuf,
    #[serde(flatten)]
    command: SimulationCommand,
}

/// Coordinates a complete regression pass
#[non_exhaustive]
pub struct ReplayOperation<'src> {
    config: Config,
    dry_run: bool,
    output_format: OutputFormat,
    system: &'src dyn System,
}

impl<'src> ReplayOperation<'src> {
    /// Create a replay from CLI arguments
    ///
    /// Settings are read from `--config`, or from `./simregress.yaml` when it
    /// exists, then overridden by the flags given on the command line.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The configuration file cannot be loaded, parsed or validated
    /// - The merged settings are invalid
    /// - The output format is unknown
    #[inline]
    pub fn new(args: Args, system: &'src dyn System) -> Result<Self> {
        let mut config = match args.config.as_deref() {
            Some(path) => Config::load_from_file(system, path)?,
            None if system.is_file(Path::new(DEFAULT_CONFIG_FILE)) => {
                Config::load_from_file(system, Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Config::default(),
        };

        merge_cli_args(&mut config, &args);
        config.normalize();
        config.validate()?;

        let output_format = args
            .output_format
            .parse::<OutputFormat>()
            .map_err(RegressionError::configuration)?;

        Ok(Self::from_config(config, system).with_dry_run(args.dry_run, output_format))
    }

    /// Create a replay from already merged settings
    #[must_use]
    pub fn from_config(config: Config, system: &'src dyn System) -> Self {
        Self {
            config,
            dry_run: false,
            output_format: OutputFormat::Shell,
            system,
        }
    }

    /// List the planned simulations instead of running them
    #[must_use]
    pub fn with_dry_run(mut self, dry_run: bool, output_format: OutputFormat) -> Self {
        self.dry_run = dry_run;
        self.output_format = output_format;
        self
    }

    /// The settings this replay runs with
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Execute the regression pass
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The results path is an existing file
    /// - The results tree cannot be created or written
    /// - The refs directory cannot be scanned
    ///
    /// Failing or aborted test cases are not errors; they are counted in the
    /// returned summary.
    #[inline]
    pub fn execute(&self) -> Result<RunSummary> {
        if self.dry_run {
            return self.preview_operations();
        }

        info!("simregress tests");
        info!("----------------");
        for line in parameter_lines(&self.config) {
            info!("{}", line);
        }

        self.prepare_results_root()?;

        let discovery = discover_references(
            self.system,
            &self.config.refs_path,
            self.config.recursive_scan,
            &self.config.extensions,
        )?;

        for directory in &discovery.directories {
            ensure_directory(
                self.system,
                &mirror_path(&self.config.results_path, directory),
            )?;
        }

        let total = discovery.cases.len();
        let first_test = self.config.first_test();
        let has_work = total >= first_test;
        if has_work {
            info!("Starting the test script...");
        } else {
            warn!("There is no simulation to replay.");
        }

        let mut summary = RunSummary {
            total,
            ..RunSummary::default()
        };

        for (index, case) in discovery.cases.iter().enumerate() {
            let id = index + 1;
            if id < first_test {
                continue;
            }

            let outcome = match self.replay_case(&discovery, case) {
                Ok(outcome) => outcome,
                Err(err) if is_fatal(&err) => return Err(err),
                Err(err) => CaseOutcome::Aborted {
                    message: format!("{err:#}"),
                },
            };

            let verdict = self.report_case(id, total, case, &outcome);
            summary.record(id, verdict);
        }

        if has_work {
            match failure_line(&summary.failed_ids) {
                None => info!("All the tests PASSED !"),
                Some(line) => warn!("{}", line),
            }
        }

        Ok(summary)
    }

    /// Refuse a results path that is a file and create the results root
    fn prepare_results_root(&self) -> Result<()> {
        let results_path = &self.config.results_path;
        if self.system.is_file(results_path) {
            return Err(RegressionError::configuration(format!(
                "The results path should not be an existing file: {}",
                results_path.display()
            ))
            .into());
        }

        ensure_directory(self.system, results_path)
    }

    /// Replay one reference file and write its annotated result
    fn replay_case(&self, discovery: &Discovery, case: &Path) -> Result<CaseOutcome> {
        let reference_path = discovery.reference_path(case);
        let content = self.system.read_to_string(&reference_path).map_err(|e| {
            RegressionError::reference(format!(
                "Failed to read reference file {}: {e}",
                reference_path.display()
            ))
        })?;

        let reference = ReferenceCase::parse(&content)?;
        let command = SimulationCommand::from_recorded(&reference.command_line, &self.config)?;
        debug!("Running: {}", command.to_shell());

        let started = Instant::now();
        let output = self
            .system
            .run_process(&command.program, &command.args, &command.working_dir)
            .map_err(|e| {
                RegressionError::simulation(format!(
                    "Failed to run {}: {e}",
                    command.program.display()
                ))
            })?;
        let elapsed = started.elapsed();

        if !output.stderr.is_empty() {
            return Ok(CaseOutcome::Aborted {
                message: output.stderr.trim_end().to_owned(),
            });
        }

        if !output.succeeded() {
            return Ok(CaseOutcome::Aborted {
                message: match output.code {
                    Some(code) => format!("The simulator exited with status {code}"),
                    None => "The simulator was terminated by a signal".to_owned(),
                },
            });
        }

        let simulation = SimulationOutput::parse(&output.stdout);
        let criteria = Criteria {
            sensibility: self.config.sensibility,
            weak_rate: self.config.weak_rate,
            max_fe: self.config.max_fe,
        };
        let comparison = compare(&reference.rows, &simulation.rows, &criteria);

        write_text_file(
            self.system,
            &mirror_path(&self.config.results_path, case),
            &render_results(&simulation, &comparison),
        )?;

        Ok(CaseOutcome::Completed {
            verdict: comparison.verdict(self.config.weak_rate),
            elapsed,
            comparison,
        })
    }

    /// Log the outcome of a case and return its verdict
    fn report_case(&self, id: usize, total: usize, case: &Path, outcome: &CaseOutcome) -> Verdict {
        match outcome {
            CaseOutcome::Aborted { message } => {
                error!("Test n°{} / {} - {} - ABORTED.", id, total, case.display());
                error!("Error message:\n{}", message);
                Verdict::Aborted
            }
            CaseOutcome::Completed {
                verdict,
                elapsed,
                comparison,
            } => {
                let line = format!(
                    "Test n°{} / {} - {} - {:.2} sec - {}.",
                    id,
                    total,
                    case.display(),
                    elapsed.as_secs_f64(),
                    verdict
                );
                if verdict.is_failure() {
                    warn!("{}", line);
                } else {
                    info!("{}", line);
                }

                if self.config.verbose {
                    for detail in detail_lines(comparison, self.config.sensibility) {
                        info!("{}", detail);
                    }
                }

                *verdict
            }
        }
    }

    /// Print the simulations that would run without executing them
    fn preview_operations(&self) -> Result<RunSummary> {
        let discovery = discover_references(
            self.system,
            &self.config.refs_path,
            self.config.recursive_scan,
            &self.config.extensions,
        )?;

        let total = discovery.cases.len();
        let first_test = self.config.first_test();
        let mut planned = Vec::new();

        for (index, case) in discovery.cases.iter().enumerate() {
            let id = index + 1;
            if id < first_test {
                continue;
            }

            match self.plan_case(&discovery, case) {
                Ok(command) => planned.push(PlannedCase {
                    id,
                    reference: case.clone(),
                    command,
                }),
                Err(err) => warn!("Test n°{} / {} - {}: {:#}", id, total, case.display(), err),
            }
        }

        match self.output_format {
            OutputFormat::Shell => {
                for entry in &planned {
                    println!("# Test n°{} / {} - {}", entry.id, total, entry.reference.display());
                    println!("{}", entry.command.to_shell());
                }
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&planned)
                    .map_err(|e| anyhow::anyhow!("Failed to serialize to JSON: {e}"))?;
                println!("{json}");
            }
        }

        Ok(RunSummary {
            total,
            ..RunSummary::default()
        })
    }

    /// Build the command a case would run
    fn plan_case(&self, discovery: &Discovery, case: &Path) -> Result<SimulationCommand> {
        let reference_path = discovery.reference_path(case);
        let content = self.system.read_to_string(&reference_path).map_err(|e| {
            RegressionError::reference(format!(
                "Failed to read reference file {}: {e}",
                reference_path.display()
            ))
        })?;
        let reference = ReferenceCase::parse(&content)?;
        SimulationCommand::from_recorded(&reference.command_line, &self.config)
    }
}

/// Merge CLI arguments into configuration
fn merge_cli_args(config: &mut Config, args: &Args) {
    if let Some(path) = args.refs_path.as_ref() {
        config.refs_path.clone_from(path);
    }
    if let Some(path) = args.results_path.as_ref() {
        config.results_path.clone_from(path);
    }
    if let Some(path) = args.build_path.as_ref() {
        config.build_path.clone_from(path);
    }
    if let Some(start_id) = args.start_id {
        config.start_id = start_id;
    }
    if let Some(sensibility) = args.sensibility {
        config.sensibility = sensibility;
    }
    if let Some(n_threads) = args.n_threads {
        config.n_threads = n_threads;
    }
    if let Some(recursive_scan) = args.recursive_scan {
        config.recursive_scan = recursive_scan;
    }
    if let Some(max_fe) = args.max_fe {
        config.max_fe = max_fe;
    }
    if let Some(weak_rate) = args.weak_rate {
        config.weak_rate = weak_rate;
    }
    if let Some(max_snr_time) = args.max_snr_time {
        config.max_snr_time = max_snr_time;
    }
    if !args.extensions.is_empty() {
        config.extensions.clone_from(&args.extensions);
    }
    config.verbose |= args.verbose;
}

/// Whether an error must stop the whole pass rather than abort one case
fn is_fatal(err: &anyhow::Error) -> bool {
    err.downcast_ref::<RegressionError>()
        .is_some_and(RegressionError::is_fatal)
}
