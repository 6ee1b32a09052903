//! Simulation command lines: building the argv of a replay and rendering it

use core::str::FromStr;

use crate::config::Config;
use crate::error::RegressionError;
use crate::operations::tokenize::tokenize;
use crate::utils::path::resolve_program;
use anyhow::Result;
use serde::Serialize;
use std::path::PathBuf;

/// Output format for the dry-run listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum OutputFormat {
    /// Shell-escaped command ready to execute
    Shell,
    /// JSON array of program, arguments and working directory per case
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "shell" => Ok(Self::Shell),
            "json" => Ok(Self::Json),
            _ => Err(format!("Invalid format: {s}. Use 'shell' or 'json'")),
        }
    }
}

/// A fully resolved simulator invocation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SimulationCommand {
    pub program: PathBuf,
    pub args: Vec<String>,
    pub working_dir: PathBuf,
}

impl SimulationCommand {
    /// Build the invocation replaying a recorded command line
    ///
    /// The recorded words are followed by the flags that make the run
    /// reproducible and bounded: no intermediate reports, the frame error
    /// budget, the thread count, no colors and the per-point time budget.
    ///
    /// # Errors
    ///
    /// Returns a reference error if the command line cannot be tokenized.
    pub fn from_recorded(command_line: &str, config: &Config) -> Result<Self> {
        let mut words = tokenize(command_line)?.into_iter();
        let program = words
            .next()
            .ok_or_else(|| RegressionError::reference("The command line has no program"))?;

        let mut args: Vec<String> = words.collect();
        args.push("--ter-freq".to_owned());
        args.push("0".to_owned());
        if config.max_fe > 0 {
            args.push("-e".to_owned());
            args.push(config.max_fe.to_string());
        }
        args.push("-t".to_owned());
        args.push(config.n_threads.to_string());
        args.push("--sim-no-colors".to_owned());
        if config.max_snr_time > 0 {
            args.push("--sim-stop-time".to_owned());
            args.push(config.max_snr_time.to_string());
        }

        Ok(Self {
            program: resolve_program(&config.build_path, &program),
            args,
            working_dir: config.build_path.clone(),
        })
    }

    /// Format as `cd <dir> && <program> <args...>` with proper escaping,
    /// one argument per continuation line
    #[must_use]
    pub fn to_shell(&self) -> String {
        let mut output = format!(
            "cd {} && {}",
            shell_escape(&self.working_dir.to_string_lossy()),
            shell_escape(&self.program.to_string_lossy())
        );

        for arg in &self.args {
            output.push_str(" \\\n  ");
            output.push_str(&shell_escape(arg));
        }

        output
    }
}

/// Escape a string for shell execution
/// Uses double quotes for safety, escaping special characters inside
fn shell_escape(s: &str) -> String {
    if !s.is_empty()
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '/' || c == '.' || c == ':'
        })
    {
        return s.to_owned();
    }

    let mut result = String::from('"');
    for ch in s.chars() {
        match ch {
            '"' => result.push_str(r#"\""#),
            '\\' => result.push_str(r"\\"),
            '$' => result.push_str(r"\$"),
            '`' => result.push_str(r"\`"),
            '!' => result.push_str(r"\!"),
            _ => result.push(ch),
        }
    }
    result.push('"');
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    fn config() -> Config {
        Config {
            build_path: PathBuf::from("/opt/build"),
            ..Config::default()
        }
    }

    #[test]
    fn appends_replay_flags() {
        let command =
            SimulationCommand::from_recorded(r#"bin/aff3ct -C "POLAR" -m "1.0""#, &config())
                .unwrap();

        assert_eq!(command.program, Path::new("/opt/build/bin/aff3ct"));
        assert_eq!(command.working_dir, Path::new("/opt/build"));
        assert_eq!(
            command.args,
            vec![
                "-C",
                "POLAR",
                "-m",
                "1.0",
                "--ter-freq",
                "0",
                "-e",
                "100",
                "-t",
                "0",
                "--sim-no-colors",
                "--sim-stop-time",
                "600"
            ]
        );
    }

    #[test]
    fn zero_budgets_are_omitted() {
        let config = Config {
            max_fe: 0,
            max_snr_time: 0,
            n_threads: 8,
            ..config()
        };
        let command = SimulationCommand::from_recorded("sim -K 4", &config).unwrap();
        assert_eq!(command.program, Path::new("sim"));
        assert_eq!(
            command.args,
            vec!["-K", "4", "--ter-freq", "0", "-t", "8", "--sim-no-colors"]
        );
    }

    #[test]
    fn bad_command_line() {
        assert!(SimulationCommand::from_recorded(r#"sim "open"#, &config()).is_err());
    }

    #[test]
    fn shell_escape_simple() {
        assert_eq!(shell_escape("simple"), "simple");
        assert_eq!(shell_escape("path/to/file"), "path/to/file");
        assert_eq!(shell_escape("--sim-no-colors"), "--sim-no-colors");
        assert_eq!(shell_escape(""), r#""""#);
    }

    #[test]
    fn shell_escape_special_chars() {
        assert_eq!(shell_escape("has space"), r#""has space""#);
        assert_eq!(shell_escape("has$dollar"), r#""has\$dollar""#);
        assert_eq!(shell_escape(r#"has"quote"#), r#""has\"quote""#);
        assert_eq!(shell_escape("back\\slash"), r#""back\\slash""#);
    }

    #[test]
    fn shell_rendering() {
        let command =
            SimulationCommand::from_recorded(r#"bin/sim --dec "FAST SIMD""#, &config()).unwrap();

        let shell = command.to_shell();
        let lines: Vec<&str> = shell.lines().collect();
        assert_eq!(lines[0], "cd /opt/build && /opt/build/bin/sim \\");
        assert_eq!(lines[1], "  --dec \\");
        assert_eq!(lines[2], "  \"FAST SIMD\" \\");
        assert_eq!(lines[3], "  --ter-freq \\");
        assert_eq!(lines.last().copied(), Some("  600"));
        assert_eq!(lines.len(), 1 + command.args.len());
    }

    #[test]
    fn serializes_for_json_listing() {
        let command = SimulationCommand::from_recorded("bin/sim -K 4", &config()).unwrap();
        let value = serde_json::to_value(&command).unwrap();
        assert_eq!(value["program"], "/opt/build/bin/sim");
        assert_eq!(value["args"][1], "4");
        assert_eq!(value["working_dir"], "/opt/build");
    }

    #[test]
    fn output_format_from_str() {
        assert_eq!("shell".parse::<OutputFormat>().unwrap(), OutputFormat::Shell);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        "invalid".parse::<OutputFormat>().unwrap_err();
    }
}
