//! External process execution
//!
//! The compiler is treated as an opaque validator: it either exits zero or
//! fails with diagnostic text. [`ProcessRunner`] is the seam tests replace
//! with fakes.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};
use tracing::debug;

/// Captured result of one process run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code (1 when the process was killed by a signal)
    pub exit_code: i32,
    /// Stdout output
    pub stdout: String,
    /// Stderr output
    pub stderr: String,
    /// Wall clock time
    pub execution_time: Duration,
}

impl ProcessOutput {
    /// Successful run with the given stdout
    pub fn ok(stdout: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
            execution_time: Duration::ZERO,
        }
    }

    /// Failed run with the given exit code and stdout
    ///
    /// The compiler reports diagnostics on stdout.
    pub fn failed(exit_code: i32, stdout: impl Into<String>) -> Self {
        Self {
            exit_code,
            stdout: stdout.into(),
            stderr: String::new(),
            execution_time: Duration::ZERO,
        }
    }

    /// Check if the process succeeded
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// Combined stdout and stderr
    pub fn output(&self) -> String {
        let mut output = String::new();
        if !self.stdout.is_empty() {
            output.push_str(self.stdout.trim_end());
        }
        if !self.stderr.is_empty() {
            if !output.is_empty() {
                output.push('\n');
            }
            output.push_str(self.stderr.trim_end());
        }
        output
    }
}

/// Runs external programs to completion
pub trait ProcessRunner {
    /// Run `program` with `args` inside `working_dir` and wait for it
    ///
    /// An `Err` means the process could not be started at all; a non-zero
    /// exit is reported through [`ProcessOutput::exit_code`].
    fn run(&self, program: &Path, args: &[String], working_dir: &Path)
        -> std::io::Result<ProcessOutput>;
}

/// Runs processes on the host with piped output
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    fn run(
        &self,
        program: &Path,
        args: &[String],
        working_dir: &Path,
    ) -> std::io::Result<ProcessOutput> {
        debug!(
            program = %program.display(),
            args = ?args,
            cwd = %working_dir.display(),
            "Spawning process"
        );

        let start = Instant::now();
        let output = Command::new(program)
            .args(args)
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?
            .wait_with_output()?;

        Ok(ProcessOutput {
            exit_code: output.status.code().unwrap_or(1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            execution_time: start.elapsed(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_combines_streams() {
        let result = ProcessOutput {
            exit_code: 2,
            stdout: "src/a.ts(1,1): error TS1\n".to_string(),
            stderr: "warning\n".to_string(),
            execution_time: Duration::ZERO,
        };
        assert!(!result.success());
        assert_eq!(result.output(), "src/a.ts(1,1): error TS1\nwarning");
    }

    #[test]
    fn test_output_single_stream() {
        assert_eq!(ProcessOutput::failed(1, "boom").output(), "boom");
        assert_eq!(ProcessOutput::ok("").output(), "");
        assert!(ProcessOutput::ok("").success());
    }

    #[cfg(unix)]
    #[test]
    fn test_system_runner_captures_output() {
        let dir = std::env::temp_dir();
        let result = SystemRunner
            .run(
                Path::new("sh"),
                &["-c".to_string(), "echo hello; echo oops >&2; exit 3".to_string()],
                &dir,
            )
            .unwrap();

        assert_eq!(result.exit_code, 3);
        assert!(result.stdout.contains("hello"));
        assert!(result.stderr.contains("oops"));
    }

    #[test]
    fn test_system_runner_missing_program() {
        let dir = std::env::temp_dir();
        let result = SystemRunner.run(
            Path::new("/nonexistent/typesver/bin/tsc"),
            &[],
            &dir,
        );
        assert!(result.is_err());
    }
}
