//! Launching the tuning binary.

use std::fs::File;
use std::path::Path;
use std::process::{Command, Stdio};

use thiserror::Error;

/// Why a single launch did not succeed.
#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("failed to run '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{status}\n{stderr}")]
    Failed { status: String, stderr: String },
}

/// Runs one benchmark invocation with stdout redirected into `stdout`.
pub trait Launcher {
    fn launch(
        &mut self,
        program: &Path,
        args: &[String],
        stdout: File,
    ) -> Result<(), LaunchError>;
}

/// Launches the program as a child process with an explicit argument list.
#[derive(Clone, Copy, Debug, Default)]
pub struct ProcessLauncher;

impl Launcher for ProcessLauncher {
    fn launch(
        &mut self,
        program: &Path,
        args: &[String],
        stdout: File,
    ) -> Result<(), LaunchError> {
        let output = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::from(stdout))
            .stderr(Stdio::piped())
            .output()
            .map_err(|source| LaunchError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(LaunchError::Failed {
                status: output.status.to_string(),
                stderr: stderr.trim().to_string(),
            });
        }
        Ok(())
    }
}
