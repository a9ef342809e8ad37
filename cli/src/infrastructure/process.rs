//! Subprocess execution
//!
//! All external tools run through [`ToolCommand`]. Commands are awaited one at
//! a time. Ctrl-C reaches the child through the terminal's process group; a
//! child killed by SIGINT surfaces as [`ToolError::Interrupted`].

use std::path::{Path, PathBuf};
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::error::ToolError;

/// A single invocation of an external tool
#[derive(Debug, Clone)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    working_dir: Option<PathBuf>,
    envs: Vec<(String, String)>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            working_dir: None,
            envs: Vec::new(),
        }
    }

    pub fn arg(mut self, arg: impl AsRef<str>) -> Self {
        self.args.push(arg.as_ref().to_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.args
            .extend(args.into_iter().map(|a| a.as_ref().to_string()));
        self
    }

    /// Path argument, passed through lossily
    pub fn path_arg(self, path: &Path) -> Self {
        let path = path.to_string_lossy().into_owned();
        self.arg(path)
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.working_dir = Some(dir.into());
        self
    }

    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.envs.push((key.into(), value.into()));
        self
    }

    /// Human readable command line, used in logs and errors
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }

    fn build(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);
        if let Some(ref dir) = self.working_dir {
            cmd.current_dir(dir);
        }
        for (key, value) in &self.envs {
            cmd.env(key, value);
        }
        cmd
    }

    async fn wait(&self, mut cmd: Command) -> Result<Output, ToolError> {
        debug!("Running: {}", self.display());
        let output = cmd.output().await.map_err(|e| ToolError::SpawnFailed {
            command: self.display(),
            message: e.to_string(),
        })?;
        if killed_by_interrupt(&output) {
            return Err(ToolError::Interrupted {
                command: self.display(),
            });
        }
        Ok(output)
    }

    fn check(&self, output: &Output) -> Result<(), ToolError> {
        if output.status.success() {
            return Ok(());
        }
        Err(ToolError::CommandFailed {
            command: self.display(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        })
    }

    /// Run attached to the terminal so the tool can prompt the user
    pub async fn run(&self) -> Result<(), ToolError> {
        let mut cmd = self.build();
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        let output = self.wait(cmd).await?;
        self.check(&output)
    }

    /// Run and capture stdout
    pub async fn output(&self) -> Result<String, ToolError> {
        let mut cmd = self.build();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        let output = self.wait(cmd).await?;
        self.check(&output)?;
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    /// Run silently and return the exit code without treating failure as an error
    pub async fn exit_code(&self) -> Result<i32, ToolError> {
        let mut cmd = self.build();
        cmd.stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());
        let output = self.wait(cmd).await?;
        Ok(output.status.code().unwrap_or(-1))
    }
}

#[cfg(unix)]
fn killed_by_interrupt(output: &Output) -> bool {
    use std::os::unix::process::ExitStatusExt;
    output.status.signal() == Some(2)
}

#[cfg(not(unix))]
fn killed_by_interrupt(_output: &Output) -> bool {
    false
}
