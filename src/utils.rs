use anyhow::{Context, anyhow};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command as AsyncCommand;

/// A concrete program invocation with no placeholders left.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl ResolvedCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

impl std::fmt::Display for ResolvedCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            if arg.contains(char::is_whitespace) {
                write!(f, " \"{}\"", arg)?;
            } else {
                write!(f, " {}", arg)?;
            }
        }
        Ok(())
    }
}

/// Runs one child process to completion inside `cwd`.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    async fn run(&mut self, command: &ResolvedCommand, cwd: &Path) -> anyhow::Result<()>;
}

/// Spawns real processes, one at a time, with a spinner while each runs.
pub struct ProcessRunner {
    show_progress: bool,
}

impl ProcessRunner {
    pub fn new(show_progress: bool) -> Self {
        Self { show_progress }
    }

    fn spinner(&self, command: &ResolvedCommand) -> anyhow::Result<ProgressBar> {
        if !self.show_progress {
            return Ok(ProgressBar::hidden());
        }
        let pb = ProgressBar::new_spinner();
        pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} [{elapsed_precise}] {msg}")?);
        pb.set_message(format!("Running: {}", command));
        pb.enable_steady_tick(Duration::from_millis(100));
        Ok(pb)
    }
}

impl CommandRunner for ProcessRunner {
    async fn run(&mut self, command: &ResolvedCommand, cwd: &Path) -> anyhow::Result<()> {
        log::debug!("running `{}` in {}", command, cwd.display());
        let pb = self.spinner(command)?;

        let output = AsyncCommand::new(&command.program)
            .args(&command.args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .with_context(|| format!("could not start `{}`", command.program));

        let output = match output {
            Ok(output) => output,
            Err(err) => {
                pb.finish_and_clear();
                return Err(err);
            }
        };

        if output.status.success() {
            pb.finish_and_clear();
            log::debug!("{}", String::from_utf8_lossy(&output.stdout).trim_end());
            Ok(())
        } else {
            pb.finish_with_message(format!("❌ Failed: {}", command));
            let stderr = String::from_utf8_lossy(&output.stderr);
            let detail = stderr.trim();
            if detail.is_empty() {
                Err(anyhow!("`{}` exited with {}", command, output.status))
            } else {
                Err(anyhow!("`{}` exited with {}: {}", command, output.status, detail))
            }
        }
    }
}
