//! Workflow engine launcher
//!
//! Starts the external workflow automation process with a fixed local
//! environment and stays in the foreground until it exits. Termination
//! signals received by the CLI are forwarded to the child.

use crate::consts::cli_consts::workflow;
use std::io;
use std::process::{ExitStatus, Stdio};
use thiserror::Error;
use tokio::process::{Child, Command};

#[cfg(unix)]
use nix::sys::signal::{Signal, kill};
#[cfg(unix)]
use nix::unistd::Pid;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("Failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Failed while waiting for the workflow process: {0}")]
    Wait(#[from] io::Error),
}

/// Editor URL the workflow engine serves once started.
pub fn editor_url() -> String {
    format!(
        "{}://{}:{}",
        workflow::PROTOCOL,
        workflow::HOST,
        workflow::PORT
    )
}

/// Environment passed to the workflow process.
pub fn workflow_env() -> Vec<(&'static str, String)> {
    vec![
        ("N8N_HOST", workflow::HOST.to_string()),
        ("N8N_PORT", workflow::PORT.to_string()),
        ("N8N_PROTOCOL", workflow::PROTOCOL.to_string()),
        ("N8N_EDITOR_BASE_URL", editor_url()),
    ]
}

#[derive(Debug, Clone)]
pub struct WorkflowLauncher {
    program: String,
    args: Vec<String>,
}

impl WorkflowLauncher {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    fn command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command
            .args(&self.args)
            .envs(workflow_env())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());
        command
    }

    /// Starts the process and waits for it to exit.
    ///
    /// SIGINT and SIGTERM are forwarded to the child; the launcher keeps
    /// waiting so the child's own exit status is what gets reported.
    pub async fn run(&self) -> Result<ExitStatus, LaunchError> {
        let mut child = self.command().spawn().map_err(|source| LaunchError::Spawn {
            program: self.program.clone(),
            source,
        })?;
        log::info!(
            "Started '{}' (pid {:?}), editor at {}",
            self.program,
            child.id(),
            editor_url()
        );
        wait_forwarding_signals(&mut child).await
    }
}

#[cfg(unix)]
async fn wait_forwarding_signals(child: &mut Child) -> Result<ExitStatus, LaunchError> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = signal(SignalKind::interrupt())?;
    let mut terminate = signal(SignalKind::terminate())?;
    loop {
        tokio::select! {
            status = child.wait() => return Ok(status?),
            _ = interrupt.recv() => forward_signal(child, Signal::SIGINT),
            _ = terminate.recv() => forward_signal(child, Signal::SIGTERM),
        }
    }
}

#[cfg(unix)]
fn forward_signal(child: &Child, signal: Signal) {
    // `id` is None once the child has been reaped.
    let Some(pid) = child.id() else {
        return;
    };
    log::info!("Forwarding {} to workflow process {}", signal, pid);
    if let Err(e) = kill(Pid::from_raw(pid as i32), signal) {
        log::warn!("Failed to forward {}: {}", signal, e);
    }
}

#[cfg(not(unix))]
async fn wait_forwarding_signals(child: &mut Child) -> Result<ExitStatus, LaunchError> {
    loop {
        tokio::select! {
            status = child.wait() => return Ok(status?),
            Ok(()) = tokio::signal::ctrl_c() => child.start_kill()?,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workflow_env_is_local() {
        let env = workflow_env();
        assert!(env.contains(&("N8N_HOST", "localhost".to_string())));
        assert!(env.contains(&("N8N_PORT", "5678".to_string())));
        assert!(env.contains(&("N8N_PROTOCOL", "http".to_string())));
        assert!(env.contains(&("N8N_EDITOR_BASE_URL", "http://localhost:5678".to_string())));
    }

    #[tokio::test]
    async fn test_missing_program_fails_to_start() {
        let launcher = WorkflowLauncher::new("trend-dash-no-such-program", Vec::new());
        let err = launcher.run().await.unwrap_err();
        assert!(matches!(err, LaunchError::Spawn { ref program, .. } if program == "trend-dash-no-such-program"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_exit_code_is_reported() {
        let launcher = WorkflowLauncher::new("sh", vec!["-c".to_string(), "exit 3".to_string()]);
        let status = launcher.run().await.unwrap();
        assert_eq!(status.code(), Some(3));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_child_sees_fixed_environment() {
        let launcher = WorkflowLauncher::new(
            "sh",
            vec![
                "-c".to_string(),
                r#"test "$N8N_PORT" = 5678 && test "$N8N_EDITOR_BASE_URL" = http://localhost:5678"#
                    .to_string(),
            ],
        );
        assert!(launcher.run().await.unwrap().success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_forwarded_signal_terminates_child() {
        use std::os::unix::process::ExitStatusExt;

        let mut child = Command::new("sleep").arg("30").spawn().unwrap();
        forward_signal(&child, Signal::SIGTERM);
        let status = child.wait().await.unwrap();
        assert_eq!(status.signal(), Some(Signal::SIGTERM as i32));
    }
}
