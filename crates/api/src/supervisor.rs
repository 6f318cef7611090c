//! Ownership of the renderer child process.
//!
//! At most one renderer runs at a time. Every start stops the previous
//! child first: SIGTERM, wait up to the stop timeout, then kill.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use slidekiosk_core::SlideshowSettings;
use tokio::process::{Child, Command};
use tokio::sync::Mutex;

#[derive(Debug, thiserror::Error)]
pub enum SupervisorError {
    #[error("failed to launch renderer {program}: {source}")]
    Spawn {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Guards the single renderer slot.
#[derive(Debug)]
pub struct RendererSupervisor {
    program: PathBuf,
    stop_timeout: Duration,
    child: Mutex<Option<Child>>,
}

/// Positional renderer arguments: `IMAGES DELAY TRANSITION DURATION`.
pub fn renderer_args(paths: &[PathBuf], settings: &SlideshowSettings) -> Vec<String> {
    let images = paths
        .iter()
        .map(|p| p.to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join(",");
    vec![
        images,
        settings.delay.to_string(),
        settings.transition.as_str().to_string(),
        settings.transition_duration.to_string(),
    ]
}

impl RendererSupervisor {
    pub fn new(program: impl Into<PathBuf>, stop_timeout: Duration) -> Self {
        Self {
            program: program.into(),
            stop_timeout,
            child: Mutex::new(None),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Replace any running renderer with a new one showing `paths`.
    ///
    /// Returns the new child's pid when the platform reports one.
    pub async fn start(
        &self,
        paths: &[PathBuf],
        settings: &SlideshowSettings,
    ) -> Result<Option<u32>, SupervisorError> {
        let mut slot = self.child.lock().await;
        self.stop_locked(&mut slot).await;

        let args = renderer_args(paths, settings);
        let child = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| SupervisorError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let pid = child.id();
        tracing::info!(
            pid = ?pid,
            images = paths.len(),
            transition = %settings.transition,
            "Renderer started"
        );
        *slot = Some(child);
        Ok(pid)
    }

    /// Stop the renderer if one is running. Returns whether one was.
    pub async fn stop(&self) -> bool {
        let mut slot = self.child.lock().await;
        self.stop_locked(&mut slot).await
    }

    /// Whether the renderer is still alive. Reaps it when it has exited.
    pub async fn is_running(&self) -> bool {
        let mut slot = self.child.lock().await;
        let Some(child) = slot.as_mut() else {
            return false;
        };
        match child.try_wait() {
            Ok(None) => true,
            Ok(Some(status)) => {
                tracing::info!(%status, "Renderer exited on its own");
                *slot = None;
                false
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to poll renderer, dropping handle");
                *slot = None;
                false
            }
        }
    }

    async fn stop_locked(&self, slot: &mut Option<Child>) -> bool {
        let Some(mut child) = slot.take() else {
            return false;
        };

        if let Ok(Some(status)) = child.try_wait() {
            tracing::debug!(%status, "Renderer had already exited");
            return false;
        }

        let pid = child.id();
        request_terminate(&mut child);

        match tokio::time::timeout(self.stop_timeout, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::info!(pid = ?pid, %status, "Renderer stopped");
            }
            Ok(Err(e)) => {
                tracing::warn!(pid = ?pid, error = %e, "Failed to wait for renderer");
            }
            Err(_) => {
                tracing::warn!(
                    pid = ?pid,
                    timeout_secs = self.stop_timeout.as_secs_f64(),
                    "Renderer ignored SIGTERM, killing"
                );
                if let Err(e) = child.kill().await {
                    tracing::error!(pid = ?pid, error = %e, "Failed to kill renderer");
                }
            }
        }
        true
    }
}

/// Ask the child to exit gracefully.
#[cfg(unix)]
fn request_terminate(child: &mut Child) {
    let Some(pid) = child.id() else {
        return;
    };
    let Ok(pid) = libc::pid_t::try_from(pid) else {
        return;
    };
    // Safety: `kill` has no memory-safety preconditions; the pid belongs to a
    // child we have not reaped yet.
    let ret = unsafe { libc::kill(pid, libc::SIGTERM) };
    if ret != 0 {
        tracing::warn!(
            pid,
            error = %std::io::Error::last_os_error(),
            "Failed to send SIGTERM to renderer"
        );
    }
}

#[cfg(not(unix))]
fn request_terminate(child: &mut Child) {
    if let Err(e) = child.start_kill() {
        tracing::warn!(error = %e, "Failed to terminate renderer");
    }
}
