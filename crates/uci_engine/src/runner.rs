//! Engine process runner
//!
//! Spawns one engine process per analysis, hands its pipes to
//! [`session::drive`], and tears the process down afterwards. The only path
//! that leaves nothing to tear down is a failed launch.
//!
//! Processes are spawned with `kill_on_drop`, so if the caller stops awaiting
//! (an HTTP client disconnecting, for example) the engine is killed as well.

use crate::error::{EngineError, EngineResult};
use crate::locator::EngineLocator;
use crate::protocol::AnalysisResult;
use crate::request::AnalysisRequest;
use crate::session::{self, Session};
use std::process::Stdio;
use tokio::process::{Child, Command};
use tracing::{debug, info_span, warn, Instrument};

/// Runs analyses against the engine the locator points at
#[derive(Debug, Clone, Default)]
pub struct EngineRunner {
    locator: EngineLocator,
}

impl EngineRunner {
    pub fn new(locator: EngineLocator) -> Self {
        Self { locator }
    }

    pub fn locator(&self) -> &EngineLocator {
        &self.locator
    }

    /// Analyze one position on a fresh engine process
    ///
    /// Fails with [`EngineError::InvalidRequest`] or
    /// [`EngineError::NotInstalled`] before spawning anything when the request
    /// cannot be sent or the binary is missing.
    pub async fn analyze(&self, request: AnalysisRequest) -> EngineResult<AnalysisResult> {
        request.validate()?;
        let path = self.locator.require()?;
        let mut session = Session::new(request);
        let span = info_span!("engine_session", session = %session.id());

        async move {
            debug!(path = %path.display(), "Spawning engine");
            let mut child = Command::new(&path)
                .stdin(Stdio::piped())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .spawn()
                .map_err(|e| {
                    session.fail();
                    EngineError::Launch(e)
                })?;

            let outcome = match take_pipes(&mut child) {
                Ok((stdin, stdout, stderr)) => {
                    session::drive(&mut session, stdin, stdout, Some(stderr)).await
                }
                Err(e) => {
                    session.fail();
                    Err(e)
                }
            };

            terminate(&mut child).await;
            outcome
        }
        .instrument(span)
        .await
    }
}

type Pipes = (
    tokio::process::ChildStdin,
    tokio::process::ChildStdout,
    tokio::process::ChildStderr,
);

fn take_pipes(child: &mut Child) -> EngineResult<Pipes> {
    let missing = |name: &str| EngineError::Io(std::io::Error::other(format!("engine {name} not captured")));
    let stdin = child.stdin.take().ok_or_else(|| missing("stdin"))?;
    let stdout = child.stdout.take().ok_or_else(|| missing("stdout"))?;
    let stderr = child.stderr.take().ok_or_else(|| missing("stderr"))?;
    Ok((stdin, stdout, stderr))
}

/// Kill the engine and reap it
async fn terminate(child: &mut Child) {
    match child.try_wait() {
        Ok(Some(status)) => {
            debug!(%status, "Engine already exited");
            return;
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "Could not poll engine status"),
    }

    match child.kill().await {
        Ok(()) => debug!("Engine terminated"),
        Err(e) => warn!(error = %e, "Failed to terminate engine"),
    }
}
