//! UCI session state machine
//!
//! A [`Session`] covers exactly one analysis on one engine process:
//!
//! ```text
//! Spawning -> AwaitingUciOk -> AwaitingReadyOk -> Searching -> Resolved
//!     \______________\_________________\______________\______> Failed
//! ```
//!
//! The state machine itself does no I/O. [`drive`] feeds it lines read from
//! the engine's stdout, writes the commands it asks for, and races the whole
//! exchange against the session timeout. Whatever settles the session first
//! wins; [`Session::settle`] is the single place that decides this, so later
//! events are ignored.
//!
//! The process side lives in [`crate::runner`].

use crate::error::{EngineError, EngineResult};
use crate::framing::LineBuffer;
use crate::protocol::{parse_bestmove, parse_info, AnalysisResult, SearchProgress};
use crate::request::AnalysisRequest;
use std::future::pending;
use std::time::Instant;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, trace, warn};
use uuid::Uuid;

/// Where a session is in the UCI exchange
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Spawning,
    AwaitingUciOk,
    AwaitingReadyOk,
    Searching,
    Resolved,
    Failed,
}

impl SessionState {
    pub fn is_terminal(self) -> bool {
        matches!(self, SessionState::Resolved | SessionState::Failed)
    }
}

/// What the driver should do after a line was fed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    /// Nothing to do
    Ignored,
    /// Write these commands to the engine, in order
    Send(Vec<String>),
    /// The search finished; the session is now resolved
    Resolved(AnalysisResult),
}

/// State for one analysis on one engine process
#[derive(Debug)]
pub struct Session {
    id: Uuid,
    request: AnalysisRequest,
    state: SessionState,
    progress: SearchProgress,
}

impl Session {
    pub fn new(request: AnalysisRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            request,
            state: SessionState::Spawning,
            progress: SearchProgress::default(),
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn request(&self) -> &AnalysisRequest {
        &self.request
    }

    /// Begin the handshake; returns the `uci` command
    pub fn start(&mut self) -> Vec<String> {
        if self.state != SessionState::Spawning {
            return Vec::new();
        }
        self.state = SessionState::AwaitingUciOk;
        vec!["uci".to_string()]
    }

    /// Advance on one complete line of engine output
    pub fn on_line(&mut self, line: &str) -> LineOutcome {
        let line = line.trim();
        match self.state {
            SessionState::AwaitingUciOk if line == "uciok" => {
                self.state = SessionState::AwaitingReadyOk;
                LineOutcome::Send(vec!["isready".to_string()])
            }
            SessionState::AwaitingReadyOk if line == "readyok" => {
                self.state = SessionState::Searching;
                LineOutcome::Send(vec![
                    self.request.position_command(),
                    self.request.go_command(),
                ])
            }
            SessionState::Searching => {
                if let Some(best) = parse_bestmove(line) {
                    if self.settle(SessionState::Resolved) {
                        let progress = std::mem::take(&mut self.progress);
                        return LineOutcome::Resolved(progress.finish(best));
                    }
                } else if let Some(update) = parse_info(line) {
                    self.progress.apply(update);
                }
                LineOutcome::Ignored
            }
            _ => LineOutcome::Ignored,
        }
    }

    /// Mark the session failed; `false` if it had already settled
    pub fn fail(&mut self) -> bool {
        self.settle(SessionState::Failed)
    }

    /// One-shot transition into a terminal state
    fn settle(&mut self, terminal: SessionState) -> bool {
        debug_assert!(terminal.is_terminal());
        if self.state.is_terminal() {
            return false;
        }
        self.state = terminal;
        true
    }
}

/// Run a session over the engine's pipes until it resolves or fails
///
/// `stderr` is optional so in-memory engines can leave it out. Anything the
/// engine writes there before resolution is fatal. The exchange, writes
/// included, is bounded by the request's timeout.
pub async fn drive<W, R, E>(
    session: &mut Session,
    stdin: W,
    stdout: R,
    stderr: Option<E>,
) -> EngineResult<AnalysisResult>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let started = Instant::now();
    let timeout = session.request().timeout();

    let outcome = match tokio::time::timeout(timeout, exchange(session, stdin, stdout, stderr)).await
    {
        Ok(outcome) => outcome,
        Err(_) => Err(EngineError::Timeout(timeout)),
    };

    let elapsed_ms = started.elapsed().as_millis() as u64;
    match &outcome {
        Ok(result) => info!(
            session = %session.id(),
            bestmove = %result.bestmove,
            depth = ?result.depth,
            elapsed_ms,
            "Analysis resolved"
        ),
        Err(e) => {
            session.fail();
            warn!(session = %session.id(), elapsed_ms, error = %e, "Analysis failed");
        }
    }
    outcome
}

async fn exchange<W, R, E>(
    session: &mut Session,
    mut stdin: W,
    mut stdout: R,
    mut stderr: Option<E>,
) -> EngineResult<AnalysisResult>
where
    W: AsyncWrite + Unpin,
    R: AsyncRead + Unpin,
    E: AsyncRead + Unpin,
{
    let mut lines = LineBuffer::new();
    let mut out_buf = [0u8; 4096];
    let mut err_buf = [0u8; 1024];

    let commands = session.start();
    send(session.id(), &mut stdin, &commands).await?;

    loop {
        tokio::select! {
            read = stdout.read(&mut out_buf) => {
                let n = read?;
                if n == 0 {
                    return Err(EngineError::Exited);
                }
                for line in lines.push(&out_buf[..n]) {
                    trace!(session = %session.id(), line = %line, "<- engine");
                    match session.on_line(&line) {
                        LineOutcome::Ignored => {}
                        LineOutcome::Send(commands) => send(session.id(), &mut stdin, &commands).await?,
                        LineOutcome::Resolved(result) => return Ok(result),
                    }
                }
            }
            read = read_optional(&mut stderr, &mut err_buf) => {
                match read? {
                    // Closed stderr is not an error; stop polling it
                    0 => stderr = None,
                    n => {
                        let message = String::from_utf8_lossy(&err_buf[..n]).trim().to_string();
                        return Err(EngineError::Stream { message });
                    }
                }
            }
        }
    }
}

/// Read from `reader`, or wait forever when there is none
async fn read_optional<E>(reader: &mut Option<E>, buf: &mut [u8]) -> std::io::Result<usize>
where
    E: AsyncRead + Unpin,
{
    match reader {
        Some(reader) => reader.read(buf).await,
        None => pending().await,
    }
}

async fn send<W>(session: Uuid, stdin: &mut W, commands: &[String]) -> EngineResult<()>
where
    W: AsyncWrite + Unpin,
{
    for command in commands {
        debug!(session = %session, command = %command, "-> engine");
        stdin.write_all(command.as_bytes()).await.map_err(write_error)?;
        stdin.write_all(b"\n").await.map_err(write_error)?;
    }
    stdin.flush().await.map_err(write_error)?;
    Ok(())
}

/// A closed stdin means the engine is gone
fn write_error(e: std::io::Error) -> EngineError {
    match e.kind() {
        std::io::ErrorKind::BrokenPipe => EngineError::Exited,
        _ => EngineError::Io(e),
    }
}
