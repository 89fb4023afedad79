//! Process-level tests for the engine runner
//!
//! Each test writes a small shell script that speaks just enough UCI, points
//! the runner at it, and checks the outcome together with process teardown.

#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use uci_engine::{
    AnalysisRequest, EngineConfig, EngineError, EngineLocator, EngineRunner, Evaluation,
};

/// Write an executable `/bin/sh` engine whose `go` branch is `on_go`
fn script_engine(name: &str, on_uci: &str, on_go: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("{name}-{}.sh", uuid::Uuid::new_v4()));
    let pid_file = pid_file_for(&path);
    let script = format!(
        r#"#!/bin/sh
echo $$ > "{pid}"
while read -r cmd; do
  case "$cmd" in
    uci) {on_uci} ;;
    isready) echo "readyok" ;;
    go*) {on_go} ;;
    quit) exit 0 ;;
  esac
done
"#,
        pid = pid_file.display(),
    );
    std::fs::write(&path, script).expect("write engine script");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
    path
}

fn pid_file_for(script: &Path) -> PathBuf {
    script.with_extension("pid")
}

fn runner_for(path: &Path) -> EngineRunner {
    EngineRunner::new(EngineLocator::new(EngineConfig::with_path(path)))
}

fn is_running(pid: &str) -> bool {
    std::process::Command::new("kill")
        .args(["-0", pid])
        .stderr(std::process::Stdio::null())
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}

const HANDSHAKE: &str = r#"echo "id name ScriptFish"; echo "uciok""#;

#[tokio::test]
async fn test_scripted_engine_resolves() {
    let path = script_engine(
        "resolve",
        HANDSHAKE,
        r#"echo "info depth 9 score cp 10 nodes 100 pv d2d4"; echo "info depth 10 seldepth 14 score cp 35 nodes 4242 pv e2e4 e7e5"; echo "bestmove e2e4 ponder e7e5""#,
    );

    let result = runner_for(&path)
        .analyze(AnalysisRequest::default().with_depth(10))
        .await
        .expect("scripted engine resolves");

    assert_eq!(result.bestmove, "e2e4");
    assert_eq!(result.ponder.as_deref(), Some("e7e5"));
    assert_eq!(result.evaluation, Some(Evaluation::centipawns(35)));
    assert_eq!(result.depth, Some(10));
    assert_eq!(result.nodes, Some(4242));
    assert_eq!(result.pv.as_deref(), Some("e2e4 e7e5"));

    let pid = std::fs::read_to_string(pid_file_for(&path)).expect("pid file");
    assert!(!is_running(pid.trim()), "engine should be terminated");
}

#[tokio::test]
async fn test_silent_engine_times_out_and_is_killed() {
    let path = script_engine("timeout", HANDSHAKE, ":");

    let started = std::time::Instant::now();
    let err = runner_for(&path)
        .analyze(AnalysisRequest::default().with_movetime(0))
        .await
        .expect_err("engine never answers go");

    assert!(matches!(err, EngineError::Timeout(_)));
    assert!(started.elapsed() >= std::time::Duration::from_millis(1500));

    let pid = std::fs::read_to_string(pid_file_for(&path)).expect("pid file");
    assert!(!is_running(pid.trim()), "engine should be killed on timeout");
}

#[tokio::test]
async fn test_stderr_output_fails_session() {
    let path = script_engine("stderr", r#"echo "No such option: Hash" >&2"#, ":");

    let err = runner_for(&path)
        .analyze(AnalysisRequest::default())
        .await
        .expect_err("stderr is fatal");

    match err {
        EngineError::Stream { message } => assert_eq!(message, "No such option: Hash"),
        other => panic!("expected stream error, got {other:?}"),
    }

    let pid = std::fs::read_to_string(pid_file_for(&path)).expect("pid file");
    assert!(!is_running(pid.trim()), "engine should be killed after stderr");
}

#[tokio::test]
async fn test_engine_exiting_early_is_exited_and_reaped() {
    // Acknowledges the handshake, swallows `isready`, then quits
    let path = script_engine("early-exit", r#"echo "uciok"; read -r _; exit 0"#, ":");

    let err = runner_for(&path)
        .analyze(AnalysisRequest::default())
        .await
        .expect_err("engine exits before bestmove");
    assert!(matches!(err, EngineError::Exited), "got {err:?}");

    let pid = std::fs::read_to_string(pid_file_for(&path)).expect("pid file");
    assert!(!is_running(pid.trim()), "exited engine should be reaped");
}

#[tokio::test]
async fn test_malformed_move_is_rejected_before_spawn() {
    let path = script_engine("malformed", HANDSHAKE, r#"echo "bestmove e2e4""#);

    let err = runner_for(&path)
        .analyze(AnalysisRequest::default().with_moves(["e2e4\nquit"]))
        .await
        .expect_err("move token spans two lines");
    assert!(matches!(err, EngineError::InvalidRequest { .. }));
    assert!(!pid_file_for(&path).exists(), "engine should never start");
}

#[tokio::test]
async fn test_missing_engine_is_not_installed() {
    let path = std::env::temp_dir().join(format!("absent-{}", uuid::Uuid::new_v4()));

    let err = runner_for(&path)
        .analyze(AnalysisRequest::default())
        .await
        .expect_err("missing engine");
    assert!(matches!(err, EngineError::NotInstalled { .. }));
}

#[tokio::test]
async fn test_non_executable_engine_is_launch_error() {
    let path = std::env::temp_dir().join(format!("noexec-{}", uuid::Uuid::new_v4()));
    std::fs::write(&path, "not an engine").expect("write file");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o644)).expect("chmod");

    let err = runner_for(&path)
        .analyze(AnalysisRequest::default())
        .await
        .expect_err("cannot execute");
    assert!(matches!(err, EngineError::Launch(_)));
}

#[tokio::test]
async fn test_concurrent_processes_are_isolated() {
    let white = script_engine(
        "white",
        HANDSHAKE,
        r#"echo "info depth 22 score cp 41 nodes 90000 pv g1f3"; echo "bestmove g1f3""#,
    );
    let black = script_engine(
        "black",
        HANDSHAKE,
        r#"echo "info depth 6 score mate -1 nodes 12 pv d8h4"; echo "bestmove d8h4""#,
    );

    let (white_runner, black_runner) = (runner_for(&white), runner_for(&black));
    let (a, b) = tokio::join!(
        white_runner.analyze(AnalysisRequest::default()),
        black_runner.analyze(AnalysisRequest::default().with_moves(["f2f3", "e7e5", "g2g4"])),
    );
    let (a, b) = (a.expect("white resolves"), b.expect("black resolves"));

    assert_eq!(a.bestmove, "g1f3");
    assert_eq!((a.depth, a.nodes), (Some(22), Some(90000)));
    assert_eq!(b.bestmove, "d8h4");
    assert_eq!(b.evaluation, Some(Evaluation::mate(-1)));
    assert_eq!(b.pv.as_deref(), Some("d8h4"));
}
