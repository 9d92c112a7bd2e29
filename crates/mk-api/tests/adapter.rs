#![cfg(unix)]

use std::{fs, sync::Arc, time::Duration};

use mk_api::{ApiError, ApiHandler, ExecutorAdapter, MakeRequest};
use mk_exec::{CancellationToken, Executor, ExecutorConfig, FailureKind};
use tempfile::TempDir;

fn adapter(dir: &TempDir, shutdown: CancellationToken) -> ExecutorAdapter {
    let cfg = ExecutorConfig::default()
        .with_program("sh")
        .with_workdir(dir.path())
        .with_timeout(Duration::from_secs(10))
        .with_max_concurrent(2);
    let executor = Arc::new(Executor::new(cfg, Vec::new()).unwrap());
    ExecutorAdapter::new(executor, shutdown)
}

fn request(target: &str) -> MakeRequest {
    MakeRequest {
        target: target.to_string(),
        ..Default::default()
    }
}

#[tokio::test]
async fn empty_target_is_rejected_before_the_gate() {
    let dir = TempDir::new().unwrap();
    let api = adapter(&dir, CancellationToken::new());

    let err = api.make(request(""), CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidRequest(_)));
    assert_eq!(api.executor().gate().admitted(), 0);
    assert_eq!(api.executor().gate().in_use(), 0);
}

#[tokio::test]
async fn runs_target_in_request_workdir() {
    let dir = TempDir::new().unwrap();
    let sub = dir.path().join("sub");
    fs::create_dir_all(&sub).unwrap();
    fs::write(sub.join("pwd.sh"), "pwd\n").unwrap();
    let api = adapter(&dir, CancellationToken::new());

    let run = api
        .make(
            MakeRequest {
                target: "pwd.sh".into(),
                file: None,
                workdir: Some(sub.display().to_string()),
            },
            CancellationToken::new(),
        )
        .await
        .unwrap();

    assert!(run.is_success());
    let reported = fs::canonicalize(run.result.stdout.trim()).unwrap();
    assert_eq!(reported, fs::canonicalize(&sub).unwrap());
}

#[tokio::test]
async fn shutdown_cancels_in_flight_runs() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("slow.sh"), "sleep 10\n").unwrap();
    let shutdown = CancellationToken::new();
    let api = Arc::new(adapter(&dir, shutdown.clone()));

    let run = {
        let api = Arc::clone(&api);
        tokio::spawn(async move { api.make(request("slow.sh"), CancellationToken::new()).await })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;
    shutdown.cancel();

    let run = run.await.unwrap().unwrap();
    assert_eq!(run.result.exit_code, -1);
    assert_eq!(run.error.as_ref().map(|e| e.kind()), Some(FailureKind::Cancelled));
    assert_eq!(api.executor().gate().in_use(), 0);
}

#[tokio::test]
async fn caller_cancellation_stops_the_run() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("slow.sh"), "sleep 10\n").unwrap();
    let shutdown = CancellationToken::new();
    let api = Arc::new(adapter(&dir, shutdown.clone()));
    let caller = CancellationToken::new();

    let run = {
        let api = Arc::clone(&api);
        let caller = caller.clone();
        tokio::spawn(async move { api.make(request("slow.sh"), caller).await })
    };
    tokio::time::sleep(Duration::from_millis(150)).await;
    caller.cancel();

    let run = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("cancelled run returns well before the timeout")
        .unwrap()
        .unwrap();
    assert_eq!(run.error.as_ref().map(|e| e.kind()), Some(FailureKind::Cancelled));
    assert_eq!(run.result.exit_code, -1);
    assert!(!shutdown.is_cancelled());
    assert_eq!(api.executor().gate().in_use(), 0);
}

#[tokio::test]
async fn caller_cancellation_while_waiting_launches_nothing() {
    let dir = TempDir::new().unwrap();
    fs::write(dir.path().join("slow.sh"), "sleep 10\n").unwrap();
    let shutdown = CancellationToken::new();
    let api = Arc::new(adapter(&dir, shutdown.clone()));

    let busy: Vec<_> = (0..2)
        .map(|_| {
            let api = Arc::clone(&api);
            tokio::spawn(async move { api.make(request("slow.sh"), CancellationToken::new()).await })
        })
        .collect();
    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(api.executor().gate().in_use(), 2);

    let caller = CancellationToken::new();
    let waiter = {
        let api = Arc::clone(&api);
        let caller = caller.clone();
        tokio::spawn(async move { api.make(request("slow.sh"), caller).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    caller.cancel();

    let err = waiter.await.unwrap().unwrap_err();
    assert!(matches!(err, ApiError::Unavailable(_)));
    assert_eq!(api.executor().gate().admitted(), 2);

    shutdown.cancel();
    for run in busy {
        let run = run.await.unwrap().unwrap();
        assert_eq!(run.error.as_ref().map(|e| e.kind()), Some(FailureKind::Cancelled));
    }
}

#[tokio::test]
async fn closed_gate_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let api = adapter(&dir, CancellationToken::new());
    api.executor().gate().close();

    let err = api.make(request("anything.sh"), CancellationToken::new()).await.unwrap_err();
    assert!(matches!(err, ApiError::Unavailable(_)));
}
