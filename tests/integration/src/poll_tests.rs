//! Convergence polling integration tests.

use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use probe_integration_tests::{config_dump_json, init_tracing, target, Group};
use sidecar_probe::prelude::*;
use tokio::time::Instant;

const CLUSTER: &str = "outbound|80||fake-eds-external-service-1.com";

fn dump(version: &str) -> String {
    config_dump_json(version, CLUSTER, &[])
}

fn clusters_version(dump: &ConfigDump) -> Option<&str> {
    dump.clusters_dump().and_then(|c| c.version_info.as_deref())
}

fn fast_policy(max_attempts: u32) -> RetryPolicy {
    RetryPolicy::default()
        .with_interval(Duration::from_millis(1))
        .with_max_attempts(max_attempts)
}

#[tokio::test]
async fn first_snapshot_accepted_with_one_call() {
    init_tracing();
    let exec = MockExec::new().repeat_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);

    poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::Accept,
            &fast_policy(10),
            &CancelSignal::never(),
        )
        .await
        .unwrap();

    assert_eq!(exec.call_count(), 1);
}

#[tokio::test]
async fn never_accepting_predicate_times_out_with_third_snapshot() {
    init_tracing();
    let exec = MockExec::new()
        .respond_ok(dump("v1"))
        .respond_ok(dump("v2"))
        .respond_ok(dump("v3"))
        .repeat_ok(dump("v4"));
    let poller = ConvergencePoller::new(&exec);

    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::retry("never"),
            &fast_policy(3),
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert_eq!(exec.call_count(), 3);
    match &err {
        ProbeError::ConvergenceTimeout { attempts, last, .. } => {
            assert_eq!(*attempts, 3);
            assert!(!last.is_nothing());
        }
        other => panic!("expected timeout, got {other:?}"),
    }
    assert_eq!(err.last_snapshot().and_then(clusters_version), Some("v3"));
}

#[tokio::test]
async fn tolerated_failure_then_success() {
    init_tracing();
    let exec = MockExec::new()
        .respond_err(ExecFailure::new("container not running"))
        .respond_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);
    let policy = fast_policy(5).with_attempt_failure(AttemptFailure::Tolerate);

    let dump = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::Accept,
            &policy,
            &CancelSignal::never(),
        )
        .await
        .unwrap();

    assert_eq!(clusters_version(&dump), Some("v1"));
    assert_eq!(exec.call_count(), 2);
}

#[tokio::test]
async fn aborting_policy_returns_first_failure() {
    init_tracing();
    let exec = MockExec::new()
        .respond_err(ExecFailure::new("container not running"))
        .repeat_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);
    let policy = fast_policy(5).with_attempt_failure(AttemptFailure::Abort);

    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::Accept,
            &policy,
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::RemoteExecution { .. }));
    assert_eq!(exec.call_count(), 1);
}

#[tokio::test]
async fn every_attempt_failing_reports_last_error() {
    let exec = MockExec::new();
    let poller = ConvergencePoller::new(&exec);

    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::Accept,
            &fast_policy(4),
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert_eq!(exec.call_count(), 4);
    match err {
        ProbeError::ConvergenceTimeout { last: LastObservation::Error(last), .. } => {
            assert!(matches!(*last, ProbeError::RemoteExecution { .. }));
        }
        other => panic!("expected timeout carrying an error, got {other:?}"),
    }
}

#[tokio::test]
async fn permanent_failure_stops_polling() {
    let exec = MockExec::new().repeat_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);

    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::fail("cluster has wrong lb policy"),
            &fast_policy(10),
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert_eq!(exec.call_count(), 1);
    assert!(matches!(err, ProbeError::PredicateFailed { attempts: 1, .. }));
    assert!(err.to_string().contains("wrong lb policy"));
}

#[tokio::test(start_paused = true)]
async fn cancellation_during_wait_returns_promptly() {
    init_tracing();
    let exec = MockExec::new().repeat_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);
    let policy = RetryPolicy::default()
        .with_interval(Duration::from_secs(10))
        .without_time_limit();

    let controller = CancelController::new();
    let canceller = controller.clone();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        canceller.cancel();
    });

    let start = Instant::now();
    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::retry("waiting"),
            &policy,
            &controller.signal(),
        )
        .await
        .unwrap_err();

    assert!(start.elapsed() < Duration::from_secs(1));
    assert!(matches!(err, ProbeError::Cancelled { attempts: 1, .. }));
    assert_eq!(exec.call_count(), 1);
}

#[tokio::test(start_paused = true)]
async fn duration_budget_bounds_poll() {
    let exec = MockExec::new().repeat_ok(dump("v1"));
    let poller = ConvergencePoller::new(&exec);
    let policy = RetryPolicy::default()
        .with_interval(Duration::from_secs(2))
        .without_attempt_limit()
        .with_max_duration(Duration::from_secs(5));

    let start = Instant::now();
    let err = poller
        .wait_for_convergence(
            &target("a-v1-0"),
            |_| Verdict::retry("waiting"),
            &policy,
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    // Attempts at 0s, 2s and 4s; the last wait is cut to the deadline.
    assert_eq!(err.attempts(), Some(3));
    assert_eq!(exec.call_count(), 3);
    let elapsed = start.elapsed();
    assert!(elapsed >= Duration::from_secs(5));
    assert!(elapsed < Duration::from_secs(6));
}

#[tokio::test]
async fn sidecars_converge_independently() {
    init_tracing();
    let exec = Arc::new(MockExec::new().repeat_ok(config_dump_json(
        "v1",
        CLUSTER,
        &[Group {
            locality: ("region", "zone", "subzone"),
            addresses: &["10.10.10.10"],
            priority: 0,
        }],
    )));
    let policy = fast_policy(5);
    let cancel = CancelSignal::never();

    let sidecars: Vec<_> = ["a-v1-0", "b-v1-0", "c-v1-0"]
        .into_iter()
        .map(|pod| Sidecar::new(target(pod), Arc::clone(&exec)))
        .collect();

    let results = join_all(sidecars.iter().map(|sidecar| {
        sidecar.wait_for_config(
            predicates::endpoints_in_locality(CLUSTER, "region/zone"),
            &policy,
            &cancel,
        )
    }))
    .await;

    assert!(results.iter().all(Result::is_ok));
    assert_eq!(exec.call_count(), 3);
}

#[tokio::test]
async fn cancelling_one_controller_stops_all_polls() -> anyhow::Result<()> {
    let exec = Arc::new(MockExec::new().repeat_ok(dump("v1")));
    let policy = RetryPolicy::default().with_interval(Duration::from_millis(5));
    let controller = CancelController::new();

    let polls: Vec<_> = ["a-v1-0", "b-v1-0"]
        .into_iter()
        .map(|pod| {
            let sidecar = Sidecar::new(target(pod), Arc::clone(&exec));
            let policy = policy.clone();
            let signal = controller.signal();
            tokio::spawn(async move {
                sidecar
                    .wait_for_config(|_| Verdict::retry("waiting"), &policy, &signal)
                    .await
            })
        })
        .collect();

    tokio::time::sleep(Duration::from_millis(20)).await;
    controller.cancel();

    for poll in polls {
        let result = tokio::time::timeout(Duration::from_secs(5), poll).await??;
        assert!(matches!(result, Err(ProbeError::Cancelled { .. })));
    }
    Ok(())
}
