//! Locality failover integration tests.
//!
//! Models a scenario where a service entry with endpoints in several
//! localities is applied and the client sidecar should end up with failover
//! priorities ordered by locality distance.

use std::time::Duration;

use probe_integration_tests::{config_dump_json, init_tracing, target, Group};
use sidecar_probe::poll::predicates::{all_of, BoxPredicate};
use sidecar_probe::prelude::*;

fn failover_groups() -> Vec<Group<'static>> {
    vec![
        Group {
            locality: ("region", "zone", "subzone"),
            addresses: &["10.10.10.10"],
            priority: 0,
        },
        Group {
            locality: ("closeregion", "zone", "subzone"),
            addresses: &["10.28.1.138"],
            priority: 1,
        },
        Group {
            locality: ("notcloseregion", "zone", "subzone"),
            addresses: &["10.28.1.139"],
            priority: 2,
        },
    ]
}

fn unprioritized_groups() -> Vec<Group<'static>> {
    failover_groups()
        .into_iter()
        .map(|g| Group { priority: 0, ..g })
        .collect()
}

fn policy() -> RetryPolicy {
    RetryPolicy::default()
        .with_interval(Duration::from_millis(1))
        .with_max_attempts(10)
}

#[test]
fn locality_parsing() {
    let full: Locality = "region/zone/subzone".parse().unwrap();
    assert_eq!(full.region(), "region");
    assert_eq!(full.zone(), "zone");
    assert_eq!(full.sub_zone(), "subzone");
    assert_eq!(full.to_string(), "region/zone/subzone");

    let region: Locality = "region".parse().unwrap();
    assert!(full.is_within(&region));
    assert!(!region.is_within(&full));
    assert!(full.is_within(&Locality::default()));

    assert!("a/b/c/d".parse::<Locality>().is_err());
    assert!("a//c".parse::<Locality>().is_err());
}

#[tokio::test]
async fn waits_for_failover_priorities() {
    init_tracing();
    let hosts = HostnameSequence::deterministic("fake-eds-external-service", ".com");
    let host = hosts.next_hostname();
    let cluster = format!("outbound|80||{host}");

    // First push carries the endpoints without priorities; the second one
    // has them ordered by distance from the client.
    let exec = MockExec::new()
        .respond_ok(config_dump_json("v1", "outbound|80||other.com", &[]))
        .respond_ok(config_dump_json("v2", &cluster, &unprioritized_groups()))
        .repeat_ok(config_dump_json("v3", &cluster, &failover_groups()));
    let sidecar = Sidecar::new(target("a-v1-0"), &exec);

    let priority = |locality: &str, priority: u32| -> BoxPredicate {
        Box::new(predicates::locality_priority(cluster.clone(), locality, priority))
    };
    let ready = all_of(vec![
        Box::new(predicates::has_cluster_for_host(host.clone())) as BoxPredicate,
        priority("region", 0),
        priority("closeregion", 1),
        priority("notcloseregion", 2),
    ]);

    let dump = sidecar
        .wait_for_config(ready, &policy(), &CancelSignal::never())
        .await
        .unwrap();

    assert_eq!(exec.call_count(), 3);
    let assignment = dump.endpoint_assignment(&cluster).unwrap();
    assert_eq!(assignment.endpoint_count(), 3);
    assert_eq!(assignment.group_of("10.28.1.139").map(|g| g.priority), Some(2));
}

#[tokio::test]
async fn unreachable_locality_times_out() {
    let cluster = "outbound|80||fake-eds-external-service-0.com";
    let exec = MockExec::new().repeat_ok(config_dump_json("v1", cluster, &failover_groups()));
    let sidecar = Sidecar::new(target("a-v1-0"), &exec);

    let err = sidecar
        .wait_for_config(
            predicates::endpoints_in_locality(cluster, "farregion"),
            &policy().with_max_attempts(3),
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert_eq!(err.attempts(), Some(3));
    let last = err.last_snapshot().unwrap();
    assert_eq!(last.endpoint_assignment(cluster).unwrap().endpoint_count(), 3);
}

#[tokio::test]
async fn malformed_locality_fails_fast() {
    let cluster = "outbound|80||fake-eds-external-service-0.com";
    let exec = MockExec::new().repeat_ok(config_dump_json("v1", cluster, &failover_groups()));
    let sidecar = Sidecar::new(target("a-v1-0"), &exec);

    let err = sidecar
        .wait_for_config(
            predicates::locality_priority(cluster, "region//subzone", 0),
            &policy(),
            &CancelSignal::never(),
        )
        .await
        .unwrap_err();

    assert!(matches!(err, ProbeError::PredicateFailed { attempts: 1, .. }));
    assert_eq!(exec.call_count(), 1);
}

#[test]
fn hostnames_do_not_repeat() {
    let hosts = HostnameSequence::new("fake-cds-external-service", ".com");
    let names: std::collections::HashSet<_> = (0..50).map(|_| hosts.next_hostname()).collect();
    assert_eq!(names.len(), 50);
    assert_eq!(hosts.issued(), 50);
}
