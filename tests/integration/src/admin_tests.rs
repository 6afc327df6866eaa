//! Admin query integration tests.

use std::sync::Arc;
use std::time::Duration;

use probe_integration_tests::{config_dump_json, init_tracing, server_info_json, target, Group};
use sidecar_probe::admin::admin_command;
use sidecar_probe::prelude::*;

const CLUSTER: &str = "outbound|80||fake-eds-external-service-1.com";

fn single_group() -> Vec<Group<'static>> {
    vec![Group {
        locality: ("region", "zone", "subzone"),
        addresses: &["10.10.10.10"],
        priority: 0,
    }]
}

#[tokio::test]
async fn server_info_decodes_without_loss() {
    init_tracing();
    let node_id = "sidecar~10.28.1.137~a-v1-0.failover~failover.svc.cluster.local";
    let exec = MockExec::new().respond_ok(server_info_json(node_id));
    let client = AdminClient::new(&exec);

    let info = client.fetch_server_info(&target("a-v1-0")).await.unwrap();

    assert_eq!(info.version, "3b5a2a6/1.29.0/Clean/RELEASE/BoringSSL");
    assert_eq!(info.state, ServerState::Live);
    assert_eq!(info.hot_restart_version.as_deref(), Some("11.104"));
    assert_eq!(info.uptime_current_epoch, Some(Duration::from_secs(125)));
    assert_eq!(info.uptime_all_epochs, Some(Duration::from_millis(3_725_500)));
    assert_eq!(info.node_id(), Some(node_id));
    assert_eq!(info.command_line_options["concurrency"], 2);

    // Re-encoding and decoding again yields the same value.
    let encoded = serde_json::to_string(&info).unwrap();
    let decoded: ServerInfo = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, info);
}

#[tokio::test]
async fn config_dump_decodes_without_loss() {
    init_tracing();
    let body = config_dump_json("v7", CLUSTER, &single_group());
    let exec = MockExec::new().respond_ok(body);
    let client = AdminClient::new(&exec);

    let dump = client.fetch_config_dump(&target("a-v1-0")).await.unwrap();

    let summary = dump.summary();
    assert_eq!(summary.clusters, 1);
    assert_eq!(summary.listeners, 1);
    assert_eq!(summary.endpoint_assignments, 1);
    assert!(dump.bootstrap().is_some());
    assert_eq!(
        dump.clusters_dump().and_then(|c| c.version_info.as_deref()),
        Some("v7")
    );

    let assignment = dump.endpoint_assignment(CLUSTER).unwrap();
    assert_eq!(assignment.endpoint_count(), 1);
    let group = assignment.group_of("10.10.10.10").unwrap();
    assert_eq!(group.locality(), "region/zone/subzone".parse::<Locality>().unwrap());

    let encoded = serde_json::to_string(&dump).unwrap();
    let decoded: ConfigDump = serde_json::from_str(&encoded).unwrap();
    assert_eq!(decoded, dump);
}

#[tokio::test]
async fn commands_address_the_sidecar_container() {
    let exec = MockExec::new()
        .respond_ok(server_info_json("node"))
        .respond_ok(config_dump_json("v1", CLUSTER, &[]));
    let client = AdminClient::new(&exec);
    let target = target("b-v1-0");

    client.fetch_server_info(&target).await.unwrap();
    client.fetch_config_dump(&target).await.unwrap();

    let calls = exec.calls();
    assert_eq!(calls.len(), 2);
    for call in &calls {
        assert_eq!(call.namespace, "failover");
        assert_eq!(call.pod, "b-v1-0");
        assert_eq!(call.container, "istio-proxy");
    }
    assert_eq!(calls[0].command, admin_command(AdminResource::ServerInfo));
    assert_eq!(calls[1].command, admin_command(AdminResource::ConfigDump));
    assert_eq!(calls[1].command, "curl -s http://127.0.0.1:15000/config_dump");
}

#[tokio::test]
async fn malformed_payloads_fail_to_decode() {
    init_tracing();
    let payloads = [
        "",
        "upstream connect error or disconnect/reset before headers",
        "<html><body>404 Not Found</body></html>",
        r#"{"configs": ["#,
        r#"{"configs": {}}"#,
        r#"{"configs": [{"version_info": "v1"}]}"#,
        r#"{"configs": [{"@type": 7}]}"#,
        r#"{"configs": [{"@type": "type.googleapis.com/envoy.admin.v3.ClustersConfigDump", "dynamic_active_clusters": "none"}]}"#,
        r#"{"something": "else"}"#,
    ];

    for payload in payloads {
        let exec = MockExec::new().respond_ok(payload);
        let err = AdminClient::new(&exec)
            .fetch_config_dump(&target("a-v1-0"))
            .await
            .unwrap_err();

        match &err {
            ProbeError::Decode { resource, response, .. } => {
                assert_eq!(resource, "config_dump");
                assert_eq!(response, payload);
            }
            other => panic!("payload {payload:?}: expected decode error, got {other:?}"),
        }
        assert!(err.is_fetch_failure());
    }
}

#[tokio::test]
async fn server_info_requires_state() {
    let exec = MockExec::new().respond_ok(r#"{"version": "1.29.0"}"#);
    let err = AdminClient::new(&exec)
        .fetch_server_info(&target("a-v1-0"))
        .await
        .unwrap_err();
    assert!(matches!(err, ProbeError::Decode { ref resource, .. } if resource == "server_info"));
}

#[tokio::test]
async fn exec_failure_keeps_output_and_cause() {
    let failure = ExecFailure::new("command terminated with exit code 7")
        .with_output("curl: (7) Failed to connect to 127.0.0.1 port 15000");
    let exec = MockExec::new().respond_err(failure);

    let err = AdminClient::new(&exec)
        .fetch_config_dump(&target("a-v1-0"))
        .await
        .unwrap_err();

    match err {
        ProbeError::RemoteExecution {
            target,
            command,
            output,
            source,
        } => {
            assert_eq!(target.pod(), "a-v1-0");
            assert!(command.ends_with("/config_dump"));
            assert!(output.contains("Failed to connect"));
            assert_eq!(source.message, "command terminated with exit code 7");
        }
        other => panic!("expected remote execution error, got {other:?}"),
    }
}

#[tokio::test]
async fn concurrent_fetches_share_collaborator() {
    let exec = Arc::new(MockExec::new().repeat_ok(server_info_json("node")));
    let pods = ["a-v1-0", "b-v1-0", "c-v1-0", "d-v1-0"];

    let handles: Vec<_> = pods
        .iter()
        .map(|pod| {
            let client = AdminClient::new(Arc::clone(&exec));
            let target = target(pod);
            tokio::spawn(async move { client.fetch_server_info(&target).await })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap().unwrap().is_live());
    }

    let mut seen: Vec<_> = exec.calls().into_iter().map(|c| c.pod).collect();
    seen.sort();
    assert_eq!(seen, pods);
}
