//! Shared fixtures for the integration tests.

use std::sync::Once;

use sidecar_probe::prelude::*;
use tracing_subscriber::EnvFilter;

/// Namespace used by the failover scenario.
pub const NAMESPACE: &str = "failover";

/// Install a test-writer subscriber once per test binary.
///
/// Honors `RUST_LOG`; defaults to debug output from the probe crates.
pub fn init_tracing() {
    static INIT: Once = Once::new();
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("probe_admin=debug,probe_poll=debug"));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init();
    });
}

/// Sidecar of pod `pod` in the scenario namespace.
pub fn target(pod: &str) -> ProxyTarget {
    ProxyTarget::sidecar(NAMESPACE, pod)
}

/// A `/server_info` body for a live proxy.
pub fn server_info_json(node_id: &str) -> String {
    format!(
        r#"{{
          "version": "3b5a2a6/1.29.0/Clean/RELEASE/BoringSSL",
          "state": "LIVE",
          "hot_restart_version": "11.104",
          "command_line_options": {{"concurrency": 2, "log_level": "warning"}},
          "uptime_current_epoch": "125s",
          "uptime_all_epochs": "3725.5s",
          "node": {{"id": "{node_id}", "cluster": "a.failover"}}
        }}"#
    )
}

/// One endpoint group of a cluster load assignment.
pub struct Group<'a> {
    /// `region/zone/subzone` of the group.
    pub locality: (&'a str, &'a str, &'a str),
    /// Endpoint addresses.
    pub addresses: &'a [&'a str],
    /// Failover priority.
    pub priority: u32,
}

/// A `/config_dump` body holding one cluster and its endpoints.
pub fn config_dump_json(version: &str, cluster: &str, groups: &[Group<'_>]) -> String {
    let groups: Vec<String> = groups
        .iter()
        .map(|g| {
            let endpoints: Vec<String> = g
                .addresses
                .iter()
                .map(|a| {
                    format!(
                        r#"{{"endpoint": {{"address": {{"socket_address": {{"address": "{a}", "port_value": 80}}}}}}, "health_status": "HEALTHY"}}"#
                    )
                })
                .collect();
            let (region, zone, sub_zone) = g.locality;
            format!(
                r#"{{"locality": {{"region": "{region}", "zone": "{zone}", "sub_zone": "{sub_zone}"}}, "lb_endpoints": [{}], "priority": {}}}"#,
                endpoints.join(","),
                g.priority
            )
        })
        .collect();

    format!(
        r#"{{
          "configs": [
            {{
              "@type": "type.googleapis.com/envoy.admin.v3.BootstrapConfigDump",
              "bootstrap": {{"node": {{"id": "sidecar~10.0.0.1~a-v1-0.failover~failover.svc.cluster.local"}}}},
              "last_updated": "2024-05-01T10:00:00Z"
            }},
            {{
              "@type": "type.googleapis.com/envoy.admin.v3.ClustersConfigDump",
              "version_info": "{version}",
              "dynamic_active_clusters": [{{"version_info": "{version}", "cluster": {{"@type": "type.googleapis.com/envoy.config.cluster.v3.Cluster", "name": "{cluster}", "type": "EDS"}}}}]
            }},
            {{
              "@type": "type.googleapis.com/envoy.admin.v3.ListenersConfigDump",
              "version_info": "{version}",
              "dynamic_listeners": [{{"name": "virtualOutbound", "active_state": {{"version_info": "{version}", "listener": {{"name": "virtualOutbound"}}}}}}]
            }},
            {{
              "@type": "type.googleapis.com/envoy.admin.v3.EndpointsConfigDump",
              "dynamic_endpoint_configs": [{{
                "version_info": "{version}",
                "endpoint_config": {{
                  "@type": "type.googleapis.com/envoy.config.endpoint.v3.ClusterLoadAssignment",
                  "cluster_name": "{cluster}",
                  "endpoints": [{}]
                }}
              }}]
            }}
          ]
        }}"#,
        groups.join(",")
    )
}
